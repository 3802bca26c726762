//! Typed rows for every persisted entity.
//!
//! Each entity knows its table, how it is keyed, and how to flatten
//! itself into columns. The generic writer in `db::record_repo` does
//! the rest.

use chrono::NaiveDate;
use rusqlite::types::Value;
use serde_json::{Map, Value as JsonValue};

use crate::source::CsvRecord;

pub mod dataprocess12;
pub mod dataprocess3;
pub mod har_mls;

pub use dataprocess12::*;
pub use dataprocess3::*;
pub use har_mls::*;

/// How rows of an entity are identified across runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPolicy {
    /// Columns forming a unique natural key. Re-imports update in place.
    Natural(&'static [&'static str]),
    /// No natural key. Every import appends a new row.
    AppendOnly,
}

/// A row destined for one table.
pub trait Entity {
    const TABLE: &'static str;
    const KEY: KeyPolicy;

    /// Short human label used in logs and error messages.
    fn label(&self) -> String;

    /// Column name and value pairs, excluding `id`, `created_at` and
    /// `updated_at`.
    fn columns(&self) -> Vec<(&'static str, Value)>;
}

/// Every entity table, in creation order.
pub const TABLES: &[&str] = &[
    Developer::TABLE,
    Project::TABLE,
    MarketStat::TABLE,
    CommercialSector::TABLE,
    CompetitiveAnalysis::TABLE,
    LandAcquisition::TABLE,
    ResidentialActivity::TABLE,
    Permit::TABLE,
    InfrastructureProject::TABLE,
    ZoningChange::TABLE,
    EconomicIndicator::TABLE,
    Demographics::TABLE,
    EnvironmentalProgram::TABLE,
    TechInnovation::TABLE,
    FinancingTerm::TABLE,
    NeighborhoodStat::TABLE,
    MarketIntelligence::TABLE,
    ConstructionActivity::TABLE,
    CostAnalysis::TABLE,
    QualityOfLife::TABLE,
    HarMlsReport::TABLE,
    HarNeighborhood::TABLE,
];

/// Provenance stored alongside every row: the source tag, the original
/// CSV row, and any importer-specific extras.
pub fn metadata(source: &str, original: &CsvRecord, extras: &[(&str, JsonValue)]) -> JsonValue {
    let mut map = Map::new();
    map.insert("source".to_string(), JsonValue::from(source));
    map.insert("original_data".to_string(), original.to_json());
    for (key, value) in extras {
        map.insert((*key).to_string(), value.clone());
    }
    JsonValue::Object(map)
}

pub(crate) fn text(value: &str) -> Value {
    Value::Text(value.to_string())
}

pub(crate) fn opt_text(value: Option<&str>) -> Value {
    value.map(text).unwrap_or(Value::Null)
}

pub(crate) fn date(value: NaiveDate) -> Value {
    Value::Text(value.format("%Y-%m-%d").to_string())
}

pub(crate) fn opt_date(value: Option<NaiveDate>) -> Value {
    value.map(date).unwrap_or(Value::Null)
}

pub(crate) fn json(value: &JsonValue) -> Value {
    Value::Text(value.to_string())
}

pub(crate) fn opt_json(value: Option<&JsonValue>) -> Value {
    value.map(json).unwrap_or(Value::Null)
}
