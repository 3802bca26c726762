//! HAR MLS monthly report entities and price segment buckets.

use rusqlite::types::Value;
use serde::Serialize;
use serde_json::Value as JsonValue;

use super::{json, opt_text, text, Entity, KeyPolicy};
use crate::config::ReportType;

/// Sale counts per price band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PriceSegments {
    pub under_200k: i64,
    pub from_200k_to_400k: i64,
    pub from_400k_to_600k: i64,
    pub from_600k_to_800k: i64,
    pub from_800k_to_1m: i64,
    pub over_1m: i64,
}

impl PriceSegments {
    /// Counts saturate at the `i64` bounds instead of wrapping.
    pub fn add(&mut self, bucket: PriceBucket, count: i64) {
        let slot = match bucket {
            PriceBucket::Under200k => &mut self.under_200k,
            PriceBucket::From200kTo400k => &mut self.from_200k_to_400k,
            PriceBucket::From400kTo600k => &mut self.from_400k_to_600k,
            PriceBucket::From600kTo800k => &mut self.from_600k_to_800k,
            PriceBucket::From800kTo1m => &mut self.from_800k_to_1m,
            PriceBucket::Over1m => &mut self.over_1m,
        };
        *slot = slot.saturating_add(count);
    }

    pub fn total(&self) -> i64 {
        [
            self.under_200k,
            self.from_200k_to_400k,
            self.from_400k_to_600k,
            self.from_600k_to_800k,
            self.from_800k_to_1m,
            self.over_1m,
        ]
        .into_iter()
        .fold(0i64, i64::saturating_add)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceBucket {
    Under200k,
    From200kTo400k,
    From400kTo600k,
    From600kTo800k,
    From800kTo1m,
    Over1m,
}

impl PriceBucket {
    /// Classifies a free-text price range label such as `<$200k`,
    /// `$400k-$600k`, `Under $200K` or `$1M+`.
    pub fn classify(label: &str) -> Option<Self> {
        let label = label.to_lowercase();
        let has = |needle: &str| label.contains(needle);
        let million = has("1m") || has("1,000") || has("1000");

        if has("200") && (has("<") || has("under") || has("less")) {
            Some(PriceBucket::Under200k)
        } else if has("200") && has("400") {
            Some(PriceBucket::From200kTo400k)
        } else if has("400") && has("600") {
            Some(PriceBucket::From400kTo600k)
        } else if has("600") && has("800") {
            Some(PriceBucket::From600kTo800k)
        } else if has("800") && million {
            Some(PriceBucket::From800kTo1m)
        } else if million {
            Some(PriceBucket::Over1m)
        } else {
            None
        }
    }
}

/// English month name for `1..=12`, `Unknown` otherwise.
pub fn month_name(month: u32) -> &'static str {
    const MONTHS: [&str; 12] = [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ];
    month
        .checked_sub(1)
        .and_then(|i| MONTHS.get(i as usize))
        .copied()
        .unwrap_or("Unknown")
}

/// One market report, keyed by `(month, year, report_type)`.
#[derive(Debug, Clone, PartialEq)]
pub struct HarMlsReport {
    pub month: u32,
    pub year: i32,
    pub report_type: ReportType,
    pub total_sales: i64,
    pub total_volume: f64,
    pub avg_sale_price: f64,
    pub median_sale_price: f64,
    pub price_per_sqft: f64,
    pub sales_change_yoy: f64,
    pub price_change_yoy: f64,
    pub volume_change_yoy: f64,
    pub active_listings: i64,
    pub new_listings: i64,
    pub pending_sales: i64,
    pub months_inventory: f64,
    pub avg_days_on_market: i64,
    pub segments: PriceSegments,
    pub single_family: i64,
    pub townhouse: i64,
    pub condo: i64,
    pub metadata: JsonValue,
}

impl Entity for HarMlsReport {
    const TABLE: &'static str = "har_mls_reports";
    const KEY: KeyPolicy = KeyPolicy::Natural(&["month", "year", "report_type"]);

    fn label(&self) -> String {
        format!(
            "Report {}/{} {}",
            self.month,
            self.year,
            self.report_type.as_str()
        )
    }

    fn columns(&self) -> Vec<(&'static str, Value)> {
        let s = &self.segments;
        vec![
            ("month", Value::Integer(self.month.into())),
            ("year", Value::Integer(self.year.into())),
            ("report_type", text(self.report_type.as_str())),
            ("total_sales", Value::Integer(self.total_sales)),
            ("total_volume", Value::Real(self.total_volume)),
            ("avg_sale_price", Value::Real(self.avg_sale_price)),
            ("median_sale_price", Value::Real(self.median_sale_price)),
            ("price_per_sqft", Value::Real(self.price_per_sqft)),
            ("sales_change_yoy", Value::Real(self.sales_change_yoy)),
            ("price_change_yoy", Value::Real(self.price_change_yoy)),
            ("volume_change_yoy", Value::Real(self.volume_change_yoy)),
            ("active_listings", Value::Integer(self.active_listings)),
            ("new_listings", Value::Integer(self.new_listings)),
            ("pending_sales", Value::Integer(self.pending_sales)),
            ("months_inventory", Value::Real(self.months_inventory)),
            ("avg_days_on_market", Value::Integer(self.avg_days_on_market)),
            ("under_200k", Value::Integer(s.under_200k)),
            ("from_200k_to_400k", Value::Integer(s.from_200k_to_400k)),
            ("from_400k_to_600k", Value::Integer(s.from_400k_to_600k)),
            ("from_600k_to_800k", Value::Integer(s.from_600k_to_800k)),
            ("from_800k_to_1m", Value::Integer(s.from_800k_to_1m)),
            ("over_1m", Value::Integer(s.over_1m)),
            ("single_family", Value::Integer(self.single_family)),
            ("townhouse", Value::Integer(self.townhouse)),
            ("condo", Value::Integer(self.condo)),
            ("metadata", json(&self.metadata)),
        ]
    }
}

/// Neighbourhood breakdown row owned by a report. Appended on every run.
#[derive(Debug, Clone, PartialEq)]
pub struct HarNeighborhood {
    pub report_id: i64,
    pub neighborhood: String,
    pub zip_code: Option<String>,
    pub total_sales: i64,
    pub avg_sale_price: f64,
    pub median_sale_price: f64,
    pub price_per_sqft: f64,
    pub active_listings: i64,
    pub months_inventory: f64,
    pub avg_days_on_market: i64,
    pub list_to_sale_ratio: f64,
    pub seller_concessions: f64,
    pub metadata: JsonValue,
}

impl Entity for HarNeighborhood {
    const TABLE: &'static str = "har_neighborhood_data";
    const KEY: KeyPolicy = KeyPolicy::AppendOnly;

    fn label(&self) -> String {
        format!("Neighborhood {}", self.neighborhood)
    }

    fn columns(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("report_id", Value::Integer(self.report_id)),
            ("neighborhood", text(&self.neighborhood)),
            ("zip_code", opt_text(self.zip_code.as_deref())),
            ("total_sales", Value::Integer(self.total_sales)),
            ("avg_sale_price", Value::Real(self.avg_sale_price)),
            ("median_sale_price", Value::Real(self.median_sale_price)),
            ("price_per_sqft", Value::Real(self.price_per_sqft)),
            ("active_listings", Value::Integer(self.active_listings)),
            ("months_inventory", Value::Real(self.months_inventory)),
            ("avg_days_on_market", Value::Integer(self.avg_days_on_market)),
            ("list_to_sale_ratio", Value::Real(self.list_to_sale_ratio)),
            ("seller_concessions", Value::Real(self.seller_concessions)),
            ("metadata", json(&self.metadata)),
        ]
    }
}
