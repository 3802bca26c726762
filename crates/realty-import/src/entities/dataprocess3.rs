//! Entities written by the Data Process 3 importers.

use chrono::NaiveDate;
use rusqlite::types::Value;
use serde_json::Value as JsonValue;

use super::{date, json, opt_date, opt_json, text, Entity, KeyPolicy};

/// One market intelligence observation. `data_type` tells the feeds apart
/// (`competitive`, `financial-performance`, `micro-market`,
/// `investment-sentiment`, `mls-realtime`).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MarketIntelligence {
    pub data_type: String,
    pub zip_code: String,
    pub neighborhood: String,
    pub market_share: f64,
    pub competitors: i64,
    pub cap_rate: f64,
    pub roi: f64,
    pub investment_score: f64,
    pub gentrification_score: f64,
    pub school_rating: f64,
    pub foreign_investment_pct: f64,
    pub institutional_pct: f64,
    pub data_date: NaiveDate,
    pub metadata: JsonValue,
}

impl Entity for MarketIntelligence {
    const TABLE: &'static str = "market_intelligence";
    const KEY: KeyPolicy = KeyPolicy::AppendOnly;

    fn label(&self) -> String {
        if self.neighborhood.is_empty() {
            format!("{} {}", self.data_type, self.zip_code)
        } else {
            format!("{} {}", self.data_type, self.neighborhood)
        }
    }

    fn columns(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("data_type", text(&self.data_type)),
            ("zip_code", text(&self.zip_code)),
            ("neighborhood", text(&self.neighborhood)),
            ("market_share", Value::Real(self.market_share)),
            ("competitors", Value::Integer(self.competitors)),
            ("cap_rate", Value::Real(self.cap_rate)),
            ("roi", Value::Real(self.roi)),
            ("investment_score", Value::Real(self.investment_score)),
            ("gentrification_score", Value::Real(self.gentrification_score)),
            ("school_rating", Value::Real(self.school_rating)),
            (
                "foreign_investment_pct",
                Value::Real(self.foreign_investment_pct),
            ),
            ("institutional_pct", Value::Real(self.institutional_pct)),
            ("data_date", date(self.data_date)),
            ("metadata", json(&self.metadata)),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstructionActivity {
    pub permit_number: String,
    pub permit_type: String,
    pub sub_type: String,
    pub address: String,
    pub zip_code: String,
    pub neighborhood: String,
    pub precinct: String,
    pub project_name: String,
    pub developer: String,
    pub contractor: String,
    pub estimated_cost: f64,
    pub square_footage: i64,
    pub units: i64,
    pub permit_date: NaiveDate,
    pub completion_date: Option<NaiveDate>,
    pub status: String,
    pub metadata: JsonValue,
}

impl Entity for ConstructionActivity {
    const TABLE: &'static str = "construction_activity";
    const KEY: KeyPolicy = KeyPolicy::Natural(&["permit_number"]);

    fn label(&self) -> String {
        format!("Construction {}", self.permit_number)
    }

    fn columns(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("permit_number", text(&self.permit_number)),
            ("permit_type", text(&self.permit_type)),
            ("sub_type", text(&self.sub_type)),
            ("address", text(&self.address)),
            ("zip_code", text(&self.zip_code)),
            ("neighborhood", text(&self.neighborhood)),
            ("precinct", text(&self.precinct)),
            ("project_name", text(&self.project_name)),
            ("developer", text(&self.developer)),
            ("contractor", text(&self.contractor)),
            ("estimated_cost", Value::Real(self.estimated_cost)),
            ("square_footage", Value::Integer(self.square_footage)),
            ("units", Value::Integer(self.units)),
            ("permit_date", date(self.permit_date)),
            ("completion_date", opt_date(self.completion_date)),
            ("status", text(&self.status)),
            ("metadata", json(&self.metadata)),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CostAnalysis {
    pub analysis_type: String,
    pub location: String,
    pub cost_per_sqft: f64,
    pub materials_cost: f64,
    pub labor_cost: f64,
    pub hourly_rate: f64,
    pub skill_level: String,
    pub trade_type: String,
    pub price_per_acre: f64,
    pub price_per_sqft: f64,
    pub permit_type: String,
    pub base_fee: f64,
    pub additional_fees: Option<JsonValue>,
    pub effective_date: NaiveDate,
    pub metadata: JsonValue,
}

impl Entity for CostAnalysis {
    const TABLE: &'static str = "cost_analysis";
    const KEY: KeyPolicy = KeyPolicy::AppendOnly;

    fn label(&self) -> String {
        format!("Cost analysis {} {}", self.analysis_type, self.location)
    }

    fn columns(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("analysis_type", text(&self.analysis_type)),
            ("location", text(&self.location)),
            ("cost_per_sqft", Value::Real(self.cost_per_sqft)),
            ("materials_cost", Value::Real(self.materials_cost)),
            ("labor_cost", Value::Real(self.labor_cost)),
            ("hourly_rate", Value::Real(self.hourly_rate)),
            ("skill_level", text(&self.skill_level)),
            ("trade_type", text(&self.trade_type)),
            ("price_per_acre", Value::Real(self.price_per_acre)),
            ("price_per_sqft", Value::Real(self.price_per_sqft)),
            ("permit_type", text(&self.permit_type)),
            ("base_fee", Value::Real(self.base_fee)),
            ("additional_fees", opt_json(self.additional_fees.as_ref())),
            ("effective_date", date(self.effective_date)),
            ("metadata", json(&self.metadata)),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QualityOfLife {
    pub zip_code: String,
    pub neighborhood: String,
    pub crime_rate: f64,
    pub crime_reduction: f64,
    pub safety_score: f64,
    pub walk_score: f64,
    pub transit_score: f64,
    pub bike_score: f64,
    pub data_date: NaiveDate,
    pub metadata: JsonValue,
}

impl Entity for QualityOfLife {
    const TABLE: &'static str = "quality_of_life";
    const KEY: KeyPolicy = KeyPolicy::AppendOnly;

    fn label(&self) -> String {
        format!("Quality of life {}", self.zip_code)
    }

    fn columns(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("zip_code", text(&self.zip_code)),
            ("neighborhood", text(&self.neighborhood)),
            ("crime_rate", Value::Real(self.crime_rate)),
            ("crime_reduction", Value::Real(self.crime_reduction)),
            ("safety_score", Value::Real(self.safety_score)),
            ("walk_score", Value::Real(self.walk_score)),
            ("transit_score", Value::Real(self.transit_score)),
            ("bike_score", Value::Real(self.bike_score)),
            ("data_date", date(self.data_date)),
            ("metadata", json(&self.metadata)),
        ]
    }
}
