//! Entities written by the Data Process 1-2 importers.

use chrono::NaiveDate;
use rusqlite::types::Value;
use serde_json::Value as JsonValue;

use super::{date, json, text, Entity, KeyPolicy};

#[derive(Debug, Clone, PartialEq)]
pub struct Developer {
    pub name: String,
    pub developer_type: String,
    pub monthly_permits: i64,
    pub avg_home_value: f64,
    pub major_projects: String,
    pub metadata: JsonValue,
}

impl Entity for Developer {
    const TABLE: &'static str = "developers";
    const KEY: KeyPolicy = KeyPolicy::Natural(&["name"]);

    fn label(&self) -> String {
        format!("Developer {}", self.name)
    }

    fn columns(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("name", text(&self.name)),
            ("developer_type", text(&self.developer_type)),
            ("monthly_permits", Value::Integer(self.monthly_permits)),
            ("avg_home_value", Value::Real(self.avg_home_value)),
            ("major_projects", text(&self.major_projects)),
            ("metadata", json(&self.metadata)),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub name: String,
    pub developer_name: String,
    pub project_type: String,
    pub investment_value: f64,
    pub status: String,
    pub metadata: JsonValue,
}

impl Entity for Project {
    const TABLE: &'static str = "projects";
    const KEY: KeyPolicy = KeyPolicy::Natural(&["name"]);

    fn label(&self) -> String {
        format!("Project {}", self.name)
    }

    fn columns(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("name", text(&self.name)),
            ("developer_name", text(&self.developer_name)),
            ("project_type", text(&self.project_type)),
            ("investment_value", Value::Real(self.investment_value)),
            ("status", text(&self.status)),
            ("metadata", json(&self.metadata)),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarketStat {
    pub metric: String,
    pub value: String,
    pub category: String,
    pub year: i32,
    pub metadata: JsonValue,
}

impl Entity for MarketStat {
    const TABLE: &'static str = "market_stats";
    const KEY: KeyPolicy = KeyPolicy::AppendOnly;

    fn label(&self) -> String {
        format!("Market stat {}", self.metric)
    }

    fn columns(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("metric", text(&self.metric)),
            ("value", text(&self.value)),
            ("category", text(&self.category)),
            ("year", Value::Integer(self.year.into())),
            ("metadata", json(&self.metadata)),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommercialSector {
    pub sector: String,
    pub sqft_under_construction: i64,
    pub vacancy_rate: f64,
    pub avg_rent_psf: f64,
    pub net_absorption: i64,
    pub year: i32,
    pub metadata: JsonValue,
}

impl Entity for CommercialSector {
    const TABLE: &'static str = "commercial_sectors";
    const KEY: KeyPolicy = KeyPolicy::AppendOnly;

    fn label(&self) -> String {
        format!("Commercial sector {}", self.sector)
    }

    fn columns(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("sector", text(&self.sector)),
            (
                "sqft_under_construction",
                Value::Integer(self.sqft_under_construction),
            ),
            ("vacancy_rate", Value::Real(self.vacancy_rate)),
            ("avg_rent_psf", Value::Real(self.avg_rent_psf)),
            ("net_absorption", Value::Integer(self.net_absorption)),
            ("year", Value::Integer(self.year.into())),
            ("metadata", json(&self.metadata)),
        ]
    }
}

/// Houston compared against the other Texas metros on one metric.
#[derive(Debug, Clone, PartialEq)]
pub struct CompetitiveAnalysis {
    pub metric: String,
    pub houston: String,
    pub dallas: String,
    pub austin: String,
    pub san_antonio: String,
    pub advantage: String,
    pub year: i32,
    pub metadata: JsonValue,
}

impl Entity for CompetitiveAnalysis {
    const TABLE: &'static str = "competitive_analysis";
    const KEY: KeyPolicy = KeyPolicy::AppendOnly;

    fn label(&self) -> String {
        format!("Competitive analysis {}", self.metric)
    }

    fn columns(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("metric", text(&self.metric)),
            ("houston", text(&self.houston)),
            ("dallas", text(&self.dallas)),
            ("austin", text(&self.austin)),
            ("san_antonio", text(&self.san_antonio)),
            ("advantage", text(&self.advantage)),
            ("year", Value::Integer(self.year.into())),
            ("metadata", json(&self.metadata)),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LandAcquisition {
    pub developer: String,
    pub strategy: String,
    pub target_areas: String,
    pub avg_acreage: f64,
    pub price_per_acre: f64,
    pub total_investment: f64,
    pub year: i32,
    pub metadata: JsonValue,
}

impl Entity for LandAcquisition {
    const TABLE: &'static str = "land_acquisitions";
    const KEY: KeyPolicy = KeyPolicy::AppendOnly;

    fn label(&self) -> String {
        format!("Land acquisition {}", self.developer)
    }

    fn columns(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("developer", text(&self.developer)),
            ("strategy", text(&self.strategy)),
            ("target_areas", text(&self.target_areas)),
            ("avg_acreage", Value::Real(self.avg_acreage)),
            ("price_per_acre", Value::Real(self.price_per_acre)),
            ("total_investment", Value::Real(self.total_investment)),
            ("year", Value::Integer(self.year.into())),
            ("metadata", json(&self.metadata)),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResidentialActivity {
    pub area: String,
    pub new_starts: i64,
    pub closings: i64,
    pub avg_price: f64,
    pub inventory: i64,
    pub absorption_rate: f64,
    pub top_builder: String,
    pub year: i32,
    pub quarter: String,
    pub metadata: JsonValue,
}

impl Entity for ResidentialActivity {
    const TABLE: &'static str = "residential_activity";
    const KEY: KeyPolicy = KeyPolicy::AppendOnly;

    fn label(&self) -> String {
        format!("Residential activity {}", self.area)
    }

    fn columns(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("area", text(&self.area)),
            ("new_starts", Value::Integer(self.new_starts)),
            ("closings", Value::Integer(self.closings)),
            ("avg_price", Value::Real(self.avg_price)),
            ("inventory", Value::Integer(self.inventory)),
            ("absorption_rate", Value::Real(self.absorption_rate)),
            ("top_builder", text(&self.top_builder)),
            ("year", Value::Integer(self.year.into())),
            ("quarter", text(&self.quarter)),
            ("metadata", json(&self.metadata)),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Permit {
    pub permit_number: String,
    pub permit_type: String,
    pub address: String,
    pub zip_code: String,
    pub value: f64,
    pub issue_date: NaiveDate,
    pub status: String,
    pub contractor: String,
    pub owner: String,
    pub metadata: JsonValue,
}

impl Entity for Permit {
    const TABLE: &'static str = "permits";
    const KEY: KeyPolicy = KeyPolicy::Natural(&["permit_number"]);

    fn label(&self) -> String {
        format!("Permit {}", self.permit_number)
    }

    fn columns(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("permit_number", text(&self.permit_number)),
            ("permit_type", text(&self.permit_type)),
            ("address", text(&self.address)),
            ("zip_code", text(&self.zip_code)),
            ("value", Value::Real(self.value)),
            ("issue_date", date(self.issue_date)),
            ("status", text(&self.status)),
            ("contractor", text(&self.contractor)),
            ("owner", text(&self.owner)),
            ("metadata", json(&self.metadata)),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InfrastructureProject {
    pub name: String,
    pub project_type: String,
    pub agency: String,
    pub budget: f64,
    pub timeline: String,
    pub status: String,
    pub impact: String,
    pub metadata: JsonValue,
}

impl Entity for InfrastructureProject {
    const TABLE: &'static str = "infrastructure_projects";
    const KEY: KeyPolicy = KeyPolicy::AppendOnly;

    fn label(&self) -> String {
        format!("Infrastructure {}", self.name)
    }

    fn columns(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("name", text(&self.name)),
            ("project_type", text(&self.project_type)),
            ("agency", text(&self.agency)),
            ("budget", Value::Real(self.budget)),
            ("timeline", text(&self.timeline)),
            ("status", text(&self.status)),
            ("impact", text(&self.impact)),
            ("metadata", json(&self.metadata)),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ZoningChange {
    pub area: String,
    pub previous_zoning: String,
    pub new_zoning: String,
    pub acreage: f64,
    pub approval_date: NaiveDate,
    pub impact: String,
    pub developer: String,
    pub metadata: JsonValue,
}

impl Entity for ZoningChange {
    const TABLE: &'static str = "zoning_changes";
    const KEY: KeyPolicy = KeyPolicy::AppendOnly;

    fn label(&self) -> String {
        format!("Zoning change {}", self.area)
    }

    fn columns(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("area", text(&self.area)),
            ("previous_zoning", text(&self.previous_zoning)),
            ("new_zoning", text(&self.new_zoning)),
            ("acreage", Value::Real(self.acreage)),
            ("approval_date", date(self.approval_date)),
            ("impact", text(&self.impact)),
            ("developer", text(&self.developer)),
            ("metadata", json(&self.metadata)),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EconomicIndicator {
    pub name: String,
    pub value: String,
    pub unit: String,
    pub period: String,
    pub metadata: JsonValue,
}

impl Entity for EconomicIndicator {
    const TABLE: &'static str = "economic_indicators";
    const KEY: KeyPolicy = KeyPolicy::AppendOnly;

    fn label(&self) -> String {
        self.name.clone()
    }

    fn columns(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("name", text(&self.name)),
            ("value", text(&self.value)),
            ("unit", text(&self.unit)),
            ("period", text(&self.period)),
            ("metadata", json(&self.metadata)),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Demographics {
    pub area: String,
    pub population_2024: i64,
    pub population_2029: i64,
    pub growth_rate: f64,
    pub new_residents: i64,
    pub source: String,
    pub metadata: JsonValue,
}

impl Entity for Demographics {
    const TABLE: &'static str = "demographics";
    const KEY: KeyPolicy = KeyPolicy::AppendOnly;

    fn label(&self) -> String {
        format!("Population {}", self.area)
    }

    fn columns(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("area", text(&self.area)),
            ("population_2024", Value::Integer(self.population_2024)),
            ("population_2029", Value::Integer(self.population_2029)),
            ("growth_rate", Value::Real(self.growth_rate)),
            ("new_residents", Value::Integer(self.new_residents)),
            ("source", text(&self.source)),
            ("metadata", json(&self.metadata)),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentalProgram {
    pub program: String,
    pub category: String,
    pub funding: f64,
    pub impact: String,
    pub status: String,
    pub year: i32,
    pub metadata: JsonValue,
}

impl Entity for EnvironmentalProgram {
    const TABLE: &'static str = "environmental_programs";
    const KEY: KeyPolicy = KeyPolicy::AppendOnly;

    fn label(&self) -> String {
        format!("Environmental program {}", self.program)
    }

    fn columns(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("program", text(&self.program)),
            ("category", text(&self.category)),
            ("funding", Value::Real(self.funding)),
            ("impact", text(&self.impact)),
            ("status", text(&self.status)),
            ("year", Value::Integer(self.year.into())),
            ("metadata", json(&self.metadata)),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TechInnovation {
    pub metric: String,
    pub value: String,
    pub category: String,
    pub district: String,
    pub year: i32,
    pub growth: f64,
    pub metadata: JsonValue,
}

impl Entity for TechInnovation {
    const TABLE: &'static str = "tech_innovation";
    const KEY: KeyPolicy = KeyPolicy::AppendOnly;

    fn label(&self) -> String {
        format!("Tech metric {}", self.metric)
    }

    fn columns(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("metric", text(&self.metric)),
            ("value", text(&self.value)),
            ("category", text(&self.category)),
            ("district", text(&self.district)),
            ("year", Value::Integer(self.year.into())),
            ("growth", Value::Real(self.growth)),
            ("metadata", json(&self.metadata)),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FinancingTerm {
    pub lender_type: String,
    pub rate: f64,
    pub ltv: f64,
    pub property_type: String,
    pub min_loan: f64,
    pub max_loan: f64,
    pub terms: String,
    pub effective_date: NaiveDate,
    pub metadata: JsonValue,
}

impl Entity for FinancingTerm {
    const TABLE: &'static str = "financing_terms";
    const KEY: KeyPolicy = KeyPolicy::AppendOnly;

    fn label(&self) -> String {
        format!("Financing {}", self.lender_type)
    }

    fn columns(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("lender_type", text(&self.lender_type)),
            ("rate", Value::Real(self.rate)),
            ("ltv", Value::Real(self.ltv)),
            ("property_type", text(&self.property_type)),
            ("min_loan", Value::Real(self.min_loan)),
            ("max_loan", Value::Real(self.max_loan)),
            ("terms", text(&self.terms)),
            ("effective_date", date(self.effective_date)),
            ("metadata", json(&self.metadata)),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NeighborhoodStat {
    pub neighborhood: String,
    pub zip_code: String,
    pub median_price: f64,
    pub price_change: f64,
    pub inventory: i64,
    pub days_on_market: i64,
    pub sales_volume: i64,
    pub list_to_sale_ratio: f64,
    pub year: i32,
    pub month: String,
    pub metadata: JsonValue,
}

impl Entity for NeighborhoodStat {
    const TABLE: &'static str = "neighborhood_stats";
    const KEY: KeyPolicy = KeyPolicy::AppendOnly;

    fn label(&self) -> String {
        format!("Neighborhood {}", self.neighborhood)
    }

    fn columns(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("neighborhood", text(&self.neighborhood)),
            ("zip_code", text(&self.zip_code)),
            ("median_price", Value::Real(self.median_price)),
            ("price_change", Value::Real(self.price_change)),
            ("inventory", Value::Integer(self.inventory)),
            ("days_on_market", Value::Integer(self.days_on_market)),
            ("sales_volume", Value::Integer(self.sales_volume)),
            ("list_to_sale_ratio", Value::Real(self.list_to_sale_ratio)),
            ("year", Value::Integer(self.year.into())),
            ("month", text(&self.month)),
            ("metadata", json(&self.metadata)),
        ]
    }
}
