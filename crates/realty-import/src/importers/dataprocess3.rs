//! Data Process 3: market intelligence feeds, construction activity, cost
//! analysis and quality of life metrics.

use chrono::NaiveDate;
use serde_json::json;

use crate::entities::{ConstructionActivity, CostAnalysis, MarketIntelligence, QualityOfLife};
use crate::error::NormalizeError;
use crate::normalize::{parse_date_or_default, parse_json_or_null, parse_optional_date};
use crate::source::SourceSpec;

use super::{import_sources, Category, RowContext};

const COMPETITIVE: &[SourceSpec] = &[
    SourceSpec::File(
        "Competitive Intelligence_ Texas Real Estate Market/houston_development_platforms.csv",
    ),
    SourceSpec::File(
        "Competitive Intelligence_ Texas Real Estate Market/texas_county_comparison_2024.csv",
    ),
    SourceSpec::File(
        "Competitive Intelligence_ Texas Real Estate Market/texas_investment_metrics_2024.csv",
    ),
];

const CONSTRUCTION: &[SourceSpec] = &[
    SourceSpec::Folder {
        dir: "Harris County Texas Construction Activity Report_",
        name_contains: &["construction"],
    },
    SourceSpec::Folder {
        dir: "Houston Micro-Market Intelligence Report 2024",
        name_contains: &["construction"],
    },
];

const FINANCIAL: &[SourceSpec] = &[SourceSpec::File(
    "Harris County Real Estate Financial Performance An/harris_county_real_estate_performance_2024.csv",
)];

const COSTS: &[SourceSpec] = &[
    SourceSpec::File("Harris County Texas and Houston Metro Area Cost An/construction_costs_2024.csv"),
    SourceSpec::File("Harris County Texas and Houston Metro Area Cost An/labor_rates_2024.csv"),
    SourceSpec::File("Harris County Texas and Houston Metro Area Cost An/land_prices_2024.csv"),
    SourceSpec::File("Harris County Texas and Houston Metro Area Cost An/permit_fees_2024.csv"),
];

const MICRO_MARKET: &[SourceSpec] = &[
    SourceSpec::File("Houston Micro-Market Intelligence Report 2024/houston_micro_market_intelligence.csv"),
    SourceSpec::File("Houston Micro-Market Intelligence Report 2024/houston_gentrification_indicators.csv"),
    SourceSpec::File("Houston Micro-Market Intelligence Report 2024/houston_isd_ratings.csv"),
    SourceSpec::File("Houston Micro-Market Intelligence Report 2024/school_district_property_impact.csv"),
    SourceSpec::File("Houston Micro-Market Intelligence Report 2024/houston_property_values.csv"),
];

const SENTIMENT: &[SourceSpec] = &[
    SourceSpec::File("Investment Sentiment and International Capital Flo/houston_institutional_investor_activity.csv"),
    SourceSpec::File("Investment Sentiment and International Capital Flo/houston_international_investment.csv"),
    SourceSpec::File("Investment Sentiment and International Capital Flo/houston_market_outlook_2024.csv"),
];

const MLS_REALTIME: &[SourceSpec] = &[
    SourceSpec::File("MLS-Real-Time/harris_county_real_estate_market_data_q4_2024.csv"),
    SourceSpec::File("MLS-Real-Time/houston_zip_code_breakdown_q4_2024.csv"),
];

const INFRASTRUCTURE: &[SourceSpec] = &[SourceSpec::File(
    "Major Infrastructure and Climate Resilience Invest/harris_county_major_projects.csv",
)];

const QUALITY_OF_LIFE: &[SourceSpec] = &[SourceSpec::Folder {
    dir: "Quality of Life Metrics_ Houston and Harris County",
    name_contains: &[],
}];

const DEFAULT_ZIP: &str = "77001";

pub fn categories() -> Vec<Category> {
    vec![
        Category::new("competitive-intelligence", "Competitive Intelligence", |ctx| {
            let date = ctx.market_year_start();
            import_sources(ctx, COMPETITIVE, |row| map_competitive(row, date))
        }),
        Category::new("construction-activity", "Construction Activity", |ctx| {
            let date = ctx.market_year_start();
            import_sources(ctx, CONSTRUCTION, |row| map_construction(row, date))
        }),
        Category::new("financial-performance", "Financial Performance", |ctx| {
            let date = ctx.market_year_start();
            import_sources(ctx, FINANCIAL, |row| map_financial(row, date))
        }),
        Category::new("cost-analysis", "Cost Analysis", |ctx| {
            let date = ctx.market_year_start();
            import_sources(ctx, COSTS, |row| map_cost(row, date))
        }),
        Category::new("micro-market", "Micro-Market Intelligence", |ctx| {
            let date = ctx.market_year_start();
            import_sources(ctx, MICRO_MARKET, |row| map_micro_market(row, date))
        }),
        Category::new("investment-sentiment", "Investment Sentiment", |ctx| {
            let date = ctx.market_year_start();
            import_sources(ctx, SENTIMENT, |row| map_sentiment(row, date))
        }),
        Category::new("mls-realtime", "MLS Real-Time Data", |ctx| {
            let date = ctx.mls_snapshot_date();
            import_sources(ctx, MLS_REALTIME, |row| map_mls_realtime(row, date))
        }),
        Category::new("infrastructure", "Infrastructure Investment", |ctx| {
            let date = ctx.market_year_start();
            import_sources(ctx, INFRASTRUCTURE, |row| map_infrastructure(row, date))
        }),
        Category::new("quality-of-life", "Quality of Life", |ctx| {
            let date = ctx.market_year_start();
            import_sources(ctx, QUALITY_OF_LIFE, |row| map_quality_of_life(row, date))
        }),
    ]
}

fn zip_code(row: &RowContext<'_>) -> String {
    row.text(&["ZIP_Code", "zipCode"], "")
}

fn map_competitive(
    row: &RowContext<'_>,
    date: NaiveDate,
) -> Result<MarketIntelligence, NormalizeError> {
    Ok(MarketIntelligence {
        data_type: "competitive".to_string(),
        zip_code: zip_code(row),
        neighborhood: row.text(&["Area", "County", "Platform"], ""),
        market_share: row.number(&["Market_Share", "market_share"]),
        competitors: row.count(&["Competitors"]),
        cap_rate: row.number(&["Cap_Rate", "cap_rate"]),
        roi: row.number(&["ROI", "roi"]),
        investment_score: row.number(&["Investment_Score"]),
        data_date: date,
        metadata: row.metadata(&[]),
        ..Default::default()
    })
}

fn map_construction(
    row: &RowContext<'_>,
    default_date: NaiveDate,
) -> Result<ConstructionActivity, NormalizeError> {
    let permit_number = row
        .get(&["Permit_Number"])
        .map(str::to_string)
        .unwrap_or_else(|| row.synthetic_key("PERM"));

    Ok(ConstructionActivity {
        permit_number,
        permit_type: row.text(&["Type", "Permit_Type"], "residential"),
        sub_type: row.text(&["Sub_Type", "Project_Type"], ""),
        address: row.text(&["Address", "Location"], "Unknown"),
        zip_code: row.text(&["ZIP_Code", "zipCode"], DEFAULT_ZIP),
        neighborhood: row.text(&["Neighborhood", "Area"], ""),
        precinct: row.text(&["Precinct"], ""),
        project_name: row.text(&["Project_Name", "Development"], ""),
        developer: row.text(&["Developer"], ""),
        contractor: row.text(&["Contractor"], ""),
        estimated_cost: row.currency(&["Estimated_Cost", "Cost"]),
        square_footage: row.count(&["Square_Footage", "sqft"]),
        units: row.count(&["Units"]),
        permit_date: parse_date_or_default(
            "Permit_Date",
            row.get(&["Permit_Date", "Date"]),
            default_date,
        )?,
        completion_date: None,
        status: row.text(&["Status"], "active"),
        metadata: row.metadata(&[]),
    })
}

fn map_financial(
    row: &RowContext<'_>,
    date: NaiveDate,
) -> Result<MarketIntelligence, NormalizeError> {
    Ok(MarketIntelligence {
        data_type: "financial-performance".to_string(),
        zip_code: zip_code(row),
        neighborhood: row.text(&["Area", "Submarket"], ""),
        cap_rate: row.number(&["Cap_Rate", "cap_rate"]),
        roi: row.number(&["ROI", "Annual_Return"]),
        investment_score: row.number(&["Performance_Score"]),
        data_date: date,
        metadata: row.metadata(&[
            ("avgRent", json!(row.currency(&["Avg_Rent"]))),
            ("occupancy", json!(row.percentage(&["Occupancy"]))),
        ]),
        ..Default::default()
    })
}

/// Cost files share one table; the file name says which kind of cost it is.
fn analysis_type(file_name: &str) -> &'static str {
    if file_name.contains("labor") {
        "labor"
    } else if file_name.contains("land") {
        "land"
    } else if file_name.contains("permit") {
        "permits"
    } else {
        "construction"
    }
}

fn map_cost(row: &RowContext<'_>, default_date: NaiveDate) -> Result<CostAnalysis, NormalizeError> {
    Ok(CostAnalysis {
        analysis_type: analysis_type(row.file_name).to_string(),
        location: row.text(&["ZIP_Code", "Area", "Location"], "Houston"),
        cost_per_sqft: row.currency(&["Cost_Per_Sqft", "Price_Per_Sqft"]),
        materials_cost: row.currency(&["Materials_Cost"]),
        labor_cost: row.currency(&["Labor_Cost"]),
        hourly_rate: row.currency(&["Hourly_Rate", "Rate"]),
        skill_level: row.text(&["Skill_Level", "Trade_Level"], ""),
        trade_type: row.text(&["Trade_Type", "Trade"], ""),
        price_per_acre: row.currency(&["Price_Per_Acre"]),
        price_per_sqft: row.currency(&["Land_Price_Sqft"]),
        permit_type: row.text(&["Permit_Type"], ""),
        base_fee: row.currency(&["Base_Fee", "Fee"]),
        additional_fees: parse_json_or_null("Additional_Fees", row.get(&["Additional_Fees"]))?,
        effective_date: parse_date_or_default(
            "Effective_Date",
            row.get(&["Effective_Date"]),
            default_date,
        )?,
        metadata: row.metadata(&[]),
    })
}

fn map_micro_market(
    row: &RowContext<'_>,
    date: NaiveDate,
) -> Result<MarketIntelligence, NormalizeError> {
    let scored = row.file_name.contains("gentrification") || row.file_name.contains("isd_ratings");

    if scored {
        Ok(MarketIntelligence {
            data_type: "micro-market".to_string(),
            zip_code: zip_code(row),
            neighborhood: row.text(&["Neighborhood", "Area"], ""),
            gentrification_score: row.number(&["Gentrification_Score", "Change_Index"]),
            school_rating: row.number(&["Rating", "School_Rating", "ISD_Rating"]),
            data_date: date,
            metadata: row.metadata(&[]),
            ..Default::default()
        })
    } else {
        Ok(MarketIntelligence {
            data_type: "micro-market".to_string(),
            zip_code: zip_code(row),
            neighborhood: row.text(&["Neighborhood", "Micro_Market"], ""),
            investment_score: row.number(&["Investment_Score"]),
            data_date: date,
            metadata: row.metadata(&[(
                "avgValue",
                json!(row.currency(&["Avg_Value", "Property_Value"])),
            )]),
            ..Default::default()
        })
    }
}

fn map_sentiment(
    row: &RowContext<'_>,
    date: NaiveDate,
) -> Result<MarketIntelligence, NormalizeError> {
    Ok(MarketIntelligence {
        data_type: "investment-sentiment".to_string(),
        zip_code: zip_code(row),
        neighborhood: row.text(&["Area", "Submarket"], ""),
        foreign_investment_pct: row.percentage(&["Foreign_Investment_Pct", "International_Pct"]),
        institutional_pct: row.percentage(&["Institutional_Pct", "Institutional_Share"]),
        data_date: date,
        metadata: row.metadata(&[
            ("sentiment", json!(row.get(&["Sentiment", "Outlook"]))),
            (
                "investmentVolume",
                json!(row.currency(&["Volume", "Investment_Volume"])),
            ),
        ]),
        ..Default::default()
    })
}

fn map_mls_realtime(
    row: &RowContext<'_>,
    snapshot: NaiveDate,
) -> Result<MarketIntelligence, NormalizeError> {
    Ok(MarketIntelligence {
        data_type: "mls-realtime".to_string(),
        zip_code: zip_code(row),
        neighborhood: row.text(&["Neighborhood", "Area"], ""),
        data_date: snapshot,
        metadata: row.metadata(&[
            ("avgPrice", json!(row.currency(&["Avg_Price", "Average_Price"]))),
            ("medianPrice", json!(row.currency(&["Median_Price"]))),
            ("totalSales", json!(row.count(&["Total_Sales", "Sales"]))),
            ("daysOnMarket", json!(row.count(&["DOM", "Days_On_Market"]))),
        ]),
        ..Default::default()
    })
}

/// Major public projects are kept alongside permits as construction activity.
fn map_infrastructure(
    row: &RowContext<'_>,
    default_date: NaiveDate,
) -> Result<ConstructionActivity, NormalizeError> {
    Ok(ConstructionActivity {
        permit_number: row.synthetic_key("INFRA"),
        permit_type: "infrastructure".to_string(),
        sub_type: row.text(&["Project_Type"], "major-infrastructure"),
        address: row.text(&["Location"], "Harris County"),
        zip_code: row.text(&["ZIP_Code"], DEFAULT_ZIP),
        neighborhood: row.text(&["Area"], ""),
        precinct: String::new(),
        project_name: row.text(&["Project_Name", "Project"], ""),
        developer: row.text(&["Agency"], "Harris County"),
        contractor: String::new(),
        estimated_cost: row.currency(&["Budget", "Cost"]),
        square_footage: 0,
        units: 0,
        permit_date: parse_date_or_default("Start_Date", row.get(&["Start_Date"]), default_date)?,
        completion_date: parse_optional_date("Completion_Date", row.get(&["Completion_Date"]))?,
        status: row.text(&["Status"], "active"),
        metadata: row.metadata(&[
            ("fundingSource", json!(row.get(&["Funding_Source"]))),
            (
                "climateResilience",
                json!(row.get(&["Climate_Component"]) == Some("Yes")),
            ),
        ]),
    })
}

fn map_quality_of_life(
    row: &RowContext<'_>,
    date: NaiveDate,
) -> Result<QualityOfLife, NormalizeError> {
    Ok(QualityOfLife {
        zip_code: row.text(&["ZIP_Code", "zipCode"], DEFAULT_ZIP),
        neighborhood: row.text(&["Neighborhood", "Area"], ""),
        crime_rate: row.number(&["Crime_Rate", "Crime_Index"]),
        crime_reduction: row.percentage(&["Crime_Reduction", "YoY_Change"]),
        safety_score: row.number_or(&["Safety_Score"], 70.0),
        walk_score: row.number_or(&["Walk_Score", "Walkability"], 50.0),
        transit_score: row.number_or(&["Transit_Score"], 40.0),
        bike_score: row.number_or(&["Bike_Score"], 30.0),
        data_date: date,
        metadata: row.metadata(&[]),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::CsvRecord;

    fn record(pairs: &[(&str, &str)]) -> CsvRecord {
        pairs.iter().copied().collect()
    }

    fn jan_first() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn test_categories_in_run_order() {
        let keys: Vec<String> = categories().into_iter().map(|c| c.key).collect();
        assert_eq!(
            keys,
            vec![
                "competitive-intelligence",
                "construction-activity",
                "financial-performance",
                "cost-analysis",
                "micro-market",
                "investment-sentiment",
                "mls-realtime",
                "infrastructure",
                "quality-of-life",
            ]
        );
    }

    #[test]
    fn test_analysis_type_from_file_name() {
        assert_eq!(analysis_type("labor_rates_2024.csv"), "labor");
        assert_eq!(analysis_type("land_prices_2024.csv"), "land");
        assert_eq!(analysis_type("permit_fees_2024.csv"), "permits");
        assert_eq!(analysis_type("construction_costs_2024.csv"), "construction");
    }

    #[test]
    fn test_cost_additional_fees_json() {
        let rec = record(&[
            ("Permit_Type", "Residential"),
            ("Base_Fee", "$1,250"),
            ("Additional_Fees", r#"{"impact": 300}"#),
        ]);
        let row = RowContext {
            record: &rec,
            file_name: "permit_fees_2024.csv",
            source: "permit_fees_2024.csv",
            row: 1,
        };
        let cost = map_cost(&row, jan_first()).unwrap();
        assert_eq!(cost.analysis_type, "permits");
        assert_eq!(cost.base_fee, 1250.0);
        assert_eq!(cost.location, "Houston");
        assert_eq!(cost.additional_fees, Some(json!({"impact": 300})));
        assert_eq!(cost.effective_date, jan_first());
    }

    #[test]
    fn test_cost_invalid_fees_fail_record() {
        let rec = record(&[("Additional_Fees", "{not json")]);
        let row = RowContext {
            record: &rec,
            file_name: "permit_fees_2024.csv",
            source: "permit_fees_2024.csv",
            row: 1,
        };
        assert!(matches!(
            map_cost(&row, jan_first()),
            Err(NormalizeError::InvalidJson { .. })
        ));
    }

    #[test]
    fn test_construction_synthetic_key() {
        let rec = record(&[("Address", "100 Main St"), ("Cost", "$2.5M")]);
        let row = RowContext {
            record: &rec,
            file_name: "harris_construction_2024.csv",
            source: "harris_construction_2024.csv",
            row: 7,
        };
        let activity = map_construction(&row, jan_first()).unwrap();
        assert_eq!(activity.permit_number, "PERM-harris_construction_2024-7");
        assert_eq!(activity.estimated_cost, 2_500_000.0);
        assert_eq!(activity.zip_code, "77001");
        assert_eq!(activity.permit_type, "residential");
    }

    #[test]
    fn test_infrastructure_as_construction_activity() {
        let rec = record(&[
            ("Project_Name", "Ship Channel Expansion"),
            ("Budget", "$1.2B"),
            ("Completion_Date", "2027-06-30"),
            ("Climate_Component", "Yes"),
        ]);
        let row = RowContext {
            record: &rec,
            file_name: "harris_county_major_projects.csv",
            source: "harris_county_major_projects.csv",
            row: 2,
        };
        let project = map_infrastructure(&row, jan_first()).unwrap();
        assert_eq!(project.permit_number, "INFRA-harris_county_major_projects-2");
        assert_eq!(project.permit_type, "infrastructure");
        assert_eq!(project.developer, "Harris County");
        assert_eq!(project.estimated_cost, 1_200_000_000.0);
        assert_eq!(project.completion_date, NaiveDate::from_ymd_opt(2027, 6, 30));
        assert_eq!(project.metadata["climateResilience"], json!(true));
    }

    #[test]
    fn test_micro_market_routes_by_file() {
        let rec = record(&[("Neighborhood", "EaDo"), ("Gentrification_Score", "8.2")]);
        let row = RowContext {
            record: &rec,
            file_name: "houston_gentrification_indicators.csv",
            source: "houston_gentrification_indicators.csv",
            row: 1,
        };
        let scored = map_micro_market(&row, jan_first()).unwrap();
        assert_eq!(scored.gentrification_score, 8.2);
        assert_eq!(scored.investment_score, 0.0);

        let rec = record(&[("Micro_Market", "Heights"), ("Investment_Score", "91")]);
        let row = RowContext {
            record: &rec,
            file_name: "houston_property_values.csv",
            source: "houston_property_values.csv",
            row: 1,
        };
        let valued = map_micro_market(&row, jan_first()).unwrap();
        assert_eq!(valued.neighborhood, "Heights");
        assert_eq!(valued.investment_score, 91.0);
        assert_eq!(valued.metadata["avgValue"], json!(0.0));
    }

    #[test]
    fn test_mls_realtime_uses_snapshot_date() {
        let rec = record(&[("ZIP_Code", "77008"), ("Total_Sales", "118")]);
        let row = RowContext {
            record: &rec,
            file_name: "houston_zip_code_breakdown_q4_2024.csv",
            source: "houston_zip_code_breakdown_q4_2024.csv",
            row: 1,
        };
        let snapshot = NaiveDate::from_ymd_opt(2024, 10, 1).unwrap();
        let intel = map_mls_realtime(&row, snapshot).unwrap();
        assert_eq!(intel.data_date, snapshot);
        assert_eq!(intel.zip_code, "77008");
        assert_eq!(intel.metadata["totalSales"], json!(118));
    }

    #[test]
    fn test_quality_of_life_defaults() {
        let rec = record(&[("Neighborhood", "Montrose"), ("Walk_Score", "88")]);
        let row = RowContext {
            record: &rec,
            file_name: "houston_walkability_scores.csv",
            source: "houston_walkability_scores.csv",
            row: 1,
        };
        let qol = map_quality_of_life(&row, jan_first()).unwrap();
        assert_eq!(qol.zip_code, "77001");
        assert_eq!(qol.walk_score, 88.0);
        assert_eq!(qol.safety_score, 70.0);
        assert_eq!(qol.transit_score, 40.0);
        assert_eq!(qol.bike_score, 30.0);
    }
}
