//! Builders for CSV fixtures and the list of every file a complete source
//! tree contains.

#![allow(dead_code)]

use realty_import::ImportGroup;

/// Builds CSV text row by row. Cells containing commas or quotes are quoted.
pub struct CsvBuilder {
    lines: Vec<String>,
}

impl CsvBuilder {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            lines: vec![join(headers)],
        }
    }

    pub fn row(mut self, cells: &[&str]) -> Self {
        self.lines.push(join(cells));
        self
    }

    pub fn build(self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }
}

fn join(cells: &[&str]) -> String {
    cells
        .iter()
        .map(|cell| {
            if cell.contains(',') || cell.contains('"') {
                format!("\"{}\"", cell.replace('"', "\"\""))
            } else {
                cell.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// One file of a source tree: group, path relative to the group directory,
/// and a minimal valid body.
pub struct Fixture {
    pub group: ImportGroup,
    pub path: String,
    pub body: String,
}

fn fixture(group: ImportGroup, path: &str, body: String) -> Fixture {
    Fixture {
        group,
        path: path.to_string(),
        body,
    }
}

const DP12_FILES: &[(&str, &[&str], &[&str])] = &[
    (
        "Houston Development Market_ Competitive Analysis/houston_developers_2024.csv",
        &["Developer", "Type", "January 2025 Permits", "Average Home Value ($)"],
        &["Acme Corp", "Homebuilder", "42", "375000"],
    ),
    (
        "Houston Development Market_ Competitive Analysis/houston_major_projects_2024.csv",
        &["Project Name", "Developer", "Investment"],
        &["East River", "Midway", "$1.5M"],
    ),
    (
        "Houston Development Market_ Competitive Analysis/houston_market_statistics_2024.csv",
        &["Metric", "Value"],
        &["Median Price", "$335,000"],
    ),
    (
        "Houston Development Market_ Competitive Analysis/houston_commercial_sectors_2024.csv",
        &["Sector", "Vacancy Rate"],
        &["Office", "8%"],
    ),
    (
        "Houston Development Market_ Competitive Analysis/houston_competitive_analysis_2024.csv",
        &["Metric", "Houston", "Dallas"],
        &["Job Growth", "3.1%", "2.8%"],
    ),
    (
        "Houston Development Market_ Competitive Analysis/houston_land_acquisition_strategies_2024.csv",
        &["Developer", "Strategy", "Price Per Acre"],
        &["Acme Corp", "Suburban", "$85,000"],
    ),
    (
        "Houston Development Market_ Competitive Analysis/houston_residential_activity_by_area_2024.csv",
        &["Area", "New Starts", "Closings"],
        &["Katy", "1200", "1100"],
    ),
    (
        "Real-Time Houston Development Pipeline Research/houston_construction_permits.csv",
        &["Permit Number", "Type", "Value", "Issue Date"],
        &["P-1001", "New Construction", "$450,000", "2024-03-15"],
    ),
    (
        "Real-Time Houston Development Pipeline Research/houston_infrastructure_projects.csv",
        &["Project Name", "Budget"],
        &["I-45 Rebuild", "$7B"],
    ),
    (
        "Real-Time Houston Development Pipeline Research/houston_zoning_changes.csv",
        &["Area", "Approval Date"],
        &["Midtown", "2024-05-01"],
    ),
    (
        "Economic and Demographic Intelligence _Houston population growth projections by/houston_job_growth_by_sector.csv",
        &["Sector", "2024 Jobs"],
        &["Energy", "12,400"],
    ),
    (
        "Economic and Demographic Intelligence _Houston population growth projections by/houston_population_growth_by_area.csv",
        &["Area", "2024 Population"],
        &["Katy", "350,000"],
    ),
    (
        "Environmental and Risk Intelligence/harris_county_environmental_programs.csv",
        &["Program", "Funding"],
        &["Flood Buyouts", "$2.5M"],
    ),
    (
        "Technology and Innovation District Intelligence _Houston innovation distri/houston_tech_metrics.csv",
        &["Metric", "Value"],
        &["Startups", "420"],
    ),
    (
        "How do lending rate trends impact commercial real estate projects in Harris County/harris_county_cre_lending_impacts.csv",
        &["Lender Type", "Rate"],
        &["Bank", "7.25%"],
    ),
    (
        "Neighborhood-Level Market Intelligence /houston_market_intelligence_2024.csv",
        &["Neighborhood", "ZIP Code", "Median Price"],
        &["Heights", "77008", "$615,000"],
    ),
];

const DP3_FILES: &[&str] = &[
    "Competitive Intelligence_ Texas Real Estate Market/houston_development_platforms.csv",
    "Competitive Intelligence_ Texas Real Estate Market/texas_county_comparison_2024.csv",
    "Competitive Intelligence_ Texas Real Estate Market/texas_investment_metrics_2024.csv",
    "Harris County Texas Construction Activity Report_/harris_construction_2024.csv",
    "Houston Micro-Market Intelligence Report 2024/micro_market_construction.csv",
    "Harris County Real Estate Financial Performance An/harris_county_real_estate_performance_2024.csv",
    "Harris County Texas and Houston Metro Area Cost An/construction_costs_2024.csv",
    "Harris County Texas and Houston Metro Area Cost An/labor_rates_2024.csv",
    "Harris County Texas and Houston Metro Area Cost An/land_prices_2024.csv",
    "Harris County Texas and Houston Metro Area Cost An/permit_fees_2024.csv",
    "Houston Micro-Market Intelligence Report 2024/houston_micro_market_intelligence.csv",
    "Houston Micro-Market Intelligence Report 2024/houston_gentrification_indicators.csv",
    "Houston Micro-Market Intelligence Report 2024/houston_isd_ratings.csv",
    "Houston Micro-Market Intelligence Report 2024/school_district_property_impact.csv",
    "Houston Micro-Market Intelligence Report 2024/houston_property_values.csv",
    "Investment Sentiment and International Capital Flo/houston_institutional_investor_activity.csv",
    "Investment Sentiment and International Capital Flo/houston_international_investment.csv",
    "Investment Sentiment and International Capital Flo/houston_market_outlook_2024.csv",
    "MLS-Real-Time/harris_county_real_estate_market_data_q4_2024.csv",
    "MLS-Real-Time/houston_zip_code_breakdown_q4_2024.csv",
    "Major Infrastructure and Climate Resilience Invest/harris_county_major_projects.csv",
    "Quality of Life Metrics_ Houston and Harris County/houston_walkability_scores.csv",
];

/// Every file the default configuration looks for, one data row each.
pub fn full_source_tree() -> Vec<Fixture> {
    let mut files = Vec::new();

    for (path, headers, row) in DP12_FILES {
        files.push(fixture(
            ImportGroup::DataProcess12,
            path,
            CsvBuilder::new(headers).row(row).build(),
        ));
    }

    for path in DP3_FILES {
        files.push(fixture(
            ImportGroup::DataProcess3,
            path,
            CsvBuilder::new(&["ZIP_Code", "Neighborhood", "Area"])
                .row(&["77008", "Heights", "Inner Loop"])
                .build(),
        ));
    }

    for mapping in realty_import::ImportConfig::default().har_reports {
        files.push(fixture(
            ImportGroup::HarMls,
            &format!("{}/market_summary.csv", mapping.folder),
            har_summary("8,412", "$412,500"),
        ));
    }

    files
}

/// A one-row HAR summary file.
pub fn har_summary(sales: &str, avg_price: &str) -> String {
    CsvBuilder::new(&["Total_Sales", "Avg_Sale_Price", "Median_Sale_Price", "Days_On_Market"])
        .row(&[sales, avg_price, "$335,000", "38"])
        .build()
}
