//! Data Process 1-2: developer, project, market, permit, economic and
//! neighbourhood reports, one fixed CSV per category.

use chrono::NaiveDate;

use crate::entities::*;
use crate::error::NormalizeError;
use crate::normalize::parse_date_or_default;
use crate::pipeline::{ImportContext, ImportResult};
use crate::source::SourceSpec;

use super::{import_sources, Category, RowContext};

const DEVELOPERS: &str =
    "Houston Development Market_ Competitive Analysis/houston_developers_2024.csv";
const MAJOR_PROJECTS: &str =
    "Houston Development Market_ Competitive Analysis/houston_major_projects_2024.csv";
const MARKET_STATISTICS: &str =
    "Houston Development Market_ Competitive Analysis/houston_market_statistics_2024.csv";
const COMMERCIAL_SECTORS: &str =
    "Houston Development Market_ Competitive Analysis/houston_commercial_sectors_2024.csv";
const COMPETITIVE_ANALYSIS: &str =
    "Houston Development Market_ Competitive Analysis/houston_competitive_analysis_2024.csv";
const LAND_ACQUISITION: &str =
    "Houston Development Market_ Competitive Analysis/houston_land_acquisition_strategies_2024.csv";
const RESIDENTIAL_ACTIVITY: &str =
    "Houston Development Market_ Competitive Analysis/houston_residential_activity_by_area_2024.csv";
const PERMITS: &str =
    "Real-Time Houston Development Pipeline Research/houston_construction_permits.csv";
const INFRASTRUCTURE: &str =
    "Real-Time Houston Development Pipeline Research/houston_infrastructure_projects.csv";
const ZONING: &str = "Real-Time Houston Development Pipeline Research/houston_zoning_changes.csv";
const JOB_GROWTH: &str = "Economic and Demographic Intelligence _Houston population growth projections by/houston_job_growth_by_sector.csv";
const POPULATION_GROWTH: &str = "Economic and Demographic Intelligence _Houston population growth projections by/houston_population_growth_by_area.csv";
const ENVIRONMENTAL: &str =
    "Environmental and Risk Intelligence/harris_county_environmental_programs.csv";
const TECH_METRICS: &str = "Technology and Innovation District Intelligence _Houston innovation distri/houston_tech_metrics.csv";
const FINANCING: &str = "How do lending rate trends impact commercial real estate projects in Harris County/harris_county_cre_lending_impacts.csv";
const NEIGHBORHOODS: &str =
    "Neighborhood-Level Market Intelligence /houston_market_intelligence_2024.csv";

/// The sixteen categories, in run order.
pub fn categories() -> Vec<Category> {
    vec![
        Category::new("developers", "Developers", |ctx| {
            import_one(ctx, DEVELOPERS, map_developer)
        }),
        Category::new("major-projects", "Major Projects", |ctx| {
            import_one(ctx, MAJOR_PROJECTS, map_project)
        }),
        Category::new("market-statistics", "Market Statistics", |ctx| {
            let year = ctx.market_year();
            import_one(ctx, MARKET_STATISTICS, |row| map_market_stat(row, year))
        }),
        Category::new("commercial-sectors", "Commercial Sectors", |ctx| {
            let year = ctx.market_year();
            import_one(ctx, COMMERCIAL_SECTORS, |row| map_commercial_sector(row, year))
        }),
        Category::new("competitive-analysis", "Competitive Analysis", |ctx| {
            let year = ctx.market_year();
            import_one(ctx, COMPETITIVE_ANALYSIS, |row| {
                map_competitive_analysis(row, year)
            })
        }),
        Category::new("land-acquisition", "Land Acquisition Strategies", |ctx| {
            let year = ctx.market_year();
            import_one(ctx, LAND_ACQUISITION, |row| map_land_acquisition(row, year))
        }),
        Category::new("residential-activity", "Residential Activity", |ctx| {
            let year = ctx.market_year();
            import_one(ctx, RESIDENTIAL_ACTIVITY, |row| {
                map_residential_activity(row, year)
            })
        }),
        Category::new("construction-permits", "Construction Permits", |ctx| {
            let default_date = ctx.market_year_start();
            import_one(ctx, PERMITS, |row| map_permit(row, default_date))
        }),
        Category::new("infrastructure-projects", "Infrastructure Projects", |ctx| {
            import_one(ctx, INFRASTRUCTURE, map_infrastructure)
        }),
        Category::new("zoning-changes", "Zoning Changes", |ctx| {
            let default_date = ctx.market_year_start();
            import_one(ctx, ZONING, |row| map_zoning_change(row, default_date))
        }),
        Category::new("economic-data", "Economic Data", |ctx| {
            let year = ctx.market_year();
            import_one(ctx, JOB_GROWTH, |row| map_job_growth(row, year))
        }),
        Category::new("population-growth", "Population Growth", |ctx| {
            import_one(ctx, POPULATION_GROWTH, map_population)
        }),
        Category::new("environmental-data", "Environmental Data", |ctx| {
            let year = ctx.market_year();
            import_one(ctx, ENVIRONMENTAL, |row| map_environmental(row, year))
        }),
        Category::new("technology-innovation", "Technology Innovation", |ctx| {
            let year = ctx.market_year();
            import_one(ctx, TECH_METRICS, |row| map_tech_metric(row, year))
        }),
        Category::new("financing-data", "Financing Data", |ctx| {
            let default_date = ctx.market_year_start();
            import_one(ctx, FINANCING, |row| map_financing(row, default_date))
        }),
        Category::new("neighborhood-intelligence", "Neighborhood Intelligence", |ctx| {
            let year = ctx.market_year();
            import_one(ctx, NEIGHBORHOODS, |row| map_neighborhood(row, year))
        }),
    ]
}

fn import_one<E, F>(ctx: &ImportContext<'_>, file: &'static str, map: F) -> ImportResult
where
    E: Entity,
    F: Fn(&RowContext<'_>) -> Result<E, NormalizeError>,
{
    import_sources(ctx, &[SourceSpec::File(file)], map)
}

/// A `Year` column when present and positive, otherwise the report year.
fn year_or(row: &RowContext<'_>, default: i32) -> i32 {
    match row.count(&["Year"]) {
        y if y > 0 => i32::try_from(y).unwrap_or(default),
        _ => default,
    }
}

fn map_developer(row: &RowContext<'_>) -> Result<Developer, NormalizeError> {
    Ok(Developer {
        name: row.require(&["Developer"])?,
        developer_type: row.text(&["Type"], ""),
        monthly_permits: row.count(&["January 2025 Permits"]),
        avg_home_value: row.currency(&["Average Home Value ($)"]),
        major_projects: row.text(&["Major Projects 2024"], ""),
        metadata: row.metadata(&[]),
    })
}

fn map_project(row: &RowContext<'_>) -> Result<Project, NormalizeError> {
    Ok(Project {
        name: row.require(&["Project Name"])?,
        developer_name: row.text(&["Developer"], ""),
        project_type: row.text(&["Type"], ""),
        investment_value: row.currency(&["Investment"]),
        status: row.text(&["Status"], ""),
        metadata: row.metadata(&[]),
    })
}

fn map_market_stat(row: &RowContext<'_>, year: i32) -> Result<MarketStat, NormalizeError> {
    Ok(MarketStat {
        metric: row.text(&["Metric"], "Unknown"),
        value: row.text(&["Value"], ""),
        category: row.text(&["Category"], "General"),
        year,
        metadata: row.metadata(&[]),
    })
}

fn map_commercial_sector(
    row: &RowContext<'_>,
    year: i32,
) -> Result<CommercialSector, NormalizeError> {
    Ok(CommercialSector {
        sector: row.text(&["Sector"], "Unknown"),
        sqft_under_construction: row.count(&["Sq Ft Under Construction"]),
        vacancy_rate: row.percentage(&["Vacancy Rate"]),
        avg_rent_psf: row.currency(&["Avg Rent PSF"]),
        net_absorption: row.count(&["Net Absorption"]),
        year,
        metadata: row.metadata(&[]),
    })
}

fn map_competitive_analysis(
    row: &RowContext<'_>,
    year: i32,
) -> Result<CompetitiveAnalysis, NormalizeError> {
    Ok(CompetitiveAnalysis {
        metric: row.text(&["Metric"], "Unknown"),
        houston: row.text(&["Houston"], ""),
        dallas: row.text(&["Dallas"], ""),
        austin: row.text(&["Austin"], ""),
        san_antonio: row.text(&["San Antonio"], ""),
        advantage: row.text(&["Advantage"], ""),
        year,
        metadata: row.metadata(&[]),
    })
}

fn map_land_acquisition(
    row: &RowContext<'_>,
    year: i32,
) -> Result<LandAcquisition, NormalizeError> {
    Ok(LandAcquisition {
        developer: row.text(&["Developer"], "Unknown"),
        strategy: row.text(&["Strategy"], ""),
        target_areas: row.text(&["Target Areas"], ""),
        avg_acreage: row.number(&["Avg Acreage"]),
        price_per_acre: row.currency(&["Price Per Acre"]),
        total_investment: row.currency(&["Total Investment"]),
        year,
        metadata: row.metadata(&[]),
    })
}

fn map_residential_activity(
    row: &RowContext<'_>,
    year: i32,
) -> Result<ResidentialActivity, NormalizeError> {
    Ok(ResidentialActivity {
        area: row.text(&["Area"], "Unknown"),
        new_starts: row.count(&["New Starts"]),
        closings: row.count(&["Closings"]),
        avg_price: row.currency(&["Avg Price"]),
        inventory: row.count(&["Inventory"]),
        absorption_rate: row.percentage(&["Absorption Rate"]),
        top_builder: row.text(&["Top Builder"], ""),
        year,
        quarter: "Q4".to_string(),
        metadata: row.metadata(&[]),
    })
}

fn map_permit(row: &RowContext<'_>, default_date: NaiveDate) -> Result<Permit, NormalizeError> {
    let permit_number = row
        .get(&["Permit Number"])
        .map(str::to_string)
        .unwrap_or_else(|| row.synthetic_key("AUTO"));

    Ok(Permit {
        permit_number,
        permit_type: row.text(&["Type"], "Unknown"),
        address: row.text(&["Address"], ""),
        zip_code: row.text(&["ZIP Code"], ""),
        value: row.currency(&["Value"]),
        issue_date: parse_date_or_default("Issue Date", row.get(&["Issue Date"]), default_date)?,
        status: row.text(&["Status"], "Unknown"),
        contractor: row.text(&["Contractor"], ""),
        owner: row.text(&["Owner"], ""),
        metadata: row.metadata(&[]),
    })
}

fn map_infrastructure(row: &RowContext<'_>) -> Result<InfrastructureProject, NormalizeError> {
    Ok(InfrastructureProject {
        name: row.text(&["Project Name"], "Unknown"),
        project_type: row.text(&["Type"], "Infrastructure"),
        agency: row.text(&["Agency"], ""),
        budget: row.currency(&["Budget"]),
        timeline: row.text(&["Timeline"], ""),
        status: row.text(&["Status"], "Planning"),
        impact: row.text(&["Impact"], ""),
        metadata: row.metadata(&[]),
    })
}

fn map_zoning_change(
    row: &RowContext<'_>,
    default_date: NaiveDate,
) -> Result<ZoningChange, NormalizeError> {
    Ok(ZoningChange {
        area: row.text(&["Area"], "Unknown"),
        previous_zoning: row.text(&["Previous Zoning"], ""),
        new_zoning: row.text(&["New Zoning"], ""),
        acreage: row.number(&["Acreage"]),
        approval_date: parse_date_or_default(
            "Approval Date",
            row.get(&["Approval Date"]),
            default_date,
        )?,
        impact: row.text(&["Impact"], ""),
        developer: row.text(&["Developer"], ""),
        metadata: row.metadata(&[]),
    })
}

fn map_job_growth(row: &RowContext<'_>, year: i32) -> Result<EconomicIndicator, NormalizeError> {
    Ok(EconomicIndicator {
        name: format!("Job Growth - {}", row.text(&["Sector"], "Unknown")),
        value: row.text(&["2024 Jobs"], "0"),
        unit: "jobs".to_string(),
        period: year.to_string(),
        metadata: row.metadata(&[]),
    })
}

fn map_population(row: &RowContext<'_>) -> Result<Demographics, NormalizeError> {
    Ok(Demographics {
        area: row.text(&["Area"], "Unknown"),
        population_2024: row.count(&["2024 Population"]),
        population_2029: row.count(&["2029 Projected"]),
        growth_rate: row.percentage(&["Growth Rate"]),
        new_residents: row.count(&["New Residents"]),
        source: "Census Projections".to_string(),
        metadata: row.metadata(&[]),
    })
}

fn map_environmental(
    row: &RowContext<'_>,
    year: i32,
) -> Result<EnvironmentalProgram, NormalizeError> {
    Ok(EnvironmentalProgram {
        program: row.text(&["Program"], "Unknown"),
        category: row.text(&["Category"], "Environmental"),
        funding: row.currency(&["Funding"]),
        impact: row.text(&["Impact"], ""),
        status: row.text(&["Status"], "Active"),
        year: year_or(row, year),
        metadata: row.metadata(&[]),
    })
}

fn map_tech_metric(row: &RowContext<'_>, year: i32) -> Result<TechInnovation, NormalizeError> {
    Ok(TechInnovation {
        metric: row.text(&["Metric"], "Unknown"),
        value: row.text(&["Value"], ""),
        category: row.text(&["Category"], "Technology"),
        district: row.text(&["District"], "Houston"),
        year: year_or(row, year),
        growth: row.percentage(&["Growth"]),
        metadata: row.metadata(&[]),
    })
}

fn map_financing(
    row: &RowContext<'_>,
    default_date: NaiveDate,
) -> Result<FinancingTerm, NormalizeError> {
    Ok(FinancingTerm {
        lender_type: row.text(&["Lender Type"], "Unknown"),
        rate: row.percentage(&["Rate"]),
        ltv: row.percentage(&["LTV"]),
        property_type: row.text(&["Property Type"], ""),
        min_loan: row.currency(&["Min Loan"]),
        max_loan: row.currency(&["Max Loan"]),
        terms: row.text(&["Terms"], ""),
        effective_date: parse_date_or_default(
            "Effective Date",
            row.get(&["Effective Date", "Date"]),
            default_date,
        )?,
        metadata: row.metadata(&[]),
    })
}

fn map_neighborhood(row: &RowContext<'_>, year: i32) -> Result<NeighborhoodStat, NormalizeError> {
    Ok(NeighborhoodStat {
        neighborhood: row.text(&["Neighborhood"], "Unknown"),
        zip_code: row.text(&["ZIP Code"], ""),
        median_price: row.currency(&["Median Price"]),
        price_change: row.percentage(&["Price Change"]),
        inventory: row.count(&["Inventory"]),
        days_on_market: row.count(&["Days on Market"]),
        sales_volume: row.count(&["Sales Volume"]),
        list_to_sale_ratio: row.percentage(&["List to Sale Ratio"]),
        year,
        month: "Current".to_string(),
        metadata: row.metadata(&[]),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::CsvRecord;

    fn row_of<'a>(record: &'a CsvRecord) -> RowContext<'a> {
        RowContext {
            record,
            file_name: "test.csv",
            source: "test.csv",
            row: 4,
        }
    }

    fn record(pairs: &[(&str, &str)]) -> CsvRecord {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_categories_in_run_order() {
        let keys: Vec<String> = categories().into_iter().map(|c| c.key).collect();
        assert_eq!(keys.len(), 16);
        assert_eq!(keys[0], "developers");
        assert_eq!(keys[7], "construction-permits");
        assert_eq!(keys[11], "population-growth");
        assert_eq!(keys[15], "neighborhood-intelligence");
    }

    #[test]
    fn test_map_developer() {
        let rec = record(&[
            ("Developer", "Acme Corp"),
            ("Type", "Homebuilder"),
            ("January 2025 Permits", "42"),
            ("Average Home Value ($)", "375000"),
        ]);
        let dev = map_developer(&row_of(&rec)).unwrap();
        assert_eq!(dev.name, "Acme Corp");
        assert_eq!(dev.monthly_permits, 42);
        assert_eq!(dev.avg_home_value, 375000.0);
        assert_eq!(dev.major_projects, "");
        assert_eq!(dev.metadata["original_data"]["Type"], "Homebuilder");
    }

    #[test]
    fn test_developer_without_name_fails() {
        let rec = record(&[("Type", "Homebuilder")]);
        assert!(matches!(
            map_developer(&row_of(&rec)),
            Err(NormalizeError::MissingField { .. })
        ));
    }

    #[test]
    fn test_project_investment_suffixes() {
        let rec = record(&[("Project Name", "East River"), ("Investment", "$2.3B")]);
        let project = map_project(&row_of(&rec)).unwrap();
        assert_eq!(project.investment_value, 2_300_000_000.0);
    }

    #[test]
    fn test_commercial_sector_percent_scale() {
        let rec = record(&[
            ("Sector", "Office"),
            ("Vacancy Rate", "0.5%"),
            ("Sq Ft Under Construction", "1,250,000"),
            ("Avg Rent PSF", "$31.50"),
        ]);
        let sector = map_commercial_sector(&row_of(&rec), 2024).unwrap();
        assert_eq!(sector.vacancy_rate, 0.5);
        assert_eq!(sector.sqft_under_construction, 1_250_000);
        assert_eq!(sector.avg_rent_psf, 31.5);
        assert_eq!(sector.net_absorption, 0);
    }

    #[test]
    fn test_permit_synthetic_key_and_default_date() {
        let rec = record(&[("Type", "New Construction"), ("Value", "$450,000")]);
        let default = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let permit = map_permit(&row_of(&rec), default).unwrap();
        assert_eq!(permit.permit_number, "AUTO-test-4");
        assert_eq!(permit.issue_date, default);
        assert_eq!(permit.value, 450000.0);
    }

    #[test]
    fn test_permit_bad_date_fails_record() {
        let rec = record(&[("Permit Number", "P-1"), ("Issue Date", "someday")]);
        let default = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert!(matches!(
            map_permit(&row_of(&rec), default),
            Err(NormalizeError::InvalidDate { .. })
        ));
    }

    #[test]
    fn test_environmental_year_fallback() {
        let rec = record(&[("Program", "Flood Buyouts"), ("Year", "2023")]);
        assert_eq!(map_environmental(&row_of(&rec), 2024).unwrap().year, 2023);

        let rec = record(&[("Program", "Flood Buyouts")]);
        let program = map_environmental(&row_of(&rec), 2024).unwrap();
        assert_eq!(program.year, 2024);
        assert_eq!(program.status, "Active");
    }

    #[test]
    fn test_job_growth_naming() {
        let rec = record(&[("Sector", "Energy"), ("2024 Jobs", "12,400")]);
        let indicator = map_job_growth(&row_of(&rec), 2024).unwrap();
        assert_eq!(indicator.name, "Job Growth - Energy");
        assert_eq!(indicator.value, "12,400");
        assert_eq!(indicator.period, "2024");
    }

    #[test]
    fn test_population_counts() {
        let rec = record(&[
            ("Area", "Katy"),
            ("2024 Population", "350,000"),
            ("2029 Projected", "410,500"),
            ("Growth Rate", "17.3%"),
        ]);
        let demo = map_population(&row_of(&rec)).unwrap();
        assert_eq!(demo.population_2024, 350_000);
        assert_eq!(demo.population_2029, 410_500);
        assert_eq!(demo.growth_rate, 17.3);
        assert_eq!(demo.new_residents, 0);
    }
}
