//! HAR MLS monthly reports.
//!
//! Each report folder holds a summary file (the parent report row), optional
//! neighbourhood breakdowns (child rows) and optional price segment files
//! whose counts are folded into the parent. Files are processed parents
//! first so children can find the report they belong to.

use std::path::PathBuf;

use chrono::Utc;
use serde_json::json;

use crate::config::ReportMapping;
use crate::db::har_repo;
use crate::entities::{month_name, HarMlsReport, HarNeighborhood, PriceBucket, PriceSegments};
use crate::error::NormalizeError;
use crate::pipeline::{ImportContext, ImportResult};

use super::{
    file_name_of, import_file, import_rows, read_or_record, source_of, Category, RowContext,
};

/// How a report file is handled, in processing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum ReportFile {
    Summary,
    Neighborhood,
    PriceSegment,
}

impl ReportFile {
    fn classify(file_name: &str) -> Option<Self> {
        let name = file_name.to_lowercase();
        if name.contains("summary") || name.contains("metrics") {
            Some(ReportFile::Summary)
        } else if name.contains("neighborhood") || name.contains("zip_code") {
            Some(ReportFile::Neighborhood)
        } else if name.contains("price_segment") {
            Some(ReportFile::PriceSegment)
        } else {
            None
        }
    }
}

/// `"July 2025"`.
pub fn period_label(month: u32, year: i32) -> String {
    format!("{} {}", month_name(month), year)
}

/// One category per report mapping. Mappings that share a month share a key,
/// so their results merge into one entry.
pub fn categories(mappings: &[ReportMapping], year: i32) -> Vec<Category> {
    mappings
        .iter()
        .cloned()
        .map(|mapping| {
            let label = period_label(mapping.month, year);
            Category::new(label.clone(), label, move |ctx| import_report(ctx, &mapping))
        })
        .collect()
}

/// Imports one report folder.
pub fn import_report(ctx: &ImportContext<'_>, mapping: &ReportMapping) -> ImportResult {
    let mut result = ImportResult::default();

    let files = match ctx.locator.list_csv(&mapping.folder, &[]) {
        Ok(files) => files,
        Err(e) => {
            let reason = e.to_string();
            ctx.file_skipped(&mapping.folder, &reason);
            result.record_file_error(&mapping.folder, reason);
            return result;
        }
    };

    let mut routed: Vec<(ReportFile, PathBuf)> = Vec::new();
    for path in files {
        match ReportFile::classify(&file_name_of(&path)) {
            Some(kind) => routed.push((kind, path)),
            None => tracing::debug!(path = %path.display(), "Not a report file, ignoring"),
        }
    }
    routed.sort_by_key(|(kind, _)| *kind);

    let year = ctx.har_report_year();
    for (kind, path) in routed {
        match kind {
            ReportFile::Summary => {
                import_file(
                    ctx,
                    &path,
                    &|row: &RowContext<'_>| map_summary(row, mapping, year),
                    &mut result,
                );
            }
            ReportFile::Neighborhood => import_neighborhoods(ctx, mapping, year, &path, &mut result),
            ReportFile::PriceSegment => import_price_segments(ctx, mapping, year, &path, &mut result),
        }
    }

    result
}

/// Looks up the parent report of a child file, recording a dependency
/// failure for all `rows` when there is none.
fn parent_report(
    ctx: &ImportContext<'_>,
    mapping: &ReportMapping,
    year: i32,
    file_name: &str,
    rows: usize,
    result: &mut ImportResult,
) -> Option<i64> {
    let lookup = ctx.upserter.execute(|db| {
        har_repo::find_report_id(db, mapping.month, year, mapping.report_type)
    });

    let message = match lookup {
        Ok(Some(id)) => return Some(id),
        Ok(None) => format!(
            "No {} report found for {}",
            mapping.report_type.as_str(),
            period_label(mapping.month, year)
        ),
        Err(e) => format!("Report lookup failed: {}", e),
    };

    tracing::warn!(file = file_name, "{}", message);
    result.record_dependency_failure(file_name, rows as u64, message);
    None
}

fn import_neighborhoods(
    ctx: &ImportContext<'_>,
    mapping: &ReportMapping,
    year: i32,
    path: &std::path::Path,
    result: &mut ImportResult,
) {
    let Some(records) = read_or_record(ctx, path, result) else {
        return;
    };
    let file_name = file_name_of(path);

    let Some(report_id) = parent_report(ctx, mapping, year, &file_name, records.len(), result)
    else {
        return;
    };

    let source = source_of(ctx, path);
    let file_result = import_rows(ctx, &file_name, &source, &records, &|row: &RowContext<'_>| {
        map_neighborhood(row, report_id)
    });
    result.absorb_file(&file_name, file_result);
}

fn import_price_segments(
    ctx: &ImportContext<'_>,
    mapping: &ReportMapping,
    year: i32,
    path: &std::path::Path,
    result: &mut ImportResult,
) {
    let Some(records) = read_or_record(ctx, path, result) else {
        return;
    };
    let file_name = file_name_of(path);

    let Some(report_id) = parent_report(ctx, mapping, year, &file_name, records.len(), result)
    else {
        return;
    };

    let source = source_of(ctx, path);
    let mut segments = PriceSegments::default();
    let mut file_result = ImportResult::default();
    for (i, record) in records.iter().enumerate() {
        let row = RowContext {
            record,
            file_name: &file_name,
            source: &source,
            row: i + 1,
        };
        match segment_row(&row) {
            Ok((bucket, count)) => {
                segments.add(bucket, count);
                file_result.record_success();
            }
            Err(e) => file_result.record_failure(format!("{} row {}: {}", file_name, row.row, e)),
        }
    }

    match ctx
        .upserter
        .execute(|db| har_repo::update_price_segments(db, report_id, &segments))
    {
        Ok(true) => {}
        Ok(false) => mark_unsaved(&mut file_result, "report disappeared before update".to_string()),
        Err(e) => mark_unsaved(&mut file_result, e.to_string()),
    }

    tracing::debug!(
        file = %file_name,
        total = segments.total(),
        "Price segments merged into report {}",
        report_id
    );
    result.absorb_file(&file_name, file_result);
}

/// Rows that aggregated fine still count as failed when the merged counts
/// could not be stored.
fn mark_unsaved(file_result: &mut ImportResult, reason: String) {
    file_result.failed += file_result.imported;
    file_result.imported = 0;
    file_result
        .errors
        .push(format!("Failed to update price segments: {}", reason));
}

fn segment_row(row: &RowContext<'_>) -> Result<(PriceBucket, i64), NormalizeError> {
    let label = row.require(&["Price_Range", "Price_Segment", "Segment"])?;
    let bucket = PriceBucket::classify(&label).ok_or_else(|| NormalizeError::UnrecognizedValue {
        field: "Price_Range".to_string(),
        value: label.clone(),
    })?;
    Ok((bucket, row.count(&["Count", "Sales", "Total"])))
}

fn map_summary(
    row: &RowContext<'_>,
    mapping: &ReportMapping,
    year: i32,
) -> Result<HarMlsReport, NormalizeError> {
    Ok(HarMlsReport {
        month: mapping.month,
        year,
        report_type: mapping.report_type,
        total_sales: row.count(&["Total_Sales", "Sales", "Closed_Sales"]),
        total_volume: row.currency(&["Total_Volume", "Sales_Volume"]),
        avg_sale_price: row.currency(&["Avg_Sale_Price", "Average_Price", "Avg_Price"]),
        median_sale_price: row.currency(&["Median_Sale_Price", "Median_Price"]),
        price_per_sqft: row.currency(&["Price_Per_Sqft", "Price_Per_SF"]),
        sales_change_yoy: row.percentage(&["Sales_Change_YoY", "Sales_YoY"]),
        price_change_yoy: row.percentage(&["Price_Change_YoY", "Price_YoY"]),
        volume_change_yoy: row.percentage(&["Volume_Change_YoY", "Volume_YoY"]),
        active_listings: row.count(&["Active_Listings", "Active", "For_Sale"]),
        new_listings: row.count(&["New_Listings", "New"]),
        pending_sales: row.count(&["Pending_Sales", "Pending", "Under_Contract"]),
        months_inventory: row.number(&["Months_Inventory", "Months_Supply", "Inventory"]),
        avg_days_on_market: row.count(&["Days_On_Market", "DOM", "Avg_DOM"]),
        segments: PriceSegments {
            under_200k: row.count(&["Under_200k", "<$200k"]),
            from_200k_to_400k: row.count(&["From_200k_400k", "$200k-$400k"]),
            from_400k_to_600k: row.count(&["From_400k_600k", "$400k-$600k"]),
            from_600k_to_800k: row.count(&["From_600k_800k", "$600k-$800k"]),
            from_800k_to_1m: row.count(&["From_800k_1M", "$800k-$1M"]),
            over_1m: row.count(&["Over_1M", ">$1M"]),
        },
        single_family: row.count(&["Single_Family", "SF"]),
        townhouse: row.count(&["Townhouse", "TH"]),
        condo: row.count(&["Condo", "Condominium"]),
        metadata: row.metadata(&[("import_date", json!(Utc::now().to_rfc3339()))]),
    })
}

fn map_neighborhood(row: &RowContext<'_>, report_id: i64) -> Result<HarNeighborhood, NormalizeError> {
    Ok(HarNeighborhood {
        report_id,
        neighborhood: row.text(&["Neighborhood", "Area", "Submarket"], "Unknown"),
        zip_code: row.get(&["ZIP_Code", "Zip", "zipCode"]).map(str::to_string),
        total_sales: row.count(&["Total_Sales", "Sales", "Closed_Sales"]),
        avg_sale_price: row.currency(&["Avg_Sale_Price", "Average_Price", "Avg_Price"]),
        median_sale_price: row.currency(&["Median_Sale_Price", "Median_Price"]),
        price_per_sqft: row.currency(&["Price_Per_Sqft", "Price_Per_SF"]),
        active_listings: row.count(&["Active_Listings", "Active", "For_Sale"]),
        months_inventory: row.number(&["Months_Inventory", "Months_Supply", "Inventory"]),
        avg_days_on_market: row.count(&["Days_On_Market", "DOM", "Avg_DOM"]),
        list_to_sale_ratio: row.percentage(&["List_To_Sale_Ratio", "SP_LP_Ratio"]),
        seller_concessions: row.percentage(&["Seller_Concessions", "Concessions"]),
        metadata: row.metadata(&[("import_date", json!(Utc::now().to_rfc3339()))]),
    })
}
