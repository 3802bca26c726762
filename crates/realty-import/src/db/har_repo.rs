//! HAR MLS report queries: parent lookup, price segment merge and the
//! per-period import status used by the verification report.

use chrono::Utc;
use rusqlite::{params, OptionalExtension};
use serde::Serialize;

use super::{Database, DatabaseError};
use crate::config::ReportType;
use crate::entities::{month_name, PriceSegments};

/// Id of the report for `(month, year, report_type)`, if imported.
pub fn find_report_id(
    db: &Database,
    month: u32,
    year: i32,
    report_type: ReportType,
) -> Result<Option<i64>, DatabaseError> {
    db.with_conn(|conn| {
        let id = conn
            .query_row(
                "SELECT id FROM har_mls_reports WHERE month = ?1 AND year = ?2 AND report_type = ?3",
                params![month, year, report_type.as_str()],
                |r| r.get(0),
            )
            .optional()?;
        Ok(id)
    })
}

/// Overwrites the price band counts of an existing report.
/// Returns `false` when no report has that id.
pub fn update_price_segments(
    db: &Database,
    report_id: i64,
    segments: &PriceSegments,
) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let changed = conn.execute(
            "UPDATE har_mls_reports SET
               under_200k = ?1,
               from_200k_to_400k = ?2,
               from_400k_to_600k = ?3,
               from_600k_to_800k = ?4,
               from_800k_to_1m = ?5,
               over_1m = ?6,
               updated_at = ?7
             WHERE id = ?8",
            params![
                segments.under_200k,
                segments.from_200k_to_400k,
                segments.from_400k_to_600k,
                segments.from_600k_to_800k,
                segments.from_800k_to_1m,
                segments.over_1m,
                Utc::now().to_rfc3339(),
                report_id,
            ],
        )?;
        Ok(changed > 0)
    })
}

/// One imported report period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodStatus {
    pub month: u32,
    pub month_name: String,
    pub report_type: String,
    pub total_sales: i64,
    pub avg_sale_price: f64,
    pub neighborhood_count: i64,
    pub imported_at: String,
}

/// Every report of `year`, ordered by month then report type.
pub fn import_status(db: &Database, year: i32) -> Result<Vec<PeriodStatus>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT r.month, r.report_type, r.total_sales, r.avg_sale_price, r.created_at,
                    COUNT(n.id) AS neighborhoods
             FROM har_mls_reports r
             LEFT JOIN har_neighborhood_data n ON n.report_id = r.id
             WHERE r.year = ?1
             GROUP BY r.id
             ORDER BY r.month ASC, r.report_type ASC",
        )?;

        let rows = stmt
            .query_map(params![year], |row| {
                let month: u32 = row.get(0)?;
                Ok(PeriodStatus {
                    month,
                    month_name: month_name(month).to_string(),
                    report_type: row.get(1)?,
                    total_sales: row.get(2)?,
                    avg_sale_price: row.get(3)?,
                    imported_at: row.get(4)?,
                    neighborhood_count: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    })
}
