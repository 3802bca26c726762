//! Console summary of a finished run.

use std::fmt::Write;

use crate::pipeline::{RunReport, Verification};

const RULE: &str = "============================================================";
const MAX_ERRORS_SHOWN: usize = 3;

/// Renders the end-of-run summary printed by the CLI.
pub fn render_summary(report: &RunReport) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_summary(&mut out, report);
    out
}

fn write_summary(out: &mut String, report: &RunReport) -> std::fmt::Result {
    let summary = &report.summary;

    writeln!(out, "{}", RULE)?;
    writeln!(out, "IMPORT SUMMARY")?;
    writeln!(out, "{}", RULE)?;
    writeln!(out, "Run:              {}", report.run_id)?;
    writeln!(out, "Type:             {}", report.import_type)?;
    writeln!(out, "Status:           {}", summary.status.as_str())?;
    writeln!(out, "Total records:    {}", summary.total)?;
    writeln!(out, "Imported:         {}", summary.imported)?;
    writeln!(out, "Failed:           {}", summary.failed)?;
    writeln!(out, "Success rate:     {}", format_rate(summary.success_rate))?;
    writeln!(out, "Duration:         {:.2}s", summary.duration_secs)?;
    if !report.audit_logged {
        writeln!(out, "Audit record:     NOT WRITTEN (see log)")?;
    }

    for group in &report.groups {
        writeln!(out)?;
        writeln!(
            out,
            "{} ({} imported, {} failed)",
            group.group.display_name(),
            group.imported(),
            group.failed()
        )?;
        for category in &group.categories {
            let result = &category.result;
            writeln!(
                out,
                "  {:<32} {:>6} imported {:>6} failed",
                category.label, result.imported, result.failed
            )?;
            for error in result.errors.iter().take(MAX_ERRORS_SHOWN) {
                writeln!(out, "      - {}", error)?;
            }
            if result.errors.len() > MAX_ERRORS_SHOWN {
                writeln!(
                    out,
                    "      ... and {} more",
                    result.errors.len() - MAX_ERRORS_SHOWN
                )?;
            }
        }
    }

    if let Some(verification) = &report.verification {
        write_verification(out, verification)?;
    }

    writeln!(out, "{}", RULE)
}

fn write_verification(out: &mut String, verification: &Verification) -> std::fmt::Result {
    writeln!(out)?;
    writeln!(out, "{}", RULE)?;
    writeln!(out, "VERIFICATION")?;
    writeln!(out, "{}", RULE)?;

    writeln!(out, "HAR MLS reports for {}:", verification.report_year)?;
    if verification.periods.is_empty() {
        writeln!(out, "  (none)")?;
    }
    for period in &verification.periods {
        writeln!(
            out,
            "  {:<10} {:<9} sales {:>7}  avg price ${:>12.0}  neighborhoods {:>4}",
            period.month_name,
            period.report_type,
            period.total_sales,
            period.avg_sale_price,
            period.neighborhood_count
        )?;
    }

    writeln!(out)?;
    writeln!(out, "Table row counts:")?;
    for table in &verification.tables {
        writeln!(out, "  {:<28} {:>8}", table.table, table.rows)?;
    }
    Ok(())
}

fn format_rate(rate: Option<f64>) -> String {
    match rate {
        Some(rate) => format!("{:.1}%", rate),
        None => "n/a".to_string(),
    }
}
