//! End-to-end import runs over temporary source trees.

mod common;

use common::harness::category;
use common::*;
use realty_import::db::{import_log_repo, record_repo};
use realty_import::{ImportGroup, NoopProgress, RunStatus};

const DEVELOPERS: &str =
    "Houston Development Market_ Competitive Analysis/houston_developers_2024.csv";
const PERMITS: &str =
    "Real-Time Houston Development Pipeline Research/houston_construction_permits.csv";
const COMPETITIVE_DIR: &str = "Competitive Intelligence_ Texas Real Estate Market";
const CONSTRUCTION_DIRS: [&str; 2] = [
    "Harris County Texas Construction Activity Report_",
    "Houston Micro-Market Intelligence Report 2024",
];
const KEYED_TABLES: &[&str] = &[
    "developers",
    "projects",
    "permits",
    "construction_activity",
    "har_mls_reports",
];

fn developers_csv(permits: &str) -> String {
    CsvBuilder::new(&["Developer", "Type", "January 2025 Permits", "Average Home Value ($)"])
        .row(&["Acme Corp", "Homebuilder", permits, "$375,000"])
        .build()
}

#[test]
fn test_reimport_updates_existing_developer() {
    let h = TestHarness::new();

    h.write(ImportGroup::DataProcess12, DEVELOPERS, &developers_csv("42"));
    let first = h.run_group(ImportGroup::DataProcess12);
    assert_eq!(category(&first, "developers").result.imported, 1);

    h.write(ImportGroup::DataProcess12, DEVELOPERS, &developers_csv("50"));
    let second = h.run_group(ImportGroup::DataProcess12);
    assert_eq!(category(&second, "developers").result.imported, 1);

    assert_eq!(h.count("developers"), 1);
    assert_eq!(
        h.query_i64(
            "SELECT monthly_permits FROM developers WHERE name = ?1",
            "Acme Corp"
        ),
        50
    );
}

#[test]
fn test_rerun_with_synthetic_permit_keys_is_idempotent() {
    let h = TestHarness::new();
    let csv = CsvBuilder::new(&["Type", "Value", "Issue Date"])
        .row(&["New Construction", "$450,000", "2024-03-15"])
        .row(&["Remodel", "$25,000", "2024-04-02"])
        .row(&["Demolition", "$8,000", ""])
        .build();
    h.write(ImportGroup::DataProcess12, PERMITS, &csv);

    for _ in 0..2 {
        let report = h.run_group(ImportGroup::DataProcess12);
        let permits = &category(&report, "construction-permits").result;
        assert_eq!(permits.imported, 3);
        assert_eq!(permits.failed, 0);
    }

    assert_eq!(h.count("permits"), 3);
    assert_eq!(
        h.query_i64(
            "SELECT COUNT(*) FROM permits WHERE permit_number = ?1",
            "AUTO-Real_Time_Houston_Development_Pipeline_Research_houston_construction_permits-2"
        ),
        1
    );
}

#[test]
fn test_same_file_name_in_both_construction_folders_keeps_both_rows() {
    let h = TestHarness::new();
    for (i, dir) in CONSTRUCTION_DIRS.iter().enumerate() {
        let csv = CsvBuilder::new(&["Address", "Cost"])
            .row(&[&format!("{} Main St", 100 + i), "$250,000"])
            .build();
        h.write(
            ImportGroup::DataProcess3,
            &format!("{}/construction_2024.csv", dir),
            &csv,
        );
    }

    let report = h.run_group(ImportGroup::DataProcess3);
    let result = &category(&report, "construction-activity").result;

    assert_eq!(result.imported, 2);
    assert_eq!(result.failed, 0);
    assert_eq!(h.count("construction_activity"), 2);
    assert_eq!(
        h.query_i64(
            "SELECT COUNT(*) FROM construction_activity WHERE permit_number = ?1",
            "PERM-Houston_Micro_Market_Intelligence_Report_2024_construction_2024-1"
        ),
        1
    );
}

#[test]
fn test_missing_file_fails_once_and_siblings_still_import() {
    let h = TestHarness::new();
    let rows = |n: usize| {
        let mut builder = CsvBuilder::new(&["Area", "Market_Share", "Cap_Rate"]);
        for i in 0..n {
            builder = builder.row(&[&format!("Area {}", i), "12.5", "6.1%"]);
        }
        builder.build()
    };
    h.write(
        ImportGroup::DataProcess3,
        &format!("{}/houston_development_platforms.csv", COMPETITIVE_DIR),
        &rows(2),
    );
    h.write(
        ImportGroup::DataProcess3,
        &format!("{}/texas_investment_metrics_2024.csv", COMPETITIVE_DIR),
        &rows(3),
    );

    let report = h.run_group(ImportGroup::DataProcess3);
    let result = &category(&report, "competitive-intelligence").result;

    assert_eq!(result.imported, 5);
    assert_eq!(result.failed, 1);
    assert_eq!(result.files.len(), 3);
    let missing = result
        .files
        .iter()
        .find(|f| f.file.contains("texas_county_comparison_2024"))
        .expect("missing file has an outcome");
    assert_eq!(missing.failed, 1);
    assert!(missing.error.is_some());
    assert_eq!(h.count("market_intelligence"), 5);
}

#[test]
fn test_bad_date_fails_only_its_row() {
    let h = TestHarness::new();
    let mut builder = CsvBuilder::new(&["Permit Number", "Type", "Issue Date"]);
    for i in 1..=10 {
        let date = if i == 4 { "not-a-date" } else { "2024-06-01" };
        builder = builder.row(&[&format!("P-{}", i), "New Construction", date]);
    }
    h.write(ImportGroup::DataProcess12, PERMITS, &builder.build());

    let report = h.run_group(ImportGroup::DataProcess12);
    let permits = &category(&report, "construction-permits").result;

    assert_eq!(permits.imported, 9);
    assert_eq!(permits.failed, 1);
    assert_eq!(permits.errors.len(), 1);
    assert!(permits.errors[0].contains("houston_construction_permits.csv"));
    assert!(permits.errors[0].contains("not-a-date"));
    assert_eq!(h.count("permits"), 9);
}

#[test]
fn test_required_name_missing_fails_row() {
    let h = TestHarness::new();
    let csv = CsvBuilder::new(&["Developer", "Type"])
        .row(&["Acme Corp", "Homebuilder"])
        .row(&["", "Commercial"])
        .build();
    h.write(ImportGroup::DataProcess12, DEVELOPERS, &csv);

    let report = h.run_group(ImportGroup::DataProcess12);
    let developers = &category(&report, "developers").result;
    assert_eq!(developers.imported, 1);
    assert_eq!(developers.failed, 1);
    assert!(developers.errors[0].contains("Developer"));
}

#[test]
fn test_complete_tree_runs_clean() {
    let h = TestHarness::new();
    h.populate_all();

    let report = h.run_all();

    let failures: Vec<&String> = report
        .groups
        .iter()
        .flat_map(|g| g.categories.iter())
        .flat_map(|c| c.result.errors.iter())
        .collect();
    assert!(failures.is_empty(), "unexpected failures: {:?}", failures);
    assert_eq!(report.summary.status, RunStatus::Completed);
    assert_eq!(report.summary.success_rate, Some(100.0));
    assert!(report.audit_logged);

    assert_eq!(h.count("developers"), 1);
    assert_eq!(h.count("cost_analysis"), 4);
    // Two July folders and both June reports each collapse to one key.
    assert_eq!(h.count("har_mls_reports"), 8);

    let verification = report.verification.expect("verification runs");
    assert_eq!(verification.periods.len(), 8);

    let audit = import_log_repo::latest(&h.db).unwrap().unwrap();
    assert_eq!(audit.id, report.run_id);
    assert_eq!(audit.status, "completed");
}

#[test]
fn test_full_rerun_upserts_keyed_tables_and_appends_the_rest() {
    let h = TestHarness::new();
    h.populate_all();
    let folder = h.config.har_reports[0].folder.clone();
    h.write(
        ImportGroup::HarMls,
        &format!("{}/neighborhood_data.csv", folder),
        &CsvBuilder::new(&["Neighborhood", "Total_Sales"])
            .row(&["Heights", "112"])
            .build(),
    );

    let first_run = h.run_all();
    assert_eq!(first_run.summary.status, RunStatus::Completed);
    let first = record_repo::table_counts(&h.db).unwrap();

    let second_run = h.run_all();
    assert_eq!(second_run.summary.status, RunStatus::Completed);
    assert_eq!(second_run.summary.imported, first_run.summary.imported);
    let second = record_repo::table_counts(&h.db).unwrap();

    for ((table, before), (_, after)) in first.iter().zip(second.iter()) {
        if KEYED_TABLES.contains(&table.as_str()) {
            assert_eq!(after, before, "{} should upsert on rerun", table);
        } else {
            assert_eq!(*after, before * 2, "{} should append on rerun", table);
        }
    }

    assert_eq!(h.count("developers"), 1);
    assert_eq!(h.count("construction_activity"), 3);
    assert_eq!(h.count("har_mls_reports"), 8);
    assert_eq!(h.count("market_stats"), 2);
    assert_eq!(h.count("har_neighborhood_data"), 2);
    assert_eq!(import_log_repo::count(&h.db).unwrap(), 2);
}

#[test]
fn test_one_missing_file_marks_run_with_errors() {
    let h = TestHarness::new();
    h.populate_all();
    h.remove(ImportGroup::DataProcess12, DEVELOPERS);

    let report = h.run_all();

    assert_eq!(report.summary.status, RunStatus::CompletedWithErrors);
    assert_eq!(report.summary.failed, 1);
    assert!(report.summary.imported > 0);
    let dp12 = &report.groups[0];
    assert_eq!(category(dp12, "developers").result.failed, 1);
    assert_eq!(category(dp12, "major-projects").result.imported, 1);

    let audit = import_log_repo::latest(&h.db).unwrap().unwrap();
    assert_eq!(audit.status, "completed-with-errors");
    assert_eq!(audit.failed_records, 1);
}

#[test]
fn test_groups_run_in_fixed_order() {
    let h = TestHarness::new();
    let report = h.runner().run_all(&NoopProgress).unwrap();

    let order: Vec<ImportGroup> = report.groups.iter().map(|g| g.group).collect();
    assert_eq!(
        order,
        vec![
            ImportGroup::DataProcess12,
            ImportGroup::DataProcess3,
            ImportGroup::HarMls
        ]
    );
    assert_eq!(report.import_type, "comprehensive");
    assert_eq!(import_log_repo::count(&h.db).unwrap(), 1);
}
