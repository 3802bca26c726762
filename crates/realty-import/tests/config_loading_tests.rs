//! Configuration loading through the public API.

mod common;

use common::*;
use realty_import::{load_config, ConfigError, ImportGroup, ImportRunner, NoopProgress, RunStatus};

struct ConfigTestCase {
    name: &'static str,
    json: &'static str,
    should_succeed: bool,
    expected_error: Option<&'static str>,
}

#[test]
fn test_config_loading_table() {
    let cases = vec![
        ConfigTestCase {
            name: "minimal",
            json: r#"{"version": "1.0"}"#,
            should_succeed: true,
            expected_error: None,
        },
        ConfigTestCase {
            name: "custom source dirs and periods",
            json: r#"{
                "version": "1.0",
                "data_root": "/srv/market",
                "sources": {"dataprocess3": "DP3"},
                "periods": {"market_data_year": 2023, "mls_snapshot_date": "2023-12-31"}
            }"#,
            should_succeed: true,
            expected_error: None,
        },
        ConfigTestCase {
            name: "unsupported version",
            json: r#"{"version": "0.9"}"#,
            should_succeed: false,
            expected_error: Some("Unsupported config version"),
        },
        ConfigTestCase {
            name: "unknown top-level key",
            json: r#"{"version": "1.0", "parallelism": 8}"#,
            should_succeed: false,
            expected_error: Some("Schema validation failed"),
        },
        ConfigTestCase {
            name: "unknown report type",
            json: r#"{
                "version": "1.0",
                "har_reports": [{"folder": "x", "month": 1, "report_type": "weekly"}]
            }"#,
            should_succeed: false,
            expected_error: Some("Schema validation failed"),
        },
        ConfigTestCase {
            name: "month out of range",
            json: r#"{
                "version": "1.0",
                "har_reports": [{"folder": "x", "month": 0, "report_type": "monthly"}]
            }"#,
            should_succeed: false,
            expected_error: Some("outside 1..=12"),
        },
        ConfigTestCase {
            name: "empty report folder",
            json: r#"{
                "version": "1.0",
                "har_reports": [{"folder": " ", "month": 3, "report_type": "monthly"}]
            }"#,
            should_succeed: false,
            expected_error: Some("Folder name is empty"),
        },
        ConfigTestCase {
            name: "year out of range",
            json: r#"{"version": "1.0", "periods": {"har_report_year": 25}}"#,
            should_succeed: false,
            expected_error: Some("har_report_year out of range"),
        },
        ConfigTestCase {
            name: "malformed json",
            json: r#"{"version": "1.0""#,
            should_succeed: false,
            expected_error: Some("Failed to parse config JSON"),
        },
    ];

    let h = TestHarness::new();
    for case in cases {
        let path = h.temp_dir.path().join(format!("{}.json", case.name.replace(' ', "_")));
        std::fs::write(&path, case.json).expect("Failed to write config");

        let result = load_config(&path);
        assert_eq!(
            result.is_ok(),
            case.should_succeed,
            "case '{}': {:?}",
            case.name,
            result.err()
        );
        if let (Err(e), Some(expected)) = (result, case.expected_error) {
            assert!(
                e.to_string().contains(expected),
                "case '{}': '{}' does not mention '{}'",
                case.name,
                e,
                expected
            );
        }
    }
}

#[test]
fn test_missing_config_file() {
    let h = TestHarness::new();
    let result = load_config(h.temp_dir.path().join("absent.json"));
    assert!(matches!(result, Err(ConfigError::ReadFile { .. })));
}

#[test]
fn test_loaded_config_drives_a_run() {
    let h = TestHarness::new();
    h.write(
        ImportGroup::HarMls,
        "August/market_summary.csv",
        &har_summary("7,950", "$398,000"),
    );

    let json = format!(
        r#"{{
            "version": "1.0",
            "data_root": {},
            "periods": {{"har_report_year": 2026}},
            "har_reports": [{{"folder": "August", "month": 8, "report_type": "monthly"}}]
        }}"#,
        serde_json::to_string(&h.config.data_root).unwrap()
    );
    let path = h.temp_dir.path().join("import.json");
    std::fs::write(&path, json).unwrap();

    let config = load_config(&path).unwrap();
    let runner = ImportRunner::new(h.db.clone(), config);
    let report = runner.run_har_month(8, &NoopProgress).unwrap();

    assert_eq!(report.summary.status, RunStatus::Completed);
    assert_eq!(report.summary.imported, 1);
    assert_eq!(report.groups[0].categories[0].key, "August 2026");
    assert_eq!(
        h.query_i64("SELECT year FROM har_mls_reports WHERE report_type = ?1", "monthly"),
        2026
    );
}
