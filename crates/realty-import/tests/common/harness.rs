//! Test harness: a temporary source tree and an in-memory database.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use assert_fs::TempDir;
use realty_import::db::record_repo;
use realty_import::pipeline::{CategoryReport, GroupReport};
use realty_import::{
    Database, ImportConfig, ImportGroup, ImportRunner, NoopProgress, ReportMapping, RunReport,
};
use rusqlite::params;

use super::builders::full_source_tree;

/// Owns a temporary data root and a fresh database for one test.
pub struct TestHarness {
    pub temp_dir: TempDir,
    pub db: Database,
    pub config: ImportConfig,
}

impl TestHarness {
    /// Creates an empty data root with the default layout and report mappings.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db = Database::open_in_memory().expect("Failed to open in-memory database");
        let config = ImportConfig {
            data_root: temp_dir.path().display().to_string(),
            ..Default::default()
        };
        Self {
            temp_dir,
            db,
            config,
        }
    }

    /// Restricts the HAR group to the given report folders.
    pub fn with_har_reports(mut self, mappings: Vec<ReportMapping>) -> Self {
        self.config.har_reports = mappings;
        self
    }

    /// Absolute path of a file inside a group directory.
    pub fn path(&self, group: ImportGroup, rel: &str) -> PathBuf {
        self.config.group_dir(group).join(rel)
    }

    /// Writes a source file, creating parent directories as needed.
    pub fn write(&self, group: ImportGroup, rel: &str, content: &str) -> PathBuf {
        let path = self.path(group, rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create source directory");
        }
        fs::write(&path, content).expect("Failed to write source file");
        path
    }

    pub fn remove(&self, group: ImportGroup, rel: &str) {
        fs::remove_file(self.path(group, rel)).expect("Failed to remove source file");
    }

    /// Writes one valid file for every location the default config reads.
    pub fn populate_all(&self) {
        for fixture in full_source_tree() {
            self.write(fixture.group, &fixture.path, &fixture.body);
        }
    }

    pub fn runner(&self) -> ImportRunner {
        ImportRunner::new(self.db.clone(), self.config.clone())
    }

    pub fn run_all(&self) -> RunReport {
        self.runner()
            .run_all(&NoopProgress)
            .expect("Import run failed")
    }

    pub fn run_group(&self, group: ImportGroup) -> GroupReport {
        self.runner().run_group(group, &NoopProgress)
    }

    pub fn count(&self, table: &str) -> i64 {
        record_repo::count(&self.db, table).expect("Failed to count rows")
    }

    /// Reads a single integer column from the first row matching `sql`.
    pub fn query_i64(&self, sql: &str, param: &str) -> i64 {
        self.db
            .with_conn(|conn| Ok(conn.query_row(sql, params![param], |r| r.get(0))?))
            .expect("Failed to query database")
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Finds a category in a group report by key.
pub fn category<'a>(report: &'a GroupReport, key: &str) -> &'a CategoryReport {
    report
        .categories
        .iter()
        .find(|c| c.key == key)
        .unwrap_or_else(|| panic!("No category '{}' in {:?}", key, report.group))
}
