//! Import outcome accounting.
//!
//! Every attempted record lands in exactly one of `imported` or `failed`.
//! A file that cannot be located or parsed counts as one failure; a file
//! whose parent record is missing counts every one of its rows.

use serde::Serialize;

use crate::config::ImportGroup;
use crate::db::har_repo::PeriodStatus;

/// Counts for one source file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FileOutcome {
    pub file: String,
    pub imported: u64,
    pub failed: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportResult {
    pub imported: u64,
    pub failed: u64,
    pub errors: Vec<String>,
    pub files: Vec<FileOutcome>,
}

impl ImportResult {
    pub fn total(&self) -> u64 {
        self.imported + self.failed
    }

    pub fn record_success(&mut self) {
        self.imported += 1;
    }

    pub fn record_failure(&mut self, message: impl Into<String>) {
        self.failed += 1;
        self.errors.push(message.into());
    }

    /// A file that could not be found or parsed.
    pub fn record_file_error(&mut self, file: &str, message: impl Into<String>) {
        let message = message.into();
        self.failed += 1;
        self.errors.push(format!("{}: {}", file, message));
        self.files.push(FileOutcome {
            file: file.to_string(),
            imported: 0,
            failed: 1,
            error: Some(message),
        });
    }

    /// A file whose rows all depend on a parent record that does not exist.
    pub fn record_dependency_failure(&mut self, file: &str, rows: u64, message: impl Into<String>) {
        let message = message.into();
        self.failed += rows;
        self.errors.push(format!("{}: {}", file, message));
        self.files.push(FileOutcome {
            file: file.to_string(),
            imported: 0,
            failed: rows,
            error: Some(message),
        });
    }

    /// Folds the record-level result of one file into this one.
    pub fn absorb_file(&mut self, file: &str, other: ImportResult) {
        self.files.push(FileOutcome {
            file: file.to_string(),
            imported: other.imported,
            failed: other.failed,
            error: None,
        });
        self.imported += other.imported;
        self.failed += other.failed;
        self.errors.extend(other.errors);
    }

    pub fn merge(&mut self, other: ImportResult) {
        self.imported += other.imported;
        self.failed += other.failed;
        self.errors.extend(other.errors);
        self.files.extend(other.files);
    }
}

/// Result of one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryReport {
    pub key: String,
    pub label: String,
    pub result: ImportResult,
}

/// Results of every category of one import group, in run order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupReport {
    pub group: ImportGroup,
    pub categories: Vec<CategoryReport>,
}

impl GroupReport {
    pub fn new(group: ImportGroup) -> Self {
        Self {
            group,
            categories: Vec::new(),
        }
    }

    /// Adds a category result, merging into an earlier entry with the same key.
    pub fn push(&mut self, report: CategoryReport) {
        match self.categories.iter_mut().find(|c| c.key == report.key) {
            Some(existing) => existing.result.merge(report.result),
            None => self.categories.push(report),
        }
    }

    pub fn imported(&self) -> u64 {
        self.categories.iter().map(|c| c.result.imported).sum()
    }

    pub fn failed(&self) -> u64 {
        self.categories.iter().map(|c| c.result.failed).sum()
    }

    pub fn error_count(&self) -> usize {
        self.categories.iter().map(|c| c.result.errors.len()).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunStatus {
    Completed,
    CompletedWithErrors,
}

impl RunStatus {
    pub fn from_failed(failed: u64) -> Self {
        if failed == 0 {
            RunStatus::Completed
        } else {
            RunStatus::CompletedWithErrors
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Completed => "completed",
            RunStatus::CompletedWithErrors => "completed-with-errors",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub imported: u64,
    pub failed: u64,
    pub total: u64,
    pub error_count: usize,
    pub duration_secs: f64,
    pub status: RunStatus,
    /// Percentage of attempted records that imported; `None` when nothing ran.
    pub success_rate: Option<f64>,
}

impl RunSummary {
    pub fn from_groups(groups: &[GroupReport], duration_secs: f64) -> Self {
        let imported: u64 = groups.iter().map(GroupReport::imported).sum();
        let failed: u64 = groups.iter().map(GroupReport::failed).sum();
        let total = imported + failed;
        let success_rate = if total == 0 {
            None
        } else {
            Some(imported as f64 / total as f64 * 100.0)
        };

        Self {
            imported,
            failed,
            total,
            error_count: groups.iter().map(GroupReport::error_count).sum(),
            duration_secs,
            status: RunStatus::from_failed(failed),
            success_rate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableCount {
    pub table: String,
    pub rows: i64,
}

/// Post-run view of what the store now holds.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Verification {
    pub report_year: i32,
    pub periods: Vec<PeriodStatus>,
    pub tables: Vec<TableCount>,
}

/// Everything one run produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub run_id: String,
    pub import_type: String,
    pub started_at: String,
    pub completed_at: String,
    pub groups: Vec<GroupReport>,
    pub summary: RunSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification: Option<Verification>,
    pub audit_logged: bool,
}
