use chrono::NaiveDate;

use crate::config::{ImportConfig, ImportGroup};
use crate::normalize;
use crate::source::FileLocator;

use super::progress::{ProgressEvent, ProgressReporter};
use super::upserter::RecordUpserter;

/// What a category importer gets to work with.
pub struct ImportContext<'a> {
    pub config: &'a ImportConfig,
    pub group: ImportGroup,
    pub locator: FileLocator,
    pub upserter: &'a RecordUpserter,
    pub progress: &'a dyn ProgressReporter,
}

impl<'a> ImportContext<'a> {
    pub fn new(
        config: &'a ImportConfig,
        group: ImportGroup,
        upserter: &'a RecordUpserter,
        progress: &'a dyn ProgressReporter,
    ) -> Self {
        Self {
            config,
            group,
            locator: FileLocator::new(config.group_dir(group)),
            upserter,
            progress,
        }
    }

    /// Year stamped on Data Process 1-2 and 3 rows that carry none.
    pub fn market_year(&self) -> i32 {
        self.config.periods.market_data_year
    }

    pub fn market_year_start(&self) -> NaiveDate {
        normalize::year_start(self.market_year())
    }

    pub fn har_report_year(&self) -> i32 {
        self.config.periods.har_report_year
    }

    /// Date of the real-time MLS snapshot files.
    pub fn mls_snapshot_date(&self) -> NaiveDate {
        normalize::parse_date(&self.config.periods.mls_snapshot_date)
            .unwrap_or_else(|| self.market_year_start())
    }

    pub fn file_skipped(&self, path: &str, reason: &str) {
        tracing::warn!(path, "Skipping source: {}", reason);
        self.progress.report(ProgressEvent::FileSkipped {
            path: path.to_string(),
            reason: reason.to_string(),
        });
    }
}
