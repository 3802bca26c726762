use std::time::Instant;

use chrono::Utc;
use tracing::{error, info, info_span, warn};
use uuid::Uuid;

use crate::config::{ImportConfig, ImportGroup, ReportMapping};
use crate::db::{har_repo, import_log_repo, record_repo, Database};
use crate::error::{ConfigError, Result};
use crate::importers::{dataprocess12, dataprocess3, har_mls, Category};

use super::context::ImportContext;
use super::progress::{ProgressEvent, ProgressReporter};
use super::result::{
    CategoryReport, GroupReport, RunReport, RunSummary, TableCount, Verification,
};
use super::retry::RetryPolicy;
use super::upserter::RecordUpserter;

/// Runs import groups in their fixed order and records the outcome.
pub struct ImportRunner {
    config: ImportConfig,
    upserter: RecordUpserter,
}

impl ImportRunner {
    pub fn new(db: Database, config: ImportConfig) -> Self {
        let retry = RetryPolicy::from_config(&config.retry);
        Self {
            upserter: RecordUpserter::new(db, retry),
            config,
        }
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    pub fn database(&self) -> &Database {
        self.upserter.db()
    }

    /// Imports every group: Data Process 1-2, Data Process 3, then HAR MLS.
    pub fn run_all(&self, progress: &dyn ProgressReporter) -> Result<RunReport> {
        self.execute("comprehensive", progress, |progress| {
            ImportGroup::ALL
                .iter()
                .map(|group| self.run_group(*group, progress))
                .collect()
        })
    }

    /// Imports one group without writing an audit row.
    pub fn run_group(&self, group: ImportGroup, progress: &dyn ProgressReporter) -> GroupReport {
        let categories = match group {
            ImportGroup::DataProcess12 => dataprocess12::categories(),
            ImportGroup::DataProcess3 => dataprocess3::categories(),
            ImportGroup::HarMls => {
                har_mls::categories(&self.config.har_reports, self.config.periods.har_report_year)
            }
        };
        self.run_categories(group, categories, progress)
    }

    /// Re-imports only the HAR report folders mapped to `month`.
    pub fn run_har_month(&self, month: u32, progress: &dyn ProgressReporter) -> Result<RunReport> {
        let mappings: Vec<ReportMapping> = self
            .config
            .har_reports
            .iter()
            .filter(|m| m.month == month)
            .cloned()
            .collect();

        if mappings.is_empty() {
            return Err(ConfigError::Validation {
                message: format!("No HAR report mapping for month {}", month),
            }
            .into());
        }

        let import_type = format!("har-mls-month-{}", month);
        self.execute(&import_type, progress, |progress| {
            let categories =
                har_mls::categories(&mappings, self.config.periods.har_report_year);
            vec![self.run_categories(ImportGroup::HarMls, categories, progress)]
        })
    }

    /// What the store holds now: HAR periods of the report year and row
    /// counts of every entity table.
    pub fn verify(&self) -> Result<Verification> {
        let db = self.upserter.db();
        let report_year = self.config.periods.har_report_year;
        let periods = har_repo::import_status(db, report_year)?;
        let tables = record_repo::table_counts(db)?
            .into_iter()
            .map(|(table, rows)| TableCount { table, rows })
            .collect();

        Ok(Verification {
            report_year,
            periods,
            tables,
        })
    }

    fn run_categories(
        &self,
        group: ImportGroup,
        categories: Vec<Category>,
        progress: &dyn ProgressReporter,
    ) -> GroupReport {
        let _group_span = info_span!("group", group = group.key()).entered();
        info!("Starting {} import", group.display_name());
        progress.report(ProgressEvent::GroupStarted { group });

        let ctx = ImportContext::new(&self.config, group, &self.upserter, progress);
        let mut report = GroupReport::new(group);

        for category in categories {
            let _span = info_span!("category", key = %category.key).entered();
            progress.report(ProgressEvent::CategoryStarted {
                group,
                label: category.label.clone(),
            });

            let result = category.run(&ctx);
            info!(
                imported = result.imported,
                failed = result.failed,
                "{} complete",
                category.label
            );

            progress.report(ProgressEvent::CategoryCompleted {
                group,
                label: category.label.clone(),
                imported: result.imported,
                failed: result.failed,
            });
            report.push(CategoryReport {
                key: category.key,
                label: category.label,
                result,
            });
        }

        progress.report(ProgressEvent::GroupCompleted {
            group,
            imported: report.imported(),
            failed: report.failed(),
        });
        report
    }

    /// Wraps a run: store check, timing, summary, verification and audit row.
    fn execute<F>(
        &self,
        import_type: &str,
        progress: &dyn ProgressReporter,
        run: F,
    ) -> Result<RunReport>
    where
        F: FnOnce(&dyn ProgressReporter) -> Vec<GroupReport>,
    {
        // An unreachable store is the one failure that stops a run.
        self.upserter.db().ping()?;

        let run_id = Uuid::new_v4().to_string();
        let _run_span = info_span!("import_run", run_id = %run_id, import_type).entered();

        let started_at = Utc::now();
        let timer = Instant::now();
        let groups = run(progress);
        let duration_secs = timer.elapsed().as_secs_f64();
        let completed_at = Utc::now();

        let summary = RunSummary::from_groups(&groups, duration_secs);
        info!(
            imported = summary.imported,
            failed = summary.failed,
            status = summary.status.as_str(),
            "Import finished in {:.2}s",
            duration_secs
        );

        let verification = match self.verify() {
            Ok(v) => Some(v),
            Err(e) => {
                warn!("Verification query failed: {}", e);
                None
            }
        };

        let mut report = RunReport {
            run_id,
            import_type: import_type.to_string(),
            started_at: started_at.to_rfc3339(),
            completed_at: completed_at.to_rfc3339(),
            groups,
            summary,
            verification,
            audit_logged: false,
        };
        report.audit_logged = self.write_audit(&report);
        Ok(report)
    }

    /// Persists the run's audit row. Failure is logged, never raised.
    fn write_audit(&self, report: &RunReport) -> bool {
        let metadata = serde_json::json!({
            "groups": report.groups,
            "summary": report.summary,
        });

        let row = import_log_repo::ImportLogRow {
            id: report.run_id.clone(),
            import_type: report.import_type.clone(),
            source: self.config.data_root.clone(),
            status: report.summary.status.as_str().to_string(),
            total_records: report.summary.total as i64,
            processed_records: report.summary.imported as i64,
            failed_records: report.summary.failed as i64,
            started_at: report.started_at.clone(),
            completed_at: report.completed_at.clone(),
            duration_secs: report.summary.duration_secs,
            metadata: metadata.to_string(),
        };

        match self
            .upserter
            .execute(|db| import_log_repo::insert(db, &row))
        {
            Ok(()) => true,
            Err(e) => {
                error!(run_id = %report.run_id, "Failed to write import audit record: {}", e);
                false
            }
        }
    }
}
