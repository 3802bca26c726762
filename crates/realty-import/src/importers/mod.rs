//! Category importers: one mapper per source file vocabulary, sharing the
//! file loop and failure accounting below.

use std::path::Path;

use crate::entities::Entity;
use crate::error::NormalizeError;
use crate::pipeline::{ImportContext, ImportResult};
use crate::source::{read_records, CsvRecord, SourceSpec};

pub mod dataprocess12;
pub mod dataprocess3;
pub mod har_mls;

type RunFn = Box<dyn Fn(&ImportContext<'_>) -> ImportResult>;

/// One named import routine.
pub struct Category {
    pub key: String,
    pub label: String,
    run: RunFn,
}

impl Category {
    pub fn new<F>(key: impl Into<String>, label: impl Into<String>, run: F) -> Self
    where
        F: Fn(&ImportContext<'_>) -> ImportResult + 'static,
    {
        Self {
            key: key.into(),
            label: label.into(),
            run: Box::new(run),
        }
    }

    pub fn run(&self, ctx: &ImportContext<'_>) -> ImportResult {
        (self.run)(ctx)
    }
}

impl std::fmt::Debug for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Category")
            .field("key", &self.key)
            .field("label", &self.label)
            .finish()
    }
}

/// The row being mapped, with enough context for provenance and
/// deterministic synthetic keys.
pub struct RowContext<'a> {
    pub record: &'a CsvRecord,
    pub file_name: &'a str,
    /// Path relative to the group directory.
    pub source: &'a str,
    /// 1-based data row number (header excluded).
    pub row: usize,
}

impl RowContext<'_> {
    pub fn get(&self, aliases: &[&str]) -> Option<&str> {
        self.record.first_of(aliases)
    }

    pub fn text(&self, aliases: &[&str], default: &str) -> String {
        crate::normalize::text_or(self.get(aliases), default)
    }

    pub fn currency(&self, aliases: &[&str]) -> f64 {
        self.get(aliases).map(crate::normalize::parse_currency).unwrap_or(0.0)
    }

    pub fn percentage(&self, aliases: &[&str]) -> f64 {
        self.get(aliases)
            .map(crate::normalize::parse_percentage)
            .unwrap_or(0.0)
    }

    pub fn number(&self, aliases: &[&str]) -> f64 {
        self.get(aliases).map(crate::normalize::parse_number).unwrap_or(0.0)
    }

    /// Like [`number`](Self::number) but with a non-zero fallback.
    pub fn number_or(&self, aliases: &[&str], default: f64) -> f64 {
        self.get(aliases)
            .map(crate::normalize::parse_number)
            .unwrap_or(default)
    }

    pub fn count(&self, aliases: &[&str]) -> i64 {
        self.get(aliases).map(crate::normalize::parse_count).unwrap_or(0)
    }

    /// Provenance envelope for this row.
    pub fn metadata(&self, extras: &[(&str, serde_json::Value)]) -> serde_json::Value {
        crate::entities::metadata(self.file_name, self.record, extras)
    }

    /// Required text column; the record fails when it is absent.
    pub fn require(&self, aliases: &[&str]) -> Result<String, NormalizeError> {
        self.get(aliases)
            .map(str::to_string)
            .ok_or_else(|| NormalizeError::MissingField {
                field: aliases.first().copied().unwrap_or_default().to_string(),
            })
    }

    /// Stable key for rows without a natural identifier:
    /// `PREFIX-<relative path without extension>-<row>`.
    pub fn synthetic_key(&self, prefix: &str) -> String {
        synthetic_key(prefix, self.source, self.row)
    }
}

/// Folders sharing a file name still yield distinct keys because the
/// whole relative path goes into the slug.
pub fn synthetic_key(prefix: &str, source: &str, row: usize) -> String {
    let stem = Path::new(source).with_extension("");
    let slug: String = stem
        .to_string_lossy()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("{}-{}-{}", prefix, slug, row)
}

pub(crate) fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Path of a located file relative to the group directory.
pub(crate) fn source_of(ctx: &ImportContext<'_>, path: &Path) -> String {
    path.strip_prefix(ctx.locator.base_directory())
        .map(|rel| rel.to_string_lossy().into_owned())
        .unwrap_or_else(|_| file_name_of(path))
}

/// Locates every spec and imports each resulting file.
pub(crate) fn import_sources<E, F>(ctx: &ImportContext<'_>, specs: &[SourceSpec], map: F) -> ImportResult
where
    E: Entity,
    F: Fn(&RowContext<'_>) -> Result<E, NormalizeError>,
{
    let mut result = ImportResult::default();
    for spec in specs {
        match ctx.locator.locate(spec) {
            Ok(paths) => {
                for path in paths {
                    import_file(ctx, &path, &map, &mut result);
                }
            }
            Err(e) => {
                let reason = e.to_string();
                ctx.file_skipped(spec.relative_path(), &reason);
                result.record_file_error(spec.relative_path(), reason);
            }
        }
    }
    result
}

/// Reads one file and imports its rows. Unreadable files count one failure.
pub(crate) fn import_file<E, F>(
    ctx: &ImportContext<'_>,
    path: &Path,
    map: &F,
    result: &mut ImportResult,
) where
    E: Entity,
    F: Fn(&RowContext<'_>) -> Result<E, NormalizeError>,
{
    if let Some(records) = read_or_record(ctx, path, result) {
        let file_name = file_name_of(path);
        let source = source_of(ctx, path);
        let file_result = import_rows(ctx, &file_name, &source, &records, map);
        result.absorb_file(&file_name, file_result);
    }
}

/// Reads a file, turning a failure into a file-level error on `result`.
pub(crate) fn read_or_record(
    ctx: &ImportContext<'_>,
    path: &Path,
    result: &mut ImportResult,
) -> Option<Vec<CsvRecord>> {
    match read_records(path) {
        Ok(records) => Some(records),
        Err(e) => {
            let file_name = file_name_of(path);
            let reason = e.to_string();
            ctx.file_skipped(&file_name, &reason);
            result.record_file_error(&file_name, reason);
            None
        }
    }
}

/// Maps and writes already parsed rows, one outcome per row.
pub(crate) fn import_rows<E, F>(
    ctx: &ImportContext<'_>,
    file_name: &str,
    source: &str,
    records: &[CsvRecord],
    map: &F,
) -> ImportResult
where
    E: Entity,
    F: Fn(&RowContext<'_>) -> Result<E, NormalizeError>,
{
    let mut result = ImportResult::default();
    for (i, record) in records.iter().enumerate() {
        let row = RowContext {
            record,
            file_name,
            source,
            row: i + 1,
        };
        match map(&row) {
            Ok(entity) => match ctx.upserter.write(&entity) {
                Ok(_) => result.record_success(),
                Err(e) => result.record_failure(format!("{}: {}", entity.label(), e)),
            },
            Err(e) => result.record_failure(format!("{} row {}: {}", file_name, row.row, e)),
        }
    }
    tracing::debug!(
        file = file_name,
        imported = result.imported,
        failed = result.failed,
        "File imported"
    );
    result
}
