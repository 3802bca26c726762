use std::path::{Path, PathBuf};

use log::{debug, info};
use walkdir::WalkDir;

use crate::error::SourceError;

/// A relative source location inside one group's base directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceSpec {
    /// A single CSV file.
    File(&'static str),
    /// Every CSV directly inside `dir` whose name contains one of
    /// `name_contains` (all CSVs when empty).
    Folder {
        dir: &'static str,
        name_contains: &'static [&'static str],
    },
}

impl SourceSpec {
    pub fn relative_path(&self) -> &'static str {
        match self {
            SourceSpec::File(path) => path,
            SourceSpec::Folder { dir, .. } => dir,
        }
    }
}

pub struct FileLocator {
    base_directory: PathBuf,
}

impl FileLocator {
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Self {
        Self {
            base_directory: base_directory.as_ref().to_path_buf(),
        }
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// Resolves a relative file path, failing when the file is absent.
    pub fn resolve_file(&self, relative: &str) -> Result<PathBuf, SourceError> {
        let path = self.base_directory.join(relative);
        if path.is_file() {
            Ok(path)
        } else {
            Err(SourceError::NotFound(path))
        }
    }

    /// Lists CSV files directly inside a relative folder, sorted by name.
    pub fn list_csv(
        &self,
        relative_dir: &str,
        name_contains: &[&str],
    ) -> Result<Vec<PathBuf>, SourceError> {
        let dir = self.base_directory.join(relative_dir);
        if !dir.is_dir() {
            return Err(SourceError::NotFound(dir));
        }

        let filters: Vec<String> = name_contains.iter().map(|f| f.to_lowercase()).collect();
        let mut files = Vec::new();

        for entry in WalkDir::new(&dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| SourceError::ReadDirectory {
                path: dir.clone(),
                source: e,
            })?;
            let path = entry.path();

            if !entry.file_type().is_file() {
                continue;
            }

            let is_csv = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.eq_ignore_ascii_case("csv"))
                .unwrap_or(false);
            if !is_csv {
                continue;
            }

            let name = entry.file_name().to_string_lossy().to_lowercase();
            if !filters.is_empty() && !filters.iter().any(|f| name.contains(f.as_str())) {
                debug!("Skipping {} (name filter)", path.display());
                continue;
            }

            files.push(path.to_path_buf());
        }

        files.sort();
        info!("Found {} CSV files in {}", files.len(), dir.display());
        Ok(files)
    }

    /// Expands a source spec into concrete file paths.
    pub fn locate(&self, spec: &SourceSpec) -> Result<Vec<PathBuf>, SourceError> {
        match spec {
            SourceSpec::File(relative) => self.resolve_file(relative).map(|p| vec![p]),
            SourceSpec::Folder { dir, name_contains } => self.list_csv(dir, name_contains),
        }
    }
}
