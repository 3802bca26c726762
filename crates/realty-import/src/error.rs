use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RealtyError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Database error: {0}")]
    Database(#[from] crate::db::DatabaseError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },

    #[error("Schema validation failed: {errors}")]
    SchemaValidation { errors: String },

    #[error("Invalid report mapping '{folder}': {reason}")]
    InvalidReportMapping { folder: String, reason: String },
}

/// File-level failures. One of these never aborts sibling files.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read directory '{path}': {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Malformed CSV in '{path}': {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Malformed CSV in '{path}' at line {line}: expected {expected} columns, found {found}")]
    ColumnMismatch {
        path: PathBuf,
        line: u64,
        expected: usize,
        found: usize,
    },
}

/// Record-level failures raised while mapping one CSV row.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NormalizeError {
    #[error("missing required field '{field}'")]
    MissingField { field: String },

    #[error("invalid date '{value}' in field '{field}'")]
    InvalidDate { field: String, value: String },

    #[error("invalid JSON in field '{field}': {reason}")]
    InvalidJson { field: String, reason: String },

    #[error("unrecognized value '{value}' in field '{field}'")]
    UnrecognizedValue { field: String, value: String },
}

pub type Result<T> = std::result::Result<T, RealtyError>;
