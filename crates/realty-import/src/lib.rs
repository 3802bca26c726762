pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod importers;
pub mod normalize;
pub mod pipeline;
pub mod report;
pub mod source;

pub use config::{load_config, ImportConfig, ImportGroup, ReportMapping, ReportType};
pub use db::{default_database_path, Database, DatabaseError};
pub use error::{ConfigError, NormalizeError, RealtyError, Result, SourceError};
pub use pipeline::{
    ImportResult, ImportRunner, NoopProgress, ProgressEvent, ProgressReporter, RunReport,
    RunStatus,
};
pub use report::render_summary;
