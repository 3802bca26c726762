//! Source discovery and CSV reading.

pub mod locator;
pub mod reader;
pub mod record;

pub use locator::{FileLocator, SourceSpec};
pub use reader::{parse_records, read_records};
pub use record::CsvRecord;
