//! Shared test utilities for realty-import integration tests.
//!
//! - `TestHarness`: a temporary source tree plus an in-memory database
//! - `CsvBuilder` and fixture lists for writing source files

pub mod builders;
pub mod harness;

pub use builders::*;
pub use harness::TestHarness;
