pub mod context;
pub mod progress;
pub mod result;
pub mod retry;
pub mod runner;
pub mod upserter;

pub use context::ImportContext;
pub use progress::{NoopProgress, ProgressEvent, ProgressReporter};
pub use result::{
    CategoryReport, FileOutcome, GroupReport, ImportResult, RunReport, RunStatus, RunSummary,
    TableCount, Verification,
};
pub use retry::RetryPolicy;
pub use runner::ImportRunner;
pub use upserter::RecordUpserter;
