use crate::config::ImportGroup;

/// Events emitted while a run progresses.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    GroupStarted {
        group: ImportGroup,
    },
    GroupCompleted {
        group: ImportGroup,
        imported: u64,
        failed: u64,
    },
    CategoryStarted {
        group: ImportGroup,
        label: String,
    },
    CategoryCompleted {
        group: ImportGroup,
        label: String,
        imported: u64,
        failed: u64,
    },
    /// A file or folder was missing or unreadable.
    FileSkipped {
        path: String,
        reason: String,
    },
}

pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: ProgressEvent);
}

/// No-op reporter for unit tests.
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn report(&self, _event: ProgressEvent) {}
}
