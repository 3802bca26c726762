use std::time::Duration;

use tracing::warn;

use crate::config::RetryConfig;
use crate::db::DatabaseError;

/// Bounded retry for transient store errors (SQLite busy or locked).
///
/// `max_attempts` counts the first try, so `1` means no retry at all.
/// The wait grows linearly: `backoff`, `2 * backoff`, ...
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            backoff: Duration::ZERO,
        }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            backoff: Duration::from_millis(config.backoff_ms),
        }
    }

    pub fn run<T, F>(&self, mut op: F) -> Result<T, DatabaseError>
    where
        F: FnMut() -> Result<T, DatabaseError>,
    {
        let mut attempt = 1;
        loop {
            match op() {
                Err(e) if e.is_transient() && attempt < self.max_attempts => {
                    let wait = self.backoff * attempt;
                    warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        "Transient database error, retrying in {:?}: {}",
                        wait,
                        e
                    );
                    std::thread::sleep(wait);
                    attempt += 1;
                }
                other => return other,
            }
        }
    }
}
