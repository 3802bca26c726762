use crate::db::record_repo::{self, WriteOutcome};
use crate::db::{Database, DatabaseError};
use crate::entities::Entity;

use super::retry::RetryPolicy;

/// Writes normalized entities through one shared store handle.
#[derive(Clone)]
pub struct RecordUpserter {
    db: Database,
    retry: RetryPolicy,
}

impl RecordUpserter {
    pub fn new(db: Database, retry: RetryPolicy) -> Self {
        Self { db, retry }
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn write<E: Entity>(&self, entity: &E) -> Result<WriteOutcome, DatabaseError> {
        let outcome = self.retry.run(|| record_repo::write(&self.db, entity))?;
        tracing::trace!(table = E::TABLE, ?outcome, "{}", entity.label());
        Ok(outcome)
    }

    /// Runs any other store operation under the same retry policy.
    pub fn execute<T, F>(&self, op: F) -> Result<T, DatabaseError>
    where
        F: Fn(&Database) -> Result<T, DatabaseError>,
    {
        self.retry.run(|| op(&self.db))
    }
}
