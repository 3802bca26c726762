//! Run audit log: one `data_imports` row per pipeline run.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DatabaseError};

/// A raw audit row.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportLogRow {
    pub id: String,
    pub import_type: String,
    pub source: String,
    pub status: String,
    pub total_records: i64,
    pub processed_records: i64,
    pub failed_records: i64,
    pub started_at: String,
    pub completed_at: String,
    pub duration_secs: f64,
    /// Full nested run result, serialized as JSON.
    pub metadata: String,
}

impl ImportLogRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            import_type: row.get("import_type")?,
            source: row.get("source")?,
            status: row.get("status")?,
            total_records: row.get("total_records")?,
            processed_records: row.get("processed_records")?,
            failed_records: row.get("failed_records")?,
            started_at: row.get("started_at")?,
            completed_at: row.get("completed_at")?,
            duration_secs: row.get("duration_secs")?,
            metadata: row.get("metadata")?,
        })
    }
}

pub fn insert(db: &Database, row: &ImportLogRow) -> Result<(), DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO data_imports (id, import_type, source, status, total_records,
             processed_records, failed_records, started_at, completed_at, duration_secs, metadata)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                row.id,
                row.import_type,
                row.source,
                row.status,
                row.total_records,
                row.processed_records,
                row.failed_records,
                row.started_at,
                row.completed_at,
                row.duration_secs,
                row.metadata,
            ],
        )?;
        Ok(())
    })
}

/// The most recently completed run.
pub fn latest(db: &Database) -> Result<Option<ImportLogRow>, DatabaseError> {
    db.with_conn(|conn| {
        let row = conn
            .query_row(
                "SELECT * FROM data_imports ORDER BY completed_at DESC, rowid DESC LIMIT 1",
                [],
                ImportLogRow::from_row,
            )
            .optional()?;
        Ok(row)
    })
}

pub fn count(db: &Database) -> Result<i64, DatabaseError> {
    db.with_conn(|conn| {
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM data_imports", [], |r| r.get(0))?;
        Ok(n)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, completed_at: &str) -> ImportLogRow {
        ImportLogRow {
            id: id.to_string(),
            import_type: "full".to_string(),
            source: "Data Process 1-2, Data Process 3, HAR MLS".to_string(),
            status: "completed".to_string(),
            total_records: 10,
            processed_records: 10,
            failed_records: 0,
            started_at: "2025-01-01T00:00:00+00:00".to_string(),
            completed_at: completed_at.to_string(),
            duration_secs: 1.5,
            metadata: "{}".to_string(),
        }
    }

    #[test]
    fn test_insert_and_latest() {
        let db = Database::open_in_memory().unwrap();
        assert!(latest(&db).unwrap().is_none());

        insert(&db, &row("a", "2025-01-01T00:01:00+00:00")).unwrap();
        insert(&db, &row("b", "2025-01-02T00:01:00+00:00")).unwrap();

        let last = latest(&db).unwrap().unwrap();
        assert_eq!(last.id, "b");
        assert_eq!(last.duration_secs, 1.5);
        assert_eq!(count(&db).unwrap(), 2);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let db = Database::open_in_memory().unwrap();
        insert(&db, &row("a", "2025-01-01T00:01:00+00:00")).unwrap();
        assert!(insert(&db, &row("a", "2025-01-01T00:02:00+00:00")).is_err());
    }
}
