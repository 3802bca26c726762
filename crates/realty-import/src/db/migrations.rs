//! Versioned schema migrations, recorded in `_migrations`.

use rusqlite::{params, Connection};

use super::error::DatabaseError;

/// `(version, description, sql)` in application order.
const MIGRATIONS: &[(u32, &str, &str)] = &[
    (
        1,
        "create_dataprocess12_tables",
        include_str!("sql/001_create_dataprocess12_tables.sql"),
    ),
    (
        2,
        "create_dataprocess3_tables",
        include_str!("sql/002_create_dataprocess3_tables.sql"),
    ),
    (
        3,
        "create_har_mls_tables",
        include_str!("sql/003_create_har_mls_tables.sql"),
    ),
    (
        4,
        "create_data_imports_table",
        include_str!("sql/004_create_data_imports.sql"),
    ),
];

/// Applies every migration newer than the highest recorded version.
pub fn run_all(conn: &Connection) -> Result<(), DatabaseError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS _migrations (
            version INTEGER PRIMARY KEY,
            description TEXT NOT NULL,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );",
    )?;

    let applied: u32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM _migrations",
        [],
        |r| r.get(0),
    )?;

    for &(version, description, sql) in MIGRATIONS.iter().filter(|m| m.0 > applied) {
        log::info!("Applying schema v{}: {}", version, description);
        conn.execute_batch(sql)
            .map_err(|e| DatabaseError::Migration {
                version,
                reason: e.to_string(),
            })?;
        conn.execute(
            "INSERT INTO _migrations (version, description) VALUES (?1, ?2)",
            params![version, description],
        )?;
    }

    Ok(())
}
