//! Generic entity writer: upsert on natural key, plain insert otherwise.

use chrono::Utc;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};

use super::{Database, DatabaseError};
use crate::entities::{Entity, KeyPolicy, TABLES};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Inserted,
    Updated,
}

/// Writes one entity.
///
/// Natural-key entities use `INSERT ... ON CONFLICT DO UPDATE`: every mutable
/// column and `updated_at` are refreshed, `created_at` keeps its first value.
pub fn write<E: Entity>(db: &Database, entity: &E) -> Result<WriteOutcome, DatabaseError> {
    let columns = entity.columns();
    let now = Utc::now().to_rfc3339();

    db.with_conn(|conn| match E::KEY {
        KeyPolicy::AppendOnly => {
            execute_insert(conn, E::TABLE, &columns, &now, None)?;
            Ok(WriteOutcome::Inserted)
        }
        KeyPolicy::Natural(keys) => {
            let existed = key_exists(conn, E::TABLE, keys, &columns)?;
            execute_insert(conn, E::TABLE, &columns, &now, Some(keys))?;
            Ok(if existed {
                WriteOutcome::Updated
            } else {
                WriteOutcome::Inserted
            })
        }
    })
}

/// Only alphanumeric identifiers with underscores are interpolated into SQL.
fn is_identifier(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn check_identifiers<'a>(
    table: &str,
    names: impl IntoIterator<Item = &'a str>,
) -> Result<(), DatabaseError> {
    if !is_identifier(table) {
        return Err(DatabaseError::InvalidRow {
            table: table.to_string(),
            reason: "invalid table name".to_string(),
        });
    }
    for name in names {
        if !is_identifier(name) {
            return Err(DatabaseError::InvalidRow {
                table: table.to_string(),
                reason: format!("invalid column name '{}'", name),
            });
        }
    }
    Ok(())
}

fn key_values<'a>(
    table: &str,
    keys: &[&str],
    columns: &'a [(&'static str, Value)],
) -> Result<Vec<&'a Value>, DatabaseError> {
    keys.iter()
        .map(|key| {
            columns
                .iter()
                .find(|(name, _)| name == key)
                .map(|(_, value)| value)
                .ok_or_else(|| DatabaseError::InvalidRow {
                    table: table.to_string(),
                    reason: format!("missing key column '{}'", key),
                })
        })
        .collect()
}

fn key_exists(
    conn: &Connection,
    table: &str,
    keys: &[&str],
    columns: &[(&'static str, Value)],
) -> Result<bool, DatabaseError> {
    check_identifiers(table, keys.iter().copied())?;
    let values = key_values(table, keys, columns)?;

    let predicate: Vec<String> = keys
        .iter()
        .enumerate()
        .map(|(i, key)| format!("{} = ?{}", key, i + 1))
        .collect();
    let sql = format!(
        "SELECT EXISTS(SELECT 1 FROM {} WHERE {})",
        table,
        predicate.join(" AND ")
    );

    let exists: bool = conn.query_row(&sql, params_from_iter(values), |r| r.get(0))?;
    Ok(exists)
}

fn execute_insert(
    conn: &Connection,
    table: &str,
    columns: &[(&'static str, Value)],
    now: &str,
    conflict_keys: Option<&[&str]>,
) -> Result<(), DatabaseError> {
    check_identifiers(table, columns.iter().map(|(name, _)| *name))?;

    let mut names: Vec<&str> = columns.iter().map(|(name, _)| *name).collect();
    names.push("created_at");
    names.push("updated_at");

    let placeholders: Vec<String> = (1..=names.len()).map(|i| format!("?{}", i)).collect();
    let mut sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table,
        names.join(", "),
        placeholders.join(", ")
    );

    if let Some(keys) = conflict_keys {
        let updates: Vec<String> = columns
            .iter()
            .map(|(name, _)| *name)
            .filter(|name| !keys.contains(name))
            .chain(std::iter::once("updated_at"))
            .map(|name| format!("{} = excluded.{}", name, name))
            .collect();
        sql.push_str(&format!(
            " ON CONFLICT({}) DO UPDATE SET {}",
            keys.join(", "),
            updates.join(", ")
        ));
    }

    let now = Value::Text(now.to_string());
    let values = columns
        .iter()
        .map(|(_, value)| value)
        .chain([&now, &now]);

    conn.execute(&sql, params_from_iter(values))?;
    Ok(())
}

/// Row count of one entity table.
pub fn count(db: &Database, table: &str) -> Result<i64, DatabaseError> {
    check_identifiers(table, std::iter::empty())?;
    db.with_conn(|conn| {
        let n: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| {
            r.get(0)
        })?;
        Ok(n)
    })
}

/// Row counts of every entity table, in creation order.
pub fn table_counts(db: &Database) -> Result<Vec<(String, i64)>, DatabaseError> {
    TABLES
        .iter()
        .map(|table| Ok((table.to_string(), count(db, table)?)))
        .collect()
}
