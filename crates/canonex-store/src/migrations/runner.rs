//! Migration runner

#![allow(clippy::result_large_err)]

use rusqlite::{Connection, OptionalExtension};

use super::{Migration, MIGRATIONS};
use crate::errors::{checksum_mismatch, from_rusqlite, migration_error, Result};

const CREATE_SCHEMA_VERSION: &str = "CREATE TABLE IF NOT EXISTS schema_version (
    id INTEGER PRIMARY KEY,
    migration_id TEXT NOT NULL UNIQUE,
    applied_at INTEGER NOT NULL,
    checksum TEXT NOT NULL
)";

/// Bring the schema up to date
///
/// # Errors
///
/// Fails on SQL errors, or if an applied migration's recorded checksum no
/// longer matches its SQL.
pub fn apply_migrations(conn: &mut Connection) -> Result<()> {
    conn.execute(CREATE_SCHEMA_VERSION, [])
        .map_err(from_rusqlite)?;

    for migration in MIGRATIONS {
        if is_applied(conn, migration)? {
            continue;
        }
        apply_one(conn, migration)?;
    }
    Ok(())
}

/// Ids of applied migrations, in application order
pub fn applied_migrations(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn
        .prepare("SELECT migration_id FROM schema_version ORDER BY id")
        .map_err(from_rusqlite)?;
    let ids = stmt
        .query_map([], |row| row.get(0))
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<String>, _>>()
        .map_err(from_rusqlite)?;
    Ok(ids)
}

fn is_applied(conn: &Connection, migration: &Migration) -> Result<bool> {
    let recorded: Option<String> = conn
        .query_row(
            "SELECT checksum FROM schema_version WHERE migration_id = ?1",
            [migration.id],
            |row| row.get(0),
        )
        .optional()
        .map_err(from_rusqlite)?;

    match recorded {
        None => Ok(false),
        Some(recorded) => {
            let actual = migration.checksum();
            if recorded == actual {
                Ok(true)
            } else {
                Err(checksum_mismatch(migration.id, &recorded, &actual))
            }
        }
    }
}

fn apply_one(conn: &mut Connection, migration: &Migration) -> Result<()> {
    let tx = conn.transaction().map_err(from_rusqlite)?;
    tx.execute_batch(migration.sql)
        .map_err(|e| migration_error(migration.id, &e.to_string()))?;
    tx.execute(
        "INSERT INTO schema_version (migration_id, applied_at, checksum) VALUES (?1, ?2, ?3)",
        rusqlite::params![
            migration.id,
            chrono::Utc::now().timestamp(),
            migration.checksum()
        ],
    )
    .map_err(from_rusqlite)?;
    tx.commit().map_err(from_rusqlite)?;

    tracing::debug!(
        component = module_path!(),
        op = "migration",
        migration_id = migration.id,
        "applied migration"
    );
    Ok(())
}
