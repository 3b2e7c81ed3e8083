//! Database connection management
//!
//! Provides utilities for opening and managing SQLite connections, and
//! `open_store` which wires a database file to an `ExampleStore`.

#![allow(clippy::result_large_err)]

use std::path::Path;
use std::sync::Arc;

use canonex_core::errors::ExError;
use canonex_core::{EngineConfig, ExampleStore, NotificationSink};
use rusqlite::Connection;

use crate::errors::{from_rusqlite, io_error, Result};
use crate::migrations::apply_migrations;
use crate::repo::hydration::load_corpus;
use crate::repo::{SqliteExampleRepository, SqliteRepo};

/// Open a SQLite database at the given path
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    Connection::open(path).map_err(from_rusqlite)
}

/// Open an in-memory SQLite database (for testing)
pub fn open_in_memory() -> Result<Connection> {
    Connection::open_in_memory().map_err(from_rusqlite)
}

/// Configure a connection with optimal settings
pub fn configure(conn: &Connection) -> Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(from_rusqlite)?;

    // journal_mode returns a row, so it cannot go through execute()
    conn.query_row("PRAGMA journal_mode = WAL", [], |_| Ok(()))
        .map_err(from_rusqlite)?;

    Ok(())
}

/// Open (creating if needed) a database file and hydrate a store from it
///
/// Creates the parent directory, applies pending migrations, checks the
/// recorded entity scope against `config` and loads the corpus. Writes to
/// the returned store are persisted to the same file.
pub fn open_store(
    path: &Path,
    config: EngineConfig,
    sink: Arc<dyn NotificationSink>,
) -> Result<ExampleStore> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| io_error("create_db_dir", e))?;
    }

    let mut conn = open(path)?;
    configure(&conn)?;
    apply_migrations(&mut conn)?;
    SqliteRepo::ensure_entity_scope(&conn, config.entity_scope)?;
    let corpus = load_corpus(&conn, &config)?;

    let repository = Arc::new(SqliteExampleRepository::new(conn));
    ExampleStore::with_corpus(corpus, config, repository, sink).map_err(ExError::from)
}
