//! Schema migrations
//!
//! SQL files under `migrations/` are compiled in and applied in order. Each
//! applied migration is recorded in `schema_version` with the SHA-256 of its
//! SQL, so an edited migration is caught instead of silently skipped.

mod runner;

use sha2::{Digest, Sha256};

pub use runner::{applied_migrations, apply_migrations};

pub(crate) struct Migration {
    pub id: &'static str,
    pub sql: &'static str,
}

impl Migration {
    /// Hex SHA-256 of the SQL text
    pub fn checksum(&self) -> String {
        hex::encode(Sha256::digest(self.sql.as_bytes()))
    }
}

pub(crate) const MIGRATIONS: &[Migration] = &[
    Migration {
        id: "001_initial_schema",
        sql: include_str!("../../migrations/001_initial_schema.sql"),
    },
    Migration {
        id: "002_store_meta",
        sql: include_str!("../../migrations/002_store_meta.sql"),
    },
];
