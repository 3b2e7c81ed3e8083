//! Repository layer for persisting the corpus to SQLite
//!
//! Bridges the in-memory core (`Corpus`, `ChangeSet`) to SQLite persistence

pub mod hydration;
pub mod sqlite_repo;

pub use sqlite_repo::{SqliteExampleRepository, SqliteRepo};
