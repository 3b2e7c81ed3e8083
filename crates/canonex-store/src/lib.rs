//! Canonex Store - SQLite persistence and batch import
//!
//! Provides:
//! - SQLite schema with a checksummed migrations framework
//! - Repository layer persisting core change sets transactionally
//! - Hydration of a corpus from disk
//! - Import format v0 (JSON/YAML) parser and importer

pub mod db;
pub mod errors;
pub mod import;
pub mod migrations;
pub mod repo;

// Re-export key types
pub use db::open_store;
pub use errors::Result;
pub use repo::SqliteExampleRepository;
