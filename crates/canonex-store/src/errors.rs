//! Error handling for canonex-store
//!
//! Wraps canonex-core ExError with store-specific helpers

use canonex_core::errors::{ExError, ExErrorKind};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create a migration error
pub fn migration_error(migration_id: &str, reason: &str) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("migration")
        .with_message(format!("Migration {} failed: {}", migration_id, reason))
}

/// Create a checksum mismatch error
pub fn checksum_mismatch(migration_id: &str, expected: &str, actual: &str) -> ExError {
    ExError::new(ExErrorKind::InvariantViolation)
        .with_op("migration_checksum")
        .with_message(format!(
            "Checksum mismatch for migration {}: expected {}, got {}",
            migration_id, expected, actual
        ))
}

/// Create an import validation error
pub fn import_validation(reason: &str) -> ExError {
    ExError::new(ExErrorKind::InvalidInput)
        .with_op("import_parse")
        .with_message(reason.to_string())
}

/// The database was written under a different engine configuration
pub fn config_mismatch(reason: &str) -> ExError {
    ExError::new(ExErrorKind::InvalidInput)
        .with_op("open_store")
        .with_message(reason.to_string())
}

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// Create a serialization error for a stored column
pub fn from_serde_json(column: &str, err: serde_json::Error) -> ExError {
    ExError::new(ExErrorKind::Serialization)
        .with_op("sqlite_decode")
        .with_message(format!("Column {}: {}", column, err))
}

/// Create a Serialization error for a stored timestamp chrono cannot represent
pub fn invalid_timestamp(column: &str, millis: i64) -> ExError {
    ExError::new(ExErrorKind::Serialization)
        .with_op("sqlite_decode")
        .with_message(format!("Column {}: invalid timestamp {}", column, millis))
}

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}
