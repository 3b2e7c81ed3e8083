use thiserror::Error;

use crate::guard::EditKind;

/// Result type alias using CanonError
pub type Result<T> = std::result::Result<T, CanonError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that presentation layers and tests
/// can match on without depending on message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Validation
    InvalidInput,
    NotFound,
    AlreadyExists,

    // Mutation
    EditRejected,

    // Integrity
    InvariantViolation,

    // Integration/IO
    Io,
    Serialization,
    Persistence,
    Concurrency,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            ExErrorKind::EditRejected => "ERR_EDIT_REJECTED",
            ExErrorKind::InvariantViolation => "ERR_INVARIANT_VIOLATION",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Concurrency => "ERR_CONCURRENCY",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// Whether a caller may retry the failed operation unchanged.
    ///
    /// Only transient storage/concurrency failures qualify; `NotFound` and
    /// `EditRejected` are never retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ExErrorKind::Persistence | ExErrorKind::Concurrency)
    }
}

/// Canonical structured error type
///
/// Carries a classification plus optional context for programmatic handling.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity ID context (example id, grouping key, migration id...)
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for example store operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CanonError {
    /// Operation referenced an unknown example id
    #[error("Example not found: {example_id}")]
    ExampleNotFound { example_id: String },

    /// Structural edit or delete attempted on a canonical example
    #[error("Cannot {kind} example {example_id}: it is canonical, unmark it first")]
    EditRejected { example_id: String, kind: EditKind },

    /// Example id collides with an existing example (hydration/import with stable ids)
    #[error("Example already exists: {example_id}")]
    ExampleAlreadyExists { example_id: String },

    /// Input failed validation (blank text, out-of-bounds entity span, ...)
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    /// Configuration could not be read or parsed
    #[error("Invalid configuration: {reason}")]
    Configuration { reason: String },

    /// Canonical index and example flags disagree after a write
    ///
    /// Never expected to surface; the write that produced it is aborted.
    #[error("Canonical invariant violated for {key}: {reason}")]
    InvariantViolation { key: String, reason: String },

    /// The collaborating storage layer rejected the commit
    #[error("Persistence error: {message}")]
    Persistence { message: String },

    /// A store lock was poisoned by a panicking writer
    #[error("Concurrency error: {message}")]
    Concurrency { message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CanonError {
    /// Get the error kind of the structured facility
    pub fn kind(&self) -> ExErrorKind {
        match self {
            CanonError::ExampleNotFound { .. } => ExErrorKind::NotFound,
            CanonError::EditRejected { .. } => ExErrorKind::EditRejected,
            CanonError::ExampleAlreadyExists { .. } => ExErrorKind::AlreadyExists,
            CanonError::InvalidInput { .. } | CanonError::Configuration { .. } => {
                ExErrorKind::InvalidInput
            }
            CanonError::InvariantViolation { .. } => ExErrorKind::InvariantViolation,
            CanonError::Persistence { .. } => ExErrorKind::Persistence,
            CanonError::Concurrency { .. } => ExErrorKind::Concurrency,
            CanonError::Serialization { .. } => ExErrorKind::Serialization,
            CanonError::Internal { .. } => ExErrorKind::Internal,
        }
    }

    pub(crate) fn not_found(example_id: &str) -> Self {
        CanonError::ExampleNotFound {
            example_id: example_id.to_string(),
        }
    }

    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        CanonError::InvalidInput {
            reason: reason.into(),
        }
    }
}

/// Conversion from CanonError to ExError
impl From<CanonError> for ExError {
    fn from(err: CanonError) -> Self {
        let kind = err.kind();
        match err {
            CanonError::ExampleNotFound { example_id } => ExError::new(kind)
                .with_entity_id(example_id)
                .with_message("Example not found"),

            CanonError::EditRejected { example_id, kind: edit } => ExError::new(kind)
                .with_op(edit.as_str())
                .with_entity_id(example_id)
                .with_message("Example is canonical; unmark it first"),

            CanonError::ExampleAlreadyExists { example_id } => ExError::new(kind)
                .with_entity_id(example_id)
                .with_message("Example already exists"),

            CanonError::InvalidInput { reason } => ExError::new(kind).with_message(reason),

            CanonError::Configuration { reason } => ExError::new(kind)
                .with_op("load_config")
                .with_message(reason),

            CanonError::InvariantViolation { key, reason } => ExError::new(kind)
                .with_entity_id(key)
                .with_message(reason),

            CanonError::Persistence { message }
            | CanonError::Concurrency { message }
            | CanonError::Serialization { message }
            | CanonError::Internal { message } => ExError::new(kind).with_message(message),
        }
    }
}

impl From<serde_json::Error> for CanonError {
    fn from(err: serde_json::Error) -> Self {
        CanonError::Serialization {
            message: err.to_string(),
        }
    }
}
