//! Store and schema errors.

use thiserror::Error;

/// A document broke one of its collection's schema rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} {reason}")]
pub struct SchemaError {
    pub field: &'static str,
    pub reason: String,
}

impl SchemaError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Store operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("validation failed: {0}")]
    Validation(#[from] SchemaError),

    #[error("duplicate id {0}")]
    DuplicateId(String),

    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("unsupported database URI: {0}")]
    UnsupportedUri(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}
