//! Error types for the wardrobe API client.
//!
//! # Design
//! `NotFound` gets its own variant because callers distinguish "no such
//! record" from other failures. Both status variants keep the server's
//! `{message}` when one was sent, so state slices can surface it verbatim.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The server returned 404.
    #[error("resource not found")]
    NotFound { message: Option<String> },

    /// The server returned a status other than the expected one or 404.
    #[error("HTTP error! Status: {status}")]
    Http { status: u16, message: Option<String> },

    #[error("deserialization failed: {0}")]
    Deserialization(String),

    #[error("serialization failed: {0}")]
    Serialization(String),

    /// No response was received.
    #[error("transport failed: {0}")]
    Transport(String),
}

impl ApiError {
    /// The `message` field of the server's error body, if there was one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::NotFound { message } | ApiError::Http { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}
