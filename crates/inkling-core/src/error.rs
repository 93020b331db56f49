//! Error types for inkling.

use thiserror::Error;

/// Result type alias using inkling's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for inkling operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Caller-supplied input was rejected before any provider call
    #[error("Validation error: {0}")]
    Validation(String),

    /// Upstream provider call failed or returned an unusable payload
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// URL failed structural validation before any network call
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Provider call exceeded its deadline
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Error::Timeout(e.to_string())
        } else {
            Error::Upstream(e.to_string())
        }
    }
}
