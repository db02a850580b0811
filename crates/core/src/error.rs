//! Unified error types for the scan log service.
//!
//! Three conditions reach the request boundary:
//! - `MalformedRequest`: body absent or not parseable, nothing persisted
//! - `StoreUnavailable`: sheet or counter store cannot be read/written
//! - everything else is an internal fault
//!
//! A record missing required fields is not an error at all; it is skipped
//! inside the batch and only reflected in the processed count.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the scan log service.
#[derive(Debug, Error)]
pub enum Error {
    /// Request body absent or not parseable as structured data.
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    /// Underlying sheet or counter store cannot be read or written.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedRequest(msg.into())
    }

    pub fn store(msg: impl Into<String>) -> Self {
        Self::StoreUnavailable(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Get the HTTP status code for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::MalformedRequest(_) => 400,
            Self::Serialization(_) => 400,
            Self::StoreUnavailable(_) => 500,
            Self::Internal(_) => 500,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::StoreUnavailable(err.to_string())
    }
}
