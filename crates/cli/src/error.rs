//! Error type for the upload client.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors produced while driving one upload attempt.
///
/// Every variant is fatal to the attempt: no protocol step is retried and
/// the orchestrator halts on the first failure.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("key service returned no usable key: {0}")]
    KeyUnavailable(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus { status: StatusCode, body: String },

    #[error("response missing required {0} header")]
    MissingHeader(&'static str),

    #[error("malformed {name} header: {value:?}")]
    MalformedHeader { name: &'static str, value: String },

    #[error("offset mismatch: server reported {actual}, expected {expected}")]
    OffsetMismatch { expected: u64, actual: u64 },

    #[error(transparent)]
    Network(#[from] reqwest::Error),

    #[error(transparent)]
    Core(#[from] drivectl_core::Error),
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, UploadError>;
