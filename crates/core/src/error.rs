//! Error types for the core domain.

use thiserror::Error;

/// Core domain error type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid metadata: {0}")]
    InvalidMetadata(String),

    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid chunk size: {size} (must be between {min} and {max})")]
    InvalidChunkSize { size: u64, min: u64, max: u64 },

    #[error("upload session error: {0}")]
    Session(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
