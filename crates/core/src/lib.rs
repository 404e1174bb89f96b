//! Core domain types and shared logic for the drivectl upload client.
//!
//! This crate defines the canonical data model used by the CLI:
//! - Upload-Metadata header encoding
//! - Upload session lifecycle and offset accounting
//! - Client configuration
//! - Credential loading

pub mod config;
pub mod credentials;
pub mod error;
pub mod metadata;
pub mod session;

pub use config::ClientConfig;
pub use credentials::Credentials;
pub use error::{Error, Result};
pub use metadata::UploadMetadata;
pub use session::{Chunk, UploadSession, UploadState};

/// Default chunk size: 5 MiB
pub const DEFAULT_CHUNK_SIZE: u64 = 5 * 1024 * 1024;

/// Maximum chunk size: 64 MiB
pub const MAX_CHUNK_SIZE: u64 = 64 * 1024 * 1024;

/// Minimum chunk size: 256 KiB
pub const MIN_CHUNK_SIZE: u64 = 256 * 1024;

/// Protocol version sent in the Tus-Resumable header on every request.
pub const TUS_RESUMABLE_VERSION: &str = "1.0.0";

/// Validate a configured chunk size against the supported bounds.
pub fn validate_chunk_size(size: u64) -> Result<u64> {
    if !(MIN_CHUNK_SIZE..=MAX_CHUNK_SIZE).contains(&size) {
        return Err(Error::InvalidChunkSize {
            size,
            min: MIN_CHUNK_SIZE,
            max: MAX_CHUNK_SIZE,
        });
    }
    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_size_bounds() {
        assert!(validate_chunk_size(DEFAULT_CHUNK_SIZE).is_ok());
        assert!(validate_chunk_size(MIN_CHUNK_SIZE).is_ok());
        assert!(validate_chunk_size(MAX_CHUNK_SIZE).is_ok());
        assert!(validate_chunk_size(MIN_CHUNK_SIZE - 1).is_err());
        assert!(validate_chunk_size(MAX_CHUNK_SIZE + 1).is_err());
        assert!(validate_chunk_size(0).is_err());
    }
}
