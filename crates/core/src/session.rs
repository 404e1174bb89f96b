//! Upload session lifecycle and offset accounting.

use crate::{Error, Result};
use bytes::Bytes;
use std::fmt;

/// Orchestrator state for one upload attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UploadState {
    /// Nothing has happened yet.
    Idle,
    /// The per-file key was obtained from the key service.
    KeyAcquired,
    /// The creation request succeeded and a session URL is known.
    SessionOpen,
    /// Chunks are being transferred.
    Transferring,
    /// The full file length was acknowledged by the server.
    Completed,
    /// The attempt was aborted by an error.
    Failed,
}

impl UploadState {
    /// Check if the attempt reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// A resumable upload session issued by the server.
///
/// The offset is the authoritative cursor for where the next chunk must
/// begin. It only ever moves forward and never past the total size.
#[derive(Clone, Debug)]
pub struct UploadSession {
    upload_url: String,
    total_size: u64,
    offset: u64,
}

impl UploadSession {
    /// Open a session at offset zero.
    pub fn new(upload_url: String, total_size: u64) -> Self {
        Self {
            upload_url,
            total_size,
            offset: 0,
        }
    }

    /// The service-issued session endpoint for chunk transfers.
    pub fn upload_url(&self) -> &str {
        &self.upload_url
    }

    /// Total file size in bytes.
    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    /// Bytes acknowledged by the server so far.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Bytes not yet acknowledged.
    pub fn remaining(&self) -> u64 {
        self.total_size - self.offset
    }

    /// Check whether the full file length has been acknowledged.
    /// An empty file is complete without any transfer.
    pub fn is_complete(&self) -> bool {
        self.offset == self.total_size
    }

    /// Length of the next chunk to send.
    pub fn next_chunk_len(&self, chunk_size: u64) -> u64 {
        chunk_size.min(self.remaining())
    }

    /// Number of transfers a full upload will take.
    pub fn expected_chunk_count(&self, chunk_size: u64) -> u64 {
        self.total_size.div_ceil(chunk_size)
    }

    /// Record the server-acknowledged offset after a chunk transfer.
    pub fn advance(&mut self, new_offset: u64) -> Result<()> {
        if new_offset < self.offset {
            return Err(Error::Session(format!(
                "offset moved backwards: {} -> {}",
                self.offset, new_offset
            )));
        }
        if new_offset > self.total_size {
            return Err(Error::Session(format!(
                "offset {} exceeds total size {}",
                new_offset, self.total_size
            )));
        }
        self.offset = new_offset;
        Ok(())
    }
}

/// One contiguous byte range of the source file, sent in a single request.
///
/// Owned by the transporter for the duration of one transfer attempt and
/// discarded once the attempt resolves.
#[derive(Clone)]
pub struct Chunk {
    data: Bytes,
    offset: u64,
    total_size: u64,
}

impl Chunk {
    /// Build a chunk, enforcing `offset < total_size` and
    /// `len <= total_size - offset`.
    pub fn new(data: Bytes, offset: u64, total_size: u64) -> Result<Self> {
        if offset >= total_size {
            return Err(Error::Session(format!(
                "chunk offset {offset} is past the end of a {total_size}-byte file"
            )));
        }
        if data.len() as u64 > total_size - offset {
            return Err(Error::Session(format!(
                "chunk of {} bytes at offset {offset} overruns total size {total_size}",
                data.len()
            )));
        }
        Ok(Self {
            data,
            offset,
            total_size,
        })
    }

    /// The raw chunk bytes.
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Offset of the first byte within the file.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Chunk length in bytes.
    pub fn len(&self) -> u64 {
        self.data.len() as u64
    }

    /// Check for a zero-length chunk (never sent on the wire).
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The cumulative offset the server must report after accepting
    /// this chunk.
    pub fn expected_offset(&self) -> u64 {
        self.offset + self.len()
    }
}

impl fmt::Debug for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chunk")
            .field("offset", &self.offset)
            .field("len", &self.data.len())
            .field("total_size", &self.total_size)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_terminality() {
        assert!(UploadState::Completed.is_terminal());
        assert!(UploadState::Failed.is_terminal());
        for state in [
            UploadState::Idle,
            UploadState::KeyAcquired,
            UploadState::SessionOpen,
            UploadState::Transferring,
        ] {
            assert!(!state.is_terminal());
        }
    }

    #[test]
    fn test_advance_is_monotonic() {
        let mut session = UploadSession::new("http://s/u/1".into(), 100);
        session.advance(40).unwrap();
        session.advance(40).unwrap();
        assert!(session.advance(30).is_err());
        assert_eq!(session.offset(), 40);
    }

    #[test]
    fn test_advance_never_exceeds_total() {
        let mut session = UploadSession::new("http://s/u/1".into(), 100);
        assert!(session.advance(101).is_err());
        session.advance(100).unwrap();
        assert!(session.is_complete());
    }

    #[test]
    fn test_empty_file_is_immediately_complete() {
        let session = UploadSession::new("http://s/u/1".into(), 0);
        assert!(session.is_complete());
        assert_eq!(session.expected_chunk_count(5), 0);
    }

    #[test]
    fn test_chunk_count_and_lengths() {
        let mut session = UploadSession::new("http://s/u/1".into(), 100);
        assert_eq!(session.expected_chunk_count(30), 4);
        assert_eq!(session.next_chunk_len(30), 30);
        session.advance(90).unwrap();
        assert_eq!(session.next_chunk_len(30), 10); // Last chunk is smaller
    }

    #[test]
    fn test_chunk_preconditions() {
        assert!(Chunk::new(Bytes::from_static(b"abcd"), 0, 10).is_ok());
        assert!(Chunk::new(Bytes::from_static(b"abcd"), 10, 10).is_err());
        assert!(Chunk::new(Bytes::from_static(b"abcd"), 8, 10).is_err());
        let chunk = Chunk::new(Bytes::from_static(b"ab"), 8, 10).unwrap();
        assert_eq!(chunk.expected_offset(), 10);
    }
}
