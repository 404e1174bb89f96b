//! Upload orchestration: key acquisition, session creation and the
//! sequential chunk-transfer loop.

use crate::client::UploadClient;
use crate::error::Result;
use bytes::Bytes;
use drivectl_core::{Chunk, UploadSession, UploadState};
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

/// Progress snapshot emitted after each accepted chunk.
///
/// Pure observability signal; nothing reads it back for control flow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransferProgress {
    pub bytes_sent: u64,
    pub total_size: u64,
}

impl TransferProgress {
    pub fn percent(&self) -> f64 {
        if self.total_size == 0 {
            100.0
        } else {
            self.bytes_sent as f64 / self.total_size as f64 * 100.0
        }
    }
}

/// Summary of a completed upload.
#[derive(Clone, Debug)]
pub struct UploadSummary {
    pub filename: String,
    pub bytes_sent: u64,
    pub chunks_sent: u64,
}

/// Drives one upload from key acquisition to completion.
///
/// The transfer loop is strictly sequential: the next chunk is not read
/// from disk until the server has acknowledged the previous one, so at
/// most one request is in flight at any time.
pub struct Uploader {
    client: UploadClient,
    chunk_size: u64,
    state: UploadState,
}

impl Uploader {
    pub fn new(client: UploadClient, chunk_size: u64) -> Self {
        Self {
            client,
            chunk_size,
            state: UploadState::Idle,
        }
    }

    /// Current position in the upload state machine.
    pub fn state(&self) -> UploadState {
        self.state
    }

    /// Upload the file at `path`. Any failure is fatal to the attempt:
    /// the file handle is released and no step is retried.
    pub async fn run(
        &mut self,
        path: &Path,
        parent: Option<&str>,
        mut on_progress: impl FnMut(TransferProgress),
    ) -> Result<UploadSummary> {
        self.state = UploadState::Idle;
        match self.drive(path, parent, &mut on_progress).await {
            Ok(summary) => {
                self.transition(UploadState::Completed);
                Ok(summary)
            }
            Err(err) => {
                self.transition(UploadState::Failed);
                Err(err)
            }
        }
    }

    async fn drive(
        &mut self,
        path: &Path,
        parent: Option<&str>,
        on_progress: &mut dyn FnMut(TransferProgress),
    ) -> Result<UploadSummary> {
        let key = self.client.fetch_file_key().await?;
        self.transition(UploadState::KeyAcquired);

        let created = self.client.create_upload(path, &key, parent).await?;
        self.transition(UploadState::SessionOpen);

        let mut session = UploadSession::new(created.upload_url, created.total_size);
        let mut file = File::open(path).await?;
        self.transition(UploadState::Transferring);

        let mut chunks_sent = 0u64;
        while !session.is_complete() {
            let len = usize::try_from(session.next_chunk_len(self.chunk_size))
                .map_err(|_| drivectl_core::Error::Session("chunk size exceeds platform limits".into()))?;
            let mut data = vec![0u8; len];
            file.read_exact(&mut data).await?;

            let chunk = Chunk::new(Bytes::from(data), session.offset(), session.total_size())?;
            let new_offset = self.client.upload_chunk(session.upload_url(), &chunk).await?;
            session.advance(new_offset)?;
            chunks_sent += 1;

            tracing::debug!(
                offset = new_offset,
                total = session.total_size(),
                "chunk accepted"
            );
            on_progress(TransferProgress {
                bytes_sent: session.offset(),
                total_size: session.total_size(),
            });
        }

        Ok(UploadSummary {
            filename: path
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or("<unnamed>")
                .to_string(),
            bytes_sent: session.offset(),
            chunks_sent,
        })
    }

    fn transition(&mut self, next: UploadState) {
        tracing::debug!(from = ?self.state, to = ?next, "upload state transition");
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_percent() {
        let progress = TransferProgress {
            bytes_sent: 3,
            total_size: 12,
        };
        assert!((progress.percent() - 25.0).abs() < f64::EPSILON);

        let empty = TransferProgress {
            bytes_sent: 0,
            total_size: 0,
        };
        assert!((empty.percent() - 100.0).abs() < f64::EPSILON);
    }
}
