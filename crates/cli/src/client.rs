//! HTTP client for the drive upload and key-service endpoints.
//!
//! Speaks the resumable-upload protocol: a creation POST that carries the
//! file length and metadata in headers, followed by offset-tracked PATCH
//! chunk transfers against the session URL the server handed back.

use crate::error::{Result, UploadError};
use drivectl_core::{Chunk, TUS_RESUMABLE_VERSION, UploadMetadata};
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{Response, StatusCode, Url};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

const TUS_RESUMABLE: &str = "Tus-Resumable";
const UPLOAD_LENGTH: &str = "Upload-Length";
const UPLOAD_METADATA: &str = "Upload-Metadata";
const UPLOAD_OFFSET: &str = "Upload-Offset";
const LOCATION: &str = "Location";

/// Content type required on chunk PATCH requests.
const OFFSET_OCTET_STREAM: &str = "application/offset+octet-stream";

/// Per-request timeout. The service sends no keepalive, so an unresponsive
/// endpoint must not hang the client forever.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// A freshly created upload session as reported by the server.
#[derive(Clone, Debug)]
pub struct CreatedSession {
    /// Session endpoint for chunk transfers, resolved to an absolute URL.
    pub upload_url: String,
    /// File size announced in the creation request.
    pub total_size: u64,
}

#[derive(Debug, Deserialize)]
struct KeyResponse {
    #[serde(default)]
    key: Option<String>,
}

/// Authenticated client for one drive account.
#[derive(Clone)]
pub struct UploadClient {
    http: reqwest::Client,
    api_url: Url,
    kms_url: Url,
    token: String,
}

impl UploadClient {
    pub fn new(api_url: &str, kms_url: &str, token: &str) -> Result<Self> {
        let api_url = Url::parse(api_url)
            .map_err(|e| UploadError::Config(format!("invalid API URL: {e}")))?;
        let kms_url = Url::parse(kms_url)
            .map_err(|e| UploadError::Config(format!("invalid key-service URL: {e}")))?;
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            api_url,
            kms_url,
            token: token.to_string(),
        })
    }

    /// Fetch the per-file encryption key for the authenticated user.
    ///
    /// 401 means the token is invalid or expired; any other non-success
    /// status is a protocol failure. A success body without a `key` field
    /// is treated as failed.
    pub async fn fetch_file_key(&self) -> Result<String> {
        let url = self
            .kms_url
            .join("/keys/me")
            .map_err(|e| UploadError::Config(format!("invalid key-service URL: {e}")))?;
        let response = self.http.get(url).bearer_auth(&self.token).send().await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(UploadError::Auth("invalid or expired access token".into()));
        }
        if !response.status().is_success() {
            return Err(unexpected_status(response).await);
        }

        let body: KeyResponse = response.json().await?;
        match body.key {
            Some(key) if !key.is_empty() => {
                tracing::debug!("obtained file key");
                Ok(key)
            }
            _ => Err(UploadError::KeyUnavailable(
                "response contained no key field".into(),
            )),
        }
    }

    /// Create an upload session for the file at `path`.
    ///
    /// The creation POST carries no body; the file length and metadata
    /// travel in headers. The server must answer 201 with a Location
    /// header naming the session. A 201 without a Location is rejected
    /// rather than silently accepted.
    pub async fn create_upload(
        &self,
        path: &Path,
        key: &str,
        parent: Option<&str>,
    ) -> Result<CreatedSession> {
        let total_size = tokio::fs::metadata(path).await?.len();
        let filename = file_basename(path)?;
        let metadata = UploadMetadata::new(&filename, key, parent)?;

        let url = self
            .api_url
            .join("/files/upload")
            .map_err(|e| UploadError::Config(format!("invalid API URL: {e}")))?;
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.token)
            .header(TUS_RESUMABLE, TUS_RESUMABLE_VERSION)
            .header(UPLOAD_LENGTH, total_size.to_string())
            .header(UPLOAD_METADATA, metadata.encode())
            .header(CONTENT_LENGTH, "0")
            .send()
            .await?;

        if response.status() != StatusCode::CREATED {
            return Err(unexpected_status(response).await);
        }

        let location = header_str(&response, LOCATION)?;
        // Servers may return a session location relative to the API base.
        let upload_url = self
            .api_url
            .join(location)
            .map_err(|_| UploadError::MalformedHeader {
                name: LOCATION,
                value: location.to_string(),
            })?;

        tracing::debug!(url = %upload_url, size = total_size, "upload session created");
        Ok(CreatedSession {
            upload_url: upload_url.into(),
            total_size,
        })
    }

    /// Send one chunk and return the server-acknowledged cumulative offset.
    ///
    /// The reported offset must equal `chunk.expected_offset()`; a partial
    /// acceptance would otherwise silently lose data on the next chunk.
    pub async fn upload_chunk(&self, upload_url: &str, chunk: &Chunk) -> Result<u64> {
        let response = self
            .http
            .patch(upload_url)
            .bearer_auth(&self.token)
            .header(TUS_RESUMABLE, TUS_RESUMABLE_VERSION)
            .header(UPLOAD_OFFSET, chunk.offset().to_string())
            .header(CONTENT_TYPE, OFFSET_OCTET_STREAM)
            .header(CONTENT_LENGTH, chunk.len().to_string())
            .body(chunk.data().clone())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(unexpected_status(response).await);
        }

        let value = header_str(&response, UPLOAD_OFFSET)?;
        let new_offset: u64 = value.parse().map_err(|_| UploadError::MalformedHeader {
            name: UPLOAD_OFFSET,
            value: value.to_string(),
        })?;

        if new_offset != chunk.expected_offset() {
            return Err(UploadError::OffsetMismatch {
                expected: chunk.expected_offset(),
                actual: new_offset,
            });
        }
        Ok(new_offset)
    }
}

async fn unexpected_status(response: Response) -> UploadError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    UploadError::UnexpectedStatus { status, body }
}

fn header_str<'r>(response: &'r Response, name: &'static str) -> Result<&'r str> {
    let value = response
        .headers()
        .get(name)
        .ok_or(UploadError::MissingHeader(name))?;
    value.to_str().map_err(|_| UploadError::MalformedHeader {
        name,
        value: format!("{value:?}"),
    })
}

fn file_basename(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.to_string())
        .ok_or_else(|| UploadError::Config(format!("path {} has no usable file name", path.display())))
}
