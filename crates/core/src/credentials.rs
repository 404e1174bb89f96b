//! Access credentials loaded from the local token store.

use crate::{Error, Result};
use serde::Deserialize;
use std::fmt;

/// An access/refresh token pair read from the token file.
///
/// Read-only input: this client never renews or rewrites tokens. The
/// refresh token is carried only so a malformed store is caught up front.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    access_token: String,
    refresh_token: String,
}

impl Credentials {
    /// Parse the token-file contents (JSON with `access_token` and
    /// `refresh_token`). Missing or empty fields are rejected before any
    /// network activity happens.
    pub fn from_json(contents: &str) -> Result<Self> {
        let credentials: Credentials = serde_json::from_str(contents)
            .map_err(|e| Error::InvalidCredentials(format!("malformed token file: {e}")))?;
        if credentials.access_token.is_empty() || credentials.refresh_token.is_empty() {
            return Err(Error::InvalidCredentials(
                "access_token and refresh_token must be non-empty".into(),
            ));
        }
        Ok(credentials)
    }

    /// The bearer token sent on every request.
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// The refresh token (unused by this client).
    pub fn refresh_token(&self) -> &str {
        &self.refresh_token
    }
}

// Token values must never end up in logs or error output.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}
