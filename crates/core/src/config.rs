//! Client configuration types.
//!
//! The CLI loads this from a TOML file merged with `DRIVECTL_`-prefixed
//! environment variables, then applies command-line overrides.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Client configuration for one upload invocation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Drive API base URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Key-service base URL.
    #[serde(default = "default_kms_url")]
    pub kms_url: String,
    /// Destination folder identifier. Included in the upload metadata as
    /// the `parent` field only when set.
    #[serde(default)]
    pub parent_id: Option<String>,
    /// Chunk size in bytes.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: u64,
    /// Path of the token file holding the access/refresh token pair.
    #[serde(default = "default_token_file")]
    pub token_file: PathBuf,
}

fn default_api_url() -> String {
    "https://drive-api.neova.io".to_string()
}

fn default_kms_url() -> String {
    "https://kms-api.neova.io".to_string()
}

fn default_chunk_size() -> u64 {
    crate::DEFAULT_CHUNK_SIZE
}

fn default_token_file() -> PathBuf {
    PathBuf::from("token.txt")
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            kms_url: default_kms_url(),
            parent_id: None,
            chunk_size: default_chunk_size(),
            token_file: default_token_file(),
        }
    }
}

impl ClientConfig {
    /// Validate field values after all override layers are applied.
    pub fn validate(&self) -> crate::Result<()> {
        crate::validate_chunk_size(self.chunk_size)?;
        for (name, url) in [("api_url", &self.api_url), ("kms_url", &self.kms_url)] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(crate::Error::InvalidConfig(format!(
                    "{name} must start with http:// or https://"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ClientConfig::default();
        config.validate().unwrap();
        assert_eq!(config.chunk_size, crate::DEFAULT_CHUNK_SIZE);
        assert!(config.parent_id.is_none());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = ClientConfig {
            chunk_size: 1,
            ..ClientConfig::default()
        };
        assert!(config.validate().is_err());

        let config = ClientConfig {
            api_url: "ftp://example.com".into(),
            ..ClientConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deserialize_with_partial_fields() {
        let config: ClientConfig = serde_json::from_str(r#"{"parent_id": "folder-9"}"#).unwrap();
        assert_eq!(config.api_url, default_api_url());
        assert_eq!(config.parent_id.as_deref(), Some("folder-9"));
        assert_eq!(config.chunk_size, crate::DEFAULT_CHUNK_SIZE);
    }
}
