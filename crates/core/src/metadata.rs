//! Upload-Metadata header encoding.
//!
//! The creation request describes the file in a single delimited header
//! value: each field is independently base64-encoded and entries are
//! joined as `name base64value,name base64value`. Neither field names nor
//! base64 output contain the space or comma delimiters, so the format
//! needs no escaping.

use crate::{Error, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

/// Attributes sent with the upload-creation request.
///
/// `filename` and `key` are always present; `parent` (the destination
/// folder identifier) only when one was configured.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadMetadata {
    filename: String,
    key: String,
    parent: Option<String>,
}

impl UploadMetadata {
    /// Build metadata for one upload. Fails if filename or key is empty.
    pub fn new(filename: &str, key: &str, parent: Option<&str>) -> Result<Self> {
        if filename.is_empty() {
            return Err(Error::InvalidMetadata("filename must not be empty".into()));
        }
        if key.is_empty() {
            return Err(Error::InvalidMetadata("key must not be empty".into()));
        }
        Ok(Self {
            filename: filename.to_string(),
            key: key.to_string(),
            parent: parent.map(|p| p.to_string()),
        })
    }

    /// Encode as the Upload-Metadata header value.
    pub fn encode(&self) -> String {
        let mut entries = vec![
            format!("filename {}", BASE64.encode(&self.filename)),
            format!("key {}", BASE64.encode(&self.key)),
        ];
        if let Some(parent) = &self.parent {
            entries.push(format!("parent {}", BASE64.encode(parent)));
        }
        entries.join(",")
    }

    /// Parse a header value back into `(name, bytes)` pairs.
    pub fn decode(header: &str) -> Result<Vec<(String, Vec<u8>)>> {
        header
            .split(',')
            .map(|entry| {
                let (name, value) = entry
                    .split_once(' ')
                    .ok_or_else(|| Error::InvalidMetadata(format!("malformed entry: {entry}")))?;
                let bytes = BASE64
                    .decode(value)
                    .map_err(|e| Error::InvalidMetadata(format!("bad base64 in {name}: {e}")))?;
                Ok((name.to_string(), bytes))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_without_parent() {
        let metadata = UploadMetadata::new("hello.bin", "secret", None).unwrap();
        let header = metadata.encode();
        assert_eq!(header, "filename aGVsbG8uYmlu,key c2VjcmV0");
    }

    #[test]
    fn test_encode_with_parent() {
        let metadata = UploadMetadata::new("a.txt", "k", Some("folder-1")).unwrap();
        let header = metadata.encode();
        let entries: Vec<_> = header.split(',').collect();
        assert_eq!(entries.len(), 3);
        assert!(entries[2].starts_with("parent "));
    }

    #[test]
    fn test_roundtrip_preserves_bytes() {
        let metadata = UploadMetadata::new("räksmörgås.txt", "key with spaces", None).unwrap();
        let decoded = UploadMetadata::decode(&metadata.encode()).unwrap();
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[0].0, "filename");
        assert_eq!(decoded[0].1, "räksmörgås.txt".as_bytes());
        assert_eq!(decoded[1].0, "key");
        assert_eq!(decoded[1].1, b"key with spaces");
    }

    #[test]
    fn test_empty_fields_rejected() {
        assert!(UploadMetadata::new("", "key", None).is_err());
        assert!(UploadMetadata::new("file", "", None).is_err());
    }

    #[test]
    fn test_decode_rejects_malformed_entries() {
        assert!(UploadMetadata::decode("filename").is_err());
        assert!(UploadMetadata::decode("filename not-base64!").is_err());
    }
}
