//! Storage abstraction trait
//!
//! This module defines the Storage trait that every backend implements.

use std::collections::BTreeMap;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, SecondsFormat, Utc};
use image2url_core::ToolError;
use thiserror::Error;

/// Cache policy attached to every stored object.
pub const CACHE_CONTROL: &str = "public, max-age=31536000";

/// Metadata tag recording when the object was written.
pub const UPLOAD_TIME_TAG: &str = "upload-time";

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("{0}")]
    WriteFailed(String),

    #[error("{0}")]
    ReadFailed(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for ToolError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::WriteFailed(msg) => ToolError::StorageWrite(msg),
            StorageError::NotFound(key) => ToolError::NotFound(key),
            StorageError::ConfigError(_) => ToolError::StorageWrite(err.to_string()),
            StorageError::ReadFailed(msg) => ToolError::StorageRead(msg),
            StorageError::InvalidKey(_) => ToolError::InvalidArguments(err.to_string()),
        }
    }
}

/// Key and public URL of an object that has just been written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutOutcome {
    pub key: String,
    pub url: String,
}

/// What a HEAD on a stored object reports
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectInfo {
    pub size: Option<u64>,
    pub content_type: Option<String>,
    pub cache_control: Option<String>,
    pub last_modified: Option<DateTime<Utc>>,
    pub metadata: BTreeMap<String, String>,
}

/// Storage abstraction trait
///
/// Keys are opaque to backends; see the crate root for the layout handlers use.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Write `data` under `key` and return its public URL.
    ///
    /// The object is durable once this returns. Backends attach
    /// [`CACHE_CONTROL`] and add an `upload-time` tag to `metadata`.
    async fn put(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
        metadata: &BTreeMap<String, String>,
    ) -> StorageResult<PutOutcome>;

    /// Read object attributes without the body.
    async fn head(&self, key: &str) -> StorageResult<ObjectInfo>;

    /// Public URL for a key. Pure string join.
    fn public_url(&self, key: &str) -> String;
}

/// Copy of `metadata` with the `upload-time` tag set to `now`.
pub fn stamp_upload_time(
    metadata: &BTreeMap<String, String>,
    now: DateTime<Utc>,
) -> BTreeMap<String, String> {
    let mut tags = metadata.clone();
    tags.insert(
        UPLOAD_TIME_TAG.to_string(),
        now.to_rfc3339_opts(SecondsFormat::Millis, true),
    );
    tags
}

/// Join a public base URL and a key with exactly one `/`.
pub fn join_public_url(base: &str, key: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        key.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn errors_convert_with_context() {
        let err: ToolError = StorageError::WriteFailed("connection reset".to_string()).into();
        assert_eq!(err.to_string(), "R2 upload failed: connection reset");

        let err: ToolError = StorageError::ReadFailed("timeout".to_string()).into();
        assert_eq!(err.to_string(), "Failed to get file info: timeout");

        let err: ToolError = StorageError::NotFound("images/a.png".to_string()).into();
        assert!(matches!(err, ToolError::NotFound(_)));

        let err: ToolError = StorageError::InvalidKey("images//a.png".to_string()).into();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[test]
    fn upload_time_is_added_without_touching_other_tags() {
        let tags = BTreeMap::from([("upload-source".to_string(), "url".to_string())]);
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let stamped = stamp_upload_time(&tags, at);
        assert_eq!(stamped["upload-source"], "url");
        assert_eq!(stamped[UPLOAD_TIME_TAG], "2024-03-01T12:00:00.000Z");
        assert_eq!(tags.len(), 1);
    }

    #[test]
    fn public_url_join() {
        assert_eq!(
            join_public_url("https://cdn.example.com/", "images/a.png"),
            "https://cdn.example.com/images/a.png"
        );
        assert_eq!(
            join_public_url("https://cdn.example.com", "images/a.png"),
            "https://cdn.example.com/images/a.png"
        );
    }
}
