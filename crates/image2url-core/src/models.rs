//! Request and response models shared by every transport

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ToolError, ToolResult};
use crate::naming::strip_extension;
use crate::payload::{self, ImagePayload};
use crate::remote::RemoteImageClient;

/// Where an upload came from; recorded in the `upload-source` metadata tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadSource {
    Url,
    Base64,
    DirectFile,
}

impl UploadSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadSource::Url => "url",
            UploadSource::Base64 => "base64",
            UploadSource::DirectFile => "direct_file",
        }
    }
}

impl fmt::Display for UploadSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One ingestion request; exactly one variant per tool call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadRequest {
    FromUrl {
        url: String,
        filename: Option<String>,
    },
    FromInlineData {
        data: String,
        filename: Option<String>,
    },
    FromNamedFile {
        data: String,
        filename: String,
        mime_type: Option<String>,
    },
}

impl UploadRequest {
    /// Pick the variant for `upload_image` arguments: a URL wins, otherwise both
    /// inline data and a filename are required.
    pub fn from_upload_args(
        image_url: Option<String>,
        image_data: Option<String>,
        filename: Option<String>,
    ) -> ToolResult<Self> {
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

        match (
            non_empty(image_url),
            non_empty(image_data),
            non_empty(filename),
        ) {
            (Some(url), _, filename) => Ok(UploadRequest::FromUrl { url, filename }),
            (None, Some(data), Some(filename)) => Ok(UploadRequest::FromInlineData {
                data,
                filename: Some(filename),
            }),
            _ => Err(ToolError::InvalidArguments(
                "Either image_url or (image_data and filename) must be provided".to_string(),
            )),
        }
    }

    pub fn source(&self) -> UploadSource {
        match self {
            UploadRequest::FromUrl { .. } => UploadSource::Url,
            UploadRequest::FromInlineData { .. } => UploadSource::Base64,
            UploadRequest::FromNamedFile { .. } => UploadSource::DirectFile,
        }
    }

    /// Name hint for the filename generator, with any trailing extension removed.
    pub fn name_hint(&self) -> Option<&str> {
        let filename = match self {
            UploadRequest::FromUrl { filename, .. } => filename.as_deref(),
            UploadRequest::FromInlineData { filename, .. } => filename.as_deref(),
            UploadRequest::FromNamedFile { filename, .. } => Some(filename.as_str()),
        };
        filename.map(strip_extension).filter(|h| !h.is_empty())
    }

    /// Run the payload resolver matching this variant.
    pub async fn resolve(&self, client: &dyn RemoteImageClient) -> ToolResult<ImagePayload> {
        match self {
            UploadRequest::FromUrl { url, .. } => payload::resolve_from_url(client, url).await,
            UploadRequest::FromInlineData { data, filename } => {
                payload::resolve_inline(data, filename.as_deref())
            }
            UploadRequest::FromNamedFile {
                data,
                filename,
                mime_type,
            } => payload::resolve_named_file(data, filename, mime_type.as_deref()),
        }
    }

    /// Metadata tags written alongside the object. `base_name` is the generated
    /// storage base name.
    pub fn metadata(&self, base_name: &str) -> BTreeMap<String, String> {
        let mut tags = BTreeMap::new();
        match self {
            UploadRequest::FromUrl { url, filename } => {
                tags.insert("original-url".to_string(), url.clone());
                tags.insert(
                    "custom-filename".to_string(),
                    filename.clone().unwrap_or_default(),
                );
            }
            UploadRequest::FromInlineData { filename, .. } => {
                tags.insert(
                    "original-filename".to_string(),
                    filename.clone().unwrap_or_default(),
                );
                tags.insert("custom-filename".to_string(), base_name.to_string());
            }
            UploadRequest::FromNamedFile { filename, .. } => {
                tags.insert("original-filename".to_string(), filename.clone());
                tags.insert("custom-filename".to_string(), base_name.to_string());
            }
        }
        tags.insert("upload-source".to_string(), self.source().to_string());
        tags
    }
}

/// Result of `upload_image` / `upload_file`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub success: bool,
    pub url: String,
    /// Storage key of the object
    pub filename: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub content_type: String,
    pub uploaded_at: String,
}

/// Result of `get_image_info`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInfoResponse {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_control: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
}

/// ISO 8601 timestamp with millisecond precision and a `Z` suffix.
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// HTTP date format (`Tue, 15 Nov 1994 08:12:31 GMT`).
pub fn http_date(at: DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}
