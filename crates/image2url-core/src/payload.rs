//! Payload resolution
//!
//! Turns one of the three accepted input shapes (remote URL, data URL, raw base64
//! plus filename) into a validated [`ImagePayload`]. Every check here runs before
//! any storage call is made.

use std::sync::LazyLock;

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use bytes::Bytes;
use regex::Regex;

use crate::classify::{is_allowed_image_type, mime_for, normalize_content_type};
use crate::error::{ToolError, ToolResult};
use crate::remote::RemoteImageClient;

/// Ceiling for inline (base64) payloads: 10 MiB.
pub const MAX_INLINE_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Content type assumed when a remote response carries none.
const DEFAULT_REMOTE_CONTENT_TYPE: &str = "image/jpeg";

static DATA_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^data:([^;]+);base64,(.+)$").expect("valid data URL regex"));

/// Standard alphabet, padding optional.
const BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Normalized, validated image bytes. `size` is always `bytes.len()`.
#[derive(Debug, Clone)]
pub struct ImagePayload {
    bytes: Bytes,
    content_type: String,
}

impl ImagePayload {
    pub fn new(bytes: impl Into<Bytes>, content_type: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            content_type: content_type.into(),
        }
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }
}

/// Fetch an image over HTTP.
///
/// No size ceiling is applied on this path, unlike inline data. Parameters such
/// as `; charset=...` are dropped from the content type before the allow-list check.
pub async fn resolve_from_url(
    client: &dyn RemoteImageClient,
    url: &str,
) -> ToolResult<ImagePayload> {
    let response = client.get(url).await?;

    if !response.is_success() {
        return Err(ToolError::http_status(response.status, &response.reason));
    }

    let content_type = response
        .header("content-type")
        .map(normalize_content_type)
        .unwrap_or_else(|| DEFAULT_REMOTE_CONTENT_TYPE.to_string());

    if !is_allowed_image_type(&content_type) {
        return Err(ToolError::UnsupportedType(content_type));
    }

    Ok(ImagePayload::new(response.body, content_type))
}

/// Resolve a data URL or raw base64 string. For raw base64 the type is derived
/// from `filename`.
pub fn resolve_inline(data: &str, filename: Option<&str>) -> ToolResult<ImagePayload> {
    resolve_encoded(data, filename.map(mime_for))
}

/// Same pipeline as [`resolve_inline`] with a mandatory filename. An explicit
/// `mime_type` replaces the filename-derived type for raw base64.
pub fn resolve_named_file(
    data: &str,
    filename: &str,
    mime_type: Option<&str>,
) -> ToolResult<ImagePayload> {
    let fallback = mime_type
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| mime_for(filename));
    resolve_encoded(data, Some(fallback))
}

fn resolve_encoded(data: &str, fallback_type: Option<&str>) -> ToolResult<ImagePayload> {
    let data = data.trim();

    let (content_type, encoded) = if data.starts_with("data:") {
        let captures = DATA_URL.captures(data).ok_or_else(|| {
            ToolError::Format(
                "Invalid data URL format, expected data:<mime>;base64,<payload>".to_string(),
            )
        })?;
        let mime = captures.get(1).map(|m| m.as_str());
        let payload = captures.get(2).map(|m| m.as_str()).unwrap_or_default();
        (mime, payload)
    } else {
        (fallback_type, data)
    };

    let content_type = content_type.ok_or_else(|| {
        ToolError::MissingContentType(
            "no data URL type and no filename to derive one from".to_string(),
        )
    })?;

    if !is_allowed_image_type(content_type) {
        return Err(ToolError::UnsupportedType(content_type.to_string()));
    }

    let bytes = decode_base64(encoded)?;

    if bytes.is_empty() {
        return Err(ToolError::EmptyPayload);
    }

    if bytes.len() > MAX_INLINE_IMAGE_BYTES {
        return Err(ToolError::SizeLimit(format!(
            "image is {}, maximum allowed size is {}",
            format_file_size(bytes.len() as u64),
            format_file_size(MAX_INLINE_IMAGE_BYTES as u64)
        )));
    }

    Ok(ImagePayload::new(bytes, content_type))
}

fn decode_base64(encoded: &str) -> ToolResult<Vec<u8>> {
    let compact: String = encoded
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    BASE64
        .decode(compact.as_bytes())
        .map_err(|e| ToolError::Format(format!("invalid base64 payload: {}", e)))
}

/// Human-readable byte size: `0 Bytes`, `512 Bytes`, `1.5 KB`, `10 MB`.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{:.2}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD;

    #[test]
    fn parses_data_url() {
        let payload = resolve_inline("data:image/png;base64,aGVsbG8=", None).unwrap();
        assert_eq!(payload.content_type(), "image/png");
        assert_eq!(payload.bytes().as_ref(), b"hello");
        assert_eq!(payload.size(), 5);
    }

    #[test]
    fn data_url_type_wins_over_filename() {
        let payload =
            resolve_inline("data:image/gif;base64,aGVsbG8=", Some("photo.png")).unwrap();
        assert_eq!(payload.content_type(), "image/gif");
    }

    #[test]
    fn raw_base64_uses_filename_type() {
        let payload = resolve_inline("aGVsbG8=", Some("shot.webp")).unwrap();
        assert_eq!(payload.content_type(), "image/webp");
        assert_eq!(payload.size(), 5);
    }

    #[test]
    fn raw_base64_tolerates_missing_padding_and_line_breaks() {
        let payload = resolve_inline("aGVs\nbG8", Some("a.png")).unwrap();
        assert_eq!(payload.bytes().as_ref(), b"hello");
    }

    #[test]
    fn malformed_data_url_is_a_format_error() {
        for data in [
            "data:image/png,aGVsbG8=",
            "data:;base64,aGVsbG8=",
            "data:image/png;base64,",
            "data:image/png;charset=utf-8;base64",
        ] {
            let err = resolve_inline(data, Some("a.png")).unwrap_err();
            assert!(matches!(err, ToolError::Format(_)), "{data}: {err:?}");
        }
    }

    #[test]
    fn invalid_base64_is_a_format_error() {
        let err = resolve_inline("not*base64!", Some("a.png")).unwrap_err();
        assert!(matches!(err, ToolError::Format(_)));
    }

    #[test]
    fn raw_base64_without_filename_has_no_type() {
        let err = resolve_inline("aGVsbG8=", None).unwrap_err();
        assert!(matches!(err, ToolError::MissingContentType(_)));
    }

    #[test]
    fn rejects_types_outside_allow_list() {
        let err = resolve_inline("data:text/html;base64,aGVsbG8=", None).unwrap_err();
        match err {
            ToolError::UnsupportedType(ty) => assert_eq!(ty, "text/html"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_payload_is_rejected() {
        for data in ["", "  \n "] {
            let err = resolve_inline(data, Some("a.png")).unwrap_err();
            assert!(matches!(err, ToolError::EmptyPayload), "{err:?}");
        }
    }

    #[test]
    fn size_ceiling_is_inclusive() {
        let at_limit = STANDARD.encode(vec![0u8; MAX_INLINE_IMAGE_BYTES]);
        let payload = resolve_inline(&at_limit, Some("big.png")).unwrap();
        assert_eq!(payload.size(), 10_485_760);

        let over_limit = STANDARD.encode(vec![0u8; MAX_INLINE_IMAGE_BYTES + 1]);
        let err = resolve_inline(&over_limit, Some("big.png")).unwrap_err();
        match err {
            ToolError::SizeLimit(msg) => assert!(msg.contains("10 MB"), "{msg}"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn named_file_mime_override() {
        let payload = resolve_named_file("aGVsbG8=", "a.jpg", Some("image/png")).unwrap();
        assert_eq!(payload.content_type(), "image/png");

        let payload = resolve_named_file("aGVsbG8=", "a.jpg", Some("  ")).unwrap();
        assert_eq!(payload.content_type(), "image/jpeg");

        let err = resolve_named_file("aGVsbG8=", "a.jpg", Some("video/mp4")).unwrap_err();
        assert!(matches!(err, ToolError::UnsupportedType(_)));
    }

    #[test]
    fn formats_sizes() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(1_048_576), "1 MB");
        assert_eq!(format_file_size(10 * 1024 * 1024), "10 MB");
        assert_eq!(format_file_size(1_288_490_189), "1.2 GB");
        assert_eq!(format_file_size(5 * 1024 * 1024 * 1024 * 1024), "5120 GB");
    }
}
