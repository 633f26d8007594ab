//! Payload fixtures

use std::collections::HashMap;

use bytes::Bytes;
use image2url_core::RemoteResponse;

/// JPEG start-of-image marker.
pub const JPEG_MAGIC: [u8; 3] = [0xFF, 0xD8, 0xFF];

/// `JPEG_MAGIC` in base64.
pub const JPEG_MAGIC_B64: &str = "/9j/";

pub fn ok_response(content_type: &str, body: &'static [u8]) -> RemoteResponse {
    RemoteResponse {
        status: 200,
        reason: "OK".to_string(),
        headers: HashMap::from([("content-type".to_string(), content_type.to_string())]),
        body: Bytes::from_static(body),
    }
}

pub fn status_response(status: u16, reason: &str) -> RemoteResponse {
    RemoteResponse {
        status,
        reason: reason.to_string(),
        ..Default::default()
    }
}
