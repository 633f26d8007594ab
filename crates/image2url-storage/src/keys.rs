//! Shared key generation for storage backends.
//!
//! Key format: uploads live under `images/`, health probes under `temp/`.

use image2url_core::constants::{IMAGES_PREFIX, TEMP_PREFIX};
use url::Url;

use crate::traits::{StorageError, StorageResult};

/// `images/{base_name}.{extension}`
pub fn image_key(base_name: &str, extension: &str) -> String {
    format!("{}/{}.{}", IMAGES_PREFIX, base_name, extension)
}

/// `temp/health-check-{unix_millis}.txt`
pub fn health_probe_key(unix_millis: i64) -> String {
    format!("{}/health-check-{}.txt", TEMP_PREFIX, unix_millis)
}

/// Recover the storage key from a public URL: its path with the leading `/`
/// removed. Host, query and fragment are ignored; the path is not decoded.
pub fn key_from_public_url(public_url: &str) -> StorageResult<String> {
    let url = Url::parse(public_url)
        .map_err(|e| StorageError::InvalidKey(format!("{}: {}", public_url, e)))?;

    Ok(url
        .path()
        .strip_prefix('/')
        .unwrap_or(url.path())
        .to_string())
}
