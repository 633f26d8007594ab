//! Content classification for image payloads
//!
//! Two independent lookup tables map a MIME type to a file extension and a file
//! extension to a MIME type. They are not inverses of each other: `jpeg` and `jpg`
//! both map to `image/jpeg`, which maps back to `jpg`; `tif` maps to `image/tiff`,
//! which maps back to `tiff`.

/// MIME types accepted for ingestion
pub const ALLOWED_IMAGE_TYPES: [&str; 9] = [
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
    "image/svg+xml",
    "image/bmp",
    "image/tiff",
    "image/x-icon",
];

/// Canonical file extension for a content type.
///
/// Unknown types fall back to `jpg`. The fallback says nothing about whether the
/// type is acceptable; check [`is_allowed_image_type`] for that.
pub fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/svg+xml" => "svg",
        "image/bmp" => "bmp",
        "image/tiff" => "tiff",
        "image/x-icon" => "ico",
        _ => "jpg",
    }
}

/// Content type for a filename, keyed on the lowercased text after the last `.`.
///
/// Unknown extensions fall back to `image/jpeg`.
pub fn mime_for(filename: &str) -> &'static str {
    let extension = filename
        .rsplit('.')
        .next()
        .unwrap_or(filename)
        .to_lowercase();

    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        "tiff" | "tif" => "image/tiff",
        "ico" => "image/x-icon",
        _ => "image/jpeg",
    }
}

pub fn is_allowed_image_type(content_type: &str) -> bool {
    !content_type.is_empty() && ALLOWED_IMAGE_TYPES.contains(&content_type)
}

/// Normalize a `Content-Type` header value by stripping parameters
/// (e.g. "image/jpeg; charset=binary" -> "image/jpeg").
pub fn normalize_content_type(header: &str) -> String {
    header
        .split(';')
        .next()
        .unwrap_or(header)
        .trim()
        .to_lowercase()
}
