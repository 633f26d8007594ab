//! Storage-safe base names for uploaded objects.

use chrono::Utc;
use uuid::Uuid;

/// Generate `<unixMillis>-<uuidV4>-<cleanedHint>`.
///
/// Without a hint (or with an empty one) the last segment is the first 8 hex
/// characters of the same UUID. Uniqueness relies on the timestamp plus UUID
/// entropy; existing keys are not checked.
pub fn generate_base_name(hint: Option<&str>) -> String {
    let timestamp = Utc::now().timestamp_millis();
    let unique_id = Uuid::new_v4().to_string();

    let cleaned = match hint.filter(|h| !h.is_empty()) {
        Some(hint) => sanitize_hint(hint),
        None => unique_id[..8].to_string(),
    };

    format!("{}-{}-{}", timestamp, unique_id, cleaned)
}

/// Replace every character outside `[A-Za-z0-9-_]` with `-`, then lowercase.
///
/// Replacement is per Unicode scalar value, so an emoji becomes a single `-`.
pub fn sanitize_hint(hint: &str) -> String {
    hint.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect()
}

/// Drop a trailing `.ext` suffix (`ext` non-empty, without `.` or `/`).
pub fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) => {
            let ext = &name[idx + 1..];
            if ext.is_empty() || ext.contains('/') {
                name
            } else {
                &name[..idx]
            }
        }
        None => name,
    }
}
