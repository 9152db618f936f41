//! Object key generation for uploads.

/// Prefix under which browser uploads are stored.
pub const UPLOAD_KEY_PREFIX: &str = "videos/";

/// Replace every character outside `[A-Za-z0-9._-]` with `_`.
pub fn sanitize_file_name(file_name: &str) -> String {
    file_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Build `{prefix}{timestamp_ms}_{sanitized name}`.
pub fn upload_key(prefix: &str, file_name: &str, timestamp_ms: i64) -> String {
    format!("{}{}_{}", prefix, timestamp_ms, sanitize_file_name(file_name))
}

/// Upload key under [`UPLOAD_KEY_PREFIX`] stamped with the current time.
pub fn new_upload_key(file_name: &str) -> (String, i64) {
    let timestamp_ms = chrono::Utc::now().timestamp_millis();
    (upload_key(UPLOAD_KEY_PREFIX, file_name, timestamp_ms), timestamp_ms)
}
