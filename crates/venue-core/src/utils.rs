//! Small helpers for uploads, search and export naming

use chrono::{DateTime, Utc};
use std::path::Path;

/// Image extensions accepted for listing uploads
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif"];

/// Validate file extension
#[must_use]
pub fn validate_file_extension(filename: &str, allowed: &[&str]) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| allowed.iter().any(|allowed| allowed.eq_ignore_ascii_case(ext)))
}

/// Sanitize filename for safe storage
#[must_use]
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| match c {
            c if c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-' => c,
            _ => '_',
        })
        .collect::<String>()
        .trim_matches('_')
        .to_string()
}

/// Unique object path for an upload: `<folder>/<uuid>.<ext>`
#[must_use]
pub fn storage_object_path(folder: &str, original: &str) -> String {
    let uuid = uuid::Uuid::new_v4();
    let extension = Path::new(original)
        .extension()
        .and_then(|ext| ext.to_str())
        .map_or_else(|| "bin".to_string(), str::to_ascii_lowercase);
    let folder = sanitize_filename(folder.trim_matches('/'));
    // No `..` or hidden segments in the bucket
    let folder = folder.trim_start_matches(['.', '_']);

    if folder.is_empty() {
        format!("{uuid}.{extension}")
    } else {
        format!("{folder}/{uuid}.{extension}")
    }
}

/// Strip characters with meaning inside a REST `or=(...)` filter
#[must_use]
pub fn sanitize_search_term(term: &str) -> String {
    term.chars()
        .filter(|c| !matches!(c, ',' | '(' | ')' | '*' | '"' | '\\'))
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Download name for a table export, e.g. `restaurants_20240601_120000.xlsx`
#[must_use]
pub fn export_filename(stem: &str, extension: &str, at: &DateTime<Utc>) -> String {
    format!(
        "{}_{}.{extension}",
        sanitize_filename(stem),
        at.format("%Y%m%d_%H%M%S")
    )
}
