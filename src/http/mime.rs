//! MIME type detection module
//!
//! Maps a file name to a Content-Type through a fixed extension table.

use std::path::Path;

/// Fallback for names without a known extension.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Extension table, keys lower-case and without the leading dot.
pub const MIME_TABLE: &[(&str, &str)] = &[
    // Text
    ("html", "text/html; charset=UTF-8"),
    ("htm", "text/html; charset=UTF-8"),
    ("css", "text/css"),
    ("txt", "text/plain; charset=UTF-8"),
    // Scripts and data
    ("js", "application/javascript"),
    ("json", "application/json"),
    // Images
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("ico", "image/x-icon"),
    ("svg", "image/svg+xml"),
    ("webp", "image/webp"),
    // Media
    ("mp4", "video/mp4"),
    ("webm", "video/webm"),
    ("mp3", "audio/mpeg"),
    // Fonts
    ("woff", "font/woff"),
    ("woff2", "font/woff2"),
];

/// Get the Content-Type for a file name based on its extension
///
/// Matching is case-insensitive. Only the final extension counts, so
/// `clip.tar.mp4` resolves as `mp4`.
///
/// # Examples
/// ```
/// use mediaserve::http::mime::content_type_for;
/// assert_eq!(content_type_for("index.html"), "text/html; charset=UTF-8");
/// assert_eq!(content_type_for("movie.MP4"), "video/mp4");
/// assert_eq!(content_type_for("notes"), "application/octet-stream");
/// ```
pub fn content_type_for(file_name: &str) -> &'static str {
    let Some(ext) = Path::new(file_name).extension().and_then(|e| e.to_str()) else {
        return DEFAULT_CONTENT_TYPE;
    };

    MIME_TABLE
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(ext))
        .map_or(DEFAULT_CONTENT_TYPE, |(_, content_type)| content_type)
}
