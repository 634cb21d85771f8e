//! Image MIME types by file extension.

use std::path::Path;

/// Used when the extension is missing or not a known image type.
pub const DEFAULT_MIME: &str = "image/png";

/// MIME type for an image path, chosen by its (case-insensitive) extension.
///
/// ```
/// use std::path::Path;
/// use richpaste_assets::mime_for;
///
/// assert_eq!(mime_for(Path::new("photo.JPG")), "image/jpeg");
/// assert_eq!(mime_for(Path::new("notes.txt")), "image/png");
/// ```
#[must_use]
pub fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("ico") => "image/x-icon",
        Some("avif") => "image/avif",
        _ => DEFAULT_MIME,
    }
}
