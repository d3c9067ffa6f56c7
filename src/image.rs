//! Image files as embeddable data URIs.
//!
//! Descriptions reference images either by URL or by a `data:` URI built
//! from a local file, so a screenshot can be pasted into the description
//! without separate hosting.

use std::path::Path;

use anyhow::{Context, Result};
use base64::Engine;

/// Image extensions and their MIME types.
const IMAGE_TYPES: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("bmp", "image/bmp"),
    ("svg", "image/svg+xml"),
    ("avif", "image/avif"),
    ("ico", "image/x-icon"),
    ("tif", "image/tiff"),
    ("tiff", "image/tiff"),
];

/// MIME type for an image path, by extension (case-insensitive).
pub fn mime_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    IMAGE_TYPES
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, mime)| *mime)
}

/// Returns true if the file extension is a recognized image format.
pub fn is_image_file(path: &Path) -> bool {
    mime_type_for(path).is_some()
}

/// Encode bytes as a `data:` URI.
pub fn data_uri(mime: &str, bytes: &[u8]) -> String {
    let payload = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{mime};base64,{payload}")
}

/// Read an image file and encode it as a `data:` URI.
///
/// # Errors
/// Fails when the extension is not a known image type or the file cannot
/// be read.
pub fn data_uri_for_file(path: &Path) -> Result<String> {
    let mime = mime_type_for(path)
        .with_context(|| format!("Not a supported image file: {}", path.display()))?;
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read image {}", path.display()))?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), mime, "encoded image");
    Ok(data_uri(mime, &bytes))
}

/// The MIME type of a `data:` URI, if `source_ref` is one.
pub fn data_uri_mime(source_ref: &str) -> Option<&str> {
    let rest = source_ref.strip_prefix("data:")?;
    let end = rest.find([';', ','])?;
    Some(&rest[..end])
}
