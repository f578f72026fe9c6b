//! Upload decoding and validation.
//!
//! Uploads are accepted as PNG or JPEG only. Decoding failures are ordinary
//! errors for the caller to report per upload; nothing here is fatal to the
//! process.

use anyhow::{bail, Context, Result};
use image::DynamicImage;

/// Supported upload extensions.
const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];
/// Supported upload MIME types.
const SUPPORTED_CONTENT_TYPES: &[&str] = &["image/png", "image/jpeg"];

/// Checks a filename against the extension allowlist (case-insensitive).
#[must_use]
pub fn is_supported_name(name: &str) -> bool {
    std::path::Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .is_some_and(|e| SUPPORTED_EXTENSIONS.contains(&e.as_str()))
}

/// Checks a MIME type against the allowlist.
#[must_use]
pub fn is_supported_content_type(content_type: &str) -> bool {
    SUPPORTED_CONTENT_TYPES.contains(&content_type)
}

/// Decodes upload bytes into an image.
///
/// When a filename is available its extension is checked first, so an
/// obviously wrong file is rejected without sniffing bytes.
///
/// # Errors
///
/// Returns an error if the name has an unsupported extension or the bytes do
/// not decode as an image.
pub fn decode_upload(bytes: &[u8], name: Option<&str>) -> Result<DynamicImage> {
    if let Some(name) = name {
        if !is_supported_name(name) {
            bail!("Unsupported file type: {name} (expected PNG or JPEG)");
        }
    }

    let label = name.unwrap_or("upload");
    image::load_from_memory(bytes).with_context(|| format!("Failed to decode image: {label}"))
}
