//! Image media handling
//!
//! Image items embed their bytes as a data URI
//! (`data:image/png;base64,iVBORw0...`), so a stored list never points at
//! external storage.

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Recognize an image by its leading bytes, falling back to the file
/// extension for formats without a binary signature (SVG).
///
/// Anything `image` can identify with an `image/*` media type is accepted.
pub fn sniff_image_type(bytes: &[u8], path: Option<&Path>) -> Option<&'static str> {
    if let Ok(format) = image::guess_format(bytes) {
        let mime = format.to_mime_type();
        if mime.starts_with("image/") {
            return Some(mime);
        }
    }

    let ext = path?.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "svg" | "svgz" => Some("image/svg+xml"),
        _ => None,
    }
}

/// Encode bytes as a base64 data URI
pub fn encode_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// A decoded data URI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Decode a base64 data URI
///
/// Returns `None` for anything that isn't `data:<mime>;base64,<payload>`.
pub fn decode_data_uri(uri: &str) -> Option<DataUri> {
    let rest = uri.strip_prefix("data:")?;
    let (meta, payload) = rest.split_once(',')?;
    let mime = meta.strip_suffix(";base64")?;
    let bytes = STANDARD.decode(payload.trim()).ok()?;

    Some(DataUri {
        mime: mime.to_string(),
        bytes,
    })
}

/// Media type and decoded size of a data URI, without decoding it
pub fn describe_data_uri(uri: &str) -> Option<(&str, usize)> {
    let rest = uri.strip_prefix("data:")?;
    let (meta, payload) = rest.split_once(',')?;
    let mime = meta.strip_suffix(";base64")?;
    let padding = payload.bytes().rev().take_while(|b| *b == b'=').count();
    let size = ((payload.len() / 4) * 3).saturating_sub(padding.min(2));
    Some((mime, size))
}

/// Human-readable byte size
pub fn human_size(bytes: usize) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else if bytes >= 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{} B", bytes)
    }
}
