//! Share links and QR codes
//!
//! A shared list is reachable at `<origin>/list/<id>`. The QR code is
//! not generated locally: we build a request URL for an external image
//! service that encodes the share URL, e.g.
//!
//! ```text
//! https://api.qrserver.com/v1/create-qr-code/?size=300x300&data=https%3A%2F%2Fexample.com%2Flist%2Fabc
//! ```
//!
//! Sharing itself prefers the platform share sheet and falls back to
//! copying the link to the clipboard.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use thiserror::Error;
use tracing::debug;

use crate::config::Config;
use crate::document::ListDocument;
use crate::list_id::{ListId, ListIdError};

/// Path prefix of the public view route
pub const LIST_PATH: &str = "/list/";

/// Characters left unescaped by `encodeURIComponent`
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Builds share and QR image URLs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareLinks {
    origin: String,
    qr_endpoint: String,
    qr_size: u32,
}

impl ShareLinks {
    pub fn new(origin: impl Into<String>, qr_endpoint: impl Into<String>, qr_size: u32) -> Self {
        let origin = origin.into();
        Self {
            origin: origin.trim_end_matches('/').to_string(),
            qr_endpoint: qr_endpoint.into(),
            qr_size,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.origin, &config.qr_service_url, config.qr_size)
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Public URL of a stored list
    pub fn to_share_url(&self, id: &ListId) -> String {
        format!("{}{}{}", self.origin, LIST_PATH, id)
    }

    /// QR image service URL encoding `share_url`
    pub fn to_qr_image_url(&self, share_url: &str) -> String {
        format!(
            "{}?size={}x{}&data={}",
            self.qr_endpoint,
            self.qr_size,
            self.qr_size,
            utf8_percent_encode(share_url, URI_COMPONENT)
        )
    }
}

/// Resolve user input to a list id
///
/// Accepts a bare id (`3vQB7B6MrGQZ`) or any URL whose path contains
/// `/list/<id>` (query string and fragment are ignored).
pub fn parse_list_reference(input: &str) -> Result<ListId, ListIdError> {
    let input = input.trim();
    match input.rfind(LIST_PATH) {
        Some(pos) => {
            let rest = &input[pos + LIST_PATH.len()..];
            let end = rest.find(&['/', '?', '#'][..]).unwrap_or(rest.len());
            ListId::parse(&rest[..end])
        }
        None => ListId::parse(input),
    }
}

/// Download file name for a list's QR code
pub fn qr_file_name(title: &str) -> String {
    let title = title.trim();
    let base = if title.is_empty() { "list" } else { title };
    let safe: String = base
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | ':' | '\0') { '-' } else { c })
        .collect();
    format!("{}-qr-code.png", safe)
}

/// What gets handed to the share sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharePayload {
    pub title: String,
    pub text: String,
    pub url: String,
}

impl SharePayload {
    /// Payload for a list shared from the editor
    pub fn for_editor(document: &ListDocument, url: impl Into<String>) -> Self {
        Self {
            title: document.title.clone(),
            text: document.description.clone(),
            url: url.into(),
        }
    }

    /// Payload for re-sharing a list from its public view
    pub fn for_public(document: &ListDocument, url: impl Into<String>) -> Self {
        let or = |value: &str, fallback: &str| {
            if value.is_empty() {
                fallback.to_string()
            } else {
                value.to_string()
            }
        };
        Self {
            title: or(&document.title, "Check out this list"),
            text: or(&document.description, "Shared via ScanShare"),
            url: url.into(),
        }
    }
}

/// Errors from the share integrations
#[derive(Debug, Error)]
pub enum ShareError {
    /// No share sheet on this platform
    #[error("Share sheet not available")]
    Unavailable,
    /// The share sheet failed or was dismissed
    #[error("Share failed: {0}")]
    Failed(String),
    /// Writing to the clipboard failed
    #[error("Failed to copy link: {0}")]
    Clipboard(String),
}

/// Platform share sheet
pub trait ShareSheet {
    fn share(&self, payload: &SharePayload) -> Result<(), ShareError>;
}

/// Platform clipboard
pub trait Clipboard {
    fn copy(&self, text: &str) -> Result<(), ShareError>;
}

/// How a share request was fulfilled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareOutcome {
    /// Handed to the share sheet
    Shared,
    /// Link copied to the clipboard
    Copied,
}

impl ShareOutcome {
    /// Confirmation message for the user
    pub fn message(self) -> &'static str {
        match self {
            ShareOutcome::Shared => "List shared successfully",
            ShareOutcome::Copied => "Link copied to clipboard",
        }
    }
}

/// Share via the share sheet, falling back to the clipboard
///
/// Any share sheet failure (including cancellation) falls through to the
/// clipboard. A clipboard failure is returned as is; there is no retry.
pub fn share_with_fallback(
    sheet: &dyn ShareSheet,
    clipboard: &dyn Clipboard,
    payload: &SharePayload,
) -> Result<ShareOutcome, ShareError> {
    match sheet.share(payload) {
        Ok(()) => Ok(ShareOutcome::Shared),
        Err(e) => {
            debug!("Share sheet unavailable ({}), copying link instead", e);
            clipboard.copy(&payload.url)?;
            Ok(ShareOutcome::Copied)
        }
    }
}

/// A share sheet for platforms that don't have one
#[derive(Debug, Clone, Copy, Default)]
pub struct NoShareSheet;

impl ShareSheet for NoShareSheet {
    fn share(&self, _payload: &SharePayload) -> Result<(), ShareError> {
        Err(ShareError::Unavailable)
    }
}
