//! View command handler

use anyhow::{Context, Result};

use scanshare_core::share::{share_with_fallback, NoShareSheet};
use scanshare_core::{view_public, Config, DocumentStore, ListId, PublicView, ShareLinks, SharePayload};
use tracing::debug;

use crate::clipboard::SystemClipboard;
use crate::output::Output;

/// Show the public view of a shared list
///
/// An unknown id prints the not-found state; it is not an error. With
/// `copy`, a found list's link is handed to the share sheet or clipboard.
pub fn view(config: &Config, reference: &str, copy: bool, output: &Output) -> Result<()> {
    let id = super::resolve_reference(reference)?;
    let store = super::open_store(config)?;

    let public = view_public(&store, &id).with_context(|| format!("Failed to load list {}", id))?;
    if matches!(public, PublicView::NotFound { .. }) {
        debug!("No stored list for {}", id);
    }

    output.print_public(&public)?;

    if copy {
        let links = ShareLinks::from_config(config);
        match public_payload(&store, &links, &id)? {
            Some(payload) => match share_with_fallback(&NoShareSheet, &SystemClipboard, &payload) {
                Ok(outcome) => output.message(outcome.message()),
                Err(e) => output.warn(&e.to_string()),
            },
            None => output.warn("Nothing to copy: list not found"),
        }
    }

    Ok(())
}

/// Share payload for re-sharing a stored list, if it exists
fn public_payload(
    store: &dyn DocumentStore,
    links: &ShareLinks,
    id: &ListId,
) -> Result<Option<SharePayload>> {
    let document = store
        .get(id)
        .with_context(|| format!("Failed to load list {}", id))?;

    Ok(document.map(|document| SharePayload::for_public(&document, links.to_share_url(id))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scanshare_core::config::DEFAULT_QR_SERVICE_URL;
    use scanshare_core::share::{Clipboard, ShareError, ShareOutcome};
    use scanshare_core::{ListDocument, MemoryStore};
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingClipboard {
        copied: RefCell<Vec<String>>,
    }

    impl Clipboard for RecordingClipboard {
        fn copy(&self, text: &str) -> Result<(), ShareError> {
            self.copied.borrow_mut().push(text.to_string());
            Ok(())
        }
    }

    fn links() -> ShareLinks {
        ShareLinks::new("https://scanshare.app", DEFAULT_QR_SERVICE_URL, 300)
    }

    #[test]
    fn test_public_payload_for_untitled_list() {
        let store = MemoryStore::new();
        let id = ListId::generate();
        store.put(&id, &ListDocument::new()).unwrap();

        let payload = public_payload(&store, &links(), &id).unwrap().unwrap();
        assert_eq!(payload.title, "Check out this list");
        assert_eq!(payload.text, "Shared via ScanShare");
        assert_eq!(payload.url, format!("https://scanshare.app/list/{}", id));
    }

    #[test]
    fn test_copy_public_link() {
        let store = MemoryStore::new();
        let id = ListId::generate();
        store.put(&id, &ListDocument::with_title("Menu")).unwrap();
        let clipboard = RecordingClipboard::default();

        let payload = public_payload(&store, &links(), &id).unwrap().unwrap();
        assert_eq!(payload.title, "Menu");
        let outcome = share_with_fallback(&NoShareSheet, &clipboard, &payload).unwrap();

        assert_eq!(outcome, ShareOutcome::Copied);
        assert_eq!(*clipboard.copied.borrow(), vec![payload.url]);
    }

    #[test]
    fn test_public_payload_missing_list() {
        let store = MemoryStore::new();
        let id = ListId::parse("unknown").unwrap();
        assert!(public_payload(&store, &links(), &id).unwrap().is_none());
    }

    #[test]
    fn test_public_payload_corrupt_list() {
        let store = MemoryStore::new();
        let id = ListId::parse("broken").unwrap();
        store.insert_raw(id.storage_key(), "{not json");
        assert!(public_payload(&store, &links(), &id).is_err());
    }
}
