//! Editing session
//!
//! An `Editor` owns the one document being composed. Mutations are
//! copy-on-write: the document lives behind an `Arc`, observers get cheap
//! snapshots from [`Editor::document`], and an edit clones the document only
//! while such a snapshot is still alive. A snapshot never changes under its
//! holder.
//!
//! ## Image imports
//!
//! Adding an image reads a local file and embeds it as a data URI. The read
//! runs as a task owned by the editor:
//!
//! ```text
//! import_image(path) ──spawn──▶ read + sniff + encode
//!                                      │
//! poll_imports() / settle_imports() ◀──┘  appends the image item
//! ```
//!
//! The document is untouched until the result is collected. A failed read
//! appends nothing. Closing (or dropping) the editor aborts reads still in
//! flight, so a late completion can never land in a document that's gone.

use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, info, warn};

use crate::document::ListDocument;
use crate::list_id::ListId;
use crate::media;
use crate::models::{Direction, ItemField, ItemId, ItemKind, ListItem};
use crate::share::ShareLinks;
use crate::storage::{DocumentStore, StorageResult};

/// Errors from importing an image file
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("'{path}' is not a supported image")]
    UnsupportedMedia { path: PathBuf },
    #[error("Image import was cancelled")]
    Cancelled,
}

/// A list that has just been shared
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedList {
    /// Identifier of the stored snapshot
    pub id: ListId,
    /// Public URL of the snapshot
    pub url: String,
    /// QR image service URL encoding `url`
    pub qr_image_url: String,
}

type ImportResult = Result<ListItem, ImportError>;

/// An editing session over one list document
///
/// Dropping the editor aborts image imports still in flight.
pub struct Editor {
    document: Arc<ListDocument>,
    store: Arc<dyn DocumentStore>,
    links: ShareLinks,
    imports: JoinSet<ImportResult>,
}

impl Editor {
    /// Start a session with an empty document
    pub fn new(store: Arc<dyn DocumentStore>, links: ShareLinks) -> Self {
        Self::with_document(store, links, ListDocument::new())
    }

    /// Start a session from an existing document
    pub fn with_document(
        store: Arc<dyn DocumentStore>,
        links: ShareLinks,
        document: ListDocument,
    ) -> Self {
        Self {
            document: Arc::new(document),
            store,
            links,
            imports: JoinSet::new(),
        }
    }

    /// Snapshot of the current document
    pub fn document(&self) -> Arc<ListDocument> {
        Arc::clone(&self.document)
    }

    /// Borrow the current document
    pub fn current(&self) -> &ListDocument {
        &self.document
    }

    pub fn links(&self) -> &ShareLinks {
        &self.links
    }

    fn edit(&mut self) -> &mut ListDocument {
        Arc::make_mut(&mut self.document)
    }

    // ==================== Document Fields ====================

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.edit().set_title(title);
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.edit().set_description(description);
    }

    // ==================== Item Operations ====================

    /// Append an empty item
    pub fn add_item(&mut self, kind: ItemKind) -> ItemId {
        self.edit().add_item(kind)
    }

    /// Replace a field of an item (no-op if it doesn't apply)
    pub fn update_item(&mut self, id: &ItemId, field: ItemField, value: impl Into<String>) -> bool {
        // Check first so a no-op doesn't clone a shared document
        if self.document.item(id).is_none() {
            return false;
        }
        self.edit().update_item(id, field, value)
    }

    /// Remove an item
    pub fn delete_item(&mut self, id: &ItemId) -> Option<ListItem> {
        self.document.position(id)?;
        self.edit().delete_item(id)
    }

    /// Move an item one step up or down
    pub fn move_item(&mut self, id: &ItemId, direction: Direction) -> bool {
        self.document.position(id).is_some() && self.edit().move_item(id, direction)
    }

    // ==================== Sharing ====================

    /// Store a snapshot of the document under a new id and build its links
    ///
    /// Every call mints a new id and writes a new entry, even if nothing
    /// changed since the last call.
    pub fn request_share_link(&self) -> StorageResult<SharedList> {
        let id = ListId::generate();
        self.store.put(&id, &self.document)?;

        let url = self.links.to_share_url(&id);
        let qr_image_url = self.links.to_qr_image_url(&url);
        info!(
            "Shared list '{}' ({} items) as {}",
            self.document.title,
            self.document.len(),
            id
        );

        Ok(SharedList {
            id,
            url,
            qr_image_url,
        })
    }

    // ==================== Image Imports ====================

    /// Start importing an image file
    ///
    /// Must be called from within a tokio runtime. The item is appended
    /// when the result is collected with [`poll_imports`](Self::poll_imports)
    /// or [`settle_imports`](Self::settle_imports).
    pub fn import_image(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        let read_path = path.clone();
        self.spawn_import(path, async move { tokio::fs::read(read_path).await });
    }

    fn spawn_import<F>(&mut self, path: PathBuf, read: F)
    where
        F: Future<Output = io::Result<Vec<u8>>> + Send + 'static,
    {
        debug!("Importing image {:?}", path);
        self.imports.spawn(async move {
            let bytes = read.await.map_err(|source| ImportError::Read {
                path: path.clone(),
                source,
            })?;
            encode_image(&path, &bytes)
        });
    }

    /// Number of imports still in flight or waiting to be collected
    pub fn pending_imports(&self) -> usize {
        self.imports.len()
    }

    /// Collect imports that have already finished, without waiting
    pub fn poll_imports(&mut self) -> Vec<Result<ItemId, ImportError>> {
        let mut results = Vec::new();
        while let Some(joined) = self.imports.try_join_next() {
            results.push(self.collect(joined));
        }
        results
    }

    /// Wait for every pending import and collect the results
    pub async fn settle_imports(&mut self) -> Vec<Result<ItemId, ImportError>> {
        let mut results = Vec::new();
        while let Some(joined) = self.imports.join_next().await {
            results.push(self.collect(joined));
        }
        results
    }

    /// Import one image and wait for it to be appended
    pub async fn add_image_from_file(&mut self, path: impl AsRef<Path>) -> Result<ItemId, ImportError> {
        let path = path.as_ref().to_path_buf();
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|source| ImportError::Read {
                path: path.clone(),
                source,
            })?;
        let item = encode_image(&path, &bytes)?;
        Ok(self.edit().push_item(item))
    }

    fn collect(&mut self, joined: Result<ImportResult, JoinError>) -> Result<ItemId, ImportError> {
        let item = match joined {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Err(ImportError::Cancelled),
            Err(e) => {
                warn!("Image import task failed: {}", e);
                Err(ImportError::Cancelled)
            }
        };

        match item {
            Ok(item) => Ok(self.edit().push_item(item)),
            Err(e) => {
                warn!("Image import failed: {}", e);
                Err(e)
            }
        }
    }

    /// End the session, aborting imports still in flight
    ///
    /// Returns the number of imports that were discarded.
    pub fn close(mut self) -> usize {
        let discarded = self.imports.len();
        self.imports.abort_all();
        if discarded > 0 {
            debug!("Discarded {} pending image import(s)", discarded);
        }
        discarded
    }
}

/// Turn file bytes into an image item titled with the file name
fn encode_image(path: &Path, bytes: &[u8]) -> Result<ListItem, ImportError> {
    let mime = media::sniff_image_type(bytes, Some(path)).ok_or_else(|| {
        ImportError::UnsupportedMedia {
            path: path.to_path_buf(),
        }
    })?;

    let title = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned());

    Ok(ListItem::image(media::encode_data_uri(mime, bytes), title))
}
