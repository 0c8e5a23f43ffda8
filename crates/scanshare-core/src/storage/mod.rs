//! Storage layer
//!
//! Shared lists are kept in a device-local key-value store: one entry per
//! share, keyed `list-<id>`, holding the JSON snapshot of the document.
//!
//! ## Semantics
//!
//! - **Create and read only**: a snapshot is never updated or deleted
//! - **Last write wins** if the same key is written twice
//! - **Missing vs corrupt**: an absent key is `Ok(None)`, a key whose value
//!   can't be decoded is `Err(StorageError::CorruptEntry)`
//!
//! `FileStore` is the durable backend; `MemoryStore` is an in-process
//! stand-in for tests.

pub mod error;
pub mod file;
pub mod memory;

pub use error::{StorageError, StorageResult};
pub use file::{FileStore, StorageStats};
pub use memory::MemoryStore;

use crate::document::ListDocument;
use crate::list_id::ListId;

/// Keyed persistence for list snapshots
pub trait DocumentStore: Send + Sync {
    /// Write a snapshot of `document` under `id`, replacing any prior value
    fn put(&self, id: &ListId, document: &ListDocument) -> StorageResult<()>;

    /// Read the snapshot stored under `id`
    fn get(&self, id: &ListId) -> StorageResult<Option<ListDocument>>;
}

/// Serialize a document into its stored form
pub(crate) fn encode(document: &ListDocument) -> StorageResult<String> {
    Ok(serde_json::to_string(document)?)
}

/// Decode a stored value, reporting failures against its key
pub(crate) fn decode(key: &str, raw: &str) -> StorageResult<ListDocument> {
    serde_json::from_str(raw).map_err(|e| StorageError::CorruptEntry {
        key: key.to_string(),
        details: e.to_string(),
    })
}
