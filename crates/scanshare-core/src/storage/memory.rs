//! In-memory document store

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use super::{decode, encode, DocumentStore, StorageResult};
use crate::document::ListDocument;
use crate::list_id::ListId;

/// A `DocumentStore` held in process memory
///
/// Values are kept in their serialized form so reads go through the same
/// decode path as the file store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a raw value under a key, bypassing serialization
    pub fn insert_raw(&self, key: impl Into<String>, value: impl Into<String>) {
        self.lock().insert(key.into(), value.into());
    }

    /// Raw stored value for a key
    pub fn raw(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        // A panic while holding the lock can't leave a half-written entry
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl DocumentStore for MemoryStore {
    fn put(&self, id: &ListId, document: &ListDocument) -> StorageResult<()> {
        let value = encode(document)?;
        self.lock().insert(id.storage_key(), value);
        Ok(())
    }

    fn get(&self, id: &ListId) -> StorageResult<Option<ListDocument>> {
        let key = id.storage_key();
        match self.lock().get(&key) {
            Some(raw) => decode(&key, raw).map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ItemKind;
    use crate::storage::StorageError;

    #[test]
    fn test_put_and_get() {
        let store = MemoryStore::new();
        let id = ListId::generate();

        let mut doc = ListDocument::with_title("Menu");
        doc.add_item(ItemKind::Text);

        store.put(&id, &doc).unwrap();
        assert_eq!(store.get(&id).unwrap(), Some(doc));
        assert!(store.raw(&id.storage_key()).is_some());
    }

    #[test]
    fn test_missing_key() {
        let store = MemoryStore::new();
        assert!(store.get(&ListId::generate()).unwrap().is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_last_write_wins() {
        let store = MemoryStore::new();
        let id = ListId::generate();

        store.put(&id, &ListDocument::with_title("First")).unwrap();
        store.put(&id, &ListDocument::with_title("Second")).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&id).unwrap().unwrap().title, "Second");
    }

    #[test]
    fn test_corrupt_entry() {
        let store = MemoryStore::new();
        let id = ListId::parse("broken").unwrap();
        store.insert_raw("list-broken", "{not json");

        let err = store.get(&id).unwrap_err();
        assert!(matches!(err, StorageError::CorruptEntry { ref key, .. } if key == "list-broken"));
    }
}
