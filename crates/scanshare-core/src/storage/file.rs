//! File-backed document store
//!
//! Each shared list is one JSON file in the lists directory:
//!
//! ```text
//! ~/.local/share/scanshare/lists/
//!     list-3vQB7B6MrGQZaxCuFg4oh.json
//!     list-1717171717171.json
//! ```
//!
//! Writes are atomic (write to temp file, then rename) so a crash never
//! leaves a half-written snapshot behind.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{decode, encode, DocumentStore, StorageError, StorageResult};
use crate::config::Config;
use crate::document::ListDocument;
use crate::list_id::ListId;

/// File extension of stored entries
const ENTRY_EXTENSION: &str = "json";

/// Durable, device-local `DocumentStore`
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

/// Statistics about the store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageStats {
    /// Number of stored lists
    pub entries: usize,
    /// Combined size of all entries in bytes
    pub total_size: u64,
}

impl StorageStats {
    /// Get total size in human-readable format
    pub fn total_size_human(&self) -> String {
        crate::media::human_size(self.total_size as usize)
    }
}

impl FileStore {
    /// Open the store in the configured lists directory
    pub fn open(config: &Config) -> StorageResult<Self> {
        Self::open_dir(config.lists_dir())
    }

    /// Open the store in a specific directory, creating it if needed
    pub fn open_dir(dir: impl Into<PathBuf>) -> StorageResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StorageError::CreateDirectory {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    /// Directory holding the entries
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing a list
    pub fn entry_path(&self, id: &ListId) -> PathBuf {
        self.dir
            .join(format!("{}.{}", id.storage_key(), ENTRY_EXTENSION))
    }

    /// Whether a list is stored under `id`
    pub fn contains(&self, id: &ListId) -> bool {
        self.entry_path(id).exists()
    }

    /// Identifiers of all stored lists
    pub fn ids(&self) -> StorageResult<Vec<ListId>> {
        let mut ids = Vec::new();
        for (path, _) in self.entries()? {
            if let Some(id) = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(ListId::from_storage_key)
            {
                ids.push(id);
            }
        }
        ids.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        Ok(ids)
    }

    /// Get storage statistics
    pub fn stats(&self) -> StorageResult<StorageStats> {
        let entries = self.entries()?;
        Ok(StorageStats {
            entries: entries.len(),
            total_size: entries.iter().map(|(_, size)| size).sum(),
        })
    }

    /// Stored entry files with their sizes
    fn entries(&self) -> StorageResult<Vec<(PathBuf, u64)>> {
        let read_dir = fs::read_dir(&self.dir)
            .map_err(|e| StorageError::from_read(e, self.dir.clone()))?;

        let mut entries = Vec::new();
        for entry in read_dir {
            let entry = entry?;
            let path = entry.path();
            let is_entry = path.extension().and_then(|e| e.to_str()) == Some(ENTRY_EXTENSION)
                && path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with(crate::list_id::KEY_PREFIX));
            if is_entry {
                entries.push((path, entry.metadata()?.len()));
            }
        }
        Ok(entries)
    }
}

impl DocumentStore for FileStore {
    fn put(&self, id: &ListId, document: &ListDocument) -> StorageResult<()> {
        let path = self.entry_path(id);
        let value = encode(document)?;
        atomic_write(&path, value.as_bytes())?;
        debug!("Stored {} ({} bytes)", id.storage_key(), value.len());
        Ok(())
    }

    fn get(&self, id: &ListId) -> StorageResult<Option<ListDocument>> {
        let path = self.entry_path(id);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                return Err(StorageError::CorruptEntry {
                    key: id.storage_key(),
                    details: e.to_string(),
                })
            }
            Err(e) => return Err(StorageError::from_read(e, path)),
        };

        decode(&id.storage_key(), &raw).map(Some)
    }
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
fn atomic_write(path: &Path, data: &[u8]) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| StorageError::CreateDirectory {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    // Create temp file in the same directory (for atomic rename)
    let temp_path = path.with_extension("tmp");

    let mut file =
        File::create(&temp_path).map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    file.write_all(data)
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    // Sync to disk before rename
    file.sync_all()
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    fs::rename(&temp_path, path).map_err(|source| StorageError::AtomicWriteFailed {
        from: temp_path.clone(),
        to: path.to_path_buf(),
        source,
    })?;

    Ok(())
}
