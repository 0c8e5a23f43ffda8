//! Command handlers

pub mod config;
pub mod create;
pub mod qr;
pub mod status;
pub mod view;

use anyhow::{Context, Result};

use scanshare_core::share::parse_list_reference;
use scanshare_core::{Config, FileStore, ListId};

/// Open the configured document store
pub fn open_store(config: &Config) -> Result<FileStore> {
    FileStore::open(config)
        .with_context(|| format!("Failed to open list store in {:?}", config.lists_dir()))
}

/// Resolve a list id or share URL given on the command line
pub fn resolve_reference(reference: &str) -> Result<ListId> {
    parse_list_reference(reference)
        .with_context(|| format!("Invalid list id or URL: '{}'", reference))
}
