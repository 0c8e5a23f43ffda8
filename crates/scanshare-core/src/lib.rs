//! ScanShare Core Library
//!
//! This crate provides the core functionality for ScanShare, a local-first
//! tool for composing multimedia lists and sharing them as a link + QR code.
//!
//! # Architecture
//!
//! - **Document model**: an ordered list of text/image items, edited in memory
//! - **Document store**: device-local key-value persistence, one snapshot per share
//! - **Renderer**: projects a document into a read-only view tree
//!
//! Nothing leaves the device except the QR image request, which is composed
//! here but executed by the caller.
//!
//! # Quick Start
//!
//! ```text
//! let store = Arc::new(FileStore::open(&config)?);
//! let mut editor = Editor::new(store, ShareLinks::from_config(&config));
//!
//! editor.set_title("Menu");
//! let id = editor.add_item(ItemKind::Text);
//! editor.update_item(&id, ItemField::Content, "Soup - $5");
//!
//! let shared = editor.request_share_link()?;
//! println!("{}", shared.url);
//! ```
//!
//! # Modules
//!
//! - `models`: List items and their variants
//! - `document`: The list document and its edit operations
//! - `list_id`: Identifiers minted at share time
//! - `media`: Image sniffing and data URI encoding
//! - `storage`: The document store trait and its backends
//! - `editor`: Editing session (copy-on-write document, image imports, sharing)
//! - `render`: Preview and public view projection
//! - `share`: Share URL / QR URL composition and share fallback
//! - `config`: Application configuration

pub mod config;
pub mod document;
pub mod editor;
pub mod list_id;
pub mod media;
pub mod models;
pub mod render;
pub mod share;
pub mod storage;

pub use config::Config;
pub use document::{ListDocument, DEFAULT_THEME};
pub use editor::{Editor, ImportError, SharedList};
pub use list_id::{ListId, ListIdError};
pub use models::{Direction, ItemBody, ItemField, ItemId, ItemKind, ListItem};
pub use render::{render, view_public, ListView, Mode, PublicView};
pub use share::{ShareLinks, ShareOutcome, SharePayload};
pub use storage::{DocumentStore, FileStore, MemoryStore, StorageError, StorageStats};
