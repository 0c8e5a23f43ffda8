//! List document
//!
//! A `ListDocument` is the user-authored list: title, description and an
//! ordered sequence of items. Item order is the only ordering signal.
//!
//! All edit operations are in-memory and infallible. An operation that
//! names an item that isn't there leaves the document untouched.

use serde::{Deserialize, Serialize};

use crate::models::{Direction, ItemField, ItemId, ItemKind, ListItem};

/// The only theme currently defined
pub const DEFAULT_THEME: &str = "default";

fn default_theme() -> String {
    DEFAULT_THEME.to_string()
}

/// A list of text and image items
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListDocument {
    /// List title (may be empty)
    #[serde(default)]
    pub title: String,
    /// Optional description (empty when unset)
    #[serde(default)]
    pub description: String,
    /// Ordered items
    #[serde(default)]
    pub items: Vec<ListItem>,
    /// Theme tag, reserved
    #[serde(default = "default_theme")]
    pub theme: String,
}

impl Default for ListDocument {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            items: Vec::new(),
            theme: default_theme(),
        }
    }
}

impl ListDocument {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty document with a title
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Update the title
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Update the description
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Position of an item in the list
    pub fn position(&self, id: &ItemId) -> Option<usize> {
        self.items.iter().position(|item| &item.id == id)
    }

    /// Get an item by ID
    pub fn item(&self, id: &ItemId) -> Option<&ListItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Append an empty item of the given kind
    pub fn add_item(&mut self, kind: ItemKind) -> ItemId {
        self.push_item(ListItem::new(kind))
    }

    /// Append a prepared item
    pub fn push_item(&mut self, item: ListItem) -> ItemId {
        let id = item.id.clone();
        self.items.push(item);
        id
    }

    /// Replace a field of an item
    ///
    /// Returns `false` (and changes nothing) if the item doesn't exist or
    /// the field doesn't apply to its type.
    pub fn update_item(&mut self, id: &ItemId, field: ItemField, value: impl Into<String>) -> bool {
        match self.items.iter_mut().find(|item| &item.id == id) {
            Some(item) => item.set_field(field, value),
            None => false,
        }
    }

    /// Remove an item, returning it if it was present
    pub fn delete_item(&mut self, id: &ItemId) -> Option<ListItem> {
        let pos = self.position(id)?;
        Some(self.items.remove(pos))
    }

    /// Swap an item with its neighbor in the given direction
    ///
    /// Returns `false` at the boundary or if the item doesn't exist.
    pub fn move_item(&mut self, id: &ItemId, direction: Direction) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };

        let target = match direction {
            Direction::Up if index > 0 => index - 1,
            Direction::Down if index + 1 < self.items.len() => index + 1,
            _ => return false,
        };

        self.items.swap(index, target);
        true
    }
}
