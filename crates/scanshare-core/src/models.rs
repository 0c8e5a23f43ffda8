//! Data models for ScanShare
//!
//! Defines list items and the small vocabulary used to edit them.
//! The serialized form is a flat record keyed by `type`:
//!
//! ```text
//! {"id": "...", "type": "image", "content": "data:image/png;base64,...",
//!  "title": "Front", "description": "Shop window"}
//! ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier of an item within a list
///
/// Locally minted ids are UUID v4 strings; any string is accepted when
/// loading stored lists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Mint a fresh id
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First eight characters, for compact display
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(8) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Kind of item that can be added to a list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Text,
    Image,
}

impl ItemKind {
    /// The `type` tag used in the stored format
    pub fn as_str(self) -> &'static str {
        match self {
            ItemKind::Text => "text",
            ItemKind::Image => "image",
        }
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mutable item fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemField {
    Title,
    Content,
    /// Image caption. Text items have no description.
    Description,
}

/// Reorder direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards the start of the list
    Up,
    /// Towards the end of the list
    Down,
}

/// Type-specific payload of an item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ItemBody {
    /// Plain text paragraph
    Text { content: String },
    /// Embedded image with optional caption
    Image {
        /// Self-contained data URI
        content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
}

impl ItemBody {
    /// Empty payload for the given kind
    pub fn empty(kind: ItemKind) -> Self {
        match kind {
            ItemKind::Text => ItemBody::Text {
                content: String::new(),
            },
            ItemKind::Image => ItemBody::Image {
                content: String::new(),
                description: None,
            },
        }
    }

    pub fn kind(&self) -> ItemKind {
        match self {
            ItemBody::Text { .. } => ItemKind::Text,
            ItemBody::Image { .. } => ItemKind::Image,
        }
    }

    pub fn content(&self) -> &str {
        match self {
            ItemBody::Text { content } | ItemBody::Image { content, .. } => content,
        }
    }
}

/// One unit of content within a list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListItem {
    /// Unique identifier, fixed at creation
    pub id: ItemId,
    /// Optional short label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Type tag and payload
    #[serde(flatten)]
    pub body: ItemBody,
}

impl ListItem {
    /// Create an empty item of the given kind with a fresh id
    pub fn new(kind: ItemKind) -> Self {
        Self {
            id: ItemId::generate(),
            title: None,
            body: ItemBody::empty(kind),
        }
    }

    /// Create a text item
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            id: ItemId::generate(),
            title: None,
            body: ItemBody::Text {
                content: content.into(),
            },
        }
    }

    /// Create an image item from an encoded data URI
    pub fn image(data_uri: impl Into<String>, title: Option<String>) -> Self {
        Self {
            id: ItemId::generate(),
            title: title.filter(|t| !t.is_empty()),
            body: ItemBody::Image {
                content: data_uri.into(),
                description: None,
            },
        }
    }

    pub fn kind(&self) -> ItemKind {
        self.body.kind()
    }

    pub fn content(&self) -> &str {
        self.body.content()
    }

    /// Image caption, if this is an image with one
    pub fn description(&self) -> Option<&str> {
        match &self.body {
            ItemBody::Image { description, .. } => description.as_deref(),
            ItemBody::Text { .. } => None,
        }
    }

    /// Replace a mutable field
    ///
    /// Returns `false` if the field does not exist on this item's variant.
    /// An empty value clears the optional fields.
    pub fn set_field(&mut self, field: ItemField, value: impl Into<String>) -> bool {
        let value = value.into();
        match (field, &mut self.body) {
            (ItemField::Title, _) => {
                self.title = non_empty(value);
                true
            }
            (ItemField::Content, ItemBody::Text { content })
            | (ItemField::Content, ItemBody::Image { content, .. }) => {
                *content = value;
                true
            }
            (ItemField::Description, ItemBody::Image { description, .. }) => {
                *description = non_empty(value);
                true
            }
            (ItemField::Description, ItemBody::Text { .. }) => false,
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
