//! View projection
//!
//! `render` turns a document into a read-only view tree. The same projection
//! serves two places:
//!
//! - **Preview**: the editor's live document, inside a simulated phone frame
//! - **Public view**: a stored snapshot looked up by id, without the frame
//!
//! Front ends (terminal text, TUI widgets) only lay out the tree; every
//! decision about what is shown lives here.

use serde::Serialize;

use crate::document::ListDocument;
use crate::list_id::ListId;
use crate::models::{ItemBody, ListItem};
use crate::storage::{DocumentStore, StorageResult};

/// Heading shown for a list without a title
pub const UNTITLED: &str = "Untitled List";

/// Placeholder shown for a list without items
pub const EMPTY_MESSAGE: &str = "No items yet";

/// Footer line under every rendered list
pub const FOOTER: &str = "Created with ScanShare";

/// Where the view is going to be shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Editor preview, wrapped in a device frame
    Preview,
    /// Public view of a stored list
    Public,
}

/// A rendered list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame: Option<DeviceFrame>,
    pub header: Header,
    pub body: Body,
    pub footer: &'static str,
}

/// Simulated mobile device chrome
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceFrame {
    /// Status bar segments, left to right
    pub status_bar: [&'static str; 3],
}

impl Default for DeviceFrame {
    fn default() -> Self {
        Self {
            status_bar: ["9:41", "•••", "100%"],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Header {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum Body {
    Empty { message: &'static str },
    Items { items: Vec<ItemView> },
}

/// One rendered item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ItemView {
    Text {
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        body: String,
    },
    Image {
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        src: String,
        alt: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
    },
}

/// Result of opening a public view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PublicView {
    Found { view: ListView },
    NotFound { view: NotFoundView },
}

/// Terminal state for an unknown list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotFoundView {
    pub heading: &'static str,
    pub message: &'static str,
    pub recovery: RecoveryAction,
}

impl Default for NotFoundView {
    fn default() -> Self {
        Self {
            heading: "List not found",
            message: "The list you're looking for doesn't exist or has been removed.",
            recovery: RecoveryAction::GoHome,
        }
    }
}

/// The single way out of the not-found state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryAction {
    GoHome,
}

impl RecoveryAction {
    pub fn label(self) -> &'static str {
        match self {
            RecoveryAction::GoHome => "Go Home",
        }
    }
}

/// Project a document into a view tree
pub fn render(document: &ListDocument, mode: Mode) -> ListView {
    let body = if document.is_empty() {
        Body::Empty {
            message: EMPTY_MESSAGE,
        }
    } else {
        Body::Items {
            items: document.items.iter().map(render_item).collect(),
        }
    };

    ListView {
        frame: match mode {
            Mode::Preview => Some(DeviceFrame::default()),
            Mode::Public => None,
        },
        header: Header {
            title: if document.title.trim().is_empty() {
                UNTITLED.to_string()
            } else {
                document.title.clone()
            },
            description: non_empty(&document.description),
        },
        body,
        footer: FOOTER,
    }
}

fn render_item(item: &ListItem) -> ItemView {
    let title = item.title.as_deref().and_then(non_empty);
    match &item.body {
        ItemBody::Text { content } => ItemView::Text {
            title,
            body: content.clone(),
        },
        ItemBody::Image {
            content,
            description,
        } => ItemView::Image {
            alt: title.clone().unwrap_or_else(|| "Image".to_string()),
            title,
            src: content.clone(),
            caption: description.as_deref().and_then(non_empty),
        },
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// Look up a stored list and render it for public viewing
///
/// An unknown id renders the not-found state. A stored entry that can't be
/// decoded is an error, not a not-found.
pub fn view_public(store: &dyn DocumentStore, id: &ListId) -> StorageResult<PublicView> {
    Ok(match store.get(id)? {
        Some(document) => PublicView::Found {
            view: render(&document, Mode::Public),
        },
        None => PublicView::NotFound {
            view: NotFoundView::default(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ItemField, ItemKind};
    use crate::storage::{MemoryStore, StorageError};

    fn menu() -> ListDocument {
        let mut doc = ListDocument::with_title("Menu");
        doc.set_description("Lunch specials");

        let soup = doc.add_item(ItemKind::Text);
        doc.update_item(&soup, ItemField::Content, "Soup - $5");
        doc.update_item(&soup, ItemField::Title, "Starter");

        doc.push_item(ListItem::image(
            "data:image/png;base64,iVBORw0KGgo=",
            Some("front.png".to_string()),
        ));
        let last = doc.items[1].id.clone();
        doc.update_item(&last, ItemField::Description, "Our shop");
        doc
    }

    #[test]
    fn test_preview_has_frame() {
        let view = render(&menu(), Mode::Preview);
        let frame = view.frame.unwrap();
        assert_eq!(frame.status_bar, ["9:41", "•••", "100%"]);
    }

    #[test]
    fn test_public_has_no_frame() {
        let doc = menu();
        let public = render(&doc, Mode::Public);
        let preview = render(&doc, Mode::Preview);

        assert!(public.frame.is_none());
        assert_eq!(public.header, preview.header);
        assert_eq!(public.body, preview.body);
    }

    #[test]
    fn test_header() {
        let view = render(&menu(), Mode::Public);
        assert_eq!(view.header.title, "Menu");
        assert_eq!(view.header.description.as_deref(), Some("Lunch specials"));
        assert_eq!(view.footer, FOOTER);
    }

    #[test]
    fn test_untitled_fallback() {
        let view = render(&ListDocument::new(), Mode::Preview);
        assert_eq!(view.header.title, UNTITLED);
        assert!(view.header.description.is_none());
    }

    #[test]
    fn test_empty_state() {
        let view = render(&ListDocument::with_title("Empty"), Mode::Public);
        assert_eq!(
            view.body,
            Body::Empty {
                message: EMPTY_MESSAGE
            }
        );
    }

    #[test]
    fn test_items_dispatch_by_type() {
        let view = render(&menu(), Mode::Public);
        let Body::Items { items } = view.body else {
            panic!("expected items");
        };

        assert_eq!(
            items[0],
            ItemView::Text {
                title: Some("Starter".to_string()),
                body: "Soup - $5".to_string(),
            }
        );
        assert_eq!(
            items[1],
            ItemView::Image {
                title: Some("front.png".to_string()),
                src: "data:image/png;base64,iVBORw0KGgo=".to_string(),
                alt: "front.png".to_string(),
                caption: Some("Our shop".to_string()),
            }
        );
    }

    #[test]
    fn test_untitled_image_alt() {
        let mut doc = ListDocument::new();
        doc.push_item(ListItem::image("data:image/gif;base64,R0lGODlh", None));
        let view = render(&doc, Mode::Preview);
        let Body::Items { items } = view.body else {
            panic!("expected items");
        };
        assert!(matches!(&items[0], ItemView::Image { alt, title: None, caption: None, .. } if alt == "Image"));
    }

    #[test]
    fn test_view_public_found() {
        let store = MemoryStore::new();
        let id = ListId::generate();
        store.put(&id, &menu()).unwrap();

        match view_public(&store, &id).unwrap() {
            PublicView::Found { view } => {
                assert!(view.frame.is_none());
                assert_eq!(view.header.title, "Menu");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_view_public_not_found() {
        let store = MemoryStore::new();
        let view = view_public(&store, &ListId::generate()).unwrap();

        let PublicView::NotFound { view } = view else {
            panic!("expected not found");
        };
        assert_eq!(view.recovery, RecoveryAction::GoHome);
        assert_eq!(view.recovery.label(), "Go Home");
    }

    #[test]
    fn test_view_public_corrupt() {
        let store = MemoryStore::new();
        store.insert_raw("list-bad", "[]");
        let id = ListId::parse("bad").unwrap();

        let err = view_public(&store, &id).unwrap_err();
        assert!(matches!(err, StorageError::CorruptEntry { .. }));
    }

    #[test]
    fn test_json_shape() {
        let value = serde_json::to_value(render(&ListDocument::new(), Mode::Public)).unwrap();
        assert!(value.get("frame").is_none());
        assert_eq!(value["body"]["state"], "empty");
        assert_eq!(value["header"]["title"], UNTITLED);
    }
}
