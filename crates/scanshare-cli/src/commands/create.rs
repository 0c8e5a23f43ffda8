//! Create command handler

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result};

use scanshare_core::share::{qr_file_name, share_with_fallback, NoShareSheet};
use scanshare_core::{Config, Editor, ItemField, ItemKind, ShareLinks, SharePayload};

use crate::clipboard::SystemClipboard;
use crate::output::Output;
use crate::qr;

/// One `--item` argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemSpec {
    /// `text:BODY`
    Text(String),
    /// `image:PATH`
    Image(PathBuf),
}

impl FromStr for ItemSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, value) = s
            .split_once(':')
            .ok_or_else(|| format!("expected KIND:VALUE, got '{}'", s))?;

        match kind {
            "text" => Ok(ItemSpec::Text(value.replace("\\n", "\n"))),
            "image" if value.is_empty() => Err("image item needs a file path".to_string()),
            "image" => Ok(ItemSpec::Image(PathBuf::from(value))),
            other => Err(format!("unknown item type '{}' (use text or image)", other)),
        }
    }
}

/// Arguments of `scanshare create`
#[derive(Debug, Clone)]
pub struct CreateRequest {
    pub title: String,
    pub description: Option<String>,
    pub items: Vec<ItemSpec>,
    pub copy: bool,
    pub qr_out: Option<PathBuf>,
}

/// Compose a list and share it
pub async fn create(config: &Config, request: CreateRequest, output: &Output) -> Result<()> {
    let store = Arc::new(super::open_store(config)?);
    let mut editor = Editor::new(store, ShareLinks::from_config(config));

    compose(&mut editor, &request).await?;

    let shared = editor
        .request_share_link()
        .context("Failed to store list")?;
    let document = editor.document();
    editor.close();

    output.success(&format!(
        "Shared '{}' ({} items)",
        document.title,
        document.len()
    ));
    output.print_shared(&shared);

    if request.copy {
        let payload = SharePayload::for_editor(&document, &shared.url);
        match share_with_fallback(&NoShareSheet, &SystemClipboard, &payload) {
            Ok(outcome) => output.message(outcome.message()),
            Err(e) => output.warn(&e.to_string()),
        }
    }

    if let Some(path) = request.qr_out {
        let path = if path.is_dir() {
            path.join(qr_file_name(&document.title))
        } else {
            path
        };
        let size = qr::download(&shared.qr_image_url, &path).await?;
        output.message(&format!("Saved QR code to {} ({} bytes)", path.display(), size));
    }

    Ok(())
}

/// Apply the request to a fresh editor, items in argument order
async fn compose(editor: &mut Editor, request: &CreateRequest) -> Result<()> {
    editor.set_title(request.title.as_str());
    if let Some(description) = &request.description {
        editor.set_description(description.as_str());
    }

    for item in &request.items {
        match item {
            ItemSpec::Text(body) => {
                let id = editor.add_item(ItemKind::Text);
                editor.update_item(&id, ItemField::Content, body.as_str());
            }
            ItemSpec::Image(path) => {
                editor
                    .add_image_from_file(path)
                    .await
                    .with_context(|| format!("Failed to add image {}", path.display()))?;
            }
        }
    }

    Ok(())
}
