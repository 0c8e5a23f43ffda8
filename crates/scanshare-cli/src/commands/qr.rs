//! QR command handler

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use scanshare_core::share::qr_file_name;
use scanshare_core::{Config, DocumentStore, ShareLinks};

use crate::output::{Output, OutputFormat};
use crate::qr;

/// Print (and optionally download) the QR code of a shared list
///
/// `out` is `Some(None)` for a bare `--out`, which saves to
/// `<title>-qr-code.png` in the current directory.
pub async fn show(
    config: &Config,
    reference: &str,
    out: Option<Option<PathBuf>>,
    output: &Output,
) -> Result<()> {
    let id = super::resolve_reference(reference)?;
    let store = super::open_store(config)?;

    let Some(document) = store
        .get(&id)
        .with_context(|| format!("Failed to load list {}", id))?
    else {
        bail!("List not found: {}", id);
    };

    let links = ShareLinks::from_config(config);
    let url = links.to_share_url(&id);
    let qr_image_url = links.to_qr_image_url(&url);

    let saved = match out {
        Some(path) => {
            let path = path.unwrap_or_else(|| PathBuf::from(qr_file_name(&document.title)));
            let size = qr::download(&qr_image_url, &path).await?;
            Some((path, size))
        }
        None => None,
    };

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "id": id.as_str(),
                    "url": url,
                    "qr_image_url": qr_image_url,
                    "saved_to": saved.as_ref().map(|(path, _)| path),
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", qr_image_url);
        }
        OutputFormat::Human => {
            println!("Link:    {}", url);
            println!("QR code: {}", qr_image_url);
            if let Some((path, size)) = saved {
                println!();
                output.success(&format!("Saved {} ({} bytes)", path.display(), size));
            }
        }
    }

    Ok(())
}
