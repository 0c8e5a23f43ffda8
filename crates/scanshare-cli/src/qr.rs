//! QR image download
//!
//! The QR code is rendered by the external image service; downloading it is
//! the only network request ScanShare makes.

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use tracing::debug;

/// Download timeout in seconds
const FETCH_TIMEOUT: u64 = 10;

/// Download the QR image at `qr_image_url` into `path`
///
/// Returns the number of bytes written.
pub async fn download(qr_image_url: &str, path: &Path) -> Result<usize> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(FETCH_TIMEOUT))
        .user_agent(concat!("ScanShare/", env!("CARGO_PKG_VERSION")))
        .build()?;

    let response = client
        .get(qr_image_url)
        .send()
        .await
        .context("Failed to reach the QR code service")?;

    let status = response.status();
    if !status.is_success() {
        bail!("QR code service returned {}", status);
    }

    if let Some(content_type) = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    {
        if !content_type.starts_with("image/") {
            bail!("QR code service returned {} instead of an image", content_type);
        }
    }

    let bytes = response
        .bytes()
        .await
        .context("Failed to read the QR code image")?;

    tokio::fs::write(path, &bytes)
        .await
        .with_context(|| format!("Failed to write QR code to {:?}", path))?;

    debug!("Saved QR code ({} bytes) to {:?}", bytes.len(), path);
    Ok(bytes.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_unreachable_service() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("list-qr-code.png");

        // Nothing listens on port 9 (discard) locally
        let result = download("http://127.0.0.1:9/?size=300x300&data=x", &path).await;

        assert!(result.is_err());
        assert!(!path.exists());
    }
}
