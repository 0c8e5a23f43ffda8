//! Status command handler

use anyhow::Result;

use scanshare_core::Config;

use crate::output::{Output, OutputFormat};

/// Show status information
pub fn show(config: &Config, output: &Output) -> Result<()> {
    let store = super::open_store(config)?;
    let stats = store.stats()?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "lists_dir": store.dir(),
                    "origin": config.origin,
                    "qr_service_url": config.qr_service_url,
                    "storage": {
                        "lists": stats.entries,
                        "total_size": stats.total_size
                    }
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", stats.entries);
        }
        OutputFormat::Human => {
            println!("ScanShare Status");
            println!("================");
            println!();
            println!("Sharing:");
            println!("  Origin:     {}", config.origin);
            println!("  QR service: {}", config.qr_service_url);
            println!();
            println!("Storage:");
            println!("  Location: {}", store.dir().display());
            println!("  Lists:    {}", stats.entries);
            println!("  Size:     {}", stats.total_size_human());
        }
    }

    Ok(())
}
