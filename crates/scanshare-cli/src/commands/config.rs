//! Config command handlers

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use scanshare_core::Config;

use crate::output::{Output, OutputFormat};

/// Keys accepted by `config set`
const KEYS: &str = "data_dir, origin, qr_service_url, qr_size, log_file";

/// Show current configuration
pub fn show(config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "origin": config.origin,
                    "qr_service_url": config.qr_service_url,
                    "qr_size": config.qr_size,
                    "log_file": config.log_file
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.data_dir.display());
        }
        OutputFormat::Human => {
            let effective_path = config_path
                .cloned()
                .unwrap_or_else(Config::config_file_path);
            println!("Configuration:");
            println!("  data_dir:       {}", config.data_dir.display());
            println!("  origin:         {}", config.origin);
            println!("  qr_service_url: {}", config.qr_service_url);
            println!("  qr_size:        {}", config.qr_size);
            println!(
                "  log_file:       {}",
                config
                    .log_file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(not set)".to_string())
            );
            println!();
            println!("Config file: {}", effective_path.display());
        }
    }

    Ok(())
}

/// Set a configuration value
pub fn set(
    key: String,
    value: String,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    let mut config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    apply(&mut config, &key, &value)?;

    // Save to the CLI-specified path or default
    let save_path = config_path
        .cloned()
        .unwrap_or_else(Config::config_file_path);
    config
        .save_to_path(&save_path)
        .context("Failed to save configuration")?;

    output.success(&format!("Set {} = {}", key, value));

    Ok(())
}

/// Apply one `key = value` to the config
fn apply(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "data_dir" => {
            config.data_dir = value.into();
        }
        "origin" => {
            let origin = value.trim().trim_end_matches('/');
            if !(origin.starts_with("http://") || origin.starts_with("https://")) {
                bail!("Invalid origin '{}'. Use http(s)://host[:port]", value);
            }
            config.origin = origin.to_string();
        }
        "qr_service_url" => {
            if value.trim().is_empty() {
                bail!("qr_service_url cannot be empty");
            }
            config.qr_service_url = value.trim().to_string();
        }
        "qr_size" => {
            let size: u32 = value
                .parse()
                .context("Invalid value for qr_size. Use a size in pixels, e.g. 300.")?;
            if size == 0 {
                bail!("qr_size must be greater than 0");
            }
            config.qr_size = size;
        }
        "log_file" => {
            config.log_file = if value.is_empty() || value == "none" {
                None
            } else {
                Some(value.into())
            };
        }
        _ => {
            bail!(
                "Unknown configuration key: '{}'\nValid keys: {}",
                key,
                KEYS
            );
        }
    }
    Ok(())
}
