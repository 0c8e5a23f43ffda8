//! ScanShare CLI
//!
//! Command-line interface for ScanShare - compose a list, share it as a
//! link + QR code.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use scanshare_core::Config;

mod clipboard;
mod commands;
mod editor;
mod layout;
mod logging;
mod output;
mod qr;
mod tui;

use commands::create::ItemSpec;
use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "scanshare")]
#[command(about = "ScanShare - Compose lists and share them as a link and QR code")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use a specific config file
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the list editor (default)
    Edit,
    /// Compose a list from arguments and share it
    #[command(alias = "new")]
    Create {
        /// List title
        #[arg(short = 'T', long)]
        title: String,
        /// List description
        #[arg(short, long)]
        description: Option<String>,
        /// Item to append, in order (text:BODY or image:PATH)
        #[arg(short, long = "item", value_name = "KIND:VALUE")]
        items: Vec<ItemSpec>,
        /// Copy the share link to the clipboard
        #[arg(long)]
        copy: bool,
        /// Download the QR code image to this file
        #[arg(long, value_name = "FILE")]
        qr_out: Option<PathBuf>,
    },
    /// Show a shared list
    #[command(alias = "show")]
    View {
        /// List id or share URL
        reference: String,
        /// Copy the list's link to the clipboard
        #[arg(long)]
        copy: bool,
    },
    /// Show or download the QR code of a shared list
    Qr {
        /// List id or share URL
        reference: String,
        /// Download the image (defaults to <title>-qr-code.png)
        #[arg(long, value_name = "FILE", num_args = 0..=1)]
        out: Option<Option<PathBuf>>,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
    /// Show status (data location, stored lists)
    Status,
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, origin, qr_service_url, qr_size, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    let config_path = cli.config.as_ref();

    // Config commands work on the file directly
    if let Some(Commands::Config { command }) = &cli.command {
        return match command.clone() {
            Some(ConfigCommands::Show) | None => commands::config::show(config_path, &output),
            Some(ConfigCommands::Set { key, value }) => {
                commands::config::set(key, value, config_path, &output)
            }
        };
    }

    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    // The editor logs to a file; everything else to stderr
    let Some(command) = cli.command else {
        return tui::run(config).await;
    };
    if matches!(command, Commands::Edit) {
        return tui::run(config).await;
    }
    logging::init_stderr();

    match command {
        Commands::Edit | Commands::Config { .. } => unreachable!(), // Handled above
        Commands::Create {
            title,
            description,
            items,
            copy,
            qr_out,
        } => {
            let request = commands::create::CreateRequest {
                title,
                description,
                items,
                copy,
                qr_out,
            };
            commands::create::create(&config, request, &output).await
        }
        Commands::View { reference, copy } => {
            commands::view::view(&config, &reference, copy, &output)
        }
        Commands::Qr { reference, out } => commands::qr::show(&config, &reference, out, &output).await,
        Commands::Status => commands::status::show(&config, &output),
    }
}
