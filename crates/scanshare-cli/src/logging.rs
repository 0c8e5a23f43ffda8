//! Logging setup
//!
//! Logging is off unless SCANSHARE_LOG is set to a level (or a full
//! filter directive). Plain commands log to stderr; the editor TUI owns the
//! terminal, so it logs to a file instead.

use std::fs::File;

use scanshare_core::Config;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log level
pub const LOG_ENV: &str = "SCANSHARE_LOG";

/// Build the filter for a SCANSHARE_LOG value
///
/// A bare level applies to both crates; anything containing `=` or `,` is
/// used as a directive as is.
pub fn filter_directive(value: &str) -> String {
    let value = value.trim();
    if value.contains('=') || value.contains(',') {
        value.to_string()
    } else {
        format!("scanshare_core={},scanshare={}", value, value)
    }
}

/// Log to stderr for CLI commands
pub fn init_stderr() {
    let Ok(level) = std::env::var(LOG_ENV) else {
        return;
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter_directive(&level)))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Log to a file for the editor TUI
///
/// Logs to `config.log_file` or `{data_dir}/debug.log`.
pub fn init_file(config: &Config) {
    let Ok(level) = std::env::var(LOG_ENV) else {
        return;
    };

    let log_path = config.log_path();
    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let log_file = match File::create(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not create log file {:?}: {}", log_path, e);
            return;
        }
    };

    // Initialize file-based logging (ignore error if already initialized)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter_directive(&level)))
        .with_target(false)
        .with_ansi(false)
        .with_writer(log_file)
        .try_init();

    info!("Editor logging initialized to {:?}", log_path);
}
