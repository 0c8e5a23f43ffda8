//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use scanshare_core::{PublicView, SharedList};

use crate::layout;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Print a freshly shared list
    pub fn print_shared(&self, shared: &SharedList) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:      {}", shared.id);
                println!("Link:    {}", shared.url);
                println!("QR code: {}", shared.qr_image_url);
            }
            OutputFormat::Json => {
                println!("{}", shared_json(shared));
            }
            OutputFormat::Quiet => {
                println!("{}", shared.url);
            }
        }
    }

    /// Print the public view of a list
    pub fn print_public(&self, public: &PublicView) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Human => {
                let lines = match public {
                    PublicView::Found { view } => layout::view_lines(view),
                    PublicView::NotFound { view } => layout::not_found_lines(view),
                };
                println!("{}", layout::to_plain(&lines));
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(public)?);
            }
            OutputFormat::Quiet => {
                if let PublicView::Found { view } = public {
                    println!("{}", view.header.title);
                }
            }
        }
        Ok(())
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print a warning (stderr, so JSON on stdout stays parseable)
    pub fn warn(&self, message: &str) {
        if !self.is_quiet() {
            eprintln!("⚠ {}", message);
        }
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

fn shared_json(shared: &SharedList) -> serde_json::Value {
    serde_json::json!({
        "id": shared.id.as_str(),
        "url": shared.url,
        "qr_image_url": shared.qr_image_url
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use scanshare_core::ListId;

    #[test]
    fn test_format_from_flags() {
        assert_eq!(OutputFormat::from_flags(false, false), OutputFormat::Human);
        assert_eq!(OutputFormat::from_flags(true, false), OutputFormat::Json);
        assert_eq!(OutputFormat::from_flags(false, true), OutputFormat::Quiet);
        // Quiet takes precedence
        assert_eq!(OutputFormat::from_flags(true, true), OutputFormat::Quiet);
    }

    #[test]
    fn test_shared_json() {
        let shared = SharedList {
            id: ListId::parse("abc").unwrap(),
            url: "https://scanshare.app/list/abc".to_string(),
            qr_image_url: "https://qr.test/?size=300x300&data=x".to_string(),
        };
        let value = shared_json(&shared);
        assert_eq!(value["id"], "abc");
        assert_eq!(value["url"], "https://scanshare.app/list/abc");
        assert_eq!(value["qr_image_url"], "https://qr.test/?size=300x300&data=x");
    }
}
