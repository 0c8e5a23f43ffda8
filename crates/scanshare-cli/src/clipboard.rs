//! System clipboard
//!
//! Shells out to the platform's copy command, detached from the terminal's
//! stdout/stderr so it doesn't interfere with the TUI.

use std::io::{self, Write};
use std::process::{Command, Stdio};

use scanshare_core::share::{Clipboard, ShareError};
use tracing::debug;

/// Clipboard backed by the platform's copy command
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClipboard;

/// Copy commands to try, in order
#[cfg(target_os = "macos")]
const COPY_COMMANDS: &[(&str, &[&str])] = &[("pbcopy", &[])];

#[cfg(target_os = "windows")]
const COPY_COMMANDS: &[(&str, &[&str])] = &[("clip", &[])];

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const COPY_COMMANDS: &[(&str, &[&str])] = &[
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
];

impl Clipboard for SystemClipboard {
    fn copy(&self, text: &str) -> Result<(), ShareError> {
        for (program, args) in COPY_COMMANDS {
            match pipe_to(program, args, text) {
                Ok(()) => {
                    debug!("Copied {} bytes with {}", text.len(), program);
                    return Ok(());
                }
                // Not installed, try the next one
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(ShareError::Clipboard(format!("{}: {}", program, e))),
            }
        }

        Err(ShareError::Clipboard(format!(
            "no clipboard command found (tried {})",
            COPY_COMMANDS
                .iter()
                .map(|(program, _)| *program)
                .collect::<Vec<_>>()
                .join(", ")
        )))
    }
}

/// Run a command with `input` on its stdin
fn pipe_to(program: &str, args: &[&str], input: &str) -> io::Result<()> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(input.as_bytes())?;
    }

    let status = child.wait()?;
    if status.success() {
        Ok(())
    } else {
        Err(io::Error::new(
            io::ErrorKind::Other,
            format!("exited with {}", status),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_commands_listed() {
        assert!(!COPY_COMMANDS.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_pipe_to() {
        assert!(pipe_to("cat", &[], "hello").is_ok());
        assert!(pipe_to("false", &[], "").is_err());

        let err = pipe_to("definitely_not_a_real_command_12345", &[], "").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
