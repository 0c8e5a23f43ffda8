//! External editor support
//!
//! Opens $EDITOR for multi-line text item bodies.

use anyhow::{bail, Context, Result};
use std::env;
use std::fs;
use std::process::Command;

/// Header lines written above the text; stripped on the way back
const COMMENT_PREFIX: &str = "#: ";

/// Edit a text item body in the user's preferred editor
///
/// Returns `None` if the editor left the body unchanged.
pub fn edit_body(current: &str) -> Result<Option<String>> {
    let template = format!(
        "{p}Edit the item text below. Lines starting with '{p}' are ignored.\n{}",
        current,
        p = COMMENT_PREFIX
    );

    let content = edit_text(&template)?;
    let body = strip_comments(&content);

    if body == current.trim_end() {
        Ok(None)
    } else {
        Ok(Some(body))
    }
}

/// Drop header lines and trailing whitespace
fn strip_comments(content: &str) -> String {
    content
        .lines()
        .filter(|line| !line.starts_with(COMMENT_PREFIX))
        .collect::<Vec<_>>()
        .join("\n")
        .trim_end()
        .to_string()
}

/// Open content in the user's preferred editor
///
/// Uses $EDITOR, $VISUAL, or falls back to common editors.
pub fn edit_text(initial_content: &str) -> Result<String> {
    let editor = find_editor()?;

    let temp_path = env::temp_dir().join(format!("scanshare_edit_{}.txt", std::process::id()));

    fs::write(&temp_path, initial_content)
        .with_context(|| format!("Failed to create temp file: {:?}", temp_path))?;

    let status = Command::new(&editor)
        .arg(&temp_path)
        .status()
        .with_context(|| format!("Failed to run editor: {}", editor))?;

    if !status.success() {
        let _ = fs::remove_file(&temp_path);
        bail!(
            "Editor '{}' exited with non-zero status. Check that your editor is configured correctly.",
            editor
        );
    }

    let content = fs::read_to_string(&temp_path)
        .with_context(|| format!("Failed to read edited file: {:?}", temp_path))?;

    let _ = fs::remove_file(&temp_path);

    Ok(content)
}

/// Find the user's preferred editor
fn find_editor() -> Result<String> {
    for var in ["EDITOR", "VISUAL"] {
        if let Ok(editor) = env::var(var) {
            if !editor.is_empty() {
                return Ok(editor);
            }
        }
    }

    let common_editors = ["nano", "vim", "vi", "emacs", "notepad"];
    if let Some(editor) = common_editors.into_iter().find(|e| command_exists(e)) {
        return Ok(editor.to_string());
    }

    bail!(
        "No editor found. Set $EDITOR environment variable.\n\
         Example: export EDITOR=nano"
    )
}

/// Check if a command exists in PATH
fn command_exists(cmd: &str) -> bool {
    Command::new("which")
        .arg(cmd)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}
