//! ScanShare editor TUI
//!
//! ## Layout
//!
//! Two panes:
//! - Left: the list's items, in order
//! - Right: live preview of the list inside a phone frame, plus the latest
//!   share link and QR code URL
//!
//! ## Navigation
//!
//! - j/k or ↑/↓: Move selection (or scroll the preview)
//! - gg / G: First / last item
//! - Tab: Switch pane
//! - q: Quit
//!
//! ## Commands
//!
//! - t / D: Edit title / description
//! - a / i: Add text / image
//! - e / E: Edit text inline / in $EDITOR
//! - n / c: Edit item title / image caption
//! - K / J: Move item up / down
//! - d: Delete item
//! - s / y / o: Share / share and copy link / open link
//! - :: Command mode

mod app;
mod ui;

use std::io::stdout;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use scanshare_core::{Config, Direction, Editor, ItemField, ItemId, ShareLinks};
use tracing::info;

use app::{App, CommandResult, CommandType, InputMode};

use crate::clipboard::SystemClipboard;
use crate::{editor, logging, qr};

/// Window for the second key of `gg`
const PENDING_G_TIMEOUT: Duration = Duration::from_millis(500);

/// Run the editor TUI
pub async fn run(config: Config) -> Result<()> {
    logging::init_file(&config);

    let store = Arc::new(crate::commands::open_store(&config)?);
    let editor = Editor::new(store, ShareLinks::from_config(&config));
    let mut app = App::new(editor);

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    let discarded = app.close();
    if discarded > 0 {
        info!("Discarded {} unfinished image import(s) on exit", discarded);
    }

    result
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    let mut pending_g: Option<Instant> = None;

    loop {
        app.check_status_timeout();
        app.collect_imports();

        terminal.draw(|frame| ui::draw(frame, app))?;

        // Short sleep keeps the runtime free for image imports
        tokio::time::sleep(Duration::from_millis(50)).await;

        while event::poll(Duration::from_millis(0))? {
            let Event::Key(key) = event::read()? else {
                continue;
            };
            // Only handle key press events (not release)
            if key.kind != KeyEventKind::Press {
                continue;
            }

            // If error modal is showing, any key dismisses it
            if app.has_error() {
                app.clear_error();
                continue;
            }

            // If help is showing, any key dismisses it
            if app.show_help {
                app.show_help = false;
                continue;
            }

            match app.input_mode {
                InputMode::Normal => {
                    if let Some(id) = handle_normal_mode(app, key.code, key.modifiers, &mut pending_g) {
                        edit_in_editor(terminal, app, &id)?;
                    }
                }
                InputMode::Command => {
                    handle_command_mode(terminal, app, key.code, key.modifiers).await?
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Handle key events in normal mode
///
/// Returns the item to open in $EDITOR, if any.
fn handle_normal_mode(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    pending_g: &mut Option<Instant>,
) -> Option<ItemId> {
    // Clear pending 'g' if timeout expired
    if pending_g.is_some_and(|time| time.elapsed() > PENDING_G_TIMEOUT) {
        *pending_g = None;
    }

    match code {
        // Quit
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
        }

        // Navigation
        KeyCode::Char('k') | KeyCode::Up => app.move_up(),
        KeyCode::Char('j') | KeyCode::Down => app.move_down(),
        KeyCode::Tab | KeyCode::BackTab => app.next_pane(),
        KeyCode::Char('G') => {
            *pending_g = None;
            app.move_to_last();
        }
        KeyCode::Char('g') => {
            if pending_g.take().is_none() {
                *pending_g = Some(Instant::now());
            } else {
                app.move_to_first();
            }
        }

        // Reorder
        KeyCode::Char('K') => app.move_current(Direction::Up),
        KeyCode::Char('J') => app.move_current(Direction::Down),
        KeyCode::Char('d') => app.delete_current(),

        // Editing prompts
        KeyCode::Char('t') => app.enter_command_mode(CommandType::Title),
        KeyCode::Char('D') => app.enter_command_mode(CommandType::Description),
        KeyCode::Char('a') => app.enter_command_mode(CommandType::AddText),
        KeyCode::Char('i') => app.enter_command_mode(CommandType::AddImage),
        KeyCode::Char('n') => app.enter_command_mode(CommandType::ItemTitle),
        KeyCode::Char('e') => app.enter_command_mode(CommandType::Content),
        KeyCode::Char('c') => app.enter_command_mode(CommandType::Caption),
        KeyCode::Char('E') => return app.external_edit_target(),

        // Sharing
        KeyCode::Char('s') => {
            if let Err(e) = app.share() {
                app.set_error(format!("Failed to share list: {}", e));
            }
        }
        KeyCode::Char('y') => {
            if let Err(e) = app.copy_link(&SystemClipboard) {
                app.set_error(format!("Failed to share list: {}", e));
            }
        }
        KeyCode::Char('o') => match app.latest_link() {
            Ok(shared) => {
                if let Err(e) = open::that(&shared.url) {
                    app.set_error(format!("Failed to open browser: {}", e));
                }
            }
            Err(e) => app.set_error(format!("Failed to share list: {}", e)),
        },

        KeyCode::Char(':') => app.enter_command_mode(CommandType::Generic),
        KeyCode::Char('?') => app.toggle_help(),

        _ => {}
    }

    // Any key other than g ends a gg sequence
    if code != KeyCode::Char('g') {
        *pending_g = None;
    }
    None
}

/// Handle key events in command mode
async fn handle_command_mode<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
) -> Result<()> {
    match code {
        // Cancel command
        KeyCode::Esc => app.exit_input_mode(),
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => app.exit_input_mode(),

        // Execute command
        KeyCode::Enter => {
            let result = app.execute_command();
            app.exit_input_mode();

            match result {
                Ok(CommandResult::Done) => {}
                Ok(CommandResult::NeedEditor(id)) => edit_in_editor(terminal, app, &id)?,
                Ok(CommandResult::NeedDownload { url, path }) => {
                    app.is_loading = true;
                    terminal.draw(|frame| ui::draw(frame, app))?;

                    let downloaded = qr::download(&url, &path).await;
                    app.is_loading = false;
                    match downloaded {
                        Ok(_) => app.set_status(format!("Saved QR code to {}", path.display())),
                        Err(e) => app.set_error(format!("{:#}", e)),
                    }
                }
                Err(e) => app.set_error(format!("Command failed: {}", e)),
            }
        }

        // Text input
        KeyCode::Char(c) => app.insert_char(c),
        KeyCode::Backspace => app.delete_char(),
        KeyCode::Left => app.cursor_left(),
        KeyCode::Right => app.cursor_right(),

        _ => {}
    }

    Ok(())
}

/// Leave the TUI to edit a text item's body in $EDITOR
fn edit_in_editor<B: Backend>(terminal: &mut Terminal<B>, app: &mut App, id: &ItemId) -> Result<()> {
    let Some(current) = app.editor.current().item(id).map(|item| item.content().to_string())
    else {
        return Ok(());
    };

    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    stdout().execute(cursor::Show)?;

    let edited = editor::edit_body(&current);

    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    terminal.clear().context("Failed to redraw after editor")?;

    match edited {
        Ok(Some(body)) => {
            app.editor.update_item(id, ItemField::Content, body);
            app.set_status("Item updated");
        }
        Ok(None) => app.set_status("Edit cancelled (no changes)"),
        Err(e) => app.set_error(format!("Editor failed: {}", e)),
    }

    Ok(())
}
