//! UI rendering

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use scanshare_core::media::{describe_data_uri, human_size};
use scanshare_core::render::{render, Mode, UNTITLED};
use scanshare_core::ItemKind;

use super::app::{item_label, ActivePane, App, CommandType, InputMode};
use crate::layout;

/// Widest the simulated phone gets, in columns
const PHONE_WIDTH: u16 = 40;

/// Main UI rendering function
pub fn draw(frame: &mut Frame, app: &App) {
    // Create vertical layout for status bar at the bottom
    let outer_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(frame.area());

    let pane_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(outer_chunks[0]);

    draw_items_pane(frame, app, pane_chunks[0]);
    draw_preview_pane(frame, app, pane_chunks[1]);

    match app.input_mode {
        InputMode::Normal => draw_status_bar(frame, app, outer_chunks[1]),
        InputMode::Command => draw_command_input(frame, app, outer_chunks[1]),
    }

    if app.show_help {
        draw_help_overlay(frame);
    }

    if let Some(message) = &app.error_message {
        draw_error_modal(frame, message);
    }
}

fn pane_styles(is_active: bool) -> (Style, Style) {
    if is_active {
        (
            Style::default().add_modifier(Modifier::BOLD),
            Style::default()
                .add_modifier(Modifier::BOLD)
                .add_modifier(Modifier::REVERSED),
        )
    } else {
        (
            Style::default(),
            Style::default().add_modifier(Modifier::REVERSED),
        )
    }
}

/// Draw the items pane (left)
fn draw_items_pane(frame: &mut Frame, app: &App, area: Rect) {
    let (border_style, highlight_style) = pane_styles(app.active_pane == ActivePane::Items);
    let document = app.editor.current();
    let max_len = area.width.saturating_sub(6) as usize;

    let items: Vec<ListItem> = document
        .items
        .iter()
        .map(|item| {
            let badge = match item.kind() {
                ItemKind::Text => Span::styled("¶ ", Style::default().fg(Color::Cyan)),
                ItemKind::Image => Span::styled("▣ ", Style::default().fg(Color::Magenta)),
            };
            let label = Line::from(vec![badge, Span::raw(truncate(&item_label(item), max_len))]);

            let detail = match item.kind() {
                ItemKind::Text => item
                    .content()
                    .lines()
                    .nth(if item.title.is_some() { 0 } else { 1 })
                    .unwrap_or("")
                    .to_string(),
                ItemKind::Image => {
                    let size = describe_data_uri(item.content())
                        .map(|(mime, size)| format!("{} · {}", mime, human_size(size)))
                        .unwrap_or_default();
                    match item.description() {
                        Some(caption) => format!("{} · {}", size, caption),
                        None => size,
                    }
                }
            };
            let detail = Line::from(Span::styled(
                format!("  {}", truncate(&detail, max_len)),
                Style::default().add_modifier(Modifier::DIM),
            ));

            ListItem::new(vec![label, detail])
        })
        .collect();

    let title = if document.title.trim().is_empty() {
        UNTITLED
    } else {
        document.title.as_str()
    };
    let block = Block::default()
        .title(format!(" {} ({}) ", truncate(title, max_len), document.len()))
        .borders(Borders::ALL)
        .border_style(border_style);

    if items.is_empty() {
        let hint = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "No items yet. Press a to add text, i to add an image",
                Style::default().add_modifier(Modifier::DIM),
            )),
        ])
        .block(block)
        .wrap(Wrap { trim: true });
        frame.render_widget(hint, area);
        return;
    }

    let list = List::new(items)
        .block(block)
        .highlight_style(highlight_style);

    let mut state = ListState::default();
    state.select(Some(app.selected));

    frame.render_stateful_widget(list, area, &mut state);
}

/// Draw the live preview (right): phone frame plus share links
fn draw_preview_pane(frame: &mut Frame, app: &App, area: Rect) {
    let (border_style, _) = pane_styles(app.active_pane == ActivePane::Preview);

    let block = Block::default()
        .title(" Preview ")
        .borders(Borders::ALL)
        .border_style(border_style);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let share_height = if app.last_share.is_some() { 4 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(share_height)])
        .split(inner);

    draw_phone(frame, app, chunks[0]);
    if app.last_share.is_some() {
        draw_share_links(frame, app, chunks[1]);
    }
}

fn draw_phone(frame: &mut Frame, app: &App, area: Rect) {
    let view = render(app.editor.current(), Mode::Preview);

    let width = PHONE_WIDTH.min(area.width);
    let phone_area = Rect::new(
        area.x + (area.width - width) / 2,
        area.y,
        width,
        area.height,
    );

    let phone = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded);
    let screen = phone.inner(phone_area);
    frame.render_widget(phone, phone_area);

    if screen.height == 0 {
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(screen);

    if let Some(device) = &view.frame {
        frame.render_widget(
            Paragraph::new(layout::status_bar_line(device, chunks[0].width)),
            chunks[0],
        );
    }

    let content = Paragraph::new(layout::view_lines(&view))
        .wrap(Wrap { trim: false })
        .scroll((app.preview_scroll, 0));
    frame.render_widget(content, chunks[1]);
}

fn draw_share_links(frame: &mut Frame, app: &App, area: Rect) {
    let Some(shared) = &app.last_share else {
        return;
    };
    let label = Style::default().add_modifier(Modifier::BOLD);

    let lines = vec![
        Line::from(vec![
            Span::styled("Link: ", label),
            Span::raw(shared.url.as_str()),
        ]),
        Line::from(vec![
            Span::styled("QR:   ", label),
            Span::styled(
                shared.qr_image_url.as_str(),
                Style::default().add_modifier(Modifier::DIM),
            ),
        ]),
    ];

    let (title, color) = if app.share_is_stale() {
        (" Shared (edited since, s to share again) ", Color::Yellow)
    } else {
        (" Shared ", Color::Green)
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::TOP)
        .border_style(Style::default().fg(color));

    frame.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: true }), area);
}

/// Draw the status bar at the bottom
fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let pending = app.editor.pending_imports();

    let content = if app.is_loading {
        "Downloading QR code...".to_string()
    } else if let Some(msg) = &app.status_message {
        msg.clone()
    } else if pending > 0 {
        format!("Importing {} image(s)...", pending)
    } else {
        "a:text  i:image  t:title  e:edit  d:del  K/J:move  s:share  y:copy  ?:help  q:quit"
            .to_string()
    };

    let paragraph = Paragraph::new(content).style(Style::default().add_modifier(Modifier::DIM));

    frame.render_widget(paragraph, area);
}

/// Draw command input at the bottom
fn draw_command_input(frame: &mut Frame, app: &App, area: Rect) {
    let prefix = ":";

    let hint = match app.command_type {
        Some(CommandType::AddImage) => "  (path to an image file: PNG, JPEG, GIF, WebP, TIFF, AVIF, SVG, ...)",
        Some(CommandType::Content) => "  (\\n for a new line, E for $EDITOR)",
        Some(CommandType::Generic) => "  (title desc text image name edit caption delete share qr quit)",
        _ => "",
    };

    let line = Line::from(vec![
        Span::styled(prefix, Style::default().fg(Color::Yellow)),
        Span::raw(app.command_input.as_str()),
        Span::styled(hint, Style::default().add_modifier(Modifier::DIM)),
    ]);

    frame.render_widget(Paragraph::new(line), area);

    let cursor_x = area.x + prefix.len() as u16 + app.command_cursor as u16;
    frame.set_cursor_position((cursor_x.min(area.right().saturating_sub(1)), area.y));
}

/// Centered popup area
fn popup_area(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(4));
    Rect::new(
        (area.width.saturating_sub(width)) / 2,
        (area.height.saturating_sub(height)) / 2,
        width,
        height,
    )
}

/// Draw error modal (any key dismisses)
fn draw_error_modal(frame: &mut Frame, message: &str) {
    let area = popup_area(frame.area(), 60, 7);
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Error ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    let lines = vec![
        Line::from(message.to_string()),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to continue",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];

    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

/// Draw help overlay
fn draw_help_overlay(frame: &mut Frame) {
    let popup_area = popup_area(frame.area(), 50, 26);
    frame.render_widget(Clear, popup_area);

    let help_text = vec![
        Line::from(vec![Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from("Navigation:"),
        Line::from("  j/k, ↑/↓    Move up/down (scroll preview)"),
        Line::from("  gg / G      Jump to first / last item"),
        Line::from("  Tab         Switch pane"),
        Line::from(""),
        Line::from("List:"),
        Line::from("  t           Edit title"),
        Line::from("  D           Edit description"),
        Line::from(""),
        Line::from("Items:"),
        Line::from("  a / i       Add text / image"),
        Line::from("  e / E       Edit text (inline / $EDITOR)"),
        Line::from("  n           Edit item title"),
        Line::from("  c           Edit image caption"),
        Line::from("  K / J       Move item up / down"),
        Line::from("  d           Delete item"),
        Line::from(""),
        Line::from("Sharing:"),
        Line::from("  s           Share (link + QR code)"),
        Line::from("  y           Share and copy link"),
        Line::from("  o           Open link in browser"),
        Line::from("  :qr [file]  Download QR code"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().add_modifier(Modifier::BOLD));

    frame.render_widget(Paragraph::new(help_text).block(block), popup_area);
}

/// Truncate to `max` chars, marking the cut with an ellipsis
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::app::App;
    use ratatui::{backend::TestBackend, Terminal};
    use scanshare_core::config::DEFAULT_QR_SERVICE_URL;
    use scanshare_core::{Editor, MemoryStore, ShareLinks};
    use std::sync::Arc;

    fn test_app() -> App {
        let store = Arc::new(MemoryStore::new());
        let links = ShareLinks::new("https://scanshare.app", DEFAULT_QR_SERVICE_URL, 300);
        App::new(Editor::new(store, links))
    }

    fn screen(app: &App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();

        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("this is a long string", 10), "this is a…");
        assert_eq!(truncate("Café au lait", 5), "Café…");
    }

    #[test]
    fn test_draw_empty_document() {
        let text = screen(&test_app(), 100, 30);
        assert!(text.contains("Untitled List (0)"));
        assert!(text.contains("9:41"));
        assert!(text.contains("100%"));
        assert!(text.contains("No items yet"));
        assert!(text.contains("Created with ScanShare"));
    }

    #[test]
    fn test_draw_items_and_share() {
        let mut app = test_app();
        app.editor.set_title("Menu");
        app.add_text("Soup - $5");
        app.share().unwrap();

        let text = screen(&app, 120, 30);
        assert!(text.contains("Menu (1)"));
        assert!(text.contains("Soup - $5"));
        assert!(text.contains("Link: https://scanshare.app/list/"));
        assert!(!text.contains("edited since"));

        app.add_text("Bread - $2");
        let text = screen(&app, 120, 30);
        assert!(text.contains("edited since"));
    }

    #[test]
    fn test_draw_tiny_terminal() {
        // Must not panic on degenerate sizes
        screen(&test_app(), 10, 4);
        screen(&test_app(), 1, 1);
    }
}
