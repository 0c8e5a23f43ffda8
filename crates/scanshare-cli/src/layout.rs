//! Text layout of rendered lists
//!
//! Turns the view tree from `scanshare_core::render` into styled lines. The
//! TUI preview draws them inside a phone frame; `view` prints them plain.

use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};
use scanshare_core::media::{describe_data_uri, human_size};
use scanshare_core::render::{Body, DeviceFrame, ItemView, NotFoundView};
use scanshare_core::ListView;

/// Lines for a rendered list (header, items, footer)
///
/// The device frame, if any, is left to the caller.
pub fn view_lines(view: &ListView) -> Vec<Line<'static>> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let dim = Style::default().add_modifier(Modifier::DIM);

    let mut lines = vec![Line::from(Span::styled(view.header.title.clone(), bold))];
    if let Some(description) = &view.header.description {
        for text in description.lines() {
            lines.push(Line::from(Span::styled(text.to_string(), dim)));
        }
    }
    lines.push(Line::from(""));

    match &view.body {
        Body::Empty { message } => {
            lines.push(Line::from(Span::styled(*message, dim)));
        }
        Body::Items { items } => {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    lines.push(Line::from(""));
                }
                lines.extend(item_lines(item));
            }
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(view.footer, dim)));
    lines
}

fn item_lines(item: &ItemView) -> Vec<Line<'static>> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let mut lines = Vec::new();

    match item {
        ItemView::Text { title, body } => {
            if let Some(title) = title {
                lines.push(Line::from(Span::styled(title.clone(), bold)));
            }
            for text in body.lines() {
                lines.push(Line::from(text.to_string()));
            }
        }
        ItemView::Image {
            title,
            src,
            alt,
            caption,
        } => {
            if let Some(title) = title {
                lines.push(Line::from(Span::styled(title.clone(), bold)));
            }
            lines.push(Line::from(Span::styled(
                image_placeholder(alt, src),
                Style::default().add_modifier(Modifier::REVERSED),
            )));
            if let Some(caption) = caption {
                lines.push(Line::from(Span::styled(
                    caption.clone(),
                    Style::default().add_modifier(Modifier::ITALIC),
                )));
            }
        }
    }

    lines
}

/// Stand-in for an image the terminal can't show
pub fn image_placeholder(alt: &str, src: &str) -> String {
    match describe_data_uri(src) {
        Some((mime, size)) => format!("[▣ {} · {} · {}]", alt, mime, human_size(size)),
        None => format!("[▣ {}]", alt),
    }
}

/// Phone status bar spread across `width` columns
pub fn status_bar_line(frame: &DeviceFrame, width: u16) -> Line<'static> {
    let [left, middle, right] = frame.status_bar;
    let used = left.chars().count() + middle.chars().count() + right.chars().count();
    let free = (width as usize).saturating_sub(used);
    let gap_left = free / 2;
    let gap_right = free - gap_left;

    Line::from(vec![
        Span::raw(left),
        Span::raw(" ".repeat(gap_left)),
        Span::raw(middle),
        Span::raw(" ".repeat(gap_right)),
        Span::raw(right),
    ])
    .style(Style::default().add_modifier(Modifier::DIM))
}

/// Lines for the not-found state
pub fn not_found_lines(view: &NotFoundView) -> Vec<Line<'static>> {
    vec![
        Line::from(Span::styled(
            view.heading,
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(view.message),
        Line::from(""),
        Line::from(Span::styled(
            format!("[ {} ]", view.recovery.label()),
            Style::default().add_modifier(Modifier::REVERSED),
        )),
    ]
}

/// Flatten styled lines to plain text
pub fn to_plain(lines: &[Line<'_>]) -> String {
    lines
        .iter()
        .map(|line| {
            line.spans
                .iter()
                .map(|span| span.content.as_ref())
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
