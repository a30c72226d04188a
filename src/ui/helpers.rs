use anyhow::Error;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::models::Book;

/// One row of the record list: id, read marker, the catalog line and the page
/// count. Read books are dimmed so unread ones stand out.
pub(crate) fn book_list_line(book: &Book) -> Line<'static> {
    let marker = if book.is_read { "[x]" } else { "[ ]" };
    let body_style = if book.is_read {
        Style::default().fg(Color::Gray)
    } else {
        Style::default()
    };
    Line::from(vec![
        Span::styled(
            format!("{:>4} ", book.id),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(format!("{marker} "), Style::default().fg(Color::Cyan)),
        Span::styled(book.to_string(), body_style),
        Span::styled(
            format!("  · {} pages", book.pages),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ),
    ])
}

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Extract the most relevant error message from a chained error.
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}
