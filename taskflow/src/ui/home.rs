//! Welcome screen.

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::theme;

/// Render the welcome screen.
pub fn render(frame: &mut Frame, area: Rect, has_session: bool) {
    let next_step = if has_session {
        Line::from(vec![
            Span::styled("t", theme::highlighted()),
            Span::raw(": open your tasks   "),
            Span::styled("Enter", theme::highlighted()),
            Span::raw(": log in as someone else"),
        ])
    } else {
        Line::from(vec![
            Span::styled("Enter", theme::highlighted()),
            Span::raw(": sign in"),
        ])
    };

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Organize Your Life with TaskFlow",
            theme::panel_title(theme::BRAND),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Keep track of what needs doing, right from your terminal.",
            theme::dimmed(),
        )),
        Line::from(""),
        next_step,
    ];

    let block = Block::default()
        .title(Span::styled("TaskFlow", theme::panel_title(theme::BRAND)))
        .borders(Borders::ALL)
        .border_style(theme::normal());

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block);

    frame.render_widget(paragraph, area);
}
