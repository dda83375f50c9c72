//! Login form rendering.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::theme;
use crate::auth::{LoginController, LoginField};
use crate::session::CredentialStore;
use crate::transport::Transport;

/// Render the login form (email, masked password, error line, button hint).
pub fn render<T: Transport + 'static, S: CredentialStore + 'static>(
    frame: &mut Frame,
    area: Rect,
    form: &LoginController<T, S>,
) {
    let outer = Block::default()
        .title(Span::styled("Welcome back", theme::panel_title(theme::BRAND)))
        .borders(Borders::ALL)
        .border_style(theme::normal());
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Error line
            Constraint::Length(3), // Email
            Constraint::Length(3), // Password
            Constraint::Length(1), // Submit hint
            Constraint::Min(0),
        ])
        .split(inner);

    if let Some(error) = form.error() {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(error, theme::error()))),
            chunks[0],
        );
    }

    let email_focused = form.focus() == LoginField::Email;
    render_field(frame, chunks[1], "Email address", form.email(), email_focused);

    let masked = "•".repeat(form.password_len());
    render_field(frame, chunks[2], "Password", &masked, !email_focused);

    let hint = if form.is_loading() {
        Span::styled("Signing in...", theme::dimmed())
    } else {
        Span::styled("Enter: Sign in", theme::highlighted())
    };
    frame.render_widget(Paragraph::new(Line::from(hint)), chunks[3]);
}

/// Render one labelled input box.
fn render_field(frame: &mut Frame, area: Rect, label: &str, value: &str, focused: bool) {
    let mut text = value.to_string();
    if focused {
        text.push('█');
    }
    let block = Block::default()
        .title(label.to_string())
        .borders(Borders::ALL)
        .border_style(theme::border(focused));
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(text, theme::normal()))).block(block),
        area,
    );
}
