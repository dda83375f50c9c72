//! Status bar rendering.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use super::theme;
use crate::route::Route;

/// Render the status bar at the bottom of the screen.
pub fn render(frame: &mut Frame, area: Rect, route: Route, has_session: bool) {
    let help_text = match route {
        Route::Home => "Enter: sign in | t: my tasks | Esc: quit",
        Route::Login => "Enter: sign in | Tab: switch field | Esc: quit",
        Route::Todos => "Enter: add task | Ctrl+R: reload | Ctrl+L: log out | Esc: quit",
    };

    let (dot_color, session_text) = if has_session {
        (theme::SUCCESS, "Signed in")
    } else {
        (theme::WARNING, "Signed out")
    };

    let status_line = Line::from(vec![
        Span::styled(
            concat!("TaskFlow v", env!("CARGO_PKG_VERSION")),
            theme::bold(),
        ),
        Span::raw(" | "),
        Span::styled(route.to_string(), theme::normal()),
        Span::raw(" | "),
        Span::styled("●", theme::normal().fg(dot_color)),
        Span::raw(format!(" {session_text}")),
        Span::raw(" | "),
        Span::styled(help_text, theme::dimmed()),
    ]);

    let paragraph = Paragraph::new(status_line).style(theme::status_bar_bg());
    frame.render_widget(paragraph, area);
}
