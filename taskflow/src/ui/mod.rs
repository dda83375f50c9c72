//! Terminal UI rendering.

pub mod home;
pub mod login;
pub mod status_bar;
pub mod task_list;
pub mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
};

use crate::app::App;
use crate::route::Route;
use crate::session::CredentialStore;
use crate::transport::Transport;

/// Main draw function for the entire UI.
pub fn draw<T: Transport + 'static, S: CredentialStore + 'static>(
    frame: &mut Frame,
    app: &App<T, S>,
) {
    // Create main layout with status bar at bottom
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(frame.area());

    let content_area = centered(main_chunks[0], 72);
    let status_area = main_chunks[1];

    match app.route {
        Route::Home => home::render(frame, content_area, app.has_session()),
        Route::Login => login::render(frame, content_area, &app.login),
        Route::Todos => task_list::render(frame, content_area, &app.todos),
    }

    status_bar::render(frame, status_area, app.route, app.has_session());
}

/// A horizontally centered column at most `max_width` wide.
fn centered(area: Rect, max_width: u16) -> Rect {
    let width = area.width.min(max_width);
    let margin = (area.width - width) / 2;
    Rect {
        x: area.x + margin,
        width,
        ..area
    }
}
