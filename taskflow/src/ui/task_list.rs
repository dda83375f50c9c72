//! Task list rendering.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

use super::theme;
use crate::session::CredentialStore;
use crate::todos::{ListController, ViewState};
use crate::transport::Transport;

/// Render the task view for the current [`ViewState`].
pub fn render<T: Transport + 'static, S: CredentialStore + 'static>(
    frame: &mut Frame,
    area: Rect,
    list: &ListController<T, S>,
) {
    let block = Block::default()
        .title(Span::styled("My Tasks", theme::panel_title(theme::BRAND)))
        .borders(Borders::ALL)
        .border_style(theme::normal());

    match list.state() {
        ViewState::Loading => {
            let paragraph = Paragraph::new(Line::from(Span::styled(
                "Loading your tasks...",
                theme::dimmed(),
            )))
            .alignment(Alignment::Center)
            .block(block);
            frame.render_widget(paragraph, area);
        }
        ViewState::Error(message) => {
            let lines = vec![
                Line::from(Span::styled(message.as_str(), theme::error())),
                Line::from(""),
                Line::from(Span::styled("Ctrl+R: try again", theme::dimmed())),
            ];
            let paragraph = Paragraph::new(lines)
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(paragraph, area);
        }
        ViewState::Ready(_) => {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            render_ready(frame, inner, list);
        }
    }
}

/// Render notice, input box and the list itself.
fn render_ready<T: Transport + 'static, S: CredentialStore + 'static>(
    frame: &mut Frame,
    area: Rect,
    list: &ListController<T, S>,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Notice
            Constraint::Length(3), // Input
            Constraint::Min(1),    // Tasks
        ])
        .split(area);

    if let Some(notice) = list.notice() {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(notice, theme::error())))
                .alignment(Alignment::Center),
            chunks[0],
        );
    }

    let input_line = if list.input().is_empty() {
        Line::from(vec![
            Span::styled("█", theme::normal()),
            Span::styled("Add a new task...", theme::dimmed()),
        ])
    } else {
        Line::from(Span::styled(format!("{}█", list.input()), theme::normal()))
    };
    let input_block = Block::default()
        .title("New task")
        .borders(Borders::ALL)
        .border_style(theme::border(true));
    frame.render_widget(Paragraph::new(input_line).block(input_block), chunks[1]);

    let tasks = list.tasks();
    if tasks.is_empty() {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                "You have no tasks yet. Add one to get started!",
                theme::dimmed(),
            )))
            .alignment(Alignment::Center),
            chunks[2],
        );
        return;
    }

    let items: Vec<ListItem> = tasks
        .iter()
        .map(|task| {
            ListItem::new(Line::from(vec![
                Span::styled("✓", theme::normal().fg(theme::SUCCESS)),
                Span::raw(" "),
                Span::styled(task.title.as_str(), theme::normal()),
            ]))
        })
        .collect();
    frame.render_widget(List::new(items), chunks[2]);
}
