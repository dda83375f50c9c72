//! Application state and event handling.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::auth::{self, LoginController};
use crate::gateway::Gateway;
use crate::route::Route;
use crate::session::CredentialStore;
use crate::todos::ListController;
use crate::transport::Transport;

/// Main application state.
pub struct App<T: Transport, S: CredentialStore> {
    gateway: Arc<Gateway<T, S>>,
    /// Screen currently shown.
    pub route: Route,
    /// Login form.
    pub login: LoginController<T, S>,
    /// Task list view.
    pub todos: ListController<T, S>,
    /// Whether the app should quit.
    pub should_quit: bool,
}

impl<T: Transport + 'static, S: CredentialStore + 'static> App<T, S> {
    /// Creates the app on the home screen. Call [`start`](Self::start) to
    /// pick the first real screen.
    #[must_use]
    pub fn new(gateway: Arc<Gateway<T, S>>, event_buffer: usize) -> Self {
        Self {
            login: LoginController::new(Arc::clone(&gateway)),
            todos: ListController::new(Arc::clone(&gateway), event_buffer),
            gateway,
            route: Route::Home,
            should_quit: false,
        }
    }

    /// Goes straight to the task list when a session survived from a
    /// previous run, otherwise stays on the home screen.
    pub fn start(&mut self) {
        if self.gateway.store().has_session() {
            self.navigate(Route::Todos);
        }
    }

    /// Whether a session token is currently stored.
    #[must_use]
    pub fn has_session(&self) -> bool {
        self.gateway.store().has_session()
    }

    /// Switches screens, unmounting and mounting views as needed.
    pub fn navigate(&mut self, route: Route) {
        if self.route.is_protected() && !route.is_protected() {
            self.todos.unmount();
        }
        tracing::debug!(from = %self.route, to = %route, "navigating");
        self.route = route;

        match route {
            Route::Login => self.login.reset(),
            Route::Todos => {
                if let Some(redirect) = self.todos.mount() {
                    self.navigate(redirect);
                }
            }
            Route::Home => {}
        }
    }

    /// Applies all request completions that have arrived since the last tick.
    pub fn tick(&mut self) {
        if let Some(route) = self.login.drain_events() {
            self.navigate(route);
        }
        if let Some(route) = self.todos.drain_events() {
            self.navigate(route);
        }
    }

    /// Handle a key event.
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        // Global shortcuts
        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) | (KeyCode::Esc, _) => {
                self.should_quit = true;
                return;
            }
            (KeyCode::Char('l'), KeyModifiers::CONTROL) => {
                let route = auth::logout(self.gateway.store());
                self.navigate(route);
                return;
            }
            _ => {}
        }

        // Screen-specific shortcuts
        match self.route {
            Route::Home => self.handle_home_key(key),
            Route::Login => self.handle_login_key(key),
            Route::Todos => self.handle_todos_key(key),
        }
    }

    /// Handle key event on the home screen.
    fn handle_home_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter | KeyCode::Char('l') => self.navigate(Route::Login),
            KeyCode::Char('t') => self.navigate(Route::Todos),
            _ => {}
        }
    }

    /// Handle key event on the login form.
    fn handle_login_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.login.toggle_focus();
            }
            KeyCode::Enter => self.login.submit(),
            KeyCode::Backspace => {
                self.login.focused_mut().pop();
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.login.focused_mut().push(c);
            }
            _ => {}
        }
    }

    /// Handle key event on the task list.
    fn handle_todos_key(&mut self, key: KeyEvent) {
        match (key.code, key.modifiers) {
            (KeyCode::Char('r'), KeyModifiers::CONTROL) => self.navigate(Route::Todos),
            (KeyCode::Enter, _) => {
                if let Some(route) = self.todos.submit() {
                    self.navigate(route);
                }
            }
            (KeyCode::Backspace, _) => {
                self.todos.input_mut().pop();
            }
            (KeyCode::Char(c), m) if !m.contains(KeyModifiers::CONTROL) => {
                self.todos.input_mut().push(c);
            }
            _ => {}
        }
    }
}
