//! Login and logout.
//!
//! Login is the only writer that creates a session: a successful
//! `POST /login` carrying a token saves it into the credential store.
//! Logout clears the store.

use std::sync::Arc;

use tokio::sync::mpsc;
use zeroize::Zeroize;

use taskflow_proto::auth::{LoginRequest, LoginResponse};

use crate::gateway::{Gateway, GatewayError};
use crate::route::Route;
use crate::session::{CredentialStore, SessionToken};
use crate::transport::{Method, Transport};

/// Endpoint issuing session tokens.
pub const LOGIN_PATH: &str = "/login";

/// Why a login attempt failed. `Display` is shown on the login form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginError {
    /// Email or password left blank.
    #[error("email and password are required")]
    MissingCredentials,

    /// The service answered 2xx without a token.
    #[error("No token received from server")]
    MissingToken,

    /// The service refused the credentials with 401/403.
    #[error("invalid email or password")]
    Rejected,

    /// Any other gateway failure, including service-provided messages.
    #[error(transparent)]
    Gateway(GatewayError),
}

impl From<GatewayError> for LoginError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Unauthorized => Self::Rejected,
            other => Self::Gateway(other),
        }
    }
}

/// Exchanges credentials for a session token and stores it.
///
/// # Errors
///
/// Returns a [`LoginError`]; the store is left without a token.
pub async fn login<T: Transport, S: CredentialStore>(
    gateway: &Gateway<T, S>,
    request: &LoginRequest,
) -> Result<(), LoginError> {
    if request.email.trim().is_empty() || request.password.is_empty() {
        return Err(LoginError::MissingCredentials);
    }

    let response: LoginResponse = gateway.send_json(Method::Post, LOGIN_PATH, request).await?;
    let token = response.into_token().ok_or(LoginError::MissingToken)?;
    gateway.store().save(SessionToken::new(token));
    tracing::info!(email = %request.email, "logged in");
    Ok(())
}

/// Ends the session.
pub fn logout<S: CredentialStore + ?Sized>(store: &S) -> Route {
    store.clear();
    tracing::info!("logged out");
    Route::Login
}

/// Which field of the login form has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    /// Email input.
    Email,
    /// Password input.
    Password,
}

/// Completion of a login attempt.
#[derive(Debug)]
pub struct LoginEvent {
    attempt: u64,
    result: Result<(), LoginError>,
}

/// State of the login form and its in-flight attempt.
pub struct LoginController<T: Transport, S: CredentialStore> {
    gateway: Arc<Gateway<T, S>>,
    email: String,
    password: String,
    focus: LoginField,
    error: Option<String>,
    is_loading: bool,
    attempt: u64,
    event_tx: mpsc::Sender<LoginEvent>,
    event_rx: mpsc::Receiver<LoginEvent>,
}

impl<T: Transport + 'static, S: CredentialStore + 'static> LoginController<T, S> {
    /// Creates an empty form.
    #[must_use]
    pub fn new(gateway: Arc<Gateway<T, S>>) -> Self {
        let (event_tx, event_rx) = mpsc::channel(4);
        Self {
            gateway,
            email: String::new(),
            password: String::new(),
            focus: LoginField::Email,
            error: None,
            is_loading: false,
            attempt: 0,
            event_tx,
            event_rx,
        }
    }

    /// Email as typed.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Number of password characters typed (the password itself is never rendered).
    #[must_use]
    pub fn password_len(&self) -> usize {
        self.password.chars().count()
    }

    /// Focused field.
    #[must_use]
    pub const fn focus(&self) -> LoginField {
        self.focus
    }

    /// Moves focus to the other field.
    pub const fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            LoginField::Email => LoginField::Password,
            LoginField::Password => LoginField::Email,
        };
    }

    /// Mutable access to the focused field's text.
    pub const fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            LoginField::Email => &mut self.email,
            LoginField::Password => &mut self.password,
        }
    }

    /// Sets both fields at once.
    pub fn set_credentials(&mut self, email: &str, password: &str) {
        self.email = email.to_string();
        self.password.zeroize();
        self.password.push_str(password);
    }

    /// Message from the last failed attempt.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Returns `true` while an attempt is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Clears the password, error and any in-flight attempt.
    pub fn reset(&mut self) {
        self.password.zeroize();
        self.error = None;
        self.is_loading = false;
        self.attempt += 1;
        self.focus = LoginField::Email;
    }

    /// Starts a login attempt. Ignored while one is already in flight.
    pub fn submit(&mut self) {
        if self.is_loading {
            return;
        }
        if self.email.trim().is_empty() || self.password.is_empty() {
            self.error = Some(LoginError::MissingCredentials.to_string());
            return;
        }

        self.error = None;
        self.is_loading = true;
        self.attempt += 1;

        let request = LoginRequest {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        };
        let attempt = self.attempt;
        let gateway = Arc::clone(&self.gateway);
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let mut request = request;
            let result = login(gateway.as_ref(), &request).await;
            request.password.zeroize();
            if tx.send(LoginEvent { attempt, result }).await.is_err() {
                tracing::debug!("login form dropped before completion");
            }
        });
    }

    /// Applies a completed attempt. Returns `Some(Route::Todos)` on success.
    pub fn apply(&mut self, event: LoginEvent) -> Option<Route> {
        if event.attempt != self.attempt {
            tracing::debug!(attempt = event.attempt, "discarding stale login result");
            return None;
        }
        self.is_loading = false;
        match event.result {
            Ok(()) => {
                self.password.zeroize();
                self.error = None;
                Some(Route::Todos)
            }
            Err(e) => {
                tracing::warn!(error = ?e, "login failed");
                self.error = Some(e.to_string());
                None
            }
        }
    }

    /// Applies every completion that has already arrived.
    pub fn drain_events(&mut self) -> Option<Route> {
        let mut route = None;
        while let Ok(event) = self.event_rx.try_recv() {
            route = self.apply(event).or(route);
        }
        route
    }

    /// Waits for the next completion and applies it.
    pub async fn process_next(&mut self) -> Option<Route> {
        let event = self.event_rx.recv().await?;
        self.apply(event)
    }
}
