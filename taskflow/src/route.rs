//! Screens the client can navigate between.

use std::fmt;

/// A navigable screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Welcome screen.
    Home,
    /// Credential entry.
    Login,
    /// The authenticated task list.
    Todos,
}

impl Route {
    /// Returns `true` for screens that require a session.
    #[must_use]
    pub const fn is_protected(self) -> bool {
        matches!(self, Self::Todos)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Home => write!(f, "Home"),
            Self::Login => write!(f, "Log In"),
            Self::Todos => write!(f, "My Tasks"),
        }
    }
}
