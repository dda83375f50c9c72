//! Login request and response bodies.

use serde::{Deserialize, Serialize};

/// Body of `POST /login`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Account email address.
    pub email: String,
    /// Account password, sent as-is.
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Successful `POST /login` body.
///
/// The token is optional on the wire: a 2xx without a token is treated
/// as a failed login by the client.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Opaque bearer token.
    #[serde(default)]
    pub token: Option<String>,
}

impl LoginResponse {
    /// Returns the token if present and non-empty.
    #[must_use]
    pub fn into_token(self) -> Option<String> {
        self.token.filter(|t| !t.is_empty())
    }
}

impl std::fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginResponse")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
