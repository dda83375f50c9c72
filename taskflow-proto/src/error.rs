//! Error bodies returned by the service on non-2xx responses.

use serde::Deserialize;

/// Message used when a failed response carries no usable `error` field.
pub const GENERIC_FAILURE_MESSAGE: &str = "request failed";

/// `{ "error": "..." }` as sent by the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorBody {
    /// Human-readable message, if the service provided one.
    #[serde(default)]
    pub error: Option<String>,
}

/// Extracts the service's error message from a raw response body.
///
/// Falls back to [`GENERIC_FAILURE_MESSAGE`] when the body is not JSON,
/// has no `error` string, or the string is blank.
#[must_use]
pub fn error_message(body: &[u8]) -> String {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string())
}
