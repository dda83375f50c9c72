//! Authenticated request gateway.
//!
//! Every call to the remote service goes through [`Gateway::request`]. The
//! gateway attaches the current session token, sends the request over a
//! [`Transport`], and classifies the response into JSON or a
//! [`GatewayError`].
//!
//! # Policy
//!
//! A 401 or 403 clears the [`CredentialStore`] before the error is returned.
//! Callers never clear the store themselves. The gateway only reports; it
//! never decides where the user goes next.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use taskflow_proto::codec;
use taskflow_proto::error::{GENERIC_FAILURE_MESSAGE, error_message};

use crate::session::CredentialStore;
use crate::transport::{HttpRequest, HttpResponse, Method, Transport, TransportError};

/// Classified failure of a gateway call.
///
/// The `Display` text is what the user sees inline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// 401 or 403: the session is missing, invalid, or expired.
    #[error("session expired, please log in again")]
    Unauthorized,

    /// No response reached the client.
    #[error("could not reach the server")]
    Unreachable(String),

    /// A 2xx response whose body was not the expected JSON.
    #[error("the server sent an unreadable response")]
    MalformedResponse(String),

    /// A non-2xx, non-auth response; `message` comes from the service.
    #[error("{message}")]
    Remote {
        /// Service-provided message, or the generic fallback.
        message: String,
        /// HTTP status code.
        status: u16,
    },

    /// The request body could not be encoded.
    #[error("could not encode request: {0}")]
    InvalidRequest(String),
}

impl GatewayError {
    /// Returns `true` for [`GatewayError::Unauthorized`].
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// HTTP status of a [`GatewayError::Remote`] error.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Inline message for this error. Never empty.
    #[must_use]
    pub fn user_message(&self) -> String {
        let msg = self.to_string();
        if msg.trim().is_empty() {
            GENERIC_FAILURE_MESSAGE.to_string()
        } else {
            msg
        }
    }
}

impl From<TransportError> for GatewayError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Unreachable(detail) | TransportError::InvalidUrl(detail) => {
                Self::Unreachable(detail)
            }
            TransportError::Body(detail) => Self::MalformedResponse(detail),
        }
    }
}

/// Classifies a response that reached the client.
///
/// Pure: performs no side effects. [`Gateway::request`] applies the
/// credential-clearing policy on top of this.
///
/// # Errors
///
/// See [`GatewayError`] for the mapping from status codes.
pub fn classify(response: &HttpResponse) -> Result<serde_json::Value, GatewayError> {
    match response.status {
        401 | 403 => Err(GatewayError::Unauthorized),
        200..=299 => codec::decode_value(&response.body)
            .map_err(|e| GatewayError::MalformedResponse(e.to_string())),
        status => Err(GatewayError::Remote {
            message: error_message(&response.body),
            status,
        }),
    }
}

/// Mediates all calls to the remote service.
pub struct Gateway<T: Transport, S: CredentialStore> {
    transport: T,
    store: Arc<S>,
}

impl<T: Transport, S: CredentialStore> Gateway<T, S> {
    /// Creates a gateway over `transport` reading tokens from `store`.
    pub const fn new(transport: T, store: Arc<S>) -> Self {
        Self { transport, store }
    }

    /// The credential store this gateway reads and clears.
    #[must_use]
    pub const fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// The underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Issues a request and returns the parsed JSON body.
    ///
    /// The request is sent even without a stored token; endpoints that need
    /// one are gated by their callers.
    ///
    /// # Errors
    ///
    /// Returns a classified [`GatewayError`]. On
    /// [`GatewayError::Unauthorized`] the credential store has already been
    /// cleared.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<serde_json::Value, GatewayError> {
        let body = body
            .map(|b| codec::encode(&b))
            .transpose()
            .map_err(|e| GatewayError::InvalidRequest(e.to_string()))?;
        let request = HttpRequest {
            method,
            path: path.to_string(),
            bearer: self.store.load(),
            body,
        };

        let result = match self.transport.send(request).await {
            Ok(response) => classify(&response),
            Err(e) => Err(GatewayError::from(e)),
        };

        match &result {
            Ok(_) => tracing::debug!(%method, path, "request succeeded"),
            Err(GatewayError::Unauthorized) => {
                tracing::warn!(%method, path, "authorization denied, clearing session");
                self.store.clear();
            }
            Err(e) => tracing::warn!(%method, path, error = ?e, "request failed"),
        }
        result
    }

    /// Issues a request and decodes the 2xx body as `R`.
    ///
    /// # Errors
    ///
    /// As [`request`](Self::request); a body of the wrong shape is
    /// [`GatewayError::MalformedResponse`].
    pub async fn request_as<R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<R, GatewayError> {
        let value = self.request(method, path, body).await?;
        codec::from_value(value).map_err(|e| GatewayError::MalformedResponse(e.to_string()))
    }

    /// Serializes `body`, issues the request, and decodes the response as `R`.
    ///
    /// # Errors
    ///
    /// As [`request_as`](Self::request_as), plus
    /// [`GatewayError::InvalidRequest`] if `body` cannot be serialized.
    pub async fn send_json<B: Serialize + Sync, R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<R, GatewayError> {
        let value =
            serde_json::to_value(body).map_err(|e| GatewayError::InvalidRequest(e.to_string()))?;
        self.request_as(method, path, Some(value)).await
    }
}
