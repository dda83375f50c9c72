//! Transport layer abstraction for `TaskFlow`.
//!
//! Defines the [`Transport`] trait that carries one HTTP exchange.
//! Concrete implementations include:
//! - [`http::HttpTransport`]: `reqwest` against the remote service
//! - [`loopback::LoopbackTransport`]: in-process scripted responses for testing
//!
//! Transports move bytes and report status codes. They never interpret a
//! status or a body; that is the [`Gateway`](crate::gateway::Gateway)'s job.

pub mod http;
pub mod loopback;

use std::fmt;

use crate::session::SessionToken;

/// HTTP methods used by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `PATCH`
    Patch,
    /// `DELETE`
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
            Self::Put => write!(f, "PUT"),
            Self::Patch => write!(f, "PATCH"),
            Self::Delete => write!(f, "DELETE"),
        }
    }
}

/// One outbound request, relative to the transport's base URL.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// Request method.
    pub method: Method,
    /// Path such as `/todos`.
    pub path: String,
    /// Bearer credential to attach, if any.
    pub bearer: Option<SessionToken>,
    /// JSON body bytes, if any.
    pub body: Option<Vec<u8>>,
}

/// Status and body of a response that reached the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw body bytes (possibly empty).
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Builds a response from a status code and a JSON value.
    #[must_use]
    pub fn json(status: u16, body: &serde_json::Value) -> Self {
        Self {
            status,
            body: body.to_string().into_bytes(),
        }
    }
}

/// Errors that can occur during transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// No response reached the client (DNS, refused connection, reset...).
    #[error("server unreachable: {0}")]
    Unreachable(String),

    /// A success status arrived but its body could not be read.
    #[error("failed to read response body: {0}")]
    Body(String),

    /// The base URL or request path could not form a valid URL.
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

/// Async transport trait for issuing one HTTP exchange.
///
/// # Invariant
///
/// A response with any status code, including 4xx and 5xx, is `Ok`.
/// `Err` means no usable response was obtained.
pub trait Transport: Send + Sync {
    /// Send `request` and wait for the response.
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl std::future::Future<Output = Result<HttpResponse, TransportError>> + Send;
}
