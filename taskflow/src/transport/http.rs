//! HTTP transport backed by `reqwest`.
//!
//! Paths are resolved against a base URL. The base may carry a path prefix
//! (e.g. `https://example.com/api`); request paths are appended to it rather
//! than replacing it.

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderValue, USER_AGENT};
use url::Url;

use super::{HttpRequest, HttpResponse, Method, Transport, TransportError};

/// Default `User-Agent` header value.
pub const DEFAULT_USER_AGENT: &str = concat!("taskflow/", env!("CARGO_PKG_VERSION"));

/// Transport that talks to the remote service over HTTP(S).
///
/// No retries and no timeout beyond `reqwest`'s defaults.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    base_url: Url,
    http: reqwest::Client,
    user_agent: HeaderValue,
}

impl HttpTransport {
    /// Creates a transport for the service rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::InvalidUrl`] if `base_url` does not parse,
    /// or [`TransportError::Unreachable`] if the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        let mut base = base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url =
            Url::parse(&base).map_err(|e| TransportError::InvalidUrl(format!("{base_url}: {e}")))?;
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| TransportError::Unreachable(e.to_string()))?;
        Ok(Self {
            base_url,
            http,
            user_agent: HeaderValue::from_static(DEFAULT_USER_AGENT),
        })
    }

    /// Overrides the `User-Agent` header. Invalid header values are ignored.
    #[must_use]
    pub fn with_user_agent(mut self, ua: &str) -> Self {
        if let Ok(hv) = HeaderValue::from_str(ua) {
            self.user_agent = hv;
        }
        self
    }

    /// The base URL requests are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves a request path against the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::InvalidUrl`] if the joined URL is invalid.
    pub fn url_for(&self, path: &str) -> Result<Url, TransportError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| TransportError::InvalidUrl(format!("{path}: {e}")))
    }
}

const fn to_reqwest(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = self.url_for(&request.path)?;
        tracing::debug!(
            method = %request.method,
            %url,
            authenticated = request.bearer.is_some(),
            "sending request"
        );

        let mut builder = self
            .http
            .request(to_reqwest(request.method), url.clone())
            .header(USER_AGENT, self.user_agent.clone())
            .header(ACCEPT, "application/json");
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token.expose());
        }
        if let Some(body) = request.body {
            builder = builder
                .header(CONTENT_TYPE, "application/json")
                .body(body);
        }

        let res = builder.send().await.map_err(|e| {
            tracing::warn!(%url, error = %e, "request did not reach the server");
            TransportError::Unreachable(e.to_string())
        })?;
        let status = res.status().as_u16();
        // Only a success body matters to the caller; for any other status
        // the status code alone decides the outcome.
        let body = match res.bytes().await {
            Ok(bytes) => bytes.to_vec(),
            Err(e) if (200..300).contains(&status) => {
                return Err(TransportError::Body(e.to_string()));
            }
            Err(e) => {
                tracing::warn!(%url, status, error = %e, "discarding unreadable error body");
                Vec::new()
            }
        };

        tracing::debug!(%url, status, len = body.len(), "response received");
        Ok(HttpResponse { status, body })
    }
}
