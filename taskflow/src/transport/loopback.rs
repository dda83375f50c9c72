//! Loopback transport for testing.
//!
//! Answers requests from per-route queues of scripted responses instead of
//! the network, and records every request it sees. A response can also be
//! held back until the test releases it, which makes the resolution order of
//! concurrent requests controllable.

use std::collections::{HashMap, VecDeque};

use parking_lot::Mutex;
use tokio::sync::oneshot;

use super::{HttpRequest, HttpResponse, Method, Transport, TransportError};

/// What to do with the next request on a route.
enum Scripted {
    Reply(HttpResponse),
    Unreachable,
    Held(oneshot::Receiver<HttpResponse>),
}

/// Releases a response queued with [`LoopbackTransport::hold`].
#[derive(Debug)]
pub struct Release {
    tx: oneshot::Sender<HttpResponse>,
}

impl Release {
    /// Resolves the held request with `status` and a JSON body.
    pub fn respond(self, status: u16, body: &serde_json::Value) {
        let _ = self.tx.send(HttpResponse::json(status, body));
    }

    /// Resolves the held request with raw body bytes.
    pub fn respond_raw(self, status: u16, body: &[u8]) {
        let _ = self.tx.send(HttpResponse {
            status,
            body: body.to_vec(),
        });
    }
}

/// In-process transport with scripted responses.
///
/// Requests for a route with nothing scripted fail as unreachable.
///
/// # Example
///
/// ```rust,no_run
/// use taskflow::transport::loopback::LoopbackTransport;
/// use taskflow::transport::Method;
///
/// let transport = LoopbackTransport::new();
/// transport.reply(Method::Get, "/todos", 200, &serde_json::json!([]));
/// ```
#[derive(Default)]
pub struct LoopbackTransport {
    routes: Mutex<HashMap<(Method, String), VecDeque<Scripted>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl LoopbackTransport {
    /// Creates a transport with nothing scripted.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, method: Method, path: &str, scripted: Scripted) {
        self.routes
            .lock()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(scripted);
    }

    /// Queues a JSON response for the next request on `method path`.
    pub fn reply(&self, method: Method, path: &str, status: u16, body: &serde_json::Value) {
        self.push(method, path, Scripted::Reply(HttpResponse::json(status, body)));
    }

    /// Queues a raw-body response for the next request on `method path`.
    pub fn reply_raw(&self, method: Method, path: &str, status: u16, body: &[u8]) {
        self.push(
            method,
            path,
            Scripted::Reply(HttpResponse {
                status,
                body: body.to_vec(),
            }),
        );
    }

    /// Makes the next request on `method path` fail as if the network were down.
    pub fn unreachable(&self, method: Method, path: &str) {
        self.push(method, path, Scripted::Unreachable);
    }

    /// Queues a response that is only delivered once the returned
    /// [`Release`] is used. Dropping the `Release` fails the request.
    #[must_use]
    pub fn hold(&self, method: Method, path: &str) -> Release {
        let (tx, rx) = oneshot::channel();
        self.push(method, path, Scripted::Held(rx));
        Release { tx }
    }

    /// Every request received so far, in arrival order.
    #[must_use]
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    /// Number of requests received so far.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

impl Transport for LoopbackTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let key = (request.method, request.path.clone());
        self.requests.lock().push(request);

        let next = self
            .routes
            .lock()
            .get_mut(&key)
            .and_then(VecDeque::pop_front);

        match next {
            Some(Scripted::Reply(response)) => Ok(response),
            Some(Scripted::Unreachable) => {
                Err(TransportError::Unreachable("connection refused".to_string()))
            }
            Some(Scripted::Held(rx)) => rx
                .await
                .map_err(|_| TransportError::Unreachable("connection closed".to_string())),
            None => Err(TransportError::Unreachable(format!(
                "no scripted response for {} {}",
                key.0, key.1
            ))),
        }
    }
}
