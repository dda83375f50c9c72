//! List synchronization controller.
//!
//! Bridges the synchronous UI loop with async requests the same way for
//! every action: the controller spawns a tokio task that goes through the
//! [`Gateway`], and the task reports back with a [`SyncEvent`] over an mpsc
//! channel. The UI loop drains events and applies them one at a time, so
//! state only ever changes on the loop that owns the controller.
//!
//! ```text
//! UI loop  ── spawn ──→  request task ──→ Gateway ──→ Transport
//!    ↑                        │
//!    └──────── SyncEvent ─────┘
//! ```
//!
//! Completions for a mount that is gone are dropped, both in the task
//! (before sending) and in [`ListController::apply`].

use std::sync::Arc;

use tokio::sync::mpsc;

use taskflow_proto::task::{CreateTask, Task};

use super::liveness::Liveness;
use super::{TODOS_PATH, ViewState};
use crate::gateway::{Gateway, GatewayError};
use crate::route::Route;
use crate::session::CredentialStore;
use crate::transport::{Method, Transport};

/// Default capacity of the completion channel.
pub const DEFAULT_EVENT_BUFFER: usize = 64;

/// Completion of a request started by the controller.
#[derive(Debug)]
pub enum SyncEvent {
    /// The initial `GET /todos` finished.
    Loaded {
        /// Mount that issued the request.
        generation: u64,
        /// Server list or classified failure.
        result: Result<Vec<Task>, GatewayError>,
    },
    /// A `POST /todos` finished.
    Created {
        /// Mount that issued the request.
        generation: u64,
        /// Server-confirmed task or classified failure.
        result: Result<Task, GatewayError>,
    },
}

impl SyncEvent {
    /// Mount that issued the request.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        match self {
            Self::Loaded { generation, .. } | Self::Created { generation, .. } => *generation,
        }
    }
}

/// Owns the task list for one mount of the task view.
pub struct ListController<T: Transport, S: CredentialStore> {
    gateway: Arc<Gateway<T, S>>,
    state: ViewState,
    /// Text typed into the new-task box.
    input: String,
    /// Transient error from the last failed create.
    notice: Option<String>,
    mount: Option<Liveness>,
    generation: u64,
    in_flight: usize,
    event_tx: mpsc::Sender<SyncEvent>,
    event_rx: mpsc::Receiver<SyncEvent>,
}

impl<T: Transport + 'static, S: CredentialStore + 'static> ListController<T, S> {
    /// Creates an unmounted controller.
    #[must_use]
    pub fn new(gateway: Arc<Gateway<T, S>>, event_buffer: usize) -> Self {
        let (event_tx, event_rx) = mpsc::channel(event_buffer.max(1));
        Self {
            gateway,
            state: ViewState::Loading,
            input: String::new(),
            notice: None,
            mount: None,
            generation: 0,
            in_flight: 0,
            event_tx,
            event_rx,
        }
    }

    /// Current view state.
    #[must_use]
    pub const fn state(&self) -> &ViewState {
        &self.state
    }

    /// The list if ready, otherwise empty.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        self.state.tasks().unwrap_or_default()
    }

    /// Contents of the new-task input buffer.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Mutable access to the new-task input buffer.
    pub const fn input_mut(&mut self) -> &mut String {
        &mut self.input
    }

    /// Transient error shown alongside a ready list.
    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Returns `true` between [`mount`](Self::mount) and unmount/redirect.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mount.as_ref().is_some_and(Liveness::is_alive)
    }

    /// Requests issued by the current mount that have not been applied yet.
    #[must_use]
    pub const fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Mounts the view: resets all state and starts the initial fetch.
    ///
    /// Returns `Some(Route::Login)` without issuing any request when there
    /// is no session.
    pub fn mount(&mut self) -> Option<Route> {
        self.unmount();
        self.generation += 1;
        self.state = ViewState::Loading;
        self.input.clear();
        self.notice = None;
        self.in_flight = 0;

        if !self.gateway.store().has_session() {
            tracing::info!("no session at mount, redirecting to login");
            return Some(Route::Login);
        }

        let liveness = Liveness::new(self.generation);
        tracing::debug!(generation = self.generation, "task view mounted");
        self.in_flight += 1;

        let gateway = Arc::clone(&self.gateway);
        let tx = self.event_tx.clone();
        let task_liveness = liveness.clone();
        tokio::spawn(async move {
            let result = gateway
                .request_as::<Vec<Task>>(Method::Get, TODOS_PATH, None)
                .await;
            let event = SyncEvent::Loaded {
                generation: task_liveness.generation(),
                result,
            };
            deliver(&tx, &task_liveness, event).await;
        });

        self.mount = Some(liveness);
        None
    }

    /// Unmounts the view. Completions still in flight are discarded.
    pub fn unmount(&mut self) {
        if let Some(liveness) = self.mount.take() {
            liveness.revoke();
            tracing::debug!(generation = liveness.generation(), "task view unmounted");
        }
    }

    /// Creates a task from the input buffer.
    pub fn submit(&mut self) -> Option<Route> {
        let title = self.input.clone();
        self.create(&title)
    }

    /// Creates a task titled `title` (trimmed).
    ///
    /// Ignored unless the list is mounted and ready. Blank titles issue no
    /// request and change nothing. The task is appended only when the
    /// server confirms it.
    pub fn create(&mut self, title: &str) -> Option<Route> {
        let liveness = match &self.mount {
            Some(l) if l.is_alive() && self.state.is_ready() => l.clone(),
            _ => {
                tracing::debug!("create ignored: task list not ready");
                return None;
            }
        };
        let request = CreateTask::from_input(title)?;

        if !self.gateway.store().has_session() {
            tracing::info!("no session at create, redirecting to login");
            return self.redirect_to_login();
        }

        self.in_flight += 1;
        let gateway = Arc::clone(&self.gateway);
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = gateway
                .send_json::<_, Task>(Method::Post, TODOS_PATH, &request)
                .await;
            let event = SyncEvent::Created {
                generation: liveness.generation(),
                result,
            };
            deliver(&tx, &liveness, event).await;
        });
        None
    }

    /// Applies one completion to the state.
    ///
    /// Returns `Some(Route::Login)` when the session turned out to be
    /// invalid; the controller is unmounted in that case.
    pub fn apply(&mut self, event: SyncEvent) -> Option<Route> {
        let current = self
            .mount
            .as_ref()
            .is_some_and(|l| l.is_alive() && l.generation() == event.generation());
        if !current {
            tracing::debug!(
                generation = event.generation(),
                "discarding completion for a view that is no longer mounted"
            );
            return None;
        }
        self.in_flight = self.in_flight.saturating_sub(1);

        match event {
            SyncEvent::Loaded { result, .. } => match result {
                Ok(tasks) if self.state.is_loading() => {
                    tracing::info!(count = tasks.len(), "task list loaded");
                    self.state = ViewState::Ready(tasks);
                }
                Ok(_) => tracing::warn!("ignoring duplicate list load"),
                Err(GatewayError::Unauthorized) => return self.redirect_to_login(),
                Err(e) => {
                    tracing::warn!(error = ?e, "task list failed to load");
                    self.state = ViewState::Error(e.user_message());
                }
            },
            SyncEvent::Created { result, .. } => match result {
                Ok(task) => {
                    tracing::info!(id = %task.id, "task created");
                    if let ViewState::Ready(tasks) = &mut self.state {
                        tasks.push(task);
                    }
                    self.input.clear();
                    self.notice = None;
                }
                Err(GatewayError::Unauthorized) => return self.redirect_to_login(),
                Err(e) => {
                    tracing::warn!(error = ?e, "task creation failed");
                    self.notice = Some(e.user_message());
                }
            },
        }
        None
    }

    /// Applies every completion that has already arrived.
    ///
    /// Stops at the first redirect.
    pub fn drain_events(&mut self) -> Option<Route> {
        while let Ok(event) = self.event_rx.try_recv() {
            if let Some(route) = self.apply(event) {
                return Some(route);
            }
        }
        None
    }

    /// Waits for the next completion without applying it.
    pub async fn next_event(&mut self) -> Option<SyncEvent> {
        self.event_rx.recv().await
    }

    /// Waits for the next completion and applies it.
    pub async fn process_next(&mut self) -> Option<Route> {
        let event = self.event_rx.recv().await?;
        self.apply(event)
    }

    fn redirect_to_login(&mut self) -> Option<Route> {
        self.unmount();
        Some(Route::Login)
    }
}

/// Sends `event` back to the controller unless its mount is gone.
async fn deliver(tx: &mpsc::Sender<SyncEvent>, liveness: &Liveness, event: SyncEvent) {
    if !liveness.is_alive() {
        tracing::debug!(
            generation = liveness.generation(),
            "view unmounted before completion, dropping result"
        );
        return;
    }
    if tx.send(event).await.is_err() {
        tracing::debug!("controller dropped before completion");
    }
}
