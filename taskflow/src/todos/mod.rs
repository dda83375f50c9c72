//! Task list synchronization.
//!
//! The [`ListController`] owns the in-memory task list for one mount of the
//! task view. It loads the list when mounted, creates tasks on request, and
//! only ever appends a task once the server has confirmed it with an id.
//! There is no optimistic insert, so no rollback path exists.

pub mod controller;
pub mod liveness;

pub use controller::{ListController, SyncEvent};
pub use liveness::Liveness;

use taskflow_proto::task::Task;

/// Endpoint serving the task list.
pub const TODOS_PATH: &str = "/todos";

/// What the task view shows. Exactly one variant holds at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    /// Waiting for the initial fetch.
    Loading,
    /// The initial fetch failed. The message is never empty.
    Error(String),
    /// The list, in server-confirmation order.
    Ready(Vec<Task>),
}

impl ViewState {
    /// The task list, if ready.
    #[must_use]
    pub fn tasks(&self) -> Option<&[Task]> {
        match self {
            Self::Ready(tasks) => Some(tasks),
            _ => None,
        }
    }

    /// The error message, if the load failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(msg) => Some(msg),
            _ => None,
        }
    }

    /// Returns `true` while loading.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Returns `true` once the list is available.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}
