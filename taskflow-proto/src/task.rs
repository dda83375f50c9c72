//! Task records as served by the `/todos` endpoints.
//!
//! Identifiers are assigned by the server. The client never mints a
//! [`TaskId`]; a task only exists locally once the server has echoed it
//! back with one.

use serde::{Deserialize, Serialize};

/// Server-assigned task identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(i64);

impl TaskId {
    /// Wraps a raw identifier received from the server.
    #[must_use]
    pub const fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn as_raw(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Server-assigned identifier of the task's owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Wraps a raw identifier received from the server.
    #[must_use]
    pub const fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn as_raw(self) -> i64 {
        self.0
    }
}

/// A task owned by the logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Server-assigned, unique, immutable.
    pub id: TaskId,
    /// Non-empty title.
    pub title: String,
    /// Owner of the task (`userId` on the wire).
    pub user_id: UserId,
}

/// Body of `POST /todos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTask {
    /// Title of the task to create.
    pub title: String,
}

impl CreateTask {
    /// Builds a create request, trimming surrounding whitespace.
    ///
    /// Returns `None` when nothing but whitespace remains.
    #[must_use]
    pub fn from_input(input: &str) -> Option<Self> {
        let title = input.trim();
        if title.is_empty() {
            return None;
        }
        Some(Self {
            title: title.to_string(),
        })
    }
}
