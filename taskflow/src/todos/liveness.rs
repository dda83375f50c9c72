//! Per-mount liveness tokens.
//!
//! A [`Liveness`] is created when a view mounts and revoked when it
//! unmounts. Request tasks carry a clone and check it before reporting back,
//! and the controller checks it again before applying a completion.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared flag saying whether the originating mount is still live.
#[derive(Debug, Clone)]
pub struct Liveness {
    generation: u64,
    alive: Arc<AtomicBool>,
}

impl Liveness {
    /// Creates a live token for mount number `generation`.
    #[must_use]
    pub fn new(generation: u64) -> Self {
        Self {
            generation,
            alive: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Mount number this token belongs to.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns `true` until [`revoke`](Self::revoke) is called on any clone.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    /// Marks the mount as gone for every clone of this token.
    pub fn revoke(&self) {
        self.alive.store(false, Ordering::Release);
    }
}
