//! Shared wire definitions for the `TaskFlow` HTTP API.

pub mod auth;
pub mod codec;
pub mod error;
pub mod task;
