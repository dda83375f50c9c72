//! `TaskFlow`: terminal client for a session-gated task list.

pub mod app;
pub mod auth;
pub mod config;
pub mod gateway;
pub mod route;
pub mod session;
pub mod todos;
pub mod transport;
pub mod ui;
