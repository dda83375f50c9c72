//! Integration tests for task list synchronization.
//!
//! Drives [`ListController`] against a [`LoopbackTransport`] so every
//! response, and the order responses resolve in, is under test control.
//!
//! These tests validate:
//! - no stored session: redirect to login without touching the network
//! - the initial fetch becomes the ready list in server order
//! - an authorization failure clears the session and redirects, never
//!   showing an error state
//! - blank titles send nothing
//! - created tasks are appended only once the server confirms them, in the
//!   order confirmations arrive
//! - completions for an unmounted view are discarded

use std::sync::Arc;

use serde_json::json;

use taskflow::gateway::Gateway;
use taskflow::route::Route;
use taskflow::session::{CredentialStore, MemoryStore};
use taskflow::todos::{ListController, TODOS_PATH, ViewState};
use taskflow::transport::Method;
use taskflow::transport::loopback::LoopbackTransport;
use taskflow_proto::task::TaskId;

type Controller = ListController<LoopbackTransport, MemoryStore>;

/// Helper: a controller over a fresh loopback transport.
fn setup(token: Option<&str>) -> (Controller, Arc<Gateway<LoopbackTransport, MemoryStore>>) {
    let store = token.map_or_else(MemoryStore::new, MemoryStore::with_token);
    let gateway = Arc::new(Gateway::new(LoopbackTransport::new(), Arc::new(store)));
    (ListController::new(Arc::clone(&gateway), 16), gateway)
}

fn task(id: i64, title: &str) -> serde_json::Value {
    json!({ "id": id, "title": title, "userId": 7 })
}

/// Helper: mount and apply the initial load of `tasks`.
async fn ready_with(
    ctl: &mut Controller,
    gw: &Gateway<LoopbackTransport, MemoryStore>,
    tasks: serde_json::Value,
) {
    gw.transport().reply(Method::Get, TODOS_PATH, 200, &tasks);
    assert_eq!(ctl.mount(), None);
    assert_eq!(ctl.process_next().await, None);
    assert!(ctl.state().is_ready());
}

fn post_count(gw: &Gateway<LoopbackTransport, MemoryStore>) -> usize {
    gw.transport()
        .requests()
        .iter()
        .filter(|r| r.method == Method::Post)
        .count()
}

fn titles(ctl: &Controller) -> Vec<String> {
    ctl.tasks().iter().map(|t| t.title.clone()).collect()
}

// =============================================================================
// Mount
// =============================================================================

#[tokio::test]
async fn no_session_redirects_without_fetching() {
    let (mut ctl, gw) = setup(None);

    assert_eq!(ctl.mount(), Some(Route::Login));
    assert_eq!(gw.transport().request_count(), 0);
    assert!(!ctl.is_mounted());
}

#[tokio::test]
async fn initial_load_becomes_ready_list() {
    let (mut ctl, gw) = setup(Some("tok"));
    gw.transport()
        .reply(Method::Get, TODOS_PATH, 200, &json!([task(1, "Buy milk")]));

    ctl.mount();
    assert_eq!(ctl.state(), &ViewState::Loading);
    ctl.process_next().await;

    assert_eq!(ctl.tasks().len(), 1);
    assert_eq!(ctl.tasks()[0].id, TaskId::from_raw(1));
    assert_eq!(ctl.tasks()[0].title, "Buy milk");

    let sent = gw.transport().requests();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].bearer.as_ref().map(|t| t.expose().to_string()), Some("tok".to_string()));
}

#[tokio::test]
async fn server_order_is_kept() {
    let (mut ctl, gw) = setup(Some("tok"));
    ready_with(
        &mut ctl,
        &gw,
        json!([task(5, "e"), task(2, "b"), task(9, "i")]),
    )
    .await;

    assert_eq!(titles(&ctl), ["e", "b", "i"]);
}

#[tokio::test]
async fn empty_list_is_ready_not_error() {
    let (mut ctl, gw) = setup(Some("tok"));
    ready_with(&mut ctl, &gw, json!([])).await;

    assert!(ctl.tasks().is_empty());
    assert_eq!(ctl.state().error(), None);
}

#[tokio::test]
async fn forbidden_load_clears_session_and_redirects() {
    let (mut ctl, gw) = setup(Some("stale"));
    gw.transport().reply(Method::Get, TODOS_PATH, 403, &json!({}));

    ctl.mount();
    assert_eq!(ctl.process_next().await, Some(Route::Login));

    assert!(!gw.store().has_session());
    assert!(ctl.state().error().is_none());
    assert!(!ctl.is_mounted());
}

#[tokio::test]
async fn unreachable_load_shows_error() {
    let (mut ctl, gw) = setup(Some("tok"));
    gw.transport().unreachable(Method::Get, TODOS_PATH);

    ctl.mount();
    assert_eq!(ctl.process_next().await, None);

    assert_eq!(ctl.state().error(), Some("could not reach the server"));
    assert!(gw.store().has_session());
}

#[tokio::test]
async fn bodiless_unauthorized_load_redirects() {
    let (mut ctl, gw) = setup(Some("stale"));
    gw.transport().reply_raw(Method::Get, TODOS_PATH, 401, b"");

    ctl.mount();
    assert_eq!(ctl.process_next().await, Some(Route::Login));
    assert!(!gw.store().has_session());
}

#[tokio::test]
async fn html_load_after_delay_shows_error() {
    let (mut ctl, gw) = setup(Some("tok"));
    let held = gw.transport().hold(Method::Get, TODOS_PATH);

    ctl.mount();
    held.respond_raw(200, b"<html>maintenance</html>");
    ctl.process_next().await;

    assert_eq!(
        ctl.state().error(),
        Some("the server sent an unreadable response")
    );
}

#[tokio::test]
async fn malformed_load_shows_error() {
    let (mut ctl, gw) = setup(Some("tok"));
    gw.transport()
        .reply(Method::Get, TODOS_PATH, 200, &json!({ "not": "a list" }));

    ctl.mount();
    ctl.process_next().await;

    assert_eq!(
        ctl.state().error(),
        Some("the server sent an unreadable response")
    );
}

// =============================================================================
// Create
// =============================================================================

#[tokio::test]
async fn blank_title_sends_nothing() {
    let (mut ctl, gw) = setup(Some("tok"));
    ready_with(&mut ctl, &gw, json!([task(1, "a"), task(2, "b")])).await;

    assert_eq!(ctl.create("  "), None);
    assert_eq!(ctl.create(""), None);
    tokio::task::yield_now().await;

    assert_eq!(ctl.tasks().len(), 2);
    assert_eq!(post_count(&gw), 0);
    assert_eq!(ctl.in_flight(), 0);
}

#[tokio::test]
async fn confirmed_task_is_appended_last() {
    let (mut ctl, gw) = setup(Some("tok"));
    ready_with(&mut ctl, &gw, json!([task(1, "a"), task(2, "b")])).await;
    gw.transport()
        .reply(Method::Post, TODOS_PATH, 201, &task(9, "Pay bills"));

    ctl.create("Pay bills");
    assert_eq!(ctl.tasks().len(), 2);
    ctl.process_next().await;

    assert_eq!(ctl.tasks().len(), 3);
    assert_eq!(ctl.tasks()[2].id, TaskId::from_raw(9));
    assert_eq!(ctl.tasks()[2].title, "Pay bills");
}

#[tokio::test]
async fn concurrent_creates_append_in_resolution_order() {
    let (mut ctl, gw) = setup(Some("tok"));
    ready_with(&mut ctl, &gw, json!([])).await;

    let first = gw.transport().hold(Method::Post, TODOS_PATH);
    let second = gw.transport().hold(Method::Post, TODOS_PATH);

    ctl.create("first");
    // Let the first request claim its held slot before issuing the second.
    while post_count(&gw) < 1 {
        tokio::task::yield_now().await;
    }
    ctl.create("second");
    while post_count(&gw) < 2 {
        tokio::task::yield_now().await;
    }
    assert_eq!(ctl.in_flight(), 2);

    second.respond(201, &task(11, "second"));
    ctl.process_next().await;
    first.respond(201, &task(10, "first"));
    ctl.process_next().await;

    assert_eq!(titles(&ctl), ["second", "first"]);
    assert_eq!(ctl.in_flight(), 0);
}

#[tokio::test]
async fn failed_create_leaves_list_unchanged() {
    let (mut ctl, gw) = setup(Some("tok"));
    ready_with(&mut ctl, &gw, json!([task(1, "a")])).await;
    gw.transport().reply(
        Method::Post,
        TODOS_PATH,
        400,
        &json!({ "error": "Title is required" }),
    );

    ctl.create("x");
    assert_eq!(ctl.process_next().await, None);

    assert_eq!(titles(&ctl), ["a"]);
    assert_eq!(ctl.notice(), Some("Title is required"));
    assert!(ctl.state().is_ready());
}

#[tokio::test]
async fn unauthorized_create_redirects() {
    let (mut ctl, gw) = setup(Some("tok"));
    ready_with(&mut ctl, &gw, json!([task(1, "a")])).await;
    gw.transport().reply(Method::Post, TODOS_PATH, 401, &json!({}));

    ctl.create("x");
    assert_eq!(ctl.process_next().await, Some(Route::Login));

    assert!(!gw.store().has_session());
    assert!(!ctl.is_mounted());
}

// =============================================================================
// Unmount
// =============================================================================

#[tokio::test]
async fn unmount_discards_in_flight_load() {
    let (mut ctl, gw) = setup(Some("tok"));
    let held = gw.transport().hold(Method::Get, TODOS_PATH);

    ctl.mount();
    while gw.transport().request_count() < 1 {
        tokio::task::yield_now().await;
    }
    ctl.unmount();
    held.respond(200, &json!([task(1, "late")]));

    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
    assert_eq!(ctl.drain_events(), None);
    assert!(ctl.state().is_loading());
    assert!(ctl.tasks().is_empty());
}

#[tokio::test]
async fn unmount_discards_in_flight_create() {
    let (mut ctl, gw) = setup(Some("tok"));
    ready_with(&mut ctl, &gw, json!([task(1, "a")])).await;
    let held = gw.transport().hold(Method::Post, TODOS_PATH);

    ctl.create("b");
    while post_count(&gw) < 1 {
        tokio::task::yield_now().await;
    }
    ctl.unmount();
    held.respond(201, &task(2, "b"));

    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
    ctl.drain_events();
    assert_eq!(titles(&ctl), ["a"]);
}
