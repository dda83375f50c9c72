//! Integration tests for the login flow over real HTTP.
//!
//! A successful `POST /login` stores the issued token in the session file;
//! later requests carry it, and a restarted client finds it again.

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use taskflow::auth::{self, LOGIN_PATH, LoginController, LoginError};
use taskflow::gateway::Gateway;
use taskflow::route::Route;
use taskflow::session::{CredentialStore, FileStore};
use taskflow::todos::ListController;
use taskflow::transport::http::HttpTransport;
use taskflow_proto::auth::LoginRequest;

/// Helper: gateway over HTTP with a session file inside `dir`.
fn gateway(server: &MockServer, dir: &tempfile::TempDir) -> Arc<Gateway<HttpTransport, FileStore>> {
    let transport = HttpTransport::new(&server.uri()).unwrap();
    let store = Arc::new(FileStore::open(dir.path().join("session.toml")));
    Arc::new(Gateway::new(transport, store))
}

fn credentials() -> LoginRequest {
    LoginRequest {
        email: "ada@example.com".to_string(),
        password: "hunter2".to_string(),
    }
}

#[tokio::test]
async fn login_stores_token_used_by_list() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .and(body_json(json!({ "email": "ada@example.com", "password": "hunter2" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "fresh" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/todos"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{ "id": 1, "title": "Buy milk", "userId": 7 }])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let gw = gateway(&server, &dir);

    auth::login(gw.as_ref(), &credentials()).await.unwrap();
    assert!(gw.store().has_session());

    let mut list = ListController::new(Arc::clone(&gw), 8);
    assert_eq!(list.mount(), None);
    list.process_next().await;
    assert_eq!(list.tasks().len(), 1);
}

#[tokio::test]
async fn session_survives_restart_until_logout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "kept" })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    auth::login(gateway(&server, &dir).as_ref(), &credentials())
        .await
        .unwrap();

    let restarted = gateway(&server, &dir);
    assert_eq!(restarted.store().load().unwrap().expose(), "kept");

    assert_eq!(auth::logout(restarted.store()), Route::Login);
    assert!(!gateway(&server, &dir).store().has_session());
}

#[tokio::test]
async fn missing_token_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "ok" })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let gw = gateway(&server, &dir);
    let err = auth::login(gw.as_ref(), &credentials()).await.unwrap_err();

    assert_eq!(err, LoginError::MissingToken);
    assert!(!gw.store().has_session());
}

#[tokio::test]
async fn wrong_password_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "error": "Invalid credentials" })),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let err = auth::login(gateway(&server, &dir).as_ref(), &credentials())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "invalid email or password");
}

#[tokio::test]
async fn login_form_routes_to_todos() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "t" })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let gw = gateway(&server, &dir);
    let mut form = LoginController::new(Arc::clone(&gw));
    form.set_credentials("ada@example.com", "hunter2");

    form.submit();
    assert!(form.is_loading());
    assert_eq!(form.process_next().await, Some(Route::Todos));
    assert!(form.error().is_none());
    assert!(gw.store().has_session());
}

#[tokio::test]
async fn login_form_shows_service_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "error": "Email not verified" })),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut form = LoginController::new(gateway(&server, &dir));
    form.set_credentials("ada@example.com", "hunter2");

    form.submit();
    assert_eq!(form.process_next().await, None);
    assert_eq!(form.error(), Some("Email not verified"));
    assert!(!form.is_loading());
}
