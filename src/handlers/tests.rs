use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

use crate::models::UserInfo;
use crate::routes::api::{create_api_routes, AppState};
use crate::services::{
    CheckerSettings, EditStatusNotifier, MemoryDocumentStore, NotifierSettings, ServerRouter,
    Session, StatusChecker,
};
use crate::test_support::{Call, FakeApiEntry, FakeKnowledgeServer, RecordingTransport};

struct TestApp {
    router: Router,
    state: AppState,
    transport: Arc<RecordingTransport>,
}

fn test_app() -> TestApp {
    let transport = Arc::new(RecordingTransport::default());
    let store = Arc::new(MemoryDocumentStore::new());
    let session = Arc::new(Session::new(UserInfo {
        token: "tok".to_string(),
        kb_guid: "kb1".to_string(),
        database_server: "https://kb.example.com".to_string(),
    }));
    let notifier = EditStatusNotifier::new(
        transport.clone(),
        session.clone(),
        NotifierSettings {
            heartbeat_interval: Duration::from_secs(30),
            queue_capacity: 16,
        },
    );
    notifier.start();
    let router = ServerRouter::new(
        store.clone(),
        session.clone(),
        Arc::new(FakeApiEntry::default()),
        Duration::from_secs(60),
    );
    let checker = StatusChecker::new(
        store.clone(),
        Arc::new(FakeKnowledgeServer::default()),
        transport.clone(),
        router,
        CheckerSettings {
            check_timeout: Duration::from_secs(5),
            event_capacity: 16,
        },
    );
    let state = AppState { notifier, checker, store, session };
    TestApp {
        router: create_api_routes(state.clone()),
        state,
        transport,
    }
}

async fn call(
    app: &TestApp,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_start_editing_is_queued_and_announced() {
    let app = test_app();

    let (status, body) = call(&app, Method::POST, "/v1/editing/start", Some(json!({
        "user_alias": "alice", "kb_guid": "kb1", "guid": "g1"
    }))).await;

    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["accepted"], true);
    assert_eq!(body["obj_id"], "kb1/g1");

    let sets = app.state.notifier.snapshot().await.unwrap();
    assert_eq!(sets.editing.len(), 1);
    assert_eq!(app.transport.calls(), vec![Call::add("kb1/g1", "alice")]);
}

#[tokio::test]
async fn test_event_without_kb_is_ignored() {
    let app = test_app();

    let (status, body) = call(&app, Method::POST, "/v1/documents/saved", Some(json!({
        "user_alias": "alice", "kb_guid": "", "guid": "g1"
    }))).await;

    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["accepted"], false);
    assert!(app.state.notifier.snapshot().await.unwrap().modified.is_empty());
}

#[tokio::test]
async fn test_events_after_shutdown_are_rejected() {
    let app = test_app();
    app.state.notifier.wait_for_done().await;

    let (status, body) = call(&app, Method::POST, "/v1/editing/stop", Some(json!({
        "kb_guid": "kb1", "guid": "g1", "modified": true
    }))).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], 503);
}

#[tokio::test]
async fn test_check_uses_registered_documents() {
    let app = test_app();

    let body = json!({ "document_version": 3 });
    let (status, _) = call(&app, Method::PUT, "/v1/kbs/kb1", Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = call(&app, Method::PUT, "/v1/kbs/kb1/documents/g1", Some(json!({
        "title": "Draft", "version": -1, "editable": false
    }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "kb1/g1");

    let (status, body) = call(&app, Method::POST, "/v1/status/check", Some(json!({
        "kb_guid": "kb1", "guid": "g1"
    }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "completed");
    assert_eq!(body["changed"], true);
    assert_eq!(body["safe_to_edit"], false);
    assert!(app.transport.editor_requests().is_empty());
}

#[tokio::test]
async fn test_check_reports_other_editors() {
    let app = test_app();
    app.transport.set_editors(vec!["bob".to_string()]);

    let (_, body) = call(&app, Method::POST, "/v1/status/check", Some(json!({
        "kb_guid": "kb1", "guid": "g1"
    }))).await;

    assert_eq!(body["outcome"], "completed");
    assert_eq!(body["editors"], json!(["bob"]));
    assert_eq!(body["safe_to_edit"], false);
}

#[tokio::test]
async fn test_stop_clears_target() {
    let app = test_app();
    let body = json!({ "kb_guid": "kb1", "guid": "g1" });
    call(&app, Method::POST, "/v1/status/check", Some(body)).await;

    let (_, body) = call(&app, Method::GET, "/v1/status", None).await;
    assert_eq!(body["guid"], "g1");
    assert_eq!(body["state"], "completed");

    let (status, body) = call(&app, Method::POST, "/v1/status/stop", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "idle");
    assert_eq!(body["guid"], Value::Null);

    let (_, body) = call(&app, Method::POST, "/v1/status/recheck", None).await;
    assert_eq!(body["outcome"], "skipped");
}

#[tokio::test]
async fn test_register_document_requires_kb() {
    let app = test_app();
    // An empty path segment does not match the route at all.
    let body = json!({ "version": 1 });
    let (status, _) = call(&app, Method::PUT, "/v1/kbs//documents/g1", Some(body)).await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn test_session_update_hides_token() {
    let app = test_app();

    let (status, body) = call(&app, Method::PUT, "/v1/session", Some(json!({
        "token": "fresh", "kb_guid": "kb9", "database_server": "https://kb9.example.com"
    }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["has_token"], true);
    assert!(body.get("token").is_none());
    assert_eq!(crate::services::TokenProvider::token(app.state.session.as_ref()), "fresh");
}

#[tokio::test]
async fn test_diagnostics_lists_edit_sets() {
    let app = test_app();
    app.state.notifier.start_editing("alice", "kb1", "g1").await.unwrap();
    app.state.notifier.document_saved("alice", "kb1", "g2").await.unwrap();

    let (status, body) = call(&app, Method::GET, "/v1/diagnostics", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["editing"], json!([{ "obj_id": "kb1/g1", "user_alias": "alice" }]));
    assert_eq!(body["modified"], json!([{ "obj_id": "kb1/g2", "user_alias": "alice" }]));
    assert_eq!(body["checker_state"], "idle");
}

#[tokio::test]
async fn test_health_reports_version() {
    let app = test_app();
    let (status, body) = call(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}
