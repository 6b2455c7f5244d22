use crate::handlers::{
    check_status, diagnostics, document_saved, document_uploaded, get_status, health_check,
    ready_check, recheck_status, register_document, register_knowledge_base, start_editing,
    status_events, stop_editing, stop_status, update_session,
};
use crate::services::{EditStatusNotifier, MemoryDocumentStore, Session, StatusChecker};
use axum::{routing::{get, post, put}, Router};
use std::sync::Arc;

/// Shared state of the local API
#[derive(Clone)]
pub struct AppState {
    pub notifier: EditStatusNotifier,
    pub checker: StatusChecker,
    pub store: Arc<MemoryDocumentStore>,
    pub session: Arc<Session>,
}

/// Create API routes
pub fn create_api_routes(state: AppState) -> Router {
    Router::<AppState>::new()
        .route("/health", get(health_check))
        .route("/ready", get(ready_check))
        .route("/v1/editing/start", post(start_editing))
        .route("/v1/editing/stop", post(stop_editing))
        .route("/v1/documents/saved", post(document_saved))
        .route("/v1/documents/uploaded", post(document_uploaded))
        .route("/v1/session", put(update_session))
        .route("/v1/kbs/:kb_guid", put(register_knowledge_base))
        .route("/v1/kbs/:kb_guid/documents/:guid", put(register_document))
        .route("/v1/status", get(get_status))
        .route("/v1/status/check", post(check_status))
        .route("/v1/status/recheck", post(recheck_status))
        .route("/v1/status/stop", post(stop_status))
        .route("/v1/status/events", get(status_events))
        .route("/v1/diagnostics", get(diagnostics))
        .with_state(state)
}
