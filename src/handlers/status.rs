use crate::{
    models::{CheckStatusRequest, CheckStatusResponse, CheckerStatusResponse},
    routes::api::AppState,
};
use axum::{
    extract::State,
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures_util::stream::{self, Stream};
use std::convert::Infallible;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

/// Check whether a document is safe to edit. Blocks until the check ends.
pub async fn check_status(
    State(state): State<AppState>,
    Json(req): Json<CheckStatusRequest>,
) -> (StatusCode, Json<CheckStatusResponse>) {
    let outcome = state.checker.check_edit_status(&req.kb_guid, &req.guid).await;
    debug!("Check of {}/{} ended: {}", req.kb_guid, req.guid, outcome.kind());
    let target = crate::models::DocumentIdentity::new(&req.kb_guid, &req.guid);
    (StatusCode::OK, Json(CheckStatusResponse::from_outcome(target.as_ref(), outcome)))
}

/// Check the current target again
pub async fn recheck_status(
    State(state): State<AppState>,
) -> (StatusCode, Json<CheckStatusResponse>) {
    let target = state.checker.peek();
    let outcome = state.checker.recheck().await;
    (StatusCode::OK, Json(CheckStatusResponse::from_outcome(target.as_ref(), outcome)))
}

/// Stop the running check and clear the target
pub async fn stop_status(
    State(state): State<AppState>,
) -> (StatusCode, Json<CheckerStatusResponse>) {
    state.checker.stop_check_status();
    (StatusCode::OK, Json(checker_status(&state)))
}

/// Current target and checker state
pub async fn get_status(State(state): State<AppState>) -> Json<CheckerStatusResponse> {
    Json(checker_status(&state))
}

fn checker_status(state: &AppState) -> CheckerStatusResponse {
    let target = state.checker.peek();
    CheckerStatusResponse {
        kb_guid: target.as_ref().map(|t| t.kb_guid.clone()),
        guid: target.map(|t| t.guid),
        state: state.checker.state(),
        needs_recheck: state.checker.needs_recheck(),
    }
}

/// Stream checker events as server-sent events
pub async fn status_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.checker.subscribe();
    let events = stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    let data = serde_json::to_string(&event).unwrap_or_else(|_| "{}".to_string());
                    let sse = Event::default().event(event.name()).data(data);
                    return Some((Ok::<Event, Infallible>(sse), rx));
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Status event stream lagged, {} events skipped", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });
    Sse::new(events).keep_alive(KeepAlive::default())
}
