use crate::{
    models::{
        DocumentIdentity, DocumentSavedRequest, DocumentUploadedRequest, ErrorResponse,
        EventAcceptedResponse,
        NotifierError, StartEditingRequest, StopEditingRequest,
    },
    routes::api::AppState,
};
use axum::{extract::State, http::StatusCode, Json};
use tracing::{debug, error};

type EventResult =
    Result<(StatusCode, Json<EventAcceptedResponse>), (StatusCode, Json<ErrorResponse>)>;

fn accepted(kb_guid: &str, guid: &str) -> (StatusCode, Json<EventAcceptedResponse>) {
    let obj_id = DocumentIdentity::new(kb_guid, guid).map(|id| id.obj_id());
    (StatusCode::ACCEPTED, Json(EventAcceptedResponse {
        accepted: obj_id.is_some(),
        obj_id,
    }))
}

fn notifier_unavailable(e: NotifierError) -> (StatusCode, Json<ErrorResponse>) {
    error!("Edit-status event rejected: {}", e);
    let status = StatusCode::SERVICE_UNAVAILABLE;
    (status, Json(ErrorResponse {
        code: status.as_u16(),
        status: status.to_string(),
        error: e.to_string(),
    }))
}

/// A user started editing a document
pub async fn start_editing(
    State(state): State<AppState>,
    Json(req): Json<StartEditingRequest>,
) -> EventResult {
    debug!("Start editing {}/{} by {}", req.kb_guid, req.guid, req.user_alias);
    state.notifier
        .start_editing(&req.user_alias, &req.kb_guid, &req.guid)
        .await
        .map_err(notifier_unavailable)?;
    Ok(accepted(&req.kb_guid, &req.guid))
}

/// A user stopped editing a document
pub async fn stop_editing(
    State(state): State<AppState>,
    Json(req): Json<StopEditingRequest>,
) -> EventResult {
    debug!("Stop editing {}/{}, modified: {}", req.kb_guid, req.guid, req.modified);
    state.notifier
        .stop_editing(&req.kb_guid, &req.guid, req.modified)
        .await
        .map_err(notifier_unavailable)?;
    Ok(accepted(&req.kb_guid, &req.guid))
}

/// A document was saved locally
pub async fn document_saved(
    State(state): State<AppState>,
    Json(req): Json<DocumentSavedRequest>,
) -> EventResult {
    state.notifier
        .document_saved(&req.user_alias, &req.kb_guid, &req.guid)
        .await
        .map_err(notifier_unavailable)?;
    Ok(accepted(&req.kb_guid, &req.guid))
}

/// A modified document finished uploading
pub async fn document_uploaded(
    State(state): State<AppState>,
    Json(req): Json<DocumentUploadedRequest>,
) -> EventResult {
    state.notifier
        .document_uploaded(&req.kb_guid, &req.guid)
        .await
        .map_err(notifier_unavailable)?;
    Ok(accepted(&req.kb_guid, &req.guid))
}
