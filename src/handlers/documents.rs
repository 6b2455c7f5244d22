use crate::{
    models::{
        DocumentIdentity, ErrorResponse, GroupInfo, KnowledgeBaseInfo, LocalDocument,
        RegisterDocumentRequest,
        RegisterKnowledgeBaseRequest, RegisteredResponse, SessionResponse, UpdateSessionRequest,
        UserInfo,
    },
    routes::api::AppState,
};
use axum::{extract::{Path, State}, http::StatusCode, Json};
use tracing::info;

/// Register or refresh local metadata of a knowledge base
pub async fn register_knowledge_base(
    State(state): State<AppState>,
    Path(kb_guid): Path<String>,
    Json(req): Json<RegisterKnowledgeBaseRequest>,
) -> (StatusCode, Json<RegisteredResponse>) {
    let group = req.group_guid.map(|group_guid| GroupInfo {
        group_guid,
        database_server: req.database_server.unwrap_or_default(),
    });
    state.store.upsert_knowledge_base(&kb_guid, KnowledgeBaseInfo {
        document_version: req.document_version,
        group,
    });
    (StatusCode::OK, Json(RegisteredResponse { id: kb_guid }))
}

/// Register or refresh a local document record
pub async fn register_document(
    State(state): State<AppState>,
    Path((kb_guid, guid)): Path<(String, String)>,
    Json(req): Json<RegisterDocumentRequest>,
) -> Result<(StatusCode, Json<RegisteredResponse>), (StatusCode, Json<ErrorResponse>)> {
    let Some(identity) = DocumentIdentity::new(&kb_guid, &guid) else {
        let status = StatusCode::BAD_REQUEST;
        return Err((status, Json(ErrorResponse {
            code: status.as_u16(),
            status: status.to_string(),
            error: "Knowledge base GUID cannot be empty".to_string(),
        })));
    };
    let id = identity.obj_id();
    state.store.upsert_document(identity, LocalDocument {
        guid,
        title: req.title,
        version: req.version,
        editable: req.editable,
    });
    Ok((StatusCode::OK, Json(RegisteredResponse { id })))
}

/// Replace the session after sign-in or token refresh
pub async fn update_session(
    State(state): State<AppState>,
    Json(req): Json<UpdateSessionRequest>,
) -> (StatusCode, Json<SessionResponse>) {
    info!("Session updated for kb {}", req.kb_guid);
    let response = SessionResponse {
        kb_guid: req.kb_guid.clone(),
        database_server: req.database_server.clone(),
        has_token: !req.token.is_empty(),
    };
    state.session.replace(UserInfo {
        token: req.token,
        kb_guid: req.kb_guid,
        database_server: req.database_server,
    });
    (StatusCode::OK, Json(response))
}
