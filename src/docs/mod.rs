use utoipa::OpenApi;
use crate::models::*;

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
#[allow(dead_code)]
pub async fn health_check_doc() {}

/// Start editing a document
#[utoipa::path(
    post,
    path = "/api/v1/editing/start",
    request_body = StartEditingRequest,
    responses(
        (status = 202, description = "Event queued", body = EventAcceptedResponse),
        (status = 503, description = "Notifier stopped", body = ErrorResponse)
    )
)]
#[allow(dead_code)]
pub async fn start_editing_doc() {}

/// Stop editing a document
#[utoipa::path(
    post,
    path = "/api/v1/editing/stop",
    request_body = StopEditingRequest,
    responses(
        (status = 202, description = "Event queued", body = EventAcceptedResponse),
        (status = 503, description = "Notifier stopped", body = ErrorResponse)
    )
)]
#[allow(dead_code)]
pub async fn stop_editing_doc() {}

/// A document was saved locally
#[utoipa::path(
    post,
    path = "/api/v1/documents/saved",
    request_body = DocumentSavedRequest,
    responses(
        (status = 202, description = "Event queued", body = EventAcceptedResponse),
        (status = 503, description = "Notifier stopped", body = ErrorResponse)
    )
)]
#[allow(dead_code)]
pub async fn document_saved_doc() {}

/// A modified document was uploaded
#[utoipa::path(
    post,
    path = "/api/v1/documents/uploaded",
    request_body = DocumentUploadedRequest,
    responses(
        (status = 202, description = "Event queued", body = EventAcceptedResponse),
        (status = 503, description = "Notifier stopped", body = ErrorResponse)
    )
)]
#[allow(dead_code)]
pub async fn document_uploaded_doc() {}

/// Replace the session
#[utoipa::path(
    put,
    path = "/api/v1/session",
    request_body = UpdateSessionRequest,
    responses(
        (status = 200, description = "Session replaced", body = SessionResponse)
    )
)]
#[allow(dead_code)]
pub async fn update_session_doc() {}

/// Register knowledge base metadata
#[utoipa::path(
    put,
    path = "/api/v1/kbs/{kb_guid}",
    params(("kb_guid" = String, Path, description = "Knowledge base GUID")),
    request_body = RegisterKnowledgeBaseRequest,
    responses(
        (status = 200, description = "Registered", body = RegisteredResponse)
    )
)]
#[allow(dead_code)]
pub async fn register_knowledge_base_doc() {}

/// Register a local document
#[utoipa::path(
    put,
    path = "/api/v1/kbs/{kb_guid}/documents/{guid}",
    params(
        ("kb_guid" = String, Path, description = "Knowledge base GUID"),
        ("guid" = String, Path, description = "Document GUID")
    ),
    request_body = RegisterDocumentRequest,
    responses(
        (status = 200, description = "Registered", body = RegisteredResponse),
        (status = 400, description = "Invalid identity", body = ErrorResponse)
    )
)]
#[allow(dead_code)]
pub async fn register_document_doc() {}

/// Check whether a document is safe to edit
#[utoipa::path(
    post,
    path = "/api/v1/status/check",
    request_body = CheckStatusRequest,
    responses(
        (status = 200, description = "Check ended", body = CheckStatusResponse)
    )
)]
#[allow(dead_code)]
pub async fn check_status_doc() {}

/// Check the current target again
#[utoipa::path(
    post,
    path = "/api/v1/status/recheck",
    responses(
        (status = 200, description = "Check ended", body = CheckStatusResponse)
    )
)]
#[allow(dead_code)]
pub async fn recheck_status_doc() {}

/// Stop the running check
#[utoipa::path(
    post,
    path = "/api/v1/status/stop",
    responses(
        (status = 200, description = "Checker stopped", body = CheckerStatusResponse)
    )
)]
#[allow(dead_code)]
pub async fn stop_status_doc() {}

/// Current checker target and state
#[utoipa::path(
    get,
    path = "/api/v1/status",
    responses(
        (status = 200, description = "Checker status", body = CheckerStatusResponse)
    )
)]
#[allow(dead_code)]
pub async fn get_status_doc() {}

/// Diagnostics
#[utoipa::path(
    get,
    path = "/api/v1/diagnostics",
    responses(
        (status = 200, description = "Diagnostics", body = DiagnosticsResponse),
        (status = 503, description = "Notifier stopped", body = ErrorResponse)
    )
)]
#[allow(dead_code)]
pub async fn diagnostics_doc() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check_doc,
        start_editing_doc,
        stop_editing_doc,
        document_saved_doc,
        document_uploaded_doc,
        update_session_doc,
        register_knowledge_base_doc,
        register_document_doc,
        check_status_doc,
        recheck_status_doc,
        stop_status_doc,
        get_status_doc,
        diagnostics_doc,
    ),
    components(
        schemas(
            HealthResponse, ErrorResponse,
            StartEditingRequest, StopEditingRequest, DocumentSavedRequest, DocumentUploadedRequest,
            EventAcceptedResponse, EditEntry,
            UpdateSessionRequest, SessionResponse,
            RegisterKnowledgeBaseRequest, RegisterDocumentRequest, RegisteredResponse,
            CheckStatusRequest, CheckStatusResponse, CheckerStatusResponse, CheckState,
            DiagnosticsResponse,
        )
    ),
    tags(
        (name = "api", description = "Edit-status agent endpoints")
    )
)]
pub struct ApiDoc;
