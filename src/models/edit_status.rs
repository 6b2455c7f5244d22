use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request body for starting an editing session
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StartEditingRequest {
    pub user_alias: String,
    pub kb_guid: String,
    pub guid: String,
}

/// Request body for stopping an editing session
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StopEditingRequest {
    pub kb_guid: String,
    pub guid: String,
    #[serde(default)]
    pub modified: bool,
}

/// Request body for a local save
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DocumentSavedRequest {
    pub user_alias: String,
    pub kb_guid: String,
    pub guid: String,
}

/// Request body for a finished upload
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DocumentUploadedRequest {
    pub kb_guid: String,
    pub guid: String,
}

/// Acknowledgement that an event was queued for the notifier
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EventAcceptedResponse {
    pub accepted: bool,
    pub obj_id: Option<String>,
}

/// One entry of an edit set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EditEntry {
    pub obj_id: String,
    pub user_alias: String,
}
