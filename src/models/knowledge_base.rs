use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request body registering knowledge base metadata
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterKnowledgeBaseRequest {
    pub document_version: i64,
    #[serde(default)]
    pub group_guid: Option<String>,
    #[serde(default)]
    pub database_server: Option<String>,
}

/// Request body registering a local document
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterDocumentRequest {
    #[serde(default)]
    pub title: String,
    pub version: i64,
    #[serde(default = "default_editable")]
    pub editable: bool,
}

fn default_editable() -> bool {
    true
}

/// Request body replacing the session
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateSessionRequest {
    pub token: String,
    #[serde(default)]
    pub kb_guid: String,
    #[serde(default)]
    pub database_server: String,
}

/// Acknowledgement of a registration
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisteredResponse {
    pub id: String,
}
