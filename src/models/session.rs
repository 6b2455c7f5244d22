use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Signed-in user as seen by the sync layer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserInfo {
    pub token: String,
    pub kb_guid: String,
    pub database_server: String,
}

/// Response for a session update. The token is never echoed back.
#[derive(Serialize, Deserialize, ToSchema)]
pub struct SessionResponse {
    pub kb_guid: String,
    pub database_server: String,
    pub has_token: bool,
}
