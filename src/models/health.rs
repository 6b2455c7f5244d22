use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// API response for liveness and readiness checks
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub version: String,
}
