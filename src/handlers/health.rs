use axum::Json;
use crate::models::HealthResponse;
use tracing::debug;

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    debug!("Health check requested");
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "Edit-status agent is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness check endpoint
pub async fn ready_check() -> Json<HealthResponse> {
    debug!("Readiness check requested");
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "Edit-status agent is ready".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
