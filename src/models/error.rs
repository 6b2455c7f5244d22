use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Response for an error
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub code: u16,
    pub status: String,
    pub error: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Environment variable error: {0}")]
    EnvError(#[from] envy::Error),
}

/// Failure talking to the edit-status service
#[derive(Debug, Error)]
pub enum EditStatusError {
    #[error("invalid edit-status url '{0}'")]
    Url(String),
    #[error("edit-status request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("edit-status service answered {0}")]
    Status(u16),
}

/// Failure talking to a knowledge base server
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("knowledge server request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("knowledge server answered {0}")]
    Status(u16),
    #[error("no server route for knowledge base '{0}'")]
    NoRoute(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NotifierError {
    #[error("edit-status notifier is stopped")]
    Stopped,
}
