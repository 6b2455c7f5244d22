use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{CheckOutcome, CheckState, DocumentIdentity};

/// Request body for a status check
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CheckStatusRequest {
    pub kb_guid: String,
    pub guid: String,
}

/// Outcome of a status check
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CheckStatusResponse {
    pub kb_guid: Option<String>,
    pub guid: Option<String>,
    /// completed, stopped, timed_out, network_error, superseded or skipped
    pub outcome: String,
    pub changed: Option<bool>,
    pub safe_to_edit: bool,
    pub editors: Vec<String>,
    pub message: Option<String>,
}

impl CheckStatusResponse {
    pub fn from_outcome(target: Option<&DocumentIdentity>, outcome: CheckOutcome) -> Self {
        let kind = outcome.kind().to_string();
        let (changed, safe_to_edit, editors, message) = match outcome {
            CheckOutcome::Completed { changed, editors, safe_to_edit } => {
                (Some(changed), safe_to_edit, editors, None)
            }
            CheckOutcome::NetworkError(message) => (None, false, Vec::new(), Some(message)),
            _ => (None, false, Vec::new(), None),
        };
        Self {
            kb_guid: target.map(|t| t.kb_guid.clone()),
            guid: target.map(|t| t.guid.clone()),
            outcome: kind,
            changed,
            safe_to_edit,
            editors,
            message,
        }
    }
}

/// Current checker target and state
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CheckerStatusResponse {
    pub kb_guid: Option<String>,
    pub guid: Option<String>,
    pub state: CheckState,
    pub needs_recheck: bool,
}
