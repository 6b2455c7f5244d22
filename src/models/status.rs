use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::DocumentIdentity;

/// Why a check reported through the timeout signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TimeoutReason {
    /// The advisory deadline passed before the check finished
    Deadline,
    /// The edit-status service could not be reached
    NetworkError,
}

/// Signals published by the status checker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StatusEvent {
    DocumentChanged {
        identity: DocumentIdentity,
        changed: bool,
    },
    CheckFinished {
        identity: DocumentIdentity,
        safe_to_edit: bool,
    },
    CheckTimedOut {
        identity: DocumentIdentity,
        reason: TimeoutReason,
    },
    EditingByOthers {
        identity: DocumentIdentity,
        editors: Vec<String>,
    },
}

impl StatusEvent {
    pub fn name(&self) -> &'static str {
        match self {
            StatusEvent::DocumentChanged { .. } => "document_changed",
            StatusEvent::CheckFinished { .. } => "check_finished",
            StatusEvent::CheckTimedOut { .. } => "check_timed_out",
            StatusEvent::EditingByOthers { .. } => "editing_by_others",
        }
    }
}

/// Lifecycle of the checker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CheckState {
    Idle,
    Checking,
    TimedOut,
    Completed,
}

/// Result of a single check run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Completed {
        changed: bool,
        editors: Vec<String>,
        safe_to_edit: bool,
    },
    /// Stopped mid-flight; reported as not safe to edit
    Stopped,
    /// The deadline fired first; the caller should allow offline editing with a warning
    TimedOut,
    /// Edit-status service unreachable
    NetworkError(String),
    /// A newer check replaced the target while this one was in flight
    Superseded,
    /// No valid target to check
    Skipped,
}

impl CheckOutcome {
    pub fn kind(&self) -> &'static str {
        match self {
            CheckOutcome::Completed { .. } => "completed",
            CheckOutcome::Stopped => "stopped",
            CheckOutcome::TimedOut => "timed_out",
            CheckOutcome::NetworkError(_) => "network_error",
            CheckOutcome::Superseded => "superseded",
            CheckOutcome::Skipped => "skipped",
        }
    }
}
