use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{CheckState, EditEntry};

/// Response for diagnostics information
#[derive(Serialize, Deserialize, ToSchema)]
pub struct DiagnosticsResponse {
    pub editing: Vec<EditEntry>,
    pub modified: Vec<EditEntry>,
    pub done: Vec<EditEntry>,
    pub checker_state: CheckState,
    pub n_documents: u32,
    pub cpu_usage: f32,
    pub memory_alloc: u64,
    pub memory_total: u64,
    pub memory_free: u64,
}
