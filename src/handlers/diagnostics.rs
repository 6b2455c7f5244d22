use crate::{models::{DiagnosticsResponse, ErrorResponse}, routes::api::AppState};
use axum::{extract::State, http::StatusCode, Json};
use std::sync::OnceLock;
use parking_lot::Mutex;
use sysinfo::System;
use tracing::{error, info};

static SYSTEM_MONITOR: OnceLock<Mutex<System>> = OnceLock::new();

/// Edit sets, checker state and process stats
pub async fn diagnostics(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<DiagnosticsResponse>), (StatusCode, Json<ErrorResponse>)> {

    let sets = match state.notifier.snapshot().await {
        Ok(sets) => sets,
        Err(e) => {
            error!("Diagnostics unavailable: {}", e);
            let status = StatusCode::SERVICE_UNAVAILABLE;
            return Err((status, Json(ErrorResponse {
                code: status.as_u16(),
                status: status.to_string(),
                error: e.to_string(),
            })));
        }
    };

    // System stats
    let (cpu_usage, memory_alloc, memory_free, memory_total) = {
        let mut sys = SYSTEM_MONITOR
            .get_or_init(|| Mutex::new(System::new_all()))
            .lock();
        sys.refresh_cpu();
        sys.refresh_memory();
        (
            sys.global_cpu_info().cpu_usage(),
            sys.used_memory(),
            sys.free_memory(),
            sys.total_memory(),
        )
    };

    info!(
        "Diagnostics: CPU: {:.2}%, Mem: {}/{} MB, Editing: {}, Modified: {}, Done: {}",
        cpu_usage,
        memory_alloc / 1024 / 1024,
        memory_total / 1024 / 1024,
        sets.editing.len(),
        sets.modified.len(),
        sets.done.len()
    );

    Ok((
        StatusCode::OK,
        Json(DiagnosticsResponse {
            editing: sets.editing,
            modified: sets.modified,
            done: sets.done,
            checker_state: state.checker.state(),
            n_documents: state.store.document_count() as u32,
            cpu_usage,
            memory_alloc,
            memory_total,
            memory_free,
        }),
    ))
}
