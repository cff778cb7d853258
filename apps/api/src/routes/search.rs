//! Trigger surface for the screening pipeline.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::errors::AppError;
use crate::pipeline::guard::TriggerOutcome;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct TriggerResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct RunStatusResponse {
    pub running: bool,
}

/// POST /run-search
///
/// Starts a pipeline run in the background and returns immediately.
/// 202 when started, 409 when a run is already active.
pub async fn handle_run_search(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<TriggerResponse>), AppError> {
    let pipeline = Arc::clone(&state.pipeline);
    let outcome = state.run_guard.trigger(move || async move {
        pipeline.run().await;
    });

    match outcome {
        TriggerOutcome::Accepted => Ok((
            StatusCode::ACCEPTED,
            Json(TriggerResponse {
                message: "Job search started.".to_string(),
            }),
        )),
        TriggerOutcome::Rejected => Err(AppError::Conflict(
            "A job search is already in progress.".to_string(),
        )),
    }
}

/// GET /run-search/status
pub async fn handle_run_status(State(state): State<AppState>) -> Json<RunStatusResponse> {
    Json(RunStatusResponse {
        running: state.run_guard.is_running(),
    })
}
