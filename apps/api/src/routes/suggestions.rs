//! Resume tailoring suggestions for a single job description.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::screening::gate::Suggestions;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SuggestionsRequest {
    pub job_description: String,
    /// Overrides the most recent profile's resume when present.
    pub resume_context: Option<String>,
}

/// POST /api/v1/suggestions
///
/// Uses the supplied resume context, or the most recently created profile's.
pub async fn handle_suggestions(
    State(state): State<AppState>,
    Json(request): Json<SuggestionsRequest>,
) -> Result<Json<Suggestions>, AppError> {
    if request.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description cannot be empty".to_string(),
        ));
    }

    let resume_context = match request.resume_context.filter(|r| !r.trim().is_empty()) {
        Some(resume) => resume,
        None => state
            .store
            .latest_profile()
            .await?
            .and_then(|p| p.resume_context().map(str::to_string))
            .ok_or_else(|| AppError::NotFound("No profile with a resume found".to_string()))?,
    };

    state
        .gate
        .suggest(&resume_context, &request.job_description)
        .await
        .map(Json)
        .ok_or_else(|| AppError::Llm("Suggestion generation failed".to_string()))
}
