pub mod health;
pub mod search;
pub mod suggestions;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/run-search", post(search::handle_run_search))
        .route("/run-search/status", get(search::handle_run_status))
        .route(
            "/api/v1/suggestions",
            post(suggestions::handle_suggestions),
        )
        .with_state(state)
}
