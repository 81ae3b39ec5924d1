//! Route definitions for the turn protocol.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{self, AppState};

/// Builds the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/interviews", post(handlers::start_interview))
        .route(
            "/api/interviews/:session_id/answers",
            post(handlers::submit_answer),
        )
        .route("/api/interviews/:session_id", get(handlers::get_session))
        .with_state(state)
}
