//! HTTP handlers for the turn protocol endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use crate::application::handlers::{
    GetSessionHandler, GetSessionQuery, StartInterviewCommand, StartInterviewHandler,
    SubmitAnswerCommand, SubmitAnswerHandler, TurnError,
};
use crate::domain::foundation::SessionId;

use super::dto::{
    ErrorResponse, StartInterviewRequest, StartInterviewResponse, SubmitAnswerRequest,
    SubmitAnswerResponse,
};

/// Shared handler state for the router.
#[derive(Clone)]
pub struct AppState {
    pub start_handler: Arc<StartInterviewHandler>,
    pub submit_handler: Arc<SubmitAnswerHandler>,
    pub get_handler: Arc<GetSessionHandler>,
}

/// POST /api/interviews - start an interview
pub async fn start_interview(
    State(state): State<AppState>,
    Json(request): Json<StartInterviewRequest>,
) -> Response {
    let cmd = StartInterviewCommand {
        candidate_name: request.candidate_name,
        topic: request.topic,
        max_questions: request.max_questions,
        target_role: request.target_role,
        difficulty: request.difficulty,
    };

    match state.start_handler.handle(cmd).await {
        Ok(result) => {
            let response: StartInterviewResponse = result.into();
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => turn_error_response(e),
    }
}

/// POST /api/interviews/:id/answers - submit an answer
pub async fn submit_answer(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(request): Json<SubmitAnswerRequest>,
) -> Response {
    let Some(session_id) = parse_session_id(&session_id) else {
        return invalid_session_id();
    };

    let cmd = SubmitAnswerCommand {
        session_id,
        answer: request.answer,
    };

    match state.submit_handler.handle(cmd).await {
        Ok(result) => {
            let response: SubmitAnswerResponse = result.into();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => turn_error_response(e),
    }
}

/// GET /api/interviews/:id - session snapshot for resume
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Response {
    let Some(session_id) = parse_session_id(&session_id) else {
        return invalid_session_id();
    };

    match state.get_handler.handle(GetSessionQuery { session_id }).await {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(e) => turn_error_response(e),
    }
}

/// GET /health - liveness probe
pub async fn health() -> Response {
    (StatusCode::OK, "ok").into_response()
}

fn parse_session_id(raw: &str) -> Option<SessionId> {
    raw.parse().ok()
}

fn invalid_session_id() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::bad_request("Invalid session ID")),
    )
        .into_response()
}

/// Maps turn errors to HTTP responses with structured bodies.
pub fn turn_error_response(err: TurnError) -> Response {
    let (status, body) = match &err {
        TurnError::Validation(e) => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new(err.code(), e.to_string()),
        ),
        TurnError::SessionNotFound(id) => (
            StatusCode::NOT_FOUND,
            ErrorResponse::new(err.code(), format!("Session {} not found", id)),
        ),
        TurnError::SessionExpired(id) => (
            StatusCode::GONE,
            ErrorResponse::new(err.code(), format!("Session {} has expired", id)),
        ),
        TurnError::SessionComplete => (
            StatusCode::CONFLICT,
            ErrorResponse::new(err.code(), "Interview is already complete"),
        ),
        TurnError::Internal(details) => {
            error!(details = %details, "turn failed with internal error");
            (StatusCode::INTERNAL_SERVER_ERROR, ErrorResponse::internal())
        }
    };

    (status, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ValidationError;

    #[test]
    fn validation_errors_map_to_bad_request() {
        let response =
            turn_error_response(TurnError::Validation(ValidationError::empty_field("topic")));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn missing_session_maps_to_not_found() {
        let response = turn_error_response(TurnError::SessionNotFound(SessionId::new()));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn expired_session_maps_to_gone() {
        let response = turn_error_response(TurnError::SessionExpired(SessionId::new()));
        assert_eq!(response.status(), StatusCode::GONE);
    }

    #[test]
    fn completed_session_maps_to_conflict() {
        let response = turn_error_response(TurnError::SessionComplete);
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn internal_errors_are_sanitized() {
        let response = turn_error_response(TurnError::Internal("secret details".to_string()));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn session_ids_parse_strictly() {
        assert!(parse_session_id("not-a-uuid").is_none());
        let id = SessionId::new();
        assert_eq!(parse_session_id(&id.to_string()), Some(id));
    }
}
