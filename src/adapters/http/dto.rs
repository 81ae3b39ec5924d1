//! Request/response DTOs for the turn protocol endpoints.

use serde::{Deserialize, Serialize};

use crate::application::handlers::{
    StartInterviewResult, SubmitAnswerResult, TurnStatus,
};
use crate::domain::evaluation::EvaluationResult;
use crate::domain::foundation::ErrorCode;
use crate::domain::interview::{Difficulty, FinalReport};

/// POST /api/interviews request body.
#[derive(Debug, Clone, Deserialize)]
pub struct StartInterviewRequest {
    pub candidate_name: String,
    pub topic: String,
    pub max_questions: u32,
    #[serde(default)]
    pub target_role: Option<String>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
}

/// POST /api/interviews response body.
#[derive(Debug, Clone, Serialize)]
pub struct StartInterviewResponse {
    pub session_id: String,
    pub greeting: String,
    pub question: String,
    pub question_number: u32,
    pub difficulty: Difficulty,
    pub generation_degraded: bool,
}

impl From<StartInterviewResult> for StartInterviewResponse {
    fn from(result: StartInterviewResult) -> Self {
        Self {
            session_id: result.session_id.to_string(),
            greeting: result.greeting,
            question: result.question,
            question_number: result.question_number,
            difficulty: result.difficulty,
            generation_degraded: result.generation_degraded,
        }
    }
}

/// POST /api/interviews/:id/answers request body.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitAnswerRequest {
    pub answer: String,
}

/// POST /api/interviews/:id/answers response body.
#[derive(Debug, Clone, Serialize)]
pub struct SubmitAnswerResponse {
    pub status: TurnStatus,
    pub evaluation: EvaluationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_question: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_question_number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_report: Option<FinalReport>,
    pub generation_degraded: bool,
}

impl From<SubmitAnswerResult> for SubmitAnswerResponse {
    fn from(result: SubmitAnswerResult) -> Self {
        Self {
            status: result.status,
            evaluation: result.evaluation,
            next_question: result.next_question,
            next_question_number: result.next_question_number,
            difficulty: result.difficulty,
            final_report: result.final_report,
            generation_degraded: result.generation_degraded,
        }
    }
}

/// Structured error body: `{code, message}` the caller can branch on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    /// Generic body for unexpected failures; details stay server-side.
    pub fn internal() -> Self {
        Self::new(ErrorCode::InternalError, "An internal error occurred")
    }
}
