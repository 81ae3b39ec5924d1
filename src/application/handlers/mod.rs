//! Turn protocol handlers: start interview, submit answer, get session.

mod get_session;
mod start_interview;
mod submit_answer;

pub use get_session::{GetSessionHandler, GetSessionQuery, SessionView};
pub use start_interview::{StartInterviewCommand, StartInterviewHandler, StartInterviewResult};
pub use submit_answer::{
    SubmitAnswerCommand, SubmitAnswerHandler, SubmitAnswerResult, TurnStatus,
};

use crate::adapters::store::SessionStoreError;
use crate::domain::foundation::{ErrorCode, SessionId, ValidationError};
use crate::domain::interview::TurnStateError;

/// Caller input limits.
pub const MAX_NAME_LEN: usize = 200;
pub const MAX_TOPIC_LEN: usize = 200;
pub const MAX_ROLE_LEN: usize = 200;
pub const MAX_ANSWER_LEN: usize = 20_000;
pub const MAX_QUESTIONS: u32 = 50;

/// Errors surfaced by turn handlers.
#[derive(Debug, thiserror::Error)]
pub enum TurnError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("session not found: {0}")]
    SessionNotFound(SessionId),

    #[error("session expired: {0}")]
    SessionExpired(SessionId),

    #[error("interview is already complete")]
    SessionComplete,

    #[error("internal error: {0}")]
    Internal(String),
}

impl TurnError {
    /// Wire error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            TurnError::Validation(_) => ErrorCode::ValidationError,
            TurnError::SessionNotFound(_) => ErrorCode::SessionNotFound,
            TurnError::SessionExpired(_) => ErrorCode::SessionExpired,
            TurnError::SessionComplete => ErrorCode::SessionComplete,
            TurnError::Internal(_) => ErrorCode::InternalError,
        }
    }
}

impl From<SessionStoreError> for TurnError {
    fn from(err: SessionStoreError) -> Self {
        match err {
            SessionStoreError::NotFound(id) => TurnError::SessionNotFound(id),
            SessionStoreError::Expired(id) => TurnError::SessionExpired(id),
        }
    }
}

impl From<TurnStateError> for TurnError {
    fn from(err: TurnStateError) -> Self {
        match err {
            TurnStateError::AlreadyComplete => TurnError::SessionComplete,
            other => TurnError::Internal(other.to_string()),
        }
    }
}

/// Validates a required text field against emptiness and a length cap.
fn validate_text(field: &'static str, value: &str, max_len: usize) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::empty_field(field));
    }
    if value.len() > max_len {
        return Err(ValidationError::too_long(field, max_len, value.len()));
    }
    Ok(())
}
