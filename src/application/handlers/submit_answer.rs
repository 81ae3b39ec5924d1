//! SubmitAnswerHandler - evaluate an answer and advance the interview.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::adapters::store::InMemorySessionStore;
use crate::domain::evaluation::EvaluationResult;
use crate::domain::foundation::SessionId;
use crate::domain::interview::{AnswerTurn, Difficulty, FinalReport, InterviewStateMachine};

use super::{validate_text, TurnError, MAX_ANSWER_LEN};

/// Command to submit an answer to the outstanding question.
#[derive(Debug, Clone)]
pub struct SubmitAnswerCommand {
    pub session_id: SessionId,
    pub answer: String,
}

/// Whether the interview continues or has completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnStatus {
    Continue,
    Completed,
}

/// Result of submitting an answer.
#[derive(Debug, Clone)]
pub struct SubmitAnswerResult {
    pub status: TurnStatus,
    pub evaluation: EvaluationResult,
    pub next_question: Option<String>,
    pub next_question_number: Option<u32>,
    pub difficulty: Option<Difficulty>,
    pub final_report: Option<FinalReport>,
    pub generation_degraded: bool,
}

/// Handler for answer submission.
pub struct SubmitAnswerHandler {
    store: Arc<InMemorySessionStore>,
    machine: Arc<InterviewStateMachine>,
}

impl SubmitAnswerHandler {
    pub fn new(store: Arc<InMemorySessionStore>, machine: Arc<InterviewStateMachine>) -> Self {
        Self { store, machine }
    }

    pub async fn handle(
        &self,
        cmd: SubmitAnswerCommand,
    ) -> Result<SubmitAnswerResult, TurnError> {
        validate_text("answer", &cmd.answer, MAX_ANSWER_LEN)?;

        // The per-session lock is held for the whole turn: concurrent
        // submissions for the same session serialize, and at most one
        // generation call is outstanding per session.
        let mut guard = self.store.lock_session(cmd.session_id).await?;

        // The turn runs detached so an abandoned caller does not abort the
        // in-flight generation; the result still commits and gets cached for
        // whoever resumes the session. The stored session changes only when
        // the turn fully succeeds.
        let machine = self.machine.clone();
        let answer = cmd.answer;
        let turn = tokio::spawn(async move {
            let mut working = (*guard).clone();
            let turn = machine.answer(&mut working, answer).await;
            if turn.is_ok() {
                *guard = working;
            }
            turn
        })
        .await
        .map_err(|e| TurnError::Internal(format!("turn task failed: {}", e)))??;

        Ok(match turn {
            AnswerTurn::Continue {
                evaluation,
                next_question,
                next_question_number,
                difficulty,
                generation_degraded,
            } => SubmitAnswerResult {
                status: TurnStatus::Continue,
                evaluation,
                next_question: Some(next_question),
                next_question_number: Some(next_question_number),
                difficulty: Some(difficulty),
                final_report: None,
                generation_degraded,
            },
            AnswerTurn::Completed { evaluation, report } => SubmitAnswerResult {
                status: TurnStatus::Completed,
                evaluation,
                next_question: None,
                next_question_number: None,
                difficulty: None,
                final_report: Some(report),
                generation_degraded: false,
            },
        })
    }
}
