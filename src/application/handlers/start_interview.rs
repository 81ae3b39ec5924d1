//! StartInterviewHandler - create a session and serve the first question.

use std::sync::Arc;

use crate::adapters::store::InMemorySessionStore;
use crate::domain::evaluation::TopicProfile;
use crate::domain::foundation::{SessionId, ValidationError};
use crate::domain::interview::{Difficulty, InterviewSession, InterviewStateMachine};

use super::{validate_text, TurnError, MAX_NAME_LEN, MAX_QUESTIONS, MAX_ROLE_LEN, MAX_TOPIC_LEN};

/// Command to start an interview.
#[derive(Debug, Clone)]
pub struct StartInterviewCommand {
    pub candidate_name: String,
    pub topic: String,
    pub max_questions: u32,
    pub target_role: Option<String>,
    pub difficulty: Option<Difficulty>,
}

/// Result of starting an interview.
#[derive(Debug, Clone)]
pub struct StartInterviewResult {
    pub session_id: SessionId,
    pub greeting: String,
    pub question: String,
    pub question_number: u32,
    pub difficulty: Difficulty,
    pub generation_degraded: bool,
}

/// Handler for starting interviews.
pub struct StartInterviewHandler {
    store: Arc<InMemorySessionStore>,
    machine: Arc<InterviewStateMachine>,
}

impl StartInterviewHandler {
    pub fn new(store: Arc<InMemorySessionStore>, machine: Arc<InterviewStateMachine>) -> Self {
        Self { store, machine }
    }

    pub async fn handle(
        &self,
        cmd: StartInterviewCommand,
    ) -> Result<StartInterviewResult, TurnError> {
        Self::validate(&cmd)?;

        let profile = TopicProfile::derive(&cmd.topic, cmd.target_role.as_deref());
        let mut session = InterviewSession::new(
            cmd.candidate_name.trim(),
            profile,
            cmd.max_questions,
            cmd.difficulty.unwrap_or(Difficulty::Medium),
        );

        let turn = self
            .machine
            .start(&mut session)
            .await
            .map_err(|e| TurnError::Internal(e.to_string()))?;

        // The session is committed to the store only after the turn
        // succeeded, so a failed start leaves nothing behind.
        let session_id = self.store.insert(session).await;

        Ok(StartInterviewResult {
            session_id,
            greeting: turn.greeting,
            question: turn.question,
            question_number: turn.question_number,
            difficulty: turn.difficulty,
            generation_degraded: turn.generation_degraded,
        })
    }

    fn validate(cmd: &StartInterviewCommand) -> Result<(), ValidationError> {
        validate_text("candidate_name", &cmd.candidate_name, MAX_NAME_LEN)?;
        validate_text("topic", &cmd.topic, MAX_TOPIC_LEN)?;
        if let Some(role) = &cmd.target_role {
            validate_text("target_role", role, MAX_ROLE_LEN)?;
        }
        if cmd.max_questions == 0 || cmd.max_questions > MAX_QUESTIONS {
            return Err(ValidationError::out_of_range(
                "max_questions",
                1,
                MAX_QUESTIONS as i64,
                cmd.max_questions as i64,
            ));
        }
        Ok(())
    }
}
