//! GetSessionHandler - read-only session snapshot for resume.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::adapters::store::InMemorySessionStore;
use crate::domain::foundation::{SessionId, Timestamp};
use crate::domain::interview::{
    Difficulty, FinalReport, InterviewSession, InterviewStateMachine, Phase,
};

use super::TurnError;

/// Query for a session snapshot.
#[derive(Debug, Clone)]
pub struct GetSessionQuery {
    pub session_id: SessionId,
}

/// Read-only view of a session, sufficient to resume the interview.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionView {
    pub session_id: SessionId,
    pub candidate_name: String,
    pub topic: String,
    pub target_role: Option<String>,
    pub phase: Phase,
    pub difficulty: Difficulty,
    pub question_number: u32,
    pub max_questions: u32,
    pub questions_answered: u32,
    /// The outstanding question, re-served verbatim on resume.
    pub current_question: Option<String>,
    /// Present once the interview is complete.
    pub final_report: Option<FinalReport>,
    pub created_at: Timestamp,
    pub last_activity: Timestamp,
}

impl SessionView {
    /// Builds the view. `current_question` comes from the state machine's
    /// resume path, not from the caller poking at session internals.
    fn new(session: &InterviewSession, current_question: Option<String>) -> Self {
        let final_report = session
            .is_complete()
            .then(|| FinalReport::from_session(session));

        Self {
            session_id: session.session_id,
            candidate_name: session.candidate_name.clone(),
            topic: session.topic().to_string(),
            target_role: session.profile.target_role.clone(),
            phase: session.phase,
            difficulty: session.difficulty,
            question_number: session.question_number,
            max_questions: session.max_questions,
            questions_answered: session.answered_count() as u32,
            current_question,
            final_report,
            created_at: session.created_at,
            last_activity: session.last_activity,
        }
    }
}

/// Handler for session reads.
pub struct GetSessionHandler {
    store: Arc<InMemorySessionStore>,
    machine: Arc<InterviewStateMachine>,
}

impl GetSessionHandler {
    pub fn new(store: Arc<InMemorySessionStore>, machine: Arc<InterviewStateMachine>) -> Self {
        Self { store, machine }
    }

    pub async fn handle(&self, query: GetSessionQuery) -> Result<SessionView, TurnError> {
        let session = self.store.get(query.session_id).await?;

        // The state machine's resume path is the one authority on what the
        // outstanding question is; completed or not-yet-suspended sessions
        // simply have none to re-serve.
        let current_question = self
            .machine
            .resume(&session)
            .ok()
            .map(|(question, _)| question);

        Ok(SessionView::new(&session, current_question))
    }
}
