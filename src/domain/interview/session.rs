//! Interview Session Entity
//!
//! Tracks the complete state of one candidate's interview run. Sessions are
//! owned by the session store; turn logic mutates a clone and commits it
//! back under the store's per-session lock.

use serde::{Deserialize, Serialize};

use crate::domain::evaluation::{EvaluationResult, TopicProfile};
use crate::domain::foundation::{SessionId, Timestamp};

use super::Difficulty;

/// Lifecycle phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Created, no question asked yet.
    New,
    /// A question is outstanding.
    AwaitingAnswer,
    /// An answer is being scored.
    Evaluating,
    /// All questions answered and the report produced.
    Complete,
}

/// One completed question/answer/evaluation exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaExchange {
    pub question: String,
    pub answer: String,
    pub evaluation: EvaluationResult,
}

/// Complete state of one interview run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewSession {
    pub session_id: SessionId,
    pub candidate_name: String,
    pub profile: TopicProfile,
    pub question_number: u32,
    pub max_questions: u32,
    pub current_question: Option<String>,
    pub current_answer: Option<String>,
    pub qa_history: Vec<QaExchange>,
    pub performance_history: Vec<f64>,
    pub phase: Phase,
    pub difficulty: Difficulty,
    pub last_activity: Timestamp,
    pub created_at: Timestamp,
}

impl InterviewSession {
    /// Creates a fresh session. No question is asked yet.
    pub fn new(
        candidate_name: impl Into<String>,
        profile: TopicProfile,
        max_questions: u32,
        difficulty: Difficulty,
    ) -> Self {
        let now = Timestamp::now();
        Self {
            session_id: SessionId::new(),
            candidate_name: candidate_name.into(),
            profile,
            question_number: 0,
            max_questions,
            current_question: None,
            current_answer: None,
            qa_history: Vec::new(),
            performance_history: Vec::new(),
            phase: Phase::New,
            difficulty,
            last_activity: now,
            created_at: now,
        }
    }

    /// Convenience accessor for the interview topic.
    pub fn topic(&self) -> &str {
        &self.profile.topic
    }

    /// Serves a new question and suspends awaiting the answer.
    pub fn ask_question(&mut self, question: String) {
        self.current_question = Some(question);
        self.question_number += 1;
        self.phase = Phase::AwaitingAnswer;
        self.touch();
    }

    /// Marks the outstanding question as being evaluated.
    pub fn begin_evaluation(&mut self, answer: String) {
        self.current_answer = Some(answer);
        self.phase = Phase::Evaluating;
        self.touch();
    }

    /// Records a completed exchange and clears the transient question/answer.
    pub fn record_exchange(
        &mut self,
        question: String,
        answer: String,
        evaluation: EvaluationResult,
    ) {
        self.performance_history.push(evaluation.blended_score);
        self.qa_history.push(QaExchange {
            question,
            answer,
            evaluation,
        });
        self.current_question = None;
        self.current_answer = None;
        self.touch();
    }

    /// Marks the interview complete.
    pub fn complete(&mut self) {
        self.phase = Phase::Complete;
        self.touch();
    }

    /// Number of fully answered and evaluated questions.
    pub fn answered_count(&self) -> usize {
        self.qa_history.len()
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }

    /// True when a candidate question duplicates any question already asked,
    /// under whitespace/case normalization.
    pub fn has_question_like(&self, candidate: &str) -> bool {
        let normalized = normalize_question(candidate);
        self.qa_history
            .iter()
            .any(|ex| normalize_question(&ex.question) == normalized)
            || self
                .current_question
                .as_deref()
                .is_some_and(|q| normalize_question(q) == normalized)
    }

    /// The most recently asked question texts, oldest first.
    pub fn recent_questions(&self, count: usize) -> Vec<&str> {
        let mut recent: Vec<&str> = self
            .qa_history
            .iter()
            .map(|ex| ex.question.as_str())
            .collect();
        if let Some(current) = self.current_question.as_deref() {
            recent.push(current);
        }
        let start = recent.len().saturating_sub(count);
        recent.split_off(start)
    }

    /// Refreshes the activity timestamp.
    pub fn touch(&mut self) {
        self.last_activity = Timestamp::now();
    }
}

/// Normalizes question text for duplicate detection: lowercase, collapsed
/// whitespace, trailing punctuation stripped.
pub fn normalize_question(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end_matches(['?', '.', '!'])
        .to_string()
}
