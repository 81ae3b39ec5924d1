//! Interview State Machine - per-turn orchestration.
//!
//! Each external turn routes to exactly one path: new session, evaluate an
//! answer, or re-serve the outstanding question. The machine mutates the
//! session it is given and returns a turn result; committing the mutated
//! session is the caller's job, so a failed turn never leaves partial state
//! behind.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::evaluation::{EvaluationEngine, EvaluationResult, TopicProfile};
use crate::ports::{
    fingerprint, CompletionRequest, GenerationPurpose, MessageRole, TextGenerator,
};

use super::{
    normalize_question, Difficulty, DifficultyAdapter, FallbackPool, FinalReport,
    InterviewSession,
};

/// How many recent questions feed the generation prompt and cache key.
const RECENT_QUESTION_CONTEXT: usize = 3;

/// Where an inbound turn routes, decided purely from session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryRoute {
    /// Nothing asked yet: build context, greet, generate question #1.
    NewSession,
    /// A question is outstanding and an answer arrived: evaluate it.
    Evaluate,
    /// A question is outstanding but no answer: re-serve it unchanged.
    Resume,
}

/// Entry routing contract. Must stay exact: resume never regenerates and
/// never bumps the question counter.
pub fn route_entry(question_number: u32, has_answer: bool) -> EntryRoute {
    if question_number == 0 {
        EntryRoute::NewSession
    } else if has_answer {
        EntryRoute::Evaluate
    } else {
        EntryRoute::Resume
    }
}

/// Result of starting a session: greeting plus the first question.
#[derive(Debug, Clone, PartialEq)]
pub struct StartTurn {
    pub greeting: String,
    pub question: String,
    pub question_number: u32,
    pub difficulty: Difficulty,
    pub generation_degraded: bool,
}

/// Result of an answer turn.
#[derive(Debug, Clone, PartialEq)]
pub enum AnswerTurn {
    /// More questions remain; the next one is already served.
    Continue {
        evaluation: EvaluationResult,
        next_question: String,
        next_question_number: u32,
        difficulty: Difficulty,
        generation_degraded: bool,
    },
    /// That was the last answer; the interview is complete.
    Completed {
        evaluation: EvaluationResult,
        report: FinalReport,
    },
}

/// A turn was requested that the session's phase does not allow.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TurnStateError {
    #[error("session has already been started")]
    AlreadyStarted,

    #[error("interview is already complete")]
    AlreadyComplete,

    #[error("session is not awaiting an answer")]
    NotAwaitingAnswer,
}

/// Drives one session through its question/answer turns.
pub struct InterviewStateMachine {
    generator: Arc<dyn TextGenerator>,
    evaluator: Arc<EvaluationEngine>,
    difficulty: DifficultyAdapter,
    fallback: FallbackPool,
    /// Bounded attempts at generating a non-duplicate question.
    generation_attempts: u32,
}

impl InterviewStateMachine {
    pub fn new(generator: Arc<dyn TextGenerator>, evaluator: Arc<EvaluationEngine>) -> Self {
        Self {
            generator,
            evaluator,
            difficulty: DifficultyAdapter::default(),
            fallback: FallbackPool::new(),
            generation_attempts: 3,
        }
    }

    /// Overrides the difficulty adaptation rule.
    pub fn with_difficulty_adapter(mut self, adapter: DifficultyAdapter) -> Self {
        self.difficulty = adapter;
        self
    }

    /// Overrides the duplicate-question retry bound.
    pub fn with_generation_attempts(mut self, attempts: u32) -> Self {
        self.generation_attempts = attempts.max(1);
        self
    }

    /// New-session path: greet and serve question #1.
    pub async fn start(&self, session: &mut InterviewSession) -> Result<StartTurn, TurnStateError> {
        if route_entry(session.question_number, false) != EntryRoute::NewSession {
            return Err(TurnStateError::AlreadyStarted);
        }

        let greeting = greeting_for(session);
        let (question, generation_degraded) = self.next_question(session).await;
        session.ask_question(question.clone());

        info!(
            session_id = %session.session_id,
            difficulty = %session.difficulty,
            degraded = generation_degraded,
            "interview started"
        );

        Ok(StartTurn {
            greeting,
            question,
            question_number: session.question_number,
            difficulty: session.difficulty,
            generation_degraded,
        })
    }

    /// Evaluate path: score the answer, then continue or report.
    pub async fn answer(
        &self,
        session: &mut InterviewSession,
        answer: String,
    ) -> Result<AnswerTurn, TurnStateError> {
        if session.is_complete() {
            return Err(TurnStateError::AlreadyComplete);
        }
        if route_entry(session.question_number, true) != EntryRoute::Evaluate {
            return Err(TurnStateError::NotAwaitingAnswer);
        }
        let Some(question) = session.current_question.clone() else {
            return Err(TurnStateError::NotAwaitingAnswer);
        };

        session.begin_evaluation(answer.clone());
        let evaluation = self
            .evaluator
            .evaluate(&question, &answer, &session.profile)
            .await;
        session.record_exchange(question, answer, evaluation.clone());

        if session.answered_count() >= session.max_questions as usize {
            session.complete();
            let report = FinalReport::from_session(session);
            info!(
                session_id = %session.session_id,
                overall = report.overall_score,
                "interview completed"
            );
            return Ok(AnswerTurn::Completed { evaluation, report });
        }

        let next_difficulty = self
            .difficulty
            .next_tier(&session.performance_history, session.difficulty);
        session.difficulty = next_difficulty;

        let (next_question, generation_degraded) = self.next_question(session).await;
        session.ask_question(next_question.clone());

        Ok(AnswerTurn::Continue {
            evaluation,
            next_question,
            next_question_number: session.question_number,
            difficulty: next_difficulty,
            generation_degraded,
        })
    }

    /// Resume path: re-serve the outstanding question without mutating.
    pub fn resume(&self, session: &InterviewSession) -> Result<(String, u32), TurnStateError> {
        if session.is_complete() {
            return Err(TurnStateError::AlreadyComplete);
        }
        if route_entry(session.question_number, false) != EntryRoute::Resume {
            return Err(TurnStateError::NotAwaitingAnswer);
        }
        match session.current_question.as_ref() {
            Some(question) => Ok((question.clone(), session.question_number)),
            None => Err(TurnStateError::NotAwaitingAnswer),
        }
    }

    /// Generates the next question, validating against duplicates.
    ///
    /// Only the first attempt may hit the cache; retries go straight to the
    /// generator with a variation hint, otherwise a cached duplicate would
    /// loop. Returns the question and whether the fallback pool served it.
    async fn next_question(&self, session: &InterviewSession) -> (String, bool) {
        let recent = session.recent_questions(RECENT_QUESTION_CONTEXT);
        let cache_key = question_cache_key(session.topic(), session.difficulty, &recent);

        for attempt in 0..self.generation_attempts {
            let request = question_request(&session.profile, session.difficulty, &recent, attempt);
            let key = if attempt == 0 {
                Some(cache_key.clone())
            } else {
                None
            };

            match self.generator.generate(request, key).await {
                Ok(raw) => {
                    let question = raw.trim().to_string();
                    if question.is_empty() || session.has_question_like(&question) {
                        continue;
                    }
                    return (question, false);
                }
                Err(err) => {
                    // The gateway has already exhausted its own retries.
                    warn!(
                        session_id = %session.session_id,
                        error = %err,
                        "question generation failed, serving fallback"
                    );
                    return (self.fallback.question_for(session, session.difficulty), true);
                }
            }
        }

        warn!(
            session_id = %session.session_id,
            attempts = self.generation_attempts,
            "generated questions kept duplicating, serving fallback"
        );
        (self.fallback.question_for(session, session.difficulty), true)
    }
}

/// Deterministic greeting for the new-session path.
fn greeting_for(session: &InterviewSession) -> String {
    let role_note = session
        .profile
        .target_role
        .as_deref()
        .map(|role| format!(" for a {} role", role))
        .unwrap_or_default();

    format!(
        "Hello {}, welcome to your {} interview{}. We'll work through {} questions; \
         take your time with each answer.",
        session.candidate_name,
        session.topic(),
        role_note,
        session.max_questions
    )
}

/// Cache key for a question generation call.
fn question_cache_key(topic: &str, difficulty: Difficulty, recent: &[&str]) -> String {
    let normalized: Vec<String> = recent.iter().map(|q| normalize_question(q)).collect();
    fingerprint(&[
        "question",
        topic,
        &difficulty.to_string(),
        &normalized.join("|"),
    ])
}

/// Builds the question generation request.
fn question_request(
    profile: &TopicProfile,
    difficulty: Difficulty,
    recent: &[&str],
    attempt: u32,
) -> CompletionRequest {
    let role_note = profile
        .target_role
        .as_deref()
        .map(|role| format!(" interviewing for a {} role", role))
        .unwrap_or_default();

    let system = format!(
        "You are a technical interviewer assessing a candidate{} on the topic of {}. \
         Ask exactly one {} difficulty interview question. Respond with only the \
         question text, no preamble.",
        role_note, profile.topic, difficulty
    );

    let mut user = String::new();
    if recent.is_empty() {
        user.push_str("Ask the opening question.");
    } else {
        user.push_str("Questions already asked, do not repeat any of them:\n");
        for question in recent {
            user.push_str("- ");
            user.push_str(question);
            user.push('\n');
        }
    }
    if attempt > 0 {
        user.push_str("\nYour previous suggestion was too similar to an earlier question. \
                       Ask about a clearly different aspect of the topic.");
    }

    CompletionRequest::new(GenerationPurpose::Question)
        .with_system_prompt(system)
        .with_message(MessageRole::User, user)
        .with_max_tokens(200)
        .with_temperature(0.8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::embeddings::MockEmbeddingProvider;
    use crate::domain::interview::Phase;
    use crate::ports::AiError;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct ScriptedGenerator {
        replies: Mutex<VecDeque<Option<String>>>,
        calls: AtomicUsize,
    }

    impl ScriptedGenerator {
        fn new(replies: Vec<Option<&str>>) -> Self {
            Self {
                replies: Mutex::new(
                    replies
                        .into_iter()
                        .map(|r| r.map(|s| s.to_string()))
                        .collect(),
                ),
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(
            &self,
            _request: CompletionRequest,
            _cache_key: Option<String>,
        ) -> Result<String, AiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.replies.lock().unwrap().pop_front() {
                Some(Some(reply)) => Ok(reply),
                Some(None) => Err(AiError::unavailable("scripted failure")),
                None => Err(AiError::unavailable("script exhausted")),
            }
        }
    }

    /// Evaluator whose rubric calls always fail: evaluation degrades to the
    /// deterministic heuristic, which the tests can steer with answer text.
    fn heuristic_only_evaluator() -> Arc<EvaluationEngine> {
        let generator = Arc::new(ScriptedGenerator::new(vec![]));
        let embedder = MockEmbeddingProvider::new().with_default_vector(vec![1.0, 0.0]);
        Arc::new(EvaluationEngine::new(generator, Arc::new(embedder)))
    }

    fn machine(question_replies: Vec<Option<&str>>) -> InterviewStateMachine {
        InterviewStateMachine::new(
            Arc::new(ScriptedGenerator::new(question_replies)),
            heuristic_only_evaluator(),
        )
    }

    fn session(max_questions: u32) -> InterviewSession {
        InterviewSession::new(
            "Ana",
            TopicProfile::derive("algorithms", None),
            max_questions,
            Difficulty::Medium,
        )
    }

    /// Long, structured, on-topic answer: heuristic lands at 7 or above.
    const STRONG_ANSWER: &str = "\
The complexity depends on the data structure. For example, searching a \
balanced tree costs logarithmic time while a hash table gives expected \
constant time:\n- a tree keeps keys sorted, so range queries stay cheap\n\
- a hash spreads keys, so point lookups dominate\n- an array with sorting \
supports binary searching after an up-front cost\nChoosing between them is \
about the query mix. Recursion over the tree keeps the invariant simple, \
and the dynamic resize of the hash keeps amortized cost flat. In practice \
I benchmark both against the real workload before committing, because \
constant factors and memory locality often matter more than the asymptotic \
bound when the collection is small, as it usually is in services. The \
greedy choice is rarely the right one without measuring first, so I keep \
the graph of options explicit and test each candidate against realistic \
input sizes before searching for further optimizations anywhere else.";

    const WEAK_ANSWER: &str = "Not sure, probably fine either way.";

    #[test]
    fn route_entry_contract_is_exact() {
        assert_eq!(route_entry(0, false), EntryRoute::NewSession);
        assert_eq!(route_entry(0, true), EntryRoute::NewSession);
        assert_eq!(route_entry(1, true), EntryRoute::Evaluate);
        assert_eq!(route_entry(5, true), EntryRoute::Evaluate);
        assert_eq!(route_entry(1, false), EntryRoute::Resume);
        assert_eq!(route_entry(5, false), EntryRoute::Resume);
    }

    #[tokio::test]
    async fn start_serves_first_question_and_greeting() {
        let machine = machine(vec![Some("What is big-o notation?")]);
        let mut session = session(3);

        let turn = machine.start(&mut session).await.unwrap();

        assert_eq!(turn.question, "What is big-o notation?");
        assert_eq!(turn.question_number, 1);
        assert_eq!(turn.difficulty, Difficulty::Medium);
        assert!(!turn.generation_degraded);
        assert!(turn.greeting.contains("Ana"));
        assert!(turn.greeting.contains("algorithms"));
        assert_eq!(session.phase, Phase::AwaitingAnswer);
    }

    #[tokio::test]
    async fn start_twice_is_rejected() {
        let machine = machine(vec![Some("Q1"), Some("Q2")]);
        let mut session = session(3);

        machine.start(&mut session).await.unwrap();
        let result = machine.start(&mut session).await;

        assert!(matches!(result, Err(TurnStateError::AlreadyStarted)));
    }

    #[tokio::test]
    async fn generation_failure_serves_fallback_and_flags_degraded() {
        let machine = machine(vec![None]);
        let mut session = session(3);

        let turn = machine.start(&mut session).await.unwrap();

        assert!(turn.generation_degraded);
        assert!(turn.question.contains("algorithms"));
    }

    #[tokio::test]
    async fn duplicate_questions_trigger_regeneration() {
        let machine = machine(vec![
        Some("What is big-o?"),
            // Next question duplicates, then a fresh one succeeds.
            Some("What is big-o?"),
            Some("Explain hash collisions."),
        ]);
        let mut session = session(3);

        machine.start(&mut session).await.unwrap();
        let turn = machine.answer(&mut session, STRONG_ANSWER.to_string()).await.unwrap();

        match turn {
            AnswerTurn::Continue {
                next_question,
                generation_degraded,
                ..
            } => {
                assert_eq!(next_question, "Explain hash collisions.");
                assert!(!generation_degraded);
            }
            other => panic!("expected Continue, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn persistent_duplicates_fall_back_after_bounded_attempts() {
        let machine = machine(vec![
            Some("What is big-o?"),
            Some("What is big-o?"),
            Some("what is BIG-O"),
            Some("What is big-o? "),
        ]);
        let mut session = session(3);

        machine.start(&mut session).await.unwrap();
        let turn = machine.answer(&mut session, STRONG_ANSWER.to_string()).await.unwrap();

        match turn {
            AnswerTurn::Continue {
                next_question,
                generation_degraded,
                ..
            } => {
                assert!(generation_degraded);
                assert!(!session
                    .qa_history
                    .iter()
                    .any(|ex| normalize_question(&ex.question)
                        == normalize_question(&next_question)));
            }
            other => panic!("expected Continue, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn strong_answer_steps_difficulty_up() {
        let machine = machine(vec![Some("Q1"), Some("Q2")]);
        let mut session = session(3);

        machine.start(&mut session).await.unwrap();
        let turn = machine.answer(&mut session, STRONG_ANSWER.to_string()).await.unwrap();

        match turn {
            AnswerTurn::Continue { difficulty, evaluation, .. } => {
                assert!(evaluation.blended_score >= 7.0, "got {}", evaluation.blended_score);
                assert_eq!(difficulty, Difficulty::Hard);
            }
            other => panic!("expected Continue, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn weak_answer_steps_difficulty_down() {
        let machine = machine(vec![Some("Q1"), Some("Q2")]);
        let mut session = session(3);

        machine.start(&mut session).await.unwrap();
        let turn = machine.answer(&mut session, WEAK_ANSWER.to_string()).await.unwrap();

        match turn {
            AnswerTurn::Continue { difficulty, evaluation, .. } => {
                assert!(evaluation.blended_score < 4.0, "got {}", evaluation.blended_score);
                assert_eq!(difficulty, Difficulty::Easy);
            }
            other => panic!("expected Continue, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn final_answer_completes_with_report() {
        let machine = machine(vec![Some("Q1")]);
        let mut session = session(1);

        machine.start(&mut session).await.unwrap();
        let turn = machine.answer(&mut session, STRONG_ANSWER.to_string()).await.unwrap();

        match turn {
            AnswerTurn::Completed { report, .. } => {
                assert_eq!(report.questions_answered, 1);
                assert!(session.is_complete());
                assert_eq!(session.qa_history.len(), 1);
            }
            other => panic!("expected Completed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn answer_after_completion_is_rejected() {
        let machine = machine(vec![Some("Q1")]);
        let mut session = session(1);

        machine.start(&mut session).await.unwrap();
        machine.answer(&mut session, "done".to_string()).await.unwrap();
        let result = machine.answer(&mut session, "extra".to_string()).await;

        assert!(matches!(result, Err(TurnStateError::AlreadyComplete)));
    }

    #[tokio::test]
    async fn resume_reserves_question_without_mutation() {
        let machine = machine(vec![Some("Q1")]);
        let mut session = session(3);

        machine.start(&mut session).await.unwrap();
        let snapshot = session.clone();

        let (question, number) = machine.resume(&session).unwrap();
        let (question_again, number_again) = machine.resume(&session).unwrap();

        assert_eq!(question, "Q1");
        assert_eq!(number, 1);
        assert_eq!(question, question_again);
        assert_eq!(number, number_again);
        assert_eq!(session, snapshot);
    }

    #[tokio::test]
    async fn resume_on_fresh_session_is_rejected() {
        let machine = machine(vec![]);
        let session = session(3);

        assert!(matches!(
            machine.resume(&session),
            Err(TurnStateError::NotAwaitingAnswer)
        ));
    }

    #[tokio::test]
    async fn all_served_questions_are_pairwise_distinct() {
        // Generator keeps repeating itself; the machine must still serve
        // distinct questions via the fallback pool.
        let machine = machine(vec![
            Some("Same question?"); 20
        ]);
        let mut session = session(5);

        machine.start(&mut session).await.unwrap();
        for _ in 0..4 {
            machine.answer(&mut session, STRONG_ANSWER.to_string()).await.unwrap();
        }

        let normalized: Vec<String> = session
            .qa_history
            .iter()
            .map(|ex| normalize_question(&ex.question))
            .collect();
        let mut deduped = normalized.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), normalized.len());
    }

    #[tokio::test]
    async fn question_generator_is_not_called_on_resume() {
        let generator = Arc::new(ScriptedGenerator::new(vec![Some("Q1")]));
        let machine = InterviewStateMachine::new(generator.clone(), heuristic_only_evaluator());
        let mut session = session(3);

        machine.start(&mut session).await.unwrap();
        let calls_after_start = generator.call_count();

        machine.resume(&session).unwrap();
        machine.resume(&session).unwrap();

        assert_eq!(generator.call_count(), calls_after_start);
    }
}
