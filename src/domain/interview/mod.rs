//! Interview orchestration - session state, difficulty, turn logic.

mod difficulty;
mod fallback;
mod report;
mod session;
mod state_machine;

pub use difficulty::{Difficulty, DifficultyAdapter};
pub use fallback::FallbackPool;
pub use report::{FinalReport, QuestionSummary};
pub use session::{normalize_question, InterviewSession, Phase, QaExchange};
pub use state_machine::{
    route_entry, AnswerTurn, EntryRoute, InterviewStateMachine, StartTurn, TurnStateError,
};
