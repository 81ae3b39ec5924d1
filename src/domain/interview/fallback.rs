//! Pre-authored fallback questions.
//!
//! Served when generation fails or keeps producing duplicates. The pool
//! rotates by question number so consecutive fallbacks differ, and a
//! follow-up suffix guarantees uniqueness even past pool exhaustion.

use once_cell::sync::Lazy;

use super::{Difficulty, InterviewSession};

static EASY_POOL: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "Can you describe a recent project where you worked with {topic}?",
        "What first drew you to {topic}, and what do you enjoy about it?",
        "How would you explain the basics of {topic} to a newcomer?",
        "What tools or resources do you rely on when working with {topic}?",
        "Tell me about a small win you had recently involving {topic}.",
        "What is one common beginner mistake you see in {topic}?",
    ]
});

static MEDIUM_POOL: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "Walk me through how you would approach a typical problem in {topic}.",
        "Describe a tradeoff you have had to make when working with {topic}.",
        "What part of {topic} do you find most misunderstood, and why?",
        "How do you evaluate whether a solution in {topic} is good enough to ship?",
        "Tell me about a time something went wrong in {topic} and how you debugged it.",
        "How has your approach to {topic} changed as you gained experience?",
    ]
});

static HARD_POOL: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "Describe the hardest problem you have solved in {topic} and the key insight.",
        "How would you design a system around {topic} that must scale by two orders of magnitude?",
        "What are the failure modes of the standard approaches in {topic}, and how do you mitigate them?",
        "If you could redesign a widely used tool or technique in {topic}, what would you change?",
        "Walk me through the edge cases that make {topic} harder than it looks.",
        "How would you mentor a strong junior engineer through an advanced problem in {topic}?",
    ]
});

/// Rotating pool of pre-authored questions.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackPool;

impl FallbackPool {
    pub fn new() -> Self {
        Self
    }

    /// Picks a fallback question that does not duplicate anything already
    /// asked in the session.
    ///
    /// Rotation starts at `question_number % pool_len` and scans forward;
    /// if the whole pool is exhausted a numbered follow-up variant is used,
    /// which is unique because question numbers are.
    pub fn question_for(&self, session: &InterviewSession, difficulty: Difficulty) -> String {
        let pool = Self::pool(difficulty);
        let next_number = session.question_number as usize + 1;
        let start = next_number % pool.len();

        for offset in 0..pool.len() {
            let template = pool[(start + offset) % pool.len()];
            let question = Self::fill(template, session.topic());
            if !session.has_question_like(&question) {
                return question;
            }
        }

        let base = Self::fill(pool[start], session.topic());
        format!("{} (follow-up {})", base, next_number)
    }

    fn pool(difficulty: Difficulty) -> &'static [&'static str] {
        match difficulty {
            Difficulty::Easy => &EASY_POOL,
            Difficulty::Medium => &MEDIUM_POOL,
            Difficulty::Hard => &HARD_POOL,
        }
    }

    fn fill(template: &str, topic: &str) -> String {
        template.replace("{topic}", topic)
    }
}
