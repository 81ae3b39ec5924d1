//! Rubric rating types and prompt construction for model-based scoring.
//!
//! The model returns a 1..=5 rating per dimension plus free-text feedback;
//! ratings are rescaled to 0..=10 before blending. The critic verdict is a
//! second model's review of a rating's internal consistency. Deserialization
//! happens at the generation port; this module owns domain validation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::ports::{CompletionRequest, GenerationPurpose, MessageRole};

use super::Dimension;

/// Structured rubric rating returned by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RubricRating {
    /// 1..=5 rating per dimension.
    pub ratings: BTreeMap<Dimension, u8>,
    /// Free-text feedback for the candidate.
    pub feedback: String,
}

impl RubricRating {
    /// Checks that every expected dimension is rated and in range.
    pub fn validate(&self, expected: &[Dimension]) -> Result<(), RubricValidationError> {
        for dim in expected {
            match self.ratings.get(dim) {
                None => return Err(RubricValidationError::MissingDimension(*dim)),
                Some(r) if !(1..=5).contains(r) => {
                    return Err(RubricValidationError::RatingOutOfRange {
                        dimension: *dim,
                        rating: *r,
                    })
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// Per-dimension scores rescaled to 0..=10.
    pub fn rescaled(&self) -> BTreeMap<Dimension, f64> {
        self.ratings
            .iter()
            .map(|(dim, rating)| (*dim, *rating as f64 * 2.0))
            .collect()
    }

    /// Mean of the rescaled dimension scores, 0..=10.
    pub fn model_score(&self) -> f64 {
        if self.ratings.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.ratings.values().map(|r| *r as f64 * 2.0).sum();
        sum / self.ratings.len() as f64
    }
}

/// A parsed rating that fails the rubric's domain rules.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RubricValidationError {
    #[error("rubric output missing dimension '{0}'")]
    MissingDimension(Dimension),

    #[error("rating for '{dimension}' out of range 1..=5: {rating}")]
    RatingOutOfRange { dimension: Dimension, rating: u8 },
}

/// The critic's verdict on a rubric rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticVerdict {
    /// Whether the rating and feedback are internally consistent.
    pub consistent: bool,
    /// Optional explanation of the inconsistency.
    #[serde(default)]
    pub reason: Option<String>,
}

/// Builds the rubric scoring request.
///
/// `strict` tightens the format instruction; used for the single retry after
/// a malformed response.
pub fn rubric_request(
    question: &str,
    answer: &str,
    dimensions: &[Dimension],
    strict: bool,
) -> CompletionRequest {
    let dim_keys: Vec<String> = dimensions
        .iter()
        .map(|d| format!("\"{}\"", serde_key(d)))
        .collect();

    let format_note = if strict {
        "Respond with ONLY a JSON object, no prose, no markdown fences. \
         Any other output is a failure."
    } else {
        "Respond with a JSON object."
    };

    let system = format!(
        "You are a rigorous technical interviewer scoring a candidate's answer. \
         Rate each dimension from 1 (poor) to 5 (excellent) and give concise, \
         actionable feedback. {} The object must have the shape \
         {{\"ratings\": {{{}: <1-5>}}, \"feedback\": \"<text>\"}} with every listed \
         dimension present.",
        format_note,
        dim_keys.join(", ")
    );

    let user = format!("Question:\n{}\n\nCandidate answer:\n{}", question, answer);

    CompletionRequest::new(GenerationPurpose::Rubric)
        .with_system_prompt(system)
        .with_message(MessageRole::User, user)
        .with_max_tokens(600)
        .with_temperature(0.2)
        .with_json_mode()
}

/// Builds the critic review request for a rubric rating.
pub fn critic_request(question: &str, answer: &str, rating: &RubricRating) -> CompletionRequest {
    let ratings_json =
        serde_json::to_string(&rating.ratings).unwrap_or_else(|_| "{}".to_string());

    let system = "You review interview score cards for internal consistency and bias. \
                  Check whether the ratings match the feedback and the answer's actual \
                  content. Respond with a JSON object of the shape \
                  {\"consistent\": <bool>, \"reason\": \"<text or null>\"}."
        .to_string();

    let user = format!(
        "Question:\n{}\n\nCandidate answer:\n{}\n\nRatings:\n{}\n\nFeedback:\n{}",
        question, answer, ratings_json, rating.feedback
    );

    CompletionRequest::new(GenerationPurpose::Critic)
        .with_system_prompt(system)
        .with_message(MessageRole::User, user)
        .with_max_tokens(300)
        .with_temperature(0.0)
        .with_json_mode()
}

fn serde_key(dim: &Dimension) -> &'static str {
    match dim {
        Dimension::TechnicalAccuracy => "technical_accuracy",
        Dimension::Communication => "communication",
        Dimension::ProblemSolving => "problem_solving",
        Dimension::CodeQuality => "code_quality",
    }
}
