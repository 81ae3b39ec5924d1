//! Answer evaluation - heuristic, semantic, and rubric scoring.

mod engine;
mod heuristic;
mod rubric;
mod semantic;
mod topic;

pub use engine::{BlendWeights, EvaluationEngine};
pub use heuristic::HeuristicScorer;
pub use rubric::{CriticVerdict, RubricRating, RubricValidationError};
pub use semantic::{cosine_similarity, SemanticScorer};
pub use topic::TopicProfile;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Scoring dimension for a single answer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    TechnicalAccuracy,
    Communication,
    ProblemSolving,
    CodeQuality,
}

impl Dimension {
    /// Human-readable label for reports.
    pub fn label(&self) -> &'static str {
        match self {
            Dimension::TechnicalAccuracy => "technical accuracy",
            Dimension::Communication => "communication",
            Dimension::ProblemSolving => "problem solving",
            Dimension::CodeQuality => "code quality",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Result of evaluating one answer. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Deterministic signal from answer structure and keyword overlap, 0..=10.
    pub heuristic_score: f64,
    /// Cosine similarity between answer and question context, 0..=1.
    pub semantic_score: f64,
    /// Rubric score from the model, 0..=10. `None` when scoring degraded.
    pub model_score: Option<f64>,
    /// Final combined score, 0..=10.
    pub blended_score: f64,
    /// Per-dimension scores, 0..=10.
    pub dimension_scores: BTreeMap<Dimension, f64>,
    /// Free-text feedback for the candidate.
    pub feedback: String,
    /// Whether the critic pass reviewed the rubric rating.
    pub critique_applied: bool,
}

impl EvaluationResult {
    /// True when the model-based rubric score was unavailable.
    pub fn is_degraded(&self) -> bool {
        self.model_score.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimension_serializes_snake_case() {
        let json = serde_json::to_string(&Dimension::TechnicalAccuracy).unwrap();
        assert_eq!(json, "\"technical_accuracy\"");

        let json = serde_json::to_string(&Dimension::CodeQuality).unwrap();
        assert_eq!(json, "\"code_quality\"");
    }

    #[test]
    fn dimension_labels_are_human_readable() {
        assert_eq!(Dimension::ProblemSolving.label(), "problem solving");
        assert_eq!(Dimension::Communication.to_string(), "communication");
    }

    #[test]
    fn evaluation_result_degraded_flag_follows_model_score() {
        let result = EvaluationResult {
            heuristic_score: 5.0,
            semantic_score: 0.8,
            model_score: None,
            blended_score: 5.0,
            dimension_scores: BTreeMap::new(),
            feedback: String::new(),
            critique_applied: false,
        };
        assert!(result.is_degraded());

        let result = EvaluationResult {
            model_score: Some(8.0),
            ..result
        };
        assert!(!result.is_degraded());
    }

    #[test]
    fn evaluation_result_roundtrips_through_json() {
        let mut dims = BTreeMap::new();
        dims.insert(Dimension::TechnicalAccuracy, 8.0);
        dims.insert(Dimension::Communication, 7.0);

        let result = EvaluationResult {
            heuristic_score: 6.5,
            semantic_score: 0.91,
            model_score: Some(8.0),
            blended_score: 7.4,
            dimension_scores: dims,
            feedback: "Solid coverage of tradeoffs.".to_string(),
            critique_applied: true,
        };

        let json = serde_json::to_string(&result).unwrap();
        let parsed: EvaluationResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, result);
    }
}
