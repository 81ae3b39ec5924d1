//! Final interview report aggregation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::evaluation::Dimension;
use crate::domain::foundation::SessionId;

use super::InterviewSession;

/// Dimension average at or above this reads as a strength.
const STRENGTH_THRESHOLD: f64 = 7.0;
/// Dimension average below this reads as a gap.
const GAP_THRESHOLD: f64 = 5.0;

/// Per-question line item in the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionSummary {
    pub question: String,
    pub blended_score: f64,
    pub feedback: String,
}

/// Aggregated outcome of a completed interview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalReport {
    pub session_id: SessionId,
    pub candidate_name: String,
    pub topic: String,
    pub target_role: Option<String>,
    pub questions_answered: u32,
    /// Mean blended score across all answers, 0..=10.
    pub overall_score: f64,
    /// Mean score per dimension across all answers.
    pub dimension_averages: BTreeMap<Dimension, f64>,
    pub strengths: Vec<String>,
    pub gaps: Vec<String>,
    pub questions: Vec<QuestionSummary>,
}

impl FinalReport {
    /// Builds the report from a session's recorded history.
    pub fn from_session(session: &InterviewSession) -> Self {
        let overall_score = mean(&session.performance_history);

        let mut sums: BTreeMap<Dimension, (f64, usize)> = BTreeMap::new();
        for exchange in &session.qa_history {
            for (dim, score) in &exchange.evaluation.dimension_scores {
                let entry = sums.entry(*dim).or_insert((0.0, 0));
                entry.0 += score;
                entry.1 += 1;
            }
        }
        let dimension_averages: BTreeMap<Dimension, f64> = sums
            .into_iter()
            .map(|(dim, (sum, count))| (dim, sum / count as f64))
            .collect();

        let strengths = dimension_averages
            .iter()
            .filter(|(_, avg)| **avg >= STRENGTH_THRESHOLD)
            .map(|(dim, _)| format!("consistent strength in {}", dim.label()))
            .collect();
        let gaps = dimension_averages
            .iter()
            .filter(|(_, avg)| **avg < GAP_THRESHOLD)
            .map(|(dim, _)| format!("needs development in {}", dim.label()))
            .collect();

        let questions = session
            .qa_history
            .iter()
            .map(|ex| QuestionSummary {
                question: ex.question.clone(),
                blended_score: ex.evaluation.blended_score,
                feedback: ex.evaluation.feedback.clone(),
            })
            .collect();

        Self {
            session_id: session.session_id,
            candidate_name: session.candidate_name.clone(),
            topic: session.topic().to_string(),
            target_role: session.profile.target_role.clone(),
            questions_answered: session.qa_history.len() as u32,
            overall_score,
            dimension_averages,
            strengths,
            gaps,
            questions,
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::evaluation::{EvaluationResult, TopicProfile};
    use crate::domain::interview::Difficulty;

    fn evaluation(blended: f64, tech: f64, comm: f64) -> EvaluationResult {
        let mut dims = BTreeMap::new();
        dims.insert(Dimension::TechnicalAccuracy, tech);
        dims.insert(Dimension::Communication, comm);
        EvaluationResult {
            heuristic_score: blended,
            semantic_score: 0.9,
            model_score: Some(blended),
            blended_score: blended,
            dimension_scores: dims,
            feedback: format!("scored {}", blended),
            critique_applied: true,
        }
    }

    fn completed_session() -> InterviewSession {
        let mut session = InterviewSession::new(
            "Ana",
            TopicProfile::derive("algorithms", None),
            2,
            Difficulty::Medium,
        );
        session.ask_question("Q1".to_string());
        session.record_exchange("Q1".to_string(), "A1".to_string(), evaluation(8.0, 9.0, 8.0));
        session.ask_question("Q2".to_string());
        session.record_exchange("Q2".to_string(), "A2".to_string(), evaluation(6.0, 7.0, 4.0));
        session.complete();
        session
    }

    #[test]
    fn overall_score_is_mean_of_blended_scores() {
        let report = FinalReport::from_session(&completed_session());
        assert!((report.overall_score - 7.0).abs() < 1e-9);
        assert_eq!(report.questions_answered, 2);
    }

    #[test]
    fn dimension_averages_cover_all_scored_dimensions() {
        let report = FinalReport::from_session(&completed_session());
        assert!((report.dimension_averages[&Dimension::TechnicalAccuracy] - 8.0).abs() < 1e-9);
        assert!((report.dimension_averages[&Dimension::Communication] - 6.0).abs() < 1e-9);
    }

    #[test]
    fn strengths_and_gaps_derive_from_dimension_averages() {
        let report = FinalReport::from_session(&completed_session());
        // Technical accuracy averages 8.0, a strength; communication
        // averages 6.0, neither strength nor gap.
        assert_eq!(
            report.strengths,
            vec!["consistent strength in technical accuracy".to_string()]
        );
        assert!(report.gaps.is_empty());
    }

    #[test]
    fn weak_dimension_shows_as_gap() {
        let mut session = InterviewSession::new(
            "Ben",
            TopicProfile::derive("databases", None),
            1,
            Difficulty::Medium,
        );
        session.ask_question("Q1".to_string());
        session.record_exchange("Q1".to_string(), "A1".to_string(), evaluation(3.0, 3.0, 2.0));
        session.complete();

        let report = FinalReport::from_session(&session);
        assert_eq!(report.strengths.len(), 0);
        assert_eq!(report.gaps.len(), 2);
    }

    #[test]
    fn question_summaries_preserve_order_and_feedback() {
        let report = FinalReport::from_session(&completed_session());
        assert_eq!(report.questions.len(), 2);
        assert_eq!(report.questions[0].question, "Q1");
        assert_eq!(report.questions[1].question, "Q2");
        assert_eq!(report.questions[1].feedback, "scored 6");
    }

    #[test]
    fn report_serializes_to_json() {
        let report = FinalReport::from_session(&completed_session());
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"overall_score\""));
        assert!(json.contains("technical_accuracy"));
    }
}
