//! Semantic answer scoring via embedding cosine similarity.
//!
//! Flags off-topic answers: the similarity between the answer and the
//! question/topic context is the engine's hard-ceiling signal, not just
//! another weighted input.

use std::sync::Arc;

use crate::ports::{EmbeddingError, EmbeddingProvider};

use super::TopicProfile;

/// Scores an answer's topical relevance in 0..=1.
#[derive(Clone)]
pub struct SemanticScorer {
    embedder: Arc<dyn EmbeddingProvider>,
}

impl SemanticScorer {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self { embedder }
    }

    /// Cosine similarity between the answer and the question/topic context,
    /// clamped to 0..=1 (negative similarity reads as fully off-topic).
    pub async fn score(
        &self,
        question: &str,
        profile: &TopicProfile,
        answer: &str,
    ) -> Result<f64, EmbeddingError> {
        let context = format!("{} {}", question, profile.topic);

        let (answer_vec, context_vec) =
            futures::try_join!(self.embedder.embed(answer), self.embedder.embed(&context))?;

        Ok(cosine_similarity(&answer_vec, &context_vec).clamp(0.0, 1.0))
    }
}

/// Cosine similarity between two vectors. Zero for mismatched lengths or
/// zero-norm inputs.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += (*x as f64) * (*y as f64);
        norm_a += (*x as f64) * (*x as f64);
        norm_b += (*y as f64) * (*y as f64);
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a.sqrt() * norm_b.sqrt())
}
