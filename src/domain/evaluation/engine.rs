//! Evaluation Engine - blends heuristic, semantic, and rubric signals.
//!
//! The pipeline never fails a turn: every upstream failure degrades to a
//! weaker signal combination, and the result records what was available.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::ports::{
    fingerprint, CacheTier, CompletionRequest, EmbeddingProvider, GenerationError, TextGenerator,
    TextGeneratorExt,
};

use super::rubric::{critic_request, rubric_request};
use super::{
    CriticVerdict, Dimension, EvaluationResult, HeuristicScorer, RubricRating, SemanticScorer,
    TopicProfile,
};

/// Semantic score recorded when the embedding backend is unavailable.
/// Sits above the off-topic threshold so a missing signal never caps a score.
const NEUTRAL_SEMANTIC: f64 = 0.5;

/// Relative weights of the model and heuristic signals in the blend.
#[derive(Debug, Clone, Copy)]
pub struct BlendWeights {
    pub model: f64,
    pub heuristic: f64,
}

impl Default for BlendWeights {
    fn default() -> Self {
        Self {
            model: 0.6,
            heuristic: 0.4,
        }
    }
}

/// Scores one answer across all signals.
pub struct EvaluationEngine {
    generator: Arc<dyn TextGenerator>,
    heuristic: HeuristicScorer,
    semantic: SemanticScorer,
    cache: Option<Arc<dyn CacheTier>>,
    weights: BlendWeights,
    semantic_threshold: f64,
    offtopic_ceiling: f64,
}

impl EvaluationEngine {
    pub fn new(generator: Arc<dyn TextGenerator>, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            generator,
            heuristic: HeuristicScorer::new(),
            semantic: SemanticScorer::new(embedder),
            cache: None,
            weights: BlendWeights::default(),
            semantic_threshold: 0.25,
            offtopic_ceiling: 3.0,
        }
    }

    /// Caches full evaluation results keyed by question and answer.
    pub fn with_cache(mut self, cache: Arc<dyn CacheTier>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Overrides the blend weights.
    pub fn with_weights(mut self, weights: BlendWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Overrides the off-topic threshold and ceiling.
    pub fn with_offtopic_policy(mut self, threshold: f64, ceiling: f64) -> Self {
        self.semantic_threshold = threshold;
        self.offtopic_ceiling = ceiling;
        self
    }

    /// Evaluates one answer. Never fails; upstream errors degrade the result.
    pub async fn evaluate(
        &self,
        question: &str,
        answer: &str,
        profile: &TopicProfile,
    ) -> EvaluationResult {
        let cache_key = fingerprint(&["evaluation", question, answer]);
        if let Some(cached) = self.cached_result(&cache_key).await {
            return cached;
        }

        let heuristic_score = self.heuristic.score(answer, profile);

        let semantic_score = match self.semantic.score(question, profile, answer).await {
            Ok(score) => score,
            Err(err) => {
                warn!(error = %err, "semantic scoring unavailable, using neutral score");
                NEUTRAL_SEMANTIC
            }
        };

        let dimensions = profile.dimensions();
        let (rating, critique_applied) = self.rubric_pass(question, answer, &dimensions).await;

        let result = match rating {
            Some(rating) => {
                let model_score = rating.model_score();
                EvaluationResult {
                    heuristic_score,
                    semantic_score,
                    model_score: Some(model_score),
                    blended_score: self.blend(Some(model_score), heuristic_score, semantic_score),
                    dimension_scores: rating.rescaled(),
                    feedback: rating.feedback,
                    critique_applied,
                }
            }
            None => {
                warn!("rubric scoring degraded, falling back to heuristic-only evaluation");
                let dimension_scores: BTreeMap<Dimension, f64> = dimensions
                    .iter()
                    .map(|dim| (*dim, heuristic_score))
                    .collect();
                EvaluationResult {
                    heuristic_score,
                    semantic_score,
                    model_score: None,
                    blended_score: self.blend(None, heuristic_score, semantic_score),
                    dimension_scores,
                    feedback: "Automated rubric scoring was unavailable for this answer; \
                               the score reflects structural signals only."
                        .to_string(),
                    critique_applied: false,
                }
            }
        };

        self.store_result(&cache_key, &result).await;
        result
    }

    /// Runs the rubric call, the critic review, and at most one re-rating.
    ///
    /// Returns the rating (None when fully degraded) and whether the critic
    /// pass completed.
    async fn rubric_pass(
        &self,
        question: &str,
        answer: &str,
        dimensions: &[Dimension],
    ) -> (Option<RubricRating>, bool) {
        let Some(rating) = self.request_rating(question, answer, dimensions).await else {
            return (None, false);
        };

        let critic = critic_request(question, answer, &rating);
        let verdict: CriticVerdict = match self.generator.generate_structured(critic, None).await {
            Ok(verdict) => verdict,
            Err(err) => {
                warn!(error = %err, "critic pass failed, keeping original rating");
                return (Some(rating), false);
            }
        };

        if verdict.consistent {
            return (Some(rating), true);
        }

        debug!(reason = ?verdict.reason, "critic flagged rating, re-scoring once");
        match self.request_rating(question, answer, dimensions).await {
            Some(revised) => (Some(revised), true),
            None => (Some(rating), true),
        }
    }

    /// One rubric call with a single stricter-format retry when the output
    /// parses badly or breaks the rubric's rules. Provider failures do not
    /// retry here; the gateway has already backed off and retried those.
    async fn request_rating(
        &self,
        question: &str,
        answer: &str,
        dimensions: &[Dimension],
    ) -> Option<RubricRating> {
        let request = rubric_request(question, answer, dimensions, false);
        match self.try_rating(request, dimensions).await {
            Ok(rating) => Some(rating),
            Err(GenerationError::Provider(err)) => {
                warn!(error = %err, "rubric generation failed");
                None
            }
            Err(err) => {
                debug!(error = %err, "rubric output malformed, retrying with strict format");
                let strict = rubric_request(question, answer, dimensions, true);
                match self.try_rating(strict, dimensions).await {
                    Ok(rating) => Some(rating),
                    Err(err) => {
                        warn!(error = %err, "rubric output malformed after strict retry");
                        None
                    }
                }
            }
        }
    }

    /// One structured rubric call plus domain validation of the rating.
    async fn try_rating(
        &self,
        request: CompletionRequest,
        dimensions: &[Dimension],
    ) -> Result<RubricRating, GenerationError> {
        let rating: RubricRating = self.generator.generate_structured(request, None).await?;
        rating
            .validate(dimensions)
            .map_err(|e| GenerationError::Parse(e.to_string()))?;
        Ok(rating)
    }

    /// Weighted blend with the off-topic hard ceiling.
    fn blend(&self, model: Option<f64>, heuristic: f64, semantic: f64) -> f64 {
        let combined = match model {
            Some(model) => self.weights.model * model + self.weights.heuristic * heuristic,
            None => heuristic,
        };

        let ceiling = if semantic < self.semantic_threshold {
            self.offtopic_ceiling
        } else {
            10.0
        };

        combined.clamp(0.0, ceiling)
    }

    async fn cached_result(&self, key: &str) -> Option<EvaluationResult> {
        let cache = self.cache.as_ref()?;
        let raw = cache.get(key).await?;
        match serde_json::from_str(&raw) {
            Ok(result) => {
                debug!("evaluation served from cache");
                Some(result)
            }
            Err(err) => {
                warn!(error = %err, "discarding unparseable cached evaluation");
                None
            }
        }
    }

    async fn store_result(&self, key: &str, result: &EvaluationResult) {
        let Some(cache) = self.cache.as_ref() else {
            return;
        };
        match serde_json::to_string(result) {
            Ok(raw) => cache.put(key, raw).await,
            Err(err) => warn!(error = %err, "failed to serialize evaluation for cache"),
        }
    }
}
