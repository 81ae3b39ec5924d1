//! Interview engine tuning configuration
//!
//! The scoring weights and thresholds here are product-tuning defaults,
//! deliberately configurable rather than hard-coded.

use serde::Deserialize;
use std::time::Duration;

use crate::domain::evaluation::BlendWeights;
use crate::domain::interview::DifficultyAdapter;

use super::error::ValidationError;

/// Interview engine configuration
#[derive(Debug, Clone, Deserialize)]
pub struct InterviewConfig {
    /// Weight of the model rubric score in the blend
    #[serde(default = "default_model_weight")]
    pub model_weight: f64,

    /// Weight of the heuristic score in the blend
    #[serde(default = "default_heuristic_weight")]
    pub heuristic_weight: f64,

    /// Semantic similarity below this flags an answer as off-topic
    #[serde(default = "default_semantic_threshold")]
    pub semantic_threshold: f64,

    /// Hard ceiling applied to off-topic answers
    #[serde(default = "default_offtopic_ceiling")]
    pub offtopic_ceiling: f64,

    /// Trailing mean at or above this steps difficulty up
    #[serde(default = "default_step_up")]
    pub step_up_threshold: f64,

    /// Trailing mean below this steps difficulty down
    #[serde(default = "default_step_down")]
    pub step_down_threshold: f64,

    /// Scores covered by the trailing mean
    #[serde(default = "default_window")]
    pub difficulty_window: usize,

    /// Inactivity TTL for in-progress sessions, seconds
    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: u64,

    /// Retention for completed sessions, seconds
    #[serde(default = "default_completed_retention")]
    pub completed_retention_secs: u64,

    /// Background expiration sweep interval, seconds
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,

    /// Bounded attempts at generating a non-duplicate question
    #[serde(default = "default_question_attempts")]
    pub question_attempts: u32,
}

impl InterviewConfig {
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    pub fn completed_retention(&self) -> Duration {
        Duration::from_secs(self.completed_retention_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    /// Blend weights for the evaluation engine
    pub fn blend_weights(&self) -> BlendWeights {
        BlendWeights {
            model: self.model_weight,
            heuristic: self.heuristic_weight,
        }
    }

    /// Difficulty adaptation rule
    pub fn difficulty_adapter(&self) -> DifficultyAdapter {
        DifficultyAdapter::new(
            self.step_up_threshold,
            self.step_down_threshold,
            self.difficulty_window,
        )
    }

    /// Validate interview configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let weight_sum = self.model_weight + self.heuristic_weight;
        if self.model_weight < 0.0
            || self.heuristic_weight < 0.0
            || (weight_sum - 1.0).abs() > 1e-6
        {
            return Err(ValidationError::InvalidBlendWeights);
        }
        if !(0.0..=1.0).contains(&self.semantic_threshold) {
            return Err(ValidationError::InvalidSemanticThreshold);
        }
        if !(0.0..=10.0).contains(&self.offtopic_ceiling) {
            return Err(ValidationError::InvalidOfftopicCeiling);
        }
        if self.step_down_threshold >= self.step_up_threshold {
            return Err(ValidationError::InvalidDifficultyThresholds);
        }
        if self.difficulty_window == 0 {
            return Err(ValidationError::InvalidDifficultyWindow);
        }
        if self.session_ttl_secs == 0
            || self.completed_retention_secs == 0
            || self.sweep_interval_secs == 0
        {
            return Err(ValidationError::InvalidTtl);
        }
        Ok(())
    }
}

impl Default for InterviewConfig {
    fn default() -> Self {
        Self {
            model_weight: default_model_weight(),
            heuristic_weight: default_heuristic_weight(),
            semantic_threshold: default_semantic_threshold(),
            offtopic_ceiling: default_offtopic_ceiling(),
            step_up_threshold: default_step_up(),
            step_down_threshold: default_step_down(),
            difficulty_window: default_window(),
            session_ttl_secs: default_session_ttl(),
            completed_retention_secs: default_completed_retention(),
            sweep_interval_secs: default_sweep_interval(),
            question_attempts: default_question_attempts(),
        }
    }
}

fn default_model_weight() -> f64 {
    0.6
}

fn default_heuristic_weight() -> f64 {
    0.4
}

fn default_semantic_threshold() -> f64 {
    0.25
}

fn default_offtopic_ceiling() -> f64 {
    3.0
}

fn default_step_up() -> f64 {
    7.0
}

fn default_step_down() -> f64 {
    4.0
}

fn default_window() -> usize {
    3
}

fn default_session_ttl() -> u64 {
    3600
}

fn default_completed_retention() -> u64 {
    86400
}

fn default_sweep_interval() -> u64 {
    300
}

fn default_question_attempts() -> u32 {
    3
}
