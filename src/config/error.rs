//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Blend weights must be non-negative and sum to 1.0")]
    InvalidBlendWeights,

    #[error("Semantic threshold must be within 0.0..=1.0")]
    InvalidSemanticThreshold,

    #[error("Off-topic ceiling must be within 0.0..=10.0")]
    InvalidOfftopicCeiling,

    #[error("Difficulty step-down threshold must be below the step-up threshold")]
    InvalidDifficultyThresholds,

    #[error("Difficulty window must be at least 1")]
    InvalidDifficultyWindow,

    #[error("TTL values must be greater than zero")]
    InvalidTtl,

    #[error("Cache capacity must be at least 1")]
    InvalidCacheCapacity,

    #[error("Invalid Redis URL format")]
    InvalidRedisUrl,
}
