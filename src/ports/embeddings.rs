//! Embedding Provider Port - Interface for text embedding backends.
//!
//! Used only by semantic scoring: embed two texts, compare by cosine
//! similarity. Implementations may call a hosted API or compute locally.

use async_trait::async_trait;

/// Port for text embedding.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a text into a dense vector.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;
}

/// Embedding provider errors.
#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    /// Input was empty after trimming.
    #[error("cannot embed empty text")]
    EmptyInput,

    /// Backend is unavailable.
    #[error("embedding backend unavailable: {0}")]
    Unavailable(String),

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse backend response.
    #[error("parse error: {0}")]
    Parse(String),
}
