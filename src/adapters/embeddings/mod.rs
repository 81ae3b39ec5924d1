//! Embedding provider adapters.
//!
//! `HashEmbeddingProvider` is a deterministic local embedder good enough
//! for development and single-process deployments: shared vocabulary maps
//! to shared buckets, so cosine similarity tracks word overlap. The mock
//! provider is for tests that need exact control over vectors.

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::ports::{EmbeddingError, EmbeddingProvider};

/// Dimensionality of the hashed bag-of-words vectors.
const HASH_DIM: usize = 64;

/// Deterministic bag-of-words embedder.
#[derive(Debug, Clone, Copy, Default)]
pub struct HashEmbeddingProvider;

impl HashEmbeddingProvider {
    pub fn new() -> Self {
        Self
    }

    /// Embeds text as an L2-normalized word-bucket histogram.
    pub fn hashed_vector(text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; HASH_DIM];
        for word in text.to_lowercase().split_whitespace() {
            let word = word.trim_matches(|c: char| !c.is_alphanumeric());
            if word.is_empty() {
                continue;
            }
            let digest = Sha256::digest(word.as_bytes());
            let bucket = u16::from_be_bytes([digest[0], digest[1]]) as usize % HASH_DIM;
            vector[bucket] += 1.0;
        }

        let norm: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        vector
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::EmptyInput);
        }
        Ok(Self::hashed_vector(text))
    }
}

/// Mock embedder with scripted vectors for tests.
#[derive(Debug, Clone, Default)]
pub struct MockEmbeddingProvider {
    /// Substring-matched vectors, checked in insertion order.
    vectors: Vec<(String, Vec<f32>)>,
    /// Vector returned when no substring matches.
    default_vector: Option<Vec<f32>>,
    /// When set, every call fails.
    fail: bool,
}

impl MockEmbeddingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `vector` for any text containing `substring`.
    pub fn with_vector(mut self, substring: impl Into<String>, vector: Vec<f32>) -> Self {
        self.vectors.push((substring.into(), vector));
        self
    }

    /// Sets the vector returned when no substring matches.
    pub fn with_default_vector(mut self, vector: Vec<f32>) -> Self {
        self.default_vector = Some(vector);
        self
    }

    /// Makes every call fail with an unavailable error.
    pub fn with_failure(mut self) -> Self {
        self.fail = true;
        self
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if self.fail {
            return Err(EmbeddingError::Unavailable("mock failure".to_string()));
        }
        if text.trim().is_empty() {
            return Err(EmbeddingError::EmptyInput);
        }

        for (substring, vector) in &self.vectors {
            if text.contains(substring.as_str()) {
                return Ok(vector.clone());
            }
        }

        Ok(self
            .default_vector
            .clone()
            .unwrap_or_else(|| HashEmbeddingProvider::hashed_vector(text)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::evaluation::cosine_similarity;

    #[tokio::test]
    async fn hash_embedder_is_deterministic() {
        let embedder = HashEmbeddingProvider::new();
        let a = embedder.embed("graph traversal complexity").await.unwrap();
        let b = embedder.embed("graph traversal complexity").await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn hash_embedder_rejects_empty_input() {
        let embedder = HashEmbeddingProvider::new();
        assert!(matches!(
            embedder.embed("   ").await,
            Err(EmbeddingError::EmptyInput)
        ));
    }

    #[tokio::test]
    async fn overlapping_vocabulary_scores_higher_than_disjoint() {
        let embedder = HashEmbeddingProvider::new();
        let base = embedder
            .embed("sorting algorithms use comparison and complexity analysis")
            .await
            .unwrap();
        let related = embedder
            .embed("complexity analysis of sorting algorithms")
            .await
            .unwrap();
        let unrelated = embedder
            .embed("my cat enjoys sleeping on warm windowsills")
            .await
            .unwrap();

        let related_sim = cosine_similarity(&base, &related);
        let unrelated_sim = cosine_similarity(&base, &unrelated);
        assert!(related_sim > unrelated_sim);
        assert!(related_sim > 0.5);
    }

    #[tokio::test]
    async fn hash_vectors_are_normalized() {
        let v = HashEmbeddingProvider::hashed_vector("a few words here");
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn mock_matches_substrings_in_order() {
        let mock = MockEmbeddingProvider::new()
            .with_vector("pasta", vec![0.0, 1.0])
            .with_default_vector(vec![1.0, 0.0]);

        assert_eq!(mock.embed("I like pasta").await.unwrap(), vec![0.0, 1.0]);
        assert_eq!(mock.embed("something else").await.unwrap(), vec![1.0, 0.0]);
    }

    #[tokio::test]
    async fn mock_failure_mode_errors() {
        let mock = MockEmbeddingProvider::new().with_failure();
        assert!(mock.embed("anything").await.is_err());
    }

    #[tokio::test]
    async fn mock_without_default_falls_back_to_hashing() {
        let mock = MockEmbeddingProvider::new();
        let v = mock.embed("graph traversal").await.unwrap();
        assert_eq!(v, HashEmbeddingProvider::hashed_vector("graph traversal"));
    }
}
