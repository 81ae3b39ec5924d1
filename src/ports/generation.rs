//! Text Generator Port - the generation capability the domain consumes.
//!
//! Sits one level above [`AiProvider`](super::AiProvider): implementations
//! own retries, timeouts, and cache consultation, so domain callers see a
//! single "generate text, maybe cached" capability. The structured variant
//! extracts and parses a JSON object from the completion, surfacing parse
//! failures distinctly so callers can retry with a stricter prompt.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use super::{AiError, CompletionRequest};

/// Port for cached, retried text generation.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate text for the request.
    ///
    /// When `cache_key` is given, implementations may serve a cached result
    /// and should populate the cache on success.
    async fn generate(
        &self,
        request: CompletionRequest,
        cache_key: Option<String>,
    ) -> Result<String, AiError>;
}

/// Errors from structured generation: provider failures stay distinct from
/// unparseable output, because only the latter warrants a reworded prompt.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error(transparent)]
    Provider(#[from] AiError),

    #[error("structured response parse failed: {0}")]
    Parse(String),
}

/// Structured generation on top of any [`TextGenerator`].
#[async_trait]
pub trait TextGeneratorExt: TextGenerator {
    /// Generate a JSON object and deserialize it, tolerating markdown
    /// code fences around the payload.
    async fn generate_structured<T>(
        &self,
        request: CompletionRequest,
        cache_key: Option<String>,
    ) -> Result<T, GenerationError>
    where
        T: DeserializeOwned + Send;
}

#[async_trait]
impl<G: TextGenerator + ?Sized> TextGeneratorExt for G {
    async fn generate_structured<T>(
        &self,
        request: CompletionRequest,
        cache_key: Option<String>,
    ) -> Result<T, GenerationError>
    where
        T: DeserializeOwned + Send,
    {
        let raw = self.generate(request, cache_key).await?;
        let json = strip_code_fences(&raw);
        serde_json::from_str(json).map_err(|e| GenerationError::Parse(e.to_string()))
    }
}

/// Strips a leading/trailing markdown code fence from model output.
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop an optional language tag on the opening fence.
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.trim_start_matches(['\r', '\n']);
    rest.strip_suffix("```").map(str::trim).unwrap_or(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::GenerationPurpose;
    use serde::Deserialize;
    use std::sync::Mutex;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Payload {
        value: u32,
    }

    /// Generator returning one canned reply, or a provider error when none
    /// is configured.
    struct OneShot {
        reply: Mutex<Option<String>>,
    }

    impl OneShot {
        fn with(reply: &str) -> Self {
            Self {
                reply: Mutex::new(Some(reply.to_string())),
            }
        }

        fn failing() -> Self {
            Self {
                reply: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl TextGenerator for OneShot {
        async fn generate(
            &self,
            _request: CompletionRequest,
            _cache_key: Option<String>,
        ) -> Result<String, AiError> {
            self.reply
                .lock()
                .unwrap()
                .take()
                .ok_or_else(|| AiError::unavailable("no reply configured"))
        }
    }

    fn request() -> CompletionRequest {
        CompletionRequest::new(GenerationPurpose::Rubric).with_json_mode()
    }

    #[tokio::test]
    async fn structured_parses_plain_json() {
        let generator = OneShot::with(r#"{"value": 7}"#);
        let payload: Payload = generator.generate_structured(request(), None).await.unwrap();
        assert_eq!(payload, Payload { value: 7 });
    }

    #[tokio::test]
    async fn structured_parses_fenced_json() {
        let generator = OneShot::with("```json\n{\"value\": 7}\n```");
        let payload: Payload = generator.generate_structured(request(), None).await.unwrap();
        assert_eq!(payload.value, 7);
    }

    #[tokio::test]
    async fn prose_surfaces_a_parse_error() {
        let generator = OneShot::with("seven out of ten");
        let result: Result<Payload, _> = generator.generate_structured(request(), None).await;
        assert!(matches!(result, Err(GenerationError::Parse(_))));
    }

    #[tokio::test]
    async fn provider_failures_stay_distinct_from_parse_failures() {
        let generator = OneShot::failing();
        let result: Result<Payload, _> = generator.generate_structured(request(), None).await;
        assert!(matches!(result, Err(GenerationError::Provider(_))));
    }

    #[tokio::test]
    async fn works_through_a_trait_object() {
        let generator: Box<dyn TextGenerator> = Box::new(OneShot::with(r#"{"value": 3}"#));
        let payload: Payload = generator.generate_structured(request(), None).await.unwrap();
        assert_eq!(payload.value, 3);
    }

    #[test]
    fn strip_code_fences_handles_all_shapes() {
        assert_eq!(strip_code_fences("{\"a\":1}"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("  {\"a\":1}  "), "{\"a\":1}");
    }
}
