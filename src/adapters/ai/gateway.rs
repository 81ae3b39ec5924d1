//! Generation Gateway - retries, backoff, and cache consultation.
//!
//! Wraps an [`AiProvider`] so domain callers see one capability: generate
//! text, maybe served from cache. Retryable provider errors (rate limit,
//! unavailable, network, timeout) are retried with exponential backoff;
//! everything else fails fast for the caller to degrade on. Structured
//! generation comes with the [`TextGeneratorExt`](crate::ports::TextGeneratorExt)
//! blanket impl: JSON is extracted and parsed on top of `generate`, with
//! parse failures kept distinct from provider failures.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::ports::{AiError, AiProvider, CacheTier, CompletionRequest, TextGenerator};

/// Caching, retrying wrapper around an AI provider.
pub struct GenerationGateway {
    provider: Arc<dyn AiProvider>,
    cache: Option<Arc<dyn CacheTier>>,
    /// Retries after the first attempt.
    max_retries: u32,
    /// Base backoff delay, doubled per retry.
    backoff: Duration,
}

impl GenerationGateway {
    pub fn new(provider: Arc<dyn AiProvider>) -> Self {
        Self {
            provider,
            cache: None,
            max_retries: 2,
            backoff: Duration::from_millis(250),
        }
    }

    /// Consults and populates this cache around provider calls.
    pub fn with_cache(mut self, cache: Arc<dyn CacheTier>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Overrides the retry count.
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Overrides the base backoff delay.
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    async fn complete_with_retry(
        &self,
        request: CompletionRequest,
    ) -> Result<String, AiError> {
        let mut attempt = 0;
        loop {
            match self.provider.complete(request.clone()).await {
                Ok(response) => return Ok(response.content),
                Err(err) if err.is_retryable() && attempt < self.max_retries => {
                    let delay = self.backoff * 2u32.pow(attempt);
                    warn!(
                        purpose = %request.purpose,
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "generation attempt failed, backing off"
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[async_trait]
impl TextGenerator for GenerationGateway {
    async fn generate(
        &self,
        request: CompletionRequest,
        cache_key: Option<String>,
    ) -> Result<String, AiError> {
        if let (Some(cache), Some(key)) = (self.cache.as_ref(), cache_key.as_ref()) {
            if let Some(cached) = cache.get(key).await {
                debug!(purpose = %request.purpose, "generation served from cache");
                return Ok(cached);
            }
        }

        let content = self.complete_with_retry(request).await?;

        if let (Some(cache), Some(key)) = (self.cache.as_ref(), cache_key) {
            cache.put(&key, content.clone()).await;
        }

        Ok(content)
    }
}
