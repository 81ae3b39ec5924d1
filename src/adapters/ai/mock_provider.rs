//! Mock AI Provider for testing.
//!
//! Configurable to return scripted responses, simulate delays, or inject
//! errors, so tests run without calling real model APIs.
//!
//! # Example
//!
//! ```ignore
//! let provider = MockAiProvider::new()
//!     .with_response("What is big-o notation?")
//!     .with_delay(Duration::from_millis(50));
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{
    AiError, AiProvider, CompletionRequest, CompletionResponse, FinishReason, ProviderInfo,
    TokenUsage,
};

/// Mock AI provider with a scripted response queue.
#[derive(Debug, Clone)]
pub struct MockAiProvider {
    /// Pre-configured responses (consumed in order).
    responses: Arc<Mutex<VecDeque<MockReply>>>,
    /// Provider info to return.
    info: ProviderInfo,
    /// Simulated latency per request.
    delay: Duration,
    /// Call history for verification.
    calls: Arc<Mutex<Vec<CompletionRequest>>>,
    /// Response served when the queue is empty.
    default_response: Option<String>,
}

/// A configured mock reply.
#[derive(Debug, Clone)]
enum MockReply {
    Success(String),
    Failure(MockFailure),
}

/// Mock error types for testing error handling.
#[derive(Debug, Clone)]
pub enum MockFailure {
    /// Simulate rate limiting.
    RateLimited { retry_after_secs: u32 },
    /// Simulate provider unavailable.
    Unavailable { message: String },
    /// Simulate authentication failure.
    AuthenticationFailed,
    /// Simulate network error.
    Network { message: String },
    /// Simulate timeout.
    Timeout { timeout_secs: u32 },
}

impl From<MockFailure> for AiError {
    fn from(err: MockFailure) -> Self {
        match err {
            MockFailure::RateLimited { retry_after_secs } => AiError::rate_limited(retry_after_secs),
            MockFailure::Unavailable { message } => AiError::unavailable(message),
            MockFailure::AuthenticationFailed => AiError::AuthenticationFailed,
            MockFailure::Network { message } => AiError::network(message),
            MockFailure::Timeout { timeout_secs } => AiError::Timeout { timeout_secs },
        }
    }
}

impl Default for MockAiProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAiProvider {
    /// Creates a new mock provider with default settings.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            info: ProviderInfo::new("mock", "mock-model-1"),
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
            default_response: None,
        }
    }

    /// Adds a successful response to the queue.
    pub fn with_response(self, content: impl Into<String>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(MockReply::Success(content.into()));
        self
    }

    /// Adds an error response to the queue.
    pub fn with_failure(self, failure: MockFailure) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(MockReply::Failure(failure));
        self
    }

    /// Serves `content` whenever the scripted queue runs out.
    pub fn with_default_response(mut self, content: impl Into<String>) -> Self {
        self.default_response = Some(content.into());
        self
    }

    /// Sets simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Returns the number of calls made to this provider.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Returns all recorded calls.
    pub fn get_calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().unwrap().clone()
    }

    /// Gets the next scripted reply, or the default response.
    fn next_reply(&self) -> Result<String, AiError> {
        let scripted = self.responses.lock().unwrap().pop_front();
        match scripted {
            Some(MockReply::Success(content)) => Ok(content),
            Some(MockReply::Failure(failure)) => Err(failure.into()),
            None => match &self.default_response {
                Some(content) => Ok(content.clone()),
                None => Err(AiError::unavailable("mock response queue exhausted")),
            },
        }
    }
}

#[async_trait]
impl AiProvider for MockAiProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AiError> {
        self.calls.lock().unwrap().push(request);

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        let content = self.next_reply()?;
        Ok(CompletionResponse {
            usage: TokenUsage::new(10, content.len() as u32 / 4),
            content,
            model: self.info.model.clone(),
            finish_reason: FinishReason::Stop,
        })
    }

    fn provider_info(&self) -> ProviderInfo {
        self.info.clone()
    }
}
