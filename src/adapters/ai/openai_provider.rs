//! OpenAI-compatible provider for completions and embeddings.
//!
//! Works against any endpoint speaking the OpenAI chat completions and
//! embeddings APIs.
//!
//! # Configuration
//!
//! ```ignore
//! let config = OpenAiConfig::new(api_key)
//!     .with_model("gpt-4o-mini")
//!     .with_base_url("https://api.openai.com/v1");
//!
//! let provider = OpenAiProvider::new(config);
//! ```

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ports::{
    AiError, AiProvider, CompletionRequest, CompletionResponse, EmbeddingError,
    EmbeddingProvider, FinishReason, MessageRole, ProviderInfo, TokenUsage,
};

/// Configuration for the OpenAI provider.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Chat model to use.
    pub model: String,
    /// Embedding model to use.
    pub embed_model: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl OpenAiConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "gpt-4o-mini".to_string(),
            embed_model: "text-embedding-3-small".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout: Duration::from_secs(60),
        }
    }

    /// Sets the chat model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the embedding model.
    pub fn with_embed_model(mut self, model: impl Into<String>) -> Self {
        self.embed_model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// OpenAI API provider implementation.
pub struct OpenAiProvider {
    config: OpenAiConfig,
    client: Client,
}

impl OpenAiProvider {
    /// Creates a new provider with the given configuration.
    pub fn new(config: OpenAiConfig) -> Result<Self, AiError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AiError::InvalidRequest(format!("http client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    fn embeddings_url(&self) -> String {
        format!("{}/embeddings", self.config.base_url)
    }

    /// Converts a domain request to the wire format.
    fn to_wire_request(&self, request: &CompletionRequest) -> WireChatRequest {
        let mut messages = Vec::new();

        if let Some(ref prompt) = request.system_prompt {
            messages.push(WireMessage {
                role: "system".to_string(),
                content: prompt.clone(),
            });
        }

        for msg in &request.messages {
            messages.push(WireMessage {
                role: match msg.role {
                    MessageRole::System => "system",
                    MessageRole::User => "user",
                    MessageRole::Assistant => "assistant",
                }
                .to_string(),
                content: msg.content.clone(),
            });
        }

        WireChatRequest {
            model: self.config.model.clone(),
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            response_format: request.json_mode.then(|| WireResponseFormat {
                format_type: "json_object".to_string(),
            }),
        }
    }

    async fn post_json<B: Serialize>(&self, url: String, body: &B) -> Result<Response, AiError> {
        self.client
            .post(url)
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AiError::Timeout {
                        timeout_secs: self.config.timeout.as_secs() as u32,
                    }
                } else if e.is_connect() {
                    AiError::network(format!("connection failed: {}", e))
                } else {
                    AiError::network(e.to_string())
                }
            })
    }

    /// Maps error statuses to provider errors.
    async fn check_status(response: Response) -> Result<Response, AiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();
        match status.as_u16() {
            401 => Err(AiError::AuthenticationFailed),
            429 => Err(AiError::rate_limited(30)),
            400 => Err(AiError::InvalidRequest(error_body)),
            500..=599 => Err(AiError::unavailable(format!(
                "server error {}: {}",
                status, error_body
            ))),
            _ => Err(AiError::network(format!(
                "unexpected status {}: {}",
                status, error_body
            ))),
        }
    }
}

#[async_trait]
impl AiProvider for OpenAiProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AiError> {
        let wire = self.to_wire_request(&request);
        let response = self.post_json(self.completions_url(), &wire).await?;
        let response = Self::check_status(response).await?;

        let body: WireChatResponse = response
            .json()
            .await
            .map_err(|e| AiError::parse(e.to_string()))?;

        let choice = body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AiError::parse("response contained no choices"))?;

        let finish_reason = match choice.finish_reason.as_deref() {
            Some("length") => FinishReason::Length,
            Some("content_filter") => FinishReason::ContentFilter,
            Some(_) | None => FinishReason::Stop,
        };

        Ok(CompletionResponse {
            content: choice.message.content,
            usage: body
                .usage
                .map(|u| TokenUsage::new(u.prompt_tokens, u.completion_tokens))
                .unwrap_or_else(TokenUsage::zero),
            model: body.model,
            finish_reason,
        })
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("openai", &self.config.model)
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::EmptyInput);
        }

        let body = WireEmbeddingRequest {
            model: self.config.embed_model.clone(),
            input: text.to_string(),
        };

        let response = self
            .post_json(self.embeddings_url(), &body)
            .await
            .map_err(|e| EmbeddingError::Network(e.to_string()))?;
        let response = Self::check_status(response)
            .await
            .map_err(|e| EmbeddingError::Unavailable(e.to_string()))?;

        let body: WireEmbeddingResponse = response
            .json()
            .await
            .map_err(|e| EmbeddingError::Parse(e.to_string()))?;

        body.data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| EmbeddingError::Parse("response contained no embeddings".to_string()))
    }
}

// Wire types for the OpenAI API.

#[derive(Debug, Serialize)]
struct WireChatRequest {
    model: String,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<WireResponseFormat>,
}

#[derive(Debug, Serialize)]
struct WireResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct WireChatResponse {
    model: String,
    choices: Vec<WireChoice>,
    usage: Option<WireUsage>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Serialize)]
struct WireEmbeddingRequest {
    model: String,
    input: String,
}

#[derive(Debug, Deserialize)]
struct WireEmbeddingResponse {
    data: Vec<WireEmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct WireEmbeddingData {
    embedding: Vec<f32>,
}
