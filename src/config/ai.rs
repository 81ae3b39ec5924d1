//! AI provider configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// AI provider type
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AiProviderKind {
    /// Scripted local provider, useful for development without API keys.
    #[default]
    Mock,
    /// Any endpoint speaking the OpenAI chat/embeddings API.
    OpenAi,
}

/// AI provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// Which provider backs generation and embeddings
    #[serde(default)]
    pub provider: AiProviderKind,

    /// OpenAI API key
    pub openai_api_key: Option<String>,

    /// Chat model
    #[serde(default = "default_model")]
    pub model: String,

    /// Embedding model
    #[serde(default = "default_embed_model")]
    pub embed_model: String,

    /// API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Retries after the first failed generation attempt
    #[serde(default = "default_retries")]
    pub max_retries: u32,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if an OpenAI key is configured
    pub fn has_openai_key(&self) -> bool {
        self.openai_api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    /// Validate AI configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.provider == AiProviderKind::OpenAi && !self.has_openai_key() {
            return Err(ValidationError::MissingRequired("AI_OPENAI_API_KEY"));
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: AiProviderKind::default(),
            openai_api_key: None,
            model: default_model(),
            embed_model: default_embed_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
        }
    }
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_embed_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_retries() -> u32 {
    2
}
