//! Ports - interfaces the domain consumes, implemented by adapters.

mod ai_provider;
mod cache;
mod embeddings;
mod generation;

pub use ai_provider::{
    AiError, AiProvider, CompletionRequest, CompletionResponse, FinishReason, GenerationPurpose,
    Message, MessageRole, ProviderInfo, TokenUsage,
};
pub use cache::{fingerprint, CacheTier};
pub use embeddings::{EmbeddingError, EmbeddingProvider};
pub use generation::{strip_code_fences, GenerationError, TextGenerator, TextGeneratorExt};
