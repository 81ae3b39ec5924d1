//! AI provider adapters and the generation gateway.

mod gateway;
mod mock_provider;
mod openai_provider;

pub use gateway::GenerationGateway;
pub use mock_provider::{MockAiProvider, MockFailure};
pub use openai_provider::{OpenAiConfig, OpenAiProvider};
