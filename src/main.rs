//! Viva Engine server binary.
//!
//! Loads configuration from the environment, wires the engine together,
//! and serves the turn protocol over HTTP.

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use viva_engine::adapters::ai::{
    GenerationGateway, MockAiProvider, OpenAiConfig, OpenAiProvider,
};
use viva_engine::adapters::cache::{HotCache, InMemoryTtlCache, RedisCache, TieredCache};
use viva_engine::adapters::embeddings::HashEmbeddingProvider;
use viva_engine::adapters::http::{router, AppState};
use viva_engine::adapters::store::InMemorySessionStore;
use viva_engine::application::handlers::{
    GetSessionHandler, StartInterviewHandler, SubmitAnswerHandler,
};
use viva_engine::config::{AiProviderKind, AppConfig};
use viva_engine::domain::evaluation::EvaluationEngine;
use viva_engine::domain::interview::InterviewStateMachine;
use viva_engine::ports::{AiProvider, CacheTier, EmbeddingProvider};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load()?;
    config.validate()?;

    let (provider, embedder): (Arc<dyn AiProvider>, Arc<dyn EmbeddingProvider>) =
        match config.ai.provider {
            AiProviderKind::Mock => {
                info!("using mock AI provider; answers score heuristically");
                (
                    Arc::new(MockAiProvider::new()),
                    Arc::new(HashEmbeddingProvider::new()),
                )
            }
            AiProviderKind::OpenAi => {
                let key = config
                    .ai
                    .openai_api_key
                    .clone()
                    .ok_or("OpenAI provider requires VIVA__AI__OPENAI_API_KEY")?;
                let openai = Arc::new(OpenAiProvider::new(
                    OpenAiConfig::new(key)
                        .with_model(&config.ai.model)
                        .with_embed_model(&config.ai.embed_model)
                        .with_base_url(&config.ai.base_url)
                        .with_timeout(config.ai.timeout()),
                )?);
                (openai.clone(), openai)
            }
        };

    let durable: Arc<dyn CacheTier> = match &config.cache.redis_url {
        Some(url) => {
            info!(url = %url, "using Redis durable cache tier");
            Arc::new(RedisCache::connect(url, config.cache.durable_ttl()).await?)
        }
        None => Arc::new(InMemoryTtlCache::new(
            config.cache.durable_capacity,
            config.cache.durable_ttl(),
        )),
    };
    let cache: Arc<dyn CacheTier> = Arc::new(
        TieredCache::new()
            .with_tier(Arc::new(HotCache::new(config.cache.hot_capacity)))
            .with_tier(durable),
    );

    let generator = Arc::new(
        GenerationGateway::new(provider)
            .with_cache(cache.clone())
            .with_max_retries(config.ai.max_retries),
    );

    let evaluator = Arc::new(
        EvaluationEngine::new(generator.clone(), embedder)
            .with_cache(cache)
            .with_weights(config.interview.blend_weights())
            .with_offtopic_policy(
                config.interview.semantic_threshold,
                config.interview.offtopic_ceiling,
            ),
    );

    let machine = Arc::new(
        InterviewStateMachine::new(generator, evaluator)
            .with_difficulty_adapter(config.interview.difficulty_adapter())
            .with_generation_attempts(config.interview.question_attempts),
    );

    let store = Arc::new(InMemorySessionStore::new(
        config.interview.session_ttl(),
        config.interview.completed_retention(),
    ));
    let _sweeper = store.spawn_sweeper(config.interview.sweep_interval());

    let state = AppState {
        start_handler: Arc::new(StartInterviewHandler::new(store.clone(), machine.clone())),
        submit_handler: Arc::new(SubmitAnswerHandler::new(store.clone(), machine.clone())),
        get_handler: Arc::new(GetSessionHandler::new(store, machine)),
    };

    let app = router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .layer(TimeoutLayer::new(Duration::from_secs(120))),
    );

    let addr = config.server.socket_addr();
    info!(addr = %addr, "starting interview engine");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
