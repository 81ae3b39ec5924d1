//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Configuration is loaded with the `VIVA`
//! prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use viva_engine::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr());
//! ```

mod ai;
mod cache;
mod error;
mod interview;
mod server;

pub use ai::{AiConfig, AiProviderKind};
pub use cache::CacheConfig;
pub use error::{ConfigError, ValidationError};
pub use interview::InterviewConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// AI provider configuration
    #[serde(default)]
    pub ai: AiConfig,

    /// Interview engine tuning
    #[serde(default)]
    pub interview: InterviewConfig,

    /// Cache layer configuration
    #[serde(default)]
    pub cache: CacheConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with the `VIVA` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `VIVA__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `VIVA__AI__PROVIDER=openai` -> `ai.provider = OpenAi`
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("VIVA")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.ai.validate()?;
        self.interview.validate()?;
        self.cache.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_env() {
        env::remove_var("VIVA__SERVER__PORT");
        env::remove_var("VIVA__SERVER__ENVIRONMENT");
        env::remove_var("VIVA__AI__PROVIDER");
        env::remove_var("VIVA__AI__OPENAI_API_KEY");
        env::remove_var("VIVA__INTERVIEW__SESSION_TTL_SECS");
        env::remove_var("VIVA__CACHE__HOT_CAPACITY");
    }

    #[test]
    fn test_load_with_no_env_uses_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let config = AppConfig::load().unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.ai.provider, AiProviderKind::Mock);
        assert_eq!(config.interview.session_ttl_secs, 3600);
        assert_eq!(config.cache.hot_capacity, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides_apply() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("VIVA__SERVER__PORT", "3000");
        env::set_var("VIVA__INTERVIEW__SESSION_TTL_SECS", "120");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.interview.session_ttl_secs, 120);
    }

    #[test]
    fn test_is_production() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("VIVA__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        assert!(result.unwrap().is_production());
    }

    #[test]
    fn test_openai_provider_without_key_fails_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("VIVA__AI__PROVIDER", "openai");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.validate().is_err());
    }
}
