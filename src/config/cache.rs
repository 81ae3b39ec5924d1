//! Cache tier configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Cache layer configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Hot in-process tier capacity
    #[serde(default = "default_hot_capacity")]
    pub hot_capacity: usize,

    /// Durable tier capacity (in-memory backend only)
    #[serde(default = "default_durable_capacity")]
    pub durable_capacity: usize,

    /// Durable tier entry TTL, seconds
    #[serde(default = "default_durable_ttl")]
    pub durable_ttl_secs: u64,

    /// Redis URL for the durable tier; unset uses the in-memory backend
    pub redis_url: Option<String>,
}

impl CacheConfig {
    pub fn durable_ttl(&self) -> Duration {
        Duration::from_secs(self.durable_ttl_secs)
    }

    /// Validate cache configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.hot_capacity == 0 || self.durable_capacity == 0 {
            return Err(ValidationError::InvalidCacheCapacity);
        }
        if self.durable_ttl_secs == 0 {
            return Err(ValidationError::InvalidTtl);
        }
        if let Some(url) = &self.redis_url {
            if !url.starts_with("redis://") && !url.starts_with("rediss://") {
                return Err(ValidationError::InvalidRedisUrl);
            }
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            hot_capacity: default_hot_capacity(),
            durable_capacity: default_durable_capacity(),
            durable_ttl_secs: default_durable_ttl(),
            redis_url: None,
        }
    }
}

fn default_hot_capacity() -> usize {
    100
}

fn default_durable_capacity() -> usize {
    10_000
}

fn default_durable_ttl() -> u64 {
    86400
}
