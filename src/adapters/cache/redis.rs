//! Redis-backed durable cache tier for multi-process deployments.
//!
//! Uses SET with EX for TTL eviction. All Redis errors are logged and
//! reported as misses so a broken Redis degrades to always-miss.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use std::time::Duration;
use tracing::warn;

use crate::ports::CacheTier;

/// Key namespace so cache entries coexist with other users of the instance.
const KEY_PREFIX: &str = "viva:cache:";

/// Redis cache tier.
#[derive(Clone)]
pub struct RedisCache {
    conn: MultiplexedConnection,
    ttl: Duration,
}

impl RedisCache {
    /// Wraps an established connection.
    pub fn new(conn: MultiplexedConnection, ttl: Duration) -> Self {
        Self { conn, ttl }
    }

    /// Connects to Redis at `url`.
    pub async fn connect(url: &str, ttl: Duration) -> Result<Self, redis::RedisError> {
        let client = redis::Client::open(url)?;
        let conn = client.get_multiplexed_tokio_connection().await?;
        Ok(Self::new(conn, ttl))
    }

    fn namespaced(key: &str) -> String {
        format!("{}{}", KEY_PREFIX, key)
    }
}

#[async_trait]
impl CacheTier for RedisCache {
    async fn get(&self, key: &str) -> Option<String> {
        let mut conn = self.conn.clone();
        let result: Result<Option<String>, redis::RedisError> = redis::cmd("GET")
            .arg(Self::namespaced(key))
            .query_async(&mut conn)
            .await;

        match result {
            Ok(value) => value,
            Err(err) => {
                warn!(error = %err, tier = self.name(), "cache read failed, treating as miss");
                None
            }
        }
    }

    async fn put(&self, key: &str, value: String) {
        let mut conn = self.conn.clone();
        let result: Result<(), redis::RedisError> = redis::cmd("SET")
            .arg(Self::namespaced(key))
            .arg(value)
            .arg("EX")
            .arg(self.ttl.as_secs().max(1))
            .query_async(&mut conn)
            .await;

        if let Err(err) = result {
            warn!(error = %err, tier = self.name(), "cache write failed, skipping");
        }
    }

    fn name(&self) -> &'static str {
        "durable-redis"
    }
}

impl std::fmt::Debug for RedisCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCache")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
