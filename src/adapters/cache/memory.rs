//! In-memory durable cache tier with TTL eviction.
//!
//! Stands in for an external store in tests and single-process
//! deployments. Expired entries are invisible to `get` immediately and are
//! pruned opportunistically on writes.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::ports::CacheTier;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Instant,
}

/// Bounded TTL cache backed by a HashMap.
#[derive(Debug, Clone)]
pub struct InMemoryTtlCache {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
    capacity: usize,
    ttl: Duration,
}

impl InMemoryTtlCache {
    /// Creates a cache holding at most `capacity` entries for `ttl` each.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            capacity: capacity.max(1),
            ttl,
        }
    }

    /// Number of stored entries, including not-yet-pruned expired ones.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl CacheTier for InMemoryTtlCache {
    async fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.read().await;
        let entry = entries.get(key)?;
        if entry.expires_at <= Instant::now() {
            return None;
        }
        Some(entry.value.clone())
    }

    async fn put(&self, key: &str, value: String) {
        let now = Instant::now();
        let mut entries = self.entries.write().await;

        entries.retain(|_, entry| entry.expires_at > now);

        // Still full after pruning: drop the entry closest to expiry.
        if entries.len() >= self.capacity && !entries.contains_key(key) {
            if let Some(oldest) = entries
                .iter()
                .min_by_key(|(_, entry)| entry.expires_at)
                .map(|(k, _)| k.clone())
            {
                entries.remove(&oldest);
            }
        }

        entries.insert(
            key.to_string(),
            Entry {
                value,
                expires_at: now + self.ttl,
            },
        );
    }

    fn name(&self) -> &'static str {
        "durable-memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_returns_stored_value_within_ttl() {
        let cache = InMemoryTtlCache::new(8, Duration::from_secs(60));
        cache.put("k", "v".to_string()).await;
        assert_eq!(cache.get("k").await.as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn expired_entry_is_a_miss_before_pruning() {
        let cache = InMemoryTtlCache::new(8, Duration::from_millis(20));
        cache.put("k", "v".to_string()).await;

        tokio::time::sleep(Duration::from_millis(40)).await;

        assert!(cache.get("k").await.is_none());
        // The entry is still physically present until the next write prunes.
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn writes_prune_expired_entries() {
        let cache = InMemoryTtlCache::new(8, Duration::from_millis(20));
        cache.put("old", "v".to_string()).await;

        tokio::time::sleep(Duration::from_millis(40)).await;
        cache.put("new", "v".to_string()).await;

        assert_eq!(cache.len().await, 1);
        assert!(cache.get("new").await.is_some());
    }

    #[tokio::test]
    async fn capacity_evicts_entry_closest_to_expiry() {
        let cache = InMemoryTtlCache::new(2, Duration::from_secs(60));
        cache.put("a", "1".to_string()).await;
        tokio::time::sleep(Duration::from_millis(5)).await;
        cache.put("b", "2".to_string()).await;
        cache.put("c", "3".to_string()).await;

        assert!(cache.get("a").await.is_none());
        assert!(cache.get("b").await.is_some());
        assert!(cache.get("c").await.is_some());
    }

    #[tokio::test]
    async fn overwriting_does_not_evict_other_keys() {
        let cache = InMemoryTtlCache::new(2, Duration::from_secs(60));
        cache.put("a", "1".to_string()).await;
        cache.put("b", "2".to_string()).await;
        cache.put("a", "updated".to_string()).await;

        assert_eq!(cache.get("a").await.as_deref(), Some("updated"));
        assert!(cache.get("b").await.is_some());
    }
}
