//! Hot in-process cache tier with LRU eviction.

use async_trait::async_trait;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::ports::CacheTier;

/// Bounded in-process LRU cache.
#[derive(Debug, Clone)]
pub struct HotCache {
    entries: Arc<Mutex<LruCache<String, String>>>,
}

impl HotCache {
    /// Creates a hot cache holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).expect("capacity is at least 1");
        Self {
            entries: Arc::new(Mutex::new(LruCache::new(capacity))),
        }
    }

    /// Number of cached entries.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

#[async_trait]
impl CacheTier for HotCache {
    async fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().await.get(key).cloned()
    }

    async fn put(&self, key: &str, value: String) {
        self.entries.lock().await.put(key.to_string(), value);
    }

    fn name(&self) -> &'static str {
        "hot"
    }
}
