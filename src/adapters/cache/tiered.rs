//! Tiered cache composing hot and durable tiers.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::ports::CacheTier;

/// Multi-tier cache: lookups go front to back, a hit back-fills every
/// earlier tier, and writes populate all tiers.
#[derive(Clone, Default)]
pub struct TieredCache {
    tiers: Vec<Arc<dyn CacheTier>>,
}

impl TieredCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a tier. Earlier tiers are consulted first.
    pub fn with_tier(mut self, tier: Arc<dyn CacheTier>) -> Self {
        self.tiers.push(tier);
        self
    }

    pub fn tier_count(&self) -> usize {
        self.tiers.len()
    }
}

#[async_trait]
impl CacheTier for TieredCache {
    async fn get(&self, key: &str) -> Option<String> {
        for (index, tier) in self.tiers.iter().enumerate() {
            if let Some(value) = tier.get(key).await {
                debug!(tier = tier.name(), "cache hit");
                for earlier in &self.tiers[..index] {
                    earlier.put(key, value.clone()).await;
                }
                return Some(value);
            }
        }
        None
    }

    async fn put(&self, key: &str, value: String) {
        for tier in &self.tiers {
            tier.put(key, value.clone()).await;
        }
    }

    fn name(&self) -> &'static str {
        "tiered"
    }
}

impl std::fmt::Debug for TieredCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.tiers.iter().map(|t| t.name()).collect();
        f.debug_struct("TieredCache").field("tiers", &names).finish()
    }
}
