//! Cache tier adapters.
//!
//! Lookup order is hot, then durable, then miss. Every tier is advisory:
//! failures degrade to a miss and are logged, never surfaced.

mod hot;
mod memory;
mod redis;
mod tiered;

pub use hot::HotCache;
pub use memory::InMemoryTtlCache;
pub use redis::RedisCache;
pub use tiered::TieredCache;
