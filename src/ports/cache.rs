//! Cache Tier Port - Interface for generation/evaluation caches.
//!
//! The cache is advisory: a tier that cannot serve a request reports a miss,
//! never an error. Tier implementations log their own failures and swallow
//! them so that a broken cache degrades to always-miss.

use async_trait::async_trait;
use sha2::{Digest, Sha256};

/// A single cache tier (hot in-process, durable, etc.).
#[async_trait]
pub trait CacheTier: Send + Sync {
    /// Look up a key. `None` means miss or tier failure.
    async fn get(&self, key: &str) -> Option<String>;

    /// Store a value. Failures are swallowed.
    async fn put(&self, key: &str, value: String);

    /// Tier name for logging.
    fn name(&self) -> &'static str;
}

/// Computes a stable fingerprint over the given context parts.
///
/// Parts are length-prefixed before hashing so that `["ab", "c"]` and
/// `["a", "bc"]` produce different keys.
pub fn fingerprint(parts: &[&str]) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update((part.len() as u64).to_be_bytes());
        hasher.update(part.as_bytes());
    }
    hex_encode(&hasher.finalize())
}

fn hex_encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        out.push_str(&format!("{:02x}", b));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_deterministic() {
        let a = fingerprint(&["algorithms", "medium", "q1|q2"]);
        let b = fingerprint(&["algorithms", "medium", "q1|q2"]);
        assert_eq!(a, b);
    }

    #[test]
    fn fingerprint_differs_on_any_part() {
        let base = fingerprint(&["algorithms", "medium", "q1"]);
        assert_ne!(base, fingerprint(&["algorithms", "hard", "q1"]));
        assert_ne!(base, fingerprint(&["databases", "medium", "q1"]));
    }

    #[test]
    fn fingerprint_respects_part_boundaries() {
        assert_ne!(fingerprint(&["ab", "c"]), fingerprint(&["a", "bc"]));
    }

    #[test]
    fn fingerprint_is_hex_sha256() {
        let fp = fingerprint(&["x"]);
        assert_eq!(fp.len(), 64);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
