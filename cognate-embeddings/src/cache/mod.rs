//! Content-addressed vector cache.
//!
//! Two tiers: a moka in-memory hot tier and a durable file store. The key
//! is a pure function of (model id, model version, normalized text), so
//! identical inputs always resolve to the identical cached vector and a
//! changed input text lands under a new hash, leaving the old entry
//! reclaimable.

mod hot;
mod store;

pub use hot::HotCache;
pub use store::VectorStore;

use serde::{Deserialize, Serialize};

use cognate_core::ModelSpec;

/// A content-addressed cache key (blake3, hex).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derive the key for a (model, normalized text) pair.
    pub fn compute(model: &ModelSpec, normalized_text: &str) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(model.id.as_bytes());
        hasher.update(b"\0");
        hasher.update(model.version.as_bytes());
        hasher.update(b"\0");
        hasher.update(normalized_text.as_bytes());
        Self(hasher.finalize().to_hex().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Cache accounting for the run manifest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheCounts {
    pub hits: u64,
    pub misses: u64,
    /// Entries that failed verification and were recomputed in place.
    pub corruptions: u64,
}

impl CacheCounts {
    pub fn total(&self) -> u64 {
        self.hits + self.misses
    }

    /// Hit rate in [0, 1]; 0 when nothing was looked up.
    pub fn hit_rate(&self) -> f64 {
        if self.total() == 0 {
            0.0
        } else {
            self.hits as f64 / self.total() as f64
        }
    }
}
