//! In-memory hot tier backed by moka.

use moka::sync::Cache;

/// Hot embedding cache. Keys are content-hash strings; values are the
/// cached vectors.
pub struct HotCache {
    cache: Cache<String, Vec<f32>>,
}

impl HotCache {
    /// Create a hot cache with the given max entry count.
    pub fn new(max_entries: u64) -> Self {
        Self {
            cache: Cache::builder().max_capacity(max_entries).build(),
        }
    }

    pub fn get(&self, key: &str) -> Option<Vec<f32>> {
        self.cache.get(key)
    }

    pub fn insert(&self, key: String, vector: Vec<f32>) {
        self.cache.insert(key, vector);
    }

    pub fn invalidate(&self, key: &str) {
        self.cache.invalidate(key);
    }

    pub fn clear(&self) {
        self.cache.invalidate_all();
    }
}
