//! EmbeddingProvider — cache-first, backend-backed vector computation.
//!
//! Lookup order: hot tier, durable store, backend. Corrupt store entries
//! are recomputed and overwritten in place. Backend connectivity failures
//! are retried with bounded exponential backoff before they become a
//! run-level failure.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use dashmap::DashMap;
use tracing::{debug, warn};

use cognate_core::errors::{CognateError, CognateResult, EmbeddingError};
use cognate_core::{CorpusHandle, EmbeddingBackend, EmbeddingConfig, LexemeRecord, ModelSpec};

use crate::cache::{CacheCounts, CacheKey, HotCache, VectorStore};
use crate::text;

/// Scale a vector to unit L2 norm. Zero vectors are left untouched.
pub fn l2_normalize(vector: &mut [f32]) {
    let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > f32::EPSILON {
        for v in vector.iter_mut() {
            *v /= norm;
        }
    }
}

#[derive(Default)]
struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    corruptions: AtomicU64,
}

impl CacheStats {
    fn snapshot(&self) -> CacheCounts {
        CacheCounts {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            corruptions: self.corruptions.load(Ordering::Relaxed),
        }
    }
}

/// The embedding provider. Owns the hot tier; the durable store and the
/// backend are injected so tests can isolate both.
pub struct EmbeddingProvider {
    backend: Box<dyn EmbeddingBackend>,
    store: VectorStore,
    hot: HotCache,
    /// Per-key in-flight guard: at most one live computation per hash.
    inflight: DashMap<String, Arc<Mutex<()>>>,
    stats: CacheStats,
    config: EmbeddingConfig,
}

impl EmbeddingProvider {
    pub fn new(
        config: EmbeddingConfig,
        backend: Box<dyn EmbeddingBackend>,
        store: VectorStore,
    ) -> Self {
        let hot = HotCache::new(config.hot_cache_entries);
        Self {
            backend,
            store,
            hot,
            inflight: DashMap::new(),
            stats: CacheStats::default(),
            config,
        }
    }

    /// Cache accounting since construction.
    pub fn counts(&self) -> CacheCounts {
        self.stats.snapshot()
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Compute or fetch the vector for one (record, model).
    ///
    /// Guarantees at most one live backend computation per cache key:
    /// concurrent requests for the same key serialize on a per-key lock
    /// and the losers read the winner's committed entry.
    pub fn get_or_compute(
        &self,
        record: &LexemeRecord,
        model: &ModelSpec,
    ) -> CognateResult<Vec<f32>> {
        let selected = text::text_for_model(record, model.kind);
        let key = CacheKey::compute(model, &selected.text);

        if !self.config.rebuild_cache {
            if let Some(vector) = self.lookup(model, &key)? {
                self.stats.hits.fetch_add(1, Ordering::Relaxed);
                return Ok(vector);
            }
        }

        let lock = {
            let entry = self
                .inflight
                .entry(key.as_str().to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())));
            Arc::clone(entry.value())
        };
        let guard = lock.lock().map_err(|_| EmbeddingError::InferenceFailed {
            reason: "in-flight lock poisoned".to_string(),
        })?;

        // Double-check: another thread may have committed while we waited.
        if !self.config.rebuild_cache {
            if let Some(vector) = self.lookup(model, &key)? {
                self.stats.hits.fetch_add(1, Ordering::Relaxed);
                drop(guard);
                self.inflight.remove(key.as_str());
                return Ok(vector);
            }
        }

        let texts = vec![selected.text];
        let mut vectors = self.call_backend(&model.id, &texts)?;
        let vector = vectors.pop().ok_or_else(|| EmbeddingError::InferenceFailed {
            reason: "backend returned no vector".to_string(),
        })?;

        self.commit(model, &key, &vector)?;
        self.stats.misses.fetch_add(1, Ordering::Relaxed);

        drop(guard);
        self.inflight.remove(key.as_str());
        Ok(vector)
    }

    /// Embed every record of a corpus under one model, in corpus order.
    ///
    /// Cached entries are reused; misses are deduplicated by key and
    /// computed in `batch_size` chunks.
    pub fn embed_corpus(
        &self,
        corpus: &CorpusHandle,
        model: &ModelSpec,
    ) -> CognateResult<Vec<Vec<f32>>> {
        let records = corpus.records();
        let mut slots: Vec<Option<Vec<f32>>> = vec![None; records.len()];
        // key → record indexes still waiting on a computed vector.
        let mut pending: HashMap<String, Vec<usize>> = HashMap::new();
        let mut pending_order: Vec<(CacheKey, String)> = Vec::new();

        for (i, record) in records.iter().enumerate() {
            let selected = text::text_for_model(record, model.kind);
            let key = CacheKey::compute(model, &selected.text);

            if !self.config.rebuild_cache {
                if let Some(vector) = self.lookup(model, &key)? {
                    self.stats.hits.fetch_add(1, Ordering::Relaxed);
                    slots[i] = Some(vector);
                    continue;
                }
            }

            let entry = pending.entry(key.as_str().to_string()).or_default();
            if entry.is_empty() {
                pending_order.push((key.clone(), selected.text));
            }
            entry.push(i);
        }

        debug!(
            corpus = %corpus.label(),
            model = %model.id,
            total = records.len(),
            misses = pending_order.len(),
            "corpus embedding pass"
        );

        let batch = self.config.batch_size.max(1);
        for chunk in pending_order.chunks(batch) {
            let chunk_texts: Vec<String> = chunk.iter().map(|(_, t)| t.clone()).collect();
            let vectors = self.call_backend(&model.id, &chunk_texts)?;
            for ((key, _), vector) in chunk.iter().zip(vectors) {
                self.commit(model, key, &vector)?;
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
                for &i in pending.get(key.as_str()).map(Vec::as_slice).unwrap_or(&[]) {
                    slots[i] = Some(vector.clone());
                }
            }
        }

        slots
            .into_iter()
            .enumerate()
            .map(|(i, slot)| {
                slot.ok_or_else(|| {
                    EmbeddingError::InferenceFailed {
                        reason: format!("no vector produced for record index {i}"),
                    }
                    .into()
                })
            })
            .collect()
    }

    /// Hot-then-store lookup. A corrupt store entry counts as a miss and
    /// bumps the corruption counter; the caller recomputes and overwrites.
    fn lookup(&self, model: &ModelSpec, key: &CacheKey) -> CognateResult<Option<Vec<f32>>> {
        if let Some(vector) = self.hot.get(key.as_str()) {
            return Ok(Some(vector));
        }
        match self.store.read(model, key) {
            Ok(Some(vector)) => {
                self.hot.insert(key.as_str().to_string(), vector.clone());
                Ok(Some(vector))
            }
            Ok(None) => Ok(None),
            Err(CognateError::Embedding(EmbeddingError::CacheCorruption { hash })) => {
                warn!(%hash, "corrupt cache entry, recomputing");
                self.stats.corruptions.fetch_add(1, Ordering::Relaxed);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn commit(&self, model: &ModelSpec, key: &CacheKey, vector: &[f32]) -> CognateResult<()> {
        self.store.write(model, key, vector)?;
        self.hot.insert(key.as_str().to_string(), vector.to_vec());
        Ok(())
    }

    /// Call the backend, retrying `BackendUnavailable` with bounded
    /// exponential backoff, and validate output dimensionality.
    fn call_backend(&self, model_id: &str, texts: &[String]) -> CognateResult<Vec<Vec<f32>>> {
        let max_attempts = self.config.max_retries.max(1);
        let mut attempt: u32 = 0;
        let vectors = loop {
            match self.backend.embed_batch(model_id, texts) {
                Ok(vectors) => break vectors,
                Err(CognateError::Embedding(EmbeddingError::BackendUnavailable {
                    backend,
                    reason,
                })) if attempt + 1 < max_attempts => {
                    let delay = Duration::from_millis(self.config.retry_base_ms << attempt);
                    warn!(
                        backend = %backend,
                        %reason,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "backend unavailable, backing off"
                    );
                    thread::sleep(delay);
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        };

        for vector in &vectors {
            if vector.len() != self.config.dimensions {
                return Err(EmbeddingError::DimensionMismatch {
                    expected: self.config.dimensions,
                    actual: vector.len(),
                }
                .into());
            }
        }
        Ok(vectors)
    }
}
