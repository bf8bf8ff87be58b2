//! Durable content-addressed vector store.
//!
//! One file per cache key: `<root>/<model>/<hash>.vec`, a JSON envelope
//! carrying the vector plus a checksum over its raw bytes. Writes go to a
//! temporary sibling and are renamed into place, so concurrent readers
//! never observe a partial entry.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use cognate_core::errors::{CognateResult, EmbeddingError};
use cognate_core::ModelSpec;

use super::CacheKey;

/// On-disk entry envelope.
#[derive(Debug, Serialize, Deserialize)]
struct StoredEntry {
    key: String,
    model_id: String,
    model_version: String,
    dims: usize,
    /// blake3 over the little-endian bytes of `vector`.
    checksum: String,
    vector: Vec<f32>,
}

fn vector_checksum(vector: &[f32]) -> String {
    let mut hasher = blake3::Hasher::new();
    for value in vector {
        hasher.update(&value.to_le_bytes());
    }
    hasher.finalize().to_hex().to_string()
}

/// Replace path-hostile characters in a model id ("BAAI/bge-m3" → "BAAI_bge-m3").
fn sanitize(model_id: &str) -> String {
    model_id
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '.' { c } else { '_' })
        .collect()
}

/// The durable tier of the embedding cache.
pub struct VectorStore {
    root: PathBuf,
}

impl VectorStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_path(&self, model: &ModelSpec, key: &CacheKey) -> PathBuf {
        self.root
            .join(sanitize(&model.id))
            .join(format!("{}.vec", key.as_str()))
    }

    /// Read a cached vector.
    ///
    /// `Ok(None)` on a clean miss. `EmbeddingError::CacheCorruption` when
    /// the entry exists but fails parsing or checksum verification — the
    /// caller recomputes and overwrites, never crashes.
    pub fn read(&self, model: &ModelSpec, key: &CacheKey) -> CognateResult<Option<Vec<f32>>> {
        let path = self.entry_path(model, key);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(EmbeddingError::CacheStore {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                }
                .into())
            }
        };

        let entry: StoredEntry = match serde_json::from_slice(&bytes) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "unparseable cache entry");
                return Err(EmbeddingError::CacheCorruption {
                    hash: key.as_str().to_string(),
                }
                .into());
            }
        };

        if entry.key != key.as_str()
            || entry.dims != entry.vector.len()
            || entry.checksum != vector_checksum(&entry.vector)
        {
            warn!(path = %path.display(), "cache entry failed verification");
            return Err(EmbeddingError::CacheCorruption {
                hash: key.as_str().to_string(),
            }
            .into());
        }

        Ok(Some(entry.vector))
    }

    /// Write a vector atomically: serialize to `<path>.tmp`, then rename.
    pub fn write(&self, model: &ModelSpec, key: &CacheKey, vector: &[f32]) -> CognateResult<()> {
        let parent = self.root.join(sanitize(&model.id));
        fs::create_dir_all(&parent).map_err(|e| EmbeddingError::CacheStore {
            path: parent.display().to_string(),
            reason: e.to_string(),
        })?;
        let path = parent.join(format!("{}.vec", key.as_str()));

        let entry = StoredEntry {
            key: key.as_str().to_string(),
            model_id: model.id.clone(),
            model_version: model.version.clone(),
            dims: vector.len(),
            checksum: vector_checksum(vector),
            vector: vector.to_vec(),
        };
        let payload = serde_json::to_vec(&entry)?;

        let tmp = path.with_extension("vec.tmp");
        fs::write(&tmp, &payload).map_err(|e| EmbeddingError::CacheStore {
            path: tmp.display().to_string(),
            reason: e.to_string(),
        })?;
        fs::rename(&tmp, &path).map_err(|e| EmbeddingError::CacheStore {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        debug!(key = %key, model = %model.id, "cache entry written");
        Ok(())
    }

    /// Whether an entry exists (no verification).
    pub fn contains(&self, model: &ModelSpec, key: &CacheKey) -> bool {
        self.entry_path(model, key).exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cognate_core::ModelKind;

    fn model() -> ModelSpec {
        ModelSpec::new("BAAI/bge-m3", "1", ModelKind::Semantic)
    }

    #[test]
    fn roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = VectorStore::new(dir.path());
        let key = CacheKey::compute(&model(), "book");
        let vector = vec![0.5f32, -0.25, 0.125];

        store.write(&model(), &key, &vector).unwrap();
        let read = store.read(&model(), &key).unwrap().unwrap();
        assert_eq!(read, vector);
    }

    #[test]
    fn clean_miss_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = VectorStore::new(dir.path());
        let key = CacheKey::compute(&model(), "absent");
        assert!(store.read(&model(), &key).unwrap().is_none());
    }

    #[test]
    fn corrupt_entry_is_cache_corruption() {
        let dir = tempfile::tempdir().unwrap();
        let store = VectorStore::new(dir.path());
        let key = CacheKey::compute(&model(), "book");
        store.write(&model(), &key, &[1.0, 2.0]).unwrap();

        // Flip bytes in place.
        let path = store.entry_path(&model(), &key);
        std::fs::write(&path, b"{\"garbage\": true}").unwrap();

        let err = store.read(&model(), &key).unwrap_err();
        assert!(err.to_string().contains("failed verification"));
    }

    #[test]
    fn checksum_mismatch_is_cache_corruption() {
        let dir = tempfile::tempdir().unwrap();
        let store = VectorStore::new(dir.path());
        let key = CacheKey::compute(&model(), "book");
        store.write(&model(), &key, &[1.0, 2.0]).unwrap();

        let path = store.entry_path(&model(), &key);
        let mut entry: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        entry["vector"][0] = serde_json::json!(9.0);
        std::fs::write(&path, serde_json::to_vec(&entry).unwrap()).unwrap();

        let err = store.read(&model(), &key).unwrap_err();
        assert!(matches!(
            err,
            cognate_core::CognateError::Embedding(EmbeddingError::CacheCorruption { .. })
        ));
    }

    #[test]
    fn overwrite_replaces_entry() {
        let dir = tempfile::tempdir().unwrap();
        let store = VectorStore::new(dir.path());
        let key = CacheKey::compute(&model(), "book");
        store.write(&model(), &key, &[1.0]).unwrap();
        store.write(&model(), &key, &[2.0]).unwrap();
        assert_eq!(store.read(&model(), &key).unwrap().unwrap(), vec![2.0]);
    }

    #[test]
    fn no_tmp_files_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = VectorStore::new(dir.path());
        let key = CacheKey::compute(&model(), "book");
        store.write(&model(), &key, &[1.0]).unwrap();

        let model_dir = dir.path().join("BAAI_bge-m3");
        let leftovers: Vec<_> = std::fs::read_dir(model_dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn model_ids_with_slashes_are_sanitized() {
        assert_eq!(sanitize("BAAI/bge-m3"), "BAAI_bge-m3");
        assert_eq!(sanitize("google/byt5-small"), "google_byt5-small");
    }
}
