//! Persisted index cache.
//!
//! Layout per (corpus, model): `<root>/<model>/<language>/<stage>/` holding
//! `index.bin` (count/dims header + f32 LE body) and `meta.json` (ids,
//! vector-set tag). A stored index is reused only while its tag equals the
//! hash of the current vector set; anything else — missing files, corrupt
//! files, stale tag, explicit rebuild flag — rebuilds silently.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use cognate_core::errors::{CognateResult, IndexError};
use cognate_core::{CorpusLabel, ModelSpec};

use crate::index::{vector_set_hash, IndexHandle};

/// Index cache accounting for the run manifest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexCounts {
    pub built: u64,
    pub reused: u64,
}

#[derive(Debug, Serialize, Deserialize)]
struct IndexMeta {
    model_id: String,
    dims: usize,
    count: usize,
    /// Vector-set hash the stored index was built from.
    tag: String,
    ids: Vec<String>,
}

fn sanitize(part: &str) -> String {
    part.chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '.' { c } else { '_' })
        .collect()
}

/// The on-disk index cache.
pub struct IndexStore {
    root: PathBuf,
}

impl IndexStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn dir(&self, label: &CorpusLabel, model: &ModelSpec) -> PathBuf {
        self.root
            .join(sanitize(&model.id))
            .join(sanitize(&label.language))
            .join(sanitize(&label.stage))
    }

    /// Reuse the persisted index when its tag matches the current vector
    /// set, else build (and persist) a fresh one. Returns the handle plus
    /// whether it was reused.
    pub fn load_or_build(
        &self,
        label: &CorpusLabel,
        model: &ModelSpec,
        ids: &[String],
        vectors: &[Vec<f32>],
        rebuild: bool,
    ) -> CognateResult<(IndexHandle, bool)> {
        let current_tag = vector_set_hash(ids, vectors);

        if !rebuild {
            match self.try_load(label, model) {
                Ok(Some(stored)) if stored.tag() == current_tag => {
                    debug!(corpus = %label, model = %model.id, "index reused");
                    return Ok((stored, true));
                }
                Ok(Some(_)) => {
                    info!(corpus = %label, model = %model.id, "index stale, rebuilding");
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(corpus = %label, model = %model.id, error = %e, "stored index unreadable, rebuilding");
                }
            }
        }

        let handle = IndexHandle::build(&model.id, ids.to_vec(), vectors.to_vec())?;
        self.persist(label, model, &handle)?;
        info!(
            corpus = %label,
            model = %model.id,
            entries = handle.len(),
            "index built"
        );
        Ok((handle, false))
    }

    fn try_load(&self, label: &CorpusLabel, model: &ModelSpec) -> CognateResult<Option<IndexHandle>> {
        let dir = self.dir(label, model);
        let meta_path = dir.join("meta.json");
        let bin_path = dir.join("index.bin");
        if !meta_path.exists() || !bin_path.exists() {
            return Ok(None);
        }

        let meta: IndexMeta = serde_json::from_slice(&fs::read(&meta_path)?).map_err(|e| {
            IndexError::CorruptIndex {
                path: meta_path.display().to_string(),
                reason: e.to_string(),
            }
        })?;

        let data = fs::read(&bin_path)?;
        if data.len() < 8 {
            return Err(IndexError::CorruptIndex {
                path: bin_path.display().to_string(),
                reason: "file too small for header".to_string(),
            }
            .into());
        }
        let count = u32::from_le_bytes([data[0], data[1], data[2], data[3]]) as usize;
        let dims = u32::from_le_bytes([data[4], data[5], data[6], data[7]]) as usize;
        if count != meta.count || dims != meta.dims || meta.ids.len() != count {
            return Err(IndexError::CorruptIndex {
                path: bin_path.display().to_string(),
                reason: "header disagrees with meta".to_string(),
            }
            .into());
        }
        let expected = 8 + count * dims * 4;
        if data.len() != expected {
            return Err(IndexError::CorruptIndex {
                path: bin_path.display().to_string(),
                reason: format!("expected {expected} bytes, found {}", data.len()),
            }
            .into());
        }

        let mut vectors = Vec::with_capacity(count);
        for i in 0..count {
            let offset = 8 + i * dims * 4;
            let mut vector = Vec::with_capacity(dims);
            for j in 0..dims {
                let at = offset + j * 4;
                vector.push(f32::from_le_bytes([
                    data[at],
                    data[at + 1],
                    data[at + 2],
                    data[at + 3],
                ]));
            }
            vectors.push(vector);
        }

        let handle = IndexHandle::build(&meta.model_id, meta.ids, vectors)?;
        if handle.tag() != meta.tag {
            return Err(IndexError::CorruptIndex {
                path: bin_path.display().to_string(),
                reason: "stored tag does not match stored vectors".to_string(),
            }
            .into());
        }
        Ok(Some(handle))
    }

    /// Persist atomically: temp siblings, then rename both files.
    fn persist(
        &self,
        label: &CorpusLabel,
        model: &ModelSpec,
        handle: &IndexHandle,
    ) -> CognateResult<()> {
        let dir = self.dir(label, model);
        fs::create_dir_all(&dir).map_err(|e| IndexError::PersistFailed {
            path: dir.display().to_string(),
            reason: e.to_string(),
        })?;

        let count = handle.len();
        let dims = handle.dims();
        let mut data = Vec::with_capacity(8 + count * dims * 4);
        data.extend_from_slice(&(count as u32).to_le_bytes());
        data.extend_from_slice(&(dims as u32).to_le_bytes());
        for vector in handle.vectors() {
            for value in vector {
                data.extend_from_slice(&value.to_le_bytes());
            }
        }

        let meta = IndexMeta {
            model_id: handle.model_id().to_string(),
            dims,
            count,
            tag: handle.tag().to_string(),
            ids: handle.ids().to_vec(),
        };

        let bin_path = dir.join("index.bin");
        let meta_path = dir.join("meta.json");
        let bin_tmp = dir.join("index.bin.tmp");
        let meta_tmp = dir.join("meta.json.tmp");

        fs::write(&bin_tmp, &data).map_err(|e| IndexError::PersistFailed {
            path: bin_tmp.display().to_string(),
            reason: e.to_string(),
        })?;
        fs::write(&meta_tmp, serde_json::to_vec(&meta)?).map_err(|e| {
            IndexError::PersistFailed {
                path: meta_tmp.display().to_string(),
                reason: e.to_string(),
            }
        })?;
        fs::rename(&bin_tmp, &bin_path).map_err(|e| IndexError::PersistFailed {
            path: bin_path.display().to_string(),
            reason: e.to_string(),
        })?;
        fs::rename(&meta_tmp, &meta_path).map_err(|e| IndexError::PersistFailed {
            path: meta_path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(())
    }
}
