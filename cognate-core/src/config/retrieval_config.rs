use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants;

/// Retrieval orchestration configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Candidates retrieved per (model, target corpus) query.
    pub top_k: usize,
    /// Maximum leads emitted per source record.
    pub max_out: usize,
    /// Root of the persisted index cache.
    pub index_dir: PathBuf,
    /// Rebuild indexes even when the stored vector-set tag matches.
    pub rebuild_index: bool,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: constants::DEFAULT_TOP_K,
            max_out: constants::DEFAULT_MAX_OUT,
            index_dir: PathBuf::from("cache/indexes"),
            rebuild_index: false,
        }
    }
}
