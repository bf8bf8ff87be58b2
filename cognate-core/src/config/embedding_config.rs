use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants;

/// Which retrieval signal a model produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    /// Meaning-based retrieval over gloss/definition text.
    Semantic,
    /// Character/byte-level retrieval over surface-form text.
    Form,
}

impl ModelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::Semantic => "semantic",
            ModelKind::Form => "form",
        }
    }
}

/// One retrieval model: identity, version, and signal kind.
///
/// The (id, version) pair participates in every cache key, so bumping
/// the version invalidates cached vectors without touching the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelSpec {
    pub id: String,
    pub version: String,
    pub kind: ModelKind,
}

impl ModelSpec {
    pub fn new(id: impl Into<String>, version: impl Into<String>, kind: ModelKind) -> Self {
        Self {
            id: id.into(),
            version: version.into(),
            kind,
        }
    }

    /// Default multilingual semantic model.
    pub fn default_semantic() -> Self {
        Self::new("BAAI/bge-m3", "1", ModelKind::Semantic)
    }

    /// Default byte-level form model.
    pub fn default_form() -> Self {
        Self::new("google/byt5-small", "1", ModelKind::Form)
    }
}

/// Backend selection. Callers pick a variant via configuration; no code
/// path inspects the concrete backend type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BackendChoice {
    /// Local ONNX inference. `model_dir` holds one `<model>.onnx` per
    /// configured model id.
    Local { model_dir: PathBuf },
    /// Remote embedding API speaking `POST {model, texts} -> {embeddings}`.
    Remote { endpoint: String },
}

impl Default for BackendChoice {
    fn default() -> Self {
        BackendChoice::Local {
            model_dir: PathBuf::from("models"),
        }
    }
}

/// Embedding provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub backend: BackendChoice,
    /// Output dimensionality every backend must produce.
    pub dimensions: usize,
    /// Inference device hint for the local backend ("cpu", "cuda:0", ...).
    pub device: String,
    /// Texts per backend call.
    pub batch_size: usize,
    /// Root of the content-addressed vector store.
    pub cache_dir: PathBuf,
    /// Entry capacity of the in-memory hot tier.
    pub hot_cache_entries: u64,
    /// Recompute vectors even when cached.
    pub rebuild_cache: bool,
    /// Attempts against an unreachable backend before the run fails.
    pub max_retries: u32,
    /// Base delay for exponential backoff (milliseconds).
    pub retry_base_ms: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            backend: BackendChoice::default(),
            dimensions: constants::DEFAULT_DIMENSIONS,
            device: "cpu".to_string(),
            batch_size: 16,
            cache_dir: PathBuf::from("cache/embeddings"),
            hot_cache_entries: constants::DEFAULT_HOT_CACHE_ENTRIES,
            rebuild_cache: false,
            max_retries: constants::DEFAULT_MAX_RETRIES,
            retry_base_ms: constants::DEFAULT_RETRY_BASE_MS,
        }
    }
}
