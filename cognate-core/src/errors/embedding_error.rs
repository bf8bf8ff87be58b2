/// Embedding provider and cache errors.
#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    /// The backend cannot be reached. Retried with bounded backoff before
    /// becoming a run-level failure.
    #[error("embedding backend {backend} unavailable: {reason}")]
    BackendUnavailable { backend: String, reason: String },

    #[error("failed to load model from {path}: {reason}")]
    ModelLoadFailed { path: String, reason: String },

    #[error("inference failed: {reason}")]
    InferenceFailed { reason: String },

    /// A cached vector failed hash verification. Self-healed by
    /// recomputation; carried here for accounting.
    #[error("cache entry {hash} failed verification")]
    CacheCorruption { hash: String },

    #[error("expected {expected}-dim vector, backend returned {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("cache store error at {path}: {reason}")]
    CacheStore { path: String, reason: String },
}
