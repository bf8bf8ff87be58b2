/// Vector index errors.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("index build failed: {reason}")]
    BuildFailed { reason: String },

    #[error("query vector has {actual} dims, index expects {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("failed to persist index at {path}: {reason}")]
    PersistFailed { path: String, reason: String },

    /// A stored index file is unreadable or inconsistent. Triggers a
    /// rebuild rather than a run failure.
    #[error("stored index at {path} is corrupt: {reason}")]
    CorruptIndex { path: String, reason: String },
}
