/// Corpus loading errors.
#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    /// A malformed input row. Recovered by the loader (skip + count);
    /// only surfaced directly when a caller validates a single record.
    #[error("schema violation at line {line}: {reason}")]
    SchemaViolation { line: usize, reason: String },

    #[error("failed to read corpus {path}: {reason}")]
    ReadFailed { path: String, reason: String },

    #[error("invalid corpus selector {input:?}: {reason}")]
    InvalidSelector { input: String, reason: String },

    #[error("corpus {label} contains no valid rows")]
    EmptyCorpus { label: String },
}
