//! Error types for every subsystem, unified under [`CognateError`].
//!
//! Row- and pair-level faults are recovered where they occur and surface
//! only as aggregate counts; the variants here are the failures that
//! actually propagate.

mod corpus_error;
mod embedding_error;
mod index_error;
mod retrieval_error;

pub use corpus_error::CorpusError;
pub use embedding_error::EmbeddingError;
pub use index_error::IndexError;
pub use retrieval_error::RetrievalError;

/// Top-level error for the cognate workspace.
#[derive(Debug, thiserror::Error)]
pub enum CognateError {
    #[error(transparent)]
    Corpus(#[from] CorpusError),

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used across the workspace.
pub type CognateResult<T> = Result<T, CognateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subsystem_errors_convert() {
        let err: CognateError = CorpusError::SchemaViolation {
            line: 3,
            reason: "missing id".to_string(),
        }
        .into();
        assert!(matches!(err, CognateError::Corpus(_)));

        let err: CognateError = EmbeddingError::BackendUnavailable {
            backend: "remote".to_string(),
            reason: "connection refused".to_string(),
        }
        .into();
        assert!(matches!(err, CognateError::Embedding(_)));
    }

    #[test]
    fn messages_are_descriptive() {
        let err = EmbeddingError::CacheCorruption {
            hash: "abc123".to_string(),
        };
        assert!(err.to_string().contains("abc123"));
    }
}
