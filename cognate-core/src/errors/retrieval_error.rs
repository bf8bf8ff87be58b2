/// Retrieval and output errors.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("no vector for source record {id} under model {model}")]
    MissingSourceVector { id: String, model: String },

    #[error("failed to write leads: {reason}")]
    WriteFailed { reason: String },

    #[error("run aborted: {reason}")]
    Aborted { reason: String },
}
