use crate::errors::CognateResult;

/// Embedding computation backend.
///
/// Implementations are selected via [`crate::config::BackendChoice`];
/// callers never branch on the concrete type.
pub trait EmbeddingBackend: Send + Sync {
    /// Embed a batch of texts under the given model id, returning one
    /// L2-normalized vector per input text, in input order.
    fn embed_batch(&self, model_id: &str, texts: &[String]) -> CognateResult<Vec<Vec<f32>>>;

    /// The dimensionality of vectors produced by this backend.
    fn dimensions(&self) -> usize;

    /// Human-readable backend name.
    fn name(&self) -> &str;

    /// Whether this backend is currently reachable.
    fn is_available(&self) -> bool;
}
