//! # cognate-embeddings
//!
//! Embedding computation for lexeme corpora: pluggable backends (local
//! ONNX inference, remote HTTP API), deterministic per-model text
//! selection, and a content-addressed vector cache with an in-memory hot
//! tier and atomic on-disk persistence.

pub mod backends;
pub mod cache;
pub mod estimate;
pub mod provider;
pub mod text;

pub use backends::create_backend;
pub use cache::{CacheCounts, CacheKey, HotCache, VectorStore};
pub use provider::EmbeddingProvider;
pub use text::{form_text, meaning_text, text_for_model, SelectedText};
