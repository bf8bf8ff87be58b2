//! # cognate-core
//!
//! Foundation crate for the cognate lead-discovery engine.
//! Defines the lexeme data model, errors, config, traits, constants,
//! and language-family metadata. Every other crate in the workspace
//! depends on this.

pub mod config;
pub mod constants;
pub mod corpus;
pub mod errors;
pub mod family;
pub mod lexeme;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::{
    BackendChoice, DiscoveryConfig, EmbeddingConfig, HybridWeights, ModelKind, ModelSpec,
    RetrievalConfig,
};
pub use corpus::{CorpusHandle, CorpusLabel};
pub use errors::{CognateError, CognateResult};
pub use lexeme::LexemeRecord;
pub use traits::EmbeddingBackend;
