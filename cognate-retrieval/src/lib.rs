//! # cognate-retrieval
//!
//! The top of the pipeline: per-source multi-model retrieval against
//! target indexes, candidate merging and capping, hybrid scoring, and
//! streamed lead output with a reproducibility manifest.

pub mod engine;
pub mod orchestrator;
pub mod output;

pub use engine::{CorpusInput, DiscoveryEngine, RunReport};
pub use orchestrator::{gather_candidates, CandidatePair, ModelQuery};
pub use output::{
    write_manifest, CorpusManifest, LeadRecord, LeadWriter, RetrievalScores, RunManifest,
};
