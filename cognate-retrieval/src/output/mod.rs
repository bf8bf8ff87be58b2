//! Lead output: record shapes, the append-only JSONL writer, and the run
//! manifest.

mod lead;
mod manifest;
mod writer;

pub use lead::{LeadRecord, RetrievalScores};
pub use manifest::{CorpusManifest, RunManifest};
pub use writer::{write_manifest, LeadWriter};
