//! # cognate-index
//!
//! Flat cosine nearest-neighbor indexes, one per (corpus, model) pair.
//! Build order is deterministic (ascending record id) so similarity ties
//! break identically across runs. Each index carries the hash of its
//! vector set; the store reuses a persisted index only while that tag
//! matches the current vectors.

mod index;
mod store;

pub use index::{vector_set_hash, IndexHandle, QueryHit};
pub use store::{IndexCounts, IndexStore};
