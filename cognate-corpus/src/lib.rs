//! # cognate-corpus
//!
//! Turns validated JSONL lexeme rows into ordered, immutable
//! [`CorpusHandle`]s with stable ids. Malformed rows are skipped and
//! counted, never silently merged.
//!
//! [`CorpusHandle`]: cognate_core::CorpusHandle

mod loader;
mod selector;

pub use loader::{load_jsonl_path, load_records, load_reader, LoadedCorpus};
pub use selector::CorpusSelector;
