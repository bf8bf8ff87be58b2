//! The lead record — one ranked candidate pair, as written to output.

use serde::{Deserialize, Serialize};

use cognate_core::LexemeRecord;
use cognate_scoring::{Category, HybridScore};

/// Raw retrieval scores carried by a lead. At least one is present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RetrievalScores {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semantic: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form: Option<f32>,
}

/// One lead, serialized as one JSONL line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadRecord {
    pub run_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pair_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_group: Option<String>,
    pub source: LexemeRecord,
    pub target: LexemeRecord,
    pub scores: RetrievalScores,
    pub retrieved_by: Vec<String>,
    pub hybrid: HybridScore,
    pub category: Category,
}
