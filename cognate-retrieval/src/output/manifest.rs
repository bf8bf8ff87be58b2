//! The run manifest — everything needed to reproduce or audit a run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cognate_core::{HybridWeights, ModelSpec};
use cognate_embeddings::CacheCounts;
use cognate_index::IndexCounts;

/// One corpus as it entered the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusManifest {
    pub label: String,
    /// "source" or "target".
    pub role: String,
    pub content_hash: String,
    pub records: usize,
    pub rows_skipped: usize,
}

/// The reproducibility record written once per run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    pub run_id: String,
    pub created_at: DateTime<Utc>,
    pub engine_version: String,
    pub backend: String,
    pub models: Vec<ModelSpec>,
    pub weights: HybridWeights,
    pub top_k: usize,
    pub max_out: usize,
    pub corpora: Vec<CorpusManifest>,
    pub cache: CacheCounts,
    pub indexes: IndexCounts,
    pub leads_emitted: u64,
    /// Pairs dropped for carrying zero usable signals.
    pub insufficient_signal: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pair_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_group: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_round_trips() {
        let manifest = RunManifest {
            run_id: "run-1".to_string(),
            created_at: Utc::now(),
            engine_version: cognate_core::constants::VERSION.to_string(),
            backend: "local-onnx".to_string(),
            models: vec![ModelSpec::default_semantic(), ModelSpec::default_form()],
            weights: HybridWeights::default(),
            top_k: 200,
            max_out: 200,
            corpora: vec![CorpusManifest {
                label: "ara:classical".to_string(),
                role: "source".to_string(),
                content_hash: "abc".to_string(),
                records: 10,
                rows_skipped: 2,
            }],
            cache: CacheCounts {
                hits: 9,
                misses: 1,
                corruptions: 0,
            },
            indexes: IndexCounts { built: 2, reused: 0 },
            leads_emitted: 40,
            insufficient_signal: 0,
            pair_id: None,
            language_group: Some("semitic".to_string()),
        };

        let json = serde_json::to_string_pretty(&manifest).unwrap();
        let parsed: RunManifest = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, manifest);
    }
}
