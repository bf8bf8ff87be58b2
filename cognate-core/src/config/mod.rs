//! Resolved run configuration.
//!
//! The engine entry point accepts a fully resolved [`DiscoveryConfig`];
//! interactive collection, environment lookup, and CLI parsing all happen
//! in the calling layer.

mod embedding_config;
mod retrieval_config;
mod weights;

pub use embedding_config::{BackendChoice, EmbeddingConfig, ModelKind, ModelSpec};
pub use retrieval_config::RetrievalConfig;
pub use weights::HybridWeights;

use serde::{Deserialize, Serialize};

use crate::errors::{CognateError, CognateResult};

/// Complete configuration for one discovery run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Retrieval models to run. Defaults to one semantic + one form model.
    pub models: Vec<ModelSpec>,
    pub embedding: EmbeddingConfig,
    pub retrieval: RetrievalConfig,
    pub weights: HybridWeights,
    /// Limit rows loaded per corpus (0 = no limit). Sampling aid.
    pub limit: usize,
    /// Optional run label (e.g. "ara_vs_eng_modern").
    pub pair_id: Option<String>,
    /// Optional grouping label (e.g. "semitic").
    pub language_group: Option<String>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            models: vec![ModelSpec::default_semantic(), ModelSpec::default_form()],
            embedding: EmbeddingConfig::default(),
            retrieval: RetrievalConfig::default(),
            weights: HybridWeights::default(),
            limit: 0,
            pair_id: None,
            language_group: None,
        }
    }
}

impl DiscoveryConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml(text: &str) -> CognateResult<Self> {
        toml::from_str(text).map_err(|e| CognateError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_has_two_models() {
        let config = DiscoveryConfig::default();
        assert_eq!(config.models.len(), 2);
        assert!(config.models.iter().any(|m| m.kind == ModelKind::Semantic));
        assert!(config.models.iter().any(|m| m.kind == ModelKind::Form));
    }

    #[test]
    fn toml_roundtrip() {
        let config = DiscoveryConfig::default();
        let text = toml::to_string(&config).unwrap();
        let back = DiscoveryConfig::from_toml(&text).unwrap();
        assert_eq!(back.models.len(), config.models.len());
        assert_eq!(back.retrieval.top_k, config.retrieval.top_k);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config = DiscoveryConfig::from_toml("limit = 50\n").unwrap();
        assert_eq!(config.limit, 50);
        assert_eq!(config.retrieval.top_k, crate::constants::DEFAULT_TOP_K);
    }

    #[test]
    fn invalid_toml_is_an_error() {
        assert!(DiscoveryConfig::from_toml("limit = \"not a number\"").is_err());
    }
}
