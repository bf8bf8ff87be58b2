//! Remote embedding API backend.
//!
//! Speaks a minimal JSON protocol over HTTP:
//! `POST <endpoint> {"model": ..., "texts": [...]}` →
//! `{"embeddings": [[f32, ...], ...]}`.
//! Connectivity failures surface as `BackendUnavailable` so the provider
//! can apply its bounded retry policy.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use cognate_core::errors::{CognateResult, EmbeddingError};
use cognate_core::EmbeddingBackend;

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    texts: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

/// HTTP embedding backend.
pub struct RemoteApiBackend {
    endpoint: String,
    dimensions: usize,
    client: reqwest::blocking::Client,
}

impl RemoteApiBackend {
    pub fn new(endpoint: String, dimensions: usize) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .unwrap_or_default();
        Self {
            endpoint,
            dimensions,
            client,
        }
    }

    fn unavailable(&self, reason: String) -> EmbeddingError {
        EmbeddingError::BackendUnavailable {
            backend: "remote-api".to_string(),
            reason,
        }
    }
}

impl EmbeddingBackend for RemoteApiBackend {
    fn embed_batch(&self, model_id: &str, texts: &[String]) -> CognateResult<Vec<Vec<f32>>> {
        let request = EmbedRequest {
            model: model_id,
            texts,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    self.unavailable(e.to_string())
                } else {
                    EmbeddingError::InferenceFailed {
                        reason: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if status.is_server_error() {
            return Err(self.unavailable(format!("server returned {status}")).into());
        }
        if !status.is_success() {
            return Err(EmbeddingError::InferenceFailed {
                reason: format!("server returned {status}"),
            }
            .into());
        }

        let parsed: EmbedResponse =
            response.json().map_err(|e| EmbeddingError::InferenceFailed {
                reason: format!("malformed response: {e}"),
            })?;

        if parsed.embeddings.len() != texts.len() {
            return Err(EmbeddingError::InferenceFailed {
                reason: format!(
                    "expected {} embeddings, server returned {}",
                    texts.len(),
                    parsed.embeddings.len()
                ),
            }
            .into());
        }

        let mut vectors = parsed.embeddings;
        for vector in &mut vectors {
            crate::provider::l2_normalize(vector);
            vector.resize(self.dimensions, 0.0);
        }
        Ok(vectors)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "remote-api"
    }

    fn is_available(&self) -> bool {
        // Reachability is only knowable by calling; the provider's retry
        // policy owns that concern.
        true
    }
}
