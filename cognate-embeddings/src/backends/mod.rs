//! Embedding backends.
//!
//! Two variants behind the [`EmbeddingBackend`] trait: local ONNX
//! inference and a remote embedding API. Selection happens here, from
//! configuration, so no caller ever inspects the concrete type.

mod local_onnx;
mod remote_api;

pub use local_onnx::LocalBackend;
pub use remote_api::RemoteApiBackend;

use cognate_core::errors::CognateResult;
use cognate_core::{BackendChoice, EmbeddingBackend, EmbeddingConfig};
use tracing::info;

/// Build the backend named by the configuration.
pub fn create_backend(config: &EmbeddingConfig) -> CognateResult<Box<dyn EmbeddingBackend>> {
    let backend: Box<dyn EmbeddingBackend> = match &config.backend {
        BackendChoice::Local { model_dir } => Box::new(LocalBackend::new(
            model_dir.clone(),
            config.dimensions,
            &config.device,
        )),
        BackendChoice::Remote { endpoint } => {
            Box::new(RemoteApiBackend::new(endpoint.clone(), config.dimensions))
        }
    };
    info!(backend = backend.name(), dims = config.dimensions, "embedding backend selected");
    Ok(backend)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn local_choice_builds_local_backend() {
        let config = EmbeddingConfig {
            backend: BackendChoice::Local {
                model_dir: PathBuf::from("models"),
            },
            ..Default::default()
        };
        let backend = create_backend(&config).unwrap();
        assert_eq!(backend.name(), "local-onnx");
    }

    #[test]
    fn remote_choice_builds_remote_backend() {
        let config = EmbeddingConfig {
            backend: BackendChoice::Remote {
                endpoint: "http://localhost:9090/embed".to_string(),
            },
            ..Default::default()
        };
        let backend = create_backend(&config).unwrap();
        assert_eq!(backend.name(), "remote-api");
    }
}
