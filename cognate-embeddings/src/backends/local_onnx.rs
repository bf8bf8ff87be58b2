//! Local ONNX inference backend.
//!
//! Loads one ONNX model file per configured model id from `model_dir`
//! (`<model_dir>/<model>.onnx`), lazily on first use. Inference output is
//! mean-pooled, L2-normalized, and padded/truncated to the configured
//! dimensionality.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use ort::session::Session;
use ort::value::Tensor;
use tracing::debug;

use cognate_core::errors::{CognateResult, EmbeddingError};
use cognate_core::EmbeddingBackend;

/// ONNX-based embedding backend.
pub struct LocalBackend {
    model_dir: PathBuf,
    dimensions: usize,
    device: String,
    /// Session requires `&mut self` for `run`, so sessions live behind a
    /// Mutex to satisfy the `&self` trait contract.
    sessions: Mutex<HashMap<String, Session>>,
}

// Safety: Session is Send but not Sync; the Mutex provides Sync.
unsafe impl Sync for LocalBackend {}

impl LocalBackend {
    pub fn new(model_dir: PathBuf, dimensions: usize, device: &str) -> Self {
        Self {
            model_dir,
            dimensions,
            device: device.to_string(),
            sessions: Mutex::new(HashMap::new()),
        }
    }

    fn model_path(&self, model_id: &str) -> PathBuf {
        let file: String = model_id
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '.' { c } else { '_' })
            .collect();
        self.model_dir.join(format!("{file}.onnx"))
    }

    fn load_session(&self, model_id: &str) -> CognateResult<Session> {
        let path = self.model_path(model_id);
        if !path.exists() {
            return Err(EmbeddingError::ModelLoadFailed {
                path: path.display().to_string(),
                reason: "model file not found".to_string(),
            }
            .into());
        }

        let session = Session::builder()
            .map_err(|e| EmbeddingError::ModelLoadFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?
            .with_intra_threads(2)
            .map_err(|e| EmbeddingError::ModelLoadFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?
            .commit_from_file(&path)
            .map_err(|e| EmbeddingError::ModelLoadFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        debug!(model = model_id, device = %self.device, "ONNX model loaded");
        Ok(session)
    }

    /// Run inference on a single text.
    fn infer(&self, session: &mut Session, text: &str) -> CognateResult<Vec<f32>> {
        let token_ids = Self::simple_tokenize(text);
        let seq_len = token_ids.len();

        let input_ids: Vec<i64> = token_ids.iter().map(|&id| id as i64).collect();
        let attention_mask: Vec<i64> = vec![1i64; seq_len];

        let ids_tensor =
            Tensor::from_array((vec![1i64, seq_len as i64], input_ids)).map_err(|e| {
                EmbeddingError::InferenceFailed {
                    reason: format!("tensor creation error: {e}"),
                }
            })?;
        let mask_tensor =
            Tensor::from_array((vec![1i64, seq_len as i64], attention_mask)).map_err(|e| {
                EmbeddingError::InferenceFailed {
                    reason: format!("tensor creation error: {e}"),
                }
            })?;

        let outputs = session
            .run(ort::inputs![ids_tensor, mask_tensor])
            .map_err(|e| EmbeddingError::InferenceFailed {
                reason: e.to_string(),
            })?;

        let (_name, output) =
            outputs
                .iter()
                .next()
                .ok_or_else(|| EmbeddingError::InferenceFailed {
                    reason: "no output tensor".to_string(),
                })?;

        let (shape, data) =
            output
                .try_extract_tensor::<f32>()
                .map_err(|e| EmbeddingError::InferenceFailed {
                    reason: format!("tensor extraction failed: {e}"),
                })?;

        // Mean pool across the sequence dimension.
        let embedding = if shape.len() == 3 {
            // [batch=1, seq, dims]
            let seq = shape[1] as usize;
            let dims = shape[2] as usize;
            let mut pooled = vec![0.0f32; dims];
            for s in 0..seq {
                for d in 0..dims {
                    pooled[d] += data[s * dims + d];
                }
            }
            for v in &mut pooled {
                *v /= seq as f32;
            }
            pooled
        } else if shape.len() == 2 {
            // [batch=1, dims] — already pooled.
            let dims = shape[1] as usize;
            data[..dims].to_vec()
        } else {
            return Err(EmbeddingError::InferenceFailed {
                reason: format!("unexpected output shape: {shape:?}"),
            }
            .into());
        };

        let mut result = embedding;
        crate::provider::l2_normalize(&mut result);
        result.resize(self.dimensions, 0.0);
        Ok(result)
    }

    /// Simple tokenizer: split on non-alphanumerics, hash to vocab range.
    fn simple_tokenize(text: &str) -> Vec<u32> {
        if text.is_empty() {
            return vec![101, 102]; // [CLS] [SEP]
        }
        let mut ids = vec![101u32]; // [CLS]
        for word in text.split(|c: char| !c.is_alphanumeric() && c != '_') {
            if word.is_empty() {
                continue;
            }
            let mut h: u32 = 0x811c9dc5;
            for b in word.to_lowercase().as_bytes() {
                h ^= *b as u32;
                h = h.wrapping_mul(0x01000193);
            }
            ids.push(1 + (h % 29999));
        }
        ids.push(102); // [SEP]
        ids
    }
}

impl EmbeddingBackend for LocalBackend {
    fn embed_batch(&self, model_id: &str, texts: &[String]) -> CognateResult<Vec<Vec<f32>>> {
        let mut sessions = self.sessions.lock().map_err(|_| {
            EmbeddingError::InferenceFailed {
                reason: "session lock poisoned".to_string(),
            }
        })?;

        let session = match sessions.entry(model_id.to_string()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(slot) => slot.insert(self.load_session(model_id)?),
        };

        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            vectors.push(self.infer(session, text)?);
        }
        Ok(vectors)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "local-onnx"
    }

    fn is_available(&self) -> bool {
        self.model_dir.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_is_deterministic_and_bracketed() {
        let a = LocalBackend::simple_tokenize("kitab book");
        let b = LocalBackend::simple_tokenize("kitab book");
        assert_eq!(a, b);
        assert_eq!(a.first(), Some(&101));
        assert_eq!(a.last(), Some(&102));
    }

    #[test]
    fn empty_text_tokenizes_to_markers() {
        assert_eq!(LocalBackend::simple_tokenize(""), vec![101, 102]);
    }

    #[test]
    fn missing_model_file_is_load_failure() {
        let backend = LocalBackend::new(PathBuf::from("/nonexistent-models"), 64, "cpu");
        let err = backend
            .embed_batch("BAAI/bge-m3", &["text".to_string()])
            .unwrap_err();
        assert!(err.to_string().contains("model file not found"));
    }

    #[test]
    fn model_path_is_sanitized() {
        let backend = LocalBackend::new(PathBuf::from("models"), 64, "cpu");
        assert_eq!(
            backend.model_path("BAAI/bge-m3"),
            PathBuf::from("models/BAAI_bge-m3.onnx")
        );
    }
}
