//! Candidate retrieval and merging.
//!
//! For one source record: one top-K query per (model, target corpus),
//! merged into a map keyed by (target corpus, target id) that records
//! which models hit and with what score. No fusion happens here — the
//! scorer owns that.

use std::collections::HashMap;

use cognate_core::errors::CognateResult;
use cognate_core::{CorpusLabel, ModelKind};
use cognate_index::IndexHandle;

/// One pending index query for a source record: the model that produced
/// the source vector, the target corpus, and its index.
pub struct ModelQuery<'a> {
    pub kind: ModelKind,
    pub target: &'a CorpusLabel,
    pub index: &'a IndexHandle,
    pub source_vector: &'a [f32],
}

/// A merged candidate: (source, target) plus per-model retrieval scores.
/// At least one score is always present.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidatePair {
    pub source_id: String,
    pub target_corpus: CorpusLabel,
    pub target_id: String,
    pub semantic: Option<f32>,
    pub form: Option<f32>,
}

impl CandidatePair {
    /// Best available retrieval score — the pre-fusion ranking key.
    pub fn best_score(&self) -> f32 {
        match (self.semantic, self.form) {
            (Some(s), Some(f)) => s.max(f),
            (Some(s), None) => s,
            (None, Some(f)) => f,
            (None, None) => f32::NEG_INFINITY,
        }
    }

    /// Which model kinds retrieved this pair, in a fixed order.
    pub fn retrieved_by(&self) -> Vec<&'static str> {
        let mut models = Vec::with_capacity(2);
        if self.semantic.is_some() {
            models.push(ModelKind::Semantic.as_str());
        }
        if self.form.is_some() {
            models.push(ModelKind::Form.as_str());
        }
        models
    }
}

/// Run every query for one source record and merge the hits.
///
/// Output is capped at `max_out` pairs selected by best available score,
/// ties broken by ascending target id (then target corpus, for full
/// determinism across multi-target runs). When several models of the
/// same kind hit a pair, the highest score wins.
pub fn gather_candidates(
    source_id: &str,
    queries: &[ModelQuery<'_>],
    top_k: usize,
    max_out: usize,
) -> CognateResult<Vec<CandidatePair>> {
    let mut merged: HashMap<(String, String), CandidatePair> = HashMap::new();

    for query in queries {
        let hits = query.index.query(query.source_vector, top_k)?;
        for hit in hits {
            let key = (query.target.to_string(), hit.record_id.clone());
            let entry = merged.entry(key).or_insert_with(|| CandidatePair {
                source_id: source_id.to_string(),
                target_corpus: query.target.clone(),
                target_id: hit.record_id.clone(),
                semantic: None,
                form: None,
            });
            let slot = match query.kind {
                ModelKind::Semantic => &mut entry.semantic,
                ModelKind::Form => &mut entry.form,
            };
            *slot = Some(match *slot {
                Some(existing) => existing.max(hit.similarity),
                None => hit.similarity,
            });
        }
    }

    let mut candidates: Vec<CandidatePair> = merged.into_values().collect();
    candidates.sort_by(|a, b| {
        b.best_score()
            .partial_cmp(&a.best_score())
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.target_id.cmp(&b.target_id))
            .then_with(|| a.target_corpus.to_string().cmp(&b.target_corpus.to_string()))
    });
    candidates.truncate(max_out);
    Ok(candidates)
}
