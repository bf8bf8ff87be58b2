//! DiscoveryEngine — the core entry point.
//!
//! Accepts a fully resolved [`DiscoveryConfig`] plus loaded corpora and
//! runs embed → index → retrieve → score → write. Source records are
//! independent units of work: scoring runs across a rayon pool, output is
//! assembled in corpus order so identical inputs always produce
//! byte-identical output.

use std::collections::HashMap;
use std::io::Write;

use chrono::Utc;
use rayon::prelude::*;
use tracing::{debug, info};
use uuid::Uuid;

use cognate_core::constants::VERSION;
use cognate_core::errors::{CognateResult, RetrievalError};
use cognate_core::{CorpusHandle, DiscoveryConfig, HybridWeights, LexemeRecord, ModelSpec};
use cognate_embeddings::{create_backend, EmbeddingProvider, VectorStore};
use cognate_index::{IndexCounts, IndexHandle, IndexStore};
use cognate_scoring::{score_pair, Category};

use crate::orchestrator::{gather_candidates, ModelQuery};
use crate::output::{CorpusManifest, LeadRecord, LeadWriter, RetrievalScores, RunManifest};

/// Sources are processed in batches of this many records so parallel
/// scoring never holds more than one batch of leads in memory.
const SOURCE_BATCH: usize = 256;

/// A loaded corpus plus its loader accounting, as handed to the engine.
#[derive(Debug)]
pub struct CorpusInput {
    pub corpus: CorpusHandle,
    pub rows_skipped: usize,
}

impl CorpusInput {
    pub fn new(corpus: CorpusHandle) -> Self {
        Self {
            corpus,
            rows_skipped: 0,
        }
    }

    pub fn with_skipped(corpus: CorpusHandle, rows_skipped: usize) -> Self {
        Self {
            corpus,
            rows_skipped,
        }
    }
}

/// What a completed run reports back to the caller.
#[derive(Debug)]
pub struct RunReport {
    pub manifest: RunManifest,
}

struct TargetIndex<'a> {
    model: &'a ModelSpec,
    input: &'a CorpusInput,
    index: IndexHandle,
}

/// The discovery engine. Collaborators are injected so tests can swap in
/// an in-memory backend and isolated cache directories.
pub struct DiscoveryEngine {
    config: DiscoveryConfig,
    provider: EmbeddingProvider,
    index_store: IndexStore,
}

impl DiscoveryEngine {
    pub fn new(
        config: DiscoveryConfig,
        provider: EmbeddingProvider,
        index_store: IndexStore,
    ) -> Self {
        Self {
            config,
            provider,
            index_store,
        }
    }

    /// Build an engine entirely from configuration: backend, vector
    /// store, and index store all come from the config's paths.
    pub fn from_config(config: DiscoveryConfig) -> CognateResult<Self> {
        let backend = create_backend(&config.embedding)?;
        let store = VectorStore::new(config.embedding.cache_dir.clone());
        let provider = EmbeddingProvider::new(config.embedding.clone(), backend, store);
        let index_store = IndexStore::new(config.retrieval.index_dir.clone());
        Ok(Self::new(config, provider, index_store))
    }

    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    /// Run discovery for one source corpus against a set of targets,
    /// streaming leads to `sink`.
    pub fn run<W: Write>(
        &self,
        source: &CorpusInput,
        targets: &[CorpusInput],
        sink: W,
    ) -> CognateResult<RunReport> {
        self.run_resuming(source, targets, sink, None)
    }

    /// Like [`run`](Self::run), but skips every source record with id ≤
    /// `resume_after`. Because the writer is append-only and leads are
    /// emitted per source record, appending a resumed run's output to the
    /// aborted run's file yields exactly the output of one full run.
    pub fn run_resuming<W: Write>(
        &self,
        source: &CorpusInput,
        targets: &[CorpusInput],
        sink: W,
        resume_after: Option<&str>,
    ) -> CognateResult<RunReport> {
        let run_id = Uuid::new_v4().to_string();
        info!(
            run_id = %run_id,
            source = %source.corpus.label(),
            targets = targets.len(),
            models = self.config.models.len(),
            "discovery run starting"
        );

        // Stage 1: embed target corpora and build (or reuse) indexes.
        let mut index_counts = IndexCounts::default();
        let mut target_indexes: Vec<TargetIndex<'_>> = Vec::new();
        for model in &self.config.models {
            for input in targets {
                let vectors = self.provider.embed_corpus(&input.corpus, model)?;
                let ids: Vec<String> = input
                    .corpus
                    .records()
                    .iter()
                    .map(|r| r.id.clone())
                    .collect();
                let (index, reused) = self.index_store.load_or_build(
                    input.corpus.label(),
                    model,
                    &ids,
                    &vectors,
                    self.config.retrieval.rebuild_index,
                )?;
                if reused {
                    index_counts.reused += 1;
                } else {
                    index_counts.built += 1;
                }
                target_indexes.push(TargetIndex {
                    model,
                    input,
                    index,
                });
            }
        }

        // Stage 2: embed the source corpus under every model.
        let mut source_vectors: HashMap<String, Vec<Vec<f32>>> = HashMap::new();
        for model in &self.config.models {
            source_vectors.insert(
                model.id.clone(),
                self.provider.embed_corpus(&source.corpus, model)?,
            );
        }

        // Target lookup for scoring.
        let target_map: HashMap<String, &CorpusHandle> = targets
            .iter()
            .map(|t| (t.corpus.label().to_string(), &t.corpus))
            .collect();

        // Stage 3: retrieve, score, and stream per source record.
        let top_k = self.config.retrieval.top_k;
        let max_out = self.config.retrieval.max_out;
        let weights = self.config.weights;
        let pair_id = &self.config.pair_id;
        let language_group = &self.config.language_group;

        let mut writer = LeadWriter::new(sink);
        let mut insufficient: u64 = 0;
        let records = source.corpus.records();

        for (batch_index, batch) in records.chunks(SOURCE_BATCH).enumerate() {
            let base = batch_index * SOURCE_BATCH;
            let scored: Vec<CognateResult<(Vec<LeadRecord>, u64)>> = batch
                .par_iter()
                .enumerate()
                .map(|(offset, record)| {
                    if let Some(done) = resume_after {
                        if record.id.as_str() <= done {
                            return Ok((Vec::new(), 0));
                        }
                    }
                    self.process_source_record(
                        record,
                        base + offset,
                        &target_indexes,
                        &source_vectors,
                        &target_map,
                        &run_id,
                        pair_id,
                        language_group,
                        top_k,
                        max_out,
                        &weights,
                    )
                })
                .collect();

            for result in scored {
                let (leads, dropped) = result?;
                insufficient += dropped;
                if !leads.is_empty() {
                    writer.emit(leads, max_out)?;
                }
            }
            debug!(batch = batch_index, "source batch complete");
        }

        let leads_emitted = writer.written();
        writer.finish()?;

        let mut corpora = vec![CorpusManifest {
            label: source.corpus.label().to_string(),
            role: "source".to_string(),
            content_hash: source.corpus.content_hash().to_string(),
            records: source.corpus.len(),
            rows_skipped: source.rows_skipped,
        }];
        corpora.extend(targets.iter().map(|t| CorpusManifest {
            label: t.corpus.label().to_string(),
            role: "target".to_string(),
            content_hash: t.corpus.content_hash().to_string(),
            records: t.corpus.len(),
            rows_skipped: t.rows_skipped,
        }));

        let manifest = RunManifest {
            run_id,
            created_at: Utc::now(),
            engine_version: VERSION.to_string(),
            backend: self.provider.backend_name().to_string(),
            models: self.config.models.clone(),
            weights,
            top_k,
            max_out,
            corpora,
            cache: self.provider.counts(),
            indexes: index_counts,
            leads_emitted,
            insufficient_signal: insufficient,
            pair_id: self.config.pair_id.clone(),
            language_group: self.config.language_group.clone(),
        };

        info!(
            run_id = %manifest.run_id,
            leads = leads_emitted,
            cache_hit_rate = manifest.cache.hit_rate(),
            insufficient = insufficient,
            "discovery run complete"
        );

        Ok(RunReport { manifest })
    }

    #[allow(clippy::too_many_arguments)]
    fn process_source_record(
        &self,
        record: &LexemeRecord,
        position: usize,
        target_indexes: &[TargetIndex<'_>],
        source_vectors: &HashMap<String, Vec<Vec<f32>>>,
        target_map: &HashMap<String, &CorpusHandle>,
        run_id: &str,
        pair_id: &Option<String>,
        language_group: &Option<String>,
        top_k: usize,
        max_out: usize,
        weights: &HybridWeights,
    ) -> CognateResult<(Vec<LeadRecord>, u64)> {
        let mut queries = Vec::with_capacity(target_indexes.len());
        for target in target_indexes {
            let vectors = source_vectors.get(&target.model.id).ok_or_else(|| {
                RetrievalError::MissingSourceVector {
                    id: record.id.clone(),
                    model: target.model.id.clone(),
                }
            })?;
            queries.push(ModelQuery {
                kind: target.model.kind,
                target: target.input.corpus.label(),
                index: &target.index,
                source_vector: &vectors[position],
            });
        }

        let candidates = gather_candidates(&record.id, &queries, top_k, max_out)?;

        let mut leads = Vec::with_capacity(candidates.len());
        let mut dropped = 0u64;
        for candidate in candidates {
            let Some(target_corpus) = target_map.get(&candidate.target_corpus.to_string()) else {
                continue;
            };
            let Some(target_record) = target_corpus.get(&candidate.target_id) else {
                continue;
            };

            let semantic = candidate.semantic.map(f64::from);
            let form = candidate.form.map(f64::from);
            let Some(category) =
                Category::from_hits(candidate.semantic.is_some(), candidate.form.is_some())
            else {
                dropped += 1;
                continue;
            };

            match score_pair(record, target_record, semantic, form, weights) {
                Some(hybrid) => leads.push(LeadRecord {
                    run_id: run_id.to_string(),
                    pair_id: pair_id.clone(),
                    language_group: language_group.clone(),
                    source: record.clone(),
                    target: target_record.clone(),
                    scores: RetrievalScores {
                        semantic: candidate.semantic,
                        form: candidate.form,
                    },
                    retrieved_by: candidate
                        .retrieved_by()
                        .into_iter()
                        .map(String::from)
                        .collect(),
                    hybrid,
                    category,
                }),
                None => dropped += 1,
            }
        }
        Ok((leads, dropped))
    }
}
