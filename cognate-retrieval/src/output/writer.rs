//! Append-only JSONL lead writer.
//!
//! Leads are emitted per source record: sorted by combined score
//! descending (ties by ascending target id), truncated to `max_out`,
//! then appended. The writer never seeks backward, so an aborted run
//! leaves a valid prefix and a rerun is idempotent per source record.

use std::io::Write;

use tracing::debug;

use cognate_core::errors::{CognateResult, RetrievalError};

use super::{LeadRecord, RunManifest};

/// Streams ranked leads to an output sink.
pub struct LeadWriter<W: Write> {
    sink: W,
    written: u64,
}

impl<W: Write> LeadWriter<W> {
    pub fn new(sink: W) -> Self {
        Self { sink, written: 0 }
    }

    /// Total leads written so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Rank, cap, and append one source record's leads.
    pub fn emit(&mut self, mut leads: Vec<LeadRecord>, max_out: usize) -> CognateResult<usize> {
        leads.sort_by(|a, b| {
            b.hybrid
                .combined
                .partial_cmp(&a.hybrid.combined)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.target.id.cmp(&b.target.id))
        });
        leads.truncate(max_out);

        for lead in &leads {
            let line = serde_json::to_string(lead)?;
            self.sink
                .write_all(line.as_bytes())
                .and_then(|_| self.sink.write_all(b"\n"))
                .map_err(|e| RetrievalError::WriteFailed {
                    reason: e.to_string(),
                })?;
        }
        self.written += leads.len() as u64;
        debug!(count = leads.len(), "leads emitted for source record");
        Ok(leads.len())
    }

    /// Flush the sink and return it.
    pub fn finish(mut self) -> CognateResult<W> {
        self.sink.flush().map_err(|e| RetrievalError::WriteFailed {
            reason: e.to_string(),
        })?;
        Ok(self.sink)
    }
}

/// Serialize the run manifest as pretty JSON to a sink.
pub fn write_manifest<W: Write>(manifest: &RunManifest, mut sink: W) -> CognateResult<()> {
    let json = serde_json::to_string_pretty(manifest)?;
    sink.write_all(json.as_bytes())
        .and_then(|_| sink.write_all(b"\n"))
        .map_err(|e| {
            RetrievalError::WriteFailed {
                reason: e.to_string(),
            }
            .into()
        })
}
