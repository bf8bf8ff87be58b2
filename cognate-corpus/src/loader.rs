//! JSONL corpus loading with per-row schema recovery.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use cognate_core::errors::{CognateResult, CorpusError};
use cognate_core::{CorpusHandle, CorpusLabel, LexemeRecord};

/// A loaded corpus plus its load accounting.
#[derive(Debug)]
pub struct LoadedCorpus {
    pub corpus: CorpusHandle,
    /// Lines read from the input, blank lines excluded.
    pub rows_read: usize,
    /// Rows excluded for schema violations (missing id/lemma, duplicate
    /// id, unparseable JSON).
    pub rows_skipped: usize,
}

/// Raw input row. Upstream field aliases (`ipa_raw`, `gloss_plain`,
/// `definition`) are resolved here, before the canonical record is built.
#[derive(Debug, Default, Deserialize)]
struct RawRow {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    lemma: Option<String>,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    stage: Option<String>,
    #[serde(default)]
    script: Option<String>,
    #[serde(default)]
    ipa: Option<String>,
    #[serde(default)]
    ipa_raw: Option<String>,
    #[serde(default)]
    translit: Option<String>,
    #[serde(default)]
    gloss: Option<String>,
    #[serde(default)]
    gloss_plain: Option<String>,
    #[serde(default)]
    definition: Option<String>,
    #[serde(default)]
    pos: Vec<String>,
    #[serde(default)]
    form_text: Option<String>,
    #[serde(default)]
    meaning_text: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

impl RawRow {
    /// Validate and canonicalize into a [`LexemeRecord`].
    ///
    /// The corpus label supplies language/stage/script defaults for rows
    /// that omit them; a missing id or lemma is a schema violation.
    fn into_record(self, label: &CorpusLabel, line: usize) -> Result<LexemeRecord, CorpusError> {
        let id = non_empty(self.id).ok_or(CorpusError::SchemaViolation {
            line,
            reason: "missing id".to_string(),
        })?;
        let lemma = non_empty(self.lemma).ok_or(CorpusError::SchemaViolation {
            line,
            reason: "missing lemma".to_string(),
        })?;

        Ok(LexemeRecord {
            id,
            lemma,
            language: non_empty(self.language).unwrap_or_else(|| label.language.clone()),
            stage: non_empty(self.stage).unwrap_or_else(|| label.stage.clone()),
            script: non_empty(self.script).unwrap_or_default(),
            ipa: non_empty(self.ipa).or_else(|| non_empty(self.ipa_raw)),
            translit: non_empty(self.translit),
            gloss: non_empty(self.gloss)
                .or_else(|| non_empty(self.gloss_plain))
                .or_else(|| non_empty(self.definition)),
            pos: self.pos,
            form_text: non_empty(self.form_text),
            meaning_text: non_empty(self.meaning_text),
        })
    }
}

/// Load a corpus from pre-parsed JSON rows.
///
/// Offending rows (missing id/lemma, duplicate id) are counted and
/// excluded without aborting the load. Returns `EmptyCorpus` when no
/// valid row survives — an empty corpus cannot be indexed.
pub fn load_records(
    label: CorpusLabel,
    embedding_lang: Option<String>,
    rows: Vec<serde_json::Value>,
    limit: usize,
) -> CognateResult<LoadedCorpus> {
    let mut records: Vec<LexemeRecord> = Vec::new();
    let mut seen_ids: HashSet<String> = HashSet::new();
    let mut rows_read = 0usize;
    let mut rows_skipped = 0usize;

    for (i, value) in rows.into_iter().enumerate() {
        if limit > 0 && records.len() >= limit {
            break;
        }
        rows_read += 1;
        let line = i + 1;

        let raw: RawRow = match serde_json::from_value(value) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(line, error = %e, "skipping unparseable row");
                rows_skipped += 1;
                continue;
            }
        };

        match raw.into_record(&label, line) {
            Ok(record) => {
                if !seen_ids.insert(record.id.clone()) {
                    warn!(line, id = %record.id, "skipping duplicate id");
                    rows_skipped += 1;
                    continue;
                }
                records.push(record);
            }
            Err(violation) => {
                warn!(line, %violation, "skipping row");
                rows_skipped += 1;
            }
        }
    }

    if records.is_empty() {
        return Err(CorpusError::EmptyCorpus {
            label: label.to_string(),
        }
        .into());
    }

    debug!(
        corpus = %label,
        loaded = records.len(),
        skipped = rows_skipped,
        "corpus loaded"
    );

    Ok(LoadedCorpus {
        corpus: CorpusHandle::new(label, embedding_lang, records),
        rows_read,
        rows_skipped,
    })
}

/// Load a corpus from a JSONL reader. Blank lines are ignored.
pub fn load_reader<R: Read>(
    label: CorpusLabel,
    embedding_lang: Option<String>,
    reader: R,
    limit: usize,
) -> CognateResult<LoadedCorpus> {
    let buffered = BufReader::new(reader);
    let mut rows = Vec::new();
    let mut unparseable = 0usize;

    for line in buffered.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match serde_json::from_str::<serde_json::Value>(trimmed) {
            Ok(value) => rows.push(value),
            Err(e) => {
                warn!(error = %e, "skipping malformed JSONL line");
                unparseable += 1;
            }
        }
    }

    let mut loaded = load_records(label, embedding_lang, rows, limit)?;
    loaded.rows_read += unparseable;
    loaded.rows_skipped += unparseable;
    Ok(loaded)
}

/// Load a corpus from a JSONL file on disk.
pub fn load_jsonl_path(
    label: CorpusLabel,
    embedding_lang: Option<String>,
    path: &Path,
    limit: usize,
) -> CognateResult<LoadedCorpus> {
    let file = File::open(path).map_err(|e| CorpusError::ReadFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    load_reader(label, embedding_lang, file, limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn label() -> CorpusLabel {
        CorpusLabel::new("eng", "modern")
    }

    #[test]
    fn loads_valid_rows() {
        let rows = vec![
            json!({"id": "eng:2", "lemma": "write"}),
            json!({"id": "eng:1", "lemma": "book", "ipa": "bʊk"}),
        ];
        let loaded = load_records(label(), None, rows, 0).unwrap();
        assert_eq!(loaded.corpus.len(), 2);
        assert_eq!(loaded.rows_skipped, 0);
        // Sorted by id regardless of input order.
        assert_eq!(loaded.corpus.records()[0].id, "eng:1");
    }

    #[test]
    fn skips_rows_missing_id_or_lemma() {
        let rows = vec![
            json!({"id": "eng:1", "lemma": "book"}),
            json!({"lemma": "orphan"}),
            json!({"id": "eng:3"}),
            json!({"id": "  ", "lemma": "blank-id"}),
        ];
        let loaded = load_records(label(), None, rows, 0).unwrap();
        assert_eq!(loaded.corpus.len(), 1);
        assert_eq!(loaded.rows_skipped, 3);
        assert_eq!(loaded.rows_read, 4);
    }

    #[test]
    fn skips_duplicate_ids_first_wins() {
        let rows = vec![
            json!({"id": "eng:1", "lemma": "first"}),
            json!({"id": "eng:1", "lemma": "second"}),
        ];
        let loaded = load_records(label(), None, rows, 0).unwrap();
        assert_eq!(loaded.corpus.len(), 1);
        assert_eq!(loaded.corpus.records()[0].lemma, "first");
        assert_eq!(loaded.rows_skipped, 1);
    }

    #[test]
    fn resolves_field_aliases() {
        let rows = vec![json!({
            "id": "eng:1",
            "lemma": "book",
            "ipa_raw": "bʊk",
            "gloss_plain": "a written work",
        })];
        let loaded = load_records(label(), None, rows, 0).unwrap();
        let record = &loaded.corpus.records()[0];
        assert_eq!(record.ipa.as_deref(), Some("bʊk"));
        assert_eq!(record.gloss.as_deref(), Some("a written work"));
    }

    #[test]
    fn ipa_preferred_over_ipa_raw() {
        let rows = vec![json!({
            "id": "eng:1",
            "lemma": "book",
            "ipa": "bʊk",
            "ipa_raw": "buk-raw",
        })];
        let loaded = load_records(label(), None, rows, 0).unwrap();
        assert_eq!(loaded.corpus.records()[0].ipa.as_deref(), Some("bʊk"));
    }

    #[test]
    fn label_supplies_language_and_stage() {
        let rows = vec![json!({"id": "eng:1", "lemma": "book"})];
        let loaded = load_records(label(), None, rows, 0).unwrap();
        let record = &loaded.corpus.records()[0];
        assert_eq!(record.language, "eng");
        assert_eq!(record.stage, "modern");
    }

    #[test]
    fn limit_caps_loaded_rows() {
        let rows = (0..10)
            .map(|i| json!({"id": format!("eng:{i}"), "lemma": format!("word{i}")}))
            .collect();
        let loaded = load_records(label(), None, rows, 3).unwrap();
        assert_eq!(loaded.corpus.len(), 3);
    }

    #[test]
    fn all_invalid_is_empty_corpus_error() {
        let rows = vec![json!({"lemma": "no-id"})];
        let err = load_records(label(), None, rows, 0).unwrap_err();
        assert!(err.to_string().contains("no valid rows"));
    }

    #[test]
    fn reader_skips_blank_and_malformed_lines() {
        let input = "\
{\"id\": \"eng:1\", \"lemma\": \"book\"}\n\
\n\
not json at all\n\
{\"id\": \"eng:2\", \"lemma\": \"write\"}\n";
        let loaded = load_reader(label(), None, input.as_bytes(), 0).unwrap();
        assert_eq!(loaded.corpus.len(), 2);
        assert_eq!(loaded.rows_skipped, 1);
    }

    #[test]
    fn file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.jsonl");
        std::fs::write(
            &path,
            "{\"id\": \"ara:1\", \"lemma\": \"كتاب\", \"ipa\": \"kitaːb\"}\n",
        )
        .unwrap();
        let loaded =
            load_jsonl_path(CorpusLabel::new("ara", "classical"), None, &path, 0).unwrap();
        assert_eq!(loaded.corpus.len(), 1);
        assert_eq!(loaded.corpus.records()[0].lemma, "كتاب");
    }

    #[test]
    fn missing_file_is_read_failed() {
        let err = load_jsonl_path(label(), None, Path::new("/nonexistent.jsonl"), 0).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }
}
