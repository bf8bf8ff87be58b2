//! CorpusHandle — an ordered, id-unique collection of lexemes for one
//! (language, stage) pair.

use serde::{Deserialize, Serialize};

use crate::lexeme::LexemeRecord;

/// Identifies a corpus: language code plus historical stage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CorpusLabel {
    pub language: String,
    pub stage: String,
}

impl CorpusLabel {
    pub fn new(language: impl Into<String>, stage: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            stage: stage.into(),
        }
    }
}

impl std::fmt::Display for CorpusLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.language, self.stage)
    }
}

/// An immutable, id-sorted corpus. Owns its records exclusively after load.
///
/// Construction is the loader's job (`cognate-corpus`); this type only
/// guarantees the ordering/uniqueness invariants once built.
#[derive(Debug, Clone)]
pub struct CorpusHandle {
    label: CorpusLabel,
    /// Language tag used to select embedding backend configuration.
    embedding_lang: Option<String>,
    /// Records sorted by ascending id; ids unique.
    records: Vec<LexemeRecord>,
    /// blake3 over the id-ordered canonical rows.
    content_hash: String,
}

impl CorpusHandle {
    /// Build a handle from records already validated for id uniqueness.
    /// Sorts by id to fix the deterministic downstream ordering.
    pub fn new(
        label: CorpusLabel,
        embedding_lang: Option<String>,
        mut records: Vec<LexemeRecord>,
    ) -> Self {
        records.sort_by(|a, b| a.id.cmp(&b.id));
        let content_hash = Self::hash_records(&records);
        Self {
            label,
            embedding_lang,
            records,
            content_hash,
        }
    }

    /// blake3 hash over the canonical serialization of id-ordered records.
    fn hash_records(records: &[LexemeRecord]) -> String {
        let mut hasher = blake3::Hasher::new();
        for record in records {
            // Canonical form: serde_json of the full record, newline-delimited.
            // Field order is fixed by the struct definition.
            let line = serde_json::to_string(record).unwrap_or_default();
            hasher.update(line.as_bytes());
            hasher.update(b"\n");
        }
        hasher.finalize().to_hex().to_string()
    }

    pub fn label(&self) -> &CorpusLabel {
        &self.label
    }

    pub fn embedding_lang(&self) -> Option<&str> {
        self.embedding_lang.as_deref()
    }

    pub fn records(&self) -> &[LexemeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Content hash of the whole corpus, for manifests and index tags.
    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }

    /// Look up a record by id (binary search over the sorted records).
    pub fn get(&self, id: &str) -> Option<&LexemeRecord> {
        self.records
            .binary_search_by(|r| r.id.as_str().cmp(id))
            .ok()
            .map(|i| &self.records[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str) -> LexemeRecord {
        LexemeRecord {
            id: id.to_string(),
            lemma: format!("lemma-{id}"),
            language: "eng".to_string(),
            stage: "modern".to_string(),
            script: "Latn".to_string(),
            ipa: None,
            translit: None,
            gloss: None,
            pos: Vec::new(),
            form_text: None,
            meaning_text: None,
        }
    }

    #[test]
    fn records_sorted_by_id() {
        let handle = CorpusHandle::new(
            CorpusLabel::new("eng", "modern"),
            None,
            vec![record("c"), record("a"), record("b")],
        );
        let ids: Vec<&str> = handle.records().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn get_by_id() {
        let handle = CorpusHandle::new(
            CorpusLabel::new("eng", "modern"),
            None,
            vec![record("b"), record("a")],
        );
        assert_eq!(handle.get("a").unwrap().id, "a");
        assert!(handle.get("z").is_none());
    }

    #[test]
    fn content_hash_is_order_independent_for_same_set() {
        let h1 = CorpusHandle::new(
            CorpusLabel::new("eng", "modern"),
            None,
            vec![record("a"), record("b")],
        );
        let h2 = CorpusHandle::new(
            CorpusLabel::new("eng", "modern"),
            None,
            vec![record("b"), record("a")],
        );
        assert_eq!(h1.content_hash(), h2.content_hash());
    }

    #[test]
    fn content_hash_changes_with_content() {
        let h1 = CorpusHandle::new(CorpusLabel::new("eng", "modern"), None, vec![record("a")]);
        let mut changed = record("a");
        changed.lemma = "other".to_string();
        let h2 = CorpusHandle::new(CorpusLabel::new("eng", "modern"), None, vec![changed]);
        assert_ne!(h1.content_hash(), h2.content_hash());
    }

    #[test]
    fn label_display() {
        assert_eq!(CorpusLabel::new("ara", "classical").to_string(), "ara:classical");
    }
}
