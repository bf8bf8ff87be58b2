//! Corpus selector strings: `<lang>[@<stage>][@<embedding_lang>]=<path>`.
//!
//! Parsed by the calling layer before corpora reach the engine; provided
//! here so every caller agrees on the grammar.

use std::path::PathBuf;

use cognate_core::errors::{CognateResult, CorpusError};
use cognate_core::CorpusLabel;

/// A parsed corpus selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusSelector {
    pub language: String,
    pub stage: String,
    /// Optional embedding-language override (e.g. "arb_Arab").
    pub embedding_lang: Option<String>,
    pub path: PathBuf,
}

impl CorpusSelector {
    /// Parse `<lang>[@<stage>][@<embedding_lang>]=<path>`.
    ///
    /// A missing stage defaults to "unknown", matching upstream corpora
    /// that carry no stage tag.
    pub fn parse(input: &str) -> CognateResult<Self> {
        let (left, path) = input.split_once('=').ok_or_else(|| {
            CorpusError::InvalidSelector {
                input: input.to_string(),
                reason: "expected <lang>[@<stage>][@<embedding_lang>]=<path>".to_string(),
            }
        })?;

        if path.trim().is_empty() {
            return Err(CorpusError::InvalidSelector {
                input: input.to_string(),
                reason: "missing path".to_string(),
            }
            .into());
        }

        let mut parts = left.split('@').filter(|p| !p.is_empty());
        let language = parts.next().ok_or_else(|| CorpusError::InvalidSelector {
            input: input.to_string(),
            reason: "missing language".to_string(),
        })?;
        let stage = parts.next().unwrap_or("unknown");
        let embedding_lang = parts.next().map(String::from);

        if parts.next().is_some() {
            return Err(CorpusError::InvalidSelector {
                input: input.to_string(),
                reason: "too many @-separated parts".to_string(),
            }
            .into());
        }

        Ok(Self {
            language: language.to_string(),
            stage: stage.to_string(),
            embedding_lang,
            path: PathBuf::from(path),
        })
    }

    pub fn label(&self) -> CorpusLabel {
        CorpusLabel::new(self.language.clone(), self.stage.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_selector() {
        let s = CorpusSelector::parse("ara@classical@arb_Arab=data/quran.jsonl").unwrap();
        assert_eq!(s.language, "ara");
        assert_eq!(s.stage, "classical");
        assert_eq!(s.embedding_lang.as_deref(), Some("arb_Arab"));
        assert_eq!(s.path, PathBuf::from("data/quran.jsonl"));
    }

    #[test]
    fn stage_defaults_to_unknown() {
        let s = CorpusSelector::parse("eng=data/english.jsonl").unwrap();
        assert_eq!(s.stage, "unknown");
        assert!(s.embedding_lang.is_none());
    }

    #[test]
    fn missing_equals_is_invalid() {
        assert!(CorpusSelector::parse("eng@modern").is_err());
    }

    #[test]
    fn missing_language_is_invalid() {
        assert!(CorpusSelector::parse("=data/english.jsonl").is_err());
        assert!(CorpusSelector::parse("@modern=data/english.jsonl").is_err());
    }

    #[test]
    fn empty_path_is_invalid() {
        assert!(CorpusSelector::parse("eng@modern=").is_err());
    }

    #[test]
    fn too_many_parts_is_invalid() {
        assert!(CorpusSelector::parse("a@b@c@d=path").is_err());
    }

    #[test]
    fn path_may_contain_equals() {
        let s = CorpusSelector::parse("eng=data/dir=odd/file.jsonl").unwrap();
        assert_eq!(s.path, PathBuf::from("data/dir=odd/file.jsonl"));
    }

    #[test]
    fn label_round_trip() {
        let s = CorpusSelector::parse("ara@classical=x.jsonl").unwrap();
        assert_eq!(s.label().to_string(), "ara:classical");
    }
}
