//! The lexeme record — one dictionary entry in a corpus.

use serde::{Deserialize, Serialize};

/// One lexeme: a surface form plus the metadata the discovery pipeline
/// consumes. Immutable once its corpus is loaded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LexemeRecord {
    /// Stable identifier, unique within its corpus.
    pub id: String,
    /// Surface form in the corpus script.
    pub lemma: String,
    /// Language code (e.g. "ara", "eng").
    pub language: String,
    /// Historical stage (e.g. "classical", "modern").
    pub stage: String,
    /// Script tag (e.g. "Arab", "Latn").
    pub script: String,
    /// Normalized IPA transcription, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipa: Option<String>,
    /// Romanized transliteration, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translit: Option<String>,
    /// Plain-text gloss or definition, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gloss: Option<String>,
    /// Part-of-speech tags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pos: Vec<String>,
    /// Precomputed canonical form text. Derived on demand when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_text: Option<String>,
    /// Precomputed canonical meaning text. Derived on demand when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meaning_text: Option<String>,
}

impl LexemeRecord {
    /// Preferred surface text for orthographic comparison:
    /// transliteration when present, else the raw lemma.
    pub fn surface_text(&self) -> &str {
        match self.translit.as_deref() {
            Some(t) if !t.trim().is_empty() => t,
            _ => &self.lemma,
        }
    }

    /// First non-empty of IPA, transliteration, lemma — the skeleton
    /// extraction source.
    pub fn skeleton_source(&self) -> &str {
        for candidate in [self.ipa.as_deref(), self.translit.as_deref()] {
            if let Some(text) = candidate {
                if !text.trim().is_empty() {
                    return text;
                }
            }
        }
        &self.lemma
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(lemma: &str, translit: Option<&str>, ipa: Option<&str>) -> LexemeRecord {
        LexemeRecord {
            id: "ara:1".to_string(),
            lemma: lemma.to_string(),
            language: "ara".to_string(),
            stage: "classical".to_string(),
            script: "Arab".to_string(),
            ipa: ipa.map(String::from),
            translit: translit.map(String::from),
            gloss: None,
            pos: Vec::new(),
            form_text: None,
            meaning_text: None,
        }
    }

    #[test]
    fn surface_text_prefers_translit() {
        let r = record("كتاب", Some("kitab"), None);
        assert_eq!(r.surface_text(), "kitab");
    }

    #[test]
    fn surface_text_falls_back_to_lemma() {
        let r = record("كتاب", None, None);
        assert_eq!(r.surface_text(), "كتاب");
        let blank = record("كتاب", Some("   "), None);
        assert_eq!(blank.surface_text(), "كتاب");
    }

    #[test]
    fn skeleton_source_prefers_ipa() {
        let r = record("كتاب", Some("kitab"), Some("kitaːb"));
        assert_eq!(r.skeleton_source(), "kitaːb");
    }

    #[test]
    fn skeleton_source_order() {
        let r = record("كتاب", Some("kitab"), None);
        assert_eq!(r.skeleton_source(), "kitab");
        let r = record("كتاب", None, None);
        assert_eq!(r.skeleton_source(), "كتاب");
    }

    #[test]
    fn serde_roundtrip_preserves_optionals() {
        let r = record("كتاب", Some("kitab"), Some("kitaːb"));
        let json = serde_json::to_string(&r).unwrap();
        let back: LexemeRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }

    #[test]
    fn absent_optionals_are_omitted() {
        let r = record("book", None, None);
        let json = serde_json::to_string(&r).unwrap();
        assert!(!json.contains("ipa"));
        assert!(!json.contains("translit"));
        assert!(!json.contains("pos"));
    }
}
