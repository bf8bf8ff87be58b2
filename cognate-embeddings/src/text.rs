//! Deterministic per-model text selection.
//!
//! Form models consume a canonical surface-form text (script + translit +
//! IPA marker, never gloss); semantic models consume a canonical meaning
//! text (gloss/definition, never raw script-only text). Identical records
//! always select identical texts, which is what makes the content-addressed
//! cache sound.

use cognate_core::{LexemeRecord, ModelKind};

/// The text chosen for one (record, model kind), plus whether a fallback
/// was taken for a record with no meaning text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedText {
    pub text: String,
    pub meaning_fallback: bool,
}

/// Collapse internal whitespace and trim. Applied to every text before
/// hashing or embedding so formatting noise never splits cache entries.
pub fn safe_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Canonical form text: script lemma, transliteration, and IPA marker.
///
/// Arabic-script lemmas get an explicit script prefix so byte-level models
/// see the script boundary.
pub fn form_text(record: &LexemeRecord) -> String {
    if let Some(precomputed) = record.form_text.as_deref() {
        return safe_text(precomputed);
    }

    let mut parts: Vec<String> = Vec::new();
    if record.language.to_ascii_lowercase().starts_with("ar") {
        parts.push(format!("AR: {}", record.lemma));
    } else {
        parts.push(record.lemma.clone());
    }
    if let Some(translit) = record.translit.as_deref() {
        parts.push(format!("TR: {translit}"));
    }
    if let Some(ipa) = record.ipa.as_deref() {
        parts.push(format!("IPA: {ipa}"));
    }
    safe_text(&parts.join(" | "))
}

/// Canonical meaning text: the gloss when present, else the lemma as a
/// last resort (flagged, so callers can report fallback coverage).
pub fn meaning_text(record: &LexemeRecord) -> SelectedText {
    if let Some(precomputed) = record.meaning_text.as_deref() {
        return SelectedText {
            text: safe_text(precomputed),
            meaning_fallback: false,
        };
    }
    match record.gloss.as_deref() {
        Some(gloss) => SelectedText {
            text: safe_text(gloss),
            meaning_fallback: false,
        },
        None => SelectedText {
            text: safe_text(&record.lemma),
            meaning_fallback: true,
        },
    }
}

/// Select the embedding text for a record under a model kind.
pub fn text_for_model(record: &LexemeRecord, kind: ModelKind) -> SelectedText {
    match kind {
        ModelKind::Form => SelectedText {
            text: form_text(record),
            meaning_fallback: false,
        },
        ModelKind::Semantic => meaning_text(record),
    }
}
