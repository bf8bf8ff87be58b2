//! Hybrid scoring: subscores, fusion, and category labels.

use serde::{Deserialize, Serialize};

use cognate_core::{family, HybridWeights, LexemeRecord};

use crate::normalize::{norm_text, skeleton};
use crate::similarity::{jaccard, ngram_profile, seq_ratio};

/// How the retrieval models surfaced a pair. A pure function of which
/// retrieval scores are present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Both semantic and form retrieval independently produced the pair.
    StrongUnion,
    SemanticOnly,
    FormOnly,
}

impl Category {
    /// `None` only for a pair no model retrieved — a state the
    /// orchestrator never emits.
    pub fn from_hits(semantic: bool, form: bool) -> Option<Self> {
        match (semantic, form) {
            (true, true) => Some(Category::StrongUnion),
            (true, false) => Some(Category::SemanticOnly),
            (false, true) => Some(Category::FormOnly),
            (false, false) => None,
        }
    }
}

/// Hybrid component scores plus the fused result for one pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HybridScore {
    /// Character similarity over the preferred surface texts.
    pub orthography: f64,
    /// IPA similarity; `None` (not 0) when either side lacks IPA.
    pub sound: Option<f64>,
    /// Consonant-skeleton similarity; `None` when either skeleton is empty.
    pub skeleton: Option<f64>,
    #[serde(rename = "combined_score")]
    pub combined: f64,
    pub family_boost_applied: bool,
}

/// Orthography: 0.6 · n-gram Jaccard (n ∈ 2..=4) + 0.4 · normalized
/// Levenshtein over the normalized preferred surface texts
/// (transliteration when present, else lemma).
pub fn orthography_score(source: &LexemeRecord, target: &LexemeRecord) -> f64 {
    let a = norm_text(source.surface_text());
    let b = norm_text(target.surface_text());
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let grams_a = ngram_profile(&a, &[2, 3, 4]);
    let grams_b = ngram_profile(&b, &[2, 3, 4]);
    0.6 * jaccard(&grams_a, &grams_b) + 0.4 * seq_ratio(&a, &b)
}

/// Sound: normalized Levenshtein over normalized IPA. Unavailable — not
/// merely low — when either side lacks IPA.
pub fn sound_score(source: &LexemeRecord, target: &LexemeRecord) -> Option<f64> {
    let a = norm_text(source.ipa.as_deref()?);
    let b = norm_text(target.ipa.as_deref()?);
    if a.is_empty() || b.is_empty() {
        return None;
    }
    Some(seq_ratio(&a, &b))
}

/// Skeleton: 0.5 · n-gram Jaccard (n ∈ 2..=3) + 0.5 · normalized
/// Levenshtein over consonant skeletons. Unavailable when either
/// stripped skeleton is empty.
pub fn skeleton_score(source: &LexemeRecord, target: &LexemeRecord) -> Option<f64> {
    let a = skeleton(source.skeleton_source());
    let b = skeleton(target.skeleton_source());
    if a.is_empty() || b.is_empty() {
        return None;
    }
    let grams_a = ngram_profile(&a, &[2, 3]);
    let grams_b = ngram_profile(&b, &[2, 3]);
    Some(0.5 * jaccard(&grams_a, &grams_b) + 0.5 * seq_ratio(&a, &b))
}

/// Fuse the available signals: weighted sum with the weights of absent
/// signals dropped and the remainder rescaled to sum to 1.
///
/// `None` when no signal is available or the surviving weights sum to
/// zero — the InsufficientSignal case.
pub fn combined_score(
    semantic: Option<f64>,
    form: Option<f64>,
    orthography: Option<f64>,
    sound: Option<f64>,
    skeleton: Option<f64>,
    weights: &HybridWeights,
) -> Option<f64> {
    let parts: Vec<(f64, f64)> = [
        (semantic, weights.semantic),
        (form, weights.form),
        (orthography, weights.orthography),
        (sound, weights.sound),
        (skeleton, weights.skeleton),
    ]
    .into_iter()
    .filter_map(|(value, weight)| value.map(|v| (v, weight)))
    .collect();

    if parts.is_empty() {
        return None;
    }
    let weight_sum: f64 = parts.iter().map(|(_, w)| w).sum();
    if weight_sum <= 0.0 {
        return None;
    }
    Some(parts.iter().map(|(v, w)| v * w).sum::<f64>() / weight_sum)
}

/// Score one candidate pair end to end.
///
/// `None` when the pair carries zero usable signals; the caller drops it
/// and counts it in the coverage report.
pub fn score_pair(
    source: &LexemeRecord,
    target: &LexemeRecord,
    semantic: Option<f64>,
    form: Option<f64>,
    weights: &HybridWeights,
) -> Option<HybridScore> {
    let orthography = orthography_score(source, target);
    let sound = sound_score(source, target);
    let skel = skeleton_score(source, target);

    let combined = combined_score(semantic, form, Some(orthography), sound, skel, weights)?;

    let boosted = weights.family_boost > 0.0
        && family::same_family(&source.language, &target.language);
    let combined = if boosted {
        (combined * (1.0 + weights.family_boost)).min(1.0)
    } else {
        combined
    };

    Some(HybridScore {
        orthography,
        sound,
        skeleton: skel,
        combined,
        family_boost_applied: boosted,
    })
}
