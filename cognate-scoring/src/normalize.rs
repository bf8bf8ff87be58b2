//! Text normalization and consonant-skeleton extraction.

use std::sync::OnceLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Latin + IPA vowels stripped during skeleton extraction.
const VOWELS: &str = "aeiouyɑæɛɪɔʊʌəɨʉɯ";

/// Arabic long-vowel carriers (matres lectionis) — act as vowels in the
/// consonant skeleton.
const ARABIC_MATRES: &str = "وياأإآ";

fn arabic_diacritics() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Short-vowel diacritics, dagger alif, tatweel.
    RE.get_or_init(|| Regex::new("[\u{064B}-\u{0652}\u{0670}\u{0640}]").expect("valid regex"))
}

fn punctuation() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"[\s\-\u{2010}-\u{2015}_.,;:!?"'`~()\[\]{}<>|/\\]+"#).expect("valid regex")
    })
}

/// NFKC-normalize, lowercase, and strip punctuation/whitespace.
/// The shared preprocessing for every similarity signal.
pub fn norm_text(text: &str) -> String {
    let composed: String = text.nfkc().collect();
    let lowered = composed.to_lowercase();
    punctuation().replace_all(&lowered, "").into_owned()
}

/// Consonant-only skeleton: Arabic diacritics and length marks removed,
/// then vowels (Latin, IPA, and Arabic matres lectionis) and everything
/// non-alphabetic dropped.
pub fn skeleton(text: &str) -> String {
    let stripped = arabic_diacritics().replace_all(text, "");
    let normalized = norm_text(&stripped);
    normalized
        .chars()
        .filter(|c| c.is_alphabetic())
        .filter(|c| !ARABIC_MATRES.contains(*c))
        .filter(|c| !VOWELS.contains(*c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn norm_lowercases_and_strips_punctuation() {
        assert_eq!(norm_text("Write!"), "write");
        assert_eq!(norm_text("well-known"), "wellknown");
        assert_eq!(norm_text("  a b\tc "), "abc");
    }

    #[test]
    fn norm_applies_nfkc() {
        // Fullwidth "ｗ" composes to ASCII "w" under NFKC.
        assert_eq!(norm_text("\u{FF57}rite"), "write");
    }

    #[test]
    fn skeleton_drops_latin_vowels() {
        assert_eq!(skeleton("kataba"), "ktb");
        assert_eq!(skeleton("kutiba"), "ktb");
    }

    #[test]
    fn skeleton_of_only_vowels_is_empty() {
        assert_eq!(skeleton("aeiou"), "");
    }

    #[test]
    fn skeleton_strips_arabic_diacritics_and_matres() {
        // كَتَبَ with short-vowel diacritics reduces to كتب.
        assert_eq!(skeleton("كَتَبَ"), "كتب");
        // كتاب contains the mater alif, which drops out.
        assert_eq!(skeleton("كتاب"), "كتب");
    }

    #[test]
    fn skeleton_drops_ipa_vowels_and_length_marks() {
        // kitaːb → "ː" is not alphabetic, i/a are vowels.
        assert_eq!(skeleton("kitaːb"), "ktb");
    }

    #[test]
    fn skeleton_ignores_digits_and_punctuation() {
        assert_eq!(skeleton("k1t-b!"), "ktb");
    }
}
