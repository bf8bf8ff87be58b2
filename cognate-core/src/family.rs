//! Language-family metadata, used by the scorer's same-family boost.

/// Family name → member language codes.
const LANGUAGE_FAMILIES: &[(&str, &[&str])] = &[
    (
        "semitic",
        &[
            "ar", "ara", "arb", "ar-qur", "ara-qur", "ar-cla", "he", "heb", "hbo", "syr", "syc",
            "arc", "sam", "jpa", "tmr", "akk", "phn", "xpu", "uga", "gez", "am", "amh", "ti",
            "tir",
        ],
    ),
    (
        "indo_european_germanic",
        &["en", "eng", "ang", "enm", "de", "deu", "gmh", "goh", "nl", "nld"],
    ),
    (
        "indo_european_romance",
        &["la", "lat", "fr", "fra", "fro", "es", "spa", "it", "ita", "pt", "por"],
    ),
    ("indo_european_hellenic", &["grc", "el", "ell"]),
    ("indo_european_iranian", &["fa", "fas", "pes", "prs", "sa", "san"]),
    ("turkic", &["tr", "tur"]),
];

/// Look up the family of a language code. `None` for unknown codes.
pub fn language_family(lang: &str) -> Option<&'static str> {
    let key = lang.trim().to_ascii_lowercase();
    if key.is_empty() {
        return None;
    }
    LANGUAGE_FAMILIES
        .iter()
        .find(|(_, members)| members.contains(&key.as_str()))
        .map(|(family, _)| *family)
}

/// Whether two language codes belong to the same known family.
/// Unknown codes never match anything.
pub fn same_family(a: &str, b: &str) -> bool {
    match (language_family(a), language_family(b)) {
        (Some(fa), Some(fb)) => fa == fb,
        _ => false,
    }
}
