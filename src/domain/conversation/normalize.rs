//! Spelling normalisation applied before intent classification.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static MISSPELLINGS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"\bkiero\b", "quiero"),
        (r"\breklamo\b", "reclamo"),
        (r"\baktualizar\b", "actualizar"),
        (r"\bkonsultar\b", "consultar"),
        (r"\baser\b", "hacer"),
        (r"\bdirecsion\b", "direccion"),
    ]
    .into_iter()
    .map(|(pattern, replacement)| (Regex::new(pattern).expect("static pattern"), replacement))
    .collect()
});

// Three or more of the same vowel ("holaaaa").
static STRETCHED_VOWELS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"a{3,}|e{3,}|i{3,}|o{3,}|u{3,}").expect("static pattern"));

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("static pattern"));

/// Lower-cases, fixes common misspellings and collapses stretched vowels.
pub fn normalize_for_classification(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    let squeezed = WHITESPACE.replace_all(&lowered, " ");
    let mut out = STRETCHED_VOWELS
        .replace_all(&squeezed, |caps: &Captures| caps[0][..1].to_string())
        .into_owned();
    for (re, replacement) in MISSPELLINGS.iter() {
        out = re.replace_all(&out, *replacement).into_owned();
    }
    out
}
