use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    // Runs of two or more word characters; punctuation and single letters are dropped.
    static ref TOKEN_PATTERN: Regex = Regex::new(r"\b\w\w+\b").expect("static token pattern");
}

/// Decomposes to NFKD and drops combining marks ("café" → "cafe").
pub(crate) fn strip_accents(text: &str) -> String {
    text.nfkd().filter(|c| !is_combining_mark(*c)).collect()
}

pub(crate) fn normalize_text(text: &str, lowercase: bool, accents: bool) -> String {
    let text = if lowercase { text.to_lowercase() } else { text.to_string() };
    if accents {
        strip_accents(&text)
    } else {
        text
    }
}

pub(crate) fn word_tokens(text: &str) -> Vec<&str> {
    TOKEN_PATTERN.find_iter(text).map(|m| m.as_str()).collect()
}

/// Emits every n-gram with `min_n <= n <= max_n`, tokens joined by a single space.
pub(crate) fn ngrams(tokens: &[&str], (min_n, max_n): (usize, usize)) -> Vec<String> {
    let mut terms = Vec::new();
    for n in min_n.max(1)..=max_n {
        for window in tokens.windows(n) {
            terms.push(window.join(" "));
        }
    }
    terms
}
