//! Lexical scanners for numeric and alphanumeric identifiers

use once_cell::sync::Lazy;
use regex::Regex;

static NUMERIC_SEQUENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d+\b").expect("numeric pattern is valid"));

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").expect("word pattern is valid"));

/// Maximal digit runs bounded by word boundaries, in scan order
pub fn find_numeric_sequences(text: &str) -> Vec<String> {
    NUMERIC_SEQUENCE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Words made only of ASCII letters and digits that contain at least one digit.
///
/// Pure digit words qualify as well; only the digit requirement is enforced.
pub fn find_alphanumeric_identifiers(text: &str) -> Vec<String> {
    WORD.find_iter(text)
        .map(|m| m.as_str())
        .filter(|word| is_alphanumeric_identifier(word))
        .map(str::to_string)
        .collect()
}

/// Whole-value check used by the scanner and the type classifier
pub fn is_alphanumeric_identifier(value: &str) -> bool {
    !value.is_empty()
        && value.chars().all(|c| c.is_ascii_alphanumeric())
        && value.chars().any(|c| c.is_ascii_digit())
}
