//! PII type classification
//!
//! Assigns semantic PII types to candidate values using direct value
//! patterns and cue words found shortly before the value in the text.

use once_cell::sync::Lazy;
use regex::Regex;

use pii_core::{CandidateSet, PiiFinding, PiiType};

use crate::scanner::is_alphanumeric_identifier;

/// Default number of words inspected before a value
pub const DEFAULT_CONTEXT_WINDOW: usize = 4;

static WORD_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\w+\b").expect("word pattern is valid"));

/// Value patterns, checked independently and in this order
static DIRECT_PATTERNS: Lazy<Vec<(PiiType, Regex)>> = Lazy::new(|| {
    [
        (PiiType::Name, r"^[A-Za-z\s]+$"),
        (PiiType::AadhaarNumber, r"^\d{12}$"),
        (PiiType::MobileNumber, r"^\d{10}$"),
    ]
    .into_iter()
    .map(|(ty, pattern)| (ty, Regex::new(pattern).expect("direct pattern is valid")))
    .collect()
});

/// Context cues in priority order; the first cue present wins
const CONTEXT_CUES: &[(&str, PiiType)] = &[
    ("Passport", PiiType::PassportNumber),
    ("Voter", PiiType::VoterIdNumber),
    ("License", PiiType::DriversLicenseNumber),
    ("PAN", PiiType::PanNumber),
    ("account", PiiType::AccountNumber),
];

/// Words around the first occurrence of a value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextWindow<'t> {
    pub before: Vec<&'t str>,
    pub after: Vec<&'t str>,
}

impl<'t> ContextWindow<'t> {
    /// Locate the first occurrence of `value` in `text`.
    ///
    /// Returns `None` when the value does not appear verbatim.
    pub fn locate(text: &'t str, value: &str, window: usize) -> Option<Self> {
        let index = text.find(value)?;

        let preceding: Vec<&str> = WORD_TOKEN
            .find_iter(&text[..index])
            .map(|m| m.as_str())
            .collect();
        let skip = preceding.len().saturating_sub(window);

        let after = WORD_TOKEN
            .find_iter(&text[index + value.len()..])
            .map(|m| m.as_str())
            .collect();

        Some(Self {
            before: preceding[skip..].to_vec(),
            after,
        })
    }

    /// Type implied by the first matching cue in the preceding words
    pub fn cue_type(&self) -> Option<PiiType> {
        CONTEXT_CUES
            .iter()
            .find(|(cue, _)| self.before.contains(cue))
            .map(|(_, ty)| *ty)
    }
}

/// Classifies candidate values into PII findings
#[derive(Debug, Clone)]
pub struct PiiTypeClassifier {
    context_window: usize,
}

impl PiiTypeClassifier {
    pub fn new() -> Self {
        Self {
            context_window: DEFAULT_CONTEXT_WINDOW,
        }
    }

    /// Set the number of preceding words inspected for cues
    pub fn with_context_window(mut self, window: usize) -> Self {
        self.context_window = window.max(1);
        self
    }

    pub fn context_window(&self) -> usize {
        self.context_window
    }

    /// Findings for every candidate, in candidate order
    pub fn classify(&self, text: &str, candidates: &CandidateSet) -> Vec<PiiFinding> {
        candidates
            .iter()
            .flat_map(|value| self.classify_value(text, value))
            .collect()
    }

    /// Zero or more findings for a single value
    pub fn classify_value(&self, text: &str, value: &str) -> Vec<PiiFinding> {
        let trimmed = value.trim();
        let mut findings: Vec<PiiFinding> = DIRECT_PATTERNS
            .iter()
            .filter(|(_, pattern)| pattern.is_match(trimmed))
            .map(|(ty, _)| PiiFinding::new(*ty, value))
            .collect();

        if is_alphanumeric_identifier(value) {
            if let Some(context) = ContextWindow::locate(text, value, self.context_window) {
                tracing::trace!(
                    before = ?context.before,
                    after = context.after.len(),
                    "Context window"
                );
                if let Some(ty) = context.cue_type() {
                    findings.push(PiiFinding::new(ty, value));
                }
            }
        }

        findings
    }
}

impl Default for PiiTypeClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn types(text: &str, value: &str) -> Vec<PiiType> {
        PiiTypeClassifier::new()
            .classify_value(text, value)
            .into_iter()
            .map(|f| f.pii_type)
            .collect()
    }

    #[test]
    fn test_direct_patterns() {
        assert_eq!(types("", "John"), vec![PiiType::Name]);
        assert_eq!(types("", "John Sharma"), vec![PiiType::Name]);
        assert_eq!(types("", "456700000786"), vec![PiiType::AadhaarNumber]);
        assert_eq!(types("", "9876543210"), vec![PiiType::MobileNumber]);
        assert!(types("", "4567000007865").is_empty());
    }

    #[test]
    fn test_pan_cue() {
        let text = "My Aadhaar number is 456700000786 and PAN is AKKJM7875665D";
        assert_eq!(types(text, "AKKJM7875665D"), vec![PiiType::PanNumber]);
    }

    #[test]
    fn test_priority_order() {
        let text = "Passport and PAN both AKKJM7875665D";
        assert_eq!(types(text, "AKKJM7875665D"), vec![PiiType::PassportNumber]);

        let text = "my Passport is AKKJM7875665D";
        assert_eq!(types(text, "AKKJM7875665D"), vec![PiiType::PassportNumber]);
    }

    #[test]
    fn test_all_cues() {
        assert_eq!(
            types("Voter ID number is SYG882745586", "SYG882745586"),
            vec![PiiType::VoterIdNumber]
        );
        assert_eq!(
            types("Driving License no DL0420110149646", "DL0420110149646"),
            vec![PiiType::DriversLicenseNumber]
        );
        assert_eq!(
            types("the account number is 6356278255789", "6356278255789"),
            vec![PiiType::AccountNumber]
        );
    }

    #[test]
    fn test_cues_are_case_sensitive() {
        assert!(types("the pan is AKKJM7875665D", "AKKJM7875665D").is_empty());
        assert!(types("Account number 6356278255789", "6356278255789").is_empty());
    }

    #[test]
    fn test_cue_outside_window_ignored() {
        let text = "PAN details: one two three four AKKJM7875665D";
        assert!(types(text, "AKKJM7875665D").is_empty());

        let wide = PiiTypeClassifier::new().with_context_window(6);
        let found = wide.classify_value(text, "AKKJM7875665D");
        assert_eq!(found[0].pii_type, PiiType::PanNumber);
    }

    #[test]
    fn test_numeric_value_gets_both_rule_kinds() {
        let text = "linked account 9876543210 today";
        assert_eq!(
            types(text, "9876543210"),
            vec![PiiType::MobileNumber, PiiType::AccountNumber]
        );
    }

    #[test]
    fn test_first_occurrence_governs() {
        let text = "PAN is AB12345. Later the Passport AB12345 again";
        assert_eq!(types(text, "AB12345"), vec![PiiType::PanNumber]);
    }

    #[test]
    fn test_names_skip_context_rule() {
        let text = "Passport holder John";
        assert_eq!(types(text, "John"), vec![PiiType::Name]);
    }

    #[test]
    fn test_value_absent_from_text() {
        assert!(types("PAN is something else", "ZZ999").is_empty());
    }

    #[test]
    fn test_context_window_words() {
        let text = "the PAN no- AKKJM7875665D is valid";
        let window = ContextWindow::locate(text, "AKKJM7875665D", 4).unwrap();
        assert_eq!(window.before, vec!["the", "PAN", "no"]);
        assert_eq!(window.after, vec!["is", "valid"]);
    }

    #[test]
    fn test_classify_candidate_order() {
        let text = "PAN is AKKJM7875665D and phone 9876543210";
        let candidates: CandidateSet = ["9876543210", "AKKJM7875665D", "Priya"].into_iter().collect();

        let findings = PiiTypeClassifier::new().classify(text, &candidates);
        assert_eq!(
            findings,
            vec![
                PiiFinding::new(PiiType::MobileNumber, "9876543210"),
                PiiFinding::new(PiiType::PanNumber, "AKKJM7875665D"),
                PiiFinding::new(PiiType::Name, "Priya"),
            ]
        );
    }

    proptest! {
        #[test]
        fn twelve_digits_are_aadhaar(value in "[0-9]{12}") {
            let found = types("", &value);
            prop_assert!(found.contains(&PiiType::AadhaarNumber));
            prop_assert!(!found.contains(&PiiType::MobileNumber));
        }

        #[test]
        fn ten_digits_are_mobile(value in "[0-9]{10}") {
            let found = types("", &value);
            prop_assert!(found.contains(&PiiType::MobileNumber));
            prop_assert!(!found.contains(&PiiType::AadhaarNumber));
        }
    }
}
