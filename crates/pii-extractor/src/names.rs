//! Personal name extraction
//!
//! Two annotation passes over the input:
//! 1. Proper-noun candidates: POS-tag the text, keep `NNP*` tokens, re-annotate
//!    the joined proper nouns and apply the first-name filters.
//! 2. Entity-type refinement: render the candidate list as a nested list
//!    literal, run NER over it and drop organizations and locations.

use std::collections::HashSet;

use pii_core::{EntityLabel, LinguisticAnnotator, Token};

/// Lowercased words that are never personal names
pub const NAME_STOPLIST: &[&str] = &["card", "license", "id", "pan", "adhaar", "voter"];

/// Extracts probable personal first names using a linguistic annotator
pub struct PersonalNameExtractor<'a> {
    annotator: &'a dyn LinguisticAnnotator,
}

impl<'a> PersonalNameExtractor<'a> {
    pub fn new(annotator: &'a dyn LinguisticAnnotator) -> Self {
        Self { annotator }
    }

    /// Run both stages in order
    pub fn extract(&self, text: &str) -> Vec<String> {
        let candidates = self.extract_proper_noun_candidates(text);
        if candidates.is_empty() {
            return Vec::new();
        }
        self.refine_against_entity_types(&candidates)
    }

    /// Stage 1: proper nouns that pass the first-name filters, deduplicated
    pub fn extract_proper_noun_candidates(&self, text: &str) -> Vec<String> {
        let tokens = self.annotator.tag(self.annotator.tokenize(text));
        let proper_nouns: Vec<&str> = tokens
            .iter()
            .filter(|t| t.pos.is_proper_noun())
            .map(|t| t.text.as_str())
            .collect();

        if proper_nouns.is_empty() {
            return Vec::new();
        }

        let noun_text = proper_nouns.join(" ");
        let mut seen = HashSet::new();

        self.annotator
            .annotate(&noun_text)
            .into_iter()
            .filter(is_first_name)
            .filter_map(|t| seen.insert(t.text.clone()).then_some(t.text))
            .collect()
    }

    /// Stage 2: re-run NER over the rendered list and keep non-ORG/GPE entities
    pub fn refine_against_entity_types(&self, names: &[String]) -> Vec<String> {
        let rendered = render_name_list(names);

        self.annotator
            .recognize_entities(&rendered)
            .into_iter()
            .filter(|e| !matches!(e.label, EntityLabel::Org | EntityLabel::Gpe))
            .map(|e| e.text)
            .collect()
    }
}

/// First-name filter: proper noun, alphabetic, longer than one character,
/// not a stoplisted document word
fn is_first_name(token: &Token) -> bool {
    token.pos.is_proper_noun()
        && token.is_alpha()
        && token.char_len() > 1
        && !NAME_STOPLIST.contains(&token.text.to_lowercase().as_str())
}

/// ` [['John', 'Sharma']]`
fn render_name_list(names: &[String]) -> String {
    let quoted: Vec<String> = names.iter().map(|n| format!("'{n}'")).collect();
    format!(" [[{}]]", quoted.join(", "))
}
