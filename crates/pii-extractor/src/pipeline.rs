//! PII analysis pipeline
//!
//! Runs the lexical scanners, the personal name extractor and the name model,
//! merges their output into one candidate set, and types every candidate.

use std::path::Path;
use std::sync::Arc;

use pii_core::{
    CandidateSet, LinguisticAnnotator, ModelConfig, NameClassifier, PiiDetector, PiiFinding,
    Result,
};

use crate::annotator::HeuristicAnnotator;
use crate::classifier::PiiTypeClassifier;
use crate::name_model::{identify_names, NameModel, DEFAULT_NAME_THRESHOLD};
use crate::names::PersonalNameExtractor;
use crate::scanner::{find_alphanumeric_identifiers, find_numeric_sequences};

/// The PII detection pipeline
pub struct PiiAnalyzer {
    annotator: Arc<dyn LinguisticAnnotator>,
    name_model: Arc<dyn NameClassifier>,
    classifier: PiiTypeClassifier,
    /// Minimum name probability (exclusive) for model-identified names
    name_threshold: f64,
}

impl PiiAnalyzer {
    /// Create an analyzer with the heuristic annotator and a trained model
    pub fn new(name_model: NameModel) -> Self {
        Self::with_components(Arc::new(HeuristicAnnotator::new()), Arc::new(name_model))
    }

    /// Create an analyzer from arbitrary annotator and classifier implementations
    pub fn with_components(
        annotator: Arc<dyn LinguisticAnnotator>,
        name_model: Arc<dyn NameClassifier>,
    ) -> Self {
        Self {
            annotator,
            name_model,
            classifier: PiiTypeClassifier::new(),
            name_threshold: DEFAULT_NAME_THRESHOLD,
        }
    }

    /// Train the name model from a corpus file
    pub fn from_corpus_file(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(NameModel::from_corpus_file(path)?))
    }

    /// Apply threshold and context window settings
    pub fn with_model_config(self, config: &ModelConfig) -> Self {
        self.with_threshold(config.name_threshold)
            .with_context_window(config.context_window)
    }

    /// Set name probability threshold
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.name_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Set the number of words inspected before a value
    pub fn with_context_window(mut self, window: usize) -> Self {
        self.classifier = self.classifier.with_context_window(window);
        self
    }

    /// Union of all extracted candidates, first occurrence wins
    pub fn collect_candidates(&self, text: &str) -> CandidateSet {
        let numeric = find_numeric_sequences(text);
        let alphanumeric = find_alphanumeric_identifiers(text);
        let proper_nouns = PersonalNameExtractor::new(self.annotator.as_ref()).extract(text);
        let model_names = identify_names(self.name_model.as_ref(), text, self.name_threshold);

        tracing::debug!(
            numeric = numeric.len(),
            alphanumeric = alphanumeric.len(),
            proper_nouns = proper_nouns.len(),
            model_names = model_names.len(),
            "Collected candidates"
        );

        let mut candidates = CandidateSet::new();
        candidates.extend(numeric);
        candidates.extend(alphanumeric);
        candidates.extend(proper_nouns);
        candidates.extend(model_names);
        candidates
    }
}

impl PiiDetector for PiiAnalyzer {
    fn analyze_pii(&self, text: &str) -> Result<Vec<PiiFinding>> {
        let candidates = self.collect_candidates(text);
        let findings = self.classifier.classify(text, &candidates);

        tracing::debug!(
            candidates = candidates.len(),
            findings = findings.len(),
            "Analyzed text"
        );

        Ok(findings)
    }
}
