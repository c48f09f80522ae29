//! Name Model module
//!
//! A bag-of-words multinomial Naive Bayes classifier that separates known
//! first names from the placeholder token `noname`.
//!
//! Training data is balanced by construction: every corpus entry is a
//! positive example and contributes one `noname` negative example. The model
//! is therefore a weak signal: words outside the corpus vocabulary fall back
//! to the class prior (0.5) and are never accepted as names.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use pii_core::{NameClassifier, PiiError, Result};

/// Label of the positive class
pub const NAME_CLASS: &str = "name";

/// Placeholder document (and label) of the negative class
pub const NEGATIVE_TOKEN: &str = "noname";

/// Default probability threshold for `identify_names`
pub const DEFAULT_NAME_THRESHOLD: f64 = 0.5;

/// Vectorizer token pattern: two or more word characters
static FEATURE_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("feature pattern is valid"));

/// Paragraph word pattern
static WORD_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\w+\b").expect("word pattern is valid"));

const NAME_IDX: usize = 0;
const NEGATIVE_IDX: usize = 1;

// ============================================================================
// Model
// ============================================================================

/// Trained name classifier with its vocabulary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NameModel {
    /// Class labels, positive class first
    classes: Vec<String>,
    /// Term -> feature column
    vocabulary: BTreeMap<String, usize>,
    /// Documents seen per class
    class_counts: Vec<u64>,
    /// Term counts per class, indexed by feature column
    feature_counts: Vec<Vec<u64>>,
    /// Additive (Laplace) smoothing
    alpha: f64,
    /// Number of names the model was trained on
    corpus_size: usize,
    trained_at: DateTime<Utc>,
}

/// Per-call log parameters derived from the counts
struct LogParameters {
    class_log_prior: [f64; 2],
    log_denominator: [f64; 2],
}

impl NameModel {
    /// Train on a list of known first names. Blank entries are skipped.
    pub fn train<S: AsRef<str>>(corpus: &[S]) -> Result<Self> {
        let names: Vec<&str> = corpus
            .iter()
            .map(|s| s.as_ref().trim())
            .filter(|s| !s.is_empty())
            .collect();

        if names.is_empty() {
            return Err(PiiError::ModelError("names corpus is empty".to_string()));
        }

        let documents = names
            .iter()
            .map(|name| (*name, NAME_IDX))
            .chain(std::iter::repeat((NEGATIVE_TOKEN, NEGATIVE_IDX)).take(names.len()));

        let mut vocabulary = BTreeMap::new();
        let mut class_counts = vec![0u64; 2];
        let mut term_counts: Vec<BTreeMap<String, u64>> = vec![BTreeMap::new(); 2];

        for (document, class) in documents {
            class_counts[class] += 1;
            for term in analyze(document) {
                let next = vocabulary.len();
                vocabulary.entry(term.clone()).or_insert(next);
                *term_counts[class].entry(term).or_insert(0) += 1;
            }
        }

        if vocabulary.is_empty() {
            return Err(PiiError::ModelError(
                "empty vocabulary: corpus has no tokens of two or more word characters"
                    .to_string(),
            ));
        }

        let mut feature_counts = vec![vec![0u64; vocabulary.len()]; 2];
        for (class, counts) in term_counts.into_iter().enumerate() {
            for (term, count) in counts {
                feature_counts[class][vocabulary[&term]] = count;
            }
        }

        tracing::info!(
            names = names.len(),
            vocabulary = vocabulary.len(),
            "Trained name model"
        );

        Ok(Self {
            classes: vec![NAME_CLASS.to_string(), NEGATIVE_TOKEN.to_string()],
            vocabulary,
            class_counts,
            feature_counts,
            alpha: 1.0,
            corpus_size: names.len(),
            trained_at: Utc::now(),
        })
    }

    /// Load the names corpus from a file and train on it
    pub fn from_corpus_file(path: impl AsRef<Path>) -> Result<Self> {
        let names = load_corpus(path)?;
        Self::train(&names)
    }

    /// Persist the model as a JSON artifact.
    ///
    /// The artifact is written next to its destination and renamed into place.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_vec_pretty(self)
            .map_err(|e| PiiError::ArtifactError(format!("failed to serialize model: {e}")))?;

        let mut tmp_name = path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = Path::new(&tmp_name);

        fs::write(tmp_path, json).map_err(|e| {
            PiiError::ArtifactError(format!("failed to write {}: {e}", tmp_path.display()))
        })?;
        fs::rename(tmp_path, path).map_err(|e| {
            PiiError::ArtifactError(format!("failed to move artifact to {}: {e}", path.display()))
        })?;

        tracing::info!(path = %path.display(), "Saved name model artifact");
        Ok(())
    }

    /// Load a previously saved artifact
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| {
            PiiError::ArtifactError(format!("failed to read {}: {e}", path.display()))
        })?;
        let model: Self = serde_json::from_slice(&bytes).map_err(|e| {
            PiiError::ArtifactError(format!("invalid artifact {}: {e}", path.display()))
        })?;

        if model.classes.len() != 2
            || model.class_counts.len() != 2
            || model.feature_counts.iter().any(|f| f.len() != model.vocabulary.len())
        {
            return Err(PiiError::ArtifactError(format!(
                "inconsistent model dimensions in {}",
                path.display()
            )));
        }

        Ok(model)
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn corpus_size(&self) -> usize {
        self.corpus_size
    }

    pub fn trained_at(&self) -> DateTime<Utc> {
        self.trained_at
    }

    fn log_parameters(&self) -> LogParameters {
        let total_docs = (self.class_counts[NAME_IDX] + self.class_counts[NEGATIVE_IDX]) as f64;
        let vocab = self.vocabulary.len() as f64;

        let mut class_log_prior = [0.0; 2];
        let mut log_denominator = [0.0; 2];
        for class in [NAME_IDX, NEGATIVE_IDX] {
            class_log_prior[class] = (self.class_counts[class] as f64 / total_docs).ln();
            let total: u64 = self.feature_counts[class].iter().sum();
            log_denominator[class] = (total as f64 + self.alpha * vocab).ln();
        }

        LogParameters {
            class_log_prior,
            log_denominator,
        }
    }

    /// Probability of the name class for one document
    fn name_probability(&self, params: &LogParameters, document: &str) -> f64 {
        let mut jll = params.class_log_prior;

        for term in analyze(document) {
            let Some(&column) = self.vocabulary.get(&term) else {
                continue;
            };
            for (class, score) in jll.iter_mut().enumerate() {
                let count = self.feature_counts[class][column] as f64;
                *score += (count + self.alpha).ln() - params.log_denominator[class];
            }
        }

        let max = jll[0].max(jll[1]);
        let log_norm = max + ((jll[0] - max).exp() + (jll[1] - max).exp()).ln();
        (jll[NAME_IDX] - log_norm).exp()
    }
}

impl NameClassifier for NameModel {
    fn predict_probabilities(&self, words: &[&str]) -> Vec<f64> {
        let params = self.log_parameters();
        words
            .iter()
            .map(|word| self.name_probability(&params, word))
            .collect()
    }
}

// ============================================================================
// Corpus & Identification
// ============================================================================

/// Read a newline-delimited names file, trimming each line
pub fn load_corpus(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        PiiError::CorpusError(format!("failed to read {}: {e}", path.display()))
    })?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Words of the paragraph whose name probability exceeds `threshold`
pub fn identify_names(
    classifier: &dyn NameClassifier,
    paragraph: &str,
    threshold: f64,
) -> Vec<String> {
    let words: Vec<&str> = WORD_TOKEN.find_iter(paragraph).map(|m| m.as_str()).collect();
    if words.is_empty() {
        return Vec::new();
    }

    classifier
        .predict_probabilities(&words)
        .into_iter()
        .zip(words)
        .filter(|(prob, _)| *prob > threshold)
        .map(|(_, word)| word.to_string())
        .collect()
}

/// Lowercase and split into vectorizer terms
fn analyze(document: &str) -> Vec<String> {
    let lowered = document.to_lowercase();
    FEATURE_TOKEN
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
