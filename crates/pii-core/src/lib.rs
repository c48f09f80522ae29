//! PII Core - Domain models, traits, and shared types
//!
//! This crate defines the core abstractions used throughout the detector:
//! - Linguistic units (tokens, POS tags, entity spans)
//! - PII types and findings
//! - Candidate sets
//! - Capability traits for annotators, name classifiers and detectors
//! - Common error types
//! - Configuration management

pub mod config;

pub use config::{AppConfig, ConfigError, LoggingConfig, ModelConfig, ServerConfig};

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for PII detection
#[derive(Error, Debug)]
pub enum PiiError {
    #[error("Names corpus error: {0}")]
    CorpusError(String),

    #[error("Name model error: {0}")]
    ModelError(String),

    #[error("Model artifact error: {0}")]
    ArtifactError(String),

    /// Malformed request input; the message is shown to callers verbatim
    #[error("{0}")]
    ValidationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, PiiError>;

impl From<ConfigError> for PiiError {
    fn from(err: ConfigError) -> Self {
        PiiError::ConfigError(err.to_string())
    }
}

// ============================================================================
// Linguistic Units
// ============================================================================

/// Part-of-speech tags (Penn Treebank subset)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PosTag {
    /// Proper noun, singular
    Nnp,
    /// Proper noun, plural
    Nnps,
    /// Noun, singular or mass
    Nn,
    /// Noun, plural
    Nns,
    /// Cardinal number
    Cd,
    Dt,
    In,
    Prp,
    PrpS,
    Cc,
    To,
    Md,
    Rb,
    Jj,
    /// Verb, base form
    Vb,
    /// Verb, past tense
    Vbd,
    /// Verb, gerund
    Vbg,
    /// Verb, 3rd person singular present
    Vbz,
    /// Wh-pronoun
    Wp,
    /// Interjection
    Uh,
    /// Punctuation and symbols
    Sym,
}

impl PosTag {
    /// Penn Treebank tag string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nnp => "NNP",
            Self::Nnps => "NNPS",
            Self::Nn => "NN",
            Self::Nns => "NNS",
            Self::Cd => "CD",
            Self::Dt => "DT",
            Self::In => "IN",
            Self::Prp => "PRP",
            Self::PrpS => "PRP$",
            Self::Cc => "CC",
            Self::To => "TO",
            Self::Md => "MD",
            Self::Rb => "RB",
            Self::Jj => "JJ",
            Self::Vb => "VB",
            Self::Vbd => "VBD",
            Self::Vbg => "VBG",
            Self::Vbz => "VBZ",
            Self::Wp => "WP",
            Self::Uh => "UH",
            Self::Sym => "SYM",
        }
    }

    /// True for any proper-noun variant (tag begins with "NNP")
    pub fn is_proper_noun(&self) -> bool {
        self.as_str().starts_with("NNP")
    }
}

impl std::fmt::Display for PosTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Named-entity labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityLabel {
    Person,
    /// Organization
    Org,
    /// Geo-political entity (countries, states, cities)
    Gpe,
}

impl EntityLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Person => "PERSON",
            Self::Org => "ORG",
            Self::Gpe => "GPE",
        }
    }
}

impl std::fmt::Display for EntityLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A lexical unit produced by a linguistic annotator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Surface form
    pub text: String,
    /// Part-of-speech tag
    pub pos: PosTag,
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset one past the last character
    pub end: usize,
    /// Entity label, if the token falls inside a recognized entity
    pub entity: Option<EntityLabel>,
}

impl Token {
    pub fn new(text: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            text: text.into(),
            pos: PosTag::Sym,
            start,
            end,
            entity: None,
        }
    }

    /// True if every character is alphabetic (and there is at least one)
    pub fn is_alpha(&self) -> bool {
        !self.text.is_empty() && self.text.chars().all(char::is_alphabetic)
    }

    /// Length in characters
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// A recognized named entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySpan {
    pub text: String,
    pub label: EntityLabel,
    pub start: usize,
    pub end: usize,
}

// ============================================================================
// PII Findings
// ============================================================================

/// Semantic PII categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PiiType {
    #[serde(rename = "name")]
    Name,
    #[serde(rename = "Aadhaar Number")]
    AadhaarNumber,
    #[serde(rename = "Mobile Number")]
    MobileNumber,
    #[serde(rename = "Passport Number")]
    PassportNumber,
    #[serde(rename = "Voter ID Number")]
    VoterIdNumber,
    #[serde(rename = "Drivers License Number")]
    DriversLicenseNumber,
    #[serde(rename = "PAN Number")]
    PanNumber,
    #[serde(rename = "Account Number")]
    AccountNumber,
}

impl PiiType {
    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::AadhaarNumber => "Aadhaar Number",
            Self::MobileNumber => "Mobile Number",
            Self::PassportNumber => "Passport Number",
            Self::VoterIdNumber => "Voter ID Number",
            Self::DriversLicenseNumber => "Drivers License Number",
            Self::PanNumber => "PAN Number",
            Self::AccountNumber => "Account Number",
        }
    }
}

impl std::fmt::Display for PiiType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A classified PII detection
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PiiFinding {
    pub pii_type: PiiType,
    pub pii_value: String,
}

impl PiiFinding {
    pub fn new(pii_type: PiiType, pii_value: impl Into<String>) -> Self {
        Self {
            pii_type,
            pii_value: pii_value.into(),
        }
    }
}

// ============================================================================
// Candidate Set
// ============================================================================

/// Deduplicated collection of raw candidate values.
///
/// Iterates in first-insertion order so that analysis output is stable
/// across calls.
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    values: Vec<String>,
    seen: HashSet<String>,
}

impl CandidateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value; returns false if it was already present
    pub fn insert(&mut self, value: impl Into<String>) -> bool {
        let value = value.into();
        if self.seen.contains(&value) {
            return false;
        }
        self.seen.insert(value.clone());
        self.values.push(value);
        true
    }

    pub fn contains(&self, value: &str) -> bool {
        self.seen.contains(value)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(String::as_str)
    }
}

impl<S: Into<String>> Extend<S> for CandidateSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<S: Into<String>> FromIterator<S> for CandidateSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

// ============================================================================
// Capability Traits
// ============================================================================

/// Tokenizer, POS tagger and named-entity recognizer over UTF-8 text
pub trait LinguisticAnnotator: Send + Sync {
    /// Split text into tokens carrying byte offsets
    fn tokenize(&self, text: &str) -> Vec<Token>;

    /// Assign a part-of-speech tag to every token
    fn tag(&self, tokens: Vec<Token>) -> Vec<Token>;

    /// Recognize named entities in text
    fn recognize_entities(&self, text: &str) -> Vec<EntitySpan>;

    /// Tokenize, tag and attach entity labels in one pass
    fn annotate(&self, text: &str) -> Vec<Token> {
        let mut tokens = self.tag(self.tokenize(text));
        let entities = self.recognize_entities(text);

        for token in &mut tokens {
            token.entity = entities
                .iter()
                .find(|e| e.start <= token.start && token.end <= e.end)
                .map(|e| e.label);
        }

        tokens
    }
}

/// Binary name / not-name classifier over single words
pub trait NameClassifier: Send + Sync {
    /// Probability of the "name" class for each word, in input order
    fn predict_probabilities(&self, words: &[&str]) -> Vec<f64>;

    /// Pair each word with its "name" probability
    fn predict(&self, words: &[&str]) -> Vec<(String, f64)> {
        words
            .iter()
            .zip(self.predict_probabilities(words))
            .map(|(word, prob)| (word.to_string(), prob))
            .collect()
    }
}

/// Trait for PII detectors
pub trait PiiDetector: Send + Sync {
    fn analyze_pii(&self, text: &str) -> Result<Vec<PiiFinding>>;
}

// ============================================================================
// Tests
// ============================================================================
