//! PII Extractor - Detection and classification pipeline
//!
//! Implements identifier scanning, personal name detection (POS tagging,
//! NER and a Naive Bayes name model) and context-driven PII typing.

pub mod annotator;
pub mod classifier;
pub mod name_model;
pub mod names;
pub mod pipeline;
pub mod scanner;

pub use annotator::HeuristicAnnotator;
pub use classifier::{ContextWindow, PiiTypeClassifier};
pub use name_model::{identify_names, load_corpus, NameModel};
pub use names::PersonalNameExtractor;
pub use pipeline::PiiAnalyzer;
