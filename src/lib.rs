//! Cleaning and recognition scoring for OCR text harvested from digitised
//! newspapers.
//!
//! Raw article text is normalized, tokenized and checked word by word
//! against a lexicon, a morphological normalizer and a list of known
//! names. Words that can't be verified are replaced with a placeholder and
//! each document gets an accuracy score.

pub mod classify;
pub mod config;
pub mod corpus;
pub mod corrections;
pub mod entities;
pub mod error;
pub mod lexicon;
pub mod normalize;
pub mod pipeline;
pub mod punctuation;
pub mod report;
pub mod tokenize;

#[cfg(feature = "python")]
mod python;

pub use classify::{Classification, Classifier, DocumentClassification, Recognition, Rejection};
pub use config::{CleanerConfig, LexiconConfig};
pub use corrections::{Correction, CorrectionTable};
pub use entities::EntityRegistry;
pub use error::{Error, Result};
pub use lexicon::{HunspellNormalizer, Lexicon, LexiconProvider, Morphology, MorphyNormalizer};
pub use normalize::TextNormalizer;
pub use pipeline::{BatchOutcome, CleanedDocument, Cleaner, Document};
pub use punctuation::Rejoiner;
pub use report::AccuracyReport;
pub use tokenize::{tokenize, Token};
