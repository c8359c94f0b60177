//! Error types for the cleaning pipeline.
//!
//! Normalization and classification never fail; only resource loading,
//! configuration and batch arithmetic produce errors.

use std::path::PathBuf;
use thiserror::Error;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// A file the pipeline depends on could not be found
    #[error("Missing {what}: {}", path.display())]
    MissingResource { what: &'static str, path: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration parsing or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A correction table entry did not compile
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Hunspell dictionary could not be built
    #[error("Dictionary error: {0}")]
    Dictionary(String),

    /// Average requested over a batch with no scored documents
    #[error("Empty batch: no documents with tokens to average")]
    EmptyBatch,
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}
