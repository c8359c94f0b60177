//! Python bindings, built with the `python` feature.

use std::fs;
use std::path::{Path, PathBuf};

use pyo3::exceptions::{PyIOError, PyValueError};
use pyo3::prelude::*;

use crate::config::CleanerConfig;
use crate::corpus::read_article;
use crate::entities::EntityRegistry;
use crate::error::Error;
use crate::normalize::TextNormalizer;
use crate::pipeline::{Cleaner, Document};
use crate::punctuation::Rejoiner;

impl From<Error> for PyErr {
    fn from(err: Error) -> PyErr {
        match err {
            Error::Config(_) | Error::Pattern(_) | Error::EmptyBatch => {
                PyValueError::new_err(err.to_string())
            }
            _ => PyIOError::new_err(err.to_string()),
        }
    }
}

/// Run the punctuation, hyphenation and correction passes.
/// Returns (text, substitution_count).
#[pyfunction]
fn normalize_text(text: String) -> PyResult<(String, u64)> {
    let normalized = TextNormalizer::default().normalize_counted(&text);
    Ok((normalized.text, normalized.corrections))
}

/// Remove the space before punctuation left by tokenization
#[pyfunction]
fn adjust_punctuation(text: String) -> PyResult<String> {
    Ok(Rejoiner::default().rejoin(&text))
}

#[pyclass(name = "Cleaner")]
struct PyCleaner {
    inner: Cleaner,
    entities: EntityRegistry,
}

#[pymethods]
impl PyCleaner {
    #[new]
    #[pyo3(signature = (wordlist, entities_path=None, config_path=None))]
    fn new(
        wordlist: PathBuf,
        entities_path: Option<PathBuf>,
        config_path: Option<PathBuf>,
    ) -> PyResult<Self> {
        let mut config = match config_path {
            Some(path) => CleanerConfig::load(&path)?,
            None => CleanerConfig::default(),
        };
        config.lexicon.wordlist = Some(wordlist);

        let entities = match entities_path {
            Some(path) => EntityRegistry::load(&path)?,
            None => EntityRegistry::new(),
        };

        Ok(Self {
            inner: Cleaner::from_config(config)?,
            entities,
        })
    }

    /// Clean a text. Returns (cleaned_text, recognized, total).
    fn clean_text(&self, text: String) -> (String, usize, usize) {
        let cleaned = self
            .inner
            .clean(&Document::new("<text>", text), &self.entities);
        (
            cleaned.text,
            cleaned.classification.recognized,
            cleaned.classification.total,
        )
    }

    /// Clean a single file, reading and writing entirely in Rust.
    /// Returns (accuracy, recognized, total); accuracy is None for an
    /// empty document.
    fn clean_file_to_file(
        &self,
        input_path: String,
        output_path: String,
    ) -> PyResult<(Option<f64>, usize, usize)> {
        let content = read_article(Path::new(&input_path))
            .map_err(|e| PyIOError::new_err(format!("Failed to read {}: {}", input_path, e)))?;

        let cleaned = self
            .inner
            .clean(&Document::new(input_path.as_str(), content), &self.entities);

        let out_path = Path::new(&output_path);
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                PyIOError::new_err(format!("Failed to create directory: {}", e))
            })?;
        }
        fs::write(out_path, &cleaned.text)
            .map_err(|e| PyIOError::new_err(format!("Failed to write {}: {}", output_path, e)))?;

        Ok((
            cleaned.accuracy(),
            cleaned.classification.recognized,
            cleaned.classification.total,
        ))
    }
}

#[pymodule]
fn trove_ocr_clean(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(normalize_text, m)?)?;
    m.add_function(wrap_pyfunction!(adjust_punctuation, m)?)?;
    m.add_class::<PyCleaner>()?;
    Ok(())
}
