//! Pipeline configuration, loaded from TOML.
//!
//! Every field has a default, so an empty file is a valid config. Only
//! `lexicon.wordlist` must be set before resources can be loaded from disk.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::corrections::{Correction, CorrectionTable};
use crate::error::{Error, Result};
use crate::punctuation::DEFAULT_PUNCTUATION;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanerConfig {
    /// Marker written in place of unrecognized words
    pub placeholder: String,
    pub punctuation: Vec<String>,
    /// One-letter words kept as real words; other single letters are dropped
    pub single_letters: Vec<String>,
    /// NFKC fold before the rewrite passes. On by default, so default output
    /// differs from the bare pass list: ligatures become letters, and
    /// fractions (`½` -> `1⁄2`) and superscripts (`²` -> `2`) are rewritten too.
    /// Turn off to run only the punctuation, whitespace and correction passes.
    pub fold_compatibility: bool,
    pub apply_corrections: bool,
    pub corrections: Vec<Correction>,
    /// Clean batch documents on the rayon pool
    pub parallel: bool,
    /// Flag documents whose detected language isn't English
    pub check_language: bool,
    pub entities_file: String,
    /// Per-harvest entity names written by an external extraction pass
    pub names_file: String,
    pub output_dir: String,
    pub report_file: String,
    pub lexicon: LexiconConfig,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            placeholder: "[?]".to_string(),
            punctuation: DEFAULT_PUNCTUATION.iter().map(|p| p.to_string()).collect(),
            single_letters: vec!["a".to_string(), "i".to_string()],
            fold_compatibility: true,
            apply_corrections: true,
            corrections: CorrectionTable::default_entries(),
            parallel: true,
            check_language: true,
            entities_file: "entities.txt".to_string(),
            names_file: "entity_names.txt".to_string(),
            output_dir: "cleaned".to_string(),
            report_file: "accuracy.txt".to_string(),
            lexicon: LexiconConfig::default(),
        }
    }
}

/// Where the vocabulary and normalizer resources live
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LexiconConfig {
    pub wordlist: Option<PathBuf>,
    pub lemmas: Option<PathBuf>,
    pub exceptions: Option<PathBuf>,
    pub hunspell_dir: Option<PathBuf>,
    pub hunspell_name: String,
}

impl Default for LexiconConfig {
    fn default() -> Self {
        Self {
            wordlist: None,
            lemmas: None,
            exceptions: None,
            hunspell_dir: None,
            hunspell_name: "en_US".to_string(),
        }
    }
}

impl LexiconConfig {
    /// Resolve relative paths against `base`
    fn rebase(&mut self, base: &Path) {
        for path in [
            &mut self.wordlist,
            &mut self.lemmas,
            &mut self.exceptions,
            &mut self.hunspell_dir,
        ]
        .into_iter()
        .flatten()
        {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}

impl CleanerConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: CleanerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML file. Relative lexicon paths are taken relative to the
    /// file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::MissingResource {
                what: "config file",
                path: path.to_path_buf(),
            });
        }
        let content = fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&content)?;
        if let Some(base) = path.parent() {
            config.lexicon.rebase(base);
        }
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.placeholder.trim().is_empty() {
            return Err(Error::Config("placeholder must not be empty".to_string()));
        }
        if let Some(letter) = self
            .single_letters
            .iter()
            .find(|l| l.chars().count() != 1)
        {
            return Err(Error::Config(format!(
                "single_letters entry {:?} is not one character",
                letter
            )));
        }
        if self.entities_file.is_empty()
            || self.names_file.is_empty()
            || self.report_file.is_empty()
        {
            return Err(Error::Config(
                "entities_file, names_file and report_file must be set".to_string(),
            ));
        }
        Ok(())
    }

    /// Compile the correction table, or `None` when corrections are off
    pub fn correction_table(&self) -> Result<Option<CorrectionTable>> {
        if !self.apply_corrections {
            return Ok(None);
        }
        Ok(Some(CorrectionTable::new(self.corrections.iter().cloned())?))
    }
}
