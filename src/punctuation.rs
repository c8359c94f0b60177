//! Removes the space tokenization leaves in front of punctuation.

use regex::Regex;

use crate::error::Result;

/// Marks treated as punctuation by the classifier and the re-joiner
pub const DEFAULT_PUNCTUATION: &[&str] = &[",", ".", ";", ":", "(", ")", "?", "!", "\"", "'"];

#[derive(Debug, Clone)]
pub struct Rejoiner {
    pattern: Option<Regex>,
}

impl Rejoiner {
    pub fn new<S: AsRef<str>>(marks: &[S]) -> Result<Self> {
        let alternatives: Vec<String> = marks
            .iter()
            .map(|m| m.as_ref())
            .filter(|m| !m.is_empty())
            .map(regex::escape)
            .collect();
        if alternatives.is_empty() {
            return Ok(Self { pattern: None });
        }
        let pattern = Regex::new(&format!(r"(\w)\s+({})", alternatives.join("|")))?;
        Ok(Self {
            pattern: Some(pattern),
        })
    }

    /// `word .` becomes `word.`. Applying it twice changes nothing more.
    pub fn rejoin(&self, text: &str) -> String {
        match &self.pattern {
            Some(pattern) => pattern.replace_all(text, "${1}${2}").into_owned(),
            None => text.to_string(),
        }
    }
}

impl Default for Rejoiner {
    fn default() -> Self {
        Self::new(DEFAULT_PUNCTUATION).unwrap_or(Self { pattern: None })
    }
}
