//! Whole-word substitutions for frequent OCR misreadings.
//!
//! Each entry only matches a complete word, so `th` never fires inside `the`.
//! Matching is case-sensitive: `tbe` and `Tbe` are separate entries.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One `(bad, good)` literal substitution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Correction {
    pub bad: String,
    pub good: String,
}

impl Correction {
    pub fn new(bad: impl Into<String>, good: impl Into<String>) -> Self {
        Self {
            bad: bad.into(),
            good: good.into(),
        }
    }
}

/// Built-in table of common misreadings found in digitised newspapers.
///
/// Only forms that are never valid English words are listed here; ambiguous
/// ones (`arid`, `fame`, `horne`) need context and are left alone.
pub const DEFAULT_CORRECTIONS: &[(&str, &str)] = &[
    ("Hie", "the"),
    // 'the' variants
    ("tbe", "the"),
    ("tlie", "the"),
    ("tiie", "the"),
    ("tbc", "the"),
    ("ihe", "the"),
    ("thc", "the"),
    ("tke", "the"),
    ("llie", "the"),
    // 'this' / 'that'
    ("tbis", "this"),
    ("tliis", "this"),
    ("tbat", "that"),
    ("tliat", "that"),
    ("thnt", "that"),
    // wh- words
    ("wbich", "which"),
    ("whicb", "which"),
    ("wliich", "which"),
    ("wliat", "what"),
    ("wlien", "when"),
    ("wben", "when"),
    ("wliere", "where"),
    ("wbere", "where"),
    ("wliile", "while"),
    ("wlio", "who"),
    // pronouns
    ("liim", "him"),
    ("liis", "his"),
    ("slie", "she"),
    ("tliey", "they"),
    ("tbey", "they"),
    ("tbeir", "their"),
    ("tlieir", "their"),
    ("tbem", "them"),
    ("tliem", "them"),
    ("tben", "then"),
    ("tlien", "then"),
    ("tbere", "there"),
    ("tliere", "there"),
    // function words
    ("aud", "and"),
    ("nnd", "and"),
    ("witb", "with"),
    ("witli", "with"),
    ("bave", "have"),
    ("liave", "have"),
    ("frorn", "from"),
    ("wonld", "would"),
    ("conld", "could"),
    ("sbould", "should"),
    ("sliould", "should"),
    ("npon", "upon"),
    ("sucb", "such"),
    ("snch", "such"),
    ("mnch", "much"),
    ("mnst", "must"),
    // rn/m confusion
    ("rnay", "may"),
    ("rnuch", "much"),
    ("rnore", "more"),
    ("tirne", "time"),
    // ll read as U
    ("wiU", "will"),
    ("weU", "well"),
    ("stiU", "still"),
    ("shaU", "shall"),
    ("caUed", "called"),
    ("aU", "all"),
    // long-s read as f
    ("fuch", "such"),
    ("faid", "said"),
    ("fhall", "shall"),
    ("fhould", "should"),
    ("himfelf", "himself"),
    ("itfelf", "itself"),
    // ffi ligature damage
    ("oflSce", "office"),
    ("oflScer", "officer"),
    ("difTerent", "different"),
];

/// Ordered, compiled correction table
#[derive(Debug, Clone)]
pub struct CorrectionTable {
    entries: Vec<(Regex, Correction)>,
}

impl CorrectionTable {
    /// Compile a table; entries are applied in the order given.
    pub fn new(corrections: impl IntoIterator<Item = Correction>) -> Result<Self> {
        let mut entries = Vec::new();
        for correction in corrections {
            if correction.bad.trim().is_empty() {
                return Err(Error::Config(
                    "correction with an empty bad form".to_string(),
                ));
            }
            let pattern = Regex::new(&format!(r"\b{}\b", regex::escape(&correction.bad)))?;
            entries.push((pattern, correction));
        }
        Ok(Self { entries })
    }

    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// The built-in table as plain entries, for configs and serialization
    pub fn default_entries() -> Vec<Correction> {
        DEFAULT_CORRECTIONS
            .iter()
            .map(|(bad, good)| Correction::new(*bad, *good))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Apply every entry in order. Returns the corrected text and the number
    /// of substitutions made.
    pub fn apply(&self, text: &str) -> (String, u64) {
        let mut result = text.to_string();
        let mut total_subs: u64 = 0;

        for (pattern, correction) in &self.entries {
            let count = pattern.find_iter(&result).count();
            if count > 0 {
                result = pattern
                    .replace_all(&result, regex::NoExpand(&correction.good))
                    .into_owned();
                total_subs += count as u64;
            }
        }

        (result, total_subs)
    }
}

impl Default for CorrectionTable {
    fn default() -> Self {
        // Entries are escaped literals, compilation cannot fail.
        Self::new(Self::default_entries()).unwrap_or_else(|_| Self::empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_word_only() {
        let table = CorrectionTable::new([Correction::new("th", "the")]).unwrap();
        let (text, subs) = table.apply("the thick");
        assert_eq!(text, "the thick");
        assert_eq!(subs, 0);

        let (text, subs) = table.apply("th cat, th.");
        assert_eq!(text, "the cat, the.");
        assert_eq!(subs, 2);
    }

    #[test]
    fn test_case_sensitive() {
        let table = CorrectionTable::new([Correction::new("Hie", "the")]).unwrap();
        let (text, subs) = table.apply("Hie hie HIE");
        assert_eq!(text, "the hie HIE");
        assert_eq!(subs, 1);
    }

    #[test]
    fn test_order_is_preserved() {
        // Second entry sees the output of the first.
        let table = CorrectionTable::new([
            Correction::new("tbe", "tlie"),
            Correction::new("tlie", "the"),
        ])
        .unwrap();
        assert_eq!(table.apply("tbe end").0, "the end");
    }

    #[test]
    fn test_replacement_is_literal() {
        let table = CorrectionTable::new([Correction::new("cost", "$1")]).unwrap();
        assert_eq!(table.apply("the cost").0, "the $1");
    }

    #[test]
    fn test_empty_bad_form_rejected() {
        let err = CorrectionTable::new([Correction::new(" ", "x")]).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_default_table() {
        let table = CorrectionTable::default();
        assert_eq!(table.len(), DEFAULT_CORRECTIONS.len());
        let (text, subs) = table.apply("tbe man aud Hie dog wiU go");
        assert_eq!(text, "the man and the dog will go");
        assert_eq!(subs, 4);
    }
}
