//! Pattern rewrites that repair punctuation and hyphenation damage in raw
//! OCR text before it is tokenized.
//!
//! The passes run in a fixed order and each one sees the output of the one
//! before it. Splitting compounds before joining line-wrapped words would
//! break `exam-\nple` in two, so the order is part of the contract.

use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::corrections::CorrectionTable;

lazy_static! {
    static ref REWRITE_PASSES: Vec<(Regex, &'static str)> = vec![
        // Missing space after a full stop: "word.Next" -> "word. Next"
        (Regex::new(r"(\w)\.(\S)").unwrap(), "${1}. ${2}"),
        // Hyphenated word wrapped across a line break
        (Regex::new(r"(\w)-\s+(\w)").unwrap(), "${1}${2}"),
        // Compound words become two tokens
        (Regex::new(r"(\w)-(\w)").unwrap(), "${1} ${2}"),
        // Stray punctuation glued to the front of a word
        (Regex::new(r"\.(\w)").unwrap(), " ${1}"),
        (Regex::new(r"-(\w)").unwrap(), " ${1}"),
        (Regex::new(r",(\w)").unwrap(), " ${1}"),
        (Regex::new(r"'(\w)").unwrap(), " ${1}"),
    ];

    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Output of a normalization run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub text: String,
    /// Number of correction table substitutions applied
    pub corrections: u64,
}

#[derive(Debug, Clone)]
pub struct TextNormalizer {
    fold_compatibility: bool,
    corrections: Option<CorrectionTable>,
}

impl TextNormalizer {
    pub fn new(fold_compatibility: bool, corrections: Option<CorrectionTable>) -> Self {
        Self {
            fold_compatibility,
            corrections,
        }
    }

    /// Punctuation and whitespace passes only, no folding or corrections
    pub fn plain() -> Self {
        Self::new(false, None)
    }

    pub fn normalize(&self, text: &str) -> String {
        self.normalize_counted(text).text
    }

    pub fn normalize_counted(&self, text: &str) -> Normalized {
        let mut result = if self.fold_compatibility {
            // Ligatures (ﬁ, ﬂ, ﬀ) and other compatibility forms
            text.nfkc().collect::<String>()
        } else {
            text.to_string()
        };

        for (pattern, replacement) in REWRITE_PASSES.iter() {
            if pattern.is_match(&result) {
                result = pattern.replace_all(&result, *replacement).into_owned();
            }
        }

        result = collapse_whitespace(&result);

        let mut corrections = 0;
        if let Some(table) = &self.corrections {
            let (corrected, subs) = table.apply(&result);
            result = corrected;
            corrections = subs;
        }

        Normalized {
            text: result,
            corrections,
        }
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new(true, Some(CorrectionTable::default()))
    }
}

/// Collapse every run of whitespace, line breaks included, to one space
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").into_owned()
}
