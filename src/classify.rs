//! Token recognition: decides, token by token, whether OCR output is a
//! real word.
//!
//! Each token's lowercase form goes through a fixed chain of lookups and the
//! first one with an answer decides:
//!
//! 1. punctuation marks are recognized
//! 2. single letters other than the kept ones (`a`, `i`) are dropped
//! 3. words in the lexicon are recognized
//! 4. words a normalizer can reduce to a base form are recognized
//! 5. words in the entity registry are recognized
//!
//! Anything left is replaced by the placeholder. Dropped letters and
//! placeholders both count against accuracy, but only placeholders show up
//! in the cleaned text.

use std::collections::HashSet;

use crate::config::CleanerConfig;
use crate::entities::EntityRegistry;
use crate::lexicon::LexiconProvider;
use crate::tokenize::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Recognition {
    Punctuation,
    Lexicon,
    BaseForm,
    Entity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    /// Lone OCR letter, removed from the output
    StrayLetter,
    /// Replaced with the placeholder
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    Recognized(Recognition),
    Substituted(Rejection),
}

impl Classification {
    pub fn is_recognized(&self) -> bool {
        matches!(self, Classification::Recognized(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedToken {
    pub token: Token,
    pub classification: Classification,
    /// What goes into the cleaned text; `None` when the token is dropped
    pub output: Option<String>,
}

/// Classified tokens of one document, in document order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentClassification {
    pub tokens: Vec<ClassifiedToken>,
    pub recognized: usize,
    pub total: usize,
}

impl DocumentClassification {
    /// Percentage of recognized tokens, `None` for a document with no tokens
    pub fn accuracy(&self) -> Option<f64> {
        if self.total == 0 {
            return None;
        }
        Some(self.recognized as f64 * 100.0 / self.total as f64)
    }

    /// Output forms in order, dropped tokens skipped
    pub fn clean_tokens(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().filter_map(|t| t.output.as_deref())
    }

    /// Output forms joined by single spaces, before punctuation re-joining
    pub fn clean_text(&self) -> String {
        self.clean_tokens().collect::<Vec<_>>().join(" ")
    }

    /// Surface forms of every rejected token, dropped letters included
    pub fn dirty(&self) -> impl Iterator<Item = &str> {
        self.tokens
            .iter()
            .filter(|t| !t.classification.is_recognized())
            .map(|t| t.token.surface.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct Classifier {
    punctuation: HashSet<String>,
    single_letters: HashSet<String>,
    placeholder: String,
}

impl Classifier {
    pub fn new<P, L>(punctuation: P, single_letters: L, placeholder: impl Into<String>) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
        L: IntoIterator,
        L::Item: Into<String>,
    {
        Self {
            punctuation: punctuation.into_iter().map(Into::into).collect(),
            single_letters: single_letters
                .into_iter()
                .map(|l| l.into().to_lowercase())
                .collect(),
            placeholder: placeholder.into(),
        }
    }

    pub fn from_config(config: &CleanerConfig) -> Self {
        Self::new(
            config.punctuation.iter().cloned(),
            config.single_letters.iter().cloned(),
            config.placeholder.clone(),
        )
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Lowercase token forms of a document that the lexicon doesn't list
    pub fn unusual_words(tokens: &[Token], lexicon: &LexiconProvider) -> HashSet<String> {
        tokens
            .iter()
            .map(|t| t.lower.as_str())
            .filter(|w| !lexicon.contains(w))
            .map(str::to_string)
            .collect()
    }

    pub fn classify(
        &self,
        tokens: Vec<Token>,
        lexicon: &LexiconProvider,
        entities: &EntityRegistry,
    ) -> DocumentClassification {
        let lookups = DocumentLookups {
            classifier: self,
            lexicon,
            entities,
            unusual: Self::unusual_words(&tokens, lexicon),
        };

        let mut result = DocumentClassification {
            total: tokens.len(),
            ..Default::default()
        };

        for token in tokens {
            let classification = lookups.classify(&token);
            let output = match classification {
                Classification::Recognized(_) => {
                    result.recognized += 1;
                    Some(token.surface.clone())
                }
                Classification::Substituted(Rejection::StrayLetter) => None,
                Classification::Substituted(Rejection::Unknown) => Some(self.placeholder.clone()),
            };
            result.tokens.push(ClassifiedToken {
                token,
                classification,
                output,
            });
        }

        result
    }
}

/// Per-document view over the shared resources
struct DocumentLookups<'a> {
    classifier: &'a Classifier,
    lexicon: &'a LexiconProvider,
    entities: &'a EntityRegistry,
    unusual: HashSet<String>,
}

type Lookup<'a> = fn(&DocumentLookups<'a>, &Token) -> Option<Classification>;

impl<'a> DocumentLookups<'a> {
    fn classify(&self, token: &Token) -> Classification {
        let chain: [Lookup<'a>; 5] = [
            Self::punctuation_mark,
            Self::stray_letter,
            Self::known_word,
            Self::inflected_form,
            Self::entity,
        ];
        chain
            .iter()
            .find_map(|lookup| lookup(self, token))
            .unwrap_or(Classification::Substituted(Rejection::Unknown))
    }

    fn punctuation_mark(&self, token: &Token) -> Option<Classification> {
        self.classifier
            .punctuation
            .contains(&token.lower)
            .then_some(Classification::Recognized(Recognition::Punctuation))
    }

    fn stray_letter(&self, token: &Token) -> Option<Classification> {
        (token.char_len() == 1 && !self.classifier.single_letters.contains(&token.lower))
            .then_some(Classification::Substituted(Rejection::StrayLetter))
    }

    fn known_word(&self, token: &Token) -> Option<Classification> {
        (!self.unusual.contains(&token.lower))
            .then_some(Classification::Recognized(Recognition::Lexicon))
    }

    fn inflected_form(&self, token: &Token) -> Option<Classification> {
        self.lexicon
            .base_form(&token.lower)
            .map(|_| Classification::Recognized(Recognition::BaseForm))
    }

    fn entity(&self, token: &Token) -> Option<Classification> {
        self.entities
            .contains(&token.lower)
            .then_some(Classification::Recognized(Recognition::Entity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::{Lexicon, MorphyNormalizer};
    use crate::punctuation::DEFAULT_PUNCTUATION;
    use crate::tokenize::tokenize;

    fn classifier() -> Classifier {
        Classifier::new(DEFAULT_PUNCTUATION.iter().copied(), ["a", "i"], "[?]")
    }

    fn provider() -> LexiconProvider {
        LexiconProvider::new(Lexicon::from_words(["the", "cat", "sat"]))
            .with_normalizer(MorphyNormalizer::new(["on", "mat", "dog"]))
    }

    fn tokens(words: &[&str]) -> Vec<Token> {
        words.iter().map(|w| Token::new(*w)).collect()
    }

    #[test]
    fn test_only_misspelling_substituted() {
        let result = classifier().classify(
            tokens(&["The", "cat", "sat", "on", "teh", "mat"]),
            &provider(),
            &EntityRegistry::new(),
        );

        assert_eq!(
            result.clean_tokens().collect::<Vec<_>>(),
            vec!["The", "cat", "sat", "on", "[?]", "mat"]
        );
        assert_eq!(result.recognized, 5);
        assert_eq!(result.total, 6);
        assert_eq!(result.accuracy(), Some(500.0 / 6.0));

        let substituted: Vec<&str> = result.dirty().collect();
        assert_eq!(substituted, vec!["teh"]);
        assert_eq!(
            result.tokens[4].classification,
            Classification::Substituted(Rejection::Unknown)
        );
        assert_eq!(
            result.tokens[3].classification,
            Classification::Recognized(Recognition::BaseForm)
        );
        assert_eq!(
            result.tokens[0].classification,
            Classification::Recognized(Recognition::Lexicon)
        );
    }

    #[test]
    fn test_stray_letters_dropped() {
        let result = classifier().classify(
            tokens(&["the", "x", "cat", "a", "I", "sat"]),
            &provider(),
            &EntityRegistry::new(),
        );
        // "x" is dropped; "a" and "I" survive the letter filter but this
        // lexicon doesn't know them
        assert_eq!(result.clean_text(), "the cat [?] [?] sat");
        assert_eq!(result.total, 6);
        assert_eq!(result.recognized, 3);
        assert_eq!(
            result.tokens[1].classification,
            Classification::Substituted(Rejection::StrayLetter)
        );
        assert_eq!(result.tokens[1].output, None);
        assert_eq!(result.tokens[3].output.as_deref(), Some("[?]"));
    }

    #[test]
    fn test_entities_after_base_forms() {
        let entities = EntityRegistry::from_fragments(["deakin", "dogs"]);
        let result = classifier().classify(
            tokens(&["Deakin", "dogs", "Barton"]),
            &provider(),
            &entities,
        );
        assert_eq!(result.clean_text(), "Deakin dogs [?]");
        assert_eq!(
            result.tokens[0].classification,
            Classification::Recognized(Recognition::Entity)
        );
        // Base form lookup comes first
        assert_eq!(
            result.tokens[1].classification,
            Classification::Recognized(Recognition::BaseForm)
        );
    }

    #[test]
    fn test_punctuation_recognized() {
        let result = classifier().classify(
            tokenize("the cat ( sat ) ; \" ' ! ?"),
            &provider(),
            &EntityRegistry::new(),
        );
        assert_eq!(result.recognized, result.total);
        assert_eq!(result.accuracy(), Some(100.0));
    }

    #[test]
    fn test_other_symbols_are_stray() {
        let result = classifier().classify(tokenize("cat & mat"), &provider(), &EntityRegistry::new());
        assert_eq!(result.clean_text(), "cat mat");
        assert_eq!(result.recognized, 2);
        assert_eq!(result.total, 3);
    }

    #[test]
    fn test_empty_document() {
        let result = classifier().classify(Vec::new(), &provider(), &EntityRegistry::new());
        assert_eq!(result.total, 0);
        assert_eq!(result.accuracy(), None);
        assert_eq!(result.clean_text(), "");
    }

    #[test]
    fn test_counts_bounded() {
        let inputs = [
            "",
            "x y z",
            "The cat sat on the mat.",
            "Tlie qnick brown f ox , jumped ! !",
            "1901 1902 . , ;",
        ];
        for input in inputs {
            let result = classifier().classify(tokenize(input), &provider(), &EntityRegistry::new());
            assert!(result.recognized <= result.total, "input: {:?}", input);
            assert_eq!(result.tokens.len(), result.total);
            if let Some(accuracy) = result.accuracy() {
                assert!((0.0..=100.0).contains(&accuracy));
                assert_eq!(
                    accuracy,
                    result.recognized as f64 * 100.0 / result.total as f64
                );
            }
        }
    }

    #[test]
    fn test_unusual_words() {
        let unusual = Classifier::unusual_words(&tokens(&["The", "Cat", "teh", "TEH"]), &provider());
        assert_eq!(unusual.len(), 1);
        assert!(unusual.contains("teh"));
    }

    #[test]
    fn test_custom_placeholder() {
        let classifier = Classifier::new([","], ["a"], "<unk>");
        let result = classifier.classify(tokens(&["cat", "qqq"]), &provider(), &EntityRegistry::new());
        assert_eq!(result.clean_text(), "cat <unk>");
        assert_eq!(classifier.placeholder(), "<unk>");
    }
}
