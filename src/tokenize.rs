//! Word and punctuation tokenizer.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // A run of word characters, or any single other non-space character
    static ref TOKEN_PATTERN: Regex = Regex::new(r"\w+|[^\w\s]").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Word,
    Symbol,
}

/// A token in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Form as it appeared in the text
    pub surface: String,
    /// Lowercased, trimmed form used for lookups
    pub lower: String,
    pub kind: TokenKind,
}

impl Token {
    pub fn new(surface: impl Into<String>) -> Self {
        let surface = surface.into();
        let lower = surface.trim().to_lowercase();
        let kind = match lower.chars().next() {
            Some(c) if c.is_alphanumeric() || c == '_' => TokenKind::Word,
            _ => TokenKind::Symbol,
        };
        Self {
            surface,
            lower,
            kind,
        }
    }

    pub fn is_word(&self) -> bool {
        self.kind == TokenKind::Word
    }

    /// Length of the lookup form in characters
    pub fn char_len(&self) -> usize {
        self.lower.chars().count()
    }
}

/// Split text into tokens, preserving order. Whitespace is discarded.
pub fn tokenize(text: &str) -> Vec<Token> {
    TOKEN_PATTERN
        .find_iter(text)
        .map(|m| Token::new(m.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surfaces(text: &str) -> Vec<String> {
        tokenize(text).into_iter().map(|t| t.surface).collect()
    }

    #[test]
    fn test_splits_words_and_punctuation() {
        assert_eq!(
            surfaces("The cat sat, (quietly) on the mat."),
            vec!["The", "cat", "sat", ",", "(", "quietly", ")", "on", "the", "mat", "."]
        );
    }

    #[test]
    fn test_punctuation_runs_are_single_chars() {
        assert_eq!(surfaces("wait..."), vec!["wait", ".", ".", "."]);
    }

    #[test]
    fn test_lower_and_kind() {
        let tokens = tokenize("Sydney 1901 ;");
        assert_eq!(tokens[0].lower, "sydney");
        assert!(tokens[0].is_word());
        assert!(tokens[1].is_word());
        assert_eq!(tokens[2].kind, TokenKind::Symbol);
    }

    #[test]
    fn test_empty() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \n ").is_empty());
    }

    #[test]
    fn test_char_len_counts_chars() {
        assert_eq!(Token::new("é").char_len(), 1);
        assert_eq!(Token::new("ab").char_len(), 2);
    }
}
