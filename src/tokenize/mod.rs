//! Tokenizer collaborator interface
//!
//! The ingestor consumes any `Tokenizer` implementation. Tokenizers must be
//! deterministic per input and must classify sentence-boundary markers
//! distinctly from ordinary words; morphological analyzers plug in through
//! the same trait.

use serde::{Deserialize, Serialize};

/// One token produced by a tokenizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Literal text form
    pub surface: String,
    /// Ordered morphological/category features (may be empty)
    pub features: Vec<String>,
    /// Whether this token marks a sentence boundary rather than a word
    pub boundary_class: bool,
}

impl Token {
    /// Create a word-class token.
    pub fn word(surface: impl Into<String>, features: Vec<String>) -> Self {
        Self {
            surface: surface.into(),
            features,
            boundary_class: false,
        }
    }

    /// Create a boundary-class token.
    pub fn boundary(surface: impl Into<String>) -> Self {
        Self {
            surface: surface.into(),
            features: Vec::new(),
            boundary_class: true,
        }
    }
}

/// Splits one raw input line into an ordered token sequence.
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, line: &str) -> Vec<Token>;
}

/// Whitespace tokenizer for space-delimited text.
///
/// Emits word-class tokens with empty feature sets and never emits
/// boundary-class tokens; the ingestor's implicit boundary wrapping covers
/// sentence starts and ends.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpaceTokenizer;

impl SpaceTokenizer {
    pub fn new() -> Self {
        Self
    }
}

impl Tokenizer for SpaceTokenizer {
    fn tokenize(&self, line: &str) -> Vec<Token> {
        line.split_whitespace()
            .map(|w| Token::word(w, Vec::new()))
            .collect()
    }
}
