//! Query tokenizer.
//!
//! Pipeline: lowercase → split on whitespace → drop 1-char tokens
//!           → strip non-word characters → optional stem
//!
//! The stemmer should be the same algorithm used when the searched indices
//! were built (Sphinx indexes English documentation with Porter stems), or
//! stemmed index terms will not match.

use std::fmt;
use std::sync::Arc;

/// A pluggable stemming function.
///
/// Implemented for any `Fn(&str) -> String`, so a closure or a function
/// from a stemming crate can be installed directly.
pub trait Stemmer: Send + Sync {
    /// Reduce `word` (lowercase, already stripped) to its stem.
    fn stem(&self, word: &str) -> String;
}

impl<F> Stemmer for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn stem(&self, word: &str) -> String {
        self(word)
    }
}

/// Turns a free-text query into search terms.
#[derive(Clone, Default)]
pub struct Tokenizer {
    stemmer: Option<Arc<dyn Stemmer>>,
}

impl fmt::Debug for Tokenizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tokenizer")
            .field("stemmer", &self.stemmer.is_some())
            .finish()
    }
}

impl Tokenizer {
    /// A tokenizer without stemming.
    pub fn new() -> Self {
        Self::default()
    }

    /// A tokenizer that stems every token with `stemmer`.
    pub fn with_stemmer(stemmer: Arc<dyn Stemmer>) -> Self {
        Self {
            stemmer: Some(stemmer),
        }
    }

    /// Tokenize `text`. Order and duplicates are preserved.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let tokens = tokenize(text);
        match &self.stemmer {
            Some(stemmer) => tokens.iter().map(|t| stemmer.stem(t)).collect(),
            None => tokens,
        }
    }
}

/// Tokenize without stemming.
///
/// # Example
///
/// ```
/// use hed_search::tokenizer::tokenize;
///
/// assert_eq!(tokenize("Event Marker"), vec!["event", "marker"]);
/// assert!(tokenize("a").is_empty());
/// ```
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .filter(|t| t.chars().count() > 1)
        .map(|t| t.chars().filter(|&c| is_term_char(c)).collect::<String>())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Word characters (`[A-Za-z0-9_]`) and hyphens survive stripping.
fn is_term_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}
