use crate::checker::dictionary::Dictionary;
use crate::checker::tokenizer::{strip_possessive, word_spans};
use crate::Span;
use anyhow::{Context, Result};
use dashmap::DashSet;
use lazy_static::lazy_static;
use regex::Regex;
use std::sync::Arc;

/// The spell-detection capability `SpellCore` delegates to.
///
/// `add_word` takes `&self`: one detector is shared by every core built on
/// it, and the custom dictionary it extends is shared with them.
pub trait SpellDetector {
    /// Spans of every unrecognised token in `text`, in text order.
    fn check_spelling(&self, text: &str) -> Result<Vec<Span>>;

    /// Extend the custom dictionary. Words are never removed.
    ///
    /// A word that spans several tokens (`wibble-wobble`) may be stored as
    /// the parts `check_spelling` splits it into.
    fn add_word(&self, word: &str) -> Result<()>;
}

impl<D: SpellDetector + ?Sized> SpellDetector for Arc<D> {
    fn check_spelling(&self, text: &str) -> Result<Vec<Span>> {
        (**self).check_spelling(text)
    }

    fn add_word(&self, word: &str) -> Result<()> {
        (**self).add_word(word)
    }
}

lazy_static! {
    static ref SHARED: Arc<DictionaryDetector> =
        Arc::new(DictionaryDetector::new(
        Dictionary::embedded().expect("embedded word list is valid")
    ));
}

/// Dictionary-lookup detector: a token is misspelled when neither the base
/// dictionary nor the custom dictionary knows it.
pub struct DictionaryDetector {
    dictionary: Dictionary,
    custom_words: DashSet<String>,
    ignore_patterns: Vec<Regex>,
}

impl DictionaryDetector {
    pub fn new(dictionary: Dictionary) -> Self {
        Self {
            dictionary,
            custom_words: DashSet::new(),
            ignore_patterns: Vec::new(),
        }
    }

    /// Process-wide detector over the embedded English dictionary.
    pub fn shared() -> Arc<DictionaryDetector> {
        Arc::clone(&SHARED)
    }

    /// Tokens matching any of these patterns are never flagged.
    pub fn with_ignore_patterns<I, S>(mut self, patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        // Compile ignore patterns
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let re = Regex::new(pattern)
                .with_context(|| format!("Invalid ignore pattern '{}'", pattern))?;
            self.ignore_patterns.push(re);
        }
        Ok(self)
    }

    pub fn knows(&self, word: &str) -> bool {
        // Both dictionaries are stored lowercase
        let lower = word.to_lowercase();
        if self.dictionary.contains(&lower) || self.custom_words.contains(&lower) {
            return true;
        }

        // Fall back to the stem of a possessive
        match strip_possessive(&lower) {
            Some(stem) => self.dictionary.contains(stem) || self.custom_words.contains(stem),
            None => false,
        }
    }

    fn should_ignore(&self, word: &str) -> bool {
        // Skip single characters
        if word.chars().count() <= 1 {
            return true;
        }

        // Skip all numbers
        if word.chars().all(|c| c.is_numeric() || c == '.' || c == ',') {
            return true;
        }

        // Skip configured patterns (ALL_CAPS, hashes, ...)
        self.ignore_patterns.iter().any(|p| p.is_match(word))
    }
}

impl SpellDetector for DictionaryDetector {
    fn check_spelling(&self, text: &str) -> Result<Vec<Span>> {
        Ok(word_spans(text)
            .filter(|(_, word)| !self.should_ignore(word) && !self.knows(word))
            .map(|(span, _)| span)
            .collect())
    }

    fn add_word(&self, word: &str) -> Result<()> {
        let lower = word.to_lowercase();

        // Store each token the tokenizer would produce, so hyphenated or
        // dotted words are recognised piece by piece
        let mut parts = word_spans(&lower).map(|(_, part)| part).peekable();
        if parts.peek().is_none() {
            self.custom_words.insert(lower.clone());
        }
        for part in parts {
            self.custom_words.insert(part.to_string());
        }
        Ok(())
    }
}
