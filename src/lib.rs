pub mod checker;
pub mod cli;
pub mod config;
pub mod dict;
pub mod error;
pub mod filter;
pub mod options;

pub use checker::detector::{DictionaryDetector, SpellDetector};
pub use checker::SpellCore;
pub use error::{ConfigError, Error, Result};
pub use filter::TextFilter;
pub use options::{Handlers, Options, Reporter};

use serde::Serialize;

/// Outcome of a single `SpellCore::check` call.
///
/// Both lists keep detection order and keep duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    pub error_words: Vec<String>,
    pub warning_words: Vec<String>,
}

impl Report {
    pub fn is_clean(&self) -> bool {
        self.error_words.is_empty() && self.warning_words.is_empty()
    }
}

/// Half-open byte range `[start, end)` of a flagged token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}
