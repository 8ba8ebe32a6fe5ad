pub mod markdown;
pub mod pattern;

pub use markdown::MarkdownCodeFilter;
pub use pattern::PatternFilter;

use anyhow::Result;

/// Preprocessing step applied to text before it reaches the detector.
///
/// Spans are computed against the filtered text, so a filter is free to
/// change offsets.
pub trait TextFilter {
    fn apply(&self, text: &str) -> Result<String>;
}

impl<F> TextFilter for F
where
    F: Fn(&str) -> String,
{
    fn apply(&self, text: &str) -> Result<String> {
        Ok(self(text))
    }
}

/// Passes text through unchanged. Used when no filter is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl TextFilter for Identity {
    fn apply(&self, text: &str) -> Result<String> {
        Ok(text.to_string())
    }
}

/// Runs filters left to right, feeding each the previous output.
#[derive(Default)]
pub struct FilterChain {
    filters: Vec<Box<dyn TextFilter>>,
}

impl FilterChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, filter: impl TextFilter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }
}

impl TextFilter for FilterChain {
    fn apply(&self, text: &str) -> Result<String> {
        let mut current = text.to_string();
        for filter in &self.filters {
            current = filter.apply(&current)?;
        }
        Ok(current)
    }
}
