use crate::filter::TextFilter;
use anyhow::{Context, Result};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Text between a pair of `@!@` markers on one line.
    static ref MARKER_REGION: Regex = Regex::new(r"@!@.+@!@").unwrap();
}

/// Removes every match of its patterns from the text.
#[derive(Debug, Clone)]
pub struct PatternFilter {
    patterns: Vec<Regex>,
}

impl PatternFilter {
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| {
                let p = p.as_ref();
                Regex::new(p).with_context(|| format!("Invalid filter pattern '{}'", p))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { patterns })
    }

    /// Strips `@!@ ... @!@` regions.
    pub fn markers() -> Self {
        Self {
            patterns: vec![MARKER_REGION.clone()],
        }
    }
}

impl TextFilter for PatternFilter {
    fn apply(&self, text: &str) -> Result<String> {
        let mut current = text.to_string();
        for pattern in &self.patterns {
            current = pattern.replace_all(&current, "").into_owned();
        }
        Ok(current)
    }
}
