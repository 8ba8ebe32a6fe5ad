use anyhow::{bail, Context, Result};
use fst::{Set, SetBuilder};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

const EMBEDDED_WORDS: &str = include_str!("words.txt");

/// Immutable base word set backed by an FST.
pub struct Dictionary {
    set: Set<Vec<u8>>,
}

impl Dictionary {
    /// Load the installed dictionary for `language`, falling back to the
    /// embedded English list when nothing is installed.
    pub fn load(language: &str) -> Result<Self> {
        if let Some(dict_path) = Self::installed_path(language) {
            if dict_path.exists() {
                return Self::load_from_path(&dict_path);
            }
        }

        match language {
            "en_US" | "en_GB" => Self::embedded(),
            other => bail!(
                "No dictionary installed for '{}'. Run `spellrite dict download {}` first.",
                other,
                other
            ),
        }
    }

    /// Load a dictionary file. `.dict` files are prebuilt FSTs; anything
    /// else is read as a plain word list.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if path.extension().and_then(|e| e.to_str()) == Some("dict") {
            let bytes = fs::read(path)
                .with_context(|| format!("Failed to open dictionary: {}", path.display()))?;
            let set = Set::new(bytes).context("Failed to parse dictionary")?;
            return Ok(Self { set });
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read word list: {}", path.display()))?;
        let dict = Self::from_words(parse_word_list(&content))?;

        // An empty base dictionary would flag every word
        if dict.is_empty() {
            bail!("Word list has no entries: {}", path.display());
        }
        Ok(dict)
    }

    pub fn embedded() -> Result<Self> {
        Self::from_words(parse_word_list(EMBEDDED_WORDS))
    }

    pub fn from_words<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set = Set::from_iter(sorted_lowercase(words)).context("Failed to build dictionary")?;
        Ok(Self { set })
    }

    /// Words are stored lowercase.
    pub fn contains(&self, word: &str) -> bool {
        self.set.contains(word.as_bytes())
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// Write an FST dictionary file for `words`.
    pub fn build_from_words<I, S>(words: I, output_path: &Path) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let file = File::create(output_path)
            .with_context(|| format!("Failed to create dictionary: {}", output_path.display()))?;

        let writer = BufWriter::new(file);
        let mut builder = SetBuilder::new(writer).context("Failed to create FST builder")?;

        for word in sorted_lowercase(words) {
            builder
                .insert(word.as_bytes())
                .context("Failed to insert word into dictionary")?;
        }

        builder.finish().context("Failed to finalize dictionary")?;

        Ok(())
    }

    pub fn installed_path(language: &str) -> Option<PathBuf> {
        crate::config::data_dir().map(|dir| dir.join(format!("{}.dict", language)))
    }
}

/// Non-empty lines that are not `#` comments, trimmed.
pub fn parse_word_list(content: &str) -> impl Iterator<Item = &str> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
}

fn sorted_lowercase<I, S>(words: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut sorted: Vec<String> = words
        .into_iter()
        .map(|w| w.as_ref().to_lowercase())
        .collect();
    sorted.sort();
    sorted.dedup();
    sorted
}
