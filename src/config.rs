use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

pub const LOCAL_CONFIG: &str = ".spellrite.toml";

/// Settings for the dictionary detector, read from the `[detector]` table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub language: String,
    pub dictionary: Option<PathBuf>,
    pub ignore_patterns: Vec<String>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            language: "en_US".to_string(),
            dictionary: None,
            ignore_patterns: vec![
                r"^[A-Z0-9_]{2,}$".to_string(),    // ALL_CAPS
                r"^[a-fA-F0-9]{32,}$".to_string(), // Hashes
            ],
        }
    }
}

impl DetectorConfig {
    pub fn from_document(doc: &Value) -> Result<Self> {
        match doc.get("detector") {
            Some(table) => serde_json::from_value(table.clone())
                .context("Invalid [detector] table in configuration"),
            None => Ok(Self::default()),
        }
    }
}

/// Command-line values layered on top of the config files.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config_file: Option<PathBuf>,
    pub valid_words: Vec<String>,
    pub warn_words: Vec<String>,
    pub filter: Option<String>,
    pub log: Option<String>,
    pub language: Option<String>,
    pub dictionary: Option<PathBuf>,
}

/// Build the options document with priority: CLI args > local config >
/// global config > `defaults`.
///
/// Values are merged without type checks; validation happens when the
/// document is turned into a `SpellCore`.
pub fn load(defaults: Value, overrides: &Overrides) -> Result<Value> {
    let mut doc = defaults;

    if let Some(global_path) = global_config_path() {
        if global_path.exists() {
            merge(&mut doc, from_file(&global_path)?);
        }
    }

    match &overrides.config_file {
        Some(path) => merge(&mut doc, from_file(path)?),
        None => {
            let local_path = PathBuf::from(LOCAL_CONFIG);
            if local_path.exists() {
                merge(&mut doc, from_file(&local_path)?);
            }
        }
    }

    apply_overrides(&mut doc, overrides);
    Ok(doc)
}

pub fn from_file(path: &Path) -> Result<Value> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Shallow merge of `other` into `base`; the `detector` table is merged
/// one level deeper.
pub fn merge(base: &mut Value, other: Value) {
    let (Some(base), Value::Object(other)) = (base.as_object_mut(), other) else {
        return;
    };

    for (key, value) in other {
        if key == "detector" {
            if let (Some(Value::Object(existing)), Value::Object(incoming)) =
                (base.get_mut("detector"), &value)
            {
                existing.extend(incoming.clone());
                continue;
            }
        }
        base.insert(key, value);
    }
}

fn apply_overrides(doc: &mut Value, overrides: &Overrides) {
    let Some(table) = doc.as_object_mut() else {
        return;
    };

    extend_list(table, "valid_words", &overrides.valid_words);
    extend_list(table, "warn_words", &overrides.warn_words);

    if let Some(filter) = &overrides.filter {
        table.insert("filter".to_string(), Value::String(filter.clone()));
    }
    if let Some(log) = &overrides.log {
        table.insert("log".to_string(), Value::String(log.clone()));
    }

    if overrides.language.is_none() && overrides.dictionary.is_none() {
        return;
    }

    let detector = table
        .entry("detector")
        .or_insert_with(|| Value::Object(Map::new()));
    if let Some(detector) = detector.as_object_mut() {
        if let Some(language) = &overrides.language {
            detector.insert("language".to_string(), Value::String(language.clone()));
        }
        if let Some(dictionary) = &overrides.dictionary {
            detector.insert(
                "dictionary".to_string(),
                Value::String(dictionary.display().to_string()),
            );
        }
    }
}

// A non-array value is left alone so validation can report it.
fn extend_list(table: &mut Map<String, Value>, key: &str, words: &[String]) {
    if words.is_empty() {
        return;
    }

    let list = table
        .entry(key)
        .or_insert_with(|| Value::Array(Vec::new()));
    if let Some(items) = list.as_array_mut() {
        items.extend(words.iter().cloned().map(Value::String));
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "spellrite")
}

pub fn global_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
}

pub fn data_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
}
