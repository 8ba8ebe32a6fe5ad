//! Fail-fast validation of loosely typed options documents.
//!
//! Fields are checked in declaration order (`errors`, `warnings`, `log`,
//! `filter`, `valid_words`, `warn_words`) and only the first problem is
//! reported.

use crate::error::ConfigError;
use crate::options::Handlers;
use serde_json::{Map, Value};

/// How an empty `valid_words`/`warn_words` array is treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmptyListPolicy {
    /// An empty array is the same as leaving the field out.
    #[default]
    Accept,
    Reject,
}

#[derive(Clone, Copy)]
enum Kind {
    Reporter,
    Logger,
    Filter,
}

const REQUIRED_CALLBACKS: [(&str, Kind); 2] = [("errors", Kind::Reporter), ("warnings", Kind::Reporter)];
const OPTIONAL_CALLBACKS: [(&str, Kind); 2] = [("log", Kind::Logger), ("filter", Kind::Filter)];
const WORD_LISTS: [&str; 2] = ["valid_words", "warn_words"];

pub fn validate(
    doc: Option<&Value>,
    handlers: &Handlers,
    policy: EmptyListPolicy,
) -> Result<(), ConfigError> {
    let doc = doc.ok_or(ConfigError::Missing)?;
    let table = doc.as_object().ok_or(ConfigError::NotObject)?;

    for (name, kind) in REQUIRED_CALLBACKS {
        match table.get(name) {
            None => return Err(ConfigError::MissingCallback(name)),
            Some(value) if !is_callable(value, kind, handlers) => {
                return Err(ConfigError::NotAFunction(name))
            }
            Some(_) => {}
        }
    }

    for (name, kind) in OPTIONAL_CALLBACKS {
        match table.get(name) {
            None | Some(Value::Null) => {}
            Some(value) if !is_callable(value, kind, handlers) => {
                return Err(ConfigError::NotNullOrFunction(name))
            }
            Some(_) => {}
        }
    }

    for name in WORD_LISTS {
        check_word_list(table, name, policy)?;
    }

    Ok(())
}

fn is_callable(value: &Value, kind: Kind, handlers: &Handlers) -> bool {
    let Some(name) = value.as_str() else {
        return false;
    };

    match kind {
        Kind::Reporter => handlers.has_reporter(name),
        Kind::Logger => handlers.has_logger(name),
        Kind::Filter => handlers.has_filter(name),
    }
}

fn check_word_list(
    table: &Map<String, Value>,
    name: &'static str,
    policy: EmptyListPolicy,
) -> Result<(), ConfigError> {
    let Some(value) = table.get(name) else {
        return Ok(());
    };

    let items = value.as_array().ok_or(ConfigError::NotAnArray(name))?;

    if items.is_empty() && policy == EmptyListPolicy::Reject {
        return Err(ConfigError::EmptyList(name));
    }

    match items.iter().position(|item| !item.is_string()) {
        Some(index) => Err(ConfigError::NotAString { list: name, index }),
        None => Ok(()),
    }
}
