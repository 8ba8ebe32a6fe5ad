pub mod handlers;
pub mod validate;

pub use handlers::Handlers;
pub use validate::{validate, EmptyListPolicy};

use crate::error::ConfigError;
use crate::filter::TextFilter;
use anyhow::Result;
use serde_json::Value;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

pub type ReportFn = Box<dyn FnMut(&[String]) -> Result<()>>;
pub type LogFn = Rc<dyn Fn(&str)>;

/// Receives the words of one `check` call, at most once per bucket.
///
/// `errors` is always called before `warnings`.
pub trait Reporter {
    fn errors(&mut self, words: &[String]) -> Result<()>;
    fn warnings(&mut self, words: &[String]) -> Result<()>;
}

/// A `Reporter` made of two closures.
pub struct Callbacks {
    errors: ReportFn,
    warnings: ReportFn,
}

impl Reporter for Callbacks {
    fn errors(&mut self, words: &[String]) -> Result<()> {
        (self.errors)(words)
    }

    fn warnings(&mut self, words: &[String]) -> Result<()> {
        (self.warnings)(words)
    }
}

/// Reporter assembled from registry handlers, which may be shared.
pub(crate) struct SharedCallbacks {
    errors: Rc<RefCell<ReportFn>>,
    warnings: Rc<RefCell<ReportFn>>,
}

impl Reporter for SharedCallbacks {
    fn errors(&mut self, words: &[String]) -> Result<()> {
        (*self.errors.borrow_mut())(words)
    }

    fn warnings(&mut self, words: &[String]) -> Result<()> {
        (*self.warnings.borrow_mut())(words)
    }
}

/// Typed configuration for a `SpellCore`.
///
/// The two reporting callbacks are required by construction; everything
/// else defaults (no-op log, identity filter, empty word lists).
pub struct Options {
    pub(crate) reporter: Box<dyn Reporter>,
    pub(crate) log: Option<LogFn>,
    pub(crate) filter: Option<Rc<dyn TextFilter>>,
    pub(crate) valid_words: Vec<String>,
    pub(crate) warn_words: Vec<String>,
}

impl Options {
    pub fn new<E, W>(errors: E, warnings: W) -> Self
    where
        E: FnMut(&[String]) -> Result<()> + 'static,
        W: FnMut(&[String]) -> Result<()> + 'static,
    {
        Self::with_reporter(Callbacks {
            errors: Box::new(errors),
            warnings: Box::new(warnings),
        })
    }

    pub fn with_reporter(reporter: impl Reporter + 'static) -> Self {
        Self {
            reporter: Box::new(reporter),
            log: None,
            filter: None,
            valid_words: Vec::new(),
            warn_words: Vec::new(),
        }
    }

    pub fn log(mut self, log: impl Fn(&str) + 'static) -> Self {
        self.log = Some(Rc::new(log));
        self
    }

    pub fn filter(mut self, filter: impl TextFilter + 'static) -> Self {
        self.filter = Some(Rc::new(filter));
        self
    }

    pub fn valid_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.valid_words = words.into_iter().map(Into::into).collect();
        self
    }

    pub fn warn_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.warn_words = words.into_iter().map(Into::into).collect();
        self
    }

    /// Validate a loosely typed options document and resolve its callable
    /// names against `handlers`.
    pub fn from_document(
        doc: Option<&Value>,
        handlers: &Handlers,
        policy: EmptyListPolicy,
    ) -> std::result::Result<Self, ConfigError> {
        validate(doc, handlers, policy)?;

        // validate() guarantees the shape, so lookups below cannot miss.
        let table = doc.and_then(Value::as_object).ok_or(ConfigError::NotObject)?;
        let name = |key: &'static str| table.get(key).and_then(Value::as_str);

        let errors = name("errors")
            .and_then(|n| handlers.reporter_handle(n))
            .ok_or(ConfigError::NotAFunction("errors"))?;
        let warnings = name("warnings")
            .and_then(|n| handlers.reporter_handle(n))
            .ok_or(ConfigError::NotAFunction("warnings"))?;

        let mut options = Self::with_reporter(SharedCallbacks { errors, warnings });
        options.log = name("log").and_then(|n| handlers.logger_handle(n));
        options.filter = name("filter").and_then(|n| handlers.filter_handle(n));
        options.valid_words = string_list(table.get("valid_words"));
        options.warn_words = string_list(table.get("warn_words"));

        Ok(options)
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("log", &self.log.is_some())
            .field("filter", &self.filter.is_some())
            .field("valid_words", &self.valid_words)
            .field("warn_words", &self.warn_words)
            .finish_non_exhaustive()
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Log sink that forwards setup messages to `tracing` at info level.
pub fn tracing_log() -> impl Fn(&str) {
    |message: &str| tracing::info!(target: "spellrite", "{}", message)
}
