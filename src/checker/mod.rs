pub mod detector;
pub mod dictionary;
pub mod tokenizer;

use crate::error::{Error, Result};
use crate::filter::{Identity, TextFilter};
use crate::options::{EmptyListPolicy, Handlers, LogFn, Options, Reporter};
use crate::{Report, Span};
use detector::SpellDetector;
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;
use tracing::{debug, trace};

/// A configured classifier bound to one detector.
///
/// Each `check` runs filter, detector and classification to completion
/// before returning.
pub struct SpellCore {
    detector: Arc<dyn SpellDetector>,
    filter: Rc<dyn TextFilter>,
    warn_words: HashSet<String>,
    reporter: Box<dyn Reporter>,
}

impl SpellCore {
    /// Seed the detector with `options.valid_words` and bind a checker.
    ///
    /// Valid words are added to the detector's custom dictionary, which is
    /// shared with every other core using the same detector.
    pub fn new(options: Options, detector: Arc<dyn SpellDetector>) -> Result<Self> {
        let Options {
            reporter,
            log,
            filter,
            valid_words,
            warn_words,
        } = options;

        let log: LogFn = match log {
            Some(log) => log,
            None => Rc::new(|_: &str| {}),
        };
        let filter: Rc<dyn TextFilter> = match filter {
            Some(filter) => filter,
            None => Rc::new(Identity),
        };

        // Seed the shared custom dictionary
        for word in &valid_words {
            detector.add_word(word).map_err(Error::Detector)?;
            log(&format!("Added to custom dictionary: {}", word));
        }

        for word in &warn_words {
            log(&format!("Added word to warning list: {}", word));
        }

        Ok(Self {
            detector,
            filter,
            warn_words: warn_words.into_iter().collect(),
            reporter,
        })
    }

    /// Validate an options document, resolve it against `handlers` and
    /// build a core. Nothing is logged or added to the dictionary if
    /// validation fails.
    pub fn from_document(
        doc: Option<&Value>,
        handlers: &Handlers,
        detector: Arc<dyn SpellDetector>,
    ) -> Result<Self> {
        Self::from_document_with_policy(doc, handlers, detector, EmptyListPolicy::default())
    }

    /// `from_document` with an explicit rule for empty word lists.
    pub fn from_document_with_policy(
        doc: Option<&Value>,
        handlers: &Handlers,
        detector: Arc<dyn SpellDetector>,
        policy: EmptyListPolicy,
    ) -> Result<Self> {
        let options = Options::from_document(doc, handlers, policy)?;
        Self::new(options, detector)
    }

    /// Check `text`, dispatch the non-empty buckets to the reporter and
    /// return them.
    pub fn check(&mut self, text: &str) -> Result<Report> {
        let preprocessed = self.filter.apply(text).map_err(Error::Filter)?;

        // Spans index into the filtered text
        let spans = self
            .detector
            .check_spelling(&preprocessed)
            .map_err(Error::Detector)?;
        let result_words = extract_words(&preprocessed, &spans)?;

        // Partition into errors and warnings
        let report = classify(result_words, &self.warn_words);
        debug!(
            errors = report.error_words.len(),
            warnings = report.warning_words.len(),
            "spelling check complete"
        );

        // Errors first, each bucket at most once
        if !report.error_words.is_empty() {
            self.reporter
                .errors(&report.error_words)
                .map_err(Error::Report)?;
        }

        if !report.warning_words.is_empty() {
            self.reporter
                .warnings(&report.warning_words)
                .map_err(Error::Report)?;
        }

        Ok(report)
    }
}

impl fmt::Debug for SpellCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpellCore")
            .field("warn_words", &self.warn_words)
            .finish_non_exhaustive()
    }
}

/// Split flagged words into errors and warnings, keeping relative order.
/// Membership in `warn_words` is exact and case-sensitive.
pub fn classify(words: Vec<String>, warn_words: &HashSet<String>) -> Report {
    let (warning_words, error_words) = words.into_iter().partition(|w| warn_words.contains(w));
    Report {
        error_words,
        warning_words,
    }
}

fn extract_words(text: &str, spans: &[Span]) -> Result<Vec<String>> {
    spans
        .iter()
        .map(|span| {
            let word = text.get(span.start..span.end).ok_or(Error::InvalidSpan {
                start: span.start,
                end: span.end,
                len: text.len(),
            })?;
            trace!(word, start = span.start, "flagged");
            Ok(word.to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::dictionary::Dictionary;
    use crate::error::ConfigError;
    use crate::filter::MarkdownCodeFilter;
    use crate::DictionaryDetector;
    use anyhow::anyhow;
    use serde_json::json;
    use std::cell::RefCell;

    type Calls = Rc<RefCell<Vec<Vec<String>>>>;

    /// Flags the space-separated tokens it was told to flag.
    #[derive(Default)]
    struct FakeDetector {
        misspelled: Vec<&'static str>,
        added: RefCell<Vec<String>>,
    }

    impl SpellDetector for FakeDetector {
        fn check_spelling(&self, text: &str) -> anyhow::Result<Vec<Span>> {
            let mut spans = Vec::new();
            let mut offset = 0;
            for token in text.split(' ') {
                let known = self.added.borrow().iter().any(|w| w == token);
                if self.misspelled.iter().any(|m| *m == token) && !known {
                    spans.push(Span::new(offset, offset + token.len()));
                }
                offset += token.len() + 1;
            }
            Ok(spans)
        }

        fn add_word(&self, word: &str) -> anyhow::Result<()> {
            self.added.borrow_mut().push(word.to_string());
            Ok(())
        }
    }

    fn fake(misspelled: &[&'static str]) -> Arc<FakeDetector> {
        Arc::new(FakeDetector {
            misspelled: misspelled.to_vec(),
            ..Default::default()
        })
    }

    fn real() -> Arc<dyn SpellDetector> {
        Arc::new(DictionaryDetector::new(Dictionary::embedded().unwrap()))
    }

    fn recorder() -> (Calls, Calls, Options) {
        let errors: Calls = Rc::default();
        let warnings: Calls = Rc::default();
        let (e, w) = (Rc::clone(&errors), Rc::clone(&warnings));
        let options = Options::new(
            move |words| {
                e.borrow_mut().push(words.to_vec());
                Ok(())
            },
            move |words| {
                w.borrow_mut().push(words.to_vec());
                Ok(())
            },
        );
        (errors, warnings, options)
    }

    #[test]
    fn test_copes_when_everything_is_spelled_correctly() {
        let (errors, warnings, options) = recorder();
        let mut core = SpellCore::new(options, real()).unwrap();

        let report = core.check("Fun").unwrap();
        assert!(report.is_clean());
        assert!(errors.borrow().is_empty());
        assert!(warnings.borrow().is_empty());
    }

    #[test]
    fn test_flags_spelling_errors() {
        let (errors, warnings, options) = recorder();
        let mut core = SpellCore::new(options, real()).unwrap();

        core.check("Spellrite").unwrap();
        assert_eq!(*errors.borrow(), vec![vec!["Spellrite".to_string()]]);
        assert!(warnings.borrow().is_empty());
    }

    #[test]
    fn test_filters_text() {
        let (errors, _, options) = recorder();
        let options = options.filter(|text: &str| text.replacen("rite", " correctly", 1));
        let mut core = SpellCore::new(options, real()).unwrap();

        core.check("Spellrite").unwrap();
        assert!(errors.borrow().is_empty());
    }

    #[test]
    fn test_flags_warning_words_as_warnings() {
        let (errors, warnings, options) = recorder();
        let options = options.warn_words(["Spellrite"]);
        let mut core = SpellCore::new(options, real()).unwrap();

        core.check("Something about Spellrite").unwrap();
        assert!(errors.borrow().is_empty());
        assert_eq!(*warnings.borrow(), vec![vec!["Spellrite".to_string()]]);
    }

    #[test]
    fn test_treats_valid_words_as_valid() {
        let (errors, warnings, options) = recorder();
        let options = options.valid_words(["Spellrite"]);
        let mut core = SpellCore::new(options, real()).unwrap();

        core.check("Something about Spellrite").unwrap();
        assert!(errors.borrow().is_empty());
        assert!(warnings.borrow().is_empty());
    }

    #[test]
    fn test_one_call_per_bucket_in_detection_order() {
        let (errors, warnings, options) = recorder();
        let options = options.warn_words(["colour"]);
        let mut core = SpellCore::new(options, fake(&["zeta", "colour", "alpha"])).unwrap();

        let report = core.check("zeta colour alpha zeta colour").unwrap();
        assert_eq!(report.error_words, vec!["zeta", "alpha", "zeta"]);
        assert_eq!(report.warning_words, vec!["colour", "colour"]);
        assert_eq!(errors.borrow().len(), 1);
        assert_eq!(errors.borrow()[0], report.error_words);
        assert_eq!(warnings.borrow().len(), 1);
        assert_eq!(warnings.borrow()[0], report.warning_words);
    }

    #[test]
    fn test_warn_words_are_case_sensitive() {
        let (_, _, options) = recorder();
        let options = options.warn_words(["colour"]);
        let mut core = SpellCore::new(options, fake(&["Colour"])).unwrap();

        let report = core.check("Colour").unwrap();
        assert_eq!(report.error_words, vec!["Colour"]);
        assert!(report.warning_words.is_empty());
    }

    #[test]
    fn test_errors_reported_before_warnings() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let (e, w) = (Rc::clone(&order), Rc::clone(&order));
        let options = Options::new(
            move |_| {
                e.borrow_mut().push("errors");
                Ok(())
            },
            move |_| {
                w.borrow_mut().push("warnings");
                Ok(())
            },
        )
        .warn_words(["b"]);
        let mut core = SpellCore::new(options, fake(&["a", "b"])).unwrap();

        core.check("b a").unwrap();
        assert_eq!(*order.borrow(), vec!["errors", "warnings"]);
    }

    #[test]
    fn test_seeds_dictionary_and_logs_in_order() {
        let (_, _, options) = recorder();
        let messages = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&messages);
        let detector = fake(&[]);
        let options = options
            .log(move |m| sink.borrow_mut().push(m.to_string()))
            .valid_words(["wibble", "wobble"])
            .warn_words(["colour"]);

        SpellCore::new(options, detector.clone()).unwrap();
        assert_eq!(*detector.added.borrow(), vec!["wibble", "wobble"]);
        assert_eq!(
            *messages.borrow(),
            vec![
                "Added to custom dictionary: wibble",
                "Added to custom dictionary: wobble",
                "Added word to warning list: colour",
            ]
        );
    }

    #[test]
    fn test_detectors_share_custom_dictionary() {
        let detector = fake(&["wibble"]);
        let (_, _, first) = recorder();
        SpellCore::new(first.valid_words(["wibble"]), detector.clone()).unwrap();

        let (errors, _, second) = recorder();
        let mut core = SpellCore::new(second, detector).unwrap();
        core.check("wibble").unwrap();
        assert!(errors.borrow().is_empty());
    }

    #[test]
    fn test_reporter_failure_propagates() {
        let warned = Rc::new(RefCell::new(false));
        let flag = Rc::clone(&warned);
        let options = Options::new(
            |_| Err(anyhow!("sink closed")),
            move |_| {
                *flag.borrow_mut() = true;
                Ok(())
            },
        )
        .warn_words(["b"]);
        let mut core = SpellCore::new(options, fake(&["a", "b"])).unwrap();

        let err = core.check("a b").unwrap_err();
        assert!(matches!(err, Error::Report(_)));
        assert!(!*warned.borrow());
    }

    #[test]
    fn test_filter_failure_propagates() {
        struct Broken;
        impl TextFilter for Broken {
            fn apply(&self, _: &str) -> anyhow::Result<String> {
                Err(anyhow!("broken"))
            }
        }

        let (_, _, options) = recorder();
        let mut core = SpellCore::new(options.filter(Broken), fake(&[])).unwrap();
        assert!(matches!(core.check("text"), Err(Error::Filter(_))));
    }

    #[test]
    fn test_invalid_span_is_an_error() {
        struct OutOfRange;
        impl SpellDetector for OutOfRange {
            fn check_spelling(&self, _: &str) -> anyhow::Result<Vec<Span>> {
                Ok(vec![Span::new(2, 99)])
            }
            fn add_word(&self, _: &str) -> anyhow::Result<()> {
                Ok(())
            }
        }

        let (_, _, options) = recorder();
        let mut core = SpellCore::new(options, Arc::new(OutOfRange)).unwrap();
        assert!(matches!(
            core.check("short"),
            Err(Error::InvalidSpan { start: 2, end: 99, len: 5 })
        ));
    }

    #[test]
    fn test_from_document_with_markdown_filter() {
        let errors: Calls = Rc::default();
        let sink = Rc::clone(&errors);
        let handlers = Handlers::new()
            .reporter("errors", move |words| {
                sink.borrow_mut().push(words.to_vec());
                Ok(())
            })
            .reporter("warnings", |_| Ok(()));
        let doc = json!({ "errors": "errors", "warnings": "warnings", "filter": "markdown" });

        let mut core = SpellCore::from_document(Some(&doc), &handlers, real()).unwrap();
        core.check("Some prose `qwzzx` here.").unwrap();
        assert!(errors.borrow().is_empty());

        core.check("Some prose qwzzx here.").unwrap();
        assert_eq!(*errors.borrow(), vec![vec!["qwzzx".to_string()]]);
    }

    #[test]
    fn test_invalid_document_has_no_side_effects() {
        let detector = fake(&[]);
        let messages = Rc::new(RefCell::new(Vec::<String>::new()));
        let sink = Rc::clone(&messages);
        let handlers = Handlers::new()
            .reporter("errors", |_| Ok(()))
            .reporter("warnings", |_| Ok(()))
            .logger("record", move |m| sink.borrow_mut().push(m.to_string()));
        let doc = json!({
            "errors": "errors",
            "warnings": "warnings",
            "log": "record",
            "valid_words": ["wibble"],
            "warn_words": 42,
        });

        let err = SpellCore::from_document(Some(&doc), &handlers, detector.clone()).unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::NotAnArray("warn_words"))));
        assert!(detector.added.borrow().is_empty());
        assert!(messages.borrow().is_empty());
    }

    #[test]
    fn test_empty_list_policy_at_construction() {
        let handlers = Handlers::new()
            .reporter("errors", |_| Ok(()))
            .reporter("warnings", |_| Ok(()));
        let doc = json!({ "errors": "errors", "warnings": "warnings", "valid_words": [] });

        assert!(SpellCore::from_document(Some(&doc), &handlers, fake(&[])).is_ok());

        let detector = fake(&[]);
        let err = SpellCore::from_document_with_policy(
            Some(&doc),
            &handlers,
            detector.clone(),
            EmptyListPolicy::Reject,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::EmptyList("valid_words"))));
        assert_eq!(err.to_string(), "valid_words array is empty.");
        assert!(detector.added.borrow().is_empty());
    }

    #[test]
    fn test_classify() {
        let warn: HashSet<String> = ["b".to_string()].into_iter().collect();
        let report = classify(vec!["a".into(), "b".into(), "c".into(), "b".into()], &warn);
        assert_eq!(report.error_words, vec!["a", "c"]);
        assert_eq!(report.warning_words, vec!["b", "b"]);

        assert!(classify(Vec::new(), &warn).is_clean());
    }

    #[test]
    fn test_markdown_filter_with_real_detector() {
        let (errors, _, options) = recorder();
        let mut core = SpellCore::new(options.filter(MarkdownCodeFilter), real()).unwrap();
        core.check("```\nqwzzx\n```\nThe end.").unwrap();
        assert!(errors.borrow().is_empty());
    }
}
