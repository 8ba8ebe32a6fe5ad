use crate::filter::{MarkdownCodeFilter, PatternFilter, TextFilter};
use crate::options::{tracing_log, LogFn, ReportFn};
use anyhow::Result;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Named callables an options document may refer to.
///
/// A document value counts as callable only if it names a handler of the
/// matching kind registered here.
#[derive(Default)]
pub struct Handlers {
    reporters: HashMap<String, Rc<RefCell<ReportFn>>>,
    loggers: HashMap<String, LogFn>,
    filters: HashMap<String, Rc<dyn TextFilter>>,
}

impl Handlers {
    /// Registry with the built-in `tracing` logger and the `markdown` and
    /// `markers` filters.
    pub fn new() -> Self {
        Self::empty()
            .logger("tracing", tracing_log())
            .filter("markdown", MarkdownCodeFilter)
            .filter("markers", PatternFilter::markers())
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn reporter(
        mut self,
        name: impl Into<String>,
        reporter: impl FnMut(&[String]) -> Result<()> + 'static,
    ) -> Self {
        let reporter: ReportFn = Box::new(reporter);
        self.reporters.insert(name.into(), Rc::new(RefCell::new(reporter)));
        self
    }

    pub fn logger(mut self, name: impl Into<String>, log: impl Fn(&str) + 'static) -> Self {
        self.loggers.insert(name.into(), Rc::new(log));
        self
    }

    pub fn filter(mut self, name: impl Into<String>, filter: impl TextFilter + 'static) -> Self {
        self.filters.insert(name.into(), Rc::new(filter));
        self
    }

    pub fn has_reporter(&self, name: &str) -> bool {
        self.reporters.contains_key(name)
    }

    pub fn has_logger(&self, name: &str) -> bool {
        self.loggers.contains_key(name)
    }

    pub fn has_filter(&self, name: &str) -> bool {
        self.filters.contains_key(name)
    }

    pub(crate) fn reporter_handle(&self, name: &str) -> Option<Rc<RefCell<ReportFn>>> {
        self.reporters.get(name).cloned()
    }

    pub(crate) fn logger_handle(&self, name: &str) -> Option<LogFn> {
        self.loggers.get(name).cloned()
    }

    pub(crate) fn filter_handle(&self, name: &str) -> Option<Rc<dyn TextFilter>> {
        self.filters.get(name).cloned()
    }
}

impl fmt::Debug for Handlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handlers")
            .field("reporters", &sorted_names(self.reporters.keys()))
            .field("loggers", &sorted_names(self.loggers.keys()))
            .field("filters", &sorted_names(self.filters.keys()))
            .finish()
    }
}

fn sorted_names<'a>(keys: impl Iterator<Item = &'a String>) -> Vec<&'a str> {
    let mut names: Vec<_> = keys.map(String::as_str).collect();
    names.sort_unstable();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins() {
        let handlers = Handlers::new();
        assert!(handlers.has_logger("tracing"));
        assert!(handlers.has_filter("markdown"));
        assert!(handlers.has_filter("markers"));
        assert!(!handlers.has_reporter("tracing"));
    }

    #[test]
    fn test_kinds_are_separate() {
        let handlers = Handlers::empty().reporter("stdout", |_| Ok(()));
        assert!(handlers.has_reporter("stdout"));
        assert!(!handlers.has_logger("stdout"));
        assert!(!handlers.has_filter("stdout"));
    }

    #[test]
    fn test_shared_reporter_handle() {
        let hits = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&hits);
        let handlers = Handlers::empty().reporter("count", move |words| {
            *counter.borrow_mut() += words.len();
            Ok(())
        });

        let a = handlers.reporter_handle("count").unwrap();
        let b = handlers.reporter_handle("count").unwrap();
        (*a.borrow_mut())(&["one".to_string()]).unwrap();
        (*b.borrow_mut())(&["two".to_string(), "three".to_string()]).unwrap();
        assert_eq!(*hits.borrow(), 3);
    }
}
