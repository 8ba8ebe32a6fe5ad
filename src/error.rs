use thiserror::Error;

/// Construction-time configuration failures.
///
/// Only the first problem found is reported; see `options::validate`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("No options specified.")]
    Missing,

    #[error("Non-object options specified.")]
    NotObject,

    #[error("No {0} callback specified.")]
    MissingCallback(&'static str),

    #[error("{} callback is not a function.", capitalise(.0))]
    NotAFunction(&'static str),

    #[error("{} callback is neither null nor a function.", capitalise(.0))]
    NotNullOrFunction(&'static str),

    #[error("{0} is not an array.")]
    NotAnArray(&'static str),

    #[error("{list}[{index}] is not a string.")]
    NotAString { list: &'static str, index: usize },

    #[error("{0} array is empty.")]
    EmptyList(&'static str),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("spelling detector failed")]
    Detector(#[source] anyhow::Error),

    #[error("text filter failed")]
    Filter(#[source] anyhow::Error),

    #[error("reporter failed")]
    Report(#[source] anyhow::Error),

    #[error("detector returned span {start}..{end} outside a {len}-byte text")]
    InvalidSpan { start: usize, end: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, Error>;

fn capitalise(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
