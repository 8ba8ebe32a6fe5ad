use crate::Span;
use unicode_segmentation::UnicodeSegmentation;

/// Word tokens of `text` with their byte spans, split on Unicode word
/// boundaries. Punctuation and whitespace runs are not tokens.
pub fn word_spans(text: &str) -> impl Iterator<Item = (Span, &str)> {
    text.unicode_word_indices()
        .map(|(start, word)| (Span::new(start, start + word.len()), word))
}

/// `word` without a trailing possessive `'s` (straight or curly apostrophe).
pub fn strip_possessive(word: &str) -> Option<&str> {
    word.strip_suffix("'s")
        .or_else(|| word.strip_suffix("\u{2019}s"))
        .filter(|stem| !stem.is_empty())
}
