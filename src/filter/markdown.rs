use crate::filter::TextFilter;
use anyhow::Result;
use pulldown_cmark::{Event, Parser, Tag, TagEnd};
use std::ops::Range;

/// Blanks out code blocks and inline code so they are never spell checked.
///
/// Blanked characters become spaces; newlines are kept so line structure
/// survives.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownCodeFilter;

impl TextFilter for MarkdownCodeFilter {
    fn apply(&self, text: &str) -> Result<String> {
        Ok(blank_ranges(text, &code_ranges(text)))
    }
}

fn code_ranges(content: &str) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut in_code_block = false;

    for (event, range) in Parser::new(content).into_offset_iter() {
        match event {
            Event::Start(Tag::CodeBlock(_)) => {
                in_code_block = true;
                ranges.push(range);
            }
            Event::End(TagEnd::CodeBlock) => {
                in_code_block = false;
            }
            Event::Code(_) if !in_code_block => {
                ranges.push(range);
            }
            _ => {}
        }
    }

    ranges
}

fn blank_ranges(text: &str, ranges: &[Range<usize>]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;

    for range in ranges {
        if range.start < cursor {
            continue;
        }
        out.push_str(&text[cursor..range.start]);
        out.extend(
            text[range.clone()]
                .chars()
                .map(|c| if c == '\n' { '\n' } else { ' ' }),
        );
        cursor = range.end;
    }

    out.push_str(&text[cursor..]);
    out
}
