//! Entry splitter — turns the raw DSL source into a sequence of cards.
//!
//! A card starts at a line with no leading whitespace (the headword line).
//! Consecutive unindented lines stack as alternative headwords sharing the
//! body that follows. Indented lines (tab or spaces) belong to the body.

use crate::model::Entry;
use regex::Regex;
use std::iter::Peekable;
use std::str::Lines;
use std::sync::LazyLock;

// Header directives like `#NAME "..."` / `#INDEX_LANGUAGE "..."`, and plain
// `#` comment lines. Skipped wherever they appear.
static RE_DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#").unwrap());

/// Iterator over the cards of a DSL source. Re-splitting the same source
/// reproduces the same sequence.
pub struct Splitter<'a> {
    lines: Peekable<Lines<'a>>,
}

/// Split a DSL source into entries, in source order.
pub fn entries(source: &str) -> Splitter<'_> {
    Splitter {
        lines: source.lines().peekable(),
    }
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

fn is_indented(line: &str) -> bool {
    line.starts_with(' ') || line.starts_with('\t')
}

impl Iterator for Splitter<'_> {
    type Item = Entry;

    fn next(&mut self) -> Option<Entry> {
        // Skip blanks, directives, and stray indented content that has no
        // headword (e.g. malformed leading text before the first card).
        loop {
            let line = self.lines.peek()?;
            if is_blank(line) || RE_DIRECTIVE.is_match(line) || is_indented(line) {
                self.lines.next();
                continue;
            }
            break;
        }

        // Headword lines: consecutive unindented, non-blank lines.
        let mut headwords = Vec::new();
        while let Some(line) = self.lines.peek() {
            if is_blank(line) || is_indented(line) || RE_DIRECTIVE.is_match(line) {
                break;
            }
            headwords.push(line.trim_end().to_string());
            self.lines.next();
        }

        // Body: indented lines up to the next unindented line. Blank lines
        // inside a body are kept only between body lines, not trailing.
        let mut body_lines: Vec<&str> = Vec::new();
        while let Some(line) = self.lines.peek() {
            if is_blank(line) {
                self.lines.next();
                continue;
            }
            if !is_indented(line) {
                break;
            }
            body_lines.push(line.trim_start());
            self.lines.next();
        }

        Some(Entry {
            headwords,
            body: body_lines.join("\n"),
        })
    }
}
