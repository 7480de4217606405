//! Headword normalization — stress marks, homonym numbers, readings.

use crate::model::MarkupNode;
use regex::Regex;
use std::sync::LazyLock;

// Trailing homonym superscript(s), e.g. "замок¹" / "лук²".
static RE_HOMONYM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[¹²³⁴⁵⁶⁷⁸⁹]+$").unwrap());

const SUPERSCRIPTS: &[(char, char)] = &[
    ('¹', '1'),
    ('²', '2'),
    ('³', '3'),
    ('⁴', '4'),
    ('⁵', '5'),
    ('⁶', '6'),
    ('⁷', '7'),
    ('⁸', '8'),
    ('⁹', '9'),
];

/// A headword with its annotations separated out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Headword {
    /// Display form: no homonym superscript, no unsorted-part braces.
    pub display: String,
    /// Homonym number as plain digits ("1", "2", ...), if annotated.
    pub homonym: Option<String>,
}

/// Split a raw headword line into display form and homonym annotation.
///
/// DSL headwords may carry `{unsorted parts}` (braces dropped, text kept),
/// backslash escapes, and trailing superscript homonym numbers.
pub fn split_annotations(raw: &str) -> Headword {
    let mut display = String::with_capacity(raw.len());
    let mut chars = raw.trim().chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(escaped) = chars.next() {
                    display.push(escaped);
                }
            }
            '{' | '}' => {}
            _ => display.push(c),
        }
    }

    let mut homonym = None;
    if let Some(m) = RE_HOMONYM.find(&display) {
        let digits: String = m
            .as_str()
            .chars()
            .map(|c| {
                SUPERSCRIPTS
                    .iter()
                    .find(|(sup, _)| *sup == c)
                    .map(|(_, d)| *d)
                    .unwrap_or(c)
            })
            .collect();
        let start = m.start();
        homonym = Some(digits);
        display.truncate(start);
    }

    Headword {
        display: display.trim().to_string(),
        homonym,
    }
}

/// Vowels that take a combining acute accent when stressed. Anything else
/// passes through unaccented.
const STRESSABLE: &str = "аеиоуыэюяАЕИОУЫЭЮЯ";

/// Decode a stressed run: each stressable vowel gains U+0301.
pub fn apply_stress(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    for c in text.chars() {
        out.push(c);
        if STRESSABLE.contains(c) {
            out.push('\u{0301}');
        }
    }
    out
}

/// Flatten a markup subtree to plain text, decoding stress tags and
/// dropping media (`[s]`) content.
pub fn plain_text(nodes: &[MarkupNode]) -> String {
    let mut out = String::new();
    collect_text(nodes, &mut out);
    out
}

fn collect_text(nodes: &[MarkupNode], out: &mut String) {
    for node in nodes {
        match node {
            MarkupNode::Text(t) => out.push_str(t),
            MarkupNode::Tag { name, children, .. } => match name.as_str() {
                "'" => out.push_str(&apply_stress(&plain_text(children))),
                "s" => {}
                _ => collect_text(children, out),
            },
        }
    }
}

/// Pull readings out of the leading bold run(s) of an entry body, removing
/// them from the tree. Dictionary cards conventionally repeat the headword
/// in bold with stress marks as the first body content; those runs become
/// the reading field rather than definition text.
pub fn extract_readings(nodes: &mut Vec<MarkupNode>) -> Vec<String> {
    let mut readings = Vec::new();
    while let Some(first) = nodes.first() {
        match first {
            MarkupNode::Tag { name, children, .. } if name == "b" => {
                let reading = plain_text(children).trim().to_string();
                if !reading.is_empty() {
                    readings.push(reading);
                }
                nodes.remove(0);
            }
            // Separators between bold runs: whitespace, commas, newlines.
            MarkupNode::Text(t) if t.trim_matches([' ', ',', ';', '\n']).is_empty() => {
                nodes.remove(0);
            }
            _ => break,
        }
    }
    readings
}

/// Pick the reading for one headword: phrases keep the headword itself,
/// single words take the next extracted reading, fallback is the headword.
pub fn choose_reading(display: &str, readings: &mut Vec<String>) -> String {
    if display.contains(' ') {
        return display.to_string();
    }
    if readings.is_empty() {
        display.to_string()
    } else {
        readings.remove(0)
    }
}
