//! DSL markup parser — bracketed inline tags into a node tree.
//!
//! Handles the DSL conventions:
//!
//! - `[x]...[/x]` open/close pairs, nesting, tag arguments (`[c green]`,
//!   `[lang name="English"]`), margin shorthand (`[m2]` → `m` with arg `2`)
//! - backslash escapes the next character, decoded before tag scanning, so
//!   `\[spanner\]` is literal text
//! - `<<word>>` is shorthand for a `[ref]` cross-reference
//! - unknown tag names pass through as literal text (lenient policy)
//!
//! Balance violations fail the entry with [`MalformedEntry`]; the caller
//! drops that entry and continues the run.

use crate::model::MarkupNode;
use thiserror::Error;

/// Why a single entry's markup was rejected. Never fatal to the run.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MalformedEntry {
    #[error("unclosed [{0}] tag")]
    UnclosedTag(String),
    #[error("[/{found}] closes [{open}]")]
    MismatchedClose { open: String, found: String },
    #[error("[/{0}] without a matching open tag")]
    StrayClose(String),
}

/// Tag names the converter understands. Anything else is passed through as
/// opaque text so odd markup never costs us an entry.
const KNOWN_TAGS: &[&str] = &[
    "b", "i", "u", "c", "p", "ex", "trn", "com", "lang", "m", "*", "s", "t", "sub", "sup", "ref",
    "url", "!trs", "'",
];

fn is_known(name: &str) -> bool {
    KNOWN_TAGS.contains(&name)
}

/// Normalize a raw tag token body (text between `[` and `]`, no slash)
/// into `(name, arg)`. `m0`..`m9` become `("m", Some(digit))`; otherwise
/// the first whitespace splits name from argument.
fn split_tag(token: &str) -> (String, Option<String>) {
    if let Some(digit) = token.strip_prefix('m') {
        if digit.len() == 1 && digit.chars().all(|c| c.is_ascii_digit()) {
            return ("m".to_string(), Some(digit.to_string()));
        }
    }
    match token.split_once(char::is_whitespace) {
        Some((name, arg)) => (name.to_string(), Some(arg.trim().to_string())),
        None => (token.to_string(), None),
    }
}

/// An open tag on the parse stack, waiting for its close.
struct OpenTag {
    name: String,
    arg: Option<String>,
    children: Vec<MarkupNode>,
}

/// Parse one entry body into a markup tree.
pub fn parse(body: &str) -> Result<Vec<MarkupNode>, MalformedEntry> {
    let mut stack: Vec<OpenTag> = Vec::new();
    let mut nodes: Vec<MarkupNode> = Vec::new();
    let mut text = String::new();

    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            // Escape: next char is literal, whatever it is.
            '\\' => {
                if let Some(escaped) = chars.next() {
                    text.push(escaped);
                } else {
                    text.push('\\');
                }
            }
            // `<<...>>` cross-reference shorthand.
            '<' if chars.peek() == Some(&'<') => {
                chars.next();
                let mut target = String::new();
                loop {
                    match chars.next() {
                        Some('>') if chars.peek() == Some(&'>') => {
                            chars.next();
                            break;
                        }
                        Some(ch) => target.push(ch),
                        None => {
                            // No closing `>>` — treat the whole thing as text.
                            text.push_str("<<");
                            text.push_str(&target);
                            target.clear();
                            break;
                        }
                    }
                }
                if !target.is_empty() {
                    flush_text(&mut text, &mut stack, &mut nodes);
                    push_node(
                        MarkupNode::Tag {
                            name: "ref".to_string(),
                            arg: None,
                            children: vec![MarkupNode::Text(target)],
                        },
                        &mut stack,
                        &mut nodes,
                    );
                }
            }
            '[' => {
                let token = take_tag_token(&mut chars);
                let Some(token) = token else {
                    // `[` with no closing `]` — literal text.
                    text.push('[');
                    continue;
                };
                if let Some(closing) = token.strip_prefix('/') {
                    let (name, _) = split_tag(closing);
                    if !is_known(&name) {
                        text.push_str(&format!("[{}]", token));
                        continue;
                    }
                    flush_text(&mut text, &mut stack, &mut nodes);
                    match stack.pop() {
                        Some(open) if open.name == name => {
                            push_node(
                                MarkupNode::Tag {
                                    name: open.name,
                                    arg: open.arg,
                                    children: open.children,
                                },
                                &mut stack,
                                &mut nodes,
                            );
                        }
                        Some(open) => {
                            return Err(MalformedEntry::MismatchedClose {
                                open: open.name,
                                found: name,
                            });
                        }
                        None => return Err(MalformedEntry::StrayClose(name)),
                    }
                } else {
                    let (name, arg) = split_tag(&token);
                    if !is_known(&name) {
                        text.push_str(&format!("[{}]", token));
                        continue;
                    }
                    flush_text(&mut text, &mut stack, &mut nodes);
                    stack.push(OpenTag {
                        name,
                        arg,
                        children: Vec::new(),
                    });
                }
            }
            _ => text.push(c),
        }
    }

    if let Some(open) = stack.pop() {
        return Err(MalformedEntry::UnclosedTag(open.name));
    }
    flush_text(&mut text, &mut stack, &mut nodes);
    Ok(nodes)
}

/// Consume a `[...]` token body. Returns None if the bracket never closes.
fn take_tag_token(chars: &mut std::iter::Peekable<std::str::Chars>) -> Option<String> {
    let mut token = String::new();
    for c in chars.by_ref() {
        if c == ']' {
            return Some(token);
        }
        token.push(c);
    }
    None
}

fn flush_text(text: &mut String, stack: &mut [OpenTag], nodes: &mut Vec<MarkupNode>) {
    if text.is_empty() {
        return;
    }
    let node = MarkupNode::Text(std::mem::take(text));
    match stack.last_mut() {
        Some(open) => open.children.push(node),
        None => nodes.push(node),
    }
}

fn push_node(node: MarkupNode, stack: &mut [OpenTag], nodes: &mut Vec<MarkupNode>) {
    match stack.last_mut() {
        Some(open) => open.children.push(node),
        None => nodes.push(node),
    }
}
