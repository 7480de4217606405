//! Data model for the conversion pipeline — format-agnostic.

use serde::ser::SerializeTuple;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// One dictionary card as split from the source file: one or more headword
/// lines sharing a single body block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub headwords: Vec<String>,
    pub body: String,
}

/// A node in the parsed DSL markup tree.
///
/// Tag names are normalized: `[m2]` becomes `name: "m", arg: Some("2")`,
/// `[c green]` becomes `name: "c", arg: Some("green")`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupNode {
    Text(String),
    Tag {
        name: String,
        arg: Option<String>,
        children: Vec<MarkupNode>,
    },
}

impl MarkupNode {
    pub fn tag(name: &str, children: Vec<MarkupNode>) -> Self {
        MarkupNode::Tag {
            name: name.to_string(),
            arg: None,
            children,
        }
    }

    pub fn text(s: &str) -> Self {
        MarkupNode::Text(s.to_string())
    }
}

/// Yomitan structured-content node: either a bare text run or a styled element.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Content {
    Text(String),
    Element(Box<Element>),
}

/// A structured-content element (`{"tag": ..., "content": [...], ...}`).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Element {
    pub tag: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<Style>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<BTreeMap<String, String>>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Element {
            tag,
            ..Element::default()
        }
    }

    pub fn into_content(self) -> Content {
        Content::Element(Box::new(self))
    }
}

/// Inline styling on a structured-content element. Field names follow the
/// Yomitan schema (camelCase CSS property names).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_style: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_decoration_line: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertical_align: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_left: Option<String>,
}

impl Style {
    /// None when no property is set, so empty styles are omitted entirely.
    pub fn build(self) -> Option<Style> {
        if self == Style::default() {
            None
        } else {
            Some(self)
        }
    }
}

/// One definition in a term record. The consuming schema requires the
/// `"type": "structured-content"` discriminator.
#[derive(Debug, Clone, Serialize)]
pub struct Definition {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub content: Content,
}

impl Definition {
    pub fn structured(content: Content) -> Self {
        Definition {
            kind: "structured-content",
            content,
        }
    }
}

/// One row of the term bank. Serialized as the fixed 8-field array the
/// Yomitan importer expects:
///
/// `[term, reading, definition tags, rules, score, definitions, sequence, term tags]`
#[derive(Debug, Clone)]
pub struct TermRecord {
    pub term: String,
    pub reading: String,
    pub definition_tags: String,
    pub rules: String,
    pub score: i64,
    pub definitions: Vec<Definition>,
    pub sequence: usize,
    pub term_tags: String,
}

impl Serialize for TermRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut row = serializer.serialize_tuple(8)?;
        row.serialize_element(&self.term)?;
        row.serialize_element(&self.reading)?;
        row.serialize_element(&self.definition_tags)?;
        row.serialize_element(&self.rules)?;
        row.serialize_element(&self.score)?;
        row.serialize_element(&self.definitions)?;
        row.serialize_element(&self.sequence)?;
        row.serialize_element(&self.term_tags)?;
        row.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_serializes_as_array() {
        let record = TermRecord {
            term: "замок".to_string(),
            reading: "за\u{301}мок".to_string(),
            definition_tags: String::new(),
            rules: String::new(),
            score: 0,
            definitions: vec![Definition::structured(Content::Text("castle".to_string()))],
            sequence: 0,
            term_tags: "1".to_string(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0], "замок");
        assert_eq!(json[4], 0);
        assert_eq!(json[5][0]["type"], "structured-content");
        assert_eq!(json[7], "1");
    }

    #[test]
    fn empty_style_is_omitted() {
        let element = Element::new("span");
        let json = serde_json::to_string(&element).unwrap();
        assert_eq!(json, r#"{"tag":"span"}"#);
    }

    #[test]
    fn style_uses_camel_case() {
        let element = Element {
            tag: "span",
            style: Style {
                font_weight: Some("bold"),
                ..Style::default()
            }
            .build(),
            ..Element::default()
        };
        let json = serde_json::to_string(&element).unwrap();
        assert_eq!(json, r#"{"tag":"span","style":{"fontWeight":"bold"}}"#);
    }
}
