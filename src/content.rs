//! Markup tree → Yomitan structured content.
//!
//! Maps each DSL tag kind onto the styled-span schema the lookup app
//! renders. Media tags are dropped; cross-references become in-dictionary
//! search links.

use crate::headword::{apply_stress, plain_text};
use crate::model::{Content, Element, MarkupNode, Style};

const EXAMPLE_COLOR: &str = "#808080";
const LABEL_COLOR: &str = "green";

/// Render a full entry body as a single `div` root node.
pub fn render(nodes: &[MarkupNode]) -> Content {
    let mut root = Element::new("div");
    render_children(nodes, &mut root.content);
    root.into_content()
}

fn render_children(nodes: &[MarkupNode], out: &mut Vec<Content>) {
    for node in nodes {
        render_node(node, out);
    }
}

fn render_node(node: &MarkupNode, out: &mut Vec<Content>) {
    match node {
        MarkupNode::Text(text) => push_text(text, out),
        MarkupNode::Tag {
            name,
            arg,
            children,
        } => render_tag(name, arg.as_deref(), children, out),
    }
}

/// Text runs: newlines become explicit `br` elements.
fn push_text(text: &str, out: &mut Vec<Content>) {
    for (i, part) in text.split('\n').enumerate() {
        if i > 0 {
            out.push(Element::new("br").into_content());
        }
        if !part.is_empty() {
            out.push(Content::Text(part.to_string()));
        }
    }
}

fn styled_span(style: Style, children: &[MarkupNode], out: &mut Vec<Content>) {
    let mut element = Element::new("span");
    element.style = style.build();
    render_children(children, &mut element.content);
    out.push(element.into_content());
}

fn render_tag(name: &str, arg: Option<&str>, children: &[MarkupNode], out: &mut Vec<Content>) {
    match name {
        "b" => styled_span(
            Style {
                font_weight: Some("bold"),
                ..Style::default()
            },
            children,
            out,
        ),
        "i" => styled_span(
            Style {
                font_style: Some("italic"),
                ..Style::default()
            },
            children,
            out,
        ),
        "u" => styled_span(
            Style {
                text_decoration_line: Some("underline"),
                ..Style::default()
            },
            children,
            out,
        ),
        "sub" => styled_span(
            Style {
                vertical_align: Some("sub"),
                ..Style::default()
            },
            children,
            out,
        ),
        "sup" => styled_span(
            Style {
                vertical_align: Some("super"),
                ..Style::default()
            },
            children,
            out,
        ),
        // `[c]` defaults to green per the DSL convention.
        "c" => styled_span(
            Style {
                color: Some(arg.unwrap_or(LABEL_COLOR).to_string()),
                ..Style::default()
            },
            children,
            out,
        ),
        // Part-of-speech / grammar label.
        "p" => styled_span(
            Style {
                font_style: Some("italic"),
                color: Some(LABEL_COLOR.to_string()),
                ..Style::default()
            },
            children,
            out,
        ),
        // Example block: indented, dimmed.
        "ex" => {
            let mut element = Element::new("div");
            element.style = Style {
                color: Some(EXAMPLE_COLOR.to_string()),
                margin_left: Some("1em".to_string()),
                ..Style::default()
            }
            .build();
            render_children(children, &mut element.content);
            out.push(element.into_content());
        }
        // Margin paragraph: [m2] → 2em indent. [m]/[m0] stay flush.
        "m" => {
            let mut element = Element::new("div");
            let level: u8 = arg.and_then(|a| a.parse().ok()).unwrap_or(0);
            if level > 0 {
                element.style = Style {
                    margin_left: Some(format!("{}em", level)),
                    ..Style::default()
                }
                .build();
            }
            render_children(children, &mut element.content);
            out.push(element.into_content());
        }
        // Cross-reference: link back into the dictionary search.
        "ref" => {
            let mut element = Element::new("a");
            element.href = Some(query_href(&plain_text(children)));
            render_children(children, &mut element.content);
            out.push(element.into_content());
        }
        // External link: the text is the target.
        "url" => {
            let target = plain_text(children);
            let mut element = Element::new("a");
            element.href = Some(target.clone());
            element.content.push(Content::Text(target));
            out.push(element.into_content());
        }
        // Stress mark: decode to the accented vowel, inline.
        "'" => {
            let stressed = apply_stress(&plain_text(children));
            if !stressed.is_empty() {
                out.push(Content::Text(stressed));
            }
        }
        // Media (sound/image) — not representable in the term bank.
        "s" => {}
        // Structural tags with no visual mapping: contents pass through.
        "trn" | "com" | "lang" | "t" | "!trs" | "*" => render_children(children, out),
        // Known-tag list and this match are kept in sync; anything else
        // was already emitted as literal text by the parser.
        _ => render_children(children, out),
    }
}

/// Turn a cross-reference target into a lookup query href. `bword://`
/// prefixes are legacy and stripped; explicit http(s) targets pass through.
fn query_href(target: &str) -> String {
    let target = target.strip_prefix("bword://").unwrap_or(target);
    if target.starts_with("http:") || target.starts_with("https:") || target.starts_with('?') {
        target.to_string()
    } else {
        format!("?query={}&wildcards=off", target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup;

    fn rendered(body: &str) -> serde_json::Value {
        let nodes = markup::parse(body).unwrap();
        serde_json::to_value(render(&nodes)).unwrap()
    }

    #[test]
    fn bold_becomes_font_weight_span() {
        let json = rendered("[b]x[/b]");
        assert_eq!(json["tag"], "div");
        assert_eq!(json["content"][0]["tag"], "span");
        assert_eq!(json["content"][0]["style"]["fontWeight"], "bold");
        assert_eq!(json["content"][0]["content"][0], "x");
    }

    #[test]
    fn margin_paragraph_indents() {
        let json = rendered("[m2]x[/m]");
        assert_eq!(json["content"][0]["tag"], "div");
        assert_eq!(json["content"][0]["style"]["marginLeft"], "2em");
    }

    #[test]
    fn margin_zero_has_no_style() {
        let json = rendered("[m0]x[/m]");
        assert!(json["content"][0].get("style").is_none());
    }

    #[test]
    fn example_is_dimmed_and_indented() {
        let json = rendered("[ex]example text[/ex]");
        let ex = &json["content"][0];
        assert_eq!(ex["style"]["color"], "#808080");
        assert_eq!(ex["style"]["marginLeft"], "1em");
    }

    #[test]
    fn cross_reference_links_into_search() {
        let json = rendered("<<ключ>>");
        let link = &json["content"][0];
        assert_eq!(link["tag"], "a");
        assert_eq!(link["href"], "?query=ключ&wildcards=off");
        assert_eq!(link["content"][0], "ключ");
    }

    #[test]
    fn bword_prefix_stripped() {
        assert_eq!(query_href("bword://дом"), "?query=дом&wildcards=off");
        assert_eq!(query_href("https://example.com"), "https://example.com");
    }

    #[test]
    fn newline_becomes_br() {
        let json = rendered("a\nb");
        assert_eq!(json["content"][0], "a");
        assert_eq!(json["content"][1]["tag"], "br");
        assert_eq!(json["content"][2], "b");
    }

    #[test]
    fn media_is_dropped() {
        let json = rendered("word [s]sound.wav[/s]");
        assert_eq!(json["content"].as_array().unwrap().len(), 1);
        assert_eq!(json["content"][0], "word ");
    }

    #[test]
    fn stress_renders_accented() {
        let json = rendered("з[']а[/']мок");
        assert_eq!(json["content"][0], "з");
        assert_eq!(json["content"][1], "а\u{301}");
        assert_eq!(json["content"][2], "мок");
    }

    #[test]
    fn escaped_brackets_render_literally() {
        let json = rendered(r"[ex]wrench \[spanner\][/ex]");
        assert_eq!(json["content"][0]["content"][0], "wrench [spanner]");
    }
}
