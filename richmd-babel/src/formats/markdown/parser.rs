//! Markdown parsing (Markdown → AST)
//!
//! Converts CommonMark Markdown to the generic markdown AST.
//! Pipeline: Markdown string → Comrak AST → `ast::Node`

use crate::ast::{self, Node};
use crate::error::ConvertError;
use crate::format::UNDERLINE_TAG;
use comrak::nodes::{AstNode, ListType, NodeValue};
use comrak::{parse_document, Arena, ComrakOptions};

/// Parse a Markdown string into an AST rooted at [`Node::Root`].
pub fn parse_from_markdown(source: &str) -> Result<Node, ConvertError> {
    let arena = Arena::new();
    let options = default_comrak_options();
    let root = parse_document(&arena, source, &options);
    convert_node(root)
}

// Plain CommonMark: every construct the editor supports is core syntax.
fn default_comrak_options() -> ComrakOptions<'static> {
    ComrakOptions::default()
}

fn convert_node<'a>(node: &'a AstNode<'a>) -> Result<Node, ConvertError> {
    let value = node.data.borrow().value.clone();

    let converted = match value {
        NodeValue::Document => Node::root(convert_children(node)?),
        NodeValue::Paragraph => Node::paragraph(convert_children(node)?),
        NodeValue::Heading(heading) => Node::heading(heading.level, convert_children(node)?),
        NodeValue::BlockQuote => Node::blockquote(convert_children(node)?),
        NodeValue::List(list) => {
            let ordered = matches!(list.list_type, ListType::Ordered);
            Node::List(ast::List {
                ordered,
                start: ordered.then_some(list.start as u32),
                spread: !list.tight,
                children: convert_children(node)?,
            })
        }
        NodeValue::Item(_) => Node::list_item(convert_children(node)?),
        NodeValue::CodeBlock(code) => {
            let (lang, meta) = split_info(&code.info);
            let value = code
                .literal
                .strip_suffix('\n')
                .unwrap_or(&code.literal)
                .to_string();
            Node::Code(ast::Code { lang, meta, value })
        }
        NodeValue::HtmlBlock(html) => Node::html(html.literal.trim_end_matches('\n')),
        NodeValue::ThematicBreak => Node::ThematicBreak,
        NodeValue::Text(text) => Node::text(text),
        NodeValue::SoftBreak | NodeValue::LineBreak => Node::text("\n"),
        NodeValue::Emph => Node::emphasis(convert_children(node)?),
        NodeValue::Strong => Node::strong(convert_children(node)?),
        NodeValue::Code(code) => Node::inline_code(code.literal),
        NodeValue::HtmlInline(html) => Node::html(html),
        NodeValue::Link(link) => {
            Node::link(link.url, non_empty(link.title), convert_children(node)?)
        }
        NodeValue::Image(link) => {
            let mut alt = String::new();
            for child in node.children() {
                collect_text_content(child, &mut alt);
            }
            Node::image(link.url, alt, non_empty(link.title))
        }
        other => {
            return Err(ConvertError::Parse(format!(
                "unsupported markdown construct '{}'",
                construct_name(&other)
            )))
        }
    };
    Ok(converted)
}

/// Convert the children of `node`, pairing `<u>`/`</u>` inline HTML into underline markup and
/// merging adjacent text.
fn convert_children<'a>(node: &'a AstNode<'a>) -> Result<Vec<Node>, ConvertError> {
    // Bottom frame collects the result; every open `<u>` pushes a frame holding its raw tag.
    let mut frames: Vec<(Option<String>, Vec<Node>)> = vec![(None, Vec::new())];

    for child in node.children() {
        let converted = convert_node(child)?;
        let html = match &converted {
            Node::Html(html) => Some(html.value.clone()),
            _ => None,
        };

        match html {
            Some(raw) if is_tag(&raw, false) => frames.push((Some(raw), Vec::new())),
            Some(raw) if is_tag(&raw, true) && frames.len() > 1 => {
                if let Some((_, children)) = frames.pop() {
                    push_merged(current(&mut frames), Node::underline(children));
                }
            }
            _ => push_merged(current(&mut frames), converted),
        }
    }

    // Unclosed `<u>` tags stay raw HTML, their content is kept in place.
    while frames.len() > 1 {
        if let Some((open, children)) = frames.pop() {
            let parent = current(&mut frames);
            if let Some(open) = open {
                push_merged(parent, Node::html(open));
            }
            for child in children {
                push_merged(parent, child);
            }
        }
    }

    Ok(frames.pop().map(|(_, children)| children).unwrap_or_default())
}

fn current(frames: &mut [(Option<String>, Vec<Node>)]) -> &mut Vec<Node> {
    let last = frames.len() - 1;
    &mut frames[last].1
}

fn push_merged(children: &mut Vec<Node>, node: Node) {
    if let (Some(Node::Text(prev)), Node::Text(next)) = (children.last_mut(), &node) {
        prev.value.push_str(&next.value);
        return;
    }
    children.push(node);
}

fn is_tag(html: &str, closing: bool) -> bool {
    let tag = html.trim().to_ascii_lowercase();
    let expected = if closing {
        format!("</{UNDERLINE_TAG}>")
    } else {
        format!("<{UNDERLINE_TAG}>")
    };
    tag == expected
}

/// Split a fenced code info string into language and meta.
fn split_info(info: &str) -> (Option<String>, Option<String>) {
    let info = info.trim();
    match info.split_once(char::is_whitespace) {
        Some((lang, meta)) => (non_empty(lang.to_string()), non_empty(meta.trim().to_string())),
        None => (non_empty(info.to_string()), None),
    }
}

/// Variant name of a comrak node value, e.g. `Table` for `NodeValue::Table(..)`.
fn construct_name(value: &NodeValue) -> String {
    let debug = format!("{value:?}");
    debug
        .split(|c: char| !c.is_alphanumeric())
        .next()
        .unwrap_or_default()
        .to_string()
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

/// Collect text content from a node (for image alt text)
fn collect_text_content<'a>(node: &'a AstNode<'a>, output: &mut String) {
    match &node.data.borrow().value {
        NodeValue::Text(text) => output.push_str(text),
        NodeValue::Code(code) => output.push_str(&code.literal),
        NodeValue::SoftBreak | NodeValue::LineBreak => output.push(' '),
        _ => {
            for child in node.children() {
                collect_text_content(child, output);
            }
        }
    }
}
