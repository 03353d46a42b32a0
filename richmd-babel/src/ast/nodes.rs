//! Core data structures for the markdown AST.

use serde::Serialize;
use std::fmt;

/// A markdown AST node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Node {
    Root(Root),
    Paragraph(Paragraph),
    Heading(Heading),
    Text(Text),
    Emphasis(Emphasis),
    Strong(Strong),
    InlineMarkup(InlineMarkup),
    InlineCode(InlineCode),
    Code(Code),
    Link(Link),
    List(List),
    ListItem(ListItem),
    Blockquote(Blockquote),
    ThematicBreak,
    Image(Image),
    Html(Html),
}

/// Represents the root of a document.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Root {
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Paragraph {
    pub children: Vec<Node>,
}

/// ATX or setext heading. `depth` is 1..=6.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Heading {
    pub depth: u8,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Text {
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Emphasis {
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Strong {
    pub children: Vec<Node>,
}

/// An inline HTML-like element written as `<name>...</name>` (underline is `<u>`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InlineMarkup {
    pub name: String,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InlineCode {
    pub value: String,
}

/// Fenced code block. `value` excludes the final line ending.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Code {
    pub lang: Option<String>,
    pub meta: Option<String>,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    pub url: String,
    pub title: Option<String>,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct List {
    pub ordered: bool,
    pub start: Option<u32>,
    pub spread: bool,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ListItem {
    pub spread: bool,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Blockquote {
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Image {
    pub url: String,
    pub alt: String,
    pub title: Option<String>,
}

/// Raw HTML that is not one of the supported inline markup elements.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Html {
    pub value: String,
}

/// Kind tag of a [`Node`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Root,
    Paragraph,
    Heading,
    Text,
    Emphasis,
    Strong,
    InlineMarkup,
    InlineCode,
    Code,
    Link,
    List,
    ListItem,
    Blockquote,
    ThematicBreak,
    Image,
    Html,
}

impl NodeKind {
    /// The mdast type name of this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Root => "root",
            NodeKind::Paragraph => "paragraph",
            NodeKind::Heading => "heading",
            NodeKind::Text => "text",
            NodeKind::Emphasis => "emphasis",
            NodeKind::Strong => "strong",
            NodeKind::InlineMarkup => "inlineMarkup",
            NodeKind::InlineCode => "inlineCode",
            NodeKind::Code => "code",
            NodeKind::Link => "link",
            NodeKind::List => "list",
            NodeKind::ListItem => "listItem",
            NodeKind::Blockquote => "blockquote",
            NodeKind::ThematicBreak => "thematicBreak",
            NodeKind::Image => "image",
            NodeKind::Html => "html",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Node {
    pub fn root(children: Vec<Node>) -> Node {
        Node::Root(Root { children })
    }

    pub fn paragraph(children: Vec<Node>) -> Node {
        Node::Paragraph(Paragraph { children })
    }

    pub fn heading(depth: u8, children: Vec<Node>) -> Node {
        Node::Heading(Heading { depth, children })
    }

    pub fn text(value: impl Into<String>) -> Node {
        Node::Text(Text {
            value: value.into(),
        })
    }

    pub fn emphasis(children: Vec<Node>) -> Node {
        Node::Emphasis(Emphasis { children })
    }

    pub fn strong(children: Vec<Node>) -> Node {
        Node::Strong(Strong { children })
    }

    pub fn inline_markup(name: impl Into<String>, children: Vec<Node>) -> Node {
        Node::InlineMarkup(InlineMarkup {
            name: name.into(),
            children,
        })
    }

    pub fn underline(children: Vec<Node>) -> Node {
        Node::inline_markup(crate::format::UNDERLINE_TAG, children)
    }

    pub fn inline_code(value: impl Into<String>) -> Node {
        Node::InlineCode(InlineCode {
            value: value.into(),
        })
    }

    pub fn code(lang: Option<String>, value: impl Into<String>) -> Node {
        Node::Code(Code {
            lang,
            meta: None,
            value: value.into(),
        })
    }

    pub fn link(url: impl Into<String>, title: Option<String>, children: Vec<Node>) -> Node {
        Node::Link(Link {
            url: url.into(),
            title,
            children,
        })
    }

    /// A tight list. Ordered lists start at 1.
    pub fn list(ordered: bool, children: Vec<Node>) -> Node {
        Node::List(List {
            ordered,
            start: ordered.then_some(1),
            spread: false,
            children,
        })
    }

    pub fn list_item(children: Vec<Node>) -> Node {
        Node::ListItem(ListItem {
            spread: false,
            children,
        })
    }

    pub fn blockquote(children: Vec<Node>) -> Node {
        Node::Blockquote(Blockquote { children })
    }

    pub fn image(url: impl Into<String>, alt: impl Into<String>, title: Option<String>) -> Node {
        Node::Image(Image {
            url: url.into(),
            alt: alt.into(),
            title,
        })
    }

    pub fn html(value: impl Into<String>) -> Node {
        Node::Html(Html {
            value: value.into(),
        })
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Root(_) => NodeKind::Root,
            Node::Paragraph(_) => NodeKind::Paragraph,
            Node::Heading(_) => NodeKind::Heading,
            Node::Text(_) => NodeKind::Text,
            Node::Emphasis(_) => NodeKind::Emphasis,
            Node::Strong(_) => NodeKind::Strong,
            Node::InlineMarkup(_) => NodeKind::InlineMarkup,
            Node::InlineCode(_) => NodeKind::InlineCode,
            Node::Code(_) => NodeKind::Code,
            Node::Link(_) => NodeKind::Link,
            Node::List(_) => NodeKind::List,
            Node::ListItem(_) => NodeKind::ListItem,
            Node::Blockquote(_) => NodeKind::Blockquote,
            Node::ThematicBreak => NodeKind::ThematicBreak,
            Node::Image(_) => NodeKind::Image,
            Node::Html(_) => NodeKind::Html,
        }
    }

    /// Child nodes, or `None` for leaf kinds.
    pub fn children(&self) -> Option<&[Node]> {
        match self {
            Node::Root(Root { children })
            | Node::Paragraph(Paragraph { children })
            | Node::Heading(Heading { children, .. })
            | Node::Emphasis(Emphasis { children })
            | Node::Strong(Strong { children })
            | Node::InlineMarkup(InlineMarkup { children, .. })
            | Node::Link(Link { children, .. })
            | Node::List(List { children, .. })
            | Node::ListItem(ListItem { children, .. })
            | Node::Blockquote(Blockquote { children }) => Some(children),
            Node::Text(_)
            | Node::InlineCode(_)
            | Node::Code(_)
            | Node::ThematicBreak
            | Node::Image(_)
            | Node::Html(_) => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Root(Root { children })
            | Node::Paragraph(Paragraph { children })
            | Node::Heading(Heading { children, .. })
            | Node::Emphasis(Emphasis { children })
            | Node::Strong(Strong { children })
            | Node::InlineMarkup(InlineMarkup { children, .. })
            | Node::Link(Link { children, .. })
            | Node::List(List { children, .. })
            | Node::ListItem(ListItem { children, .. })
            | Node::Blockquote(Blockquote { children }) => Some(children),
            Node::Text(_)
            | Node::InlineCode(_)
            | Node::Code(_)
            | Node::ThematicBreak
            | Node::Image(_)
            | Node::Html(_) => None,
        }
    }

    pub fn is_parent(&self) -> bool {
        self.children().is_some()
    }

    /// Concatenated literal text of this node and its descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }
}

fn collect_text(node: &Node, out: &mut String) {
    match node {
        Node::Text(Text { value })
        | Node::InlineCode(InlineCode { value })
        | Node::Code(Code { value, .. }) => out.push_str(value),
        Node::Image(Image { alt, .. }) => out.push_str(alt),
        _ => {
            for child in node.children().unwrap_or_default() {
                collect_text(child, out);
            }
        }
    }
}
