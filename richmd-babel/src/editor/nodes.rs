//! Editor node payloads and kind tags.

use crate::format::TextFormat;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Heading tag of an editor heading node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingTag {
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
}

impl HeadingTag {
    /// The tag for a markdown heading depth, clamped into 1..=6.
    pub fn from_depth(depth: u8) -> Self {
        match depth {
            0 | 1 => HeadingTag::H1,
            2 => HeadingTag::H2,
            3 => HeadingTag::H3,
            4 => HeadingTag::H4,
            5 => HeadingTag::H5,
            _ => HeadingTag::H6,
        }
    }

    /// Markdown heading depth, read off the tag's level digit.
    pub fn depth(self) -> u8 {
        self.as_str()[1..].parse().unwrap_or(1)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HeadingTag::H1 => "h1",
            HeadingTag::H2 => "h2",
            HeadingTag::H3 => "h3",
            HeadingTag::H4 => "h4",
            HeadingTag::H5 => "h5",
            HeadingTag::H6 => "h6",
        }
    }
}

impl fmt::Display for HeadingTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HeadingTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "h1" => Ok(HeadingTag::H1),
            "h2" => Ok(HeadingTag::H2),
            "h3" => Ok(HeadingTag::H3),
            "h4" => Ok(HeadingTag::H4),
            "h5" => Ok(HeadingTag::H5),
            "h6" => Ok(HeadingTag::H6),
            other => Err(format!("unknown heading tag '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListType {
    Bullet,
    Number,
}

/// Payload of an editor node. The variant decides whether the node may hold children.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    Root,
    Paragraph,
    Heading {
        tag: HeadingTag,
    },
    Quote,
    List {
        list_type: ListType,
        start: u32,
    },
    ListItem,
    Link {
        url: String,
        title: Option<String>,
    },
    Code {
        language: Option<String>,
    },
    Text {
        text: String,
        format: TextFormat,
    },
    LineBreak,
    HorizontalRule,
    Image {
        src: String,
        alt_text: String,
        title: Option<String>,
    },
    /// Opaque custom node owned by the editing surface.
    Decorator {
        decorator_type: String,
    },
}

impl NodeData {
    pub fn heading(tag: HeadingTag) -> Self {
        NodeData::Heading { tag }
    }

    pub fn list(list_type: ListType) -> Self {
        NodeData::List {
            list_type,
            start: 1,
        }
    }

    pub fn link(url: impl Into<String>) -> Self {
        NodeData::Link {
            url: url.into(),
            title: None,
        }
    }

    pub fn code(language: Option<String>) -> Self {
        NodeData::Code { language }
    }

    pub fn text(text: impl Into<String>) -> Self {
        NodeData::Text {
            text: text.into(),
            format: TextFormat::NONE,
        }
    }

    pub fn formatted_text(text: impl Into<String>, format: TextFormat) -> Self {
        NodeData::Text {
            text: text.into(),
            format,
        }
    }

    pub fn image(src: impl Into<String>, alt_text: impl Into<String>, title: Option<String>) -> Self {
        NodeData::Image {
            src: src.into(),
            alt_text: alt_text.into(),
            title,
        }
    }

    pub fn decorator(decorator_type: impl Into<String>) -> Self {
        NodeData::Decorator {
            decorator_type: decorator_type.into(),
        }
    }

    pub fn kind(&self) -> EditorNodeKind {
        match self {
            NodeData::Root => EditorNodeKind::Root,
            NodeData::Paragraph => EditorNodeKind::Paragraph,
            NodeData::Heading { .. } => EditorNodeKind::Heading,
            NodeData::Quote => EditorNodeKind::Quote,
            NodeData::List { .. } => EditorNodeKind::List,
            NodeData::ListItem => EditorNodeKind::ListItem,
            NodeData::Link { .. } => EditorNodeKind::Link,
            NodeData::Code { .. } => EditorNodeKind::Code,
            NodeData::Text { .. } => EditorNodeKind::Text,
            NodeData::LineBreak => EditorNodeKind::LineBreak,
            NodeData::HorizontalRule => EditorNodeKind::HorizontalRule,
            NodeData::Image { .. } => EditorNodeKind::Image,
            NodeData::Decorator { .. } => EditorNodeKind::Decorator,
        }
    }

    /// Element nodes own an ordered child list; everything else is a leaf.
    pub fn is_element(&self) -> bool {
        self.kind().is_element()
    }
}

/// Kind tag of an editor node, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorNodeKind {
    Root,
    Paragraph,
    Heading,
    Quote,
    List,
    ListItem,
    Link,
    Code,
    Text,
    LineBreak,
    HorizontalRule,
    Image,
    Decorator,
}

impl EditorNodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EditorNodeKind::Root => "root",
            EditorNodeKind::Paragraph => "paragraph",
            EditorNodeKind::Heading => "heading",
            EditorNodeKind::Quote => "quote",
            EditorNodeKind::List => "list",
            EditorNodeKind::ListItem => "listitem",
            EditorNodeKind::Link => "link",
            EditorNodeKind::Code => "code",
            EditorNodeKind::Text => "text",
            EditorNodeKind::LineBreak => "linebreak",
            EditorNodeKind::HorizontalRule => "horizontalrule",
            EditorNodeKind::Image => "image",
            EditorNodeKind::Decorator => "decorator",
        }
    }

    pub fn is_element(self) -> bool {
        matches!(
            self,
            EditorNodeKind::Root
                | EditorNodeKind::Paragraph
                | EditorNodeKind::Heading
                | EditorNodeKind::Quote
                | EditorNodeKind::List
                | EditorNodeKind::ListItem
                | EditorNodeKind::Link
                | EditorNodeKind::Code
        )
    }
}

impl fmt::Display for EditorNodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
