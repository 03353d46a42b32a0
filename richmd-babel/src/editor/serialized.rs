//! JSON-friendly editor state.
//!
//! The arena is an in-memory detail; persisted state is a nested tree in the shape rich-text
//! editors conventionally use (`{"type": "paragraph", "children": [...]}`), so documents can be
//! stored and reloaded between sessions.

use super::{EditorTree, HeadingTag, ListType, NodeData, NodeKey, TreeError};
use crate::format::TextFormat;
use serde::{Deserialize, Serialize};

const LEAF: &[SerializedNode] = &[];

fn default_start() -> u32 {
    1
}

/// A serialized editor node with its subtree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SerializedNode {
    Root {
        #[serde(default)]
        children: Vec<SerializedNode>,
    },
    Paragraph {
        #[serde(default)]
        children: Vec<SerializedNode>,
    },
    Heading {
        tag: HeadingTag,
        #[serde(default)]
        children: Vec<SerializedNode>,
    },
    Quote {
        #[serde(default)]
        children: Vec<SerializedNode>,
    },
    List {
        #[serde(rename = "listType")]
        list_type: ListType,
        #[serde(default = "default_start")]
        start: u32,
        #[serde(default)]
        children: Vec<SerializedNode>,
    },
    ListItem {
        #[serde(default)]
        children: Vec<SerializedNode>,
    },
    Link {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(default)]
        children: Vec<SerializedNode>,
    },
    Code {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        language: Option<String>,
        #[serde(default)]
        children: Vec<SerializedNode>,
    },
    Text {
        text: String,
        #[serde(default)]
        format: TextFormat,
    },
    LineBreak,
    HorizontalRule,
    Image {
        src: String,
        #[serde(rename = "altText", default)]
        alt_text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },
    Decorator {
        #[serde(rename = "decoratorType")]
        decorator_type: String,
    },
}

impl SerializedNode {
    fn split(&self) -> (NodeData, &[SerializedNode]) {
        match self {
            SerializedNode::Root { children } => (NodeData::Root, children.as_slice()),
            SerializedNode::Paragraph { children } => (NodeData::Paragraph, children.as_slice()),
            SerializedNode::Heading { tag, children } => (NodeData::heading(*tag), children.as_slice()),
            SerializedNode::Quote { children } => (NodeData::Quote, children.as_slice()),
            SerializedNode::List {
                list_type,
                start,
                children,
            } => (
                NodeData::List {
                    list_type: *list_type,
                    start: *start,
                },
                children.as_slice(),
            ),
            SerializedNode::ListItem { children } => (NodeData::ListItem, children.as_slice()),
            SerializedNode::Link {
                url,
                title,
                children,
            } => (
                NodeData::Link {
                    url: url.clone(),
                    title: title.clone(),
                },
                children.as_slice(),
            ),
            SerializedNode::Code { language, children } => {
                (NodeData::code(language.clone()), children.as_slice())
            }
            SerializedNode::Text { text, format } => {
                (NodeData::formatted_text(text.clone(), *format), LEAF)
            }
            SerializedNode::LineBreak => (NodeData::LineBreak, LEAF),
            SerializedNode::HorizontalRule => (NodeData::HorizontalRule, LEAF),
            SerializedNode::Image {
                src,
                alt_text,
                title,
            } => (
                NodeData::image(src.clone(), alt_text.clone(), title.clone()),
                LEAF,
            ),
            SerializedNode::Decorator { decorator_type } => {
                (NodeData::decorator(decorator_type.clone()), LEAF)
            }
        }
    }

    fn type_name(&self) -> &'static str {
        self.split().0.kind().as_str()
    }
}

impl EditorTree {
    /// Rebuild a tree from serialized state. The top node must be a root.
    pub fn from_serialized(state: &SerializedNode) -> Result<EditorTree, TreeError> {
        let SerializedNode::Root { children } = state else {
            return Err(TreeError::InvalidState(state.type_name().to_string()));
        };

        let mut tree = EditorTree::new();
        let root = tree.root();
        for child in children {
            tree.append_serialized(root, child)?;
        }
        Ok(tree)
    }

    /// Build `state` under `parent` and return the key of its top node.
    pub fn append_serialized(
        &mut self,
        parent: NodeKey,
        state: &SerializedNode,
    ) -> Result<NodeKey, TreeError> {
        let (data, children) = state.split();
        if matches!(data, NodeData::Root) {
            return Err(TreeError::RootIsFixed);
        }
        let key = self.create(data);
        self.append(parent, key)?;
        for child in children {
            self.append_serialized(key, child)?;
        }
        Ok(key)
    }

    /// Snapshot the subtree at `key`.
    pub fn to_serialized(&self, key: NodeKey) -> Result<SerializedNode, TreeError> {
        let children = || -> Result<Vec<SerializedNode>, TreeError> {
            self.children(key)
                .iter()
                .map(|&child| self.to_serialized(child))
                .collect()
        };

        Ok(match self.data(key)? {
            NodeData::Root => SerializedNode::Root {
                children: children()?,
            },
            NodeData::Paragraph => SerializedNode::Paragraph {
                children: children()?,
            },
            NodeData::Heading { tag } => SerializedNode::Heading {
                tag: *tag,
                children: children()?,
            },
            NodeData::Quote => SerializedNode::Quote {
                children: children()?,
            },
            NodeData::List { list_type, start } => SerializedNode::List {
                list_type: *list_type,
                start: *start,
                children: children()?,
            },
            NodeData::ListItem => SerializedNode::ListItem {
                children: children()?,
            },
            NodeData::Link { url, title } => SerializedNode::Link {
                url: url.clone(),
                title: title.clone(),
                children: children()?,
            },
            NodeData::Code { language } => SerializedNode::Code {
                language: language.clone(),
                children: children()?,
            },
            NodeData::Text { text, format } => SerializedNode::Text {
                text: text.clone(),
                format: *format,
            },
            NodeData::LineBreak => SerializedNode::LineBreak,
            NodeData::HorizontalRule => SerializedNode::HorizontalRule,
            NodeData::Image {
                src,
                alt_text,
                title,
            } => SerializedNode::Image {
                src: src.clone(),
                alt_text: alt_text.clone(),
                title: title.clone(),
            },
            NodeData::Decorator { decorator_type } => SerializedNode::Decorator {
                decorator_type: decorator_type.clone(),
            },
        })
    }
}
