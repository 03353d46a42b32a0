//! Editor tree
//!
//!     The live document model manipulated by a rich-text editing surface. Nodes live in an arena
//!     owned by [`EditorTree`] and are addressed by copyable [`NodeKey`]s, so the surface can hold
//!     on to keys across edits while the tree is mutated in place.
//!
//!     Shape rules:
//!         - There is exactly one root, created with the tree. It can never be re-parented.
//!         - Element kinds (root, paragraph, heading, quote, list, listitem, link, code) own an
//!           ordered child list. Every other kind is a leaf.
//!         - Formatting lives on text nodes as a [`TextFormat`] bitmask, never as wrapper nodes.
//!
//!     Keys of removed nodes are never reused during the lifetime of a tree.

mod nodes;
mod serialized;

pub use nodes::{EditorNodeKind, HeadingTag, ListType, NodeData};
pub use serialized::SerializedNode;

use crate::format::TextFormat;
use std::fmt;

/// Handle to a node in an [`EditorTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(usize);

impl NodeKey {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Structural errors raised by tree mutations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TreeError {
    #[error("node {0} does not exist")]
    MissingNode(NodeKey),
    #[error("cannot add children to {kind} node {key}")]
    NotAnElement { key: NodeKey, kind: EditorNodeKind },
    #[error("the root node cannot be moved or removed")]
    RootIsFixed,
    #[error("node {node} is an ancestor of {parent}")]
    Cycle { node: NodeKey, parent: NodeKey },
    #[error("node {0} has no parent")]
    Detached(NodeKey),
    #[error("node {key} is not a text node")]
    NotText { key: NodeKey },
    #[error("serialized state must start with a root node, found {0}")]
    InvalidState(String),
}

/// A node stored in the arena.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorNode {
    pub data: NodeData,
    parent: Option<NodeKey>,
    children: Vec<NodeKey>,
}

impl EditorNode {
    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }

    pub fn kind(&self) -> EditorNodeKind {
        self.data.kind()
    }
}

/// Arena-backed editor tree with a singleton root.
#[derive(Debug, Clone)]
pub struct EditorTree {
    nodes: Vec<Option<EditorNode>>,
    root: NodeKey,
}

impl EditorTree {
    pub fn new() -> Self {
        EditorTree {
            nodes: vec![Some(EditorNode {
                data: NodeData::Root,
                parent: None,
                children: Vec::new(),
            })],
            root: NodeKey(0),
        }
    }

    pub fn root(&self) -> NodeKey {
        self.root
    }

    /// Allocate a detached node. Attach it with [`EditorTree::append`] or
    /// [`EditorTree::insert_after`].
    pub fn create(&mut self, data: NodeData) -> NodeKey {
        let key = NodeKey(self.nodes.len());
        self.nodes.push(Some(EditorNode {
            data,
            parent: None,
            children: Vec::new(),
        }));
        key
    }

    pub fn contains(&self, key: NodeKey) -> bool {
        self.get(key).is_some()
    }

    pub fn get(&self, key: NodeKey) -> Option<&EditorNode> {
        self.nodes.get(key.0).and_then(Option::as_ref)
    }

    fn node(&self, key: NodeKey) -> Result<&EditorNode, TreeError> {
        self.get(key).ok_or(TreeError::MissingNode(key))
    }

    fn node_mut(&mut self, key: NodeKey) -> Result<&mut EditorNode, TreeError> {
        self.nodes
            .get_mut(key.0)
            .and_then(Option::as_mut)
            .ok_or(TreeError::MissingNode(key))
    }

    pub fn data(&self, key: NodeKey) -> Result<&NodeData, TreeError> {
        Ok(&self.node(key)?.data)
    }

    pub fn data_mut(&mut self, key: NodeKey) -> Result<&mut NodeData, TreeError> {
        Ok(&mut self.node_mut(key)?.data)
    }

    pub fn kind(&self, key: NodeKey) -> Result<EditorNodeKind, TreeError> {
        Ok(self.node(key)?.kind())
    }

    pub fn parent(&self, key: NodeKey) -> Option<NodeKey> {
        self.get(key).and_then(EditorNode::parent)
    }

    /// Children of `key`; empty for leaves and unknown keys.
    pub fn children(&self, key: NodeKey) -> &[NodeKey] {
        self.get(key).map(EditorNode::children).unwrap_or_default()
    }

    pub fn previous_sibling(&self, key: NodeKey) -> Option<NodeKey> {
        let siblings = self.children(self.parent(key)?);
        let index = siblings.iter().position(|&k| k == key)?;
        index.checked_sub(1).map(|i| siblings[i])
    }

    pub fn next_sibling(&self, key: NodeKey) -> Option<NodeKey> {
        let siblings = self.children(self.parent(key)?);
        let index = siblings.iter().position(|&k| k == key)?;
        siblings.get(index + 1).copied()
    }

    fn is_ancestor(&self, candidate: NodeKey, of: NodeKey) -> bool {
        let mut current = Some(of);
        while let Some(key) = current {
            if key == candidate {
                return true;
            }
            current = self.parent(key);
        }
        false
    }

    fn check_attachable(&self, parent: NodeKey, child: NodeKey) -> Result<(), TreeError> {
        let parent_node = self.node(parent)?;
        self.node(child)?;
        if child == self.root {
            return Err(TreeError::RootIsFixed);
        }
        if !parent_node.data.is_element() {
            return Err(TreeError::NotAnElement {
                key: parent,
                kind: parent_node.kind(),
            });
        }
        if self.is_ancestor(child, parent) {
            return Err(TreeError::Cycle {
                node: child,
                parent,
            });
        }
        Ok(())
    }

    fn detach(&mut self, key: NodeKey) -> Result<(), TreeError> {
        if let Some(parent) = self.node(key)?.parent {
            self.node_mut(parent)?.children.retain(|&k| k != key);
            self.node_mut(key)?.parent = None;
        }
        Ok(())
    }

    /// Append `child` as the last child of `parent`, detaching it from any previous parent.
    pub fn append(&mut self, parent: NodeKey, child: NodeKey) -> Result<(), TreeError> {
        self.check_attachable(parent, child)?;
        self.detach(child)?;
        self.node_mut(parent)?.children.push(child);
        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Place `node` directly after `sibling` in the sibling's parent.
    pub fn insert_after(&mut self, sibling: NodeKey, node: NodeKey) -> Result<(), TreeError> {
        let parent = self.parent(sibling).ok_or(TreeError::Detached(sibling))?;
        self.check_attachable(parent, node)?;
        self.detach(node)?;
        let siblings = &mut self.node_mut(parent)?.children;
        let index = siblings
            .iter()
            .position(|&k| k == sibling)
            .ok_or(TreeError::Detached(sibling))?;
        siblings.insert(index + 1, node);
        self.node_mut(node)?.parent = Some(parent);
        Ok(())
    }

    /// Detach `key` and drop it together with its whole subtree.
    pub fn remove(&mut self, key: NodeKey) -> Result<(), TreeError> {
        if key == self.root {
            return Err(TreeError::RootIsFixed);
        }
        self.detach(key)?;
        self.drop_subtree(key);
        Ok(())
    }

    /// Remove every child of `key`.
    pub fn clear_children(&mut self, key: NodeKey) -> Result<(), TreeError> {
        let children = std::mem::take(&mut self.node_mut(key)?.children);
        for child in children {
            self.drop_subtree(child);
        }
        Ok(())
    }

    fn drop_subtree(&mut self, key: NodeKey) {
        let mut pending = vec![key];
        while let Some(current) = pending.pop() {
            if let Some(node) = self.nodes.get_mut(current.0).and_then(Option::take) {
                pending.extend(node.children);
            }
        }
    }

    /// Concatenated text of `key` and its descendants; line breaks count as `"\n"`.
    pub fn text_content(&self, key: NodeKey) -> String {
        let mut out = String::new();
        self.collect_text(key, &mut out);
        out
    }

    fn collect_text(&self, key: NodeKey, out: &mut String) {
        let Some(node) = self.get(key) else {
            return;
        };
        match &node.data {
            NodeData::Text { text, .. } => out.push_str(text),
            NodeData::LineBreak => out.push('\n'),
            _ => {
                for &child in &node.children {
                    self.collect_text(child, out);
                }
            }
        }
    }

    /// Format of a text node; [`TextFormat::NONE`] for everything else.
    pub fn format(&self, key: NodeKey) -> TextFormat {
        match self.get(key).map(|node| &node.data) {
            Some(NodeData::Text { format, .. }) => *format,
            _ => TextFormat::NONE,
        }
    }

    pub fn has_format(&self, key: NodeKey, flag: TextFormat) -> bool {
        self.format(key).contains(flag)
    }

    pub fn set_format(&mut self, key: NodeKey, mask: TextFormat) -> Result<(), TreeError> {
        match self.data_mut(key)? {
            NodeData::Text { format, .. } => {
                *format = mask;
                Ok(())
            }
            _ => Err(TreeError::NotText { key }),
        }
    }

    /// Flip `flag` on a text node and return the resulting format.
    pub fn toggle_format(&mut self, key: NodeKey, flag: TextFormat) -> Result<TextFormat, TreeError> {
        match self.data_mut(key)? {
            NodeData::Text { format, .. } => {
                format.toggle(flag);
                Ok(*format)
            }
            _ => Err(TreeError::NotText { key }),
        }
    }

    /// Number of live nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.iter().flatten().count()
    }

    /// True when the document has no content below the root.
    pub fn is_empty(&self) -> bool {
        self.children(self.root).is_empty()
    }
}

impl Default for EditorTree {
    fn default() -> Self {
        Self::new()
    }
}
