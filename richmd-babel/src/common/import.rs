//! Builds editor content from a markdown AST.
//!
//! # The High-Level Concept
//!
//! The AST nests formatting as wrapper nodes while the editor keeps it as flags on text runs,
//! and the editor forbids some nestings the AST allows (a paragraph directly inside a quote or a
//! list item). A single pre-order walk resolves both: every AST node learns which editor node its
//! content attaches to and which formatting it inherits, before its children are visited.
//!
//! # The Algorithm
//!
//! 1. **Initialization:**
//!    - Give every AST node a pre-order id as it is reached
//!    - The AST root attaches to the editor node the caller passed in
//!
//! 2. **Visiting a Node:**
//!    - Look up the editor parent recorded for the AST parent (`parent_of`)
//!    - Start from the AST parent's accumulated formatting (`formatting_of`)
//!    - Dispatch to the first matching visitor, which builds zero or one editor node, may add a
//!      formatting flag, and records where its own children attach
//!
//! 3. **Recursing:**
//!    - Visit children in document order against the tables just updated
//!
//! Both tables live only for the duration of one [`import_ast`] call.

use crate::ast;
use crate::editor::{EditorTree, NodeData, NodeKey};
use crate::error::ConvertError;
use crate::format::TextFormat;
use crate::registry::VisitorRegistry;
use std::collections::HashMap;

/// Import `node` under `parent`, appending to whatever `parent` already holds.
pub fn import_ast(
    tree: &mut EditorTree,
    parent: NodeKey,
    node: &ast::Node,
    registry: &VisitorRegistry,
) -> Result<(), ConvertError> {
    tree.data(parent)?;
    let mut scope = ImportScope::new(tree);
    scope.visit(node, None, parent, registry)
}

/// Traversal-local state handed to visitors during import.
pub struct ImportScope<'a> {
    tree: &'a mut EditorTree,
    next_id: usize,
    current: usize,
    parent_of: HashMap<usize, NodeKey>,
    formatting_of: HashMap<usize, TextFormat>,
    // listitem -> last dedicated item inserted after it for a nested list
    nested_items: HashMap<NodeKey, NodeKey>,
}

impl<'a> ImportScope<'a> {
    pub fn new(tree: &'a mut EditorTree) -> Self {
        ImportScope {
            tree,
            next_id: 0,
            current: 0,
            parent_of: HashMap::new(),
            formatting_of: HashMap::new(),
            nested_items: HashMap::new(),
        }
    }

    pub fn tree(&self) -> &EditorTree {
        &*self.tree
    }

    /// Create a node from `data` and append it to `parent`.
    pub fn append(&mut self, parent: NodeKey, data: NodeData) -> Result<NodeKey, ConvertError> {
        let key = self.tree.create(data);
        self.tree.append(parent, key)?;
        Ok(key)
    }

    /// Children of the AST node being visited attach to `key`.
    pub fn set_current_as_parent_to(&mut self, key: NodeKey) {
        self.parent_of.insert(self.current, key);
    }

    /// Add `flag` to the formatting the current AST node passes on to its descendants.
    pub fn add_formatting(&mut self, flag: TextFormat) {
        *self.formatting_of.entry(self.current).or_default() |= flag;
    }

    /// Formatting accumulated by the current AST node, inherited flags included.
    pub fn formatting(&self) -> TextFormat {
        self.formatting_of
            .get(&self.current)
            .copied()
            .unwrap_or_default()
    }

    /// A fresh list item placed after `item` (or after the item previously created for it)
    /// that a nested list can live in.
    pub fn dedicated_item_for(&mut self, item: NodeKey) -> Result<NodeKey, ConvertError> {
        let anchor = self.nested_items.get(&item).copied().unwrap_or(item);
        let dedicated = self.tree.create(NodeData::ListItem);
        self.tree.insert_after(anchor, dedicated)?;
        self.nested_items.insert(item, dedicated);
        Ok(dedicated)
    }

    fn visit(
        &mut self,
        node: &ast::Node,
        ast_parent: Option<usize>,
        root_parent: NodeKey,
        registry: &VisitorRegistry,
    ) -> Result<(), ConvertError> {
        let id = self.next_id;
        self.next_id += 1;

        let (editor_parent, inherited) = match ast_parent {
            None => (root_parent, TextFormat::NONE),
            Some(parent_id) => {
                let editor_parent = self.parent_of.get(&parent_id).copied().ok_or(
                    ConvertError::MissingEditorParent { kind: node.kind() },
                )?;
                let inherited = self
                    .formatting_of
                    .get(&parent_id)
                    .copied()
                    .unwrap_or_default();
                (editor_parent, inherited)
            }
        };
        self.formatting_of.insert(id, inherited);

        let visitor = registry
            .find_ast(node)
            .ok_or_else(|| ConvertError::UnsupportedAstNode {
                kind: node.kind().to_string(),
                node: Box::new(node.clone()),
            })?;
        tracing::trace!(
            visitor = visitor.name(),
            kind = %node.kind(),
            parent = %editor_parent,
            "import node"
        );

        self.current = id;
        visitor.import(node, editor_parent, self)?;

        for child in node.children().unwrap_or_default() {
            self.visit(child, Some(id), root_parent, registry)?;
        }
        Ok(())
    }
}
