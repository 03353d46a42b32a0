//! Builds a markdown AST from the editor tree.
//!
//! # The High-Level Concept
//!
//! The editor tree is walked in pre-order and every editor node is handed to its visitor, which
//! appends AST content to a sibling list. Appending goes through [`ExportContext::append_to_parent`],
//! which merges the new node into the previous sibling whenever a visitor's join rule accepts the
//! pair. That single primitive is what turns a run-per-format editor paragraph back into natural
//! markdown: adjacent text coalesces and adjacent same-kind wrappers share one node.
//!
//! # The Algorithm
//!
//! 1. **Initialization:**
//!    - Start with an empty top-level sibling list
//!
//! 2. **Visiting a Node:**
//!    - Dispatch to the first visitor that matches the editor node
//!    - The visitor appends its AST node (possibly merged) and traverses the editor children
//!      into the node it got back
//!
//! 3. **Completion:**
//!    - The top-level list must hold exactly one node, which is the result

use crate::ast;
use crate::editor::{EditorTree, NodeKey};
use crate::error::ConvertError;
use crate::registry::VisitorRegistry;

/// Export the subtree at `key` into a single AST node.
pub fn export_ast(
    tree: &EditorTree,
    key: NodeKey,
    registry: &VisitorRegistry,
) -> Result<ast::Node, ConvertError> {
    let ctx = ExportContext::new(tree, registry);
    let mut top = Vec::new();
    ctx.visit(key, &mut top)?;

    let [root]: [ast::Node; 1] = top
        .try_into()
        .map_err(|nodes: Vec<ast::Node>| ConvertError::RootCount(nodes.len()))?;
    Ok(root)
}

/// Read-only traversal state handed to visitors during export.
pub struct ExportContext<'a> {
    tree: &'a EditorTree,
    registry: &'a VisitorRegistry,
}

impl<'a> ExportContext<'a> {
    pub fn new(tree: &'a EditorTree, registry: &'a VisitorRegistry) -> Self {
        ExportContext { tree, registry }
    }

    pub fn tree(&self) -> &'a EditorTree {
        self.tree
    }

    /// Export one editor node into `siblings`.
    pub fn visit(&self, key: NodeKey, siblings: &mut Vec<ast::Node>) -> Result<(), ConvertError> {
        let Some(visitor) = self.registry.find_editor(self.tree, key) else {
            let data = self.tree.data(key)?.clone();
            return Err(ConvertError::UnsupportedEditorNode {
                kind: data.kind(),
                key,
                data,
            });
        };
        tracing::trace!(visitor = visitor.name(), %key, "export node");
        visitor.export(key, siblings, self)
    }

    /// Export every child of the editor node `key` into `into`.
    pub fn traverse_children(&self, key: NodeKey, into: &mut ast::Node) -> Result<(), ConvertError> {
        let kind = into.kind();
        let children = into
            .children_mut()
            .ok_or(ConvertError::NotAParent { kind })?;
        for &child in self.tree.children(key) {
            self.visit(child, children)?;
        }
        Ok(())
    }

    /// Append `node` to `siblings`, merging it into the last sibling when a join rule applies.
    ///
    /// Returns the node that now holds `node`'s content: the merged sibling or `node` itself.
    pub fn append_to_parent<'n>(
        &self,
        siblings: &'n mut Vec<ast::Node>,
        node: ast::Node,
    ) -> &'n mut ast::Node {
        let joiner = siblings
            .last()
            .and_then(|prev| self.registry.find_join(prev, &node));

        let index = match joiner {
            Some(visitor) => {
                let index = siblings.len() - 1;
                visitor.join(&mut siblings[index], node);
                index
            }
            None => {
                siblings.push(node);
                siblings.len() - 1
            }
        };
        &mut siblings[index]
    }
}
