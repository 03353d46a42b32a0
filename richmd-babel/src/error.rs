//! Error types for conversion operations

use crate::ast;
use crate::editor::{EditorNodeKind, NodeData, NodeKey, TreeError};

/// Errors that can occur while converting between the markdown AST and the editor tree.
///
/// Every variant is fatal for the conversion that raised it: a traversal never skips a node it
/// does not understand.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConvertError {
    /// No import visitor accepts this markdown node.
    #[error("no import visitor for markdown node '{kind}'")]
    UnsupportedAstNode { kind: String, node: Box<ast::Node> },

    /// No export visitor accepts this editor node.
    #[error("no export visitor for editor node '{kind}' ({key})")]
    UnsupportedEditorNode {
        kind: EditorNodeKind,
        key: NodeKey,
        data: NodeData,
    },

    /// Children were traversed into an AST node that cannot hold any.
    #[error("markdown node '{kind}' cannot have children")]
    NotAParent { kind: ast::NodeKind },

    /// A nested list sits in a list item that has no preceding item to attach to.
    #[error("nested list in {0} has no preceding list item to attach to")]
    OrphanNestedList(NodeKey),

    /// The visitor of an AST node's parent never recorded where its children attach.
    #[error("no editor parent recorded for the parent of markdown node '{kind}'")]
    MissingEditorParent { kind: ast::NodeKind },

    /// Export must produce exactly one top-level AST node.
    #[error("export produced {0} top-level nodes, expected exactly one root")]
    RootCount(usize),

    #[error(transparent)]
    Tree(#[from] TreeError),

    /// The markdown source could not be mapped onto the AST.
    #[error("parse error: {0}")]
    Parse(String),
}
