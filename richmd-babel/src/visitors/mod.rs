//! Built-in conversion visitors
//!
//!     One visitor per family of node kinds, registered in this order by
//!     [`VisitorRegistry::with_defaults`](crate::registry::VisitorRegistry::with_defaults):
//!
//!     | Visitor          | Markdown AST              | Editor tree         | Joins           |
//!     |------------------|---------------------------|---------------------|-----------------|
//!     | root             | root                      | root                |                 |
//!     | paragraph        | paragraph                 | paragraph (*)       |                 |
//!     | text             | text                      | text                | text + text     |
//!     | formatting       | emphasis, strong, `<u>`   | text format flags   | same wrapper    |
//!     | inlineCode       | inlineCode                | text with CODE      |                 |
//!     | link             | link                      | link                |                 |
//!     | heading          | heading (depth)           | heading (tag)       |                 |
//!     | list             | list                      | list (**)           |                 |
//!     | listItem         | listItem + paragraph      | listitem (**)       |                 |
//!     | blockquote       | blockquote + paragraph    | quote               |                 |
//!     | code             | code                      | code                |                 |
//!     | thematicBreak    | thematicBreak             | horizontalrule      |                 |
//!     | image            | image                     | image               |                 |
//!     | lineBreak        | text `"\n"`               | linebreak           |                 |
//!
//!     (*) A paragraph directly inside a quote or list item does not exist in the editor: its
//!     content is attached to the quote or list item itself.
//!
//!     (**) The editor keeps one block per list item. A nested list gets its own list item
//!     placed after the item it belongs to, and export folds it back into the preceding item.

mod blocks;
mod inline;

pub use blocks::{
    BlockquoteVisitor, CodeVisitor, HeadingVisitor, ImageVisitor, LinkVisitor, ListItemVisitor,
    ListVisitor, ParagraphVisitor, RootVisitor, ThematicBreakVisitor,
};
pub use inline::{FormattingVisitor, InlineCodeVisitor, LineBreakVisitor, TextVisitor};

use crate::ast;
use crate::editor::{EditorNodeKind, EditorTree, NodeKey};
use crate::error::ConvertError;

/// Error for a node that reached a visitor it does not belong to.
pub(crate) fn unexpected_ast(node: &ast::Node) -> ConvertError {
    ConvertError::UnsupportedAstNode {
        kind: node.kind().to_string(),
        node: Box::new(node.clone()),
    }
}

/// Error for an editor node that reached a visitor it does not belong to.
pub(crate) fn unexpected_editor(tree: &EditorTree, key: NodeKey) -> ConvertError {
    match tree.data(key) {
        Ok(data) => ConvertError::UnsupportedEditorNode {
            kind: data.kind(),
            key,
            data: data.clone(),
        },
        Err(err) => err.into(),
    }
}

pub(crate) fn is_kind(tree: &EditorTree, key: NodeKey, kind: EditorNodeKind) -> bool {
    tree.kind(key).is_ok_and(|k| k == kind)
}
