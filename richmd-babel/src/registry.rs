//! Visitor registry for conversion rule lookup
//!
//! This module holds the ordered list of conversion rules ("visitors") that both traversals
//! consult. A visitor bundles the per-kind logic for one family of nodes: how an AST node becomes
//! editor content, how an editor node becomes AST content, and whether two adjacent AST siblings
//! should be merged.
//!
//! Lookup is first-match-wins in registration order. Traversals treat a missing match as fatal,
//! so a registry decides exactly which document features a conversion supports.

use crate::ast;
use crate::common::export::ExportContext;
use crate::common::import::ImportScope;
use crate::editor::{EditorTree, NodeKey};
use crate::error::ConvertError;

/// A conversion rule for one family of node kinds.
///
/// Every method has a default, so a visitor only implements the sides it takes part in: the
/// formatting visitor, for example, never matches an editor node and only contributes import and
/// join rules.
pub trait Visitor {
    /// Name of the visitor, used in logs and [`VisitorRegistry::names`].
    fn name(&self) -> &str;

    /// Whether this visitor imports `node`.
    fn matches_ast(&self, _node: &ast::Node) -> bool {
        false
    }

    /// Build editor content for `node` under `parent`.
    ///
    /// Implementations record where the node's children attach with
    /// [`ImportScope::set_current_as_parent_to`].
    fn import(
        &self,
        node: &ast::Node,
        _parent: NodeKey,
        _scope: &mut ImportScope<'_>,
    ) -> Result<(), ConvertError> {
        Err(ConvertError::UnsupportedAstNode {
            kind: node.kind().to_string(),
            node: Box::new(node.clone()),
        })
    }

    /// Whether this visitor exports the editor node at `key`.
    fn matches_editor(&self, _tree: &EditorTree, _key: NodeKey) -> bool {
        false
    }

    /// Build AST content for the editor node at `key` and append it to `siblings`.
    fn export(
        &self,
        key: NodeKey,
        _siblings: &mut Vec<ast::Node>,
        ctx: &ExportContext<'_>,
    ) -> Result<(), ConvertError> {
        let data = ctx.tree().data(key)?.clone();
        Err(ConvertError::UnsupportedEditorNode {
            kind: data.kind(),
            key,
            data,
        })
    }

    /// Whether `next` should be merged into its previous sibling `prev`.
    fn should_join(&self, _prev: &ast::Node, _next: &ast::Node) -> bool {
        false
    }

    /// Merge `next` into `prev`. Only called after [`Visitor::should_join`] returned true.
    fn join(&self, _prev: &mut ast::Node, _next: ast::Node) {}
}

/// Ordered registry of conversion visitors
///
/// # Examples
///
/// ```ignore
/// let mut registry = VisitorRegistry::new();
/// registry.register(MyImageVisitor);
///
/// let visitor = registry.find_ast(&node).ok_or(...)?;
/// ```
pub struct VisitorRegistry {
    visitors: Vec<Box<dyn Visitor>>,
}

impl VisitorRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        VisitorRegistry {
            visitors: Vec::new(),
        }
    }

    /// Register a visitor after all existing ones.
    ///
    /// Earlier registrations take precedence, so a visitor registered here only sees nodes no
    /// previous visitor claimed.
    pub fn register<V: Visitor + 'static>(&mut self, visitor: V) {
        self.visitors.push(Box::new(visitor));
    }

    /// First visitor that imports `node`.
    pub fn find_ast(&self, node: &ast::Node) -> Option<&dyn Visitor> {
        self.visitors
            .iter()
            .map(|v| v.as_ref())
            .find(|v| v.matches_ast(node))
    }

    /// First visitor that exports the editor node at `key`.
    pub fn find_editor(&self, tree: &EditorTree, key: NodeKey) -> Option<&dyn Visitor> {
        self.visitors
            .iter()
            .map(|v| v.as_ref())
            .find(|v| v.matches_editor(tree, key))
    }

    /// First visitor that merges `next` into `prev`.
    pub fn find_join(&self, prev: &ast::Node, next: &ast::Node) -> Option<&dyn Visitor> {
        self.visitors
            .iter()
            .map(|v| v.as_ref())
            .find(|v| v.should_join(prev, next))
    }

    /// Registered visitor names, in lookup order.
    pub fn names(&self) -> Vec<&str> {
        self.visitors.iter().map(|v| v.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.visitors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visitors.is_empty()
    }

    /// Create a registry with the built-in visitors
    pub fn with_defaults() -> Self {
        use crate::visitors::*;

        let mut registry = Self::new();

        registry.register(RootVisitor);
        registry.register(ParagraphVisitor);
        registry.register(TextVisitor);
        registry.register(FormattingVisitor);
        registry.register(InlineCodeVisitor);
        registry.register(LinkVisitor);
        registry.register(HeadingVisitor);
        registry.register(ListVisitor);
        registry.register(ListItemVisitor);
        registry.register(BlockquoteVisitor);
        registry.register(CodeVisitor);
        registry.register(ThematicBreakVisitor);
        registry.register(ImageVisitor);
        registry.register(LineBreakVisitor);

        registry
    }
}

impl Default for VisitorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
