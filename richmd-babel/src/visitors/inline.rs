//! Inline visitors: text runs, formatting wrappers, inline code and line breaks.

use super::{is_kind, unexpected_ast, unexpected_editor};
use crate::ast;
use crate::common::export::ExportContext;
use crate::common::import::ImportScope;
use crate::editor::{EditorNodeKind, EditorTree, NodeData, NodeKey};
use crate::error::ConvertError;
use crate::format::{FormatTransition, TextFormat, Wrapper};
use crate::registry::Visitor;

pub struct TextVisitor;

impl Visitor for TextVisitor {
    fn name(&self) -> &str {
        "text"
    }

    fn matches_ast(&self, node: &ast::Node) -> bool {
        matches!(node, ast::Node::Text(_))
    }

    fn import(
        &self,
        node: &ast::Node,
        parent: NodeKey,
        scope: &mut ImportScope<'_>,
    ) -> Result<(), ConvertError> {
        let ast::Node::Text(text) = node else {
            return Err(unexpected_ast(node));
        };
        let format = scope.formatting();
        scope.append(parent, NodeData::formatted_text(text.value.clone(), format))?;
        Ok(())
    }

    fn matches_editor(&self, tree: &EditorTree, key: NodeKey) -> bool {
        is_kind(tree, key, EditorNodeKind::Text)
    }

    /// Re-nests the run's flags as wrapper nodes.
    ///
    /// Wrappers the run shares with the previous text run are re-entered by appending an empty
    /// wrapper of the same kind, which the join rule folds into the wrapper the previous run
    /// left behind. Only the last-child chain of the current parent is followed, so a shared
    /// wrapper hidden under an unshared one is reopened instead. Remaining wrappers are opened
    /// in [`WRAPPER_ORDER`](crate::format::WRAPPER_ORDER).
    fn export(
        &self,
        key: NodeKey,
        siblings: &mut Vec<ast::Node>,
        ctx: &ExportContext<'_>,
    ) -> Result<(), ConvertError> {
        let tree = ctx.tree();
        let NodeData::Text { text, format } = tree.data(key)? else {
            return Err(unexpected_editor(tree, key));
        };

        let prev_format = tree
            .previous_sibling(key)
            .map(|prev| tree.format(prev))
            .unwrap_or_default();
        let transition = FormatTransition::between(prev_format, *format);

        if transition.code {
            ctx.append_to_parent(siblings, ast::Node::inline_code(text.clone()));
            return Ok(());
        }

        let reentered = open_chain(siblings.as_slice(), &transition.continued);

        let fresh = transition.fresh(&reentered);
        let mut local = siblings;
        for wrapper in reentered.into_iter().chain(fresh) {
            let node = ctx.append_to_parent(local, wrapper.empty_node());
            let kind = node.kind();
            local = node
                .children_mut()
                .ok_or(ConvertError::NotAParent { kind })?;
        }
        ctx.append_to_parent(local, ast::Node::text(text.clone()));
        Ok(())
    }

    fn should_join(&self, prev: &ast::Node, next: &ast::Node) -> bool {
        matches!((prev, next), (ast::Node::Text(_), ast::Node::Text(_)))
    }

    fn join(&self, prev: &mut ast::Node, next: ast::Node) {
        if let (ast::Node::Text(prev), ast::Node::Text(next)) = (prev, next) {
            prev.value.push_str(&next.value);
        }
    }
}

/// Wrappers along the last-child chain of `siblings` that are all `continued`, outermost first.
fn open_chain(siblings: &[ast::Node], continued: &[Wrapper]) -> Vec<Wrapper> {
    let mut chain = Vec::new();
    let mut level = siblings;

    while let Some(last) = level.last() {
        let Some(wrapper) = Wrapper::of_node(last) else {
            break;
        };
        if !continued.contains(&wrapper) || chain.contains(&wrapper) {
            break;
        }
        chain.push(wrapper);
        level = last.children().unwrap_or_default();
    }
    chain
}

/// Emphasis, strong and underline: formatting flags on import, wrapper merging on export.
pub struct FormattingVisitor;

impl Visitor for FormattingVisitor {
    fn name(&self) -> &str {
        "formatting"
    }

    fn matches_ast(&self, node: &ast::Node) -> bool {
        Wrapper::of_node(node).is_some()
    }

    fn import(
        &self,
        node: &ast::Node,
        parent: NodeKey,
        scope: &mut ImportScope<'_>,
    ) -> Result<(), ConvertError> {
        let wrapper = Wrapper::of_node(node).ok_or_else(|| unexpected_ast(node))?;
        scope.add_formatting(wrapper.flag());
        scope.set_current_as_parent_to(parent);
        Ok(())
    }

    fn should_join(&self, prev: &ast::Node, next: &ast::Node) -> bool {
        match (Wrapper::of_node(prev), Wrapper::of_node(next)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    fn join(&self, prev: &mut ast::Node, mut next: ast::Node) {
        if let (Some(into), Some(from)) = (prev.children_mut(), next.children_mut()) {
            into.append(from);
        }
    }
}

pub struct InlineCodeVisitor;

impl Visitor for InlineCodeVisitor {
    fn name(&self) -> &str {
        "inlineCode"
    }

    fn matches_ast(&self, node: &ast::Node) -> bool {
        matches!(node, ast::Node::InlineCode(_))
    }

    fn should_join(&self, prev: &ast::Node, next: &ast::Node) -> bool {
        matches!(
            (prev, next),
            (ast::Node::InlineCode(_), ast::Node::InlineCode(_))
        )
    }

    fn join(&self, prev: &mut ast::Node, next: ast::Node) {
        if let (ast::Node::InlineCode(prev), ast::Node::InlineCode(next)) = (prev, next) {
            prev.value.push_str(&next.value);
        }
    }

    // Code replaces any inherited formatting.
    fn import(
        &self,
        node: &ast::Node,
        parent: NodeKey,
        scope: &mut ImportScope<'_>,
    ) -> Result<(), ConvertError> {
        let ast::Node::InlineCode(code) = node else {
            return Err(unexpected_ast(node));
        };
        scope.append(
            parent,
            NodeData::formatted_text(code.value.clone(), TextFormat::CODE),
        )?;
        Ok(())
    }
}

pub struct LineBreakVisitor;

impl Visitor for LineBreakVisitor {
    fn name(&self) -> &str {
        "lineBreak"
    }

    fn matches_editor(&self, tree: &EditorTree, key: NodeKey) -> bool {
        is_kind(tree, key, EditorNodeKind::LineBreak)
    }

    fn export(
        &self,
        _key: NodeKey,
        siblings: &mut Vec<ast::Node>,
        ctx: &ExportContext<'_>,
    ) -> Result<(), ConvertError> {
        ctx.append_to_parent(siblings, ast::Node::text("\n"));
        Ok(())
    }
}
