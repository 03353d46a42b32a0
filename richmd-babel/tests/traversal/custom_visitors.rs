//! Tests for registries built from custom visitors

use richmd_babel::ast::{self, NodeKind};
use richmd_babel::editor::{EditorNodeKind, NodeData};
use richmd_babel::visitors::{RootVisitor, TextVisitor};
use richmd_babel::{
    export_ast, export_markdown, import_ast, import_markdown, ConvertError, EditorTree,
    ExportContext, ImportScope, NodeKey, Visitor, VisitorRegistry,
};

/// Keeps raw inline HTML as literal text instead of rejecting it.
struct HtmlAsText;

impl Visitor for HtmlAsText {
    fn name(&self) -> &str {
        "htmlAsText"
    }

    fn matches_ast(&self, node: &ast::Node) -> bool {
        matches!(node, ast::Node::Html(_))
    }

    fn import(
        &self,
        node: &ast::Node,
        parent: NodeKey,
        scope: &mut ImportScope<'_>,
    ) -> Result<(), ConvertError> {
        if let ast::Node::Html(html) = node {
            scope.append(parent, NodeData::text(html.value.clone()))?;
        }
        Ok(())
    }
}

/// Creates paragraphs but never says where their children go.
struct ForgetfulParagraph;

impl Visitor for ForgetfulParagraph {
    fn name(&self) -> &str {
        "forgetfulParagraph"
    }

    fn matches_ast(&self, node: &ast::Node) -> bool {
        matches!(node, ast::Node::Paragraph(_))
    }

    fn import(
        &self,
        _node: &ast::Node,
        parent: NodeKey,
        scope: &mut ImportScope<'_>,
    ) -> Result<(), ConvertError> {
        scope.append(parent, NodeData::Paragraph)?;
        Ok(())
    }
}

/// Exports the root as `count` thematic breaks.
struct RootAsBreaks {
    count: usize,
}

impl Visitor for RootAsBreaks {
    fn name(&self) -> &str {
        "rootAsBreaks"
    }

    fn matches_editor(&self, tree: &EditorTree, key: NodeKey) -> bool {
        tree.kind(key).is_ok_and(|kind| kind == EditorNodeKind::Root)
    }

    fn export(
        &self,
        _key: NodeKey,
        siblings: &mut Vec<ast::Node>,
        ctx: &ExportContext<'_>,
    ) -> Result<(), ConvertError> {
        for _ in 0..self.count {
            ctx.append_to_parent(siblings, ast::Node::ThematicBreak);
        }
        Ok(())
    }
}

#[test]
fn test_extra_visitor_extends_defaults() {
    let mut registry = VisitorRegistry::with_defaults();
    registry.register(HtmlAsText);

    let mut tree = EditorTree::new();
    let root = tree.root();
    import_markdown(&mut tree, root, "a <span>b</span>", &registry).unwrap();

    let paragraph = tree.children(root)[0];
    assert_eq!(tree.children(paragraph).len(), 4);
    assert_eq!(tree.text_content(paragraph), "a <span>b</span>");

    let markdown = export_markdown(&tree, root, &registry).unwrap();
    assert_eq!(markdown, "a \\<span>b\\</span>\n");
}

#[test]
fn test_empty_registry_rejects_everything() {
    let registry = VisitorRegistry::new();
    let mut tree = EditorTree::new();
    let root = tree.root();

    let err = import_ast(&mut tree, root, &ast::Node::root(vec![]), &registry).unwrap_err();
    assert!(matches!(err, ConvertError::UnsupportedAstNode { ref kind, .. } if kind == "root"));

    let err = export_ast(&tree, root, &registry).unwrap_err();
    assert!(matches!(
        err,
        ConvertError::UnsupportedEditorNode {
            kind: EditorNodeKind::Root,
            ..
        }
    ));
}

#[test]
fn test_visitor_without_parent_mapping() {
    let mut registry = VisitorRegistry::new();
    registry.register(RootVisitor);
    registry.register(ForgetfulParagraph);
    registry.register(TextVisitor);

    let mut tree = EditorTree::new();
    let root = tree.root();
    let err = import_markdown(&mut tree, root, "Hello", &registry).unwrap_err();

    assert_eq!(
        err,
        ConvertError::MissingEditorParent {
            kind: NodeKind::Text
        }
    );
}

#[test]
fn test_export_must_yield_one_root() {
    let tree = EditorTree::new();

    let mut registry = VisitorRegistry::new();
    registry.register(RootAsBreaks { count: 0 });
    assert_eq!(
        export_ast(&tree, tree.root(), &registry),
        Err(ConvertError::RootCount(0))
    );

    let mut registry = VisitorRegistry::new();
    registry.register(RootAsBreaks { count: 2 });
    assert_eq!(
        export_ast(&tree, tree.root(), &registry),
        Err(ConvertError::RootCount(2))
    );
}

#[test]
fn test_first_registered_visitor_wins() {
    let mut registry = VisitorRegistry::new();
    registry.register(RootAsBreaks { count: 1 });
    registry.register(RootVisitor);

    let tree = EditorTree::new();
    assert_eq!(
        export_ast(&tree, tree.root(), &registry),
        Ok(ast::Node::ThematicBreak)
    );
    assert_eq!(registry.names(), vec!["rootAsBreaks", "root"]);
}
