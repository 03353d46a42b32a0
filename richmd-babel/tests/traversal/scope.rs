//! Tests for the traversal primitives with the default visitors

use richmd_babel::ast::Node;
use richmd_babel::editor::{NodeData, SerializedNode, TreeError};
use richmd_babel::{
    export_markdown, import_ast, ConvertError, EditorTree, ExportContext, TextFormat,
    VisitorRegistry,
};

#[test]
fn test_import_hand_built_ast() {
    let ast = Node::root(vec![Node::paragraph(vec![Node::strong(vec![
        Node::text("a"),
        Node::emphasis(vec![Node::text("b")]),
        Node::underline(vec![Node::text("c")]),
    ])])]);

    let mut tree = EditorTree::new();
    let root = tree.root();
    import_ast(&mut tree, root, &ast, &VisitorRegistry::default()).unwrap();

    let paragraph = tree.children(root)[0];
    let runs: Vec<(String, TextFormat)> = tree
        .children(paragraph)
        .iter()
        .map(|&key| (tree.text_content(key), tree.format(key)))
        .collect();
    assert_eq!(
        runs,
        vec![
            ("a".to_string(), TextFormat::BOLD),
            ("b".to_string(), TextFormat::BOLD | TextFormat::ITALIC),
            ("c".to_string(), TextFormat::BOLD | TextFormat::UNDERLINE),
        ]
    );
}

#[test]
fn test_sibling_formatting_does_not_leak() {
    let ast = Node::root(vec![Node::paragraph(vec![
        Node::emphasis(vec![Node::text("a")]),
        Node::text("b"),
    ])]);

    let mut tree = EditorTree::new();
    let root = tree.root();
    import_ast(&mut tree, root, &ast, &VisitorRegistry::default()).unwrap();

    let paragraph = tree.children(root)[0];
    let runs = tree.children(paragraph);
    assert_eq!(tree.format(runs[0]), TextFormat::ITALIC);
    assert_eq!(tree.format(runs[1]), TextFormat::NONE);
}

#[test]
fn test_import_into_missing_node() {
    let mut other = EditorTree::new();
    let mut foreign = other.root();
    for _ in 0..3 {
        foreign = other.create(NodeData::Paragraph);
    }

    let mut tree = EditorTree::new();
    let err = import_ast(
        &mut tree,
        foreign,
        &Node::root(vec![]),
        &VisitorRegistry::default(),
    )
    .unwrap_err();
    assert_eq!(err, ConvertError::Tree(TreeError::MissingNode(foreign)));
}

#[test]
fn test_append_to_parent_merges_text() {
    let tree = EditorTree::new();
    let registry = VisitorRegistry::default();
    let ctx = ExportContext::new(&tree, &registry);

    let mut siblings = Vec::new();
    ctx.append_to_parent(&mut siblings, Node::text("Hello,"));
    ctx.append_to_parent(&mut siblings, Node::text(" world!"));

    assert_eq!(siblings, vec![Node::text("Hello, world!")]);
}

#[test]
fn test_append_to_parent_returns_merged_wrapper() {
    let tree = EditorTree::new();
    let registry = VisitorRegistry::default();
    let ctx = ExportContext::new(&tree, &registry);

    let mut siblings = vec![Node::emphasis(vec![Node::text("a")])];
    let wrapper = ctx.append_to_parent(&mut siblings, Node::emphasis(vec![]));
    let children = wrapper.children_mut().expect("emphasis has children");
    ctx.append_to_parent(children, Node::text("b"));

    assert_eq!(siblings, vec![Node::emphasis(vec![Node::text("ab")])]);
}

#[test]
fn test_append_to_parent_keeps_different_wrappers_apart() {
    let tree = EditorTree::new();
    let registry = VisitorRegistry::default();
    let ctx = ExportContext::new(&tree, &registry);

    let mut siblings = Vec::new();
    ctx.append_to_parent(&mut siblings, Node::emphasis(vec![Node::text("a")]));
    ctx.append_to_parent(&mut siblings, Node::strong(vec![Node::text("b")]));
    ctx.append_to_parent(&mut siblings, Node::underline(vec![Node::text("c")]));

    assert_eq!(siblings.len(), 3);
}

#[test]
fn test_serialized_state_exports() {
    let state: SerializedNode = serde_json::from_str(
        r#"{
            "type": "root",
            "children": [
                {"type": "heading", "tag": "h1", "children": [{"type": "text", "text": "Title"}]},
                {"type": "paragraph", "children": [
                    {"type": "text", "text": "Hi", "format": 1},
                    {"type": "linebreak"},
                    {"type": "text", "text": "there"}
                ]}
            ]
        }"#,
    )
    .unwrap();

    let tree = EditorTree::from_serialized(&state).unwrap();
    let markdown = export_markdown(&tree, tree.root(), &VisitorRegistry::default()).unwrap();
    assert_eq!(markdown, "# Title\n\n**Hi**\nthere\n");

    assert_eq!(tree.to_serialized(tree.root()).unwrap(), state);
}
