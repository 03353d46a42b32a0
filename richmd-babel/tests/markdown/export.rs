//! Tests for editor tree → Markdown export

use super::{add, export};
use insta::assert_snapshot;
use richmd_babel::ast::Node;
use richmd_babel::editor::{EditorNodeKind, HeadingTag, ListType, NodeData};
use richmd_babel::{
    export_ast, export_markdown_with_options, ConvertError, EditorTree, NodeKey,
    SerializeOptions, TextFormat, VisitorRegistry,
};

fn paragraph_of(runs: &[(&str, TextFormat)]) -> (EditorTree, NodeKey) {
    let mut tree = EditorTree::new();
    let root = tree.root();
    let paragraph = add(&mut tree, root, NodeData::Paragraph);
    for (text, format) in runs {
        add(&mut tree, paragraph, NodeData::formatted_text(*text, *format));
    }
    (tree, paragraph)
}

fn ast_of(tree: &EditorTree) -> Node {
    export_ast(tree, tree.root(), &VisitorRegistry::default()).unwrap()
}

#[test]
fn test_empty_tree() {
    let tree = EditorTree::new();
    assert_eq!(ast_of(&tree), Node::root(vec![]));
    assert_eq!(export(&tree), "");
}

#[test]
fn test_adjacent_text_merges() {
    let (tree, _) = paragraph_of(&[("Hello,", TextFormat::NONE), (" world!", TextFormat::NONE)]);

    assert_eq!(
        ast_of(&tree),
        Node::root(vec![Node::paragraph(vec![Node::text("Hello, world!")])])
    );
}

#[test]
fn test_adjacent_emphasis_merges() {
    let (tree, _) = paragraph_of(&[
        ("Hello,", TextFormat::ITALIC),
        (" world!", TextFormat::ITALIC),
    ]);

    assert_eq!(
        ast_of(&tree),
        Node::root(vec![Node::paragraph(vec![Node::emphasis(vec![
            Node::text("Hello, world!")
        ])])])
    );
}

#[test]
fn test_underline_is_inline_html() {
    let (tree, _) = paragraph_of(&[
        ("Hello,", TextFormat::UNDERLINE),
        (" world!", TextFormat::UNDERLINE),
    ]);
    assert_eq!(export(&tree), "<u>Hello, world!</u>\n");
}

#[test]
fn test_format_transitions_share_wrappers() {
    let bold = TextFormat::BOLD;
    let (tree, _) = paragraph_of(&[
        ("plain ", TextFormat::NONE),
        ("bold ", bold),
        ("both", bold | TextFormat::ITALIC),
        (" bold", bold),
        (" plain", TextFormat::NONE),
    ]);
    assert_snapshot!(export(&tree).trim_end(), @"plain **bold *both* bold** plain");
}

#[test]
fn test_adjacent_runs_do_not_fuse_delimiters() {
    let b = TextFormat::BOLD;
    let i = TextFormat::ITALIC;

    let (tree, _) = paragraph_of(&[("a", b), ("b", b | i), ("c", i)]);
    assert_snapshot!(export(&tree).trim_end(), @"**&#x61;*b***_c_");

    let (tree, _) = paragraph_of(&[("a", b | i), ("b", i), ("c", b | i)]);
    assert_snapshot!(export(&tree).trim_end(), @"***a**&#x62;**c***");

    let (tree, _) = paragraph_of(&[("a", i), ("b", b | i), ("c", b)]);
    assert_snapshot!(export(&tree).trim_end(), @"*&#x61;**b***__c__");
}

#[test]
fn test_adjacent_code_runs_join() {
    let (tree, _) = paragraph_of(&[("a", TextFormat::CODE), ("b", TextFormat::CODE)]);
    assert_eq!(
        ast_of(&tree),
        Node::root(vec![Node::paragraph(vec![Node::inline_code("ab")])])
    );
}

#[test]
fn test_code_flag_wins_over_wrappers() {
    let (tree, _) = paragraph_of(&[
        ("x", TextFormat::CODE | TextFormat::BOLD),
        (" y", TextFormat::NONE),
    ]);
    assert_eq!(export(&tree), "`x` y\n");
}

#[test]
fn test_line_break_is_newline() {
    let mut tree = EditorTree::new();
    let root = tree.root();
    let paragraph = add(&mut tree, root, NodeData::Paragraph);
    add(&mut tree, paragraph, NodeData::text("Hello"));
    add(&mut tree, paragraph, NodeData::LineBreak);
    add(&mut tree, paragraph, NodeData::text("World"));

    assert_eq!(export(&tree), "Hello\nWorld\n");
}

#[test]
fn test_heading() {
    let mut tree = EditorTree::new();
    let root = tree.root();
    let heading = add(&mut tree, root, NodeData::heading(HeadingTag::H3));
    add(&mut tree, heading, NodeData::text("Title"));

    assert_eq!(export(&tree), "### Title\n");
}

#[test]
fn test_quote_gets_inner_paragraph() {
    let mut tree = EditorTree::new();
    let root = tree.root();
    let quote = add(&mut tree, root, NodeData::Quote);
    add(&mut tree, quote, NodeData::text("a"));

    assert_eq!(
        ast_of(&tree),
        Node::root(vec![Node::blockquote(vec![Node::paragraph(vec![
            Node::text("a")
        ])])])
    );
    assert_eq!(export(&tree), "> a\n");
}

#[test]
fn test_code_block_flattens_children() {
    let mut tree = EditorTree::new();
    let root = tree.root();
    let code = add(&mut tree, root, NodeData::code(Some("rust".to_string())));
    add(&mut tree, code, NodeData::text("fn main() {"));
    add(&mut tree, code, NodeData::LineBreak);
    add(&mut tree, code, NodeData::text("}"));

    assert_snapshot!(export(&tree).trim_end(), @r"
    ```rust
    fn main() {
    }
    ```
    ");
}

#[test]
fn test_numbered_list_start() {
    let mut tree = EditorTree::new();
    let root = tree.root();
    let list = add(
        &mut tree,
        root,
        NodeData::List {
            list_type: ListType::Number,
            start: 3,
        },
    );
    for text in ["a", "b"] {
        let item = add(&mut tree, list, NodeData::ListItem);
        add(&mut tree, item, NodeData::text(text));
    }

    assert_eq!(export(&tree), "3. a\n4. b\n");
}

#[test]
fn test_nested_list_reattaches_to_previous_item() {
    let mut tree = EditorTree::new();
    let root = tree.root();
    let list = add(&mut tree, root, NodeData::list(ListType::Bullet));
    let first = add(&mut tree, list, NodeData::ListItem);
    add(&mut tree, first, NodeData::text("a"));
    let holder = add(&mut tree, list, NodeData::ListItem);
    let nested = add(&mut tree, holder, NodeData::list(ListType::Bullet));
    let inner = add(&mut tree, nested, NodeData::ListItem);
    add(&mut tree, inner, NodeData::text("b"));

    assert_eq!(
        ast_of(&tree),
        Node::root(vec![Node::list(
            false,
            vec![Node::list_item(vec![
                Node::paragraph(vec![Node::text("a")]),
                Node::list(
                    false,
                    vec![Node::list_item(vec![Node::paragraph(vec![Node::text("b")])])]
                ),
            ])]
        )])
    );
    assert_eq!(export(&tree), "* a\n  * b\n");
}

#[test]
fn test_nested_list_without_previous_item_fails() {
    let mut tree = EditorTree::new();
    let root = tree.root();
    let list = add(&mut tree, root, NodeData::list(ListType::Bullet));
    let holder = add(&mut tree, list, NodeData::ListItem);
    let nested = add(&mut tree, holder, NodeData::list(ListType::Bullet));
    let inner = add(&mut tree, nested, NodeData::ListItem);
    add(&mut tree, inner, NodeData::text("b"));

    let err = export_ast(&tree, root, &VisitorRegistry::default()).unwrap_err();
    assert_eq!(err, ConvertError::OrphanNestedList(holder));
}

#[test]
fn test_image_and_rule() {
    let mut tree = EditorTree::new();
    let root = tree.root();
    let paragraph = add(&mut tree, root, NodeData::Paragraph);
    add(
        &mut tree,
        paragraph,
        NodeData::image("/a.png", "alt", Some("T".to_string())),
    );
    add(&mut tree, root, NodeData::HorizontalRule);

    assert_eq!(export(&tree), "![alt](/a.png \"T\")\n\n***\n");
}

#[test]
fn test_decorator_is_unsupported() {
    let mut tree = EditorTree::new();
    let root = tree.root();
    let decorator = add(&mut tree, root, NodeData::decorator("youtube"));

    let err = export_ast(&tree, root, &VisitorRegistry::default()).unwrap_err();
    match err {
        ConvertError::UnsupportedEditorNode { kind, key, data } => {
            assert_eq!(kind, EditorNodeKind::Decorator);
            assert_eq!(key, decorator);
            assert_eq!(data, NodeData::decorator("youtube"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_export_subtree() {
    let (tree, paragraph) = paragraph_of(&[("a", TextFormat::BOLD)]);

    let node = export_ast(&tree, paragraph, &VisitorRegistry::default()).unwrap();
    assert_eq!(
        node,
        Node::paragraph(vec![Node::strong(vec![Node::text("a")])])
    );
}

#[test]
fn test_custom_serialize_options() {
    let mut tree = EditorTree::new();
    let root = tree.root();
    let list = add(&mut tree, root, NodeData::list(ListType::Bullet));
    let item = add(&mut tree, list, NodeData::ListItem);
    add(&mut tree, item, NodeData::formatted_text("a", TextFormat::ITALIC));

    let options = SerializeOptions {
        bullet: '-',
        emphasis: '_',
        ..SerializeOptions::default()
    };
    let markdown =
        export_markdown_with_options(&tree, root, &VisitorRegistry::default(), &options).unwrap();
    assert_eq!(markdown, "- _a_\n");
}
