//! Tests for Markdown → editor tree import

use super::{add, import, outline};
use insta::assert_snapshot;
use richmd_babel::editor::NodeData;
use richmd_babel::{import_markdown, ConvertError, EditorTree, TextFormat, VisitorRegistry};

#[test]
fn test_empty_document_has_no_content() {
    let tree = import("");
    assert!(tree.is_empty());
    assert_eq!(tree.node_count(), 1);

    assert!(import("\n\n").is_empty());
}

#[test]
fn test_plain_paragraph() {
    assert_snapshot!(outline(&import("Hello World")), @r#"
    root
      paragraph
        text "Hello World"
    "#);
}

#[test]
fn test_soft_break_stays_in_one_run() {
    assert_snapshot!(outline(&import("Hello\nWorld")), @r#"
    root
      paragraph
        text "Hello\nWorld"
    "#);
}

#[test]
fn test_nested_formatting_becomes_flags() {
    let tree = import("*Hello **world** some more*");
    assert_snapshot!(outline(&tree), @r#"
    root
      paragraph
        text "Hello " [italic]
        text "world" [bold+italic]
        text " some more" [italic]
    "#);
}

#[test]
fn test_underline_tags_become_flag() {
    let tree = import("<u>Hello</u> World");
    let paragraph = tree.children(tree.root())[0];
    let runs = tree.children(paragraph);

    assert_eq!(runs.len(), 2);
    assert!(tree.has_format(runs[0], TextFormat::UNDERLINE));
    assert_eq!(tree.format(runs[1]), TextFormat::NONE);
}

#[test]
fn test_inline_code_replaces_inherited_formatting() {
    assert_snapshot!(outline(&import("**a `b`**")), @r#"
    root
      paragraph
        text "a " [bold]
        text "b" [code]
    "#);
}

#[test]
fn test_formatting_inherited_through_link() {
    assert_snapshot!(outline(&import("*[a](/x)*")), @r#"
    root
      paragraph
        link /x
          text "a" [italic]
    "#);
}

#[test]
fn test_heading_and_paragraph() {
    assert_snapshot!(outline(&import("## Title\n\nBody")), @r#"
    root
      heading h2
        text "Title"
      paragraph
        text "Body"
    "#);
}

#[test]
fn test_quote_paragraphs_are_collapsed() {
    assert_snapshot!(outline(&import("> a\n>\n> b")), @r#"
    root
      quote
        text "a"
        linebreak
        text "b"
    "#);
}

#[test]
fn test_ordered_list_start() {
    assert_snapshot!(outline(&import("3. a\n4. b")), @r#"
    root
      list Number 3
        listitem
          text "a"
        listitem
          text "b"
    "#);
}

#[test]
fn test_nested_list_gets_dedicated_item() {
    assert_snapshot!(outline(&import("* a\n  * b\n* c")), @r#"
    root
      list Bullet 1
        listitem
          text "a"
        listitem
          list Bullet 1
            listitem
              text "b"
        listitem
          text "c"
    "#);
}

#[test]
fn test_consecutive_nested_lists_keep_order() {
    assert_snapshot!(outline(&import("* a\n  * b\n  1. c")), @r#"
    root
      list Bullet 1
        listitem
          text "a"
        listitem
          list Bullet 1
            listitem
              text "b"
        listitem
          list Number 1
            listitem
              text "c"
    "#);
}

#[test]
fn test_code_block() {
    assert_snapshot!(outline(&import("```js\nconst a = 1;\n```")), @r#"
    root
      code js
        text "const a = 1;"
    "#);
}

#[test]
fn test_leaf_blocks() {
    assert_snapshot!(outline(&import("![alt](/a.png)\n\n***")), @r#"
    root
      paragraph
        image /a.png "alt"
      horizontalrule
    "#);
}

#[test]
fn test_link_keeps_title() {
    let tree = import("[site](https://example.com \"Example\")");
    let paragraph = tree.children(tree.root())[0];
    let link = tree.children(paragraph)[0];

    assert_eq!(
        tree.data(link).unwrap(),
        &NodeData::Link {
            url: "https://example.com".to_string(),
            title: Some("Example".to_string()),
        }
    );
    assert_eq!(tree.text_content(link), "site");
}

#[test]
fn test_import_appends_to_existing_content() {
    let mut tree = import("first");
    let root = tree.root();
    import_markdown(&mut tree, root, "second", &VisitorRegistry::default()).unwrap();

    assert_snapshot!(outline(&tree), @r#"
    root
      paragraph
        text "first"
      paragraph
        text "second"
    "#);
}

#[test]
fn test_import_into_quote() {
    let mut tree = EditorTree::new();
    let root = tree.root();
    let quote = add(&mut tree, root, NodeData::Quote);

    import_markdown(&mut tree, quote, "a\n\nb", &VisitorRegistry::default()).unwrap();

    assert_snapshot!(outline(&tree), @r#"
    root
      quote
        text "a"
        linebreak
        text "b"
    "#);
}

#[test]
fn test_raw_html_is_unsupported() {
    let mut tree = EditorTree::new();
    let root = tree.root();
    let err = import_markdown(
        &mut tree,
        root,
        "a <span>b</span>",
        &VisitorRegistry::default(),
    )
    .unwrap_err();

    assert!(
        matches!(&err, ConvertError::UnsupportedAstNode { kind, .. } if kind == "html"),
        "unexpected error: {err:?}"
    );
}
