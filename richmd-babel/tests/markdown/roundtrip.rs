//! Round-trip tests: Markdown → editor tree → Markdown

use super::{add, export, import, roundtrip};
use proptest::prelude::*;
use richmd_babel::editor::NodeData;
use richmd_babel::{EditorTree, TextFormat};

fn assert_roundtrip(markdown: &str) {
    assert_eq!(
        roundtrip(markdown).trim(),
        markdown.trim(),
        "round trip changed {markdown:?}"
    );
}

#[test]
fn test_roundtrip_empty() {
    assert_eq!(roundtrip(""), "");
}

#[test]
fn test_roundtrip_paragraphs() {
    assert_roundtrip("Hello World\n");
    assert_roundtrip("Hello\nWorld");
    assert_roundtrip("Hello\n\nWorld");
}

#[test]
fn test_roundtrip_formatting() {
    assert_roundtrip("*Hello* World");
    assert_roundtrip("**Hello** World");
    assert_roundtrip("<u>Hello</u> World");
    assert_roundtrip("`code` span");
}

#[test]
fn test_roundtrip_nested_formatting() {
    assert_roundtrip("*Hello **world** some more*\n\n**Hello *world* <u>some</u> more**");
}

#[test]
fn test_roundtrip_headings() {
    assert_roundtrip("# Heading\n\nText");
    assert_roundtrip("###### Deep");
}

#[test]
fn test_roundtrip_lists() {
    assert_roundtrip("* a\n* b");
    assert_roundtrip("1. a\n2. b");
    assert_roundtrip("* a\n  * b\n* c");
    assert_roundtrip("1. one\n   1. nested");
    assert_roundtrip("* a\n  * b\n  1. c");
}

#[test]
fn test_roundtrip_blocks() {
    assert_roundtrip("> quote");
    assert_roundtrip("```js\nconst a = 1;\n```");
    assert_roundtrip("***");
    assert_roundtrip("Before\n\n***\n\nAfter");
}

#[test]
fn test_roundtrip_links_and_images() {
    assert_roundtrip("[site](https://example.com \"Title\")");
    assert_roundtrip("![alt](/a.png \"T\")");
    assert_roundtrip("Go to [**site**](https://example.com) now");
}

#[test]
fn test_loose_list_exports_tight() {
    assert_eq!(roundtrip("* a\n\n* b"), "* a\n* b\n");
}

/// Export a paragraph of `runs` and import the markdown again, returning the markdown and the
/// runs of the re-imported paragraph.
fn runs_roundtrip(runs: &[(String, TextFormat)]) -> (String, Vec<(String, TextFormat)>) {
    let mut tree = EditorTree::new();
    let root = tree.root();
    let paragraph = add(&mut tree, root, NodeData::Paragraph);
    for (text, format) in runs {
        add(&mut tree, paragraph, NodeData::formatted_text(text.clone(), *format));
    }

    let markdown = export(&tree);
    let imported = import(&markdown);
    let blocks = imported.children(imported.root());
    assert_eq!(blocks.len(), 1, "markdown: {markdown:?}");

    let result = imported
        .children(blocks[0])
        .iter()
        .map(|&key| (imported.text_content(key), imported.format(key)))
        .collect();
    (markdown, result)
}

fn assert_runs_roundtrip(runs: &[(&str, TextFormat)]) {
    let runs: Vec<(String, TextFormat)> = runs
        .iter()
        .map(|(text, format)| (text.to_string(), *format))
        .collect();
    let (markdown, result) = runs_roundtrip(&runs);
    assert_eq!(normalize(result), normalize(runs), "markdown: {markdown:?}");
}

#[test]
fn test_adjacent_runs_keep_their_formatting() {
    let b = TextFormat::BOLD;
    let i = TextFormat::ITALIC;
    let u = TextFormat::UNDERLINE;

    assert_runs_roundtrip(&[("a", b), ("b", b | i), ("c", i)]);
    assert_runs_roundtrip(&[("a", b | i), ("b", i), ("c", b | i)]);
    assert_runs_roundtrip(&[("a", i), ("b", b | i), ("c", b)]);
    assert_runs_roundtrip(&[("a", b | i), ("b", b)]);
    assert_runs_roundtrip(&[("a", i), ("b", b), ("c", i)]);
    assert_runs_roundtrip(&[("a", b | u), ("b", i | u)]);
    assert_runs_roundtrip(&[("a", TextFormat::NONE), ("b", i), ("c", TextFormat::NONE)]);
}

#[test]
fn test_adjacent_code_runs_stay_one_span() {
    let code = TextFormat::CODE;
    assert_runs_roundtrip(&[("a", code), ("b", code), ("c", TextFormat::BOLD)]);
}

#[test]
fn test_whitespace_inside_delimiters_survives() {
    assert_runs_roundtrip(&[("Hello", TextFormat::NONE), (" world ", TextFormat::BOLD)]);
}

fn format_strategy() -> impl Strategy<Value = TextFormat> {
    let b = TextFormat::BOLD;
    let i = TextFormat::ITALIC;
    let u = TextFormat::UNDERLINE;
    prop_oneof![
        Just(TextFormat::NONE),
        Just(b),
        Just(i),
        Just(u),
        Just(b | i),
        Just(b | u),
        Just(i | u),
        Just(b | i | u),
        Just(TextFormat::CODE),
    ]
}

/// Merge neighbouring runs that carry the same flags.
fn normalize(runs: Vec<(String, TextFormat)>) -> Vec<(String, TextFormat)> {
    let mut out: Vec<(String, TextFormat)> = Vec::new();
    for (text, format) in runs {
        match out.last_mut() {
            Some((prev, prev_format)) if *prev_format == format => prev.push_str(&text),
            _ => out.push((text, format)),
        }
    }
    out
}

proptest! {
    #[test]
    fn test_formatting_survives_roundtrip(
        words in prop::collection::vec(
            ("[a-z]{1,6}", format_strategy(), prop::bool::ANY),
            1..6,
        )
    ) {
        let mut runs = Vec::new();
        for (index, (word, format, spaced)) in words.into_iter().enumerate() {
            if index > 0 && spaced {
                runs.push((" ".to_string(), TextFormat::NONE));
            }
            runs.push((word, format));
        }

        let (markdown, result) = runs_roundtrip(&runs);
        prop_assert_eq!(normalize(result), normalize(runs), "markdown: {:?}", markdown);
    }
}
