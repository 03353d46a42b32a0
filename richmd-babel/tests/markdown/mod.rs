//! Markdown format tests
//!
//! Tests for bidirectional Markdown ↔ editor tree conversion through the public entry points.

mod export;
mod import;
mod roundtrip;

use richmd_babel::editor::NodeData;
use richmd_babel::{export_markdown, import_markdown, EditorTree, NodeKey, VisitorRegistry};
use std::fmt::Write;

pub(crate) fn import(markdown: &str) -> EditorTree {
    let mut tree = EditorTree::new();
    let root = tree.root();
    import_markdown(&mut tree, root, markdown, &VisitorRegistry::default())
        .expect("markdown should import");
    tree
}

pub(crate) fn export(tree: &EditorTree) -> String {
    export_markdown(tree, tree.root(), &VisitorRegistry::default()).expect("tree should export")
}

pub(crate) fn roundtrip(markdown: &str) -> String {
    export(&import(markdown))
}

/// Indented one-line-per-node rendering of an editor tree, for snapshots.
pub(crate) fn outline(tree: &EditorTree) -> String {
    let mut out = String::new();
    write_outline(tree, tree.root(), 0, &mut out);
    out.trim_end().to_string()
}

fn write_outline(tree: &EditorTree, key: NodeKey, depth: usize, out: &mut String) {
    let label = match tree.data(key).expect("live node") {
        NodeData::Text { text, format } if format.is_empty() => format!("text {text:?}"),
        NodeData::Text { text, format } => format!("text {text:?} [{format}]"),
        NodeData::Heading { tag } => format!("heading {tag}"),
        NodeData::List { list_type, start } => format!("list {list_type:?} {start}"),
        NodeData::Link { url, .. } => format!("link {url}"),
        NodeData::Code { language } => format!("code {}", language.as_deref().unwrap_or("-")),
        NodeData::Image { src, alt_text, .. } => format!("image {src} {alt_text:?}"),
        other => other.kind().to_string(),
    };
    let _ = writeln!(out, "{}{}", "  ".repeat(depth), label);
    for &child in tree.children(key) {
        write_outline(tree, child, depth + 1, out);
    }
}

/// Append `data` to `parent` and return the new key.
pub(crate) fn add(tree: &mut EditorTree, parent: NodeKey, data: NodeData) -> NodeKey {
    let key = tree.create(data);
    tree.append(parent, key).expect("append");
    key
}
