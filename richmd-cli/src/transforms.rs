//! CLI-specific transforms
//!
//! This module defines the views `richmd inspect` can print for a markdown file.
//!
//! ## Transform Pipeline
//!
//! Import runs in two stages, and each stage has a view:
//!
//! 1. **Parsing** - Markdown text → markdown AST
//!    - `ast`: the AST as JSON, formatting still nested as wrapper nodes
//!
//! 2. **Import** - markdown AST → editor tree
//!    - `editor`: the persisted editor state as JSON, formatting as flags on text runs
//!
//! Example: `richmd inspect notes.md ast`

use richmd_babel::formats::MarkdownFormat;
use richmd_babel::{import_markdown, EditorTree, VisitorRegistry};

/// All available CLI transforms
pub const AVAILABLE_TRANSFORMS: &[&str] = &["ast", "editor"];

/// Transform used when none is named on the command line
pub const DEFAULT_TRANSFORM: &str = "editor";

/// Execute a named transform on markdown source.
///
/// Output is pretty-printed JSON terminated by a newline.
pub fn execute_transform(source: &str, transform_name: &str) -> Result<String, String> {
    let json = match transform_name {
        "ast" => {
            let ast = MarkdownFormat::default()
                .parse(source)
                .map_err(|e| e.to_string())?;
            serde_json::to_string_pretty(&ast)
        }
        "editor" => {
            let mut tree = EditorTree::new();
            let root = tree.root();
            import_markdown(&mut tree, root, source, &VisitorRegistry::default())
                .map_err(|e| e.to_string())?;
            let state = tree.to_serialized(root).map_err(|e| e.to_string())?;
            serde_json::to_string_pretty(&state)
        }
        other => return Err(format!("Unknown transform: {other}")),
    };

    json.map(|text| text + "\n").map_err(|e| e.to_string())
}
