//! Markdown interoperability for the rich-text editor tree
//!
//!     This crate converts between the editor tree (the live document a rich-text editing surface
//!     manipulates) and markdown text, in both directions, so that a document can be loaded from
//!     markdown, edited, and written back out as markdown that matches the input modulo
//!     normalization.
//!
//!     TLDR: For visitor authors:
//!         - Babel never parses or serializes markdown itself during a traversal: text goes through
//!           the markdown format (./formats/markdown), traversals only see the generic AST.
//!         - A new node kind is a new Visitor registered in the VisitorRegistry, never a change
//!           to the traversals.
//!         - No matching visitor is a hard error. Silently dropping content is never acceptable.
//!
//! Architecture
//!
//!     There are two trees with incompatible rules. The markdown AST (./ast) nests formatting as
//!     wrapper nodes (emphasis, strong, `<u>`) around text. The editor tree (./editor) keeps
//!     formatting as bit flags on text runs (./format.rs) and does not allow a paragraph inside a
//!     quote or list item. The two traversals in ./common bridge them:
//!         - import (AST → editor): one pre-order walk with per-call side tables that record
//!           where each AST node's children attach and which formatting they inherit.
//!         - export (editor → AST): one pre-order walk whose append primitive merges compatible
//!           adjacent siblings, so per-run wrappers collapse back into natural markdown.
//!
//!     This is a pure lib, that is, it powers richmd-cli but is shell agnostic: no code should
//!     suppose a shell environment, be it std print, env vars etc.
//!
//!     The file structure :
//!     .
//!     ├── error.rs                # ConvertError
//!     ├── format.rs               # TextFormat flags, Wrapper table, FormatTransition
//!     ├── registry.rs             # Visitor trait and VisitorRegistry
//!     ├── ast                     # Generic markdown AST
//!     ├── editor                  # Arena editor tree and its JSON state
//!     ├── common                  # Import and export traversals
//!     ├── visitors                # Built-in visitors
//!     ├── formats
//!     │   └── markdown
//!     │       ├── parser.rs       # comrak → AST
//!     │       ├── serializer.rs   # AST → markdown text
//!     │       └── mod.rs
//!     └── lib.rs
//!
//! Testing
//!     tests
//!     ├── lib.rs
//!     ├── markdown
//!     │   ├── import.rs
//!     │   ├── export.rs
//!     │   └── roundtrip.rs
//!     └── traversal
//!         ├── scope.rs            # import/export primitives, persisted state
//!         └── custom_visitors.rs  # registries built by hand
//!
//!     Note that rust does not by default discover tests in subdirectories, so we need to include these
//!     in the mod.
//!
//! Core Algorithms
//!
//!     The most delicate part is re-nesting flags as wrappers on export. Each text run compares
//!     its flags with the previous run: shared wrappers are re-entered (the merge primitive folds
//!     the re-entered wrapper into the one the previous run left open), the rest are opened in
//!     the fixed order italic → bold → underline. See ./format.rs and ./visitors/inline.rs.

pub mod ast;
pub mod common;
pub mod editor;
pub mod error;
pub mod format;
pub mod formats;
pub mod registry;
pub mod visitors;

pub use common::export::{export_ast, ExportContext};
pub use common::import::{import_ast, ImportScope};
pub use editor::{EditorTree, NodeData, NodeKey};
pub use error::ConvertError;
pub use format::TextFormat;
pub use formats::markdown::{ListItemIndent, SerializeOptions};
use formats::MarkdownFormat;
pub use registry::{Visitor, VisitorRegistry};

/// Parse `markdown` and import it under `root`.
///
/// The parsed content is appended after whatever `root` already holds.
pub fn import_markdown(
    tree: &mut EditorTree,
    root: NodeKey,
    markdown: &str,
    registry: &VisitorRegistry,
) -> Result<(), ConvertError> {
    tracing::debug!(bytes = markdown.len(), "importing markdown");
    let ast = MarkdownFormat::default().parse(markdown)?;
    import_ast(tree, root, &ast, registry)
}

/// Export the subtree at `root` as markdown with the default serializer options.
pub fn export_markdown(
    tree: &EditorTree,
    root: NodeKey,
    registry: &VisitorRegistry,
) -> Result<String, ConvertError> {
    export_markdown_with_options(tree, root, registry, &SerializeOptions::default())
}

/// Export the subtree at `root` as markdown.
pub fn export_markdown_with_options(
    tree: &EditorTree,
    root: NodeKey,
    registry: &VisitorRegistry,
    options: &SerializeOptions,
) -> Result<String, ConvertError> {
    let ast = export_ast(tree, root, registry)?;
    let markdown = MarkdownFormat::new(options.clone()).serialize(&ast);
    tracing::debug!(bytes = markdown.len(), "exported markdown");
    Ok(markdown)
}
