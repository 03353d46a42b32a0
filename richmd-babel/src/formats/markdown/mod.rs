//! Markdown format implementation
//!
//! This module implements both directions between CommonMark text and the generic markdown AST.
//!
//! # Library Choice
//!
//! Parsing uses the `comrak` crate: CommonMark compliant, robust and well-maintained. Serializing
//! uses our own writer instead of comrak's formatter, because the output has to match the
//! editor's conventions exactly (`*` bullets, `***` rules, underline as `<u>` markup) and comrak
//! escapes more punctuation than markdown needs.
//!
//! # Element Mapping Table
//!
//! | Markdown               | AST node                   | Import Notes                         | Export Notes                      |
//! |------------------------|----------------------------|--------------------------------------|-----------------------------------|
//! | Paragraph              | paragraph                  | Direct                               | Lines joined by `\n`              |
//! | Soft / hard break      | text `"\n"`                | Merged into neighbouring text        | Plain newline                     |
//! | Heading (ATX, setext)  | heading (depth)            | Both styles                          | ATX only                          |
//! | `*em*` / `_em_`        | emphasis                   | Both markers                         | Configured marker (`*`)           |
//! | `**strong**`           | strong                     | Both markers                         | Configured marker (`**`)          |
//! | `<u>..</u>`            | inlineMarkup `u`           | Paired per sibling level             | Tag pair                          |
//! | `` `code` ``           | inlineCode                 | Direct                               | Fence longer than inner runs      |
//! | Fenced / indented code | code (lang, meta)          | Info string split on first space     | Fenced                            |
//! | `[text](url "t")`      | link                       | Empty title dropped                  | `<url>` when not bare-safe        |
//! | `![alt](url "t")`      | image                      | Alt flattened to text                | Alt escaped                       |
//! | `-`, `*`, `1.` lists   | list / listItem            | Tightness kept as `spread`           | Tight unless `spread`             |
//! | `>` quote              | blockquote                 | Direct                               | `> ` prefixed lines               |
//! | `***`, `---`           | thematicBreak              | Direct                               | Configured rule (`***`)           |
//! | Other HTML             | html                       | Raw                                  | Raw                               |
//!
//! # Lossy Conversions
//!
//! - Setext headings come back as ATX headings
//! - `_` emphasis and `-`/`+` bullets come back with the configured markers
//! - Hard breaks (`\` or two trailing spaces) come back as soft breaks
//! - Reference-style links and images come back inline
//! - Formatting that starts or ends inside a word is written with a character reference next
//!   to the delimiter, e.g. `&#x61;*b*` for `a*b*`

pub mod parser;
pub mod serializer;

use crate::ast::Node;
use crate::error::ConvertError;
pub use serializer::{ListItemIndent, SerializeOptions};

/// Format implementation for Markdown
#[derive(Debug, Clone, Default)]
pub struct MarkdownFormat {
    options: SerializeOptions,
}

impl MarkdownFormat {
    pub fn new(options: SerializeOptions) -> Self {
        MarkdownFormat { options }
    }

    pub fn parse(&self, source: &str) -> Result<Node, ConvertError> {
        parser::parse_from_markdown(source)
    }

    pub fn serialize(&self, node: &Node) -> String {
        serializer::serialize_to_markdown(node, &self.options)
    }
}
