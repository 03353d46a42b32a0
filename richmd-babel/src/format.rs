//! Formatting bitmask algebra
//!
//! The editor tree stores inline formatting as flags on each text run, while the markdown AST
//! nests wrapper nodes (emphasis, strong, `<u>`) around text leaves. This module owns both sides
//! of that mapping:
//!
//! - [`TextFormat`]: the flag set carried by editor text nodes
//! - [`Wrapper`]: the AST wrapper kinds and their flag <-> wrapper table
//! - [`FormatTransition`]: which wrappers a run continues from its predecessor and which it opens
//!
//! # Wrapper Order
//!
//! Wrappers are always nested in [`WRAPPER_ORDER`] (italic, then bold, then underline). Two
//! adjacent runs that share a flag therefore produce same-kind wrappers at the same depth, which
//! the export traversal's adjacency merge collapses into one wrapper. Changing the order changes
//! the markdown produced for every mixed-format paragraph.

use crate::ast::Node;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Set of inline formatting flags carried by an editor text node.
///
/// Serialized as the bare integer the editor state stores (`"format": 3`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TextFormat(u32);

bitflags! {
    impl TextFormat: u32 {
        const BOLD = 1;
        const ITALIC = 1 << 1;
        const UNDERLINE = 1 << 3;
        /// Inline code. Presentationally exclusive: a run carrying it exports as inline code
        /// and its other flags are ignored.
        const CODE = 1 << 4;
    }
}

impl TextFormat {
    pub const NONE: TextFormat = TextFormat::empty();

    pub const fn is_code(self) -> bool {
        self.intersects(Self::CODE)
    }

    /// Wrappers required by this format, in [`WRAPPER_ORDER`].
    pub fn wrappers(self) -> impl Iterator<Item = Wrapper> {
        WRAPPER_ORDER
            .into_iter()
            .filter(move |wrapper| self.contains(wrapper.flag()))
    }
}

impl fmt::Display for TextFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self
            .iter_names()
            .map(|(name, _)| name.to_ascii_lowercase())
            .collect();

        if names.is_empty() {
            write!(f, "plain")
        } else {
            write!(f, "{}", names.join("+"))
        }
    }
}

/// AST wrapper kinds that express a formatting flag by nesting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Wrapper {
    Emphasis,
    Strong,
    Underline,
}

/// Nesting order of wrappers, outermost first.
pub const WRAPPER_ORDER: [Wrapper; 3] = [Wrapper::Emphasis, Wrapper::Strong, Wrapper::Underline];

/// Tag name of the inline markup element that renders underline.
pub const UNDERLINE_TAG: &str = "u";

impl Wrapper {
    pub const fn flag(self) -> TextFormat {
        match self {
            Wrapper::Emphasis => TextFormat::ITALIC,
            Wrapper::Strong => TextFormat::BOLD,
            Wrapper::Underline => TextFormat::UNDERLINE,
        }
    }

    /// The wrapper whose flag is exactly `flag`.
    pub fn for_flag(flag: TextFormat) -> Option<Wrapper> {
        WRAPPER_ORDER
            .into_iter()
            .find(|wrapper| wrapper.flag() == flag)
    }

    /// Recognizes a wrapper node in the AST.
    pub fn of_node(node: &Node) -> Option<Wrapper> {
        match node {
            Node::Emphasis(_) => Some(Wrapper::Emphasis),
            Node::Strong(_) => Some(Wrapper::Strong),
            Node::InlineMarkup(markup) if markup.name == UNDERLINE_TAG => {
                Some(Wrapper::Underline)
            }
            _ => None,
        }
    }

    /// A fresh wrapper node with no children.
    pub fn empty_node(self) -> Node {
        match self {
            Wrapper::Emphasis => Node::emphasis(vec![]),
            Wrapper::Strong => Node::strong(vec![]),
            Wrapper::Underline => Node::underline(vec![]),
        }
    }
}

/// How a text run relates to the run before it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormatTransition {
    /// The run is inline code and gets no wrappers at all.
    pub code: bool,
    /// Wrappers open in both runs, in [`WRAPPER_ORDER`].
    pub continued: Vec<Wrapper>,
    /// Wrappers this run needs that the previous run did not have, in [`WRAPPER_ORDER`].
    pub opened: Vec<Wrapper>,
}

impl FormatTransition {
    pub fn between(prev: TextFormat, next: TextFormat) -> Self {
        if next.is_code() {
            return FormatTransition {
                code: true,
                ..Default::default()
            };
        }

        let shared = prev.intersection(next);
        FormatTransition {
            code: false,
            continued: shared.wrappers().collect(),
            opened: next.difference(prev).wrappers().collect(),
        }
    }

    /// Wrappers to open fresh once `reentered` are in place: every opened wrapper plus the
    /// continued ones that could not be re-entered, in [`WRAPPER_ORDER`].
    pub fn fresh(&self, reentered: &[Wrapper]) -> Vec<Wrapper> {
        WRAPPER_ORDER
            .into_iter()
            .filter(|wrapper| {
                self.opened.contains(wrapper)
                    || (self.continued.contains(wrapper) && !reentered.contains(wrapper))
            })
            .collect()
    }
}
