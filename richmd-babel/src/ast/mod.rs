//! Generic markdown abstract syntax tree.
//!
//! An mdast-shaped, owned tree that sits between the markdown parser/serializer and the editor
//! tree. Formatting is expressed by nesting wrapper nodes (emphasis, strong, inline markup)
//! around text leaves, as markdown itself does.

pub mod nodes;

pub use nodes::*;
