//! Contains the traversals that map between the markdown AST and the editor tree.

pub mod export;
pub mod import;
