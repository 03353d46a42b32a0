//! Traversal tests
//!
//! Exercise the import and export traversals directly, below the markdown entry points: hand-built
//! ASTs, the append/merge primitive, persisted editor state and registries with custom visitors.

mod custom_visitors;
mod scope;
