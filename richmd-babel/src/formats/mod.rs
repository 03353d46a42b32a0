//! Format implementations
//!
//! This module contains the text formats that convert to and from the generic markdown AST.

pub mod markdown;

pub use markdown::MarkdownFormat;
