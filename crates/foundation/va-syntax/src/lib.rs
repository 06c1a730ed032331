//! Concrete syntax trees for the V front end
//!
//! This crate is the boundary between a parser and the semantic passes.
//! Whatever produced the tree (the built-in V adapter or a tree-sitter
//! grammar), the passes only see [`SyntaxTree`] and its [`SyntaxNodeRef`]
//! queries: kind, children by index, next sibling, named flag, children by
//! field name, byte and line/column positions, and source text.

mod conversion;
mod kind;
mod tree;

pub use conversion::TreeSitterLanguage;
pub use kind::SyntaxKind;
pub use tree::{Child, SyntaxNodeData, SyntaxNodeId, SyntaxNodeRef, SyntaxTree, SyntaxTreeBuilder};

use anyhow::Result;

/// Trait for language-specific parsers
pub trait Language: Send + Sync + 'static {
    /// Name of the language
    fn name(&self) -> &'static str;

    /// File extensions this language handles
    fn extensions(&self) -> &[&'static str];

    /// Parse source code to a concrete syntax tree
    ///
    /// # Errors
    ///
    /// Returns an error if the parser could not be set up or gave up
    /// entirely; malformed input is reported inside the tree as error nodes.
    fn parse(&self, source: &str) -> Result<SyntaxTree>;
}
