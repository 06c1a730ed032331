//! Conversion from tree-sitter trees

use crate::{Child, Language, SyntaxKind, SyntaxNodeId, SyntaxTree, SyntaxTreeBuilder};
use anyhow::Result;
use tree_sitter::{Parser, TreeCursor};
use va_span::Span;

/// Allocates the node under `cursor` and, before it, its whole subtree
pub fn convert(cursor: &mut TreeCursor<'_>, builder: &mut SyntaxTreeBuilder) -> SyntaxNodeId {
    let node = cursor.node();

    let mut children = Vec::new();
    if cursor.goto_first_child() {
        loop {
            let field = cursor.field_name();
            let id = convert(cursor, builder);
            children.push(Child { field, id });
            if !cursor.goto_next_sibling() {
                break;
            }
        }
        cursor.goto_parent();
    }

    let kind = if node.is_error() {
        SyntaxKind::Error
    } else {
        SyntaxKind::from_name(node.kind())
    };
    let span = Span::new(node.start_byte() as u32, node.end_byte() as u32);

    if node.is_missing() {
        builder.missing(kind, node.is_named(), span.start)
    } else {
        builder.node_with_span(kind, node.is_named(), span, children)
    }
}

/// Adapter for any tree-sitter grammar
pub struct TreeSitterLanguage {
    name: &'static str,
    extensions: &'static [&'static str],
    language: tree_sitter::Language,
}

impl TreeSitterLanguage {
    /// Wraps a linked grammar under a display name
    pub fn new(
        name: &'static str,
        extensions: &'static [&'static str],
        language: tree_sitter::Language,
    ) -> Self {
        Self {
            name,
            extensions,
            language,
        }
    }
}

impl Language for TreeSitterLanguage {
    fn name(&self) -> &'static str {
        self.name
    }

    fn extensions(&self) -> &[&'static str] {
        self.extensions
    }

    fn parse(&self, source: &str) -> Result<SyntaxTree> {
        let mut parser = Parser::new();
        parser.set_language(&self.language)?;

        let tree = parser
            .parse(source, None)
            .ok_or_else(|| anyhow::anyhow!("tree-sitter parse failed"))?;

        Ok(SyntaxTree::from_tree_sitter(&tree, source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use va_span::Point;

    fn rust_language() -> TreeSitterLanguage {
        TreeSitterLanguage::new("rust", &["rs"], tree_sitter_rust::LANGUAGE.into())
    }

    #[test]
    fn test_converted_tree_matches_tree_sitter() {
        let source = "fn main() {\n    let x = 1;\n}\n";
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_rust::LANGUAGE.into())
            .unwrap();
        let ts_tree = parser.parse(source, None).unwrap();

        let tree = SyntaxTree::from_tree_sitter(&ts_tree, source);

        assert_eq!(tree.to_sexp(), ts_tree.root_node().to_sexp());
    }

    #[test]
    fn test_fields_spans_and_points() {
        let tree = rust_language().parse("fn main() {}\nfn other() {}").unwrap();
        let root = tree.root();

        assert_eq!(root.kind(), &SyntaxKind::SourceFile);
        assert_eq!(root.child_count(), 2);

        let second = root.child(1).unwrap();
        let name = second.child_by_field_name("name").unwrap();
        assert_eq!(name.kind(), &SyntaxKind::Identifier);
        assert_eq!(name.text(), "other");
        assert_eq!(name.start_point(), Point::new(1, 3));
        assert_eq!(root.child(0).unwrap().next_sibling(), Some(second));
        assert_eq!(name.parent(), Some(second));
    }

    #[test]
    fn test_error_nodes_are_marked() {
        let tree = rust_language().parse("fn main( {").unwrap();
        assert!(tree.root().has_error());
    }
}
