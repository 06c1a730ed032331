//! V language adapter
//!
//! Provides a syntax tree for V sources shaped like the tree-sitter-v
//! grammar, produced by a logos lexer and an error-tolerant
//! recursive-descent parser.

pub mod lexer;
mod parser;

use anyhow::Result;
use va_syntax::{Language, SyntaxTree};

/// V language implementation
pub struct VLanguage;

impl VLanguage {
    /// Creates a new V language adapter
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for VLanguage {
    fn default() -> Self {
        Self::new()
    }
}

impl Language for VLanguage {
    fn name(&self) -> &'static str {
        "v"
    }

    fn extensions(&self) -> &[&'static str] {
        &["v", "vsh"]
    }

    fn parse(&self, source: &str) -> Result<SyntaxTree> {
        Ok(parse(source))
    }
}

/// Parses V source into a syntax tree; never fails, malformed input shows
/// up as `ERROR` and missing nodes.
#[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
pub fn parse(source: &str) -> SyntaxTree {
    let tree = parser::parse(source);
    tracing::trace!(nodes = tree.len(), "parsed V source");
    tree
}

#[cfg(test)]
mod tests {
    use super::*;
    use expect_test::expect;
    use va_span::Point;
    use va_syntax::SyntaxKind;

    const ROUND_TRIP: &str = r#"struct Foo {
	name string
}

fn take_int(i int) int {
	return 100
}

f := Foo{
	name: "foo"
	blabla: 100
}
"#;

    #[test]
    fn test_language_metadata() {
        let language = VLanguage::new();
        assert_eq!(language.name(), "v");
        assert_eq!(language.extensions(), &["v", "vsh"]);
    }

    #[test]
    fn test_round_trip_source() {
        let tree = VLanguage::new().parse(ROUND_TRIP).unwrap();

        assert!(!tree.root().has_error());
        expect![[r"(source_file (struct_declaration name: (identifier) (struct_fields_group (field_declaration name: (identifier) type: (plain_type (builtin_type))))) (function_declaration name: (identifier) parameters: (parameter_list (parameter_declaration name: (identifier) type: (plain_type (builtin_type)))) result: (plain_type (builtin_type)) body: (block (return_statement (expression_list (literal (int_literal)))))) (var_declaration var_list: (expression_list (identifier)) expression_list: (expression_list (type_initializer type: (plain_type (type_reference_expression (identifier))) body: (literal_value (element_list (keyed_element key: (field_name (reference_expression (identifier))) value: (literal (interpreted_string_literal))) (keyed_element key: (field_name (reference_expression (identifier))) value: (literal (int_literal)))))))))"]]
        .assert_eq(&tree.to_sexp());
    }

    #[test]
    fn test_node_text_and_positions() {
        let tree = parse(ROUND_TRIP);
        let function = tree.root().child(1).unwrap();

        assert_eq!(function.kind(), &SyntaxKind::FunctionDeclaration);
        let name = function.child_by_field_name("name").unwrap();
        assert_eq!(name.text(), "take_int");
        assert_eq!(name.start_point(), Point::new(4, 3));
    }
}
