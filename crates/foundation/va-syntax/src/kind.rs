//! Node kinds of the V concrete syntax tree

use std::fmt;

macro_rules! syntax_kinds {
    ($($(#[$doc:meta])* $variant:ident => $name:literal,)*) => {
        /// Grammar node kinds the front end knows by name.
        ///
        /// Names follow the tree-sitter-v grammar so a tree produced by that
        /// grammar converts one-to-one. Anything else (punctuation, keywords,
        /// grammar rules the front end does not model) is kept verbatim in
        /// [`SyntaxKind::Other`].
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        #[allow(missing_docs, reason = "Variants are named after the grammar rules they mirror")]
        pub enum SyntaxKind {
            $($(#[$doc])* $variant,)*
            /// Any other node or token kind, by grammar name
            Other(String),
        }

        impl SyntaxKind {
            /// Looks up a kind by its grammar name
            pub fn from_name(name: &str) -> Self {
                match name {
                    $($name => Self::$variant,)*
                    other => Self::Other(other.to_string()),
                }
            }

            /// Grammar name of this kind
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $name,)*
                    Self::Other(name) => name,
                }
            }
        }
    };
}

syntax_kinds! {
    /// Root of a file
    SourceFile => "source_file",
    ModuleClause => "module_clause",
    ImportList => "import_list",
    ImportDeclaration => "import_declaration",
    ImportSpec => "import_spec",
    ImportPath => "import_path",
    ImportName => "import_name",
    ImportAlias => "import_alias",
    StructDeclaration => "struct_declaration",
    /// Run of fields sharing one visibility scope
    StructFieldsGroup => "struct_fields_group",
    /// `pub mut:` style scope label
    StructFieldScope => "struct_field_scope",
    FieldDeclaration => "field_declaration",
    DefaultValue => "default_value",
    FunctionDeclaration => "function_declaration",
    ParameterList => "parameter_list",
    ParameterDeclaration => "parameter_declaration",
    Block => "block",
    VarDeclaration => "var_declaration",
    ExpressionList => "expression_list",
    SimpleStatement => "simple_statement",
    ReturnStatement => "return_statement",
    AssertStatement => "assert_statement",
    AssignmentStatement => "assignment_statement",
    IfExpression => "if_expression",
    CallExpression => "call_expression",
    ArgumentList => "argument_list",
    Argument => "argument",
    TypeInitializer => "type_initializer",
    LiteralValue => "literal_value",
    ElementList => "element_list",
    KeyedElement => "keyed_element",
    FieldName => "field_name",
    ShortElementList => "short_element_list",
    ReferenceExpression => "reference_expression",
    SelectorExpression => "selector_expression",
    UnaryExpression => "unary_expression",
    BinaryExpression => "binary_expression",
    ParenthesizedExpression => "parenthesized_expression",
    ArrayCreation => "array_creation",
    Identifier => "identifier",
    /// Wrapper whose first child is the concrete literal
    Literal => "literal",
    InterpretedStringLiteral => "interpreted_string_literal",
    IntLiteral => "int_literal",
    FloatLiteral => "float_literal",
    True => "true",
    False => "false",
    None => "none",
    /// Wrapper around a type in type position
    PlainType => "plain_type",
    BuiltinType => "builtin_type",
    TypeReferenceExpression => "type_reference_expression",
    ArrayType => "array_type",
    OptionType => "option_type",
    PointerType => "pointer_type",
    /// Input the parser could not make sense of
    Error => "ERROR",
}

impl fmt::Display for SyntaxKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for name in ["source_file", "keyed_element", "ERROR", "builtin_type"] {
            assert_eq!(SyntaxKind::from_name(name).as_str(), name);
        }
    }

    #[test]
    fn test_unknown_kind_is_preserved() {
        let kind = SyntaxKind::from_name("{");
        assert_eq!(kind, SyntaxKind::Other("{".to_string()));
        assert_eq!(kind.to_string(), "{");
    }
}
