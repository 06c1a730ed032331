//! IR node variants
//!
//! Every record carries its identity and the CST node it was lowered from.
//! Child slots that may be absent hold [`Node::Null`] rather than an
//! `Option`, so visitors observe the absence.

#![allow(
    missing_docs,
    reason = "Records mirror the grammar one-to-one; fields carry the grammar's names"
)]

use crate::NodeId;
use crate::visitor::{Accept as _, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use va_syntax::SyntaxNodeId;

macro_rules! ir_nodes {
    ($($(#[$meta:meta])* $variant:ident => $name:literal,)*) => {
        /// Any IR node; the closed set of variants plus the null sentinel
        #[derive(Debug, Clone, PartialEq, Eq, Default)]
        pub enum Node {
            $($(#[$meta])* $variant(Box<$variant>),)*
            /// Absent or unrecognized construct
            #[default]
            Null,
        }

        /// Borrowed view of a [`Node`] or of any record inside one
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum NodeRef<'ast> {
            $($(#[$meta])* $variant(&'ast $variant),)*
            /// Absent or unrecognized construct
            Null,
        }

        /// Variant tag of a node
        #[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
        pub enum NodeKind {
            $($(#[$meta])* $variant,)*
            /// Absent or unrecognized construct
            Null,
        }

        impl NodeKind {
            /// Snake-case name used in dumps
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)*
                    Self::Null => "null",
                }
            }
        }

        impl Node {
            /// Borrowed view of this node
            pub fn as_node_ref(&self) -> NodeRef<'_> {
                match self {
                    $(Self::$variant(node) => NodeRef::$variant(node),)*
                    Self::Null => NodeRef::Null,
                }
            }

            /// Identity; [`NodeId::NULL`] for the null node
            pub fn id(&self) -> NodeId {
                self.as_node_ref().id()
            }

            /// CST node this was lowered from
            pub fn origin(&self) -> Option<SyntaxNodeId> {
                self.as_node_ref().origin()
            }

            /// Variant tag
            pub fn kind(&self) -> NodeKind {
                self.as_node_ref().kind()
            }

            /// Whether this is the null sentinel
            pub fn is_null(&self) -> bool {
                matches!(self, Self::Null)
            }
        }

        impl<'ast> NodeRef<'ast> {
            /// Identity; [`NodeId::NULL`] for the null node
            pub fn id(self) -> NodeId {
                match self {
                    $(Self::$variant(node) => node.id,)*
                    Self::Null => NodeId::NULL,
                }
            }

            /// CST node this was lowered from; the null node has none
            pub fn origin(self) -> Option<SyntaxNodeId> {
                match self {
                    $(Self::$variant(node) => Some(node.origin),)*
                    Self::Null => None,
                }
            }

            /// Variant tag
            pub fn kind(self) -> NodeKind {
                match self {
                    $(Self::$variant(_) => NodeKind::$variant,)*
                    Self::Null => NodeKind::Null,
                }
            }

            /// Traverses the referenced node and its children
            pub fn accept<V>(self, visitor: &mut V) -> bool
            where
                V: Visitor<'ast> + ?Sized,
            {
                match self {
                    $(Self::$variant(node) => node.accept(visitor),)*
                    Self::Null => visitor.visit(Self::Null),
                }
            }
        }

        $(
            impl From<$variant> for Node {
                fn from(node: $variant) -> Self {
                    Self::$variant(Box::new(node))
                }
            }

            impl<'ast> From<&'ast $variant> for NodeRef<'ast> {
                fn from(node: &'ast $variant) -> Self {
                    Self::$variant(node)
                }
            }
        )*
    };
}

ir_nodes! {
    File => "file",
    ModuleClause => "module_clause",
    ImportList => "import_list",
    ImportDeclaration => "import_declaration",
    ImportSpec => "import_spec",
    ImportPath => "import_path",
    ImportAlias => "import_alias",
    StructDeclaration => "struct_declaration",
    StructFieldsGroup => "struct_fields_group",
    FieldDeclaration => "field_declaration",
    DefaultValue => "default_value",
    ReferenceExpression => "reference_expression",
    TypeInitializer => "type_initializer",
    LiteralValue => "literal_value",
    ElementList => "element_list",
    ShortElementList => "short_element_list",
    Element => "element",
    FieldName => "field_name",
    ExpressionList => "expression_list",
    IfExpression => "if_expression",
    VarDeclaration => "var_declaration",
    Identifier => "identifier",
    FunctionDeclaration => "function_declaration",
    ParameterList => "parameter_list",
    ParameterDeclaration => "parameter_declaration",
    Block => "block",
    SimpleStatement => "simple_statement",
    ReturnStatement => "return_statement",
    CallExpr => "call_expr",
    ArgumentList => "argument_list",
    Argument => "argument",
    BinaryExpression => "binary_expression",
    TypeName => "type_name",
    BuiltinType => "builtin_type",
    SimpleType => "simple_type",
    StringLiteral => "string_literal",
    IntegerLiteral => "integer_literal",
    FloatLiteral => "float_literal",
    BooleanLiteral => "boolean_literal",
    NoneLiteral => "none_literal",
}

impl fmt::Display for NodeKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Root of a lowered source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    pub id: NodeId,
    pub origin: SyntaxNodeId,
    /// `ModuleClause` or `Null`
    pub module_clause: Node,
    pub imports: ImportList,
    /// Top-level statements and declarations in source order
    pub statements: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleClause {
    pub id: NodeId,
    pub origin: SyntaxNodeId,
    pub name: Identifier,
}

/// Imports of a file; empty when the file has none
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportList {
    pub id: NodeId,
    pub origin: SyntaxNodeId,
    pub declarations: Vec<ImportDeclaration>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDeclaration {
    pub id: NodeId,
    pub origin: SyntaxNodeId,
    pub spec: ImportSpec,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    pub id: NodeId,
    pub origin: SyntaxNodeId,
    pub path: ImportPath,
    /// `ImportAlias` or `Null`
    pub alias: Node,
}

/// Dotted module path, e.g. `net.http`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportPath {
    pub id: NodeId,
    pub origin: SyntaxNodeId,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportAlias {
    pub id: NodeId,
    pub origin: SyntaxNodeId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructDeclaration {
    pub id: NodeId,
    pub origin: SyntaxNodeId,
    pub name: Identifier,
    pub groups: Vec<StructFieldsGroup>,
    pub is_public: bool,
}

impl StructDeclaration {
    /// Fields of every group, in declaration order
    pub fn fields(&self) -> impl Iterator<Item = &FieldDeclaration> {
        self.groups.iter().flat_map(|group| group.fields.iter())
    }

    pub fn field(&self, name: &str) -> Option<&FieldDeclaration> {
        self.fields().find(|field| field.name.name == name)
    }
}

/// Fields sharing one `pub:` / `mut:` / `pub mut:` scope label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructFieldsGroup {
    pub id: NodeId,
    pub origin: SyntaxNodeId,
    pub is_public: bool,
    pub is_mutable: bool,
    pub fields: Vec<FieldDeclaration>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDeclaration {
    pub id: NodeId,
    pub origin: SyntaxNodeId,
    pub name: Identifier,
    /// `TypeName` or `Null`
    pub ty: Node,
    /// `DefaultValue` or `Null`
    pub default_value: Node,
}

impl FieldDeclaration {
    pub fn type_name(&self) -> Option<&str> {
        readable_type_name(&self.ty)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultValue {
    pub id: NodeId,
    pub origin: SyntaxNodeId,
    pub value: Node,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceExpression {
    pub id: NodeId,
    pub origin: SyntaxNodeId,
    pub identifier: Identifier,
}

/// `Type{ ... }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeInitializer {
    pub id: NodeId,
    pub origin: SyntaxNodeId,
    /// `TypeName` or `Null`
    pub ty: Node,
    pub value: LiteralValue,
}

impl TypeInitializer {
    pub fn type_name(&self) -> Option<&str> {
        readable_type_name(&self.ty)
    }
}

/// Body of a type initializer. At most one of the two lists has entries;
/// the other is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralValue {
    pub id: NodeId,
    pub origin: SyntaxNodeId,
    pub elements: ElementList,
    pub short_elements: ShortElementList,
}

/// Keyed elements, `name: value`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementList {
    pub id: NodeId,
    pub origin: SyntaxNodeId,
    pub elements: Vec<Element>,
}

/// Positional elements
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortElementList {
    pub id: NodeId,
    pub origin: SyntaxNodeId,
    pub elements: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub id: NodeId,
    pub origin: SyntaxNodeId,
    pub key: FieldName,
    pub value: Node,
}

impl Element {
    pub fn key_name(&self) -> &str {
        &self.key.reference.identifier.name
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldName {
    pub id: NodeId,
    pub origin: SyntaxNodeId,
    pub reference: ReferenceExpression,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpressionList {
    pub id: NodeId,
    pub origin: SyntaxNodeId,
    pub expressions: Vec<Node>,
}

/// `if` with an optional `else` chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfExpression {
    pub id: NodeId,
    pub origin: SyntaxNodeId,
    /// `Null` when the head is a guard
    pub condition: Node,
    /// `VarDeclaration` or `Null`
    pub guard: Node,
    pub block: Block,
    /// `IfExpression`, `Block` or `Null`
    pub else_branch: Node,
}

/// `a, b := x, y`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarDeclaration {
    pub id: NodeId,
    pub origin: SyntaxNodeId,
    pub var_list: ExpressionList,
    pub expression_list: ExpressionList,
}

impl VarDeclaration {
    /// Identifiers introduced on the left-hand side
    pub fn declared_names(&self) -> impl Iterator<Item = &Identifier> {
        self.var_list
            .expressions
            .iter()
            .filter_map(|expression| match expression {
                Node::Identifier(identifier) => Some(&**identifier),
                _ => None,
            })
    }

    /// First right-hand expression; only this one is typed
    pub fn first_value(&self) -> Option<&Node> {
        self.expression_list.expressions.first()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    pub id: NodeId,
    pub origin: SyntaxNodeId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDeclaration {
    pub id: NodeId,
    pub origin: SyntaxNodeId,
    pub name: Identifier,
    pub parameters: ParameterList,
    /// `TypeName` or `Null`
    pub result: Node,
    pub body: Block,
    pub is_public: bool,
}

impl FunctionDeclaration {
    pub fn result_type_name(&self) -> Option<&str> {
        readable_type_name(&self.result)
    }

    /// Whether the last parameter takes `...` arguments
    pub fn is_variadic(&self) -> bool {
        self.parameters
            .parameters
            .last()
            .is_some_and(|parameter| parameter.is_variadic)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterList {
    pub id: NodeId,
    pub origin: SyntaxNodeId,
    pub parameters: Vec<ParameterDeclaration>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterDeclaration {
    pub id: NodeId,
    pub origin: SyntaxNodeId,
    pub name: Identifier,
    /// `TypeName` or `Null`
    pub ty: Node,
    pub is_variadic: bool,
    pub is_mutable: bool,
}

impl ParameterDeclaration {
    pub fn type_name(&self) -> Option<&str> {
        readable_type_name(&self.ty)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub id: NodeId,
    pub origin: SyntaxNodeId,
    pub statements: Vec<Node>,
}

/// An expression in statement position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleStatement {
    pub id: NodeId,
    pub origin: SyntaxNodeId,
    pub expression: Node,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnStatement {
    pub id: NodeId,
    pub origin: SyntaxNodeId,
    /// `ExpressionList` or `Null` for a bare `return`
    pub expression_list: Node,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallExpr {
    pub id: NodeId,
    pub origin: SyntaxNodeId,
    pub function: Node,
    pub arguments: ArgumentList,
}

impl CallExpr {
    /// Name of the callee when it is a plain reference
    pub fn function_name(&self) -> Option<&str> {
        match &self.function {
            Node::ReferenceExpression(reference) => Some(&reference.identifier.name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentList {
    pub id: NodeId,
    pub origin: SyntaxNodeId,
    pub arguments: Vec<Argument>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    pub id: NodeId,
    pub origin: SyntaxNodeId,
    pub expression: Node,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryExpression {
    pub id: NodeId,
    pub origin: SyntaxNodeId,
    pub left: Node,
    pub operator: String,
    pub right: Node,
}

impl BinaryExpression {
    /// Comparison and logical operators produce `bool`
    pub fn is_boolean(&self) -> bool {
        matches!(
            self.operator.as_str(),
            "==" | "!=" | "<" | "<=" | ">" | ">=" | "&&" | "||"
        )
    }
}

/// A type in declaration position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeName {
    pub id: NodeId,
    pub origin: SyntaxNodeId,
    /// `BuiltinType`, `SimpleType` or `Null`
    pub ty: Node,
}

impl TypeName {
    pub fn readable_name(&self) -> Option<&str> {
        match &self.ty {
            Node::BuiltinType(builtin) => Some(&builtin.name),
            Node::SimpleType(simple) => Some(&simple.name),
            _ => None,
        }
    }
}

/// Readable name of a type slot holding a [`TypeName`]
pub fn readable_type_name(node: &Node) -> Option<&str> {
    match node {
        Node::TypeName(type_name) => type_name.readable_name(),
        _ => None,
    }
}

/// Primitive type such as `int` or `string`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltinType {
    pub id: NodeId,
    pub origin: SyntaxNodeId,
    pub name: String,
}

/// Named type reference, e.g. a struct
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleType {
    pub id: NodeId,
    pub origin: SyntaxNodeId,
    pub name: String,
}

/// String literal with its quotes removed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringLiteral {
    pub id: NodeId,
    pub origin: SyntaxNodeId,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegerLiteral {
    pub id: NodeId,
    pub origin: SyntaxNodeId,
    pub text: String,
}

impl IntegerLiteral {
    /// Numeric value; `None` when out of range or malformed
    pub fn value(&self) -> Option<i64> {
        let digits = self.text.replace('_', "");
        let (radix, digits) = match digits.get(..2) {
            Some("0x" | "0X") => (16, &digits[2..]),
            Some("0o" | "0O") => (8, &digits[2..]),
            Some("0b" | "0B") => (2, &digits[2..]),
            _ => (10, digits.as_str()),
        };
        i64::from_str_radix(digits, radix).ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FloatLiteral {
    pub id: NodeId,
    pub origin: SyntaxNodeId,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BooleanLiteral {
    pub id: NodeId,
    pub origin: SyntaxNodeId,
    pub value: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoneLiteral {
    pub id: NodeId,
    pub origin: SyntaxNodeId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use la_arena::{Idx, RawIdx};

    fn origin() -> SyntaxNodeId {
        Idx::from_raw(RawIdx::from(0))
    }

    fn integer(text: &str) -> IntegerLiteral {
        IntegerLiteral {
            id: NodeId(1),
            origin: origin(),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_integer_values() {
        assert_eq!(integer("100").value(), Some(100));
        assert_eq!(integer("1_000").value(), Some(1000));
        assert_eq!(integer("0xff").value(), Some(255));
        assert_eq!(integer("0o17").value(), Some(15));
        assert_eq!(integer("0b101").value(), Some(5));
        assert_eq!(integer("99999999999999999999").value(), None);
    }

    #[test]
    fn test_null_node() {
        let node = Node::default();

        assert!(node.is_null());
        assert_eq!(node.id(), NodeId::NULL);
        assert_eq!(node.origin(), None);
        assert_eq!(node.kind().to_string(), "null");
    }

    #[test]
    fn test_boxed_variant_accessors() {
        let node: Node = integer("7").into();

        assert_eq!(node.kind(), NodeKind::IntegerLiteral);
        assert_eq!(node.id(), NodeId(1));
        assert_eq!(node.origin(), Some(origin()));
    }

    #[test]
    fn test_call_function_name() {
        let call = CallExpr {
            id: NodeId(1),
            origin: origin(),
            function: ReferenceExpression {
                id: NodeId(2),
                origin: origin(),
                identifier: Identifier {
                    id: NodeId(3),
                    origin: origin(),
                    name: "take_int".to_string(),
                },
            }
            .into(),
            arguments: ArgumentList {
                id: NodeId(4),
                origin: origin(),
                arguments: Vec::new(),
            },
        };

        assert_eq!(call.function_name(), Some("take_int"));
    }

    #[test]
    fn test_readable_type_names() {
        let simple = TypeName {
            id: NodeId(1),
            origin: origin(),
            ty: SimpleType {
                id: NodeId(2),
                origin: origin(),
                name: "Foo".to_string(),
            }
            .into(),
        };
        let unknown = TypeName {
            id: NodeId(3),
            origin: origin(),
            ty: Node::Null,
        };

        assert_eq!(readable_type_name(&simple.into()), Some("Foo"));
        assert_eq!(unknown.readable_name(), None);
        assert_eq!(readable_type_name(&Node::Null), None);
    }
}
