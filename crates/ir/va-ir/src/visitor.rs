//! Pre-order traversal with cancellation
//!
//! [`Accept::accept`] hands the node itself to the visitor, then each owned
//! child slot in declaration order. A `false` from the visitor stops the
//! whole walk and is returned from every enclosing `accept`.

use crate::node::*;

/// Stateful traversal callback; return `false` to cancel the walk
pub trait Visitor<'ast> {
    /// Called once per node, parent before children
    fn visit(&mut self, node: NodeRef<'ast>) -> bool;
}

impl<'ast, F> Visitor<'ast> for F
where
    F: FnMut(NodeRef<'ast>) -> bool,
{
    fn visit(&mut self, node: NodeRef<'ast>) -> bool {
        self(node)
    }
}

/// Depth-first, pre-order traversal of a node and everything it owns
pub trait Accept {
    /// Returns `false` if the visitor cancelled the traversal
    fn accept<'ast, V>(&'ast self, visitor: &mut V) -> bool
    where
        V: Visitor<'ast> + ?Sized;
}

impl<T: Accept> Accept for Vec<T> {
    fn accept<'ast, V>(&'ast self, visitor: &mut V) -> bool
    where
        V: Visitor<'ast> + ?Sized,
    {
        self.iter().all(|item| item.accept(visitor))
    }
}

impl Accept for Node {
    fn accept<'ast, V>(&'ast self, visitor: &mut V) -> bool
    where
        V: Visitor<'ast> + ?Sized,
    {
        self.as_node_ref().accept(visitor)
    }
}

macro_rules! accept_children {
    ($($ty:ident => [$($child:ident),*];)*) => {
        $(
            impl Accept for $ty {
                fn accept<'ast, V>(&'ast self, visitor: &mut V) -> bool
                where
                    V: Visitor<'ast> + ?Sized,
                {
                    visitor.visit(NodeRef::$ty(self)) $(&& self.$child.accept(visitor))*
                }
            }
        )*

    };
}

accept_children! {
    File => [module_clause, imports, statements];
    ModuleClause => [name];
    ImportList => [declarations];
    ImportDeclaration => [spec];
    ImportSpec => [path, alias];
    ImportPath => [];
    ImportAlias => [];
    StructDeclaration => [name, groups];
    StructFieldsGroup => [fields];
    FieldDeclaration => [name, ty, default_value];
    DefaultValue => [value];
    ReferenceExpression => [identifier];
    TypeInitializer => [ty, value];
    LiteralValue => [elements, short_elements];
    ElementList => [elements];
    ShortElementList => [elements];
    Element => [key, value];
    FieldName => [reference];
    ExpressionList => [expressions];
    IfExpression => [condition, guard, block, else_branch];
    VarDeclaration => [var_list, expression_list];
    Identifier => [];
    FunctionDeclaration => [name, parameters, result, body];
    ParameterList => [parameters];
    ParameterDeclaration => [name, ty];
    Block => [statements];
    SimpleStatement => [expression];
    ReturnStatement => [expression_list];
    CallExpr => [function, arguments];
    ArgumentList => [arguments];
    Argument => [expression];
    BinaryExpression => [left, right];
    TypeName => [ty];
    BuiltinType => [];
    SimpleType => [];
    StringLiteral => [];
    IntegerLiteral => [];
    FloatLiteral => [];
    BooleanLiteral => [];
    NoneLiteral => [];
}
