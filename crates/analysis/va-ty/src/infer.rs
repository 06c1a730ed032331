//! Single-pass label inference

use crate::TypeMap;
use va_ir::{Node, NodeRef, Visitor};
use va_resolve::SymbolTables;

const STRING: &str = "string";
const INT: &str = "int";
const FLOAT: &str = "f64";
const BOOL: &str = "bool";

/// Visitor that labels nodes in traversal order
///
/// The file is walked once, top to bottom. A variable used before the
/// declaration that introduces it has no label at that point and stays
/// unlabeled.
pub struct TypeInferrer<'tables, 'ast> {
    symbols: &'tables SymbolTables<'ast>,
    types: TypeMap,
}

impl<'tables, 'ast> TypeInferrer<'tables, 'ast> {
    /// Inferrer reading declarations from `symbols`
    pub fn new(symbols: &'tables SymbolTables<'ast>) -> Self {
        Self {
            symbols,
            types: TypeMap::new(),
        }
    }

    /// Labels collected by the walk
    #[must_use]
    pub fn finish(self) -> TypeMap {
        self.types
    }

    /// Labels `node` ahead of the regular walk. Only the nodes its own
    /// label depends on are visited; the walk reaches the rest later.
    fn label_now(&mut self, node: &'ast Node) {
        self.visit(node.as_node_ref());
    }
}

impl<'ast> Visitor<'ast> for TypeInferrer<'_, 'ast> {
    fn visit(&mut self, node: NodeRef<'ast>) -> bool {
        match node {
            NodeRef::StringLiteral(literal) => self.types.insert(literal.id, STRING),
            NodeRef::IntegerLiteral(literal) => self.types.insert(literal.id, INT),
            NodeRef::FloatLiteral(literal) => self.types.insert(literal.id, FLOAT),
            NodeRef::BooleanLiteral(literal) => self.types.insert(literal.id, BOOL),
            NodeRef::TypeInitializer(init) => {
                if let Some(name) = init.type_name() {
                    self.types.insert(init.id, name);
                }
            }
            NodeRef::VarDeclaration(declaration) => {
                // Only the first value is typed; `a, b := f()` labels from `f()`.
                if let Some(value) = declaration.first_value() {
                    self.label_now(value);
                    self.types.copy(value.id(), declaration.id);
                }
            }
            NodeRef::Identifier(identifier) => {
                if let Some(declaration) = self.symbols.variable(&identifier.name) {
                    self.types.copy(declaration.id, identifier.id);
                }
            }
            NodeRef::ReferenceExpression(reference) => {
                self.visit(NodeRef::Identifier(&reference.identifier));
                self.types.copy(reference.identifier.id, reference.id);
            }
            NodeRef::CallExpr(call) => {
                let result = call
                    .function_name()
                    .and_then(|name| self.symbols.function(name))
                    .and_then(|function| function.result_type_name());
                if let Some(result) = result {
                    self.types.insert(call.id, result);
                }
            }
            NodeRef::BinaryExpression(binary) => {
                if binary.is_boolean() {
                    self.types.insert(binary.id, BOOL);
                } else {
                    self.label_now(&binary.left);
                    self.types.copy(binary.left.id(), binary.id);
                }
            }
            _ => {}
        }
        true
    }
}
