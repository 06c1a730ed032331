//! Declaration collection

use crate::SymbolTables;
use tracing::{debug, trace};
use va_ir::{NodeRef, Visitor};

/// Visitor that registers every declaration it passes
#[derive(Debug, Default)]
pub struct Resolver<'ast> {
    tables: SymbolTables<'ast>,
}

impl<'ast> Resolver<'ast> {
    /// Resolver with empty tables
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tables filled by the walk
    #[must_use]
    pub fn finish(self) -> SymbolTables<'ast> {
        self.tables
    }
}

impl<'ast> Visitor<'ast> for Resolver<'ast> {
    fn visit(&mut self, node: NodeRef<'ast>) -> bool {
        match node {
            NodeRef::FunctionDeclaration(function) => {
                let name = function.name.name.as_str();
                if self.tables.define_function(name, function).is_some() {
                    trace!(name, "function redeclared, keeping the later one");
                }
            }
            NodeRef::StructDeclaration(structure) => {
                let name = structure.name.name.as_str();
                if self.tables.define_struct(name, structure).is_some() {
                    trace!(name, "struct redeclared, keeping the later one");
                }
            }
            NodeRef::VarDeclaration(declaration) => {
                for identifier in declaration.declared_names() {
                    self.tables.define_variable(&identifier.name, declaration);
                }
            }
            NodeRef::ImportDeclaration(import) => {
                let path = import.spec.path.path.as_str();
                debug!(path, "import not resolved");
                self.tables.record_import(path);
            }
            _ => {}
        }
        true
    }
}
