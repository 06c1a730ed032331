//! File-wide symbol tables

use rustc_hash::FxHashMap;
use va_ir::{FunctionDeclaration, StructDeclaration, VarDeclaration};

/// Name to declaration maps for one file
///
/// There is a single scope per file. Registering a name that is already
/// present replaces the earlier declaration.
#[derive(Debug, Default, Clone)]
pub struct SymbolTables<'ast> {
    functions: FxHashMap<&'ast str, &'ast FunctionDeclaration>,
    structs: FxHashMap<&'ast str, &'ast StructDeclaration>,
    variables: FxHashMap<&'ast str, &'ast VarDeclaration>,
    imports: Vec<&'ast str>,
}

impl<'ast> SymbolTables<'ast> {
    /// Empty tables
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Function declared as `name`
    pub fn function(&self, name: &str) -> Option<&'ast FunctionDeclaration> {
        self.functions.get(name).copied()
    }

    /// Struct declared as `name`
    pub fn structure(&self, name: &str) -> Option<&'ast StructDeclaration> {
        self.structs.get(name).copied()
    }

    /// Declaration that introduces the variable `name`
    pub fn variable(&self, name: &str) -> Option<&'ast VarDeclaration> {
        self.variables.get(name).copied()
    }

    /// Import paths in source order; they are not resolved against modules
    pub fn imports(&self) -> &[&'ast str] {
        &self.imports
    }

    /// Number of distinct function names
    pub fn function_count(&self) -> usize {
        self.functions.len()
    }

    /// Number of distinct struct names
    pub fn struct_count(&self) -> usize {
        self.structs.len()
    }

    /// Number of distinct variable names
    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    /// Returns the declaration that was replaced, if any
    pub(crate) fn define_function(
        &mut self,
        name: &'ast str,
        function: &'ast FunctionDeclaration,
    ) -> Option<&'ast FunctionDeclaration> {
        self.functions.insert(name, function)
    }

    pub(crate) fn define_struct(
        &mut self,
        name: &'ast str,
        structure: &'ast StructDeclaration,
    ) -> Option<&'ast StructDeclaration> {
        self.structs.insert(name, structure)
    }

    pub(crate) fn define_variable(
        &mut self,
        name: &'ast str,
        declaration: &'ast VarDeclaration,
    ) -> Option<&'ast VarDeclaration> {
        self.variables.insert(name, declaration)
    }

    pub(crate) fn record_import(&mut self, path: &'ast str) {
        self.imports.push(path);
    }
}
