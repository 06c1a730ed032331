//! Inspections over lowered V files
//!
//! An inspection reads the IR together with the symbol tables and type map
//! and reports human-readable messages. Inspections never modify what they
//! read and do not depend on each other, so they can run in any order.

mod argument_count;
mod argument_types;
mod unknown_field;

pub use argument_count::ArgumentCount;
pub use argument_types::ArgumentTypes;
pub use unknown_field::UnknownField;

use serde::{Deserialize, Serialize};
use va_ir::File;
use va_resolve::SymbolTables;
use va_ty::TypeMap;

/// Read-only results of the earlier passes
#[derive(Clone, Copy)]
pub struct Context<'tables, 'ast> {
    /// Declarations of the inspected file
    pub symbols: &'tables SymbolTables<'ast>,
    /// Inferred labels of the inspected file
    pub types: &'tables TypeMap,
}

impl<'tables, 'ast> Context<'tables, 'ast> {
    /// Bundles the pass results for one file
    pub fn new(symbols: &'tables SymbolTables<'ast>, types: &'tables TypeMap) -> Self {
        Self { symbols, types }
    }
}

/// Trait for inspections
pub trait Inspection {
    /// Inspection name, as used in configuration
    fn name(&self) -> &str;

    /// Messages for `file`, in traversal order
    fn check<'ast>(&self, file: &'ast File, context: &Context<'_, 'ast>) -> Vec<String>;
}

/// Which inspections run; all are on by default
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectionConfig {
    /// Run [`ArgumentCount`]
    pub argument_count: bool,
    /// Run [`ArgumentTypes`]
    pub argument_types: bool,
    /// Run [`UnknownField`]
    pub unknown_fields: bool,
}

impl Default for InspectionConfig {
    fn default() -> Self {
        Self {
            argument_count: true,
            argument_types: true,
            unknown_fields: true,
        }
    }
}

/// Runs a list of inspections and concatenates their messages
#[derive(Default)]
pub struct Inspector {
    inspections: Vec<Box<dyn Inspection>>,
}

impl Inspector {
    /// Inspector with no inspections
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every built-in inspection
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::from_config(&InspectionConfig::default())
    }

    /// Built-in inspections enabled in `config`, in a fixed order
    #[must_use]
    pub fn from_config(config: &InspectionConfig) -> Self {
        let mut inspector = Self::new();
        if config.argument_count {
            inspector.add(ArgumentCount);
        }
        if config.argument_types {
            inspector.add(ArgumentTypes);
        }
        if config.unknown_fields {
            inspector.add(UnknownField);
        }
        inspector
    }

    /// Appends `inspection`; it runs after those already added
    pub fn add(&mut self, inspection: impl Inspection + 'static) {
        self.inspections.push(Box::new(inspection));
    }

    /// Names of the inspections in run order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.inspections.iter().map(|inspection| inspection.name())
    }

    /// Runs every inspection over `file`
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn run<'ast>(&self, file: &'ast File, context: &Context<'_, 'ast>) -> Vec<String> {
        let mut messages = Vec::new();
        for inspection in &self.inspections {
            let found = inspection.check(file, context);
            tracing::debug!(inspection = inspection.name(), found = found.len(), "inspection done");
            messages.extend(found);
        }
        messages
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use va_lower::{LowerConfig, lower_file};

    const SOURCE: &str = "struct Foo { name string }\nfn take_int(i int) int { return 100 }\nf := Foo{ name: 'foo', blabla: 100 }\ntake_int('x', 2)\n";

    fn run(inspector: &Inspector) -> Vec<String> {
        let tree = lang_v::parse(SOURCE);
        let file = lower_file(&tree, LowerConfig::default()).unwrap();
        let symbols = va_resolve::resolve(&file);
        let types = va_ty::infer(&file, &symbols);
        inspector.run(&file, &Context::new(&symbols, &types))
    }

    #[test]
    fn test_default_order() {
        let inspector = Inspector::with_defaults();

        assert_eq!(
            inspector.names().collect::<Vec<_>>(),
            vec!["argument-count", "argument-types", "unknown-field"]
        );
        assert_eq!(
            run(&inspector),
            vec![
                "function 'take_int' expects 1 argument(s), but got 2".to_string(),
                "argument #1 of 'take_int': expected 'int', found 'string'".to_string(),
                "unknown field 'blabla' in struct 'Foo'".to_string(),
            ]
        );
    }

    #[test]
    fn test_disabled_inspections_do_not_run() {
        let config: InspectionConfig = toml::from_str("argument_types = false\nunknown_fields = false").unwrap();
        let inspector = Inspector::from_config(&config);

        assert_eq!(inspector.names().collect::<Vec<_>>(), vec!["argument-count"]);
        assert_eq!(run(&inspector).len(), 1);
        assert!(run(&Inspector::new()).is_empty());
    }
}
