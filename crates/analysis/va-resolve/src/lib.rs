//! Name resolution for V files
//!
//! One traversal fills three file-wide tables: functions, structs and
//! variables. Blocks do not open scopes and a later declaration of a name
//! silently replaces an earlier one. Variables map to the declaration that
//! introduces them, since that is what the type inferrer labels.

mod resolver;
mod symbols;

pub use resolver::Resolver;
pub use symbols::SymbolTables;

use va_ir::{Accept as _, File};

/// Collects the declarations of `file`
#[tracing::instrument(level = "debug", skip_all)]
pub fn resolve(file: &File) -> SymbolTables<'_> {
    let mut resolver = Resolver::new();
    file.accept(&mut resolver);
    let tables = resolver.finish();
    tracing::debug!(
        functions = tables.function_count(),
        structs = tables.struct_count(),
        variables = tables.variable_count(),
        "resolved file"
    );
    tables
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::ptr;
    use va_ir::Node;
    use va_lower::{LowerConfig, lower_file};

    fn lower(source: &str) -> File {
        let tree = lang_v::parse(source);
        lower_file(&tree, LowerConfig::default()).unwrap()
    }

    #[test]
    fn test_tables_are_filled() {
        let file = lower(
            "import os\nstruct Foo { name string }\nfn make() Foo { return Foo{} }\nf := make()\n",
        );
        let tables = resolve(&file);

        assert!(tables.structure("Foo").is_some());
        assert_eq!(tables.function("make").unwrap().result_type_name(), Some("Foo"));
        assert!(tables.variable("f").is_some());
        assert!(tables.function("Foo").is_none());
        assert_eq!(tables.imports(), &["os"]);
    }

    #[test]
    fn test_last_declaration_wins() {
        let file = lower("fn twice() int { return 1 }\nfn twice() string { return 'a' }\n");
        let tables = resolve(&file);

        let Node::FunctionDeclaration(second) = &file.statements[1] else {
            panic!("expected function");
        };
        let found = tables.function("twice").unwrap();
        assert!(ptr::eq(found, &**second));
        assert_eq!(found.result_type_name(), Some("string"));
        assert_eq!(tables.function_count(), 1);
    }

    #[test]
    fn test_variables_map_to_declaration() {
        let file = lower("fn main() {\n\ta, mut b := 1, 2\n}\n");
        let tables = resolve(&file);

        let first = tables.variable("a").unwrap();
        let second = tables.variable("b").unwrap();
        assert!(ptr::eq(first, second));
        assert_eq!(first.declared_names().count(), 2);
    }
}
