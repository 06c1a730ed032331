//! Struct initializers naming fields the struct does not declare

use crate::{Context, Inspection};
use va_ir::{Accept as _, File, NodeRef};

/// Checks the keys of `Name{ key: value }` against the fields of `Name`
pub struct UnknownField;

impl Inspection for UnknownField {
    fn name(&self) -> &str {
        "unknown-field"
    }

    fn check<'ast>(&self, file: &'ast File, context: &Context<'_, 'ast>) -> Vec<String> {
        let mut messages = Vec::new();
        file.accept(&mut |node: NodeRef<'ast>| {
            let NodeRef::TypeInitializer(init) = node else {
                return true;
            };
            let Some(structure) = init
                .type_name()
                .and_then(|name| context.symbols.structure(name))
            else {
                return true;
            };

            for element in &init.value.elements.elements {
                let key = element.key_name();
                if structure.field(key).is_none() {
                    messages.push(format!(
                        "unknown field '{key}' in struct '{}'",
                        structure.name.name
                    ));
                }
            }
            true
        });
        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::run;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_unknown_field() {
        let source = "struct Foo { name string }\nf := Foo{ name: 'foo', blabla: 100 }\n";

        assert_eq!(
            run(&UnknownField, source),
            vec!["unknown field 'blabla' in struct 'Foo'"]
        );
    }

    #[test]
    fn test_fields_across_groups() {
        let source = "struct Point {\n\tx int\npub mut:\n\ty int\n}\np := Point{ x: 1, y: 2, z: 3, w: 4 }\n";

        assert_eq!(
            run(&UnknownField, source),
            vec![
                "unknown field 'z' in struct 'Point'",
                "unknown field 'w' in struct 'Point'",
            ]
        );
    }

    #[test]
    fn test_unknown_struct_and_positional_values_are_ignored() {
        let source = "struct Point { x int }\na := Other{ nope: 1 }\nb := Point{1, 2}\n";

        assert!(run(&UnknownField, source).is_empty());
    }
}
