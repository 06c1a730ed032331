//! Type label inference for V files
//!
//! Assigns a type name to the nodes whose type is evident from one
//! top-to-bottom walk: literals, struct initializers, calls to known
//! functions, and variables through the declaration that introduces them.
//! Everything else stays unlabeled.

mod infer;
mod map;

pub use infer::TypeInferrer;
pub use map::TypeMap;

use va_ir::{Accept as _, File};
use va_resolve::SymbolTables;

/// Infers labels for `file` using its resolved symbols
#[tracing::instrument(level = "debug", skip_all)]
pub fn infer(file: &File, symbols: &SymbolTables<'_>) -> TypeMap {
    let mut inferrer = TypeInferrer::new(symbols);
    file.accept(&mut inferrer);
    let types = inferrer.finish();
    tracing::debug!(labeled = types.len(), "inferred types");
    types
}

#[cfg(test)]
mod tests {
    use super::*;
    use expect_test::{Expect, expect};
    use va_ir::{Node, NodeRef};
    use va_lower::{LowerConfig, lower_file};

    /// Label of every declared variable, in traversal order
    fn check(source: &str, expected: Expect) {
        let tree = lang_v::parse(source);
        let file = lower_file(&tree, LowerConfig::default()).unwrap();
        let symbols = va_resolve::resolve(&file);
        let types = infer(&file, &symbols);

        let mut lines = Vec::new();
        file.accept(&mut |node: NodeRef<'_>| {
            if let NodeRef::VarDeclaration(declaration) = node {
                for name in declaration.declared_names() {
                    lines.push(format!(
                        "{}: {}",
                        name.name,
                        types.label_or(declaration.id, TypeMap::UNKNOWN)
                    ));
                }
            }
            true
        });
        expected.assert_eq(&lines.join("\n"));
    }

    #[test]
    fn test_literals() {
        check(
            "s := 'a'\ni := 0x1f\nf := 2.5\nb := false\nn := none\n",
            expect![[r"
                s: string
                i: int
                f: f64
                b: bool
                n: unknown"]],
        );
    }

    #[test]
    fn test_initializer_and_calls() {
        check(
            "struct Foo { name string }\nfn make() Foo { return Foo{} }\nf := Foo{ name: 'foo' }\ng := make()\nh := missing()\n",
            expect![[r"
                f: Foo
                g: Foo
                h: unknown"]],
        );
    }

    #[test]
    fn test_variables_flow_through_references() {
        check(
            "x := 1\ny := x\nz := y + 2\nok := y < z\n",
            expect![[r"
                x: int
                y: int
                z: int
                ok: bool"]],
        );
    }

    #[test]
    fn test_long_operator_chain() {
        let source = format!("total := 1{}\n", " + 1".repeat(200));
        check(&source, expect!["total: int"]);
    }

    #[test]
    fn test_multiple_assignment_uses_first_value() {
        check(
            "a, b := 'one', 2\n",
            expect![[r"
                a: string
                b: string"]],
        );
    }

    #[test]
    fn test_use_before_declaration_is_unlabeled() {
        let tree = lang_v::parse("fn main() {\n\tshow(later)\n}\nlater := 'x'\n");
        let file = lower_file(&tree, LowerConfig::default()).unwrap();
        let symbols = va_resolve::resolve(&file);
        let types = infer(&file, &symbols);

        let Node::FunctionDeclaration(main) = &file.statements[0] else {
            panic!("expected function");
        };
        let Node::SimpleStatement(statement) = &main.body.statements[0] else {
            panic!("expected statement");
        };
        let Node::CallExpr(call) = &statement.expression else {
            panic!("expected call");
        };
        let argument = &call.arguments.arguments[0].expression;
        assert_eq!(types.get(argument.id()), None);

        let Node::VarDeclaration(later) = &file.statements[1] else {
            panic!("expected var declaration");
        };
        assert_eq!(types.get(later.id), Some("string"));
    }
}
