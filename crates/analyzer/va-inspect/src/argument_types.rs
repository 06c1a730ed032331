//! Arguments whose inferred type differs from the parameter type

use crate::{Context, Inspection};
use va_ir::{Accept as _, CallExpr, File, FunctionDeclaration, NodeRef};

/// Compares each argument's label with the declared type of the parameter
/// at the same position
///
/// Positions past the shorter of the two lists are not compared, except
/// that extra arguments to a variadic function are checked against the
/// variadic parameter's type. An argument without a label is not compared.
pub struct ArgumentTypes;

impl Inspection for ArgumentTypes {
    fn name(&self) -> &str {
        "argument-types"
    }

    fn check<'ast>(&self, file: &'ast File, context: &Context<'_, 'ast>) -> Vec<String> {
        let mut messages = Vec::new();
        file.accept(&mut |node: NodeRef<'ast>| {
            if let NodeRef::CallExpr(call) = node {
                let function = call
                    .function_name()
                    .and_then(|name| context.symbols.function(name));
                if let Some(function) = function {
                    check_call(call, function, context, &mut messages);
                }
            }
            true
        });
        messages
    }
}

fn check_call(
    call: &CallExpr,
    function: &FunctionDeclaration,
    context: &Context<'_, '_>,
    messages: &mut Vec<String>,
) {
    let parameters = &function.parameters.parameters;
    let variadic = parameters.last().filter(|parameter| parameter.is_variadic);

    for (index, argument) in call.arguments.arguments.iter().enumerate() {
        let Some(parameter) = parameters.get(index).or(variadic) else {
            break;
        };
        let Some(expected) = parameter.type_name() else {
            continue;
        };
        let Some(actual) = context.types.get(argument.expression.id()) else {
            continue;
        };
        if actual != expected {
            messages.push(format!(
                "argument #{} of '{}': expected '{expected}', found '{actual}'",
                index + 1,
                function.name.name
            ));
        }
    }
}
