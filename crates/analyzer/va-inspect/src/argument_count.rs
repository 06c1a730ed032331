//! Calls with the wrong number of arguments

use crate::{Context, Inspection};
use va_ir::{Accept as _, File, NodeRef};

/// Compares the argument count of each call to a known function with the
/// function's parameter count
///
/// A trailing variadic parameter accepts any number of arguments, including
/// none.
pub struct ArgumentCount;

impl Inspection for ArgumentCount {
    fn name(&self) -> &str {
        "argument-count"
    }

    fn check<'ast>(&self, file: &'ast File, context: &Context<'_, 'ast>) -> Vec<String> {
        let mut messages = Vec::new();
        file.accept(&mut |node: NodeRef<'ast>| {
            let NodeRef::CallExpr(call) = node else {
                return true;
            };
            let Some(name) = call.function_name() else {
                return true;
            };
            let Some(function) = context.symbols.function(name) else {
                return true;
            };

            let expected = function.parameters.parameters.len();
            let actual = call.arguments.arguments.len();
            if function.is_variadic() {
                let required = expected.saturating_sub(1);
                if actual < required {
                    messages.push(format!(
                        "function '{name}' expects at least {required} argument(s), but got {actual}"
                    ));
                }
            } else if actual != expected {
                messages.push(format!(
                    "function '{name}' expects {expected} argument(s), but got {actual}"
                ));
            }
            true
        });
        messages
    }
}
