//! Lowering errors
//!
//! Malformed input never produces an error; it lowers to the null node.
//! The only failure is a type node the IR cannot represent, which points at
//! a gap in the IR rather than at the source.

#![allow(
    unused_assignments,
    reason = "Diagnostic derive reads the label field"
)]

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;
use va_span::Point;

/// Failure to lower a syntax tree
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum LowerError {
    /// A type kind with no IR variant
    #[error("unmodeled type kind `{kind}` at {at}")]
    #[diagnostic(
        code(lower::unmodeled_type),
        help("set `unmodeled_types = \"substitute\"` under [lowering] to lower it as null")
    )]
    UnmodeledType {
        /// Grammar kind of the type node
        kind: String,
        /// Line and column of the type node
        at: Point,
        /// Source location
        #[label("this type cannot be represented")]
        span: SourceSpan,
    },
}
