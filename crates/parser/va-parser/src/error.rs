//! Syntax error diagnostics
//!
//! Fields read only by the `Diagnostic` derive look unused to rustc, hence
//! the `unused_assignments` allowance below.

#![allow(
    unused_assignments,
    reason = "Diagnostic derive reads the label and source fields"
)]

use std::ops::Range;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

pub use codespan_reporting;

use codespan_reporting::diagnostic::{Diagnostic as CodespanDiagnostic, Label};

/// Source attached to located errors until a caller renames it
pub(crate) fn anonymous_source(source: &str) -> NamedSource<String> {
    NamedSource::new("<input>", source.to_string())
}

/// A syntax error found in the tree returned by a language adapter
#[derive(Error, Debug, Clone, Diagnostic)]
pub enum ParseError {
    /// An `ERROR` node with no more specific explanation
    #[error("unexpected token `{token}`")]
    #[diagnostic(code(parser::unexpected_token), help("remove it or finish the statement before it"))]
    UnexpectedToken {
        /// First line of the skipped text
        token: String,
        /// The skipped text
        #[label("not valid here")]
        span: SourceSpan,
        /// File the error points into
        #[source_code]
        src: NamedSource<String>,
    },

    /// A token the grammar requires is absent
    #[error("expected `{expected}`, found `{found}`")]
    #[diagnostic(code(parser::missing_token), help("insert `{expected}`"))]
    MissingToken {
        /// Token text the grammar wanted
        expected: String,
        /// Text following the gap, or `end of file`
        found: String,
        /// Zero-width gap where the token belongs
        #[label("`{expected}` belongs here")]
        span: SourceSpan,
        /// File the error points into
        #[source_code]
        src: NamedSource<String>,
    },

    /// A closing `)`, `}` or `]` is absent and its opener was found
    #[error("this file contains an unclosed delimiter")]
    #[diagnostic(code(parser::unclosed_delimiter))]
    UnclosedDelimiter {
        /// The unmatched opener
        opening_char: char,
        /// The closer that never came
        closing_char: char,
        /// Location of the opener
        #[label("`{opening_char}` opened here")]
        opening: SourceSpan,
        /// End of the enclosing node
        #[label("expected `{closing_char}`")]
        expected_close: SourceSpan,
        /// File the error points into
        #[source_code]
        src: NamedSource<String>,
    },

    /// An `ERROR` node inside a construct with a known shape
    #[error("invalid {construct}")]
    #[diagnostic(code(parser::invalid_syntax))]
    InvalidSyntax {
        /// Construct name such as `parameter list`
        construct: String,
        /// Expected shape of the construct
        #[help]
        suggestion: Option<String>,
        /// The `ERROR` node
        #[label("malformed {construct}")]
        span: SourceSpan,
        /// File the error points into
        #[source_code]
        src: NamedSource<String>,
    },

    /// The adapter returned no tree at all
    #[error("failed to parse source")]
    #[diagnostic(code(parser::parse_failed))]
    ParseFailed {
        /// Why no tree came back
        reason: String,
    },
}

impl ParseError {
    /// Primary location: the offending text, or where a closer was expected
    pub fn span(&self) -> Option<SourceSpan> {
        match self {
            Self::UnexpectedToken { span, .. }
            | Self::MissingToken { span, .. }
            | Self::InvalidSyntax { span, .. } => Some(*span),
            Self::UnclosedDelimiter { expected_close, .. } => Some(*expected_close),
            Self::ParseFailed { .. } => None,
        }
    }

    fn source_mut(&mut self) -> Option<&mut NamedSource<String>> {
        match self {
            Self::UnexpectedToken { src, .. }
            | Self::MissingToken { src, .. }
            | Self::UnclosedDelimiter { src, .. }
            | Self::InvalidSyntax { src, .. } => Some(src),
            Self::ParseFailed { .. } => None,
        }
    }

    /// Attaches the real file name and text for rendering
    #[must_use]
    pub fn with_source(mut self, filename: impl Into<String>, source: impl Into<String>) -> Self {
        if let Some(src) = self.source_mut() {
            *src = NamedSource::new(filename.into(), source.into());
        }
        self
    }

    /// Same error as a codespan diagnostic, for rustc-style terminal output
    pub fn to_codespan_diagnostic(&self, file_id: usize) -> CodespanDiagnostic<usize> {
        let diagnostic = CodespanDiagnostic::error().with_message(self.to_string());
        let primary = |span: &SourceSpan, message: String| {
            Label::primary(file_id, range(*span)).with_message(message)
        };

        match self {
            Self::UnexpectedToken { span, .. } => {
                diagnostic.with_labels(vec![primary(span, "not valid here".to_string())])
            }
            Self::MissingToken { expected, span, .. } => diagnostic
                .with_labels(vec![primary(span, format!("`{expected}` belongs here"))])
                .with_notes(vec![format!("insert `{expected}`")]),
            Self::UnclosedDelimiter {
                opening_char,
                closing_char,
                opening,
                expected_close,
                ..
            } => diagnostic.with_labels(vec![
                Label::secondary(file_id, range(*opening))
                    .with_message(format!("`{opening_char}` opened here")),
                primary(expected_close, format!("expected `{closing_char}`")),
            ]),
            Self::InvalidSyntax {
                construct,
                suggestion,
                span,
                ..
            } => diagnostic
                .with_labels(vec![primary(span, format!("malformed {construct}"))])
                .with_notes(suggestion.iter().cloned().collect()),
            Self::ParseFailed { reason } => diagnostic.with_notes(vec![reason.clone()]),
        }
    }
}

fn range(span: SourceSpan) -> Range<usize> {
    span.offset()..span.offset() + span.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_source_renames_file() {
        let error = ParseError::UnexpectedToken {
            token: "#".to_string(),
            span: (4, 1).into(),
            src: anonymous_source("x := #"),
        };

        let renamed = error.with_source("main.v", "x := #");
        let ParseError::UnexpectedToken { src, .. } = &renamed else {
            panic!("variant changed: {renamed:?}");
        };
        assert_eq!(src.name(), "main.v");
        assert_eq!(renamed.span(), Some((4, 1).into()));
    }

    #[test]
    fn test_unclosed_delimiter_codespan_labels() {
        let error = ParseError::UnclosedDelimiter {
            opening_char: '{',
            closing_char: '}',
            opening: (9, 1).into(),
            expected_close: (11, 0).into(),
            src: anonymous_source("fn main() {"),
        };

        let diagnostic = error.to_codespan_diagnostic(0);
        assert_eq!(diagnostic.message, "this file contains an unclosed delimiter");
        assert_eq!(diagnostic.labels.len(), 2);
        assert_eq!(diagnostic.labels[0].range, 9..10);
        assert_eq!(diagnostic.labels[1].range, 11..11);
    }

    #[test]
    fn test_invalid_syntax_note_is_suggestion() {
        let error = ParseError::InvalidSyntax {
            construct: "parameter list".to_string(),
            suggestion: Some("parameters have the form `name type`".to_string()),
            span: (8, 2).into(),
            src: anonymous_source("fn f(a, = ) {}"),
        };

        let diagnostic = error.to_codespan_diagnostic(0);
        assert_eq!(diagnostic.message, "invalid parameter list");
        assert_eq!(diagnostic.notes, vec!["parameters have the form `name type`"]);
    }

    #[test]
    fn test_parse_failed_has_no_span() {
        let error = ParseError::ParseFailed {
            reason: "no language".to_string(),
        };
        assert!(error.span().is_none());
        assert_eq!(error.to_string(), "failed to parse source");
        assert_eq!(error.with_source("a.v", "").to_string(), "failed to parse source");
    }
}
