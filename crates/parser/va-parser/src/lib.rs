//! Parser infrastructure for V
//!
//! Runs a language adapter over V source and turns the error and missing
//! nodes it leaves in the syntax tree into [`ParseError`] diagnostics.
//! Syntax errors never stop the pipeline; lowering works on whatever tree
//! came back.

pub mod error;

pub use error::ParseError;

use error::anonymous_source;
use miette::SourceSpan;
use va_syntax::{Language, SyntaxKind, SyntaxNodeRef, SyntaxTree};

/// Result of parsing a source file
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Concrete syntax tree, error nodes included
    pub tree: SyntaxTree,
    /// Parse errors with detailed diagnostics
    pub errors: Vec<ParseError>,
}

/// Parse V source code with the built-in adapter
pub fn parse_source(source: &str) -> ParseResult {
    with_errors(lang_v::parse(source))
}

/// Parse with any language adapter, such as a linked tree-sitter grammar
///
/// # Errors
///
/// Returns [`ParseError::ParseFailed`] when the adapter produced no tree.
pub fn parse_with(language: &dyn Language, source: &str) -> Result<ParseResult, ParseError> {
    language
        .parse(source)
        .map(with_errors)
        .map_err(|err| ParseError::ParseFailed {
            reason: format!("{} adapter: {err}", language.name()),
        })
}

fn with_errors(tree: SyntaxTree) -> ParseResult {
    let mut errors = Vec::new();
    let root = tree.root();
    if root.has_error() {
        collect_errors(root, tree.source(), &mut errors);
    }
    tracing::debug!(errors = errors.len(), "collected syntax errors");
    ParseResult { tree, errors }
}

fn missing_token(source: &str, pos: usize, expected: &str) -> ParseError {
    let found = source
        .get(pos..)
        .and_then(|rest| rest.split_whitespace().next())
        .map_or_else(
            || "end of file".to_string(),
            |word| word.chars().take(10).collect(),
        );

    ParseError::MissingToken {
        expected: expected.to_string(),
        found,
        span: (pos, 0).into(),
        src: anonymous_source(source),
    }
}

/// Walks the whole tree; error subtrees may hold further missing nodes
fn collect_errors(node: SyntaxNodeRef<'_>, source: &str, errors: &mut Vec<ParseError>) {
    if node.is_error() {
        let span = source_span(node);
        let error = match node.parent() {
            Some(parent) => error_in_context(parent, node, source, span),
            None => unexpected_token(node, source, span),
        };
        errors.push(error);
    } else if node.is_missing() {
        let pos = node.start_byte() as usize;
        let expected = node.kind().as_str();

        let delimiter = match expected {
            ")" => Some(('(', ')')),
            "}" => Some(('{', '}')),
            "]" => Some(('[', ']')),
            _ => None,
        };
        let opening = delimiter.zip(node.parent()).and_then(|((open, close), parent)| {
            find_opening_delimiter(parent, open).map(|at| (at, open, close))
        });

        let error = match opening {
            Some((opening_pos, opening_char, closing_char)) => ParseError::UnclosedDelimiter {
                opening_char,
                closing_char,
                opening: (opening_pos, 1).into(),
                expected_close: (pos, 0).into(),
                src: anonymous_source(source),
            },
            None => missing_token(source, pos, expected),
        };
        errors.push(error);
    }

    for child in node.children() {
        collect_errors(child, source, errors);
    }
}

/// Names the construct an `ERROR` node broke, when its parent is known
fn error_in_context(
    parent: SyntaxNodeRef<'_>,
    error_node: SyntaxNodeRef<'_>,
    source: &str,
    error_span: SourceSpan,
) -> ParseError {
    let (construct, suggestion) = match parent.kind() {
        SyntaxKind::FunctionDeclaration => (
            "function declaration",
            "function declarations have the form: `fn name(params) result { body }`",
        ),
        SyntaxKind::ParameterList => (
            "parameter list",
            "parameters have the form `name type`, separated by commas",
        ),
        SyntaxKind::StructFieldsGroup | SyntaxKind::StructDeclaration => (
            "struct field",
            "fields have the form `name type`, optionally followed by `= default`",
        ),
        _ => return unexpected_token(error_node, source, error_span),
    };

    ParseError::InvalidSyntax {
        construct: construct.to_string(),
        suggestion: Some(suggestion.to_string()),
        span: error_span,
        src: anonymous_source(source),
    }
}

fn unexpected_token(node: SyntaxNodeRef<'_>, source: &str, span: SourceSpan) -> ParseError {
    let text = node.text();
    ParseError::UnexpectedToken {
        token: text.lines().next().unwrap_or(text).to_string(),
        span,
        src: anonymous_source(source),
    }
}

/// Position of the unnamed `open` token among `node`'s children
fn find_opening_delimiter(node: SyntaxNodeRef<'_>, open: char) -> Option<usize> {
    let mut buffer = [0u8; 4];
    let open: &str = open.encode_utf8(&mut buffer);
    node.children()
        .find(|child| !child.is_named() && !child.is_missing() && child.kind().as_str() == open)
        .map(|child| child.start_byte() as usize)
}

fn source_span(node: SyntaxNodeRef<'_>) -> SourceSpan {
    let span = node.byte_span();
    (span.start as usize, span.len() as usize).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use va_syntax::TreeSitterLanguage;

    #[test]
    fn test_parse_success() {
        let result = parse_source("fn main() {}");

        assert!(result.errors.is_empty());
        assert_eq!(result.tree.root().kind(), &SyntaxKind::SourceFile);
    }

    #[test]
    fn test_parse_with_syntax_error() {
        let source = "fn main( {";
        let result = parse_source(source);

        assert_eq!(result.errors.len(), 2);
        assert_eq!(
            result.errors[0].to_string(),
            "this file contains an unclosed delimiter"
        );
        let ParseError::UnclosedDelimiter {
            opening,
            closing_char,
            ..
        } = &result.errors[0]
        else {
            panic!("expected unclosed delimiter, got {:?}", result.errors[0]);
        };
        assert_eq!(opening.offset(), 7);
        assert_eq!(*closing_char, ')');
    }

    #[test]
    fn test_unexpected_token() {
        let result = parse_source("x := 1\n# oops\n");

        assert_eq!(result.errors.len(), 1);
        let ParseError::UnexpectedToken { token, span, .. } = &result.errors[0] else {
            panic!("expected unexpected token, got {:?}", result.errors[0]);
        };
        assert_eq!(token, "#");
        assert_eq!(span.offset(), 7);
    }

    #[test]
    fn test_invalid_struct_field() {
        let result = parse_source("struct Foo {\n\t= 3\n}");

        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].to_string(), "invalid struct field");
    }

    #[test]
    fn test_missing_token() {
        let result = parse_source("x :=");

        assert!(!result.errors.is_empty());
        assert!(
            result
                .errors
                .iter()
                .all(|error| matches!(error, ParseError::MissingToken { .. })),
            "{:?}",
            result.errors
        );
    }

    #[test]
    fn test_parse_with_tree_sitter_adapter() {
        let language = TreeSitterLanguage::new(
            "rust",
            &["rs"],
            tree_sitter_rust::LANGUAGE.into(),
        );
        let result = parse_with(&language, "fn main() {}").unwrap();
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_error_display_with_context() {
        use crate::error::codespan_reporting::files::SimpleFiles;
        use crate::error::codespan_reporting::term;

        let source = "fn broken( {\n\tx := 5\n";
        let result = parse_source(source);

        assert!(!result.errors.is_empty());

        let mut files = SimpleFiles::new();
        let file_id = files.add("<input>", source);
        let diagnostic = result.errors[0].to_codespan_diagnostic(file_id);

        let mut buffer = Vec::new();
        let config = term::Config::default();
        #[allow(deprecated, reason = "plain emit is enough for a byte buffer")]
        term::emit(&mut buffer, &config, &files, &diagnostic).unwrap();

        let output = String::from_utf8(buffer).unwrap();
        assert!(output.contains("fn broken"), "{output}");
        assert!(output.contains("unclosed delimiter"), "{output}");
    }
}
