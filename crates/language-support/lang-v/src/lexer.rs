//! Lexer for V using logos

use logos::Logos;
use va_span::Span;

/// Raw token from logos
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\f]+")]
#[logos(skip r"//[^\n]*")]
#[logos(skip r"/\*([^*]|\*+[^*/])*\*+/")]
#[allow(missing_docs, reason = "Each variant is documented by the pattern it matches")]
pub enum Token {
    // === Newlines terminate statements ===
    #[token("\n")]
    Newline,

    // === Keywords ===
    #[token("module")]
    Module,
    #[token("import")]
    Import,
    #[token("as")]
    As,
    #[token("struct")]
    Struct,
    #[token("pub")]
    Pub,
    #[token("mut")]
    Mut,
    #[token("fn")]
    Fn,
    #[token("return")]
    Return,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("assert")]
    Assert,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("none")]
    NoneKw,

    // === Delimiters ===
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,

    // === Punctuation ===
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token(":=")]
    ColonEq,
    #[token("=")]
    Eq,
    #[token(".")]
    Dot,
    #[token("...")]
    Ellipsis,
    #[token("?")]
    Question,
    #[token("&")]
    Amp,
    #[token(";")]
    Semicolon,

    // === Operators ===
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<")]
    Lt,
    #[token("<=")]
    LtEq,
    #[token(">")]
    Gt,
    #[token(">=")]
    GtEq,
    #[token("&&")]
    AndAnd,
    #[token("||")]
    OrOr,
    #[token("!")]
    Bang,

    // === Literals ===
    #[regex(r"[0-9][0-9_]*\.[0-9][0-9_]*([eE][+-]?[0-9]+)?")]
    Float,
    #[regex(r"0[xX][0-9a-fA-F_]+|0[oO][0-7_]+|0[bB][01_]+|[0-9][0-9_]*")]
    Int,
    #[regex(r#""([^"\\\n]|\\.)*""#)]
    #[regex(r"'([^'\\\n]|\\.)*'")]
    Str,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,
}

impl Token {
    /// Binding power of a binary operator, higher binds tighter
    pub fn binary_precedence(self) -> Option<u8> {
        match self {
            Self::OrOr => Some(1),
            Self::AndAnd => Some(2),
            Self::EqEq | Self::NotEq | Self::Lt | Self::LtEq | Self::Gt | Self::GtEq => Some(3),
            Self::Plus | Self::Minus => Some(4),
            Self::Star | Self::Slash | Self::Percent => Some(5),
            _ => None,
        }
    }
}

/// A token with its location; `token` is `None` for input the lexer
/// could not recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lexeme {
    /// Recognized token
    pub token: Option<Token>,
    /// Bytes the lexeme covers
    pub span: Span,
}

/// Splits `source` into lexemes, skipping blanks and comments
pub fn tokenize(source: &str) -> Vec<Lexeme> {
    Token::lexer(source)
        .spanned()
        .map(|(token, range)| Lexeme {
            token: token.ok(),
            span: Span::new(range.start as u32, range.end as u32),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(source: &str) -> Vec<Option<Token>> {
        tokenize(source).into_iter().map(|lexeme| lexeme.token).collect()
    }

    #[test]
    fn test_keywords_and_identifiers() {
        assert_eq!(
            tokens("fn take_int(i int) int"),
            vec![
                Some(Token::Fn),
                Some(Token::Ident),
                Some(Token::LParen),
                Some(Token::Ident),
                Some(Token::Ident),
                Some(Token::RParen),
                Some(Token::Ident),
            ]
        );
    }

    #[test]
    fn test_declaration_operator() {
        assert_eq!(
            tokens("f := 1.5\n"),
            vec![
                Some(Token::Ident),
                Some(Token::ColonEq),
                Some(Token::Float),
                Some(Token::Newline),
            ]
        );
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(
            tokens("a // trailing\n/* block\n */ b"),
            vec![Some(Token::Ident), Some(Token::Newline), Some(Token::Ident)]
        );
    }

    #[test]
    fn test_strings_and_unknown_input() {
        let lexemes = tokenize("'foo' \"bar\" #");
        assert_eq!(lexemes[0].token, Some(Token::Str));
        assert_eq!(lexemes[1].token, Some(Token::Str));
        assert_eq!(lexemes[2].token, None);
        assert_eq!(lexemes[2].span, Span::new(12, 13));
    }
}
