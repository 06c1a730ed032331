//! Error-tolerant recursive-descent parser for V
//!
//! Builds a [`SyntaxTree`] shaped like the tree-sitter-v grammar: the same
//! node kinds and field names, keywords and punctuation kept as unnamed
//! leaves. Input that fits nowhere is wrapped in `ERROR` nodes and expected
//! tokens that are absent become zero-width missing nodes, so parsing
//! always produces a tree.

use crate::lexer::{Lexeme, Token, tokenize};
use std::mem;
use va_span::Span;
use va_syntax::{Child, SyntaxKind, SyntaxNodeId, SyntaxTree, SyntaxTreeBuilder};

/// Builtin type names; any other name in type position is a type reference
const BUILTIN_TYPES: &[&str] = &[
    "bool", "string", "rune", "char", "byte", "int", "i8", "i16", "i32", "i64", "u8", "u16",
    "u32", "u64", "isize", "usize", "f32", "f64", "voidptr", "byteptr", "charptr", "any",
];

pub fn parse(source: &str) -> SyntaxTree {
    let mut parser = Parser::new(source);
    let root = parser.source_file();
    parser.builder.finish(root)
}

struct Parser<'src> {
    source: &'src str,
    lexemes: Vec<Lexeme>,
    pos: usize,
    last_end: u32,
    builder: SyntaxTreeBuilder,
    /// Set while parsing an `if` head, where `Name{` opens the block
    no_struct_init: bool,
}

impl<'src> Parser<'src> {
    fn new(source: &'src str) -> Self {
        Self {
            source,
            lexemes: tokenize(source),
            pos: 0,
            last_end: 0,
            builder: SyntaxTreeBuilder::new(source),
            no_struct_init: false,
        }
    }

    // === Token cursor ===

    fn nth(&self, n: usize) -> Option<Token> {
        self.lexemes.get(self.pos + n).and_then(|lexeme| lexeme.token)
    }

    fn peek(&self) -> Option<Token> {
        self.nth(0)
    }

    fn at(&self, token: Token) -> bool {
        self.peek() == Some(token)
    }

    fn at_eof(&self) -> bool {
        self.pos >= self.lexemes.len()
    }

    /// A lexeme the lexer did not recognize
    fn at_unknown(&self) -> bool {
        !self.at_eof() && self.peek().is_none()
    }

    /// Newline, `;` or end of input
    fn at_terminator(&self) -> bool {
        self.at_eof() || matches!(self.peek(), Some(Token::Newline | Token::Semicolon))
    }

    fn current_text(&self) -> &'src str {
        self.lexemes
            .get(self.pos)
            .and_then(|lexeme| self.source.get(lexeme.span.range()))
            .unwrap_or_default()
    }

    fn skip_newlines(&mut self) {
        while self.at(Token::Newline) {
            self.pos += 1;
        }
    }

    fn skip_separators(&mut self) {
        while matches!(self.peek(), Some(Token::Newline | Token::Semicolon)) {
            self.pos += 1;
        }
    }

    /// Consumes the current lexeme as a leaf of `kind`
    fn bump(&mut self, kind: SyntaxKind, named: bool) -> SyntaxNodeId {
        let span = self.lexemes[self.pos].span;
        self.pos += 1;
        self.last_end = span.end;
        self.builder.leaf(kind, named, span)
    }

    /// Consumes the current lexeme as an anonymous keyword or punctuation leaf
    fn token(&mut self) -> SyntaxNodeId {
        let kind = SyntaxKind::Other(self.current_text().to_string());
        self.bump(kind, false)
    }

    fn eat(&mut self, token: Token) -> Option<SyntaxNodeId> {
        self.at(token).then(|| self.token())
    }

    fn expect(&mut self, token: Token, text: &str) -> SyntaxNodeId {
        let last_end = self.last_end;
        self.eat(token).unwrap_or_else(|| {
            self.builder
                .missing(SyntaxKind::Other(text.to_string()), false, last_end)
        })
    }

    fn identifier(&mut self) -> SyntaxNodeId {
        if self.at(Token::Ident) {
            self.bump(SyntaxKind::Identifier, true)
        } else {
            self.builder
                .missing(SyntaxKind::Identifier, true, self.last_end)
        }
    }

    fn node(&mut self, kind: SyntaxKind, children: Vec<Child>) -> SyntaxNodeId {
        let fallback = self.last_end;
        self.builder.node(kind, children, fallback)
    }

    fn error(&mut self, leaves: Vec<SyntaxNodeId>) -> SyntaxNodeId {
        let children = leaves.into_iter().map(Child::plain).collect();
        self.node(SyntaxKind::Error, children)
    }

    /// Wraps the current lexeme in an `ERROR` node
    fn error_token(&mut self) -> SyntaxNodeId {
        let leaf = self.token();
        self.error(vec![leaf])
    }

    /// Skips to the end of the line, keeping what was skipped in an `ERROR`
    /// node. Braces opened on the way are balanced; with `in_block` set an
    /// unbalanced `}` stops recovery so the enclosing block can close.
    fn recover_line(&mut self, in_block: bool) -> Option<SyntaxNodeId> {
        let mut leaves = Vec::new();
        let mut depth = 0usize;
        while !self.at_eof() {
            match self.peek() {
                Some(Token::Newline | Token::Semicolon) if depth == 0 => break,
                Some(Token::RBrace) if depth == 0 && in_block => break,
                Some(Token::LBrace) => depth += 1,
                Some(Token::RBrace) => depth = depth.saturating_sub(1),
                _ => {}
            }
            if self.at(Token::Newline) {
                self.pos += 1;
                continue;
            }
            leaves.push(self.token());
        }
        (!leaves.is_empty()).then(|| self.error(leaves))
    }

    /// The lexeme just consumed was a real `}`
    fn after_closing_brace(&self) -> bool {
        self.pos
            .checked_sub(1)
            .and_then(|previous| self.lexemes.get(previous))
            .is_some_and(|lexeme| lexeme.token == Some(Token::RBrace))
    }

    /// After a statement, anything before the terminator is an error. A
    /// statement ending in `}` is terminated already, so the next one may
    /// follow on the same line.
    fn finish_statement(&mut self, children: &mut Vec<Child>, in_block: bool) {
        if self.at_terminator()
            || (in_block && self.at(Token::RBrace))
            || self.after_closing_brace()
        {
            return;
        }
        if let Some(error) = self.recover_line(in_block) {
            children.push(Child::plain(error));
        }
    }

    // === Items ===

    fn source_file(&mut self) -> SyntaxNodeId {
        let mut children = Vec::new();

        self.skip_separators();
        if self.at(Token::Module) {
            children.push(Child::plain(self.module_clause()));
            self.finish_statement(&mut children, false);
        }

        self.skip_separators();
        if self.at(Token::Import) {
            children.push(Child::plain(self.import_list()));
        }

        loop {
            self.skip_separators();
            if self.at_eof() {
                break;
            }
            if self.at_unknown() {
                children.push(Child::plain(self.error_token()));
                continue;
            }
            let statement = self.statement(false);
            children.push(Child::plain(statement));
            self.finish_statement(&mut children, false);
        }

        let span = Span::new(0, self.source.len() as u32);
        self.builder
            .node_with_span(SyntaxKind::SourceFile, true, span, children)
    }

    fn module_clause(&mut self) -> SyntaxNodeId {
        let keyword = self.token();
        let name = self.identifier();
        self.node(
            SyntaxKind::ModuleClause,
            vec![Child::plain(keyword), Child::field("name", name)],
        )
    }

    fn import_list(&mut self) -> SyntaxNodeId {
        let mut children = Vec::new();
        while self.at(Token::Import) {
            children.push(Child::plain(self.import_declaration()));
            self.finish_statement(&mut children, false);
            self.skip_separators();
        }
        self.node(SyntaxKind::ImportList, children)
    }

    fn import_declaration(&mut self) -> SyntaxNodeId {
        let keyword = self.token();
        let spec = self.import_spec();
        self.node(
            SyntaxKind::ImportDeclaration,
            vec![Child::plain(keyword), Child::field("spec", spec)],
        )
    }

    fn import_spec(&mut self) -> SyntaxNodeId {
        let mut segments = vec![Child::plain(self.import_name())];
        while self.at(Token::Dot) {
            segments.push(Child::plain(self.token()));
            segments.push(Child::plain(self.import_name()));
        }
        let path = self.node(SyntaxKind::ImportPath, segments);

        let mut children = vec![Child::field("path", path)];
        if self.at(Token::As) {
            let keyword = self.token();
            let name = self.import_name();
            let alias = self.node(
                SyntaxKind::ImportAlias,
                vec![Child::plain(keyword), Child::field("name", name)],
            );
            children.push(Child::field("alias", alias));
        }
        self.node(SyntaxKind::ImportSpec, children)
    }

    fn import_name(&mut self) -> SyntaxNodeId {
        if self.at(Token::Ident) {
            self.bump(SyntaxKind::ImportName, true)
        } else {
            self.builder
                .missing(SyntaxKind::ImportName, true, self.last_end)
        }
    }

    fn statement(&mut self, in_block: bool) -> SyntaxNodeId {
        match self.peek() {
            Some(Token::Pub) => match self.nth(1) {
                Some(Token::Fn) => {
                    let visibility = self.token();
                    self.function_declaration(Some(visibility))
                }
                Some(Token::Struct) => {
                    let visibility = self.token();
                    self.struct_declaration(Some(visibility))
                }
                _ => self.recover_line(in_block).unwrap_or_else(|| self.error_token()),
            },
            Some(Token::Fn) => self.function_declaration(None),
            Some(Token::Struct) => self.struct_declaration(None),
            Some(Token::Return) => self.return_statement(in_block),
            Some(Token::Assert) => {
                let keyword = self.token();
                let expression = self.expression();
                self.node(
                    SyntaxKind::AssertStatement,
                    vec![Child::plain(keyword), Child::plain(expression)],
                )
            }
            _ if self.at_var_declaration() => self.var_declaration(),
            _ => self.expression_statement(),
        }
    }

    fn struct_declaration(&mut self, visibility: Option<SyntaxNodeId>) -> SyntaxNodeId {
        let mut children: Vec<Child> = visibility.into_iter().map(Child::plain).collect();
        children.push(Child::plain(self.token()));
        children.push(Child::field("name", self.identifier()));
        children.push(Child::plain(self.expect(Token::LBrace, "{")));

        loop {
            self.skip_separators();
            if self.at_eof() || self.at(Token::RBrace) {
                break;
            }
            children.push(Child::plain(self.struct_fields_group()));
        }

        children.push(Child::plain(self.expect(Token::RBrace, "}")));
        self.node(SyntaxKind::StructDeclaration, children)
    }

    fn at_field_scope(&self) -> bool {
        match self.peek() {
            Some(Token::Pub) => true,
            Some(Token::Mut) => self.nth(1) == Some(Token::Colon),
            _ => false,
        }
    }

    /// Fields up to the next `pub:`/`mut:`/`pub mut:` label or the closing brace
    fn struct_fields_group(&mut self) -> SyntaxNodeId {
        let mut children = Vec::new();

        if self.at_field_scope() {
            let mut labels = Vec::new();
            while matches!(self.peek(), Some(Token::Pub | Token::Mut)) {
                labels.push(Child::plain(self.token()));
            }
            labels.push(Child::plain(self.expect(Token::Colon, ":")));
            let scope = self.node(SyntaxKind::StructFieldScope, labels);
            children.push(Child::field("scope", scope));
        }

        loop {
            self.skip_separators();
            if self.at_eof() || self.at(Token::RBrace) || self.at_field_scope() {
                break;
            }
            if self.at(Token::Ident) {
                children.push(Child::plain(self.field_declaration()));
                self.finish_statement(&mut children, true);
            } else if let Some(error) = self.recover_line(true) {
                children.push(Child::plain(error));
            }
        }

        self.node(SyntaxKind::StructFieldsGroup, children)
    }

    fn field_declaration(&mut self) -> SyntaxNodeId {
        let name = self.identifier();
        let ty = self.plain_type();
        let mut children = vec![Child::field("name", name), Child::field("type", ty)];
        if self.at(Token::Eq) {
            let equals = self.token();
            let value = self.expression();
            let default = self.node(
                SyntaxKind::DefaultValue,
                vec![Child::plain(equals), Child::field("value", value)],
            );
            children.push(Child::field("default_value", default));
        }
        self.node(SyntaxKind::FieldDeclaration, children)
    }

    fn function_declaration(&mut self, visibility: Option<SyntaxNodeId>) -> SyntaxNodeId {
        let mut children: Vec<Child> = visibility.into_iter().map(Child::plain).collect();
        children.push(Child::plain(self.token()));
        if self.at(Token::LParen) {
            children.push(Child::field("receiver", self.parameter_list()));
        }
        children.push(Child::field("name", self.identifier()));
        children.push(Child::field("parameters", self.parameter_list()));
        if self.at_type_start() {
            children.push(Child::field("result", self.plain_type()));
        }
        children.push(Child::field("body", self.block()));
        self.node(SyntaxKind::FunctionDeclaration, children)
    }

    fn parameter_list(&mut self) -> SyntaxNodeId {
        let mut children = vec![Child::plain(self.expect(Token::LParen, "("))];
        loop {
            self.skip_newlines();
            match self.peek() {
                Some(Token::Ident | Token::Mut) => {
                    children.push(Child::plain(self.parameter_declaration()));
                }
                Some(Token::RParen | Token::LBrace) => break,
                _ if self.at_eof() => break,
                _ => children.push(Child::plain(self.error_token())),
            }
            self.skip_newlines();
            match self.eat(Token::Comma) {
                Some(comma) => children.push(Child::plain(comma)),
                None if self.at(Token::RParen) => break,
                None if matches!(self.peek(), Some(Token::Ident | Token::Mut)) => {}
                None => break,
            }
        }
        children.push(Child::plain(self.expect(Token::RParen, ")")));
        self.node(SyntaxKind::ParameterList, children)
    }

    fn parameter_declaration(&mut self) -> SyntaxNodeId {
        let mut children = Vec::new();
        if let Some(modifier) = self.eat(Token::Mut) {
            children.push(Child::plain(modifier));
        }
        children.push(Child::field("name", self.identifier()));
        if let Some(dots) = self.eat(Token::Ellipsis) {
            children.push(Child::field("variadic", dots));
        }
        children.push(Child::field("type", self.plain_type()));
        self.node(SyntaxKind::ParameterDeclaration, children)
    }

    fn block(&mut self) -> SyntaxNodeId {
        let mut children = vec![Child::plain(self.expect(Token::LBrace, "{"))];
        loop {
            self.skip_separators();
            if self.at_eof() || self.at(Token::RBrace) {
                break;
            }
            if self.at_unknown() {
                children.push(Child::plain(self.error_token()));
                continue;
            }
            let statement = self.statement(true);
            children.push(Child::plain(statement));
            self.finish_statement(&mut children, true);
        }
        children.push(Child::plain(self.expect(Token::RBrace, "}")));
        self.node(SyntaxKind::Block, children)
    }

    // === Types ===

    fn at_type_start(&self) -> bool {
        matches!(
            self.peek(),
            Some(Token::Ident | Token::LBracket | Token::Question | Token::Amp)
        )
    }

    fn plain_type(&mut self) -> SyntaxNodeId {
        let inner = self.type_node();
        self.node(SyntaxKind::PlainType, vec![Child::plain(inner)])
    }

    fn type_node(&mut self) -> SyntaxNodeId {
        match self.peek() {
            Some(Token::Ident) if BUILTIN_TYPES.contains(&self.current_text()) => {
                self.bump(SyntaxKind::BuiltinType, true)
            }
            Some(Token::Ident) => {
                let mut children = vec![Child::plain(self.identifier())];
                if self.at(Token::Dot) && self.nth(1) == Some(Token::Ident) {
                    children.push(Child::plain(self.token()));
                    children.push(Child::plain(self.identifier()));
                }
                self.node(SyntaxKind::TypeReferenceExpression, children)
            }
            Some(Token::LBracket) => {
                let open = self.token();
                let close = self.expect(Token::RBracket, "]");
                let element = self.plain_type();
                self.node(
                    SyntaxKind::ArrayType,
                    vec![
                        Child::plain(open),
                        Child::plain(close),
                        Child::field("element", element),
                    ],
                )
            }
            Some(Token::Question) => self.prefixed_type(SyntaxKind::OptionType),
            Some(Token::Amp) => self.prefixed_type(SyntaxKind::PointerType),
            _ => self
                .builder
                .missing(SyntaxKind::TypeReferenceExpression, true, self.last_end),
        }
    }

    fn prefixed_type(&mut self, kind: SyntaxKind) -> SyntaxNodeId {
        let prefix = self.token();
        let inner = self.plain_type();
        self.node(kind, vec![Child::plain(prefix), Child::plain(inner)])
    }

    // === Statements ===

    /// `mut? name (, mut? name)* :=` ahead
    fn at_var_declaration(&self) -> bool {
        let mut offset = 0;
        loop {
            if self.nth(offset) == Some(Token::Mut) {
                offset += 1;
            }
            if self.nth(offset) != Some(Token::Ident) {
                return false;
            }
            offset += 1;
            match self.nth(offset) {
                Some(Token::Comma) => offset += 1,
                Some(Token::ColonEq) => return true,
                _ => return false,
            }
        }
    }

    fn var_declaration(&mut self) -> SyntaxNodeId {
        let mut names = Vec::new();
        loop {
            if let Some(modifier) = self.eat(Token::Mut) {
                names.push(Child::plain(modifier));
            }
            names.push(Child::plain(self.identifier()));
            match self.eat(Token::Comma) {
                Some(comma) => names.push(Child::plain(comma)),
                None => break,
            }
        }
        let var_list = self.node(SyntaxKind::ExpressionList, names);
        let operator = self.expect(Token::ColonEq, ":=");
        let values = self.expression_list();
        self.node(
            SyntaxKind::VarDeclaration,
            vec![
                Child::field("var_list", var_list),
                Child::plain(operator),
                Child::field("expression_list", values),
            ],
        )
    }

    fn return_statement(&mut self, in_block: bool) -> SyntaxNodeId {
        let mut children = vec![Child::plain(self.token())];
        let ends_here = self.at_terminator() || (in_block && self.at(Token::RBrace));
        if !ends_here {
            children.push(Child::plain(self.expression_list()));
        }
        self.node(SyntaxKind::ReturnStatement, children)
    }

    fn expression_statement(&mut self) -> SyntaxNodeId {
        let start = self.pos;
        let expression = self.expression();
        if self.pos == start && !self.at_eof() && !self.at(Token::RBrace) {
            return self.error_token();
        }

        if self.at(Token::Eq) {
            let left = self.node(SyntaxKind::ExpressionList, vec![Child::plain(expression)]);
            let operator = self.token();
            let right = self.expression_list();
            return self.node(
                SyntaxKind::AssignmentStatement,
                vec![
                    Child::field("left", left),
                    Child::plain(operator),
                    Child::field("right", right),
                ],
            );
        }

        self.node(SyntaxKind::SimpleStatement, vec![Child::plain(expression)])
    }

    // === Expressions ===

    fn expression_list(&mut self) -> SyntaxNodeId {
        let mut children = vec![Child::plain(self.expression())];
        while let Some(comma) = self.eat(Token::Comma) {
            children.push(Child::plain(comma));
            children.push(Child::plain(self.expression()));
        }
        self.node(SyntaxKind::ExpressionList, children)
    }

    fn expression(&mut self) -> SyntaxNodeId {
        self.binary_expression(1)
    }

    fn binary_expression(&mut self, min_precedence: u8) -> SyntaxNodeId {
        let mut left = self.unary_expression();
        while let Some(precedence) = self.peek().and_then(Token::binary_precedence) {
            if precedence < min_precedence {
                break;
            }
            let operator = self.token();
            let right = self.binary_expression(precedence + 1);
            left = self.node(
                SyntaxKind::BinaryExpression,
                vec![
                    Child::field("left", left),
                    Child::field("operator", operator),
                    Child::field("right", right),
                ],
            );
        }
        left
    }

    fn unary_expression(&mut self) -> SyntaxNodeId {
        if matches!(self.peek(), Some(Token::Bang | Token::Minus | Token::Amp)) {
            let operator = self.token();
            let operand = self.unary_expression();
            return self.node(
                SyntaxKind::UnaryExpression,
                vec![
                    Child::field("operator", operator),
                    Child::field("operand", operand),
                ],
            );
        }
        let primary = self.primary_expression();
        self.postfix_expression(primary)
    }

    fn postfix_expression(&mut self, mut operand: SyntaxNodeId) -> SyntaxNodeId {
        loop {
            match self.peek() {
                Some(Token::Dot) => {
                    let dot = self.token();
                    let field = self.identifier();
                    operand = self.node(
                        SyntaxKind::SelectorExpression,
                        vec![
                            Child::field("operand", operand),
                            Child::plain(dot),
                            Child::field("field", field),
                        ],
                    );
                }
                Some(Token::LParen) => {
                    let arguments = self.argument_list();
                    operand = self.node(
                        SyntaxKind::CallExpression,
                        vec![
                            Child::field("function", operand),
                            Child::field("arguments", arguments),
                        ],
                    );
                }
                _ => return operand,
            }
        }
    }

    fn primary_expression(&mut self) -> SyntaxNodeId {
        match self.peek() {
            Some(Token::Int) => self.literal(SyntaxKind::IntLiteral),
            Some(Token::Float) => self.literal(SyntaxKind::FloatLiteral),
            Some(Token::Str) => self.literal(SyntaxKind::InterpretedStringLiteral),
            Some(Token::True) => self.literal(SyntaxKind::True),
            Some(Token::False) => self.literal(SyntaxKind::False),
            Some(Token::NoneKw) => self.literal(SyntaxKind::None),
            Some(Token::Ident) => {
                let starts_upper = self
                    .current_text()
                    .starts_with(|first: char| first.is_ascii_uppercase());
                if starts_upper && self.nth(1) == Some(Token::LBrace) && !self.no_struct_init {
                    self.type_initializer()
                } else {
                    let identifier = self.identifier();
                    self.node(
                        SyntaxKind::ReferenceExpression,
                        vec![Child::plain(identifier)],
                    )
                }
            }
            Some(Token::LParen) => {
                let open = self.token();
                let inner = self.nested(Self::expression);
                let close = self.expect(Token::RParen, ")");
                self.node(
                    SyntaxKind::ParenthesizedExpression,
                    vec![Child::plain(open), Child::plain(inner), Child::plain(close)],
                )
            }
            Some(Token::LBracket) => self.array_creation(),
            Some(Token::If) => self.if_expression(),
            Some(
                Token::Newline
                | Token::Semicolon
                | Token::RParen
                | Token::RBrace
                | Token::RBracket
                | Token::Comma,
            ) => self
                .builder
                .missing(SyntaxKind::Identifier, true, self.last_end),
            _ if self.at_eof() => self
                .builder
                .missing(SyntaxKind::Identifier, true, self.last_end),
            _ => self.error_token(),
        }
    }

    fn literal(&mut self, kind: SyntaxKind) -> SyntaxNodeId {
        let value = self.bump(kind, true);
        self.node(SyntaxKind::Literal, vec![Child::plain(value)])
    }

    /// Runs `parse` with struct initializers allowed again, as inside
    /// parentheses and braces
    fn nested(&mut self, parse: fn(&mut Self) -> SyntaxNodeId) -> SyntaxNodeId {
        let saved = mem::replace(&mut self.no_struct_init, false);
        let id = parse(self);
        self.no_struct_init = saved;
        id
    }

    fn array_creation(&mut self) -> SyntaxNodeId {
        let mut children = vec![Child::plain(self.token())];
        loop {
            self.skip_newlines();
            if self.at_eof() || self.at(Token::RBracket) {
                break;
            }
            let start = self.pos;
            children.push(Child::plain(self.nested(Self::expression)));
            if self.pos == start {
                break;
            }
            self.skip_newlines();
            match self.eat(Token::Comma) {
                Some(comma) => children.push(Child::plain(comma)),
                None => break,
            }
        }
        children.push(Child::plain(self.expect(Token::RBracket, "]")));
        self.node(SyntaxKind::ArrayCreation, children)
    }

    fn argument_list(&mut self) -> SyntaxNodeId {
        let mut children = vec![Child::plain(self.token())];
        loop {
            self.skip_newlines();
            if self.at_eof() || self.at(Token::RParen) {
                break;
            }
            let start = self.pos;
            let expression = self.nested(Self::expression);
            if self.pos == start {
                break;
            }
            children.push(Child::plain(
                self.node(SyntaxKind::Argument, vec![Child::plain(expression)]),
            ));
            self.skip_newlines();
            match self.eat(Token::Comma) {
                Some(comma) => children.push(Child::plain(comma)),
                None => break,
            }
        }
        children.push(Child::plain(self.expect(Token::RParen, ")")));
        self.node(SyntaxKind::ArgumentList, children)
    }

    fn type_initializer(&mut self) -> SyntaxNodeId {
        let ty = self.plain_type();
        let body = self.literal_value();
        self.node(
            SyntaxKind::TypeInitializer,
            vec![Child::field("type", ty), Child::field("body", body)],
        )
    }

    fn literal_value(&mut self) -> SyntaxNodeId {
        let saved = mem::replace(&mut self.no_struct_init, false);
        let mut children = vec![Child::plain(self.expect(Token::LBrace, "{"))];

        self.skip_separators();
        if self.at(Token::Ident) && self.nth(1) == Some(Token::Colon) {
            children.push(Child::plain(self.element_list()));
        } else if !self.at(Token::RBrace) && !self.at_eof() {
            children.push(Child::plain(self.short_element_list()));
        }

        self.skip_separators();
        children.push(Child::plain(self.expect(Token::RBrace, "}")));
        self.no_struct_init = saved;
        self.node(SyntaxKind::LiteralValue, children)
    }

    fn element_list(&mut self) -> SyntaxNodeId {
        let mut children = Vec::new();
        loop {
            self.skip_separators();
            if self.at_eof() || self.at(Token::RBrace) {
                break;
            }
            if self.at(Token::Ident) && self.nth(1) == Some(Token::Colon) {
                children.push(Child::plain(self.keyed_element()));
            } else {
                children.push(Child::plain(self.error_token()));
            }
            if let Some(comma) = self.eat(Token::Comma) {
                children.push(Child::plain(comma));
            }
        }
        self.node(SyntaxKind::ElementList, children)
    }

    fn keyed_element(&mut self) -> SyntaxNodeId {
        let identifier = self.identifier();
        let reference = self.node(
            SyntaxKind::ReferenceExpression,
            vec![Child::plain(identifier)],
        );
        let key = self.node(SyntaxKind::FieldName, vec![Child::plain(reference)]);
        let colon = self.token();
        let value = self.expression();
        self.node(
            SyntaxKind::KeyedElement,
            vec![
                Child::field("key", key),
                Child::plain(colon),
                Child::field("value", value),
            ],
        )
    }

    fn short_element_list(&mut self) -> SyntaxNodeId {
        let mut children = Vec::new();
        loop {
            self.skip_separators();
            if self.at_eof() || self.at(Token::RBrace) {
                break;
            }
            let start = self.pos;
            let element = self.expression();
            if self.pos == start {
                children.push(Child::plain(self.error_token()));
            } else {
                children.push(Child::plain(element));
            }
            if let Some(comma) = self.eat(Token::Comma) {
                children.push(Child::plain(comma));
            }
        }
        self.node(SyntaxKind::ShortElementList, children)
    }

    fn if_expression(&mut self) -> SyntaxNodeId {
        let mut children = vec![Child::plain(self.token())];

        let saved = mem::replace(&mut self.no_struct_init, true);
        if self.at_var_declaration() {
            children.push(Child::field("guard", self.var_declaration()));
        } else {
            children.push(Child::field("condition", self.expression()));
        }
        self.no_struct_init = saved;

        children.push(Child::field("block", self.block()));

        if self.at(Token::Else) {
            children.push(Child::plain(self.token()));
            let branch = if self.at(Token::If) {
                self.if_expression()
            } else {
                self.block()
            };
            children.push(Child::field("else_branch", branch));
        }

        self.node(SyntaxKind::IfExpression, children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use expect_test::{Expect, expect};
    use va_span::Point;

    fn check(source: &str, expected: Expect) {
        expected.assert_eq(&parse(source).to_sexp());
    }

    #[test]
    fn test_module_and_imports() {
        check(
            "module main\n\nimport os\nimport net.http as web\n",
            expect![[r"(source_file (module_clause name: (identifier)) (import_list (import_declaration spec: (import_spec path: (import_path (import_name)))) (import_declaration spec: (import_spec path: (import_path (import_name) (import_name)) alias: (import_alias name: (import_name))))))"]],
        );
    }

    #[test]
    fn test_struct_declaration() {
        check(
            "struct Foo {\n\tname string\npub mut:\n\tage int = 3\n}",
            expect![[r"(source_file (struct_declaration name: (identifier) (struct_fields_group (field_declaration name: (identifier) type: (plain_type (builtin_type)))) (struct_fields_group scope: (struct_field_scope) (field_declaration name: (identifier) type: (plain_type (builtin_type)) default_value: (default_value value: (literal (int_literal)))))))"]],
        );
    }

    #[test]
    fn test_function_declaration() {
        check(
            "fn take_int(i int) int { return 100 }",
            expect![[r"(source_file (function_declaration name: (identifier) parameters: (parameter_list (parameter_declaration name: (identifier) type: (plain_type (builtin_type)))) result: (plain_type (builtin_type)) body: (block (return_statement (expression_list (literal (int_literal)))))))"]],
        );
    }

    #[test]
    fn test_variadic_parameter() {
        check(
            "fn sum(xs ...int) {}",
            expect![[r"(source_file (function_declaration name: (identifier) parameters: (parameter_list (parameter_declaration name: (identifier) type: (plain_type (builtin_type)))) body: (block)))"]],
        );
        let tree = parse("fn sum(xs ...int) {}");
        let function = tree.root().child(0).unwrap();
        let parameter = function
            .child_by_field_name("parameters")
            .unwrap()
            .first_named_child()
            .unwrap();
        assert!(parameter.child_by_field_name("variadic").is_some());
    }

    #[test]
    fn test_type_initializer() {
        check(
            "f := Foo{ name: 'foo', blabla: 100 }",
            expect![[r"(source_file (var_declaration var_list: (expression_list (identifier)) expression_list: (expression_list (type_initializer type: (plain_type (type_reference_expression (identifier))) body: (literal_value (element_list (keyed_element key: (field_name (reference_expression (identifier))) value: (literal (interpreted_string_literal))) (keyed_element key: (field_name (reference_expression (identifier))) value: (literal (int_literal)))))))))"]],
        );
    }

    #[test]
    fn test_short_element_list() {
        check(
            "p := Point{1, 2}",
            expect![[r"(source_file (var_declaration var_list: (expression_list (identifier)) expression_list: (expression_list (type_initializer type: (plain_type (type_reference_expression (identifier))) body: (literal_value (short_element_list (literal (int_literal)) (literal (int_literal))))))))"]],
        );
    }

    #[test]
    fn test_if_else_chain() {
        check(
            "if a { } else if b { } else { }",
            expect![[r"(source_file (simple_statement (if_expression condition: (reference_expression (identifier)) block: (block) else_branch: (if_expression condition: (reference_expression (identifier)) block: (block) else_branch: (block)))))"]],
        );
    }

    #[test]
    fn test_if_guard() {
        check(
            "if x := find() { }",
            expect![[r"(source_file (simple_statement (if_expression guard: (var_declaration var_list: (expression_list (identifier)) expression_list: (expression_list (call_expression function: (reference_expression (identifier)) arguments: (argument_list)))) block: (block))))"]],
        );
    }

    #[test]
    fn test_if_condition_does_not_start_initializer() {
        check(
            "if Ready { }",
            expect![[r"(source_file (simple_statement (if_expression condition: (reference_expression (identifier)) block: (block))))"]],
        );
    }

    #[test]
    fn test_call_and_binary_precedence() {
        check(
            "take_int(1 + 2 * 3, x == y)",
            expect![[r"(source_file (simple_statement (call_expression function: (reference_expression (identifier)) arguments: (argument_list (argument (binary_expression left: (literal (int_literal)) right: (binary_expression left: (literal (int_literal)) right: (literal (int_literal))))) (argument (binary_expression left: (reference_expression (identifier)) right: (reference_expression (identifier))))))))"]],
        );
    }

    #[test]
    fn test_assert_and_assignment() {
        check(
            "fn f() {\n\tassert true\n\tx = 2\n}",
            expect![[r"(source_file (function_declaration name: (identifier) parameters: (parameter_list) body: (block (assert_statement (literal (true))) (assignment_statement left: (expression_list (reference_expression (identifier))) right: (expression_list (literal (int_literal)))))))"]],
        );
    }

    #[test]
    fn test_recovers_from_junk() {
        let tree = parse("fn main() {\n\tx := 1 )\n}\n# y := 2\n");
        let root = tree.root();

        assert!(root.has_error());
        assert_eq!(
            tree.to_sexp(),
            "(source_file (function_declaration name: (identifier) parameters: (parameter_list) body: (block (var_declaration var_list: (expression_list (identifier)) expression_list: (expression_list (literal (int_literal)))) (ERROR))) (ERROR) (var_declaration var_list: (expression_list (identifier)) expression_list: (expression_list (literal (int_literal)))))"
        );
    }

    #[test]
    fn test_declarations_share_a_line() {
        check(
            "struct Foo { name string } fn f() int { return 1 } x := Foo{ name: 'a' }",
            expect![[r"(source_file (struct_declaration name: (identifier) (struct_fields_group (field_declaration name: (identifier) type: (plain_type (builtin_type))))) (function_declaration name: (identifier) parameters: (parameter_list) result: (plain_type (builtin_type)) body: (block (return_statement (expression_list (literal (int_literal)))))) (var_declaration var_list: (expression_list (identifier)) expression_list: (expression_list (type_initializer type: (plain_type (type_reference_expression (identifier))) body: (literal_value (element_list (keyed_element key: (field_name (reference_expression (identifier))) value: (literal (interpreted_string_literal)))))))))"]],
        );
    }

    #[test]
    fn test_text_after_expression_still_an_error() {
        let tree = parse("x := 1 2\ny := 3\n");
        assert_eq!(
            tree.to_sexp(),
            "(source_file (var_declaration var_list: (expression_list (identifier)) expression_list: (expression_list (literal (int_literal)))) (ERROR) (var_declaration var_list: (expression_list (identifier)) expression_list: (expression_list (literal (int_literal)))))"
        );
    }

    #[test]
    fn test_missing_tokens() {
        let tree = parse("fn main( {");
        assert!(tree.root().has_error());
        assert_eq!(
            tree.to_sexp(),
            "(source_file (function_declaration name: (identifier) parameters: (parameter_list) body: (block)))"
        );
    }

    #[test]
    fn test_spans_cover_source() {
        let source = "module foo\nx := 1\n";
        let tree = parse(source);

        assert_eq!(tree.root().end_byte() as usize, source.len());
        let declaration = tree.root().child(1).unwrap();
        assert_eq!(declaration.text(), "x := 1");
        assert_eq!(declaration.start_point(), Point::new(1, 0));
    }
}
