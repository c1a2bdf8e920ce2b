use crate::error::ParseError;
use crate::ir::ast::{Expression, Identifier, Program, Statement};

use super::lexer::Lexer;
use super::token::{Token, TokenKind};

/// Deepest expression nesting accepted before giving up on a statement.
const MAX_NESTING_DEPTH: usize = 200;

/// An expression together with the height of its tree.
type Parsed = (Expression, usize);

/// Binding strength of operators, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Lowest,
    Equals,      // ==
    LessGreater, // > or <
    Sum,         // +
    Product,     // *
    Prefix,      // -x or !x
    Call,        // add(x)
}

pub fn precedence_of(kind: TokenKind) -> Precedence {
    match kind {
        TokenKind::Eq | TokenKind::NotEq => Precedence::Equals,
        TokenKind::Lt | TokenKind::Gt => Precedence::LessGreater,
        TokenKind::Plus | TokenKind::Minus => Precedence::Sum,
        TokenKind::Asterisk | TokenKind::Slash => Precedence::Product,
        TokenKind::LParen => Precedence::Call,
        _ => Precedence::Lowest,
    }
}

/// Pulls tokens from a [`Lexer`] with one token of lookahead and builds a
/// [`Program`]. Problems are collected, never raised.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    peek: Token,
    diagnostics: Vec<ParseError>,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(mut lexer: Lexer<'a>) -> Self {
        let current = lexer.next_token();
        let peek = lexer.next_token();
        Self {
            lexer,
            current,
            peek,
            diagnostics: Vec::new(),
            depth: 0,
        }
    }

    pub fn diagnostics(&self) -> &[ParseError] {
        &self.diagnostics
    }

    /// Diagnostics rendered as messages, in the order they were found.
    pub fn errors(&self) -> Vec<String> {
        self.diagnostics.iter().map(ToString::to_string).collect()
    }

    pub fn into_diagnostics(self) -> Vec<ParseError> {
        self.diagnostics
    }

    pub fn parse_program(&mut self) -> Program {
        let mut statements = Vec::new();

        while !self.current.is(TokenKind::Eof) {
            match self.parse_statement() {
                Some(statement) => statements.push(statement),
                None => self.synchronize(),
            }
            self.next_token();
        }

        Program { statements }
    }

    fn parse_statement(&mut self) -> Option<Statement> {
        match self.current.kind {
            TokenKind::Let => self.parse_let_statement(),
            TokenKind::Return => self.parse_return_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_let_statement(&mut self) -> Option<Statement> {
        let token = self.current.clone();

        if !self.expect_peek(TokenKind::Ident) {
            return None;
        }
        let name = self.parse_identifier();

        if !self.expect_peek(TokenKind::Assign) {
            return None;
        }
        self.next_token(); // consume '='

        let value = self.parse_expression(Precedence::Lowest)?;
        self.skip_semicolon();

        Some(Statement::Let { token, name, value })
    }

    fn parse_return_statement(&mut self) -> Option<Statement> {
        let token = self.current.clone();

        let value = match self.peek.kind {
            TokenKind::Semicolon | TokenKind::RBrace | TokenKind::Eof => None,
            _ => {
                self.next_token(); // consume 'return'
                Some(self.parse_expression(Precedence::Lowest)?)
            }
        };
        self.skip_semicolon();

        Some(Statement::Return { token, value })
    }

    fn parse_expression_statement(&mut self) -> Option<Statement> {
        let token = self.current.clone();
        let expression = self.parse_expression(Precedence::Lowest)?;
        self.skip_semicolon();

        Some(Statement::Expression { token, expression })
    }

    fn parse_expression(&mut self, precedence: Precedence) -> Option<Expression> {
        self.parse_nested(precedence).map(|(expression, _)| expression)
    }

    /// Parses one expression and reports its tree height. Both the recursion
    /// depth and the height of the result stay within `MAX_NESTING_DEPTH`.
    fn parse_nested(&mut self, precedence: Precedence) -> Option<Parsed> {
        if self.depth >= MAX_NESTING_DEPTH {
            self.too_deeply_nested();
            return None;
        }

        self.depth += 1;
        let parsed = self.parse_nested_inner(precedence);
        self.depth -= 1;

        match parsed {
            Some((_, height)) if height > MAX_NESTING_DEPTH => {
                self.too_deeply_nested();
                None
            }
            parsed => parsed,
        }
    }

    fn parse_nested_inner(&mut self, precedence: Precedence) -> Option<Parsed> {
        let mut left = self.parse_prefix()?;

        while !self.peek.is(TokenKind::Semicolon) && precedence < precedence_of(self.peek.kind) {
            self.next_token();
            left = self.parse_infix(left)?;
            // left-associative chains grow the tree without recursing
            if left.1 > MAX_NESTING_DEPTH {
                self.too_deeply_nested();
                return None;
            }
        }

        Some(left)
    }

    fn parse_prefix(&mut self) -> Option<Parsed> {
        match self.current.kind {
            TokenKind::Ident => Some((Expression::Identifier(self.parse_identifier()), 1)),
            TokenKind::Int => self.parse_integer_literal().map(|literal| (literal, 1)),
            TokenKind::True | TokenKind::False => {
                let boolean = Expression::Boolean {
                    token: self.current.clone(),
                    value: self.current.is(TokenKind::True),
                };
                Some((boolean, 1))
            }
            TokenKind::Bang | TokenKind::Minus => self.parse_prefix_expression(),
            TokenKind::LParen => self.parse_grouped_expression(),
            kind => {
                self.diagnostics.push(ParseError::NoPrefixParseFn {
                    kind,
                    span: self.current.span,
                });
                None
            }
        }
    }

    fn parse_infix(&mut self, left: Parsed) -> Option<Parsed> {
        match self.current.kind {
            TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Asterisk
            | TokenKind::Slash
            | TokenKind::Lt
            | TokenKind::Gt
            | TokenKind::Eq
            | TokenKind::NotEq => self.parse_infix_expression(left),
            TokenKind::LParen => self.parse_call_expression(left),
            // precedence_of keeps all of these at Lowest, so the loop never
            // hands them over
            TokenKind::Eof
            | TokenKind::Illegal
            | TokenKind::Ident
            | TokenKind::Int
            | TokenKind::Assign
            | TokenKind::Bang
            | TokenKind::Comma
            | TokenKind::Semicolon
            | TokenKind::RParen
            | TokenKind::LBrace
            | TokenKind::RBrace
            | TokenKind::Function
            | TokenKind::Let
            | TokenKind::True
            | TokenKind::False
            | TokenKind::If
            | TokenKind::Else
            | TokenKind::Return => Some(left),
        }
    }

    fn parse_identifier(&self) -> Identifier {
        Identifier {
            token: self.current.clone(),
            value: self.current.literal.clone(),
        }
    }

    fn parse_integer_literal(&mut self) -> Option<Expression> {
        match self.current.literal.parse::<i64>() {
            Ok(value) => Some(Expression::IntegerLiteral {
                token: self.current.clone(),
                value,
            }),
            Err(_) => {
                self.diagnostics.push(ParseError::InvalidInteger {
                    literal: self.current.literal.clone(),
                    span: self.current.span,
                });
                None
            }
        }
    }

    fn parse_prefix_expression(&mut self) -> Option<Parsed> {
        let token = self.current.clone();
        self.next_token(); // consume operator

        let (right, height) = self.parse_nested(Precedence::Prefix)?;
        let prefix = Expression::Prefix {
            operator: token.literal.clone(),
            token,
            right: Box::new(right),
        };
        Some((prefix, height + 1))
    }

    fn parse_infix_expression(&mut self, (left, left_height): Parsed) -> Option<Parsed> {
        let token = self.current.clone();
        let precedence = precedence_of(token.kind);
        self.next_token(); // consume operator

        let (right, right_height) = self.parse_nested(precedence)?;
        let infix = Expression::Infix {
            operator: token.literal.clone(),
            token,
            left: Box::new(left),
            right: Box::new(right),
        };
        Some((infix, left_height.max(right_height) + 1))
    }

    fn parse_grouped_expression(&mut self) -> Option<Parsed> {
        self.next_token(); // consume '('

        let grouped = self.parse_nested(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }
        Some(grouped)
    }

    fn parse_call_expression(&mut self, (function, function_height): Parsed) -> Option<Parsed> {
        let token = self.current.clone();
        let (arguments, arguments_height) = self.parse_call_arguments()?;
        let call = Expression::Call {
            token,
            function: Box::new(function),
            arguments,
        };
        Some((call, function_height.max(arguments_height) + 1))
    }

    /// Arguments up to the closing `)`, with the tallest argument's height.
    fn parse_call_arguments(&mut self) -> Option<(Vec<Expression>, usize)> {
        let mut arguments = Vec::new();
        let mut height = 0;

        if self.peek.is(TokenKind::RParen) {
            self.next_token();
            return Some((arguments, height));
        }

        loop {
            self.next_token();
            let (argument, argument_height) = self.parse_nested(Precedence::Lowest)?;
            arguments.push(argument);
            height = height.max(argument_height);

            if !self.peek.is(TokenKind::Comma) {
                break;
            }
            self.next_token(); // consume ','
        }

        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }
        Some((arguments, height))
    }

    fn too_deeply_nested(&mut self) {
        self.diagnostics.push(ParseError::TooDeeplyNested {
            limit: MAX_NESTING_DEPTH,
            span: self.current.span,
        });
    }

    // Вспомогательные методы
    fn next_token(&mut self) {
        let next = self.lexer.next_token();
        self.current = std::mem::replace(&mut self.peek, next);
    }

    fn expect_peek(&mut self, expected: TokenKind) -> bool {
        if self.peek.is(expected) {
            self.next_token();
            return true;
        }
        self.diagnostics.push(ParseError::UnexpectedToken {
            expected,
            got: self.peek.kind,
            span: self.peek.span,
        });
        false
    }

    fn skip_semicolon(&mut self) {
        if self.peek.is(TokenKind::Semicolon) {
            self.next_token();
        }
    }

    /// Drops the rest of a broken statement: stops on its `;` or at the end.
    fn synchronize(&mut self) {
        while !self.current.is(TokenKind::Semicolon) && !self.current.is(TokenKind::Eof) {
            self.next_token();
        }
    }
}
