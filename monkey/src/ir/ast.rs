use std::fmt;

use crate::parser::token::Token;

/// Common surface of every tree node.
pub trait Node: fmt::Display {
    /// Literal of the token the node was built from (debugging aid).
    fn token_literal(&self) -> &str;

    /// Canonical source form; parsing it back yields the same tree.
    fn render(&self) -> String {
        self.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// let x = 5;
    Let {
        token: Token,
        name: Identifier,
        value: Expression,
    },
    /// return x; или просто return;
    Return {
        token: Token,
        value: Option<Expression>,
    },
    /// x + 1
    Expression { token: Token, expression: Expression },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub token: Token,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// foobar
    Identifier(Identifier),
    /// 5, 993322
    IntegerLiteral { token: Token, value: i64 },
    /// true, false
    Boolean { token: Token, value: bool },
    /// -x, !x
    Prefix {
        token: Token,
        operator: String,
        right: Box<Expression>,
    },
    /// a + b
    Infix {
        token: Token,
        left: Box<Expression>,
        operator: String,
        right: Box<Expression>,
    },
    /// add(1, 2)
    Call {
        token: Token,
        function: Box<Expression>,
        arguments: Vec<Expression>,
    },
}

impl Node for Program {
    fn token_literal(&self) -> &str {
        self.statements
            .first()
            .map_or("", |statement| statement.token_literal())
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let last = self.statements.len().saturating_sub(1);
        for (i, statement) in self.statements.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", statement)?;
            // a following "(...)" would otherwise re-parse as a call
            if i < last && matches!(statement, Statement::Expression { .. }) {
                f.write_str(";")?;
            }
        }
        Ok(())
    }
}

impl Node for Statement {
    fn token_literal(&self) -> &str {
        match self {
            Self::Let { token, .. } | Self::Return { token, .. } | Self::Expression { token, .. } => {
                &token.literal
            }
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Let { token, name, value } => {
                write!(f, "{} {} = {};", token.literal, name, value)
            }
            Self::Return { token, value: Some(value) } => write!(f, "{} {};", token.literal, value),
            Self::Return { token, value: None } => write!(f, "{};", token.literal),
            Self::Expression { expression, .. } => write!(f, "{}", expression),
        }
    }
}

impl Node for Identifier {
    fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl Node for Expression {
    fn token_literal(&self) -> &str {
        match self {
            Self::Identifier(identifier) => identifier.token_literal(),
            Self::IntegerLiteral { token, .. }
            | Self::Boolean { token, .. }
            | Self::Prefix { token, .. }
            | Self::Infix { token, .. }
            | Self::Call { token, .. } => &token.literal,
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identifier(identifier) => write!(f, "{}", identifier),
            // literal text, not the value, so "007" survives a round trip
            Self::IntegerLiteral { token, .. } => f.write_str(&token.literal),
            Self::Boolean { value, .. } => write!(f, "{}", value),
            Self::Prefix { operator, right, .. } => write!(f, "({}{})", operator, right),
            Self::Infix {
                left,
                operator,
                right,
                ..
            } => write!(f, "({} {} {})", left, operator, right),
            Self::Call {
                function,
                arguments,
                ..
            } => {
                write!(f, "{}(", function)?;
                for (i, argument) in arguments.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", argument)?;
                }
                f.write_str(")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::token::TokenKind;
    use crate::span::Span;

    fn token(kind: TokenKind, literal: &str) -> Token {
        Token::new(kind, literal, Span::default())
    }

    fn ident(name: &str) -> Identifier {
        Identifier {
            token: token(TokenKind::Ident, name),
            value: name.to_string(),
        }
    }

    #[test]
    fn test_render_let_statement() {
        let program = Program {
            statements: vec![Statement::Let {
                token: token(TokenKind::Let, "let"),
                name: ident("myVar"),
                value: Expression::Identifier(ident("anotherVar")),
            }],
        };

        assert_eq!(program.render(), "let myVar = anotherVar;");
        assert_eq!(program.token_literal(), "let");
    }

    #[test]
    fn test_render_statements_on_separate_lines() {
        let minus = token(TokenKind::Minus, "-");
        let program = Program {
            statements: vec![
                Statement::Return {
                    token: token(TokenKind::Return, "return"),
                    value: None,
                },
                Statement::Expression {
                    token: minus.clone(),
                    expression: Expression::Infix {
                        token: token(TokenKind::Asterisk, "*"),
                        left: Box::new(Expression::Prefix {
                            token: minus,
                            operator: "-".to_string(),
                            right: Box::new(Expression::Identifier(ident("a"))),
                        }),
                        operator: "*".to_string(),
                        right: Box::new(Expression::IntegerLiteral {
                            token: token(TokenKind::Int, "2"),
                            value: 2,
                        }),
                    },
                },
            ],
        };

        assert_eq!(program.render(), "return;\n((-a) * 2)");
    }

    #[test]
    fn test_render_terminates_inner_expression_statements() {
        let statement = |name: &str| Statement::Expression {
            token: token(TokenKind::Ident, name),
            expression: Expression::Identifier(ident(name)),
        };
        let program = Program {
            statements: vec![statement("a"), statement("b"), statement("c")],
        };

        assert_eq!(program.render(), "a;\nb;\nc");
    }

    #[test]
    fn test_render_call() {
        let call = Expression::Call {
            token: token(TokenKind::LParen, "("),
            function: Box::new(Expression::Identifier(ident("add"))),
            arguments: vec![
                Expression::Boolean {
                    token: token(TokenKind::True, "true"),
                    value: true,
                },
                Expression::Identifier(ident("x")),
            ],
        };

        assert_eq!(call.render(), "add(true, x)");
        assert_eq!(call.token_literal(), "(");
    }

    #[test]
    fn test_empty_program() {
        let program = Program::default();
        assert_eq!(program.render(), "");
        assert_eq!(program.token_literal(), "");
    }
}
