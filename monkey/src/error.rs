use thiserror::Error;

use crate::parser::token::TokenKind;
use crate::span::Span;

/// A recorded, non-fatal problem found while parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("expected next token to be {expected}, got {got} instead")]
    UnexpectedToken {
        expected: TokenKind,
        got: TokenKind,
        span: Span,
    },

    #[error("no prefix parse function for {kind} found")]
    NoPrefixParseFn { kind: TokenKind, span: Span },

    #[error("could not parse {literal:?} as integer")]
    InvalidInteger { literal: String, span: Span },

    #[error("expression nested deeper than {limit} levels")]
    TooDeeplyNested { limit: usize, span: Span },
}

impl ParseError {
    pub fn span(&self) -> Span {
        match self {
            Self::UnexpectedToken { span, .. }
            | Self::NoPrefixParseFn { span, .. }
            | Self::InvalidInteger { span, .. }
            | Self::TooDeeplyNested { span, .. } => *span,
        }
    }
}

#[derive(Error, Debug)]
pub enum MonkeyError {
    #[error("Syntax error: {} problem(s) found", .diagnostics.len())]
    Syntax { diagnostics: Vec<ParseError> },

    #[error("IO error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}
