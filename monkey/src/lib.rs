//! Front end for the Monkey language: a byte-level scanner and a Pratt
//! parser producing an AST that renders back to canonical source.

pub mod error;
pub mod ir;
pub mod parser;
pub mod span;

pub use error::{MonkeyError, ParseError};
pub use ir::ast::{Expression, Identifier, Node, Program, Statement};
pub use parser::lexer::{Lexer, tokenize};
pub use parser::parser::{Parser, Precedence};
pub use parser::token::{Token, TokenKind};
