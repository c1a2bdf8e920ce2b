pub mod lexer;
pub mod parser;
pub mod token;


use crate::error::MonkeyError;
use crate::ir::ast;

use lexer::Lexer;
use parser::Parser;

/// Главная функция парсера - из текста в AST
pub fn parse(source: &str) -> Result<ast::Program, MonkeyError> {
    let mut parser = Parser::new(Lexer::new(source));
    let program = parser.parse_program();

    let diagnostics = parser.into_diagnostics();
    if diagnostics.is_empty() {
        Ok(program)
    } else {
        Err(MonkeyError::Syntax { diagnostics })
    }
}
