use std::fs;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use monkey::error::{MonkeyError, ParseError};
use monkey::ir::ast::Node;
use monkey::parser;
use monkey::parser::lexer::{Lexer, tokenize};

const PROMPT: &str = ">> ";

#[derive(Parser)]
#[command(name = "monkey")]
#[command(about = "Scanner and Pratt parser for the Monkey language", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a file and print its canonical form
    Parse {
        /// Source file
        input: String,

        /// Also dump the syntax tree
        #[arg(long)]
        show_ast: bool,
    },

    /// Print the token stream of a file
    Tokens {
        /// Source file
        input: String,
    },

    /// Read lines from stdin and print each parsed line
    Repl,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Parse { input, show_ast } => run_parse(&input, show_ast),
        Commands::Tokens { input } => run_tokens(&input),
        Commands::Repl => run_repl(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_parse(input: &str, show_ast: bool) -> Result<(), MonkeyError> {
    let source = fs::read_to_string(input)?;

    match parser::parse(&source) {
        Ok(program) => {
            println!("{}", program.render());
            if show_ast {
                println!("=== AST ===");
                println!("{:#?}", program);
            }
            Ok(())
        }
        Err(MonkeyError::Syntax { diagnostics }) => {
            print_diagnostics(&mut io::stderr(), input, &diagnostics)?;
            Err(MonkeyError::Syntax { diagnostics })
        }
        Err(e) => Err(e),
    }
}

fn run_tokens(input: &str) -> Result<(), MonkeyError> {
    let source = fs::read_to_string(input)?;

    for token in tokenize(&source) {
        println!("{:>4}:{:<3} {}", token.span.line, token.span.column, token);
    }
    Ok(())
}

fn run_repl() -> Result<(), MonkeyError> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    writeln!(stdout, "This is the Monkey programming language!")?;
    writeln!(stdout, "Feel free to type in commands")?;

    let mut lines = stdin.lock().lines();
    loop {
        write!(stdout, "{}", PROMPT)?;
        stdout.flush()?;

        let Some(line) = lines.next().transpose()? else {
            writeln!(stdout)?;
            return Ok(());
        };

        let mut parser = monkey::parser::parser::Parser::new(Lexer::new(&line));
        let program = parser.parse_program();

        if parser.diagnostics().is_empty() {
            writeln!(stdout, "{}", program.render())?;
        } else {
            print_diagnostics(&mut stdout, "<stdin>", parser.diagnostics())?;
        }
    }
}

fn print_diagnostics(
    out: &mut impl Write,
    origin: &str,
    diagnostics: &[ParseError],
) -> io::Result<()> {
    writeln!(out, "parser errors:")?;
    for diagnostic in diagnostics {
        writeln!(out, "\t{}:{}: {}", origin, diagnostic.span(), diagnostic)?;
    }
    Ok(())
}
