//! Monkey CLI

use clap::{Parser, Subcommand};
use monkey::error::report_parse_errors;
use monkey::interp::{Interpreter, Object};
use monkey::{MonkeyError, Result};
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "monkey", version, about = "Monkey - a tree-walking interpreter")]
struct Cli {
    /// Log filter (e.g. `monkey=debug`); overrides RUST_LOG
    #[arg(long, global = true, value_name = "FILTER")]
    log: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the interactive REPL (default)
    Repl,
    /// Evaluate a script and print its result
    Run {
        /// Source file to run
        file: PathBuf,
    },
    /// Parse and dump the AST
    Ast {
        /// Source file to parse
        file: PathBuf,
        /// Emit the syntax tree as JSON instead of its canonical rendering
        #[arg(long)]
        json: bool,
    },
    /// Tokenize and dump tokens (debug)
    Tokens {
        /// Source file to tokenize
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log.as_deref());

    let result = match cli.command.unwrap_or(Command::Repl) {
        Command::Repl => run_repl(),
        Command::Run { file } => run_file(&file),
        Command::Ast { file, json } => ast_file(&file, json),
        Command::Tokens { file } => tokenize_file(&file),
    };

    if let Err(e) = result {
        match e {
            // Reported with source context already
            MonkeyError::Parse(_) => {}
            MonkeyError::Runtime(err) => eprintln!("ERROR: {err}"),
            other => eprintln!("Error: {other}"),
        }
        std::process::exit(1);
    }
}

/// Install a stderr subscriber when `--log` or `RUST_LOG` asks for one
fn init_tracing(filter: Option<&str>) {
    let filter = match filter {
        Some(directives) => EnvFilter::new(directives),
        None => match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => return,
        },
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true),
        )
        .with(filter)
        .init();
}

fn run_repl() -> Result<()> {
    let mut repl = monkey::repl::Repl::new()?;
    repl.run()?;
    Ok(())
}

/// Read and parse a file, rendering parse errors against the source
fn load(path: &Path) -> Result<monkey::ast::Program> {
    let source = std::fs::read_to_string(path)?;
    let filename = path.display().to_string();

    match monkey::parse(&source) {
        Ok(program) => Ok(program),
        Err(errors) => {
            report_parse_errors(&filename, &source, &errors)?;
            Err(MonkeyError::Parse(errors))
        }
    }
}

fn run_file(path: &Path) -> Result<()> {
    let program = load(path)?;

    match Interpreter::new().eval_program(&program) {
        Some(Object::Error(err)) => Err(err.into()),
        Some(value) => {
            println!("{value}");
            Ok(())
        }
        None => Ok(()),
    }
}

fn ast_file(path: &Path, json: bool) -> Result<()> {
    let program = load(path)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&program)?);
    } else {
        for statement in &program.statements {
            println!("{statement}");
        }
    }
    Ok(())
}

fn tokenize_file(path: &Path) -> Result<()> {
    let source = std::fs::read_to_string(path)?;

    for token in monkey::lexer::tokenize(&source) {
        println!("{:<8} {:<8} {:?}", token.span.to_string(), token.kind, token.literal);
    }
    Ok(())
}
