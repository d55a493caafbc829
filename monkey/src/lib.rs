//! Monkey Interpreter Library
//!
//! Lexer, Pratt parser and tree-walking evaluator for the Monkey language.

pub mod ast;
pub mod error;
pub mod interp;
pub mod lexer;
pub mod parser;
pub mod repl;

pub use ast::Span;
pub use error::{MonkeyError, ParseError, Result};
pub use interp::{Interpreter, Object};
pub use parser::parse;
pub use repl::{Outcome, Session};
