//! Abstract Syntax Tree definitions
//!
//! Every node keeps the token it started from. `Display` gives the
//! canonical rendering: operator expressions fully parenthesized, programs
//! and blocks as the plain concatenation of their statements.

mod expr;
mod span;

pub use expr::*;
pub use span::*;

use serde::Serialize;
use std::fmt;

use crate::lexer::Token;

/// A program is the ordered sequence of top-level statements
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Program {
    pub fn token_literal(&self) -> &str {
        self.statements.first().map_or("", Statement::token_literal)
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.statements.iter().try_for_each(|s| write!(f, "{s}"))
    }
}

/// Statement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Statement {
    /// `let <name> = <value>;`
    Let {
        token: Token,
        name: Identifier,
        value: Expression,
    },
    /// `return <value>;`
    Return { token: Token, value: Expression },
    /// A bare expression, optionally followed by `;`
    Expression { token: Token, expression: Expression },
}

impl Statement {
    pub fn token_literal(&self) -> &str {
        match self {
            Statement::Let { token, .. }
            | Statement::Return { token, .. }
            | Statement::Expression { token, .. } => &token.literal,
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Let { token, name, value } => {
                write!(f, "{} {name} = {value};", token.literal)
            }
            Statement::Return { token, value } => write!(f, "{} {value};", token.literal),
            Statement::Expression { expression, .. } => write!(f, "{expression}"),
        }
    }
}

/// Brace-delimited statement sequence
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockStatement {
    pub token: Token,
    pub statements: Vec<Statement>,
}

impl fmt::Display for BlockStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.statements.iter().try_for_each(|s| write!(f, "{s}"))
    }
}

/// Identifier
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Identifier {
    pub token: Token,
    pub value: String,
}

impl Identifier {
    pub fn new(token: Token) -> Self {
        let value = token.literal.clone();
        Self { token, value }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

fn join<T: fmt::Display>(items: impl IntoIterator<Item = T>, sep: &str) -> String {
    items
        .into_iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(sep)
}
