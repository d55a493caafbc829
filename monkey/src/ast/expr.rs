//! Expression nodes

use serde::Serialize;
use std::fmt;
use std::rc::Rc;

use super::{BlockStatement, Identifier, join};
use crate::lexer::{Token, TokenKind};

/// Expression
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expression {
    Identifier(Identifier),

    Boolean {
        token: Token,
        value: bool,
    },

    Integer {
        token: Token,
        value: i64,
    },

    /// String literal, contents taken verbatim
    String {
        token: Token,
        value: String,
    },

    Prefix {
        token: Token,
        operator: PrefixOperator,
        right: Box<Expression>,
    },

    Infix {
        token: Token,
        left: Box<Expression>,
        operator: InfixOperator,
        right: Box<Expression>,
    },

    If {
        token: Token,
        condition: Box<Expression>,
        consequence: BlockStatement,
        alternative: Option<BlockStatement>,
    },

    Function(FunctionLiteral),

    Call {
        token: Token,
        function: Box<Expression>,
        arguments: Vec<Expression>,
    },

    Array {
        token: Token,
        elements: Vec<Expression>,
    },

    Index {
        token: Token,
        left: Box<Expression>,
        index: Box<Expression>,
    },

    /// Key/value pairs in source order
    Hash {
        token: Token,
        pairs: Vec<(Expression, Expression)>,
    },
}

impl Expression {
    pub fn token(&self) -> &Token {
        match self {
            Expression::Identifier(ident) => &ident.token,
            Expression::Function(func) => &func.token,
            Expression::Boolean { token, .. }
            | Expression::Integer { token, .. }
            | Expression::String { token, .. }
            | Expression::Prefix { token, .. }
            | Expression::Infix { token, .. }
            | Expression::If { token, .. }
            | Expression::Call { token, .. }
            | Expression::Array { token, .. }
            | Expression::Index { token, .. }
            | Expression::Hash { token, .. } => token,
        }
    }

    pub fn token_literal(&self) -> &str {
        &self.token().literal
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Identifier(ident) => write!(f, "{ident}"),
            Expression::Boolean { token, .. } | Expression::Integer { token, .. } => {
                f.write_str(&token.literal)
            }
            Expression::String { value, .. } => f.write_str(value),
            Expression::Prefix { operator, right, .. } => write!(f, "({operator}{right})"),
            Expression::Infix {
                left,
                operator,
                right,
                ..
            } => write!(f, "({left} {operator} {right})"),
            Expression::If {
                condition,
                consequence,
                alternative,
                ..
            } => {
                write!(f, "if {condition} {consequence}")?;
                if let Some(alternative) = alternative {
                    write!(f, " else {alternative}")?;
                }
                Ok(())
            }
            Expression::Function(func) => write!(f, "{func}"),
            Expression::Call {
                function,
                arguments,
                ..
            } => write!(f, "{function}({})", join(arguments, ", ")),
            Expression::Array { elements, .. } => write!(f, "[{}]", join(elements, ", ")),
            Expression::Index { left, index, .. } => write!(f, "({left}[{index}])"),
            Expression::Hash { pairs, .. } => {
                let rendered: Vec<String> =
                    pairs.iter().map(|(k, v)| format!("{k}:{v}")).collect();
                write!(f, "{{{}}}", rendered.join(", "))
            }
        }
    }
}

/// Function literal.
///
/// Parameters and body sit behind `Rc` so a closure created from this
/// literal shares them instead of copying the tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionLiteral {
    pub token: Token,
    pub parameters: Rc<Vec<Identifier>>,
    pub body: Rc<BlockStatement>,
}

impl fmt::Display for FunctionLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({}) {}",
            self.token.literal,
            join(self.parameters.iter(), ", "),
            self.body
        )
    }
}

/// Prefix operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PrefixOperator {
    Bang,
    Minus,
}

impl PrefixOperator {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Bang => Some(PrefixOperator::Bang),
            TokenKind::Minus => Some(PrefixOperator::Minus),
            _ => None,
        }
    }
}

impl fmt::Display for PrefixOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrefixOperator::Bang => write!(f, "!"),
            PrefixOperator::Minus => write!(f, "-"),
        }
    }
}

/// Binary operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InfixOperator {
    Plus,
    Minus,
    Asterisk,
    Slash,
    Lt,
    Gt,
    Eq,
    NotEq,
}

impl InfixOperator {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Plus => Some(InfixOperator::Plus),
            TokenKind::Minus => Some(InfixOperator::Minus),
            TokenKind::Asterisk => Some(InfixOperator::Asterisk),
            TokenKind::Slash => Some(InfixOperator::Slash),
            TokenKind::Lt => Some(InfixOperator::Lt),
            TokenKind::Gt => Some(InfixOperator::Gt),
            TokenKind::Eq => Some(InfixOperator::Eq),
            TokenKind::NotEq => Some(InfixOperator::NotEq),
            _ => None,
        }
    }
}

impl fmt::Display for InfixOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InfixOperator::Plus => write!(f, "+"),
            InfixOperator::Minus => write!(f, "-"),
            InfixOperator::Asterisk => write!(f, "*"),
            InfixOperator::Slash => write!(f, "/"),
            InfixOperator::Lt => write!(f, "<"),
            InfixOperator::Gt => write!(f, ">"),
            InfixOperator::Eq => write!(f, "=="),
            InfixOperator::NotEq => write!(f, "!="),
        }
    }
}
