//! Error types and reporting

use crate::ast::Span;
use crate::interp::RuntimeError;
use crate::lexer::TokenKind;
use thiserror::Error;

/// Result type alias for the front ends
pub type Result<T> = std::result::Result<T, MonkeyError>;

/// A single parse error. `Display` is the user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("expected next token to be {expected}, got {found} instead")]
    UnexpectedToken { expected: TokenKind, found: TokenKind },

    #[error("no prefix parse function for {0} found")]
    NoPrefixParseFn(TokenKind),

    #[error("could not parse {0} as integer")]
    InvalidInteger(String),
}

impl ParseError {
    pub fn unexpected_token(expected: TokenKind, found: TokenKind, span: Span) -> Self {
        Self {
            kind: ParseErrorKind::UnexpectedToken { expected, found },
            span,
        }
    }

    pub fn no_prefix_parse_fn(kind: TokenKind, span: Span) -> Self {
        Self {
            kind: ParseErrorKind::NoPrefixParseFn(kind),
            span,
        }
    }

    pub fn invalid_integer(literal: impl Into<String>, span: Span) -> Self {
        Self {
            kind: ParseErrorKind::InvalidInteger(literal.into()),
            span,
        }
    }
}

/// Application-level error
#[derive(Debug, Error)]
pub enum MonkeyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{} parse error(s)", .0.len())]
    Parse(Vec<ParseError>),

    #[error("{0}")]
    Runtime(#[from] RuntimeError),

    #[error("Readline error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<Vec<ParseError>> for MonkeyError {
    fn from(errors: Vec<ParseError>) -> Self {
        MonkeyError::Parse(errors)
    }
}

/// Report parse errors against their source with ariadne
pub fn report_parse_errors(
    filename: &str,
    source: &str,
    errors: &[ParseError],
) -> std::io::Result<()> {
    use ariadne::{Color, Label, Report, ReportKind, Source};

    for error in errors {
        let range = error.span.start..error.span.end;
        Report::build(ReportKind::Error, (filename, range.clone()))
            .with_message("parser error")
            .with_label(
                Label::new((filename, range))
                    .with_message(error.to_string())
                    .with_color(Color::Red),
            )
            .finish()
            .eprint((filename, Source::from(source)))?;
    }
    Ok(())
}
