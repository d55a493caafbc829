//! Runtime errors for the interpreter

use super::value::{Object, ObjectType};
use std::fmt::Display;
use thiserror::Error;

/// Runtime error during interpretation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RuntimeError {
    pub kind: ErrorKind,
    pub message: String,
}

/// Kinds of runtime errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Operands of different types
    TypeMismatch,
    /// Operator not defined for the operand type(s)
    UnknownOperator,
    IdentifierNotFound,
    /// Call of a value that is not callable
    NotAFunction,
    IndexNotSupported,
    UnusableHashKey,
    /// Builtin called with the wrong number of arguments
    WrongArgumentCount,
    /// Builtin called with an argument of the wrong type
    InvalidArgument,
    DivisionByZero,
}

impl RuntimeError {
    fn new(kind: ErrorKind, message: String) -> Self {
        RuntimeError { kind, message }
    }

    pub fn type_mismatch(left: ObjectType, operator: impl Display, right: ObjectType) -> Self {
        Self::new(
            ErrorKind::TypeMismatch,
            format!("type mismatch: {left} {operator} {right}"),
        )
    }

    pub fn unknown_infix_operator(
        left: ObjectType,
        operator: impl Display,
        right: ObjectType,
    ) -> Self {
        Self::new(
            ErrorKind::UnknownOperator,
            format!("unknown operator: {left} {operator} {right}"),
        )
    }

    pub fn unknown_prefix_operator(operator: impl Display, right: ObjectType) -> Self {
        Self::new(
            ErrorKind::UnknownOperator,
            format!("unknown operator: {operator}{right}"),
        )
    }

    pub fn identifier_not_found(name: &str) -> Self {
        Self::new(
            ErrorKind::IdentifierNotFound,
            format!("identifier not found: {name}"),
        )
    }

    pub fn not_a_function(ty: ObjectType) -> Self {
        Self::new(ErrorKind::NotAFunction, format!("not a function: {ty}"))
    }

    pub fn index_not_supported(ty: ObjectType) -> Self {
        Self::new(
            ErrorKind::IndexNotSupported,
            format!("index operator not supported: {ty}"),
        )
    }

    pub fn unusable_hash_key(ty: ObjectType) -> Self {
        Self::new(
            ErrorKind::UnusableHashKey,
            format!("unusable as hash key: {ty}"),
        )
    }

    pub fn wrong_argument_count(got: usize, want: usize) -> Self {
        Self::new(
            ErrorKind::WrongArgumentCount,
            format!("wrong number of arguments. got={got}, want={want}"),
        )
    }

    pub fn argument_not_supported(builtin: &str, ty: ObjectType) -> Self {
        Self::new(
            ErrorKind::InvalidArgument,
            format!("argument to `{builtin}` not supported, got {ty}"),
        )
    }

    pub fn argument_must_be_array(builtin: &str, ty: ObjectType) -> Self {
        Self::new(
            ErrorKind::InvalidArgument,
            format!("argument to `{builtin}` must be ARRAY, got {ty}"),
        )
    }

    pub fn division_by_zero() -> Self {
        Self::new(ErrorKind::DivisionByZero, "division by zero".to_string())
    }
}

/// Non-local exit from evaluation: an early `return` travelling up to its
/// function call, or an error travelling up to the program.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    Return(Object),
    Error(RuntimeError),
}

impl From<RuntimeError> for Signal {
    fn from(err: RuntimeError) -> Self {
        Signal::Error(err)
    }
}

/// Result type for interpreter operations
pub type InterpResult<T> = Result<T, Signal>;
