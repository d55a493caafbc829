//! Tree-walking interpreter: object model, environments, builtins and the
//! evaluator.

mod builtins;
mod env;
mod error;
mod eval;
mod value;

pub use builtins::{BuiltinFn, Builtins};
pub use env::{EnvRef, Environment, child_env};
pub use error::{ErrorKind, InterpResult, RuntimeError, Signal};
pub use eval::Interpreter;
pub use value::{
    Builtin, FALSE, Function, HashKey, HashPair, NULL, Object, ObjectType, TRUE,
};
