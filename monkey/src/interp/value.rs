//! Runtime values for the interpreter

use super::builtins::BuiltinFn;
use super::env::EnvRef;
use super::error::RuntimeError;
use crate::ast::{BlockStatement, Identifier};
use rustc_hash::FxHasher;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::Hasher;
use std::rc::Rc;

pub const NULL: Object = Object::Null;
pub const TRUE: Object = Object::Boolean(true);
pub const FALSE: Object = Object::Boolean(false);

/// Runtime value.
///
/// Collections and functions are reference counted; cloning an `Object`
/// never copies their contents.
#[derive(Debug, Clone)]
pub enum Object {
    Integer(i64),
    Boolean(bool),
    String(Rc<str>),
    Null,
    Array(Rc<Vec<Object>>),
    Hash(Rc<BTreeMap<HashKey, HashPair>>),
    Function(Rc<Function>),
    Builtin(Builtin),
    /// A runtime failure surfaced as a value
    Error(RuntimeError),
}

/// Type tag, as shown in error messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ObjectType {
    Integer,
    Boolean,
    String,
    Null,
    Array,
    Hash,
    Function,
    Builtin,
    Error,
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ObjectType::Integer => "INTEGER",
            ObjectType::Boolean => "BOOLEAN",
            ObjectType::String => "STRING",
            ObjectType::Null => "NULL",
            ObjectType::Array => "ARRAY",
            ObjectType::Hash => "HASH",
            ObjectType::Function => "FUNCTION",
            ObjectType::Builtin => "BUILTIN",
            ObjectType::Error => "ERROR",
        };
        f.write_str(name)
    }
}

/// Key under which a hashable value is stored in a hash.
///
/// Equal values of the same type always derive equal keys. Distinct
/// strings may in principle collide; lookups compare keys only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HashKey {
    pub object_type: ObjectType,
    pub value: i64,
}

/// A hash entry keeps the original key for display
#[derive(Debug, Clone, PartialEq)]
pub struct HashPair {
    pub key: Object,
    pub value: Object,
}

/// User function closing over its defining environment
pub struct Function {
    pub parameters: Rc<Vec<Identifier>>,
    pub body: Rc<BlockStatement>,
    pub env: EnvRef,
}

// The environment may hold this very function, so it is left out.
impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("parameters", &self.parameters)
            .field("body", &self.body.to_string())
            .finish_non_exhaustive()
    }
}

/// Native function handle
#[derive(Debug, Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub func: BuiltinFn,
}

impl Object {
    pub fn string(s: impl Into<Rc<str>>) -> Self {
        Object::String(s.into())
    }

    pub fn array(elements: Vec<Object>) -> Self {
        Object::Array(Rc::new(elements))
    }

    pub fn object_type(&self) -> ObjectType {
        match self {
            Object::Integer(_) => ObjectType::Integer,
            Object::Boolean(_) => ObjectType::Boolean,
            Object::String(_) => ObjectType::String,
            Object::Null => ObjectType::Null,
            Object::Array(_) => ObjectType::Array,
            Object::Hash(_) => ObjectType::Hash,
            Object::Function(_) => ObjectType::Function,
            Object::Builtin(_) => ObjectType::Builtin,
            Object::Error(_) => ObjectType::Error,
        }
    }

    /// `null` and `false` are falsy, everything else is truthy
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Object::Null | Object::Boolean(false))
    }

    /// Derive the hash key, or `None` if the type is not hashable
    pub fn hash_key(&self) -> Option<HashKey> {
        let value = match self {
            Object::Integer(n) => *n,
            Object::Boolean(b) => i64::from(*b),
            Object::String(s) => {
                let mut hasher = FxHasher::default();
                hasher.write(s.as_bytes());
                hasher.finish() as i64
            }
            _ => return None,
        };
        Some(HashKey {
            object_type: self.object_type(),
            value,
        })
    }
}

impl From<bool> for Object {
    fn from(value: bool) -> Self {
        if value { TRUE } else { FALSE }
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Object::Integer(a), Object::Integer(b)) => a == b,
            (Object::Boolean(a), Object::Boolean(b)) => a == b,
            (Object::String(a), Object::String(b)) => a == b,
            (Object::Null, Object::Null) => true,
            (Object::Array(a), Object::Array(b)) => a == b,
            (Object::Hash(a), Object::Hash(b)) => a == b,
            (Object::Function(a), Object::Function(b)) => Rc::ptr_eq(a, b),
            (Object::Builtin(a), Object::Builtin(b)) => a.name == b.name,
            (Object::Error(a), Object::Error(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Object::Integer(n) => write!(f, "{n}"),
            Object::Boolean(b) => write!(f, "{b}"),
            Object::String(s) => f.write_str(s),
            Object::Null => f.write_str("null"),
            Object::Array(elements) => {
                f.write_str("[")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{element}")?;
                }
                f.write_str("]")
            }
            Object::Hash(pairs) => {
                f.write_str("{")?;
                for (i, pair) in pairs.values().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", pair.key, pair.value)?;
                }
                f.write_str("}")
            }
            Object::Function(func) => {
                let params: Vec<&str> = func.parameters.iter().map(|p| p.value.as_str()).collect();
                write!(f, "fn({}) {{\n{}\n}}", params.join(", "), func.body)
            }
            Object::Builtin(_) => f.write_str("builtin function"),
            Object::Error(err) => write!(f, "ERROR: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    fn hash_of(pairs: Vec<(Object, Object)>) -> Object {
        let map = pairs
            .into_iter()
            .filter_map(|(key, value)| Some((key.hash_key()?, HashPair { key, value })))
            .collect();
        Object::Hash(Rc::new(map))
    }

    #[test]
    fn test_string_hash_key() {
        let hello1 = Object::string("Hello World");
        let hello2 = Object::string(String::from("Hello ") + "World");
        let diff1 = Object::string("My name is johnny");
        let diff2 = Object::string("My name is johnny");

        assert_eq!(hello1.hash_key(), hello2.hash_key());
        assert_eq!(diff1.hash_key(), diff2.hash_key());
        assert_ne!(hello1.hash_key(), diff1.hash_key());
    }

    #[test]
    fn test_scalar_hash_keys() {
        assert_eq!(Object::Integer(4).hash_key(), Object::Integer(4).hash_key());
        assert_ne!(Object::Integer(4).hash_key(), Object::Integer(5).hash_key());
        assert_eq!(TRUE.hash_key(), Object::from(true).hash_key());
        assert_ne!(TRUE.hash_key(), FALSE.hash_key());
        // Same payload, different type
        assert_ne!(Object::Integer(1).hash_key(), TRUE.hash_key());
    }

    #[test]
    fn test_unhashable_types() {
        assert_eq!(NULL.hash_key(), None);
        assert_eq!(Object::array(vec![]).hash_key(), None);
        assert_eq!(hash_of(vec![]).hash_key(), None);
    }

    #[test]
    fn test_truthiness() {
        assert!(!NULL.is_truthy());
        assert!(!FALSE.is_truthy());
        assert!(TRUE.is_truthy());
        assert!(Object::Integer(0).is_truthy());
        assert!(Object::string("").is_truthy());
        assert!(Object::array(vec![]).is_truthy());
    }

    #[test]
    fn test_inspect() {
        let array = Object::array(vec![Object::Integer(1), Object::string("two"), NULL]);
        assert_snapshot!(array.to_string(), @"[1, two, null]");

        let hash = hash_of(vec![
            (Object::Integer(2), Object::string("b")),
            (Object::Integer(1), TRUE),
        ]);
        assert_snapshot!(hash.to_string(), @"{1: true, 2: b}");

        let error = Object::Error(RuntimeError::identifier_not_found("x"));
        assert_snapshot!(error.to_string(), @"ERROR: identifier not found: x");
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Object::Integer(1).object_type().to_string(), "INTEGER");
        assert_eq!(NULL.object_type().to_string(), "NULL");
        assert_eq!(hash_of(vec![]).object_type().to_string(), "HASH");
    }
}
