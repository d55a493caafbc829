//! Native functions
//!
//! Builtins are consulted only when a name is not bound in the environment
//! chain, so user code may shadow any of them.

use super::error::RuntimeError;
use super::value::{Builtin, NULL, Object};
use std::collections::HashMap;
use std::rc::Rc;
use unicode_segmentation::UnicodeSegmentation;

/// Builtin function type
pub type BuiltinFn = fn(&[Object]) -> Result<Object, RuntimeError>;

/// Immutable name → builtin table
#[derive(Debug, Clone, Default)]
pub struct Builtins {
    table: HashMap<&'static str, Builtin>,
}

impl Builtins {
    /// A table with no builtins
    pub fn empty() -> Self {
        Self::default()
    }

    /// `len`, `puts`, `first`, `last`, `rest` and `push`
    pub fn standard() -> Self {
        Self::empty()
            .with("len", builtin_len)
            .with("puts", builtin_puts)
            .with("first", builtin_first)
            .with("last", builtin_last)
            .with("rest", builtin_rest)
            .with("push", builtin_push)
    }

    /// Add (or replace) a builtin
    pub fn with(mut self, name: &'static str, func: BuiltinFn) -> Self {
        self.table.insert(name, Builtin { name, func });
        self
    }

    pub fn get(&self, name: &str) -> Option<Object> {
        self.table.get(name).copied().map(Object::Builtin)
    }
}

fn check_arity(args: &[Object], want: usize) -> Result<(), RuntimeError> {
    if args.len() == want {
        Ok(())
    } else {
        Err(RuntimeError::wrong_argument_count(args.len(), want))
    }
}

// ============ Built-in Functions ============

/// len(x): elements of an array, grapheme clusters of a string, 0 for null
fn builtin_len(args: &[Object]) -> Result<Object, RuntimeError> {
    check_arity(args, 1)?;
    let len = match &args[0] {
        Object::Array(elements) => elements.len(),
        Object::String(s) => s.graphemes(true).count(),
        Object::Null => 0,
        other => return Err(RuntimeError::argument_not_supported("len", other.object_type())),
    };
    Ok(Object::Integer(len as i64))
}

/// puts(...): print each argument on its own line
fn builtin_puts(args: &[Object]) -> Result<Object, RuntimeError> {
    for arg in args {
        println!("{arg}");
    }
    Ok(NULL)
}

fn builtin_first(args: &[Object]) -> Result<Object, RuntimeError> {
    check_arity(args, 1)?;
    match &args[0] {
        Object::Array(elements) => Ok(elements.first().cloned().unwrap_or(NULL)),
        other => Err(RuntimeError::argument_must_be_array("first", other.object_type())),
    }
}

fn builtin_last(args: &[Object]) -> Result<Object, RuntimeError> {
    check_arity(args, 1)?;
    match &args[0] {
        Object::Array(elements) => Ok(elements.last().cloned().unwrap_or(NULL)),
        other => Err(RuntimeError::argument_must_be_array("last", other.object_type())),
    }
}

/// rest(arr): everything after the first element, or null when that is empty
fn builtin_rest(args: &[Object]) -> Result<Object, RuntimeError> {
    check_arity(args, 1)?;
    match &args[0] {
        Object::Array(elements) if elements.len() > 1 => {
            Ok(Object::Array(Rc::new(elements[1..].to_vec())))
        }
        Object::Array(_) => Ok(NULL),
        other => Err(RuntimeError::argument_must_be_array("rest", other.object_type())),
    }
}

/// push(arr, x): a new array with `x` appended
fn builtin_push(args: &[Object]) -> Result<Object, RuntimeError> {
    check_arity(args, 2)?;
    match &args[0] {
        Object::Array(elements) => {
            let mut pushed = Vec::with_capacity(elements.len() + 1);
            pushed.extend(elements.iter().cloned());
            pushed.push(args[1].clone());
            Ok(Object::Array(Rc::new(pushed)))
        }
        other => Err(RuntimeError::argument_must_be_array("push", other.object_type())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(values: &[i64]) -> Object {
        Object::array(values.iter().copied().map(Object::Integer).collect())
    }

    #[test]
    fn test_len() {
        assert_eq!(builtin_len(&[Object::string("four")]), Ok(Object::Integer(4)));
        assert_eq!(builtin_len(&[Object::string("")]), Ok(Object::Integer(0)));
        assert_eq!(builtin_len(&[Object::string("héllo")]), Ok(Object::Integer(5)));
        // Combining mark and flag pair are one user-perceived character each
        assert_eq!(builtin_len(&[Object::string("e\u{301}")]), Ok(Object::Integer(1)));
        assert_eq!(builtin_len(&[Object::string("🇯🇵")]), Ok(Object::Integer(1)));
        assert_eq!(builtin_len(&[ints(&[1, 2, 3])]), Ok(Object::Integer(3)));
        assert_eq!(builtin_len(&[NULL]), Ok(Object::Integer(0)));
    }

    #[test]
    fn test_len_errors() {
        let err = builtin_len(&[Object::Integer(1)]).unwrap_err();
        assert_eq!(err.to_string(), "argument to `len` not supported, got INTEGER");

        let err = builtin_len(&[Object::string("one"), Object::string("two")]).unwrap_err();
        assert_eq!(err.to_string(), "wrong number of arguments. got=2, want=1");
    }

    #[test]
    fn test_first_last() {
        assert_eq!(builtin_first(&[ints(&[1, 2, 3])]), Ok(Object::Integer(1)));
        assert_eq!(builtin_last(&[ints(&[1, 2, 3])]), Ok(Object::Integer(3)));
        assert_eq!(builtin_first(&[ints(&[])]), Ok(NULL));
        assert_eq!(builtin_last(&[ints(&[])]), Ok(NULL));
        assert_eq!(
            builtin_first(&[Object::Integer(1)]).unwrap_err().to_string(),
            "argument to `first` must be ARRAY, got INTEGER"
        );
    }

    #[test]
    fn test_rest() {
        assert_eq!(builtin_rest(&[ints(&[1, 2, 3])]), Ok(ints(&[2, 3])));
        assert_eq!(builtin_rest(&[ints(&[1])]), Ok(NULL));
        assert_eq!(builtin_rest(&[ints(&[])]), Ok(NULL));
    }

    #[test]
    fn test_push_leaves_original_untouched() {
        let original = ints(&[1]);
        let pushed = builtin_push(&[original.clone(), Object::Integer(2)]);
        assert_eq!(pushed, Ok(ints(&[1, 2])));
        assert_eq!(original, ints(&[1]));

        assert_eq!(
            builtin_push(&[Object::Integer(1), Object::Integer(1)])
                .unwrap_err()
                .to_string(),
            "argument to `push` must be ARRAY, got INTEGER"
        );
        assert_eq!(
            builtin_push(&[ints(&[])]).unwrap_err().to_string(),
            "wrong number of arguments. got=1, want=2"
        );
    }

    #[test]
    fn test_puts_returns_null() {
        assert_eq!(builtin_puts(&[]), Ok(NULL));
    }

    #[test]
    fn test_table_lookup() {
        let builtins = Builtins::standard();
        for name in ["first", "last", "len", "push", "puts", "rest"] {
            assert!(builtins.get(name).is_some(), "{name}");
        }
        assert!(matches!(builtins.get("len"), Some(Object::Builtin(b)) if b.name == "len"));
        assert_eq!(builtins.get("print"), None);
        assert_eq!(Builtins::empty().get("len"), None);
    }
}
