//! Tree-walking evaluator
//!
//! Evaluation threads an [`InterpResult`] through every recursive call:
//! `Err(Signal::Return)` carries an early `return` up to the enclosing
//! function call, `Err(Signal::Error)` carries a runtime error all the way
//! up to the program, where it becomes the result value.

use super::builtins::Builtins;
use super::env::{EnvRef, Environment, child_env};
use super::error::{InterpResult, RuntimeError, Signal};
use super::value::{Function, HashPair, NULL, Object};
use crate::ast::{
    BlockStatement, Expression, FunctionLiteral, Identifier, InfixOperator, PrefixOperator,
    Program, Statement,
};
use std::collections::BTreeMap;
use std::rc::Rc;
use tracing::{debug, trace};

/// Stack growth parameters for deep recursion
const STACK_RED_ZONE: usize = 128 * 1024; // 128KB remaining triggers growth
const STACK_GROW_SIZE: usize = 4 * 1024 * 1024; // Grow by 4MB each time

/// The interpreter
pub struct Interpreter {
    /// Global environment, kept across `eval_program` calls
    global_env: EnvRef,
    /// Builtin functions
    builtins: Builtins,
}

impl Interpreter {
    /// Create a new interpreter with the standard builtins
    pub fn new() -> Self {
        Self::with_builtins(Builtins::standard())
    }

    /// Create a new interpreter with a custom builtin table
    pub fn with_builtins(builtins: Builtins) -> Self {
        Interpreter {
            global_env: Environment::new().into_ref(),
            builtins,
        }
    }

    /// Forget every global binding
    pub fn reset(&mut self) {
        self.global_env.borrow_mut().clear();
    }

    /// Evaluate a program in the global environment.
    ///
    /// Returns `None` only for a program without statements. A runtime
    /// error is returned as `Object::Error`.
    #[tracing::instrument(level = "debug", skip_all, fields(statements = program.statements.len()))]
    pub fn eval_program(&mut self, program: &Program) -> Option<Object> {
        let env = Rc::clone(&self.global_env);
        match self.eval_statements(&program.statements, &env) {
            Ok(result) => result,
            Err(Signal::Return(value)) => Some(value),
            Err(Signal::Error(err)) => {
                debug!(kind = ?err.kind, "runtime error: {err}");
                Some(Object::Error(err))
            }
        }
    }

    fn eval_statements(
        &mut self,
        statements: &[Statement],
        env: &EnvRef,
    ) -> InterpResult<Option<Object>> {
        let mut result = None;
        for statement in statements {
            result = Some(self.eval_statement(statement, env)?);
        }
        Ok(result)
    }

    fn eval_statement(&mut self, statement: &Statement, env: &EnvRef) -> InterpResult<Object> {
        match statement {
            Statement::Let { name, value, .. } => {
                let value = self.eval_expression(value, env)?;
                Ok(env.borrow_mut().set(name.value.as_str(), value))
            }
            Statement::Return { value, .. } => {
                let value = self.eval_expression(value, env)?;
                Err(Signal::Return(value))
            }
            Statement::Expression { expression, .. } => self.eval_expression(expression, env),
        }
    }

    /// Blocks run in the current environment; an empty block is `null`
    fn eval_block(&mut self, block: &BlockStatement, env: &EnvRef) -> InterpResult<Object> {
        Ok(self.eval_statements(&block.statements, env)?.unwrap_or(NULL))
    }

    /// Evaluate an expression with automatic stack growth for deep recursion
    fn eval_expression(&mut self, expr: &Expression, env: &EnvRef) -> InterpResult<Object> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
            self.eval_expression_inner(expr, env)
        })
    }

    fn eval_expression_inner(&mut self, expr: &Expression, env: &EnvRef) -> InterpResult<Object> {
        match expr {
            Expression::Integer { value, .. } => Ok(Object::Integer(*value)),
            Expression::Boolean { value, .. } => Ok(Object::from(*value)),
            Expression::String { value, .. } => Ok(Object::string(value.as_str())),

            Expression::Identifier(ident) => self.eval_identifier(ident, env),

            Expression::Prefix {
                operator, right, ..
            } => {
                let right = self.eval_expression(right, env)?;
                Ok(eval_prefix(*operator, right)?)
            }

            Expression::Infix {
                left,
                operator,
                right,
                ..
            } => {
                let left = self.eval_expression(left, env)?;
                let right = self.eval_expression(right, env)?;
                Ok(eval_infix(*operator, &left, &right)?)
            }

            Expression::If {
                condition,
                consequence,
                alternative,
                ..
            } => {
                let condition = self.eval_expression(condition, env)?;
                if condition.is_truthy() {
                    self.eval_block(consequence, env)
                } else if let Some(alternative) = alternative {
                    self.eval_block(alternative, env)
                } else {
                    Ok(NULL)
                }
            }

            Expression::Function(FunctionLiteral {
                parameters, body, ..
            }) => Ok(Object::Function(Rc::new(Function {
                parameters: Rc::clone(parameters),
                body: Rc::clone(body),
                env: Rc::clone(env),
            }))),

            Expression::Call {
                function,
                arguments,
                ..
            } => {
                let function = self.eval_expression(function, env)?;
                let args = self.eval_expressions(arguments, env)?;
                self.apply_function(&function, &args)
            }

            Expression::Array { elements, .. } => {
                let elements = self.eval_expressions(elements, env)?;
                Ok(Object::array(elements))
            }

            Expression::Index { left, index, .. } => {
                let left = self.eval_expression(left, env)?;
                let index = self.eval_expression(index, env)?;
                Ok(eval_index(&left, &index)?)
            }

            Expression::Hash { pairs, .. } => self.eval_hash_literal(pairs, env),
        }
    }

    /// Environment chain first, then the builtin table
    fn eval_identifier(&self, ident: &Identifier, env: &EnvRef) -> InterpResult<Object> {
        if let Some(value) = env.borrow().get(&ident.value) {
            return Ok(value);
        }
        if let Some(builtin) = self.builtins.get(&ident.value) {
            trace!(name = %ident.value, "builtin lookup");
            return Ok(builtin);
        }
        Err(RuntimeError::identifier_not_found(&ident.value).into())
    }

    /// Left to right, stopping at the first error
    fn eval_expressions(
        &mut self,
        exprs: &[Expression],
        env: &EnvRef,
    ) -> InterpResult<Vec<Object>> {
        exprs
            .iter()
            .map(|expr| self.eval_expression(expr, env))
            .collect()
    }

    fn eval_hash_literal(
        &mut self,
        pairs: &[(Expression, Expression)],
        env: &EnvRef,
    ) -> InterpResult<Object> {
        let mut map = BTreeMap::new();
        for (key_expr, value_expr) in pairs {
            let key = self.eval_expression(key_expr, env)?;
            let hash_key = key
                .hash_key()
                .ok_or_else(|| RuntimeError::unusable_hash_key(key.object_type()))?;
            let value = self.eval_expression(value_expr, env)?;
            map.insert(hash_key, HashPair { key, value });
        }
        Ok(Object::Hash(Rc::new(map)))
    }

    /// Call a function value with already-evaluated arguments
    pub fn apply_function(&mut self, function: &Object, args: &[Object]) -> InterpResult<Object> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
            self.apply_function_inner(function, args)
        })
    }

    fn apply_function_inner(&mut self, function: &Object, args: &[Object]) -> InterpResult<Object> {
        match function {
            Object::Function(func) => {
                debug!(params = func.parameters.len(), args = args.len(), "apply function");
                let call_env = child_env(&func.env);
                {
                    // Missing arguments leave their parameter unbound; extras are ignored.
                    let mut frame = call_env.borrow_mut();
                    for (param, arg) in func.parameters.iter().zip(args) {
                        frame.set(param.value.as_str(), arg.clone());
                    }
                }
                match self.eval_block(&func.body, &call_env) {
                    Err(Signal::Return(value)) => Ok(value),
                    other => other,
                }
            }
            Object::Builtin(builtin) => {
                debug!(name = builtin.name, args = args.len(), "apply builtin");
                Ok((builtin.func)(args)?)
            }
            other => Err(RuntimeError::not_a_function(other.object_type()).into()),
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

fn eval_prefix(operator: PrefixOperator, right: Object) -> Result<Object, RuntimeError> {
    match operator {
        PrefixOperator::Bang => Ok(Object::from(!right.is_truthy())),
        PrefixOperator::Minus => match right {
            Object::Integer(n) => Ok(Object::Integer(n.wrapping_neg())),
            other => Err(RuntimeError::unknown_prefix_operator(
                operator,
                other.object_type(),
            )),
        },
    }
}

fn eval_infix(
    operator: InfixOperator,
    left: &Object,
    right: &Object,
) -> Result<Object, RuntimeError> {
    match (left, right) {
        (Object::Integer(l), Object::Integer(r)) => eval_integer_infix(operator, *l, *r),
        (Object::String(l), Object::String(r)) if operator == InfixOperator::Plus => {
            let mut joined = String::with_capacity(l.len() + r.len());
            joined.push_str(l);
            joined.push_str(r);
            Ok(Object::string(joined))
        }
        (Object::Boolean(l), Object::Boolean(r)) if operator == InfixOperator::Eq => {
            Ok(Object::from(l == r))
        }
        (Object::Boolean(l), Object::Boolean(r)) if operator == InfixOperator::NotEq => {
            Ok(Object::from(l != r))
        }
        _ if left.object_type() != right.object_type() => Err(RuntimeError::type_mismatch(
            left.object_type(),
            operator,
            right.object_type(),
        )),
        _ => Err(RuntimeError::unknown_infix_operator(
            left.object_type(),
            operator,
            right.object_type(),
        )),
    }
}

fn eval_integer_infix(operator: InfixOperator, l: i64, r: i64) -> Result<Object, RuntimeError> {
    let result = match operator {
        InfixOperator::Plus => Object::Integer(l.wrapping_add(r)),
        InfixOperator::Minus => Object::Integer(l.wrapping_sub(r)),
        InfixOperator::Asterisk => Object::Integer(l.wrapping_mul(r)),
        InfixOperator::Slash => {
            if r == 0 {
                return Err(RuntimeError::division_by_zero());
            }
            Object::Integer(l.wrapping_div(r))
        }
        InfixOperator::Lt => Object::from(l < r),
        InfixOperator::Gt => Object::from(l > r),
        InfixOperator::Eq => Object::from(l == r),
        InfixOperator::NotEq => Object::from(l != r),
    };
    Ok(result)
}

fn eval_index(left: &Object, index: &Object) -> Result<Object, RuntimeError> {
    match (left, index) {
        (Object::Array(elements), Object::Integer(i)) => Ok(usize::try_from(*i)
            .ok()
            .and_then(|i| elements.get(i))
            .cloned()
            .unwrap_or(NULL)),
        (Object::Hash(pairs), _) => {
            let key = index
                .hash_key()
                .ok_or_else(|| RuntimeError::unusable_hash_key(index.object_type()))?;
            Ok(pairs.get(&key).map_or(NULL, |pair| pair.value.clone()))
        }
        _ => Err(RuntimeError::index_not_supported(left.object_type())),
    }
}
