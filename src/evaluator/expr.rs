use std::rc::Rc;

use indexmap::IndexMap;
use tracing::trace;

use crate::{
    ast::{
        ast::Expression,
        expressions::{HashExpr, IdentifierExpr, IfExpr},
    },
    object::{
        environment::{Env, Environment},
        object::{HashKey, HashPair, Object, ObjectKind},
    },
};

use super::{
    builtins::lookup_builtin,
    evaluator::{EvalResult, Evaluator},
    stmt::eval_block_stmt,
};

fn error<T>(message: impl Into<String>) -> EvalResult<T> {
    Err(Object::error(message))
}

/// Evaluates an expression to a value.
pub fn eval_expression(evaluator: &Evaluator, expression: &Expression, env: &Env) -> EvalResult {
    match expression {
        Expression::Identifier(ident) => eval_identifier(ident, env),
        Expression::Integer(integer) => Ok(Object::integer(integer.value)),
        Expression::Boolean(boolean) => Ok(Object::boolean(boolean.value)),
        Expression::String(string) => Ok(Object::string(string.value.clone())),
        Expression::Prefix(prefix) => {
            let right = eval_operand(evaluator, prefix.right.as_deref(), env)?;
            eval_prefix_expr(&prefix.operator, right)
        }
        Expression::Infix(infix) => {
            let left = eval_expression(evaluator, &infix.left, env)?;
            let right = eval_operand(evaluator, infix.right.as_deref(), env)?;
            eval_infix_expr(&infix.operator, left, right)
        }
        Expression::If(if_expr) => eval_if_expr(evaluator, if_expr, env),
        Expression::Function(function) => Ok(Object::function(
            function.parameters.clone(),
            Rc::clone(&function.body),
            Rc::clone(env),
        )),
        Expression::Call(call) => {
            let callee = eval_expression(evaluator, &call.callee, env)?;
            let arguments = eval_expressions(evaluator, &call.arguments, env)?;
            apply_function(evaluator, callee, arguments)
        }
        Expression::Array(array) => Ok(Object::array(eval_expressions(
            evaluator,
            &array.elements,
            env,
        )?)),
        Expression::Index(index_expr) => {
            let left = eval_expression(evaluator, &index_expr.left, env)?;
            let index = eval_operand(evaluator, index_expr.index.as_deref(), env)?;
            eval_index_expr(left, index)
        }
        Expression::Hash(hash) => eval_hash_expr(evaluator, hash, env),
    }
}

/// Evaluates a child slot the parser may have left empty.
pub(crate) fn eval_operand(
    evaluator: &Evaluator,
    expression: Option<&Expression>,
    env: &Env,
) -> EvalResult {
    match expression {
        Some(expression) => eval_expression(evaluator, expression, env),
        None => error("incomplete expression"),
    }
}

/// Evaluates left to right, stopping at the first error.
fn eval_expressions(
    evaluator: &Evaluator,
    expressions: &[Expression],
    env: &Env,
) -> EvalResult<Vec<Object>> {
    expressions
        .iter()
        .map(|expression| eval_expression(evaluator, expression, env))
        .collect()
}

fn eval_identifier(ident: &IdentifierExpr, env: &Env) -> EvalResult {
    if let Some(value) = env.borrow().get(&ident.value) {
        return Ok(value);
    }

    if let Some(builtin) = lookup_builtin(&ident.value) {
        return Ok(builtin);
    }

    error(format!("identifier not found: {}", ident.value))
}

fn eval_prefix_expr(operator: &str, right: Object) -> EvalResult {
    match operator {
        "!" => Ok(eval_bang_operator(&right)),
        "-" => eval_minus_operator(&right),
        _ => error(format!(
            "unknown operator: {}{}",
            operator,
            right.object_type()
        )),
    }
}

fn eval_bang_operator(right: &Object) -> Object {
    if right.is(&Object::boolean(true)) {
        Object::boolean(false)
    } else if right.is(&Object::boolean(false)) || right.is(&Object::null()) {
        Object::boolean(true)
    } else {
        Object::boolean(false)
    }
}

fn eval_minus_operator(right: &Object) -> EvalResult {
    match right.kind() {
        ObjectKind::Integer(value) => Ok(Object::integer(value.wrapping_neg())),
        _ => error(format!("unknown operator: -{}", right.object_type())),
    }
}

fn eval_infix_expr(operator: &str, left: Object, right: Object) -> EvalResult {
    match (left.kind(), right.kind()) {
        (ObjectKind::Integer(l), ObjectKind::Integer(r)) => {
            eval_integer_infix_expr(operator, *l, *r)
        }
        (ObjectKind::String(l), ObjectKind::String(r)) => eval_string_infix_expr(operator, l, r),
        // Booleans and null are singletons, so identity is equality for them
        _ if operator == "==" => Ok(Object::boolean(left.is(&right))),
        _ if operator == "!=" => Ok(Object::boolean(!left.is(&right))),
        _ if left.object_type() != right.object_type() => error(format!(
            "type mismatch: {} {} {}",
            left.object_type(),
            operator,
            right.object_type()
        )),
        _ => error(format!(
            "unknown operator: {} {} {}",
            left.object_type(),
            operator,
            right.object_type()
        )),
    }
}

fn eval_integer_infix_expr(operator: &str, left: i64, right: i64) -> EvalResult {
    let value = match operator {
        "+" => Object::integer(left.wrapping_add(right)),
        "-" => Object::integer(left.wrapping_sub(right)),
        "*" => Object::integer(left.wrapping_mul(right)),
        "/" => {
            if right == 0 {
                return error("division by zero");
            }
            Object::integer(left.wrapping_div(right))
        }
        "<" => Object::boolean(left < right),
        ">" => Object::boolean(left > right),
        "==" => Object::boolean(left == right),
        "!=" => Object::boolean(left != right),
        _ => return error(format!("unknown operator: INTEGER {} INTEGER", operator)),
    };

    Ok(value)
}

fn eval_string_infix_expr(operator: &str, left: &str, right: &str) -> EvalResult {
    match operator {
        "+" => Ok(Object::string(format!("{}{}", left, right))),
        _ => error(format!("unknown operator: STRING {} STRING", operator)),
    }
}

fn eval_if_expr(evaluator: &Evaluator, if_expr: &IfExpr, env: &Env) -> EvalResult {
    let condition = eval_operand(evaluator, if_expr.condition.as_deref(), env)?;

    let branch = if condition.is_truthy() {
        Some(&if_expr.consequence)
    } else {
        if_expr.alternative.as_ref()
    };

    match branch {
        Some(block) => Ok(eval_block_stmt(evaluator, block, env)?.unwrap_or_else(Object::null)),
        None => Ok(Object::null()),
    }
}

fn eval_index_expr(left: Object, index: Object) -> EvalResult {
    match (left.kind(), index.kind()) {
        (ObjectKind::Array(elements), ObjectKind::Integer(i)) => Ok(usize::try_from(*i)
            .ok()
            .and_then(|i| elements.get(i))
            .cloned()
            .unwrap_or_else(Object::null)),
        (ObjectKind::Hash(pairs), _) => {
            let key = hash_key(&index)?;

            Ok(pairs
                .get(&key)
                .map(|pair| pair.value.clone())
                .unwrap_or_else(Object::null))
        }
        _ => error(format!(
            "index operator not supported: {}",
            left.object_type()
        )),
    }
}

fn hash_key(object: &Object) -> EvalResult<HashKey> {
    object.hash_key().ok_or_else(|| {
        Object::error(format!("unusable as hash key: {}", object.object_type()))
    })
}

fn eval_hash_expr(evaluator: &Evaluator, hash: &HashExpr, env: &Env) -> EvalResult {
    let mut pairs = IndexMap::new();

    for (key_expression, value_expression) in &hash.pairs {
        let key = eval_expression(evaluator, key_expression, env)?;
        let hash_key = hash_key(&key)?;
        let value = eval_expression(evaluator, value_expression, env)?;

        if pairs.contains_key(&hash_key) {
            trace!(key = %hash_key, "duplicate hash key overwrites earlier value");
        }
        pairs.insert(hash_key, HashPair { key, value });
    }

    Ok(Object::hash(pairs))
}

/// Calls a user function or builtin with already evaluated arguments.
pub fn apply_function(evaluator: &Evaluator, callee: Object, arguments: Vec<Object>) -> EvalResult {
    match callee.kind() {
        ObjectKind::Function(function) => {
            if function.parameters.len() != arguments.len() {
                return error(format!(
                    "wrong number of arguments: want={}, got={}",
                    function.parameters.len(),
                    arguments.len()
                ));
            }

            evaluator.enter_call()?;
            trace!(
                depth = evaluator.call_depth(),
                arguments = arguments.len(),
                "applying function"
            );

            let scope = Environment::new_enclosed(&function.env);
            {
                let mut scope = scope.borrow_mut();
                for (parameter, argument) in function.parameters.iter().zip(arguments) {
                    scope.set(parameter.value.clone(), argument);
                }
            }

            let result = eval_block_stmt(evaluator, &function.body, &scope);
            evaluator.exit_call();

            Ok(unwrap_return_value(result?))
        }
        ObjectKind::Builtin(builtin) => {
            trace!(name = builtin.name, arguments = arguments.len(), "calling builtin");

            let result = (builtin.func)(evaluator, arguments);
            if result.is_error() {
                Err(result)
            } else {
                Ok(result)
            }
        }
        _ => error(format!("not a function {}", callee.object_type())),
    }
}

fn unwrap_return_value(result: Option<Object>) -> Object {
    let Some(object) = result else {
        return Object::null();
    };

    if let ObjectKind::ReturnValue(value) = object.kind() {
        return value.clone();
    }
    object
}
