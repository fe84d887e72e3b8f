//! Native functions available to every program.
//!
//! Builtins are looked up after the environment chain, so a user binding
//! with the same name shadows them. Each builtin validates its own
//! arguments and reports problems as error objects.

use indexmap::IndexMap;

use crate::object::object::{BuiltinFunction, Object, ObjectKind};

use super::evaluator::Evaluator;

thread_local! {
    static BUILTINS: IndexMap<&'static str, Object> = {
        let table: [(&'static str, BuiltinFunction); 6] = [
            ("len", builtin_len),
            ("first", builtin_first),
            ("last", builtin_last),
            ("rest", builtin_rest),
            ("push", builtin_push),
            ("puts", builtin_puts),
        ];

        table
            .into_iter()
            .map(|(name, func)| (name, Object::builtin(name, func)))
            .collect()
    };
}

/// Returns the builtin bound to `name`, the same object on every call.
pub fn lookup_builtin(name: &str) -> Option<Object> {
    BUILTINS.with(|builtins| builtins.get(name).cloned())
}

fn check_arity(arguments: &[Object], want: usize) -> Result<(), Object> {
    if arguments.len() != want {
        return Err(Object::error(format!(
            "wrong number of arguments. got={}, want={}",
            arguments.len(),
            want
        )));
    }
    Ok(())
}

/// Checks the argument count and that the first argument is an array.
fn array_argument<'a>(
    name: &str,
    arguments: &'a [Object],
    want: usize,
) -> Result<&'a [Object], Object> {
    check_arity(arguments, want)?;

    match arguments[0].kind() {
        ObjectKind::Array(elements) => Ok(elements.as_slice()),
        _ => Err(Object::error(format!(
            "argument to `{}` must be ARRAY, got {}",
            name,
            arguments[0].object_type()
        ))),
    }
}

fn builtin_len(_: &Evaluator, arguments: Vec<Object>) -> Object {
    if let Err(error) = check_arity(&arguments, 1) {
        return error;
    }

    match arguments[0].kind() {
        ObjectKind::String(value) => Object::integer(value.chars().count() as i64),
        ObjectKind::Array(elements) => Object::integer(elements.len() as i64),
        _ => Object::error(format!(
            "argument to `len` not supported, got {}",
            arguments[0].object_type()
        )),
    }
}

fn builtin_first(_: &Evaluator, arguments: Vec<Object>) -> Object {
    let elements = match array_argument("first", &arguments, 1) {
        Ok(elements) => elements,
        Err(error) => return error,
    };

    elements.first().cloned().unwrap_or_else(Object::null)
}

fn builtin_last(_: &Evaluator, arguments: Vec<Object>) -> Object {
    let elements = match array_argument("last", &arguments, 1) {
        Ok(elements) => elements,
        Err(error) => return error,
    };

    elements.last().cloned().unwrap_or_else(Object::null)
}

/// A new array without the first element; the argument is left untouched.
fn builtin_rest(_: &Evaluator, arguments: Vec<Object>) -> Object {
    let elements = match array_argument("rest", &arguments, 1) {
        Ok(elements) => elements,
        Err(error) => return error,
    };

    match elements.split_first() {
        Some((_, rest)) => Object::array(rest.to_vec()),
        None => Object::null(),
    }
}

/// A new array with the value appended; the argument is left untouched.
fn builtin_push(_: &Evaluator, arguments: Vec<Object>) -> Object {
    let elements = match array_argument("push", &arguments, 2) {
        Ok(elements) => elements,
        Err(error) => return error,
    };

    let mut pushed = Vec::with_capacity(elements.len() + 1);
    pushed.extend_from_slice(elements);
    pushed.push(arguments[1].clone());

    Object::array(pushed)
}

fn builtin_puts(evaluator: &Evaluator, arguments: Vec<Object>) -> Object {
    for argument in &arguments {
        if let Err(err) = evaluator.write_line(&argument.inspect()) {
            return Object::error(format!("could not write output: {}", err));
        }
    }

    Object::null()
}
