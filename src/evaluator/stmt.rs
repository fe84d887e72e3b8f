use crate::{
    ast::{
        ast::{Program, Statement},
        statements::BlockStmt,
    },
    object::{
        environment::Env,
        object::{Object, ObjectKind},
    },
};

use super::{
    evaluator::{EvalResult, Evaluator},
    expr::{eval_expression, eval_operand},
};

fn is_return_value(result: &Option<Object>) -> bool {
    matches!(
        result.as_ref().map(Object::kind),
        Some(ObjectKind::ReturnValue(_))
    )
}

/// Evaluates the top-level statements, unwrapping the first `return`.
pub fn eval_program(
    evaluator: &Evaluator,
    program: &Program,
    env: &Env,
) -> EvalResult<Option<Object>> {
    let mut result = None;

    for statement in &program.statements {
        result = eval_statement(evaluator, statement, env)?;

        if let Some(ObjectKind::ReturnValue(value)) = result.as_ref().map(Object::kind) {
            return Ok(Some(value.clone()));
        }
    }

    Ok(result)
}

/// Evaluates a block. A `return` stops the block but stays wrapped, so it
/// keeps propagating through enclosing blocks up to the function call.
pub fn eval_block_stmt(
    evaluator: &Evaluator,
    block: &BlockStmt,
    env: &Env,
) -> EvalResult<Option<Object>> {
    let mut result = None;

    for statement in block.iter() {
        result = eval_statement(evaluator, statement, env)?;

        if is_return_value(&result) {
            break;
        }
    }

    Ok(result)
}

pub fn eval_statement(
    evaluator: &Evaluator,
    statement: &Statement,
    env: &Env,
) -> EvalResult<Option<Object>> {
    match statement {
        Statement::Expression(stmt) => {
            eval_operand(evaluator, stmt.expression.as_ref(), env).map(Some)
        }
        Statement::Let(stmt) => {
            let value = eval_operand(evaluator, stmt.value.as_ref(), env)?;
            env.borrow_mut().set(stmt.name.value.clone(), value);

            Ok(None)
        }
        Statement::Return(stmt) => {
            let value = match &stmt.value {
                Some(expression) => eval_expression(evaluator, expression, env)?,
                None => Object::null(),
            };

            Ok(Some(Object::return_value(value)))
        }
    }
}
