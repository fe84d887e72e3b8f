//! Main evaluator module.
//!
//! This module contains the Evaluator structure, which walks a parsed
//! program and produces runtime values. The walk itself lives in free
//! functions in the sibling `stmt` and `expr` modules; the Evaluator
//! carries the configuration, the output sink used by `puts` and the
//! current user function call depth.

use std::{
    cell::{Cell, RefCell},
    fmt,
    io::{self, Write},
};

use tracing::warn;

use crate::{
    ast::{
        ast::{Expression, Program, Statement},
        statements::BlockStmt,
    },
    object::{environment::Env, object::Object},
};

use super::{
    expr::eval_expression,
    stmt::{eval_block_stmt, eval_program, eval_statement},
};

/// Default bound on nested user function calls.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 200;

/// `Err` always holds an error object; it short-circuits the rest of the walk.
pub type EvalResult<T = Object> = Result<T, Object>;

/// Evaluation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalConfig {
    /// Deepest user function call nesting before evaluation gives up
    pub max_call_depth: usize,
}

impl Default for EvalConfig {
    fn default() -> Self {
        EvalConfig {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }
}

impl EvalConfig {
    pub fn with_max_call_depth(mut self, max_call_depth: usize) -> Self {
        self.max_call_depth = max_call_depth;
        self
    }
}

/// The tree-walking evaluator.
///
/// One instance can run any number of programs, each against its own
/// environment. Runtime failures come back as error objects rather than
/// Rust errors.
pub struct Evaluator {
    /// Limits applied while evaluating
    config: EvalConfig,
    /// Number of user function calls currently on the stack
    call_depth: Cell<usize>,
    /// Where `puts` writes
    output: RefCell<Box<dyn Write>>,
}

impl Evaluator {
    /// Creates an evaluator with the default configuration writing to stdout.
    pub fn new() -> Self {
        Self::with_config(EvalConfig::default())
    }

    pub fn with_config(config: EvalConfig) -> Self {
        Evaluator {
            config,
            call_depth: Cell::new(0),
            output: RefCell::new(Box::new(io::stdout())),
        }
    }

    /// Replaces the sink `puts` writes to.
    pub fn with_output(self, output: impl Write + 'static) -> Self {
        Evaluator {
            output: RefCell::new(Box::new(output)),
            ..self
        }
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// Evaluates a whole program.
    ///
    /// Returns the value of the last statement, the value of the first
    /// top-level `return`, or the first error raised. `None` means the last
    /// statement produced no value (a `let`, or an empty program).
    pub fn eval(&self, program: &Program, env: &Env) -> Option<Object> {
        self.call_depth.set(0);

        eval_program(self, program, env).unwrap_or_else(Some)
    }

    /// Evaluates a single statement. A `return` comes back wrapped as a
    /// return value.
    pub fn eval_statement(&self, statement: &Statement, env: &Env) -> Option<Object> {
        eval_statement(self, statement, env).unwrap_or_else(Some)
    }

    /// Evaluates a block without unwrapping a `return` inside it.
    pub fn eval_block(&self, block: &BlockStmt, env: &Env) -> Option<Object> {
        eval_block_stmt(self, block, env).unwrap_or_else(Some)
    }

    pub fn eval_expression(&self, expression: &Expression, env: &Env) -> Object {
        eval_expression(self, expression, env).unwrap_or_else(|error| error)
    }

    /// Records entry into a user function, failing past the configured depth.
    pub(crate) fn enter_call(&self) -> EvalResult<()> {
        let depth = self.call_depth.get();

        if depth >= self.config.max_call_depth {
            warn!(
                max_call_depth = self.config.max_call_depth,
                "call depth exhausted"
            );
            return Err(Object::error(format!(
                "maximum call depth of {} exceeded",
                self.config.max_call_depth
            )));
        }

        self.call_depth.set(depth + 1);
        Ok(())
    }

    pub(crate) fn exit_call(&self) {
        self.call_depth.set(self.call_depth.get().saturating_sub(1));
    }

    pub(crate) fn call_depth(&self) -> usize {
        self.call_depth.get()
    }

    /// Writes one line to the output sink.
    pub(crate) fn write_line(&self, line: &str) -> io::Result<()> {
        let mut output = self.output.borrow_mut();
        writeln!(output, "{}", line)?;
        output.flush()
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Evaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Evaluator")
            .field("config", &self.config)
            .field("call_depth", &self.call_depth.get())
            .finish_non_exhaustive()
    }
}
