//! Tree-walking evaluator.
//!
//! This module turns a parsed program into runtime values. It handles:
//!
//! - Statements, blocks and `return` propagation
//! - Prefix, infix, index and call expressions
//! - Closures over their defining environment
//! - The builtin functions (`len`, `first`, `last`, `rest`, `push`, `puts`)
//!
//! Runtime failures are error objects that short-circuit the remaining
//! evaluation and are handed back as the result.

pub mod builtins;
pub mod evaluator;
pub mod expr;
pub mod stmt;

#[cfg(test)]
mod tests;
