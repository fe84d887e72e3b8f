//! Error types for the parse stage.
//!
//! Parse diagnostics are collected rather than thrown. Each one pairs an
//! [`errors::ErrorImpl`] variant with the source position of the token that
//! triggered it, so the binary can underline the offending text.
//!
//! Runtime failures are not represented here: they are ordinary values
//! (`ObjectKind::Error`) flowing through the evaluator.

pub mod errors;
