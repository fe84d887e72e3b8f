//! Lexical analysis module for the interpreter.
//!
//! This module contains the lexer (tokenizer) that converts source text
//! into a stream of tokens for parsing. It handles:
//!
//! - Pull-based tokenization using an ordered table of regex patterns
//! - Recognition of keywords, identifiers, integer and string literals
//! - Token span tracking for diagnostics
//! - `ILLEGAL` tokens for unrecognised characters (lexing never fails)

pub mod lexer;
pub mod tokens;
