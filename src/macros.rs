//! Utility macros for the interpreter.
//!
//! This module defines helper macros used by the lexer:
//!
//! - `MK_TOKEN!` - Creates a Token instance
//! - `MK_DEFAULT_HANDLER!` - Creates a default lexer handler for fixed tokens
//!
//! These macros reduce boilerplate in the lexer pattern table.

/// Creates a Token instance.
///
/// # Arguments
///
/// * `$kind` - The TokenKind
/// * `$literal` - The token's literal text
/// * `$span` - The source span
///
/// # Example
///
/// ```ignore
/// let token = MK_TOKEN!(TokenKind::Int, "42".to_string(), span);
/// ```
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $literal:expr, $span:expr) => {
        $crate::lexer::tokens::Token {
            kind: $kind,
            literal: $literal,
            span: $span,
        }
    };
}

/// Creates a default lexer handler for operators and delimiters.
///
/// Generates a handler that turns the matched text into a token of the
/// given kind and moves the lexer past it.
///
/// # Example
///
/// ```ignore
/// pattern("^\\+", MK_DEFAULT_HANDLER!(TokenKind::Plus))
/// ```
#[macro_export]
macro_rules! MK_DEFAULT_HANDLER {
    ($kind:expr) => {
        |lexer: &mut $crate::lexer::lexer::Lexer, matched: &str| {
            let start = lexer.pos();
            lexer.advance_n(matched.len());
            Some($crate::MK_TOKEN!(
                $kind,
                String::from(matched),
                $crate::Span {
                    start: $crate::Position(start as u32),
                    end: $crate::Position(lexer.pos() as u32),
                }
            ))
        }
    };
}
