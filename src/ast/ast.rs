use std::fmt::{self, Display};

use super::{
    expressions::{
        ArrayExpr, BooleanExpr, CallExpr, FunctionExpr, HashExpr, IdentifierExpr, IfExpr,
        IndexExpr, InfixExpr, IntegerExpr, PrefixExpr, StringExpr,
    },
    statements::{ExpressionStmt, LetStmt, ReturnStmt},
};

/// Node Trait
///
/// Shared behaviour of every AST node. The canonical string form comes from `Display`.
pub trait Node: Display {
    /// Returns the literal text of the token the node was built from.
    fn token_literal(&self) -> String;
}

/// Statements
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Let(LetStmt),
    Return(ReturnStmt),
    Expression(ExpressionStmt),
}

impl Node for Statement {
    fn token_literal(&self) -> String {
        match self {
            Statement::Let(stmt) => stmt.token_literal(),
            Statement::Return(stmt) => stmt.token_literal(),
            Statement::Expression(stmt) => stmt.token_literal(),
        }
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Let(stmt) => Display::fmt(stmt, f),
            Statement::Return(stmt) => Display::fmt(stmt, f),
            Statement::Expression(stmt) => Display::fmt(stmt, f),
        }
    }
}

/// Expressions
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Identifier(IdentifierExpr),
    Integer(IntegerExpr),
    Boolean(BooleanExpr),
    String(StringExpr),
    Prefix(PrefixExpr),
    Infix(InfixExpr),
    If(IfExpr),
    Function(FunctionExpr),
    Call(CallExpr),
    Array(ArrayExpr),
    Index(IndexExpr),
    Hash(HashExpr),
}

impl Node for Expression {
    fn token_literal(&self) -> String {
        match self {
            Expression::Identifier(expr) => expr.token_literal(),
            Expression::Integer(expr) => expr.token_literal(),
            Expression::Boolean(expr) => expr.token_literal(),
            Expression::String(expr) => expr.token_literal(),
            Expression::Prefix(expr) => expr.token_literal(),
            Expression::Infix(expr) => expr.token_literal(),
            Expression::If(expr) => expr.token_literal(),
            Expression::Function(expr) => expr.token_literal(),
            Expression::Call(expr) => expr.token_literal(),
            Expression::Array(expr) => expr.token_literal(),
            Expression::Index(expr) => expr.token_literal(),
            Expression::Hash(expr) => expr.token_literal(),
        }
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Identifier(expr) => Display::fmt(expr, f),
            Expression::Integer(expr) => Display::fmt(expr, f),
            Expression::Boolean(expr) => Display::fmt(expr, f),
            Expression::String(expr) => Display::fmt(expr, f),
            Expression::Prefix(expr) => Display::fmt(expr, f),
            Expression::Infix(expr) => Display::fmt(expr, f),
            Expression::If(expr) => Display::fmt(expr, f),
            Expression::Function(expr) => Display::fmt(expr, f),
            Expression::Call(expr) => Display::fmt(expr, f),
            Expression::Array(expr) => Display::fmt(expr, f),
            Expression::Index(expr) => Display::fmt(expr, f),
            Expression::Hash(expr) => Display::fmt(expr, f),
        }
    }
}

/// Root of a parsed source text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Node for Program {
    fn token_literal(&self) -> String {
        self.statements
            .first()
            .map(|stmt| stmt.token_literal())
            .unwrap_or_default()
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for stmt in &self.statements {
            write!(f, "{}", stmt)?;
        }
        Ok(())
    }
}

/// Writes `items` separated by `", "`.
pub(crate) fn write_joined<T: Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

/// Writes an optional child node; a missing child renders as nothing.
pub(crate) fn write_optional<T: Display>(
    f: &mut fmt::Formatter<'_>,
    item: &Option<T>,
) -> fmt::Result {
    match item {
        Some(item) => write!(f, "{}", item),
        None => Ok(()),
    }
}
