use std::{
    fmt::{self, Display},
    rc::Rc,
};

use crate::lexer::tokens::Token;

use super::{
    ast::{write_joined, write_optional, Expression, Node},
    statements::BlockStmt,
};

// LITERALS

/// Identifier Expression
/// A name reference; also used for `let` targets and function parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentifierExpr {
    pub token: Token,
    pub value: String,
}

impl Node for IdentifierExpr {
    fn token_literal(&self) -> String {
        self.token.literal.clone()
    }
}

impl Display for IdentifierExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Integer Expression
#[derive(Debug, Clone, PartialEq)]
pub struct IntegerExpr {
    pub token: Token,
    pub value: i64,
}

impl Node for IntegerExpr {
    fn token_literal(&self) -> String {
        self.token.literal.clone()
    }
}

impl Display for IntegerExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token.literal)
    }
}

/// Boolean Expression
#[derive(Debug, Clone, PartialEq)]
pub struct BooleanExpr {
    pub token: Token,
    pub value: bool,
}

impl Node for BooleanExpr {
    fn token_literal(&self) -> String {
        self.token.literal.clone()
    }
}

impl Display for BooleanExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token.literal)
    }
}

/// String Expression
#[derive(Debug, Clone, PartialEq)]
pub struct StringExpr {
    pub token: Token,
    pub value: String,
}

impl Node for StringExpr {
    fn token_literal(&self) -> String {
        self.token.literal.clone()
    }
}

impl Display for StringExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token.literal)
    }
}

// OPERATORS

/// Prefix Expression
/// `!x` or `-x`. `right` is `None` when the operand failed to parse.
#[derive(Debug, Clone, PartialEq)]
pub struct PrefixExpr {
    pub token: Token,
    pub operator: String,
    pub right: Option<Box<Expression>>,
}

impl Node for PrefixExpr {
    fn token_literal(&self) -> String {
        self.token.literal.clone()
    }
}

impl Display for PrefixExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}", self.operator)?;
        write_optional(f, &self.right)?;
        write!(f, ")")
    }
}

/// Infix Expression
#[derive(Debug, Clone, PartialEq)]
pub struct InfixExpr {
    pub token: Token,
    pub left: Box<Expression>,
    pub operator: String,
    pub right: Option<Box<Expression>>,
}

impl Node for InfixExpr {
    fn token_literal(&self) -> String {
        self.token.literal.clone()
    }
}

impl Display for InfixExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {} ", self.left, self.operator)?;
        write_optional(f, &self.right)?;
        write!(f, ")")
    }
}

// CONTROL FLOW AND FUNCTIONS

/// If Expression
#[derive(Debug, Clone, PartialEq)]
pub struct IfExpr {
    pub token: Token,
    pub condition: Option<Box<Expression>>,
    pub consequence: BlockStmt,
    pub alternative: Option<BlockStmt>,
}

impl Node for IfExpr {
    fn token_literal(&self) -> String {
        self.token.literal.clone()
    }
}

impl Display for IfExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "if ")?;
        write_optional(f, &self.condition)?;
        write!(f, " {}", self.consequence)?;
        if let Some(alternative) = &self.alternative {
            write!(f, " else {}", alternative)?;
        }
        Ok(())
    }
}

/// Function Expression
///
/// The body sits behind an `Rc` so function values can share it with the AST
/// instead of deep-copying the block every time the literal is evaluated.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionExpr {
    pub token: Token,
    pub parameters: Vec<IdentifierExpr>,
    pub body: Rc<BlockStmt>,
}

impl Node for FunctionExpr {
    fn token_literal(&self) -> String {
        self.token.literal.clone()
    }
}

impl Display for FunctionExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.token_literal())?;
        write_joined(f, &self.parameters)?;
        write!(f, ") {}", self.body)
    }
}

/// Call Expression
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub token: Token,
    pub callee: Box<Expression>,
    pub arguments: Vec<Expression>,
}

impl Node for CallExpr {
    fn token_literal(&self) -> String {
        self.token.literal.clone()
    }
}

impl Display for CallExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.callee)?;
        write_joined(f, &self.arguments)?;
        write!(f, ")")
    }
}

// COLLECTIONS

/// Array Expression
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayExpr {
    pub token: Token,
    pub elements: Vec<Expression>,
}

impl Node for ArrayExpr {
    fn token_literal(&self) -> String {
        self.token.literal.clone()
    }
}

impl Display for ArrayExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        write_joined(f, &self.elements)?;
        write!(f, "]")
    }
}

/// Index Expression
#[derive(Debug, Clone, PartialEq)]
pub struct IndexExpr {
    pub token: Token,
    pub left: Box<Expression>,
    pub index: Option<Box<Expression>>,
}

impl Node for IndexExpr {
    fn token_literal(&self) -> String {
        self.token.literal.clone()
    }
}

impl Display for IndexExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}[", self.left)?;
        write_optional(f, &self.index)?;
        write!(f, "])")
    }
}

/// Hash Expression
/// Pairs stay in source order; keys may be any expression.
#[derive(Debug, Clone, PartialEq)]
pub struct HashExpr {
    pub token: Token,
    pub pairs: Vec<(Expression, Expression)>,
}

impl Node for HashExpr {
    fn token_literal(&self) -> String {
        self.token.literal.clone()
    }
}

impl Display for HashExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.pairs.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", key, value)?;
        }
        write!(f, "}}")
    }
}
