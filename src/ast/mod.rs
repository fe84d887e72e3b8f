/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: The `Node` trait, the closed `Statement`/`Expression` enums and `Program`
/// - expressions: Definitions for the expression node types
/// - statements: Definitions for the statement node types
///
/// Every node renders a canonical string form through `Display`; prefix and
/// infix expressions are fully parenthesized so precedence is visible.
pub mod ast;
pub mod expressions;
pub mod statements;
