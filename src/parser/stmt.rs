use crate::{
    ast::{
        ast::Statement,
        expressions::IdentifierExpr,
        statements::{BlockStmt, ExpressionStmt, LetStmt, ReturnStmt},
    },
    errors::errors::ErrorImpl,
    lexer::tokens::TokenKind,
};

use super::{expr::parse_expr, lookups::BindingPower, parser::Parser};

/// Parses one statement starting at the current token.
///
/// On return the current token is the last token of the statement, so the
/// caller advances once to reach the next one.
pub fn parse_stmt(parser: &mut Parser) -> Option<Statement> {
    if let Some(stmt_fn) = parser
        .get_stmt_lookup()
        .get(&parser.current_token_kind())
        .copied()
    {
        return stmt_fn(parser);
    }

    parse_expression_stmt(parser)
}

pub fn parse_let_stmt(parser: &mut Parser) -> Option<Statement> {
    let token = parser.current_token().clone();

    parser.expect_peek(TokenKind::Identifier)?;
    let name_token = parser.current_token().clone();
    let name = IdentifierExpr {
        value: name_token.literal.clone(),
        token: name_token,
    };

    parser.expect_peek(TokenKind::Assign)?;
    parser.advance();

    let value = parse_expr(parser, BindingPower::Lowest);

    if parser.peek_token_is(TokenKind::Semicolon) {
        parser.advance();
    }

    Some(Statement::Let(LetStmt { token, name, value }))
}

pub fn parse_return_stmt(parser: &mut Parser) -> Option<Statement> {
    let token = parser.current_token().clone();

    // `return;` and a `return` right before `}` carry no value
    if parser.peek_token().is_one_of_many(&[
        TokenKind::Semicolon,
        TokenKind::CloseCurly,
        TokenKind::EOF,
    ]) {
        if parser.peek_token_is(TokenKind::Semicolon) {
            parser.advance();
        }
        return Some(Statement::Return(ReturnStmt { token, value: None }));
    }

    parser.advance();
    let value = parse_expr(parser, BindingPower::Lowest);

    if parser.peek_token_is(TokenKind::Semicolon) {
        parser.advance();
    }

    Some(Statement::Return(ReturnStmt { token, value }))
}

pub fn parse_expression_stmt(parser: &mut Parser) -> Option<Statement> {
    let token = parser.current_token().clone();
    let expression = parse_expr(parser, BindingPower::Lowest);

    if parser.peek_token_is(TokenKind::Semicolon) {
        parser.advance();
    }

    Some(Statement::Expression(ExpressionStmt { token, expression }))
}

/// Parses the statements between `{` (the current token) and its `}`.
///
/// Stops at `EOF` as well, recording the missing `}`.
pub fn parse_block_stmt(parser: &mut Parser) -> BlockStmt {
    let token = parser.advance();
    let mut statements = vec![];

    while !parser
        .current_token()
        .is_one_of_many(&[TokenKind::CloseCurly, TokenKind::EOF])
    {
        if let Some(stmt) = parse_stmt(parser) {
            statements.push(stmt);
        }
        parser.advance();
    }

    if parser.current_token_is(TokenKind::EOF) {
        parser.push_error(
            ErrorImpl::UnexpectedToken {
                expected: TokenKind::CloseCurly,
                got: TokenKind::EOF,
            },
            parser.get_position(),
        );
    }

    BlockStmt { token, statements }
}
