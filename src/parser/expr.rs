use std::rc::Rc;

use crate::{
    ast::{
        ast::Expression,
        expressions::{
            ArrayExpr, BooleanExpr, CallExpr, FunctionExpr, HashExpr, IdentifierExpr, IfExpr,
            IndexExpr, InfixExpr, IntegerExpr, PrefixExpr, StringExpr,
        },
    },
    errors::errors::ErrorImpl,
    lexer::tokens::TokenKind,
};

use super::{lookups::BindingPower, parser::Parser, stmt::parse_block_stmt};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Option<Expression> {
    if !parser.enter_nesting() {
        return None;
    }
    let expr = parse_expr_inner(parser, bp);
    parser.exit_nesting();
    expr
}

fn parse_expr_inner(parser: &mut Parser, bp: BindingPower) -> Option<Expression> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let Some(nud) = parser.get_nud_lookup().get(&token_kind).copied() else {
        parser.push_error(
            ErrorImpl::NoPrefixParseFn { kind: token_kind },
            parser.get_position(),
        );
        return None;
    };

    let left = nud(parser)?;

    let mut folds = 0;
    let expr = fold_infix(parser, left, bp, &mut folds);
    for _ in 0..folds {
        parser.exit_nesting();
    }
    expr
}

/// While the next operator binds tighter than `bp`, fold it into the left side.
///
/// Every fold deepens the left spine by one, so each counts against the
/// nesting ceiling; `folds` tells the caller how many levels to release.
fn fold_infix(
    parser: &mut Parser,
    mut left: Expression,
    bp: BindingPower,
    folds: &mut usize,
) -> Option<Expression> {
    while !parser.peek_token_is(TokenKind::Semicolon) && bp < parser.peek_binding_power() {
        let Some(led) = parser.get_led_lookup().get(&parser.peek_token_kind()).copied() else {
            return Some(left);
        };

        if !parser.enter_nesting() {
            return None;
        }
        *folds += 1;

        parser.advance();
        left = led(parser, left)?;
    }

    Some(left)
}

pub fn parse_identifier_expr(parser: &mut Parser) -> Option<Expression> {
    let token = parser.current_token().clone();

    Some(Expression::Identifier(IdentifierExpr {
        value: token.literal.clone(),
        token,
    }))
}

pub fn parse_integer_expr(parser: &mut Parser) -> Option<Expression> {
    let token = parser.current_token().clone();

    match token.literal.parse::<i64>() {
        Ok(value) => Some(Expression::Integer(IntegerExpr { token, value })),
        Err(_) => {
            parser.push_error(
                ErrorImpl::IntegerParseError {
                    literal: token.literal.clone(),
                },
                token.span.start,
            );
            None
        }
    }
}

pub fn parse_string_expr(parser: &mut Parser) -> Option<Expression> {
    let token = parser.current_token().clone();

    Some(Expression::String(StringExpr {
        value: token.literal.clone(),
        token,
    }))
}

pub fn parse_boolean_expr(parser: &mut Parser) -> Option<Expression> {
    let token = parser.current_token().clone();

    Some(Expression::Boolean(BooleanExpr {
        value: token.kind == TokenKind::True,
        token,
    }))
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Option<Expression> {
    let operator_token = parser.advance();
    let right = parse_expr(parser, BindingPower::Prefix);

    Some(Expression::Prefix(PrefixExpr {
        operator: operator_token.literal.clone(),
        token: operator_token,
        right: right.map(Box::new),
    }))
}

pub fn parse_infix_expr(parser: &mut Parser, left: Expression) -> Option<Expression> {
    let bp = parser.current_binding_power();
    let operator_token = parser.advance();
    let right = parse_expr(parser, bp);

    Some(Expression::Infix(InfixExpr {
        operator: operator_token.literal.clone(),
        token: operator_token,
        left: Box::new(left),
        right: right.map(Box::new),
    }))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Option<Expression> {
    parser.advance();
    let expr = parse_expr(parser, BindingPower::Lowest)?;
    parser.expect_peek(TokenKind::CloseParen)?;

    Some(expr)
}

pub fn parse_if_expr(parser: &mut Parser) -> Option<Expression> {
    let token = parser.current_token().clone();

    parser.expect_peek(TokenKind::OpenParen)?;
    parser.advance();
    let condition = parse_expr(parser, BindingPower::Lowest);

    parser.expect_peek(TokenKind::CloseParen)?;
    parser.expect_peek(TokenKind::OpenCurly)?;
    let consequence = parse_block_stmt(parser);

    let alternative = if parser.peek_token_is(TokenKind::Else) {
        parser.advance();
        parser.expect_peek(TokenKind::OpenCurly)?;
        Some(parse_block_stmt(parser))
    } else {
        None
    };

    Some(Expression::If(IfExpr {
        token,
        condition: condition.map(Box::new),
        consequence,
        alternative,
    }))
}

pub fn parse_function_expr(parser: &mut Parser) -> Option<Expression> {
    let token = parser.current_token().clone();

    parser.expect_peek(TokenKind::OpenParen)?;
    let parameters = parse_function_parameters(parser)?;

    parser.expect_peek(TokenKind::OpenCurly)?;
    let body = parse_block_stmt(parser);

    Some(Expression::Function(FunctionExpr {
        token,
        parameters,
        body: Rc::new(body),
    }))
}

fn parse_function_parameters(parser: &mut Parser) -> Option<Vec<IdentifierExpr>> {
    let mut parameters = vec![];

    if parser.peek_token_is(TokenKind::CloseParen) {
        parser.advance();
        return Some(parameters);
    }

    loop {
        parser.expect_peek(TokenKind::Identifier)?;
        let token = parser.current_token().clone();
        parameters.push(IdentifierExpr {
            value: token.literal.clone(),
            token,
        });

        if !parser.peek_token_is(TokenKind::Comma) {
            break;
        }
        parser.advance();
    }

    parser.expect_peek(TokenKind::CloseParen)?;

    Some(parameters)
}

/// Parses comma separated expressions up to and including `end`.
fn parse_expression_list(parser: &mut Parser, end: TokenKind) -> Option<Vec<Expression>> {
    let mut list = vec![];

    if parser.peek_token_is(end) {
        parser.advance();
        return Some(list);
    }

    parser.advance();
    list.extend(parse_expr(parser, BindingPower::Lowest));

    while parser.peek_token_is(TokenKind::Comma) {
        parser.advance();
        parser.advance();
        list.extend(parse_expr(parser, BindingPower::Lowest));
    }

    parser.expect_peek(end)?;

    Some(list)
}

pub fn parse_call_expr(parser: &mut Parser, left: Expression) -> Option<Expression> {
    let token = parser.current_token().clone();
    let arguments = parse_expression_list(parser, TokenKind::CloseParen)?;

    Some(Expression::Call(CallExpr {
        token,
        callee: Box::new(left),
        arguments,
    }))
}

pub fn parse_array_expr(parser: &mut Parser) -> Option<Expression> {
    let token = parser.current_token().clone();
    let elements = parse_expression_list(parser, TokenKind::CloseBracket)?;

    Some(Expression::Array(ArrayExpr { token, elements }))
}

pub fn parse_index_expr(parser: &mut Parser, left: Expression) -> Option<Expression> {
    let token = parser.advance();
    let index = parse_expr(parser, BindingPower::Lowest);

    parser.expect_peek(TokenKind::CloseBracket)?;

    Some(Expression::Index(IndexExpr {
        token,
        left: Box::new(left),
        index: index.map(Box::new),
    }))
}

pub fn parse_hash_expr(parser: &mut Parser) -> Option<Expression> {
    // {"one": 1, two: 1 + 1}
    let token = parser.current_token().clone();
    let mut pairs = vec![];

    while !parser.peek_token_is(TokenKind::CloseCurly) {
        parser.advance();
        let key = parse_expr(parser, BindingPower::Lowest)?;

        parser.expect_peek(TokenKind::Colon)?;
        parser.advance();
        let value = parse_expr(parser, BindingPower::Lowest)?;

        pairs.push((key, value));

        if !parser.peek_token_is(TokenKind::CloseCurly) {
            parser.expect_peek(TokenKind::Comma)?;
        }
    }

    parser.expect_peek(TokenKind::CloseCurly)?;

    Some(Expression::Hash(HashExpr { token, pairs }))
}
