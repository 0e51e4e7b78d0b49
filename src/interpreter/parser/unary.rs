use std::{iter::Peekable, sync::Arc};

use crate::{
    ast::{Expr, FunctionLit, UnaryOperator},
    interpreter::{
        lexer::{Pos, Token},
        parser::{
            core::{ParseResult, parse_expression},
            statement::parse_block,
            types::parse_type_spec,
            utils::{end_of_input, expect, parse_comma_separated, parse_identifier, unexpected},
        },
    },
};

/// Parses a unary expression.
///
/// Grammar: `unary := ("!" | "-" | "typeof") unary | "await" unary | postfix`
///
/// # Errors
/// Propagates errors from operand parsing.
pub fn parse_unary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    match tokens.peek() {
        Some((Token::Bang, pos)) => {
            let line = pos.line;
            tokens.next();
            let operand = parse_unary(tokens)?;
            Ok(Expr::Unary { op: UnaryOperator::Not,
                             operand: Box::new(operand),
                             line })
        },
        Some((Token::Minus, pos)) => {
            let line = pos.line;
            tokens.next();
            let operand = parse_unary(tokens)?;
            Ok(Expr::Unary { op: UnaryOperator::Negate,
                             operand: Box::new(operand),
                             line })
        },
        Some((Token::TypeOf, pos)) => {
            let line = pos.line;
            tokens.next();
            let operand = parse_unary(tokens)?;
            Ok(Expr::Unary { op: UnaryOperator::TypeOf,
                             operand: Box::new(operand),
                             line })
        },
        Some((Token::Await, pos)) => {
            let line = pos.line;
            tokens.next();
            let expr = parse_unary(tokens)?;
            Ok(Expr::Await { expr: Box::new(expr),
                             line })
        },
        _ => parse_postfix(tokens),
    }
}

/// Parses a postfix chain: calls, indexing and field access.
///
/// Grammar: `postfix := primary ("(" args ")" | "[" expr "]" | "." ident)*`
pub fn parse_postfix<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let mut expr = parse_primary(tokens)?;

    loop {
        match tokens.peek() {
            Some((Token::LParen, pos)) => {
                let line = pos.line;
                tokens.next();
                let args = parse_comma_separated(tokens, parse_expression, &Token::RParen)?;
                expr = Expr::Call { callee: Box::new(expr),
                                    args,
                                    line };
            },
            Some((Token::LBracket, pos)) => {
                let line = pos.line;
                tokens.next();
                let index = parse_expression(tokens)?;
                expect(tokens, &Token::RBracket, "Expected ']' after index")?;
                expr = Expr::Index { base: Box::new(expr),
                                     index: Box::new(index),
                                     line };
            },
            Some((Token::Dot, pos)) => {
                let line = pos.line;
                tokens.next();
                let name = parse_identifier(tokens)?;
                expr = Expr::Field { base: Box::new(expr),
                                     name,
                                     line };
            },
            _ => break,
        }
    }

    Ok(expr)
}

/// Parses a primary expression: literals, identifiers, parenthesized
/// expressions, array and object literals, and inline function literals.
fn parse_primary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let fallback = Pos { line: 0, column: 0 };
    match tokens.next() {
        Some((Token::Int(value), pos)) => Ok(Expr::IntLit { value: *value,
                                                            line:  pos.line, }),
        Some((Token::Float(value), pos)) => Ok(Expr::FloatLit { value: *value,
                                                                line:  pos.line, }),
        Some((Token::Str(value), pos)) => {
            Ok(Expr::StringLit { value:        value.clone(),
                                 interpolated: value.contains("${"),
                                 line:         pos.line, })
        },
        Some((Token::Bool(value), pos)) => Ok(Expr::BoolLit { value: *value,
                                                              line:  pos.line, }),
        Some((Token::Identifier(name), pos)) => Ok(Expr::Ident { name: name.clone(),
                                                                 line: pos.line, }),
        Some((Token::LParen, _)) => {
            let expr = parse_expression(tokens)?;
            expect(tokens, &Token::RParen, "Expected ')' after expression")?;
            Ok(expr)
        },
        Some((Token::LBracket, pos)) => {
            let elements = parse_comma_separated(tokens, parse_expression, &Token::RBracket)?;
            Ok(Expr::ArrayLit { elements,
                                line: pos.line })
        },
        Some((Token::LBrace, pos)) => parse_object_literal(tokens, pos.line),
        Some((Token::Func, pos)) => parse_function_literal(tokens, pos.line),
        Some((tok, pos)) => Err(unexpected("Expected expression", tok, *pos)),
        None => Err(end_of_input(fallback)),
    }
}

/// Parses an object literal after its opening `{`.
///
/// Grammar: `object := "{" (ident ":" expr ("," ident ":" expr)*)? "}"`
fn parse_object_literal<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let mut fields = Vec::new();

    if !matches!(tokens.peek(), Some((Token::RBrace, _))) {
        loop {
            let name = parse_identifier(tokens)?;
            expect(tokens, &Token::Colon, "Expected ':' after property name")?;
            let value = parse_expression(tokens)?;
            fields.push((name, value));

            match tokens.peek() {
                Some((Token::Comma, _)) => {
                    tokens.next();
                },
                _ => break,
            }
        }
    }
    expect(tokens, &Token::RBrace, "Expected '}' after object fields")?;

    Ok(Expr::ObjectLit { fields, line })
}

/// Parses an inline function literal after its `func` keyword:
/// `func(x: int, y: int) -> int { ... }`.
fn parse_function_literal<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    expect(tokens, &Token::LParen, "Expected '(' after 'func'")?;
    let params = parse_comma_separated(tokens, super::core::parse_param, &Token::RParen)?;
    expect(tokens, &Token::Arrow, "Expected '->' after parameters")?;
    let return_type = parse_type_spec(tokens)?;
    let body = parse_block(tokens)?;

    Ok(Expr::FunctionLit { func: Arc::new(FunctionLit { params,
                                                        return_type,
                                                        body,
                                                        line }),
                           line })
}
