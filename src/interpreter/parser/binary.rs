use std::iter::Peekable;

use crate::{
    ast::{BinaryOperator, Expr},
    error::ParseError,
    interpreter::{
        lexer::{Pos, Token},
        parser::{core::ParseResult, unary::parse_unary},
    },
};

/// Parses an assignment expression.
///
/// Grammar: `assignment := logical_or ("=" assignment)?`
///
/// Assignment is right-associative. When the left-hand side is an identifier,
/// index access or field access, the node is rewritten into the matching
/// assignment variant; any other target is a syntax error.
///
/// # Errors
/// Returns [`ParseError::InvalidAssignmentTarget`] for an unassignable
/// left-hand side, and propagates operand errors.
pub fn parse_assignment<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let expr = parse_logical_or(tokens)?;

    if let Some((Token::Equals, pos)) = tokens.peek() {
        let pos = *pos;
        tokens.next();
        let value = parse_assignment(tokens)?;

        return match expr {
            Expr::Ident { name, line } => Ok(Expr::Assign { name,
                                                            value: Box::new(value),
                                                            line }),
            Expr::Index { base, index, line } => Ok(Expr::IndexAssign { base,
                                                                        index,
                                                                        value: Box::new(value),
                                                                        line }),
            Expr::Field { base, name, line } => Ok(Expr::FieldAssign { base,
                                                                       name,
                                                                       value: Box::new(value),
                                                                       line }),
            _ => Err(ParseError::InvalidAssignmentTarget { line:   pos.line,
                                                           column: pos.column, }),
        };
    }

    Ok(expr)
}

/// Parses logical OR expressions.
///
/// Grammar: `logical_or := logical_and ("||" logical_and)*`
pub fn parse_logical_or<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let mut left = parse_logical_and(tokens)?;

    while let Some((Token::PipePipe, pos)) = tokens.peek() {
        let line = pos.line;
        tokens.next();
        let right = parse_logical_and(tokens)?;
        left = Expr::Binary { left: Box::new(left),
                              op: BinaryOperator::Or,
                              right: Box::new(right),
                              line };
    }

    Ok(left)
}

/// Parses logical AND expressions.
///
/// Grammar: `logical_and := equality ("&&" equality)*`
pub fn parse_logical_and<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let mut left = parse_equality(tokens)?;

    while let Some((Token::AmpAmp, pos)) = tokens.peek() {
        let line = pos.line;
        tokens.next();
        let right = parse_equality(tokens)?;
        left = Expr::Binary { left: Box::new(left),
                              op: BinaryOperator::And,
                              right: Box::new(right),
                              line };
    }

    Ok(left)
}

/// Parses equality expressions.
///
/// Grammar: `equality := comparison (("==" | "!=") comparison)*`
pub fn parse_equality<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let mut left = parse_comparison(tokens)?;

    loop {
        let (op, line) = match tokens.peek() {
            Some((Token::EqualEqual, pos)) => (BinaryOperator::Equal, pos.line),
            Some((Token::BangEqual, pos)) => (BinaryOperator::NotEqual, pos.line),
            _ => break,
        };
        tokens.next();
        let right = parse_comparison(tokens)?;
        left = Expr::Binary { left: Box::new(left),
                              op,
                              right: Box::new(right),
                              line };
    }

    Ok(left)
}

/// Parses comparison expressions.
///
/// Grammar: `comparison := term (("<" | ">" | "<=" | ">=") term)*`
pub fn parse_comparison<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let mut left = parse_term(tokens)?;

    loop {
        let (op, line) = match tokens.peek() {
            Some((Token::Less, pos)) => (BinaryOperator::Less, pos.line),
            Some((Token::Greater, pos)) => (BinaryOperator::Greater, pos.line),
            Some((Token::LessEqual, pos)) => (BinaryOperator::LessEqual, pos.line),
            Some((Token::GreaterEqual, pos)) => (BinaryOperator::GreaterEqual, pos.line),
            _ => break,
        };
        tokens.next();
        let right = parse_term(tokens)?;
        left = Expr::Binary { left: Box::new(left),
                              op,
                              right: Box::new(right),
                              line };
    }

    Ok(left)
}

/// Parses additive expressions.
///
/// Grammar: `term := factor (("+" | "-") factor)*`
pub fn parse_term<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let mut left = parse_factor(tokens)?;

    loop {
        let (op, line) = match tokens.peek() {
            Some((Token::Plus, pos)) => (BinaryOperator::Add, pos.line),
            Some((Token::Minus, pos)) => (BinaryOperator::Sub, pos.line),
            _ => break,
        };
        tokens.next();
        let right = parse_factor(tokens)?;
        left = Expr::Binary { left: Box::new(left),
                              op,
                              right: Box::new(right),
                              line };
    }

    Ok(left)
}

/// Parses multiplicative expressions.
///
/// Grammar: `factor := unary (("*" | "/" | "%") unary)*`
pub fn parse_factor<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let mut left = parse_unary(tokens)?;

    loop {
        let (op, line) = match tokens.peek() {
            Some((Token::Star, pos)) => (BinaryOperator::Mul, pos.line),
            Some((Token::Slash, pos)) => (BinaryOperator::Div, pos.line),
            Some((Token::Percent, pos)) => (BinaryOperator::Mod, pos.line),
            _ => break,
        };
        tokens.next();
        let right = parse_unary(tokens)?;
        left = Expr::Binary { left: Box::new(left),
                              op,
                              right: Box::new(right),
                              line };
    }

    Ok(left)
}
