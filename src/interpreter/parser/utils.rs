use std::iter::Peekable;

use crate::{
    error::ParseError,
    interpreter::{
        lexer::{Pos, Token},
        parser::core::ParseResult,
    },
};

/// Builds the standard "expected X, found Y" error for the token at `pos`.
pub(in crate::interpreter::parser) fn unexpected(message: &str, token: &Token, pos: Pos)
                                                 -> ParseError {
    ParseError::UnexpectedToken { message: message.to_string(),
                                  lexeme:  token.lexeme(),
                                  line:    pos.line,
                                  column:  pos.column, }
}

/// Builds an end-of-input error at the last known position.
pub(in crate::interpreter::parser) fn end_of_input(pos: Pos) -> ParseError {
    ParseError::UnexpectedEndOfInput { line:   pos.line,
                                       column: pos.column, }
}

/// The position of the next token, or the fallback when input is exhausted.
pub(in crate::interpreter::parser) fn peek_pos<'a, I>(tokens: &mut Peekable<I>, fallback: Pos)
                                                      -> Pos
    where I: Iterator<Item = &'a (Token, Pos)>
{
    tokens.peek().map_or(fallback, |(_, pos)| *pos)
}

/// Consumes the next token, which must equal `expected`.
///
/// # Errors
/// Returns a `ParseError` naming `what` if the next token differs or the
/// stream is exhausted.
pub(in crate::interpreter::parser) fn expect<'a, I>(tokens: &mut Peekable<I>,
                                                    expected: &Token,
                                                    what: &str)
                                                    -> ParseResult<Pos>
    where I: Iterator<Item = &'a (Token, Pos)>
{
    match tokens.next() {
        Some((tok, pos)) if tok == expected => Ok(*pos),
        Some((tok, pos)) => Err(unexpected(what, tok, *pos)),
        None => Err(end_of_input(Pos { line: 0, column: 0 })),
    }
}

/// Parses a plain identifier and returns its name.
///
/// # Errors
/// Returns a `ParseError` if the next token is not an identifier or the
/// input ends unexpectedly.
pub(in crate::interpreter::parser) fn parse_identifier<'a, I>(tokens: &mut Peekable<I>)
                                                              -> ParseResult<String>
    where I: Iterator<Item = &'a (Token, Pos)>
{
    match tokens.next() {
        Some((Token::Identifier(name), _)) => Ok(name.clone()),
        Some((tok, pos)) => Err(unexpected("Expected identifier", tok, *pos)),
        None => Err(end_of_input(Pos { line: 0, column: 0 })),
    }
}

/// Parses a comma-separated list of items until a closing token.
///
/// This utility is shared by array literals, object literals, call argument
/// lists and parameter lists. It repeatedly calls `parse_item` to parse one
/// element, expecting either a comma (continue) or the closing token (stop).
/// An immediately encountered closing token produces an empty list. The
/// closing token is consumed.
///
/// # Errors
/// Returns a `ParseError` if an item fails to parse, an unexpected token is
/// encountered, or the stream ends before the closing token.
pub(in crate::interpreter::parser) fn parse_comma_separated<'a, I, T>(
    tokens: &mut Peekable<I>,
    parse_item: impl Fn(&mut Peekable<I>) -> ParseResult<T>,
    closing: &Token)
    -> ParseResult<Vec<T>>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let mut items = Vec::new();
    if let Some((tok, _)) = tokens.peek()
       && tok == closing
    {
        tokens.next();

        return Ok(items);
    }
    loop {
        items.push(parse_item(tokens)?);
        match tokens.peek() {
            Some((Token::Comma, _)) => {
                tokens.next();
            },
            Some((tok, _)) if tok == closing => {
                tokens.next();
                break;
            },
            Some((tok, pos)) => {
                return Err(unexpected(&format!("Expected ',' or '{}'", closing.lexeme()),
                                      tok,
                                      *pos));
            },
            None => return Err(end_of_input(Pos { line: 0, column: 0 })),
        }
    }
    Ok(items)
}
