use std::iter::Peekable;

use crate::{
    interpreter::{
        lexer::{Pos, Token},
        parser::{
            core::ParseResult,
            utils::{end_of_input, parse_identifier, peek_pos, unexpected},
        },
    },
};

/// Parses a type specification and renders it as a canonical string.
///
/// The type sub-grammar appears in variable declarations, parameters, return
/// types and `type` aliases:
///
/// ```text
/// type   := union
/// union  := atom ("|" atom)*
/// atom   := simple | array | object | funcType | literal
/// simple := "int" | "float" | "string" | "bool" | "void" | "any"
///         | "object" | "func" | identifier
/// array  := "[" type ("," type)* "]"
/// object := "{" (ident ":" type ("," ident ":" type)*)? "}"
/// funcType := "(" (type ("," type)*)? ")" "->" type
/// literal := string | int | "true" | "false"
/// ```
///
/// Canonical strings contain no whitespace: `[int]`, `[int,string]`,
/// `{name:string,age:int}`, `int|float|"none"`, `(int,int)->bool`. The
/// matcher consumes exactly these forms.
///
/// # Errors
/// Returns a `ParseError` when the next tokens do not form a type spec.
pub fn parse_type_spec<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<String>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let mut spec = parse_type_atom(tokens)?;

    while let Some((Token::Pipe, _)) = tokens.peek() {
        tokens.next();
        spec.push('|');
        spec.push_str(&parse_type_atom(tokens)?);
    }

    Ok(spec)
}

/// Parses one alternative of a union type.
fn parse_type_atom<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<String>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let pos = peek_pos(tokens, Pos { line: 0, column: 0 });
    match tokens.peek() {
        Some((Token::KwInt, _)) => consume_as(tokens, "int"),
        Some((Token::KwFloat, _)) => consume_as(tokens, "float"),
        Some((Token::KwString, _)) => consume_as(tokens, "string"),
        Some((Token::KwBool, _)) => consume_as(tokens, "bool"),
        Some((Token::KwVoid, _)) => consume_as(tokens, "void"),
        Some((Token::KwAny, _)) => consume_as(tokens, "any"),
        Some((Token::KwObject, _)) => consume_as(tokens, "object"),
        Some((Token::Func, _)) => consume_as(tokens, "func"),
        Some((Token::Identifier(_), _)) => parse_identifier(tokens),
        Some((Token::LBracket, _)) => parse_array_type(tokens),
        Some((Token::LBrace, _)) => parse_object_type(tokens),
        Some((Token::LParen, _)) => parse_function_type(tokens),
        Some((Token::Str(value), _)) => {
            let rendered = format!("\"{value}\"");
            tokens.next();
            Ok(rendered)
        },
        Some((Token::Int(value), _)) => {
            let rendered = value.to_string();
            tokens.next();
            Ok(rendered)
        },
        Some((Token::Minus, _)) => {
            tokens.next();
            match tokens.next() {
                Some((Token::Int(value), _)) => Ok(format!("-{value}")),
                Some((tok, pos)) => {
                    Err(unexpected("Expected integer literal after '-' in type", tok, *pos))
                },
                None => Err(end_of_input(pos)),
            }
        },
        Some((Token::Bool(value), _)) => {
            let rendered = value.to_string();
            tokens.next();
            Ok(rendered)
        },
        Some((tok, pos)) => Err(unexpected("Expected type", tok, *pos)),
        None => Err(end_of_input(pos)),
    }
}

fn consume_as<'a, I>(tokens: &mut Peekable<I>, rendered: &str) -> ParseResult<String>
    where I: Iterator<Item = &'a (Token, Pos)>
{
    tokens.next();
    Ok(rendered.to_string())
}

/// Parses `[T]` (uniform element type) or `[T1,T2,...]` (fixed-length tuple).
fn parse_array_type<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<String>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let pos = peek_pos(tokens, Pos { line: 0, column: 0 });
    tokens.next(); // consume '['

    let mut inner = parse_type_spec(tokens)?;
    while let Some((Token::Comma, _)) = tokens.peek() {
        tokens.next();
        inner.push(',');
        inner.push_str(&parse_type_spec(tokens)?);
    }

    match tokens.next() {
        Some((Token::RBracket, _)) => Ok(format!("[{inner}]")),
        Some((tok, pos)) => Err(unexpected("Expected ']' after array type", tok, *pos)),
        None => Err(end_of_input(pos)),
    }
}

/// Parses `{field:T, ...}`. An empty `{}` matches any object.
fn parse_object_type<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<String>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let pos = peek_pos(tokens, Pos { line: 0, column: 0 });
    tokens.next(); // consume '{'

    let mut fields = Vec::new();
    if !matches!(tokens.peek(), Some((Token::RBrace, _))) {
        loop {
            let name = parse_identifier(tokens)?;
            match tokens.next() {
                Some((Token::Colon, _)) => {},
                Some((tok, pos)) => {
                    return Err(unexpected("Expected ':' after field name in object type",
                                          tok,
                                          *pos));
                },
                None => return Err(end_of_input(pos)),
            }
            let field_type = parse_type_spec(tokens)?;
            fields.push(format!("{name}:{field_type}"));

            match tokens.peek() {
                Some((Token::Comma, _)) => {
                    tokens.next();
                },
                _ => break,
            }
        }
    }

    match tokens.next() {
        Some((Token::RBrace, _)) => Ok(format!("{{{}}}", fields.join(","))),
        Some((tok, pos)) => Err(unexpected("Expected '}' after object type", tok, *pos)),
        None => Err(end_of_input(pos)),
    }
}

/// Parses `(T1, T2, ...) -> T`.
///
/// In type position a `(` can only begin a function type, so no backtracking
/// is needed to distinguish it from a parenthesized expression.
fn parse_function_type<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<String>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let pos = peek_pos(tokens, Pos { line: 0, column: 0 });
    tokens.next(); // consume '('

    let mut params = Vec::new();
    if !matches!(tokens.peek(), Some((Token::RParen, _))) {
        loop {
            params.push(parse_type_spec(tokens)?);
            match tokens.peek() {
                Some((Token::Comma, _)) => {
                    tokens.next();
                },
                _ => break,
            }
        }
    }

    match tokens.next() {
        Some((Token::RParen, _)) => {},
        Some((tok, pos)) => {
            return Err(unexpected("Expected ')' after function type parameters", tok, *pos));
        },
        None => return Err(end_of_input(pos)),
    }
    match tokens.next() {
        Some((Token::Arrow, _)) => {},
        Some((tok, pos)) => return Err(unexpected("Expected '->' in function type", tok, *pos)),
        None => return Err(end_of_input(pos)),
    }

    let return_type = parse_type_spec(tokens)?;
    Ok(format!("({})->{return_type}", params.join(",")))
}
