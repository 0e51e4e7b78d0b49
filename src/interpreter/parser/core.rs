use std::{iter::Peekable, sync::Arc};

use crate::{
    ast::{Expr, ExportKind, FunctionDecl, Param, Program, ProgramDecl, Stmt},
    error::ParseError,
    interpreter::{
        lexer::{Pos, Token},
        parser::{
            binary::parse_assignment,
            statement::{parse_block, parse_statement, parse_var_decl},
            types::parse_type_spec,
            utils::{end_of_input, expect, parse_comma_separated, parse_identifier, unexpected},
        },
    },
};

/// Result type used by the parser.
pub type ParseResult<T> = Result<T, ParseError>;

/// Parses a whole token stream into a [`Program`].
///
/// The parser is plain recursive descent with the precedence climbing
/// documented on the individual expression functions. It never reads past the
/// end of the token stream; running out of tokens mid-construct is a
/// [`ParseError::UnexpectedEndOfInput`].
///
/// # Errors
/// Returns the first `ParseError` encountered; no recovery is attempted.
pub fn parse_program<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Program>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let mut declarations = Vec::new();
    while tokens.peek().is_some() {
        declarations.push(parse_declaration(tokens)?);
    }
    Ok(Program { declarations })
}

/// Parses a full expression.
///
/// This is the entry point for expression parsing. It begins at the
/// lowest-precedence level, assignment, and recursively descends through the
/// precedence hierarchy.
///
/// Grammar: `expression := assignment`
pub fn parse_expression<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    parse_assignment(tokens)
}

/// Parses one top-level item: a declaration when the next token introduces
/// one, otherwise a statement.
///
/// Declarations recognized here: `import`, `use`, `export`, `type`, `func`
/// (when followed by a name; a bare `func (` begins a function literal and
/// falls through to expression parsing), `program`, `var` and `const`.
pub fn parse_declaration<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Stmt>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    match tokens.peek() {
        Some((Token::Import, _)) => parse_import(tokens),
        Some((Token::Use, pos)) => {
            let line = pos.line;
            tokens.next();
            let path = parse_string_literal(tokens)?;
            expect(tokens, &Token::Semicolon, "Expected ';' after use")?;
            Ok(Stmt::Use { path, line })
        },
        Some((Token::Export, _)) => parse_export(tokens),
        Some((Token::Type, _)) => parse_type_alias(tokens),
        Some((Token::Program, _)) => parse_program_decl(tokens),
        Some((Token::Func, _)) => {
            let mut lookahead = tokens.clone();
            lookahead.next();
            if let Some((Token::Identifier(_), _)) = lookahead.peek() {
                parse_function_decl(tokens)
            } else {
                parse_statement(tokens)
            }
        },
        Some((Token::Var | Token::Const, _)) => {
            let decl = parse_var_decl(tokens)?;
            expect(tokens, &Token::Semicolon, "Expected ';' after variable declaration")?;
            Ok(decl)
        },
        _ => parse_statement(tokens),
    }
}

/// Parses a named function declaration:
/// `func name(a: int, b: int) -> int { ... }`.
pub fn parse_function_decl<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Stmt>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let pos = expect(tokens, &Token::Func, "Expected 'func'")?;
    let name = parse_identifier(tokens)?;
    expect(tokens, &Token::LParen, "Expected '(' after function name")?;
    let params = parse_comma_separated(tokens, parse_param, &Token::RParen)?;
    expect(tokens, &Token::Arrow, "Expected '->' after parameters")?;
    let return_type = parse_type_spec(tokens)?;
    let body = parse_block(tokens)?;

    Ok(Stmt::Function(Arc::new(FunctionDecl { name,
                                              params,
                                              return_type,
                                              body,
                                              line: pos.line })))
}

/// Parses a `program` declaration: `program name(a: int) { ... }`.
///
/// Programs have no return type; they yield no value whether invoked
/// synchronously or through `await`.
fn parse_program_decl<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Stmt>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let pos = expect(tokens, &Token::Program, "Expected 'program'")?;
    let name = parse_identifier(tokens)?;
    expect(tokens, &Token::LParen, "Expected '(' after program name")?;
    let params = parse_comma_separated(tokens, parse_param, &Token::RParen)?;
    let body = parse_block(tokens)?;

    Ok(Stmt::Program(Arc::new(ProgramDecl { name,
                                            params,
                                            body,
                                            line: pos.line })))
}

/// Parses one `name: type` parameter.
pub fn parse_param<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Param>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let name = parse_identifier(tokens)?;
    expect(tokens, &Token::Colon, "Expected ':' after parameter name")?;
    let type_spec = parse_type_spec(tokens)?;
    Ok(Param { name, type_spec })
}

/// Parses a `type` alias declaration: `type Color = "red"|"blue";`.
fn parse_type_alias<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Stmt>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let pos = expect(tokens, &Token::Type, "Expected 'type'")?;
    let name = parse_identifier(tokens)?;
    expect(tokens, &Token::Equals, "Expected '=' after type name")?;
    let spec = parse_type_spec(tokens)?;
    expect(tokens, &Token::Semicolon, "Expected ';' after type alias")?;

    Ok(Stmt::TypeAlias { name,
                         spec,
                         line: pos.line })
}

/// Parses an `import` declaration in one of its three forms:
///
/// ```text
/// import "path";              // side effects only
/// import X from "path";       // default export
/// import {a, b} from "path";  // named exports
/// ```
fn parse_import<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Stmt>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let pos = expect(tokens, &Token::Import, "Expected 'import'")?;

    let (default_name, named) = match tokens.peek() {
        Some((Token::Str(_), _)) => {
            let path = parse_string_literal(tokens)?;
            expect(tokens, &Token::Semicolon, "Expected ';' after import")?;
            return Ok(Stmt::Import { path,
                                     default_name: None,
                                     named: Vec::new(),
                                     line: pos.line });
        },
        Some((Token::Identifier(_), _)) => (Some(parse_identifier(tokens)?), Vec::new()),
        Some((Token::LBrace, _)) => {
            tokens.next();
            let named = parse_comma_separated(tokens, parse_identifier, &Token::RBrace)?;
            (None, named)
        },
        Some((tok, tok_pos)) => {
            return Err(unexpected("Expected import path, name or '{'", tok, *tok_pos));
        },
        None => return Err(end_of_input(pos)),
    };

    expect_from(tokens)?;
    let path = parse_string_literal(tokens)?;
    expect(tokens, &Token::Semicolon, "Expected ';' after import")?;

    Ok(Stmt::Import { path,
                      default_name,
                      named,
                      line: pos.line })
}

/// Parses an `export` declaration:
///
/// ```text
/// export func f(...) -> T { ... }   // declaration form
/// export var x: int = 1;
/// export {a, b};                    // named form
/// export default <decl or expr>;    // default slot
/// ```
fn parse_export<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Stmt>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let pos = expect(tokens, &Token::Export, "Expected 'export'")?;

    let is_default = if let Some((Token::Default, _)) = tokens.peek() {
        tokens.next();
        true
    } else {
        false
    };

    let kind = match tokens.peek() {
        Some((Token::LBrace, _)) => {
            tokens.next();
            let names = parse_comma_separated(tokens, parse_identifier, &Token::RBrace)?;
            expect(tokens, &Token::Semicolon, "Expected ';' after export list")?;
            ExportKind::Named(names)
        },
        Some((Token::Func, _)) => ExportKind::Decl(Box::new(parse_function_decl(tokens)?)),
        Some((Token::Var | Token::Const, _)) => {
            let decl = parse_var_decl(tokens)?;
            expect(tokens, &Token::Semicolon, "Expected ';' after variable declaration")?;
            ExportKind::Decl(Box::new(decl))
        },
        Some((Token::Type, _)) => ExportKind::Decl(Box::new(parse_type_alias(tokens)?)),
        Some(_) if is_default => {
            let expr = parse_expression(tokens)?;
            expect(tokens, &Token::Semicolon, "Expected ';' after export value")?;
            ExportKind::Value(expr)
        },
        Some((tok, tok_pos)) => {
            return Err(unexpected("Expected declaration or '{' after 'export'", tok, *tok_pos));
        },
        None => return Err(end_of_input(pos)),
    };

    Ok(Stmt::Export { kind,
                      is_default,
                      line: pos.line })
}

/// Consumes the contextual `from` keyword of an import. `from` is not a
/// reserved word; it is an ordinary identifier matched by spelling here.
fn expect_from<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<()>
    where I: Iterator<Item = &'a (Token, Pos)>
{
    match tokens.next() {
        Some((Token::Identifier(word), _)) if word == "from" => Ok(()),
        Some((tok, pos)) => Err(unexpected("Expected 'from'", tok, *pos)),
        None => Err(end_of_input(Pos { line: 0, column: 0 })),
    }
}

/// Consumes a string literal token and returns its payload.
fn parse_string_literal<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<String>
    where I: Iterator<Item = &'a (Token, Pos)>
{
    match tokens.next() {
        Some((Token::Str(value), _)) => Ok(value.clone()),
        Some((tok, pos)) => Err(unexpected("Expected string literal", tok, *pos)),
        None => Err(end_of_input(Pos { line: 0, column: 0 })),
    }
}
