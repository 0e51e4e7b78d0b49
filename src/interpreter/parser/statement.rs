use std::iter::Peekable;

use crate::{
    ast::{Block, CaseClause, Stmt},
    interpreter::{
        lexer::{Pos, Token},
        parser::{
            core::{ParseResult, parse_declaration, parse_expression},
            types::parse_type_spec,
            utils::{end_of_input, expect, parse_identifier, peek_pos, unexpected},
        },
    },
};

/// Parses a single statement.
///
/// A statement may be one of:
/// - a control-flow statement (`if`, `while`, `for`, `switch`, `try`,
///   `return`, `throw`, `break`, `continue`),
/// - a nested block,
/// - an expression statement terminated by `;`.
///
/// Declarations (`var`, `func`, `import`, ...) are handled one level up by
/// [`parse_declaration`], which falls back to this function.
///
/// # Errors
/// Returns a `ParseError` when the statement is malformed.
pub fn parse_statement<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Stmt>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    match tokens.peek() {
        Some((Token::If, _)) => parse_if_statement(tokens),
        Some((Token::While, _)) => parse_while_statement(tokens),
        Some((Token::For, _)) => parse_for_statement(tokens),
        Some((Token::Return, _)) => parse_return_statement(tokens),
        Some((Token::Throw, pos)) => {
            let line = pos.line;
            tokens.next();
            let value = parse_expression(tokens)?;
            expect(tokens, &Token::Semicolon, "Expected ';' after throw")?;
            Ok(Stmt::Throw { value, line })
        },
        Some((Token::Try, _)) => parse_try_statement(tokens),
        Some((Token::Switch, _)) => parse_switch_statement(tokens),
        Some((Token::Break, pos)) => {
            let line = pos.line;
            tokens.next();
            expect(tokens, &Token::Semicolon, "Expected ';' after 'break'")?;
            Ok(Stmt::Break { line })
        },
        Some((Token::Continue, pos)) => {
            let line = pos.line;
            tokens.next();
            expect(tokens, &Token::Semicolon, "Expected ';' after 'continue'")?;
            Ok(Stmt::Continue { line })
        },
        Some((Token::LBrace, _)) => Ok(Stmt::Block(parse_block(tokens)?)),
        _ => {
            let line = peek_pos(tokens, Pos { line: 0, column: 0 }).line;
            let expr = parse_expression(tokens)?;
            expect(tokens, &Token::Semicolon, "Expected ';' after expression")?;
            Ok(Stmt::Expression { expr, line })
        },
    }
}

/// Parses a brace-delimited block. Declarations are allowed inside blocks,
/// so nested function definitions and imports work at any depth.
pub fn parse_block<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Block>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let pos = expect(tokens, &Token::LBrace, "Expected '{'")?;

    let mut statements = Vec::new();
    loop {
        match tokens.peek() {
            Some((Token::RBrace, _)) => {
                tokens.next();
                break;
            },
            Some(_) => statements.push(parse_declaration(tokens)?),
            None => return Err(end_of_input(pos)),
        }
    }

    Ok(Block { statements,
               line: pos.line })
}

/// Parses a `var`/`const` declaration up to (but not including) the
/// terminating `;`, so the `for` init clause can reuse it.
///
/// Grammar: `("var" | "const") ident ":" type ("=" expression)?`
pub fn parse_var_decl<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Stmt>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let (is_const, line) = match tokens.next() {
        Some((Token::Var, pos)) => (false, pos.line),
        Some((Token::Const, pos)) => (true, pos.line),
        Some((tok, pos)) => return Err(unexpected("Expected 'var' or 'const'", tok, *pos)),
        None => return Err(end_of_input(Pos { line: 0, column: 0 })),
    };

    let name = parse_identifier(tokens)?;
    expect(tokens, &Token::Colon, "Expected ':' after variable name")?;
    let type_spec = parse_type_spec(tokens)?;

    let init = if let Some((Token::Equals, _)) = tokens.peek() {
        tokens.next();
        Some(parse_expression(tokens)?)
    } else {
        None
    };

    Ok(Stmt::VarDecl { name,
                       type_spec,
                       is_const,
                       init,
                       line })
}

/// Parses an `if` statement with optional `else` and chained `else if`.
fn parse_if_statement<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Stmt>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let pos = expect(tokens, &Token::If, "Expected 'if'")?;
    expect(tokens, &Token::LParen, "Expected '(' after 'if'")?;
    let condition = parse_expression(tokens)?;
    expect(tokens, &Token::RParen, "Expected ')' after condition")?;

    let then_block = parse_block(tokens)?;

    let else_block = if let Some((Token::Else, else_pos)) = tokens.peek() {
        let else_line = else_pos.line;
        tokens.next();
        if let Some((Token::If, _)) = tokens.peek() {
            // `else if` chains by nesting the next if as a one-statement block.
            let nested = parse_if_statement(tokens)?;
            Some(Block { statements: vec![nested],
                         line:       else_line, })
        } else {
            Some(parse_block(tokens)?)
        }
    } else {
        None
    };

    Ok(Stmt::If { condition,
                  then_block,
                  else_block,
                  line: pos.line })
}

/// Parses a `while` statement.
fn parse_while_statement<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Stmt>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let pos = expect(tokens, &Token::While, "Expected 'while'")?;
    expect(tokens, &Token::LParen, "Expected '(' after 'while'")?;
    let condition = parse_expression(tokens)?;
    expect(tokens, &Token::RParen, "Expected ')' after condition")?;
    let body = parse_block(tokens)?;

    Ok(Stmt::While { condition,
                     body,
                     line: pos.line })
}

/// Parses a C-style `for` statement:
/// `for (init?; condition; update) { body }`.
fn parse_for_statement<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Stmt>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let pos = expect(tokens, &Token::For, "Expected 'for'")?;
    expect(tokens, &Token::LParen, "Expected '(' after 'for'")?;

    let init = match tokens.peek() {
        Some((Token::Semicolon, _)) => None,
        Some((Token::Var | Token::Const, _)) => Some(Box::new(parse_var_decl(tokens)?)),
        Some((_, init_pos)) => {
            let line = init_pos.line;
            let expr = parse_expression(tokens)?;
            Some(Box::new(Stmt::Expression { expr, line }))
        },
        None => return Err(end_of_input(pos)),
    };
    expect(tokens, &Token::Semicolon, "Expected ';' after for init")?;

    let condition = parse_expression(tokens)?;
    expect(tokens, &Token::Semicolon, "Expected ';' after for condition")?;

    let update = parse_expression(tokens)?;
    expect(tokens, &Token::RParen, "Expected ')' after for clauses")?;

    let body = parse_block(tokens)?;

    Ok(Stmt::For { init,
                   condition,
                   update,
                   body,
                   line: pos.line })
}

/// Parses a `return` statement with optional value.
fn parse_return_statement<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Stmt>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let pos = expect(tokens, &Token::Return, "Expected 'return'")?;

    let value = if matches!(tokens.peek(), Some((Token::Semicolon, _))) {
        None
    } else {
        Some(parse_expression(tokens)?)
    };
    expect(tokens, &Token::Semicolon, "Expected ';' after return")?;

    Ok(Stmt::Return { value,
                      line: pos.line })
}

/// Parses a `try` statement with optional `catch (name)` and `finally`.
fn parse_try_statement<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Stmt>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let pos = expect(tokens, &Token::Try, "Expected 'try'")?;
    let body = parse_block(tokens)?;

    let mut catch_name = None;
    let mut catch_block = None;
    if let Some((Token::Catch, _)) = tokens.peek() {
        tokens.next();
        if let Some((Token::LParen, _)) = tokens.peek() {
            tokens.next();
            catch_name = Some(parse_identifier(tokens)?);
            expect(tokens, &Token::RParen, "Expected ')' after catch variable")?;
        }
        catch_block = Some(parse_block(tokens)?);
    }

    let finally_block = if let Some((Token::Finally, _)) = tokens.peek() {
        tokens.next();
        Some(parse_block(tokens)?)
    } else {
        None
    };

    Ok(Stmt::Try { body,
                   catch_name,
                   catch_block,
                   finally_block,
                   line: pos.line })
}

/// Parses a `switch` statement with `case` and `default` clauses.
fn parse_switch_statement<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Stmt>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let pos = expect(tokens, &Token::Switch, "Expected 'switch'")?;
    expect(tokens, &Token::LParen, "Expected '(' after 'switch'")?;
    let discriminant = parse_expression(tokens)?;
    expect(tokens, &Token::RParen, "Expected ')' after discriminant")?;
    expect(tokens, &Token::LBrace, "Expected '{' to open switch body")?;

    let mut cases = Vec::new();
    loop {
        match tokens.peek() {
            Some((Token::Case, case_pos)) => {
                let line = case_pos.line;
                tokens.next();
                let value = parse_expression(tokens)?;
                expect(tokens, &Token::Colon, "Expected ':' after case value")?;
                let statements = parse_case_body(tokens, pos)?;
                cases.push(CaseClause { value: Some(value),
                                        statements,
                                        line });
            },
            Some((Token::Default, default_pos)) => {
                let line = default_pos.line;
                tokens.next();
                expect(tokens, &Token::Colon, "Expected ':' after 'default'")?;
                let statements = parse_case_body(tokens, pos)?;
                cases.push(CaseClause { value: None,
                                        statements,
                                        line });
            },
            Some((Token::RBrace, _)) => {
                tokens.next();
                break;
            },
            Some((tok, tok_pos)) => {
                return Err(unexpected("Expected 'case', 'default' or '}'", tok, *tok_pos));
            },
            None => return Err(end_of_input(pos)),
        }
    }

    Ok(Stmt::Switch { discriminant,
                      cases,
                      line: pos.line })
}

/// Parses the statements of one case clause, stopping before the next
/// `case`/`default` label or the closing brace.
fn parse_case_body<'a, I>(tokens: &mut Peekable<I>, pos: Pos) -> ParseResult<Vec<Stmt>>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let mut statements = Vec::new();
    loop {
        match tokens.peek() {
            Some((Token::Case | Token::Default | Token::RBrace, _)) => break,
            Some(_) => statements.push(parse_declaration(tokens)?),
            None => return Err(end_of_input(pos)),
        }
    }
    Ok(statements)
}
