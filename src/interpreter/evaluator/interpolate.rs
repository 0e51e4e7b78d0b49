use crate::{
    ast::Expr,
    error::ParseError,
    interpreter::{
        evaluator::core::{EvalResult, Interpreter, Outcome, propagate},
        lexer,
        parser::core::parse_expression,
        value::core::Value,
    },
};

impl Interpreter {
    /// Evaluates an interpolated string literal.
    ///
    /// Every `${expr}` substring is lexed and parsed as an expression,
    /// evaluated in the current environment, and its string form spliced into
    /// the result. A `${` with no closing `}` aborts interpolation for the
    /// remainder and the raw text is kept; a fragment that fails to parse is
    /// likewise kept verbatim. Evaluation failures inside a fragment are real
    /// errors and propagate.
    pub(crate) fn interpolate(&mut self, raw: &str, line: usize) -> EvalResult<Value> {
        let mut out = String::with_capacity(raw.len());
        let mut rest = raw;

        while let Some(start) = rest.find("${") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];

            let Some(end) = after.find('}') else {
                // Unmatched brace: keep the raw text to the end.
                out.push_str(&rest[start..]);
                rest = "";
                break;
            };

            let fragment = &after[..end];
            match parse_fragment(fragment, line) {
                Ok(expr) => {
                    let value = propagate!(self.eval_expr(&expr));
                    out.push_str(&value.to_string());
                },
                Err(_) => out.push_str(&rest[start..=start + 2 + end]),
            }
            rest = &after[end + 1..];
        }
        out.push_str(rest);

        Ok(Outcome::Value(Value::Str(out)))
    }
}

/// Parses one interpolation fragment as a complete expression.
fn parse_fragment(fragment: &str, line: usize) -> Result<Expr, ParseError> {
    let tokens = lexer::tokenize(fragment)?;
    let mut iter = tokens.iter().peekable();
    let expr = parse_expression(&mut iter)?;
    if let Some((tok, pos)) = iter.peek() {
        return Err(ParseError::UnexpectedToken { message: "Unexpected trailing tokens in \
                                                           interpolation"
                                                              .to_string(),
                                                 lexeme:  tok.lexeme(),
                                                 line,
                                                 column:  pos.column, });
    }
    Ok(expr)
}
