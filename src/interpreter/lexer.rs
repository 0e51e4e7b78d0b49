use logos::Logos;

use crate::error::ParseError;

/// Represents a lexical token in the source input.
///
/// A token is a minimal but meaningful unit of text produced by the lexer.
/// This enum defines all recognized tokens in the language: literals,
/// keywords, operators and delimiters. Whitespace and `//` comments are
/// skipped; an unrecognized character surfaces as a lexer error at the point
/// of use.
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(extras = LexerExtras)]
pub enum Token {
    /// Floating-point literal tokens, such as `3.14`.
    #[regex(r"[0-9]+\.[0-9]+", parse_float)]
    Float(f32),
    /// Integer literal tokens, such as `42`.
    #[regex(r"[0-9]+", parse_integer)]
    Int(i64),
    /// String literal tokens; escape sequences are processed here.
    #[regex(r#""([^"\\\n]|\\.)*""#, parse_string)]
    Str(String),
    /// `int`
    #[token("int")]
    KwInt,
    /// `float`
    #[token("float")]
    KwFloat,
    /// `string`
    #[token("string")]
    KwString,
    /// `bool`
    #[token("bool")]
    KwBool,
    /// `void`
    #[token("void")]
    KwVoid,
    /// `any`
    #[token("any")]
    KwAny,
    /// `object`
    #[token("object")]
    KwObject,
    /// `if`
    #[token("if")]
    If,
    /// `else`
    #[token("else")]
    Else,
    /// `while`
    #[token("while")]
    While,
    /// `for`
    #[token("for")]
    For,
    /// `return`
    #[token("return")]
    Return,
    /// `func`
    #[token("func")]
    Func,
    /// `var`
    #[token("var")]
    Var,
    /// `const`
    #[token("const")]
    Const,
    /// `import`
    #[token("import")]
    Import,
    /// `use`
    #[token("use")]
    Use,
    /// `export`
    #[token("export")]
    Export,
    /// `program`
    #[token("program")]
    Program,
    /// `await`
    #[token("await")]
    Await,
    /// `type`
    #[token("type")]
    Type,
    /// `typeof`
    #[token("typeof")]
    TypeOf,
    /// `try`
    #[token("try")]
    Try,
    /// `catch`
    #[token("catch")]
    Catch,
    /// `finally`
    #[token("finally")]
    Finally,
    /// `throw`
    #[token("throw")]
    Throw,
    /// `break`
    #[token("break")]
    Break,
    /// `continue`
    #[token("continue")]
    Continue,
    /// `switch`
    #[token("switch")]
    Switch,
    /// `case`
    #[token("case")]
    Case,
    /// `default`
    #[token("default")]
    Default,
    /// Boolean literal tokens: `true` or `false`.
    #[token("true", |_| true)]
    #[token("false", |_| false)]
    Bool(bool),
    /// Identifier tokens; variable, function or type names such as `x`.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),
    /// `->`
    #[token("->")]
    Arrow,
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// `%`
    #[token("%")]
    Percent,
    /// `==`
    #[token("==")]
    EqualEqual,
    /// `=`
    #[token("=")]
    Equals,
    /// `!=`
    #[token("!=")]
    BangEqual,
    /// `<=`
    #[token("<=")]
    LessEqual,
    /// `>=`
    #[token(">=")]
    GreaterEqual,
    /// `<`
    #[token("<")]
    Less,
    /// `>`
    #[token(">")]
    Greater,
    /// `&&`
    #[token("&&")]
    AmpAmp,
    /// `||`
    #[token("||")]
    PipePipe,
    /// `|`
    #[token("|")]
    Pipe,
    /// `!`
    #[token("!")]
    Bang,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `{`
    #[token("{")]
    LBrace,
    /// `}`
    #[token("}")]
    RBrace,
    /// `[`
    #[token("[")]
    LBracket,
    /// `]`
    #[token("]")]
    RBracket,
    /// `;`
    #[token(";")]
    Semicolon,
    /// `,`
    #[token(",")]
    Comma,
    /// `.`
    #[token(".")]
    Dot,
    /// `:`
    #[token(":")]
    Colon,
    /// `// Comments.`
    #[regex(r"//[^\n\r]*", logos::skip)]
    Comment,
    /// Newlines advance the line counter and are otherwise skipped.
    #[token("\n", |lex| {
        lex.extras.line += 1;
        lex.extras.line_start = lex.span().end;
        logos::Skip
    })]
    NewLine,
    /// Spaces, tabs and feeds.
    #[regex(r"[ \t\r\f]+", logos::skip)]
    Ignored,
}

impl Token {
    /// The source text a token of this kind stands for, used in diagnostics.
    #[must_use]
    pub fn lexeme(&self) -> String {
        match self {
            Self::Float(v) => v.to_string(),
            Self::Int(v) => v.to_string(),
            Self::Str(s) => format!("\"{s}\""),
            Self::Bool(b) => b.to_string(),
            Self::Identifier(name) => name.clone(),
            Self::KwInt => "int".to_string(),
            Self::KwFloat => "float".to_string(),
            Self::KwString => "string".to_string(),
            Self::KwBool => "bool".to_string(),
            Self::KwVoid => "void".to_string(),
            Self::KwAny => "any".to_string(),
            Self::KwObject => "object".to_string(),
            Self::If => "if".to_string(),
            Self::Else => "else".to_string(),
            Self::While => "while".to_string(),
            Self::For => "for".to_string(),
            Self::Return => "return".to_string(),
            Self::Func => "func".to_string(),
            Self::Var => "var".to_string(),
            Self::Const => "const".to_string(),
            Self::Import => "import".to_string(),
            Self::Use => "use".to_string(),
            Self::Export => "export".to_string(),
            Self::Program => "program".to_string(),
            Self::Await => "await".to_string(),
            Self::Type => "type".to_string(),
            Self::TypeOf => "typeof".to_string(),
            Self::Try => "try".to_string(),
            Self::Catch => "catch".to_string(),
            Self::Finally => "finally".to_string(),
            Self::Throw => "throw".to_string(),
            Self::Break => "break".to_string(),
            Self::Continue => "continue".to_string(),
            Self::Switch => "switch".to_string(),
            Self::Case => "case".to_string(),
            Self::Default => "default".to_string(),
            Self::Arrow => "->".to_string(),
            Self::Plus => "+".to_string(),
            Self::Minus => "-".to_string(),
            Self::Star => "*".to_string(),
            Self::Slash => "/".to_string(),
            Self::Percent => "%".to_string(),
            Self::EqualEqual => "==".to_string(),
            Self::Equals => "=".to_string(),
            Self::BangEqual => "!=".to_string(),
            Self::LessEqual => "<=".to_string(),
            Self::GreaterEqual => ">=".to_string(),
            Self::Less => "<".to_string(),
            Self::Greater => ">".to_string(),
            Self::AmpAmp => "&&".to_string(),
            Self::PipePipe => "||".to_string(),
            Self::Pipe => "|".to_string(),
            Self::Bang => "!".to_string(),
            Self::LParen => "(".to_string(),
            Self::RParen => ")".to_string(),
            Self::LBrace => "{".to_string(),
            Self::RBrace => "}".to_string(),
            Self::LBracket => "[".to_string(),
            Self::RBracket => "]".to_string(),
            Self::Semicolon => ";".to_string(),
            Self::Comma => ",".to_string(),
            Self::Dot => ".".to_string(),
            Self::Colon => ":".to_string(),
            Self::Comment | Self::NewLine | Self::Ignored => String::new(),
        }
    }
}

/// A source position: 1-based line and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pos {
    /// The 1-based line number.
    pub line:   usize,
    /// The 1-based column number.
    pub column: usize,
}

/// Additional information carried by the lexer during tokenization.
///
/// Tracks the current line number and the byte offset of the current line's
/// start, so each token's column can be computed from its span.
pub struct LexerExtras {
    /// The current line number in the source being tokenized.
    pub line:       usize,
    /// Byte offset where the current line begins.
    pub line_start: usize,
}

impl Default for LexerExtras {
    fn default() -> Self {
        Self { line:       1,
               line_start: 0, }
    }
}

/// Streams `source` into a token sequence with positions.
///
/// # Errors
/// Returns [`ParseError::UnknownCharacter`] when the source contains a
/// character that starts no token, carrying the offending slice and its
/// position.
pub fn tokenize(source: &str) -> Result<Vec<(Token, Pos)>, ParseError> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(source);

    while let Some(token) = lexer.next() {
        let pos = Pos { line:   lexer.extras.line,
                        column: lexer.span().start - lexer.extras.line_start + 1, };
        match token {
            Ok(tok) => tokens.push((tok, pos)),
            Err(()) => {
                return Err(ParseError::UnknownCharacter { lexeme: lexer.slice().to_string(),
                                                          line:   pos.line,
                                                          column: pos.column, });
            },
        }
    }

    Ok(tokens)
}

/// Parses a floating-point literal from the current token slice.
fn parse_float(lex: &logos::Lexer<Token>) -> Option<f32> {
    lex.slice().parse().ok()
}

/// Parses an integer literal from the current token slice. Range checking
/// against the runtime integer type happens at evaluation, not here.
fn parse_integer(lex: &logos::Lexer<Token>) -> Option<i64> {
    lex.slice().parse().ok()
}

/// Processes the escape sequences of a string literal.
///
/// `\n`, `\t`, `\r`, `\"` and `\\` produce their usual characters; any other
/// escaped character is kept literally.
fn parse_string(lex: &logos::Lexer<Token>) -> String {
    let raw = lex.slice();
    let inner = &raw[1..raw.len() - 1];

    let mut value = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => value.push('\n'),
                Some('t') => value.push('\t'),
                Some('r') => value.push('\r'),
                Some('"') => value.push('"'),
                Some('\\') => value.push('\\'),
                Some(other) => value.push(other),
                None => {},
            }
        } else {
            value.push(c);
        }
    }

    value
}
