#[derive(Debug, Clone)]
/// Represents all errors that can occur during lexing or parsing.
///
/// Every variant carries the source position (line and column) and, where one
/// exists, the offending lexeme, so the CLI can render a caret pointing at the
/// exact spot in the source line.
pub enum ParseError {
    /// The lexer hit a character that starts no token.
    UnknownCharacter {
        /// The offending character as written.
        lexeme: String,
        /// The source line where the error occurred.
        line:   usize,
        /// The source column where the error occurred.
        column: usize,
    },
    /// Found an unexpected token while parsing.
    UnexpectedToken {
        /// What the parser expected at this point.
        message: String,
        /// The offending lexeme.
        lexeme:  String,
        /// The source line where the error occurred.
        line:    usize,
        /// The source column where the error occurred.
        column:  usize,
    },
    /// Reached the end of input while a construct was still open.
    UnexpectedEndOfInput {
        /// The source line where input ran out.
        line:   usize,
        /// The source column where input ran out.
        column: usize,
    },
    /// The left-hand side of `=` was not an identifier, index access or field
    /// access.
    InvalidAssignmentTarget {
        /// The source line where the error occurred.
        line:   usize,
        /// The source column where the error occurred.
        column: usize,
    },
}

impl ParseError {
    /// The source line of the error.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::UnknownCharacter { line, .. }
            | Self::UnexpectedToken { line, .. }
            | Self::UnexpectedEndOfInput { line, .. }
            | Self::InvalidAssignmentTarget { line, .. } => *line,
        }
    }

    /// The source column of the error.
    #[must_use]
    pub const fn column(&self) -> usize {
        match self {
            Self::UnknownCharacter { column, .. }
            | Self::UnexpectedToken { column, .. }
            | Self::UnexpectedEndOfInput { column, .. }
            | Self::InvalidAssignmentTarget { column, .. } => *column,
        }
    }

    /// The offending lexeme, when the error points at a concrete token.
    #[must_use]
    pub fn lexeme(&self) -> &str {
        match self {
            Self::UnknownCharacter { lexeme, .. } | Self::UnexpectedToken { lexeme, .. } => lexeme,
            Self::UnexpectedEndOfInput { .. } | Self::InvalidAssignmentTarget { .. } => "",
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownCharacter { lexeme, line, column } => {
                write!(f, "Error on line {line}:{column}: Unknown character '{lexeme}'.")
            },
            Self::UnexpectedToken { message,
                                    lexeme,
                                    line,
                                    column, } => {
                write!(f, "Error on line {line}:{column}: {message}, found '{lexeme}'.")
            },
            Self::UnexpectedEndOfInput { line, column } => {
                write!(f, "Error on line {line}:{column}: Unexpected end of input.")
            },
            Self::InvalidAssignmentTarget { line, column } => write!(f,
                                                                     "Error on line {line}:{column}: Invalid assignment target."),
        }
    }
}

impl std::error::Error for ParseError {}
