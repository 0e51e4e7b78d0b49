#[derive(Debug, Clone)]
/// Represents all errors that can occur during evaluation.
///
/// These are the fatal failures: unlike values raised with `throw`, they are
/// not catchable by `try`/`catch` and terminate execution of the script.
pub enum RuntimeError {
    /// Tried to read or write an undefined variable.
    UndefinedVariable {
        /// The name of the variable.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Called an unknown function or program.
    UndefinedFunction {
        /// The name that failed to resolve.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A store was rejected by the declared type of the target variable.
    TypeMismatch {
        /// The name of the variable.
        name:     String,
        /// The declared type spec that rejected the value.
        declared: String,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// A variable initializer did not match the declared type.
    InitializerMismatch {
        /// The name of the variable.
        name:     String,
        /// The declared type spec that rejected the value.
        declared: String,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// A `push` or indexed store did not match the declared element type.
    ElementTypeMismatch {
        /// The name of the array variable.
        name:     String,
        /// The declared element type spec.
        declared: String,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// The wrong number of arguments was supplied to a call.
    ArgumentCountMismatch {
        /// The name of the callee.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Tried to access an array or string element outside the valid range.
    IndexOutOfBounds {
        /// The number of elements in the collection.
        len:   usize,
        /// The index that was actually requested.
        found: i64,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// A value had an unexpected or incompatible type.
    TypeError {
        /// Details about the type mismatch.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// Integer arithmetic overflowed.
    Overflow {
        /// The source line where the error occurred.
        line: usize,
    },
    /// Attempted integer division or remainder by zero.
    DivisionByZero {
        /// The source line where the error occurred.
        line: usize,
    },
    /// An integer literal does not fit the runtime integer type.
    LiteralTooLarge {
        /// The source line where the error occurred.
        line: usize,
    },
    /// An `assert` call failed.
    AssertionFailed {
        /// The message supplied to `assert`.
        message: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// The `error` built-in was called.
    UserError {
        /// The message supplied to `error`.
        message: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// A thrown value was never caught by a `try`/`catch`.
    UncaughtThrow {
        /// The string form of the thrown value.
        value: String,
        /// The source line of the `throw`.
        line:  usize,
    },
    /// A `return`, `break` or `continue` escaped to the top level.
    StrayControlFlow {
        /// Which signal escaped.
        signal: &'static str,
        /// The source line of the statement.
        line:   usize,
    },
    /// A module could not be resolved, read or executed.
    ImportError {
        /// The requested path as written.
        path:    String,
        /// Details about the failure.
        details: String,
        /// The source line of the `import` or `use`.
        line:    usize,
    },
    /// A filesystem built-in failed.
    IoError {
        /// Details about the failure.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UndefinedVariable { name, line } => {
                write!(f, "Error on line {line}: Undefined variable '{name}'.")
            },
            Self::UndefinedFunction { name, line } => {
                write!(f, "Error on line {line}: Undefined function '{name}'.")
            },
            Self::TypeMismatch { name, declared, line } => write!(f,
                                                                  "Error on line {line}: Type error: cannot assign value to variable '{name}' of type '{declared}'."),
            Self::InitializerMismatch { name, declared, line } => write!(f,
                                                                         "Error on line {line}: Type error: initializer for '{name}' does not match declared type '{declared}'."),
            Self::ElementTypeMismatch { name, declared, line } => write!(f,
                                                                         "Error on line {line}: Type error: cannot store value in array '{name}' of element type '{declared}'."),
            Self::ArgumentCountMismatch { name, line } => {
                write!(f, "Error on line {line}: Argument count mismatch calling '{name}'.")
            },
            Self::IndexOutOfBounds { len, found, line } => write!(f,
                                                                  "Error on line {line}: Index {found} out of bounds for length {len}."),
            Self::TypeError { details, line } => {
                write!(f, "Error on line {line}: Type error: {details}.")
            },
            Self::Overflow { line } => {
                write!(f, "Error on line {line}: Integer overflow.")
            },
            Self::DivisionByZero { line } => write!(f, "Error on line {line}: Division by zero."),
            Self::LiteralTooLarge { line } => {
                write!(f, "Error on line {line}: Integer literal is too large.")
            },
            Self::AssertionFailed { message, line } => {
                write!(f, "Error on line {line}: Assertion failed: {message}.")
            },
            Self::UserError { message, line } => write!(f, "Error on line {line}: {message}."),
            Self::UncaughtThrow { value, line } => {
                write!(f, "Error on line {line}: Uncaught thrown value: {value}.")
            },
            Self::StrayControlFlow { signal, line } => {
                write!(f, "Error on line {line}: '{signal}' outside of its enclosing construct.")
            },
            Self::ImportError { path, details, line } => {
                write!(f, "Error on line {line}: Import error ({path}): {details}.")
            },
            Self::IoError { details, line } => write!(f, "Error on line {line}: {details}."),
        }
    }
}

impl std::error::Error for RuntimeError {}
