use std::sync::Arc;

/// An abstract syntax tree (AST) node representing an expression.
///
/// `Expr` covers everything that produces a value: literals, identifiers,
/// operators, calls, collection literals, member access, assignments and
/// `await`. Each variant carries the source line it was parsed from so that
/// runtime errors can point back at the offending code.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// An integer literal such as `42`.
    IntLit {
        /// The literal value as written (range-checked at evaluation).
        value: i64,
        /// Line number in the source code.
        line:  usize,
    },
    /// A floating-point literal such as `3.14`.
    FloatLit {
        /// The literal value.
        value: f32,
        /// Line number in the source code.
        line:  usize,
    },
    /// A string literal, escape sequences already processed.
    StringLit {
        /// The string payload.
        value:        String,
        /// Whether the payload contains a `${` interpolation marker.
        interpolated: bool,
        /// Line number in the source code.
        line:         usize,
    },
    /// A boolean literal: `true` or `false`.
    BoolLit {
        /// The literal value.
        value: bool,
        /// Line number in the source code.
        line:  usize,
    },
    /// Reference to a variable by name.
    Ident {
        /// Name of the variable.
        name: String,
        /// Line number in the source code.
        line: usize,
    },
    /// A binary operation (arithmetic, comparison, logic, concatenation).
    Binary {
        /// Left operand.
        left:  Box<Self>,
        /// The operator.
        op:    BinaryOperator,
        /// Right operand.
        right: Box<Self>,
        /// Line number in the source code.
        line:  usize,
    },
    /// A unary operation (`-`, `!`, `typeof`).
    Unary {
        /// The operator to apply.
        op:      UnaryOperator,
        /// The operand expression.
        operand: Box<Self>,
        /// Line number in the source code.
        line:    usize,
    },
    /// A call expression. The callee is an arbitrary expression; for plain
    /// `name(...)` calls it is an [`Expr::Ident`], which is how built-ins,
    /// programs and named functions are resolved.
    Call {
        /// The expression being invoked.
        callee: Box<Self>,
        /// Argument expressions, evaluated left to right.
        args:   Vec<Self>,
        /// Line number in the source code.
        line:   usize,
    },
    /// Array literal expression, e.g. `[1, 2, 3]`.
    ArrayLit {
        /// Elements of the array.
        elements: Vec<Self>,
        /// Line number in the source code.
        line:     usize,
    },
    /// Object literal expression, e.g. `{name: "axo", major: 1}`.
    ObjectLit {
        /// Field name/value pairs in source order.
        fields: Vec<(String, Self)>,
        /// Line number in the source code.
        line:   usize,
    },
    /// An inline function literal: `func(x: int) -> int { ... }`.
    ///
    /// The node is shared so a function value can outlive the statement that
    /// produced it.
    FunctionLit {
        /// The literal's parameters, return type and body.
        func: Arc<FunctionLit>,
        /// Line number in the source code.
        line: usize,
    },
    /// Indexing expression: `base[index]`.
    Index {
        /// The array, object or string being indexed.
        base:  Box<Self>,
        /// The index expression.
        index: Box<Self>,
        /// Line number in the source code.
        line:  usize,
    },
    /// Field access expression: `base.name`.
    Field {
        /// The object expression.
        base: Box<Self>,
        /// The field name.
        name: String,
        /// Line number in the source code.
        line: usize,
    },
    /// Assignment to a plain variable: `name = value`.
    Assign {
        /// The variable name.
        name:  String,
        /// The value expression.
        value: Box<Self>,
        /// Line number in the source code.
        line:  usize,
    },
    /// Assignment through an index: `base[index] = value`.
    IndexAssign {
        /// The array or object expression.
        base:  Box<Self>,
        /// The index expression.
        index: Box<Self>,
        /// The value expression.
        value: Box<Self>,
        /// Line number in the source code.
        line:  usize,
    },
    /// Assignment to an object field: `base.name = value`.
    FieldAssign {
        /// The object expression.
        base:  Box<Self>,
        /// The field name.
        name:  String,
        /// The value expression.
        value: Box<Self>,
        /// Line number in the source code.
        line:  usize,
    },
    /// An `await` expression. Awaiting a program call runs it on a worker
    /// task; awaiting anything else evaluates it in place.
    Await {
        /// The awaited expression.
        expr: Box<Self>,
        /// Line number in the source code.
        line: usize,
    },
}

impl Expr {
    /// Gets the source line number from `self`.
    #[must_use]
    pub const fn line_number(&self) -> usize {
        match self {
            Self::IntLit { line, .. }
            | Self::FloatLit { line, .. }
            | Self::StringLit { line, .. }
            | Self::BoolLit { line, .. }
            | Self::Ident { line, .. }
            | Self::Binary { line, .. }
            | Self::Unary { line, .. }
            | Self::Call { line, .. }
            | Self::ArrayLit { line, .. }
            | Self::ObjectLit { line, .. }
            | Self::FunctionLit { line, .. }
            | Self::Index { line, .. }
            | Self::Field { line, .. }
            | Self::Assign { line, .. }
            | Self::IndexAssign { line, .. }
            | Self::FieldAssign { line, .. }
            | Self::Await { line, .. } => *line,
        }
    }
}

/// A brace-delimited sequence of statements.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// Statements inside the block, in source order.
    pub statements: Vec<Stmt>,
    /// Line number of the opening brace.
    pub line:       usize,
}

/// A single parameter of a function or program declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    /// The parameter name.
    pub name:      String,
    /// The declared type, as a canonical type-spec string.
    pub type_spec: String,
}

/// A named top-level function declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    /// The function name.
    pub name:        String,
    /// The declared parameters.
    pub params:      Vec<Param>,
    /// The declared return type, as a canonical type-spec string.
    pub return_type: String,
    /// The function body.
    pub body:        Block,
    /// Line number in the source code.
    pub line:        usize,
}

/// An anonymous function literal.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionLit {
    /// The declared parameters.
    pub params:      Vec<Param>,
    /// The declared return type, as a canonical type-spec string.
    pub return_type: String,
    /// The function body.
    pub body:        Block,
    /// Line number in the source code.
    pub line:        usize,
}

/// A `program` declaration: a function-like unit that yields no value and may
/// additionally be invoked on a worker task through `await`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramDecl {
    /// The program name.
    pub name:   String,
    /// The declared parameters.
    pub params: Vec<Param>,
    /// The program body.
    pub body:   Block,
    /// Line number in the source code.
    pub line:   usize,
}

/// One `case` (or `default`) clause of a `switch` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseClause {
    /// The case value; `None` for the `default` clause.
    pub value:      Option<Expr>,
    /// The clause body. Execution falls through into the next clause unless a
    /// `break` is hit.
    pub statements: Vec<Stmt>,
    /// Line number in the source code.
    pub line:       usize,
}

/// The payload of an `export` declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportKind {
    /// `export <declaration>` — a function, variable or type declaration.
    Decl(Box<Stmt>),
    /// `export {a, b};` — names copied from the bindings currently in scope.
    Named(Vec<String>),
    /// `export default <expr>;`
    Value(Expr),
}

/// A statement or declaration.
///
/// The parser recognizes declarations (`func`, `program`, `type`, `import`,
/// `use`, `export`, `var`, `const`) at every statement boundary, so a single
/// taxonomy covers top-level items and block bodies alike.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// A nested block with its own scope.
    Block(Block),
    /// A `var` or `const` declaration with a declared type and optional
    /// initializer.
    VarDecl {
        /// The variable name.
        name:      String,
        /// The declared type, as a canonical type-spec string.
        type_spec: String,
        /// Whether the declaration used `const`.
        is_const:  bool,
        /// The optional initializer expression.
        init:      Option<Expr>,
        /// Line number in the source code.
        line:      usize,
    },
    /// An `if` statement with optional `else` (or chained `else if`).
    If {
        /// The condition expression.
        condition:  Expr,
        /// Block executed when the condition is truthy.
        then_block: Block,
        /// Block executed otherwise, if present.
        else_block: Option<Block>,
        /// Line number in the source code.
        line:       usize,
    },
    /// A `while` loop.
    While {
        /// The loop condition, re-evaluated before each iteration.
        condition: Expr,
        /// The loop body.
        body:      Block,
        /// Line number in the source code.
        line:      usize,
    },
    /// A C-style `for` loop. The init, condition, update and body share one
    /// extra scope.
    For {
        /// The optional init statement (declaration or expression).
        init:      Option<Box<Stmt>>,
        /// The loop condition.
        condition: Expr,
        /// The update expression, run after each iteration.
        update:    Expr,
        /// The loop body.
        body:      Block,
        /// Line number in the source code.
        line:      usize,
    },
    /// A `return` statement with optional value.
    Return {
        /// The returned expression, if any.
        value: Option<Expr>,
        /// Line number in the source code.
        line:  usize,
    },
    /// A `throw` statement raising an arbitrary value.
    Throw {
        /// The thrown expression.
        value: Expr,
        /// Line number in the source code.
        line:  usize,
    },
    /// A `try`/`catch`/`finally` statement.
    Try {
        /// The guarded block.
        body:          Block,
        /// The catch variable name, if one was written.
        catch_name:    Option<String>,
        /// The catch block, if present.
        catch_block:   Option<Block>,
        /// The finally block, if present. Runs exactly once on every exit
        /// path that is not a fatal runtime error.
        finally_block: Option<Block>,
        /// Line number in the source code.
        line:          usize,
    },
    /// A `break` statement.
    Break {
        /// Line number in the source code.
        line: usize,
    },
    /// A `continue` statement.
    Continue {
        /// Line number in the source code.
        line: usize,
    },
    /// A `switch` statement. Cases are compared by string form and fall
    /// through until a `break`.
    Switch {
        /// The discriminant expression.
        discriminant: Expr,
        /// The case clauses in source order.
        cases:        Vec<CaseClause>,
        /// Line number in the source code.
        line:         usize,
    },
    /// A bare expression evaluated for its effects.
    Expression {
        /// The expression to evaluate.
        expr: Expr,
        /// Line number in the source code.
        line: usize,
    },
    /// A named function declaration. Shared so that function values and the
    /// function registry reference the same parsed body.
    Function(Arc<FunctionDecl>),
    /// A `program` declaration.
    Program(Arc<ProgramDecl>),
    /// A `type` alias declaration.
    TypeAlias {
        /// The alias name.
        name: String,
        /// The aliased type, as a canonical type-spec string.
        spec: String,
        /// Line number in the source code.
        line: usize,
    },
    /// An `import` declaration in one of its three forms.
    Import {
        /// The requested module path as written.
        path:         String,
        /// Binding name for the module's default export, if written.
        default_name: Option<String>,
        /// Names to bind from the module's named exports.
        named:        Vec<String>,
        /// Line number in the source code.
        line:         usize,
    },
    /// A `use` declaration: load a module for side effects only.
    Use {
        /// The requested module path as written.
        path: String,
        /// Line number in the source code.
        line: usize,
    },
    /// An `export` declaration.
    Export {
        /// What is being exported.
        kind:       ExportKind,
        /// Whether this is the module's default export.
        is_default: bool,
        /// Line number in the source code.
        line:       usize,
    },
}

impl Stmt {
    /// Gets the source line number from `self`.
    #[must_use]
    pub fn line_number(&self) -> usize {
        match self {
            Self::Block(block) => block.line,
            Self::Function(func) => func.line,
            Self::Program(prog) => prog.line,
            Self::VarDecl { line, .. }
            | Self::If { line, .. }
            | Self::While { line, .. }
            | Self::For { line, .. }
            | Self::Return { line, .. }
            | Self::Throw { line, .. }
            | Self::Try { line, .. }
            | Self::Break { line, .. }
            | Self::Continue { line, .. }
            | Self::Switch { line, .. }
            | Self::Expression { line, .. }
            | Self::TypeAlias { line, .. }
            | Self::Import { line, .. }
            | Self::Use { line, .. }
            | Self::Export { line, .. } => *line,
        }
    }
}

/// A parsed compilation unit: the ordered list of top-level declarations and
/// statements of one source file. The tree is owned exclusively by this node;
/// shared function bodies are the only reference-counted subtrees.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    /// Top-level items in source order.
    pub declarations: Vec<Stmt>,
}

/// Represents a binary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BinaryOperator {
    /// Addition or string concatenation (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`)
    Mul,
    /// Division (`/`); truncating on integers
    Div,
    /// Remainder (`%`)
    Mod,
    /// Equal to (`==`); compares string forms across tags
    Equal,
    /// Not equal to (`!=`)
    NotEqual,
    /// Less than (`<`)
    Less,
    /// Greater than (`>`)
    Greater,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than or equal (`>=`)
    GreaterEqual,
    /// Logical and (`&&`); both operands are evaluated
    And,
    /// Logical or (`||`); both operands are evaluated
    Or,
}

impl std::fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let operator = match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Less => "<",
            Self::Greater => ">",
            Self::LessEqual => "<=",
            Self::GreaterEqual => ">=",
            Self::And => "&&",
            Self::Or => "||",
        };
        write!(f, "{operator}")
    }
}

/// Represents a unary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UnaryOperator {
    /// Arithmetic negation (e.g. `-x`).
    Negate,
    /// Logical NOT on truthiness (e.g. `!x`).
    Not,
    /// `typeof x`: the declared type of an identifier when one exists,
    /// otherwise the runtime tag name.
    TypeOf,
}

impl std::fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let operator = match self {
            Self::Negate => "-",
            Self::Not => "!",
            Self::TypeOf => "typeof",
        };
        write!(f, "{operator}")
    }
}
