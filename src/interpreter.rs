/// Walks the AST: statement and expression evaluation, registries,
/// control-flow signals, built-ins and the loop accelerator.
pub mod evaluator;
/// Streams source text into tokens.
pub mod lexer;
/// Resolves, loads and executes modules; attributes exports.
pub mod loader;
/// Turns tokens into the AST.
pub mod parser;
/// The runtime value model and the environment.
pub mod value;
