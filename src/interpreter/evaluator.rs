/// Index and field access and assignment.
pub mod access;
/// Binary operator evaluation.
pub mod binary;
/// The built-in function library.
pub mod builtins;
/// Call resolution, user functions, programs and `await`.
pub mod call;
/// Control-flow statements: branches, loops, switch, try.
pub mod control;
/// The interpreter state and the statement/expression dispatchers.
pub mod core;
/// The counter-loop accelerator.
pub mod fastpath;
/// String interpolation.
pub mod interpolate;
/// The structural type matcher.
pub mod typing;
/// Unary operator evaluation, including `typeof`.
pub mod unary;
