//! # moonlang
//!
//! moonlang is an interpreter for moon, a small statically typed,
//! expression-oriented, immutable-by-default scripting language. Source text
//! runs through a three-stage pipeline (lexer, recursive-descent parser,
//! structural type checker) and the resulting tree executes on a
//! tree-walking evaluator with lexical scoping and persistent values.

#![warn(clippy::redundant_clone,
        clippy::needless_pass_by_value,
        clippy::similar_names,
        clippy::large_enum_variant,
        clippy::string_lit_as_bytes,
        clippy::match_same_arms,
        clippy::cargo,
        clippy::nursery,
        clippy::perf,
        clippy::style,
        clippy::suspicious,
        clippy::correctness,
        clippy::complexity,
        clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

/// Defines the structure of parsed code.
///
/// This module declares the `Statement` and `Expr` enums and related types
/// that represent the syntactic structure of source code as a tree. The AST
/// is built by the parser, verified by the checker, and walked by the
/// evaluator.
///
/// # Responsibilities
/// - Defines statement and expression types for all language constructs.
/// - Attaches source lines to nodes for error reporting.
/// - Reproduces program structure through `Display`, with operator nesting
///   made explicit by parentheses.
pub mod ast;

/// Provides unified error types for every diagnostic tier.
///
/// This module defines all errors that can be raised while parsing,
/// checking, or loading code, plus the umbrella type a whole run surfaces.
/// Runtime errors are ordinary values and live with the value model instead.
///
/// # Responsibilities
/// - Defines error enums for the parse, type, and module-loading tiers.
/// - Attaches line numbers and detailed messages for context.
/// - Supports integration with standard error handling traits.
pub mod error;

/// Orchestrates the entire process of code execution.
///
/// This module ties together lexing, parsing, type checking, evaluation,
/// the value model, and all supporting infrastructure to provide a complete
/// runtime for source code execution.
///
/// # Responsibilities
/// - Coordinates all core components: lexer, parser, checker, evaluator.
/// - Provides entry points for interpreting programs.
/// - Manages the flow of data and diagnostics between phases.
pub mod interpreter;

use crate::{error::RunError,
            interpreter::{checker::Checker,
                          environment::Environment,
                          evaluator::{Evaluator, register_builtins},
                          lexer::Lexer,
                          parser::Parser,
                          value::Value}};

/// Runs a source string through the full pipeline and returns its value.
///
/// The pipeline stops at the first failing tier: a non-empty parse
/// diagnostic list, the first type diagnostic, or a runtime error that
/// reached the top level. The program's value is its last statement's value.
///
/// # Errors
/// A [`RunError`] naming the tier that failed and its diagnostics.
///
/// # Examples
/// ```
/// use moonlang::run_source;
///
/// let value = run_source("def x = 2 + 3\nx * 10").unwrap();
/// assert_eq!(value.to_string(), "50");
///
/// // 'y' is never defined, so checking fails before evaluation.
/// assert!(run_source("def x = y + 1").is_err());
/// ```
pub fn run_source(source: &str) -> Result<Value, RunError> {
    let (program, errors) = Parser::new(Lexer::new(source)).parse_program();
    if !errors.is_empty() {
        return Err(RunError::Parse(errors));
    }

    Checker::new().check(&program).map_err(RunError::Type)?;

    let env = Environment::new();
    register_builtins(&env);

    Evaluator::new().eval_program(&program, &env)
                    .map_err(RunError::Runtime)
}
