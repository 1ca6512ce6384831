/// Converts raw source text into a flat stream of positioned tokens.
///
/// The lexer is stateful, single-pass, and forward-only: the parser calls
/// [`lexer::Lexer::next_token`] until an end-of-input token comes back.
/// Newlines are significant tokens; comments and other whitespace are
/// skipped.
pub mod lexer;

/// Builds the abstract syntax tree from the token stream.
///
/// Statements parse by recursive descent on the leading token; expressions
/// climb a fixed precedence ladder. The parser is error-tolerant: it records
/// diagnostics and resumes at statement boundaries rather than stopping at
/// the first problem.
pub mod parser;

/// The structural type model shared by annotations and the checker.
pub mod types;

/// Static verification of a parsed program.
///
/// The checker runs a declaration-collection pass followed by a structural
/// verification pass, accumulating diagnostics and surfacing the first as
/// the run's terminal type error.
pub mod checker;

/// The parent-linked chain of runtime scopes.
pub mod environment;

/// The runtime value model: the tagged union, truthiness, equality, and the
/// rendering contract used by error messages and `print`.
pub mod value;

/// The tree-walking evaluator.
///
/// Walks the checked syntax tree against the environment chain, maintaining
/// the struct, extension-method, and module registries. Control flow and
/// runtime failures ride an explicit signal channel beside ordinary values.
pub mod evaluator;
