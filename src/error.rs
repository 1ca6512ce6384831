mod module_error;
mod parse_error;
mod type_error;

pub use module_error::ModuleError;
pub use parse_error::ParseError;
pub use type_error::TypeError;

use crate::interpreter::value::ErrorValue;

#[derive(Debug)]
/// The failure surfaced by a whole run, one variant per diagnostic tier.
///
/// The three tiers never mix: a non-empty parse diagnostic list stops the run
/// before checking, the first type diagnostic stops it before evaluation, and
/// runtime errors are ordinary values that propagated to the program
/// boundary.
pub enum RunError {
    /// Every diagnostic the parser recorded.
    Parse(Vec<ParseError>),
    /// The first diagnostic the type checker produced.
    Type(TypeError),
    /// The runtime error value that reached the top level.
    Runtime(ErrorValue),
}

impl std::fmt::Display for RunError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(errors) => {
                let lines = errors.iter()
                                  .map(ToString::to_string)
                                  .collect::<Vec<_>>()
                                  .join("\n");
                write!(f, "{lines}")
            },
            Self::Type(error) => write!(f, "{error}"),
            Self::Runtime(error) => write!(f, "{error}"),
        }
    }
}

impl std::error::Error for RunError {}
