use crate::error::ParseError;

#[derive(Debug)]
/// Represents failures raised by the module loader.
pub enum ModuleError {
    /// The resolved file could not be read.
    NotFound {
        /// The dotted module path as written in the `import`.
        path:   String,
        /// The underlying I/O failure.
        reason: std::io::Error,
    },
    /// The module file was read but did not parse cleanly.
    ///
    /// The loader never hands back a partial tree; any parse diagnostic
    /// fails the whole load.
    ParseFailed {
        /// The dotted module path as written in the `import`.
        path:   String,
        /// Every diagnostic the parser recorded.
        errors: Vec<ParseError>,
    },
}

impl std::fmt::Display for ModuleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { path, reason } => {
                write!(f, "cannot load module {path}: {reason}")
            },
            Self::ParseFailed { path, errors } => {
                let details = errors.iter()
                                    .map(ToString::to_string)
                                    .collect::<Vec<_>>()
                                    .join("\n");
                write!(f, "parse errors in module {path}:\n{details}")
            },
        }
    }
}

impl std::error::Error for ModuleError {}
