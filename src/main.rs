use std::fs;

use clap::Parser;
use moonlang::{error::RunError, run_source};

/// moonlang is an interpreter for moon, a small statically typed,
/// immutable-by-default scripting language.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Evaluate an inline expression instead of reading a file.
    #[arg(short = 'e', value_name = "EXPR")]
    expression: Option<String>,

    /// Path to a .moon source file.
    file: Option<String>,
}

fn main() {
    let args = Args::parse();

    let source = if let Some(expression) = args.expression {
        expression
    } else if let Some(file) = args.file {
        fs::read_to_string(&file).unwrap_or_else(|e| {
                                     eprintln!("Error reading file: {e}");
                                     std::process::exit(1);
                                 })
    } else {
        eprintln!("Usage: moonlang <file.moon>");
        eprintln!("       moonlang -e <expression>");
        std::process::exit(1);
    };

    if let Err(error) = run_source(&source) {
        match error {
            RunError::Parse(errors) => {
                for error in errors {
                    eprintln!("Parse error: {error}");
                }
            },
            RunError::Type(error) => eprintln!("Type error: {error}"),
            RunError::Runtime(error) => eprintln!("{error}"),
        }
        std::process::exit(1);
    }
}
