//! CLI argument parsing, exported from the library so integration tests can exercise it.

use crate::context::DEFAULT_MAX_DEPTH;
use crate::EmitKind;

/// Fully-parsed CLI arguments for one builtin invocation.
#[derive(Debug)]
pub struct CliArgs {
    pub emit: EmitKind,
    /// Builtin name, e.g. `+` or `sum`.
    pub builtin: String,
    /// Operand literals in command-line order.
    pub operands: Vec<String>,
    /// Maximum list nesting before aborting (default: 500).
    pub max_depth: usize,
}

/// Result of `parse_args`.
#[derive(Debug)]
pub enum ParseArgsResult {
    /// Normal evaluation/generation request.
    Args(CliArgs),
    /// `--help` was present; caller should print usage and exit 0.
    Help,
    /// `--version` was present; caller should print the version and exit 0.
    Version,
}

/// Parses command-line arguments (the full `std::env::args()` slice including `argv[0]`).
///
/// The first positional argument names the builtin and the rest are its
/// operands. Operands such as `-1` are positional, so only the exact flags
/// below are treated as options; `--` ends option parsing.
pub fn parse_args(args: &[String]) -> Result<ParseArgsResult, String> {
    let mut emit = EmitKind::Eval;
    let mut max_depth: usize = DEFAULT_MAX_DEPTH;
    let mut positional: Vec<String> = Vec::new();
    let mut options_done = false;
    let mut i = 1usize;

    while i < args.len() {
        let arg = args[i].as_str();
        if options_done {
            positional.push(arg.to_owned());
            i += 1;
            continue;
        }
        match arg {
            "--help" | "-h" => return Ok(ParseArgsResult::Help),
            "--version" | "-V" => return Ok(ParseArgsResult::Version),
            "--" => options_done = true,
            "--emit" => {
                i += 1;
                let kind = args
                    .get(i)
                    .ok_or_else(|| "--emit requires an argument".to_owned())?;
                emit = match kind.as_str() {
                    "eval" => EmitKind::Eval,
                    "glsl" => EmitKind::Glsl,
                    other => {
                        return Err(format!(
                            "unknown emit kind: '{}' (valid: eval, glsl)",
                            other
                        ))
                    }
                };
            }
            "--max-depth" => {
                i += 1;
                let n = args
                    .get(i)
                    .ok_or_else(|| "--max-depth requires an argument".to_owned())?;
                max_depth = n
                    .parse::<usize>()
                    .ok()
                    .filter(|&d| d > 0)
                    .ok_or_else(|| format!("--max-depth: '{}' is not a valid positive integer", n))?;
            }
            other if other.starts_with("--") => {
                return Err(format!("unknown argument: '{}'", other))
            }
            other => positional.push(other.to_owned()),
        }
        i += 1;
    }

    let mut positional = positional.into_iter();
    let builtin = positional
        .next()
        .ok_or_else(|| "no builtin specified".to_owned())?;
    Ok(ParseArgsResult::Args(CliArgs {
        emit,
        builtin,
        operands: positional.collect(),
        max_depth,
    }))
}

/// Returns the usage/help text for the CLI.
pub fn help_text() -> String {
    format!(
        "arrayop: broadcasting array operations\n\
         Usage: arrayop [options] [--] <builtin> <operand>...\n\
         \n\
         Operands are literals: numbers, #true, #false and [lists].\n\
         With --emit glsl an operand may also be a typed variable, e.g. p:vec3.\n\
         \n\
         Options:\n\
           --emit <kind>         Output kind: eval (default), glsl\n\
           --max-depth <n>       Max list nesting before abort (default: {})\n\
           --version, -V         Print version and exit\n\
           --help, -h            Print this help and exit\n\
         \n\
         Builtins: {}\n",
        DEFAULT_MAX_DEPTH,
        crate::builtins::NAMES.join(" ")
    )
}

/// Returns the version string.
pub fn version_text() -> String {
    format!("arrayop {}\n", env!("CARGO_PKG_VERSION"))
}
