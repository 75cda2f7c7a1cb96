//! arrayop: the broadcasting core of an array language.
//!
//! Scalar builtins are described by policies; the array engine lifts them
//! over nested lists in two modes:
//!
//! ```text
//! runtime:     Value × Value ──unbox──▶ call ─▶ Value
//!                 │ lists: broadcast / element-wise, recursively
//!                 └ reactive: new ReactiveExpr node
//!
//! generation:  Operation ──ScFrame::eval──▶ ScValue × ScValue
//!                 ──sc_check_args (unify)──▶ sc_call ─▶ emitted statement
//! ```
//!
//! Modules:
//! - `policy`: operator policies, their families and the builtin set
//! - `array_op`: the broadcast and reduce engine for both modes
//! - `reactive`: reactive values and their expression graphs
//! - `sc`: static types, unification and the emission frame
//! - `builtins`: name registry used by the CLI
//! - `diagnostics`: domain error construction and source rendering

pub mod array_op;
pub mod builtins;
pub mod cli;
pub mod context;
pub mod diagnostics;
pub mod error;
pub mod parser;
pub mod policy;
pub mod reactive;
pub mod sc;
pub mod syntax;
pub mod value;

pub use context::{Context, Limits};
pub use error::Error;
pub use reactive::{ReactiveValue, ResolutionId};
pub use sc::types::ScType;
pub use sc::{ScFrame, ScValue};
pub use value::Value;

use crate::builtins::Builtin;
use crate::cli::CliArgs;
use crate::error::ParseError;
use crate::parser::Reader;
use crate::syntax::{Operation, Phrase, Span};

/// Controls what `execute()` emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitKind {
    /// Evaluate the builtin over literal operands and print the result.
    Eval,
    /// Print the generated GLSL function computing the builtin.
    Glsl,
}

/// The command line as one source string, so diagnostics can point into it.
struct Invocation {
    source: String,
    /// Byte offset of each operand within `source`.
    offsets: Vec<u32>,
    phrase: Phrase,
}

fn is_operator(name: &str) -> bool {
    !name.starts_with(|c: char| c.is_ascii_alphabetic())
}

/// Lays out `x <op> y`, `name[x,y]` or `name x` depending on the builtin.
fn invocation(builtin: &Builtin, operands: &[String]) -> Invocation {
    let name = builtin.name();
    let mut source = String::new();
    let mut offsets = Vec::with_capacity(operands.len());
    let phrase = match builtin {
        Builtin::Binary { .. } if is_operator(name) => {
            let mut op_span = None;
            for (i, operand) in operands.iter().enumerate() {
                if i > 0 {
                    source.push(' ');
                    let start = source.len() as u32;
                    source.push_str(name);
                    op_span.get_or_insert(Span::new(start, source.len() as u32));
                    source.push(' ');
                }
                offsets.push(source.len() as u32);
                source.push_str(operand);
            }
            Phrase::binary(name, op_span.unwrap_or(Span::new(0, source.len() as u32)))
        }
        Builtin::Binary { .. } => {
            source.push_str(name);
            source.push('[');
            for (i, operand) in operands.iter().enumerate() {
                if i > 0 {
                    source.push(',');
                }
                offsets.push(source.len() as u32);
                source.push_str(operand);
            }
            source.push(']');
            Phrase::call(name, Span::new(0, source.len() as u32))
        }
        Builtin::Unary { .. } | Builtin::Reduce { .. } => {
            source.push_str(name);
            for operand in operands {
                source.push(' ');
                offsets.push(source.len() as u32);
                source.push_str(operand);
            }
            Phrase::call(name, Span::new(0, name.len() as u32))
        }
    };
    Invocation {
        source,
        offsets,
        phrase,
    }
}

/// The source text diagnostics for `cli` are rendered against.
pub fn invocation_source(cli: &CliArgs) -> String {
    match builtins::lookup(&cli.builtin) {
        Some(builtin) => invocation(&builtin, &cli.operands).source,
        None => cli.builtin.clone(),
    }
}

/// Runs one builtin invocation.
///
/// Returns the printed result (a value for `Eval`, a GLSL function for
/// `Glsl`) or the first error raised.
pub fn execute(cli: &CliArgs) -> Result<String, Error> {
    let builtin = builtins::lookup(&cli.builtin).ok_or_else(|| ParseError::UnknownBuiltin {
        name: cli.builtin.clone(),
    })?;
    let arity_error = || -> Error {
        ParseError::Arity {
            name: cli.builtin.clone(),
            expected: builtin.arity(),
            found: cli.operands.len(),
        }
        .into()
    };
    if cli.operands.len() != builtin.arity() {
        return Err(arity_error());
    }

    let inv = invocation(&builtin, &cli.operands);
    let limits = Limits {
        max_depth: cli.max_depth,
    };
    let cx = match &builtin {
        Builtin::Binary { name, .. } if !is_operator(name) => Context::at_arg(name, Some(&inv.phrase)),
        _ => Context::at_phrase(&inv.phrase),
    }
    .with_limits(limits);
    let operands = cli.operands.iter().zip(inv.offsets.iter().copied());

    match cli.emit {
        EmitKind::Eval => {
            let values = operands
                .map(|(text, offset)| Reader::with_offset(text, offset).read_value())
                .collect::<Result<Vec<_>, _>>()?;
            let result = match (&builtin, values.as_slice()) {
                (Builtin::Binary { op, .. }, [x, y]) => op(&cx, x, y)?,
                (Builtin::Unary { op, .. }, [x]) => op(&cx, x)?,
                (Builtin::Reduce { zero, reduce, .. }, [list]) => reduce(&cx, zero, list)?,
                _ => return Err(arity_error()),
            };
            Ok(format!("{}\n", result))
        }
        EmitKind::Glsl => {
            let ops = operands
                .map(|(text, offset)| Reader::with_offset(text, offset).read_operation())
                .collect::<Result<Vec<_>, _>>()?;
            let mut f = ScFrame::new();
            let result = match (&builtin, ops.as_slice()) {
                (Builtin::Binary { sc_op, .. }, [_, _]) => {
                    sc_op(&cx, &Operation::List(ops.clone()), &mut f)?
                }
                (Builtin::Unary { sc_op, .. }, [arg]) => sc_op(&cx, arg, &mut f)?,
                (Builtin::Reduce { zero, sc_reduce, .. }, [arg]) => sc_reduce(&cx, zero, arg, &mut f)?,
                _ => return Err(arity_error()),
            };
            f.render_function("op", &result)
        }
    }
}
