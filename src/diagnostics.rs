//! Source diagnostics: domain error construction, byte-to-line/col mapping and
//! human-readable error rendering.

use crate::context::Context;
use crate::error::{DomainError, Error};
use crate::value::Value;

/// Builds the domain error for a binary operation whose operand `position`
/// (0 or 1) matched no broadcasting case.
///
/// The message is as specific as the call site allows:
/// - a function argument names the culprit and its position,
/// - an operator phrase shows the whole expression `x <op> y`,
/// - otherwise only the culprit is shown.
pub fn binary_domain_error(cx: &Context, position: usize, x: &Value, y: &Value) -> Error {
    let culprit = if position == 0 { x } else { y };
    let err = if cx.is_arg() {
        DomainError::NoMatch {
            operands: culprit.to_string(),
            position: Some(position),
        }
    } else if let Some(opname) = cx.phrase().and_then(|p| p.binary_opname()) {
        DomainError::NoMatch {
            operands: format!("{} {} {}", x, opname, y),
            position: None,
        }
    } else {
        DomainError::NoMatch {
            operands: culprit.to_string(),
            position: None,
        }
    };
    cx.locate(err)
}

/// Builds the domain error for a unary operation on `x`.
pub fn unary_domain_error(cx: &Context, x: &Value) -> Error {
    let operands = match cx.phrase().and_then(|p| p.unary_opname()) {
        Some(opname) => format!("{}{}", opname, x),
        None => x.to_string(),
    };
    cx.locate(DomainError::NoMatch {
        operands,
        position: None,
    })
}

/// Converts a byte offset within `source` to a 1-based `(line, col)` pair.
///
/// # Examples
/// ```text
/// "abc\ndef\n", byte 4  → (2, 1)   // 'd' is first char of line 2
/// "hello",     byte 2  → (1, 3)   // 'l' at column 3 on line 1
/// ```
pub fn byte_to_line_col(source: &str, byte: u32) -> (u32, u32) {
    let byte = byte as usize;
    let mut line = 1u32;
    let mut col = 1u32;
    for (i, ch) in source.char_indices() {
        if i == byte {
            break;
        }
        if ch == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }
    (line, col)
}

/// Renders a rustc-style diagnostic for `err`, with a source excerpt and a
/// caret under the span start when the error is located.
///
/// ```text
/// error: [runtime error] mismatched list sizes (2,3) in array operation
///  --> 1:7
///   |
/// 1 | [1,2] + [1,2,3]
///   |       ^
/// ```
pub fn render_error(source: &str, err: &Error) -> String {
    let mut out = format!("error[{}]: {}\n", err.diagnostic_code(), err);

    if let Some(span) = err.span() {
        let (line, col) = byte_to_line_col(source, span.start.0);
        let source_line = source.lines().nth((line - 1) as usize).unwrap_or("");

        // col is 1-based, so col-1 spaces then '^'
        let indent = (col as usize).saturating_sub(1);
        let width = (span.end.0.saturating_sub(span.start.0) as usize).max(1);
        let pointer = format!("{}{}", " ".repeat(indent), "^".repeat(width));
        let line_num = line.to_string();
        let gutter = " ".repeat(line_num.len());

        out.push_str(&format!(" --> {}:{}\n", line, col));
        out.push_str(&format!("{} |\n", gutter));
        out.push_str(&format!("{} | {}\n", line_num, source_line));
        out.push_str(&format!("{} | {}\n", gutter, pointer));
    }

    out
}
