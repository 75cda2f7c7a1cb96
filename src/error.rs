use thiserror::Error;

use crate::sc::types::ScType;
use crate::syntax::Span;

/// Top-level error type for array operations in both evaluation modes.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{}", format_error_pretty("runtime error", &format!("{}", _0)))]
    Domain(#[from] DomainError),

    #[error("{}", format_error_pretty("type error", &format!("{}", _0)))]
    Type(#[from] TypeError),

    #[error("{}", format_error_pretty("syntax error", &format!("{}", _0)))]
    Parse(#[from] ParseError),

    #[error("{}", format_error_pretty("codegen error", &format!("{}", _0)))]
    Emit(#[from] std::fmt::Error),

    /// An error raised at a known source span. Displays as the inner error.
    #[error("{inner}")]
    Located { span: Span, inner: Box<Error> },
}

/// Formats an error in the `[category] message` style.
fn format_error_pretty(category: &str, msg: &str) -> String {
    format!("[{}] {}", category, msg)
}

fn position_suffix(position: &Option<usize>) -> String {
    match position {
        Some(i) => format!(" (at argument {})", i),
        None => String::new(),
    }
}

fn argument_label(position: &Option<usize>) -> String {
    match position {
        Some(i) => format!("argument {}", i),
        None => "argument".to_owned(),
    }
}

// ---------------------------------------------------------------------------
// Runtime domain errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum DomainError {
    /// No broadcasting case matched the operand shapes.
    #[error("{operands}: domain error{}", position_suffix(position))]
    NoMatch {
        operands: String,
        position: Option<usize>,
    },

    #[error("mismatched list sizes ({left},{right}) in array operation")]
    MismatchedSizes { left: usize, right: usize },

    #[error("{value}: not a list")]
    NotAList { value: String },

    #[error("shift count {count} out of range for a list of {size} booleans")]
    ShiftOutOfRange { count: f64, size: usize },

    #[error("list nesting is deeper than the limit of {limit}")]
    TooDeep { limit: usize },
}

// ---------------------------------------------------------------------------
// Static type errors (code generation mode)
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum TypeError {
    #[error("{} must be {expected}; got {found}", argument_label(position))]
    Argument {
        position: Option<usize>,
        expected: &'static str,
        found: ScType,
    },

    #[error("can't combine lists of different sizes ({left} and {right})")]
    LaneMismatch { left: u8, right: u8 },

    #[error("arguments must be {expected} (got {left} and {right} instead)")]
    Incompatible {
        expected: &'static str,
        left: ScType,
        right: ScType,
    },

    #[error("can't combine {left} with {right}")]
    Mismatch { left: ScType, right: ScType },

    #[error("expected a list of size 2; got {found}")]
    ExpectedPair { found: String },

    #[error("argument is not a vector; got {found}")]
    NotAVector { found: ScType },

    #[error("can't reduce a matrix ({found}); only vectors are reduced in generated code")]
    MatrixReduce { found: ScType },

    #[error("not supported in generated code: {detail}")]
    Unsupported { detail: String },
}

// ---------------------------------------------------------------------------
// Literal reader errors (CLI operands)
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unexpected character '{ch}' (at byte {pos})")]
    UnexpectedChar { ch: char, pos: u32 },

    #[error("invalid literal '{text}'; expected a number, #true, #false or a [list]")]
    InvalidLiteral { text: String, span: Span },

    #[error("unexpected end of input while reading {context}")]
    UnexpectedEof { context: String },

    #[error("unknown type '{name}'; valid types are float, bool, uint, vec2-4, bvec2-4, uvec2-4 and mat2-4")]
    UnknownType { name: String },

    #[error("unknown builtin '{name}'")]
    UnknownBuiltin { name: String },

    #[error("'{name}' takes {expected} operand(s), got {found}")]
    Arity {
        name: String,
        expected: usize,
        found: usize,
    },
}

impl Error {
    /// Attaches a source span, unless the error already carries one.
    pub fn at(self, span: Span) -> Error {
        match self {
            located @ Error::Located { .. } => located,
            other => Error::Located {
                span,
                inner: Box::new(other),
            },
        }
    }

    /// The innermost error, stripped of location wrappers.
    pub fn kind(&self) -> &Error {
        match self {
            Error::Located { inner, .. } => inner.kind(),
            other => other,
        }
    }

    /// The source span the error was raised at, if known.
    pub fn span(&self) -> Option<Span> {
        match self {
            Error::Located { span, .. } => Some(*span),
            Error::Parse(ParseError::InvalidLiteral { span, .. }) => Some(*span),
            _ => None,
        }
    }

    /// The argument position the error names, if any.
    pub fn position(&self) -> Option<usize> {
        match self.kind() {
            Error::Domain(DomainError::NoMatch { position, .. }) => *position,
            Error::Type(TypeError::Argument { position, .. }) => *position,
            _ => None,
        }
    }

    /// Returns a stable diagnostic code string for this error.
    pub fn diagnostic_code(&self) -> &'static str {
        match self {
            Error::Domain(d) => match d {
                DomainError::NoMatch { .. } => "E0100",
                DomainError::MismatchedSizes { .. } => "E0101",
                DomainError::NotAList { .. } => "E0102",
                DomainError::ShiftOutOfRange { .. } => "E0103",
                DomainError::TooDeep { .. } => "E0104",
            },
            Error::Type(t) => match t {
                TypeError::Argument { .. } => "E0200",
                TypeError::LaneMismatch { .. } => "E0201",
                TypeError::Incompatible { .. } => "E0202",
                TypeError::Mismatch { .. } => "E0203",
                TypeError::ExpectedPair { .. } => "E0204",
                TypeError::NotAVector { .. } => "E0205",
                TypeError::MatrixReduce { .. } => "E0206",
                TypeError::Unsupported { .. } => "E0207",
            },
            Error::Parse(_) => "E0300",
            Error::Emit(_) => "E0400",
            Error::Located { inner, .. } => inner.diagnostic_code(),
        }
    }
}
