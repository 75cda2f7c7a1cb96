//! The slice of the syntax layer the array engine consumes.
//!
//! `Phrase` identifies where an operator was written, for diagnostics only.
//! `Operation` is an analysed expression handed to code generation; the
//! engine only needs to tell a literal list apart from any other operand.

use std::fmt;

use crate::sc::types::ScType;
use crate::value::Value;

/// A byte offset within a source string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BytePos(pub u32);

/// A half-open byte range `[start, end)` within a source string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: BytePos,
    pub end: BytePos,
}

impl Span {
    pub fn new(start: u32, end: u32) -> Self {
        Self {
            start: BytePos(start),
            end: BytePos(end),
        }
    }
}

/// A source phrase an operation was invoked from.
#[derive(Debug, Clone, PartialEq)]
pub enum Phrase {
    /// `x <op> y`
    Binary { opname: String, span: Span },
    /// `<op>x`
    Unary { opname: String, span: Span },
    /// `f arg`
    Call { function: String, span: Span },
    Other { span: Span },
}

impl Phrase {
    pub fn binary(opname: impl Into<String>, span: Span) -> Self {
        Phrase::Binary {
            opname: opname.into(),
            span,
        }
    }

    pub fn unary(opname: impl Into<String>, span: Span) -> Self {
        Phrase::Unary {
            opname: opname.into(),
            span,
        }
    }

    pub fn call(function: impl Into<String>, span: Span) -> Self {
        Phrase::Call {
            function: function.into(),
            span,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Phrase::Binary { span, .. }
            | Phrase::Unary { span, .. }
            | Phrase::Call { span, .. }
            | Phrase::Other { span } => *span,
        }
    }

    /// The operator symbol, if this is a binary operator phrase.
    pub fn binary_opname(&self) -> Option<&str> {
        match self {
            Phrase::Binary { opname, .. } => Some(opname),
            _ => None,
        }
    }

    /// The operator symbol, if this is a unary operator phrase.
    pub fn unary_opname(&self) -> Option<&str> {
        match self {
            Phrase::Unary { opname, .. } => Some(opname),
            _ => None,
        }
    }
}

/// An analysed expression as seen by code generation.
#[derive(Debug, Clone)]
pub enum Operation {
    /// A value known at generation time.
    Constant(Value),
    /// A value known only when the generated code runs.
    Variable { name: String, ty: ScType },
    /// A literal list expression `[a, b, ...]`.
    List(Vec<Operation>),
}

impl Operation {
    pub fn constant(value: impl Into<Value>) -> Self {
        Operation::Constant(value.into())
    }

    pub fn variable(name: impl Into<String>, ty: ScType) -> Self {
        Operation::Variable {
            name: name.into(),
            ty,
        }
    }

    /// The elements of a literal list expression.
    pub fn as_list_literal(&self) -> Option<&[Operation]> {
        match self {
            Operation::List(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Constant(v) => write!(f, "{}", v),
            Operation::Variable { name, .. } => f.write_str(name),
            Operation::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}
