//! Name registry for the builtin operators.
//!
//! Each entry instantiates the array engine for one policy and keeps the
//! resulting entry points as plain function pointers.

use crate::array_op::{binary, unary};
use crate::context::Context;
use crate::error::Error;
use crate::policy::builtins::{
    Abs, Add, And, BitAnd, BitNot, BitOr, BitXor, Divide, Equal, Floor, Greater, GreaterOrEqual,
    IsBool, IsNum, LShift, Less, LessOrEqual, Max, Min, Multiply, Negate, Not, NotEqual, Or,
    Power, RShift, Sqrt, Subtract, Xor,
};
use crate::policy::{BinaryPolicy, UnaryPolicy};
use crate::sc::{ScFrame, ScValue};
use crate::syntax::Operation;
use crate::value::Value;

pub type BinaryOpFn = fn(&Context, &Value, &Value) -> Result<Value, Error>;
pub type UnaryOpFn = fn(&Context, &Value) -> Result<Value, Error>;
pub type ScOpFn = fn(&Context, &Operation, &mut ScFrame) -> Result<ScValue, Error>;
pub type ReduceFn = fn(&Context, &Value, &Value) -> Result<Value, Error>;
pub type ScReduceFn = fn(&Context, &Value, &Operation, &mut ScFrame) -> Result<ScValue, Error>;

/// Every name `lookup` resolves, in help order.
pub const NAMES: &[&str] = &[
    "+", "-", "*", "/", "^", "max", "min", "<", ">", "<=", ">=", "==", "!=", "and", "or", "xor",
    "<<", ">>", "&", "|", "bxor", "neg", "abs", "sqrt", "floor", "not", "~", "is_num", "is_bool",
    "sum", "product", "all", "any",
];

/// A resolved builtin.
#[derive(Clone)]
pub enum Builtin {
    /// Two operands, or one pair in generated code.
    Binary {
        name: &'static str,
        op: BinaryOpFn,
        sc_op: ScOpFn,
    },
    Unary {
        name: &'static str,
        op: UnaryOpFn,
        sc_op: ScOpFn,
    },
    /// A fold over a list, starting from the operation's neutral element.
    Reduce {
        name: &'static str,
        zero: Value,
        reduce: ReduceFn,
        sc_reduce: ScReduceFn,
    },
}

impl Builtin {
    pub fn name(&self) -> &'static str {
        match self {
            Builtin::Binary { name, .. } | Builtin::Unary { name, .. } | Builtin::Reduce { name, .. } => {
                name
            }
        }
    }

    /// Number of operands the builtin takes on the command line.
    pub fn arity(&self) -> usize {
        match self {
            Builtin::Binary { .. } => 2,
            Builtin::Unary { .. } | Builtin::Reduce { .. } => 1,
        }
    }
}

fn binary_entry<P: BinaryPolicy>(name: &'static str) -> Builtin {
    Builtin::Binary {
        name,
        op: binary::op::<P>,
        sc_op: binary::sc_op::<P>,
    }
}

fn unary_entry<P: UnaryPolicy>(name: &'static str) -> Builtin {
    Builtin::Unary {
        name,
        op: unary::op::<P>,
        sc_op: unary::sc_op::<P>,
    }
}

fn reduce_entry<P: BinaryPolicy>(name: &'static str, zero: Value) -> Builtin {
    Builtin::Reduce {
        name,
        zero,
        reduce: binary::reduce::<P>,
        sc_reduce: binary::sc_reduce::<P>,
    }
}

/// Resolves a builtin by name.
pub fn lookup(name: &str) -> Option<Builtin> {
    let entry = match name {
        "+" => binary_entry::<Add>("+"),
        "-" => binary_entry::<Subtract>("-"),
        "*" => binary_entry::<Multiply>("*"),
        "/" => binary_entry::<Divide>("/"),
        "^" => binary_entry::<Power>("^"),
        "max" => binary_entry::<Max>("max"),
        "min" => binary_entry::<Min>("min"),
        "<" => binary_entry::<Less>("<"),
        ">" => binary_entry::<Greater>(">"),
        "<=" => binary_entry::<LessOrEqual>("<="),
        ">=" => binary_entry::<GreaterOrEqual>(">="),
        "==" => binary_entry::<Equal>("=="),
        "!=" => binary_entry::<NotEqual>("!="),
        "and" => binary_entry::<And>("and"),
        "or" => binary_entry::<Or>("or"),
        "xor" => binary_entry::<Xor>("xor"),
        "<<" => binary_entry::<LShift>("<<"),
        ">>" => binary_entry::<RShift>(">>"),
        "&" => binary_entry::<BitAnd>("&"),
        "|" => binary_entry::<BitOr>("|"),
        "bxor" => binary_entry::<BitXor>("bxor"),
        "neg" => unary_entry::<Negate>("neg"),
        "abs" => unary_entry::<Abs>("abs"),
        "sqrt" => unary_entry::<Sqrt>("sqrt"),
        "floor" => unary_entry::<Floor>("floor"),
        "not" => unary_entry::<Not>("not"),
        "~" => unary_entry::<BitNot>("~"),
        "is_num" => unary_entry::<IsNum>("is_num"),
        "is_bool" => unary_entry::<IsBool>("is_bool"),
        "sum" => reduce_entry::<Add>("sum", Value::Num(0.0)),
        "product" => reduce_entry::<Multiply>("product", Value::Num(1.0)),
        "all" => reduce_entry::<And>("all", Value::Bool(true)),
        "any" => reduce_entry::<Or>("any", Value::Bool(false)),
        _ => return None,
    };
    Some(entry)
}
