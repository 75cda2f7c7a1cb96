//! Builtin operators, each a policy over one of the families.

use std::rc::Rc;

use crate::context::Context;
use crate::diagnostics::binary_domain_error;
use crate::error::{DomainError, Error, TypeError};
use crate::policy::family::{
    BinaryBool, BinaryBool32, BinaryBoolOrBool32, BinaryNum, BinaryScalar, Shift, UnaryBool,
    UnaryBool32, UnaryNum, UnaryScalar,
};
use crate::policy::{BinaryPolicy, UnaryPolicy};
use crate::sc::types::ScType;
use crate::sc::{ScFrame, ScValue};
use crate::value::Value;

macro_rules! binary_builtin {
    (
        $(#[$doc:meta])*
        $name:ident : $family:ty, $sym:literal,
        |$x:ident : $xt:ty, $y:ident : $yt:ty, $cx:ident| $call:expr,
        |$f:ident, $a:ident, $b:ident| $sc:expr
    ) => {
        $(#[$doc])*
        pub struct $name;

        impl BinaryPolicy for $name {
            type Family = $family;
            const NAME: &'static str = $sym;

            fn call($x: $xt, $y: $yt, $cx: &Context) -> Result<Value, Error> {
                $call
            }

            fn sc_call($f: &mut ScFrame, $a: ScValue, $b: ScValue) -> Result<ScValue, Error> {
                $sc
            }
        }
    };
}

macro_rules! unary_builtin {
    (
        $(#[$doc:meta])*
        $name:ident : $family:ty, $sym:literal,
        |$x:ident : $xt:ty, $cx:ident| $call:expr,
        |$f:ident, $a:ident| $sc:expr
    ) => {
        $(#[$doc])*
        pub struct $name;

        impl UnaryPolicy for $name {
            type Family = $family;
            const NAME: &'static str = $sym;

            fn call($x: $xt, $cx: &Context) -> Result<Value, Error> {
                $call
            }

            fn sc_call($f: &mut ScFrame, $a: ScValue) -> Result<ScValue, Error> {
                $sc
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Emission helpers
// ---------------------------------------------------------------------------

fn infix(f: &mut ScFrame, a: &ScValue, b: &ScValue, op: &str) -> Result<ScValue, Error> {
    f.emit(a.ty, format_args!("{} {} {}", a, op, b))
}

fn prefix(f: &mut ScFrame, a: &ScValue, op: &str) -> Result<ScValue, Error> {
    f.emit(a.ty, format_args!("{}{}", op, a))
}

fn call1(f: &mut ScFrame, name: &str, a: &ScValue) -> Result<ScValue, Error> {
    f.emit(a.ty, format_args!("{}({})", name, a))
}

fn call2(f: &mut ScFrame, name: &str, a: &ScValue, b: &ScValue) -> Result<ScValue, Error> {
    f.emit(a.ty, format_args!("{}({},{})", name, a, b))
}

fn unsupported(name: &str, ty: ScType) -> Error {
    TypeError::Unsupported {
        detail: format!("`{}` on {}", name, ty),
    }
    .into()
}

fn no_matrix(name: &str, a: &ScValue) -> Result<(), Error> {
    if a.ty.is_mat() {
        return Err(unsupported(name, a.ty));
    }
    Ok(())
}

/// Scalars compare with an infix operator; vectors with the lane-wise
/// builtin, yielding a boolean vector.
fn compare(
    f: &mut ScFrame,
    a: &ScValue,
    b: &ScValue,
    op: &str,
    lanewise: &str,
) -> Result<ScValue, Error> {
    match a.ty {
        ScType::Num | ScType::Bool | ScType::Bool32 => {
            f.emit(ScType::Bool, format_args!("{} {} {}", a, op, b))
        }
        ScType::Vec(n) | ScType::BVec(n) | ScType::Bool32Vec(n) => {
            f.emit(ScType::BVec(n), format_args!("{}({},{})", lanewise, a, b))
        }
        other => Err(unsupported(op, other)),
    }
}

/// A type test on a generated operand is decided by its static type alone.
fn type_test(f: &mut ScFrame, name: &str, a: &ScValue, holds: bool) -> Result<ScValue, Error> {
    match a.ty {
        ScType::Num | ScType::Bool => f.emit(ScType::Bool, holds),
        ScType::Vec(n) | ScType::BVec(n) => {
            f.emit(ScType::BVec(n), format_args!("bvec{}({})", n, holds))
        }
        other => Err(unsupported(name, other)),
    }
}

fn reactive_type(v: &Value) -> Option<ScType> {
    v.as_reactive().map(|r| r.sctype())
}

/// Shifts a boolean list by `count` places, filling vacated places with
/// `#false`. Left shifts move element `i` to `i + count`.
fn shift(cx: &Context, items: Rc<[Value]>, count: f64, left: bool) -> Result<Value, Error> {
    let size = items.len();
    if items.iter().any(|v| !v.is_bool()) {
        return Err(binary_domain_error(cx, 0, &Value::List(items), &Value::Num(count)));
    }
    if count.fract() != 0.0 || count < 0.0 || count >= size as f64 {
        return Err(cx.locate(DomainError::ShiftOutOfRange { count, size }));
    }
    let n = count as usize;
    let shifted = (0..size).map(|i| {
        let source = if left {
            i.checked_sub(n)
        } else {
            Some(i + n).filter(|&j| j < size)
        };
        source.map_or(Value::Bool(false), |j| items[j].clone())
    });
    Ok(Value::list(shifted))
}

// ---------------------------------------------------------------------------
// Arithmetic and comparison on numbers
// ---------------------------------------------------------------------------

binary_builtin!(
    Add: BinaryNum, "+",
    |x: f64, y: f64, _cx| Ok(Value::Num(x + y)),
    |f, a, b| infix(f, &a, &b, "+")
);

binary_builtin!(
    Subtract: BinaryNum, "-",
    |x: f64, y: f64, _cx| Ok(Value::Num(x - y)),
    |f, a, b| infix(f, &a, &b, "-")
);

binary_builtin!(
    /// Element-wise product. Matrices multiply component by component, not
    /// as a matrix product.
    Multiply: BinaryNum, "*",
    |x: f64, y: f64, _cx| Ok(Value::Num(x * y)),
    |f, a, b| {
        if a.ty.is_mat() {
            call2(f, "matrixCompMult", &a, &b)
        } else {
            infix(f, &a, &b, "*")
        }
    }
);

binary_builtin!(
    Divide: BinaryNum, "/",
    |x: f64, y: f64, _cx| Ok(Value::Num(x / y)),
    |f, a, b| infix(f, &a, &b, "/")
);

binary_builtin!(
    Power: BinaryNum, "^",
    |x: f64, y: f64, _cx| Ok(Value::Num(x.powf(y))),
    |f, a, b| {
        no_matrix("^", &a)?;
        call2(f, "pow", &a, &b)
    }
);

binary_builtin!(
    Max: BinaryNum, "max",
    |x: f64, y: f64, _cx| Ok(Value::Num(x.max(y))),
    |f, a, b| {
        no_matrix("max", &a)?;
        call2(f, "max", &a, &b)
    }
);

binary_builtin!(
    Min: BinaryNum, "min",
    |x: f64, y: f64, _cx| Ok(Value::Num(x.min(y))),
    |f, a, b| {
        no_matrix("min", &a)?;
        call2(f, "min", &a, &b)
    }
);

binary_builtin!(
    Less: BinaryNum, "<",
    |x: f64, y: f64, _cx| Ok(Value::Bool(x < y)),
    |f, a, b| compare(f, &a, &b, "<", "lessThan")
);

binary_builtin!(
    Greater: BinaryNum, ">",
    |x: f64, y: f64, _cx| Ok(Value::Bool(x > y)),
    |f, a, b| compare(f, &a, &b, ">", "greaterThan")
);

binary_builtin!(
    LessOrEqual: BinaryNum, "<=",
    |x: f64, y: f64, _cx| Ok(Value::Bool(x <= y)),
    |f, a, b| compare(f, &a, &b, "<=", "lessThanEqual")
);

binary_builtin!(
    GreaterOrEqual: BinaryNum, ">=",
    |x: f64, y: f64, _cx| Ok(Value::Bool(x >= y)),
    |f, a, b| compare(f, &a, &b, ">=", "greaterThanEqual")
);

// ---------------------------------------------------------------------------
// Equality on scalars
// ---------------------------------------------------------------------------

/// The content of a reactive operand is unknown, so it can't be compared.
fn equality(cx: &Context, x: Value, y: Value, equal: bool) -> Result<Value, Error> {
    if reactive_type(&x).is_some() {
        return Err(binary_domain_error(cx, 0, &x, &y));
    }
    if reactive_type(&y).is_some() {
        return Err(binary_domain_error(cx, 1, &x, &y));
    }
    Ok(Value::Bool((x == y) == equal))
}

binary_builtin!(
    Equal: BinaryScalar, "==",
    |x: Value, y: Value, cx| equality(cx, x, y, true),
    |f, a, b| compare(f, &a, &b, "==", "equal")
);

binary_builtin!(
    NotEqual: BinaryScalar, "!=",
    |x: Value, y: Value, cx| equality(cx, x, y, false),
    |f, a, b| compare(f, &a, &b, "!=", "notEqual")
);

// ---------------------------------------------------------------------------
// Boolean logic
// ---------------------------------------------------------------------------

binary_builtin!(
    And: BinaryBool, "and",
    |x: bool, y: bool, _cx| Ok(Value::Bool(x && y)),
    |f, a, b| {
        if a.ty.is_bool() {
            infix(f, &a, &b, "&&")
        } else {
            f.zip_lanes(&a, &b, "&&")
        }
    }
);

binary_builtin!(
    Or: BinaryBool, "or",
    |x: bool, y: bool, _cx| Ok(Value::Bool(x || y)),
    |f, a, b| {
        if a.ty.is_bool() {
            infix(f, &a, &b, "||")
        } else {
            f.zip_lanes(&a, &b, "||")
        }
    }
);

binary_builtin!(
    /// Exclusive or; packed booleans xor all 32 lanes at once.
    Xor: BinaryBoolOrBool32, "xor",
    |x: bool, y: bool, _cx| Ok(Value::Bool(x != y)),
    |f, a, b| match a.ty {
        ScType::Bool => infix(f, &a, &b, "!="),
        ScType::BVec(_) => call2(f, "notEqual", &a, &b),
        _ => infix(f, &a, &b, "^"),
    }
);

unary_builtin!(
    Not: UnaryBool, "!",
    |x: bool, _cx| Ok(Value::Bool(!x)),
    |f, a| {
        if a.ty.is_bool() {
            prefix(f, &a, "!")
        } else {
            call1(f, "not", &a)
        }
    }
);

// ---------------------------------------------------------------------------
// Packed booleans
// ---------------------------------------------------------------------------

binary_builtin!(
    LShift: Shift, "<<",
    |x: Rc<[Value]>, y: f64, cx| shift(cx, x, y, true),
    |f, a, b| f.emit(a.ty, format_args!("{} << int({})", a, b))
);

binary_builtin!(
    RShift: Shift, ">>",
    |x: Rc<[Value]>, y: f64, cx| shift(cx, x, y, false),
    |f, a, b| f.emit(a.ty, format_args!("{} >> int({})", a, b))
);

binary_builtin!(
    BitAnd: BinaryBool32, "&",
    |x: u32, y: u32, _cx| Ok(Value::from_bool32(x & y)),
    |f, a, b| infix(f, &a, &b, "&")
);

binary_builtin!(
    BitOr: BinaryBool32, "|",
    |x: u32, y: u32, _cx| Ok(Value::from_bool32(x | y)),
    |f, a, b| infix(f, &a, &b, "|")
);

binary_builtin!(
    BitXor: BinaryBool32, "bxor",
    |x: u32, y: u32, _cx| Ok(Value::from_bool32(x ^ y)),
    |f, a, b| infix(f, &a, &b, "^")
);

unary_builtin!(
    BitNot: UnaryBool32, "~",
    |x: u32, _cx| Ok(Value::from_bool32(!x)),
    |f, a| prefix(f, &a, "~")
);

// ---------------------------------------------------------------------------
// Unary numeric
// ---------------------------------------------------------------------------

unary_builtin!(
    Negate: UnaryNum, "-",
    |x: f64, _cx| Ok(Value::Num(-x)),
    |f, a| prefix(f, &a, "-")
);

unary_builtin!(
    Abs: UnaryNum, "abs",
    |x: f64, _cx| Ok(Value::Num(x.abs())),
    |f, a| {
        no_matrix("abs", &a)?;
        call1(f, "abs", &a)
    }
);

unary_builtin!(
    Sqrt: UnaryNum, "sqrt",
    |x: f64, _cx| Ok(Value::Num(x.sqrt())),
    |f, a| {
        no_matrix("sqrt", &a)?;
        call1(f, "sqrt", &a)
    }
);

unary_builtin!(
    Floor: UnaryNum, "floor",
    |x: f64, _cx| Ok(Value::Num(x.floor())),
    |f, a| {
        no_matrix("floor", &a)?;
        call1(f, "floor", &a)
    }
);

// ---------------------------------------------------------------------------
// Type tests
// ---------------------------------------------------------------------------

unary_builtin!(
    /// True for numbers, including reactive numbers.
    IsNum: UnaryScalar, "is_num",
    |x: Value, _cx| Ok(Value::Bool(x.is_num() || reactive_type(&x) == Some(ScType::Num))),
    |f, a| {
        let holds = a.ty.scalar_type() == ScType::Num;
        type_test(f, "is_num", &a, holds)
    }
);

unary_builtin!(
    IsBool: UnaryScalar, "is_bool",
    |x: Value, _cx| Ok(Value::Bool(x.is_bool() || reactive_type(&x) == Some(ScType::Bool))),
    |f, a| {
        let holds = a.ty.scalar_type() == ScType::Bool;
        type_test(f, "is_bool", &a, holds)
    }
);
