//! Binary array operations.
//!
//! A binary builtin is applied to two operands of any shape:
//!
//! 1. both unbox to the policy's scalar form: the scalar operation;
//! 2. one unboxes and the other is a list: broadcast over the list;
//! 3. both are lists: element-wise, sizes must agree;
//! 4. a reactive operand: a new reactive expression;
//! 5. otherwise a domain error naming the operand that matched nothing.
//!
//! Code generation follows the same rules over static types, with a
//! literal pair `[a, b]` standing for the two operands.

use crate::array_op::{enter, fold_left};
use crate::context::Context;
use crate::diagnostics::binary_domain_error;
use crate::error::{DomainError, Error, TypeError};
use crate::policy::{BinaryFamily, BinaryPolicy};
use crate::reactive;
use crate::sc::types::ScType;
use crate::sc::{ScFrame, ScValue};
use crate::syntax::{Operation, Phrase};
use crate::value::Value;

// ---------------------------------------------------------------------------
// Runtime
// ---------------------------------------------------------------------------

/// Applies `P` to `x` and `y`, broadcasting over lists.
pub fn op<P: BinaryPolicy>(cx: &Context, x: &Value, y: &Value) -> Result<Value, Error> {
    op_at::<P>(cx, x, y, 0)
}

fn op_at<P: BinaryPolicy>(cx: &Context, x: &Value, y: &Value, depth: usize) -> Result<Value, Error> {
    if let Some(a) = P::Family::unbox_left(x) {
        if let Some(b) = P::Family::unbox_right(y) {
            return P::call(a, b, cx);
        }
        return match y {
            Value::List(ys) => broadcast_left::<P>(cx, x, ys, depth),
            Value::Reactive(_) => reactive::binary_op::<P>(cx, x, y),
            _ => Err(binary_domain_error(cx, 1, x, y)),
        };
    }

    match x {
        Value::List(xs) => {
            if P::Family::unbox_right(y).is_some() {
                return broadcast_right::<P>(cx, xs, y, depth);
            }
            match y {
                Value::List(ys) => element_wise::<P>(cx, xs, ys, depth),
                Value::Reactive(_) => reactive::binary_op::<P>(cx, x, y),
                _ => Err(binary_domain_error(cx, 1, x, y)),
            }
        }
        Value::Reactive(_) => reactive::binary_op::<P>(cx, x, y),
        _ => Err(binary_domain_error(cx, 0, x, y)),
    }
}

fn broadcast_left<P: BinaryPolicy>(
    cx: &Context,
    x: &Value,
    ys: &[Value],
    depth: usize,
) -> Result<Value, Error> {
    let depth = enter(cx, depth)?;
    let items = ys
        .iter()
        .map(|y| op_at::<P>(cx, x, y, depth))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Value::from(items))
}

fn broadcast_right<P: BinaryPolicy>(
    cx: &Context,
    xs: &[Value],
    y: &Value,
    depth: usize,
) -> Result<Value, Error> {
    let depth = enter(cx, depth)?;
    let items = xs
        .iter()
        .map(|x| op_at::<P>(cx, x, y, depth))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Value::from(items))
}

fn element_wise<P: BinaryPolicy>(
    cx: &Context,
    xs: &[Value],
    ys: &[Value],
    depth: usize,
) -> Result<Value, Error> {
    if xs.len() != ys.len() {
        return Err(cx.locate(DomainError::MismatchedSizes {
            left: xs.len(),
            right: ys.len(),
        }));
    }
    let depth = enter(cx, depth)?;
    let items = xs
        .iter()
        .zip(ys.iter())
        .map(|(x, y)| op_at::<P>(cx, x, y, depth))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Value::from(items))
}

/// Folds `P` over the elements of `arg` from the left, starting at `zero`.
pub fn reduce<P: BinaryPolicy>(cx: &Context, zero: &Value, arg: &Value) -> Result<Value, Error> {
    let items = arg.as_list().ok_or_else(|| {
        cx.locate(DomainError::NotAList {
            value: arg.to_string(),
        })
    })?;
    fold_left(zero.clone(), items.iter(), |acc, item| op::<P>(cx, &acc, item))
}

// ---------------------------------------------------------------------------
// Code generation
// ---------------------------------------------------------------------------

/// Checks and emits `P` over two generated operands. Both `sc_op` and
/// `sc_call` end up here, as do compiled reactive expressions.
pub fn sc_apply<P: BinaryPolicy>(
    f: &mut ScFrame,
    mut a: ScValue,
    mut b: ScValue,
    cx: &Context,
) -> Result<ScValue, Error> {
    P::Family::sc_check_args(f, &mut a, &mut b, cx)?;
    log::trace!("sc {} {} {}", a.ty, P::NAME, b.ty);
    P::sc_call(f, a, b).map_err(|e| cx.locate(e))
}

/// Emits `P` applied to an operator phrase's two operands.
pub fn sc_call<P: BinaryPolicy>(
    f: &mut ScFrame,
    a: &ScValue,
    b: &ScValue,
    phrase: &Phrase,
) -> Result<ScValue, Error> {
    sc_apply::<P>(f, a.clone(), b.clone(), &Context::at_phrase(phrase))
}

/// Emits `P` applied to a single pair argument: either a literal `[a, b]`
/// or a two-lane value.
pub fn sc_op<P: BinaryPolicy>(cx: &Context, arg: &Operation, f: &mut ScFrame) -> Result<ScValue, Error> {
    if let Some(items) = arg.as_list_literal() {
        return match items {
            [x, y] => {
                let a = f.eval(x)?;
                let b = f.eval(y)?;
                sc_apply::<P>(f, a, b, cx)
            }
            _ => Err(cx.locate(TypeError::ExpectedPair {
                found: format!("a list of size {}", items.len()),
            })),
        };
    }

    let pair = f.eval(arg)?;
    let two_lanes = pair.ty.count() == 2 && (pair.ty.is_any_vec() || pair.ty == ScType::Mat(2));
    if !two_lanes {
        return Err(cx.locate(TypeError::ExpectedPair {
            found: pair.ty.to_string(),
        }));
    }
    let a = f.element(&pair, 0)?;
    let b = f.element(&pair, 1)?;
    sc_apply::<P>(f, a, b, cx)
}

/// Emits a left fold of `P` over `arg`, unrolled at generation time.
///
/// A literal list of N elements costs N-1 applications; a vector operand
/// folds over its lanes. Matrices are not reduced.
pub fn sc_reduce<P: BinaryPolicy>(
    cx: &Context,
    zero: &Value,
    arg: &Operation,
    f: &mut ScFrame,
) -> Result<ScValue, Error> {
    if let Some(items) = arg.as_list_literal() {
        log::trace!("sc reduce {} over {} literal elements", P::NAME, items.len());
        return match items {
            [] => f.constant(zero),
            [only] => {
                let a = f.eval(only)?;
                P::Family::sc_check_arg(&a, cx)?;
                Ok(a)
            }
            [first, rest @ ..] => {
                let init = f.eval(first)?;
                fold_left(init, rest, |acc, item| {
                    let b = f.eval(item)?;
                    sc_apply::<P>(f, acc, b, cx)
                })
            }
        };
    }

    let list = f.eval(arg)?;
    if list.ty.is_mat() {
        return Err(cx.locate(TypeError::MatrixReduce { found: list.ty }));
    }
    if !list.ty.is_any_vec() {
        return Err(cx.locate(TypeError::NotAVector { found: list.ty }));
    }
    log::trace!("sc reduce {} over the {} lanes of {}", P::NAME, list.ty.count(), list.ty);
    let init = f.element(&list, 0)?;
    fold_left(init, 1..list.ty.count(), |acc, i| {
        let b = f.element(&list, i)?;
        sc_apply::<P>(f, acc, b, cx)
    })
}
