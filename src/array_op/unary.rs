//! Unary array operations: the scalar operation mapped over nested lists.

use crate::array_op::enter;
use crate::context::Context;
use crate::diagnostics::unary_domain_error;
use crate::error::Error;
use crate::policy::{UnaryFamily, UnaryPolicy};
use crate::reactive;
use crate::sc::{ScFrame, ScValue};
use crate::syntax::{Operation, Phrase};
use crate::value::Value;

pub fn op<P: UnaryPolicy>(cx: &Context, x: &Value) -> Result<Value, Error> {
    op_at::<P>(cx, x, 0)
}

fn op_at<P: UnaryPolicy>(cx: &Context, x: &Value, depth: usize) -> Result<Value, Error> {
    if let Some(a) = P::Family::unbox(x) {
        return P::call(a, cx);
    }
    match x {
        Value::List(items) => {
            let depth = enter(cx, depth)?;
            let items = items
                .iter()
                .map(|item| op_at::<P>(cx, item, depth))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::from(items))
        }
        Value::Reactive(_) => reactive::unary_op::<P>(cx, x),
        _ => Err(unary_domain_error(cx, x)),
    }
}

pub fn sc_apply<P: UnaryPolicy>(f: &mut ScFrame, a: ScValue, cx: &Context) -> Result<ScValue, Error> {
    P::Family::sc_check_arg(&a, cx)?;
    log::trace!("sc {}{}", P::NAME, a.ty);
    P::sc_call(f, a).map_err(|e| cx.locate(e))
}

pub fn sc_call<P: UnaryPolicy>(f: &mut ScFrame, a: &ScValue, phrase: &Phrase) -> Result<ScValue, Error> {
    sc_apply::<P>(f, a.clone(), &Context::at_phrase(phrase))
}

pub fn sc_op<P: UnaryPolicy>(cx: &Context, arg: &Operation, f: &mut ScFrame) -> Result<ScValue, Error> {
    let a = f.eval(arg)?;
    sc_apply::<P>(f, a, cx)
}
