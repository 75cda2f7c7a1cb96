//! Reactive values: operands whose content is only known to generated code.
//!
//! A reactive value has a fixed static type and a symbolic expression
//! graph. When an array operation meets a reactive operand it cannot
//! compute a result, so it builds a new expression node instead. The node
//! records the policy's own code emitter, which is also how the result type
//! is inferred: the emitter runs once on a scratch frame.

use std::fmt;
use std::rc::Rc;

use crate::array_op::{binary, unary};
use crate::context::Context;
use crate::diagnostics::{binary_domain_error, unary_domain_error};
use crate::error::Error;
use crate::policy::{BinaryPolicy, UnaryPolicy};
use crate::sc::types::ScType;
use crate::sc::{ScFrame, ScValue};
use crate::value::Value;

/// Identifies the code generation context a reactive value resolves in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResolutionId(pub u32);

/// Emits a checked binary operation into a frame.
pub type BinaryEmitter = fn(&mut ScFrame, ScValue, ScValue, &Context) -> Result<ScValue, Error>;

/// Emits a checked unary operation into a frame.
pub type UnaryEmitter = fn(&mut ScFrame, ScValue, &Context) -> Result<ScValue, Error>;

/// A node of a reactive expression graph. Graphs are acyclic and shared.
#[derive(Clone)]
pub enum ReactiveExpr {
    /// A concrete operand promoted into the graph.
    Constant(Value),
    /// A leaf supplied by the generated code's environment.
    Uniform { name: String, ty: ScType },
    Binary {
        opname: &'static str,
        emit: BinaryEmitter,
        lhs: Rc<ReactiveExpr>,
        rhs: Rc<ReactiveExpr>,
    },
    Unary {
        opname: &'static str,
        emit: UnaryEmitter,
        arg: Rc<ReactiveExpr>,
    },
}

/// Nodes printed before an expression's text is cut short with `...`.
const DISPLAY_NODES: usize = 32;

impl ReactiveExpr {
    /// Replays the graph into `f`, returning the generated result. A node
    /// shared by several parents is emitted once per frame.
    pub fn sc_eval(node: &Rc<ReactiveExpr>, f: &mut ScFrame) -> Result<ScValue, Error> {
        if let Some(v) = f.replayed(node) {
            return Ok(v);
        }
        let v = match node.as_ref() {
            ReactiveExpr::Constant(v) => f.constant(v)?,
            ReactiveExpr::Uniform { name, ty } => f.input(name.clone(), *ty)?,
            ReactiveExpr::Binary { emit, lhs, rhs, .. } => {
                let a = Self::sc_eval(lhs, f)?;
                let b = Self::sc_eval(rhs, f)?;
                emit(f, a, b, &Context::bare())?
            }
            ReactiveExpr::Unary { emit, arg, .. } => {
                let a = Self::sc_eval(arg, f)?;
                emit(f, a, &Context::bare())?
            }
        };
        f.remember(node, v.clone());
        Ok(v)
    }

    /// Writes the expression in infix form, visiting at most `budget` nodes.
    /// Binary operands are parenthesized when `nested`.
    fn write_node(&self, f: &mut fmt::Formatter<'_>, budget: &mut usize, nested: bool) -> fmt::Result {
        if *budget == 0 {
            return f.write_str("...");
        }
        *budget -= 1;
        match self {
            ReactiveExpr::Constant(v) => write!(f, "{}", v),
            ReactiveExpr::Uniform { name, .. } => f.write_str(name),
            ReactiveExpr::Binary { opname, lhs, rhs, .. } => {
                if nested {
                    f.write_str("(")?;
                }
                lhs.write_node(f, budget, true)?;
                write!(f, " {} ", opname)?;
                rhs.write_node(f, budget, true)?;
                if nested {
                    f.write_str(")")?;
                }
                Ok(())
            }
            ReactiveExpr::Unary { opname, arg, .. } => {
                if opname.starts_with(|c: char| c.is_ascii_alphabetic()) {
                    write!(f, "{}(", opname)?;
                    arg.write_node(f, budget, false)?;
                    f.write_str(")")
                } else {
                    f.write_str(opname)?;
                    arg.write_node(f, budget, true)
                }
            }
        }
    }
}

impl fmt::Debug for ReactiveExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReactiveExpr::Constant(v) => f.debug_tuple("Constant").field(v).finish(),
            ReactiveExpr::Uniform { name, ty } => f
                .debug_struct("Uniform")
                .field("name", name)
                .field("ty", ty)
                .finish(),
            ReactiveExpr::Binary { opname, lhs, rhs, .. } => f
                .debug_struct("Binary")
                .field("opname", opname)
                .field("lhs", lhs)
                .field("rhs", rhs)
                .finish(),
            ReactiveExpr::Unary { opname, arg, .. } => f
                .debug_struct("Unary")
                .field("opname", opname)
                .field("arg", arg)
                .finish(),
        }
    }
}

impl fmt::Display for ReactiveExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut budget = DISPLAY_NODES;
        self.write_node(f, &mut budget, false)
    }
}

/// A value of known static type whose content is computed by generated code.
///
/// Invariant: `sctype` never changes after construction.
#[derive(Debug)]
pub struct ReactiveValue {
    sctype: ScType,
    expr: Rc<ReactiveExpr>,
    origin: ResolutionId,
}

impl ReactiveValue {
    pub fn new(sctype: ScType, expr: Rc<ReactiveExpr>, origin: ResolutionId) -> Self {
        Self {
            sctype,
            expr,
            origin,
        }
    }

    /// A reactive leaf named `name`, e.g. a time or mouse uniform.
    pub fn uniform(name: impl Into<String>, ty: ScType, origin: ResolutionId) -> Value {
        let expr = ReactiveExpr::Uniform {
            name: name.into(),
            ty,
        };
        Value::Reactive(Rc::new(Self::new(ty, Rc::new(expr), origin)))
    }

    pub fn sctype(&self) -> ScType {
        self.sctype
    }

    pub fn expr(&self) -> &Rc<ReactiveExpr> {
        &self.expr
    }

    pub fn origin(&self) -> ResolutionId {
        self.origin
    }
}

impl fmt::Display for ReactiveValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expr)
    }
}

// ---------------------------------------------------------------------------
// Building reactive results
// ---------------------------------------------------------------------------

/// A numeric operand as an expression node, with the context it resolves in.
/// Concrete numbers become constant leaves and have no context of their own.
fn numeric_operand(v: &Value) -> Option<(Rc<ReactiveExpr>, Option<ResolutionId>)> {
    match v {
        Value::Num(_) => Some((Rc::new(ReactiveExpr::Constant(v.clone())), None)),
        Value::Reactive(r) if r.sctype() == ScType::Num => Some((r.expr().clone(), Some(r.origin()))),
        _ => None,
    }
}

/// Result type of `P` applied to operands of the given types, found by
/// emitting the operation into a scratch frame.
pub fn infer_binary_type<P: BinaryPolicy>(
    cx: &Context,
    xt: ScType,
    yt: ScType,
) -> Result<ScType, Error> {
    let mut f = ScFrame::new();
    let a = f.input("x", xt)?;
    let b = f.input("y", yt)?;
    Ok(binary::sc_apply::<P>(&mut f, a, b, cx)?.ty)
}

pub fn infer_unary_type<P: UnaryPolicy>(cx: &Context, xt: ScType) -> Result<ScType, Error> {
    let mut f = ScFrame::new();
    let a = f.input("x", xt)?;
    Ok(unary::sc_apply::<P>(&mut f, a, cx)?.ty)
}

/// Combines two operands, at least one of them reactive, into a new
/// reactive value. Only numeric operands with a numeric result combine;
/// everything else is a domain error.
pub(crate) fn binary_op<P: BinaryPolicy>(cx: &Context, x: &Value, y: &Value) -> Result<Value, Error> {
    let Some((xe, xo)) = numeric_operand(x) else {
        log::debug!("reactive {}: left operand {} is not numeric", P::NAME, x);
        return Err(binary_domain_error(cx, 0, x, y));
    };
    let Some((ye, yo)) = numeric_operand(y) else {
        log::debug!("reactive {}: right operand {} is not numeric", P::NAME, y);
        return Err(binary_domain_error(cx, 1, x, y));
    };
    let origin = match (xo, yo) {
        (Some(a), Some(b)) if a != b => {
            log::debug!("reactive {}: operands resolve in different contexts", P::NAME);
            return Err(binary_domain_error(cx, 1, x, y));
        }
        (Some(a), _) | (None, Some(a)) => a,
        (None, None) => return Err(binary_domain_error(cx, 0, x, y)),
    };
    let blame = if xo.is_some() { 0 } else { 1 };
    match infer_binary_type::<P>(cx, ScType::Num, ScType::Num) {
        Ok(ScType::Num) => {}
        _ => return Err(binary_domain_error(cx, blame, x, y)),
    }
    let expr = ReactiveExpr::Binary {
        opname: P::NAME,
        emit: binary::sc_apply::<P>,
        lhs: xe,
        rhs: ye,
    };
    let result = ReactiveValue::new(ScType::Num, Rc::new(expr), origin);
    log::debug!("built reactive expression {}", result);
    Ok(Value::Reactive(Rc::new(result)))
}

/// Applies `P` to a reactive operand, yielding a new reactive value.
pub(crate) fn unary_op<P: UnaryPolicy>(cx: &Context, x: &Value) -> Result<Value, Error> {
    let r = match x {
        Value::Reactive(r) if r.sctype() == ScType::Num => r,
        _ => return Err(unary_domain_error(cx, x)),
    };
    match infer_unary_type::<P>(cx, ScType::Num) {
        Ok(ScType::Num) => {}
        _ => return Err(unary_domain_error(cx, x)),
    }
    let expr = ReactiveExpr::Unary {
        opname: P::NAME,
        emit: unary::sc_apply::<P>,
        arg: r.expr().clone(),
    };
    let result = ReactiveValue::new(ScType::Num, Rc::new(expr), r.origin());
    log::debug!("built reactive expression {}", result);
    Ok(Value::Reactive(Rc::new(result)))
}
