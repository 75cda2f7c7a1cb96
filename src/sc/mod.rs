//! Code generation mode: typed handles and the GLSL-style emission frame.
//!
//! Generated code has no dynamic lists, so every operand is an `ScValue`:
//! the name of a generated variable plus its static type. `ScFrame`
//! accumulates straight-line statements for one generated function body.

pub mod types;
pub mod unify;

use std::collections::HashMap;
use std::fmt::{self, Write};
use std::rc::Rc;

use crate::error::{Error, TypeError};
use crate::reactive::ReactiveExpr;
use crate::syntax::Operation;
use crate::value::Value;

use self::types::ScType;

pub use unify::sc_struc_unify;

/// A handle to a value in generated code.
#[derive(Debug, Clone, PartialEq)]
pub struct ScValue {
    /// Variable name or expression text as it appears in generated code.
    pub expr: String,
    pub ty: ScType,
}

impl ScValue {
    pub fn new(expr: impl Into<String>, ty: ScType) -> Self {
        Self {
            expr: expr.into(),
            ty,
        }
    }
}

impl fmt::Display for ScValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expr)
    }
}

/// Formats a number as a GLSL float literal.
pub fn glsl_float(n: f64) -> String {
    if n.is_nan() {
        "(0.0/0.0)".into()
    } else if n.is_infinite() {
        if n > 0.0 { "(1.0/0.0)".into() } else { "(-1.0/0.0)".into() }
    } else if n == n.trunc() && n.abs() < 1e15 {
        format!("{:.1}", n)
    } else {
        format!("{}", n)
    }
}

/// Prefix of the temporaries `emit` names `r1`, `r2`, ...
const TEMP_PREFIX: char = 'r';

fn is_temporary(name: &str) -> bool {
    name.strip_prefix(TEMP_PREFIX)
        .map_or(false, |n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
}

/// One generated function body under construction.
#[derive(Debug, Default)]
pub struct ScFrame {
    body: String,
    next_id: u32,
    statements: usize,
    inputs: Vec<ScValue>,
    /// Reactive nodes already replayed, keyed by node address. The `Rc` keeps
    /// the address from being reused while the frame lives.
    replayed: HashMap<*const ReactiveExpr, (Rc<ReactiveExpr>, ScValue)>,
}

impl ScFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a free input of the generated code (parameter or uniform).
    ///
    /// Declaring the same name twice yields the same input; the types must
    /// agree. Names of the form `r<N>` belong to generated temporaries.
    pub fn input(&mut self, name: impl Into<String>, ty: ScType) -> Result<ScValue, Error> {
        let value = ScValue::new(name, ty);
        if is_temporary(&value.expr) {
            return Err(TypeError::Unsupported {
                detail: format!("input name '{}' is reserved for generated temporaries", value.expr),
            }
            .into());
        }
        match self.inputs.iter().find(|v| v.expr == value.expr) {
            Some(prev) if prev.ty != ty => Err(TypeError::Mismatch {
                left: prev.ty,
                right: ty,
            }
            .into()),
            Some(_) => Ok(value),
            None => {
                self.inputs.push(value.clone());
                Ok(value)
            }
        }
    }

    /// The value a reactive node was replayed to earlier in this frame.
    pub(crate) fn replayed(&self, node: &Rc<ReactiveExpr>) -> Option<ScValue> {
        self.replayed.get(&Rc::as_ptr(node)).map(|(_, v)| v.clone())
    }

    pub(crate) fn remember(&mut self, node: &Rc<ReactiveExpr>, value: ScValue) {
        self.replayed.insert(Rc::as_ptr(node), (node.clone(), value));
    }

    /// Emits `ty rN = rhs;` and returns the new variable.
    pub fn emit(&mut self, ty: ScType, rhs: impl fmt::Display) -> Result<ScValue, Error> {
        if !ty.is_struc() {
            return Err(TypeError::Unsupported {
                detail: format!("no generated type for the result of `{}`", rhs),
            }
            .into());
        }
        self.next_id += 1;
        let name = format!("{}{}", TEMP_PREFIX, self.next_id);
        writeln!(self.body, "{} {} = {};", ty.glsl_name(), name, rhs)?;
        self.statements += 1;
        log::trace!("emit {} {} = {}", ty.glsl_name(), name, rhs);
        Ok(ScValue::new(name, ty))
    }

    /// The statements emitted so far, one per line.
    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn statement_count(&self) -> usize {
        self.statements
    }

    pub fn inputs(&self) -> &[ScValue] {
        &self.inputs
    }

    /// Renders the frame as a GLSL function returning `result`.
    pub fn render_function(&self, name: &str, result: &ScValue) -> Result<String, Error> {
        let mut out = String::new();
        let params = self
            .inputs
            .iter()
            .map(|v| format!("{} {}", v.ty.glsl_name(), v.expr))
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(out, "{} {}({})", result.ty.glsl_name(), name, params)?;
        writeln!(out, "{{")?;
        for line in self.body.lines() {
            writeln!(out, "  {}", line)?;
        }
        writeln!(out, "  return {};", result)?;
        writeln!(out, "}}")?;
        Ok(out)
    }

    /// Generates code for an analysed operand.
    pub fn eval(&mut self, op: &Operation) -> Result<ScValue, Error> {
        match op {
            Operation::Constant(v) => self.constant(v),
            Operation::Variable { name, ty } => self.input(name.clone(), *ty),
            Operation::List(items) => self.list(items),
        }
    }

    /// Generates code for a value known at generation time.
    pub fn constant(&mut self, value: &Value) -> Result<ScValue, Error> {
        if let Value::Reactive(r) = value {
            return ReactiveExpr::sc_eval(r.expr(), self);
        }
        let (text, ty) = constant_expr(value)?;
        self.emit(ty, text)
    }

    /// A literal list becomes a vector or matrix constructor over its elements.
    fn list(&mut self, items: &[Operation]) -> Result<ScValue, Error> {
        let mut elems = Vec::with_capacity(items.len());
        for item in items {
            elems.push(self.eval(item)?);
        }
        let ty = list_type(&elems).ok_or_else(|| TypeError::Unsupported {
            detail: format!(
                "list [{}] has no vector or matrix representation",
                elems.iter().map(|e| e.ty.to_string()).collect::<Vec<_>>().join(",")
            ),
        })?;
        let args = elems.iter().map(|e| e.expr.as_str()).collect::<Vec<_>>().join(",");
        self.emit(ty, format_args!("{}({})", ty.glsl_name(), args))
    }

    /// Extracts lane `i` of a vector, or column `i` of a matrix.
    pub fn element(&mut self, v: &ScValue, i: u8) -> Result<ScValue, Error> {
        if !(v.ty.is_any_vec() || v.ty.is_mat()) || i >= v.ty.count() {
            return Err(TypeError::NotAVector { found: v.ty }.into());
        }
        self.emit(v.ty.elem_type(), format_args!("{}[{}]", v, i))
    }

    /// Widens a scalar to `to` by replicating it into every lane.
    pub fn broadcast(&mut self, v: &ScValue, to: ScType) -> Result<ScValue, Error> {
        if v.ty.count() != 1 || v.ty.scalar_type() != to.scalar_type() {
            return Err(TypeError::Mismatch {
                left: v.ty,
                right: to,
            }
            .into());
        }
        match to {
            ScType::Mat(n) => {
                let col = ScType::Vec(n);
                let cols = vec![format!("{}({})", col.glsl_name(), v); n as usize].join(",");
                self.emit(to, format_args!("{}({})", to.glsl_name(), cols))
            }
            _ => self.emit(to, format_args!("{}({})", to.glsl_name(), v)),
        }
    }

    /// Applies a scalar infix operator lane by lane, for vector types GLSL
    /// has no native operator for.
    pub fn zip_lanes(&mut self, a: &ScValue, b: &ScValue, infix: &str) -> Result<ScValue, Error> {
        let lanes = (0..a.ty.count())
            .map(|i| format!("{}[{}] {} {}[{}]", a, i, infix, b, i))
            .collect::<Vec<_>>()
            .join(",");
        self.emit(a.ty, format_args!("{}({})", a.ty.glsl_name(), lanes))
    }
}

/// The vector or matrix type a list of element types constructs, if any.
fn list_type(elems: &[ScValue]) -> Option<ScType> {
    let first = elems.first()?.ty;
    if elems.iter().any(|e| e.ty != first) {
        return None;
    }
    match first {
        ScType::Num => ScType::vec(elems.len()),
        ScType::Bool => ScType::bvec(elems.len()),
        ScType::Bool32 => ScType::bool32_vec(elems.len()),
        ScType::Vec(n) if n as usize == elems.len() => ScType::mat(elems.len()),
        _ => None,
    }
}

/// The GLSL constant expression for a concrete value, with its type.
fn constant_expr(value: &Value) -> Result<(String, ScType), Error> {
    match value {
        Value::Num(n) => Ok((glsl_float(*n), ScType::Num)),
        Value::Bool(b) => Ok((b.to_string(), ScType::Bool)),
        Value::List(items) => {
            if let Some(word) = value.to_bool32() {
                return Ok((format!("{}u", word), ScType::Bool32));
            }
            let mut parts = Vec::with_capacity(items.len());
            let mut tys = Vec::with_capacity(items.len());
            for item in items.iter() {
                let (text, ty) = constant_expr(item)?;
                parts.push(text);
                tys.push(ScValue::new("", ty));
            }
            let ty = list_type(&tys).ok_or_else(|| TypeError::Unsupported {
                detail: format!("constant {} has no vector or matrix representation", value),
            })?;
            Ok((format!("{}({})", ty.glsl_name(), parts.join(",")), ty))
        }
        Value::Reactive(_) => Err(TypeError::Unsupported {
            detail: format!("reactive value {} is not a constant", value),
        }
        .into()),
    }
}
