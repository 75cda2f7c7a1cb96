use crate::context::Context;
use crate::error::{Error, TypeError};
use crate::sc::types::ScType;
use crate::sc::{ScFrame, ScValue};

/// Brings two operands of a generated binary operation to one type.
///
/// Equal types pass unchanged. A single-lane operand is widened to the
/// other operand's lane count. Any other lane mismatch is an error naming
/// both counts.
pub fn sc_struc_unify(
    f: &mut ScFrame,
    a: &mut ScValue,
    b: &mut ScValue,
    cx: &Context,
) -> Result<(), Error> {
    if a.ty == b.ty {
        return Ok(());
    }
    if !a.ty.is_struc() {
        return Err(cx.locate(TypeError::Argument {
            position: Some(0),
            expected: "a Struc",
            found: a.ty,
        }));
    }
    if !b.ty.is_struc() {
        return Err(cx.locate(TypeError::Argument {
            position: Some(1),
            expected: "a Struc",
            found: b.ty,
        }));
    }
    if a.ty.scalar_type() != b.ty.scalar_type() {
        return Err(cx.locate(TypeError::Mismatch {
            left: a.ty,
            right: b.ty,
        }));
    }
    match (a.ty.count(), b.ty.count()) {
        (1, _) => {
            *a = f.broadcast(a, b.ty).map_err(|e| cx.locate(e))?;
            Ok(())
        }
        (_, 1) => {
            *b = f.broadcast(b, a.ty).map_err(|e| cx.locate(e))?;
            Ok(())
        }
        (l, r) if l != r => Err(cx.locate(TypeError::LaneMismatch { left: l, right: r })),
        // Same lane count, different shape: a vector against a matrix.
        _ => Err(cx.locate(TypeError::Mismatch {
            left: a.ty,
            right: b.ty,
        })),
    }
}

/// The lane-count rule alone, without widening: counts must match unless
/// one of them is 1.
pub fn check_lanes(a: ScType, b: ScType, cx: &Context) -> Result<(), Error> {
    let (l, r) = (a.count(), b.count());
    if l != r && l > 1 && r > 1 {
        return Err(cx.locate(TypeError::LaneMismatch { left: l, right: r }));
    }
    Ok(())
}
