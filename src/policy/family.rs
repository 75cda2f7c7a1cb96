//! Policy families: which operands each kind of builtin accepts.
//!
//! | Family               | Runtime operand                     | Generated operand             |
//! |----------------------|-------------------------------------|-------------------------------|
//! | `UnaryScalar`        | anything but a list                 | any struc type                |
//! | `BinaryScalar`       | anything but a list                 | any struc type, unified       |
//! | `UnaryBool`          | Bool                                | Bool or BVec                  |
//! | `BinaryBool`         | Bool                                | Bool or BVec, unified         |
//! | `BinaryBoolOrBool32` | Bool                                | Bool/BVec or Bool32/vector    |
//! | `UnaryNum`           | Num                                 | Num, Vec or Mat               |
//! | `BinaryNum`          | Num                                 | Num, Vec or Mat, unified      |
//! | `Shift`              | bool list, Num                      | Bool32 or vector, Num         |
//! | `UnaryBool32`        | list of exactly 32 Bool             | Bool32 or vector              |
//! | `BinaryBool32`       | list of exactly 32 Bool             | Bool32 or vector, unified     |

use std::rc::Rc;

use crate::context::Context;
use crate::error::{Error, TypeError};
use crate::policy::{BinaryFamily, UnaryFamily};
use crate::sc::types::ScType;
use crate::sc::unify::{check_lanes, sc_struc_unify};
use crate::sc::{ScFrame, ScValue};
use crate::value::Value;

fn expect(
    ok: bool,
    position: Option<usize>,
    expected: &'static str,
    a: &ScValue,
    cx: &Context,
) -> Result<(), Error> {
    if ok {
        Ok(())
    } else {
        Err(cx.locate(TypeError::Argument {
            position,
            expected,
            found: a.ty,
        }))
    }
}

fn unbox_non_list(a: &Value) -> Option<Value> {
    match a {
        Value::List(_) => None,
        other => Some(other.clone()),
    }
}

// ---------------------------------------------------------------------------
// Scalar: any non-list operand
// ---------------------------------------------------------------------------

pub struct UnaryScalar;

impl UnaryFamily for UnaryScalar {
    type Scalar = Value;

    fn unbox(a: &Value) -> Option<Value> {
        unbox_non_list(a)
    }

    fn sc_check_arg(a: &ScValue, cx: &Context) -> Result<(), Error> {
        expect(a.ty.is_struc(), None, "a Struc", a, cx)
    }
}

pub struct BinaryScalar;

impl BinaryFamily for BinaryScalar {
    type Left = Value;
    type Right = Value;

    fn unbox_left(a: &Value) -> Option<Value> {
        unbox_non_list(a)
    }

    fn unbox_right(a: &Value) -> Option<Value> {
        unbox_non_list(a)
    }

    fn sc_check_arg(a: &ScValue, cx: &Context) -> Result<(), Error> {
        UnaryScalar::sc_check_arg(a, cx)
    }

    fn sc_check_args(
        f: &mut ScFrame,
        a: &mut ScValue,
        b: &mut ScValue,
        cx: &Context,
    ) -> Result<(), Error> {
        sc_struc_unify(f, a, b, cx)
    }
}

// ---------------------------------------------------------------------------
// Bool, and Bool or Bool32
// ---------------------------------------------------------------------------

pub struct UnaryBool;

impl UnaryFamily for UnaryBool {
    type Scalar = bool;

    fn unbox(a: &Value) -> Option<bool> {
        a.as_bool()
    }

    fn sc_check_arg(a: &ScValue, cx: &Context) -> Result<(), Error> {
        expect(a.ty.is_bool_or_vec(), None, "Bool or BVec", a, cx)
    }
}

pub struct BinaryBool;

impl BinaryFamily for BinaryBool {
    type Left = bool;
    type Right = bool;

    fn unbox_left(a: &Value) -> Option<bool> {
        a.as_bool()
    }

    fn unbox_right(a: &Value) -> Option<bool> {
        a.as_bool()
    }

    fn sc_check_arg(a: &ScValue, cx: &Context) -> Result<(), Error> {
        UnaryBool::sc_check_arg(a, cx)
    }

    fn sc_check_args(
        f: &mut ScFrame,
        a: &mut ScValue,
        b: &mut ScValue,
        cx: &Context,
    ) -> Result<(), Error> {
        expect(a.ty.is_bool_or_vec(), Some(0), "Bool or BVec", a, cx)?;
        expect(b.ty.is_bool_or_vec(), Some(1), "Bool or BVec", b, cx)?;
        sc_struc_unify(f, a, b, cx)
    }
}

/// Plain booleans at runtime; in generated code, booleans or packed booleans
/// but never a mix of the two.
pub struct BinaryBoolOrBool32;

impl BinaryFamily for BinaryBoolOrBool32 {
    type Left = bool;
    type Right = bool;

    fn unbox_left(a: &Value) -> Option<bool> {
        a.as_bool()
    }

    fn unbox_right(a: &Value) -> Option<bool> {
        a.as_bool()
    }

    fn sc_check_arg(a: &ScValue, cx: &Context) -> Result<(), Error> {
        expect(a.ty.is_bool_struc(), None, "Bool or Bool32", a, cx)
    }

    fn sc_check_args(
        f: &mut ScFrame,
        a: &mut ScValue,
        b: &mut ScValue,
        cx: &Context,
    ) -> Result<(), Error> {
        let same_category = (a.ty.is_bool_or_vec() && b.ty.is_bool_or_vec())
            || (a.ty.is_bool32_or_vec() && b.ty.is_bool32_or_vec());
        if !same_category {
            // Bool and Bool32 operands are not converted into each other.
            return Err(cx.locate(TypeError::Incompatible {
                expected: "Bool or Bool32",
                left: a.ty,
                right: b.ty,
            }));
        }
        check_lanes(a.ty, b.ty, cx)?;
        sc_struc_unify(f, a, b, cx)
    }
}

// ---------------------------------------------------------------------------
// Num
// ---------------------------------------------------------------------------

pub struct UnaryNum;

impl UnaryFamily for UnaryNum {
    type Scalar = f64;

    fn unbox(a: &Value) -> Option<f64> {
        a.as_num()
    }

    fn sc_check_arg(a: &ScValue, cx: &Context) -> Result<(), Error> {
        expect(a.ty.is_num_struc(), None, "a Num, Vec or Mat", a, cx)
    }
}

pub struct BinaryNum;

impl BinaryFamily for BinaryNum {
    type Left = f64;
    type Right = f64;

    fn unbox_left(a: &Value) -> Option<f64> {
        a.as_num()
    }

    fn unbox_right(a: &Value) -> Option<f64> {
        a.as_num()
    }

    fn sc_check_arg(a: &ScValue, cx: &Context) -> Result<(), Error> {
        UnaryNum::sc_check_arg(a, cx)
    }

    fn sc_check_args(
        f: &mut ScFrame,
        a: &mut ScValue,
        b: &mut ScValue,
        cx: &Context,
    ) -> Result<(), Error> {
        expect(a.ty.is_num_struc(), Some(0), "a Num, Vec or Mat", a, cx)?;
        expect(b.ty.is_num_struc(), Some(1), "a Num, Vec or Mat", b, cx)?;
        sc_struc_unify(f, a, b, cx)
    }
}

// ---------------------------------------------------------------------------
// Shift: a boolean list shifted by a count
// ---------------------------------------------------------------------------

/// The left operand is a non-empty list whose first element is a boolean;
/// the right operand is a number. Range and element checks happen in `call`.
pub struct Shift;

impl BinaryFamily for Shift {
    type Left = Rc<[Value]>;
    type Right = f64;

    fn unbox_left(a: &Value) -> Option<Rc<[Value]>> {
        let items = a.as_list()?;
        match items.first() {
            Some(Value::Bool(_)) => Some(items.clone()),
            _ => None,
        }
    }

    fn unbox_right(a: &Value) -> Option<f64> {
        a.as_num()
    }

    fn sc_check_arg(a: &ScValue, cx: &Context) -> Result<(), Error> {
        expect(a.ty.is_bool32_or_vec(), None, "Bool32", a, cx)
    }

    fn sc_check_args(
        _f: &mut ScFrame,
        a: &mut ScValue,
        b: &mut ScValue,
        cx: &Context,
    ) -> Result<(), Error> {
        expect(a.ty.is_bool32_or_vec(), Some(0), "Bool32", a, cx)?;
        expect(b.ty == ScType::Num, Some(1), "Num", b, cx)
    }
}

// ---------------------------------------------------------------------------
// Bool32: 32 booleans packed into a word
// ---------------------------------------------------------------------------

pub struct UnaryBool32;

impl UnaryFamily for UnaryBool32 {
    type Scalar = u32;

    fn unbox(a: &Value) -> Option<u32> {
        a.to_bool32()
    }

    fn sc_check_arg(a: &ScValue, cx: &Context) -> Result<(), Error> {
        expect(a.ty.is_bool32_or_vec(), None, "a Bool32 or list of Bool32", a, cx)
    }
}

pub struct BinaryBool32;

impl BinaryFamily for BinaryBool32 {
    type Left = u32;
    type Right = u32;

    fn unbox_left(a: &Value) -> Option<u32> {
        a.to_bool32()
    }

    fn unbox_right(a: &Value) -> Option<u32> {
        a.to_bool32()
    }

    fn sc_check_arg(a: &ScValue, cx: &Context) -> Result<(), Error> {
        UnaryBool32::sc_check_arg(a, cx)
    }

    fn sc_check_args(
        f: &mut ScFrame,
        a: &mut ScValue,
        b: &mut ScValue,
        cx: &Context,
    ) -> Result<(), Error> {
        expect(a.ty.is_bool32_or_vec(), Some(0), "Bool32", a, cx)?;
        expect(b.ty.is_bool32_or_vec(), Some(1), "Bool32", b, cx)?;
        sc_struc_unify(f, a, b, cx)
    }
}
