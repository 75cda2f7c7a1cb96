//! Operator policies: what an array operation needs to know about a builtin.
//!
//! A policy is split in two layers:
//!
//! - a *family* (`UnaryFamily`, `BinaryFamily`) decides which runtime values
//!   unbox to the native scalar form and which static types generated code
//!   accepts. Families are shared by many builtins.
//! - a *policy* (`UnaryPolicy`, `BinaryPolicy`) picks its family and adds the
//!   scalar operation itself, once for runtime values (`call`) and once for
//!   generated code (`sc_call`).
//!
//! Every policy is a stateless unit struct selected by type, so the broadcast
//! engine is instantiated once per builtin and carries no state.

pub mod builtins;
pub mod family;

use crate::context::Context;
use crate::error::Error;
use crate::sc::{ScFrame, ScValue};
use crate::value::Value;

/// Unboxing and static checking for one-operand builtins.
pub trait UnaryFamily {
    /// Native scalar representation of an operand.
    type Scalar;

    /// Extracts the native scalar, or `None` when the fast path does not apply.
    fn unbox(a: &Value) -> Option<Self::Scalar>;

    /// Validates the static type of a generated operand.
    fn sc_check_arg(a: &ScValue, cx: &Context) -> Result<(), Error>;
}

/// Unboxing and static checking for two-operand builtins.
pub trait BinaryFamily {
    type Left;
    type Right;

    fn unbox_left(a: &Value) -> Option<Self::Left>;
    fn unbox_right(a: &Value) -> Option<Self::Right>;

    /// Validates a lone operand, as when reducing a one-element list.
    fn sc_check_arg(a: &ScValue, cx: &Context) -> Result<(), Error>;

    /// Validates two generated operands and brings them to a common type,
    /// emitting widening conversions into `f` where lanes broadcast.
    fn sc_check_args(
        f: &mut ScFrame,
        a: &mut ScValue,
        b: &mut ScValue,
        cx: &Context,
    ) -> Result<(), Error>;
}

/// A one-operand builtin.
pub trait UnaryPolicy: Sized {
    type Family: UnaryFamily;

    /// Operator symbol or function name, used in diagnostics.
    const NAME: &'static str;

    fn call(x: Scalar<Self>, cx: &Context) -> Result<Value, Error>;

    /// Emits the operation; the operand has already passed `sc_check_arg`.
    fn sc_call(f: &mut ScFrame, a: ScValue) -> Result<ScValue, Error>;
}

/// A two-operand builtin.
pub trait BinaryPolicy: Sized {
    type Family: BinaryFamily;

    /// Operator symbol or function name, used in diagnostics.
    const NAME: &'static str;

    fn call(x: Left<Self>, y: Right<Self>, cx: &Context) -> Result<Value, Error>;

    /// Emits the operation; the operands have already passed `sc_check_args`.
    fn sc_call(f: &mut ScFrame, a: ScValue, b: ScValue) -> Result<ScValue, Error>;
}

pub type Scalar<P> = <<P as UnaryPolicy>::Family as UnaryFamily>::Scalar;
pub type Left<P> = <<P as BinaryPolicy>::Family as BinaryFamily>::Left;
pub type Right<P> = <<P as BinaryPolicy>::Family as BinaryFamily>::Right;
