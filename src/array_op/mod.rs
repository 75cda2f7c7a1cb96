//! The broadcasting engine: array operations built from scalar policies.
//!
//! `binary` and `unary` each expose the same surface in both evaluation
//! modes: `op` for runtime values and `sc_op`/`sc_call`/`sc_apply` for
//! generated code. Reductions in both modes share [`fold_left`].

pub mod binary;
pub mod unary;

use crate::context::Context;
use crate::error::{DomainError, Error};

/// Left-to-right fold that stops at the first error.
///
/// The runtime `reduce` folds values, `sc_reduce` folds generated handles;
/// both go through here so the two modes combine elements in the same order.
pub(crate) fn fold_left<T, I, F>(init: T, items: I, step: F) -> Result<T, Error>
where
    I: IntoIterator,
    F: FnMut(T, I::Item) -> Result<T, Error>,
{
    items.into_iter().try_fold(init, step)
}

/// Descends one list level. `depth` counts the levels already entered;
/// entering more than `max_depth` of them fails.
pub(crate) fn enter(cx: &Context, depth: usize) -> Result<usize, Error> {
    let limit = cx.limits.max_depth;
    if depth >= limit {
        log::debug!("list nesting exceeded {} levels", limit);
        return Err(cx.locate(DomainError::TooDeep { limit }));
    }
    Ok(depth + 1)
}
