//! Property-based tests for the broadcasting laws.
//!
//! Uses proptest to verify invariants that must hold for all inputs:
//! - the scalar fast path equals the policy's own `call`
//! - element-wise and broadcast results agree with per-element application
//! - reduce is a left fold
//! - size mismatches name both sizes
//! - generated reductions unroll into N-1 applications

use proptest::prelude::*;

use arrayop::array_op::binary::{op, reduce, sc_reduce};
use arrayop::policy::builtins::{Add, Max, Subtract};
use arrayop::policy::BinaryPolicy;
use arrayop::syntax::Operation;
use arrayop::{Context, ScFrame, ScType, Value};

fn nums(ns: &[f64]) -> Value {
    Value::list(ns.iter().map(|&n| Value::Num(n)))
}

fn finite() -> impl Strategy<Value = f64> {
    -1.0e6..1.0e6f64
}

proptest! {
    /// For all numbers, `op` is exactly the scalar operation.
    #[test]
    fn prop_scalar_fast_path(a in finite(), b in finite()) {
        let cx = Context::bare();
        let expected = Add::call(a, b, &cx).unwrap();
        prop_assert_eq!(op::<Add>(&cx, &Value::Num(a), &Value::Num(b)).unwrap(), expected);
        let expected = Max::call(a, b, &cx).unwrap();
        prop_assert_eq!(op::<Max>(&cx, &Value::Num(a), &Value::Num(b)).unwrap(), expected);
    }

    /// `op(A, B)[i] == op(A[i], B[i])` for equal-length lists.
    #[test]
    fn prop_element_wise(pairs in prop::collection::vec((finite(), finite()), 0..16)) {
        let cx = Context::bare();
        let (xs, ys): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
        let r = op::<Subtract>(&cx, &nums(&xs), &nums(&ys)).unwrap();
        let items = r.as_list().unwrap();
        prop_assert_eq!(items.len(), xs.len());
        for i in 0..xs.len() {
            let each = op::<Subtract>(&cx, &Value::Num(xs[i]), &Value::Num(ys[i])).unwrap();
            prop_assert_eq!(&items[i], &each);
        }
    }

    /// A scalar broadcasts against every element, on either side.
    #[test]
    fn prop_broadcast(s in finite(), ys in prop::collection::vec(finite(), 0..16)) {
        let cx = Context::bare();
        let left = op::<Subtract>(&cx, &Value::Num(s), &nums(&ys)).unwrap();
        let right = op::<Subtract>(&cx, &nums(&ys), &Value::Num(s)).unwrap();
        let expected_left: Vec<f64> = ys.iter().map(|y| s - y).collect();
        let expected_right: Vec<f64> = ys.iter().map(|y| y - s).collect();
        prop_assert_eq!(left, nums(&expected_left));
        prop_assert_eq!(right, nums(&expected_right));
    }

    /// Lists of different sizes fail with both sizes in the message.
    #[test]
    fn prop_mismatch_names_sizes(m in 0usize..8, n in 0usize..8) {
        prop_assume!(m != n);
        let cx = Context::bare();
        let x = nums(&vec![1.0; m]);
        let y = nums(&vec![1.0; n]);
        let err = op::<Add>(&cx, &x, &y).unwrap_err();
        let expected = format!("mismatched list sizes ({},{})", m, n);
        prop_assert!(err.to_string().contains(&expected), "got: {}", err);
    }

    /// reduce is a strict left fold from the neutral element.
    #[test]
    fn prop_reduce_left_fold(zero in finite(), xs in prop::collection::vec(finite(), 0..16)) {
        let cx = Context::bare();
        let r = reduce::<Subtract>(&cx, &Value::Num(zero), &nums(&xs)).unwrap();
        let expected = xs.iter().fold(zero, |acc, x| acc - x);
        prop_assert_eq!(r, Value::Num(expected));
    }

    /// A literal list of N operands reduces with exactly N-1 emitted applications.
    #[test]
    fn prop_sc_reduce_unrolls(n in 2usize..12) {
        let cx = Context::bare();
        let items = (0..n)
            .map(|i| Operation::variable(format!("x{}", i), ScType::Num))
            .collect();
        let mut f = ScFrame::new();
        sc_reduce::<Add>(&cx, &Value::Num(0.0), &Operation::List(items), &mut f).unwrap();
        prop_assert_eq!(f.statement_count(), n - 1);
        let first = f.body().lines().next().unwrap_or("").to_owned();
        prop_assert_eq!(first, "float r1 = x0 + x1;".to_owned());
    }
}
