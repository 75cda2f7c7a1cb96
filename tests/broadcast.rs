//! Runtime binary broadcasting: scalar fast path, left/right broadcast,
//! element-wise lists, domain errors and the nesting limit.

use arrayop::array_op::binary::op;
use arrayop::policy::builtins::{
    Add, And, BitAnd, Equal, LShift, Less, Max, RShift, Subtract, Xor,
};
use arrayop::syntax::{Phrase, Span};
use arrayop::{Context, Limits, Value};

fn num(n: f64) -> Value {
    Value::Num(n)
}

fn nums(ns: &[f64]) -> Value {
    Value::list(ns.iter().map(|&n| Value::Num(n)))
}

fn bools(bs: &[bool]) -> Value {
    Value::list(bs.iter().map(|&b| Value::Bool(b)))
}

// ---------------------------------------------------------------------------
// 1. Scalar fast path
// ---------------------------------------------------------------------------

#[test]
fn test_add_scalars() {
    let cx = Context::bare();
    assert_eq!(op::<Add>(&cx, &num(2.0), &num(3.0)).unwrap(), num(5.0));
}

#[test]
fn test_nan_result_is_a_value_not_a_failure() {
    let cx = Context::bare();
    let r = op::<Add>(&cx, &num(f64::NAN), &num(1.0)).unwrap();
    assert!(r.as_num().map_or(false, f64::is_nan), "expected NaN, got {}", r);
}

#[test]
fn test_compare_scalars_yields_bool() {
    let cx = Context::bare();
    assert_eq!(op::<Less>(&cx, &num(1.0), &num(2.0)).unwrap(), Value::Bool(true));
}

// ---------------------------------------------------------------------------
// 2. Broadcasting
// ---------------------------------------------------------------------------

#[test]
fn test_element_wise_add() {
    let cx = Context::bare();
    let r = op::<Add>(&cx, &nums(&[1.0, 2.0, 3.0]), &nums(&[10.0, 20.0, 30.0])).unwrap();
    assert_eq!(r, nums(&[11.0, 22.0, 33.0]));
    assert_eq!(r.to_string(), "[11,22,33]");
}

#[test]
fn test_broadcast_left() {
    let cx = Context::bare();
    let r = op::<Add>(&cx, &num(1.0), &nums(&[10.0, 20.0])).unwrap();
    assert_eq!(r, nums(&[11.0, 21.0]));
}

#[test]
fn test_broadcast_right_keeps_operand_order() {
    let cx = Context::bare();
    let r = op::<Subtract>(&cx, &nums(&[10.0, 20.0]), &num(1.0)).unwrap();
    assert_eq!(r, nums(&[9.0, 19.0]));
}

#[test]
fn test_nested_lists_broadcast_recursively() {
    let cx = Context::bare();
    let x = Value::list(vec![nums(&[1.0, 2.0]), num(3.0)]);
    let r = op::<Add>(&cx, &x, &num(10.0)).unwrap();
    assert_eq!(r.to_string(), "[[11,12],13]");
}

#[test]
fn test_empty_lists_combine_to_empty() {
    let cx = Context::bare();
    let r = op::<Add>(&cx, &nums(&[]), &nums(&[])).unwrap();
    assert_eq!(r, nums(&[]));
}

#[test]
fn test_mismatched_sizes_names_both() {
    let cx = Context::bare();
    let err = op::<Add>(&cx, &nums(&[1.0, 2.0]), &nums(&[1.0, 2.0, 3.0])).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("mismatched list sizes (2,3)"), "got: {}", msg);
    assert_eq!(err.diagnostic_code(), "E0101");
}

#[test]
fn test_comparison_broadcasts() {
    let cx = Context::bare();
    let r = op::<Less>(&cx, &nums(&[1.0, 5.0]), &num(3.0)).unwrap();
    assert_eq!(r, bools(&[true, false]));
}

#[test]
fn test_equality_is_element_wise_on_lists() {
    let cx = Context::bare();
    let r = op::<Equal>(&cx, &nums(&[1.0, 2.0]), &nums(&[1.0, 3.0])).unwrap();
    assert_eq!(r, bools(&[true, false]));
}

#[test]
fn test_equality_across_kinds_is_false() {
    let cx = Context::bare();
    let r = op::<Equal>(&cx, &num(1.0), &Value::Bool(true)).unwrap();
    assert_eq!(r, Value::Bool(false));
}

#[test]
fn test_boolean_ops_broadcast() {
    let cx = Context::bare();
    let r = op::<And>(&cx, &bools(&[true, false]), &Value::Bool(true)).unwrap();
    assert_eq!(r, bools(&[true, false]));
    let r = op::<Xor>(&cx, &Value::Bool(true), &Value::Bool(false)).unwrap();
    assert_eq!(r, Value::Bool(true));
}

// ---------------------------------------------------------------------------
// 3. Domain errors
// ---------------------------------------------------------------------------

#[test]
fn test_domain_error_at_operator_phrase() {
    let phrase = Phrase::binary("+", Span::new(6, 7));
    let cx = Context::at_phrase(&phrase);
    let err = op::<Add>(&cx, &Value::Bool(true), &num(1.0)).unwrap_err();
    assert_eq!(err.to_string(), "[runtime error] #true + 1: domain error");
    assert_eq!(err.span(), Some(Span::new(6, 7)));
    assert_eq!(err.diagnostic_code(), "E0100");
}

#[test]
fn test_domain_error_at_argument_names_position() {
    let cx = Context::at_arg("max", None);
    let err = op::<Max>(&cx, &num(1.0), &Value::Bool(true)).unwrap_err();
    assert_eq!(
        err.to_string(),
        "[runtime error] #true: domain error (at argument 1)"
    );
    assert_eq!(err.position(), Some(1));
}

#[test]
fn test_domain_error_bare_names_culprit() {
    let cx = Context::bare();
    let err = op::<Add>(&cx, &Value::Bool(false), &num(1.0)).unwrap_err();
    assert_eq!(err.to_string(), "[runtime error] #false: domain error");
    assert_eq!(err.position(), None);
}

#[test]
fn test_domain_error_inside_list_reports_element() {
    let cx = Context::bare();
    let x = Value::list(vec![num(1.0), Value::Bool(true)]);
    let err = op::<Add>(&cx, &x, &num(1.0)).unwrap_err();
    assert!(err.to_string().contains("#true: domain error"), "got: {}", err);
}

// ---------------------------------------------------------------------------
// 4. Nesting limit
// ---------------------------------------------------------------------------

fn nested(depth: usize, leaf: f64) -> Value {
    (0..depth).fold(num(leaf), |v, _| Value::list(vec![v]))
}

#[test]
fn test_nesting_limit() {
    let cx = Context::bare().with_limits(Limits { max_depth: 3 });
    let err = op::<Add>(&cx, &nested(5, 1.0), &num(1.0)).unwrap_err();
    assert_eq!(err.diagnostic_code(), "E0104");
    assert!(err.to_string().contains("limit of 3"), "got: {}", err);
}

#[test]
fn test_nesting_exactly_at_limit() {
    let cx = Context::bare().with_limits(Limits { max_depth: 3 });
    let r = op::<Add>(&cx, &nested(3, 1.0), &num(1.0)).unwrap();
    assert_eq!(r, nested(3, 2.0));
    let err = op::<Add>(&cx, &nested(4, 1.0), &num(1.0)).unwrap_err();
    assert_eq!(err.diagnostic_code(), "E0104");
}

#[test]
fn test_nesting_limit_counts_lists_only() {
    let cx = Context::bare().with_limits(Limits { max_depth: 1 });
    assert_eq!(op::<Add>(&cx, &num(1.0), &num(2.0)).unwrap(), num(3.0));
    assert_eq!(op::<Add>(&cx, &nums(&[1.0]), &num(2.0)).unwrap(), nums(&[3.0]));
    assert_eq!(op::<Add>(&cx, &nums(&[1.0]), &nums(&[2.0])).unwrap(), nums(&[3.0]));
    assert!(op::<Add>(&cx, &nested(2, 1.0), &num(2.0)).is_err());
}

#[test]
fn test_nesting_within_default_limit() {
    let cx = Context::bare();
    let r = op::<Add>(&cx, &nested(50, 1.0), &num(1.0)).unwrap();
    assert_eq!(r, nested(50, 2.0));
}

// ---------------------------------------------------------------------------
// 5. Shift and packed booleans
// ---------------------------------------------------------------------------

#[test]
fn test_left_shift_moves_elements_up() {
    let cx = Context::bare();
    let r = op::<LShift>(&cx, &bools(&[true, false, false, false]), &num(1.0)).unwrap();
    assert_eq!(r, bools(&[false, true, false, false]));
}

#[test]
fn test_right_shift_moves_elements_down() {
    let cx = Context::bare();
    let r = op::<RShift>(&cx, &bools(&[false, true, true, false]), &num(1.0)).unwrap();
    assert_eq!(r, bools(&[true, true, false, false]));
}

#[test]
fn test_shift_by_zero_is_identity() {
    let cx = Context::bare();
    let x = bools(&[true, false, true]);
    assert_eq!(op::<LShift>(&cx, &x, &num(0.0)).unwrap(), x);
}

#[test]
fn test_shift_count_out_of_range() {
    let cx = Context::bare();
    let x = bools(&[true, false]);
    for count in [2.0, -1.0, 0.5] {
        let err = op::<LShift>(&cx, &x, &num(count)).unwrap_err();
        assert_eq!(err.diagnostic_code(), "E0103", "count {}: {}", count, err);
    }
}

#[test]
fn test_shift_requires_all_booleans() {
    let cx = Context::bare();
    let x = Value::list(vec![Value::Bool(true), num(1.0)]);
    let err = op::<LShift>(&cx, &x, &num(1.0)).unwrap_err();
    assert_eq!(err.diagnostic_code(), "E0100");
}

#[test]
fn test_bool32_and() {
    let cx = Context::bare();
    let a = Value::from_bool32(0b1100);
    let b = Value::from_bool32(0b1010);
    let r = op::<BitAnd>(&cx, &a, &b).unwrap();
    assert_eq!(r.to_bool32(), Some(0b1000));
}

#[test]
fn test_bool32_broadcasts_over_list_of_words() {
    let cx = Context::bare();
    let a = Value::from_bool32(0xff);
    let list = Value::list(vec![Value::from_bool32(0x0f), Value::from_bool32(0xf0f0)]);
    let r = op::<BitAnd>(&cx, &a, &list).unwrap();
    let words: Vec<_> = r.as_list().unwrap().iter().map(|w| w.to_bool32()).collect();
    assert_eq!(words, vec![Some(0x0f), Some(0xf0)]);
}
