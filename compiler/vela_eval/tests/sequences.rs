//! Lazy integer sequences: element formula, materialization, and the
//! operators that produce them.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
#![allow(
    clippy::disallowed_types,
    reason = "Proptest macros generate code with these patterns"
)]

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use vela_eval::{colon, evaluate_arithmetic, EvalMode, InterpreterBuilder, Value};
use vela_ir::{BinaryOp, CallArg, ExprArena, Name};
use vela_value::Scalar;

/// `(from, to, step)` with a step that leads from `from` towards `to`.
fn sequence_bounds() -> impl Strategy<Value = (i32, i32, i32)> {
    (-100i32..100, -100i32..100, 1i32..8).prop_map(|(from, to, magnitude)| {
        let step = if to >= from { magnitude } else { -magnitude };
        (from, to, step)
    })
}

fn expected_elements(from: i32, to: i32, step: i32) -> Vec<i32> {
    let count = (to - from) / step + 1;
    (0..count).map(|i| from + i * step).collect()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    })]

    #[test]
    fn prop_view_elements_follow_the_step((from, to, step) in sequence_bounds()) {
        let view = Value::sequence(from, to, step);
        let expected = expected_elements(from, to, step);
        prop_assert!(view.is_view());
        prop_assert_eq!(view.size(), expected.len());
        prop_assert_eq!(view.as_integer().unwrap().to_vec(), expected);
    }

    #[test]
    fn prop_materialize_is_idempotent((from, to, step) in sequence_bounds()) {
        let view = Value::sequence(from, to, step);
        let once = view.materialize();
        let twice = once.materialize();
        prop_assert!(!once.is_view());

        let (once, twice) = (once.as_integer().unwrap(), twice.as_integer().unwrap());
        prop_assert!(once.shares_storage_with(&twice));
        prop_assert_eq!(once.data_ptr(), twice.data_ptr());
        prop_assert_eq!(once.to_vec(), view.as_integer().unwrap().to_vec());
    }

    #[test]
    fn prop_integral_colon_counts_inclusive(from in -60i32..60, to in -60i32..60) {
        let result = colon(&Value::int(from), &Value::int(to)).unwrap();
        let expected: Vec<i32> = if to >= from {
            (from..=to).collect()
        } else {
            (to..=from).rev().collect()
        };
        prop_assert!(result.is_view());
        prop_assert_eq!(result.as_integer().unwrap().to_vec(), expected);
    }

    #[test]
    fn prop_arithmetic_on_views_matches_materialized(
        (from, to, step) in sequence_bounds(),
        scale in -5i32..5,
    ) {
        let view = Value::sequence(from, to, step);
        let concrete = view.materialize();
        let scale = Value::int(scale);
        let lazy = evaluate_arithmetic(BinaryOp::Mul, &view, &scale).unwrap();
        let eager = evaluate_arithmetic(BinaryOp::Mul, &concrete, &scale).unwrap();
        prop_assert_eq!(
            lazy.as_integer().unwrap().to_vec(),
            eager.as_integer().unwrap().to_vec()
        );
    }
}

#[test]
fn one_based_colon_is_a_simple_range() {
    let range = colon(&Value::int(1), &Value::dbl(4.0)).unwrap();
    assert!(range.is_view());
    assert_eq!(range.as_integer().unwrap().to_vec(), vec![1, 2, 3, 4]);
}

#[test]
fn fractional_start_materializes_doubles() {
    let result = colon(&Value::dbl(0.5), &Value::int(3)).unwrap();
    assert!(!result.is_view());
    assert_eq!(result.as_double().unwrap().to_vec(), vec![0.5, 1.5, 2.5]);
}

#[test]
fn traced_views_count_reads_and_materializations() {
    vela_eval::init_tracing();
    // s <- seq(1, 9, by = 2)
    let mut arena = ExprArena::new();
    let one = arena.int(1);
    let nine = arena.int(9);
    let two = arena.int(2);
    let seq = arena.call_named(
        "seq",
        vec![
            CallArg::positional(one),
            CallArg::positional(nine),
            CallArg::named(Name::intern("by"), two),
        ],
    );
    let set_s = arena.assign("s", seq);
    let top = arena.block(vec![set_s]);

    let mut interp = InterpreterBuilder::new(&arena, top)
        .mode(EvalMode::Traced { max_depth: None })
        .build();
    let s = interp.run().unwrap();
    let trace = s.view_trace().unwrap();
    assert_eq!(trace.reads(), 0);
    assert_eq!(trace.materializations(), 0);

    assert!(matches!(s.get(2), Scalar::Integer(5)));
    assert_eq!(s.view_trace().unwrap().reads(), 1);

    let materialized = s.materialize();
    assert_eq!(materialized.as_integer().unwrap().to_vec(), vec![1, 3, 5, 7, 9]);
    assert_eq!(s.view_trace().unwrap().materializations(), 1);
}
