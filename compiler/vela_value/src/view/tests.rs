use super::*;

#[test]
fn test_sequence_size() {
    assert_eq!(View::sequence(1, 10, 1).len(), 10);
    assert_eq!(View::sequence(1, 10, 3).len(), 4);
    assert_eq!(View::sequence(10, 1, -1).len(), 10);
    assert_eq!(View::sequence(10, 1, -4).len(), 3);
    assert_eq!(View::sequence(5, 5, 2).len(), 1);
}

#[test]
fn test_decreasing_sequence_elements() {
    let view = View::sequence(10, 1, -4);
    let elements: Vec<i32> = view.fill();
    assert_eq!(elements, vec![10, 6, 2]);
}

#[test]
fn test_sequence_at_integer_bounds() {
    let view = View::sequence(i32::MAX - 2, i32::MAX, 1);
    let elements: Vec<i32> = view.fill();
    assert_eq!(elements, vec![i32::MAX - 2, i32::MAX - 1, i32::MAX]);
}

#[test]
#[should_panic(expected = "non-zero")]
fn test_zero_step_panics() {
    let _ = View::sequence(1, 5, 0);
}

#[test]
#[should_panic(expected = "does not lead")]
fn test_wrong_direction_panics() {
    let _ = View::sequence(1, 5, -1);
}

#[test]
fn test_simple_range() {
    let view = View::simple_range(4);
    assert_eq!(view.len(), 4);
    assert!(matches!(view.scalar_at(3), Scalar::Integer(4)));
    let elements: Vec<f64> = view.fill();
    assert_eq!(elements, vec![1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn test_traced_counts() {
    let view = View::traced(Heap::new(View::simple_range(3)));
    let _ = view.scalar_at(0);
    let _ = view.scalar_at(2);
    let _: Vec<i32> = view.fill();
    let trace = view.trace().map(|t| (t.reads(), t.materializations()));
    assert_eq!(trace, Some((2, 1)));
}

#[test]
fn test_coerce_view_reads_in_target_kind() {
    let source = Value::integer(vec![1, 0]);
    let view = View::Coerce {
        source,
        target: Kind::Logical,
    };
    assert!(matches!(view.scalar_at(0), Scalar::Logical(crate::Logical::True)));
    assert!(matches!(view.scalar_at(1), Scalar::Logical(crate::Logical::False)));
}

// === Property tests ===

#[allow(
    clippy::disallowed_types,
    reason = "proptest macros internally use Arc"
)]
mod proptest_sequence {
    use crate::{Value, Vector};
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_sequence_matches_formula(
            from in -1000i32..1000,
            len in 0i32..200,
            step in 1i32..7,
            descending in any::<bool>(),
        ) {
            let (to, step) = if descending {
                (from - len, -step)
            } else {
                (from + len, step)
            };
            let value = Value::sequence(from, to, step);
            let Value::Integer(lazy) = &value else {
                panic!("sequence must be an integer vector");
            };
            let concrete: Vector<i32> = lazy.materialize();
            prop_assert_eq!(concrete.len(), lazy.len());
            for i in 0..lazy.len() {
                let expected = from + i as i32 * step;
                prop_assert_eq!(lazy.get(i), expected);
                prop_assert_eq!(concrete.get(i), expected);
            }
            let last = from + (lazy.len() as i32 - 1) * step;
            let ends_at_bound = if step > 0 {
                last <= to && last + step > to
            } else {
                last >= to && last + step < to
            };
            prop_assert!(ends_at_bound);
        }
    }
}
