use super::*;
use crate::element::{is_na_double, NA_INTEGER};
use pretty_assertions::assert_eq;

fn ints(value: &Value) -> Vec<i32> {
    value.as_integer().map(|v| v.to_vec()).unwrap_or_default()
}

#[test]
fn test_sizes() {
    assert_eq!(Value::Null.size(), 0);
    assert_eq!(Value::integer(vec![1, 2]).size(), 2);
    assert_eq!(Value::sequence(10, 1, -3).size(), 4);
    assert_eq!(Value::simple_range(7).size(), 7);
}

#[test]
fn test_coercion_is_lazy_and_non_mutating() {
    let source = Value::integer(vec![1, 2, NA_INTEGER]);
    let doubles = source.as_double().unwrap();
    assert!(doubles.is_view());
    assert_eq!(doubles.get(1), 2.0);
    assert!(is_na_double(doubles.get(2)));
    assert_eq!(source.kind(), Kind::Integer);
    assert_eq!(ints(&source), vec![1, 2, NA_INTEGER]);
}

#[test]
fn test_same_kind_coercion_shares() {
    let source = Value::integer(vec![1, 2]);
    let Value::Integer(original) = &source else {
        unreachable!()
    };
    let same = source.as_integer().unwrap();
    assert!(same.shares_storage_with(original));
}

#[test]
fn test_null_coerces_to_empty() {
    assert_eq!(Value::Null.as_string().unwrap().len(), 0);
    assert!(Value::Null.coerce_to(Kind::Double).unwrap().size() == 0);
}

#[test]
fn test_closure_not_coercible() {
    let builtin = Value::Builtin(BuiltinFunction {
        name: Name::intern("length"),
        index: 0,
    });
    let err = builtin.as_double().unwrap_err();
    assert!(matches!(
        err.kind,
        crate::EvalErrorKind::UnsupportedOperandType { .. }
    ));
    assert_eq!(builtin.size(), 1);
    assert_eq!(builtin.kind(), Kind::Closure);
}

#[test]
fn test_as_list_wraps_elements() {
    let list = Value::integer(vec![4, 5]).as_list().unwrap();
    assert_eq!(list.len(), 2);
    let second = list.get(1);
    assert_eq!(second.kind(), Kind::Integer);
    assert_eq!(ints(&second), vec![5]);
}

#[test]
fn test_view_equals_materialized() {
    let lazy = Value::sequence(20, 2, -6);
    let concrete = lazy.materialize();
    assert!(lazy.is_view());
    assert!(!concrete.is_view());
    assert_eq!(ints(&lazy), ints(&concrete));
    assert_eq!(ints(&concrete), vec![20, 14, 8, 2]);
}

#[test]
fn test_set_promotes() {
    let mut v = Value::integer(vec![1, 2, 3]);
    v.set(0, Scalar::Double(1.5)).unwrap();
    assert_eq!(v.kind(), Kind::Double);
    assert_eq!(v.as_double().unwrap().to_vec(), vec![1.5, 2.0, 3.0]);

    v.set(1, Scalar::Str(RStr::new("x"))).unwrap();
    assert_eq!(v.kind(), Kind::String);
    let strings: Vec<Option<&str>> = v.as_string().unwrap().iter().map(RStr::as_str).collect();
    assert_eq!(strings, vec![Some("1.5"), Some("x"), Some("3")]);
}

#[test]
fn test_set_lower_kind_keeps_kind() {
    let mut v = Value::double(vec![1.0, 2.0]);
    v.set(1, Scalar::Logical(Logical::True)).unwrap();
    assert_eq!(v.kind(), Kind::Double);
    assert_eq!(v.as_double().unwrap().to_vec(), vec![1.0, 1.0]);
}

#[test]
fn test_set_on_view_materializes() {
    let mut v = Value::simple_range(3);
    v.set(0, Scalar::Integer(9)).unwrap();
    assert!(!v.is_view());
    assert_eq!(ints(&v), vec![9, 2, 3]);
}

#[test]
fn test_set_list_element() {
    let mut v = Value::integer(vec![1, 2]);
    v.set(1, Scalar::Value(Value::str("a"))).unwrap();
    assert_eq!(v.kind(), Kind::List);
    assert_eq!(v.size(), 2);
}

#[test]
fn test_strip_keep_names() {
    let v = Value::named_list(vec![
        (Some(Name::intern("a")), Value::int(1)),
        (None, Value::int(2)),
    ]);
    let names: Vec<Option<&str>> = v
        .names()
        .unwrap()
        .iter()
        .map(|n| n.as_str())
        .collect();
    assert_eq!(names, vec![Some("a"), Some("")]);
    assert!(v.strip().names().is_none());
    assert!(v.strip_keep_names().names().is_some());
}

#[test]
fn test_traced_value_counts() {
    let v = Value::simple_range(5).traced();
    let _ = v.get(0);
    let _ = v.materialize();
    let trace = v.view_trace().map(|t| (t.reads(), t.materializations()));
    assert_eq!(trace, Some((1, 1)));
    // Concrete values are not traced.
    assert!(Value::int(1).traced().view_trace().is_none());
}

#[test]
fn test_deparse() {
    assert_eq!(Value::Null.deparse(), "NULL");
    assert_eq!(Value::double(vec![1.0, 2.5]).deparse(), "c(1, 2.5)");
    assert_eq!(Value::str("a").deparse(), "\"a\"");
    assert_eq!(Value::integer(vec![]).deparse(), "integer(0)");
    assert_eq!(
        Value::list(vec![Value::int(1), Value::str("b")]).deparse(),
        "list(1, \"b\")"
    );
}

#[test]
fn test_zeroed() {
    assert_eq!(ints(&Value::zeroed(Kind::Integer, 3)), vec![0, 0, 0]);
    assert_eq!(Value::zeroed(Kind::List, 2).size(), 2);
    let s = Value::zeroed(Kind::String, 1).as_string().unwrap();
    assert_eq!(s.get(0).as_str(), Some(""));
}
