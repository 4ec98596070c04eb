use super::*;
use crate::element::Logical;
use pretty_assertions::assert_eq;

#[test]
fn test_materialize_concrete_is_free() {
    let v = Vector::from_vec(vec![1, 2, 3]);
    let m = v.materialize();
    assert!(m.shares_storage_with(&v));
    let again = m.materialize();
    assert!(again.shares_storage_with(&v));
}

#[test]
fn test_materialize_view() {
    let v: Vector<i32> = Vector::from_view(View::sequence(3, 9, 3));
    assert!(v.is_view());
    let m = v.materialize();
    assert!(!m.is_view());
    assert_eq!(m.to_vec(), vec![3, 6, 9]);
    assert!(m.materialize().shares_storage_with(&m));
}

#[test]
fn test_set_in_place_when_exclusive() {
    let mut v = Vector::from_vec(vec![1, 2, 3]);
    let before = v.data_ptr();
    v.set(1, 20);
    assert_eq!(v.data_ptr(), before);
    assert_eq!(v.to_vec(), vec![1, 20, 3]);
}

#[test]
fn test_set_copies_shared_storage() {
    let original = Vector::from_vec(vec![1, 2, 3]);
    let mut copy = original.clone();
    copy.set(0, 10);
    assert!(!copy.shares_storage_with(&original));
    assert_eq!(original.to_vec(), vec![1, 2, 3]);
    assert_eq!(copy.to_vec(), vec![10, 2, 3]);
}

#[test]
fn test_set_materializes_view() {
    let mut v: Vector<i32> = Vector::from_view(View::simple_range(3));
    v.set(2, 30);
    assert!(!v.is_view());
    assert_eq!(v.to_vec(), vec![1, 2, 30]);
}

#[test]
#[should_panic(expected = "out of range")]
fn test_get_out_of_range_panics() {
    let v = Vector::from_vec(vec![Logical::True]);
    let _ = v.get(1);
}

#[test]
fn test_coerce_view_keeps_source() {
    let source = Vector::from_vec(vec![1, 0, crate::NA_INTEGER]);
    let logical: Vector<Logical> = source.coerce();
    assert!(logical.is_view());
    assert_eq!(logical.to_vec(), vec![Logical::True, Logical::False, Logical::Na]);
    assert_eq!(source.to_vec(), vec![1, 0, crate::NA_INTEGER]);
}

#[test]
fn test_strip_shares_storage() {
    let names = vec![RStr::new("a"), RStr::new("b")];
    let v = Vector::from_vec(vec![1.5, 2.5])
        .with_names(names.clone())
        .with_attribute(Name::intern("class"), Value::str("thing"));

    let stripped = v.strip();
    assert!(stripped.shares_storage_with(&v));
    assert!(stripped.metadata().is_none());

    let kept = v.strip_keep_names();
    assert!(kept.shares_storage_with(&v));
    assert_eq!(kept.names(), Some(names.as_slice()));
    assert!(kept.attribute(Name::intern("class")).is_none());
}

#[test]
fn test_dims() {
    let v = Vector::from_vec(vec![0; 6]).with_dims(&[2, 3]);
    assert_eq!(v.dims(), Some(&[2, 3][..]));
}

#[test]
#[should_panic(expected = "do not match length")]
fn test_bad_dims_panic() {
    let _ = Vector::from_vec(vec![0; 5]).with_dims(&[2, 3]);
}

#[test]
#[should_panic(expected = "names length")]
fn test_bad_names_panic() {
    let _ = Vector::from_vec(vec![0; 2]).with_names(vec![RStr::new("a")]);
}

#[test]
fn test_metadata_survives_materialize() {
    let v: Vector<i32> =
        Vector::from_view(View::simple_range(2)).with_names(vec![RStr::new("x"), RStr::new("y")]);
    let m = v.materialize();
    assert_eq!(m.names().map(<[RStr]>::len), Some(2));
}
