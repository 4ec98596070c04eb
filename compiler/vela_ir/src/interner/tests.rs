use super::*;

#[test]
fn test_intern_and_lookup() {
    let interner = StringInterner::new();

    let hello = interner.intern("hello");
    let world = interner.intern("world");
    let hello2 = interner.intern("hello");

    assert_eq!(hello, hello2);
    assert_ne!(hello, world);

    assert_eq!(interner.lookup(hello), "hello");
    assert_eq!(interner.lookup(world), "world");
}

#[test]
fn test_reserved_names_pre_interned() {
    let interner = StringInterner::new();
    assert_eq!(interner.len(), 2);
    assert_eq!(interner.intern(""), Name::EMPTY);
    assert_eq!(interner.intern("..."), Name::DOTS);
    assert_eq!(interner.len(), 2);
}

#[test]
fn test_lookup_unknown_handle() {
    let interner = StringInterner::new();
    assert_eq!(interner.lookup(Name::INVALID), "");
    assert_eq!(interner.lookup(Name::from_raw(4096)), "");
}

#[test]
fn test_global_is_shared() {
    let a = StringInterner::global().intern("shared_symbol");
    let b = Name::intern("shared_symbol");
    assert_eq!(a, b);
}

#[test]
fn test_len_grows_once_per_string() {
    let interner = StringInterner::new();
    interner.intern("a");
    interner.intern("a");
    interner.intern("b");
    assert_eq!(interner.len(), 4);
    assert!(!interner.is_empty());
}
