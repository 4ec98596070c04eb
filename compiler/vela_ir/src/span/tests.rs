use super::*;

#[test]
fn test_span_len() {
    let span = Span::new(4, 10);
    assert_eq!(span.len(), 6);
    assert!(!span.is_empty());
    assert!(Span::new(3, 3).is_empty());
}

#[test]
fn test_span_to() {
    let a = Span::new(5, 8);
    let b = Span::new(2, 6);
    assert_eq!(a.to(b), Span::new(2, 8));
    assert_eq!(b.to(a), Span::new(2, 8));
}

#[test]
fn test_dummy() {
    assert!(Span::DUMMY.is_dummy());
    assert!(!Span::new(0, 1).is_dummy());
    assert_eq!(Span::default(), Span::DUMMY);
}

#[test]
fn test_display() {
    assert_eq!(Span::new(1, 4).to_string(), "1..4");
}
