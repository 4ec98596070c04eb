use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_message_matches_kind() {
    let err = missing_required_argument(Name::intern("f"), Name::intern("b"));
    assert_eq!(err.message, err.kind.to_string());
    assert_eq!(
        err.message,
        "argument \"b\" is missing, with no default (in call to f)"
    );
}

#[test]
fn test_arity_messages() {
    let f = Name::intern("f");
    assert_eq!(
        arity_too_many(f, 2, Some(2), 3).message,
        "f expects 2 arguments, got 3"
    );
    assert_eq!(
        arity_too_few(f, 1, Some(3), 0).message,
        "f expects 1 to 3 arguments, got 0"
    );
    assert_eq!(
        arity_too_few(f, 1, None, 0).message,
        "f expects at least 1 argument, got 0"
    );
}

#[test]
fn test_ambiguous_messages() {
    let alpha = Name::intern("alpha");
    let al = Name::intern("al");
    let alp = Name::intern("alp");
    assert_eq!(
        ambiguous_partial_match(alpha, &[al]).message,
        "argument \"al\" matches multiple formal arguments, including \"alpha\""
    );
    assert_eq!(
        ambiguous_partial_match(alpha, &[al, alp]).message,
        "formal argument \"alpha\" matched by multiple actual arguments: \"al\", \"alp\""
    );
}

#[test]
fn test_not_one_of_lists_allowed() {
    let err = argument_not_one_of("mode", &["logical", "integer"]);
    assert_eq!(err.message, "'mode' should be one of \"logical\", \"integer\"");
    assert_eq!(
        err.kind,
        EvalErrorKind::ArgumentNotOneOf {
            arg: "mode".to_string(),
            allowed: vec!["logical".to_string(), "integer".to_string()],
        }
    );
}

#[test]
fn test_innermost_span_wins() {
    let err = unexpected_missing_value()
        .with_span(Span::new(4, 6))
        .with_span(Span::new(0, 10));
    assert_eq!(err.span, Some(Span::new(4, 6)));
}

#[test]
fn test_backtrace_display() {
    let bt = EvalBacktrace::new(vec![
        BacktraceFrame {
            name: "g".to_string(),
            span: Some(Span::new(10, 14)),
        },
        BacktraceFrame {
            name: "f".to_string(),
            span: None,
        },
    ]);
    assert_eq!(bt.to_string(), "stack backtrace:\n  0: g at 10..14\n  1: f\n");
}
