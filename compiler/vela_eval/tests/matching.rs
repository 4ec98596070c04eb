//! Argument matching observed through calls: exact, partial and positional
//! binding, varargs, and the errors each pass reports.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use pretty_assertions::assert_eq;
use vela_eval::{EvalErrorKind, EvalResult, InterpreterBuilder, Value};
use vela_ir::{BinaryOp, CallArg, ExprArena, ExprId, Name, Param};

fn n(s: &str) -> Name {
    Name::intern(s)
}

/// Actual spelled as `(name, number)`; an empty name is positional.
type Actual = (&'static str, f64);

fn actuals(arena: &mut ExprArena, args: &[Actual]) -> Vec<CallArg> {
    args.iter()
        .map(|&(name, d)| {
            let value = arena.double(d);
            if name.is_empty() {
                CallArg::positional(value)
            } else {
                CallArg::named(n(name), value)
            }
        })
        .collect()
}

/// Evaluate `{ f <- <def>; f(<args>) }`.
fn call_with(def: impl FnOnce(&mut ExprArena) -> ExprId, args: &[Actual]) -> EvalResult {
    vela_eval::init_tracing();
    let mut arena = ExprArena::new();
    let function = def(&mut arena);
    let set_f = arena.assign("f", function);
    let args = actuals(&mut arena, args);
    let call = arena.call_named("f", args);
    let top = arena.block(vec![set_f, call]);
    let mut interp = InterpreterBuilder::new(&arena, top).build();
    interp.run()
}

/// `function(alpha, beta) alpha - beta`
fn difference(arena: &mut ExprArena) -> ExprId {
    let alpha = arena.ident("alpha");
    let beta = arena.ident("beta");
    let body = arena.binary(BinaryOp::Sub, alpha, beta);
    arena.function(
        vec![Param::required(n("alpha")), Param::required(n("beta"))],
        body,
    )
}

/// `function(value, verbose) value`
fn shared_prefix(arena: &mut ExprArena) -> ExprId {
    let body = arena.ident("value");
    arena.function(
        vec![Param::required(n("value")), Param::required(n("verbose"))],
        body,
    )
}

/// `function(first, ...) ...`
fn leading_then_dots(arena: &mut ExprArena) -> ExprId {
    let body = arena.ident("...");
    arena.function(vec![Param::required(n("first")), Param::dots()], body)
}

/// `function(..., sep = 0) sep`
fn dots_then_sep(arena: &mut ExprArena) -> ExprId {
    let body = arena.ident("sep");
    let zero = arena.double(0.0);
    arena.function(vec![Param::dots(), Param::with_default(n("sep"), zero)], body)
}

fn number(result: EvalResult) -> f64 {
    let value = result.unwrap();
    assert_eq!(value.size(), 1);
    value.as_double().unwrap().get(0)
}

fn error_kind(result: EvalResult) -> EvalErrorKind {
    result.unwrap_err().kind
}

fn name_strings(value: &Value) -> Vec<String> {
    value
        .names()
        .unwrap()
        .iter()
        .map(|s| s.as_str().unwrap_or("NA").to_string())
        .collect()
}

#[test]
fn positional_actuals_fill_formals_in_order() {
    assert_eq!(number(call_with(difference, &[("", 10.0), ("", 4.0)])), 6.0);
}

#[test]
fn exact_names_bind_before_positions() {
    assert_eq!(number(call_with(difference, &[("beta", 4.0), ("", 10.0)])), 6.0);
}

#[test]
fn unique_prefixes_bind_partially() {
    assert_eq!(number(call_with(difference, &[("b", 4.0), ("a", 10.0)])), 6.0);
    assert_eq!(number(call_with(shared_prefix, &[("val", 3.0), ("verb", 1.0)])), 3.0);
}

#[test]
fn exact_match_takes_precedence_over_prefix() {
    // `value` binds exactly, leaving `v` to match only `verbose`.
    assert_eq!(
        number(call_with(shared_prefix, &[("v", 1.0), ("value", 3.0)])),
        3.0
    );
}

#[test]
fn prefix_of_two_formals_is_ambiguous() {
    assert_eq!(
        error_kind(call_with(shared_prefix, &[("v", 1.0), ("", 2.0)])),
        EvalErrorKind::AmbiguousPartialMatch {
            formal: "value".to_string(),
            actuals: vec!["v".to_string()],
        }
    );
}

#[test]
fn two_prefixes_of_one_formal_are_ambiguous() {
    assert_eq!(
        error_kind(call_with(difference, &[("al", 1.0), ("alp", 2.0)])),
        EvalErrorKind::AmbiguousPartialMatch {
            formal: "alpha".to_string(),
            actuals: vec!["al".to_string(), "alp".to_string()],
        }
    );
}

#[test]
fn unknown_name_is_unused() {
    assert_eq!(
        error_kind(call_with(difference, &[("gamma", 1.0), ("", 2.0)])),
        EvalErrorKind::UnmatchedNamedArgument {
            function: "f".to_string(),
            name: "gamma".to_string(),
        }
    );
}

#[test]
fn missing_and_surplus_actuals() {
    assert_eq!(
        error_kind(call_with(difference, &[("", 1.0)])),
        EvalErrorKind::MissingRequiredArgument {
            function: "f".to_string(),
            name: "beta".to_string(),
        }
    );
    assert_eq!(
        error_kind(call_with(difference, &[("", 1.0), ("", 2.0), ("", 3.0)])),
        EvalErrorKind::ArityTooMany {
            function: "f".to_string(),
            min: 2,
            max: Some(2),
            got: 3,
        }
    );
}

#[test]
fn dots_collect_remaining_actuals_with_names() {
    let value = call_with(leading_then_dots, &[("", 1.0), ("", 2.0), ("k", 3.0)]).unwrap();
    assert_eq!(value.size(), 2);
    assert_eq!(name_strings(&value), vec!["", "k"]);
    let items = value.as_list().unwrap();
    assert_eq!(items.get(0).as_double().unwrap().to_vec(), vec![2.0]);
    assert_eq!(items.get(1).as_double().unwrap().to_vec(), vec![3.0]);
}

#[test]
fn named_actual_for_leading_formal_skips_dots() {
    let value = call_with(leading_then_dots, &[("", 1.0), ("first", 2.0)]).unwrap();
    let items = value.as_list().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items.get(0).as_double().unwrap().to_vec(), vec![1.0]);
}

#[test]
fn formals_after_dots_bind_by_name_only() {
    assert_eq!(number(call_with(dots_then_sep, &[("", 1.0), ("", 2.0)])), 0.0);
    assert_eq!(
        number(call_with(dots_then_sep, &[("", 1.0), ("sep", 5.0)])),
        5.0
    );
    assert_eq!(number(call_with(dots_then_sep, &[("s", 7.0), ("", 1.0)])), 7.0);
}

#[test]
fn builtins_bind_through_the_same_matcher() {
    vela_eval::init_tracing();
    // vector(len = 2, "double")
    let mut arena = ExprArena::new();
    let two = arena.double(2.0);
    let mode = arena.string("double");
    let call = arena.call_named(
        "vector",
        vec![CallArg::named(n("len"), two), CallArg::positional(mode)],
    );
    let mut interp = InterpreterBuilder::new(&arena, call).build();
    let value = interp.run().unwrap();
    assert_eq!(value.as_double().unwrap().to_vec(), vec![0.0, 0.0]);

    // seq(t = 3, f = 1, b = 1): each prefix names exactly one formal.
    let mut arena = ExprArena::new();
    let args = actuals(&mut arena, &[("t", 3.0), ("f", 1.0), ("b", 1.0)]);
    let call = arena.call_named("seq", args);
    let mut interp = InterpreterBuilder::new(&arena, call).build();
    let value = interp.run().unwrap();
    assert_eq!(value.as_integer().unwrap().to_vec(), vec![1, 2, 3]);
}
