use super::*;
use pretty_assertions::assert_eq;
use vela_ir::{BinaryOp, CallArg, Param};

fn n(s: &str) -> Name {
    Name::intern(s)
}

#[test]
fn two_level_nesting_reads_through_two_frames() {
    // outer <- function() { a <- 1; b <- 2; middle <- function() { inner <- function() b; inner() }; middle() }
    let mut arena = ExprArena::new();
    let b_read = arena.ident("b");
    let inner_fn = arena.function(vec![], b_read);
    let inner_assign = arena.assign("inner", inner_fn);
    let inner_call = arena.call_named("inner", vec![]);
    let middle_body = arena.block(vec![inner_assign, inner_call]);
    let middle_fn = arena.function(vec![], middle_body);

    let one = arena.double(1.0);
    let a_assign = arena.assign("a", one);
    let two = arena.double(2.0);
    let b_assign = arena.assign("b", two);
    let middle_assign = arena.assign("middle", middle_fn);
    let middle_call = arena.call_named("middle", vec![]);
    let outer_body = arena.block(vec![a_assign, b_assign, middle_assign, middle_call]);
    let outer_fn = arena.function(vec![], outer_body);
    let top = arena.assign("outer", outer_fn);

    let program = ScopeResolver::resolve(&arena, top);
    assert_eq!(program.function_count(), 3);

    let inner = program.descriptor(inner_fn).unwrap();
    assert_eq!(inner.name(), n("inner"));
    assert_eq!(inner.frame_size(), 0);
    assert_eq!(
        inner.enclosing_slots(),
        &[EnclosingSlot {
            symbol: n("b"),
            hops: 2,
            slot: 1,
        }]
    );
    assert_eq!(inner.read_set(), &[n("b")]);

    let middle = program.descriptor(middle_fn).unwrap();
    assert_eq!(middle.write_set(), &[n("inner")]);
    assert_eq!(
        middle.resolve_read(n("inner")),
        Some(Resolution::Local {
            slot: 0,
            outer: None
        })
    );

    let outer = program.descriptor(outer_fn).unwrap();
    assert_eq!(outer.write_set(), &[n("a"), n("b"), n("middle")]);
    assert_eq!(program.toplevel().write_set(), &[n("outer")]);
}

#[test]
fn write_set_skips_nested_functions_and_super_assign() {
    // function(p) { t <- p; q <- function() { z <- 1 }; t <<- 2 }
    let mut arena = ExprArena::new();
    let p_read = arena.ident("p");
    let t_assign = arena.assign("t", p_read);
    let one = arena.double(1.0);
    let z_assign = arena.assign("z", one);
    let q_fn = arena.function(vec![], z_assign);
    let q_assign = arena.assign("q", q_fn);
    let two = arena.double(2.0);
    let t_super = arena.super_assign("t", two);
    let body = arena.block(vec![t_assign, q_assign, t_super]);
    let f = arena.function(vec![Param::required(n("p"))], body);

    let program = ScopeResolver::resolve(&arena, f);
    let d = program.descriptor(f).unwrap();
    assert_eq!(d.name(), n(ANONYMOUS_NAME));
    assert_eq!(d.write_set(), &[n("p"), n("t"), n("q")]);
    assert_eq!(program.descriptor(q_fn).unwrap().write_set(), &[n("z")]);
    // `<<-` starts at the parent scope, which does not define `t`.
    assert_eq!(d.resolve_super_assign(n("t")), Some(Resolution::Global));
}

#[test]
fn super_assign_targets_enclosing_slot() {
    // make_counter <- function() { count <- 0; function() count <<- count + 1 }
    let mut arena = ExprArena::new();
    let count_read = arena.ident("count");
    let one = arena.double(1.0);
    let sum = arena.binary(BinaryOp::Add, count_read, one);
    let bump = arena.super_assign("count", sum);
    let counter_fn = arena.function(vec![], bump);
    let zero = arena.double(0.0);
    let init = arena.assign("count", zero);
    let body = arena.block(vec![init, counter_fn]);
    let make_counter = arena.function(vec![], body);
    let top = arena.assign("make_counter", make_counter);

    let program = ScopeResolver::resolve(&arena, top);
    let counter = program.descriptor(counter_fn).unwrap();
    let address = EnclosingSlot {
        symbol: n("count"),
        hops: 1,
        slot: 0,
    };
    assert_eq!(
        counter.resolve_super_assign(n("count")),
        Some(Resolution::Enclosing(address))
    );
    assert_eq!(
        counter.resolve_read(n("count")),
        Some(Resolution::Enclosing(address))
    );
    assert_eq!(counter.frame_size(), 0);
}

#[test]
fn local_read_records_outer_fallback() {
    // x <- 1; f <- function() { x <- x + 1; x }
    let mut arena = ExprArena::new();
    let one = arena.double(1.0);
    let x_top = arena.assign("x", one);
    let x_read = arena.ident("x");
    let one_again = arena.double(1.0);
    let sum = arena.binary(BinaryOp::Add, x_read, one_again);
    let x_local = arena.assign("x", sum);
    let x_result = arena.ident("x");
    let body = arena.block(vec![x_local, x_result]);
    let f = arena.function(vec![], body);
    let f_assign = arena.assign("f", f);
    let top = arena.block(vec![x_top, f_assign]);

    let program = ScopeResolver::resolve(&arena, top);
    assert_eq!(program.toplevel().write_set(), &[n("x"), n("f")]);
    let d = program.descriptor(f).unwrap();
    assert_eq!(
        d.resolve_read(n("x")),
        Some(Resolution::Local {
            slot: 0,
            outer: Some(EnclosingSlot {
                symbol: n("x"),
                hops: 1,
                slot: 0,
            }),
        })
    );
    assert!(d.read_set().is_empty());
}

#[test]
fn unknown_symbols_are_global() {
    // function(v) length(v)
    let mut arena = ExprArena::new();
    let v = arena.ident("v");
    let call = arena.call_named("length", vec![CallArg::positional(v)]);
    let f = arena.function(vec![Param::required(n("v"))], call);

    let program = ScopeResolver::resolve(&arena, f);
    let d = program.descriptor(f).unwrap();
    assert_eq!(d.resolve_read(n("length")), Some(Resolution::Global));
    assert_eq!(d.read_set(), &[n("length")]);
    assert!(d.enclosing_slots().is_empty());
}

#[test]
fn defaults_are_resolved_in_the_function_scope() {
    // function(a, b = a) b
    let mut arena = ExprArena::new();
    let a_read = arena.ident("a");
    let b_read = arena.ident("b");
    let f = arena.function(
        vec![Param::required(n("a")), Param::with_default(n("b"), a_read)],
        b_read,
    );

    let program = ScopeResolver::resolve(&arena, f);
    let d = program.descriptor(f).unwrap();
    assert_eq!(
        d.resolve_read(n("a")),
        Some(Resolution::Local {
            slot: 0,
            outer: None
        })
    );
    assert_eq!(d.default_for(1), Some(a_read));
    assert!(d.formals().is_required(0));
    assert!(!d.formals().is_required(1));
}
