use super::*;
use crate::function::{Closure, DescriptorParts};
use crate::signature::ArgumentBinding;
use pretty_assertions::assert_eq;
use vela_ir::{ExprId, Span};

fn n(s: &str) -> Name {
    Name::intern(s)
}

fn descriptor(params: &[&str], locals: &[&str]) -> Heap<FunctionDescriptor> {
    let params: Vec<Name> = params.iter().map(|p| n(p)).collect();
    let mut write_set = params.clone();
    write_set.extend(locals.iter().map(|l| n(l)));
    FunctionDescriptor::new(DescriptorParts {
        name: n("f"),
        expr: ExprId::new(0),
        span: Span::DUMMY,
        params: params.into_iter().map(|p| (p, None)).collect(),
        body: ExprId::new(1),
        write_set,
        reads: vec![],
        super_assigns: vec![],
    })
    .into_shared()
}

#[test]
fn test_make_call_binds_slots() {
    let root = FrameRef::root(descriptor(&[], &["g"]));
    let d = descriptor(&["x", "y"], &["tmp"]);
    // f(y = 2, 1)
    let binding = ArgumentBinding::new(vec![Some(1), Some(0)], vec![], vec![]);
    let frame = FrameRef::make_call(
        &d,
        &binding,
        vec![Value::int(2), Value::int(1)],
        &[Some(n("y")), None],
        root.clone(),
    );

    assert_eq!(frame.size(), 3);
    assert_eq!(frame.get(0).map(|v| v.as_integer().unwrap().get(0)), Some(1));
    assert_eq!(frame.get(1).map(|v| v.as_integer().unwrap().get(0)), Some(2));
    assert!(!frame.is_bound(2));
    assert!(frame.parent().is_some_and(|p| FrameRef::ptr_eq(&p, &root)));
}

#[test]
fn test_dots_slot_is_named_list() {
    let root = FrameRef::root(descriptor(&[], &[]));
    let d = descriptor(&["x", "..."], &[]);
    // f(1, 2, k = 3)
    let binding = ArgumentBinding::new(vec![Some(0), None], vec![1, 2], vec![]);
    let frame = FrameRef::make_call(
        &d,
        &binding,
        vec![Value::int(1), Value::int(2), Value::int(3)],
        &[None, None, Some(n("k"))],
        root,
    );
    let dots = frame.get(1).unwrap();
    assert_eq!(dots.kind(), crate::Kind::List);
    assert_eq!(dots.size(), 2);
    let names: Vec<Option<&str>> = dots.names().unwrap().iter().map(|r| r.as_str()).collect();
    assert_eq!(names, vec![Some(""), Some("k")]);
}

#[test]
fn test_unnamed_dots_have_no_names() {
    let root = FrameRef::root(descriptor(&[], &[]));
    let d = descriptor(&["..."], &[]);
    let binding = ArgumentBinding::new(vec![None], vec![0], vec![]);
    let frame = FrameRef::make_call(&d, &binding, vec![Value::int(1)], &[None], root);
    assert!(frame.get(0).unwrap().names().is_none());
}

#[test]
fn test_ancestor() {
    let root = FrameRef::root(descriptor(&[], &["a"]));
    let mid = FrameRef::new(Frame::new(descriptor(&[], &["b"]), Some(root.clone())));
    let leaf = FrameRef::new(Frame::new(descriptor(&[], &[]), Some(mid.clone())));

    assert!(leaf.ancestor(0).is_some_and(|f| FrameRef::ptr_eq(&f, &leaf)));
    assert!(leaf.ancestor(2).is_some_and(|f| FrameRef::ptr_eq(&f, &root)));
    assert!(leaf.ancestor(3).is_none());
}

#[test]
fn test_set_and_clear() {
    let root = FrameRef::root(descriptor(&[], &["a"]));
    root.set(0, Value::str("v"));
    assert!(root.is_bound(0));
    root.clear();
    assert!(!root.is_bound(0));
    assert!(root.get(0).is_none());
}

#[test]
fn test_weak_handle() {
    let frame = FrameRef::root(descriptor(&[], &[]));
    let weak = frame.downgrade();
    assert!(weak.upgrade().is_some());
    drop(frame);
    assert!(weak.upgrade().is_none());
}

// === Cycle collection ===

fn closure_over(env: &FrameRef) -> Value {
    Value::closure(Closure::new(descriptor(&[], &[]), env.clone()))
}

#[test]
fn test_collect_cycles_clears_unreachable_self_reference() {
    // me <- function() 1, evaluated in the frame `me` captures.
    let root = FrameRef::root(descriptor(&[], &["me"]));
    root.set(0, closure_over(&root));
    let weak = root.downgrade();

    assert_eq!(collect_cycles(vec![root], []), 1);
    assert!(weak.upgrade().is_none());
}

#[test]
fn test_collect_cycles_counts_owned_values_as_internal() {
    let root = FrameRef::root(descriptor(&[], &[]));
    let global = closure_over(&root);
    let weak = root.downgrade();

    assert_eq!(collect_cycles(vec![root], [&global]), 1);
    drop(global);
    assert!(weak.upgrade().is_none());
}

#[test]
fn test_collect_cycles_keeps_externally_held_frames() {
    let root = FrameRef::root(descriptor(&[], &["g"]));
    let child = FrameRef::new(Frame::new(descriptor(&[], &["me"]), Some(root.clone())));
    child.set(0, closure_over(&child));
    root.set(0, closure_over(&child));
    let held = child.clone();

    assert_eq!(collect_cycles(vec![root, child], []), 0);
    assert!(held.is_bound(0));
    let parent = held.parent().unwrap();
    assert!(parent.is_bound(0));

    parent.clear();
    held.clear();
}

#[test]
fn test_collect_cycles_pins_frames_behind_shared_lists() {
    let root = FrameRef::root(descriptor(&[], &["fs"]));
    let list = Value::list(vec![closure_over(&root)]);
    root.set(0, list.clone());

    assert_eq!(collect_cycles(vec![root.clone()], []), 0);
    assert!(root.is_bound(0));
    root.clear();
}

#[test]
fn test_collect_cycles_ignores_duplicate_handles() {
    let root = FrameRef::root(descriptor(&[], &["me"]));
    root.set(0, closure_over(&root));
    let weak = root.downgrade();

    assert_eq!(collect_cycles(vec![root.clone(), root], []), 1);
    assert!(weak.upgrade().is_none());
}
