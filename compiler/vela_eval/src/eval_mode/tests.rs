use super::*;

// === EvalMode policy tests ===

#[cfg(not(target_arch = "wasm32"))]
#[test]
fn interpret_native_unlimited_depth() {
    assert_eq!(EvalMode::Interpret.max_recursion_depth(), None);
}

#[test]
fn bounded_depth() {
    assert_eq!(
        EvalMode::Bounded { max_depth: 50 }.max_recursion_depth(),
        Some(50)
    );
}

#[test]
fn traced_depth_defaults_to_interpret() {
    let mode = EvalMode::Traced { max_depth: None };
    assert_eq!(
        mode.max_recursion_depth(),
        EvalMode::Interpret.max_recursion_depth()
    );
    assert_eq!(
        EvalMode::Traced { max_depth: Some(8) }.max_recursion_depth(),
        Some(8)
    );
}

#[test]
fn only_traced_traces_views() {
    assert!(EvalMode::Traced { max_depth: None }.traces_views());
    assert!(!EvalMode::Interpret.traces_views());
    assert!(!EvalMode::Bounded { max_depth: 1 }.traces_views());
}

#[test]
fn default_is_interpret() {
    assert_eq!(EvalMode::default(), EvalMode::Interpret);
}

// === Settings ===

#[test]
fn settings_absent() {
    assert_eq!(EvalMode::from_settings(None, None), EvalMode::Interpret);
}

#[test]
fn settings_depth_only() {
    assert_eq!(
        EvalMode::from_settings(Some("120"), None),
        EvalMode::Bounded { max_depth: 120 }
    );
}

#[test]
fn settings_trace_with_depth() {
    assert_eq!(
        EvalMode::from_settings(Some(" 64 "), Some("TRUE")),
        EvalMode::Traced {
            max_depth: Some(64)
        }
    );
}

#[test]
fn settings_invalid_depth_ignored() {
    assert_eq!(EvalMode::from_settings(Some("deep"), None), EvalMode::Interpret);
    assert_eq!(EvalMode::from_settings(Some("0"), None), EvalMode::Interpret);
}

#[test]
fn settings_trace_off_values() {
    assert_eq!(EvalMode::from_settings(None, Some("0")), EvalMode::Interpret);
    assert_eq!(
        EvalMode::from_settings(None, Some("1")),
        EvalMode::Traced { max_depth: None }
    );
}

#[test]
fn eval_mode_is_hashable() {
    use std::collections::HashSet;
    let mut set = HashSet::new();
    set.insert(EvalMode::Interpret);
    set.insert(EvalMode::Bounded { max_depth: 10 });
    set.insert(EvalMode::Traced { max_depth: None });
    assert_eq!(set.len(), 3);
}
