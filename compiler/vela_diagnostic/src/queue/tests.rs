use super::*;
use crate::ErrorCode;

fn error(message: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E9001).with_message(message)
}

#[test]
fn test_error_limit() {
    let mut queue = DiagnosticQueue::with_config(DiagnosticConfig {
        error_limit: 2,
        deduplicate: false,
    });

    assert!(queue.emit(error("a")));
    assert!(queue.emit(error("b")));
    assert!(queue.limit_reached());
    assert!(!queue.emit(error("c")));
    assert_eq!(queue.error_count(), 2);
}

#[test]
fn test_warnings_ignore_limit() {
    let mut queue = DiagnosticQueue::with_config(DiagnosticConfig {
        error_limit: 1,
        deduplicate: false,
    });
    assert!(queue.emit(error("a")));
    assert!(queue.emit(Diagnostic::warning(ErrorCode::E6102).with_message("w")));
    assert_eq!(queue.diagnostics().len(), 2);
}

#[test]
fn test_deduplicate() {
    let mut queue = DiagnosticQueue::new();
    assert!(queue.emit(error("same")));
    assert!(!queue.emit(error("same")));
    assert!(queue.emit(error("different")));
    assert_eq!(queue.error_count(), 2);
}

#[test]
fn test_unlimited_keeps_duplicates() {
    let mut queue = DiagnosticQueue::with_config(DiagnosticConfig::unlimited());
    for _ in 0..20 {
        assert!(queue.emit(error("same")));
    }
    assert_eq!(queue.diagnostics().len(), 20);
}

#[test]
fn test_flush() {
    let mut queue = DiagnosticQueue::new();
    queue.emit(error("a"));
    let flushed = queue.flush();
    assert_eq!(flushed.len(), 1);
    assert!(!queue.has_errors());
    assert!(queue.diagnostics().is_empty());
}

#[test]
fn test_vec_sink() {
    let mut sink: Vec<Diagnostic> = Vec::new();
    assert!(sink.emit(error("a")));
    assert_eq!(sink.len(), 1);
}
