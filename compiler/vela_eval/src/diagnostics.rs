//! Diagnostic infrastructure for the evaluator.
//!
//! This module provides:
//! - `CallStack`: live call frames with the mode's depth limit
//! - `CallFrame`: per-call metadata (name, call site)
//! - `to_diagnostic`: conversion of `EvalError` into a coded `Diagnostic`
//!
//! `CallStack` captures backtraces at error sites; the backtrace is stored on
//! `EvalError` as `EvalBacktrace` and becomes diagnostic notes.

use vela_diagnostic::{Diagnostic, ErrorCode};
use vela_ir::{Name, Span};
use vela_value::errors::recursion_limit_exceeded;
use vela_value::{BacktraceFrame, EvalBacktrace, EvalError, EvalErrorKind};

/// A single frame in the live call stack.
#[derive(Clone, Debug)]
pub struct CallFrame {
    /// Name of the called function.
    pub name: Name,
    /// Source location of the call site (not the definition).
    pub call_span: Option<Span>,
}

/// Live call stack for the interpreter.
///
/// Each closure or builtin call pushes a frame; return pops it. The depth
/// check is integrated into `push()`.
#[derive(Clone, Debug)]
pub struct CallStack {
    frames: Vec<CallFrame>,
    max_depth: Option<usize>,
}

impl CallStack {
    /// Create an empty call stack. `None` means unlimited depth.
    pub fn new(max_depth: Option<usize>) -> Self {
        Self {
            frames: Vec::new(),
            max_depth,
        }
    }

    /// Push a call frame, checking the depth limit.
    ///
    /// The frame is NOT pushed on overflow.
    pub fn push(&mut self, frame: CallFrame) -> Result<(), EvalError> {
        if let Some(max) = self.max_depth {
            if self.frames.len() >= max {
                return Err(recursion_limit_exceeded(max));
            }
        }
        self.frames.push(frame);
        Ok(())
    }

    /// Pop the most recent call frame.
    ///
    /// # Panics
    ///
    /// Panics in debug mode if the stack is empty.
    pub fn pop(&mut self) {
        debug_assert!(
            !self.frames.is_empty(),
            "CallStack::pop() called on empty stack"
        );
        self.frames.pop();
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    /// Snapshot of the current frames, most recent call first.
    pub fn capture(&self) -> EvalBacktrace {
        if self.frames.is_empty() {
            return EvalBacktrace::default();
        }
        let frames = self
            .frames
            .iter()
            .rev()
            .map(|f| BacktraceFrame {
                name: f.name.as_str().to_string(),
                span: f.call_span,
            })
            .collect();
        EvalBacktrace::new(frames)
    }

    /// Attach a backtrace of this stack to `err` (no-op when empty or when
    /// the error already carries one).
    pub fn attach_backtrace(&self, err: EvalError) -> EvalError {
        if self.frames.is_empty() {
            return err;
        }
        err.with_backtrace(self.capture())
    }
}

impl Default for CallStack {
    /// Creates an unlimited call stack.
    fn default() -> Self {
        Self::new(None)
    }
}

/// Stable error code for an error kind.
pub fn error_code(kind: &EvalErrorKind) -> ErrorCode {
    match kind {
        EvalErrorKind::AmbiguousPartialMatch { .. } => ErrorCode::E6001,
        EvalErrorKind::MissingRequiredArgument { .. } => ErrorCode::E6002,
        EvalErrorKind::UnmatchedNamedArgument { .. } => ErrorCode::E6003,
        EvalErrorKind::ArityTooFew { .. } => ErrorCode::E6004,
        EvalErrorKind::ArityTooMany { .. } => ErrorCode::E6005,
        EvalErrorKind::ArgumentNotOneOf { .. } => ErrorCode::E6006,
        EvalErrorKind::UnsupportedOperandType { .. } => ErrorCode::E6101,
        EvalErrorKind::NotAScalar { .. } => ErrorCode::E6102,
        EvalErrorKind::UnexpectedMissingValue => ErrorCode::E6103,
        EvalErrorKind::TypeMismatch { .. } => ErrorCode::E6104,
        EvalErrorKind::UndefinedVariable { .. } => ErrorCode::E6201,
        EvalErrorKind::NotCallable { .. } => ErrorCode::E6202,
        EvalErrorKind::StackOverflow { .. } => ErrorCode::E6203,
        EvalErrorKind::Custom { .. } => ErrorCode::E9001,
    }
}

/// Convert an evaluation error into a diagnostic record.
///
/// Error notes come first, then one note per backtrace frame.
pub fn to_diagnostic(err: &EvalError) -> Diagnostic {
    let mut diagnostic = Diagnostic::error(error_code(&err.kind)).with_message(err.message.clone());
    if let Some(span) = err.span {
        diagnostic = diagnostic.with_span(span);
    }
    for note in &err.notes {
        diagnostic = match note.span {
            Some(span) => diagnostic.with_note(format!("{} at {span}", note.message)),
            None => diagnostic.with_note(note.message.clone()),
        };
    }
    if let Some(backtrace) = &err.backtrace {
        for frame in backtrace.frames() {
            diagnostic = match frame.span {
                Some(span) => diagnostic.with_note(format!("in call to {} at {span}", frame.name)),
                None => diagnostic.with_note(format!("in call to {}", frame.name)),
            };
        }
    }
    diagnostic
}
