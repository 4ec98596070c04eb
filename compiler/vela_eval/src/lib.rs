//! Vela Eval - argument matching, scope resolution and the evaluator.
//!
//! # Architecture
//!
//! - `ArgumentMatcher`: three-pass formal/actual binding plus arity checks
//! - `ScopeResolver`: per-function slot layout and lexical addresses,
//!   computed once before evaluation
//! - `evaluate_binary`: arithmetic, `:` and `%in%` over vector values
//! - `BuiltinRegistry`: builtins registered by signature, bound through the
//!   same matcher as closures
//! - `Interpreter`: single-tier tree walker over an `ExprArena`
//!
//! Values, frames and errors come from `vela_value`; errors leaving the
//! interpreter are also reported as `vela_diagnostic::Diagnostic`s.

pub mod args;
mod builtins;
pub mod diagnostics;
mod eval_mode;
pub mod interpreter;
mod matcher;
mod operators;
mod resolver;
mod stack;

use std::sync::Once;

pub use builtins::{Builtin, BuiltinArgs, BuiltinFn, BuiltinRegistry};
pub use diagnostics::{to_diagnostic, CallFrame, CallStack};
pub use eval_mode::EvalMode;
pub use interpreter::{Interpreter, InterpreterBuilder};
pub use matcher::ArgumentMatcher;
pub use operators::{colon, evaluate_arithmetic, evaluate_binary, member};
pub use resolver::{ResolvedProgram, ScopeResolver};
pub use stack::ensure_sufficient_stack;

pub use vela_value::{EvalError, EvalErrorKind, EvalResult, Value};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing subscriber for debug output.
///
/// Call this early in main() or test setup to enable tracing.
/// Set `RUST_LOG=vela_eval=debug` to see resolver layouts and calls, or
/// `RUST_LOG=vela_eval=trace` for argument bindings and view materialization.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
