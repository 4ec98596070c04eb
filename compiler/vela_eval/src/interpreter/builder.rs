//! `InterpreterBuilder` for creating Interpreter instances with various configurations.

use rustc_hash::FxHashMap;

use vela_diagnostic::{DiagnosticConfig, DiagnosticQueue, DiagnosticSink};
use vela_ir::{ExprArena, ExprId, Name};
use vela_value::{FrameRef, Value};

use super::{Interpreter, FRAME_PRUNE_THRESHOLD};
use crate::builtins::BuiltinRegistry;
use crate::diagnostics::CallStack;
use crate::eval_mode::EvalMode;
use crate::resolver::ScopeResolver;

/// Builder for creating Interpreter instances with various configurations.
///
/// The default is `EvalMode::Interpret` with the standard builtins, the
/// binding cache on, and diagnostics collected in an internal queue.
pub struct InterpreterBuilder<'a> {
    arena: &'a ExprArena,
    toplevel: ExprId,
    mode: EvalMode,
    builtins: Option<BuiltinRegistry>,
    globals: Vec<(Name, Value)>,
    sink: Option<&'a mut dyn DiagnosticSink>,
    diagnostic_config: DiagnosticConfig,
    binding_cache: bool,
}

impl<'a> InterpreterBuilder<'a> {
    /// Create a builder for the program whose top-level expression is `toplevel`.
    pub fn new(arena: &'a ExprArena, toplevel: ExprId) -> Self {
        Self {
            arena,
            toplevel,
            mode: EvalMode::default(),
            builtins: None,
            globals: Vec::new(),
            sink: None,
            diagnostic_config: DiagnosticConfig::default(),
            binding_cache: true,
        }
    }

    /// Set the evaluation mode.
    ///
    /// Controls the recursion limit and view tracing.
    #[must_use]
    pub fn mode(mut self, mode: EvalMode) -> Self {
        self.mode = mode;
        self
    }

    /// Take the mode from `VELA_MAX_DEPTH` and `VELA_TRACE_VIEWS`.
    #[must_use]
    pub fn mode_from_env(self) -> Self {
        self.mode(EvalMode::from_env())
    }

    /// Replace the standard builtins.
    #[must_use]
    pub fn builtins(mut self, builtins: BuiltinRegistry) -> Self {
        self.builtins = Some(builtins);
        self
    }

    /// Predefine a global; shadows a builtin of the same name.
    #[must_use]
    pub fn global(mut self, name: &str, value: Value) -> Self {
        self.globals.push((Name::intern(name), value));
        self
    }

    /// Report errors to `sink` instead of the internal queue.
    #[must_use]
    pub fn sink(mut self, sink: &'a mut dyn DiagnosticSink) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Configure the internal diagnostic queue.
    #[must_use]
    pub fn diagnostic_config(mut self, config: DiagnosticConfig) -> Self {
        self.diagnostic_config = config;
        self
    }

    /// Enable or disable caching of validated bindings per call site.
    #[must_use]
    pub fn binding_cache(mut self, enabled: bool) -> Self {
        self.binding_cache = enabled;
        self
    }

    /// Resolve the program and build the interpreter.
    pub fn build(self) -> Interpreter<'a> {
        let program = ScopeResolver::resolve(self.arena, self.toplevel);
        let root = FrameRef::root(program.toplevel().clone());
        let builtins = self.builtins.unwrap_or_else(BuiltinRegistry::standard);

        let mut globals: FxHashMap<Name, Value> = builtins
            .iter()
            .map(|handle| (handle.name, Value::Builtin(handle)))
            .collect();
        globals.extend(self.globals);

        Interpreter {
            arena: self.arena,
            program,
            root,
            globals,
            builtins,
            mode: self.mode,
            call_stack: CallStack::new(self.mode.max_recursion_depth()),
            binding_cache: self.binding_cache.then(FxHashMap::default),
            frames: Vec::new(),
            prune_at: FRAME_PRUNE_THRESHOLD,
            sink: self.sink,
            queue: DiagnosticQueue::with_config(self.diagnostic_config),
        }
    }
}
