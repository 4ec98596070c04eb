//! Tree-walking interpreter for Vela.
//!
//! # Architecture
//!
//! The program is resolved once by `ScopeResolver` before evaluation; every
//! function literal then has a `FunctionDescriptor` fixing its frame layout
//! and the lexical address of each symbol it reads. Evaluation walks the
//! `ExprArena` directly:
//!
//! - `eval` dispatches on `ExprKind` with the active `FrameRef`
//! - `call` binds actuals through `ArgumentMatcher` (cached per call site),
//!   builds the callee frame and runs the body or builtin
//! - variable reads use the precomputed `Resolution`, falling back to the
//!   frame chain and then the global table for bindings that do not exist
//!   yet at their static address
//!
//! # Frame Lifetime
//!
//! Frames are reference counted. A closure stored in the frame it captured
//! forms a cycle, so the interpreter registers every frame it creates weakly.
//! On drop it clears the surviving frames that only the interpreter can
//! still reach. A closure the host took out (through [`Interpreter::global`]
//! or a returned value) keeps its captured frames and their ancestors
//! intact, and remains callable from another interpreter over the same
//! arena. Cycles among frames kept alive that way are not broken.

mod builder;
mod call;

pub use builder::InterpreterBuilder;

use rustc_hash::FxHashMap;

use vela_diagnostic::{Diagnostic, DiagnosticQueue, DiagnosticSink};
use vela_ir::{ExprArena, ExprId, ExprKind, Literal, Name, Span};
use vela_value::errors::{missing_required_argument, undefined_variable};
use vela_value::{
    collect_cycles, ArgumentBinding, Closure, EnclosingSlot, EvalError, EvalResult, FrameRef,
    Logical, RStr, Resolution, Value, WeakFrameRef,
};

use crate::args::parse_unchecked_logical;
use crate::builtins::BuiltinRegistry;
use crate::diagnostics::{to_diagnostic, CallStack};
use crate::eval_mode::EvalMode;
use crate::operators::evaluate_binary;
use crate::resolver::ResolvedProgram;
use crate::stack::ensure_sufficient_stack;

/// Identity of a callee, for the binding cache.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
enum CalleeId {
    /// Function literal of the closure's descriptor.
    Closure(ExprId),
    Builtin(u32),
}

/// Validated bindings keyed by call expression and callee.
type BindingCache = FxHashMap<(ExprId, CalleeId), ArgumentBinding>;

/// Frames registered before the weak list is pruned of dead entries.
const FRAME_PRUNE_THRESHOLD: usize = 256;

/// Tree-walking interpreter.
pub struct Interpreter<'a> {
    arena: &'a ExprArena,
    program: ResolvedProgram,
    root: FrameRef,
    /// Builtins and variables created outside any frame (`<<-` with no
    /// enclosing binding, `set_global`).
    globals: FxHashMap<Name, Value>,
    builtins: BuiltinRegistry,
    mode: EvalMode,
    call_stack: CallStack,
    binding_cache: Option<BindingCache>,
    frames: Vec<WeakFrameRef>,
    prune_at: usize,
    sink: Option<&'a mut dyn DiagnosticSink>,
    queue: DiagnosticQueue,
}

impl<'a> Interpreter<'a> {
    /// Evaluate the top-level expression in the root frame.
    ///
    /// An error is also reported to the diagnostic sink.
    pub fn run(&mut self) -> EvalResult {
        let body = self.program.toplevel().body();
        let root = self.root.clone();
        tracing::debug!(
            functions = self.program.function_count(),
            mode = ?self.mode,
            "running program"
        );
        self.eval(body, &root).map_err(|err| self.report(err))
    }

    /// Call a function value with `(name, value)` actuals.
    ///
    /// Errors are reported to the diagnostic sink like those of `run`.
    pub fn call_value(&mut self, func: &Value, args: Vec<(Option<Name>, Value)>) -> EvalResult {
        let (names, values): (Vec<_>, Vec<_>) = args.into_iter().unzip();
        self.call(func, values, &names, None)
            .map_err(|err| self.report(err))
    }

    /// Value of `name` at the top level: a root-frame variable, a global,
    /// or a builtin.
    pub fn global(&self, name: Name) -> Option<Value> {
        self.program
            .toplevel()
            .slot_of(name)
            .and_then(|slot| self.root.get(slot))
            .or_else(|| self.globals.get(&name).cloned())
    }

    /// Define `name` at the top level.
    pub fn set_global(&mut self, name: Name, value: Value) {
        match self.program.toplevel().slot_of(name) {
            Some(slot) => self.root.set(slot, value),
            None => {
                self.globals.insert(name, value);
            }
        }
    }

    pub fn mode(&self) -> EvalMode {
        self.mode
    }

    pub fn program(&self) -> &ResolvedProgram {
        &self.program
    }

    pub fn builtins(&self) -> &BuiltinRegistry {
        &self.builtins
    }

    pub fn call_stack(&self) -> &CallStack {
        &self.call_stack
    }

    /// Diagnostics collected by the internal queue (empty when an external
    /// sink was supplied).
    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.queue.diagnostics()
    }

    /// Take the collected diagnostics.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        self.queue.flush()
    }

    /// Number of validated bindings in the call-site cache.
    pub fn cached_bindings(&self) -> usize {
        self.binding_cache.as_ref().map_or(0, FxHashMap::len)
    }

    fn report(&mut self, err: EvalError) -> EvalError {
        let diagnostic = to_diagnostic(&err);
        match self.sink.as_deref_mut() {
            Some(sink) => sink.emit(diagnostic),
            None => self.queue.emit(diagnostic),
        };
        err
    }

    /// Evaluate `expr` in `frame`.
    pub(crate) fn eval(&mut self, expr: ExprId, frame: &FrameRef) -> EvalResult {
        ensure_sufficient_stack(|| self.eval_inner(expr, frame))
    }

    fn eval_inner(&mut self, expr: ExprId, frame: &FrameRef) -> EvalResult {
        let arena = self.arena;
        let node = arena.get_expr(expr);
        let span = node.span;
        match &node.kind {
            ExprKind::Literal(literal) => Ok(literal_value(*literal)),
            ExprKind::Ident(name) => self.read_variable(*name, frame, span),
            ExprKind::Assign { target, value } => {
                let value = self.eval(*value, frame)?;
                match frame.descriptor().slot_of(*target) {
                    Some(slot) => frame.set(slot, value.clone()),
                    None => {
                        self.globals.insert(*target, value.clone());
                    }
                }
                Ok(value)
            }
            ExprKind::SuperAssign { target, value } => {
                let value = self.eval(*value, frame)?;
                self.super_assign(*target, value.clone(), frame);
                Ok(value)
            }
            ExprKind::Function { .. } => {
                let descriptor = self.program.descriptor(expr).ok_or_else(|| {
                    EvalError::new("function literal was not resolved").with_span(span)
                })?;
                Ok(Value::closure(Closure::new(
                    descriptor.clone(),
                    frame.clone(),
                )))
            }
            ExprKind::Call { func, args } => {
                let callee = self.eval(*func, frame)?;
                let args = arena.get_call_args(*args);
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(self.eval(arg.value, frame)?);
                }
                let names: Vec<Option<Name>> = args.iter().map(|a| a.name).collect();
                self.call(&callee, values, &names, Some((expr, span)))
            }
            ExprKind::Binary { op, left, right } => {
                let left = self.eval(*left, frame)?;
                let right = self.eval(*right, frame)?;
                let result = evaluate_binary(*op, &left, &right).map_err(|e| e.with_span(span))?;
                Ok(self.trace(result))
            }
            ExprKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                let cond = self.eval(*cond, frame)?;
                if parse_unchecked_logical("if", &cond).map_err(|e| e.with_span(span))? {
                    self.eval(*then_branch, frame)
                } else if let Some(else_branch) = else_branch {
                    self.eval(*else_branch, frame)
                } else {
                    Ok(Value::Null)
                }
            }
            ExprKind::Block(exprs) => {
                let mut last = Value::Null;
                for e in arena.get_expr_list(*exprs) {
                    last = self.eval(*e, frame)?;
                }
                Ok(last)
            }
        }
    }

    /// Wrap lazy results in a counting view when view tracing is on.
    fn trace(&self, value: Value) -> Value {
        if self.mode.traces_views() {
            value.traced()
        } else {
            value
        }
    }

    fn read_variable(&self, name: Name, frame: &FrameRef, span: Span) -> EvalResult {
        let descriptor = frame.descriptor();
        let found = match descriptor.resolve_read(name) {
            Some(Resolution::Local { slot, outer }) => {
                if let Some(value) = frame.get(slot) {
                    return Ok(value);
                }
                if (slot as usize) < descriptor.param_count() {
                    return Err(missing_required_argument(descriptor.name(), name).with_span(span));
                }
                self.read_outer(name, frame, outer)
            }
            Some(Resolution::Enclosing(address)) => self.read_outer(name, frame, Some(address)),
            Some(Resolution::Global) | None => self.read_chain(name, frame.parent()),
        };
        found.ok_or_else(|| undefined_variable(name).with_span(span))
    }

    /// Read a symbol that is not bound locally: its static address first,
    /// then the frames beyond it, then globals.
    fn read_outer(
        &self,
        name: Name,
        frame: &FrameRef,
        address: Option<EnclosingSlot>,
    ) -> Option<Value> {
        if let Some(owner) = address.and_then(|a| frame.ancestor(a.hops)) {
            if let Some(value) = address.and_then(|a| owner.get(a.slot)) {
                return Some(value);
            }
            return self.read_chain(name, owner.parent());
        }
        self.read_chain(name, frame.parent())
    }

    /// Search `start` and its ancestors by name, then the global table.
    fn read_chain(&self, name: Name, start: Option<FrameRef>) -> Option<Value> {
        let mut current = start;
        while let Some(frame) = current {
            if let Some(value) = frame.descriptor().slot_of(name).and_then(|s| frame.get(s)) {
                return Some(value);
            }
            current = frame.parent();
        }
        self.globals.get(&name).cloned()
    }

    /// `name <<- value`: update the nearest enclosing binding, or the
    /// global table when no enclosing scope defines `name`.
    fn super_assign(&mut self, name: Name, value: Value, frame: &FrameRef) {
        let target = match frame.descriptor().resolve_super_assign(name) {
            Some(Resolution::Enclosing(address)) => frame
                .ancestor(address.hops)
                .map(|owner| (owner, address.slot)),
            _ => None,
        };
        match target {
            Some((owner, slot)) => owner.set(slot, value),
            None => {
                self.globals.insert(name, value);
            }
        }
    }

    fn register_frame(&mut self, frame: &FrameRef) {
        if self.frames.len() >= self.prune_at {
            self.frames.retain(|weak| weak.upgrade().is_some());
            self.prune_at = (self.frames.len() * 2).max(FRAME_PRUNE_THRESHOLD);
        }
        self.frames.push(frame.downgrade());
    }
}

impl Drop for Interpreter<'_> {
    fn drop(&mut self) {
        let fresh = FrameRef::root(self.program.toplevel().clone());
        let mut live: Vec<FrameRef> = self.frames.iter().filter_map(WeakFrameRef::upgrade).collect();
        live.push(std::mem::replace(&mut self.root, fresh));
        let frames = live.len();
        let cleared = collect_cycles(live, self.globals.values());
        tracing::trace!(frames, cleared, "collected frame cycles");
    }
}

fn literal_value(literal: Literal) -> Value {
    match literal {
        Literal::Null => Value::Null,
        Literal::Na => Value::logical(vec![Logical::Na]),
        Literal::Logical(b) => Value::lgl(b),
        Literal::Integer(i) => Value::int(i),
        Literal::Double(d) => Value::dbl(d),
        Literal::Str(name) => Value::string(vec![RStr::from_name(name)]),
    }
}
