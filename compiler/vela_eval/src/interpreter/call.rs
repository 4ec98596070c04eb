//! Function call evaluation methods for the Interpreter.

use vela_ir::{ExprId, Name, Span};
use vela_value::errors::not_callable;
use vela_value::{
    ArgumentBinding, BuiltinFunction, Closure, EvalError, EvalResult, FormalParameters,
    FunctionDescriptor, FrameRef, Value,
};

use super::{BindingCache, CalleeId, Interpreter};
use crate::builtins::BuiltinArgs;
use crate::diagnostics::CallFrame;
use crate::matcher::ArgumentMatcher;

impl Interpreter<'_> {
    /// Call `callee` with already evaluated actuals.
    ///
    /// `site` is the call expression and its span; calls without one
    /// (from `call_value`) bypass the binding cache.
    #[tracing::instrument(level = "debug", skip_all)]
    pub(super) fn call(
        &mut self,
        callee: &Value,
        values: Vec<Value>,
        names: &[Option<Name>],
        site: Option<(ExprId, Span)>,
    ) -> EvalResult {
        let result = match callee {
            Value::Closure(closure) => self.call_closure(closure, values, names, site),
            Value::Builtin(handle) => self.call_builtin(*handle, values, names, site),
            other => Err(self
                .call_stack
                .attach_backtrace(not_callable(other.type_name()))),
        };
        match site {
            Some((_, span)) => result.map_err(|err| err.with_span(span)),
            None => result,
        }
    }

    fn call_closure(
        &mut self,
        closure: &Closure,
        values: Vec<Value>,
        names: &[Option<Name>],
        site: Option<(ExprId, Span)>,
    ) -> EvalResult {
        let descriptor = closure.descriptor().clone();
        let key = site.map(|(expr, _)| (expr, CalleeId::Closure(descriptor.expr())));
        let binding = bind_cached(
            self.binding_cache.as_mut(),
            key,
            descriptor.formals(),
            names,
            values.len(),
        )
        .map_err(|err| self.call_stack.attach_backtrace(err))?;

        self.enter(descriptor.name(), site)?;
        tracing::debug!(
            function = %descriptor.name(),
            depth = self.call_stack.depth(),
            "calling closure"
        );
        let frame = FrameRef::make_call(&descriptor, &binding, values, names, closure.env().clone());
        self.register_frame(&frame);

        let result = self
            .fill_defaults(&descriptor, &frame)
            .and_then(|()| self.eval(descriptor.body(), &frame));
        self.leave(result)
    }

    fn call_builtin(
        &mut self,
        handle: BuiltinFunction,
        values: Vec<Value>,
        names: &[Option<Name>],
        site: Option<(ExprId, Span)>,
    ) -> EvalResult {
        let Some(builtin) = self.builtins.get(handle) else {
            return Err(not_callable("builtin"));
        };
        let key = site.map(|(expr, _)| (expr, CalleeId::Builtin(handle.index)));
        let binding = bind_cached(
            self.binding_cache.as_mut(),
            key,
            &builtin.formals,
            names,
            values.len(),
        )
        .map_err(|err| self.call_stack.attach_backtrace(err))?;
        let (formals, func) = (builtin.formals.clone(), builtin.func);

        self.enter(handle.name, site)?;
        let result = func(&BuiltinArgs::new(&formals, &binding, &values, names));
        let result = result.map(|value| self.trace(value));
        self.leave(result)
    }

    /// Parameters without an actual take their default, evaluated in the
    /// callee frame in declaration order.
    fn fill_defaults(
        &mut self,
        descriptor: &FunctionDescriptor,
        frame: &FrameRef,
    ) -> Result<(), EvalError> {
        for index in 0..descriptor.param_count() {
            let slot = index as u32;
            if frame.is_bound(slot) {
                continue;
            }
            if let Some(default) = descriptor.default_for(index) {
                let value = self.eval(default, frame)?;
                frame.set(slot, value);
            }
        }
        Ok(())
    }

    fn enter(&mut self, name: Name, site: Option<(ExprId, Span)>) -> Result<(), EvalError> {
        let frame = CallFrame {
            name,
            call_span: site.map(|(_, span)| span),
        };
        self.call_stack
            .push(frame)
            .map_err(|err| self.call_stack.attach_backtrace(err))
    }

    /// Pop the current call, attaching the backtrace to an error first.
    fn leave(&mut self, result: EvalResult) -> EvalResult {
        let result = result.map_err(|err| self.call_stack.attach_backtrace(err));
        self.call_stack.pop();
        result
    }
}

/// Bind through the matcher, reusing a validated binding for the same call
/// site and callee.
fn bind_cached(
    cache: Option<&mut BindingCache>,
    key: Option<(ExprId, CalleeId)>,
    formals: &FormalParameters,
    names: &[Option<Name>],
    count: usize,
) -> Result<ArgumentBinding, EvalError> {
    let (Some(cache), Some(key)) = (cache, key) else {
        return ArgumentMatcher::match_call(formals, names, count);
    };
    if let Some(binding) = cache.get(&key) {
        return Ok(binding.clone());
    }
    let binding = ArgumentMatcher::match_call(formals, names, count)?;
    cache.insert(key, binding.clone());
    Ok(binding)
}
