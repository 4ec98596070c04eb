//! Static scope resolution.
//!
//! Walks the expression arena once, before evaluation, and builds a
//! `FunctionDescriptor` for the top level and for every function literal:
//!
//! - the local write set (parameters, then `<-` targets; nested function
//!   literals are not entered) fixes the frame slot layout
//! - every symbol read gets a `Resolution`: a local slot, an `(hops, slot)`
//!   address in an enclosing scope, or a global lookup by name
//! - every `<<-` target resolves starting at the parent scope
//!
//! Scopes are purely lexical; the runtime frame chain mirrors the static
//! nesting chain, so `hops` parent links always reach the defining frame.

use rustc_hash::FxHashMap;

use vela_ir::{ExprArena, ExprId, ExprKind, Name, Span};
use vela_value::{DescriptorParts, EnclosingSlot, FunctionDescriptor, Heap, Resolution};

/// Name of the top-level descriptor.
pub const TOPLEVEL_NAME: &str = "<toplevel>";

/// Name of a function literal that is not directly assigned.
pub const ANONYMOUS_NAME: &str = "<anonymous>";

/// Descriptors for a whole program.
#[derive(Debug)]
pub struct ResolvedProgram {
    toplevel: Heap<FunctionDescriptor>,
    functions: FxHashMap<ExprId, Heap<FunctionDescriptor>>,
}

impl ResolvedProgram {
    /// Descriptor of the top-level scope; its frame is the root frame.
    pub fn toplevel(&self) -> &Heap<FunctionDescriptor> {
        &self.toplevel
    }

    /// Descriptor of the function literal `expr`.
    pub fn descriptor(&self, expr: ExprId) -> Option<&Heap<FunctionDescriptor>> {
        self.functions.get(&expr)
    }

    /// Number of function literals (the top level excluded).
    pub fn function_count(&self) -> usize {
        self.functions.len()
    }
}

/// Builds descriptors for a program's scopes.
pub struct ScopeResolver<'a> {
    arena: &'a ExprArena,
    /// Write sets of the scopes enclosing the current position, innermost last.
    scopes: Vec<Vec<Name>>,
    functions: FxHashMap<ExprId, Heap<FunctionDescriptor>>,
}

/// Symbols seen while walking one function body.
#[derive(Default)]
struct Usage {
    reads: Vec<(Name, Resolution)>,
    super_assigns: Vec<(Name, Resolution)>,
}

impl<'a> ScopeResolver<'a> {
    /// Resolve the program whose top-level expression is `toplevel`.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn resolve(arena: &'a ExprArena, toplevel: ExprId) -> ResolvedProgram {
        let mut resolver = ScopeResolver {
            arena,
            scopes: Vec::new(),
            functions: FxHashMap::default(),
        };
        let span = arena.get_expr(toplevel).span;
        let toplevel = resolver.resolve_function(
            Name::intern(TOPLEVEL_NAME),
            toplevel,
            span,
            Vec::new(),
            toplevel,
        );
        ResolvedProgram {
            toplevel,
            functions: resolver.functions,
        }
    }

    fn resolve_function(
        &mut self,
        name: Name,
        expr: ExprId,
        span: Span,
        params: Vec<(Name, Option<ExprId>)>,
        body: ExprId,
    ) -> Heap<FunctionDescriptor> {
        let mut write_set: Vec<Name> = params.iter().map(|(p, _)| *p).collect();
        for default in params.iter().filter_map(|(_, d)| *d) {
            self.collect_writes(default, &mut write_set);
        }
        self.collect_writes(body, &mut write_set);

        self.scopes.push(write_set.clone());
        let mut usage = Usage::default();
        for default in params.iter().filter_map(|(_, d)| *d) {
            self.walk(default, &mut usage);
        }
        self.walk(body, &mut usage);
        self.scopes.pop();

        let descriptor = FunctionDescriptor::new(DescriptorParts {
            name,
            expr,
            span,
            params,
            body,
            write_set,
            reads: usage.reads,
            super_assigns: usage.super_assigns,
        });
        tracing::debug!(
            function = %descriptor.name(),
            write_set = ?descriptor.write_set(),
            read_set = ?descriptor.read_set(),
            enclosing = descriptor.enclosing_slots().len(),
            "resolved function layout"
        );
        descriptor.into_shared()
    }

    /// Append `<-` targets in `expr` to `write_set`, first occurrence only.
    fn collect_writes(&self, expr: ExprId, write_set: &mut Vec<Name>) {
        match &self.arena.get_expr(expr).kind {
            ExprKind::Literal(_) | ExprKind::Ident(_) | ExprKind::Function { .. } => {}
            ExprKind::Assign { target, value } => {
                self.collect_writes(*value, write_set);
                if !write_set.contains(target) {
                    write_set.push(*target);
                }
            }
            ExprKind::SuperAssign { value, .. } => self.collect_writes(*value, write_set),
            ExprKind::Call { func, args } => {
                self.collect_writes(*func, write_set);
                for arg in self.arena.get_call_args(*args) {
                    self.collect_writes(arg.value, write_set);
                }
            }
            ExprKind::Binary { left, right, .. } => {
                self.collect_writes(*left, write_set);
                self.collect_writes(*right, write_set);
            }
            ExprKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.collect_writes(*cond, write_set);
                self.collect_writes(*then_branch, write_set);
                if let Some(else_branch) = else_branch {
                    self.collect_writes(*else_branch, write_set);
                }
            }
            ExprKind::Block(exprs) => {
                for e in self.arena.get_expr_list(*exprs) {
                    self.collect_writes(*e, write_set);
                }
            }
        }
    }

    fn walk(&mut self, expr: ExprId, usage: &mut Usage) {
        let arena = self.arena;
        match &arena.get_expr(expr).kind {
            ExprKind::Literal(_) => {}
            ExprKind::Ident(name) => self.record_read(*name, usage),
            ExprKind::Assign { target, value } => self.walk_value(*value, *target, usage),
            ExprKind::SuperAssign { target, value } => {
                self.walk_value(*value, *target, usage);
                self.record_super_assign(*target, usage);
            }
            ExprKind::Function { .. } => {
                self.walk_function(expr, Name::intern(ANONYMOUS_NAME));
            }
            ExprKind::Call { func, args } => {
                self.walk(*func, usage);
                for arg in arena.get_call_args(*args) {
                    self.walk(arg.value, usage);
                }
            }
            ExprKind::Binary { left, right, .. } => {
                self.walk(*left, usage);
                self.walk(*right, usage);
            }
            ExprKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.walk(*cond, usage);
                self.walk(*then_branch, usage);
                if let Some(else_branch) = else_branch {
                    self.walk(*else_branch, usage);
                }
            }
            ExprKind::Block(exprs) => {
                for e in arena.get_expr_list(*exprs) {
                    self.walk(*e, usage);
                }
            }
        }
    }

    /// Walk an assigned value; a function literal takes the target's name.
    fn walk_value(&mut self, value: ExprId, target: Name, usage: &mut Usage) {
        if matches!(self.arena.get_expr(value).kind, ExprKind::Function { .. }) {
            self.walk_function(value, target);
        } else {
            self.walk(value, usage);
        }
    }

    fn walk_function(&mut self, expr: ExprId, name: Name) {
        let arena = self.arena;
        let node = arena.get_expr(expr);
        let ExprKind::Function { params, body } = &node.kind else {
            return;
        };
        let params = arena
            .get_params(*params)
            .iter()
            .map(|p| (p.name, p.default))
            .collect();
        let descriptor = self.resolve_function(name, expr, node.span, params, *body);
        self.functions.insert(expr, descriptor);
    }

    fn record_read(&self, name: Name, usage: &mut Usage) {
        if usage.reads.iter().any(|(n, _)| *n == name) {
            return;
        }
        let resolution = match self.local_slot(name) {
            Some(slot) => Resolution::Local {
                slot,
                outer: self.lookup(name, 1),
            },
            None => self.lookup(name, 1).map_or(Resolution::Global, Resolution::Enclosing),
        };
        usage.reads.push((name, resolution));
    }

    fn record_super_assign(&self, name: Name, usage: &mut Usage) {
        if usage.super_assigns.iter().any(|(n, _)| *n == name) {
            return;
        }
        let resolution = self
            .lookup(name, 1)
            .map_or(Resolution::Global, Resolution::Enclosing);
        usage.super_assigns.push((name, resolution));
    }

    fn local_slot(&self, name: Name) -> Option<u32> {
        let scope = self.scopes.last()?;
        scope.iter().position(|n| *n == name).map(|slot| slot as u32)
    }

    /// Nearest enclosing scope at least `min_hops` levels up that writes `name`.
    fn lookup(&self, name: Name, min_hops: usize) -> Option<EnclosingSlot> {
        self.scopes
            .iter()
            .rev()
            .enumerate()
            .skip(min_hops)
            .find_map(|(hops, scope)| {
                scope.iter().position(|n| *n == name).map(|slot| EnclosingSlot {
                    symbol: name,
                    hops: hops as u32,
                    slot: slot as u32,
                })
            })
    }
}

#[cfg(test)]
mod tests;
