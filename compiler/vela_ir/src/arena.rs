//! Expression arena.
//!
//! A parser (external to this workspace) allocates every node here. The
//! convenience constructors below are what tests and embedders use to build
//! programs without source text; they attach `Span::DUMMY`.

use crate::{
    BinaryOp, CallArg, CallArgRange, Expr, ExprId, ExprKind, ExprRange, Literal, Name, Param,
    ParamRange, Span,
};

/// Flat storage for expressions and their child lists.
#[derive(Clone, Debug, Default)]
pub struct ExprArena {
    exprs: Vec<Expr>,
    expr_lists: Vec<ExprId>,
    params: Vec<Param>,
    call_args: Vec<CallArg>,
}

impl ExprArena {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of expressions allocated.
    pub fn len(&self) -> usize {
        self.exprs.len()
    }

    /// Check if no expression has been allocated.
    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }

    /// Allocate an expression.
    pub fn alloc_expr(&mut self, expr: Expr) -> ExprId {
        let id = ExprId::new(index_u32(self.exprs.len()));
        self.exprs.push(expr);
        id
    }

    /// Get an expression by id.
    ///
    /// # Panics
    /// Panics if `id` was not allocated by this arena.
    #[inline]
    pub fn get_expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    /// Allocate a list of expression ids.
    pub fn alloc_expr_list(&mut self, ids: impl IntoIterator<Item = ExprId>) -> ExprRange {
        let start = index_u32(self.expr_lists.len());
        self.expr_lists.extend(ids);
        ExprRange::new(start, index_u32(self.expr_lists.len()) - start)
    }

    #[inline]
    pub fn get_expr_list(&self, range: ExprRange) -> &[ExprId] {
        &self.expr_lists[range.as_range()]
    }

    /// Allocate a formal parameter list.
    pub fn alloc_params(&mut self, params: impl IntoIterator<Item = Param>) -> ParamRange {
        let start = index_u32(self.params.len());
        self.params.extend(params);
        ParamRange::new(start, index_u32(self.params.len()) - start)
    }

    #[inline]
    pub fn get_params(&self, range: ParamRange) -> &[Param] {
        &self.params[range.as_range()]
    }

    /// Allocate a call argument list.
    pub fn alloc_call_args(&mut self, args: impl IntoIterator<Item = CallArg>) -> CallArgRange {
        let start = index_u32(self.call_args.len());
        self.call_args.extend(args);
        CallArgRange::new(start, index_u32(self.call_args.len()) - start)
    }

    #[inline]
    pub fn get_call_args(&self, range: CallArgRange) -> &[CallArg] {
        &self.call_args[range.as_range()]
    }

    // Convenience constructors

    fn alloc_kind(&mut self, kind: ExprKind) -> ExprId {
        self.alloc_expr(Expr::new(kind, Span::DUMMY))
    }

    pub fn null(&mut self) -> ExprId {
        self.alloc_kind(ExprKind::Literal(Literal::Null))
    }

    pub fn na(&mut self) -> ExprId {
        self.alloc_kind(ExprKind::Literal(Literal::Na))
    }

    pub fn logical(&mut self, value: bool) -> ExprId {
        self.alloc_kind(ExprKind::Literal(Literal::Logical(value)))
    }

    pub fn int(&mut self, value: i32) -> ExprId {
        self.alloc_kind(ExprKind::Literal(Literal::Integer(value)))
    }

    pub fn double(&mut self, value: f64) -> ExprId {
        self.alloc_kind(ExprKind::Literal(Literal::Double(value)))
    }

    pub fn string(&mut self, text: &str) -> ExprId {
        self.alloc_kind(ExprKind::Literal(Literal::Str(Name::intern(text))))
    }

    pub fn ident(&mut self, name: &str) -> ExprId {
        self.alloc_kind(ExprKind::Ident(Name::intern(name)))
    }

    /// `target <- value`
    pub fn assign(&mut self, target: &str, value: ExprId) -> ExprId {
        self.alloc_kind(ExprKind::Assign {
            target: Name::intern(target),
            value,
        })
    }

    /// `target <<- value`
    pub fn super_assign(&mut self, target: &str, value: ExprId) -> ExprId {
        self.alloc_kind(ExprKind::SuperAssign {
            target: Name::intern(target),
            value,
        })
    }

    /// `function(params) body`
    pub fn function(&mut self, params: Vec<Param>, body: ExprId) -> ExprId {
        let params = self.alloc_params(params);
        self.alloc_kind(ExprKind::Function { params, body })
    }

    /// `func(args)`
    pub fn call(&mut self, func: ExprId, args: Vec<CallArg>) -> ExprId {
        let args = self.alloc_call_args(args);
        self.alloc_kind(ExprKind::Call { func, args })
    }

    /// Call of a named function: `name(args)`.
    pub fn call_named(&mut self, name: &str, args: Vec<CallArg>) -> ExprId {
        let func = self.ident(name);
        self.call(func, args)
    }

    pub fn binary(&mut self, op: BinaryOp, left: ExprId, right: ExprId) -> ExprId {
        self.alloc_kind(ExprKind::Binary { op, left, right })
    }

    pub fn if_else(
        &mut self,
        cond: ExprId,
        then_branch: ExprId,
        else_branch: Option<ExprId>,
    ) -> ExprId {
        self.alloc_kind(ExprKind::If {
            cond,
            then_branch,
            else_branch,
        })
    }

    /// `{ exprs }`
    pub fn block(&mut self, exprs: Vec<ExprId>) -> ExprId {
        let range = self.alloc_expr_list(exprs);
        self.alloc_kind(ExprKind::Block(range))
    }
}

/// Arena indices are `u32`; more than `u32::MAX` nodes is a parser defect.
#[inline]
fn index_u32(len: usize) -> u32 {
    u32::try_from(len).unwrap_or_else(|_| panic!("expression arena overflow: {len} entries"))
}
