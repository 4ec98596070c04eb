//! Expression nodes.
//!
//! The node set covers what the evaluation core gives meaning to: literals,
//! variable reads, local and non-local assignment, function literals, calls
//! with named actuals, blocks, `if`, and the vector operators.

use crate::{CallArgRange, ExprId, ExprRange, Name, ParamRange, Span};

/// Literal constant.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Literal {
    /// `NULL`
    Null,
    /// Logical `NA`
    Na,
    /// `TRUE` / `FALSE`
    Logical(bool),
    /// Integer literal (`1L`)
    Integer(i32),
    /// Double literal
    Double(f64),
    /// String literal, interned
    Str(Name),
}

/// Binary operator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    /// `from:to`
    Colon,
    /// `%in%`
    In,
}

impl BinaryOp {
    /// Surface syntax of the operator, for error messages.
    pub fn as_symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Colon => ":",
            BinaryOp::In => "%in%",
        }
    }
}

/// Formal parameter of a function literal.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Param {
    pub name: Name,
    /// Default-value expression, evaluated in the callee frame.
    pub default: Option<ExprId>,
    pub span: Span,
}

impl Param {
    /// Parameter without a default (required unless it is `...`).
    pub fn required(name: Name) -> Self {
        Param {
            name,
            default: None,
            span: Span::DUMMY,
        }
    }

    /// Parameter with a default-value expression.
    pub fn with_default(name: Name, default: ExprId) -> Self {
        Param {
            name,
            default: Some(default),
            span: Span::DUMMY,
        }
    }

    /// The varargs marker `...`.
    pub fn dots() -> Self {
        Param::required(Name::DOTS)
    }
}

/// Actual argument at a call site.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CallArg {
    /// `None` for positional actuals.
    pub name: Option<Name>,
    pub value: ExprId,
    pub span: Span,
}

impl CallArg {
    /// Positional actual.
    pub fn positional(value: ExprId) -> Self {
        CallArg {
            name: None,
            value,
            span: Span::DUMMY,
        }
    }

    /// Named actual (`name = value`).
    pub fn named(name: Name, value: ExprId) -> Self {
        CallArg {
            name: Some(name),
            value,
            span: Span::DUMMY,
        }
    }
}

/// Expression kind.
#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    Literal(Literal),
    /// Variable read.
    Ident(Name),
    /// `target <- value`, always creates or updates a local.
    Assign { target: Name, value: ExprId },
    /// `target <<- value`, updates the nearest enclosing binding.
    SuperAssign { target: Name, value: ExprId },
    /// `function(params) body`
    Function { params: ParamRange, body: ExprId },
    /// `func(args)`
    Call { func: ExprId, args: CallArgRange },
    Binary {
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    },
    If {
        cond: ExprId,
        then_branch: ExprId,
        else_branch: Option<ExprId>,
    },
    /// `{ e1; e2; ... }`, value of the last expression or `NULL`.
    Block(ExprRange),
}

/// Expression node: kind plus source location.
#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }
}
