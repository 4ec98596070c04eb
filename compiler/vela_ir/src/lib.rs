//! Vela IR - symbols, spans and the expression arena.
//!
//! This crate contains the data structures the evaluation core consumes from
//! its external collaborators:
//! - `Name`: interned symbols with O(1) equality
//! - `Span`: source locations used only for error reporting
//! - `ExprArena`: the flat expression tree a parser produces
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: symbol and string text becomes `Name(u32)`
//! - **Flatten Everything**: no `Box<Expr>`, children are `ExprId(u32)` indices
//!
//! Types that contain floats store them as `f64` and only derive `PartialEq`.

mod arena;
mod ast;
mod expr_id;
mod interner;
mod name;
mod span;

pub use arena::ExprArena;
pub use ast::{BinaryOp, CallArg, Expr, ExprKind, Literal, Param};
pub use expr_id::{CallArgRange, ExprId, ExprRange, ParamRange};
pub use interner::{InternError, StringInterner};
pub use name::Name;
pub use span::Span;
