//! Binary operators over vector values.
//!
//! Direct enum-based dispatch on `BinaryOp`; the operand kinds are combined
//! through the coercion lattice and both sides are read through lazy
//! coercion views.

mod arithmetic;
mod membership;
mod sequence;

pub use arithmetic::evaluate_arithmetic;
pub use membership::member;
pub use sequence::colon;

use vela_ir::BinaryOp;
use vela_value::{EvalResult, Value};

/// Evaluate `left op right`.
pub fn evaluate_binary(op: BinaryOp, left: &Value, right: &Value) -> EvalResult {
    match op {
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div => {
            evaluate_arithmetic(op, left, right)
        }
        BinaryOp::Colon => colon(left, right),
        BinaryOp::In => member(left, right),
    }
}
