//! `+ - * /` with recycling and missing-value propagation.
//!
//! Logical and raw operands compute as integers. Integer overflow yields
//! the missing marker; `/` always produces doubles (or complex).

use vela_ir::BinaryOp;
use vela_value::errors::unsupported_operand_type;
use vela_value::{
    common_kind, is_na_double, na_double, Complex, Element, EvalError, EvalResult, Kind, Value,
    Vector, NA_INTEGER,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Arith {
    Add,
    Sub,
    Mul,
    Div,
}

impl Arith {
    fn from_binary(op: BinaryOp) -> Option<Self> {
        match op {
            BinaryOp::Add => Some(Arith::Add),
            BinaryOp::Sub => Some(Arith::Sub),
            BinaryOp::Mul => Some(Arith::Mul),
            BinaryOp::Div => Some(Arith::Div),
            BinaryOp::Colon | BinaryOp::In => None,
        }
    }
}

/// Evaluate an arithmetic operator over two vectors.
pub fn evaluate_arithmetic(op: BinaryOp, left: &Value, right: &Value) -> EvalResult {
    let unsupported = || {
        unsupported_operand_type(
            op.as_symbol(),
            &format!("{} and {}", left.type_name(), right.type_name()),
        )
    };
    let Some(arith) = Arith::from_binary(op) else {
        return Err(unsupported());
    };
    let numeric = |v: &Value| v.is_null() || v.kind().is_numeric();
    if !numeric(left) || !numeric(right) {
        return Err(unsupported());
    }
    let kind = match common_kind(left.kind(), right.kind()).ok_or_else(unsupported)? {
        Kind::Null | Kind::Logical | Kind::Raw | Kind::Integer if arith == Arith::Div => {
            Kind::Double
        }
        Kind::Null | Kind::Logical | Kind::Raw => Kind::Integer,
        kind => kind,
    };

    match kind {
        Kind::Integer => {
            let result = recycle(&operand(left)?, &operand(right)?, |a, b| integer_op(arith, a, b));
            Ok(Value::integer(result))
        }
        Kind::Double => {
            let result = recycle(&operand(left)?, &operand(right)?, |a, b| double_op(arith, a, b));
            Ok(Value::double(result))
        }
        Kind::Complex => {
            let result = recycle(&operand(left)?, &operand(right)?, |a, b| complex_op(arith, a, b));
            Ok(Value::complex(result))
        }
        _ => Err(unsupported()),
    }
}

fn operand<T: Element>(value: &Value) -> Result<Vector<T>, EvalError> {
    Ok(value.as_vector::<T>()?.materialize())
}

/// Apply `f` elementwise, recycling the shorter operand. Either side empty
/// gives an empty result.
fn recycle<T: Element, R>(left: &Vector<T>, right: &Vector<T>, f: impl Fn(T, T) -> R) -> Vec<R> {
    let (l, r) = (left.len(), right.len());
    if l == 0 || r == 0 {
        return Vec::new();
    }
    (0..l.max(r))
        .map(|i| f(left.get(i % l), right.get(i % r)))
        .collect()
}

fn integer_op(op: Arith, a: i32, b: i32) -> i32 {
    if a == NA_INTEGER || b == NA_INTEGER {
        return NA_INTEGER;
    }
    let result = match op {
        Arith::Add => a.checked_add(b),
        Arith::Sub => a.checked_sub(b),
        Arith::Mul => a.checked_mul(b),
        // Integer division is promoted to doubles before dispatch.
        Arith::Div => None,
    };
    match result {
        Some(value) if value != NA_INTEGER => value,
        _ => {
            tracing::warn!(lhs = a, rhs = b, "integer overflow produced NA");
            NA_INTEGER
        }
    }
}

fn double_op(op: Arith, a: f64, b: f64) -> f64 {
    if is_na_double(a) || is_na_double(b) {
        return na_double();
    }
    match op {
        Arith::Add => a + b,
        Arith::Sub => a - b,
        Arith::Mul => a * b,
        Arith::Div => a / b,
    }
}

fn complex_op(op: Arith, a: Complex, b: Complex) -> Complex {
    if a.is_na() || b.is_na() {
        return Complex::na();
    }
    match op {
        Arith::Add => Complex::new(a.re + b.re, a.im + b.im),
        Arith::Sub => Complex::new(a.re - b.re, a.im - b.im),
        Arith::Mul => Complex::new(a.re * b.re - a.im * b.im, a.re * b.im + a.im * b.re),
        Arith::Div => {
            let denom = b.re * b.re + b.im * b.im;
            Complex::new(
                (a.re * b.re + a.im * b.im) / denom,
                (a.im * b.re - a.re * b.im) / denom,
            )
        }
    }
}
