//! The colon operator `from:to`.

use vela_value::errors::{not_a_scalar, type_mismatch, unexpected_missing_value};
use vela_value::{format_double, EvalError, EvalResult, Value};

/// `from:to` in steps of one towards `to`.
///
/// An integral `from` gives a lazy integer view (the simple range for
/// `1:n`); otherwise the doubles are materialized.
pub fn colon(from: &Value, to: &Value) -> EvalResult {
    let start = bound("from", from)?;
    let end = bound("to", to)?;
    let step = if end >= start { 1 } else { -1 };
    let steps = (end - start).abs().floor();

    if let Some(first) = integral(start) {
        if let Some(last) = integral(start + f64::from(step) * steps) {
            return Ok(if first == 1 && last >= 1 {
                Value::simple_range(last)
            } else {
                Value::sequence(first, last, step)
            });
        }
    }

    let count = (steps as usize).saturating_add(1);
    let step = f64::from(step);
    Ok(Value::double(
        (0..count).map(|i| start + step * i as f64).collect(),
    ))
}

fn bound(arg: &str, value: &Value) -> Result<f64, EvalError> {
    if value.size() != 1 {
        return Err(not_a_scalar(arg));
    }
    let x = value.as_double()?.get(0);
    if x.is_nan() {
        return Err(unexpected_missing_value());
    }
    if x.is_infinite() {
        return Err(type_mismatch("a finite bound", &format_double(x)));
    }
    Ok(x)
}

/// `x` as an integer when it is integral and not the missing marker.
#[expect(
    clippy::float_cmp,
    reason = "integrality is an exact property of the value"
)]
fn integral(x: f64) -> Option<i32> {
    let fits = x > f64::from(i32::MIN) && x <= f64::from(i32::MAX);
    (fits && x.trunc() == x).then(|| x as i32)
}
