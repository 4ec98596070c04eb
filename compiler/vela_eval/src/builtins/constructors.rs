//! `seq` and `vector`.

use vela_value::errors::type_mismatch;
use vela_value::{format_double, EvalError, EvalResult, Kind, Value};

use super::BuiltinArgs;
use crate::args::{scalar_double, scalar_integer, ArgumentMatch};

const SEQ_FROM: usize = 0;
const SEQ_TO: usize = 1;
const SEQ_BY: usize = 2;

/// `seq(from = 1, to = 1, by)`: an integer sequence view.
///
/// `by` defaults to one step towards `to`. A fractional or zero step, or a
/// step leading away from `to`, is rejected.
pub(super) fn seq(args: &BuiltinArgs<'_>) -> EvalResult {
    let from = args
        .arg(SEQ_FROM)
        .map_or(Ok(1), |v| scalar_integer("from", v))?;
    let to = args.arg(SEQ_TO).map_or(Ok(1), |v| scalar_integer("to", v))?;
    let by = match args.arg(SEQ_BY) {
        Some(v) => integral_step(v)?,
        None if to >= from => 1,
        None => -1,
    };

    if by == 0 {
        return Err(type_mismatch("a non-zero step", "0"));
    }
    if from != to && (to > from) != (by > 0) {
        return Err(type_mismatch(
            &format!("a step towards {to}"),
            &by.to_string(),
        ));
    }
    Ok(Value::sequence(from, to, by))
}

/// `by` as an integer. Doubles must be whole; they are not truncated.
fn integral_step(value: &Value) -> Result<i32, EvalError> {
    if value.kind() == Kind::Double {
        let step = scalar_double("by", value)?;
        if step.fract() != 0.0 {
            return Err(type_mismatch("an integer step", &format_double(step)));
        }
    }
    scalar_integer("by", value)
}

const MODES: ArgumentMatch<'static> = ArgumentMatch::new(
    "mode",
    &[
        "logical",
        "integer",
        "double",
        "complex",
        "character",
        "raw",
        "list",
    ],
);

const MODE_KINDS: [Kind; 7] = [
    Kind::Logical,
    Kind::Integer,
    Kind::Double,
    Kind::Complex,
    Kind::String,
    Kind::Raw,
    Kind::List,
];

/// `vector(mode = "logical", length = 0)`: a zero-filled vector.
pub(super) fn vector(args: &BuiltinArgs<'_>) -> EvalResult {
    let mode = args.arg(0).map_or(Ok(0), |v| MODES.parse(v))?;
    let length = args.arg(1).map_or(Ok(0), |v| scalar_integer("length", v))?;
    let length = usize::try_from(length)
        .map_err(|_| type_mismatch("a non-negative length", &length.to_string()))?;
    Ok(Value::zeroed(MODE_KINDS[mode], length))
}
