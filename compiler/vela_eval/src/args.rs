//! Argument-parsing helpers for builtins.
//!
//! Builtins receive already-matched argument values; these helpers turn a
//! value into the Rust-level setting the builtin needs, with the standard
//! error for each way the value can be wrong.

use vela_value::errors::{
    argument_not_one_of, not_a_scalar, type_mismatch, unexpected_missing_value,
};
use vela_value::{EvalError, Value};

/// An argument that must name one of a fixed set of choices.
///
/// `NULL` selects the first choice. Otherwise the value must be a single
/// non-missing string equal to a choice or a prefix of exactly one choice.
#[derive(Copy, Clone, Debug)]
pub struct ArgumentMatch<'a> {
    arg: &'a str,
    choices: &'a [&'a str],
}

impl<'a> ArgumentMatch<'a> {
    pub const fn new(arg: &'a str, choices: &'a [&'a str]) -> Self {
        ArgumentMatch { arg, choices }
    }

    pub fn choices(&self) -> &'a [&'a str] {
        self.choices
    }

    /// Index of the selected choice.
    pub fn parse(&self, value: &Value) -> Result<usize, EvalError> {
        let strings = match value {
            Value::Null => return Ok(0),
            Value::String(strings) => strings,
            other => return Err(type_mismatch("character", other.type_name())),
        };
        if strings.len() != 1 {
            return Err(not_a_scalar(self.arg));
        }
        let Some(text) = strings.get(0).as_str() else {
            return Err(argument_not_one_of(self.arg, self.choices));
        };
        if let Some(exact) = self.choices.iter().position(|c| *c == text) {
            return Ok(exact);
        }
        let mut prefixed = self
            .choices
            .iter()
            .enumerate()
            .filter(|(_, c)| c.starts_with(text));
        match (prefixed.next(), prefixed.next()) {
            (Some((index, _)), None) => Ok(index),
            _ => Err(argument_not_one_of(self.arg, self.choices)),
        }
    }
}

/// First element of `value` as a definite logical.
///
/// Extra elements are ignored with a warning; an empty or missing first
/// element is an error.
pub fn parse_unchecked_logical(arg: &str, value: &Value) -> Result<bool, EvalError> {
    if value.size() == 0 {
        return Err(unexpected_missing_value());
    }
    if value.size() > 1 {
        tracing::warn!(
            arg,
            length = value.size(),
            "condition has length > 1, only the first element is used"
        );
    }
    let first = value.as_logical()?.get(0);
    first.to_bool().ok_or_else(unexpected_missing_value)
}

fn scalar_numeric(arg: &str, value: &Value) -> Result<(), EvalError> {
    if value.size() != 1 || !value.kind().is_numeric() {
        return Err(not_a_scalar(arg));
    }
    if value.is_na_at(0) {
        return Err(unexpected_missing_value());
    }
    Ok(())
}

/// Single non-missing numeric element as an integer (doubles truncate).
pub fn scalar_integer(arg: &str, value: &Value) -> Result<i32, EvalError> {
    scalar_numeric(arg, value)?;
    let integer = value.as_integer()?.get(0);
    if integer == vela_value::NA_INTEGER {
        // Out-of-range doubles coerce to the missing marker.
        return Err(unexpected_missing_value());
    }
    Ok(integer)
}

/// Single non-missing numeric element as a double.
pub fn scalar_double(arg: &str, value: &Value) -> Result<f64, EvalError> {
    scalar_numeric(arg, value)?;
    Ok(value.as_double()?.get(0))
}
