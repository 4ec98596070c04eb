//! `c`, `list`, `length` and `is.na`.

use vela_ir::Name;
use vela_value::errors::unsupported_operand_type;
use vela_value::{
    common_kind_of, Complex, Element, EvalResult, Kind, Logical, RStr, Scalar, Value, Vector,
};

use super::BuiltinArgs;

/// `c(...)`: concatenate the elements of every actual into one vector of
/// their common kind. A list or function among the actuals makes the
/// result a list.
pub(super) fn combine(args: &BuiltinArgs<'_>) -> EvalResult {
    let parts: Vec<(Option<Name>, &Value)> = args.dots().collect();
    if parts.iter().all(|(_, v)| v.is_null()) {
        return Ok(Value::Null);
    }

    let kind = if parts
        .iter()
        .any(|(_, v)| v.is_function() || v.kind() == Kind::List)
    {
        Kind::List
    } else {
        common_kind_of(parts.iter().map(|(_, v)| v.kind()))
            .ok_or_else(|| unsupported_operand_type("c", "these arguments"))?
    };
    let names = combined_names(&parts);

    Ok(match kind {
        Kind::Logical => concat::<Logical>(&parts, names),
        Kind::Raw => concat::<u8>(&parts, names),
        Kind::Integer => concat::<i32>(&parts, names),
        Kind::Double => concat::<f64>(&parts, names),
        Kind::Complex => concat::<Complex>(&parts, names),
        Kind::String => concat::<RStr>(&parts, names),
        Kind::List | Kind::Closure => concat::<Value>(&parts, names),
        Kind::Null => Value::Null,
    })
}

fn concat<T: Element>(parts: &[(Option<Name>, &Value)], names: Option<Vec<RStr>>) -> Value {
    let elements: Vec<T> = parts
        .iter()
        .flat_map(|(_, value)| (0..value.size()).map(|i| T::from_scalar(&value.get(i))))
        .collect();
    let vector = Vector::from_vec(elements);
    T::wrap(match names {
        Some(names) => vector.with_names(names),
        None => vector,
    })
}

/// Element names of the combined vector, or `None` when nothing is named.
///
/// A named actual labels its single element `name`, or its elements
/// `name1`, `name2`, ...; inner names are joined as `name.inner`.
fn combined_names(parts: &[(Option<Name>, &Value)]) -> Option<Vec<RStr>> {
    let any_named = parts
        .iter()
        .any(|(name, value)| name.is_some() || value.names().is_some());
    if !any_named {
        return None;
    }

    let mut names = Vec::new();
    for (outer, value) in parts {
        let inner = value.names();
        let size = value.size();
        for i in 0..size {
            let inner = inner
                .and_then(|n| n.get(i))
                .and_then(|s| s.as_str())
                .filter(|s| !s.is_empty());
            let label = match (outer, inner) {
                (Some(outer), Some(inner)) => format!("{outer}.{inner}"),
                (Some(outer), None) if size == 1 => outer.as_str().to_string(),
                (Some(outer), None) => format!("{outer}{}", i + 1),
                (None, Some(inner)) => inner.to_string(),
                (None, None) => String::new(),
            };
            names.push(RStr::new(&label));
        }
    }
    Some(names)
}

/// `list(...)`: the actuals as list elements, keeping their names.
pub(super) fn list(args: &BuiltinArgs<'_>) -> EvalResult {
    let entries: Vec<(Option<Name>, Value)> =
        args.dots().map(|(name, value)| (name, value.clone())).collect();
    if entries.iter().any(|(name, _)| name.is_some()) {
        Ok(Value::named_list(entries))
    } else {
        Ok(Value::list(entries.into_iter().map(|(_, v)| v).collect()))
    }
}

/// `length(x)`
pub(super) fn length(args: &BuiltinArgs<'_>) -> EvalResult {
    let x = args.required(0)?;
    let size = i32::try_from(x.size()).unwrap_or(i32::MAX);
    Ok(Value::int(size))
}

/// `is.na(x)`: element missingness. Any NaN counts as missing; a list
/// element is missing when it is a single missing atomic value.
pub(super) fn is_na(args: &BuiltinArgs<'_>) -> EvalResult {
    let x = args.required(0)?;
    if x.is_function() {
        return Ok(Value::lgl(false));
    }
    let flags: Vec<Logical> = (0..x.size())
        .map(|i| Logical::from_bool(element_is_na(&x.get(i))))
        .collect();
    let result = Vector::from_vec(flags);
    Ok(Value::Logical(match x.names() {
        Some(names) => result.with_names(names.to_vec()),
        None => result,
    }))
}

fn element_is_na(element: &Scalar) -> bool {
    match element {
        Scalar::Double(d) => d.is_nan(),
        Scalar::Complex(c) => c.re.is_nan() || c.im.is_nan(),
        Scalar::Value(v) if !v.is_function() && v.kind() != Kind::List && v.size() == 1 => {
            element_is_na(&v.get(0))
        }
        Scalar::Value(_) => false,
        other => other.is_na(),
    }
}
