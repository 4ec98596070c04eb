//! The `%in%` membership test.
//!
//! Both sides are coerced to their membership kind (the lattice's common
//! kind, with lists forcing strings). A single needle is found by a linear
//! scan that stops at the first hit; otherwise the haystack is hashed once
//! and every needle is looked up in the set.

use std::hash::Hash;

use rustc_hash::FxHashSet;

use vela_value::errors::unsupported_operand_type;
use vela_value::{
    is_na_double, membership_kind, Complex, Element, EvalError, EvalResult, Kind, Logical, RStr,
    Value, NA_INTEGER,
};

/// Element type with a hashable equality key.
///
/// `key` is `None` for missing elements, which never match.
trait MembershipKey: Element {
    type Key: Eq + Hash;

    fn key(&self) -> Option<Self::Key>;
}

impl MembershipKey for Logical {
    type Key = bool;

    fn key(&self) -> Option<bool> {
        self.to_bool()
    }
}

impl MembershipKey for i32 {
    type Key = i32;

    fn key(&self) -> Option<i32> {
        (*self != NA_INTEGER).then_some(*self)
    }
}

/// Doubles compare by value: both zeros share a key and every NaN payload
/// other than the missing marker shares a key.
#[expect(
    clippy::float_cmp,
    reason = "exact comparison against zero folds -0.0 into 0.0"
)]
fn double_key(x: f64) -> Option<u64> {
    if is_na_double(x) {
        None
    } else if x == 0.0 {
        Some(0)
    } else if x.is_nan() {
        Some(f64::NAN.to_bits())
    } else {
        Some(x.to_bits())
    }
}

impl MembershipKey for f64 {
    type Key = u64;

    fn key(&self) -> Option<u64> {
        double_key(*self)
    }
}

impl MembershipKey for Complex {
    type Key = (u64, u64);

    fn key(&self) -> Option<(u64, u64)> {
        Some((double_key(self.re)?, double_key(self.im)?))
    }
}

impl MembershipKey for RStr {
    type Key = RStr;

    fn key(&self) -> Option<RStr> {
        (!self.is_na()).then_some(*self)
    }
}

impl MembershipKey for u8 {
    type Key = u8;

    fn key(&self) -> Option<u8> {
        Some(*self)
    }
}

/// `needles %in% haystack`: a logical vector the length of `needles`.
pub fn member(needles: &Value, haystack: &Value) -> EvalResult {
    let unsupported = || {
        let culprit = if needles.is_function() { needles } else { haystack };
        unsupported_operand_type("%in%", culprit.type_name())
    };
    let kind = membership_kind(needles.kind(), haystack.kind()).ok_or_else(unsupported)?;
    let found = match kind {
        Kind::Null => Vec::new(),
        Kind::Logical => member_in::<Logical>(needles, haystack)?,
        Kind::Raw => member_in::<u8>(needles, haystack)?,
        Kind::Integer => member_in::<i32>(needles, haystack)?,
        Kind::Double => member_in::<f64>(needles, haystack)?,
        Kind::Complex => member_in::<Complex>(needles, haystack)?,
        Kind::String => member_in::<RStr>(needles, haystack)?,
        Kind::List | Kind::Closure => return Err(unsupported()),
    };
    Ok(Value::logical(found))
}

fn member_in<T: MembershipKey>(needles: &Value, haystack: &Value) -> Result<Vec<Logical>, EvalError> {
    let needles = needles.as_vector::<T>()?;
    let haystack = haystack.as_vector::<T>()?;

    if needles.len() == 1 {
        let found = needles
            .get(0)
            .key()
            .is_some_and(|needle| haystack.iter().any(|h| h.key().as_ref() == Some(&needle)));
        return Ok(vec![Logical::from_bool(found)]);
    }

    let set: FxHashSet<T::Key> = haystack.iter().filter_map(|h| h.key()).collect();
    Ok(needles
        .iter()
        .map(|n| Logical::from_bool(n.key().is_some_and(|k| set.contains(&k))))
        .collect())
}
