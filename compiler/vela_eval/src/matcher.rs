//! Call-site argument matching.
//!
//! Binding runs three passes over the actuals:
//! 1. exact names: a named actual equal to a formal binds it; the first
//!    exact match wins
//! 2. partial names: an unused named actual that is a prefix of a
//!    still-unmatched formal binds it, unless the match is ambiguous
//! 3. positions: remaining actuals fill remaining formals in declaration
//!    order; the varargs formal absorbs every actual from the first one that
//!    reaches it
//!
//! `bind` is a pure function of the formals, the actual names and the
//! actual count, so its result can be cached per call site.

use smallvec::SmallVec;

use vela_ir::Name;
use vela_value::errors::{
    ambiguous_partial_match, arity_too_few, arity_too_many, missing_required_argument,
    unmatched_named_argument,
};
use vela_value::{ArgumentBinding, EvalError, FormalParameters};

/// Formal/actual binding and arity validation.
pub struct ArgumentMatcher;

impl ArgumentMatcher {
    /// Bind `count` actuals (named per `names`) to `formals`.
    ///
    /// `names[i]` is `None` for a positional actual; missing trailing
    /// entries count as positional.
    pub fn bind(
        formals: &FormalParameters,
        names: &[Option<Name>],
        count: usize,
    ) -> Result<ArgumentBinding, EvalError> {
        let name_of = |actual: usize| names.get(actual).copied().flatten();
        let dots = formals.dots_index();
        let is_dots = |formal: usize| dots == Some(formal);

        let mut formal_to_actual: Vec<Option<usize>> = vec![None; formals.len()];
        let mut used = vec![false; count];

        // Exact names
        for actual in 0..count {
            let Some(name) = name_of(actual) else {
                continue;
            };
            if let Some(formal) = formals.position(name) {
                if !is_dots(formal) && formal_to_actual[formal].is_none() {
                    formal_to_actual[formal] = Some(actual);
                    used[actual] = true;
                }
            }
        }

        // Partial names
        for formal in 0..formals.len() {
            if is_dots(formal) || formal_to_actual[formal].is_some() {
                continue;
            }
            let formal_name = formals.name(formal);
            let candidates: SmallVec<[usize; 2]> = (0..count)
                .filter(|&actual| {
                    !used[actual] && name_of(actual).is_some_and(|n| formal_name.starts_with(n))
                })
                .collect();
            match candidates.as_slice() {
                [] => {}
                [actual] => {
                    let actual = *actual;
                    let actual_name = name_of(actual).unwrap_or(Name::EMPTY);
                    let also_matches_other = (0..formals.len()).any(|other| {
                        other != formal
                            && !is_dots(other)
                            && formal_to_actual[other].is_none()
                            && formals.name(other).starts_with(actual_name)
                    });
                    if also_matches_other {
                        return Err(ambiguous_partial_match(formal_name, &[actual_name]));
                    }
                    formal_to_actual[formal] = Some(actual);
                    used[actual] = true;
                }
                several => {
                    let conflicting: SmallVec<[Name; 2]> =
                        several.iter().filter_map(|&a| name_of(a)).collect();
                    return Err(ambiguous_partial_match(formal_name, &conflicting));
                }
            }
        }

        // Positions
        let mut absorbed = Vec::new();
        let mut unused = Vec::new();
        let mut next = 0;
        for actual in 0..count {
            if used[actual] {
                continue;
            }
            while next < formals.len() && !is_dots(next) && formal_to_actual[next].is_some() {
                next += 1;
            }
            if next >= formals.len() {
                unused.push(actual);
            } else if is_dots(next) {
                absorbed.push(actual);
            } else if let Some(name) = name_of(actual) {
                return Err(unmatched_named_argument(formals.function(), name));
            } else {
                formal_to_actual[next] = Some(actual);
                next += 1;
            }
        }

        let binding = ArgumentBinding::new(formal_to_actual, absorbed, unused);
        tracing::trace!(
            function = %formals.function(),
            formal_to_actual = ?binding.formal_to_actual(),
            dots = ?binding.dots(),
            unused = ?binding.unused(),
            "bound arguments"
        );
        Ok(binding)
    }

    /// Validate a binding against the formals' arity.
    pub fn check(
        formals: &FormalParameters,
        binding: &ArgumentBinding,
        count: usize,
    ) -> Result<(), EvalError> {
        let function = formals.function();
        let min = formals.min_arity();
        let max = formals.max_arity();

        // Any unbound required formal, including one after the varargs marker.
        if let Some(missing) =
            (0..formals.len()).find(|&i| formals.is_required(i) && !binding.is_bound(formals, i))
        {
            return Err(missing_required_argument(function, formals.name(missing)));
        }
        if count < min {
            return Err(arity_too_few(function, min, max, count));
        }
        if !binding.unused().is_empty() {
            return Err(arity_too_many(function, min, max, count));
        }
        Ok(())
    }

    /// `bind` followed by `check`.
    pub fn match_call(
        formals: &FormalParameters,
        names: &[Option<Name>],
        count: usize,
    ) -> Result<ArgumentBinding, EvalError> {
        let binding = Self::bind(formals, names, count)?;
        Self::check(formals, &binding, count)?;
        Ok(binding)
    }
}
