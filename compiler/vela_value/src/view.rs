//! Lazy views over vector contents.
//!
//! A view computes elements on demand and is observationally identical to its
//! materialized vector. Views hold no mutable value state, so a `Heap<View>`
//! can be shared by any number of vectors.

use std::cell::Cell;

use crate::element::{Element, Scalar};
use crate::{Heap, Kind, Value};

/// Read and materialization counters of a traced view.
#[derive(Debug, Default)]
pub struct ViewTrace {
    reads: Cell<usize>,
    materializations: Cell<usize>,
}

impl ViewTrace {
    pub fn reads(&self) -> usize {
        self.reads.get()
    }

    pub fn materializations(&self) -> usize {
        self.materializations.get()
    }
}

/// Deferred element source.
#[derive(Debug)]
pub enum View {
    /// Integer arithmetic sequence `from, from + step, ...` ending at or before `to`.
    Sequence {
        from: i32,
        to: i32,
        step: i32,
        size: usize,
    },
    /// Integer range `1..=to`.
    SimpleRange { to: i32 },
    /// Elements of `source` reinterpreted as `target`.
    Coerce { source: Value, target: Kind },
    /// Another view, with access counting.
    Traced {
        inner: Heap<View>,
        trace: Heap<ViewTrace>,
    },
}

impl View {
    /// Build a sequence view.
    ///
    /// `step` must be non-zero and point from `from` towards `to`.
    pub fn sequence(from: i32, to: i32, step: i32) -> Self {
        assert!(step != 0, "sequence step must be non-zero");
        assert!(
            (step > 0 && from <= to) || (step < 0 && from >= to),
            "sequence step {step} does not lead from {from} to {to}"
        );
        let span = (i64::from(to) - i64::from(from)).abs();
        let abs_step = i64::from(step).abs();
        let size = ((span + abs_step) / abs_step) as usize;
        View::Sequence {
            from,
            to,
            step,
            size,
        }
    }

    pub fn simple_range(to: i32) -> Self {
        assert!(to >= 1, "simple range must end at 1 or above, got {to}");
        View::SimpleRange { to }
    }

    pub fn traced(inner: Heap<View>) -> Self {
        View::Traced {
            inner,
            trace: Heap::new(ViewTrace::default()),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            View::Sequence { size, .. } => *size,
            View::SimpleRange { to } => *to as usize,
            View::Coerce { source, .. } => source.size(),
            View::Traced { inner, .. } => inner.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element kind this view produces.
    pub fn kind(&self) -> Kind {
        match self {
            View::Sequence { .. } | View::SimpleRange { .. } => Kind::Integer,
            View::Coerce { target, .. } => *target,
            View::Traced { inner, .. } => inner.kind(),
        }
    }

    /// Element `index` in the view's own kind.
    pub fn scalar_at(&self, index: usize) -> Scalar {
        match self {
            View::Sequence { from, step, .. } => {
                let value = i64::from(*from) + index as i64 * i64::from(*step);
                Scalar::Integer(value as i32)
            }
            View::SimpleRange { .. } => Scalar::Integer(index as i32 + 1),
            View::Coerce { source, target } => source.get(index).coerce(*target),
            View::Traced { inner, trace } => {
                trace.reads.set(trace.reads.get() + 1);
                inner.scalar_at(index)
            }
        }
    }

    /// Produce all elements, converted to `T`.
    pub fn fill<T: Element>(&self) -> Vec<T> {
        match self {
            View::Sequence {
                from, step, size, ..
            } => {
                let mut out = Vec::with_capacity(*size);
                let mut current = i64::from(*from);
                for _ in 0..*size {
                    out.push(T::from_scalar(&Scalar::Integer(current as i32)));
                    current += i64::from(*step);
                }
                out
            }
            View::SimpleRange { to } => (1..=*to)
                .map(|i| T::from_scalar(&Scalar::Integer(i)))
                .collect(),
            View::Coerce { source, .. } => (0..source.size())
                .map(|i| T::from_scalar(&source.get(i)))
                .collect(),
            View::Traced { inner, trace } => {
                trace.materializations.set(trace.materializations.get() + 1);
                tracing::trace!(
                    kind = %inner.kind(),
                    len = inner.len(),
                    reads = trace.reads(),
                    "materializing traced view"
                );
                inner.fill()
            }
        }
    }

    /// Counters, if this is a traced view.
    pub fn trace(&self) -> Option<&ViewTrace> {
        match self {
            View::Traced { trace, .. } => Some(trace),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests;
