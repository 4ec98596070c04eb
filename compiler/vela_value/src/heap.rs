//! Shared, copy-on-write heap storage for values.
//!
//! All reference-counted allocations in this crate go through `Heap<T>`.
//! The constructor is crate-private; other crates obtain heap values through
//! factory methods such as `Value::integer` or `FunctionDescriptor::into_shared`.

// Rc is the intentional implementation detail of Heap<T>
#![expect(
    clippy::disallowed_types,
    reason = "Rc is the implementation of Heap<T>"
)]

use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

/// Single-threaded shared pointer with copy-on-write mutation.
///
/// `#[repr(transparent)]` keeps the layout identical to `Rc<T>`.
#[repr(transparent)]
pub struct Heap<T: ?Sized>(Rc<T>);

impl<T> Heap<T> {
    #[inline]
    pub(crate) fn new(value: T) -> Self {
        Heap(Rc::new(value))
    }
}

impl<T: ?Sized> Heap<T> {
    /// Whether both handles point at the same allocation.
    #[inline]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }

    /// Whether another handle to the same allocation exists.
    #[inline]
    pub fn is_shared(&self) -> bool {
        Rc::strong_count(&self.0) > 1
    }
}

impl<T: Clone> Heap<T> {
    /// Mutable access, cloning the contents first if they are shared.
    #[inline]
    pub(crate) fn make_mut(&mut self) -> &mut T {
        Rc::make_mut(&mut self.0)
    }
}

impl<T: ?Sized> Clone for Heap<T> {
    #[inline]
    fn clone(&self) -> Self {
        Heap(Rc::clone(&self.0))
    }
}

impl<T: ?Sized> Deref for Heap<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: ?Sized + fmt::Debug> fmt::Debug for Heap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}
