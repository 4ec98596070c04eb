//! Typed vectors with concrete or lazy storage.

use std::fmt;

use vela_ir::Name;

use crate::element::{Element, RStr};
use crate::metadata::Metadata;
use crate::view::{View, ViewTrace};
use crate::{Heap, Value};

enum Storage<T> {
    Concrete(Heap<Vec<T>>),
    View(Heap<View>),
}

impl<T> Clone for Storage<T> {
    fn clone(&self) -> Self {
        match self {
            Storage::Concrete(data) => Storage::Concrete(data.clone()),
            Storage::View(view) => Storage::View(view.clone()),
        }
    }
}

/// A vector of one element type plus optional metadata.
///
/// Cloning is cheap: storage and metadata are shared. Writes through
/// [`Vector::set`] materialize a view and copy shared storage first.
pub struct Vector<T> {
    storage: Storage<T>,
    meta: Option<Heap<Metadata>>,
}

impl<T> Clone for Vector<T> {
    fn clone(&self) -> Self {
        Vector {
            storage: self.storage.clone(),
            meta: self.meta.clone(),
        }
    }
}

impl<T: Element> Vector<T> {
    pub fn from_vec(data: Vec<T>) -> Self {
        Vector {
            storage: Storage::Concrete(Heap::new(data)),
            meta: None,
        }
    }

    pub(crate) fn from_view(view: View) -> Self {
        debug_assert_eq!(view.kind(), T::KIND);
        Vector {
            storage: Storage::View(Heap::new(view)),
            meta: None,
        }
    }

    /// Vector of `len` fill elements.
    pub fn zeroed(len: usize) -> Self {
        Self::from_vec(vec![T::zero(); len])
    }

    pub fn len(&self) -> usize {
        match &self.storage {
            Storage::Concrete(data) => data.len(),
            Storage::View(view) => view.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element at `index`. Out-of-range access panics.
    pub fn get(&self, index: usize) -> T {
        let len = self.len();
        assert!(index < len, "index {index} out of range for length {len}");
        match &self.storage {
            Storage::Concrete(data) => data[index].clone(),
            Storage::View(view) => T::from_scalar(&view.scalar_at(index)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        (0..self.len()).map(move |i| self.get(i))
    }

    pub fn to_vec(&self) -> Vec<T> {
        match &self.storage {
            Storage::Concrete(data) => data.to_vec(),
            Storage::View(view) => view.fill(),
        }
    }

    pub fn is_view(&self) -> bool {
        matches!(self.storage, Storage::View(_))
    }

    /// Concrete equivalent of this vector.
    ///
    /// A concrete vector returns a handle to the same storage, so repeated
    /// materialization allocates nothing.
    pub fn materialize(&self) -> Vector<T> {
        match &self.storage {
            Storage::Concrete(_) => self.clone(),
            Storage::View(view) => Vector {
                storage: Storage::Concrete(Heap::new(view.fill())),
                meta: self.meta.clone(),
            },
        }
    }

    /// Replace element `index`.
    ///
    /// Views are materialized and shared storage is copied first; an
    /// exclusively owned concrete vector is written in place.
    pub fn set(&mut self, index: usize, element: T) {
        let len = self.len();
        assert!(index < len, "index {index} out of range for length {len}");
        if let Storage::View(view) = &self.storage {
            let data: Vec<T> = view.fill();
            self.storage = Storage::Concrete(Heap::new(data));
        }
        if let Storage::Concrete(data) = &mut self.storage {
            data.make_mut()[index] = element;
        }
    }

    /// Whether both vectors read from the same storage.
    pub fn shares_storage_with(&self, other: &Vector<T>) -> bool {
        match (&self.storage, &other.storage) {
            (Storage::Concrete(a), Storage::Concrete(b)) => Heap::ptr_eq(a, b),
            (Storage::View(a), Storage::View(b)) => Heap::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Whether other vectors may read the same elements: views and shared
    /// concrete buffers.
    pub(crate) fn has_shared_storage(&self) -> bool {
        match &self.storage {
            Storage::Concrete(data) => data.is_shared(),
            Storage::View(_) => true,
        }
    }

    /// Address of the concrete element buffer, `None` for views.
    pub fn data_ptr(&self) -> Option<*const T> {
        match &self.storage {
            Storage::Concrete(data) => Some(data.as_ptr()),
            Storage::View(_) => None,
        }
    }

    /// Counters of a traced view.
    pub fn view_trace(&self) -> Option<&ViewTrace> {
        match &self.storage {
            Storage::View(view) => view.trace(),
            Storage::Concrete(_) => None,
        }
    }

    /// Wrap a view storage in a counting view. Concrete vectors are unchanged.
    #[must_use]
    pub fn traced(self) -> Self {
        match self.storage {
            Storage::View(view) if view.trace().is_none() => Vector {
                storage: Storage::View(Heap::new(View::traced(view))),
                meta: self.meta,
            },
            storage => Vector {
                storage,
                meta: self.meta,
            },
        }
    }

    /// Lazy view of these elements as element type `U`.
    pub fn coerce<U: Element>(&self) -> Vector<U> {
        let source = T::wrap(self.clone());
        Vector {
            storage: Storage::View(Heap::new(View::Coerce {
                source,
                target: U::KIND,
            })),
            meta: self.meta.clone(),
        }
    }

    // Metadata

    pub fn metadata(&self) -> Option<&Metadata> {
        self.meta.as_deref()
    }

    pub fn names(&self) -> Option<&[RStr]> {
        self.metadata().and_then(Metadata::names)
    }

    pub fn dims(&self) -> Option<&[usize]> {
        self.metadata().and_then(Metadata::dims)
    }

    pub fn attribute(&self, name: Name) -> Option<&Value> {
        self.metadata().and_then(|m| m.attribute(name))
    }

    fn meta_mut(&mut self) -> &mut Metadata {
        self.meta
            .get_or_insert_with(|| Heap::new(Metadata::default()))
            .make_mut()
    }

    #[must_use]
    pub fn with_names(mut self, names: Vec<RStr>) -> Self {
        let len = self.len();
        self.meta_mut().set_names(len, names);
        self
    }

    #[must_use]
    pub fn with_dims(mut self, dims: &[usize]) -> Self {
        let len = self.len();
        self.meta_mut().set_dims(len, dims);
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, name: Name, value: Value) -> Self {
        self.meta_mut().set_attribute(name, value);
        self
    }

    /// Same elements, no metadata. Shares storage.
    pub fn strip(&self) -> Self {
        Vector {
            storage: self.storage.clone(),
            meta: None,
        }
    }

    /// Same elements, keeping only names. Shares storage.
    pub fn strip_keep_names(&self) -> Self {
        Vector {
            storage: self.storage.clone(),
            meta: self
                .metadata()
                .and_then(Metadata::names_only)
                .map(Heap::new),
        }
    }
}

impl<T: Element> FromIterator<T> for Vector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Vector::from_vec(iter.into_iter().collect())
    }
}

impl<T: Element> fmt::Debug for Vector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests;
