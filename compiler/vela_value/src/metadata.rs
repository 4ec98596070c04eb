//! Vector metadata: dimensions, names and attributes.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use vela_ir::Name;

use crate::element::RStr;
use crate::Value;

/// Optional structure attached to a vector.
///
/// Length constraints are checked against the owning vector whenever the
/// metadata is attached; a violation is a defect and panics.
#[derive(Clone, Debug, Default)]
pub struct Metadata {
    dims: Option<SmallVec<[usize; 2]>>,
    names: Option<Vec<RStr>>,
    attributes: FxHashMap<Name, Value>,
}

impl Metadata {
    pub fn dims(&self) -> Option<&[usize]> {
        self.dims.as_deref()
    }

    pub fn names(&self) -> Option<&[RStr]> {
        self.names.as_deref()
    }

    pub fn attribute(&self, name: Name) -> Option<&Value> {
        self.attributes.get(&name)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (Name, &Value)> {
        self.attributes.iter().map(|(k, v)| (*k, v))
    }

    pub(crate) fn set_dims(&mut self, len: usize, dims: &[usize]) {
        assert!(
            dims.iter().all(|&d| d > 0),
            "dimensions must be positive: {dims:?}"
        );
        let product: usize = dims.iter().product();
        assert_eq!(product, len, "dimensions {dims:?} do not match length {len}");
        self.dims = Some(SmallVec::from_slice(dims));
    }

    pub(crate) fn set_names(&mut self, len: usize, names: Vec<RStr>) {
        assert_eq!(names.len(), len, "names length does not match vector length");
        self.names = Some(names);
    }

    pub(crate) fn set_attribute(&mut self, name: Name, value: Value) {
        self.attributes.insert(name, value);
    }

    /// Metadata keeping only the names.
    pub(crate) fn names_only(&self) -> Option<Metadata> {
        self.names.as_ref().map(|names| Metadata {
            names: Some(names.clone()),
            ..Metadata::default()
        })
    }

    pub fn is_empty(&self) -> bool {
        self.dims.is_none() && self.names.is_none() && self.attributes.is_empty()
    }
}
