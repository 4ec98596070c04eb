//! Runtime values.
//!
//! # Heap Enforcement
//!
//! Vector storage and metadata live behind `Heap<T>`, whose constructor is
//! crate-private. Values are built with factory methods:
//!
//! ```text
//! let x = Value::integer(vec![1, 2, 3]);   // OK
//! let r = Value::sequence(10, 1, -1);      // OK, lazy
//! let v = Value::Integer(Vector::from_vec(...)); // OK, Vector is the public unit
//! ```
//!
//! Every non-null value is a vector: `size()` elements of one kind. A closure
//! counts as a single element and coerces to nothing.

use vela_ir::Name;

use crate::element::{Complex, Element, Logical, RStr, Scalar};
use crate::errors::{unsupported_operand_type, EvalError};
use crate::frame::{FrameEdge, FrameRef};
use crate::function::{BuiltinFunction, Closure};
use crate::kind::common_kind;
use crate::metadata::Metadata;
use crate::view::{View, ViewTrace};
use crate::{Kind, Vector};

/// Runtime value.
#[derive(Clone, Debug)]
pub enum Value {
    Null,
    Logical(Vector<Logical>),
    Integer(Vector<i32>),
    Double(Vector<f64>),
    Complex(Vector<Complex>),
    String(Vector<RStr>),
    Raw(Vector<u8>),
    List(Vector<Value>),
    Closure(Closure),
    /// A builtin function; same kind as a closure.
    Builtin(BuiltinFunction),
}

/// Apply `$body` to the vector inside any vector variant, re-wrapping the
/// result in the same variant. `Null` and functions pass through unchanged.
macro_rules! map_vector {
    ($value:expr, $v:ident => $body:expr) => {
        match $value {
            Value::Logical($v) => Value::Logical($body),
            Value::Integer($v) => Value::Integer($body),
            Value::Double($v) => Value::Double($body),
            Value::Complex($v) => Value::Complex($body),
            Value::String($v) => Value::String($body),
            Value::Raw($v) => Value::Raw($body),
            Value::List($v) => Value::List($body),
            other @ (Value::Null | Value::Closure(_) | Value::Builtin(_)) => other.clone(),
        }
    };
}

impl Value {
    // Factories

    pub fn logical(data: Vec<Logical>) -> Self {
        Value::Logical(Vector::from_vec(data))
    }

    pub fn integer(data: Vec<i32>) -> Self {
        Value::Integer(Vector::from_vec(data))
    }

    pub fn double(data: Vec<f64>) -> Self {
        Value::Double(Vector::from_vec(data))
    }

    pub fn complex(data: Vec<Complex>) -> Self {
        Value::Complex(Vector::from_vec(data))
    }

    pub fn string(data: Vec<RStr>) -> Self {
        Value::String(Vector::from_vec(data))
    }

    pub fn raw(data: Vec<u8>) -> Self {
        Value::Raw(Vector::from_vec(data))
    }

    pub fn list(data: Vec<Value>) -> Self {
        Value::List(Vector::from_vec(data))
    }

    /// List whose elements carry names (`None` becomes the empty name).
    pub fn named_list(entries: Vec<(Option<Name>, Value)>) -> Self {
        let (names, values): (Vec<_>, Vec<_>) = entries
            .into_iter()
            .map(|(name, value)| (name.map_or_else(|| RStr::new(""), RStr::from_name), value))
            .unzip();
        Value::List(Vector::from_vec(values).with_names(names))
    }

    /// Scalar logical.
    pub fn lgl(value: bool) -> Self {
        Value::logical(vec![Logical::from_bool(value)])
    }

    /// Scalar integer.
    pub fn int(value: i32) -> Self {
        Value::integer(vec![value])
    }

    /// Scalar double.
    pub fn dbl(value: f64) -> Self {
        Value::double(vec![value])
    }

    /// Scalar string.
    pub fn str(text: &str) -> Self {
        Value::string(vec![RStr::new(text)])
    }

    /// Lazy integer sequence `from, from + step, ...` up to `to`.
    pub fn sequence(from: i32, to: i32, step: i32) -> Self {
        Value::Integer(Vector::from_view(View::sequence(from, to, step)))
    }

    /// Lazy integer range `1..=to`.
    pub fn simple_range(to: i32) -> Self {
        Value::Integer(Vector::from_view(View::simple_range(to)))
    }

    pub fn closure(closure: Closure) -> Self {
        Value::Closure(closure)
    }

    /// Length-`len` vector of `kind` filled with zeros (`NULL` for lists).
    pub fn zeroed(kind: Kind, len: usize) -> Self {
        match kind {
            Kind::Logical => Value::Logical(Vector::zeroed(len)),
            Kind::Integer => Value::Integer(Vector::zeroed(len)),
            Kind::Double => Value::Double(Vector::zeroed(len)),
            Kind::Complex => Value::Complex(Vector::zeroed(len)),
            Kind::String => Value::String(Vector::zeroed(len)),
            Kind::Raw => Value::Raw(Vector::zeroed(len)),
            Kind::List => Value::List(Vector::zeroed(len)),
            Kind::Null | Kind::Closure => Value::Null,
        }
    }

    // Shape

    pub fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Null,
            Value::Logical(_) => Kind::Logical,
            Value::Integer(_) => Kind::Integer,
            Value::Double(_) => Kind::Double,
            Value::Complex(_) => Kind::Complex,
            Value::String(_) => Kind::String,
            Value::Raw(_) => Kind::Raw,
            Value::List(_) => Kind::List,
            Value::Closure(_) | Value::Builtin(_) => Kind::Closure,
        }
    }

    /// R `typeof` name.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Builtin(_) => "builtin",
            other => other.kind().name(),
        }
    }

    pub fn size(&self) -> usize {
        match self {
            Value::Null => 0,
            Value::Logical(v) => v.len(),
            Value::Integer(v) => v.len(),
            Value::Double(v) => v.len(),
            Value::Complex(v) => v.len(),
            Value::String(v) => v.len(),
            Value::Raw(v) => v.len(),
            Value::List(v) => v.len(),
            Value::Closure(_) | Value::Builtin(_) => 1,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Value::Closure(_) | Value::Builtin(_))
    }

    /// Element `index` in this value's own kind. Out-of-range access panics.
    pub fn get(&self, index: usize) -> Scalar {
        match self {
            Value::Null => panic!("index {index} out of range for NULL"),
            Value::Logical(v) => Scalar::Logical(v.get(index)),
            Value::Integer(v) => Scalar::Integer(v.get(index)),
            Value::Double(v) => Scalar::Double(v.get(index)),
            Value::Complex(v) => Scalar::Complex(v.get(index)),
            Value::String(v) => Scalar::Str(v.get(index)),
            Value::Raw(v) => Scalar::Raw(v.get(index)),
            Value::List(v) => Scalar::Value(v.get(index)),
            Value::Closure(_) | Value::Builtin(_) => {
                assert_eq!(index, 0, "index {index} out of range for a function");
                Scalar::Value(self.clone())
            }
        }
    }

    /// Whether element `index` is missing.
    pub fn is_na_at(&self, index: usize) -> bool {
        self.get(index).is_na()
    }

    /// Element names, if any.
    pub fn names(&self) -> Option<&[RStr]> {
        self.metadata().and_then(Metadata::names)
    }

    pub fn metadata(&self) -> Option<&Metadata> {
        match self {
            Value::Logical(v) => v.metadata(),
            Value::Integer(v) => v.metadata(),
            Value::Double(v) => v.metadata(),
            Value::Complex(v) => v.metadata(),
            Value::String(v) => v.metadata(),
            Value::Raw(v) => v.metadata(),
            Value::List(v) => v.metadata(),
            Value::Null | Value::Closure(_) | Value::Builtin(_) => None,
        }
    }

    /// Visit the environment of every closure reachable from this value.
    ///
    /// Closures inside shared list storage or attributes are reported as
    /// [`FrameEdge::Shared`]: other holders of that storage are invisible
    /// from here.
    pub fn for_each_frame(&self, visit: &mut dyn FnMut(&FrameRef, FrameEdge)) {
        self.walk_frames(FrameEdge::Owned, visit);
    }

    fn walk_frames(&self, edge: FrameEdge, visit: &mut dyn FnMut(&FrameRef, FrameEdge)) {
        match self {
            Value::Closure(closure) => visit(closure.env(), edge),
            Value::List(items) => {
                let edge = if items.has_shared_storage() {
                    FrameEdge::Shared
                } else {
                    edge
                };
                for item in items.iter() {
                    item.walk_frames(edge, visit);
                }
            }
            _ => {}
        }
        if let Some(meta) = self.metadata() {
            for (_, value) in meta.attributes() {
                value.walk_frames(FrameEdge::Shared, visit);
            }
        }
    }

    pub fn is_view(&self) -> bool {
        match self {
            Value::Logical(v) => v.is_view(),
            Value::Integer(v) => v.is_view(),
            Value::Double(v) => v.is_view(),
            Value::Complex(v) => v.is_view(),
            Value::String(v) => v.is_view(),
            Value::Raw(v) => v.is_view(),
            Value::List(v) => v.is_view(),
            Value::Null | Value::Closure(_) | Value::Builtin(_) => false,
        }
    }

    // Coercion

    /// Lazy view of this value's elements as `T`.
    ///
    /// Same kind returns the vector itself; `NULL` gives an empty vector.
    /// Functions are not coercible.
    pub fn as_vector<T: Element>(&self) -> Result<Vector<T>, EvalError> {
        if let Some(v) = T::vector_of(self) {
            return Ok(v.clone());
        }
        match self {
            Value::Null => Ok(Vector::from_vec(Vec::new())),
            Value::Closure(_) | Value::Builtin(_) => Err(unsupported_operand_type(
                &format!("as.{}", T::KIND.name()),
                self.type_name(),
            )),
            Value::Logical(v) => Ok(v.coerce()),
            Value::Integer(v) => Ok(v.coerce()),
            Value::Double(v) => Ok(v.coerce()),
            Value::Complex(v) => Ok(v.coerce()),
            Value::String(v) => Ok(v.coerce()),
            Value::Raw(v) => Ok(v.coerce()),
            Value::List(v) => Ok(v.coerce()),
        }
    }

    pub fn as_logical(&self) -> Result<Vector<Logical>, EvalError> {
        self.as_vector()
    }

    pub fn as_integer(&self) -> Result<Vector<i32>, EvalError> {
        self.as_vector()
    }

    pub fn as_double(&self) -> Result<Vector<f64>, EvalError> {
        self.as_vector()
    }

    pub fn as_complex(&self) -> Result<Vector<Complex>, EvalError> {
        self.as_vector()
    }

    pub fn as_string(&self) -> Result<Vector<RStr>, EvalError> {
        self.as_vector()
    }

    pub fn as_raw(&self) -> Result<Vector<u8>, EvalError> {
        self.as_vector()
    }

    pub fn as_list(&self) -> Result<Vector<Value>, EvalError> {
        self.as_vector()
    }

    /// Lazy coercion to `kind`.
    pub fn coerce_to(&self, kind: Kind) -> Result<Value, EvalError> {
        Ok(match kind {
            Kind::Null => Value::Null,
            Kind::Logical => Value::Logical(self.as_vector()?),
            Kind::Integer => Value::Integer(self.as_vector()?),
            Kind::Double => Value::Double(self.as_vector()?),
            Kind::Complex => Value::Complex(self.as_vector()?),
            Kind::String => Value::String(self.as_vector()?),
            Kind::Raw => Value::Raw(self.as_vector()?),
            Kind::List => Value::List(self.as_vector()?),
            Kind::Closure if self.is_function() => self.clone(),
            Kind::Closure => {
                return Err(unsupported_operand_type("as.function", self.type_name()));
            }
        })
    }

    // Materialization and mutation

    /// Concrete equivalent. Idempotent; already concrete values share storage.
    #[must_use]
    pub fn materialize(&self) -> Value {
        map_vector!(self, v => v.materialize())
    }

    /// Replace element `index` with `element`.
    ///
    /// If the element's kind ranks above this vector's kind, the vector is
    /// first promoted to the common kind. Lists accept any element.
    pub fn set(&mut self, index: usize, element: Scalar) -> Result<(), EvalError> {
        let target = match self {
            Value::Closure(_) | Value::Builtin(_) => {
                return Err(unsupported_operand_type("[<-", self.type_name()));
            }
            Value::List(_) => Kind::List,
            _ if matches!(element, Scalar::Value(_)) => Kind::List,
            _ => common_kind(self.kind(), element.kind())
                .ok_or_else(|| unsupported_operand_type("[<-", element_description(&element)))?,
        };
        if target != self.kind() {
            *self = self.coerce_to(target)?.materialize();
        }
        match self {
            Value::Logical(v) => v.set(index, Logical::from_scalar(&element)),
            Value::Integer(v) => v.set(index, i32::from_scalar(&element)),
            Value::Double(v) => v.set(index, f64::from_scalar(&element)),
            Value::Complex(v) => v.set(index, Complex::from_scalar(&element)),
            Value::String(v) => v.set(index, RStr::from_scalar(&element)),
            Value::Raw(v) => v.set(index, u8::from_scalar(&element)),
            Value::List(v) => v.set(index, Value::from_scalar(&element)),
            Value::Null | Value::Closure(_) | Value::Builtin(_) => {
                panic!("index {index} out of range for {}", self.type_name())
            }
        }
        Ok(())
    }

    /// Drop dimensions, names and attributes. Shares element storage.
    #[must_use]
    pub fn strip(&self) -> Value {
        map_vector!(self, v => v.strip())
    }

    /// Drop dimensions and attributes, keep names. Shares element storage.
    #[must_use]
    pub fn strip_keep_names(&self) -> Value {
        map_vector!(self, v => v.strip_keep_names())
    }

    /// Wrap lazy storage in a counting view.
    #[must_use]
    pub fn traced(self) -> Value {
        map_vector!(&self, v => v.clone().traced())
    }

    /// Counters of a traced view.
    pub fn view_trace(&self) -> Option<&ViewTrace> {
        match self {
            Value::Logical(v) => v.view_trace(),
            Value::Integer(v) => v.view_trace(),
            Value::Double(v) => v.view_trace(),
            Value::Complex(v) => v.view_trace(),
            Value::String(v) => v.view_trace(),
            Value::Raw(v) => v.view_trace(),
            Value::List(v) => v.view_trace(),
            Value::Null | Value::Closure(_) | Value::Builtin(_) => None,
        }
    }

    // Rendering

    /// Source-like rendering: `NULL`, `1`, `c(1, 2)`, `list(1, "a")`.
    pub fn deparse(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Closure(c) => format!("function: {}", c.name()),
            Value::Builtin(b) => format!("builtin: {}", b.name),
            Value::List(v) => {
                let mut out = String::from("list(");
                for (i, item) in v.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    out.push_str(&item.deparse());
                }
                out.push(')');
                out
            }
            atomic => {
                let elements: Vec<String> = (0..atomic.size())
                    .map(|i| deparse_element(&atomic.get(i)))
                    .collect();
                match elements.as_slice() {
                    [] => format!("{}(0)", atomic.type_name()),
                    [single] => single.clone(),
                    _ => {
                        let mut out = String::from("c(");
                        for (i, e) in elements.iter().enumerate() {
                            if i > 0 {
                                out.push_str(", ");
                            }
                            out.push_str(e);
                        }
                        out.push(')');
                        out
                    }
                }
            }
        }
    }
}

fn deparse_element(scalar: &Scalar) -> String {
    match scalar {
        Scalar::Str(s) => match s.as_str() {
            Some(text) => format!("{text:?}"),
            None => "NA".to_string(),
        },
        other => RStr::from_scalar(other).as_str().unwrap_or("NA").to_string(),
    }
}

fn element_description(scalar: &Scalar) -> &'static str {
    match scalar {
        Scalar::Value(v) => v.type_name(),
        other => other.kind().name(),
    }
}

#[cfg(test)]
mod tests;
