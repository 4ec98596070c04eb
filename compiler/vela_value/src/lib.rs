//! Vela values: vectors, lazy views, the coercion lattice and frames.
//!
//! # Layout
//!
//! - `element`: per-kind element types and the coercion table
//! - `kind`: element kinds and the `(Kind, Kind)` lattice
//! - `view` / `vector`: lazy and concrete vector storage
//! - `value`: the tagged `Value` union
//! - `signature`: formal parameter lists and argument bindings
//! - `function` / `frame`: descriptors, closures and activation frames
//! - `errors`: `EvalError` and its factory functions
//!
//! Everything here is single-threaded; shared ownership goes through
//! `Heap<T>` and `FrameRef`.

mod element;
pub mod errors;
mod frame;
mod function;
mod heap;
mod kind;
mod metadata;
mod signature;
mod value;
mod vector;
mod view;

pub use element::{
    format_double, is_na_double, na_double, Complex, Element, Logical, RStr, Scalar,
    NA_DOUBLE_BITS, NA_INTEGER,
};
pub use errors::{EvalBacktrace, EvalError, EvalErrorKind, EvalNote, EvalResult, BacktraceFrame};
pub use frame::{collect_cycles, Frame, FrameEdge, FrameRef, WeakFrameRef};
pub use function::{BuiltinFunction, Closure, DescriptorParts, EnclosingSlot, FunctionDescriptor, Resolution};
pub use heap::Heap;
pub use kind::{common_kind, common_kind_of, membership_kind, Kind};
pub use metadata::Metadata;
pub use signature::{ArgumentBinding, FormalParameters};
pub use value::Value;
pub use vector::Vector;
pub use view::{View, ViewTrace};
