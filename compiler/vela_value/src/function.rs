//! Function descriptors, closures and builtin handles.
//!
//! A `FunctionDescriptor` is the static layout of one function literal,
//! computed once by the scope resolver and never mutated afterwards. A
//! `Closure` pairs a descriptor with the frame that was active when the
//! function literal was evaluated.

use std::fmt;

use rustc_hash::FxHashMap;

use vela_ir::{ExprId, Name, Span};

use crate::frame::FrameRef;
use crate::signature::FormalParameters;
use crate::Heap;

/// Lexical address of a free variable: walk `hops` parent links, read `slot`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct EnclosingSlot {
    pub symbol: Name,
    pub hops: u32,
    pub slot: u32,
}

/// How a symbol occurrence inside a function is looked up.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Resolution {
    /// Slot in the current frame. `outer` is where the symbol resolves if the
    /// slot has not been assigned yet.
    Local {
        slot: u32,
        outer: Option<EnclosingSlot>,
    },
    Enclosing(EnclosingSlot),
    /// Not defined in any enclosing scope; looked up by name at run time.
    Global,
}

/// Static layout of a function literal.
pub struct FunctionDescriptor {
    name: Name,
    expr: ExprId,
    span: Span,
    formals: FormalParameters,
    defaults: Vec<Option<ExprId>>,
    body: ExprId,
    write_set: Vec<Name>,
    slots: FxHashMap<Name, u32>,
    read_set: Vec<Name>,
    enclosing_slots: Vec<EnclosingSlot>,
    reads: FxHashMap<Name, Resolution>,
    super_assigns: FxHashMap<Name, Resolution>,
}

/// Inputs to [`FunctionDescriptor::new`], produced by the scope resolver.
pub struct DescriptorParts {
    pub name: Name,
    pub expr: ExprId,
    pub span: Span,
    /// Parameters in declaration order, with their default expressions.
    pub params: Vec<(Name, Option<ExprId>)>,
    pub body: ExprId,
    /// Local write set: the parameters first, then `<-` targets in
    /// first-occurrence order.
    pub write_set: Vec<Name>,
    /// Every symbol read in the body, in first-occurrence order.
    pub reads: Vec<(Name, Resolution)>,
    /// Targets of `<<-` in the body.
    pub super_assigns: Vec<(Name, Resolution)>,
}

impl FunctionDescriptor {
    pub fn new(parts: DescriptorParts) -> Self {
        let DescriptorParts {
            name,
            expr,
            span,
            params,
            body,
            write_set,
            reads,
            super_assigns,
        } = parts;

        assert!(
            params.iter().zip(&write_set).all(|((p, _), w)| p == w) && write_set.len() >= params.len(),
            "parameters must lead the write set of {name}"
        );

        let param_names: Vec<Name> = params.iter().map(|(n, _)| *n).collect();
        let required: Vec<Name> = params
            .iter()
            .filter(|(n, default)| default.is_none() && !n.is_dots())
            .map(|(n, _)| *n)
            .collect();
        let formals = FormalParameters::new(name, &param_names, &required);
        let defaults = params.into_iter().map(|(_, d)| d).collect();

        let slots = write_set
            .iter()
            .enumerate()
            .map(|(i, n)| (*n, i as u32))
            .collect();
        let read_set = reads
            .iter()
            .filter(|(_, r)| !matches!(r, Resolution::Local { .. }))
            .map(|(n, _)| *n)
            .collect();
        let enclosing_slots = reads
            .iter()
            .filter_map(|(_, r)| match r {
                Resolution::Enclosing(slot) => Some(*slot),
                _ => None,
            })
            .collect();

        FunctionDescriptor {
            name,
            expr,
            span,
            formals,
            defaults,
            body,
            write_set,
            slots,
            read_set,
            enclosing_slots,
            reads: reads.into_iter().collect(),
            super_assigns: super_assigns.into_iter().collect(),
        }
    }

    /// Move into shared storage for use by closures and frames.
    pub fn into_shared(self) -> Heap<FunctionDescriptor> {
        Heap::new(self)
    }

    /// Name used in error messages (`<anonymous>` when unassigned).
    pub fn name(&self) -> Name {
        self.name
    }

    /// The function literal this descriptor was built from.
    pub fn expr(&self) -> ExprId {
        self.expr
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn formals(&self) -> &FormalParameters {
        &self.formals
    }

    pub fn default_for(&self, param: usize) -> Option<ExprId> {
        self.defaults[param]
    }

    pub fn param_count(&self) -> usize {
        self.defaults.len()
    }

    pub fn body(&self) -> ExprId {
        self.body
    }

    /// Frame slot layout.
    pub fn write_set(&self) -> &[Name] {
        &self.write_set
    }

    /// Symbols read that are not locals.
    pub fn read_set(&self) -> &[Name] {
        &self.read_set
    }

    /// Free symbols defined in an enclosing function.
    pub fn enclosing_slots(&self) -> &[EnclosingSlot] {
        &self.enclosing_slots
    }

    pub fn frame_size(&self) -> usize {
        self.write_set.len()
    }

    pub fn slot_of(&self, name: Name) -> Option<u32> {
        self.slots.get(&name).copied()
    }

    /// Resolution of a symbol read in this function's body.
    pub fn resolve_read(&self, name: Name) -> Option<Resolution> {
        self.reads.get(&name).copied()
    }

    /// Resolution of a `<<-` target in this function's body.
    pub fn resolve_super_assign(&self, name: Name) -> Option<Resolution> {
        self.super_assigns.get(&name).copied()
    }
}

impl fmt::Debug for FunctionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionDescriptor")
            .field("name", &self.name)
            .field("write_set", &self.write_set)
            .field("read_set", &self.read_set)
            .field("enclosing_slots", &self.enclosing_slots)
            .finish_non_exhaustive()
    }
}

/// A function value: descriptor plus captured frame.
#[derive(Clone)]
pub struct Closure {
    descriptor: Heap<FunctionDescriptor>,
    env: FrameRef,
}

impl Closure {
    pub fn new(descriptor: Heap<FunctionDescriptor>, env: FrameRef) -> Self {
        Closure { descriptor, env }
    }

    pub fn descriptor(&self) -> &Heap<FunctionDescriptor> {
        &self.descriptor
    }

    /// The frame captured when the closure was created.
    pub fn env(&self) -> &FrameRef {
        &self.env
    }

    pub fn name(&self) -> Name {
        self.descriptor.name()
    }
}

impl fmt::Debug for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Closure({})", self.descriptor.name())
    }
}

/// Handle to a builtin registered with an interpreter.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BuiltinFunction {
    pub name: Name,
    pub index: u32,
}
