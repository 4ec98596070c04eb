//! Activation frames.
//!
//! A frame is a slot array laid out by its function's write set, plus a link
//! to the lexically enclosing frame. Frames live as long as their activation
//! or any closure that captured them.
//!
//! A closure stored in a slot of its own defining frame forms a reference
//! cycle. [`collect_cycles`] breaks the cycles among a set of frames that
//! nothing outside the set can reach.

// Rc is the intentional implementation detail of FrameRef
#![expect(
    clippy::disallowed_types,
    reason = "Rc is the implementation of FrameRef"
)]

use std::cell::RefCell;
use std::collections::hash_map::Entry;
use std::fmt;
use std::rc::{Rc, Weak};

use rustc_hash::FxHashMap;
use vela_ir::Name;

use crate::element::RStr;
use crate::function::FunctionDescriptor;
use crate::signature::ArgumentBinding;
use crate::{Heap, Value, Vector};

/// Slot storage of one activation.
pub struct Frame {
    descriptor: Heap<FunctionDescriptor>,
    slots: Vec<Option<Value>>,
    parent: Option<FrameRef>,
}

impl Frame {
    /// Empty frame sized to `descriptor`'s write set.
    pub fn new(descriptor: Heap<FunctionDescriptor>, parent: Option<FrameRef>) -> Self {
        let slots = vec![None; descriptor.frame_size()];
        Frame {
            descriptor,
            slots,
            parent,
        }
    }
}

/// Shared, mutable handle to a frame.
///
/// `#[repr(transparent)]` keeps the layout identical to `Rc<RefCell<Frame>>`.
#[repr(transparent)]
#[derive(Clone)]
pub struct FrameRef(Rc<RefCell<Frame>>);

/// How a frame handle was reached while walking values.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FrameEdge {
    /// Held by exactly one strong reference owned by the walked value.
    Owned,
    /// Held through storage that other values may also reference.
    Shared,
}

/// Non-owning frame handle.
#[derive(Clone)]
pub struct WeakFrameRef(Weak<RefCell<Frame>>);

impl FrameRef {
    pub fn new(frame: Frame) -> Self {
        FrameRef(Rc::new(RefCell::new(frame)))
    }

    /// Root frame for a top-level descriptor.
    pub fn root(descriptor: Heap<FunctionDescriptor>) -> Self {
        Self::new(Frame::new(descriptor, None))
    }

    /// Frame for a call: bound actuals placed in parameter slots, the
    /// varargs slot holding a list of the absorbed actuals.
    ///
    /// `actuals` and `actual_names` are indexed like the call's actuals.
    /// Parameters without an actual stay unbound; the caller fills defaults.
    pub fn make_call(
        descriptor: &Heap<FunctionDescriptor>,
        binding: &ArgumentBinding,
        actuals: Vec<Value>,
        actual_names: &[Option<Name>],
        parent: FrameRef,
    ) -> FrameRef {
        let mut frame = Frame::new(descriptor.clone(), Some(parent));
        let mut actuals: Vec<Option<Value>> = actuals.into_iter().map(Some).collect();
        let formals = descriptor.formals();

        for index in 0..formals.len() {
            if formals.dots_index() == Some(index) {
                frame.slots[index] = Some(dots_list(binding.dots(), &mut actuals, actual_names));
            } else if let Some(actual) = binding.actual_for(index) {
                frame.slots[index] = actuals[actual].take();
            }
        }
        FrameRef::new(frame)
    }

    pub fn descriptor(&self) -> Heap<FunctionDescriptor> {
        self.0.borrow().descriptor.clone()
    }

    pub fn parent(&self) -> Option<FrameRef> {
        self.0.borrow().parent.clone()
    }

    /// The frame `hops` lexical levels up (0 is this frame).
    pub fn ancestor(&self, hops: u32) -> Option<FrameRef> {
        let mut frame = self.clone();
        for _ in 0..hops {
            frame = frame.parent()?;
        }
        Some(frame)
    }

    pub fn get(&self, slot: u32) -> Option<Value> {
        self.0.borrow().slots.get(slot as usize).cloned().flatten()
    }

    pub fn is_bound(&self, slot: u32) -> bool {
        matches!(self.0.borrow().slots.get(slot as usize), Some(Some(_)))
    }

    pub fn set(&self, slot: u32, value: Value) {
        self.0.borrow_mut().slots[slot as usize] = Some(value);
    }

    pub fn size(&self) -> usize {
        self.0.borrow().slots.len()
    }

    /// Drop all slot values and the parent link.
    pub fn clear(&self) {
        let (slots, parent) = {
            let mut frame = self.0.borrow_mut();
            (std::mem::take(&mut frame.slots), frame.parent.take())
        };
        // Values are dropped outside the borrow; they may own this frame.
        drop(slots);
        drop(parent);
    }

    /// Visit the frames this frame keeps alive: its parent and the
    /// environments of closures in its slots.
    pub fn for_each_held(&self, visit: &mut dyn FnMut(&FrameRef, FrameEdge)) {
        let frame = self.0.borrow();
        if let Some(parent) = &frame.parent {
            visit(parent, FrameEdge::Owned);
        }
        for value in frame.slots.iter().flatten() {
            value.for_each_frame(visit);
        }
    }

    pub fn strong_count(&self) -> usize {
        Rc::strong_count(&self.0)
    }

    fn key(&self) -> *const RefCell<Frame> {
        Rc::as_ptr(&self.0)
    }

    pub fn downgrade(&self) -> WeakFrameRef {
        WeakFrameRef(Rc::downgrade(&self.0))
    }

    pub fn ptr_eq(a: &FrameRef, b: &FrameRef) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }
}

impl WeakFrameRef {
    pub fn upgrade(&self) -> Option<FrameRef> {
        self.0.upgrade().map(FrameRef)
    }
}

/// Clear the frames in `frames` that only `frames` and `owned` keep alive.
///
/// Both are about to be released by their holder. A frame with more strong
/// references than the walk finds inside them is held from elsewhere; it and
/// every frame it reaches are left intact. Returns the number of frames
/// cleared.
pub fn collect_cycles<'v>(
    frames: impl IntoIterator<Item = FrameRef>,
    owned: impl IntoIterator<Item = &'v Value>,
) -> usize {
    let mut index: FxHashMap<*const RefCell<Frame>, usize> = FxHashMap::default();
    let mut unique = Vec::new();
    for frame in frames {
        if let Entry::Vacant(entry) = index.entry(frame.key()) {
            entry.insert(unique.len());
            unique.push(frame);
        }
    }

    // `unique` itself holds one reference to each frame.
    let mut internal = vec![1usize; unique.len()];
    let mut pinned = vec![false; unique.len()];
    {
        let mut count = |held: &FrameRef, edge: FrameEdge| {
            if let Some(&i) = index.get(&held.key()) {
                match edge {
                    FrameEdge::Owned => internal[i] += 1,
                    FrameEdge::Shared => pinned[i] = true,
                }
            }
        };
        for frame in &unique {
            frame.for_each_held(&mut count);
        }
        for value in owned {
            value.for_each_frame(&mut count);
        }
    }

    let mut reachable: Vec<bool> = unique
        .iter()
        .enumerate()
        .map(|(i, frame)| pinned[i] || frame.strong_count() > internal[i])
        .collect();
    let mut pending: Vec<usize> = (0..unique.len()).filter(|&i| reachable[i]).collect();
    while let Some(i) = pending.pop() {
        unique[i].for_each_held(&mut |held, _| {
            if let Some(&j) = index.get(&held.key()) {
                if !reachable[j] {
                    reachable[j] = true;
                    pending.push(j);
                }
            }
        });
    }

    let mut cleared = 0;
    for (frame, keep) in unique.iter().zip(&reachable) {
        if !keep {
            frame.clear();
            cleared += 1;
        }
    }
    cleared
}

fn dots_list(absorbed: &[usize], actuals: &mut [Option<Value>], names: &[Option<Name>]) -> Value {
    let values: Vec<Value> = absorbed
        .iter()
        .map(|&i| actuals[i].take().unwrap_or(Value::Null))
        .collect();
    let list = Vector::from_vec(values);
    if absorbed.iter().any(|&i| names.get(i).copied().flatten().is_some()) {
        let labels = absorbed
            .iter()
            .map(|&i| names.get(i).copied().flatten().map_or_else(|| RStr::new(""), RStr::from_name))
            .collect();
        Value::List(list.with_names(labels))
    } else {
        Value::List(list)
    }
}

impl fmt::Debug for FrameRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(frame) => write!(
                f,
                "Frame({}, {} slots)",
                frame.descriptor.name(),
                frame.slots.len()
            ),
            Err(_) => f.write_str("Frame(<borrowed>)"),
        }
    }
}

#[cfg(test)]
mod tests;
