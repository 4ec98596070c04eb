//! Formal parameter lists and argument bindings.

use smallvec::SmallVec;

use vela_ir::Name;

/// Ordered formal parameters of a function or builtin.
///
/// Derived arities:
/// - `min_arity`: required parameters before the varargs marker (all
///   required parameters when there is none)
/// - `max_arity`: parameter count, unbounded with a varargs marker
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormalParameters {
    function: Name,
    names: SmallVec<[Name; 4]>,
    required: SmallVec<[bool; 4]>,
    dots: Option<usize>,
    min_arity: usize,
    max_arity: Option<usize>,
}

impl FormalParameters {
    /// Build a formal list for `function`.
    ///
    /// Panics if a name repeats, if a required name is not a parameter, or if
    /// the varargs marker is marked required; these are defects in the
    /// function definition.
    pub fn new(function: Name, names: &[Name], required: &[Name]) -> Self {
        for (i, name) in names.iter().enumerate() {
            assert!(
                !names[..i].contains(name),
                "duplicate formal parameter `{name}` in {function}"
            );
        }
        for name in required {
            assert!(
                names.contains(name),
                "required parameter `{name}` is not a formal of {function}"
            );
            assert!(!name.is_dots(), "varargs marker cannot be required");
        }

        let dots = names.iter().position(|n| n.is_dots());
        let required: SmallVec<[bool; 4]> = names.iter().map(|n| required.contains(n)).collect();
        let before_dots = dots.unwrap_or(names.len());
        let min_arity = required[..before_dots].iter().filter(|r| **r).count();
        let max_arity = if dots.is_some() {
            None
        } else {
            Some(names.len())
        };

        FormalParameters {
            function,
            names: SmallVec::from_slice(names),
            required,
            dots,
            min_arity,
            max_arity,
        }
    }

    /// Name of the function these formals belong to.
    pub fn function(&self) -> Name {
        self.function
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[Name] {
        &self.names
    }

    pub fn name(&self, index: usize) -> Name {
        self.names[index]
    }

    pub fn is_required(&self, index: usize) -> bool {
        self.required[index]
    }

    /// Index of the varargs marker.
    pub fn dots_index(&self) -> Option<usize> {
        self.dots
    }

    pub fn position(&self, name: Name) -> Option<usize> {
        self.names.iter().position(|n| *n == name)
    }

    pub fn min_arity(&self) -> usize {
        self.min_arity
    }

    /// `None` when unbounded.
    pub fn max_arity(&self) -> Option<usize> {
        self.max_arity
    }
}

/// Formal-to-actual mapping for one call site.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArgumentBinding {
    formal_to_actual: Vec<Option<usize>>,
    dots: Vec<usize>,
    unused: Vec<usize>,
}

impl ArgumentBinding {
    pub fn new(formal_to_actual: Vec<Option<usize>>, dots: Vec<usize>, unused: Vec<usize>) -> Self {
        ArgumentBinding {
            formal_to_actual,
            dots,
            unused,
        }
    }

    /// Actual bound to formal `index`. Always `None` for the varargs formal.
    pub fn actual_for(&self, index: usize) -> Option<usize> {
        self.formal_to_actual[index]
    }

    pub fn formal_to_actual(&self) -> &[Option<usize>] {
        &self.formal_to_actual
    }

    /// Actuals absorbed by the varargs formal, in call order.
    pub fn dots(&self) -> &[usize] {
        &self.dots
    }

    /// Actuals that matched no formal.
    pub fn unused(&self) -> &[usize] {
        &self.unused
    }

    /// Whether formal `index` received anything.
    pub fn is_bound(&self, formals: &FormalParameters, index: usize) -> bool {
        if formals.dots_index() == Some(index) {
            !self.dots.is_empty()
        } else {
            self.formal_to_actual[index].is_some()
        }
    }

    /// Number of formals that received an actual (varargs counts once).
    pub fn bound_count(&self, formals: &FormalParameters) -> usize {
        (0..formals.len())
            .filter(|&i| self.is_bound(formals, i))
            .count()
    }
}
