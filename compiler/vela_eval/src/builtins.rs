//! Builtin functions.
//!
//! A builtin is registered by signature `(name, parameters, required)` and
//! bound through the same `ArgumentMatcher` as a closure. The function body
//! sees its actuals through `BuiltinArgs`, indexed by formal position.

mod collections;
mod constructors;

use rustc_hash::FxHashMap;

use vela_ir::Name;
use vela_value::errors::missing_required_argument;
use vela_value::{
    ArgumentBinding, BuiltinFunction, EvalError, EvalResult, FormalParameters, Value,
};

/// Signature of a builtin's implementation.
pub type BuiltinFn = fn(&BuiltinArgs<'_>) -> EvalResult;

/// A registered builtin: its formals and implementation.
#[derive(Clone, Debug)]
pub struct Builtin {
    pub name: Name,
    pub formals: FormalParameters,
    pub func: BuiltinFn,
}

/// Bound actuals of one builtin call.
pub struct BuiltinArgs<'a> {
    formals: &'a FormalParameters,
    binding: &'a ArgumentBinding,
    values: &'a [Value],
    names: &'a [Option<Name>],
}

impl<'a> BuiltinArgs<'a> {
    pub fn new(
        formals: &'a FormalParameters,
        binding: &'a ArgumentBinding,
        values: &'a [Value],
        names: &'a [Option<Name>],
    ) -> Self {
        BuiltinArgs {
            formals,
            binding,
            values,
            names,
        }
    }

    /// Name of the builtin being called.
    pub fn function(&self) -> Name {
        self.formals.function()
    }

    /// Value bound to formal `index`, if an actual matched it.
    pub fn arg(&self, index: usize) -> Option<&'a Value> {
        self.binding.actual_for(index).map(|actual| &self.values[actual])
    }

    /// Value bound to required formal `index`.
    pub fn required(&self, index: usize) -> Result<&'a Value, EvalError> {
        self.arg(index)
            .ok_or_else(|| missing_required_argument(self.function(), self.formals.name(index)))
    }

    /// Actuals absorbed by `...`, in call order, with their names.
    pub fn dots(&self) -> impl Iterator<Item = (Option<Name>, &'a Value)> + 'a {
        let (values, names) = (self.values, self.names);
        self.binding
            .dots()
            .iter()
            .map(move |&actual| (names.get(actual).copied().flatten(), &values[actual]))
    }
}

/// Builtins known to an interpreter, addressed by `BuiltinFunction` handles.
#[derive(Clone, Debug, Default)]
pub struct BuiltinRegistry {
    builtins: Vec<Builtin>,
    by_name: FxHashMap<Name, u32>,
}

impl BuiltinRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding `c`, `list`, `length`, `seq`, `vector` and `is.na`.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register("c", &["..."], &[], collections::combine);
        registry.register("list", &["..."], &[], collections::list);
        registry.register("length", &["x"], &["x"], collections::length);
        registry.register("is.na", &["x"], &["x"], collections::is_na);
        registry.register("seq", &["from", "to", "by"], &[], constructors::seq);
        registry.register("vector", &["mode", "length"], &[], constructors::vector);
        registry
    }

    /// Register `func` under `name`; a later registration of the same name
    /// shadows the earlier one.
    ///
    /// Panics if the signature is malformed (see `FormalParameters::new`).
    pub fn register(
        &mut self,
        name: &str,
        params: &[&str],
        required: &[&str],
        func: BuiltinFn,
    ) -> BuiltinFunction {
        let name = Name::intern(name);
        let params: Vec<Name> = params.iter().map(|p| Name::intern(p)).collect();
        let required: Vec<Name> = required.iter().map(|p| Name::intern(p)).collect();
        let index = u32::try_from(self.builtins.len())
            .unwrap_or_else(|_| panic!("builtin registry overflow"));

        self.builtins.push(Builtin {
            name,
            formals: FormalParameters::new(name, &params, &required),
            func,
        });
        self.by_name.insert(name, index);
        BuiltinFunction { name, index }
    }

    pub fn get(&self, handle: BuiltinFunction) -> Option<&Builtin> {
        self.builtins.get(handle.index as usize)
    }

    pub fn lookup(&self, name: Name) -> Option<BuiltinFunction> {
        self.by_name
            .get(&name)
            .map(|&index| BuiltinFunction { name, index })
    }

    pub fn len(&self) -> usize {
        self.builtins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.builtins.is_empty()
    }

    /// Handles of the visible builtins (shadowed registrations excluded).
    pub fn iter(&self) -> impl Iterator<Item = BuiltinFunction> + '_ {
        self.by_name
            .iter()
            .map(|(&name, &index)| BuiltinFunction { name, index })
    }
}
