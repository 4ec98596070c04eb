//! Process-wide string interner.
//!
//! Symbols and string elements are interned once for the lifetime of the
//! process. The table is read-mostly: lookups take a shared lock, and only a
//! first-time intern takes the write lock.

use std::sync::OnceLock;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use super::Name;

/// Error when interning a string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternError {
    /// The table reached the reserved `Name::INVALID` index.
    Overflow { count: usize },
}

impl std::fmt::Display for InternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InternError::Overflow { count } => write!(
                f,
                "interner exceeded capacity: {count} strings, max is {}",
                u32::MAX - 1
            ),
        }
    }
}

impl std::error::Error for InternError {}

/// Storage behind the lock.
struct InternTable {
    /// Map from string content to index.
    map: FxHashMap<&'static str, u32>,
    /// Storage for string contents, indexed by `Name::raw()`.
    strings: Vec<&'static str>,
}

impl InternTable {
    fn with_reserved() -> Self {
        let mut table = InternTable {
            map: FxHashMap::default(),
            strings: Vec::with_capacity(1024),
        };
        // Index 0 and 1 back `Name::EMPTY` and `Name::DOTS`.
        for reserved in ["", "..."] {
            let index = table.strings.len() as u32;
            table.map.insert(reserved, index);
            table.strings.push(reserved);
        }
        table
    }
}

/// String interner mapping text to stable `Name` handles.
///
/// Interned strings are leaked and live for the rest of the process, which
/// lets `lookup` hand out `&'static str` without holding the lock.
pub struct StringInterner {
    table: RwLock<InternTable>,
}

static GLOBAL: OnceLock<StringInterner> = OnceLock::new();

impl StringInterner {
    /// Create a fresh interner with the reserved names pre-interned.
    pub fn new() -> Self {
        StringInterner {
            table: RwLock::new(InternTable::with_reserved()),
        }
    }

    /// The process-wide interner used by `Name::intern` and `Name::as_str`.
    pub fn global() -> &'static StringInterner {
        GLOBAL.get_or_init(StringInterner::new)
    }

    /// Try to intern a string, returning its Name or an error on overflow.
    pub fn try_intern(&self, s: &str) -> Result<Name, InternError> {
        // Fast path: already interned
        if let Some(&index) = self.table.read().map.get(s) {
            return Ok(Name::from_raw(index));
        }

        let mut guard = self.table.write();

        // Double-check after acquiring write lock
        if let Some(&index) = guard.map.get(s) {
            return Ok(Name::from_raw(index));
        }

        let count = guard.strings.len();
        let index = u32::try_from(count)
            .ok()
            .filter(|&i| i != Name::INVALID.raw())
            .ok_or(InternError::Overflow { count })?;

        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        guard.strings.push(leaked);
        guard.map.insert(leaked, index);
        Ok(Name::from_raw(index))
    }

    /// Intern a string, returning its Name.
    ///
    /// # Panics
    /// Panics if the table exceeds `u32::MAX - 1` strings.
    pub fn intern(&self, s: &str) -> Name {
        self.try_intern(s).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Look up the string for a Name.
    ///
    /// Handles this table never produced (including `Name::INVALID`) resolve
    /// to the empty string.
    pub fn lookup(&self, name: Name) -> &'static str {
        self.table
            .read()
            .strings
            .get(name.raw() as usize)
            .copied()
            .unwrap_or("")
    }

    /// Number of interned strings, reserved names included.
    pub fn len(&self) -> usize {
        self.table.read().strings.len()
    }

    /// Always false: the reserved names are pre-interned.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
