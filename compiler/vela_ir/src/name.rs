//! Interned symbol identifier.
//!
//! Provides compact 32-bit handles into the process-wide interning table.

use std::fmt;

use crate::StringInterner;

/// Interned symbol or string identifier.
///
/// Equality is integer comparison. Every `Name` produced by interning is a
/// valid index into the global `StringInterner`; `Name::INVALID` is reserved
/// and never produced, so value code can use it as a sentinel.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct Name(u32);

impl Name {
    /// Pre-interned empty string.
    pub const EMPTY: Name = Name(0);

    /// Pre-interned varargs marker `...`.
    pub const DOTS: Name = Name(1);

    /// Reserved handle that interning never returns.
    pub const INVALID: Name = Name(u32::MAX);

    /// Create from a raw table index.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Name(raw)
    }

    /// Get the raw table index.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Intern `text` in the global table.
    #[inline]
    pub fn intern(text: &str) -> Self {
        StringInterner::global().intern(text)
    }

    /// Text of this name from the global table.
    ///
    /// `Name::INVALID` and foreign handles resolve to the empty string.
    #[inline]
    pub fn as_str(self) -> &'static str {
        StringInterner::global().lookup(self)
    }

    /// Whether this is the varargs marker.
    #[inline]
    pub const fn is_dots(self) -> bool {
        self.0 == Self::DOTS.0
    }

    /// Whether this name's text starts with `prefix`'s text.
    ///
    /// Used by partial argument matching.
    #[inline]
    pub fn starts_with(self, prefix: Name) -> bool {
        self == prefix || self.as_str().starts_with(prefix.as_str())
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::INVALID {
            write!(f, "Name(INVALID)")
        } else {
            write!(f, "Name({}: {:?})", self.0, self.as_str())
        }
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for Name {
    fn default() -> Self {
        Self::EMPTY
    }
}
