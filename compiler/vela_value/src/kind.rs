//! Element kinds and the coercion lattice.
//!
//! The lattice orders atomic kinds `Logical < Integer < Double < Complex < String`.
//! `Raw` ranks as `Integer` except that two raw operands stay raw. `List`
//! forces `String` against any other kind, `Null` is the identity, and closures
//! have no place in the lattice. The rule is a static `(Kind, Kind)` table
//! built at compile time.

use std::fmt;

/// Element kind of a value.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Kind {
    Null,
    Logical,
    Raw,
    Integer,
    Double,
    Complex,
    String,
    List,
    Closure,
}

const KIND_COUNT: usize = 9;

impl Kind {
    pub const ALL: [Kind; KIND_COUNT] = [
        Kind::Null,
        Kind::Logical,
        Kind::Raw,
        Kind::Integer,
        Kind::Double,
        Kind::Complex,
        Kind::String,
        Kind::List,
        Kind::Closure,
    ];

    /// R `typeof` name.
    pub const fn name(self) -> &'static str {
        match self {
            Kind::Null => "NULL",
            Kind::Logical => "logical",
            Kind::Raw => "raw",
            Kind::Integer => "integer",
            Kind::Double => "double",
            Kind::Complex => "complex",
            Kind::String => "character",
            Kind::List => "list",
            Kind::Closure => "closure",
        }
    }

    /// Whether elements of this kind can be used in arithmetic.
    pub const fn is_numeric(self) -> bool {
        matches!(
            self,
            Kind::Logical | Kind::Raw | Kind::Integer | Kind::Double | Kind::Complex
        )
    }

    /// Position in the atomic order; raw shares the integer rank.
    const fn rank(self) -> u8 {
        match self {
            Kind::Null => 0,
            Kind::Logical => 1,
            Kind::Raw | Kind::Integer => 2,
            Kind::Double => 3,
            Kind::Complex => 4,
            Kind::String => 5,
            Kind::List => 6,
            Kind::Closure => 7,
        }
    }

    const fn from_rank(rank: u8) -> Kind {
        match rank {
            0 => Kind::Null,
            1 => Kind::Logical,
            2 => Kind::Integer,
            3 => Kind::Double,
            4 => Kind::Complex,
            _ => Kind::String,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const fn compute_common(a: Kind, b: Kind) -> Option<Kind> {
    match (a, b) {
        (Kind::Closure, _) | (_, Kind::Closure) => None,
        (Kind::Null, other) | (other, Kind::Null) => Some(other),
        (Kind::List, Kind::List) => Some(Kind::List),
        (Kind::List | Kind::String, _) | (_, Kind::List | Kind::String) => Some(Kind::String),
        (Kind::Raw, Kind::Raw) => Some(Kind::Raw),
        _ => {
            let (ra, rb) = (a.rank(), b.rank());
            Some(Kind::from_rank(if ra > rb { ra } else { rb }))
        }
    }
}

const fn build_table() -> [[Option<Kind>; KIND_COUNT]; KIND_COUNT] {
    let mut table = [[None; KIND_COUNT]; KIND_COUNT];
    let mut i = 0;
    while i < KIND_COUNT {
        let mut j = 0;
        while j < KIND_COUNT {
            table[i][j] = compute_common(Kind::ALL[i], Kind::ALL[j]);
            j += 1;
        }
        i += 1;
    }
    table
}

static COMMON_KIND: [[Option<Kind>; KIND_COUNT]; KIND_COUNT] = build_table();

/// Common kind of two operands, or `None` when either is a closure.
#[inline]
pub fn common_kind(a: Kind, b: Kind) -> Option<Kind> {
    COMMON_KIND[a as usize][b as usize]
}

/// Fold `common_kind` over any number of kinds, starting from `Null`.
pub fn common_kind_of<I: IntoIterator<Item = Kind>>(kinds: I) -> Option<Kind> {
    kinds
        .into_iter()
        .try_fold(Kind::Null, |acc, kind| common_kind(acc, kind))
}

/// Common kind for the membership test: a list on either side forces strings.
pub fn membership_kind(a: Kind, b: Kind) -> Option<Kind> {
    match common_kind(a, b)? {
        Kind::List => Some(Kind::String),
        kind => Some(kind),
    }
}
