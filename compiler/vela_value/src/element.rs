//! Element representations and the element coercion table.
//!
//! Each vector kind stores one element type implementing [`Element`]:
//!
//! | kind    | element   | missing marker                         |
//! |---------|-----------|----------------------------------------|
//! | logical | `Logical` | `Logical::Na`                          |
//! | integer | `i32`     | `i32::MIN`                             |
//! | double  | `f64`     | NaN with low word 1954                 |
//! | complex | `Complex` | either part NA                         |
//! | string  | `RStr`    | reserved handle no text interns to     |
//! | raw     | `u8`      | none (missing coerces to `00`)         |
//! | list    | `Value`   | `NULL` element is not missing          |
//!
//! Coercion between elements goes through [`Scalar`], the kind-tagged form of
//! a single element.

use std::fmt;

use vela_ir::Name;

use crate::{Kind, Value, Vector};

/// Integer missing marker.
pub const NA_INTEGER: i32 = i32::MIN;

/// Bit pattern of the double missing marker.
pub const NA_DOUBLE_BITS: u64 = 0x7FF0_0000_0000_07A2;

/// The double missing marker.
#[inline]
pub fn na_double() -> f64 {
    f64::from_bits(NA_DOUBLE_BITS)
}

/// Whether `x` is the double missing marker (not merely some NaN).
#[inline]
pub fn is_na_double(x: f64) -> bool {
    x.to_bits() == NA_DOUBLE_BITS
}

/// Tri-state logical.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Logical {
    False,
    True,
    Na,
}

impl Logical {
    #[inline]
    pub fn from_bool(b: bool) -> Self {
        if b {
            Logical::True
        } else {
            Logical::False
        }
    }

    /// Definite truth value, `None` when missing.
    #[inline]
    pub fn to_bool(self) -> Option<bool> {
        match self {
            Logical::False => Some(false),
            Logical::True => Some(true),
            Logical::Na => None,
        }
    }
}

impl From<bool> for Logical {
    fn from(b: bool) -> Self {
        Logical::from_bool(b)
    }
}

/// Complex number.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub const fn new(re: f64, im: f64) -> Self {
        Complex { re, im }
    }

    pub fn na() -> Self {
        Complex::new(na_double(), na_double())
    }

    pub fn is_na(self) -> bool {
        is_na_double(self.re) || is_na_double(self.im)
    }
}

/// String element: an interned handle, or missing.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct RStr(Name);

impl RStr {
    /// Missing string. Distinct from the text `"NA"`.
    pub const NA: RStr = RStr(Name::INVALID);

    pub fn new(text: &str) -> Self {
        RStr(Name::intern(text))
    }

    pub const fn from_name(name: Name) -> Self {
        RStr(name)
    }

    pub fn name(self) -> Name {
        self.0
    }

    #[inline]
    pub fn is_na(self) -> bool {
        self.0 == Name::INVALID
    }

    /// Text of the string, `None` when missing.
    pub fn as_str(self) -> Option<&'static str> {
        if self.is_na() {
            None
        } else {
            Some(self.0.as_str())
        }
    }
}

impl fmt::Debug for RStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_str() {
            Some(s) => write!(f, "{s:?}"),
            None => f.write_str("NA"),
        }
    }
}

/// A single element tagged with its kind.
#[derive(Clone, Debug)]
pub enum Scalar {
    Logical(Logical),
    Integer(i32),
    Double(f64),
    Complex(Complex),
    Str(RStr),
    Raw(u8),
    /// A list element (any value, including `NULL` and closures).
    Value(Value),
}

impl Scalar {
    pub fn kind(&self) -> Kind {
        match self {
            Scalar::Logical(_) => Kind::Logical,
            Scalar::Integer(_) => Kind::Integer,
            Scalar::Double(_) => Kind::Double,
            Scalar::Complex(_) => Kind::Complex,
            Scalar::Str(_) => Kind::String,
            Scalar::Raw(_) => Kind::Raw,
            Scalar::Value(_) => Kind::List,
        }
    }

    /// Whether this element is missing in its own kind.
    pub fn is_na(&self) -> bool {
        match self {
            Scalar::Logical(l) => *l == Logical::Na,
            Scalar::Integer(i) => *i == NA_INTEGER,
            Scalar::Double(d) => is_na_double(*d),
            Scalar::Complex(c) => c.is_na(),
            Scalar::Str(s) => s.is_na(),
            Scalar::Raw(_) | Scalar::Value(_) => false,
        }
    }

    /// Convert to the element type of `kind`. `Null` and `Closure` leave it unchanged.
    pub fn coerce(&self, kind: Kind) -> Scalar {
        match kind {
            Kind::Logical => Logical::from_scalar(self).into_scalar(),
            Kind::Raw => u8::from_scalar(self).into_scalar(),
            Kind::Integer => i32::from_scalar(self).into_scalar(),
            Kind::Double => f64::from_scalar(self).into_scalar(),
            Kind::Complex => Complex::from_scalar(self).into_scalar(),
            Kind::String => RStr::from_scalar(self).into_scalar(),
            Kind::List => Value::from_scalar(self).into_scalar(),
            Kind::Null | Kind::Closure => self.clone(),
        }
    }

    /// The single element of a length-one list element, if it has one.
    fn list_single(value: &Value) -> Option<Scalar> {
        match value {
            Value::Null | Value::Closure(_) | Value::Builtin(_) => None,
            v if v.size() == 1 => Some(v.get(0)),
            _ => None,
        }
    }
}

/// Element type of a vector kind.
///
/// `from_scalar` implements one column of the coercion table; every
/// conversion maps a missing source to the missing marker of the target.
pub trait Element: Clone + fmt::Debug + 'static {
    const KIND: Kind;

    fn na() -> Self;

    fn is_na(&self) -> bool;

    /// Fill value for freshly allocated vectors.
    fn zero() -> Self;

    fn from_scalar(scalar: &Scalar) -> Self;

    fn into_scalar(self) -> Scalar;

    fn wrap(vector: Vector<Self>) -> Value;

    fn vector_of(value: &Value) -> Option<&Vector<Self>>;
}

impl Element for Logical {
    const KIND: Kind = Kind::Logical;

    fn na() -> Self {
        Logical::Na
    }

    fn is_na(&self) -> bool {
        *self == Logical::Na
    }

    fn zero() -> Self {
        Logical::False
    }

    fn from_scalar(scalar: &Scalar) -> Self {
        match scalar {
            Scalar::Logical(l) => *l,
            Scalar::Integer(i) if *i == NA_INTEGER => Logical::Na,
            Scalar::Integer(i) => Logical::from_bool(*i != 0),
            Scalar::Double(d) if d.is_nan() => Logical::Na,
            Scalar::Double(d) => Logical::from_bool(*d != 0.0),
            Scalar::Complex(c) if c.re.is_nan() || c.im.is_nan() => Logical::Na,
            Scalar::Complex(c) => Logical::from_bool(c.re != 0.0 || c.im != 0.0),
            Scalar::Str(s) => match s.as_str() {
                Some("TRUE" | "true" | "T" | "True") => Logical::True,
                Some("FALSE" | "false" | "F" | "False") => Logical::False,
                _ => Logical::Na,
            },
            Scalar::Raw(r) => Logical::from_bool(*r != 0),
            Scalar::Value(v) => Scalar::list_single(v).map_or(Logical::Na, |s| Self::from_scalar(&s)),
        }
    }

    fn into_scalar(self) -> Scalar {
        Scalar::Logical(self)
    }

    fn wrap(vector: Vector<Self>) -> Value {
        Value::Logical(vector)
    }

    fn vector_of(value: &Value) -> Option<&Vector<Self>> {
        match value {
            Value::Logical(v) => Some(v),
            _ => None,
        }
    }
}

/// Truncate a double into the integer range, `None` if it does not fit.
fn double_to_int(d: f64) -> Option<i32> {
    if d.is_nan() {
        return None;
    }
    let t = d.trunc();
    if t > f64::from(i32::MAX) || t <= f64::from(NA_INTEGER) {
        None
    } else {
        Some(t as i32)
    }
}

fn double_to_raw(d: f64) -> u8 {
    if d.is_nan() {
        return 0;
    }
    let t = d.trunc();
    if (0.0..=255.0).contains(&t) {
        t as u8
    } else {
        0
    }
}

fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();
    match text {
        "Inf" | "inf" => Some(f64::INFINITY),
        "-Inf" | "-inf" => Some(f64::NEG_INFINITY),
        "NaN" => Some(f64::NAN),
        "NA" | "" => None,
        _ => text.parse::<f64>().ok().filter(|d| !d.is_nan()),
    }
}

impl Element for i32 {
    const KIND: Kind = Kind::Integer;

    fn na() -> Self {
        NA_INTEGER
    }

    fn is_na(&self) -> bool {
        *self == NA_INTEGER
    }

    fn zero() -> Self {
        0
    }

    fn from_scalar(scalar: &Scalar) -> Self {
        match scalar {
            Scalar::Logical(Logical::Na) => NA_INTEGER,
            Scalar::Logical(l) => i32::from(*l == Logical::True),
            Scalar::Integer(i) => *i,
            Scalar::Double(d) => double_to_int(*d).unwrap_or(NA_INTEGER),
            Scalar::Complex(c) if c.is_na() => NA_INTEGER,
            Scalar::Complex(c) => double_to_int(c.re).unwrap_or(NA_INTEGER),
            Scalar::Str(s) => s
                .as_str()
                .and_then(parse_number)
                .and_then(double_to_int)
                .unwrap_or(NA_INTEGER),
            Scalar::Raw(r) => i32::from(*r),
            Scalar::Value(v) => Scalar::list_single(v).map_or(NA_INTEGER, |s| Self::from_scalar(&s)),
        }
    }

    fn into_scalar(self) -> Scalar {
        Scalar::Integer(self)
    }

    fn wrap(vector: Vector<Self>) -> Value {
        Value::Integer(vector)
    }

    fn vector_of(value: &Value) -> Option<&Vector<Self>> {
        match value {
            Value::Integer(v) => Some(v),
            _ => None,
        }
    }
}

impl Element for f64 {
    const KIND: Kind = Kind::Double;

    fn na() -> Self {
        na_double()
    }

    fn is_na(&self) -> bool {
        is_na_double(*self)
    }

    fn zero() -> Self {
        0.0
    }

    fn from_scalar(scalar: &Scalar) -> Self {
        match scalar {
            Scalar::Logical(Logical::Na) => na_double(),
            Scalar::Logical(l) => f64::from(u8::from(*l == Logical::True)),
            Scalar::Integer(i) if *i == NA_INTEGER => na_double(),
            Scalar::Integer(i) => f64::from(*i),
            Scalar::Double(d) => *d,
            Scalar::Complex(c) if c.is_na() => na_double(),
            Scalar::Complex(c) => c.re,
            Scalar::Str(s) => s.as_str().and_then(parse_number).unwrap_or_else(na_double),
            Scalar::Raw(r) => f64::from(*r),
            Scalar::Value(v) => Scalar::list_single(v).map_or_else(na_double, |s| Self::from_scalar(&s)),
        }
    }

    fn into_scalar(self) -> Scalar {
        Scalar::Double(self)
    }

    fn wrap(vector: Vector<Self>) -> Value {
        Value::Double(vector)
    }

    fn vector_of(value: &Value) -> Option<&Vector<Self>> {
        match value {
            Value::Double(v) => Some(v),
            _ => None,
        }
    }
}

impl Element for Complex {
    const KIND: Kind = Kind::Complex;

    fn na() -> Self {
        Complex::na()
    }

    fn is_na(&self) -> bool {
        Complex::is_na(*self)
    }

    fn zero() -> Self {
        Complex::new(0.0, 0.0)
    }

    fn from_scalar(scalar: &Scalar) -> Self {
        match scalar {
            Scalar::Complex(c) => *c,
            Scalar::Value(v) => Scalar::list_single(v).map_or_else(Complex::na, |s| Self::from_scalar(&s)),
            other if other.is_na() => Complex::na(),
            other => {
                let re = f64::from_scalar(other);
                if is_na_double(re) {
                    Complex::na()
                } else {
                    Complex::new(re, 0.0)
                }
            }
        }
    }

    fn into_scalar(self) -> Scalar {
        Scalar::Complex(self)
    }

    fn wrap(vector: Vector<Self>) -> Value {
        Value::Complex(vector)
    }

    fn vector_of(value: &Value) -> Option<&Vector<Self>> {
        match value {
            Value::Complex(v) => Some(v),
            _ => None,
        }
    }
}

/// Render a double with up to 15 significant digits.
pub fn format_double(d: f64) -> String {
    if is_na_double(d) {
        return "NA".to_string();
    }
    if d.is_nan() {
        return "NaN".to_string();
    }
    if d.is_infinite() {
        return if d > 0.0 { "Inf" } else { "-Inf" }.to_string();
    }
    let rounded: f64 = format!("{d:.14e}").parse().unwrap_or(d);
    if rounded == 0.0 {
        return "0".to_string();
    }
    // Fixed notation unless scientific is strictly shorter.
    let fixed = format!("{rounded}");
    let scientific = format_scientific(rounded);
    if fixed.len() <= scientific.len() {
        fixed
    } else {
        scientific
    }
}

fn format_scientific(d: f64) -> String {
    let text = format!("{d:e}");
    match text.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exp),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => text,
    }
}

fn format_complex(c: Complex) -> String {
    let sign = if c.im < 0.0 { '-' } else { '+' };
    format!("{}{sign}{}i", format_double(c.re), format_double(c.im.abs()))
}

impl Element for RStr {
    const KIND: Kind = Kind::String;

    fn na() -> Self {
        RStr::NA
    }

    fn is_na(&self) -> bool {
        RStr::is_na(*self)
    }

    fn zero() -> Self {
        RStr::from_name(Name::EMPTY)
    }

    fn from_scalar(scalar: &Scalar) -> Self {
        if scalar.is_na() {
            return RStr::NA;
        }
        match scalar {
            Scalar::Logical(l) => RStr::new(if *l == Logical::True { "TRUE" } else { "FALSE" }),
            Scalar::Integer(i) => RStr::new(&i.to_string()),
            Scalar::Double(d) => RStr::new(&format_double(*d)),
            Scalar::Complex(c) => RStr::new(&format_complex(*c)),
            Scalar::Str(s) => *s,
            Scalar::Raw(r) => RStr::new(&format!("{r:02x}")),
            Scalar::Value(v) => match (v, Scalar::list_single(v)) {
                (_, Some(single)) => Self::from_scalar(&single),
                (Value::Null, None) => RStr::new("NULL"),
                (Value::Closure(_) | Value::Builtin(_), None) => RStr::NA,
                (v, None) => RStr::new(&v.deparse()),
            },
        }
    }

    fn into_scalar(self) -> Scalar {
        Scalar::Str(self)
    }

    fn wrap(vector: Vector<Self>) -> Value {
        Value::String(vector)
    }

    fn vector_of(value: &Value) -> Option<&Vector<Self>> {
        match value {
            Value::String(v) => Some(v),
            _ => None,
        }
    }
}

impl Element for u8 {
    const KIND: Kind = Kind::Raw;

    fn na() -> Self {
        0
    }

    fn is_na(&self) -> bool {
        false
    }

    fn zero() -> Self {
        0
    }

    fn from_scalar(scalar: &Scalar) -> Self {
        if scalar.is_na() {
            return 0;
        }
        match scalar {
            Scalar::Logical(l) => u8::from(*l == Logical::True),
            Scalar::Integer(i) => u8::try_from(*i).unwrap_or(0),
            Scalar::Double(d) => double_to_raw(*d),
            Scalar::Complex(c) => double_to_raw(c.re),
            Scalar::Str(s) => s.as_str().and_then(parse_number).map_or(0, double_to_raw),
            Scalar::Raw(r) => *r,
            Scalar::Value(v) => Scalar::list_single(v).map_or(0, |s| Self::from_scalar(&s)),
        }
    }

    fn into_scalar(self) -> Scalar {
        Scalar::Raw(self)
    }

    fn wrap(vector: Vector<Self>) -> Value {
        Value::Raw(vector)
    }

    fn vector_of(value: &Value) -> Option<&Vector<Self>> {
        match value {
            Value::Raw(v) => Some(v),
            _ => None,
        }
    }
}

impl Element for Value {
    const KIND: Kind = Kind::List;

    fn na() -> Self {
        Value::logical(vec![Logical::Na])
    }

    fn is_na(&self) -> bool {
        false
    }

    fn zero() -> Self {
        Value::Null
    }

    /// Wrap an element as a length-one vector of its own kind.
    fn from_scalar(scalar: &Scalar) -> Self {
        match scalar {
            Scalar::Logical(l) => Value::logical(vec![*l]),
            Scalar::Integer(i) => Value::integer(vec![*i]),
            Scalar::Double(d) => Value::double(vec![*d]),
            Scalar::Complex(c) => Value::complex(vec![*c]),
            Scalar::Str(s) => Value::string(vec![*s]),
            Scalar::Raw(r) => Value::raw(vec![*r]),
            Scalar::Value(v) => v.clone(),
        }
    }

    fn into_scalar(self) -> Scalar {
        Scalar::Value(self)
    }

    fn wrap(vector: Vector<Self>) -> Value {
        Value::List(vector)
    }

    fn vector_of(value: &Value) -> Option<&Vector<Self>> {
        match value {
            Value::List(v) => Some(v),
            _ => None,
        }
    }
}
