//! The closed set of attribute value kinds.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::error::{GraphError, Result};

/// Two timestamps closer than this compare equal.
pub const TIMESTAMP_EPSILON: Duration = Duration::MILLISECOND;

/// A 2-D point.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Creates a point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A 2-D extent.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl Size {
    /// Creates a size.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    /// Origin corner.
    pub origin: Point,
    /// Extent from the origin.
    pub size: Size,
}

impl Rect {
    /// Creates a rectangle from origin coordinates and extent.
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }
}

/// An RGBA color with components in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red component.
    pub red: f64,
    /// Green component.
    pub green: f64,
    /// Blue component.
    pub blue: f64,
    /// Alpha component.
    pub alpha: f64,
}

impl Color {
    /// Creates a color. Components are not clamped; out-of-range colors are
    /// rejected when encoded.
    pub const fn new(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    pub(crate) fn components(&self) -> [f64; 4] {
        [self.red, self.green, self.blue, self.alpha]
    }
}

/// An absolute URI.
///
/// Only the scheme is validated: it must start with a letter, continue with
/// letters, digits, `+`, `-` or `.`, and be followed by `:`. Whitespace and
/// control characters are rejected anywhere in the text.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Uri(String);

impl Uri {
    /// Validates and wraps `text`.
    pub fn parse(text: &str) -> Result<Self> {
        let Some((scheme, _)) = text.split_once(':') else {
            return Err(GraphError::decode(format!("'{text}' is not an absolute URI")));
        };
        let mut chars = scheme.chars();
        let scheme_ok = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
            && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
        if !scheme_ok {
            return Err(GraphError::decode(format!("invalid URI scheme in '{text}'")));
        }
        if text.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(GraphError::decode(format!("URI '{text}' contains whitespace")));
        }
        Ok(Self(text.to_owned()))
    }

    /// The URI text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The scheme, without the trailing `:`.
    pub fn scheme(&self) -> &str {
        self.0.split_once(':').map(|(scheme, _)| scheme).unwrap_or_default()
    }
}

impl FromStr for Uri {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self> {
        Uri::parse(s)
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Discriminant of an [`AttributeValue`], used in error reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    /// Boolean.
    Bool,
    /// Signed 64-bit integer.
    Int,
    /// 64-bit float.
    Float,
    /// UTF-8 string.
    String,
    /// Date-time with offset.
    Timestamp,
    /// Absolute URI.
    Uri,
    /// UUID.
    UniqueId,
    /// 2-D point.
    Point,
    /// 2-D size.
    Size,
    /// Rectangle.
    Rect,
    /// RGBA color.
    Color,
    /// Ordered list of values.
    Array,
    /// String-keyed map of values.
    Map,
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AttributeKind::Bool => "bool",
            AttributeKind::Int => "int",
            AttributeKind::Float => "float",
            AttributeKind::String => "string",
            AttributeKind::Timestamp => "timestamp",
            AttributeKind::Uri => "uri",
            AttributeKind::UniqueId => "unique id",
            AttributeKind::Point => "point",
            AttributeKind::Size => "size",
            AttributeKind::Rect => "rect",
            AttributeKind::Color => "color",
            AttributeKind::Array => "array",
            AttributeKind::Map => "map",
        };
        f.write_str(name)
    }
}

/// A dynamically-typed attribute value.
///
/// Equality is structural, except that timestamps closer than
/// [`TIMESTAMP_EPSILON`] are equal so values survive the millisecond
/// precision of the wire form. Arrays compare in order; maps by key set.
#[derive(Clone, Debug)]
pub enum AttributeValue {
    /// Boolean.
    Bool(bool),
    /// Signed 64-bit integer.
    Int(i64),
    /// 64-bit float.
    Float(f64),
    /// UTF-8 string.
    String(String),
    /// Date-time with offset.
    Timestamp(OffsetDateTime),
    /// Absolute URI.
    Uri(Uri),
    /// UUID.
    UniqueId(Uuid),
    /// 2-D point.
    Point(Point),
    /// 2-D size.
    Size(Size),
    /// Rectangle.
    Rect(Rect),
    /// RGBA color.
    Color(Color),
    /// Ordered list of values.
    Array(Vec<AttributeValue>),
    /// String-keyed map of values.
    Map(BTreeMap<String, AttributeValue>),
}

impl AttributeValue {
    /// Kind of the stored value.
    pub fn kind(&self) -> AttributeKind {
        match self {
            AttributeValue::Bool(_) => AttributeKind::Bool,
            AttributeValue::Int(_) => AttributeKind::Int,
            AttributeValue::Float(_) => AttributeKind::Float,
            AttributeValue::String(_) => AttributeKind::String,
            AttributeValue::Timestamp(_) => AttributeKind::Timestamp,
            AttributeValue::Uri(_) => AttributeKind::Uri,
            AttributeValue::UniqueId(_) => AttributeKind::UniqueId,
            AttributeValue::Point(_) => AttributeKind::Point,
            AttributeValue::Size(_) => AttributeKind::Size,
            AttributeValue::Rect(_) => AttributeKind::Rect,
            AttributeValue::Color(_) => AttributeKind::Color,
            AttributeValue::Array(_) => AttributeKind::Array,
            AttributeValue::Map(_) => AttributeKind::Map,
        }
    }

    /// Returns the string payload, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer payload, if this is an integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            AttributeValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the float payload, if this is a float.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the boolean payload, if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl PartialEq for AttributeValue {
    fn eq(&self, other: &Self) -> bool {
        use AttributeValue::*;
        match (self, other) {
            (Bool(a), Bool(b)) => a == b,
            (Int(a), Int(b)) => a == b,
            (Float(a), Float(b)) => a == b,
            (String(a), String(b)) => a == b,
            (Timestamp(a), Timestamp(b)) => (*a - *b).abs() < TIMESTAMP_EPSILON,
            (Uri(a), Uri(b)) => a == b,
            (UniqueId(a), UniqueId(b)) => a == b,
            (Point(a), Point(b)) => a == b,
            (Size(a), Size(b)) => a == b,
            (Rect(a), Rect(b)) => a == b,
            (Color(a), Color(b)) => a == b,
            (Array(a), Array(b)) => a == b,
            (Map(a), Map(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Bool(v) => write!(f, "{v}"),
            AttributeValue::Int(v) => write!(f, "{v}"),
            AttributeValue::Float(v) => write!(f, "{v}"),
            AttributeValue::String(v) => write!(f, "{v:?}"),
            AttributeValue::Timestamp(v) => write!(f, "{v}"),
            AttributeValue::Uri(v) => write!(f, "{v}"),
            AttributeValue::UniqueId(v) => write!(f, "{v:X}"),
            AttributeValue::Point(p) => write!(f, "({}, {})", p.x, p.y),
            AttributeValue::Size(s) => write!(f, "{}x{}", s.width, s.height),
            AttributeValue::Rect(r) => write!(
                f,
                "({}, {}) {}x{}",
                r.origin.x, r.origin.y, r.size.width, r.size.height
            ),
            AttributeValue::Color(c) => {
                write!(f, "rgba({}, {}, {}, {})", c.red, c.green, c.blue, c.alpha)
            }
            AttributeValue::Array(items) => {
                f.write_str("[")?;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            AttributeValue::Map(entries) => {
                f.write_str("{")?;
                for (idx, (key, value)) in entries.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

macro_rules! value_conversions {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for AttributeValue {
                fn from(value: $ty) -> Self {
                    AttributeValue::$variant(value)
                }
            }

            impl FromAttribute for $ty {
                const KIND: AttributeKind = AttributeKind::$variant;

                fn from_attribute(value: &AttributeValue) -> Option<Self> {
                    match value {
                        AttributeValue::$variant(inner) => Some(inner.clone()),
                        _ => None,
                    }
                }
            }
        )*
    };
}

/// Types that can be read out of an [`AttributeValue`] of one specific kind.
pub trait FromAttribute: Sized {
    /// The only kind this type reads from.
    const KIND: AttributeKind;

    /// Extracts the payload, or `None` when `value` is of another kind.
    fn from_attribute(value: &AttributeValue) -> Option<Self>;
}

value_conversions! {
    bool => Bool,
    i64 => Int,
    f64 => Float,
    String => String,
    OffsetDateTime => Timestamp,
    Uri => Uri,
    Uuid => UniqueId,
    Point => Point,
    Size => Size,
    Rect => Rect,
    Color => Color,
    Vec<AttributeValue> => Array,
    BTreeMap<String, AttributeValue> => Map,
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::String(value.to_owned())
    }
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self {
        AttributeValue::Int(i64::from(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn timestamps_within_a_millisecond_are_equal() {
        let base = datetime!(2018-10-10 12:00:00.123 UTC);
        let near = AttributeValue::Timestamp(base + Duration::microseconds(400));
        let far = AttributeValue::Timestamp(base + Duration::milliseconds(2));
        assert_eq!(AttributeValue::Timestamp(base), near);
        assert_ne!(AttributeValue::Timestamp(base), far);
    }

    #[test]
    fn kinds_never_compare_equal_across_variants() {
        assert_ne!(AttributeValue::Int(1), AttributeValue::Float(1.0));
        assert_ne!(AttributeValue::from("1"), AttributeValue::Int(1));
    }

    #[test]
    fn arrays_are_ordered_maps_are_not() {
        let forward = AttributeValue::Array(vec![1.into(), 2.into()]);
        let backward = AttributeValue::Array(vec![2.into(), 1.into()]);
        assert_ne!(forward, backward);

        let mut left = BTreeMap::new();
        left.insert("a".to_owned(), AttributeValue::Bool(true));
        left.insert("b".to_owned(), AttributeValue::Int(2));
        let right: BTreeMap<_, _> = left.clone().into_iter().rev().collect();
        assert_eq!(AttributeValue::Map(left), AttributeValue::Map(right));
    }

    #[test]
    fn from_attribute_is_kind_strict() {
        let value = AttributeValue::Int(3);
        assert_eq!(i64::from_attribute(&value), Some(3));
        assert_eq!(f64::from_attribute(&value), None);
        assert_eq!(<String as FromAttribute>::KIND, AttributeKind::String);
    }

    #[test]
    fn uri_requires_a_scheme() {
        assert_eq!(Uri::parse("https://example.com/a").unwrap().scheme(), "https");
        assert!(Uri::parse("urn:isbn:0451450523").is_ok());
        assert!(Uri::parse("example.com").is_err());
        assert!(Uri::parse("1http://x").is_err());
        assert!(Uri::parse("http://a b").is_err());
    }
}
