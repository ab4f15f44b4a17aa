//! Attribute names, values and the bags that hold them.

use std::borrow::{Borrow, Cow};
use std::collections::HashMap;
use std::fmt;

use crate::error::{GraphError, Result};

pub mod codec;
mod value;

pub use codec::{AttrMap, CodecOptions, StringTag};
pub use value::{
    AttributeKind, AttributeValue, Color, FromAttribute, Point, Rect, Size, Uri,
    TIMESTAMP_EPSILON,
};

/// Name of an attribute.
///
/// Well-known names are compile-time constants and never allocate.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttributeName(Cow<'static, str>);

impl AttributeName {
    /// Human-readable label of a vertex or edge.
    pub const LABEL: AttributeName = AttributeName::from_static("label");
    /// Concept a vertex stands for.
    pub const CONCEPT: AttributeName = AttributeName::from_static("concept");
    /// Relation an edge expresses.
    pub const RELATION: AttributeName = AttributeName::from_static("relation");
    /// Layout position of a vertex.
    pub const POSITION: AttributeName = AttributeName::from_static("position");

    /// Wraps a static name without allocating.
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// Creates a name from owned text.
    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    /// The name text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AttributeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for AttributeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0.as_ref())
    }
}

impl AsRef<str> for AttributeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for AttributeName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AttributeName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for AttributeName {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl From<&AttributeName> for AttributeName {
    fn from(name: &AttributeName) -> Self {
        name.clone()
    }
}

/// A bag of named attribute values.
///
/// Equality is deep: both bags must hold the same names, and the values under
/// each name must compare equal under [`AttributeValue`]'s contract.
#[derive(Clone, Debug, Default)]
pub struct Attributes {
    entries: HashMap<AttributeName, AttributeValue>,
}

impl Attributes {
    /// Creates an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `name`, replacing any previous value.
    pub fn set(&mut self, name: impl Into<AttributeName>, value: impl Into<AttributeValue>) {
        self.entries.insert(name.into(), value.into());
    }

    /// Reads the value under `name` as `T`.
    ///
    /// Returns `Ok(None)` when the name is absent and
    /// [`GraphError::AttributeTypeMismatch`] when the stored kind is not `T`'s.
    pub fn get<T: FromAttribute>(&self, name: impl AsRef<str>) -> Result<Option<T>> {
        let name = name.as_ref();
        let Some(value) = self.entries.get(name) else {
            return Ok(None);
        };
        T::from_attribute(value)
            .map(Some)
            .ok_or_else(|| GraphError::AttributeTypeMismatch {
                name: name.to_owned(),
                expected: T::KIND,
                found: value.kind(),
            })
    }

    /// Returns the raw value under `name`.
    pub fn get_value(&self, name: impl AsRef<str>) -> Option<&AttributeValue> {
        self.entries.get(name.as_ref())
    }

    /// Removes `name`, returning its previous value.
    pub fn remove(&mut self, name: impl AsRef<str>) -> Option<AttributeValue> {
        self.entries.remove(name.as_ref())
    }

    /// Returns `true` if `name` is present.
    pub fn contains(&self, name: impl AsRef<str>) -> bool {
        self.entries.contains_key(name.as_ref())
    }

    /// Returns `true` if the bag holds no attributes.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterates over the attributes in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&AttributeName, &AttributeValue)> + '_ {
        self.entries.iter()
    }

    /// Removes every attribute.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl PartialEq for Attributes {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .all(|(name, value)| other.entries.get(name) == Some(value))
    }
}

impl<N, V> FromIterator<(N, V)> for Attributes
where
    N: Into<AttributeName>,
    V: Into<AttributeValue>,
{
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut attrs = Attributes::new();
        attrs.extend(iter);
        attrs
    }
}

impl<N, V> Extend<(N, V)> for Attributes
where
    N: Into<AttributeName>,
    V: Into<AttributeValue>,
{
    fn extend<I: IntoIterator<Item = (N, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.set(name, value);
        }
    }
}
