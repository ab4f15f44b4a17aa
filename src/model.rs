//! Vertex and edge records.
//!
//! Both are identified solely by their id: equality, hashing and ordering
//! ignore attribute contents and, for edges, endpoints.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use rand::Rng;

use crate::attr::{AttributeName, AttributeValue, Attributes};
use crate::types::{EdgeId, VertexId};

/// A graph vertex and its attributes.
#[derive(Clone, Debug)]
pub struct Vertex {
    id: VertexId,
    attributes: Attributes,
}

#[allow(clippy::new_without_default)]
impl Vertex {
    /// Creates a vertex with a fresh random id.
    pub fn new() -> Self {
        Self::with_id(VertexId::new())
    }

    /// Creates a vertex whose id is drawn from `rng`.
    pub fn with_rng<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::with_id(VertexId::from_rng(rng))
    }

    /// Creates a vertex with an existing id.
    pub fn with_id(id: VertexId) -> Self {
        Self {
            id,
            attributes: Attributes::new(),
        }
    }

    /// Builder-style attribute assignment.
    pub fn with_attribute(
        mut self,
        name: impl Into<AttributeName>,
        value: impl Into<AttributeValue>,
    ) -> Self {
        self.attributes.set(name, value);
        self
    }

    pub(crate) fn from_parts(id: VertexId, attributes: Attributes) -> Self {
        Self { id, attributes }
    }

    /// The vertex id.
    pub fn id(&self) -> VertexId {
        self.id
    }

    /// The vertex attributes.
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Mutable access to the vertex attributes.
    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }

    /// The `concept` attribute, when it holds a string.
    pub fn concept(&self) -> Option<&str> {
        self.attributes
            .get_value(AttributeName::CONCEPT)
            .and_then(AttributeValue::as_str)
    }

    /// Sets or clears the `concept` attribute.
    pub fn set_concept(&mut self, concept: Option<&str>) {
        match concept {
            Some(concept) => self.attributes.set(AttributeName::CONCEPT, concept),
            None => {
                self.attributes.remove(AttributeName::CONCEPT);
            }
        }
    }
}

impl PartialEq for Vertex {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Vertex {}

impl Hash for Vertex {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for Vertex {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Vertex {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.concept() {
            Some(concept) => write!(f, "Vertex({}, {concept:?})", self.id),
            None => write!(f, "Vertex({})", self.id),
        }
    }
}

/// A directed edge from `tail` to `head` and its attributes.
#[derive(Clone, Debug)]
pub struct Edge {
    id: EdgeId,
    tail: VertexId,
    head: VertexId,
    attributes: Attributes,
}

impl Edge {
    /// Creates an edge with a fresh random id.
    pub fn new(tail: VertexId, head: VertexId) -> Self {
        Self::with_id(EdgeId::new(), tail, head)
    }

    /// Creates an edge whose id is drawn from `rng`.
    pub fn with_rng<R: Rng + ?Sized>(tail: VertexId, head: VertexId, rng: &mut R) -> Self {
        Self::with_id(EdgeId::from_rng(rng), tail, head)
    }

    /// Creates an edge with an existing id.
    pub fn with_id(id: EdgeId, tail: VertexId, head: VertexId) -> Self {
        Self {
            id,
            tail,
            head,
            attributes: Attributes::new(),
        }
    }

    /// Builder-style attribute assignment.
    pub fn with_attribute(
        mut self,
        name: impl Into<AttributeName>,
        value: impl Into<AttributeValue>,
    ) -> Self {
        self.attributes.set(name, value);
        self
    }

    pub(crate) fn from_parts(
        id: EdgeId,
        tail: VertexId,
        head: VertexId,
        attributes: Attributes,
    ) -> Self {
        Self {
            id,
            tail,
            head,
            attributes,
        }
    }

    /// The edge id.
    pub fn id(&self) -> EdgeId {
        self.id
    }

    /// Source endpoint.
    pub fn tail(&self) -> VertexId {
        self.tail
    }

    /// Destination endpoint.
    pub fn head(&self) -> VertexId {
        self.head
    }

    /// Returns `true` if `vertex` is either endpoint.
    pub fn touches(&self, vertex: VertexId) -> bool {
        self.tail == vertex || self.head == vertex
    }

    /// The edge attributes.
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Mutable access to the edge attributes.
    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }

    /// The `relation` attribute, when it holds a string.
    pub fn relation(&self) -> Option<&str> {
        self.attributes
            .get_value(AttributeName::RELATION)
            .and_then(AttributeValue::as_str)
    }

    /// Sets or clears the `relation` attribute.
    pub fn set_relation(&mut self, relation: Option<&str>) {
        match relation {
            Some(relation) => self.attributes.set(AttributeName::RELATION, relation),
            None => {
                self.attributes.remove(AttributeName::RELATION);
            }
        }
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Edge {}

impl Hash for Edge {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for Edge {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Edge {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.relation() {
            Some(relation) => write!(
                f,
                "Edge({}, {} -{relation}-> {})",
                self.id, self.tail, self.head
            ),
            None => write!(f, "Edge({}, {} --> {})", self.id, self.tail, self.head),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn identity_ignores_attributes() {
        let plain = Vertex::new();
        let decorated = plain.clone().with_attribute("concept", "Wolf");
        assert_eq!(plain, decorated);
        let set: HashSet<_> = [plain, decorated].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn concept_and_relation_helpers() {
        let mut wolf = Vertex::new();
        wolf.set_concept(Some("Wolf"));
        assert_eq!(wolf.concept(), Some("Wolf"));
        assert!(wolf.to_string().contains("\"Wolf\""));
        wolf.set_concept(None);
        assert_eq!(wolf.concept(), None);

        let luna = Vertex::new();
        let mut edge = Edge::new(wolf.id(), luna.id());
        edge.set_relation(Some("loves"));
        assert_eq!(edge.relation(), Some("loves"));
        assert!(edge.to_string().contains("-loves->"));
        assert!(edge.touches(luna.id()));
    }

    #[test]
    fn edges_order_by_id() {
        let tail = VertexId::new();
        let head = VertexId::new();
        let mut edges = vec![Edge::new(tail, head), Edge::new(head, tail)];
        edges.sort();
        assert!(edges[0].id() < edges[1].id());
    }
}
