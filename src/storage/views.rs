//! Capability traits over the graph store.
//!
//! Algorithms that only need part of the graph API take one of these as a
//! bound instead of the concrete [`Graph`]. All three are implemented by
//! [`Graph`]; the directed and undirected views are two readings of the same
//! store.

use std::collections::BTreeSet;

use crate::attr::{AttributeName, AttributeValue, Attributes, FromAttribute};
use crate::error::Result;
use crate::model::{Edge, Vertex};
use crate::types::{EdgeId, VertexId};

use super::graph::Graph;

/// Operations that make sense whatever the orientation of the edges.
pub trait GeneralGraph {
    /// Whether the graph is flagged undirected.
    fn is_undirected(&self) -> bool;
    /// Number of vertices.
    fn vertex_count(&self) -> usize;
    /// Number of edges.
    fn edge_count(&self) -> usize;
    /// Returns `true` if the vertex is present.
    fn contains_vertex(&self, vertex: VertexId) -> bool;
    /// Returns `true` if the edge is present.
    fn contains_edge(&self, edge: EdgeId) -> bool;

    /// Inserts a vertex.
    fn insert_vertex(&mut self, vertex: Vertex) -> Result<VertexId>;
    /// Removes a vertex and every incident edge.
    fn remove_vertex(&mut self, vertex: VertexId) -> Result<Vertex>;
    /// Inserts an edge between two present vertices.
    fn insert_edge(&mut self, edge: Edge) -> Result<EdgeId>;
    /// Removes an edge.
    fn remove_edge(&mut self, edge: EdgeId) -> Result<Edge>;

    /// Edges touching `vertex`.
    fn incident_edges(&self, vertex: VertexId) -> Result<BTreeSet<EdgeId>>;
    /// Degree of `vertex`; self-loops count twice.
    fn incident_edges_count(&self, vertex: VertexId) -> Result<usize>;
    /// Vertices joined to `vertex` by an edge in either direction.
    fn neighbors(&self, vertex: VertexId) -> Result<BTreeSet<VertexId>>;

    /// Attributes of the graph itself.
    fn graph_attributes(&self) -> &Attributes;
    /// Attributes of a vertex.
    fn vertex_attributes(&self, vertex: VertexId) -> Result<&Attributes>;
    /// Attributes of an edge.
    fn edge_attributes(&self, edge: EdgeId) -> Result<&Attributes>;

    /// Sets a vertex attribute.
    fn set_vertex_attr(
        &mut self,
        vertex: VertexId,
        name: impl Into<AttributeName>,
        value: impl Into<AttributeValue>,
    ) -> Result<()>
    where
        Self: Sized;

    /// Reads a vertex attribute as `T`.
    fn vertex_attr<T: FromAttribute>(
        &self,
        vertex: VertexId,
        name: impl AsRef<str>,
    ) -> Result<Option<T>>
    where
        Self: Sized,
    {
        self.vertex_attributes(vertex)?.get(name)
    }

    /// Removes a vertex attribute.
    fn remove_vertex_attr(
        &mut self,
        vertex: VertexId,
        name: &str,
    ) -> Result<Option<AttributeValue>>;

    /// Sets an edge attribute.
    fn set_edge_attr(
        &mut self,
        edge: EdgeId,
        name: impl Into<AttributeName>,
        value: impl Into<AttributeValue>,
    ) -> Result<()>
    where
        Self: Sized;

    /// Reads an edge attribute as `T`.
    fn edge_attr<T: FromAttribute>(&self, edge: EdgeId, name: impl AsRef<str>) -> Result<Option<T>>
    where
        Self: Sized,
    {
        self.edge_attributes(edge)?.get(name)
    }

    /// Removes an edge attribute.
    fn remove_edge_attr(&mut self, edge: EdgeId, name: &str) -> Result<Option<AttributeValue>>;

    /// The `label` of a vertex.
    fn vertex_label(&self, vertex: VertexId) -> Result<Option<String>> {
        self.vertex_attributes(vertex)?.get(AttributeName::LABEL)
    }

    /// Sets the `label` of a vertex.
    fn set_vertex_label(&mut self, vertex: VertexId, label: &str) -> Result<()>
    where
        Self: Sized,
    {
        self.set_vertex_attr(vertex, AttributeName::LABEL, label)
    }

    /// Removes the `label` of a vertex, returning it if it was a string.
    fn remove_vertex_label(&mut self, vertex: VertexId) -> Result<Option<String>> {
        let removed = self.remove_vertex_attr(vertex, AttributeName::LABEL.as_str())?;
        Ok(removed.as_ref().and_then(String::from_attribute))
    }

    /// The `label` of an edge.
    fn edge_label(&self, edge: EdgeId) -> Result<Option<String>> {
        self.edge_attributes(edge)?.get(AttributeName::LABEL)
    }

    /// Sets the `label` of an edge.
    fn set_edge_label(&mut self, edge: EdgeId, label: &str) -> Result<()>
    where
        Self: Sized,
    {
        self.set_edge_attr(edge, AttributeName::LABEL, label)
    }

    /// Removes the `label` of an edge, returning it if it was a string.
    fn remove_edge_label(&mut self, edge: EdgeId) -> Result<Option<String>> {
        let removed = self.remove_edge_attr(edge, AttributeName::LABEL.as_str())?;
        Ok(removed.as_ref().and_then(String::from_attribute))
    }
}

/// Orientation-aware queries.
pub trait DirectedGraph: GeneralGraph {
    /// Tail of the edge.
    fn tail(&self, edge: EdgeId) -> Result<VertexId>;
    /// Head of the edge.
    fn head(&self, edge: EdgeId) -> Result<VertexId>;
    /// Edges leaving `vertex`.
    fn out_edges(&self, vertex: VertexId) -> Result<BTreeSet<EdgeId>>;
    /// Edges entering `vertex`.
    fn in_edges(&self, vertex: VertexId) -> Result<BTreeSet<EdgeId>>;
    /// Number of edges leaving `vertex`.
    fn out_degree(&self, vertex: VertexId) -> Result<usize>;
    /// Number of edges entering `vertex`.
    fn in_degree(&self, vertex: VertexId) -> Result<usize>;
    /// Tails of the edges entering `vertex`.
    fn predecessors(&self, vertex: VertexId) -> Result<BTreeSet<VertexId>>;
    /// Heads of the edges leaving `vertex`.
    fn successors(&self, vertex: VertexId) -> Result<BTreeSet<VertexId>>;
    /// Returns `true` if an edge goes from `tail` to `head`.
    fn has_edge_from_to(&self, tail: VertexId, head: VertexId) -> Result<bool>;
}

/// Orientation-agnostic adjacency.
pub trait UndirectedGraph: GeneralGraph {
    /// Returns `true` if an edge joins `a` and `b` either way.
    fn has_edge_between(&self, a: VertexId, b: VertexId) -> Result<bool>;
}

impl GeneralGraph for Graph {
    fn is_undirected(&self) -> bool {
        Graph::is_undirected(self)
    }

    fn vertex_count(&self) -> usize {
        Graph::vertex_count(self)
    }

    fn edge_count(&self) -> usize {
        Graph::edge_count(self)
    }

    fn contains_vertex(&self, vertex: VertexId) -> bool {
        Graph::contains_vertex(self, vertex)
    }

    fn contains_edge(&self, edge: EdgeId) -> bool {
        Graph::contains_edge(self, edge)
    }

    fn insert_vertex(&mut self, vertex: Vertex) -> Result<VertexId> {
        Graph::insert_vertex(self, vertex)
    }

    fn remove_vertex(&mut self, vertex: VertexId) -> Result<Vertex> {
        Graph::remove_vertex(self, vertex)
    }

    fn insert_edge(&mut self, edge: Edge) -> Result<EdgeId> {
        Graph::insert_edge(self, edge)
    }

    fn remove_edge(&mut self, edge: EdgeId) -> Result<Edge> {
        Graph::remove_edge(self, edge)
    }

    fn incident_edges(&self, vertex: VertexId) -> Result<BTreeSet<EdgeId>> {
        Graph::incident_edges(self, vertex)
    }

    fn incident_edges_count(&self, vertex: VertexId) -> Result<usize> {
        Graph::incident_edges_count(self, vertex)
    }

    fn neighbors(&self, vertex: VertexId) -> Result<BTreeSet<VertexId>> {
        Graph::neighbors(self, vertex)
    }

    fn graph_attributes(&self) -> &Attributes {
        Graph::attributes(self)
    }

    fn vertex_attributes(&self, vertex: VertexId) -> Result<&Attributes> {
        Graph::vertex_attributes(self, vertex)
    }

    fn edge_attributes(&self, edge: EdgeId) -> Result<&Attributes> {
        Graph::edge_attributes(self, edge)
    }

    fn set_vertex_attr(
        &mut self,
        vertex: VertexId,
        name: impl Into<AttributeName>,
        value: impl Into<AttributeValue>,
    ) -> Result<()> {
        Graph::set_vertex_attr(self, vertex, name, value)
    }

    fn remove_vertex_attr(
        &mut self,
        vertex: VertexId,
        name: &str,
    ) -> Result<Option<AttributeValue>> {
        Graph::remove_vertex_attr(self, vertex, name)
    }

    fn set_edge_attr(
        &mut self,
        edge: EdgeId,
        name: impl Into<AttributeName>,
        value: impl Into<AttributeValue>,
    ) -> Result<()> {
        Graph::set_edge_attr(self, edge, name, value)
    }

    fn remove_edge_attr(&mut self, edge: EdgeId, name: &str) -> Result<Option<AttributeValue>> {
        Graph::remove_edge_attr(self, edge, name)
    }
}

impl DirectedGraph for Graph {
    fn tail(&self, edge: EdgeId) -> Result<VertexId> {
        Graph::tail(self, edge)
    }

    fn head(&self, edge: EdgeId) -> Result<VertexId> {
        Graph::head(self, edge)
    }

    fn out_edges(&self, vertex: VertexId) -> Result<BTreeSet<EdgeId>> {
        Graph::out_edges(self, vertex)
    }

    fn in_edges(&self, vertex: VertexId) -> Result<BTreeSet<EdgeId>> {
        Graph::in_edges(self, vertex)
    }

    fn out_degree(&self, vertex: VertexId) -> Result<usize> {
        Graph::out_degree(self, vertex)
    }

    fn in_degree(&self, vertex: VertexId) -> Result<usize> {
        Graph::in_degree(self, vertex)
    }

    fn predecessors(&self, vertex: VertexId) -> Result<BTreeSet<VertexId>> {
        Graph::predecessors(self, vertex)
    }

    fn successors(&self, vertex: VertexId) -> Result<BTreeSet<VertexId>> {
        Graph::successors(self, vertex)
    }

    fn has_edge_from_to(&self, tail: VertexId, head: VertexId) -> Result<bool> {
        Graph::has_edge_from_to(self, tail, head)
    }
}

impl UndirectedGraph for Graph {
    fn has_edge_between(&self, a: VertexId, b: VertexId) -> Result<bool> {
        Graph::has_edge_between(self, a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GraphError;

    fn triangle<G: GeneralGraph>(graph: &mut G) -> [VertexId; 3] {
        let ids = [Vertex::new(), Vertex::new(), Vertex::new()].map(|v| {
            graph.insert_vertex(v).expect("fresh vertex")
        });
        for (tail, head) in [(0, 1), (1, 2), (2, 0)] {
            graph
                .insert_edge(Edge::new(ids[tail], ids[head]))
                .expect("endpoints present");
        }
        ids
    }

    fn reaches<G: DirectedGraph>(graph: &G, from: VertexId, to: VertexId) -> bool {
        graph.successors(from).unwrap().contains(&to)
    }

    #[test]
    fn generic_callers_see_the_same_store() {
        let mut graph = Graph::undirected();
        let [a, b, c] = triangle(&mut graph);
        assert!(GeneralGraph::is_undirected(&graph));
        assert!(reaches(&graph, a, b));
        assert!(!reaches(&graph, b, a));
        assert!(UndirectedGraph::has_edge_between(&graph, b, a).unwrap());
        assert_eq!(
            GeneralGraph::neighbors(&graph, a).unwrap(),
            BTreeSet::from([b, c])
        );
    }

    #[test]
    fn label_helpers() {
        let mut graph = Graph::new();
        let [a, b, _] = triangle(&mut graph);
        graph.set_vertex_label(a, "alpha").unwrap();
        assert_eq!(graph.vertex_label(a).unwrap().as_deref(), Some("alpha"));
        assert_eq!(graph.vertex_label(b).unwrap(), None);
        assert_eq!(graph.remove_vertex_label(a).unwrap().as_deref(), Some("alpha"));
        assert_eq!(graph.vertex_label(a).unwrap(), None);

        let edge = *graph.out_edges(a).unwrap().first().unwrap();
        graph.set_edge_label(edge, "next").unwrap();
        assert_eq!(graph.edge_label(edge).unwrap().as_deref(), Some("next"));
        assert_eq!(graph.remove_edge_label(edge).unwrap().as_deref(), Some("next"));

        let missing = VertexId::new();
        assert!(matches!(
            graph.set_vertex_label(missing, "x"),
            Err(GraphError::UnknownVertex(id)) if id == missing
        ));
    }

    #[test]
    fn trait_objects_expose_the_sized_free_surface() {
        let mut graph = Graph::new();
        let [a, ..] = triangle(&mut graph);
        graph.set_vertex_attr(a, AttributeName::LABEL, 7i64).unwrap();
        let view: &dyn GeneralGraph = &graph;
        assert_eq!(view.vertex_count(), 3);
        assert_eq!(view.incident_edges_count(a).unwrap(), 2);
        assert!(matches!(
            view.vertex_label(a),
            Err(GraphError::AttributeTypeMismatch { .. })
        ));
    }
}
