use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::attr::{AttributeName, AttributeValue, Attributes, FromAttribute};
use crate::error::{GraphError, Result};
use crate::model::{Edge, Vertex};
use crate::types::{EdgeId, VertexId};

use super::adjacency::{AdjacencyIndex, Dir};
use super::metrics::{default_metrics, GraphMetrics};
use super::options::GraphOptions;
use super::store::OrderedStore;

#[derive(Clone, Debug, Default)]
struct GraphState {
    vertices: OrderedStore<VertexId, Vertex>,
    edges: OrderedStore<EdgeId, Edge>,
    attributes: Attributes,
    adjacency: AdjacencyIndex,
}

/// An in-memory attributed graph.
///
/// `Graph` has value semantics: a clone is an independent snapshot. Clones
/// share storage until one of them is first mutated, at which point the
/// mutated handle takes a private copy.
///
/// Every mutation validates before it applies, so a failed call leaves the
/// graph untouched. After every public operation:
///
/// * each edge's tail and head are vertices of the graph;
/// * the out-index of `v` holds exactly the edges whose tail is `v`, the
///   in-index exactly those whose head is `v`, and neither keeps empty sets;
/// * vertex ids and edge ids are unique.
#[derive(Clone)]
pub struct Graph {
    undirected: bool,
    state: Arc<GraphState>,
    metrics: Arc<dyn GraphMetrics>,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    /// Creates an empty directed graph.
    pub fn new() -> Self {
        Self::with_options(GraphOptions::new())
    }

    /// Creates an empty graph flagged undirected.
    pub fn undirected() -> Self {
        Self::with_options(GraphOptions::new().undirected(true))
    }

    /// Creates an empty graph from explicit options.
    pub fn with_options(options: GraphOptions) -> Self {
        Self {
            undirected: options.undirected,
            state: Arc::new(GraphState::default()),
            metrics: options.metrics.unwrap_or_else(default_metrics),
        }
    }

    /// Whether the graph is flagged undirected.
    pub fn is_undirected(&self) -> bool {
        self.undirected
    }

    /// Returns `true` while both handles still share their storage.
    pub fn shares_storage_with(&self, other: &Graph) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }

    /// The number of vertices, the graph's *order*.
    pub fn vertex_count(&self) -> usize {
        self.state.vertices.len()
    }

    /// The number of edges, the graph's *size*.
    pub fn edge_count(&self) -> usize {
        self.state.edges.len()
    }

    /// Vertices in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> + '_ {
        self.state.vertices.values()
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.state.edges.values()
    }

    /// The set of all vertex ids.
    pub fn vertex_ids(&self) -> BTreeSet<VertexId> {
        self.state.vertices.keys().copied().collect()
    }

    /// The set of all edge ids.
    pub fn edge_ids(&self) -> BTreeSet<EdgeId> {
        self.state.edges.keys().copied().collect()
    }

    /// Returns `true` if the vertex is part of the graph.
    pub fn contains_vertex(&self, id: VertexId) -> bool {
        self.state.vertices.contains(&id)
    }

    /// Returns `true` if the edge is part of the graph.
    pub fn contains_edge(&self, id: EdgeId) -> bool {
        self.state.edges.contains(&id)
    }

    /// Fails with [`GraphError::UnknownVertex`] if the vertex is absent.
    pub fn check_contains_vertex(&self, id: VertexId) -> Result<()> {
        if self.contains_vertex(id) {
            Ok(())
        } else {
            Err(GraphError::UnknownVertex(id))
        }
    }

    /// Fails with [`GraphError::UnknownEdge`] if the edge is absent.
    pub fn check_contains_edge(&self, id: EdgeId) -> Result<()> {
        if self.contains_edge(id) {
            Ok(())
        } else {
            Err(GraphError::UnknownEdge(id))
        }
    }

    /// Looks up a vertex.
    pub fn vertex(&self, id: VertexId) -> Result<&Vertex> {
        self.state
            .vertices
            .get(&id)
            .ok_or(GraphError::UnknownVertex(id))
    }

    /// Looks up an edge.
    pub fn edge(&self, id: EdgeId) -> Result<&Edge> {
        self.state.edges.get(&id).ok_or(GraphError::UnknownEdge(id))
    }

    //
    // Mutation
    //

    /// Inserts a vertex.
    ///
    /// Fails with [`GraphError::DuplicateVertex`] if its id is already present.
    pub fn insert_vertex(&mut self, vertex: Vertex) -> Result<VertexId> {
        let id = vertex.id();
        if self.contains_vertex(id) {
            return Err(GraphError::DuplicateVertex(id));
        }
        Arc::make_mut(&mut self.state).vertices.push(id, vertex);
        self.metrics.vertex_inserted();
        debug!(vertex = %id, "graph.insert_vertex");
        Ok(id)
    }

    /// Inserts a fresh vertex without attributes and returns its id.
    pub fn add_vertex(&mut self) -> VertexId {
        let vertex = Vertex::new();
        let id = vertex.id();
        Arc::make_mut(&mut self.state).vertices.push(id, vertex);
        self.metrics.vertex_inserted();
        debug!(vertex = %id, "graph.insert_vertex");
        id
    }

    /// Removes a vertex together with every edge incident to it.
    ///
    /// Fails with [`GraphError::UnknownVertex`] if the vertex is absent.
    pub fn remove_vertex(&mut self, id: VertexId) -> Result<Vertex> {
        self.check_contains_vertex(id)?;
        let incident = self.incident_edge_ids(id);
        let state = Arc::make_mut(&mut self.state);
        for edge_id in &incident {
            if let Some(edge) = state.edges.remove(edge_id) {
                state.adjacency.remove(&edge);
                self.metrics.edge_removed();
            }
        }
        let vertex = state
            .vertices
            .remove(&id)
            .ok_or(GraphError::UnknownVertex(id))?;
        self.metrics.vertex_removed();
        if !incident.is_empty() {
            debug!(vertex = %id, edges = incident.len(), "graph.remove_vertex.cascade");
        }
        debug!(vertex = %id, "graph.remove_vertex");
        Ok(vertex)
    }

    /// Inserts an edge.
    ///
    /// Fails with [`GraphError::DuplicateEdge`] if its id is already present and
    /// with [`GraphError::UnknownVertex`] if either endpoint is absent.
    pub fn insert_edge(&mut self, edge: Edge) -> Result<EdgeId> {
        let id = edge.id();
        if self.contains_edge(id) {
            return Err(GraphError::DuplicateEdge(id));
        }
        self.check_contains_vertex(edge.tail())?;
        self.check_contains_vertex(edge.head())?;
        let (tail, head) = (edge.tail(), edge.head());
        let state = Arc::make_mut(&mut self.state);
        state.adjacency.insert(&edge);
        state.edges.push(id, edge);
        self.metrics.edge_inserted();
        debug!(edge = %id, tail = %tail, head = %head, "graph.insert_edge");
        Ok(id)
    }

    /// Inserts a fresh edge from `tail` to `head` and returns its id.
    pub fn add_edge(&mut self, tail: VertexId, head: VertexId) -> Result<EdgeId> {
        self.insert_edge(Edge::new(tail, head))
    }

    /// Removes an edge.
    ///
    /// Fails with [`GraphError::UnknownEdge`] if the edge is absent.
    pub fn remove_edge(&mut self, id: EdgeId) -> Result<Edge> {
        self.check_contains_edge(id)?;
        let state = Arc::make_mut(&mut self.state);
        let edge = state.edges.remove(&id).ok_or(GraphError::UnknownEdge(id))?;
        state.adjacency.remove(&edge);
        self.metrics.edge_removed();
        debug!(edge = %id, "graph.remove_edge");
        Ok(edge)
    }

    //
    // Edge ends and adjacency
    //

    /// The vertex at the tail of the edge.
    pub fn tail(&self, edge: EdgeId) -> Result<VertexId> {
        self.edge(edge).map(Edge::tail)
    }

    /// The vertex at the head of the edge.
    pub fn head(&self, edge: EdgeId) -> Result<VertexId> {
        self.edge(edge).map(Edge::head)
    }

    /// Tail and head of the edge.
    pub fn endpoints(&self, edge: EdgeId) -> Result<(VertexId, VertexId)> {
        self.edge(edge).map(|edge| (edge.tail(), edge.head()))
    }

    /// Edges whose tail is `vertex`.
    pub fn out_edges(&self, vertex: VertexId) -> Result<BTreeSet<EdgeId>> {
        self.scan(vertex, Dir::Out)
    }

    /// Edges whose head is `vertex`.
    pub fn in_edges(&self, vertex: VertexId) -> Result<BTreeSet<EdgeId>> {
        self.scan(vertex, Dir::In)
    }

    /// Edges touching `vertex` in either direction.
    pub fn incident_edges(&self, vertex: VertexId) -> Result<BTreeSet<EdgeId>> {
        self.scan(vertex, Dir::Both)
    }

    /// Number of edges whose tail is `vertex`.
    pub fn out_degree(&self, vertex: VertexId) -> Result<usize> {
        self.degree(vertex, Dir::Out)
    }

    /// Number of edges whose head is `vertex`.
    pub fn in_degree(&self, vertex: VertexId) -> Result<usize> {
        self.degree(vertex, Dir::In)
    }

    /// In-degree plus out-degree. A self-loop counts twice.
    pub fn incident_edges_count(&self, vertex: VertexId) -> Result<usize> {
        self.degree(vertex, Dir::Both)
    }

    /// Tails of the edges entering `vertex`.
    pub fn predecessors(&self, vertex: VertexId) -> Result<BTreeSet<VertexId>> {
        self.far_ends(vertex, Dir::In)
    }

    /// Heads of the edges leaving `vertex`.
    pub fn successors(&self, vertex: VertexId) -> Result<BTreeSet<VertexId>> {
        self.far_ends(vertex, Dir::Out)
    }

    /// Predecessors and successors of `vertex`.
    pub fn neighbors(&self, vertex: VertexId) -> Result<BTreeSet<VertexId>> {
        self.far_ends(vertex, Dir::Both)
    }

    /// Returns `true` if any edge goes from `tail` to `head`.
    ///
    /// Fails if either vertex is absent.
    pub fn has_edge_from_to(&self, tail: VertexId, head: VertexId) -> Result<bool> {
        self.check_contains_vertex(tail)?;
        self.check_contains_vertex(head)?;
        self.metrics.adjacency_scan(Dir::Out.as_str());
        let state = &self.state;
        Ok(state
            .adjacency
            .edges(tail, Dir::Out)
            .any(|id| state.edges.get(&id).is_some_and(|edge| edge.head() == head)))
    }

    /// Returns `true` if an edge joins `a` and `b` in either direction.
    pub fn has_edge_between(&self, a: VertexId, b: VertexId) -> Result<bool> {
        Ok(self.has_edge_from_to(a, b)? || self.has_edge_from_to(b, a)?)
    }

    fn incident_edge_ids(&self, vertex: VertexId) -> BTreeSet<EdgeId> {
        self.state.adjacency.edges(vertex, Dir::Both).collect()
    }

    fn scan(&self, vertex: VertexId, dir: Dir) -> Result<BTreeSet<EdgeId>> {
        self.check_contains_vertex(vertex)?;
        self.metrics.adjacency_scan(dir.as_str());
        trace!(vertex = %vertex, direction = dir.as_str(), "graph.adjacency_scan");
        Ok(self.state.adjacency.edges(vertex, dir).collect())
    }

    fn degree(&self, vertex: VertexId, dir: Dir) -> Result<usize> {
        self.check_contains_vertex(vertex)?;
        Ok(self.state.adjacency.degree(vertex, dir))
    }

    fn far_ends(&self, vertex: VertexId, dir: Dir) -> Result<BTreeSet<VertexId>> {
        self.check_contains_vertex(vertex)?;
        self.metrics.adjacency_scan(dir.as_str());
        let state = &self.state;
        let mut out = BTreeSet::new();
        if matches!(dir, Dir::In | Dir::Both) {
            out.extend(
                state
                    .adjacency
                    .edges(vertex, Dir::In)
                    .filter_map(|id| state.edges.get(&id).map(Edge::tail)),
            );
        }
        if matches!(dir, Dir::Out | Dir::Both) {
            out.extend(
                state
                    .adjacency
                    .edges(vertex, Dir::Out)
                    .filter_map(|id| state.edges.get(&id).map(Edge::head)),
            );
        }
        Ok(out)
    }

    //
    // Graph attributes
    //

    /// Attributes attached to the graph itself.
    pub fn attributes(&self) -> &Attributes {
        &self.state.attributes
    }

    /// Sets an attribute on the graph.
    pub fn set_graph_attr(
        &mut self,
        name: impl Into<AttributeName>,
        value: impl Into<AttributeValue>,
    ) {
        Arc::make_mut(&mut self.state).attributes.set(name, value);
    }

    /// Reads a graph attribute as `T`.
    pub fn graph_attr<T: FromAttribute>(&self, name: impl AsRef<str>) -> Result<Option<T>> {
        self.state.attributes.get(name)
    }

    /// Removes a graph attribute.
    pub fn remove_graph_attr(&mut self, name: impl AsRef<str>) -> Option<AttributeValue> {
        if !self.state.attributes.contains(&name) {
            return None;
        }
        Arc::make_mut(&mut self.state).attributes.remove(name)
    }

    //
    // Vertex attributes
    //

    /// Attributes of a vertex.
    pub fn vertex_attributes(&self, vertex: VertexId) -> Result<&Attributes> {
        self.vertex(vertex).map(Vertex::attributes)
    }

    /// Sets an attribute on a vertex.
    ///
    /// Fails with [`GraphError::UnknownVertex`] if the vertex is absent.
    pub fn set_vertex_attr(
        &mut self,
        vertex: VertexId,
        name: impl Into<AttributeName>,
        value: impl Into<AttributeValue>,
    ) -> Result<()> {
        self.check_contains_vertex(vertex)?;
        Arc::make_mut(&mut self.state)
            .vertices
            .get_mut(&vertex)
            .ok_or(GraphError::UnknownVertex(vertex))?
            .attributes_mut()
            .set(name, value);
        Ok(())
    }

    /// Reads a vertex attribute as `T`.
    ///
    /// Fails with [`GraphError::UnknownVertex`] if the vertex is absent and
    /// with [`GraphError::AttributeTypeMismatch`] if the kind differs.
    pub fn vertex_attr<T: FromAttribute>(
        &self,
        vertex: VertexId,
        name: impl AsRef<str>,
    ) -> Result<Option<T>> {
        self.vertex(vertex)?.attributes().get(name)
    }

    /// Removes a vertex attribute, returning its previous value.
    pub fn remove_vertex_attr(
        &mut self,
        vertex: VertexId,
        name: impl AsRef<str>,
    ) -> Result<Option<AttributeValue>> {
        if !self.vertex(vertex)?.attributes().contains(&name) {
            return Ok(None);
        }
        Ok(Arc::make_mut(&mut self.state)
            .vertices
            .get_mut(&vertex)
            .and_then(|v| v.attributes_mut().remove(name)))
    }

    //
    // Edge attributes
    //

    /// Attributes of an edge.
    pub fn edge_attributes(&self, edge: EdgeId) -> Result<&Attributes> {
        self.edge(edge).map(Edge::attributes)
    }

    /// Sets an attribute on an edge.
    ///
    /// Fails with [`GraphError::UnknownEdge`] if the edge is absent.
    pub fn set_edge_attr(
        &mut self,
        edge: EdgeId,
        name: impl Into<AttributeName>,
        value: impl Into<AttributeValue>,
    ) -> Result<()> {
        self.check_contains_edge(edge)?;
        Arc::make_mut(&mut self.state)
            .edges
            .get_mut(&edge)
            .ok_or(GraphError::UnknownEdge(edge))?
            .attributes_mut()
            .set(name, value);
        Ok(())
    }

    /// Reads an edge attribute as `T`.
    pub fn edge_attr<T: FromAttribute>(
        &self,
        edge: EdgeId,
        name: impl AsRef<str>,
    ) -> Result<Option<T>> {
        self.edge(edge)?.attributes().get(name)
    }

    /// Removes an edge attribute, returning its previous value.
    pub fn remove_edge_attr(
        &mut self,
        edge: EdgeId,
        name: impl AsRef<str>,
    ) -> Result<Option<AttributeValue>> {
        if !self.edge(edge)?.attributes().contains(&name) {
            return Ok(None);
        }
        Ok(Arc::make_mut(&mut self.state)
            .edges
            .get_mut(&edge)
            .and_then(|e| e.attributes_mut().remove(name)))
    }

    //
    // Integrity
    //

    /// Verifies the store invariants, reporting the first violation found.
    pub fn check_integrity(&self) -> Result<()> {
        let state = &self.state;
        if state.vertices.order_len() != state.vertices.len()
            || state.edges.order_len() != state.edges.len()
        {
            return Err(GraphError::Integrity("insertion order out of sync".into()));
        }
        for edge in state.edges.values() {
            for end in [edge.tail(), edge.head()] {
                if !state.vertices.contains(&end) {
                    return Err(GraphError::Integrity(format!(
                        "edge {} references missing vertex {end}",
                        edge.id()
                    )));
                }
            }
            if !state
                .adjacency
                .edges(edge.tail(), Dir::Out)
                .any(|id| id == edge.id())
                || !state
                    .adjacency
                    .edges(edge.head(), Dir::In)
                    .any(|id| id == edge.id())
            {
                return Err(GraphError::Integrity(format!(
                    "edge {} missing from the adjacency index",
                    edge.id()
                )));
            }
        }
        for (dir, label) in [(Dir::Out, "out"), (Dir::In, "in")] {
            let mut registered = 0usize;
            for (vertex, id) in state.adjacency.entries(dir) {
                registered += 1;
                let end = state.edges.get(&id).map(|edge| match dir {
                    Dir::In => edge.head(),
                    Dir::Out | Dir::Both => edge.tail(),
                });
                if end != Some(vertex) {
                    return Err(GraphError::Integrity(format!(
                        "{label}-index entry {vertex} -> {id} does not match the edge"
                    )));
                }
            }
            if registered != state.edges.len() {
                return Err(GraphError::Integrity(format!(
                    "{label}-index holds {registered} entries for {} edges",
                    state.edges.len()
                )));
            }
        }
        if state.adjacency.empty_sets() > 0 {
            return Err(GraphError::Integrity(
                "adjacency index keeps empty sets".into(),
            ));
        }
        Ok(())
    }
}

impl PartialEq for Graph {
    /// Structural equality: same flag, same graph attributes, and the same
    /// vertices and edges by id, endpoints and attributes. Insertion order is
    /// ignored.
    fn eq(&self, other: &Self) -> bool {
        if self.undirected != other.undirected {
            return false;
        }
        if Arc::ptr_eq(&self.state, &other.state) {
            return true;
        }
        let (lhs, rhs) = (&self.state, &other.state);
        lhs.attributes == rhs.attributes
            && lhs.vertices.len() == rhs.vertices.len()
            && lhs.edges.len() == rhs.edges.len()
            && lhs.vertices.values().all(|vertex| {
                rhs.vertices
                    .get(&vertex.id())
                    .is_some_and(|other| other.attributes() == vertex.attributes())
            })
            && lhs.edges.values().all(|edge| {
                rhs.edges.get(&edge.id()).is_some_and(|other| {
                    other.tail() == edge.tail()
                        && other.head() == edge.head()
                        && other.attributes() == edge.attributes()
                })
            })
    }
}

impl fmt::Debug for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("undirected", &self.undirected)
            .field("vertices", &self.state.vertices.values().collect::<Vec<_>>())
            .field("edges", &self.state.edges.values().collect::<Vec<_>>())
            .field("attributes", &self.state.attributes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::CounterMetrics;
    use std::sync::atomic::Ordering;

    #[test]
    fn failed_insert_does_not_detach_shared_storage() {
        let mut g1 = Graph::new();
        let a = g1.add_vertex();
        let g2 = g1.clone();
        assert!(g1.shares_storage_with(&g2));

        let missing = VertexId::new();
        assert!(matches!(
            g1.add_edge(a, missing),
            Err(GraphError::UnknownVertex(id)) if id == missing
        ));
        assert!(matches!(
            g1.set_vertex_attr(missing, "x", 1i64),
            Err(GraphError::UnknownVertex(_))
        ));
        assert!(g1.shares_storage_with(&g2));

        g1.set_vertex_attr(a, "x", 1i64).unwrap();
        assert!(!g1.shares_storage_with(&g2));
        assert_eq!(g2.vertex_attr::<i64>(a, "x").unwrap(), None);
    }

    #[test]
    fn metrics_observe_cascades() {
        let metrics = Arc::new(CounterMetrics::default());
        let mut graph = Graph::with_options(GraphOptions::new().metrics(metrics.clone()));
        let a = graph.add_vertex();
        let b = graph.add_vertex();
        graph.add_edge(a, b).unwrap();
        graph.add_edge(b, a).unwrap();
        graph.add_edge(a, a).unwrap();
        graph.out_edges(a).unwrap();
        graph.remove_vertex(a).unwrap();

        assert_eq!(metrics.vertices_inserted.load(Ordering::Relaxed), 2);
        assert_eq!(metrics.edges_inserted.load(Ordering::Relaxed), 3);
        assert_eq!(metrics.edges_removed.load(Ordering::Relaxed), 3);
        assert_eq!(metrics.vertices_removed.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.adjacency_scans_out.load(Ordering::Relaxed), 1);
        graph.check_integrity().unwrap();
    }

    #[test]
    fn self_loops_count_twice_in_degree_once_in_incidence() {
        let mut graph = Graph::new();
        let a = graph.add_vertex();
        let lp = graph.add_edge(a, a).unwrap();
        assert_eq!(graph.incident_edges_count(a).unwrap(), 2);
        assert_eq!(graph.incident_edges(a).unwrap(), BTreeSet::from([lp]));
        assert_eq!(graph.neighbors(a).unwrap(), BTreeSet::from([a]));
        assert!(graph.has_edge_from_to(a, a).unwrap());
        graph.remove_vertex(a).unwrap();
        assert_eq!(graph.edge_count(), 0);
        graph.check_integrity().unwrap();
    }

    #[test]
    fn removing_absent_attributes_keeps_sharing() {
        let mut g1 = Graph::new();
        let a = g1.add_vertex();
        let g2 = g1.clone();
        assert_eq!(g1.remove_vertex_attr(a, "nothing").unwrap(), None);
        assert_eq!(g1.remove_graph_attr("nothing"), None);
        assert!(g1.shares_storage_with(&g2));
    }
}
