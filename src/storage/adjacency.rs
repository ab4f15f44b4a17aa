use rustc_hash::{FxHashMap, FxHashSet};

use crate::model::Edge;
use crate::types::{EdgeId, VertexId};

/// Direction of an adjacency lookup.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Dir {
    /// Edges whose tail is the vertex.
    Out,
    /// Edges whose head is the vertex.
    In,
    /// Both directions.
    Both,
}

impl Dir {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Dir::Out => "out",
            Dir::In => "in",
            Dir::Both => "both",
        }
    }
}

type EdgeSets = FxHashMap<VertexId, FxHashSet<EdgeId>>;

/// Out-edges per tail and in-edges per head.
///
/// A vertex without edges in a direction has no entry for it; sets are never
/// left empty.
#[derive(Clone, Debug, Default)]
pub(crate) struct AdjacencyIndex {
    out_edges: EdgeSets,
    in_edges: EdgeSets,
}

impl AdjacencyIndex {
    pub(crate) fn insert(&mut self, edge: &Edge) {
        self.out_edges
            .entry(edge.tail())
            .or_default()
            .insert(edge.id());
        self.in_edges
            .entry(edge.head())
            .or_default()
            .insert(edge.id());
    }

    pub(crate) fn remove(&mut self, edge: &Edge) {
        detach(&mut self.out_edges, edge.tail(), edge.id());
        detach(&mut self.in_edges, edge.head(), edge.id());
    }

    /// Edge ids incident to `vertex` in `dir`. `Both` yields a self-loop twice.
    pub(crate) fn edges(&self, vertex: VertexId, dir: Dir) -> impl Iterator<Item = EdgeId> + '_ {
        let out = matches!(dir, Dir::Out | Dir::Both)
            .then(|| self.out_edges.get(&vertex))
            .flatten();
        let inc = matches!(dir, Dir::In | Dir::Both)
            .then(|| self.in_edges.get(&vertex))
            .flatten();
        out.into_iter()
            .flatten()
            .chain(inc.into_iter().flatten())
            .copied()
    }

    pub(crate) fn degree(&self, vertex: VertexId, dir: Dir) -> usize {
        let count = |sets: &EdgeSets| sets.get(&vertex).map_or(0, FxHashSet::len);
        match dir {
            Dir::Out => count(&self.out_edges),
            Dir::In => count(&self.in_edges),
            Dir::Both => count(&self.out_edges) + count(&self.in_edges),
        }
    }

    #[cfg(test)]
    pub(crate) fn has_entry(&self, vertex: VertexId, dir: Dir) -> bool {
        match dir {
            Dir::Out => self.out_edges.contains_key(&vertex),
            Dir::In => self.in_edges.contains_key(&vertex),
            Dir::Both => {
                self.out_edges.contains_key(&vertex) || self.in_edges.contains_key(&vertex)
            }
        }
    }

    /// Every `(vertex, edge)` pair registered in `dir` (`Out` or `In`).
    pub(crate) fn entries(&self, dir: Dir) -> impl Iterator<Item = (VertexId, EdgeId)> + '_ {
        let sets = match dir {
            Dir::In => &self.in_edges,
            Dir::Out | Dir::Both => &self.out_edges,
        };
        sets.iter()
            .flat_map(|(vertex, edges)| edges.iter().map(move |edge| (*vertex, *edge)))
    }

    pub(crate) fn empty_sets(&self) -> usize {
        self.out_edges
            .values()
            .chain(self.in_edges.values())
            .filter(|set| set.is_empty())
            .count()
    }
}

fn detach(sets: &mut EdgeSets, vertex: VertexId, edge: EdgeId) {
    if let Some(set) = sets.get_mut(&vertex) {
        set.remove(&edge);
        if set.is_empty() {
            sets.remove(&vertex);
        }
    }
}
