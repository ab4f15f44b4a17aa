use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Observer for graph mutations and adjacency lookups.
///
/// A metrics sink is shared by every clone of a graph; it observes the
/// operations performed on any of the snapshots.
pub trait GraphMetrics: Send + Sync {
    /// Records the insertion of a vertex.
    fn vertex_inserted(&self);

    /// Records the removal of a vertex.
    fn vertex_removed(&self);

    /// Records the insertion of an edge.
    fn edge_inserted(&self);

    /// Records the removal of an edge.
    fn edge_removed(&self);

    /// Records an adjacency lookup.
    ///
    /// # Parameters
    /// * `direction` - "out", "in" or "both".
    fn adjacency_scan(&self, direction: &'static str);
}

/// A [`GraphMetrics`] implementation that discards everything.
#[derive(Default)]
pub struct NoopMetrics;

impl GraphMetrics for NoopMetrics {
    fn vertex_inserted(&self) {}
    fn vertex_removed(&self) {}
    fn edge_inserted(&self) {}
    fn edge_removed(&self) {}
    fn adjacency_scan(&self, _direction: &'static str) {}
}

/// A thread-safe counter-based implementation of [`GraphMetrics`].
#[derive(Debug, Default)]
pub struct CounterMetrics {
    /// Number of vertices inserted.
    pub vertices_inserted: AtomicU64,

    /// Number of vertices removed.
    pub vertices_removed: AtomicU64,

    /// Number of edges inserted, including those read from documents.
    pub edges_inserted: AtomicU64,

    /// Number of edges removed, including cascades.
    pub edges_removed: AtomicU64,

    /// Number of outgoing adjacency lookups.
    pub adjacency_scans_out: AtomicU64,

    /// Number of incoming adjacency lookups.
    pub adjacency_scans_in: AtomicU64,

    /// Number of lookups covering both directions.
    pub adjacency_scans_both: AtomicU64,
}

impl GraphMetrics for CounterMetrics {
    fn vertex_inserted(&self) {
        self.vertices_inserted.fetch_add(1, Ordering::Relaxed);
    }

    fn vertex_removed(&self) {
        self.vertices_removed.fetch_add(1, Ordering::Relaxed);
    }

    fn edge_inserted(&self) {
        self.edges_inserted.fetch_add(1, Ordering::Relaxed);
    }

    fn edge_removed(&self) {
        self.edges_removed.fetch_add(1, Ordering::Relaxed);
    }

    fn adjacency_scan(&self, direction: &'static str) {
        let counter = match direction {
            "out" => &self.adjacency_scans_out,
            "in" => &self.adjacency_scans_in,
            "both" => &self.adjacency_scans_both,
            _ => return,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// Returns the default metrics sink, a [`NoopMetrics`].
pub fn default_metrics() -> Arc<dyn GraphMetrics> {
    Arc::new(NoopMetrics)
}
