use std::fmt;
use std::sync::Arc;

use super::metrics::GraphMetrics;

/// Configuration options supplied when creating a [`super::Graph`].
#[derive(Clone, Default)]
pub struct GraphOptions {
    /// Whether the graph is flagged undirected. The flag is carried through
    /// the document; storage and queries are the same either way.
    pub undirected: bool,
    /// Optional metrics sink.
    pub metrics: Option<Arc<dyn GraphMetrics>>,
}

impl GraphOptions {
    /// Creates options for an empty directed graph without metrics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Flags the graph as undirected.
    pub fn undirected(mut self, undirected: bool) -> Self {
        self.undirected = undirected;
        self
    }

    /// Sets the metrics sink.
    pub fn metrics(mut self, metrics: Arc<dyn GraphMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }
}

impl fmt::Debug for GraphOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphOptions")
            .field("undirected", &self.undirected)
            .field("metrics", &self.metrics.is_some())
            .finish()
    }
}
