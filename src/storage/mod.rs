//! The in-memory graph store.
//!
//! [`Graph`] owns vertices, edges and graph attributes together with the
//! out/in adjacency indices. The capability traits in [`views`] expose it to
//! code that only needs part of its surface, and [`document`] converts it to
//! and from the encoded graph document.

mod adjacency;
pub mod document;
mod graph;
mod metrics;
mod options;
mod store;
pub mod views;

/// Direction of an adjacency lookup.
pub use adjacency::Dir;

pub use document::{EdgeDocument, GraphDocument, VertexDocument};
pub use graph::Graph;
pub use metrics::{default_metrics, CounterMetrics, GraphMetrics, NoopMetrics};
pub use options::GraphOptions;
pub use views::{DirectedGraph, GeneralGraph, UndirectedGraph};
