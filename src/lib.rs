//! Penumbra: an in-memory attributed property graph.
//!
//! A [`Graph`] holds vertices and directed edges, each carrying a bag of
//! typed [`Attributes`]. The store keeps an out-index and an in-index so
//! adjacency queries cost `O(degree)`, refuses edges whose endpoints are
//! missing, and removes incident edges together with their vertex. Graphs
//! have value semantics: clones are cheap snapshots that copy on first write.
//!
//! Graphs travel as JSON documents in which strings carry a short type tag
//! (`s:`, `ymd:`, `url:`, `id:`, `xy:`, `wh:`, `xywh:`, `rgba:`), see
//! [`attr::codec`].
//!
//! ```
//! use penumbra::{AttributeName, Graph};
//!
//! let mut graph = Graph::new();
//! let wolf = graph.add_vertex();
//! let moon = graph.add_vertex();
//! let howls = graph.add_edge(wolf, moon)?;
//! graph.set_vertex_attr(wolf, AttributeName::CONCEPT, "Wolf")?;
//!
//! assert!(graph.out_edges(wolf)?.contains(&howls));
//! assert!(graph.to_json()?.contains("\"s:Wolf\""));
//! # Ok::<(), penumbra::GraphError>(())
//! ```

#![warn(missing_docs)]

pub mod attr;
pub mod error;
pub mod model;
pub mod storage;
pub mod types;

pub use attr::{
    AttrMap, AttributeKind, AttributeName, AttributeValue, Attributes, CodecOptions, Color,
    FromAttribute, Point, Rect, Size, StringTag, Uri, TIMESTAMP_EPSILON,
};
pub use error::{GraphError, Result};
pub use model::{Edge, Vertex};
pub use storage::{
    CounterMetrics, Dir, DirectedGraph, EdgeDocument, GeneralGraph, Graph, GraphDocument,
    GraphMetrics, GraphOptions, NoopMetrics, UndirectedGraph, VertexDocument,
};
pub use types::{EdgeId, VertexId};
