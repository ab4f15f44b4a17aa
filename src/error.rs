//! Error type shared by the store and the codec.

use std::io;

use thiserror::Error;

use crate::attr::AttributeKind;
use crate::types::{EdgeId, VertexId};

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, GraphError>;

/// Every failure a graph operation or the document codec can report.
///
/// Errors are raised at the offending call and never leave partial state
/// behind: mutating operations validate before they apply.
#[derive(Debug, Error)]
pub enum GraphError {
    /// A vertex with this id is already present.
    #[error("duplicate vertex {0}")]
    DuplicateVertex(VertexId),
    /// An edge with this id is already present.
    #[error("duplicate edge {0}")]
    DuplicateEdge(EdgeId),
    /// The vertex is not part of the graph.
    #[error("unknown vertex {0}")]
    UnknownVertex(VertexId),
    /// The edge is not part of the graph.
    #[error("unknown edge {0}")]
    UnknownEdge(EdgeId),
    /// The stored attribute holds a different kind than the one requested.
    #[error("attribute '{name}' holds {found}, not {expected}")]
    AttributeTypeMismatch {
        /// Attribute name that was read.
        name: String,
        /// Kind requested by the caller.
        expected: AttributeKind,
        /// Kind actually stored.
        found: AttributeKind,
    },
    /// A wire value could not be decoded into an attribute.
    #[error("attribute decode error: {0}")]
    AttributeDecode(String),
    /// An attribute value has no wire representation.
    #[error("attribute encode error: {0}")]
    AttributeEncode(String),
    /// Store invariants do not hold.
    #[error("integrity violation: {0}")]
    Integrity(String),
    /// The document text is not valid JSON or has the wrong shape.
    #[error("document error: {0}")]
    Json(#[from] serde_json::Error),
    /// Reading or writing the document failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl GraphError {
    pub(crate) fn decode(reason: impl Into<String>) -> Self {
        GraphError::AttributeDecode(reason.into())
    }

    pub(crate) fn encode(reason: impl Into<String>) -> Self {
        GraphError::AttributeEncode(reason.into())
    }
}
