//! The encoded graph document.
//!
//! A graph travels as a JSON object holding the undirected flag, the graph
//! attributes, and the vertex and edge records. Attribute bags use the tagged
//! wire form of [`crate::attr::codec`]. Keys are written in sorted order and
//! records in insertion order, so re-encoding a decoded document reproduces
//! it byte for byte.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::attr::codec::{decode_attributes, encode_attributes};
use crate::attr::{AttrMap, Attributes, CodecOptions};
use crate::error::Result;
use crate::model::{Edge, Vertex};
use crate::types::{EdgeId, VertexId};

use super::graph::Graph;
use super::options::GraphOptions;

/// Top-level graph document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    /// Graph attributes; omitted when the bag is empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<AttrMap>,
    /// Edge records.
    pub edges: Vec<EdgeDocument>,
    /// The undirected flag; omitted when `false`.
    #[serde(rename = "isUndirected", default, skip_serializing_if = "is_false")]
    pub is_undirected: bool,
    /// Vertex records.
    pub vertices: Vec<VertexDocument>,
}

/// A vertex record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VertexDocument {
    /// Vertex attributes; omitted when the bag is empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<AttrMap>,
    /// The vertex id.
    pub vertex: VertexId,
}

/// An edge record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeDocument {
    /// Edge attributes; omitted when the bag is empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<AttrMap>,
    /// The edge id.
    pub edge: EdgeId,
    /// Id of the head vertex.
    pub head: VertexId,
    /// Id of the tail vertex.
    pub tail: VertexId,
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

fn decode_bag(map: Option<&AttrMap>, opts: &CodecOptions) -> Result<Attributes> {
    map.map_or_else(|| Ok(Attributes::new()), |map| decode_attributes(map, opts))
}

impl Graph {
    /// Encodes the graph into a document.
    ///
    /// Fails with [`crate::GraphError::AttributeEncode`] if any attribute has
    /// no wire form.
    pub fn to_document(&self) -> Result<GraphDocument> {
        let vertices = self
            .vertices()
            .map(|vertex| {
                Ok(VertexDocument {
                    attributes: encode_attributes(vertex.attributes())?,
                    vertex: vertex.id(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let edges = self
            .edges()
            .map(|edge| {
                Ok(EdgeDocument {
                    attributes: encode_attributes(edge.attributes())?,
                    edge: edge.id(),
                    head: edge.head(),
                    tail: edge.tail(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        debug!(
            vertices = vertices.len(),
            edges = edges.len(),
            "document.encode"
        );
        Ok(GraphDocument {
            attributes: encode_attributes(self.attributes())?,
            edges,
            is_undirected: self.is_undirected(),
            vertices,
        })
    }

    /// Builds a graph from a document with the strict codec options.
    pub fn from_document(doc: &GraphDocument) -> Result<Graph> {
        Self::from_document_with(doc, &CodecOptions::default())
    }

    /// Builds a graph from a document.
    ///
    /// Records go through the validated insert path: duplicate ids, edges
    /// with a missing endpoint and malformed attributes all fail the whole
    /// decode.
    pub fn from_document_with(doc: &GraphDocument, opts: &CodecOptions) -> Result<Graph> {
        let mut graph = Graph::with_options(GraphOptions::new().undirected(doc.is_undirected));
        for (name, value) in decode_bag(doc.attributes.as_ref(), opts)?.iter() {
            graph.set_graph_attr(name, value.clone());
        }
        for record in &doc.vertices {
            let attributes = decode_bag(record.attributes.as_ref(), opts)?;
            graph.insert_vertex(Vertex::from_parts(record.vertex, attributes))?;
        }
        for record in &doc.edges {
            let attributes = decode_bag(record.attributes.as_ref(), opts)?;
            graph.insert_edge(Edge::from_parts(
                record.edge,
                record.tail,
                record.head,
                attributes,
            ))?;
        }
        if cfg!(debug_assertions) {
            graph.check_integrity()?;
        }
        debug!(
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            undirected = graph.is_undirected(),
            "document.decode"
        );
        Ok(graph)
    }

    /// Encodes the graph as compact JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_document()?)?)
    }

    /// Encodes the graph as indented JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_document()?)?)
    }

    /// Decodes a graph from JSON text.
    pub fn from_json(text: &str) -> Result<Graph> {
        Self::from_json_with(text, &CodecOptions::default())
    }

    /// Decodes a graph from JSON text with explicit codec options.
    pub fn from_json_with(text: &str, opts: &CodecOptions) -> Result<Graph> {
        let doc: GraphDocument = serde_json::from_str(text)?;
        Self::from_document_with(&doc, opts)
    }

    /// Writes the graph as compact JSON.
    pub fn to_writer<W: Write>(&self, mut writer: W) -> Result<()> {
        let doc = self.to_document()?;
        serde_json::to_writer(&mut writer, &doc)?;
        writer.flush()?;
        Ok(())
    }

    /// Reads a graph from a JSON stream.
    pub fn from_reader<R: Read>(reader: R) -> Result<Graph> {
        Self::from_reader_with(reader, &CodecOptions::default())
    }

    /// Reads a graph from a JSON stream with explicit codec options.
    pub fn from_reader_with<R: Read>(reader: R, opts: &CodecOptions) -> Result<Graph> {
        let doc: GraphDocument = serde_json::from_reader(reader)?;
        Self::from_document_with(&doc, opts)
    }
}
