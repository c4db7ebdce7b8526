use std::fs;
use std::path::Path;

use nm_core::errors::{ErrorInfo, NmError};
use nm_core::Edge;
use serde::{Deserialize, Serialize};

use crate::flags::GraphConfig;
use crate::graph::Graph;

/// Serializes the graph to a compact binary representation using `bincode`.
pub fn graph_to_bytes(graph: &Graph) -> Result<Vec<u8>, NmError> {
    let serializable = SerializableGraph::from_graph(graph);
    bincode::serialize(&serializable)
        .map_err(|err| NmError::Serde(ErrorInfo::new("serialize-bytes", err.to_string())))
}

/// Restores a graph from its binary representation.
pub fn graph_from_bytes(bytes: &[u8]) -> Result<Graph, NmError> {
    let serializable: SerializableGraph = bincode::deserialize(bytes)
        .map_err(|err| NmError::Serde(ErrorInfo::new("deserialize-bytes", err.to_string())))?;
    serializable.into_graph()
}

/// Serializes the graph to a JSON string.
pub fn graph_to_json(graph: &Graph) -> Result<String, NmError> {
    let serializable = SerializableGraph::from_graph(graph);
    serde_json::to_string_pretty(&serializable)
        .map_err(|err| NmError::Serde(ErrorInfo::new("serialize-json", err.to_string())))
}

/// Restores a graph from a JSON string, re-validating every edge.
pub fn graph_from_json(json: &str) -> Result<Graph, NmError> {
    let serializable: SerializableGraph = serde_json::from_str(json)
        .map_err(|err| NmError::Serde(ErrorInfo::new("deserialize-json", err.to_string())))?;
    serializable.into_graph()
}

/// Writes the JSON form of `graph` to `path`.
pub fn write_graph(graph: &Graph, path: &Path) -> Result<(), NmError> {
    let json = graph_to_json(graph)?;
    fs::write(path, json).map_err(|err| {
        NmError::Serde(
            ErrorInfo::new("graph-write", err.to_string())
                .with_context("path", path.display()),
        )
    })
}

/// Reads a graph previously written by [`write_graph`].
pub fn read_graph(path: &Path) -> Result<Graph, NmError> {
    let contents = fs::read_to_string(path).map_err(|err| {
        NmError::Serde(
            ErrorInfo::new("graph-read", err.to_string()).with_context("path", path.display()),
        )
    })?;
    graph_from_json(&contents)
}

#[derive(Debug, Serialize, Deserialize)]
struct SerializableGraph {
    config: GraphConfig,
    nodes: usize,
    edges: Vec<(usize, usize)>,
}

impl SerializableGraph {
    fn from_graph(graph: &Graph) -> Self {
        Self {
            config: *graph.config(),
            nodes: graph.number_of_nodes(),
            edges: graph
                .edge_list()
                .into_iter()
                .map(|edge| (edge.u.index(), edge.v.index()))
                .collect(),
        }
    }

    fn into_graph(self) -> Result<Graph, NmError> {
        Graph::from_edges(self.nodes, self.config, self.edges.into_iter().map(Edge::from))
    }
}
