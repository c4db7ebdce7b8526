use nm_core::errors::{ErrorInfo, NmError};
use nm_core::{Edge, NodeId};

/// Builds an `InvalidEdge` error for an endpoint outside `0..nodes`.
pub(crate) fn out_of_range(node: NodeId, nodes: usize) -> NmError {
    NmError::InvalidEdge(
        ErrorInfo::new("node-out-of-range", "edge endpoint is not a node of the graph")
            .with_context("node", node)
            .with_context("nodes", nodes),
    )
}

/// Builds an `InvalidEdge` error with the offending edge attached.
pub(crate) fn edge_error(code: &str, message: &str, edge: Edge) -> NmError {
    NmError::InvalidEdge(ErrorInfo::new(code, message).with_context("edge", edge))
}

/// Canonical storage key of an edge: normalized unless the graph is directed.
pub(crate) fn edge_key(directed: bool, edge: Edge) -> Edge {
    if directed {
        edge
    } else {
        edge.normalized()
    }
}

/// Removes one occurrence of `node` from an adjacency list.
pub(crate) fn remove_from(list: &mut Vec<NodeId>, node: NodeId) -> bool {
    match list.iter().position(|candidate| *candidate == node) {
        Some(position) => {
            list.swap_remove(position);
            true
        }
        None => false,
    }
}
