use nm_core::errors::{ErrorInfo, NmError};
use nm_core::rng::RngHandle;
use nm_core::NodeId;
use rand::Rng;
use tracing::debug;

use crate::flags::GraphConfig;
use crate::graph::Graph;

/// Samples a G(n, p) graph: every admissible pair is an edge independently with probability `p`.
///
/// Directed graphs consider both orientations of every pair; self-loops are
/// never generated.
pub fn gen_gnp(nodes: usize, p: f64, directed: bool, rng: &mut RngHandle) -> Result<Graph, NmError> {
    if !(0.0..=1.0).contains(&p) {
        return Err(NmError::InvalidParameter(
            ErrorInfo::new("edge-probability", "edge probability must lie in [0, 1]")
                .with_context("p", p),
        ));
    }
    let config = if directed {
        GraphConfig::directed()
    } else {
        GraphConfig::undirected()
    };
    let mut graph = Graph::new(nodes, config)?;
    for u in 0..nodes {
        let targets = if directed { 0..nodes } else { u + 1..nodes };
        for v in targets {
            if u != v && rng.gen_bool(p) {
                graph.add_edge(NodeId::new(u), NodeId::new(v))?;
            }
        }
    }
    debug!(nodes, p, directed, edges = graph.number_of_edges(), "sampled G(n, p) graph");
    Ok(graph)
}
