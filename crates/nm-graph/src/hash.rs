use sha2::{Digest, Sha256};

use crate::flags::GraphConfig;
use crate::graph::Graph;

/// Computes the canonical structural hash for the provided graph.
///
/// Two graphs share a hash exactly when they have the same configuration
/// flags, node count and edge set; adjacency storage order does not matter.
pub fn canonical_hash(graph: &Graph) -> String {
    let mut hasher = Sha256::new();
    encode_config(graph.config(), &mut hasher);
    hasher.update((graph.number_of_nodes() as u64).to_le_bytes());

    let edges = graph.edge_list();
    hasher.update((edges.len() as u64).to_le_bytes());
    for edge in edges {
        hasher.update((edge.u.index() as u64).to_le_bytes());
        hasher.update((edge.v.index() as u64).to_le_bytes());
    }

    format!("{:x}", hasher.finalize())
}

fn encode_config(config: &GraphConfig, hasher: &mut Sha256) {
    if config.directed {
        hasher.update(b"directed");
    } else {
        hasher.update(b"undirected");
    }
    if config.allow_self_loops {
        hasher.update(b"loops:on");
    } else {
        hasher.update(b"loops:off");
    }
    hasher.update(config.schema_version.major.to_le_bytes());
    hasher.update(config.schema_version.minor.to_le_bytes());
    hasher.update(config.schema_version.patch.to_le_bytes());
}
