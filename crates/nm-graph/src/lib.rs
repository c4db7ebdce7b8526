#![deny(missing_docs)]

//! Simple graph store used by the randomization engines.
//!
//! A [`Graph`] holds nodes `0..n` and either directed or undirected edges.
//! Duplicate edges are never stored and self-loops are only admitted on
//! directed graphs whose [`GraphConfig`] permits them. Per-node degree,
//! out-degree and in-degree are maintained on every mutation.

mod degrees;
mod flags;
mod generators;
mod graph;
mod hash;
mod ids;
mod serialization;

pub use degrees::{DegreeInterval, DegreeIntervals, DegreeSequence};
pub use flags::{DuplicatePolicy, GraphConfig};
pub use generators::gen_gnp;
pub use graph::{Edges, Graph};
pub use hash::canonical_hash;

/// Re-export serialization helpers for downstream crates.
pub use serialization::{
    graph_from_bytes, graph_from_json, graph_to_bytes, graph_to_json, read_graph, write_graph,
};
