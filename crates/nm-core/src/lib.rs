#![deny(missing_docs)]

//! Core identifiers, structured errors and deterministic randomness shared by
//! the null-model crates.
//!
//! Every engine in the workspace receives its randomness through an explicit
//! [`RngHandle`] and reports failures through [`NmError`], so a run is fully
//! described by its inputs and master seed.

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod errors;
pub mod provenance;
pub mod rng;

pub use errors::{ErrorInfo, NmError};
pub use provenance::{RunProvenance, SchemaVersion};
pub use rng::{derive_substream_seed, RngHandle};

/// Identifier for a node within a graph of `n` nodes (`0..n`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(usize);

impl NodeId {
    /// Creates a new identifier from its index.
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the index of the node.
    pub const fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for NodeId {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ordered pair of endpoints.
///
/// Undirected graphs store and report edges in [`Edge::normalized`] form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// Tail (or first endpoint).
    pub u: NodeId,
    /// Head (or second endpoint).
    pub v: NodeId,
}

impl Edge {
    /// Creates an edge from `u` to `v`.
    pub const fn new(u: NodeId, v: NodeId) -> Self {
        Self { u, v }
    }

    /// Returns the edge with endpoints ordered so that `u <= v`.
    pub fn normalized(self) -> Self {
        if self.u <= self.v {
            self
        } else {
            self.reversed()
        }
    }

    /// Returns the edge with its endpoints swapped.
    pub const fn reversed(self) -> Self {
        Self {
            u: self.v,
            v: self.u,
        }
    }

    /// Whether both endpoints coincide.
    pub fn is_self_loop(&self) -> bool {
        self.u == self.v
    }
}

impl From<(usize, usize)> for Edge {
    fn from((u, v): (usize, usize)) -> Self {
        Self::new(NodeId(u), NodeId(v))
    }
}

impl From<(NodeId, NodeId)> for Edge {
    fn from((u, v): (NodeId, NodeId)) -> Self {
        Self::new(u, v)
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.u, self.v)
    }
}
