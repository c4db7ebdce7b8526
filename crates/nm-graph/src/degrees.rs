use nm_core::errors::{ErrorInfo, NmError};
use nm_core::NodeId;
use serde::{Deserialize, Serialize};

use crate::graph::Graph;

/// Degree sequence of an undirected or directed graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum DegreeSequence {
    /// One degree per node.
    Undirected(Vec<usize>),
    /// Out- and in-degree per node.
    Directed {
        /// Out-degree of every node.
        out_degrees: Vec<usize>,
        /// In-degree of every node.
        in_degrees: Vec<usize>,
    },
}

impl DegreeSequence {
    /// Number of nodes described by the sequence.
    pub fn len(&self) -> usize {
        match self {
            DegreeSequence::Undirected(degrees) => degrees.len(),
            DegreeSequence::Directed { out_degrees, .. } => out_degrees.len(),
        }
    }

    /// Whether the sequence describes no nodes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checks that some simple graph realises the sequence.
    ///
    /// Undirected sequences are tested with the Erdős–Gallai inequalities;
    /// directed ones with Fulkerson–Chen–Anstee, or Gale–Ryser when
    /// self-loops are permitted.
    pub fn check_feasible(&self, allow_self_loops: bool) -> Result<(), NmError> {
        match self {
            DegreeSequence::Undirected(degrees) => check_undirected(degrees),
            DegreeSequence::Directed {
                out_degrees,
                in_degrees,
            } => check_directed(out_degrees, in_degrees, allow_self_loops),
        }
    }
}

fn infeasible(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
}

fn check_undirected(degrees: &[usize]) -> Result<(), NmError> {
    let n = degrees.len();
    if let Some((node, degree)) = degrees.iter().enumerate().find(|(_, d)| **d >= n.max(1)) {
        return Err(NmError::InfeasibleDegreeSequence(
            infeasible("degree-out-of-range", "degree exceeds the number of other nodes")
                .with_context("node", node)
                .with_context("degree", degree),
        ));
    }
    let total: usize = degrees.iter().sum();
    if total % 2 == 1 {
        return Err(NmError::InfeasibleDegreeSequence(
            infeasible("odd-degree-sum", "undirected degree sum must be even")
                .with_context("sum", total),
        ));
    }

    let mut sorted = degrees.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    let mut prefix = 0usize;
    for k in 1..=n {
        prefix += sorted[k - 1];
        let tail: usize = sorted[k..].iter().map(|d| (*d).min(k)).sum();
        if prefix > k * (k - 1) + tail {
            return Err(NmError::InfeasibleDegreeSequence(
                infeasible("erdos-gallai", "sequence violates the Erdős–Gallai inequality")
                    .with_context("k", k),
            ));
        }
    }
    Ok(())
}

fn check_directed(
    out_degrees: &[usize],
    in_degrees: &[usize],
    allow_self_loops: bool,
) -> Result<(), NmError> {
    let n = out_degrees.len();
    if in_degrees.len() != n {
        return Err(NmError::InvalidParameter(
            ErrorInfo::new("sequence-length", "out- and in-degree sequences differ in length")
                .with_context("out", n)
                .with_context("in", in_degrees.len()),
        ));
    }
    let limit = if allow_self_loops { n } else { n.saturating_sub(1) };
    for (node, (out, inn)) in out_degrees.iter().zip(in_degrees).enumerate() {
        if *out > limit || *inn > limit {
            return Err(NmError::InfeasibleDegreeSequence(
                infeasible("degree-out-of-range", "degree exceeds the number of admissible partners")
                    .with_context("node", node)
                    .with_context("out", out)
                    .with_context("in", inn),
            ));
        }
    }
    let out_sum: usize = out_degrees.iter().sum();
    let in_sum: usize = in_degrees.iter().sum();
    if out_sum != in_sum {
        return Err(NmError::InfeasibleDegreeSequence(
            infeasible("unbalanced-degree-sums", "out-degree and in-degree sums differ")
                .with_context("out", out_sum)
                .with_context("in", in_sum),
        ));
    }

    let mut pairs: Vec<(usize, usize)> = out_degrees
        .iter()
        .copied()
        .zip(in_degrees.iter().copied())
        .collect();
    pairs.sort_unstable_by(|a, b| b.cmp(a));
    let mut prefix = 0usize;
    for k in 1..=n {
        prefix += pairs[k - 1].0;
        let bound: usize = if allow_self_loops {
            pairs.iter().map(|(_, inn)| (*inn).min(k)).sum()
        } else {
            let head: usize = pairs[..k].iter().map(|(_, inn)| (*inn).min(k - 1)).sum();
            let tail: usize = pairs[k..].iter().map(|(_, inn)| (*inn).min(k)).sum();
            head + tail
        };
        if prefix > bound {
            return Err(NmError::InfeasibleDegreeSequence(
                infeasible(
                    "fulkerson-chen-anstee",
                    "sequence violates the directed realisability inequality",
                )
                .with_context("k", k),
            ));
        }
    }
    Ok(())
}

/// Inclusive bounds `lower..=upper` on a node's degree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DegreeInterval {
    /// Smallest admissible degree.
    pub lower: usize,
    /// Largest admissible degree.
    pub upper: usize,
}

impl DegreeInterval {
    /// Creates an interval; validity is checked by [`DegreeIntervals::new`].
    pub const fn new(lower: usize, upper: usize) -> Self {
        Self { lower, upper }
    }

    /// Whether `degree` lies inside the interval.
    pub fn contains(&self, degree: usize) -> bool {
        self.lower <= degree && degree <= self.upper
    }
}

impl From<(usize, usize)> for DegreeInterval {
    fn from((lower, upper): (usize, usize)) -> Self {
        Self::new(lower, upper)
    }
}

/// Validated per-node degree intervals for a graph with `n` nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DegreeIntervals {
    intervals: Vec<DegreeInterval>,
}

impl DegreeIntervals {
    /// Validates one interval per node with `lower <= upper <= nodes - 1`.
    pub fn new<I>(intervals: I, nodes: usize) -> Result<Self, NmError>
    where
        I: IntoIterator,
        I::Item: Into<DegreeInterval>,
    {
        let intervals: Vec<DegreeInterval> = intervals.into_iter().map(Into::into).collect();
        if intervals.len() != nodes {
            return Err(NmError::InvalidParameter(
                ErrorInfo::new(
                    "interval-count-mismatch",
                    "exactly one degree interval per node is required",
                )
                .with_context("nodes", nodes)
                .with_context("intervals", intervals.len()),
            ));
        }
        for (node, interval) in intervals.iter().enumerate() {
            if interval.lower > interval.upper {
                return Err(NmError::InvalidParameter(
                    ErrorInfo::new("interval-inverted", "lower bound exceeds upper bound")
                        .with_context("node", node)
                        .with_context("lower", interval.lower)
                        .with_context("upper", interval.upper),
                ));
            }
            if interval.upper + 1 > nodes {
                return Err(NmError::InvalidParameter(
                    ErrorInfo::new("interval-out-of-range", "upper bound exceeds n - 1")
                        .with_context("node", node)
                        .with_context("upper", interval.upper),
                ));
            }
        }
        Ok(Self { intervals })
    }

    /// Tight intervals `[d, d]` around the graph's current degrees.
    pub fn exact(graph: &Graph) -> Result<Self, NmError> {
        Self::new(
            graph
                .nodes()
                .map(|node| DegreeInterval::new(graph.degree(node), graph.degree(node))),
            graph.number_of_nodes(),
        )
    }

    /// Number of nodes covered.
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// Whether no nodes are covered.
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Interval of `node`.
    ///
    /// # Panics
    ///
    /// Panics if `node` is out of range.
    pub fn get(&self, node: NodeId) -> DegreeInterval {
        self.intervals[node.index()]
    }

    /// All intervals in node order.
    pub fn as_slice(&self) -> &[DegreeInterval] {
        &self.intervals
    }

    /// Nodes of `graph` whose degree lies outside their interval.
    pub fn violations(&self, graph: &Graph) -> Vec<NodeId> {
        graph
            .nodes()
            .filter(|node| {
                self.intervals
                    .get(node.index())
                    .map_or(true, |interval| !interval.contains(graph.degree(*node)))
            })
            .collect()
    }

    /// Whether every degree of `graph` lies inside its interval.
    pub fn contains(&self, graph: &Graph) -> bool {
        graph.number_of_nodes() == self.len() && self.violations(graph).is_empty()
    }
}
