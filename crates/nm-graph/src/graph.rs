use std::collections::BTreeSet;

use nm_core::errors::{ErrorInfo, NmError};
use nm_core::{Edge, NodeId};

use crate::degrees::DegreeSequence;
use crate::flags::{DuplicatePolicy, GraphConfig};
use crate::ids::{edge_error, edge_key, out_of_range, remove_from};

/// Adjacency-list graph over the nodes `0..n`.
///
/// Undirected graphs keep every edge in both endpoints' lists; directed graphs
/// keep separate out- and in-lists. A sorted edge set backs constant-depth
/// membership queries. Every mutation validates its arguments before touching
/// any storage, so a failed call leaves the graph unchanged.
#[derive(Debug, Clone)]
pub struct Graph {
    config: GraphConfig,
    out_adj: Vec<Vec<NodeId>>,
    in_adj: Vec<Vec<NodeId>>,
    edge_set: BTreeSet<Edge>,
    self_loops: usize,
}

impl Graph {
    /// Creates an edgeless graph with `nodes` nodes.
    pub fn new(nodes: usize, config: GraphConfig) -> Result<Self, NmError> {
        config.validate()?;
        let in_adj = if config.directed {
            vec![Vec::new(); nodes]
        } else {
            Vec::new()
        };
        Ok(Self {
            config,
            out_adj: vec![Vec::new(); nodes],
            in_adj,
            edge_set: BTreeSet::new(),
            self_loops: 0,
        })
    }

    /// Creates a graph with `nodes` nodes and the provided edges.
    pub fn from_edges<I>(nodes: usize, config: GraphConfig, edges: I) -> Result<Self, NmError>
    where
        I: IntoIterator,
        I::Item: Into<Edge>,
    {
        let mut graph = Self::new(nodes, config)?;
        for edge in edges {
            let edge = edge.into();
            graph.add_edge(edge.u, edge.v)?;
        }
        Ok(graph)
    }

    /// Returns the configuration used by this graph.
    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Whether edges are ordered pairs.
    pub fn is_directed(&self) -> bool {
        self.config.directed
    }

    /// Whether `(u, u)` edges may be stored.
    pub fn allows_self_loops(&self) -> bool {
        self.config.allow_self_loops
    }

    /// Changes the self-loop policy.
    ///
    /// Enabling requires a directed graph; disabling requires that no
    /// self-loop is currently stored.
    pub fn set_self_loops(&mut self, allow: bool) -> Result<(), NmError> {
        let updated = self.config.with_self_loops(allow);
        updated.validate()?;
        if !allow && self.self_loops > 0 {
            return Err(NmError::InvalidParameter(
                ErrorInfo::new("existing-self-loops", "graph still stores self-loops")
                    .with_context("self_loops", self.self_loops),
            ));
        }
        self.config = updated;
        Ok(())
    }

    /// Number of nodes.
    pub fn number_of_nodes(&self) -> usize {
        self.out_adj.len()
    }

    /// Number of stored edges (each undirected edge counted once).
    pub fn number_of_edges(&self) -> usize {
        self.edge_set.len()
    }

    /// Number of stored self-loops.
    pub fn number_of_self_loops(&self) -> usize {
        self.self_loops
    }

    /// Iterator over all node identifiers.
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = NodeId> {
        (0..self.number_of_nodes()).map(NodeId::new)
    }

    /// Fails with `InvalidEdge` when `node` is not a node of the graph.
    pub fn check_node(&self, node: NodeId) -> Result<(), NmError> {
        if node.index() < self.number_of_nodes() {
            Ok(())
        } else {
            Err(out_of_range(node, self.number_of_nodes()))
        }
    }

    /// Whether the edge `(u, v)` is present. Out-of-range endpoints yield `false`.
    pub fn has_edge(&self, u: NodeId, v: NodeId) -> bool {
        self.edge_set
            .contains(&edge_key(self.config.directed, Edge::new(u, v)))
    }

    /// Inserts the edge `(u, v)`.
    ///
    /// Returns `Ok(true)` when the edge was inserted and `Ok(false)` when it
    /// already existed under [`DuplicatePolicy::Ignore`].
    pub fn add_edge(&mut self, u: NodeId, v: NodeId) -> Result<bool, NmError> {
        self.check_node(u)?;
        self.check_node(v)?;
        let edge = Edge::new(u, v);
        if u == v && !self.config.allow_self_loops {
            return Err(edge_error(
                "self-loop",
                "self-loops are not permitted on this graph",
                edge,
            ));
        }
        let key = edge_key(self.config.directed, edge);
        if self.edge_set.contains(&key) {
            return match self.config.duplicates {
                DuplicatePolicy::Ignore => Ok(false),
                DuplicatePolicy::Reject => Err(edge_error(
                    "duplicate-edge",
                    "edge is already present",
                    edge,
                )),
            };
        }

        self.edge_set.insert(key);
        self.out_adj[u.index()].push(v);
        if self.config.directed {
            self.in_adj[v.index()].push(u);
        } else {
            self.out_adj[v.index()].push(u);
        }
        if u == v {
            self.self_loops += 1;
        }
        Ok(true)
    }

    /// Removes the edge `(u, v)`; fails if it is not present.
    pub fn remove_edge(&mut self, u: NodeId, v: NodeId) -> Result<(), NmError> {
        self.check_node(u)?;
        self.check_node(v)?;
        let edge = Edge::new(u, v);
        let key = edge_key(self.config.directed, edge);
        if !self.edge_set.remove(&key) {
            return Err(edge_error("missing-edge", "edge is not present", edge));
        }
        remove_from(&mut self.out_adj[u.index()], v);
        if self.config.directed {
            remove_from(&mut self.in_adj[v.index()], u);
        } else {
            remove_from(&mut self.out_adj[v.index()], u);
        }
        if u == v {
            self.self_loops -= 1;
        }
        Ok(())
    }

    /// Replaces `first = (u, v)` and `second = (x, y)` by `(u, y)` and `(x, v)`.
    ///
    /// Every endpoint keeps its degree (and in/out-degree). The call fails
    /// without mutating if either input edge is missing or if a replacement
    /// edge would be a duplicate or a disallowed self-loop.
    pub fn swap_edges(&mut self, first: Edge, second: Edge) -> Result<(), NmError> {
        for edge in [first, second] {
            if !self.has_edge(edge.u, edge.v) {
                self.check_node(edge.u)?;
                self.check_node(edge.v)?;
                return Err(edge_error("missing-edge", "edge is not present", edge));
            }
        }
        let directed = self.config.directed;
        if edge_key(directed, first) == edge_key(directed, second) {
            return Err(edge_error(
                "identical-edges",
                "cannot swap an edge with itself",
                first,
            ));
        }
        let new_first = Edge::new(first.u, second.v);
        let new_second = Edge::new(second.u, first.v);
        for edge in [new_first, new_second] {
            if edge.is_self_loop() && !self.config.allow_self_loops {
                return Err(edge_error(
                    "self-loop",
                    "swap would create a self-loop",
                    edge,
                ));
            }
            let key = edge_key(directed, edge);
            let replaced = key == edge_key(directed, first) || key == edge_key(directed, second);
            if self.edge_set.contains(&key) && !replaced {
                return Err(edge_error(
                    "duplicate-edge",
                    "swap would create a duplicate edge",
                    edge,
                ));
            }
        }
        if edge_key(directed, new_first) == edge_key(directed, new_second) {
            return Err(edge_error(
                "duplicate-edge",
                "swap would create a duplicate edge",
                new_first,
            ));
        }

        self.remove_edge(first.u, first.v)?;
        self.remove_edge(second.u, second.v)?;
        self.add_edge(new_first.u, new_first.v)?;
        self.add_edge(new_second.u, new_second.v)?;
        Ok(())
    }

    /// Degree of `node`: neighbor count if undirected, out-degree if directed.
    ///
    /// # Panics
    ///
    /// Panics if `node` is out of range.
    pub fn degree(&self, node: NodeId) -> usize {
        self.out_adj[node.index()].len()
    }

    /// Out-degree of `node` (equal to [`Graph::degree`]).
    pub fn out_degree(&self, node: NodeId) -> usize {
        self.degree(node)
    }

    /// In-degree of `node`; equal to the degree for undirected graphs.
    pub fn in_degree(&self, node: NodeId) -> usize {
        if self.config.directed {
            self.in_adj[node.index()].len()
        } else {
            self.degree(node)
        }
    }

    /// Out-neighbors of `node` (all neighbors if undirected), in storage order.
    pub fn neighbors(&self, node: NodeId) -> &[NodeId] {
        &self.out_adj[node.index()]
    }

    /// In-neighbors of `node`; all neighbors if undirected.
    pub fn in_neighbors(&self, node: NodeId) -> &[NodeId] {
        if self.config.directed {
            &self.in_adj[node.index()]
        } else {
            &self.out_adj[node.index()]
        }
    }

    /// The `i`-th entry of `node`'s neighbor list, if any.
    pub fn ith_neighbor(&self, node: NodeId, i: usize) -> Option<NodeId> {
        self.out_adj.get(node.index())?.get(i).copied()
    }

    /// Lazy iterator over every edge; undirected edges are yielded once, normalized.
    ///
    /// The iterator borrows the graph, so it can be recreated at will but the
    /// graph cannot change while one is alive.
    pub fn edges(&self) -> Edges<'_> {
        Edges {
            graph: self,
            node: 0,
            offset: 0,
        }
    }

    /// All edges in canonical sorted order.
    pub fn edge_list(&self) -> Vec<Edge> {
        self.edge_set.iter().copied().collect()
    }

    /// Degree sequence of the graph (out/in sequences if directed).
    pub fn degree_sequence(&self) -> DegreeSequence {
        if self.config.directed {
            DegreeSequence::Directed {
                out_degrees: self.out_adj.iter().map(Vec::len).collect(),
                in_degrees: self.in_adj.iter().map(Vec::len).collect(),
            }
        } else {
            DegreeSequence::Undirected(self.out_adj.iter().map(Vec::len).collect())
        }
    }

    /// Builds a graph with the same configuration and node count, whose edges
    /// are `self`'s edges relabelled through `permutation`.
    pub fn relabelled(&self, permutation: &[NodeId]) -> Result<Self, NmError> {
        if permutation.len() != self.number_of_nodes() {
            return Err(NmError::InvalidParameter(
                ErrorInfo::new("permutation-length", "permutation must cover every node")
                    .with_context("expected", self.number_of_nodes())
                    .with_context("actual", permutation.len()),
            ));
        }
        let mut seen = vec![false; permutation.len()];
        for image in permutation {
            self.check_node(*image)?;
            if std::mem::replace(&mut seen[image.index()], true) {
                return Err(NmError::InvalidParameter(
                    ErrorInfo::new("permutation-repeats", "permutation maps two nodes together")
                        .with_context("node", image),
                ));
            }
        }
        let mut relabelled = Self::new(self.number_of_nodes(), self.config)?;
        for edge in self.edges() {
            relabelled.add_edge(permutation[edge.u.index()], permutation[edge.v.index()])?;
        }
        Ok(relabelled)
    }
}

/// Iterator returned by [`Graph::edges`].
#[derive(Debug, Clone)]
pub struct Edges<'g> {
    graph: &'g Graph,
    node: usize,
    offset: usize,
}

impl Iterator for Edges<'_> {
    type Item = Edge;

    fn next(&mut self) -> Option<Edge> {
        let directed = self.graph.config.directed;
        while let Some(list) = self.graph.out_adj.get(self.node) {
            if let Some(target) = list.get(self.offset) {
                self.offset += 1;
                let source = NodeId::new(self.node);
                if directed || source <= *target {
                    return Some(Edge::new(source, *target));
                }
            } else {
                self.node += 1;
                self.offset = 0;
            }
        }
        None
    }
}
