use std::collections::BTreeMap;

use nm_core::errors::NmError;
use nm_core::rng::RngHandle;
use nm_core::NodeId;
use nm_graph::Graph;
use rand::seq::SliceRandom;
use tracing::{debug, instrument};

use crate::engine::Randomization;
use crate::stats::Statistics;

/// Relabels nodes by a uniform random permutation within each degree class.
///
/// Undirected graphs group nodes by degree; directed graphs by the pair
/// `(in-degree, out-degree)`. The relabelled graph therefore has exactly the
/// input's degree sequence. Repeated runs compose: each run shuffles the
/// graph produced by the previous one.
#[derive(Debug, Clone)]
pub struct DegreePreservingShuffle {
    graph: Graph,
    permutation: Vec<NodeId>,
    rng: RngHandle,
    runs: u64,
}

impl DegreePreservingShuffle {
    /// Copies `graph`; the permutation is the identity until the first run.
    pub fn new(graph: &Graph, rng: RngHandle) -> Self {
        Self {
            permutation: graph.nodes().collect(),
            graph: graph.clone(),
            rng,
            runs: 0,
        }
    }

    /// Draws a fresh permutation and relabels the current graph with it.
    #[instrument(
        name = "shuffle.run",
        level = "debug",
        err,
        skip_all,
        fields(nodes = self.graph.number_of_nodes()),
    )]
    pub fn run(&mut self) -> Result<(), NmError> {
        let mut classes: BTreeMap<(usize, usize), Vec<NodeId>> = BTreeMap::new();
        for node in self.graph.nodes() {
            let key = if self.graph.is_directed() {
                (self.graph.in_degree(node), self.graph.out_degree(node))
            } else {
                (self.graph.degree(node), 0)
            };
            classes.entry(key).or_default().push(node);
        }

        let mut permutation: Vec<NodeId> = self.graph.nodes().collect();
        for members in classes.values() {
            let mut images = members.clone();
            images.shuffle(&mut self.rng);
            for (node, image) in members.iter().zip(images) {
                permutation[node.index()] = image;
            }
        }

        self.graph = self.graph.relabelled(&permutation)?;
        self.permutation = permutation;
        self.runs += 1;
        debug!(classes = classes.len(), "degree classes shuffled");
        Ok(())
    }

    /// Permutation `π` applied by the last run: node `u` became `π[u]`.
    pub fn permutation(&self) -> &[NodeId] {
        &self.permutation
    }

    /// Current graph.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Moves the graph out of the engine.
    pub fn into_graph(self) -> Graph {
        self.graph
    }
}

impl Randomization for DegreePreservingShuffle {
    fn run(&mut self) -> Result<(), NmError> {
        DegreePreservingShuffle::run(self)
    }

    fn graph(&self) -> &Graph {
        &self.graph
    }

    fn statistics(&self) -> Statistics {
        let mut statistics = Statistics::new();
        statistics.add("runs", self.runs);
        statistics
    }

    fn label(&self) -> &'static str {
        "degree-preserving-shuffle"
    }
}
