use nm_core::errors::{ErrorInfo, NmError};
use nm_core::rng::RngHandle;
use nm_core::NodeId;
use nm_graph::{DegreeIntervals, Graph};
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, instrument};

use crate::config::{DegreeIntervalConfig, SamplingStrategy, SwitchingDistribution};
use crate::edge_switching::{attempts_for, check_switches_per_edge};
use crate::engine::Randomization;
use crate::stats::{MoveKind, Statistics};

/// How move tuples are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SamplingMode {
    /// Anchors drawn proportional to degree, partners among their neighbors.
    SampleEdges,
    /// Every node of a tuple drawn uniformly and independently.
    SampleTuples,
    /// Tuples read from a shuffled node stream, reshuffled when exhausted.
    GlobalTuples,
}

impl SamplingMode {
    fn from_strategy(strategy: SamplingStrategy) -> Result<Self, NmError> {
        strategy.validate()?;
        Ok(match (strategy.single, strategy.edges) {
            (true, true) => SamplingMode::SampleEdges,
            (true, false) => SamplingMode::SampleTuples,
            _ => SamplingMode::GlobalTuples,
        })
    }
}

/// Randomizes a graph while keeping every degree inside a prescribed interval.
///
/// Mixes three moves: insertion/deletion of a single edge, hinge flips that
/// rotate an edge around one endpoint, and classic edge switches. A move is
/// only performed if every touched degree stays within its interval, so the
/// graph satisfies its intervals after every step. Draws that select no move
/// type are lazy steps.
#[derive(Debug, Clone)]
pub struct DegreeIntervalSwitching {
    graph: Graph,
    intervals: DegreeIntervals,
    upper_weights: Option<WeightedIndex<usize>>,
    number_of_switches: u64,
    distribution: SwitchingDistribution,
    sampling: SamplingStrategy,
    mode: SamplingMode,
    separated: bool,
    stream: Vec<NodeId>,
    cursor: usize,
    rng: RngHandle,
    statistics: Statistics,
}

impl DegreeIntervalSwitching {
    /// Copies `graph` after validating it against `intervals` and `config`.
    ///
    /// Requires an undirected graph with at least four nodes whose current
    /// degrees already lie inside their intervals.
    pub fn new(
        graph: &Graph,
        intervals: DegreeIntervals,
        config: &DegreeIntervalConfig,
        rng: RngHandle,
    ) -> Result<Self, NmError> {
        config.validate()?;
        if graph.is_directed() {
            return Err(NmError::invalid_parameter(
                "directed-unsupported",
                "degree-interval switching requires an undirected graph",
            ));
        }
        let nodes = graph.number_of_nodes();
        if nodes < 4 {
            return Err(NmError::InvalidParameter(
                ErrorInfo::new("too-few-nodes", "graph needs at least four nodes")
                    .with_context("nodes", nodes),
            ));
        }
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
        if let Some(node) = intervals.violations(graph).first() {
            let interval = intervals.get(*node);
            return Err(NmError::InvalidParameter(
                ErrorInfo::new(
                    "graph-outside-intervals",
                    "input degrees must already satisfy their intervals",
                )
                .with_context("node", node)
                .with_context("degree", graph.degree(*node))
                .with_context("lower", interval.lower)
                .with_context("upper", interval.upper),
            ));
        }

        let upper_weights = WeightedIndex::new(intervals.as_slice().iter().map(|i| i.upper)).ok();
        Ok(Self {
            number_of_switches: attempts_for(config.switches_per_edge, graph.number_of_edges()),
            graph: graph.clone(),
            intervals,
            upper_weights,
            distribution: config.distribution,
            sampling: config.sampling,
            mode: SamplingMode::from_strategy(config.sampling)?,
            separated: config.separated,
            stream: (0..nodes).map(NodeId::new).collect(),
            cursor: nodes,
            rng,
            statistics: Statistics::new(),
        })
    }

    /// Resolves the intervals named by `config` against `graph` and builds the engine.
    pub fn from_config(
        graph: &Graph,
        config: &DegreeIntervalConfig,
        rng: RngHandle,
    ) -> Result<Self, NmError> {
        let intervals = config.intervals.resolve(graph)?;
        Self::new(graph, intervals, config, rng)
    }

    /// Performs the configured number of move attempts.
    ///
    /// In separated mode the three move types run as consecutive phases of
    /// `⌊attempts × probability⌋` steps each instead of being interleaved.
    #[instrument(
        name = "degree_interval.run",
        level = "debug",
        err,
        skip_all,
        fields(switches = self.number_of_switches, separated = self.separated),
    )]
    pub fn run(&mut self) -> Result<(), NmError> {
        if self.separated {
            let total = self.number_of_switches as f64;
            let SwitchingDistribution {
                insertion_deletion,
                hinge_flip,
                edge_switch,
            } = self.distribution;
            let phases = [
                (SwitchingDistribution::only(MoveKind::InsertionDeletion), insertion_deletion),
                (SwitchingDistribution::only(MoveKind::HingeFlip), hinge_flip),
                (SwitchingDistribution::only(MoveKind::EdgeSwitch), edge_switch),
            ];
            for (distribution, share) in phases {
                self.run_steps((total * share).floor() as u64, distribution)?;
            }
        } else {
            self.run_steps(self.number_of_switches, self.distribution)?;
        }
        debug_assert!(self.intervals.contains(&self.graph));
        debug!(
            edges = self.graph.number_of_edges(),
            successful = self.statistics.total_successful(),
            "degree-interval switching finished"
        );
        Ok(())
    }

    fn run_steps(&mut self, steps: u64, distribution: SwitchingDistribution) -> Result<(), NmError> {
        let insert_or_hinge = distribution.insertion_deletion + distribution.hinge_flip;
        let any_move = insert_or_hinge + distribution.edge_switch;
        for _ in 0..steps {
            let draw: f64 = self.rng.gen();
            if draw < distribution.insertion_deletion {
                let success = self.sample_insertion_deletion()?;
                self.statistics.record(MoveKind::InsertionDeletion, success);
            } else if draw < insert_or_hinge {
                let success = self.sample_hinge_flip()?;
                self.statistics.record(MoveKind::HingeFlip, success);
            } else if draw < any_move {
                let success = self.sample_edge_switch()?;
                self.statistics.record(MoveKind::EdgeSwitch, success);
            } else {
                self.statistics.record(MoveKind::Lazy, false);
            }
        }
        Ok(())
    }

    fn sample_insertion_deletion(&mut self) -> Result<bool, NmError> {
        let (u, v) = match self.mode {
            SamplingMode::SampleEdges | SamplingMode::SampleTuples => {
                (self.random_node(), self.random_node())
            }
            SamplingMode::GlobalTuples => {
                let [u, v] = self.next_tuple::<2>();
                (u, v)
            }
        };
        self.try_insertion_deletion(u, v)
    }

    fn sample_hinge_flip(&mut self) -> Result<bool, NmError> {
        let (u, v, w) = match self.mode {
            SamplingMode::SampleEdges => {
                let Some(u) = self.node_by_degree() else {
                    return Ok(false);
                };
                let w = self.random_node();
                if u == w {
                    return Ok(false);
                }
                let v = self.random_neighbor(u);
                (u, v, w)
            }
            SamplingMode::SampleTuples => {
                (self.random_node(), self.random_node(), self.random_node())
            }
            SamplingMode::GlobalTuples => {
                let [u, v, w] = self.next_tuple::<3>();
                (u, v, w)
            }
        };
        self.try_hinge_flip(u, v, w)
    }

    fn sample_edge_switch(&mut self) -> Result<bool, NmError> {
        let (s1, t1, s2, t2) = match self.mode {
            SamplingMode::SampleEdges => {
                let (Some(s1), Some(s2)) = (self.node_by_degree(), self.node_by_degree()) else {
                    return Ok(false);
                };
                let t1 = self.random_neighbor(s1);
                if s2 == t1 || self.graph.has_edge(s2, t1) {
                    return Ok(false);
                }
                let t2 = self.random_neighbor(s2);
                (s1, t1, s2, t2)
            }
            SamplingMode::SampleTuples => {
                let s1 = self.random_node();
                let s2 = self.random_node();
                let t1 = self.random_node();
                let t2 = self.random_node();
                (s1, t1, s2, t2)
            }
            SamplingMode::GlobalTuples => {
                let [s1, s2, t1, t2] = self.next_tuple::<4>();
                (s1, t1, s2, t2)
            }
        };
        self.try_edge_switch(s1, t1, s2, t2)
    }

    fn can_remove_neighbor_of(&self, node: NodeId) -> bool {
        self.intervals.get(node).lower < self.graph.degree(node)
    }

    fn can_add_neighbor_to(&self, node: NodeId) -> bool {
        self.intervals.get(node).upper > self.graph.degree(node)
    }

    fn try_insertion_deletion(&mut self, u: NodeId, v: NodeId) -> Result<bool, NmError> {
        if u == v {
            return Ok(false);
        }
        if self.graph.has_edge(u, v) {
            let allowed = self.can_remove_neighbor_of(u) && self.can_remove_neighbor_of(v);
            self.statistics.record(MoveKind::Deletion, allowed);
            if allowed {
                self.graph.remove_edge(u, v)?;
            }
            Ok(allowed)
        } else {
            let allowed = self.can_add_neighbor_to(u) && self.can_add_neighbor_to(v);
            self.statistics.record(MoveKind::Insertion, allowed);
            if allowed {
                self.graph.add_edge(u, v)?;
            }
            Ok(allowed)
        }
    }

    /// Replaces `{u, v}` by `{v, w}`: `u` loses a neighbor and `w` gains one.
    fn try_hinge_flip(&mut self, u: NodeId, v: NodeId, w: NodeId) -> Result<bool, NmError> {
        if u == v || u == w || v == w {
            return Ok(false);
        }
        if !self.graph.has_edge(u, v)
            || self.graph.has_edge(v, w)
            || !self.can_remove_neighbor_of(u)
            || !self.can_add_neighbor_to(w)
        {
            return Ok(false);
        }
        self.graph.remove_edge(u, v)?;
        self.graph.add_edge(v, w)?;
        Ok(true)
    }

    /// Replaces `{s1, t1}` and `{s2, t2}` by `{s1, t2}` and `{s2, t1}`.
    fn try_edge_switch(
        &mut self,
        s1: NodeId,
        t1: NodeId,
        s2: NodeId,
        t2: NodeId,
    ) -> Result<bool, NmError> {
        let distinct = s1 != s2 && s1 != t1 && s1 != t2 && s2 != t1 && s2 != t2 && t1 != t2;
        if !distinct
            || !self.graph.has_edge(s1, t1)
            || !self.graph.has_edge(s2, t2)
            || self.graph.has_edge(s2, t1)
            || self.graph.has_edge(s1, t2)
        {
            return Ok(false);
        }
        self.graph.remove_edge(s1, t1)?;
        self.graph.remove_edge(s2, t2)?;
        self.graph.add_edge(s1, t2)?;
        self.graph.add_edge(s2, t1)?;
        Ok(true)
    }

    fn random_node(&mut self) -> NodeId {
        NodeId::new(self.rng.gen_range(0..self.graph.number_of_nodes()))
    }

    /// Uniform neighbor of a node with positive degree.
    fn random_neighbor(&mut self, node: NodeId) -> NodeId {
        let degree = self.graph.degree(node);
        let offset = self.rng.gen_range(0..degree);
        self.graph.neighbors(node)[offset]
    }

    /// Node drawn with probability proportional to its degree.
    ///
    /// Candidates are proposed proportional to their upper bound and accepted
    /// with probability `degree / upper`. Returns `None` on an edgeless graph.
    fn node_by_degree(&mut self) -> Option<NodeId> {
        if self.graph.number_of_edges() == 0 {
            return None;
        }
        let weights = self.upper_weights.as_ref()?;
        loop {
            let candidate = NodeId::new(weights.sample(&mut self.rng));
            let degree = self.graph.degree(candidate);
            let upper = self.intervals.get(candidate).upper;
            if degree == upper || self.rng.gen_range(0..upper) < degree {
                return Some(candidate);
            }
        }
    }

    fn next_tuple<const K: usize>(&mut self) -> [NodeId; K] {
        if self.stream.len() - self.cursor < K {
            self.stream.shuffle(&mut self.rng);
            self.cursor = 0;
        }
        let mut tuple = [NodeId::new(0); K];
        tuple.copy_from_slice(&self.stream[self.cursor..self.cursor + K]);
        self.cursor += K;
        tuple
    }

    /// Move attempts per run.
    pub fn number_of_switches(&self) -> u64 {
        self.number_of_switches
    }

    /// Sets the move attempts per run directly.
    pub fn set_number_of_switches(&mut self, switches: u64) {
        self.number_of_switches = switches;
    }

    /// Sets the move attempts per run to `⌈switches_per_edge × m⌉` for the current graph.
    pub fn set_switches_per_edge(&mut self, switches_per_edge: f64) -> Result<(), NmError> {
        check_switches_per_edge(switches_per_edge)?;
        self.number_of_switches = attempts_for(switches_per_edge, self.graph.number_of_edges());
        Ok(())
    }

    /// Replaces the move-type probabilities; the remainder is the lazy probability.
    pub fn set_switching_type_distribution(
        &mut self,
        insertion_deletion: f64,
        hinge_flip: f64,
        edge_switch: f64,
    ) -> Result<(), NmError> {
        let distribution = SwitchingDistribution {
            insertion_deletion,
            hinge_flip,
            edge_switch,
        };
        distribution.validate()?;
        self.distribution = distribution;
        Ok(())
    }

    /// Current move-type probabilities.
    pub fn switching_type_distribution(&self) -> SwitchingDistribution {
        self.distribution
    }

    /// Selects how move tuples are sampled; `(single = false, edges = true)` is rejected.
    pub fn set_sampling_strategy(&mut self, single: bool, edges: bool) -> Result<(), NmError> {
        let strategy = SamplingStrategy { single, edges };
        self.mode = SamplingMode::from_strategy(strategy)?;
        self.sampling = strategy;
        Ok(())
    }

    /// Current sampling strategy.
    pub fn sampling_strategy(&self) -> SamplingStrategy {
        self.sampling
    }

    /// Whether move types run in separate phases.
    pub fn is_separated(&self) -> bool {
        self.separated
    }

    /// Switches between interleaved and phased move types.
    pub fn set_separated(&mut self, separated: bool) {
        self.separated = separated;
    }

    /// Attempts recorded for `kind` since the last reset.
    pub fn number_of_attempted(&self, kind: MoveKind) -> u64 {
        self.statistics.attempted(kind)
    }

    /// Successes recorded for `kind` since the last reset.
    pub fn number_of_successful(&self, kind: MoveKind) -> u64 {
        self.statistics.successful(kind)
    }

    /// Lazy steps since the last reset.
    pub fn number_of_lazy(&self) -> u64 {
        self.statistics.attempted(MoveKind::Lazy)
    }

    /// Counters since the last reset.
    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    /// Zeroes every counter.
    pub fn reset_statistics(&mut self) {
        self.statistics.clear();
    }

    /// Intervals enforced by the engine.
    pub fn intervals(&self) -> &DegreeIntervals {
        &self.intervals
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

impl Randomization for DegreeIntervalSwitching {
    fn run(&mut self) -> Result<(), NmError> {
        DegreeIntervalSwitching::run(self)
    }

    fn graph(&self) -> &Graph {
        &self.graph
    }

    fn statistics(&self) -> Statistics {
        self.statistics.clone()
    }

    fn label(&self) -> &'static str {
        "degree-interval-switching"
    }
}
