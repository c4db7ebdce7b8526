use nm_core::errors::{ErrorInfo, NmError};
use nm_core::rng::RngHandle;
use nm_core::Edge;
use nm_graph::Graph;
use rand::Rng;
use tracing::{debug, instrument};

use crate::engine::Randomization;
use crate::shuffle::DegreePreservingShuffle;
use crate::stats::{MoveKind, Statistics, AFFECTED_EDGES};

pub(crate) fn check_switches_per_edge(switches_per_edge: f64) -> Result<(), NmError> {
    if !switches_per_edge.is_finite() || switches_per_edge < 0.0 {
        return Err(NmError::InvalidParameter(
            ErrorInfo::new(
                "switches-per-edge",
                "switches per edge must be a finite non-negative number",
            )
            .with_context("value", switches_per_edge),
        ));
    }
    Ok(())
}

/// Number of attempts for `switches_per_edge` on a graph with `edges` edges.
pub(crate) fn attempts_for(switches_per_edge: f64, edges: usize) -> u64 {
    (switches_per_edge * edges as f64).ceil() as u64
}

/// Runs `attempts` edge-switch proposals on `graph`.
///
/// Each proposal picks two distinct edge positions `(u, v)` and `(x, y)`
/// uniformly (undirected: the second edge is oriented at random) and
/// replaces them by `(u, y)` and `(x, v)` unless that would create a
/// duplicate edge or a disallowed self-loop.
fn switch_edges(
    graph: &mut Graph,
    attempts: u64,
    rng: &mut RngHandle,
    statistics: &mut Statistics,
) -> Result<u64, NmError> {
    let mut edges: Vec<Edge> = graph.edges().collect();
    let m = edges.len();
    if m < 2 {
        debug!(edges = m, "fewer than two edges, nothing to switch");
        return Ok(0);
    }
    let directed = graph.is_directed();
    let allow_loops = graph.allows_self_loops();

    let mut successful = 0u64;
    for _ in 0..attempts {
        let first = rng.gen_range(0..m);
        let mut second = rng.gen_range(0..m - 1);
        if second >= first {
            second += 1;
        }

        let Edge { u, v } = edges[first];
        let mut other = edges[second];
        if !directed && rng.gen_bool(0.5) {
            other = other.reversed();
        }
        let Edge { u: x, v: y } = other;

        let accepted = (allow_loops || (u != y && x != v))
            && !graph.has_edge(u, y)
            && !graph.has_edge(x, v)
            && !(u == x && v == y);
        statistics.record(MoveKind::EdgeSwitch, accepted);
        if !accepted {
            continue;
        }

        graph.remove_edge(u, v)?;
        graph.remove_edge(x, y)?;
        graph.add_edge(u, y)?;
        graph.add_edge(x, v)?;
        edges[first] = Edge::new(u, y);
        edges[second] = Edge::new(x, v);
        successful += 1;
    }
    statistics.add(AFFECTED_EDGES, 2 * successful);
    Ok(successful)
}

/// Edge switching Markov chain on an owned copy of the input graph.
#[derive(Debug, Clone)]
pub struct EdgeSwitching {
    graph: Graph,
    switches_per_edge: f64,
    rng: RngHandle,
    statistics: Statistics,
}

impl EdgeSwitching {
    /// Copies `graph`; with `pre_shuffle` a degree-preserving shuffle is
    /// applied to the copy before any switching.
    pub fn new(
        graph: &Graph,
        switches_per_edge: f64,
        pre_shuffle: bool,
        mut rng: RngHandle,
    ) -> Result<Self, NmError> {
        check_switches_per_edge(switches_per_edge)?;
        let graph = if pre_shuffle {
            let mut shuffle = DegreePreservingShuffle::new(graph, rng.fork());
            shuffle.run()?;
            shuffle.into_graph()
        } else {
            graph.clone()
        };
        Ok(Self {
            graph,
            switches_per_edge,
            rng,
            statistics: Statistics::new(),
        })
    }

    /// Performs `⌈switches_per_edge × m⌉` switch attempts.
    #[instrument(
        name = "edge_switching.run",
        level = "debug",
        err,
        skip_all,
        fields(switches_per_edge = self.switches_per_edge, edges = self.graph.number_of_edges()),
    )]
    pub fn run(&mut self) -> Result<(), NmError> {
        let attempts = attempts_for(self.switches_per_edge, self.graph.number_of_edges());
        let successful =
            switch_edges(&mut self.graph, attempts, &mut self.rng, &mut self.statistics)?;
        debug!(attempts, successful, "edge switching finished");
        Ok(())
    }

    /// Average number of attempts per edge used by the next run.
    pub fn switches_per_edge(&self) -> f64 {
        self.switches_per_edge
    }

    /// Changes the number of attempts per edge.
    pub fn set_switches_per_edge(&mut self, switches_per_edge: f64) -> Result<(), NmError> {
        check_switches_per_edge(switches_per_edge)?;
        self.switches_per_edge = switches_per_edge;
        Ok(())
    }

    /// Twice the number of successful switches so far.
    pub fn number_of_affected_edges(&self) -> u64 {
        self.statistics.get(AFFECTED_EDGES)
    }

    /// Counters accumulated over every run.
    pub fn statistics(&self) -> &Statistics {
        &self.statistics
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

impl Randomization for EdgeSwitching {
    fn run(&mut self) -> Result<(), NmError> {
        EdgeSwitching::run(self)
    }

    fn graph(&self) -> &Graph {
        &self.graph
    }

    fn statistics(&self) -> Statistics {
        self.statistics.clone()
    }

    fn label(&self) -> &'static str {
        "edge-switching"
    }
}

/// Edge switching on caller-owned storage.
///
/// Holds an exclusive borrow of the graph for its whole lifetime, so the
/// caller cannot observe or mutate the graph while the engine exists.
#[derive(Debug)]
pub struct EdgeSwitchingInPlace<'g> {
    graph: &'g mut Graph,
    switches_per_edge: f64,
    rng: RngHandle,
    statistics: Statistics,
}

impl<'g> EdgeSwitchingInPlace<'g> {
    /// Borrows `graph` exclusively.
    pub fn new(
        graph: &'g mut Graph,
        switches_per_edge: f64,
        rng: RngHandle,
    ) -> Result<Self, NmError> {
        check_switches_per_edge(switches_per_edge)?;
        Ok(Self {
            graph,
            switches_per_edge,
            rng,
            statistics: Statistics::new(),
        })
    }

    /// Performs `⌈switches_per_edge × m⌉` switch attempts in place.
    #[instrument(
        name = "edge_switching_in_place.run",
        level = "debug",
        err,
        skip_all,
        fields(switches_per_edge = self.switches_per_edge, edges = self.graph.number_of_edges()),
    )]
    pub fn run(&mut self) -> Result<(), NmError> {
        let attempts = attempts_for(self.switches_per_edge, self.graph.number_of_edges());
        let successful = switch_edges(
            &mut *self.graph,
            attempts,
            &mut self.rng,
            &mut self.statistics,
        )?;
        debug!(attempts, successful, "in-place edge switching finished");
        Ok(())
    }

    /// Average number of attempts per edge used by the next run.
    pub fn switches_per_edge(&self) -> f64 {
        self.switches_per_edge
    }

    /// Changes the number of attempts per edge.
    pub fn set_switches_per_edge(&mut self, switches_per_edge: f64) -> Result<(), NmError> {
        check_switches_per_edge(switches_per_edge)?;
        self.switches_per_edge = switches_per_edge;
        Ok(())
    }

    /// Twice the number of successful switches so far.
    pub fn number_of_affected_edges(&self) -> u64 {
        self.statistics.get(AFFECTED_EDGES)
    }

    /// Counters accumulated over every run.
    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    /// Borrowed graph.
    pub fn graph(&self) -> &Graph {
        &*self.graph
    }
}

impl Randomization for EdgeSwitchingInPlace<'_> {
    fn run(&mut self) -> Result<(), NmError> {
        EdgeSwitchingInPlace::run(self)
    }

    fn graph(&self) -> &Graph {
        &*self.graph
    }

    fn statistics(&self) -> Statistics {
        self.statistics.clone()
    }

    fn label(&self) -> &'static str {
        "edge-switching-in-place"
    }
}
