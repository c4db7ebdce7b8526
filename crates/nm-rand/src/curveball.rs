use nm_core::errors::{ErrorInfo, NmError};
use nm_core::rng::RngHandle;
use nm_core::NodeId;
use nm_graph::{Edges, Graph};
use rand::seq::SliceRandom;
use tracing::{debug, instrument};

use crate::config::CurveballConfig;
use crate::engine::Randomization;
use crate::stats::{MoveKind, Statistics, AFFECTED_EDGES};
use crate::trade::{Trade, TradeSequence};
use crate::trades::{TradeGenerator, UniformTradeGenerator};

/// Applies single Curveball trades to a graph.
///
/// Shared by [`Curveball`] and the global variant. The scratch mark vector is
/// sized to the node count and always left cleared between calls.
#[derive(Debug, Clone)]
pub(crate) struct TradeKernel {
    marks: Vec<bool>,
    allow_self_loops: bool,
    statistics: Statistics,
}

impl TradeKernel {
    pub(crate) fn new(nodes: usize, allow_self_loops: bool) -> Self {
        Self {
            marks: vec![false; nodes],
            allow_self_loops,
            statistics: Statistics::new(),
        }
    }

    pub(crate) fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    /// Exchanges the exclusive (out-)neighbors of the trade's endpoints.
    ///
    /// Shared neighbors stay where they are; the partner stays fixed unless
    /// self-loops are allowed. Each endpoint receives as many exclusive
    /// neighbors as it held before, so every degree is unchanged.
    pub(crate) fn apply(
        &mut self,
        graph: &mut Graph,
        trade: Trade,
        rng: &mut RngHandle,
    ) -> Result<(), NmError> {
        let (u, v) = (trade.fst(), trade.snd());
        let affected = graph.degree(u) + graph.degree(v);
        self.statistics.add(AFFECTED_EDGES, affected as u64);
        self.statistics.record(MoveKind::Trade, true);

        let exclusive_u = self.exclusive(graph, u, v);
        let exclusive_v = self.exclusive(graph, v, u);
        if exclusive_u.is_empty() || exclusive_v.is_empty() {
            // one side has nothing to give: any split reproduces the input
            return Ok(());
        }

        let keep = exclusive_u.len();
        let mut pool = Vec::with_capacity(keep + exclusive_v.len());
        pool.extend_from_slice(&exclusive_u);
        pool.extend_from_slice(&exclusive_v);
        pool.shuffle(rng);

        for node in &exclusive_u {
            self.marks[node.index()] = true;
        }
        let (to_u, to_v) = pool.split_at(keep);
        let moved_to_v: Vec<NodeId> = to_v
            .iter()
            .copied()
            .filter(|node| self.marks[node.index()])
            .collect();
        let moved_to_u: Vec<NodeId> = to_u
            .iter()
            .copied()
            .filter(|node| !self.marks[node.index()])
            .collect();
        for node in &exclusive_u {
            self.marks[node.index()] = false;
        }
        debug_assert_eq!(moved_to_u.len(), moved_to_v.len());

        for node in &moved_to_v {
            graph.remove_edge(u, *node)?;
        }
        for node in &moved_to_u {
            graph.remove_edge(v, *node)?;
        }
        for node in &moved_to_v {
            graph.add_edge(v, *node)?;
        }
        for node in &moved_to_u {
            graph.add_edge(u, *node)?;
        }
        Ok(())
    }

    fn exclusive(&mut self, graph: &Graph, owner: NodeId, partner: NodeId) -> Vec<NodeId> {
        for node in graph.neighbors(partner) {
            self.marks[node.index()] = true;
        }
        let exclusive = graph
            .neighbors(owner)
            .iter()
            .copied()
            .filter(|node| !self.marks[node.index()])
            .filter(|node| self.allow_self_loops || *node != partner)
            .collect();
        for node in graph.neighbors(partner) {
            self.marks[node.index()] = false;
        }
        exclusive
    }
}

pub(crate) fn check_self_loop_policy(graph: &Graph, allow_self_loops: bool) -> Result<(), NmError> {
    if allow_self_loops && !graph.is_directed() {
        return Err(NmError::InvalidParameter(
            ErrorInfo::new(
                "undirected-self-loops",
                "self-loops can only be allowed on directed graphs",
            )
            .with_hint("disable allow_self_loops for undirected inputs"),
        ));
    }
    Ok(())
}

/// Curveball engine applying caller-provided trade sequences.
///
/// Owns a deep copy of the input graph; every trade preserves the degree of
/// every node (out- and in-degree for directed graphs).
#[derive(Debug, Clone)]
pub struct Curveball {
    graph: Graph,
    kernel: TradeKernel,
    rng: RngHandle,
}

impl Curveball {
    /// Copies `graph` and prepares the engine.
    pub fn new(graph: &Graph, config: &CurveballConfig, rng: RngHandle) -> Result<Self, NmError> {
        check_self_loop_policy(graph, config.allow_self_loops)?;
        let mut graph = graph.clone();
        if config.allow_self_loops {
            graph.set_self_loops(true)?;
        }
        Ok(Self {
            kernel: TradeKernel::new(graph.number_of_nodes(), config.allow_self_loops),
            graph,
            rng,
        })
    }

    /// Applies `trades` in order.
    ///
    /// Every trade is validated before the first one is applied, so an
    /// `InvalidTrade` error leaves the graph untouched.
    #[instrument(
        name = "curveball.run",
        level = "debug",
        err,
        skip_all,
        fields(trades = trades.len(), nodes = self.graph.number_of_nodes()),
    )]
    pub fn run(&mut self, trades: &TradeSequence) -> Result<(), NmError> {
        trades.validate(self.graph.number_of_nodes())?;
        for trade in trades {
            self.kernel.apply(&mut self.graph, *trade, &mut self.rng)?;
        }
        debug!(
            affected = self.number_of_affected_edges(),
            "curveball trades applied"
        );
        Ok(())
    }

    /// Current graph.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Moves the graph out of the engine.
    pub fn into_graph(self) -> Graph {
        self.graph
    }

    /// Edges of the current graph.
    pub fn edges(&self) -> Edges<'_> {
        self.graph.edges()
    }

    /// Sum of `deg(u) + deg(v)` over every trade applied so far.
    pub fn number_of_affected_edges(&self) -> u64 {
        self.kernel.statistics().get(AFFECTED_EDGES)
    }

    /// Counters accumulated over every run.
    pub fn statistics(&self) -> &Statistics {
        self.kernel.statistics()
    }
}

/// Curveball engine that draws its own uniform trades on every run.
#[derive(Debug, Clone)]
pub struct UniformCurveball {
    curveball: Curveball,
    generator: UniformTradeGenerator,
}

impl UniformCurveball {
    /// Copies `graph`; each run applies `⌈trades_per_node × n⌉` uniform trades.
    pub fn new(
        graph: &Graph,
        config: &CurveballConfig,
        mut rng: RngHandle,
    ) -> Result<Self, NmError> {
        config.validate()?;
        let count = (config.trades_per_node * graph.number_of_nodes() as f64).ceil() as usize;
        let generator = UniformTradeGenerator::new(count, graph.number_of_nodes(), rng.fork())?;
        Ok(Self {
            curveball: Curveball::new(graph, config, rng)?,
            generator,
        })
    }

    /// Underlying trade-driven engine.
    pub fn curveball(&self) -> &Curveball {
        &self.curveball
    }

    /// Moves the graph out of the engine.
    pub fn into_graph(self) -> Graph {
        self.curveball.into_graph()
    }
}

impl Randomization for UniformCurveball {
    fn run(&mut self) -> Result<(), NmError> {
        let trades = self.generator.generate();
        self.curveball.run(&trades)
    }

    fn graph(&self) -> &Graph {
        self.curveball.graph()
    }

    fn statistics(&self) -> Statistics {
        self.curveball.statistics().clone()
    }

    fn label(&self) -> &'static str {
        "curveball"
    }
}
