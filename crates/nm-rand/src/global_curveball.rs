use nm_core::errors::{ErrorInfo, NmError};
use nm_core::rng::RngHandle;
use nm_graph::Graph;
use tracing::{debug, instrument};

use crate::config::GlobalCurveballConfig;
use crate::curveball::{check_self_loop_policy, TradeKernel};
use crate::engine::Randomization;
use crate::shuffle::DegreePreservingShuffle;
use crate::stats::{Statistics, AFFECTED_EDGES};
use crate::trades::{GlobalTradeGenerator, TradeGenerator};

/// Curveball driven by global trades: every round pairs all nodes disjointly.
#[derive(Debug, Clone)]
pub struct GlobalCurveball {
    graph: Graph,
    kernel: TradeKernel,
    generator: GlobalTradeGenerator,
    rng: RngHandle,
    preprocess: bool,
}

impl GlobalCurveball {
    /// Copies `graph` and validates the configuration up front.
    ///
    /// `allow_self_loops` is only accepted for directed graphs. Directed
    /// graphs without self-loops must enable the shuffle preprocessing.
    pub fn new(
        graph: &Graph,
        config: &GlobalCurveballConfig,
        mut rng: RngHandle,
    ) -> Result<Self, NmError> {
        check_self_loop_policy(graph, config.allow_self_loops)?;
        if graph.is_directed()
            && !config.allow_self_loops
            && !config.degree_preserving_shuffle_preprocessing
        {
            return Err(NmError::InvalidParameter(
                ErrorInfo::new(
                    "preprocessing-required",
                    "directed graphs without self-loops need the degree-preserving shuffle",
                )
                .with_hint("enable degree_preserving_shuffle_preprocessing"),
            ));
        }
        let mut graph = graph.clone();
        if config.allow_self_loops {
            graph.set_self_loops(true)?;
        }
        let generator =
            GlobalTradeGenerator::new(config.rounds, graph.number_of_nodes(), rng.fork())?;
        Ok(Self {
            kernel: TradeKernel::new(graph.number_of_nodes(), config.allow_self_loops),
            graph,
            generator,
            rng,
            preprocess: config.degree_preserving_shuffle_preprocessing,
        })
    }

    /// Number of global rounds per run.
    pub fn rounds(&self) -> usize {
        self.generator.rounds()
    }

    /// Changes the number of global rounds per run.
    pub fn set_rounds(&mut self, rounds: usize) {
        self.generator.set_rounds(rounds);
    }

    /// Current graph.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Moves the graph out of the engine.
    pub fn into_graph(self) -> Graph {
        self.graph
    }

    /// Sum of `deg(u) + deg(v)` over every trade applied so far.
    pub fn number_of_affected_edges(&self) -> u64 {
        self.kernel.statistics().get(AFFECTED_EDGES)
    }

    /// Runs the configured number of global rounds.
    #[instrument(
        name = "global_curveball.run",
        level = "debug",
        err,
        skip_all,
        fields(rounds = self.generator.rounds(), preprocess = self.preprocess),
    )]
    pub fn run(&mut self) -> Result<(), NmError> {
        if self.preprocess {
            let mut shuffle = DegreePreservingShuffle::new(&self.graph, self.rng.fork());
            shuffle.run()?;
            self.graph = shuffle.into_graph();
            self.preprocess = false;
            debug!("applied degree-preserving shuffle before the first round");
        }
        let trades = self.generator.generate();
        for trade in &trades {
            self.kernel.apply(&mut self.graph, *trade, &mut self.rng)?;
        }
        debug!(trades = trades.len(), "global curveball rounds applied");
        Ok(())
    }
}

impl Randomization for GlobalCurveball {
    fn run(&mut self) -> Result<(), NmError> {
        GlobalCurveball::run(self)
    }

    fn graph(&self) -> &Graph {
        &self.graph
    }

    fn statistics(&self) -> Statistics {
        self.kernel.statistics().clone()
    }

    fn label(&self) -> &'static str {
        "global-curveball"
    }
}
