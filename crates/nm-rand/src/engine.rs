use nm_core::errors::NmError;
use nm_core::rng::RngHandle;
use nm_graph::Graph;
use tracing::info;

use crate::config::EngineConfig;
use crate::curveball::UniformCurveball;
use crate::edge_switching::EdgeSwitching;
use crate::global_curveball::GlobalCurveball;
use crate::interval::DegreeIntervalSwitching;
use crate::shuffle::DegreePreservingShuffle;
use crate::stats::Statistics;

/// Common surface of every randomization engine.
///
/// `run` performs one batch of moves (one call of the engine's own `run`);
/// `graph` exposes the current state between batches.
pub trait Randomization {
    /// Performs one batch of randomization moves.
    fn run(&mut self) -> Result<(), NmError>;
    /// Current graph.
    fn graph(&self) -> &Graph;
    /// Snapshot of the engine's counters.
    fn statistics(&self) -> Statistics;
    /// Stable kebab-case engine name used in reports.
    fn label(&self) -> &'static str;
}

/// Engines that can be built from an [`EngineConfig`].
#[derive(Debug, Clone)]
pub enum Engine {
    /// Curveball with uniform trades.
    Curveball(UniformCurveball),
    /// Global Curveball.
    GlobalCurveball(GlobalCurveball),
    /// Edge switching on an owned copy.
    EdgeSwitching(EdgeSwitching),
    /// Degree-interval switching.
    DegreeIntervalSwitching(DegreeIntervalSwitching),
    /// Degree-preserving shuffle.
    DegreePreservingShuffle(DegreePreservingShuffle),
}

impl Engine {
    fn as_dyn(&self) -> &dyn Randomization {
        match self {
            Engine::Curveball(engine) => engine,
            Engine::GlobalCurveball(engine) => engine,
            Engine::EdgeSwitching(engine) => engine,
            Engine::DegreeIntervalSwitching(engine) => engine,
            Engine::DegreePreservingShuffle(engine) => engine,
        }
    }

    fn as_dyn_mut(&mut self) -> &mut dyn Randomization {
        match self {
            Engine::Curveball(engine) => engine,
            Engine::GlobalCurveball(engine) => engine,
            Engine::EdgeSwitching(engine) => engine,
            Engine::DegreeIntervalSwitching(engine) => engine,
            Engine::DegreePreservingShuffle(engine) => engine,
        }
    }

    /// Moves the graph out of the engine.
    pub fn into_graph(self) -> Graph {
        match self {
            Engine::Curveball(engine) => engine.into_graph(),
            Engine::GlobalCurveball(engine) => engine.into_graph(),
            Engine::EdgeSwitching(engine) => engine.into_graph(),
            Engine::DegreeIntervalSwitching(engine) => engine.into_graph(),
            Engine::DegreePreservingShuffle(engine) => engine.into_graph(),
        }
    }
}

impl Randomization for Engine {
    fn run(&mut self) -> Result<(), NmError> {
        self.as_dyn_mut().run()
    }

    fn graph(&self) -> &Graph {
        self.as_dyn().graph()
    }

    fn statistics(&self) -> Statistics {
        self.as_dyn().statistics()
    }

    fn label(&self) -> &'static str {
        self.as_dyn().label()
    }
}

impl EngineConfig {
    /// Builds the configured engine over a copy of `graph`.
    pub fn build(&self, graph: &Graph, rng: RngHandle) -> Result<Engine, NmError> {
        self.validate()?;
        let engine = match self {
            EngineConfig::Curveball(config) => {
                Engine::Curveball(UniformCurveball::new(graph, config, rng)?)
            }
            EngineConfig::GlobalCurveball(config) => {
                Engine::GlobalCurveball(GlobalCurveball::new(graph, config, rng)?)
            }
            EngineConfig::EdgeSwitching(config) => Engine::EdgeSwitching(EdgeSwitching::new(
                graph,
                config.switches_per_edge,
                config.pre_shuffle,
                rng,
            )?),
            EngineConfig::DegreeIntervalSwitching(config) => Engine::DegreeIntervalSwitching(
                DegreeIntervalSwitching::from_config(graph, config, rng)?,
            ),
            EngineConfig::DegreePreservingShuffle => {
                Engine::DegreePreservingShuffle(DegreePreservingShuffle::new(graph, rng))
            }
        };
        info!(
            engine = engine.label(),
            nodes = graph.number_of_nodes(),
            edges = graph.number_of_edges(),
            "randomization engine ready"
        );
        Ok(engine)
    }
}
