use nm_core::errors::{ErrorInfo, NmError};
use nm_graph::{DegreeInterval, DegreeIntervals, Graph};
use serde::{Deserialize, Serialize};

use crate::edge_switching::check_switches_per_edge;
use crate::stats::MoveKind;

/// Engine selection and parameters, as read from YAML.
///
/// ```yaml
/// type: edge-switching
/// switches_per_edge: 10.0
/// pre_shuffle: true
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum EngineConfig {
    /// Curveball with uniform random trades.
    Curveball(CurveballConfig),
    /// Curveball with global trade rounds.
    GlobalCurveball(GlobalCurveballConfig),
    /// Edge switching on an owned copy.
    EdgeSwitching(EdgeSwitchingConfig),
    /// Degree-interval switching.
    DegreeIntervalSwitching(DegreeIntervalConfig),
    /// Degree-preserving shuffle.
    DegreePreservingShuffle,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig::EdgeSwitching(EdgeSwitchingConfig::default())
    }
}

impl EngineConfig {
    /// Parses a configuration from YAML.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, NmError> {
        let config: Self = serde_yaml::from_str(yaml)
            .map_err(|err| NmError::Serde(ErrorInfo::new("config-yaml", err.to_string())))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every parameter without building an engine.
    pub fn validate(&self) -> Result<(), NmError> {
        match self {
            EngineConfig::Curveball(config) => config.validate(),
            EngineConfig::GlobalCurveball(_) | EngineConfig::DegreePreservingShuffle => Ok(()),
            EngineConfig::EdgeSwitching(config) => check_switches_per_edge(config.switches_per_edge),
            EngineConfig::DegreeIntervalSwitching(config) => config.validate(),
        }
    }
}

/// Parameters for Curveball with uniform trades.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveballConfig {
    /// Trades per run as a multiple of the node count.
    #[serde(default = "default_trades_per_node")]
    pub trades_per_node: f64,
    /// Lets the trade partner move between the two neighbor sets (directed only).
    #[serde(default)]
    pub allow_self_loops: bool,
}

fn default_trades_per_node() -> f64 {
    1.0
}

impl Default for CurveballConfig {
    fn default() -> Self {
        Self {
            trades_per_node: default_trades_per_node(),
            allow_self_loops: false,
        }
    }
}

impl CurveballConfig {
    /// Rejects negative or non-finite trade multipliers.
    pub fn validate(&self) -> Result<(), NmError> {
        if !self.trades_per_node.is_finite() || self.trades_per_node < 0.0 {
            return Err(NmError::InvalidParameter(
                ErrorInfo::new(
                    "trades-per-node",
                    "trades per node must be a finite non-negative number",
                )
                .with_context("value", self.trades_per_node),
            ));
        }
        Ok(())
    }
}

/// Parameters for Global Curveball.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalCurveballConfig {
    /// Global rounds per run.
    #[serde(default = "default_rounds")]
    pub rounds: usize,
    /// Lets the trade partner move between the two neighbor sets (directed only).
    #[serde(default)]
    pub allow_self_loops: bool,
    /// Applies a degree-preserving shuffle before the first round.
    ///
    /// Required for directed graphs without self-loops: fixed trade partners
    /// can never reorient a directed cycle.
    #[serde(default = "default_preprocessing")]
    pub degree_preserving_shuffle_preprocessing: bool,
}

fn default_rounds() -> usize {
    1
}

fn default_preprocessing() -> bool {
    true
}

impl Default for GlobalCurveballConfig {
    fn default() -> Self {
        Self {
            rounds: default_rounds(),
            allow_self_loops: false,
            degree_preserving_shuffle_preprocessing: default_preprocessing(),
        }
    }
}

/// Parameters for edge switching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeSwitchingConfig {
    /// Attempts per run as a multiple of the edge count.
    #[serde(default = "default_switches_per_edge")]
    pub switches_per_edge: f64,
    /// Applies a degree-preserving shuffle to the copy before switching.
    #[serde(default)]
    pub pre_shuffle: bool,
}

fn default_switches_per_edge() -> f64 {
    10.0
}

impl Default for EdgeSwitchingConfig {
    fn default() -> Self {
        Self {
            switches_per_edge: default_switches_per_edge(),
            pre_shuffle: false,
        }
    }
}

/// Probabilities of the three degree-interval move types.
///
/// Each must be non-negative and their sum at most one; the remainder is the
/// probability of a lazy step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwitchingDistribution {
    /// Probability of an insertion/deletion.
    #[serde(default = "default_move_probability")]
    pub insertion_deletion: f64,
    /// Probability of a hinge flip.
    #[serde(default = "default_move_probability")]
    pub hinge_flip: f64,
    /// Probability of an edge switch.
    #[serde(default = "default_move_probability")]
    pub edge_switch: f64,
}

fn default_move_probability() -> f64 {
    1.0 / 6.0
}

impl Default for SwitchingDistribution {
    fn default() -> Self {
        Self {
            insertion_deletion: default_move_probability(),
            hinge_flip: default_move_probability(),
            edge_switch: default_move_probability(),
        }
    }
}

impl SwitchingDistribution {
    /// Distribution that always draws `kind` (lazy for kinds without a probability).
    pub fn only(kind: MoveKind) -> Self {
        let mut distribution = Self {
            insertion_deletion: 0.0,
            hinge_flip: 0.0,
            edge_switch: 0.0,
        };
        match kind {
            MoveKind::InsertionDeletion => distribution.insertion_deletion = 1.0,
            MoveKind::HingeFlip => distribution.hinge_flip = 1.0,
            MoveKind::EdgeSwitch => distribution.edge_switch = 1.0,
            _ => {}
        }
        distribution
    }

    /// Probability of a lazy step.
    pub fn lazy(&self) -> f64 {
        (1.0 - self.insertion_deletion - self.hinge_flip - self.edge_switch).max(0.0)
    }

    /// Rejects negative probabilities and sums above one.
    pub fn validate(&self) -> Result<(), NmError> {
        let values = [self.insertion_deletion, self.hinge_flip, self.edge_switch];
        if values.iter().any(|p| !p.is_finite() || *p < 0.0) {
            return Err(NmError::InvalidParameter(
                ErrorInfo::new("negative-probability", "move probabilities may not be negative")
                    .with_context("insertion_deletion", self.insertion_deletion)
                    .with_context("hinge_flip", self.hinge_flip)
                    .with_context("edge_switch", self.edge_switch),
            ));
        }
        let total: f64 = values.iter().sum();
        if total > 1.0 {
            return Err(NmError::InvalidParameter(
                ErrorInfo::new(
                    "probability-sum",
                    "move probabilities must not sum above 1.0",
                )
                .with_context("sum", total),
            ));
        }
        Ok(())
    }
}

/// Sampling flags for degree-interval switching.
///
/// `single` draws every tuple independently; otherwise tuples are read from a
/// global shuffled node stream. `edges` anchors moves on existing edges. The
/// combination `single = false, edges = true` is not supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplingStrategy {
    /// Per-move sampling instead of a global stream.
    #[serde(default = "default_true")]
    pub single: bool,
    /// Anchor moves on existing edges.
    #[serde(default = "default_true")]
    pub edges: bool,
}

fn default_true() -> bool {
    true
}

impl Default for SamplingStrategy {
    fn default() -> Self {
        Self {
            single: true,
            edges: true,
        }
    }
}

impl SamplingStrategy {
    /// Rejects the unsupported combination.
    pub fn validate(&self) -> Result<(), NmError> {
        if !self.single && self.edges {
            return Err(NmError::InvalidParameter(
                ErrorInfo::new(
                    "unsupported-sampling",
                    "global sampling is only available for node tuples",
                )
                .with_hint("use single = true or edges = false"),
            ));
        }
        Ok(())
    }
}

/// How degree intervals are derived from the input graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum IntervalSpec {
    /// `[d, d]` for every node.
    Exact,
    /// `[max(0, d - below), min(d + above, n - 1)]` for every node.
    Relative {
        /// Slack below the current degree.
        below: usize,
        /// Slack above the current degree.
        above: usize,
    },
    /// One explicit `(lower, upper)` pair per node.
    Explicit {
        /// Bounds in node order.
        bounds: Vec<(usize, usize)>,
    },
}

impl Default for IntervalSpec {
    fn default() -> Self {
        IntervalSpec::Exact
    }
}

impl IntervalSpec {
    /// Builds validated intervals for `graph`.
    pub fn resolve(&self, graph: &Graph) -> Result<DegreeIntervals, NmError> {
        let nodes = graph.number_of_nodes();
        match self {
            IntervalSpec::Exact => DegreeIntervals::exact(graph),
            IntervalSpec::Relative { below, above } => {
                let max_degree = nodes.saturating_sub(1);
                DegreeIntervals::new(
                    graph.nodes().map(|node| {
                        let degree = graph.degree(node);
                        DegreeInterval::new(
                            degree.saturating_sub(*below),
                            degree.saturating_add(*above).min(max_degree),
                        )
                    }),
                    nodes,
                )
            }
            IntervalSpec::Explicit { bounds } => DegreeIntervals::new(bounds.iter().copied(), nodes),
        }
    }
}

/// Parameters for degree-interval switching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegreeIntervalConfig {
    /// Attempts per run as a multiple of the initial edge count.
    #[serde(default = "default_switches_per_edge")]
    pub switches_per_edge: f64,
    /// Move-type probabilities.
    #[serde(default)]
    pub distribution: SwitchingDistribution,
    /// Tuple sampling flags.
    #[serde(default)]
    pub sampling: SamplingStrategy,
    /// Runs move types as consecutive phases.
    #[serde(default)]
    pub separated: bool,
    /// Interval derivation used by [`DegreeIntervalSwitching::from_config`](crate::DegreeIntervalSwitching::from_config).
    #[serde(default)]
    pub intervals: IntervalSpec,
}

impl Default for DegreeIntervalConfig {
    fn default() -> Self {
        Self {
            switches_per_edge: default_switches_per_edge(),
            distribution: SwitchingDistribution::default(),
            sampling: SamplingStrategy::default(),
            separated: false,
            intervals: IntervalSpec::default(),
        }
    }
}

impl DegreeIntervalConfig {
    /// Checks multiplier, probabilities and sampling flags.
    pub fn validate(&self) -> Result<(), NmError> {
        check_switches_per_edge(self.switches_per_edge)?;
        self.distribution.validate()?;
        self.sampling.validate()
    }
}
