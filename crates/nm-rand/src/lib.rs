#![deny(missing_docs)]

//! Degree-preserving randomization engines.
//!
//! Every engine owns (or exclusively borrows) the graph it perturbs and draws
//! randomness from an explicit [`RngHandle`](nm_core::RngHandle). The
//! [`Randomization`] trait gives callers one surface for running an engine
//! and reading back its graph and counters; [`Engine`] is the closed set of
//! engines that can be built from a YAML [`EngineConfig`].

/// YAML configuration schema and defaults.
pub mod config;
/// Curveball trading on caller-provided trade sequences.
pub mod curveball;
/// Deterministic seed derivation helpers.
pub mod determinism;
/// Degree-interval switching (insertion/deletion, hinge flip, edge switch).
pub mod interval;
/// Edge switching Markov chain, copying and in-place.
pub mod edge_switching;
/// Capability trait and closed engine enum.
pub mod engine;
/// Global Curveball rounds over disjoint trades.
pub mod global_curveball;
/// Random relabelling within degree classes.
pub mod shuffle;
/// Move counters keyed by move kind.
pub mod stats;
/// Trades and trade sequences.
pub mod trade;
/// Uniform and global trade generators.
pub mod trades;

pub use config::{
    CurveballConfig, DegreeIntervalConfig, EdgeSwitchingConfig, EngineConfig,
    GlobalCurveballConfig, IntervalSpec, SamplingStrategy, SwitchingDistribution,
};
pub use curveball::{Curveball, UniformCurveball};
pub use edge_switching::{EdgeSwitching, EdgeSwitchingInPlace};
pub use engine::{Engine, Randomization};
pub use global_curveball::GlobalCurveball;
pub use interval::DegreeIntervalSwitching;
pub use shuffle::DegreePreservingShuffle;
pub use stats::{MoveKind, Statistics};
pub use trade::{Trade, TradeSequence};
pub use trades::{GlobalTradeGenerator, TradeGenerator, UniformTradeGenerator};
