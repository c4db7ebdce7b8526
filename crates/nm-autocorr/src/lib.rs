#![deny(missing_docs)]

//! Autocorrelation analysis of randomization chains.
//!
//! An [`AutocorrelationAnalysis`] records, round by round, whether each
//! tracked node pair is an edge. After [`init`](AutocorrelationAnalysis::init)
//! every pair's presence series is subsampled per thinning and tested with a
//! ΔBIC comparison between a first-order Markov model and an independence
//! model. [`run_chain`] drives a [`Randomization`](nm_rand::Randomization)
//! engine through a [`SnapshotSchedule`] and returns a serializable
//! [`AutocorrelationReport`].

mod analysis;
mod chain;
mod config;
mod independence;
mod report;
mod schedule;
mod series;
mod transition;

pub use analysis::{AnalysisConfig, AnalysisPhase, AutocorrelationAnalysis, SeriesIter, SlotTracking};
pub use chain::run_chain;
pub use config::{ChainConfig, SeedPolicy};
pub use independence::{
    slot_independence, validate_thinnings, IndependenceRate, IndependenceResult, SlotVerdict,
};
pub use report::{AutocorrelationReport, ThinningSummary};
pub use schedule::SnapshotSchedule;
pub use series::{EdgeSlot, SlotSeries, TimeSeries};
pub use transition::TransitionMatrix;
