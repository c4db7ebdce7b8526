use nm_core::Edge;
use serde::{Deserialize, Serialize};

/// Stable identifier of a tracked candidate edge position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeSlot {
    /// Position of the slot in iteration order.
    pub index: usize,
    /// Node pair the slot observes.
    pub edge: Edge,
}

/// Presence of one slot over the recorded rounds, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeSeries(Vec<bool>);

impl TimeSeries {
    /// Wraps recorded presence bits.
    pub fn new(bits: Vec<bool>) -> Self {
        Self(bits)
    }

    /// Presence bits in round order.
    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }

    /// Number of rounds.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no round was recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Presence at `round`, if recorded.
    pub fn get(&self, round: usize) -> Option<bool> {
        self.0.get(round).copied()
    }

    /// Rounds in which the slot was present.
    pub fn occupancy(&self) -> usize {
        self.0.iter().filter(|bit| **bit).count()
    }

    /// `series[0], series[t], series[2t], …`, at most `run_length` points.
    pub fn subsample(&self, thinning: usize, run_length: usize) -> Vec<bool> {
        subsample(&self.0, thinning, run_length)
    }

    pub(crate) fn bits_mut(&mut self) -> &mut Vec<bool> {
        &mut self.0
    }
}

impl From<Vec<bool>> for TimeSeries {
    fn from(bits: Vec<bool>) -> Self {
        Self(bits)
    }
}

/// One slot together with its full time series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSeries {
    /// Slot identity.
    pub slot: EdgeSlot,
    /// Presence per round.
    pub series: TimeSeries,
}

pub(crate) fn subsample(bits: &[bool], thinning: usize, run_length: usize) -> Vec<bool> {
    bits.iter()
        .step_by(thinning.max(1))
        .take(run_length)
        .copied()
        .collect()
}
