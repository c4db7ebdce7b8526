use nm_core::errors::{ErrorInfo, NmError};
use serde::{Deserialize, Serialize};

use crate::series::subsample;
use crate::transition::TransitionMatrix;

/// Classification of one slot at one thinning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SlotVerdict {
    /// ΔBIC < 0: the independence model is preferred.
    Independent,
    /// ΔBIC ≥ 0.
    Dependent,
    /// The subsampled series is absent throughout.
    NonExistent,
    /// No transitions or a zero marginal; no statistic exists.
    Skipped,
}

impl SlotVerdict {
    /// Whether the slot enters the independence-rate denominator.
    pub fn is_evaluated(&self) -> bool {
        matches!(self, SlotVerdict::Independent | SlotVerdict::Dependent)
    }
}

/// Outcome of the ΔBIC test for one slot at one thinning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndependenceResult {
    /// Stride used for subsampling.
    pub thinning: usize,
    /// Transitions in the subsampled series.
    pub transitions: u64,
    /// ΔBIC of the transition matrix, when defined.
    pub delta_bic: Option<f64>,
    /// Classification; series absent throughout are never independent.
    pub verdict: SlotVerdict,
    /// Shorthand for `verdict == Independent`.
    pub independent: bool,
}

/// Aggregate of [`IndependenceResult`]s over all slots for one thinning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndependenceRate {
    /// Stride used for subsampling.
    pub thinning: usize,
    /// Transitions summed over evaluated slots.
    pub transitions: u64,
    /// Slots with ΔBIC < 0.
    pub independent: usize,
    /// Slots with ΔBIC ≥ 0.
    pub dependent: usize,
    /// Slots absent throughout.
    pub non_existent: usize,
    /// Slots without a statistic.
    pub skipped: usize,
    /// Slots for which this is the first thinning, in request order, deemed independent.
    pub first_independent: usize,
    /// `independent / (independent + dependent)`, `None` if nothing was evaluated.
    pub rate: Option<f64>,
}

impl IndependenceRate {
    pub(crate) fn empty(thinning: usize) -> Self {
        Self {
            thinning,
            transitions: 0,
            independent: 0,
            dependent: 0,
            non_existent: 0,
            skipped: 0,
            first_independent: 0,
            rate: None,
        }
    }

    pub(crate) fn record(&mut self, result: &IndependenceResult) {
        match result.verdict {
            SlotVerdict::Independent => self.independent += 1,
            SlotVerdict::Dependent => self.dependent += 1,
            SlotVerdict::NonExistent => self.non_existent += 1,
            SlotVerdict::Skipped => self.skipped += 1,
        }
        if result.verdict.is_evaluated() {
            self.transitions += result.transitions;
        }
    }

    pub(crate) fn finish(&mut self) {
        let evaluated = self.independent + self.dependent;
        self.rate = (evaluated > 0).then(|| self.independent as f64 / evaluated as f64);
    }

    /// Slots counted under any verdict.
    pub fn slots(&self) -> usize {
        self.independent + self.dependent + self.non_existent + self.skipped
    }
}

/// Rejects empty thinning lists, zero strides and runs shorter than two points.
pub fn validate_thinnings(thinnings: &[usize], run_length: usize) -> Result<(), NmError> {
    if thinnings.is_empty() {
        return Err(NmError::invalid_parameter(
            "empty-thinnings",
            "at least one thinning is required",
        ));
    }
    if let Some(position) = thinnings.iter().position(|t| *t == 0) {
        return Err(NmError::InvalidParameter(
            ErrorInfo::new("zero-thinning", "thinnings must be at least 1")
                .with_context("position", position),
        ));
    }
    if run_length < 2 {
        return Err(NmError::InvalidParameter(
            ErrorInfo::new("run-length", "a run needs at least two points")
                .with_context("run_length", run_length),
        ));
    }
    Ok(())
}

/// Tests one series at one thinning.
///
/// The series is subsampled at stride `thinning` (at most `run_length`
/// points), the transitions of the result are counted, and the slot is
/// independent iff its ΔBIC is negative. A series absent at every point is
/// non-existent and never tested; one present throughout is tested like any
/// other.
pub fn slot_independence(
    series: &[bool],
    thinning: usize,
    run_length: usize,
) -> Result<IndependenceResult, NmError> {
    validate_thinnings(&[thinning], run_length)?;
    Ok(evaluate(series, thinning, run_length))
}

pub(crate) fn evaluate(series: &[bool], thinning: usize, run_length: usize) -> IndependenceResult {
    let points = subsample(series, thinning, run_length);
    let matrix = TransitionMatrix::from_series(&points);
    let delta_bic = matrix.delta_bic();
    let verdict = if points.iter().all(|bit| !*bit) {
        SlotVerdict::NonExistent
    } else {
        match delta_bic {
            None => SlotVerdict::Skipped,
            Some(value) if value < 0.0 => SlotVerdict::Independent,
            Some(_) => SlotVerdict::Dependent,
        }
    };
    IndependenceResult {
        thinning,
        transitions: matrix.total(),
        delta_bic,
        verdict,
        independent: verdict == SlotVerdict::Independent,
    }
}
