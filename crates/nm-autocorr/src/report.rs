use std::fs;
use std::path::Path;

use nm_core::errors::{ErrorInfo, NmError};
use nm_core::provenance::RunProvenance;
use nm_rand::Statistics;
use serde::{Deserialize, Serialize};

use crate::independence::IndependenceRate;

/// Result of one thinning over the whole chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThinningSummary {
    /// Stride in rounds.
    pub thinning: usize,
    /// Snapshots taken at this stride.
    pub snapshots: usize,
    /// Successful moves performed up to the last snapshot.
    pub successful_moves: u64,
    /// Independence counts and rate.
    pub independence: IndependenceRate,
}

/// Serializable outcome of [`run_chain`](crate::run_chain).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutocorrelationReport {
    /// Seeds, engine label and graph hashes.
    pub provenance: RunProvenance,
    /// Node count of the graph.
    pub nodes: usize,
    /// Edge count before the first round.
    pub initial_edges: usize,
    /// Edge count after the last round.
    pub final_edges: usize,
    /// Rounds performed.
    pub chain_length: usize,
    /// Tracked slots.
    pub slots: usize,
    /// Engine counters at the end of the chain.
    pub statistics: Statistics,
    /// One entry per thinning, in request order.
    pub thinnings: Vec<ThinningSummary>,
}

impl AutocorrelationReport {
    /// Pretty-printed JSON form.
    pub fn to_json(&self) -> Result<String, NmError> {
        serde_json::to_string_pretty(self)
            .map_err(|err| NmError::Serde(ErrorInfo::new("report-serialize", err.to_string())))
    }

    /// Parses a report produced by [`to_json`](Self::to_json).
    pub fn from_json(json: &str) -> Result<Self, NmError> {
        serde_json::from_str(json)
            .map_err(|err| NmError::Serde(ErrorInfo::new("report-parse", err.to_string())))
    }

    /// Writes the JSON form to `path`, creating parent directories.
    pub fn write(&self, path: &Path) -> Result<(), NmError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| {
                NmError::Serde(
                    ErrorInfo::new("report-mkdir", err.to_string())
                        .with_context("path", parent.display()),
                )
            })?;
        }
        let json = self.to_json()?;
        fs::write(path, json).map_err(|err| {
            NmError::Serde(
                ErrorInfo::new("report-write", err.to_string()).with_context("path", path.display()),
            )
        })
    }

    /// Loads a report written by [`write`](Self::write).
    pub fn load(path: &Path) -> Result<Self, NmError> {
        let contents = fs::read_to_string(path).map_err(|err| {
            NmError::Serde(
                ErrorInfo::new("report-read", err.to_string()).with_context("path", path.display()),
            )
        })?;
        Self::from_json(&contents)
    }

    /// Summary of `thinning`, if it was evaluated.
    pub fn thinning(&self, thinning: usize) -> Option<&ThinningSummary> {
        self.thinnings.iter().find(|summary| summary.thinning == thinning)
    }
}
