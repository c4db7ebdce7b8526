//! Provenance and schema descriptors attached to serialized artifacts.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Semantic version describing the schema of serialized payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SchemaVersion {
    /// Major version incremented for breaking changes.
    pub major: u32,
    /// Minor version incremented for additive changes.
    pub minor: u32,
    /// Patch version incremented for bug fixes.
    pub patch: u32,
}

impl SchemaVersion {
    /// Creates a new schema version descriptor.
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        Self::new(1, 0, 0)
    }
}

/// Provenance recorded alongside reports and serialized graphs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RunProvenance {
    /// Schema of the enclosing payload.
    pub schema: SchemaVersion,
    /// Canonical hash of the graph the run started from.
    pub input_graph_hash: String,
    /// Canonical hash of the graph at the end of the run.
    pub output_graph_hash: String,
    /// Master deterministic seed used for all randomness.
    pub seed: u64,
    /// Optional label from the seed policy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed_label: Option<String>,
    /// Name of the randomization engine that produced the data.
    pub engine: String,
    /// Version map for the crates involved in the run.
    pub tool_versions: BTreeMap<String, String>,
}
