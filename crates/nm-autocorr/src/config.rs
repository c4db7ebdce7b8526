use nm_core::errors::{ErrorInfo, NmError};
use nm_rand::EngineConfig;
use serde::{Deserialize, Serialize};

use crate::independence::validate_thinnings;

/// Parameters of one autocorrelation chain, as read from YAML.
///
/// ```yaml
/// engine:
///   type: edge-switching
///   switches_per_edge: 1.0
/// thinnings: [1, 2, 4]
/// min_snapshots: 20
/// seed:
///   master_seed: 7
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Randomization engine advanced once per round.
    #[serde(default)]
    pub engine: EngineConfig,
    /// Strides at which slots are tested.
    #[serde(default = "default_thinnings")]
    pub thinnings: Vec<usize>,
    /// Minimum snapshots taken by the coarsest thinning.
    #[serde(default = "default_min_snapshots")]
    pub min_snapshots: usize,
    /// Cap on snapshots per thinning.
    #[serde(default = "default_max_snapshots")]
    pub max_snapshots: usize,
    /// Track every node pair instead of only pairs observed as edges.
    #[serde(default)]
    pub all_pairs: bool,
    /// Master seed and label.
    #[serde(default)]
    pub seed: SeedPolicy,
}

fn default_thinnings() -> Vec<usize> {
    vec![1, 2, 4, 8]
}

fn default_min_snapshots() -> usize {
    10
}

fn default_max_snapshots() -> usize {
    1_000
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            thinnings: default_thinnings(),
            min_snapshots: default_min_snapshots(),
            max_snapshots: default_max_snapshots(),
            all_pairs: false,
            seed: SeedPolicy::default(),
        }
    }
}

impl ChainConfig {
    /// Parses and validates a configuration from YAML.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, NmError> {
        let config: Self = serde_yaml::from_str(yaml)
            .map_err(|err| NmError::Serde(ErrorInfo::new("config-yaml", err.to_string())))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks engine parameters, thinnings and snapshot bounds.
    pub fn validate(&self) -> Result<(), NmError> {
        self.engine.validate()?;
        if self.max_snapshots == 0 {
            return Err(NmError::InvalidParameter(
                ErrorInfo::new("max-snapshots", "at least one snapshot per thinning is required")
                    .with_context("max_snapshots", self.max_snapshots),
            ));
        }
        validate_thinnings(&self.thinnings, self.run_length())
    }

    /// Points per subsampled series: one more than the snapshot cap.
    pub fn run_length(&self) -> usize {
        self.max_snapshots.saturating_add(1)
    }
}

/// Master seed and optional label mixed into the engine's stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedPolicy {
    /// Master seed for the run.
    #[serde(default = "default_master_seed")]
    pub master_seed: u64,
    /// Optional label recorded in the report provenance.
    #[serde(default)]
    pub label: Option<String>,
}

fn default_master_seed() -> u64 {
    0x05EE_D5EE_DD15_5EED_u64
}

impl Default for SeedPolicy {
    fn default() -> Self {
        Self {
            master_seed: default_master_seed(),
            label: None,
        }
    }
}

impl SeedPolicy {
    /// Seed handed to the engine.
    pub fn engine_seed(&self) -> u64 {
        nm_rand::determinism::labelled_seed(self.master_seed, self.label.as_deref().unwrap_or(""))
    }
}
