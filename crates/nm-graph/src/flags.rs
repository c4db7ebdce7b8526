use nm_core::errors::{ErrorInfo, NmError};
use nm_core::provenance::SchemaVersion;
use serde::{Deserialize, Serialize};

/// Behaviour of [`Graph::add_edge`](crate::Graph::add_edge) when the edge already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// Fail with an `InvalidEdge` error.
    #[default]
    Reject,
    /// Leave the graph untouched and report `Ok(false)`.
    Ignore,
}

/// Configuration options that control the behaviour of [`Graph`](crate::Graph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Whether edges are ordered pairs.
    pub directed: bool,
    /// Whether `(u, u)` edges are admitted. Only valid for directed graphs.
    #[serde(default)]
    pub allow_self_loops: bool,
    /// Handling of repeated insertions.
    #[serde(default)]
    pub duplicates: DuplicatePolicy,
    /// Schema version stored alongside serialized payloads.
    #[serde(default = "default_schema")]
    pub schema_version: SchemaVersion,
}

fn default_schema() -> SchemaVersion {
    SchemaVersion::new(1, 0, 0)
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self::undirected()
    }
}

impl GraphConfig {
    /// Undirected simple graph.
    pub fn undirected() -> Self {
        Self {
            directed: false,
            allow_self_loops: false,
            duplicates: DuplicatePolicy::Reject,
            schema_version: default_schema(),
        }
    }

    /// Directed graph without self-loops.
    pub fn directed() -> Self {
        Self {
            directed: true,
            ..Self::undirected()
        }
    }

    /// Returns the configuration with the self-loop flag replaced.
    pub fn with_self_loops(mut self, allow: bool) -> Self {
        self.allow_self_loops = allow;
        self
    }

    /// Returns the configuration with the duplicate policy replaced.
    pub fn with_duplicates(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicates = policy;
        self
    }

    /// Rejects combinations no engine supports.
    pub fn validate(&self) -> Result<(), NmError> {
        if self.allow_self_loops && !self.directed {
            return Err(NmError::InvalidParameter(
                ErrorInfo::new(
                    "undirected-self-loops",
                    "self-loops are only supported on directed graphs",
                )
                .with_hint("set directed = true or disable allow_self_loops"),
            ));
        }
        Ok(())
    }
}
