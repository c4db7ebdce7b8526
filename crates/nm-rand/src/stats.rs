use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Kind of move performed by an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MoveKind {
    /// Curveball exchange of exclusive neighbors between two nodes.
    Trade,
    /// Two edges exchanging endpoints.
    EdgeSwitch,
    /// Toggle of a single node pair, either direction.
    InsertionDeletion,
    /// Toggle that found the pair absent.
    Insertion,
    /// Toggle that found the pair present.
    Deletion,
    /// Rotation of an edge around a shared endpoint.
    HingeFlip,
    /// Step in which no move type was drawn.
    Lazy,
}

impl MoveKind {
    /// Stable label used in statistics keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            MoveKind::Trade => "trade",
            MoveKind::EdgeSwitch => "edge-switch",
            MoveKind::InsertionDeletion => "insertion-deletion",
            MoveKind::Insertion => "insertion",
            MoveKind::Deletion => "deletion",
            MoveKind::HingeFlip => "hinge-flip",
            MoveKind::Lazy => "lazy",
        }
    }
}

/// Ordered map from counter label to count.
///
/// Move counters are stored as `attempted-<kind>` and `successful-<kind>`;
/// engines may add further counters such as `affected-edges`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Statistics {
    counters: BTreeMap<String, u64>,
}

/// Counter holding the number of edges touched by successful moves.
pub const AFFECTED_EDGES: &str = "affected-edges";

impl Statistics {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one attempt of `kind`, and one success if `accepted`.
    pub fn record(&mut self, kind: MoveKind, accepted: bool) {
        self.add(&attempted_key(kind), 1);
        if accepted {
            self.add(&successful_key(kind), 1);
        } else {
            self.counters.entry(successful_key(kind)).or_insert(0);
        }
    }

    /// Adds `amount` to the counter `key`.
    pub fn add(&mut self, key: &str, amount: u64) {
        *self.counters.entry(key.to_owned()).or_insert(0) += amount;
    }

    /// Value of counter `key` (zero if never touched).
    pub fn get(&self, key: &str) -> u64 {
        self.counters.get(key).copied().unwrap_or(0)
    }

    /// Attempts recorded for `kind`.
    pub fn attempted(&self, kind: MoveKind) -> u64 {
        self.get(&attempted_key(kind))
    }

    /// Successes recorded for `kind`.
    pub fn successful(&self, kind: MoveKind) -> u64 {
        self.get(&successful_key(kind))
    }

    /// Sum of every `successful-*` counter, excluding the per-direction
    /// insertion and deletion counters already folded into
    /// `successful-insertion-deletion`.
    pub fn total_successful(&self) -> u64 {
        [
            MoveKind::Trade,
            MoveKind::EdgeSwitch,
            MoveKind::InsertionDeletion,
            MoveKind::HingeFlip,
        ]
        .iter()
        .map(|kind| self.successful(*kind))
        .sum()
    }

    /// Iterates counters in label order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counters.iter().map(|(key, value)| (key.as_str(), *value))
    }

    /// Whether no counter has been touched.
    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }

    /// Drops every counter.
    pub fn clear(&mut self) {
        self.counters.clear();
    }
}

fn attempted_key(kind: MoveKind) -> String {
    format!("attempted-{}", kind.as_str())
}

fn successful_key(kind: MoveKind) -> String {
    format!("successful-{}", kind.as_str())
}
