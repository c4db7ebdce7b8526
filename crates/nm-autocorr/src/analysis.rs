use std::collections::BTreeMap;

use nm_core::errors::{ErrorInfo, NmError};
use nm_core::rng::RngHandle;
use nm_core::{Edge, NodeId};
use nm_graph::Graph;
use rand::seq::index;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::independence::{evaluate, validate_thinnings, IndependenceRate};
use crate::series::{EdgeSlot, SlotSeries, TimeSeries};

/// Which node pairs are tracked as slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SlotTracking {
    /// Every pair seen in at least one sample.
    ObservedEdges {
        /// Keeps `(u, v)` and `(v, u)` apart instead of normalizing.
        #[serde(default)]
        directed: bool,
    },
    /// Every admissible pair of `0..nodes`, present or not.
    AllPairs {
        /// Node count of the sampled graphs.
        nodes: usize,
        /// Ordered pairs instead of unordered ones.
        #[serde(default)]
        directed: bool,
    },
}

impl Default for SlotTracking {
    fn default() -> Self {
        SlotTracking::ObservedEdges { directed: false }
    }
}

impl SlotTracking {
    /// Tracking matching `graph`'s directedness and node count.
    pub fn for_graph(graph: &Graph, all_pairs: bool) -> Self {
        let directed = graph.is_directed();
        if all_pairs {
            SlotTracking::AllPairs {
                nodes: graph.number_of_nodes(),
                directed,
            }
        } else {
            SlotTracking::ObservedEdges { directed }
        }
    }

    /// Whether slots are ordered pairs.
    pub fn is_directed(&self) -> bool {
        match self {
            SlotTracking::ObservedEdges { directed } | SlotTracking::AllPairs { directed, .. } => {
                *directed
            }
        }
    }

    fn key(&self, edge: Edge) -> Edge {
        if self.is_directed() {
            edge
        } else {
            edge.normalized()
        }
    }

    fn check(&self, edge: Edge) -> Result<(), NmError> {
        if let SlotTracking::AllPairs { nodes, .. } = self {
            let largest = edge.u.max(edge.v);
            if largest.index() >= *nodes {
                return Err(NmError::InvalidEdge(
                    ErrorInfo::new("node-out-of-range", "sampled edge leaves the tracked node range")
                        .with_context("edge", edge)
                        .with_context("nodes", nodes),
                ));
            }
            if edge.is_self_loop() {
                return Err(NmError::InvalidEdge(
                    ErrorInfo::new("self-loop", "self-loops are not node pairs")
                        .with_context("edge", edge),
                ));
            }
        }
        Ok(())
    }
}

/// Analysis parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Slot selection.
    #[serde(default)]
    pub tracking: SlotTracking,
    /// Maximum number of samples (rounds) accepted.
    pub max_samples: usize,
}

/// Lifecycle phase of an [`AutocorrelationAnalysis`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnalysisPhase {
    /// Accepting samples.
    Collecting,
    /// Slots and rounds fixed; cursor not yet advanced.
    Finalized,
    /// Cursor advanced at least once.
    Iterating,
    /// Every slot has been yielded.
    Exhausted,
}

/// Records per-slot presence across rounds and tests each slot for
/// independence from its own past.
///
/// Samples are ingested in round order while collecting; [`init`](Self::init)
/// fixes the slots and the round count. Afterwards the slots can be walked
/// once with a forward-only cursor and queried for independence rates any
/// number of times.
#[derive(Debug, Clone)]
pub struct AutocorrelationAnalysis {
    config: AnalysisConfig,
    phase: AnalysisPhase,
    rounds: usize,
    pending: BTreeMap<Edge, TimeSeries>,
    slots: Vec<SlotSeries>,
    cursor: usize,
}

impl AutocorrelationAnalysis {
    /// Empty analysis in the collecting phase.
    pub fn new(config: AnalysisConfig) -> Result<Self, NmError> {
        if config.max_samples == 0 {
            return Err(NmError::invalid_parameter(
                "max-samples",
                "the analysis must accept at least one sample",
            ));
        }
        Ok(Self {
            config,
            phase: AnalysisPhase::Collecting,
            rounds: 0,
            pending: BTreeMap::new(),
            slots: Vec::new(),
            cursor: 0,
        })
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> AnalysisPhase {
        self.phase
    }

    /// Configuration the analysis was built with.
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Samples recorded so far.
    pub fn number_of_rounds(&self) -> usize {
        self.rounds
    }

    /// Tracked slots: observed so far while collecting, fixed after `init`.
    pub fn number_of_slots(&self) -> usize {
        match self.phase {
            AnalysisPhase::Collecting => match self.config.tracking {
                SlotTracking::ObservedEdges { .. } => self.pending.len(),
                SlotTracking::AllPairs { nodes, directed } => pair_count(nodes, directed),
            },
            _ => self.slots.len(),
        }
    }

    /// Records the edge set of one round.
    ///
    /// Every edge is validated before anything is recorded. Edges repeated
    /// within one sample count once.
    pub fn add_sample<I>(&mut self, edges: I) -> Result<(), NmError>
    where
        I: IntoIterator,
        I::Item: Into<Edge>,
    {
        self.require_collecting("add_sample")?;
        if self.rounds == self.config.max_samples {
            return Err(NmError::State(
                ErrorInfo::new("sample-capacity", "sample capacity exhausted")
                    .with_context("max_samples", self.config.max_samples),
            ));
        }
        let tracking = self.config.tracking;
        let keys = edges
            .into_iter()
            .map(|edge| {
                let edge = edge.into();
                tracking.check(edge).map(|()| tracking.key(edge))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let round = self.rounds;
        for key in keys {
            let bits = self.pending.entry(key).or_default().bits_mut();
            if bits.len() > round {
                continue;
            }
            bits.resize(round, false);
            bits.push(true);
        }
        self.rounds += 1;
        Ok(())
    }

    /// Records the current edge set of `graph`.
    pub fn add_graph_sample(&mut self, graph: &Graph) -> Result<(), NmError> {
        if graph.is_directed() != self.config.tracking.is_directed() {
            return Err(NmError::InvalidParameter(
                ErrorInfo::new(
                    "directedness-mismatch",
                    "sampled graph and slot tracking disagree on directedness",
                )
                .with_context("graph_directed", graph.is_directed()),
            ));
        }
        self.add_sample(graph.edges())
    }

    /// Ends collection: fixes slots and pads every series to the round count.
    pub fn init(&mut self) -> Result<(), NmError> {
        self.require_collecting("init")?;
        let rounds = self.rounds;
        let mut pending = std::mem::take(&mut self.pending);
        let finish = |bits: Option<TimeSeries>| {
            let mut series = bits.unwrap_or_default();
            series.bits_mut().resize(rounds, false);
            series
        };

        let entries: Vec<(Edge, TimeSeries)> = match self.config.tracking {
            SlotTracking::ObservedEdges { .. } => pending
                .into_iter()
                .map(|(edge, bits)| (edge, finish(Some(bits))))
                .collect(),
            SlotTracking::AllPairs { nodes, directed } => all_pairs(nodes, directed)
                .map(|edge| {
                    let bits = pending.remove(&edge);
                    (edge, finish(bits))
                })
                .collect(),
        };
        self.slots = entries
            .into_iter()
            .enumerate()
            .map(|(index, (edge, series))| SlotSeries {
                slot: EdgeSlot { index, edge },
                series,
            })
            .collect();
        self.phase = AnalysisPhase::Finalized;
        debug!(slots = self.slots.len(), rounds, "autocorrelation analysis finalized");
        Ok(())
    }

    /// Yields the next slot's series, or `None` once every slot was seen.
    ///
    /// The cursor cannot be rewound; `None` is returned on every later call.
    pub fn next_series(&mut self) -> Result<Option<SlotSeries>, NmError> {
        self.require_finalized("next_series")?;
        Ok(self.advance())
    }

    /// Iterator over the slots the cursor has not yielded yet.
    pub fn series(&mut self) -> Result<SeriesIter<'_>, NmError> {
        self.require_finalized("series")?;
        Ok(SeriesIter { analysis: self })
    }

    /// Series of the slot observing `edge`, if tracked.
    pub fn series_of(&self, edge: Edge) -> Result<Option<&TimeSeries>, NmError> {
        self.require_finalized("series_of")?;
        let key = self.config.tracking.key(edge);
        Ok(self
            .slots
            .binary_search_by_key(&key, |slot| slot.slot.edge)
            .ok()
            .map(|position| &self.slots[position].series))
    }

    /// Independence rate per thinning over every slot.
    pub fn independence_rate(
        &self,
        thinnings: &[usize],
        run_length: usize,
    ) -> Result<Vec<IndependenceRate>, NmError> {
        self.require_finalized("independence_rate")?;
        validate_thinnings(thinnings, run_length)?;
        Ok(self.rates(self.slots.iter(), thinnings, run_length))
    }

    /// Independence rate per thinning over `⌈fraction × slots⌉` slots drawn
    /// uniformly without replacement.
    pub fn independence_rate_sampled(
        &self,
        thinnings: &[usize],
        run_length: usize,
        fraction: f64,
        rng: &mut RngHandle,
    ) -> Result<Vec<IndependenceRate>, NmError> {
        self.require_finalized("independence_rate_sampled")?;
        validate_thinnings(thinnings, run_length)?;
        if !(fraction > 0.0 && fraction <= 1.0) {
            return Err(NmError::InvalidParameter(
                ErrorInfo::new("sample-fraction", "slot fraction must lie in (0, 1]")
                    .with_context("fraction", fraction),
            ));
        }
        let total = self.slots.len();
        let amount = ((fraction * total as f64).ceil() as usize).min(total);
        let mut chosen = index::sample(rng, total, amount).into_vec();
        chosen.sort_unstable();
        Ok(self.rates(
            chosen.into_iter().map(|position| &self.slots[position]),
            thinnings,
            run_length,
        ))
    }

    fn rates<'a>(
        &self,
        slots: impl Iterator<Item = &'a SlotSeries>,
        thinnings: &[usize],
        run_length: usize,
    ) -> Vec<IndependenceRate> {
        let mut rates: Vec<IndependenceRate> =
            thinnings.iter().map(|t| IndependenceRate::empty(*t)).collect();
        for slot in slots {
            let mut seen_independent = false;
            for rate in rates.iter_mut() {
                let result = evaluate(slot.series.as_slice(), rate.thinning, run_length);
                rate.record(&result);
                if result.independent && !seen_independent {
                    rate.first_independent += 1;
                    seen_independent = true;
                }
            }
        }
        for rate in rates.iter_mut() {
            rate.finish();
        }
        rates
    }

    fn advance(&mut self) -> Option<SlotSeries> {
        match self.slots.get(self.cursor) {
            Some(slot) => {
                self.cursor += 1;
                self.phase = AnalysisPhase::Iterating;
                Some(slot.clone())
            }
            None => {
                self.phase = AnalysisPhase::Exhausted;
                None
            }
        }
    }

    fn require_collecting(&self, operation: &str) -> Result<(), NmError> {
        if self.phase != AnalysisPhase::Collecting {
            return Err(phase_error("already-initialized", operation, self.phase));
        }
        Ok(())
    }

    fn require_finalized(&self, operation: &str) -> Result<(), NmError> {
        if self.phase == AnalysisPhase::Collecting {
            return Err(phase_error("not-initialized", operation, self.phase));
        }
        Ok(())
    }
}

fn phase_error(code: &str, operation: &str, phase: AnalysisPhase) -> NmError {
    NmError::State(
        ErrorInfo::new(code, format!("{operation} is not allowed in this phase"))
            .with_context("phase", format!("{phase:?}")),
    )
}

/// Forward-only iterator returned by [`AutocorrelationAnalysis::series`].
#[derive(Debug)]
pub struct SeriesIter<'a> {
    analysis: &'a mut AutocorrelationAnalysis,
}

impl Iterator for SeriesIter<'_> {
    type Item = SlotSeries;

    fn next(&mut self) -> Option<Self::Item> {
        self.analysis.advance()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.analysis.slots.len() - self.analysis.cursor;
        (remaining, Some(remaining))
    }
}

fn pair_count(nodes: usize, directed: bool) -> usize {
    let ordered = nodes * nodes.saturating_sub(1);
    if directed {
        ordered
    } else {
        ordered / 2
    }
}

/// Admissible pairs of `0..nodes` in lexicographic order.
fn all_pairs(nodes: usize, directed: bool) -> impl Iterator<Item = Edge> {
    (0..nodes).flat_map(move |u| {
        let first = if directed { 0 } else { u + 1 };
        (first..nodes)
            .filter(move |v| *v != u)
            .map(move |v| Edge::new(NodeId::new(u), NodeId::new(v)))
    })
}
