use std::collections::BTreeMap;

use nm_core::errors::NmError;
use nm_core::provenance::{RunProvenance, SchemaVersion};
use nm_core::rng::RngHandle;
use nm_graph::{canonical_hash, Graph};
use nm_rand::Randomization;
use tracing::{info, instrument, trace};

use crate::analysis::{AnalysisConfig, AutocorrelationAnalysis, SlotTracking};
use crate::config::ChainConfig;
use crate::report::{AutocorrelationReport, ThinningSummary};
use crate::schedule::SnapshotSchedule;

/// Advances `engine` round by round, sampling its graph after every round,
/// and evaluates the independence rate of every thinning.
///
/// Round 0 is the engine's graph before any move. The chain runs for
/// [`SnapshotSchedule::chain_length`] rounds; each thinning `t` reads the
/// rounds `0, t, 2t, …` up to its snapshot cap.
#[instrument(
    name = "chain.run",
    err,
    skip_all,
    fields(engine = engine.label(), thinnings = ?config.thinnings),
)]
pub fn run_chain<R>(engine: &mut R, config: &ChainConfig) -> Result<AutocorrelationReport, NmError>
where
    R: Randomization + ?Sized,
{
    config.validate()?;
    let schedule =
        SnapshotSchedule::new(&config.thinnings, config.min_snapshots, config.max_snapshots)?;
    let chain_length = schedule.chain_length();

    let start = engine.graph();
    let nodes = start.number_of_nodes();
    let initial_edges = start.number_of_edges();
    let input_graph_hash = canonical_hash(start);
    info!(
        nodes,
        initial_edges,
        chain_length,
        snapshots = schedule.snapshots().len(),
        min_snapshots = config.min_snapshots,
        max_snapshots = config.max_snapshots,
        "starting autocorrelation chain"
    );

    let mut analysis = AutocorrelationAnalysis::new(AnalysisConfig {
        tracking: SlotTracking::for_graph(start, config.all_pairs),
        max_samples: chain_length + 1,
    })?;
    analysis.add_graph_sample(start)?;

    let mut successful_per_round = Vec::with_capacity(chain_length + 1);
    successful_per_round.push(0u64);
    let mut successful_before = engine.statistics().total_successful();
    for round in 1..=chain_length {
        engine.run()?;
        let successful_after = engine.statistics().total_successful();
        successful_per_round.push(successful_after.saturating_sub(successful_before));
        successful_before = successful_after;
        analysis.add_graph_sample(engine.graph())?;
        trace!(round, edges = engine.graph().number_of_edges(), "round sampled");
    }
    analysis.init()?;

    let run_length = config.run_length().min(chain_length + 1);
    let rates = analysis.independence_rate(&config.thinnings, run_length)?;
    let thinnings = rates
        .into_iter()
        .map(|independence| {
            let thinning = independence.thinning;
            let last = schedule.last_snapshot_for(thinning).unwrap_or(0);
            let summary = ThinningSummary {
                thinning,
                snapshots: schedule.snapshot_count(thinning),
                successful_moves: successful_per_round[..=last].iter().sum(),
                independence,
            };
            info!(
                thinning,
                snapshots = summary.snapshots,
                successful_moves = summary.successful_moves,
                independent = independence.independent,
                dependent = independence.dependent,
                non_existent = independence.non_existent,
                rate = ?independence.rate,
                "thinning evaluated"
            );
            summary
        })
        .collect();

    let end = engine.graph();
    let mut tool_versions = BTreeMap::new();
    tool_versions.insert(
        "nm-autocorr".to_owned(),
        env!("CARGO_PKG_VERSION").to_owned(),
    );
    Ok(AutocorrelationReport {
        provenance: RunProvenance {
            schema: SchemaVersion::default(),
            input_graph_hash,
            output_graph_hash: canonical_hash(end),
            seed: config.seed.master_seed,
            seed_label: config.seed.label.clone(),
            engine: engine.label().to_owned(),
            tool_versions,
        },
        nodes,
        initial_edges,
        final_edges: end.number_of_edges(),
        chain_length,
        slots: analysis.number_of_slots(),
        statistics: engine.statistics(),
        thinnings,
    })
}

impl ChainConfig {
    /// Builds the configured engine over a copy of `graph`, seeded from the
    /// seed policy, and runs the chain on it.
    pub fn run(&self, graph: &Graph) -> Result<AutocorrelationReport, NmError> {
        self.validate()?;
        let mut engine = self
            .engine
            .build(graph, RngHandle::from_seed(self.seed.engine_seed()))?;
        run_chain(&mut engine, self)
    }
}
