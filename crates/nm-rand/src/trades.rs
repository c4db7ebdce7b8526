use nm_core::errors::{ErrorInfo, NmError};
use nm_core::rng::RngHandle;
use nm_core::NodeId;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::warn;

use crate::trade::{Trade, TradeSequence};

/// Source of fresh trade batches.
pub trait TradeGenerator {
    /// Produces a new independent batch; each call advances the generator.
    fn generate(&mut self) -> TradeSequence;
}

fn universe_error(universe: usize) -> NmError {
    NmError::InvalidParameter(
        ErrorInfo::new("trade-universe", "trades need at least two nodes")
            .with_context("universe", universe),
    )
}

/// Independent uniformly random pairs of distinct nodes.
#[derive(Debug, Clone)]
pub struct UniformTradeGenerator {
    count: usize,
    universe: usize,
    rng: RngHandle,
}

impl UniformTradeGenerator {
    /// Generator yielding `count` trades over the nodes `0..universe`.
    pub fn new(count: usize, universe: usize, rng: RngHandle) -> Result<Self, NmError> {
        if universe < 2 {
            return Err(universe_error(universe));
        }
        Ok(Self {
            count,
            universe,
            rng,
        })
    }

    /// Trades per batch.
    pub fn count(&self) -> usize {
        self.count
    }
}

impl TradeGenerator for UniformTradeGenerator {
    fn generate(&mut self) -> TradeSequence {
        let mut trades = Vec::with_capacity(self.count);
        for _ in 0..self.count {
            let a = self.rng.gen_range(0..self.universe);
            let mut b = self.rng.gen_range(0..self.universe);
            while b == a {
                b = self.rng.gen_range(0..self.universe);
            }
            trades.push(Trade::from_distinct(NodeId::new(a), NodeId::new(b)));
        }
        TradeSequence::new(trades)
    }
}

/// Rounds of disjoint trades covering every node once per round.
///
/// Each round draws a uniform permutation of the nodes and pairs consecutive
/// entries. With an odd node count the last node of the permutation sits the
/// round out.
#[derive(Debug, Clone)]
pub struct GlobalTradeGenerator {
    rounds: usize,
    order: Vec<NodeId>,
    rng: RngHandle,
}

impl GlobalTradeGenerator {
    /// Generator yielding `rounds` rounds over the nodes `0..nodes`.
    pub fn new(rounds: usize, nodes: usize, rng: RngHandle) -> Result<Self, NmError> {
        if nodes < 2 {
            return Err(universe_error(nodes));
        }
        if nodes % 2 == 1 {
            warn!(nodes, "odd node count, one node sits out every global round");
        }
        Ok(Self {
            rounds,
            order: (0..nodes).map(NodeId::new).collect(),
            rng,
        })
    }

    /// Trades per round, `⌊n / 2⌋`.
    pub fn round_size(&self) -> usize {
        self.order.len() / 2
    }

    /// Rounds per batch.
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Changes the number of rounds per batch.
    pub fn set_rounds(&mut self, rounds: usize) {
        self.rounds = rounds;
    }
}

impl TradeGenerator for GlobalTradeGenerator {
    fn generate(&mut self) -> TradeSequence {
        let round_size = self.round_size();
        let mut trades = Vec::with_capacity(self.rounds * round_size);
        for _ in 0..self.rounds {
            self.order.shuffle(&mut self.rng);
            trades.extend(
                self.order
                    .chunks_exact(2)
                    .map(|pair| Trade::from_distinct(pair[0], pair[1])),
            );
        }
        TradeSequence::with_rounds(trades, round_size)
    }
}
