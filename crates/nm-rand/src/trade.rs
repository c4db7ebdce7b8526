use nm_core::errors::{ErrorInfo, NmError};
use nm_core::NodeId;
use serde::{Deserialize, Serialize};

/// Unordered pair of distinct nodes, stored with `fst < snd`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Trade {
    fst: NodeId,
    snd: NodeId,
}

impl Trade {
    /// Creates a normalized trade; a node cannot trade with itself.
    pub fn new(a: NodeId, b: NodeId) -> Result<Self, NmError> {
        if a == b {
            return Err(NmError::InvalidTrade(
                ErrorInfo::new("self-trade", "a node cannot trade with itself")
                    .with_context("node", a),
            ));
        }
        Ok(Self::from_distinct(a, b))
    }

    pub(crate) fn from_distinct(a: NodeId, b: NodeId) -> Self {
        debug_assert_ne!(a, b);
        if a < b {
            Self { fst: a, snd: b }
        } else {
            Self { fst: b, snd: a }
        }
    }

    /// Smaller endpoint.
    pub fn fst(&self) -> NodeId {
        self.fst
    }

    /// Larger endpoint.
    pub fn snd(&self) -> NodeId {
        self.snd
    }

    /// Fails with `InvalidTrade` unless both endpoints are below `nodes`.
    /// Also rejects deserialized trades that pair a node with itself.
    pub fn validate(&self, nodes: usize) -> Result<(), NmError> {
        if self.fst == self.snd {
            return Err(NmError::InvalidTrade(
                ErrorInfo::new("self-trade", "a node cannot trade with itself")
                    .with_context("node", self.fst),
            ));
        }
        let largest = self.fst.max(self.snd);
        if largest.index() >= nodes {
            return Err(NmError::InvalidTrade(
                ErrorInfo::new("trade-out-of-range", "trade references a missing node")
                    .with_context("node", largest)
                    .with_context("nodes", nodes),
            ));
        }
        Ok(())
    }
}

/// Finite replayable list of trades applied left to right.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeSequence {
    trades: Vec<Trade>,
    /// Trades per round for sequences made of disjoint rounds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    round_size: Option<usize>,
}

impl TradeSequence {
    /// Wraps a list of trades with no round structure.
    pub fn new(trades: Vec<Trade>) -> Self {
        Self {
            trades,
            round_size: None,
        }
    }

    /// Wraps a list made of consecutive rounds of `round_size` trades.
    pub fn with_rounds(trades: Vec<Trade>, round_size: usize) -> Self {
        Self {
            trades,
            round_size: Some(round_size),
        }
    }

    /// Builds a sequence from raw node pairs, rejecting self-trades.
    pub fn from_pairs<I>(pairs: I) -> Result<Self, NmError>
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let trades = pairs
            .into_iter()
            .map(|(a, b)| Trade::new(NodeId::new(a), NodeId::new(b)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(trades))
    }

    /// Trades in application order.
    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    /// Trades per round, if the sequence was built in rounds.
    pub fn round_size(&self) -> Option<usize> {
        self.round_size
    }

    /// Number of trades.
    pub fn len(&self) -> usize {
        self.trades.len()
    }

    /// Whether the sequence holds no trades.
    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    /// Checks every trade against a graph with `nodes` nodes.
    pub fn validate(&self, nodes: usize) -> Result<(), NmError> {
        for (position, trade) in self.trades.iter().enumerate() {
            trade.validate(nodes).map_err(|err| match err {
                NmError::InvalidTrade(info) => {
                    NmError::InvalidTrade(info.with_context("position", position))
                }
                other => other,
            })?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a TradeSequence {
    type Item = &'a Trade;
    type IntoIter = std::slice::Iter<'a, Trade>;

    fn into_iter(self) -> Self::IntoIter {
        self.trades.iter()
    }
}
