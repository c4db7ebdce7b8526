use nm_core::errors::{ErrorInfo, NmError};
use serde::{Deserialize, Serialize};

use crate::independence::validate_thinnings;

/// Rounds at which each thinning observes the chain.
///
/// The chain length is a multiple of the least common multiple of all
/// thinnings, long enough that the coarsest thinning takes at least
/// `min_snapshots` snapshots: `max(lcm, ⌈min_snapshots / (lcm / t_max)⌉ × lcm)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotSchedule {
    thinnings: Vec<usize>,
    min_snapshots: usize,
    max_snapshots: usize,
    lcm: usize,
    chain_length: usize,
    snapshots: Vec<usize>,
}

impl SnapshotSchedule {
    /// Validates the thinnings and derives the chain length and snapshot rounds.
    pub fn new(
        thinnings: &[usize],
        min_snapshots: usize,
        max_snapshots: usize,
    ) -> Result<Self, NmError> {
        validate_thinnings(thinnings, 2)?;
        if max_snapshots == 0 {
            return Err(NmError::invalid_parameter(
                "max-snapshots",
                "at least one snapshot per thinning is required",
            ));
        }
        let lcm = thinnings.iter().try_fold(1usize, |acc, t| {
            (acc / gcd(acc, *t)).checked_mul(*t).ok_or_else(|| {
                NmError::InvalidParameter(
                    ErrorInfo::new("thinning-overflow", "lcm of thinnings overflows")
                        .with_context("thinning", t),
                )
            })
        })?;
        let t_max = thinnings.iter().copied().max().unwrap_or(1);
        let per_block = lcm / t_max;
        let blocks = min_snapshots.div_ceil(per_block);
        let chain_length = blocks
            .checked_mul(lcm)
            .ok_or_else(|| {
                NmError::InvalidParameter(
                    ErrorInfo::new("chain-overflow", "chain length overflows")
                        .with_context("min_snapshots", min_snapshots),
                )
            })?
            .max(lcm);

        let mut snapshots: Vec<usize> = thinnings
            .iter()
            .flat_map(|t| points(*t, chain_length, max_snapshots))
            .collect();
        snapshots.sort_unstable();
        snapshots.dedup();

        Ok(Self {
            thinnings: thinnings.to_vec(),
            min_snapshots,
            max_snapshots,
            lcm,
            chain_length,
            snapshots,
        })
    }

    /// Thinnings in request order.
    pub fn thinnings(&self) -> &[usize] {
        &self.thinnings
    }

    /// Least common multiple of the thinnings.
    pub fn lcm(&self) -> usize {
        self.lcm
    }

    /// Number of randomization rounds in the chain.
    pub fn chain_length(&self) -> usize {
        self.chain_length
    }

    /// Requested lower bound on snapshots of the coarsest thinning.
    pub fn min_snapshots(&self) -> usize {
        self.min_snapshots
    }

    /// Cap on snapshots per thinning.
    pub fn max_snapshots(&self) -> usize {
        self.max_snapshots
    }

    /// Sorted union of every thinning's snapshot rounds.
    pub fn snapshots(&self) -> &[usize] {
        &self.snapshots
    }

    /// Snapshot rounds `t, 2t, …` of one thinning.
    pub fn points_for(&self, thinning: usize) -> Vec<usize> {
        points(thinning, self.chain_length, self.max_snapshots).collect()
    }

    /// Last snapshot round of `thinning`, if it takes any.
    pub fn last_snapshot_for(&self, thinning: usize) -> Option<usize> {
        let count = self.snapshot_count(thinning);
        (count > 0).then(|| count * thinning)
    }

    /// Number of snapshots `thinning` takes.
    pub fn snapshot_count(&self, thinning: usize) -> usize {
        if thinning == 0 {
            return 0;
        }
        (self.chain_length / thinning).min(self.max_snapshots)
    }
}

fn points(thinning: usize, chain_length: usize, max_snapshots: usize) -> impl Iterator<Item = usize> {
    let count = (chain_length / thinning).min(max_snapshots);
    (1..=count).map(move |i| i * thinning)
}

fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gcd_matches_hand_values() {
        assert_eq!(gcd(12, 18), 6);
        assert_eq!(gcd(7, 1), 1);
        assert_eq!(gcd(1, 7), 1);
    }
}
