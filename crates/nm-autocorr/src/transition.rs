use serde::{Deserialize, Serialize};

/// 2×2 counts of consecutive `(previous, next)` presence pairs.
///
/// `counts[p][n]` holds the number of transitions from state `p` to state
/// `n`, with absent = 0 and present = 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionMatrix {
    counts: [[u64; 2]; 2],
}

impl TransitionMatrix {
    /// Empty matrix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts every consecutive pair of `series`.
    pub fn from_series(series: &[bool]) -> Self {
        let mut matrix = Self::new();
        for pair in series.windows(2) {
            matrix.update(pair[0], pair[1]);
        }
        matrix
    }

    /// Records one transition.
    pub fn update(&mut self, previous: bool, next: bool) {
        self.counts[usize::from(previous)][usize::from(next)] += 1;
    }

    /// Count of `previous → next` transitions.
    pub fn count(&self, previous: bool, next: bool) -> u64 {
        self.counts[usize::from(previous)][usize::from(next)]
    }

    /// Number of transitions `N = x₊₊`.
    pub fn total(&self) -> u64 {
        self.counts.iter().flatten().sum()
    }

    /// Row marginal `x_{i+}`.
    pub fn row(&self, previous: bool) -> u64 {
        self.counts[usize::from(previous)].iter().sum()
    }

    /// Column marginal `x_{+j}`.
    pub fn column(&self, next: bool) -> u64 {
        self.counts.iter().map(|row| row[usize::from(next)]).sum()
    }

    /// Whether every transition stayed absent.
    pub fn is_all_absent(&self) -> bool {
        self.count(false, false) == self.total()
    }

    /// Whether every transition stayed present.
    pub fn is_all_present(&self) -> bool {
        self.count(true, true) == self.total()
    }

    /// Expected count under the independence model, `x_{i+} x_{+j} / x₊₊`.
    ///
    /// `None` when there are no transitions.
    pub fn expected(&self, previous: bool, next: bool) -> Option<f64> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        Some(self.row(previous) as f64 * self.column(next) as f64 / total as f64)
    }

    /// `ΔBIC = -2 Σ x_ij ln(x̂_ij / x_ij) - ln N` between the first-order
    /// Markov model and the independence model.
    ///
    /// Empty cells contribute nothing. Returns `None` when there are no
    /// transitions or a marginal needed for a non-empty cell is zero.
    pub fn delta_bic(&self) -> Option<f64> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        let mut g2 = 0.0;
        for previous in [false, true] {
            for next in [false, true] {
                let observed = self.count(previous, next);
                if observed == 0 {
                    continue;
                }
                let expected = self.expected(previous, next)?;
                if expected <= 0.0 {
                    return None;
                }
                g2 += observed as f64 * (expected / observed as f64).ln();
            }
        }
        Some(-2.0 * g2 - (total as f64).ln())
    }
}
