//! Even split of a total across a number of shares.
//!
//! Every share starts from the same `base`, the largest multiple of the
//! rounding step such that `count * base <= total`. What is left over is
//! handed out one step at a time to shares in index order, cycling, so the
//! first participants absorb the remainder.

/// The rounding step the client works with when none is configured.
pub const DEFAULT_ROUND_TO: u64 = 1000;

/// Upper bound on distribution passes, per share.
const MAX_PASSES_PER_SHARE: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    /// Share every participant receives before top-ups.
    pub base: u64,
    /// Extra amount per participant, each a multiple of the step.
    pub top_ups: Vec<u64>,
    /// Amount smaller than one step that could not be distributed.
    pub residual: u64,
}

impl Split {
    /// Final share of each participant, in input order.
    pub fn shares(&self) -> Vec<u64> {
        self.top_ups.iter().map(|top_up| self.base + top_up).collect()
    }

    /// Sum of all shares, i.e. the total minus the residual.
    pub fn allocated(&self) -> u64 {
        self.shares().iter().sum()
    }
}

/// Divides `total` across `count` shares at a granularity of `round_to`.
///
/// A `count` of zero yields a zero base and no top-ups. A `round_to` of zero
/// is treated as one. The result is a pure function of its inputs.
pub fn split_even(total: u64, count: usize, round_to: u64) -> Split {
    if count == 0 {
        return Split {
            base: 0,
            top_ups: Vec::new(),
            residual: 0,
        };
    }

    let step = round_to.max(1);
    let n = count as u64;
    let base = total / n / step * step;
    let mut remain = total - base * n;

    let mut top_ups = vec![0; count];
    let cap = count.saturating_mul(MAX_PASSES_PER_SHARE);
    let mut i = 0;
    while remain >= step && i < cap {
        top_ups[i % count] += step;
        remain -= step;
        i += 1;
    }

    Split {
        base,
        top_ups,
        residual: remain,
    }
}
