//! Per-frame gas accounting.

/// Represents the state of gas during execution of a single frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Gas {
    /// The initial gas limit. Constant throughout execution.
    limit: u64,
    /// The amount of gas remaining.
    remaining: u64,
    /// Refunded gas, applied only at the end of execution.
    refunded: i64,
    /// Gas spent on memory expansion.
    memory: u64,
}

impl Gas {
    /// Creates a new `Gas` struct with the given gas limit.
    #[inline]
    pub const fn new(limit: u64) -> Self {
        Self { limit, remaining: limit, refunded: 0, memory: 0 }
    }

    /// Returns the gas limit.
    #[inline]
    pub const fn limit(&self) -> u64 {
        self.limit
    }

    /// Returns the amount of gas remaining.
    #[inline]
    pub const fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Returns the total amount of gas refunded.
    #[inline]
    pub const fn refunded(&self) -> i64 {
        self.refunded
    }

    /// Returns the gas spent on memory expansion.
    #[inline]
    pub const fn memory(&self) -> u64 {
        self.memory
    }

    /// Returns the total amount of gas spent.
    #[inline]
    pub const fn spent(&self) -> u64 {
        self.limit - self.remaining
    }

    /// Returns the amount of gas used, i.e. spent minus the refund.
    #[inline]
    pub const fn used(&self) -> u64 {
        self.spent().saturating_sub(self.refunded as u64)
    }

    /// Records a gas cost, returning `false` on gas exhaustion.
    ///
    /// On exhaustion the remaining gas is left untouched so the caller can
    /// report an accurate out-of-gas state.
    #[inline]
    #[must_use]
    pub fn record_cost(&mut self, cost: u64) -> bool {
        match self.remaining.checked_sub(cost) {
            Some(left) => {
                self.remaining = left;
                true
            }
            None => false,
        }
    }

    /// Records a gas refund.
    #[inline]
    pub fn record_refund(&mut self, refund: i64) {
        self.refunded += refund;
    }

    /// Records gas spent on memory expansion. Also deducts it from the
    /// remaining gas; returns `false` on exhaustion.
    #[inline]
    #[must_use]
    pub fn record_memory_expansion(&mut self, cost: u64) -> bool {
        if !self.record_cost(cost) {
            return false;
        }
        self.memory += cost;
        true
    }

    /// Spends all remaining gas.
    #[inline]
    pub fn spend_all(&mut self) {
        self.remaining = 0;
    }

    /// Resets the meter to its initial state, discarding all recorded
    /// costs and refunds.
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::new(self.limit);
    }
}
