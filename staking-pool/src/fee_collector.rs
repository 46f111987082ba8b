//! Accounting for fees withheld by the pool.
//!
//! Fees stay in pool custody until the owner sweeps them with
//! `collect_fees`. Lifetime totals are kept for reporting.

use {
    crate::error::StakingError,
    borsh::{BorshDeserialize, BorshSerialize},
    serde::{Deserialize, Serialize},
};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub struct FeeCollector {
    /// Fees sitting in custody, not yet swept.
    pub total_fees_held: u64,

    /// Lifetime fees withheld (subscription + exit).
    pub total_fees_accrued: u64,

    /// Lifetime fees swept to a recipient.
    pub total_fees_collected: u64,
}

impl FeeCollector {
    pub fn record(&mut self, fee: u64) -> Result<(), StakingError> {
        self.total_fees_held = self
            .total_fees_held
            .checked_add(fee)
            .ok_or(StakingError::ArithmeticOverflow)?;
        self.total_fees_accrued = self
            .total_fees_accrued
            .checked_add(fee)
            .ok_or(StakingError::ArithmeticOverflow)?;
        Ok(())
    }

    pub fn held(&self) -> u64 {
        self.total_fees_held
    }

    pub fn collected(&self) -> u64 {
        self.total_fees_collected
    }

    /// Move everything held into the collected total; returns the swept amount.
    pub fn sweep(&mut self) -> Result<u64, StakingError> {
        let amount = std::mem::take(&mut self.total_fees_held);
        self.total_fees_collected = self
            .total_fees_collected
            .checked_add(amount)
            .ok_or(StakingError::ArithmeticOverflow)?;
        Ok(amount)
    }
}
