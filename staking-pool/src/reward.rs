//! Continuous reward accrual for the staking pool.
//!
//! The ledger keeps a single running accumulator, the reward earned by one
//! staked unit since the pool was created, scaled by [`SCALE`]. A holder's
//! reward is their balance times the growth of the accumulator since their
//! last checkpoint, so no per-holder work is needed when time passes.
//!
//! ```text
//! reward_per_unit(now) = stored + (min(now, period_end) - last_update_time)
//!                                 * reward_rate / total_staked
//! ```
//!
//! `reward_rate` is the per-second emission already multiplied by `SCALE`.

use {
    crate::{
        error::StakingError,
        math::{descale, div_floor, mul_div_floor, scale_up, to_u64, SCALE},
    },
    borsh::{BorshDeserialize, BorshSerialize},
    log::*,
    serde::{Deserialize, Serialize},
    solana_clock::UnixTimestamp,
};

/// Pool-wide accrual state.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub struct RewardAccrualLedger {
    /// Sum of every holder's raw balance.
    pub total_staked: u64,

    /// Reward units emitted per second, multiplied by `SCALE`.
    pub reward_rate: u128,

    /// Accumulated reward per staked unit, multiplied by `SCALE`.
    /// Never decreases.
    pub reward_per_unit_stored: u128,

    /// Point up to which `reward_per_unit_stored` is settled.
    pub last_update_time: UnixTimestamp,

    /// Start of the current (or last) funded reward period.
    pub period_start: UnixTimestamp,

    /// End of the current (or last) funded reward period.
    pub period_end: UnixTimestamp,
}

/// Bounds and rate of the current reward period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardPeriod {
    pub start: UnixTimestamp,
    pub end: UnixTimestamp,
    /// Scaled by `SCALE`.
    pub reward_rate: u128,
}

impl RewardAccrualLedger {
    /// Rewards stop accruing at the end of the funded period.
    pub fn last_time_reward_applicable(&self, now: UnixTimestamp) -> UnixTimestamp {
        now.min(self.period_end)
    }

    /// Whether a reward period has ever been funded.
    pub fn is_funded(&self) -> bool {
        self.period_end > self.period_start
    }

    /// End of the funded period, or `None` before the first `add_reward`.
    pub fn funded_period_end(&self) -> Option<UnixTimestamp> {
        self.is_funded().then_some(self.period_end)
    }

    pub fn reward_period(&self) -> RewardPeriod {
        RewardPeriod {
            start: self.period_start,
            end: self.period_end,
            reward_rate: self.reward_rate,
        }
    }

    /// Accumulator value at `now`, without mutating state.
    pub fn reward_per_unit(&self, now: UnixTimestamp) -> Result<u128, StakingError> {
        if self.total_staked == 0 {
            return Ok(self.reward_per_unit_stored);
        }
        let elapsed = self
            .last_time_reward_applicable(now)
            .saturating_sub(self.last_update_time)
            .max(0) as u128;
        let accrued = mul_div_floor(elapsed, self.reward_rate, self.total_staked as u128)?;
        self.reward_per_unit_stored
            .checked_add(accrued)
            .ok_or(StakingError::ArithmeticOverflow)
    }

    /// Settle the accumulator up to `now`. Returns the new stored value.
    pub fn roll_forward(&mut self, now: UnixTimestamp) -> Result<u128, StakingError> {
        self.reward_per_unit_stored = self.reward_per_unit(now)?;
        // A clock that runs backwards must not re-open an already settled span.
        self.last_update_time = self
            .last_time_reward_applicable(now)
            .max(self.last_update_time);
        Ok(self.reward_per_unit_stored)
    }

    /// Fund a new reward period of `duration` seconds starting at `now`.
    ///
    /// Reward still unspent from a running period is folded into the new one:
    ///
    /// ```text
    /// unspent     = (period_end - now) * reward_rate
    /// reward_rate = (unspent + amount * SCALE) / duration
    /// ```
    ///
    /// Division rounds down, so the period never emits more than it was given.
    /// No tokens move here; the caller is responsible for funding custody.
    pub fn add_reward(
        &mut self,
        amount: u64,
        duration: u64,
        now: UnixTimestamp,
    ) -> Result<RewardPeriod, StakingError> {
        if duration == 0 {
            return Err(StakingError::InvalidDuration);
        }
        if amount == 0 {
            return Err(StakingError::InvalidAmount);
        }
        let span = i64::try_from(duration).map_err(|_| StakingError::InvalidDuration)?;
        let period_end = now.checked_add(span).ok_or(StakingError::InvalidDuration)?;

        self.roll_forward(now)?;

        let mut budget = scale_up(amount);
        if now < self.period_end {
            let remaining = self.period_end.saturating_sub(now) as u128;
            let unspent = remaining
                .checked_mul(self.reward_rate)
                .ok_or(StakingError::ArithmeticOverflow)?;
            debug!("add_reward: folding {} unspent reward units into new period", unspent / SCALE);
            budget = budget
                .checked_add(unspent)
                .ok_or(StakingError::ArithmeticOverflow)?;
        }

        self.reward_rate = div_floor(budget, duration as u128)?;
        self.period_start = now;
        self.period_end = period_end;
        // Time between the old period end and `now` emitted nothing.
        self.last_update_time = now;

        Ok(self.reward_period())
    }

    /// Reward still to be emitted by the running period, in token units.
    pub fn remaining_reward(&self, now: UnixTimestamp) -> Result<u64, StakingError> {
        let from = now.max(self.last_update_time);
        if from >= self.period_end {
            return Ok(0);
        }
        let remaining = self.period_end.saturating_sub(from) as u128;
        let unspent = remaining
            .checked_mul(self.reward_rate)
            .ok_or(StakingError::ArithmeticOverflow)?;
        descale(unspent)
    }

    /// Projected reward for a hypothetical deposit of `amount` held for
    /// `duration` seconds from `now`, at the current rate and pool size.
    ///
    /// Only the part of the window inside the funded period earns anything.
    pub fn projected_reward(
        &self,
        amount: u64,
        duration: u64,
        now: UnixTimestamp,
    ) -> Result<u64, StakingError> {
        if amount == 0 || now >= self.period_end {
            return Ok(0);
        }
        let span = i64::try_from(duration).unwrap_or(i64::MAX);
        let window_end = now.saturating_add(span).min(self.period_end);
        let window = window_end.saturating_sub(now) as u128;
        let pool_after = (self.total_staked as u128)
            .checked_add(amount as u128)
            .ok_or(StakingError::ArithmeticOverflow)?;
        let per_unit = mul_div_floor(window, self.reward_rate, pool_after)?;
        to_u64(mul_div_floor(amount as u128, per_unit, SCALE)?)
    }

    pub fn stake(&mut self, amount: u64) -> Result<(), StakingError> {
        self.total_staked = self
            .total_staked
            .checked_add(amount)
            .ok_or(StakingError::ArithmeticOverflow)?;
        Ok(())
    }

    pub fn unstake(&mut self, amount: u64) -> Result<(), StakingError> {
        self.total_staked = self
            .total_staked
            .checked_sub(amount)
            .ok_or(StakingError::ArithmeticOverflow)?;
        Ok(())
    }
}
