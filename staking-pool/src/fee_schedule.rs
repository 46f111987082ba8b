//! Holding-duration exit-fee lookup.

use {
    crate::{config::StakingConfig, error::StakingError, math::bps_of},
    borsh::{BorshDeserialize, BorshSerialize},
    serde::{Deserialize, Serialize},
    solana_clock::UnixTimestamp,
};

/// One bracket of the exit-fee schedule.
///
/// Applies to holders staked for at least `min_elapsed_secs` (and less than
/// the next tier's threshold).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct FeeTier {
    pub min_elapsed_secs: i64,
    pub fee_bps: u64,
}

/// Immutable fee table built from a validated [`StakingConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct FeeScheduleTable {
    tiers: Vec<FeeTier>,
    subscription_fee_bps: u64,
    reduced_fee_bps: u64,
}

impl FeeScheduleTable {
    pub fn new(config: &StakingConfig) -> Result<Self, StakingError> {
        config.validate()?;
        Ok(Self {
            tiers: config.exit_fee_tiers.clone(),
            subscription_fee_bps: config.subscription_fee_bps,
            reduced_fee_bps: config.reduced_fee_bps,
        })
    }

    pub fn tiers(&self) -> &[FeeTier] {
        &self.tiers
    }

    pub fn subscription_fee_bps(&self) -> u64 {
        self.subscription_fee_bps
    }

    pub fn reduced_fee_bps(&self) -> u64 {
        self.reduced_fee_bps
    }

    /// The configuration this table was built from.
    pub fn config(&self) -> StakingConfig {
        StakingConfig {
            subscription_fee_bps: self.subscription_fee_bps,
            reduced_fee_bps: self.reduced_fee_bps,
            exit_fee_tiers: self.tiers.clone(),
        }
    }

    /// Tier fee for a holder staked `elapsed` seconds.
    ///
    /// Below the first threshold the first (highest) tier applies. The table is
    /// tiny, so a linear scan is enough.
    pub fn fee_bps_for_elapsed(&self, elapsed: i64) -> u64 {
        let mut fee_bps = match self.tiers.first() {
            Some(tier) => tier.fee_bps,
            None => return self.reduced_fee_bps,
        };
        for tier in &self.tiers {
            if tier.min_elapsed_secs > elapsed {
                break;
            }
            fee_bps = tier.fee_bps;
        }
        fee_bps
    }

    /// Exit fee rate for a holder whose stake started at `holding_start`.
    ///
    /// `funded_period_end` is the end of the last funded reward period, or
    /// `None` if no reward has ever been added. Once that period is over the
    /// flat reduced fee replaces the tier lookup.
    pub fn fee_basis_points_for(
        &self,
        holding_start: UnixTimestamp,
        now: UnixTimestamp,
        funded_period_end: Option<UnixTimestamp>,
    ) -> u64 {
        if matches!(funded_period_end, Some(period_end) if now > period_end) {
            return self.reduced_fee_bps;
        }
        let elapsed = now.saturating_sub(holding_start).max(0);
        self.fee_bps_for_elapsed(elapsed)
    }

    /// Fee withheld from a deposit of `amount`.
    pub fn subscription_fee(&self, amount: u64) -> Result<u64, StakingError> {
        bps_of(amount, self.subscription_fee_bps)
    }

    /// Fee withheld from a withdrawal of `amount`.
    pub fn exit_fee(
        &self,
        amount: u64,
        holding_start: UnixTimestamp,
        now: UnixTimestamp,
        funded_period_end: Option<UnixTimestamp>,
    ) -> Result<u64, StakingError> {
        bps_of(
            amount,
            self.fee_basis_points_for(holding_start, now, funded_period_end),
        )
    }
}
