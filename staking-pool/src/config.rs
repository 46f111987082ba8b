use {
    crate::{
        constants::{
            DEFAULT_EXIT_FEE_TIERS, FEE_BASIS_POINT, MAX_FEE_TIERS, REDUCED_FEE_BPS,
            SUBSCRIPTION_FEE_BPS,
        },
        error::StakingError,
        fee_schedule::FeeTier,
    },
    borsh::{BorshDeserialize, BorshSerialize},
    serde::{Deserialize, Serialize},
};

/// Fee configuration for a staking pool.
///
/// The exit-fee tiers are indexed by how long the holder has been staked; the
/// longer the holding, the lower the fee. Once a funded reward period has run
/// out every exit pays `reduced_fee_bps` instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct StakingConfig {
    /// Fee withheld from every deposit, in basis points.
    pub subscription_fee_bps: u64,

    /// Exit fee once `now > period_end`, in basis points.
    pub reduced_fee_bps: u64,

    /// Holding-duration tiers, ascending by `min_elapsed_secs`.
    pub exit_fee_tiers: Vec<FeeTier>,
}

impl Default for StakingConfig {
    /// The production schedule: 0.2% in, 30% → 0.1% out over 90 days.
    fn default() -> Self {
        Self {
            subscription_fee_bps: SUBSCRIPTION_FEE_BPS,
            reduced_fee_bps: REDUCED_FEE_BPS,
            exit_fee_tiers: DEFAULT_EXIT_FEE_TIERS
                .iter()
                .map(|&(min_elapsed_secs, fee_bps)| FeeTier {
                    min_elapsed_secs,
                    fee_bps,
                })
                .collect(),
        }
    }
}

impl StakingConfig {
    /// Validate that the fee schedule is internally consistent.
    pub fn validate(&self) -> Result<(), StakingError> {
        if self.subscription_fee_bps >= FEE_BASIS_POINT {
            return Err(invalid(format!(
                "subscription_fee_bps ({}) must be below {FEE_BASIS_POINT}",
                self.subscription_fee_bps
            )));
        }
        if self.reduced_fee_bps > FEE_BASIS_POINT {
            return Err(invalid(format!(
                "reduced_fee_bps ({}) must be at most {FEE_BASIS_POINT}",
                self.reduced_fee_bps
            )));
        }
        if self.exit_fee_tiers.is_empty() || self.exit_fee_tiers.len() > MAX_FEE_TIERS {
            return Err(invalid(format!(
                "exit_fee_tiers must hold 1..={MAX_FEE_TIERS} tiers, got {}",
                self.exit_fee_tiers.len()
            )));
        }

        let mut previous: Option<&FeeTier> = None;
        for tier in &self.exit_fee_tiers {
            if tier.min_elapsed_secs < 0 {
                return Err(invalid(format!(
                    "tier threshold {} is negative",
                    tier.min_elapsed_secs
                )));
            }
            if tier.fee_bps > FEE_BASIS_POINT {
                return Err(invalid(format!(
                    "tier fee {} bps exceeds {FEE_BASIS_POINT}",
                    tier.fee_bps
                )));
            }
            if let Some(prev) = previous {
                if tier.min_elapsed_secs <= prev.min_elapsed_secs {
                    return Err(invalid(format!(
                        "tier thresholds must be strictly ascending ({} after {})",
                        tier.min_elapsed_secs, prev.min_elapsed_secs
                    )));
                }
                if tier.fee_bps > prev.fee_bps {
                    return Err(invalid(format!(
                        "tier fees must not increase with holding time ({} after {})",
                        tier.fee_bps, prev.fee_bps
                    )));
                }
            }
            previous = Some(tier);
        }
        Ok(())
    }
}

fn invalid(reason: String) -> StakingError {
    StakingError::InvalidConfig { reason }
}
