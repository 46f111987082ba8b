//! Persisted form of a staking pool.

use {
    crate::{
        account::HolderAccount, config::StakingConfig, error::StakingError,
        fee_collector::FeeCollector, reward::RewardAccrualLedger,
    },
    borsh::{BorshDeserialize, BorshSerialize},
    serde::{Deserialize, Serialize},
    solana_pubkey::Pubkey,
};

/// Discriminator byte written at the start of every encoded snapshot to
/// distinguish it from foreign or truncated data.
pub const SNAPSHOT_DISCRIMINATOR: u8 = 1;

/// Complete pool state at a point in time.
///
/// Holder accounts are sorted by key so equal pools encode to equal bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct PoolSnapshot {
    pub owner: Pubkey,
    pub custody: Pubkey,
    pub config: StakingConfig,
    pub ledger: RewardAccrualLedger,
    pub fees: FeeCollector,
    pub accounts: Vec<(Pubkey, HolderAccount)>,
}

impl PoolSnapshot {
    /// Encode with borsh, prefixed by [`SNAPSHOT_DISCRIMINATOR`].
    pub fn to_bytes(&self) -> Result<Vec<u8>, StakingError> {
        let mut data = vec![SNAPSHOT_DISCRIMINATOR];
        BorshSerialize::serialize(self, &mut data).map_err(|err| StakingError::InvalidSnapshot {
            reason: err.to_string(),
        })?;
        Ok(data)
    }

    /// Decode bytes produced by [`Self::to_bytes`]. Trailing bytes are rejected.
    pub fn from_bytes(data: &[u8]) -> Result<Self, StakingError> {
        let Some((&SNAPSHOT_DISCRIMINATOR, payload)) = data.split_first() else {
            return Err(StakingError::InvalidSnapshot {
                reason: "missing or invalid snapshot discriminator".to_string(),
            });
        };
        borsh::from_slice(payload).map_err(|err| StakingError::InvalidSnapshot {
            reason: err.to_string(),
        })
    }

    /// Check the snapshot is internally consistent: valid fee schedule, no
    /// duplicate holders, custody not among them, and `total_staked` equal to
    /// the sum of balances.
    pub fn validate(&self) -> Result<(), StakingError> {
        self.config.validate()?;

        if self.accounts.iter().any(|(holder, _)| *holder == self.custody) {
            return Err(StakingError::InvalidSnapshot {
                reason: "custody account holds a position".to_string(),
            });
        }

        if self.accounts.windows(2).any(|pair| pair[0].0 >= pair[1].0) {
            return Err(StakingError::InvalidSnapshot {
                reason: "holder accounts must be sorted and unique".to_string(),
            });
        }

        let balances: u128 = self
            .accounts
            .iter()
            .map(|(_, account)| account.raw_balance as u128)
            .sum();
        if balances != self.ledger.total_staked as u128 {
            return Err(StakingError::InvalidSnapshot {
                reason: format!(
                    "total_staked {} does not match holder balances {balances}",
                    self.ledger.total_staked
                ),
            });
        }

        if self.ledger.period_end < self.ledger.period_start {
            return Err(StakingError::InvalidSnapshot {
                reason: "reward period ends before it starts".to_string(),
            });
        }
        Ok(())
    }
}
