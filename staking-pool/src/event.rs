//! Events emitted by the staking engine, one per committed operation.

use {
    serde::{Deserialize, Serialize},
    solana_clock::UnixTimestamp,
    solana_pubkey::Pubkey,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StakingEvent {
    Subscribed {
        holder: Pubkey,
        amount: u64,
        fee: u64,
        net: u64,
        timestamp: UnixTimestamp,
    },
    Withdrawn {
        holder: Pubkey,
        amount: u64,
        fee: u64,
        net: u64,
        timestamp: UnixTimestamp,
    },
    RewardPaid {
        holder: Pubkey,
        reward: u64,
        timestamp: UnixTimestamp,
    },
    RewardAdded {
        amount: u64,
        duration: u64,
        /// Scaled by `SCALE`.
        reward_rate: u128,
        period_end: UnixTimestamp,
        timestamp: UnixTimestamp,
    },
    FeesCollected {
        recipient: Pubkey,
        amount: u64,
        timestamp: UnixTimestamp,
    },
    OwnershipTransferred {
        previous_owner: Pubkey,
        new_owner: Pubkey,
    },
}

impl StakingEvent {
    /// The holder the event concerns, if any.
    pub fn holder(&self) -> Option<&Pubkey> {
        match self {
            Self::Subscribed { holder, .. }
            | Self::Withdrawn { holder, .. }
            | Self::RewardPaid { holder, .. } => Some(holder),
            _ => None,
        }
    }
}
