//! Per-holder staking positions.

use {
    crate::{
        error::StakingError,
        math::{mul_div_floor, to_u64, SCALE},
    },
    borsh::{BorshDeserialize, BorshSerialize},
    serde::{Deserialize, Serialize},
    solana_clock::UnixTimestamp,
    solana_pubkey::Pubkey,
    std::collections::HashMap,
};

/// A holder's position in the pool.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub struct HolderAccount {
    /// Staked amount after subscription fees, before exit fees.
    pub raw_balance: u64,

    /// When the current position was opened. Top-ups keep it; it is reset
    /// only by a deposit into an empty position.
    pub holding_start: UnixTimestamp,

    /// Accumulator value at the last checkpoint (scaled).
    pub reward_per_unit_paid: u128,

    /// Reward settled at checkpoints but not yet paid out.
    pub earned_unclaimed: u64,
}

impl HolderAccount {
    /// Reward accrued since the last checkpoint, given the current accumulator.
    fn pending(&self, reward_per_unit: u128) -> Result<u64, StakingError> {
        let delta = reward_per_unit.saturating_sub(self.reward_per_unit_paid);
        to_u64(mul_div_floor(self.raw_balance as u128, delta, SCALE)?)
    }

    /// Settled plus pending reward.
    pub fn earned(&self, reward_per_unit: u128) -> Result<u64, StakingError> {
        self.earned_unclaimed
            .checked_add(self.pending(reward_per_unit)?)
            .ok_or(StakingError::ArithmeticOverflow)
    }

    /// Fold pending reward into `earned_unclaimed` and mark the accumulator
    /// as paid. Must run before every balance change.
    pub fn checkpoint(&mut self, reward_per_unit: u128) -> Result<(), StakingError> {
        self.earned_unclaimed = self.earned(reward_per_unit)?;
        self.reward_per_unit_paid = reward_per_unit;
        Ok(())
    }

    pub fn deposit(&mut self, amount: u64, now: UnixTimestamp) -> Result<(), StakingError> {
        if self.raw_balance == 0 {
            self.holding_start = now;
        }
        self.raw_balance = self
            .raw_balance
            .checked_add(amount)
            .ok_or(StakingError::ArithmeticOverflow)?;
        Ok(())
    }

    pub fn withdraw(&mut self, amount: u64) -> Result<(), StakingError> {
        self.raw_balance = self.raw_balance.checked_sub(amount).ok_or(
            StakingError::InsufficientBalance {
                requested: amount,
                available: self.raw_balance,
            },
        )?;
        Ok(())
    }

    /// Zero the settled reward and return it.
    pub fn take_earned(&mut self) -> u64 {
        std::mem::take(&mut self.earned_unclaimed)
    }

    /// Nothing staked and nothing owed.
    pub fn is_empty(&self) -> bool {
        self.raw_balance == 0 && self.earned_unclaimed == 0
    }
}

/// All holder positions, keyed by holder identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolderAccountRegistry {
    accounts: HashMap<Pubkey, HolderAccount>,
}

impl HolderAccountRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The holder's position; holders never seen have an empty one.
    pub fn get(&self, holder: &Pubkey) -> HolderAccount {
        self.accounts.get(holder).copied().unwrap_or_default()
    }

    /// A checkpointed copy of the holder's position. Nothing is stored until
    /// [`Self::store`] is called with the result.
    pub fn checkpoint(
        &self,
        holder: &Pubkey,
        reward_per_unit: u128,
    ) -> Result<HolderAccount, StakingError> {
        let mut account = self.get(holder);
        account.checkpoint(reward_per_unit)?;
        Ok(account)
    }

    /// Write back a position. A fully withdrawn position stays registered
    /// with zeroed fields.
    pub fn store(&mut self, holder: Pubkey, account: HolderAccount) {
        self.accounts.insert(holder, account);
    }

    pub fn earned(&self, holder: &Pubkey, reward_per_unit: u128) -> Result<u64, StakingError> {
        self.get(holder).earned(reward_per_unit)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Pubkey, &HolderAccount)> {
        self.accounts.iter()
    }

    /// Registered positions, including zeroed ones.
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Positions with a non-zero stake.
    pub fn active_len(&self) -> usize {
        self.accounts
            .values()
            .filter(|account| account.raw_balance > 0)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Sum of raw balances across all holders.
    pub fn total_raw_balance(&self) -> u128 {
        self.accounts.values().map(|a| a.raw_balance as u128).sum()
    }

    /// Sum of settled, unpaid reward across all holders.
    pub fn total_earned_unclaimed(&self) -> u128 {
        self.accounts
            .values()
            .map(|a| a.earned_unclaimed as u128)
            .sum()
    }
}

impl FromIterator<(Pubkey, HolderAccount)> for HolderAccountRegistry {
    fn from_iter<I: IntoIterator<Item = (Pubkey, HolderAccount)>>(iter: I) -> Self {
        let mut registry = Self::new();
        for (holder, account) in iter {
            registry.store(holder, account);
        }
        registry
    }
}
