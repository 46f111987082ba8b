//! A thread-safe handle to a staking engine.
//!
//! The reward accumulator is only correct if mutations never interleave, so
//! every mutating call holds the write lock for its whole duration. Views
//! take the read lock and see a fully settled pool.

use {
    crate::{
        engine::{BalanceDelta, ExitOutcome, StakingEngine},
        error::StakingError,
        event::StakingEvent,
        reward::RewardPeriod,
        state::PoolSnapshot,
        token::{InMemoryTokenLedger, TokenLedger},
    },
    parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard},
    solana_clock::UnixTimestamp,
    solana_pubkey::Pubkey,
    std::sync::Arc,
};

pub struct SharedStakingEngine<T: TokenLedger = InMemoryTokenLedger> {
    inner: Arc<RwLock<StakingEngine<T>>>,
}

impl<T: TokenLedger> Clone for SharedStakingEngine<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: TokenLedger> From<StakingEngine<T>> for SharedStakingEngine<T> {
    fn from(engine: StakingEngine<T>) -> Self {
        Self::new(engine)
    }
}

impl<T: TokenLedger> SharedStakingEngine<T> {
    pub fn new(engine: StakingEngine<T>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(engine)),
        }
    }

    /// Read access for views not mirrored on this handle.
    pub fn read(&self) -> RwLockReadGuard<'_, StakingEngine<T>> {
        self.inner.read()
    }

    /// Exclusive access, e.g. to run several operations back to back.
    pub fn write(&self) -> RwLockWriteGuard<'_, StakingEngine<T>> {
        self.inner.write()
    }

    pub fn subscribe(
        &self,
        holder: Pubkey,
        amount: u64,
        now: UnixTimestamp,
    ) -> Result<BalanceDelta, StakingError> {
        self.inner.write().subscribe(holder, amount, now)
    }

    pub fn withdraw(
        &self,
        holder: Pubkey,
        amount: u64,
        now: UnixTimestamp,
    ) -> Result<BalanceDelta, StakingError> {
        self.inner.write().withdraw(holder, amount, now)
    }

    pub fn exit(&self, holder: Pubkey, now: UnixTimestamp) -> Result<ExitOutcome, StakingError> {
        self.inner.write().exit(holder, now)
    }

    pub fn claim_reward(&self, holder: Pubkey, now: UnixTimestamp) -> Result<u64, StakingError> {
        self.inner.write().claim_reward(holder, now)
    }

    pub fn add_reward(
        &self,
        caller: Pubkey,
        amount: u64,
        duration: u64,
        now: UnixTimestamp,
    ) -> Result<RewardPeriod, StakingError> {
        self.inner.write().add_reward(caller, amount, duration, now)
    }

    pub fn collect_fees(
        &self,
        caller: Pubkey,
        recipient: Pubkey,
        now: UnixTimestamp,
    ) -> Result<u64, StakingError> {
        self.inner.write().collect_fees(caller, recipient, now)
    }

    pub fn transfer_ownership(&self, caller: Pubkey, new_owner: Pubkey) -> Result<(), StakingError> {
        self.inner.write().transfer_ownership(caller, new_owner)
    }

    pub fn take_events(&self) -> Vec<StakingEvent> {
        self.inner.write().take_events()
    }

    pub fn earned(&self, holder: &Pubkey, now: UnixTimestamp) -> Result<u64, StakingError> {
        self.inner.read().earned(holder, now)
    }

    pub fn balance_of(&self, holder: &Pubkey) -> u64 {
        self.inner.read().balance_of(holder)
    }

    pub fn total_staked(&self) -> u64 {
        self.inner.read().total_staked()
    }

    pub fn total_fees_held(&self) -> u64 {
        self.inner.read().total_fees_held()
    }

    pub fn snapshot(&self) -> PoolSnapshot {
        self.inner.read().snapshot()
    }
}
