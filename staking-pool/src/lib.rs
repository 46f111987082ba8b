#![allow(clippy::arithmetic_side_effects)]
//! # TRv1 Staking Pool
//!
//! A token-staking ledger that accrues **time-weighted rewards** for
//! depositors and charges **holding-duration exit fees**.
//!
//! Holders deposit tokens into a shared pool and pay a small subscription fee.
//! The owner funds reward periods; each period streams its budget linearly to
//! all holders in proportion to their stake, using a single reward-per-unit
//! accumulator so that accrual costs nothing per holder. Withdrawals pay an
//! exit fee that shrinks the longer the position has been held, down to a
//! flat reduced fee once the funded period has run out. Fees stay in custody
//! until the owner sweeps them.
//!
//! ## Quick start
//!
//! ```rust
//! use solana_pubkey::Pubkey;
//! use trv1_staking_pool::{InMemoryTokenLedger, StakingConfig, StakingEngine, TokenLedger};
//!
//! let owner = Pubkey::new_from_array([1; 32]);
//! let custody = Pubkey::new_from_array([2; 32]);
//! let holder = Pubkey::new_from_array([3; 32]);
//!
//! let mut token = InMemoryTokenLedger::new();
//! token.mint(&holder, 100_000).unwrap();
//!
//! let mut pool = StakingEngine::new(StakingConfig::default(), owner, custody, token).unwrap();
//!
//! // 0.2% subscription fee.
//! let deposit = pool.subscribe(holder, 100_000, 0).unwrap();
//! assert_eq!(deposit.net, 99_800);
//!
//! // Leaving within a day costs 30%.
//! let outcome = pool.exit(holder, 60).unwrap();
//! assert_eq!(outcome.withdrawal.net, 69_860);
//! assert_eq!(pool.token().balance_of(&holder), 69_860);
//! ```
//!
//! See [`reward`] for the accrual formula and [`fee_schedule`] for fee tiers.

pub mod account;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod event;
pub mod fee_collector;
pub mod fee_schedule;
pub mod math;
pub mod reward;
pub mod shared;
pub mod state;
pub mod token;


// Re-exports for convenience.
pub use {
    account::{HolderAccount, HolderAccountRegistry},
    config::StakingConfig,
    engine::{BalanceDelta, ExitOutcome, StakingEngine},
    error::{StakingError, TokenError},
    event::StakingEvent,
    fee_collector::FeeCollector,
    fee_schedule::{FeeScheduleTable, FeeTier},
    reward::{RewardAccrualLedger, RewardPeriod},
    shared::SharedStakingEngine,
    state::PoolSnapshot,
    token::{InMemoryTokenLedger, TokenLedger},
};
