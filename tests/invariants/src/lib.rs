//! TRv1 Staking Pool Property-Based Invariant Tests
//!
//! Uses proptest to verify the pool's accounting invariants across:
//! - Random sequences of deposits, withdrawals, exits and reward funding
//! - Exit-fee schedule ordering
//! - Reward period blending

pub mod fee_invariants;
pub mod reward_invariants;
pub mod staking_invariants;
