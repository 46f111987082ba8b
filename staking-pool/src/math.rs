//! Fixed-point helpers for reward and fee accounting.
//!
//! Reward rates and the reward-per-unit accumulator are carried as `u128`
//! values multiplied by [`SCALE`]. Every truncation in the pool goes through
//! one of the functions below and always rounds toward zero, so the pool can
//! never promise more than it holds.

use crate::{constants::FEE_BASIS_POINT, error::StakingError};

/// Fixed-point multiplier (1e18) for scaled quantities.
pub const SCALE: u128 = 1_000_000_000_000_000_000;

/// `a * b / denominator`, rounded down.
///
/// Overflow of the intermediate product and a zero denominator both surface
/// as [`StakingError::ArithmeticOverflow`].
pub fn mul_div_floor(a: u128, b: u128, denominator: u128) -> Result<u128, StakingError> {
    a.checked_mul(b)
        .ok_or(StakingError::ArithmeticOverflow)?
        .checked_div(denominator)
        .ok_or(StakingError::ArithmeticOverflow)
}

/// `amount * bps / FEE_BASIS_POINT`, rounded down.
pub fn bps_of(amount: u64, bps: u64) -> Result<u64, StakingError> {
    let fee = mul_div_floor(amount as u128, bps as u128, FEE_BASIS_POINT as u128)?;
    to_u64(fee)
}

/// `numerator / denominator`, rounded down; a zero denominator is an overflow.
pub fn div_floor(numerator: u128, denominator: u128) -> Result<u128, StakingError> {
    numerator
        .checked_div(denominator)
        .ok_or(StakingError::ArithmeticOverflow)
}

/// Lifts a token amount into [`SCALE`]d units. Cannot overflow: `u64::MAX * 1e18 < u128::MAX`.
pub fn scale_up(amount: u64) -> u128 {
    (amount as u128) * SCALE
}

/// Drops the [`SCALE`] factor from a scaled value, rounding down.
pub fn descale(value: u128) -> Result<u64, StakingError> {
    to_u64(value / SCALE)
}

/// Narrows to `u64`, failing instead of truncating.
pub fn to_u64(value: u128) -> Result<u64, StakingError> {
    u64::try_from(value).map_err(|_| StakingError::ArithmeticOverflow)
}
