//! Fee schedule constants for the staking pool.
//!
//! Defines the basis-point denominator, the flat subscription fee, the reduced
//! fee applied after a reward period has run out, and the default exit-fee
//! tiers indexed by holding duration.

/// Seconds per day, used for holding-duration thresholds.
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Basis points denominator (10_000 bps = 100%).
pub const FEE_BASIS_POINT: u64 = 10_000;

/// Upper bound on the number of exit-fee tiers a schedule may carry.
pub const MAX_FEE_TIERS: usize = 16;

/// Flat fee charged on every deposit: 0.2%.
pub const SUBSCRIPTION_FEE_BPS: u64 = 20;

/// Exit fee once the funded reward period has fully elapsed: 0.1%.
pub const REDUCED_FEE_BPS: u64 = 10;

// ---------------------------------------------------------------------------
// Exit-fee tiers (holding duration → basis points of the withdrawn amount).
// ---------------------------------------------------------------------------

pub const EXIT_FEE_UNDER_1_DAY_BPS: u64 = 3_000; // 30%
pub const EXIT_FEE_1_DAY_BPS: u64 = 500; // 5%
pub const EXIT_FEE_7_DAY_BPS: u64 = 250; // 2.5%
pub const EXIT_FEE_30_DAY_BPS: u64 = 150; // 1.5%
pub const EXIT_FEE_60_DAY_BPS: u64 = 100; // 1%
pub const EXIT_FEE_90_DAY_BPS: u64 = 10; // 0.1%

/// Default exit-fee table as `(min_elapsed_secs, fee_bps)`, ascending.
pub const DEFAULT_EXIT_FEE_TIERS: [(i64, u64); 6] = [
    (0, EXIT_FEE_UNDER_1_DAY_BPS),
    (SECONDS_PER_DAY, EXIT_FEE_1_DAY_BPS),
    (7 * SECONDS_PER_DAY, EXIT_FEE_7_DAY_BPS),
    (30 * SECONDS_PER_DAY, EXIT_FEE_30_DAY_BPS),
    (60 * SECONDS_PER_DAY, EXIT_FEE_60_DAY_BPS),
    (90 * SECONDS_PER_DAY, EXIT_FEE_90_DAY_BPS),
];
