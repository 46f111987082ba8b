//! Property-based tests for reward period funding.
//!
//! Properties tested:
//! 1. Blending a new period into a running one matches
//!    `((R1 * (D1 - t) / D1) + R2) / D2` within floor tolerance.
//! 2. A period never promises more than its budget.

#[cfg(test)]
mod tests {
    use {
        proptest::prelude::*,
        trv1_staking_pool::{math::SCALE, RewardAccrualLedger},
    };

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        #[test]
        fn blended_rate_matches_formula(
            r1 in 1..=100_000_000_000u64,
            d1 in 2..=100_000_000u64,
            r2 in 1..=100_000_000_000u64,
            d2 in 1..=100_000_000u64,
            t_frac in 1..1_000u64,
        ) {
            let t = (d1 * t_frac / 1_000).clamp(1, d1 - 1);

            let mut ledger = RewardAccrualLedger::default();
            ledger.add_reward(r1, d1, 0).unwrap();
            let period = ledger.add_reward(r2, d2, t as i64).unwrap();

            let remaining = (d1 - t) as u128;
            let ideal = (r1 as u128 * SCALE * remaining / d1 as u128 + r2 as u128 * SCALE)
                / d2 as u128;

            // ── INVARIANT: floor division only ever rounds down ──
            prop_assert!(period.reward_rate <= ideal);
            prop_assert!(
                ideal - period.reward_rate <= remaining / d2 as u128 + 1,
                "rate {} too far below ideal {}", period.reward_rate, ideal
            );
            prop_assert_eq!(period.end, t as i64 + d2 as i64);
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        #[test]
        fn period_never_exceeds_budget(
            amount in 1..=u64::MAX,
            duration in 1..=10_000_000_000u64,
            start in 0..=1_000_000_000i64,
        ) {
            let mut ledger = RewardAccrualLedger::default();
            let period = ledger.add_reward(amount, duration, start).unwrap();
            let emitted = period.reward_rate * duration as u128;
            prop_assert!(emitted <= amount as u128 * SCALE);
            prop_assert!(ledger.remaining_reward(start).unwrap() <= amount);
        }
    }
}
