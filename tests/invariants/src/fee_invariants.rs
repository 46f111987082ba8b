//! Property-based tests for the exit-fee schedule.
//!
//! Properties tested:
//! 1. Exit fees never increase with holding time.
//! 2. The reduced fee applies exactly once a funded period has ended.
//! 3. Fees never exceed the amount they are taken from.

#[cfg(test)]
mod tests {
    use {
        proptest::prelude::*,
        trv1_staking_pool::{FeeScheduleTable, StakingConfig},
    };

    const YEAR: i64 = 31_536_000;

    fn table() -> FeeScheduleTable {
        FeeScheduleTable::new(&StakingConfig::default()).unwrap()
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 1. Monotone in holding time
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        #[test]
        fn exit_fee_non_increasing_with_holding_time(
            amount in 0..=u64::MAX / 2,
            holding_start in 0..=YEAR,
            held_short in 0..=YEAR,
            extra in 0..=YEAR,
        ) {
            let t = table();
            let early = holding_start + held_short;
            let late = early + extra;

            let fee_early = t.exit_fee(amount, holding_start, early, None).unwrap();
            let fee_late = t.exit_fee(amount, holding_start, late, None).unwrap();
            prop_assert!(
                fee_late <= fee_early,
                "fee rose from {fee_early} to {fee_late} with longer holding"
            );
            prop_assert!(fee_early <= amount);
        }
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 2. Reduced fee after the funded period
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        #[test]
        fn reduced_fee_after_period_end(
            holding_start in 0..=YEAR,
            period_end in 0..=YEAR,
            offset in 0..=YEAR,
        ) {
            let t = table();
            let after = period_end + 1 + offset;
            prop_assert_eq!(
                t.fee_basis_points_for(holding_start, after, Some(period_end)),
                t.reduced_fee_bps()
            );

            let at_end = period_end;
            prop_assert_eq!(
                t.fee_basis_points_for(holding_start, at_end, Some(period_end)),
                t.fee_basis_points_for(holding_start, at_end, None)
            );
        }
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 3. Subscription fee bounds
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        #[test]
        fn subscription_fee_leaves_positive_net(amount in 1..=u64::MAX) {
            let fee = table().subscription_fee(amount).unwrap();
            prop_assert!(fee < amount);
            prop_assert_eq!(fee, (amount as u128 * 20 / 10_000) as u64);
        }
    }
}
