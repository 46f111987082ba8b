//! Property-based tests over random operation sequences.
//!
//! Properties tested:
//! 1. `total_staked` always equals the sum of holder balances.
//! 2. Custody always covers stakes, held fees and every holder's earned reward.
//! 3. The reward accumulator never decreases.
//! 4. `earned` is a pure view.
//! 5. A rejected operation leaves the pool unchanged.
//! 6. The custody account can never stake, claim or receive fees.

#[cfg(test)]
mod tests {
    use {
        proptest::prelude::*,
        solana_pubkey::Pubkey,
        trv1_staking_pool::{
            InMemoryTokenLedger, StakingConfig, StakingEngine, TokenLedger,
        },
    };

    const HOLDERS: u8 = 4;
    /// Regular holders plus the owner and custody keys.
    const ACTORS: u8 = HOLDERS + 2;
    const INITIAL_BALANCE: u64 = 1_000_000_000;
    const DAY: i64 = 86_400;

    fn owner() -> Pubkey {
        Pubkey::new_from_array([1; 32])
    }

    fn custody() -> Pubkey {
        Pubkey::new_from_array([2; 32])
    }

    fn treasury() -> Pubkey {
        Pubkey::new_from_array([3; 32])
    }

    fn holder(index: u8) -> Pubkey {
        Pubkey::new_from_array([100 + index; 32])
    }

    /// Keys an operation may act as: the regular holders, then the owner,
    /// then custody.
    fn actor(index: u8) -> Pubkey {
        match index {
            i if i < HOLDERS => holder(i),
            i if i == HOLDERS => owner(),
            _ => custody(),
        }
    }

    /// Fee recipients: treasury, the owner itself, or custody.
    fn fee_recipient(index: u8) -> Pubkey {
        match index {
            0 => treasury(),
            1 => owner(),
            _ => custody(),
        }
    }

    #[derive(Debug, Clone)]
    enum Op {
        Subscribe { actor: u8, amount: u64 },
        /// Withdraw `percent` of the actor's current balance.
        Withdraw { actor: u8, percent: u64 },
        Exit { actor: u8 },
        Claim { actor: u8 },
        AddReward { amount: u64, duration: u64 },
        CollectFees { recipient: u8 },
        Advance(i64),
    }

    impl Op {
        /// Whether the operation names custody as a holder or fee recipient.
        fn targets_custody(&self) -> bool {
            match *self {
                Op::Subscribe { actor: a, .. }
                | Op::Withdraw { actor: a, .. }
                | Op::Exit { actor: a }
                | Op::Claim { actor: a } => actor(a) == custody(),
                Op::CollectFees { recipient } => fee_recipient(recipient) == custody(),
                Op::AddReward { .. } | Op::Advance(_) => false,
            }
        }
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => (0..ACTORS, 0..=5_000_000u64)
                .prop_map(|(actor, amount)| Op::Subscribe { actor, amount }),
            2 => (0..ACTORS, 0..=120u64)
                .prop_map(|(actor, percent)| Op::Withdraw { actor, percent }),
            1 => (0..ACTORS).prop_map(|actor| Op::Exit { actor }),
            1 => (0..ACTORS).prop_map(|actor| Op::Claim { actor }),
            1 => (0..=2_000_000u64, 0..=(120 * DAY) as u64)
                .prop_map(|(amount, duration)| Op::AddReward { amount, duration }),
            1 => (0..3u8).prop_map(|recipient| Op::CollectFees { recipient }),
            3 => (0..=10 * DAY).prop_map(Op::Advance),
        ]
    }

    fn new_pool() -> StakingEngine {
        let mut token = InMemoryTokenLedger::new();
        for index in 0..=HOLDERS {
            token.mint(&actor(index), INITIAL_BALANCE).unwrap();
        }
        StakingEngine::new(StakingConfig::default(), owner(), custody(), token).unwrap()
    }

    /// Apply one operation. Reward funding is minted into custody as soon as
    /// the period is registered. Returns whether the pool accepted it.
    fn apply(pool: &mut StakingEngine, op: &Op, now: &mut i64) -> bool {
        match *op {
            Op::Subscribe { actor: a, amount } => pool.subscribe(actor(a), amount, *now).is_ok(),
            Op::Withdraw { actor: a, percent } => {
                let amount = (pool.balance_of(&actor(a)) as u128 * percent as u128 / 100) as u64;
                pool.withdraw(actor(a), amount, *now).is_ok()
            }
            Op::Exit { actor: a } => pool.exit(actor(a), *now).is_ok(),
            Op::Claim { actor: a } => pool.claim_reward(actor(a), *now).is_ok(),
            Op::AddReward { amount, duration } => {
                let added = pool.add_reward(owner(), amount, duration, *now).is_ok();
                if added {
                    pool.token_mut().mint(&custody(), amount).unwrap();
                }
                added
            }
            Op::CollectFees { recipient } => pool
                .collect_fees(owner(), fee_recipient(recipient), *now)
                .is_ok(),
            Op::Advance(secs) => {
                *now += secs;
                true
            }
        }
    }

    fn total_earned(pool: &StakingEngine, now: i64) -> u128 {
        (0..ACTORS)
            .map(|index| pool.earned(&actor(index), now).unwrap() as u128)
            .sum()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(300))]

        #[test]
        fn pool_accounting_holds_for_any_sequence(
            ops in prop::collection::vec(op_strategy(), 1..60),
        ) {
            let mut pool = new_pool();
            let mut now = 1_700_000_000i64;
            let mut last_accumulator = 0u128;

            for op in &ops {
                let before = pool.snapshot();
                let applied = apply(&mut pool, op, &mut now);

                // ── INVARIANT: custody is never a holder or fee recipient ──
                if op.targets_custody() {
                    prop_assert!(!applied, "{:?} was accepted for custody", op);
                }
                prop_assert_eq!(pool.balance_of(&custody()), 0);

                if !applied {
                    // ── INVARIANT: rejected operations change nothing ──
                    prop_assert_eq!(pool.snapshot(), before, "{:?} left partial state", op);
                    prop_assert!(pool.take_events().is_empty());
                }
                pool.take_events();

                // ── INVARIANT: conservation ──
                prop_assert_eq!(
                    pool.total_staked() as u128,
                    pool.accounts().total_raw_balance(),
                    "total_staked diverged after {:?}", op
                );

                // ── INVARIANT: solvency ──
                let custody_balance = pool.token().balance_of(&custody()) as u128;
                let obligations = pool.total_staked() as u128
                    + pool.total_fees_held() as u128
                    + total_earned(&pool, now);
                prop_assert!(
                    custody_balance >= obligations,
                    "custody {} < obligations {} after {:?}", custody_balance, obligations, op
                );

                // ── INVARIANT: accumulator is monotone ──
                let accumulator = pool.reward_per_unit(now).unwrap();
                prop_assert!(accumulator >= last_accumulator);
                prop_assert!(pool.ledger().reward_per_unit_stored <= accumulator);
                last_accumulator = accumulator;

                prop_assert!(pool.ledger().last_update_time <= now);
            }
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(300))]

        #[test]
        fn earned_is_a_pure_view(
            deposit in 1_000..=10_000_000u64,
            reward in 1..=1_000_000u64,
            duration in 1..=(90 * DAY) as u64,
            elapsed in 0..=(120 * DAY),
        ) {
            let mut pool = new_pool();
            pool.add_reward(owner(), reward, duration, 0).unwrap();
            pool.token_mut().mint(&custody(), reward).unwrap();
            pool.subscribe(holder(0), deposit, 0).unwrap();

            let before = pool.snapshot();
            let first = pool.earned(&holder(0), elapsed).unwrap();
            let second = pool.earned(&holder(0), elapsed).unwrap();
            prop_assert_eq!(first, second);
            prop_assert_eq!(pool.snapshot(), before);

            // A lone holder can never earn more than was funded.
            prop_assert!(first <= reward);

            // Exiting pays exactly what the view reported.
            let outcome = pool.exit(holder(0), elapsed).unwrap();
            prop_assert_eq!(outcome.reward, first);
        }
    }
}
