//! The staking pool state machine.
//!
//! Every mutating call follows the same shape: copy the pool ledger, the fee
//! collector and the caller's account, roll the reward accumulator forward on
//! the copies, checkpoint the account, apply the balance change and its fee,
//! and only then move tokens. State is written back only once the token
//! movement has succeeded, so a failed call leaves the pool exactly as it was.
//!
//! The engine is deterministic and takes the current time from the caller.
//! It is not internally synchronized; see [`crate::shared`] for a locked
//! handle.

use {
    crate::{
        account::{HolderAccount, HolderAccountRegistry},
        config::StakingConfig,
        error::StakingError,
        event::StakingEvent,
        fee_collector::FeeCollector,
        fee_schedule::FeeScheduleTable,
        reward::{RewardAccrualLedger, RewardPeriod},
        state::PoolSnapshot,
        token::{InMemoryTokenLedger, TokenLedger},
    },
    log::*,
    serde::{Deserialize, Serialize},
    solana_clock::UnixTimestamp,
    solana_pubkey::Pubkey,
};

/// Token amounts moved by a deposit or withdrawal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BalanceDelta {
    /// Gross amount requested.
    pub amount: u64,
    /// Portion withheld as a fee.
    pub fee: u64,
    /// `amount - fee`: credited to the stake (deposit) or paid out (withdrawal).
    pub net: u64,
}

/// Result of [`StakingEngine::exit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExitOutcome {
    pub withdrawal: BalanceDelta,
    pub reward: u64,
}

impl ExitOutcome {
    /// Everything transferred to the holder.
    pub fn total_paid(&self) -> u64 {
        self.withdrawal.net.saturating_add(self.reward)
    }
}

pub struct StakingEngine<T: TokenLedger = InMemoryTokenLedger> {
    /// May fund rewards, sweep fees and hand over ownership.
    owner: Pubkey,
    /// Token account holding every deposit, fee and reward.
    custody: Pubkey,
    fee_schedule: FeeScheduleTable,
    ledger: RewardAccrualLedger,
    fees: FeeCollector,
    accounts: HolderAccountRegistry,
    token: T,
    events: Vec<StakingEvent>,
}

impl<T: TokenLedger> StakingEngine<T> {
    pub fn new(
        config: StakingConfig,
        owner: Pubkey,
        custody: Pubkey,
        token: T,
    ) -> Result<Self, StakingError> {
        let fee_schedule = FeeScheduleTable::new(&config)?;
        info!(
            "Staking pool created: owner={owner} custody={custody} subscription_fee={}bps tiers={}",
            fee_schedule.subscription_fee_bps(),
            fee_schedule.tiers().len()
        );
        Ok(Self {
            owner,
            custody,
            fee_schedule,
            ledger: RewardAccrualLedger::default(),
            fees: FeeCollector::default(),
            accounts: HolderAccountRegistry::new(),
            token,
            events: Vec::new(),
        })
    }

    /// Rebuild an engine from persisted state.
    pub fn from_snapshot(snapshot: PoolSnapshot, token: T) -> Result<Self, StakingError> {
        snapshot.validate()?;
        let fee_schedule = FeeScheduleTable::new(&snapshot.config)?;
        debug!(
            "Restoring staking pool: {} holders, total_staked={}",
            snapshot.accounts.len(),
            snapshot.ledger.total_staked
        );
        Ok(Self {
            owner: snapshot.owner,
            custody: snapshot.custody,
            fee_schedule,
            ledger: snapshot.ledger,
            fees: snapshot.fees,
            accounts: snapshot.accounts.into_iter().collect(),
            token,
            events: Vec::new(),
        })
    }

    pub fn snapshot(&self) -> PoolSnapshot {
        let mut accounts: Vec<_> = self
            .accounts
            .iter()
            .map(|(holder, account)| (*holder, *account))
            .collect();
        accounts.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        PoolSnapshot {
            owner: self.owner,
            custody: self.custody,
            config: self.fee_schedule.config(),
            ledger: self.ledger,
            fees: self.fees,
            accounts,
        }
    }

    // -- Holder operations --

    /// Deposit `amount` from `holder`. The subscription fee is withheld and
    /// the remainder is staked.
    pub fn subscribe(
        &mut self,
        holder: Pubkey,
        amount: u64,
        now: UnixTimestamp,
    ) -> Result<BalanceDelta, StakingError> {
        self.check_not_custody(&holder, "subscribe")?;
        if amount == 0 {
            return Err(StakingError::InvalidAmount);
        }
        let mut ledger = self.ledger;
        let mut fees = self.fees;
        let stored = ledger.roll_forward(now)?;
        let mut account = self.accounts.checkpoint(&holder, stored)?;

        let fee = self.fee_schedule.subscription_fee(amount)?;
        let net = amount
            .checked_sub(fee)
            .ok_or(StakingError::ArithmeticOverflow)?;
        account.deposit(net, now)?;
        ledger.stake(net)?;
        fees.record(fee)?;

        self.pull(&holder, amount)?;
        self.commit(ledger, fees, Some((holder, account)));

        info!("Subscribed {holder}: amount={amount} fee={fee} net={net}");
        self.events.push(StakingEvent::Subscribed {
            holder,
            amount,
            fee,
            net,
            timestamp: now,
        });
        Ok(BalanceDelta { amount, fee, net })
    }

    /// Withdraw `amount` of `holder`'s stake, less the exit fee for their
    /// holding duration.
    pub fn withdraw(
        &mut self,
        holder: Pubkey,
        amount: u64,
        now: UnixTimestamp,
    ) -> Result<BalanceDelta, StakingError> {
        self.check_not_custody(&holder, "withdraw")?;
        if amount == 0 {
            return Err(StakingError::InvalidAmount);
        }
        let mut ledger = self.ledger;
        let mut fees = self.fees;
        let stored = ledger.roll_forward(now)?;
        let mut account = self.accounts.checkpoint(&holder, stored)?;

        let delta = self.debit(&mut ledger, &mut fees, &mut account, amount, now)?;

        self.push(&holder, delta.net)?;
        self.commit(ledger, fees, Some((holder, account)));

        info!(
            "Withdrew {holder}: amount={} fee={} net={}",
            delta.amount, delta.fee, delta.net
        );
        self.push_withdrawn(holder, delta, now);
        Ok(delta)
    }

    /// Withdraw the whole stake and claim all earned reward in one transfer.
    pub fn exit(&mut self, holder: Pubkey, now: UnixTimestamp) -> Result<ExitOutcome, StakingError> {
        self.check_not_custody(&holder, "exit")?;
        let mut ledger = self.ledger;
        let mut fees = self.fees;
        let stored = ledger.roll_forward(now)?;
        let mut account = self.accounts.checkpoint(&holder, stored)?;

        let balance = account.raw_balance;
        if balance == 0 {
            return Err(StakingError::InvalidAmount);
        }
        let withdrawal = self.debit(&mut ledger, &mut fees, &mut account, balance, now)?;
        let reward = account.take_earned();
        let payout = withdrawal
            .net
            .checked_add(reward)
            .ok_or(StakingError::ArithmeticOverflow)?;

        self.push(&holder, payout)?;
        self.commit(ledger, fees, Some((holder, account)));

        info!(
            "Exited {holder}: amount={} fee={} net={} reward={reward}",
            withdrawal.amount, withdrawal.fee, withdrawal.net
        );
        self.push_withdrawn(holder, withdrawal, now);
        if reward > 0 {
            self.events.push(StakingEvent::RewardPaid {
                holder,
                reward,
                timestamp: now,
            });
        }
        Ok(ExitOutcome { withdrawal, reward })
    }

    /// Pay out `holder`'s earned reward without touching their stake.
    /// Returns the amount paid, possibly zero. The accumulator is rolled
    /// forward either way.
    pub fn claim_reward(&mut self, holder: Pubkey, now: UnixTimestamp) -> Result<u64, StakingError> {
        self.check_not_custody(&holder, "claim_reward")?;
        let mut ledger = self.ledger;
        let stored = ledger.roll_forward(now)?;
        let mut account = self.accounts.checkpoint(&holder, stored)?;
        let reward = account.take_earned();
        if reward == 0 {
            self.commit(ledger, self.fees, None);
            return Ok(0);
        }

        self.push(&holder, reward)?;
        self.commit(ledger, self.fees, Some((holder, account)));

        info!("Reward paid to {holder}: {reward}");
        self.events.push(StakingEvent::RewardPaid {
            holder,
            reward,
            timestamp: now,
        });
        Ok(reward)
    }

    // -- Owner operations --

    /// Start a reward period of `duration` seconds distributing `amount`,
    /// folding in whatever the running period has not yet emitted.
    ///
    /// No tokens are moved: the owner funds custody separately. A warning is
    /// logged if custody cannot cover the pool's obligations afterwards.
    pub fn add_reward(
        &mut self,
        caller: Pubkey,
        amount: u64,
        duration: u64,
        now: UnixTimestamp,
    ) -> Result<RewardPeriod, StakingError> {
        self.check_owner(&caller, "add_reward")?;
        let mut ledger = self.ledger;
        let period = ledger.add_reward(amount, duration, now)?;
        self.commit(ledger, self.fees, None);

        info!(
            "Reward added: amount={amount} duration={duration}s rate={} period={}..{}",
            period.reward_rate, period.start, period.end
        );
        match self.funding_shortfall(now) {
            Ok(0) => {}
            Ok(shortfall) => warn!(
                "Custody {} is short {shortfall} tokens of pool obligations",
                self.custody
            ),
            Err(err) => warn!("Could not check custody funding: {err}"),
        }
        self.events.push(StakingEvent::RewardAdded {
            amount,
            duration,
            reward_rate: period.reward_rate,
            period_end: period.end,
            timestamp: now,
        });
        Ok(period)
    }

    /// Sweep every fee held in custody to `recipient`. Returns the amount
    /// swept; with nothing held only the accumulator is rolled forward and
    /// zero is returned.
    pub fn collect_fees(
        &mut self,
        caller: Pubkey,
        recipient: Pubkey,
        now: UnixTimestamp,
    ) -> Result<u64, StakingError> {
        self.check_owner(&caller, "collect_fees")?;
        self.check_not_custody(&recipient, "collect_fees")?;
        let mut ledger = self.ledger;
        let mut fees = self.fees;
        ledger.roll_forward(now)?;
        let amount = fees.sweep()?;
        if amount == 0 {
            debug!("collect_fees: nothing to collect");
            self.commit(ledger, self.fees, None);
            return Ok(0);
        }

        self.push(&recipient, amount)?;
        self.commit(ledger, fees, None);

        info!("Collected {amount} in fees to {recipient}");
        self.events.push(StakingEvent::FeesCollected {
            recipient,
            amount,
            timestamp: now,
        });
        Ok(amount)
    }

    pub fn transfer_ownership(
        &mut self,
        caller: Pubkey,
        new_owner: Pubkey,
    ) -> Result<(), StakingError> {
        self.check_owner(&caller, "transfer_ownership")?;
        let previous_owner = std::mem::replace(&mut self.owner, new_owner);
        info!("Ownership transferred: {previous_owner} -> {new_owner}");
        self.events.push(StakingEvent::OwnershipTransferred {
            previous_owner,
            new_owner,
        });
        Ok(())
    }

    /// Drain the events of every committed operation since the last call.
    pub fn take_events(&mut self) -> Vec<StakingEvent> {
        std::mem::take(&mut self.events)
    }

    // -- Views --

    pub fn reward_per_unit(&self, now: UnixTimestamp) -> Result<u128, StakingError> {
        self.ledger.reward_per_unit(now)
    }

    /// Reward `holder` could claim at `now`.
    pub fn earned(&self, holder: &Pubkey, now: UnixTimestamp) -> Result<u64, StakingError> {
        self.accounts
            .earned(holder, self.ledger.reward_per_unit(now)?)
    }

    pub fn balance_of(&self, holder: &Pubkey) -> u64 {
        self.accounts.get(holder).raw_balance
    }

    pub fn account(&self, holder: &Pubkey) -> HolderAccount {
        self.accounts.get(holder)
    }

    /// Every holder that has ever subscribed, including fully exited ones.
    pub fn holder_count(&self) -> usize {
        self.accounts.len()
    }

    /// Holders with a non-zero stake.
    pub fn active_holder_count(&self) -> usize {
        self.accounts.active_len()
    }

    /// Projected reward for depositing `amount` now and holding it for
    /// `duration` seconds, at the current rate and pool size.
    pub fn calculate_reward(
        &self,
        amount: u64,
        duration: u64,
        now: UnixTimestamp,
    ) -> Result<u64, StakingError> {
        self.ledger.projected_reward(amount, duration, now)
    }

    pub fn fee_basis_points_for(&self, holder: &Pubkey, now: UnixTimestamp) -> u64 {
        self.fee_schedule.fee_basis_points_for(
            self.accounts.get(holder).holding_start,
            now,
            self.ledger.funded_period_end(),
        )
    }

    /// Fee `holder` would pay to withdraw `amount` at `now`.
    pub fn exit_fee(
        &self,
        holder: &Pubkey,
        amount: u64,
        now: UnixTimestamp,
    ) -> Result<u64, StakingError> {
        self.fee_schedule.exit_fee(
            amount,
            self.accounts.get(holder).holding_start,
            now,
            self.ledger.funded_period_end(),
        )
    }

    pub fn subscription_fee(&self, amount: u64) -> Result<u64, StakingError> {
        self.fee_schedule.subscription_fee(amount)
    }

    pub fn total_staked(&self) -> u64 {
        self.ledger.total_staked
    }

    pub fn total_fees_held(&self) -> u64 {
        self.fees.held()
    }

    pub fn total_fees_collected(&self) -> u64 {
        self.fees.collected()
    }

    /// Scaled by `SCALE`.
    pub fn reward_rate(&self) -> u128 {
        self.ledger.reward_rate
    }

    pub fn reward_period(&self) -> RewardPeriod {
        self.ledger.reward_period()
    }

    /// Tokens custody is missing to cover every stake, held fee, owed reward
    /// and the rest of the running period. Zero when fully funded.
    pub fn funding_shortfall(&self, now: UnixTimestamp) -> Result<u64, StakingError> {
        let reward_per_unit = self.ledger.reward_per_unit(now)?;
        let mut owed = 0u128;
        for (_, account) in self.accounts.iter() {
            owed = owed
                .checked_add(account.earned(reward_per_unit)? as u128)
                .ok_or(StakingError::ArithmeticOverflow)?;
        }
        let remaining = self.ledger.remaining_reward(now)?;
        let obligations = owed
            .checked_add(self.ledger.total_staked as u128)
            .and_then(|v| v.checked_add(self.fees.held() as u128))
            .and_then(|v| v.checked_add(remaining as u128))
            .ok_or(StakingError::ArithmeticOverflow)?;
        let custody_balance = self.token.balance_of(&self.custody) as u128;
        Ok(u64::try_from(obligations.saturating_sub(custody_balance)).unwrap_or(u64::MAX))
    }

    pub fn owner(&self) -> Pubkey {
        self.owner
    }

    pub fn custody(&self) -> Pubkey {
        self.custody
    }

    pub fn config(&self) -> StakingConfig {
        self.fee_schedule.config()
    }

    pub fn fee_schedule(&self) -> &FeeScheduleTable {
        &self.fee_schedule
    }

    pub fn ledger(&self) -> &RewardAccrualLedger {
        &self.ledger
    }

    pub fn accounts(&self) -> &HolderAccountRegistry {
        &self.accounts
    }

    pub fn token(&self) -> &T {
        &self.token
    }

    /// Direct access to the token ledger, e.g. to fund custody.
    pub fn token_mut(&mut self) -> &mut T {
        &mut self.token
    }

    // -- Internals --

    fn check_owner(&self, caller: &Pubkey, operation: &str) -> Result<(), StakingError> {
        if *caller != self.owner {
            warn!("{operation}: caller {caller} is not the pool owner");
            return Err(StakingError::Unauthorized);
        }
        Ok(())
    }

    /// Custody can neither stake nor receive fees: a transfer to itself
    /// moves no tokens.
    fn check_not_custody(&self, account: &Pubkey, operation: &str) -> Result<(), StakingError> {
        if *account == self.custody {
            warn!("{operation}: {account} is the pool custody account");
            return Err(StakingError::CustodyAccount);
        }
        Ok(())
    }

    /// Remove `amount` from a staged account and size its exit fee.
    fn debit(
        &self,
        ledger: &mut RewardAccrualLedger,
        fees: &mut FeeCollector,
        account: &mut HolderAccount,
        amount: u64,
        now: UnixTimestamp,
    ) -> Result<BalanceDelta, StakingError> {
        let fee = self.fee_schedule.exit_fee(
            amount,
            account.holding_start,
            now,
            ledger.funded_period_end(),
        )?;
        let net = amount
            .checked_sub(fee)
            .ok_or(StakingError::ArithmeticOverflow)?;
        account.withdraw(amount)?;
        ledger.unstake(amount)?;
        fees.record(fee)?;
        Ok(BalanceDelta { amount, fee, net })
    }

    fn pull(&mut self, from: &Pubkey, amount: u64) -> Result<(), StakingError> {
        if amount == 0 {
            return Ok(());
        }
        let custody = self.custody;
        self.token
            .transfer_from(from, &custody, amount)
            .map_err(|err| {
                warn!("Transfer of {amount} from {from} into custody failed: {err}");
                StakingError::TransferFailed(err)
            })
    }

    fn push(&mut self, to: &Pubkey, amount: u64) -> Result<(), StakingError> {
        if amount == 0 {
            return Ok(());
        }
        let custody = self.custody;
        self.token.transfer(&custody, to, amount).map_err(|err| {
            warn!("Transfer of {amount} from custody to {to} failed: {err}");
            StakingError::TransferFailed(err)
        })
    }

    fn commit(
        &mut self,
        ledger: RewardAccrualLedger,
        fees: FeeCollector,
        account: Option<(Pubkey, HolderAccount)>,
    ) {
        self.ledger = ledger;
        self.fees = fees;
        if let Some((holder, account)) = account {
            self.accounts.store(holder, account);
        }
    }

    fn push_withdrawn(&mut self, holder: Pubkey, delta: BalanceDelta, now: UnixTimestamp) {
        self.events.push(StakingEvent::Withdrawn {
            holder,
            amount: delta.amount,
            fee: delta.fee,
            net: delta.net,
            timestamp: now,
        });
    }
}
