//! The fungible-token collaborator.
//!
//! The pool never holds balances itself; every movement of tokens goes through
//! a [`TokenLedger`]. Deposits and reward funding are pulled from the holder
//! into the pool's custody account, payouts are pushed from custody.

use {
    crate::error::TokenError,
    log::*,
    solana_pubkey::Pubkey,
    std::collections::{HashMap, HashSet},
};

pub trait TokenLedger {
    /// Pull `amount` from `from` into `to`, on the authority of `from`.
    fn transfer_from(&mut self, from: &Pubkey, to: &Pubkey, amount: u64) -> Result<(), TokenError>;

    /// Push `amount` out of `from` (the pool custody) to `to`.
    fn transfer(&mut self, from: &Pubkey, to: &Pubkey, amount: u64) -> Result<(), TokenError>;

    fn balance_of(&self, owner: &Pubkey) -> u64;
}

/// A `HashMap`-backed token ledger.
///
/// Accounts can be frozen, after which any transfer touching them is rejected.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTokenLedger {
    balances: HashMap<Pubkey, u64>,
    frozen: HashSet<Pubkey>,
    supply: u64,
}

impl InMemoryTokenLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create `amount` new tokens in `owner`'s account.
    pub fn mint(&mut self, owner: &Pubkey, amount: u64) -> Result<(), TokenError> {
        let supply = self.supply.checked_add(amount).ok_or(TokenError::Overflow)?;
        let balance = self
            .balance_of(owner)
            .checked_add(amount)
            .ok_or(TokenError::Overflow)?;
        self.supply = supply;
        self.balances.insert(*owner, balance);
        Ok(())
    }

    pub fn freeze(&mut self, account: &Pubkey) {
        self.frozen.insert(*account);
    }

    pub fn thaw(&mut self, account: &Pubkey) {
        self.frozen.remove(account);
    }

    pub fn total_supply(&self) -> u64 {
        self.supply
    }

    fn move_tokens(&mut self, from: &Pubkey, to: &Pubkey, amount: u64) -> Result<(), TokenError> {
        for account in [from, to] {
            if self.frozen.contains(account) {
                return Err(TokenError::Rejected {
                    reason: format!("account {account} is frozen"),
                });
            }
        }
        let available = self.balance_of(from);
        let remaining = available
            .checked_sub(amount)
            .ok_or(TokenError::InsufficientFunds {
                needed: amount,
                available,
            })?;
        if from == to {
            return Ok(());
        }
        let credited = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(TokenError::Overflow)?;
        self.balances.insert(*from, remaining);
        self.balances.insert(*to, credited);
        trace!("token transfer {from} -> {to}: {amount}");
        Ok(())
    }
}

impl TokenLedger for InMemoryTokenLedger {
    fn transfer_from(&mut self, from: &Pubkey, to: &Pubkey, amount: u64) -> Result<(), TokenError> {
        self.move_tokens(from, to, amount)
    }

    fn transfer(&mut self, from: &Pubkey, to: &Pubkey, amount: u64) -> Result<(), TokenError> {
        self.move_tokens(from, to, amount)
    }

    fn balance_of(&self, owner: &Pubkey) -> u64 {
        self.balances.get(owner).copied().unwrap_or(0)
    }
}
