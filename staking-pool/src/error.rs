use thiserror::Error;

/// Errors produced by the staking pool.
///
/// Every error aborts the enclosing operation; pool, holder and fee state are
/// left exactly as they were before the call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StakingError {
    /// Zero or out-of-range quantity.
    #[error("Amount must be greater than zero and within range")]
    InvalidAmount,

    /// Withdrawal exceeds the holder's staked balance.
    #[error("Insufficient staked balance: requested {requested}, available {available}")]
    InsufficientBalance { requested: u64, available: u64 },

    /// Reward period of zero length.
    #[error("Reward duration must be greater than zero")]
    InvalidDuration,

    /// Privileged call by someone other than the pool owner.
    #[error("Caller is not the pool owner")]
    Unauthorized,

    /// The pool's own custody account named as a holder or fee recipient.
    #[error("Custody account cannot hold a position or receive fees")]
    CustodyAccount,

    /// The token ledger declined a pull or push.
    #[error("Token transfer failed: {0}")]
    TransferFailed(#[from] TokenError),

    /// Arithmetic overflow (or division by zero) in fixed-point math.
    #[error("Arithmetic overflow")]
    ArithmeticOverflow,

    /// The fee schedule or pool configuration is inconsistent.
    #[error("Invalid staking configuration: {reason}")]
    InvalidConfig { reason: String },

    /// A persisted snapshot failed to decode or violates a pool invariant.
    #[error("Invalid pool snapshot: {reason}")]
    InvalidSnapshot { reason: String },
}

/// Errors reported by a [`crate::token::TokenLedger`] implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Insufficient funds: needed {needed}, available {available}")]
    InsufficientFunds { needed: u64, available: u64 },

    #[error("Token balance overflow")]
    Overflow,

    #[error("Transfer rejected: {reason}")]
    Rejected { reason: String },
}
