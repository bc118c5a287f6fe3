// src/error_handling/error_types.rs
//! Error types for the fee-relay ledger
//!
//! Every component reports failures through one of the enums below. Each
//! variant maps to a stable numeric code so that callers embedding the
//! ledger in a program runtime can surface it as a custom program error.

use solana_program::program_error::ProgramError;
use solana_program::pubkey::Pubkey;
use thiserror::Error;

use crate::constants::{REJECT_INSUFFICIENT_FEE_BALANCE, REJECT_RESTRICTED_METHOD};

/// Ledger invariant violations and token-level authorization failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// The debited account holds less than the requested amount
    #[error("Insufficient balance: {available} available, {requested} requested")]
    InsufficientBalance { available: u64, requested: u64 },

    /// The spender's allowance does not cover the requested amount
    #[error("Insufficient allowance: {available} available, {requested} requested")]
    InsufficientAllowance { available: u64, requested: u64 },

    /// Transfer destination is the null address
    #[error("Invalid recipient: the null address cannot receive tokens")]
    InvalidRecipient,

    /// Approval target is the null address
    #[error("Invalid spender: the null address cannot be approved")]
    InvalidSpender,

    /// Decreasing the allowance would take it below zero
    #[error("Allowance underflow: cannot decrease {current} by {delta}")]
    AllowanceUnderflow { current: u64, delta: u64 },

    /// Increasing the allowance would exceed the representable maximum
    #[error("Allowance overflow: cannot increase {current} by {delta}")]
    AllowanceOverflow { current: u64, delta: u64 },

    /// Crediting an account would exceed the representable maximum
    #[error("Balance overflow for {0}")]
    BalanceOverflow(Pubkey),

    /// Caller is not the token owner
    #[error("Unauthorized: {0} is not the token owner")]
    Unauthorized(Pubkey),

    /// No ledger is registered under the address
    #[error("Unknown asset: {0}")]
    UnknownAsset(Pubkey),

    /// An asset with the same address is already registered
    #[error("Asset already registered: {0}")]
    AssetExists(Pubkey),

    /// Balance deltas staged in a transaction do not net to zero
    #[error("Supply mismatch on {asset}: net balance change {delta}")]
    SupplyMismatch { asset: Pubkey, delta: i128 },
}

impl LedgerError {
    /// Convert to error code
    pub fn error_code(&self) -> u32 {
        match self {
            LedgerError::InsufficientBalance { .. } => 1000,
            LedgerError::InsufficientAllowance { .. } => 1001,
            LedgerError::InvalidRecipient => 1002,
            LedgerError::InvalidSpender => 1003,
            LedgerError::AllowanceUnderflow { .. } => 1004,
            LedgerError::AllowanceOverflow { .. } => 1005,
            LedgerError::BalanceOverflow(_) => 1006,
            LedgerError::Unauthorized(_) => 1007,
            LedgerError::UnknownAsset(_) => 1008,
            LedgerError::AssetExists(_) => 1009,
            LedgerError::SupplyMismatch { .. } => 1010,
        }
    }
}

/// Reasons the gateway refuses to relay a call
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectionReason {
    /// Caller's fee balance does not cover the estimated fee
    #[error("Insufficient fee balance")]
    InsufficientFeeBalance,

    /// Operation may only be invoked directly
    #[error("Restricted method")]
    RestrictedMethod,
}

impl RejectionReason {
    /// Convert to error code
    pub fn error_code(&self) -> u32 {
        match self {
            RejectionReason::InsufficientFeeBalance => REJECT_INSUFFICIENT_FEE_BALANCE,
            RejectionReason::RestrictedMethod => REJECT_RESTRICTED_METHOD,
        }
    }
}

/// Failures of the owner-gated configuration surface
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdminError {
    /// Caller is not the gateway owner
    #[error("Unauthorized: {0} is not the gateway owner")]
    Unauthorized(Pubkey),

    /// Withdrawal exceeds the sponsor deposit pool
    #[error("Insufficient deposit: {available} available, {requested} requested")]
    InsufficientDeposit { available: u64, requested: u64 },

    /// Deposit would overflow the sponsor pool
    #[error("Deposit overflow: pool holds {available}, cannot add {amount}")]
    DepositOverflow { available: u64, amount: u64 },
}

impl AdminError {
    /// Convert to error code
    pub fn error_code(&self) -> u32 {
        match self {
            AdminError::Unauthorized(_) => 2000,
            AdminError::InsufficientDeposit { .. } => 2001,
            AdminError::DepositOverflow { .. } => 2002,
        }
    }
}

/// Outcome of a relayed call that did not commit
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RelayError {
    /// Refused during the acceptance check; nothing was touched
    #[error("Relay rejected: {0}")]
    Rejected(RejectionReason),

    /// The ledger operation failed; the call was rolled back
    #[error("Relayed execution failed: {0}")]
    Execution(LedgerError),

    /// The fee could not be charged; the call was rolled back
    #[error("Fee charging failed: {0}")]
    FeeCharge(LedgerError),
}

impl RelayError {
    /// Convert to error code
    pub fn error_code(&self) -> u32 {
        match self {
            RelayError::Rejected(reason) => reason.error_code(),
            RelayError::Execution(e) => e.error_code(),
            RelayError::FeeCharge(e) => 3000 + (e.error_code() - 1000),
        }
    }

    /// Rejection reason, if the call never got past acceptance
    pub fn rejection(&self) -> Option<RejectionReason> {
        match self {
            RelayError::Rejected(reason) => Some(*reason),
            _ => None,
        }
    }
}

impl From<RejectionReason> for RelayError {
    fn from(reason: RejectionReason) -> Self {
        RelayError::Rejected(reason)
    }
}

/// Configuration loading and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Malformed JSON or a field of the wrong type
    #[error("Invalid configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// A required address is the null address
    #[error("Invalid configuration: {0} must not be the null address")]
    NullAddress(&'static str),
}

impl ConfigError {
    /// Convert to error code
    pub fn error_code(&self) -> u32 {
        match self {
            ConfigError::Json(_) => 4000,
            ConfigError::NullAddress(_) => 4001,
        }
    }
}

/// Crate-level error
#[derive(Error, Debug)]
pub enum FeeRelayError {
    /// Ledger error
    #[error("{0}")]
    Ledger(#[from] LedgerError),

    /// Relay error
    #[error("{0}")]
    Relay(#[from] RelayError),

    /// Admin error
    #[error("{0}")]
    Admin(#[from] AdminError),

    /// Configuration error
    #[error("{0}")]
    Config(#[from] ConfigError),
}

impl FeeRelayError {
    /// Convert to error code
    pub fn error_code(&self) -> u32 {
        match self {
            FeeRelayError::Ledger(e) => e.error_code(),
            FeeRelayError::Relay(e) => e.error_code(),
            FeeRelayError::Admin(e) => e.error_code(),
            FeeRelayError::Config(e) => e.error_code(),
        }
    }
}

impl From<FeeRelayError> for ProgramError {
    fn from(error: FeeRelayError) -> Self {
        ProgramError::Custom(error.error_code())
    }
}
