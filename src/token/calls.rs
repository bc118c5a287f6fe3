// src/token/calls.rs
//! Callable operations of a token
//!
//! A `LedgerCall` is what a principal asks a token to do, either directly or
//! through the relay gateway. The caller's address is never part of the call;
//! it is supplied by the identity layer alongside it.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use solana_program::pubkey::Pubkey;

/// Instruction set of a token
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub enum LedgerCall {
    /// Read the total supply
    TotalSupply,

    /// Read an account's balance
    BalanceOf { account: Pubkey },

    /// Read an allowance
    Allowance { owner: Pubkey, spender: Pubkey },

    /// Move tokens from the caller to `to`
    Transfer { to: Pubkey, amount: u64 },

    /// Set the caller's allowance for `spender`
    Approve { spender: Pubkey, amount: u64 },

    /// Raise the caller's allowance for `spender`
    IncreaseAllowance { spender: Pubkey, delta: u64 },

    /// Lower the caller's allowance for `spender`
    DecreaseAllowance { spender: Pubkey, delta: u64 },

    /// Move tokens out of `owner`'s balance, the caller acting as spender
    TransferFrom { owner: Pubkey, to: Pubkey, amount: u64 },

    /// Add or remove an operator (token owner only)
    SetOperator { operator: Pubkey, enabled: bool },

    /// Read operator membership
    IsOperator { account: Pubkey },

    /// Read the token name
    Name,

    /// Read the token symbol
    Symbol,

    /// Read the token decimals
    Decimals,
}

impl LedgerCall {
    /// Payload-free identifier of this call
    pub fn operation(&self) -> OperationId {
        match self {
            LedgerCall::TotalSupply => OperationId::TotalSupply,
            LedgerCall::BalanceOf { .. } => OperationId::BalanceOf,
            LedgerCall::Allowance { .. } => OperationId::Allowance,
            LedgerCall::Transfer { .. } => OperationId::Transfer,
            LedgerCall::Approve { .. } => OperationId::Approve,
            LedgerCall::IncreaseAllowance { .. } => OperationId::IncreaseAllowance,
            LedgerCall::DecreaseAllowance { .. } => OperationId::DecreaseAllowance,
            LedgerCall::TransferFrom { .. } => OperationId::TransferFrom,
            LedgerCall::SetOperator { .. } => OperationId::SetOperator,
            LedgerCall::IsOperator { .. } => OperationId::IsOperator,
            LedgerCall::Name => OperationId::Name,
            LedgerCall::Symbol => OperationId::Symbol,
            LedgerCall::Decimals => OperationId::Decimals,
        }
    }

    /// Whether the call can change state
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            LedgerCall::Transfer { .. }
                | LedgerCall::Approve { .. }
                | LedgerCall::IncreaseAllowance { .. }
                | LedgerCall::DecreaseAllowance { .. }
                | LedgerCall::TransferFrom { .. }
                | LedgerCall::SetOperator { .. }
        )
    }
}

/// Operation identifier used by the restricted set and cost schedules
#[derive(
    BorshSerialize, BorshDeserialize, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash,
)]
#[serde(rename_all = "snake_case")]
pub enum OperationId {
    TotalSupply,
    BalanceOf,
    Allowance,
    Transfer,
    Approve,
    IncreaseAllowance,
    DecreaseAllowance,
    TransferFrom,
    SetOperator,
    IsOperator,
    Name,
    Symbol,
    Decimals,
}

/// Value returned by a successful call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutput {
    /// A token amount (supply, balance or allowance)
    Amount(u64),

    /// A yes/no answer
    Flag(bool),

    /// A descriptive string
    Text(String),

    /// Decimal places
    Decimals(u8),

    /// A state change was applied
    Completed,
}
