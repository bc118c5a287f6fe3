// src/ledger/events.rs
//! Records emitted by ledger and whitelist operations

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::pubkey::Pubkey;

/// A record published to a token's event log when a transaction commits
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub enum LedgerEvent {
    /// Tokens moved between accounts (`from` is null for genesis issuance)
    Transfer {
        from: Pubkey,
        to: Pubkey,
        value: u64,
    },

    /// An allowance was set to `value`
    Approval {
        owner: Pubkey,
        spender: Pubkey,
        value: u64,
    },

    /// Operator membership changed
    OperatorUpdated {
        operator: Pubkey,
        enabled: bool,
    },
}

impl LedgerEvent {
    /// Whether this is an Approval record for the given pair
    pub fn is_approval_for(&self, owner: &Pubkey, spender: &Pubkey) -> bool {
        matches!(
            self,
            LedgerEvent::Approval { owner: o, spender: s, .. } if o == owner && s == spender
        )
    }
}
