// src/token/operator_whitelist.rs
//! Operator whitelist
//!
//! Operators are spenders with unlimited, non-decrementing authority over
//! every holder's balance. The whitelist only tracks membership; the token
//! layer consults it before touching the ledger's allowance table.

use std::collections::HashSet;

use log::{info, warn};
use solana_program::pubkey::Pubkey;

use crate::constants::NULL_ADDRESS;
use crate::error_handling::LedgerError;
use crate::ledger::events::LedgerEvent;
use crate::ledger::journal::{Journal, JournalEntry};

/// Owner-managed set of operators for one asset
#[derive(Debug, Clone)]
pub struct OperatorWhitelist {
    /// Asset this whitelist belongs to
    asset: Pubkey,

    /// Only address allowed to change membership
    owner: Pubkey,

    /// Current operators
    operators: HashSet<Pubkey>,
}

impl OperatorWhitelist {
    /// Create an empty whitelist
    pub fn new(asset: Pubkey, owner: Pubkey) -> Self {
        Self {
            asset,
            owner,
            operators: HashSet::new(),
        }
    }

    /// Whitelist owner
    pub fn owner(&self) -> &Pubkey {
        &self.owner
    }

    /// Whether `account` is an operator
    pub fn is_operator(&self, account: &Pubkey) -> bool {
        self.operators.contains(account)
    }

    /// Number of operators
    pub fn len(&self) -> usize {
        self.operators.len()
    }

    /// Whether there are no operators
    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }

    /// Add or remove `operator`. Idempotent; a record is staged only when
    /// membership actually changes. Returns whether it changed.
    pub fn set_operator(
        &mut self,
        journal: &mut Journal,
        caller: &Pubkey,
        operator: Pubkey,
        enabled: bool,
    ) -> Result<bool, LedgerError> {
        if *caller != self.owner {
            warn!("{}: rejected operator update from {}", self.asset, caller);
            return Err(LedgerError::Unauthorized(*caller));
        }
        if operator == NULL_ADDRESS {
            return Err(LedgerError::InvalidSpender);
        }

        let previous = self.is_operator(&operator);
        if previous == enabled {
            return Ok(false);
        }

        journal.record(JournalEntry::Operator {
            asset: self.asset,
            operator,
            previous,
        });
        self.restore(operator, enabled);
        journal.emit(self.asset, LedgerEvent::OperatorUpdated { operator, enabled });

        info!("{}: operator {} enabled={}", self.asset, operator, enabled);
        Ok(true)
    }

    pub(crate) fn restore(&mut self, operator: Pubkey, enabled: bool) {
        if enabled {
            self.operators.insert(operator);
        } else {
            self.operators.remove(&operator);
        }
    }
}
