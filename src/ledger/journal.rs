// src/ledger/journal.rs
//! Undo log for staged ledger mutations
//!
//! Every write to a balance, an allowance or an operator flag records the
//! value it replaced. Events are staged here rather than published, so that a
//! reverted transaction leaves no trace in any token's event log. Net balance
//! changes are tracked per asset; a committed transaction must move tokens
//! without creating or destroying any.

use std::collections::HashMap;

use log::debug;
use solana_program::pubkey::Pubkey;

use crate::error_handling::LedgerError;
use crate::ledger::events::LedgerEvent;
use crate::ledger::registry::LedgerRegistry;

/// A single reversible mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JournalEntry {
    /// A balance was overwritten
    Balance {
        asset: Pubkey,
        account: Pubkey,
        previous: u64,
    },

    /// An allowance was overwritten
    Allowance {
        asset: Pubkey,
        owner: Pubkey,
        spender: Pubkey,
        previous: u64,
    },

    /// Operator membership was toggled
    Operator {
        asset: Pubkey,
        operator: Pubkey,
        previous: bool,
    },
}

/// Ordered record of mutations and staged events for one transaction
#[derive(Debug, Default)]
pub struct Journal {
    entries: Vec<JournalEntry>,
    events: Vec<(Pubkey, LedgerEvent)>,
    supply_deltas: HashMap<Pubkey, i128>,
}

impl Journal {
    /// Create an empty journal
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded mutations
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been mutated
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.events.is_empty()
    }

    /// Events staged so far, tagged with the asset that produced them
    pub fn staged_events(&self) -> &[(Pubkey, LedgerEvent)] {
        &self.events
    }

    pub(crate) fn record(&mut self, entry: JournalEntry) {
        self.entries.push(entry);
    }

    pub(crate) fn record_supply_delta(&mut self, asset: Pubkey, delta: i128) {
        *self.supply_deltas.entry(asset).or_insert(0) += delta;
    }

    pub(crate) fn emit(&mut self, asset: Pubkey, event: LedgerEvent) {
        self.events.push((asset, event));
    }

    /// Every asset touched must net to zero
    pub(crate) fn verify_supply(&self) -> Result<(), LedgerError> {
        match self.supply_deltas.iter().find(|(_, delta)| **delta != 0) {
            Some((asset, delta)) => Err(LedgerError::SupplyMismatch {
                asset: *asset,
                delta: *delta,
            }),
            None => Ok(()),
        }
    }

    pub(crate) fn into_events(self) -> Vec<(Pubkey, LedgerEvent)> {
        self.events
    }

    /// Undo every recorded mutation, newest first, and drop staged events
    pub(crate) fn revert(self, registry: &mut LedgerRegistry) {
        debug!(
            "Reverting {} mutations and {} staged events",
            self.entries.len(),
            self.events.len()
        );

        for entry in self.entries.into_iter().rev() {
            match entry {
                JournalEntry::Balance { asset, account, previous } => {
                    if let Some(token) = registry.token_mut(&asset) {
                        token.ledger_mut().restore_balance(account, previous);
                    }
                }
                JournalEntry::Allowance { asset, owner, spender, previous } => {
                    if let Some(token) = registry.token_mut(&asset) {
                        token.ledger_mut().restore_allowance(owner, spender, previous);
                    }
                }
                JournalEntry::Operator { asset, operator, previous } => {
                    if let Some(token) = registry.token_mut(&asset) {
                        token.operators_mut().restore(operator, previous);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supply_deltas_must_net_to_zero() {
        let asset = Pubkey::new_unique();
        let mut journal = Journal::new();

        journal.record_supply_delta(asset, -40);
        assert_eq!(
            journal.verify_supply(),
            Err(LedgerError::SupplyMismatch { asset, delta: -40 })
        );

        journal.record_supply_delta(asset, 40);
        assert!(journal.verify_supply().is_ok());
    }

    #[test]
    fn test_staged_events_keep_order() {
        let asset = Pubkey::new_unique();
        let operator = Pubkey::new_unique();
        let mut journal = Journal::new();
        assert!(journal.is_empty());

        journal.emit(asset, LedgerEvent::OperatorUpdated { operator, enabled: true });
        journal.emit(asset, LedgerEvent::OperatorUpdated { operator, enabled: false });

        let events = journal.into_events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].1, LedgerEvent::OperatorUpdated { operator, enabled: false });
    }
}
