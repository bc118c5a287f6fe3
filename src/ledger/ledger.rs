// src/ledger/ledger.rs
//! Balance and allowance bookkeeping for one fungible asset
//!
//! The ledger knows nothing about operators or relays. Every mutating
//! operation validates its preconditions before writing, records the values
//! it overwrites in the supplied journal and stages its events there.

use std::collections::HashMap;

use log::debug;
use solana_program::pubkey::Pubkey;

use crate::constants::NULL_ADDRESS;
use crate::error_handling::LedgerError;
use crate::ledger::events::LedgerEvent;
use crate::ledger::journal::{Journal, JournalEntry};

/// Balances and allowances of one asset
#[derive(Debug, Clone)]
pub struct Ledger {
    /// Address of the asset this ledger tracks
    asset: Pubkey,

    /// Non-zero balances by account
    balances: HashMap<Pubkey, u64>,

    /// Non-zero allowances by (owner, spender)
    allowances: HashMap<(Pubkey, Pubkey), u64>,

    /// Total supply, fixed at genesis
    total_supply: u64,
}

impl Ledger {
    /// Create a ledger with `initial_supply` held by `initial_holder`.
    ///
    /// Returns the ledger together with the genesis Transfer record.
    pub fn new(
        asset: Pubkey,
        initial_holder: Pubkey,
        initial_supply: u64,
    ) -> Result<(Self, LedgerEvent), LedgerError> {
        if initial_holder == NULL_ADDRESS {
            return Err(LedgerError::InvalidRecipient);
        }

        let mut balances = HashMap::new();
        if initial_supply > 0 {
            balances.insert(initial_holder, initial_supply);
        }

        let ledger = Self {
            asset,
            balances,
            allowances: HashMap::new(),
            total_supply: initial_supply,
        };
        let genesis = LedgerEvent::Transfer {
            from: NULL_ADDRESS,
            to: initial_holder,
            value: initial_supply,
        };

        Ok((ledger, genesis))
    }

    /// Asset address
    pub fn asset(&self) -> &Pubkey {
        &self.asset
    }

    /// Total supply
    pub fn total_supply(&self) -> u64 {
        self.total_supply
    }

    /// Balance of an account
    pub fn balance_of(&self, account: &Pubkey) -> u64 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Stored allowance of `spender` over `owner`'s balance
    pub fn allowance(&self, owner: &Pubkey, spender: &Pubkey) -> u64 {
        self.allowances.get(&(*owner, *spender)).copied().unwrap_or(0)
    }

    /// Sum of every balance; equals `total_supply` in every reachable state
    pub fn sum_of_balances(&self) -> u128 {
        self.balances.values().map(|b| *b as u128).sum()
    }

    /// Number of accounts holding a non-zero balance
    pub fn holder_count(&self) -> usize {
        self.balances.len()
    }

    /// Move `amount` from `from` to `to`
    pub fn transfer(
        &mut self,
        journal: &mut Journal,
        from: Pubkey,
        to: Pubkey,
        amount: u64,
    ) -> Result<(), LedgerError> {
        self.check_transfer(&from, &to, amount)?;
        self.move_balance(journal, from, to, amount)?;

        journal.emit(
            self.asset,
            LedgerEvent::Transfer {
                from,
                to,
                value: amount,
            },
        );
        Ok(())
    }

    /// Replace the allowance of `spender` over `owner`'s balance
    pub fn approve(
        &mut self,
        journal: &mut Journal,
        owner: Pubkey,
        spender: Pubkey,
        amount: u64,
    ) -> Result<(), LedgerError> {
        if spender == NULL_ADDRESS {
            return Err(LedgerError::InvalidSpender);
        }

        self.write_allowance(journal, owner, spender, amount);
        Ok(())
    }

    /// Add `delta` to the allowance; returns the new value
    pub fn increase_allowance(
        &mut self,
        journal: &mut Journal,
        owner: Pubkey,
        spender: Pubkey,
        delta: u64,
    ) -> Result<u64, LedgerError> {
        if spender == NULL_ADDRESS {
            return Err(LedgerError::InvalidSpender);
        }

        let current = self.allowance(&owner, &spender);
        let updated = current
            .checked_add(delta)
            .ok_or(LedgerError::AllowanceOverflow { current, delta })?;

        self.write_allowance(journal, owner, spender, updated);
        Ok(updated)
    }

    /// Subtract `delta` from the allowance; returns the new value
    pub fn decrease_allowance(
        &mut self,
        journal: &mut Journal,
        owner: Pubkey,
        spender: Pubkey,
        delta: u64,
    ) -> Result<u64, LedgerError> {
        if spender == NULL_ADDRESS {
            return Err(LedgerError::InvalidSpender);
        }

        let current = self.allowance(&owner, &spender);
        let updated = current
            .checked_sub(delta)
            .ok_or(LedgerError::AllowanceUnderflow { current, delta })?;

        self.write_allowance(journal, owner, spender, updated);
        Ok(updated)
    }

    /// Move `amount` out of `owner`'s balance on behalf of `spender`,
    /// consuming the stored allowance
    pub fn transfer_from(
        &mut self,
        journal: &mut Journal,
        spender: Pubkey,
        owner: Pubkey,
        to: Pubkey,
        amount: u64,
    ) -> Result<(), LedgerError> {
        let available = self.allowance(&owner, &spender);
        if available < amount {
            return Err(LedgerError::InsufficientAllowance {
                available,
                requested: amount,
            });
        }

        self.transfer(journal, owner, to, amount)?;
        self.write_allowance(journal, owner, spender, available - amount);
        Ok(())
    }

    fn check_transfer(&self, from: &Pubkey, to: &Pubkey, amount: u64) -> Result<(), LedgerError> {
        if *to == NULL_ADDRESS {
            return Err(LedgerError::InvalidRecipient);
        }

        let available = self.balance_of(from);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                available,
                requested: amount,
            });
        }
        Ok(())
    }

    fn move_balance(
        &mut self,
        journal: &mut Journal,
        from: Pubkey,
        to: Pubkey,
        amount: u64,
    ) -> Result<(), LedgerError> {
        // Debit first so that a self-transfer reads the debited balance
        let debited = self.balance_of(&from) - amount;
        self.write_balance(journal, from, debited);

        let credited = self
            .balance_of(&to)
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow(to))?;
        self.write_balance(journal, to, credited);

        debug!("{}: moved {} from {} to {}", self.asset, amount, from, to);
        Ok(())
    }

    fn write_balance(&mut self, journal: &mut Journal, account: Pubkey, value: u64) {
        let previous = self.balance_of(&account);
        journal.record(JournalEntry::Balance {
            asset: self.asset,
            account,
            previous,
        });
        journal.record_supply_delta(self.asset, value as i128 - previous as i128);
        self.restore_balance(account, value);
    }

    fn write_allowance(&mut self, journal: &mut Journal, owner: Pubkey, spender: Pubkey, value: u64) {
        let previous = self.allowance(&owner, &spender);
        journal.record(JournalEntry::Allowance {
            asset: self.asset,
            owner,
            spender,
            previous,
        });
        self.restore_allowance(owner, spender, value);

        journal.emit(
            self.asset,
            LedgerEvent::Approval {
                owner,
                spender,
                value,
            },
        );
    }

    pub(crate) fn restore_balance(&mut self, account: Pubkey, value: u64) {
        if value == 0 {
            self.balances.remove(&account);
        } else {
            self.balances.insert(account, value);
        }
    }

    pub(crate) fn restore_allowance(&mut self, owner: Pubkey, spender: Pubkey, value: u64) {
        if value == 0 {
            self.allowances.remove(&(owner, spender));
        } else {
            self.allowances.insert((owner, spender), value);
        }
    }
}
