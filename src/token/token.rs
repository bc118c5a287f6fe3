// src/token/token.rs
//! Token: a ledger with its operator whitelist and descriptive details
//!
//! This is where the whitelist overlay lives. Every allowance read or write
//! branches on operator membership first; ordinary spenders fall through to
//! the ledger unchanged, operators never reach the allowance table.

use log::debug;
use serde::{Deserialize, Serialize};
use solana_program::pubkey::Pubkey;

use crate::constants::{DEFAULT_DECIMALS, UNLIMITED_ALLOWANCE};
use crate::error_handling::LedgerError;
use crate::ledger::events::LedgerEvent;
use crate::ledger::journal::Journal;
use crate::ledger::ledger::Ledger;
use crate::token::calls::{CallOutput, LedgerCall};
use crate::token::operator_whitelist::OperatorWhitelist;

fn default_decimals() -> u8 {
    DEFAULT_DECIMALS
}

/// Descriptive token metadata
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TokenDetails {
    /// Token name
    pub name: String,

    /// Token symbol
    pub symbol: String,

    /// Decimal places
    #[serde(default = "default_decimals")]
    pub decimals: u8,
}

impl TokenDetails {
    /// Details with the default number of decimals
    pub fn new(name: &str, symbol: &str) -> Self {
        Self {
            name: name.to_string(),
            symbol: symbol.to_string(),
            decimals: DEFAULT_DECIMALS,
        }
    }
}

/// A fungible asset
#[derive(Debug, Clone)]
pub struct Token {
    /// Descriptive metadata
    details: TokenDetails,

    /// Balances and allowances
    ledger: Ledger,

    /// Operators with unlimited allowance
    operators: OperatorWhitelist,

    /// Committed event log
    events: Vec<LedgerEvent>,
}

impl Token {
    /// Create a token whose whole supply is held by `owner`
    pub fn new(
        address: Pubkey,
        details: TokenDetails,
        owner: Pubkey,
        initial_supply: u64,
    ) -> Result<Self, LedgerError> {
        let (ledger, genesis) = Ledger::new(address, owner, initial_supply)?;

        Ok(Self {
            details,
            ledger,
            operators: OperatorWhitelist::new(address, owner),
            events: vec![genesis],
        })
    }

    /// Token address
    pub fn address(&self) -> &Pubkey {
        self.ledger.asset()
    }

    /// Token owner
    pub fn owner(&self) -> &Pubkey {
        self.operators.owner()
    }

    /// Descriptive metadata
    pub fn details(&self) -> &TokenDetails {
        &self.details
    }

    /// Underlying ledger
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Operator whitelist
    pub fn operators(&self) -> &OperatorWhitelist {
        &self.operators
    }

    /// Committed events, oldest first
    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    /// Total supply
    pub fn total_supply(&self) -> u64 {
        self.ledger.total_supply()
    }

    /// Balance of an account
    pub fn balance_of(&self, account: &Pubkey) -> u64 {
        self.ledger.balance_of(account)
    }

    /// Whether `account` is an operator
    pub fn is_operator(&self, account: &Pubkey) -> bool {
        self.operators.is_operator(account)
    }

    /// Effective allowance: unlimited for operators, stored value otherwise
    pub fn allowance(&self, owner: &Pubkey, spender: &Pubkey) -> u64 {
        if self.operators.is_operator(spender) {
            UNLIMITED_ALLOWANCE
        } else {
            self.ledger.allowance(owner, spender)
        }
    }

    /// Move tokens from `caller` to `to`
    pub fn transfer(
        &mut self,
        journal: &mut Journal,
        caller: Pubkey,
        to: Pubkey,
        amount: u64,
    ) -> Result<(), LedgerError> {
        self.ledger.transfer(journal, caller, to, amount)
    }

    /// Set `caller`'s allowance for `spender`; no-op for operators
    pub fn approve(
        &mut self,
        journal: &mut Journal,
        caller: Pubkey,
        spender: Pubkey,
        amount: u64,
    ) -> Result<(), LedgerError> {
        if self.operators.is_operator(&spender) {
            debug!("{}: ignoring approve for operator {}", self.address(), spender);
            return Ok(());
        }
        self.ledger.approve(journal, caller, spender, amount)
    }

    /// Raise `caller`'s allowance for `spender`; no-op for operators
    pub fn increase_allowance(
        &mut self,
        journal: &mut Journal,
        caller: Pubkey,
        spender: Pubkey,
        delta: u64,
    ) -> Result<u64, LedgerError> {
        if self.operators.is_operator(&spender) {
            return Ok(UNLIMITED_ALLOWANCE);
        }
        self.ledger.increase_allowance(journal, caller, spender, delta)
    }

    /// Lower `caller`'s allowance for `spender`; no-op for operators
    pub fn decrease_allowance(
        &mut self,
        journal: &mut Journal,
        caller: Pubkey,
        spender: Pubkey,
        delta: u64,
    ) -> Result<u64, LedgerError> {
        if self.operators.is_operator(&spender) {
            return Ok(UNLIMITED_ALLOWANCE);
        }
        self.ledger.decrease_allowance(journal, caller, spender, delta)
    }

    /// Move tokens out of `owner`'s balance with `caller` as spender.
    /// Operators bypass the allowance table entirely.
    pub fn transfer_from(
        &mut self,
        journal: &mut Journal,
        caller: Pubkey,
        owner: Pubkey,
        to: Pubkey,
        amount: u64,
    ) -> Result<(), LedgerError> {
        if self.operators.is_operator(&caller) {
            return self.ledger.transfer(journal, owner, to, amount);
        }
        self.ledger.transfer_from(journal, caller, owner, to, amount)
    }

    /// Add or remove an operator
    pub fn set_operator(
        &mut self,
        journal: &mut Journal,
        caller: Pubkey,
        operator: Pubkey,
        enabled: bool,
    ) -> Result<bool, LedgerError> {
        self.operators.set_operator(journal, &caller, operator, enabled)
    }

    /// Run `call` with `caller` as principal
    pub fn execute(
        &mut self,
        journal: &mut Journal,
        caller: Pubkey,
        call: &LedgerCall,
    ) -> Result<CallOutput, LedgerError> {
        let output = match call {
            LedgerCall::TotalSupply => CallOutput::Amount(self.total_supply()),
            LedgerCall::BalanceOf { account } => CallOutput::Amount(self.balance_of(account)),
            LedgerCall::Allowance { owner, spender } => {
                CallOutput::Amount(self.allowance(owner, spender))
            }
            LedgerCall::IsOperator { account } => CallOutput::Flag(self.is_operator(account)),
            LedgerCall::Name => CallOutput::Text(self.details.name.clone()),
            LedgerCall::Symbol => CallOutput::Text(self.details.symbol.clone()),
            LedgerCall::Decimals => CallOutput::Decimals(self.details.decimals),
            LedgerCall::Transfer { to, amount } => {
                self.transfer(journal, caller, *to, *amount)?;
                CallOutput::Completed
            }
            LedgerCall::Approve { spender, amount } => {
                self.approve(journal, caller, *spender, *amount)?;
                CallOutput::Completed
            }
            LedgerCall::IncreaseAllowance { spender, delta } => {
                CallOutput::Amount(self.increase_allowance(journal, caller, *spender, *delta)?)
            }
            LedgerCall::DecreaseAllowance { spender, delta } => {
                CallOutput::Amount(self.decrease_allowance(journal, caller, *spender, *delta)?)
            }
            LedgerCall::TransferFrom { owner, to, amount } => {
                self.transfer_from(journal, caller, *owner, *to, *amount)?;
                CallOutput::Completed
            }
            LedgerCall::SetOperator { operator, enabled } => {
                CallOutput::Flag(self.set_operator(journal, caller, *operator, *enabled)?)
            }
        };

        Ok(output)
    }

    pub(crate) fn ledger_mut(&mut self) -> &mut Ledger {
        &mut self.ledger
    }

    pub(crate) fn operators_mut(&mut self) -> &mut OperatorWhitelist {
        &mut self.operators
    }

    pub(crate) fn publish(&mut self, event: LedgerEvent) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::NULL_ADDRESS;

    struct Fixture {
        token: Token,
        holder: Pubkey,
        operator: Pubkey,
        recipient: Pubkey,
        journal: Journal,
    }

    fn setup() -> Fixture {
        let holder = Pubkey::new_unique();
        let operator = Pubkey::new_unique();
        let mut token = Token::new(
            Pubkey::new_unique(),
            TokenDetails::new("ERC20WithOperators", "E2O"),
            holder,
            100,
        )
        .unwrap();
        let mut journal = Journal::new();
        token.set_operator(&mut journal, holder, operator, true).unwrap();

        Fixture {
            token,
            holder,
            operator,
            recipient: Pubkey::new_unique(),
            journal: Journal::new(),
        }
    }

    #[test]
    fn test_operator_allowance_is_unlimited() {
        let mut f = setup();

        assert_eq!(f.token.allowance(&f.holder, &f.operator), u64::MAX);

        f.token.approve(&mut f.journal, f.holder, f.operator, 1).unwrap();
        f.token.increase_allowance(&mut f.journal, f.holder, f.operator, 101).unwrap();
        f.token.decrease_allowance(&mut f.journal, f.holder, f.operator, 500).unwrap();

        assert_eq!(f.token.allowance(&f.holder, &f.operator), u64::MAX);
        assert_eq!(f.token.ledger().allowance(&f.holder, &f.operator), 0);
        assert!(f.journal.is_empty());
    }

    #[test]
    fn test_operator_transfer_from_without_allowance() {
        let mut f = setup();

        f.token
            .transfer_from(&mut f.journal, f.operator, f.holder, f.recipient, 100)
            .unwrap();

        assert_eq!(f.token.balance_of(&f.holder), 0);
        assert_eq!(f.token.balance_of(&f.recipient), 100);
        assert!(f
            .journal
            .staged_events()
            .iter()
            .all(|(_, event)| !event.is_approval_for(&f.holder, &f.operator)));
    }

    #[test]
    fn test_operator_transfer_from_still_validates() {
        let mut f = setup();

        assert_eq!(
            f.token.transfer_from(&mut f.journal, f.operator, f.holder, f.recipient, 101),
            Err(LedgerError::InsufficientBalance { available: 100, requested: 101 })
        );
        assert_eq!(
            f.token.transfer_from(&mut f.journal, f.operator, f.holder, NULL_ADDRESS, 1),
            Err(LedgerError::InvalidRecipient)
        );
    }

    #[test]
    fn test_execute_reads() {
        let mut f = setup();

        assert_eq!(
            f.token.execute(&mut f.journal, f.recipient, &LedgerCall::Symbol).unwrap(),
            CallOutput::Text("E2O".to_string())
        );
        assert_eq!(
            f.token.execute(&mut f.journal, f.recipient, &LedgerCall::Decimals).unwrap(),
            CallOutput::Decimals(18)
        );
        assert_eq!(
            f.token
                .execute(&mut f.journal, f.recipient, &LedgerCall::IsOperator { account: f.operator })
                .unwrap(),
            CallOutput::Flag(true)
        );
        assert!(f.journal.is_empty());
    }
}
