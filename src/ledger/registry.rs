// src/ledger/registry.rs
//! Registry of tokens and the transactions that mutate them
//!
//! All mutation goes through a `StateTransaction`. It stages writes in a
//! journal and either commits them, publishing staged events to each token's
//! log, or reverts them. A transaction dropped without `commit` is reverted.

use std::collections::HashMap;

use log::{debug, info, warn};
use sha2::{Digest, Sha256};
use solana_program::pubkey::Pubkey;

use crate::constants::ASSET_ADDRESS_SEED;
use crate::error_handling::LedgerError;
use crate::ledger::events::LedgerEvent;
use crate::ledger::journal::Journal;
use crate::token::{CallOutput, LedgerCall, Token, TokenDetails};

/// Tokens by address
#[derive(Debug, Default)]
pub struct LedgerRegistry {
    /// Registered tokens
    tokens: HashMap<Pubkey, Token>,

    /// Deployments so far, mixed into derived addresses
    deploy_nonce: u64,
}

impl LedgerRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Deploy a new token owned by `owner` holding the whole supply.
    /// Returns the derived token address.
    pub fn deploy(
        &mut self,
        details: TokenDetails,
        owner: Pubkey,
        initial_supply: u64,
    ) -> Result<Pubkey, LedgerError> {
        let address = derive_asset_address(&owner, &details.symbol, self.deploy_nonce);
        let token = Token::new(address, details, owner, initial_supply)?;
        self.register(token)?;
        self.deploy_nonce += 1;

        info!(
            "Deployed token {} at {} with supply {}",
            self.tokens[&address].details().symbol,
            address,
            initial_supply
        );
        Ok(address)
    }

    /// Register an already constructed token
    pub fn register(&mut self, token: Token) -> Result<(), LedgerError> {
        let address = *token.address();
        if self.tokens.contains_key(&address) {
            return Err(LedgerError::AssetExists(address));
        }
        self.tokens.insert(address, token);
        Ok(())
    }

    /// Look up a token
    pub fn token(&self, address: &Pubkey) -> Option<&Token> {
        self.tokens.get(address)
    }

    /// Look up a token, failing if it is not registered
    pub fn require(&self, address: &Pubkey) -> Result<&Token, LedgerError> {
        self.tokens.get(address).ok_or(LedgerError::UnknownAsset(*address))
    }

    /// Balance of `account` in `asset`; zero for unregistered assets
    pub fn balance_of(&self, asset: &Pubkey, account: &Pubkey) -> u64 {
        self.tokens.get(asset).map(|t| t.balance_of(account)).unwrap_or(0)
    }

    /// Registered token addresses
    pub fn assets(&self) -> impl Iterator<Item = &Pubkey> {
        self.tokens.keys()
    }

    /// Open a transaction
    pub fn begin(&mut self) -> StateTransaction<'_> {
        StateTransaction {
            registry: self,
            journal: Journal::new(),
            committed: false,
        }
    }

    /// Direct path: run `call` against `asset` as `caller` in its own
    /// transaction
    pub fn execute(
        &mut self,
        asset: &Pubkey,
        caller: &Pubkey,
        call: &LedgerCall,
    ) -> Result<CallOutput, LedgerError> {
        let mut tx = self.begin();
        let output = tx.execute(asset, caller, call)?;
        tx.commit()?;
        Ok(output)
    }

    pub(crate) fn token_mut(&mut self, address: &Pubkey) -> Option<&mut Token> {
        self.tokens.get_mut(address)
    }
}

/// Derive a token address from its owner, symbol and deployment nonce
pub fn derive_asset_address(owner: &Pubkey, symbol: &str, nonce: u64) -> Pubkey {
    let mut hasher = Sha256::new();
    hasher.update(ASSET_ADDRESS_SEED);
    hasher.update(owner.as_ref());
    hasher.update(symbol.as_bytes());
    hasher.update(nonce.to_le_bytes());
    Pubkey::new_from_array(hasher.finalize().into())
}

/// An all-or-nothing unit of work over the registry
pub struct StateTransaction<'a> {
    registry: &'a mut LedgerRegistry,
    journal: Journal,
    committed: bool,
}

impl<'a> StateTransaction<'a> {
    /// Read access to the registry, including staged writes
    pub fn registry(&self) -> &LedgerRegistry {
        &*self.registry
    }

    /// Events staged so far
    pub fn staged_events(&self) -> &[(Pubkey, LedgerEvent)] {
        self.journal.staged_events()
    }

    /// Run `call` against `asset` as `caller`
    pub fn execute(
        &mut self,
        asset: &Pubkey,
        caller: &Pubkey,
        call: &LedgerCall,
    ) -> Result<CallOutput, LedgerError> {
        let token = self
            .registry
            .tokens
            .get_mut(asset)
            .ok_or(LedgerError::UnknownAsset(*asset))?;
        token.execute(&mut self.journal, *caller, call)
    }

    /// Ledger transfer primitive on `asset`
    pub fn transfer(
        &mut self,
        asset: &Pubkey,
        from: &Pubkey,
        to: &Pubkey,
        amount: u64,
    ) -> Result<(), LedgerError> {
        let token = self
            .registry
            .tokens
            .get_mut(asset)
            .ok_or(LedgerError::UnknownAsset(*asset))?;
        token.transfer(&mut self.journal, *from, *to, amount)
    }

    /// Apply staged writes and publish staged events. Returns the events.
    pub fn commit(mut self) -> Result<Vec<(Pubkey, LedgerEvent)>, LedgerError> {
        if let Err(e) = self.journal.verify_supply() {
            warn!("Refusing to commit: {}", e);
            return Err(e);
        }

        self.committed = true;
        let events = std::mem::take(&mut self.journal).into_events();
        for (asset, event) in &events {
            if let Some(token) = self.registry.token_mut(asset) {
                token.publish(event.clone());
            }
        }

        debug!("Committed transaction with {} events", events.len());
        Ok(events)
    }

    /// Discard every staged write
    pub fn rollback(self) {
        // Reverted by Drop
    }
}

impl<'a> Drop for StateTransaction<'a> {
    fn drop(&mut self) {
        if !self.committed {
            let journal = std::mem::take(&mut self.journal);
            journal.revert(&mut *self.registry);
        }
    }
}
