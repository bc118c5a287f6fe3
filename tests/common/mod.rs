// tests/common/mod.rs
//! Shared fixture for integration tests

#![allow(dead_code)]

use fee_relay_ledger::{
    init_logging, FeeRelaySystem, LedgerCall, OperationId, SystemConfig, TokenDetails,
};
use solana_program::pubkey::Pubkey;

/// Primary token supply minted to the owner
pub const PRIMARY_SUPPLY: u64 = 100;

/// Fee token supply minted to the owner
pub const FEE_SUPPLY: u64 = 1_000_000;

/// A deployed system and the addresses around it
pub struct Fixture {
    pub system: FeeRelaySystem,
    pub owner: Pubkey,
    pub payout: Pubkey,
}

impl Fixture {
    /// Deploy a system owned by a fresh address
    pub fn new() -> Self {
        init_logging();

        let owner = Pubkey::new_unique();
        let payout = Pubkey::new_unique();
        let config = SystemConfig {
            owner,
            payout,
            primary_token: TokenDetails::new("ERC20Base", "E2B"),
            primary_supply: PRIMARY_SUPPLY,
            fee_token: TokenDetails::new("ERC20Fee", "FEE"),
            fee_supply: FEE_SUPPLY,
            price_scale: 1000,
            restricted_operations: vec![OperationId::SetOperator],
        };

        Self {
            system: FeeRelaySystem::deploy(config).expect("deploy failed"),
            owner,
            payout,
        }
    }

    pub fn primary(&self) -> Pubkey {
        *self.system.primary_asset()
    }

    pub fn fee(&self) -> Pubkey {
        *self.system.fee_asset()
    }

    /// Primary token balance
    pub fn balance(&self, account: &Pubkey) -> u64 {
        self.system.balance_of(self.system.primary_asset(), account)
    }

    /// Fee token balance
    pub fn fee_balance(&self, account: &Pubkey) -> u64 {
        self.system.balance_of(self.system.fee_asset(), account)
    }

    /// Give `account` primary tokens from the owner
    pub fn fund(&mut self, account: Pubkey, amount: u64) {
        let owner = self.owner;
        self.system
            .direct(&owner, &LedgerCall::Transfer { to: account, amount })
            .expect("funding transfer failed");
    }

    /// Give `account` fee tokens from the owner
    pub fn fund_fee(&mut self, account: Pubkey, amount: u64) {
        let owner = self.owner;
        let fee = self.fee();
        self.system
            .direct_on(&fee, &owner, &LedgerCall::Transfer { to: account, amount })
            .expect("fee funding transfer failed");
    }

    /// Sum of balances equals total supply on every token
    pub fn assert_supply_conserved(&self) {
        let registry = self.system.registry();
        for asset in registry.assets() {
            let token = registry.token(asset).expect("registered token");
            assert_eq!(
                token.ledger().sum_of_balances(),
                token.total_supply() as u128,
                "Supply not conserved for {}",
                asset
            );
        }
    }
}
