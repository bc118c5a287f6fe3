// src/lib.rs
//! Fee-Relay Ledger - Integration Module
//!
//! This module integrates all components of the fee-relay ledger:
//! - Fungible token ledgers with an undo-log transaction model
//! - Operator whitelist overlay granting unlimited allowance
//! - Relay gateway charging fees in a configurable asset
//! - Owner-gated admin configuration and sponsor deposits

pub mod constants;
pub mod error_handling;
pub mod fee_optimization;
pub mod ledger;
pub mod token;
pub mod utils;

pub use error_handling::{
    AdminError, ConfigError, FeeRelayError, LedgerError, RejectionReason, RelayError,
};
pub use fee_optimization::{
    scaled_fee, Acceptance, AdminConfig, CostSchedule, FixedCost, GatewayConfig, RelayGateway,
    RelayReceipt, RelayRequest, RelayStage, RelayStats, ResourceMeter,
};
pub use ledger::{Ledger, LedgerEvent, LedgerRegistry, StateTransaction};
pub use token::{CallOutput, LedgerCall, OperationId, OperatorWhitelist, Token, TokenDetails};

use log::info;
use serde::Deserialize;
use solana_program::pubkey::Pubkey;

use crate::constants::{NULL_ADDRESS, PRICE_SCALE_BASELINE};
use crate::utils::pubkey_serde;

/// Install an `env_logger` logger honouring `RUST_LOG`.
/// Safe to call more than once.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(cfg!(test)).try_init();
}

fn default_price_scale() -> u64 {
    PRICE_SCALE_BASELINE
}

fn default_restricted_operations() -> Vec<OperationId> {
    vec![OperationId::SetOperator]
}

/// Fee-relay system configuration
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SystemConfig {
    /// Owner of both tokens and of the gateway
    #[serde(with = "pubkey_serde")]
    pub owner: Pubkey,

    /// Wallet receiving relay fees
    #[serde(with = "pubkey_serde")]
    pub payout: Pubkey,

    /// Primary token details
    pub primary_token: TokenDetails,

    /// Primary token supply, minted to the owner
    pub primary_supply: u64,

    /// Fee token details
    pub fee_token: TokenDetails,

    /// Fee token supply, minted to the owner
    pub fee_supply: u64,

    /// Initial fee multiplier, 1000 = 100%
    #[serde(default = "default_price_scale")]
    pub price_scale: u64,

    /// Operations that may never be relayed
    #[serde(default = "default_restricted_operations")]
    pub restricted_operations: Vec<OperationId>,
}

impl SystemConfig {
    /// Parse a JSON configuration
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    fn gateway_config(&self, gas_token: Pubkey) -> GatewayConfig {
        GatewayConfig {
            owner: self.owner,
            fee_collector: self.payout,
            gas_token,
            price_scale: self.price_scale,
            restricted_operations: self.restricted_operations.clone(),
        }
    }
}

/// Fee-relay system: a primary token, a fee token and a gateway in front of
/// the primary token
#[derive(Debug)]
pub struct FeeRelaySystem {
    /// Token registry
    registry: LedgerRegistry,

    /// Relay gateway
    gateway: RelayGateway,

    /// Fee token deployed with the system
    fee_asset: Pubkey,
}

impl FeeRelaySystem {
    /// Deploy the fee token, the primary token and the gateway
    pub fn deploy(config: SystemConfig) -> Result<Self, FeeRelayError> {
        config.gateway_config(NULL_ADDRESS).validate()?;

        let mut registry = LedgerRegistry::new();
        let fee_asset =
            registry.deploy(config.fee_token.clone(), config.owner, config.fee_supply)?;
        let primary_asset =
            registry.deploy(config.primary_token.clone(), config.owner, config.primary_supply)?;
        let gateway = RelayGateway::new(primary_asset, config.gateway_config(fee_asset))?;

        info!(
            "Deployed fee-relay system: primary {} fee {} owner {}",
            primary_asset, fee_asset, config.owner
        );

        Ok(Self {
            registry,
            gateway,
            fee_asset,
        })
    }

    /// Token registry
    pub fn registry(&self) -> &LedgerRegistry {
        &self.registry
    }

    /// Relay gateway
    pub fn gateway(&self) -> &RelayGateway {
        &self.gateway
    }

    /// Primary token address
    pub fn primary_asset(&self) -> &Pubkey {
        self.gateway.primary_asset()
    }

    /// Fee token deployed with the system
    pub fn fee_asset(&self) -> &Pubkey {
        &self.fee_asset
    }

    /// Primary token
    pub fn primary_token(&self) -> Result<&Token, LedgerError> {
        self.registry.require(self.gateway.primary_asset())
    }

    /// Balance of `account` in `asset`
    pub fn balance_of(&self, asset: &Pubkey, account: &Pubkey) -> u64 {
        self.registry.balance_of(asset, account)
    }

    /// Call the primary token directly as `caller`
    pub fn direct(&mut self, caller: &Pubkey, call: &LedgerCall) -> Result<CallOutput, LedgerError> {
        let asset = *self.gateway.primary_asset();
        self.registry.execute(&asset, caller, call)
    }

    /// Call any registered token directly as `caller`
    pub fn direct_on(
        &mut self,
        asset: &Pubkey,
        caller: &Pubkey,
        call: &LedgerCall,
    ) -> Result<CallOutput, LedgerError> {
        self.registry.execute(asset, caller, call)
    }

    /// Acceptance decision for a relayed call
    pub fn check_acceptance(
        &self,
        sender: &Pubkey,
        call: &LedgerCall,
        estimated_cost: u64,
    ) -> Result<Acceptance, RejectionReason> {
        self.gateway.check_acceptance(&self.registry, sender, call, estimated_cost)
    }

    /// Relay a call through the gateway
    pub fn relay(
        &mut self,
        request: &RelayRequest,
        meter: &dyn ResourceMeter,
    ) -> Result<RelayReceipt, RelayError> {
        self.gateway.relay(&mut self.registry, request, meter)
    }

    /// Replace the fee asset
    pub fn set_gas_token(&mut self, caller: &Pubkey, gas_token: Pubkey) -> Result<(), AdminError> {
        self.gateway.admin_mut().set_gas_token(caller, gas_token)
    }

    /// Replace the fee multiplier
    pub fn set_gas_price(&mut self, caller: &Pubkey, price_scale: u64) -> Result<(), AdminError> {
        self.gateway.admin_mut().set_gas_price(caller, price_scale)
    }

    /// Bar or allow relaying of `operation`
    pub fn set_restricted_operation(
        &mut self,
        caller: &Pubkey,
        operation: OperationId,
        restricted: bool,
    ) -> Result<(), AdminError> {
        self.gateway
            .admin_mut()
            .set_restricted_operation(caller, operation, restricted)
    }

    /// Fund the sponsor pool
    pub fn deposit(&mut self, from: &Pubkey, amount: u64) -> Result<u64, AdminError> {
        self.gateway.admin_mut().deposit(from, amount)
    }

    /// Withdraw from the sponsor pool
    pub fn withdraw_deposits(
        &mut self,
        caller: &Pubkey,
        amount: u64,
        to: Pubkey,
    ) -> Result<u64, AdminError> {
        self.gateway.admin_mut().withdraw_deposits(caller, amount, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(owner: Pubkey, payout: Pubkey) -> SystemConfig {
        SystemConfig {
            owner,
            payout,
            primary_token: TokenDetails::new("ERC20Base", "E2B"),
            primary_supply: 1_000,
            fee_token: TokenDetails::new("ERC20Fee", "FEE"),
            fee_supply: 1_000_000,
            price_scale: PRICE_SCALE_BASELINE,
            restricted_operations: vec![OperationId::SetOperator],
        }
    }

    #[test]
    fn test_fee_relay_system_deploy() {
        init_logging();
        let owner = Pubkey::new_unique();
        let payout = Pubkey::new_unique();

        let system = FeeRelaySystem::deploy(config(owner, payout)).unwrap();

        assert_eq!(system.balance_of(system.primary_asset(), &owner), 1_000);
        assert_eq!(system.balance_of(system.fee_asset(), &owner), 1_000_000);
        assert_eq!(system.gateway().admin().gas_token(), system.fee_asset());
        assert_eq!(system.gateway().admin().fee_collector(), &payout);
        assert_eq!(system.primary_token().unwrap().details().symbol, "E2B");
    }

    #[test]
    fn test_null_payout_rejected() {
        let result = FeeRelaySystem::deploy(config(Pubkey::new_unique(), NULL_ADDRESS));

        assert!(matches!(
            result,
            Err(FeeRelayError::Config(ConfigError::NullAddress("fee_collector")))
        ));
    }

    #[test]
    fn test_system_config_from_json() {
        let owner = Pubkey::new_unique();
        let payout = Pubkey::new_unique();
        let json = format!(
            r#"{{
                "owner": "{}",
                "payout": "{}",
                "primary_token": {{"name": "ERC20Base", "symbol": "E2B"}},
                "primary_supply": 100,
                "fee_token": {{"name": "ERC20Fee", "symbol": "FEE", "decimals": 6}},
                "fee_supply": 500
            }}"#,
            owner, payout
        );

        let config = SystemConfig::from_json(&json).unwrap();
        assert_eq!(config.owner, owner);
        assert_eq!(config.primary_token.decimals, 18);
        assert_eq!(config.fee_token.decimals, 6);
        assert_eq!(config.price_scale, 1000);
        assert_eq!(config.restricted_operations, vec![OperationId::SetOperator]);
    }
}
