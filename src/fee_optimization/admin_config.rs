// src/fee_optimization/admin_config.rs
//! Owner-gated configuration of the relay gateway
//!
//! Holds the fee parameters, the set of operations that may only be invoked
//! directly, and the sponsor deposit pool. Ownership is fixed at
//! construction.

use std::collections::{HashMap, HashSet};

use log::{info, warn};
use serde::Deserialize;
use solana_program::pubkey::Pubkey;

use crate::constants::{NULL_ADDRESS, PRICE_SCALE_BASELINE};
use crate::error_handling::{AdminError, ConfigError};
use crate::token::OperationId;
use crate::utils::pubkey_serde;

fn default_price_scale() -> u64 {
    PRICE_SCALE_BASELINE
}

fn default_restricted_operations() -> Vec<OperationId> {
    vec![OperationId::SetOperator]
}

/// Construction parameters of the gateway
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Address allowed to change the configuration
    #[serde(with = "pubkey_serde")]
    pub owner: Pubkey,

    /// Receives every relay fee; fixed for the gateway's lifetime
    #[serde(with = "pubkey_serde")]
    pub fee_collector: Pubkey,

    /// Asset fees are paid in
    #[serde(with = "pubkey_serde")]
    pub gas_token: Pubkey,

    /// Fee multiplier, 1000 = 100%
    #[serde(default = "default_price_scale")]
    pub price_scale: u64,

    /// Operations that may never be relayed
    #[serde(default = "default_restricted_operations")]
    pub restricted_operations: Vec<OperationId>,
}

impl GatewayConfig {
    /// Configuration with the baseline scale and default restricted set
    pub fn new(owner: Pubkey, fee_collector: Pubkey, gas_token: Pubkey) -> Self {
        Self {
            owner,
            fee_collector,
            gas_token,
            price_scale: default_price_scale(),
            restricted_operations: default_restricted_operations(),
        }
    }

    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GatewayConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check required addresses
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.owner == NULL_ADDRESS {
            return Err(ConfigError::NullAddress("owner"));
        }
        if self.fee_collector == NULL_ADDRESS {
            return Err(ConfigError::NullAddress("fee_collector"));
        }
        Ok(())
    }
}

/// Pool of value funding relay infrastructure
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SponsorDeposits {
    /// Value currently in the pool
    available: u64,

    /// Value withdrawn so far, by destination
    withdrawn: HashMap<Pubkey, u64>,
}

impl SponsorDeposits {
    /// Value in the pool
    pub fn available(&self) -> u64 {
        self.available
    }

    /// Total withdrawn to `to`
    pub fn withdrawn_to(&self, to: &Pubkey) -> u64 {
        self.withdrawn.get(to).copied().unwrap_or(0)
    }

    fn deposit(&mut self, amount: u64) -> Result<u64, AdminError> {
        self.available = self
            .available
            .checked_add(amount)
            .ok_or(AdminError::DepositOverflow {
                available: self.available,
                amount,
            })?;
        Ok(self.available)
    }

    fn withdraw(&mut self, amount: u64, to: Pubkey) -> Result<u64, AdminError> {
        if amount > self.available {
            return Err(AdminError::InsufficientDeposit {
                available: self.available,
                requested: amount,
            });
        }

        self.available -= amount;
        let total = self.withdrawn.entry(to).or_insert(0);
        *total = total.saturating_add(amount);
        Ok(self.available)
    }
}

/// Fee and access configuration of a relay gateway
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// Fixed owner
    owner: Pubkey,

    /// Fixed fee recipient
    fee_collector: Pubkey,

    /// Current fee asset
    gas_token: Pubkey,

    /// Current fee multiplier
    price_scale: u64,

    /// Operations barred from the relay path
    restricted: HashSet<OperationId>,

    /// Sponsor deposit pool
    deposits: SponsorDeposits,
}

impl AdminConfig {
    /// Build from a validated configuration
    pub fn new(config: GatewayConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            owner: config.owner,
            fee_collector: config.fee_collector,
            gas_token: config.gas_token,
            price_scale: config.price_scale,
            restricted: config.restricted_operations.into_iter().collect(),
            deposits: SponsorDeposits::default(),
        })
    }

    /// Owner
    pub fn owner(&self) -> &Pubkey {
        &self.owner
    }

    /// Fee recipient
    pub fn fee_collector(&self) -> &Pubkey {
        &self.fee_collector
    }

    /// Fee asset
    pub fn gas_token(&self) -> &Pubkey {
        &self.gas_token
    }

    /// Fee multiplier, 1000 = 100%
    pub fn price_scale(&self) -> u64 {
        self.price_scale
    }

    /// Whether `operation` is barred from the relay path
    pub fn is_restricted(&self, operation: OperationId) -> bool {
        self.restricted.contains(&operation)
    }

    /// Sponsor deposit pool
    pub fn deposits(&self) -> &SponsorDeposits {
        &self.deposits
    }

    /// Value in the sponsor pool
    pub fn deposit_balance(&self) -> u64 {
        self.deposits.available()
    }

    /// Total withdrawn from the pool to `to`
    pub fn withdrawn_to(&self, to: &Pubkey) -> u64 {
        self.deposits.withdrawn_to(to)
    }

    /// Replace the fee asset
    pub fn set_gas_token(&mut self, caller: &Pubkey, gas_token: Pubkey) -> Result<(), AdminError> {
        self.ensure_owner(caller)?;

        info!("Gas token changed from {} to {}", self.gas_token, gas_token);
        self.gas_token = gas_token;
        Ok(())
    }

    /// Replace the fee multiplier
    pub fn set_gas_price(&mut self, caller: &Pubkey, price_scale: u64) -> Result<(), AdminError> {
        self.ensure_owner(caller)?;

        info!("Gas price scale changed from {} to {}", self.price_scale, price_scale);
        self.price_scale = price_scale;
        Ok(())
    }

    /// Bar or allow relaying of `operation`
    pub fn set_restricted_operation(
        &mut self,
        caller: &Pubkey,
        operation: OperationId,
        restricted: bool,
    ) -> Result<(), AdminError> {
        self.ensure_owner(caller)?;

        if restricted {
            self.restricted.insert(operation);
        } else {
            self.restricted.remove(&operation);
        }
        info!("Operation {:?} restricted={}", operation, restricted);
        Ok(())
    }

    /// Add value to the sponsor pool. Anyone may fund it.
    pub fn deposit(&mut self, from: &Pubkey, amount: u64) -> Result<u64, AdminError> {
        let available = self.deposits.deposit(amount)?;
        info!("{} deposited {}, pool now {}", from, amount, available);
        Ok(available)
    }

    /// Move `amount` out of the sponsor pool to `to`
    pub fn withdraw_deposits(
        &mut self,
        caller: &Pubkey,
        amount: u64,
        to: Pubkey,
    ) -> Result<u64, AdminError> {
        self.ensure_owner(caller)?;

        let available = self.deposits.withdraw(amount, to)?;
        info!("Withdrew {} deposits to {}, pool now {}", amount, to, available);
        Ok(available)
    }

    fn ensure_owner(&self, caller: &Pubkey) -> Result<(), AdminError> {
        if *caller != self.owner {
            warn!("Rejected admin call from {}", caller);
            return Err(AdminError::Unauthorized(*caller));
        }
        Ok(())
    }
}
