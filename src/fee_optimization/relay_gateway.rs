// src/fee_optimization/relay_gateway.rs
//! Fee-charging relay gateway
//!
//! Accepts calls on behalf of a sender, runs them against the primary token
//! exactly as a direct call would, then charges the sender a fee in the
//! configured fee asset. Execution and fee charging share one
//! `StateTransaction`: if either fails, nothing the call did survives.

use borsh::{BorshDeserialize, BorshSerialize};
use log::{debug, info, warn};
use sha2::{Digest, Sha256};
use solana_program::pubkey::Pubkey;

use crate::error_handling::{ConfigError, LedgerError, RejectionReason, RelayError};
use crate::fee_optimization::admin_config::{AdminConfig, GatewayConfig};
use crate::fee_optimization::fees::scaled_fee;
use crate::fee_optimization::resource_meter::ResourceMeter;
use crate::ledger::{LedgerEvent, LedgerRegistry};
use crate::token::{CallOutput, LedgerCall};

/// A call submitted through the relay
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct RelayRequest {
    /// Authenticated principal the call runs as
    pub sender: Pubkey,

    /// Party that submitted the call on the sender's behalf
    pub relayer: Pubkey,

    /// The call itself
    pub call: LedgerCall,
}

impl RelayRequest {
    /// Create a new relay request
    pub fn new(sender: Pubkey, relayer: Pubkey, call: LedgerCall) -> Self {
        Self { sender, relayer, call }
    }

    /// Decode a borsh-encoded request
    pub fn decode(bytes: &[u8]) -> Result<Self, std::io::Error> {
        Self::try_from_slice(bytes)
    }

    /// Hex SHA-256 of the borsh encoding
    pub fn call_id(&self) -> String {
        let mut hasher = Sha256::new();
        // Writing into a Vec cannot fail
        if let Ok(bytes) = self.try_to_vec() {
            hasher.update(bytes);
        }
        hex::encode(hasher.finalize())
    }
}

/// Stage a relayed call passed through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayStage {
    Submitted,
    AcceptanceCheck,
    Rejected(RejectionReason),
    Accepted,
    Executed,
    FeeCharged,
    Committed,
    RolledBack,
}

/// Parameters captured when a call is accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Acceptance {
    /// Fee asset at acceptance time
    pub fee_asset: Pubkey,

    /// Price scale at acceptance time
    pub price_scale: u64,

    /// Fee the sender had to be able to cover
    pub estimated_fee: u64,
}

/// Outcome of a committed relayed call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayReceipt {
    /// Identity of the request
    pub call_id: String,

    /// Principal the call ran as
    pub sender: Pubkey,

    /// Result of the call
    pub output: CallOutput,

    /// Measured resource cost
    pub actual_cost: u64,

    /// Fee charged
    pub fee: u64,

    /// Asset the fee was charged in
    pub fee_asset: Pubkey,

    /// Scale the fee was computed with
    pub price_scale: u64,

    /// Stages the call passed through
    pub trace: Vec<RelayStage>,

    /// Events published by the commit, by asset
    pub events: Vec<(Pubkey, LedgerEvent)>,
}

/// Statistics for the relay gateway
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelayStats {
    /// Number of relayed calls committed
    pub committed: u64,

    /// Number of accepted calls rolled back
    pub rolled_back: u64,

    /// Total fees charged, saturating
    pub total_fees: u64,
}

/// Relay gateway in front of one primary token
#[derive(Debug, Clone)]
pub struct RelayGateway {
    /// Token every relayed call targets
    primary_asset: Pubkey,

    /// Fee and access configuration
    admin: AdminConfig,

    /// Statistics
    stats: RelayStats,
}

impl RelayGateway {
    /// Create a gateway for `primary_asset`
    pub fn new(primary_asset: Pubkey, config: GatewayConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            primary_asset,
            admin: AdminConfig::new(config)?,
            stats: RelayStats::default(),
        })
    }

    /// Token relayed calls run against
    pub fn primary_asset(&self) -> &Pubkey {
        &self.primary_asset
    }

    /// Fee and access configuration
    pub fn admin(&self) -> &AdminConfig {
        &self.admin
    }

    /// Mutable fee and access configuration; mutations are owner-checked
    pub fn admin_mut(&mut self) -> &mut AdminConfig {
        &mut self.admin
    }

    /// Statistics
    pub fn stats(&self) -> &RelayStats {
        &self.stats
    }

    /// Decide whether `sender` may relay `call` given a cost estimate.
    /// Changes nothing.
    pub fn check_acceptance(
        &self,
        registry: &LedgerRegistry,
        sender: &Pubkey,
        call: &LedgerCall,
        estimated_cost: u64,
    ) -> Result<Acceptance, RejectionReason> {
        if self.admin.is_restricted(call.operation()) {
            return Err(RejectionReason::RestrictedMethod);
        }

        let fee_asset = *self.admin.gas_token();
        let price_scale = self.admin.price_scale();
        let estimated_fee = scaled_fee(estimated_cost, price_scale);
        if registry.balance_of(&fee_asset, sender) < estimated_fee {
            return Err(RejectionReason::InsufficientFeeBalance);
        }

        Ok(Acceptance {
            fee_asset,
            price_scale,
            estimated_fee,
        })
    }

    /// Run a relayed call and charge its fee, all or nothing
    pub fn relay(
        &mut self,
        registry: &mut LedgerRegistry,
        request: &RelayRequest,
        meter: &dyn ResourceMeter,
    ) -> Result<RelayReceipt, RelayError> {
        let call_id = request.call_id();
        let sender = request.sender;
        let mut trace = vec![RelayStage::Submitted, RelayStage::AcceptanceCheck];
        debug!("Relay {} submitted by {} for {}", call_id, request.relayer, sender);

        let estimate = meter.estimate(&sender, &request.call);
        let acceptance = match self.check_acceptance(registry, &sender, &request.call, estimate) {
            Ok(acceptance) => acceptance,
            Err(reason) => {
                warn!("Relay {} rejected: {}", call_id, reason);
                return Err(RelayError::Rejected(reason));
            }
        };
        trace.push(RelayStage::Accepted);

        let mut tx = registry.begin();

        let output = match tx.execute(&self.primary_asset, &sender, &request.call) {
            Ok(output) => output,
            Err(e) => {
                tx.rollback();
                self.record_rollback(&call_id, &e);
                return Err(RelayError::Execution(e));
            }
        };
        trace.push(RelayStage::Executed);
        debug!("Relay {} executed: {:?}", call_id, output);

        let actual_cost = meter.measure(&sender, &request.call, &output);
        let fee = scaled_fee(actual_cost, acceptance.price_scale);
        let fee_collector = *self.admin.fee_collector();
        if let Err(e) = tx.transfer(&acceptance.fee_asset, &sender, &fee_collector, fee) {
            tx.rollback();
            self.record_rollback(&call_id, &e);
            return Err(RelayError::FeeCharge(e));
        }
        trace.push(RelayStage::FeeCharged);

        let events = match tx.commit() {
            Ok(events) => events,
            Err(e) => {
                self.record_rollback(&call_id, &e);
                return Err(RelayError::Execution(e));
            }
        };
        trace.push(RelayStage::Committed);

        self.stats.committed += 1;
        self.stats.total_fees = self.stats.total_fees.saturating_add(fee);
        info!(
            "Relay {} committed for {}: cost {}, fee {} at scale {}",
            call_id, sender, actual_cost, fee, acceptance.price_scale
        );

        Ok(RelayReceipt {
            call_id,
            sender,
            output,
            actual_cost,
            fee,
            fee_asset: acceptance.fee_asset,
            price_scale: acceptance.price_scale,
            trace,
            events,
        })
    }

    fn record_rollback(&mut self, call_id: &str, cause: &LedgerError) {
        self.stats.rolled_back += 1;
        warn!("Relay {} rolled back: {}", call_id, cause);
    }
}
