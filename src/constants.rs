// src/constants.rs
//! Shared constants for the fee-relay ledger

use solana_program::pubkey::Pubkey;

/// The null address. Transfers to it and approvals for it are rejected.
pub const NULL_ADDRESS: Pubkey = Pubkey::new_from_array([0; 32]);

/// Allowance reported for whitelisted operators
pub const UNLIMITED_ALLOWANCE: u64 = u64::MAX;

/// Price scale baseline (1000 = 100%)
pub const PRICE_SCALE_BASELINE: u64 = 1000;

/// Decimals used when a token does not specify its own
pub const DEFAULT_DECIMALS: u8 = 18;

/// Relay rejection code: caller cannot cover the estimated fee
pub const REJECT_INSUFFICIENT_FEE_BALANCE: u32 = 11;

/// Relay rejection code: operation may only be invoked directly
pub const REJECT_RESTRICTED_METHOD: u32 = 12;

/// Domain separator for deterministic asset addresses
pub const ASSET_ADDRESS_SEED: &[u8] = b"fee-relay-ledger/asset";
