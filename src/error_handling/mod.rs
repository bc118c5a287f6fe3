// src/error_handling/mod.rs
//! Error handling for the fee-relay ledger
//!
//! This module provides the error types shared by the ledger, the operator
//! whitelist, the relay gateway and its admin surface.

pub mod error_types;

// Re-export common types
pub use error_types::{
    AdminError, ConfigError, FeeRelayError, LedgerError, RejectionReason, RelayError,
};
