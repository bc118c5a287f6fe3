// src/token/mod.rs
//! Token module
//!
//! Wraps a ledger with its operator whitelist, its descriptive details and
//! the call surface used by both the direct and the relayed path.

pub mod calls;
pub mod operator_whitelist;
pub mod token;

// Re-export main components
pub use calls::{CallOutput, LedgerCall, OperationId};
pub use operator_whitelist::OperatorWhitelist;
pub use token::{Token, TokenDetails};
