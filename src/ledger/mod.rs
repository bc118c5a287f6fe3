// src/ledger/mod.rs
//! Ledger module
//!
//! Balance and allowance bookkeeping, the undo log that makes multi-step
//! work atomic, and the registry that owns every token.

pub mod events;
pub mod journal;
pub mod ledger;
pub mod registry;

// Re-export main components
pub use events::LedgerEvent;
pub use journal::{Journal, JournalEntry};
pub use ledger::Ledger;
pub use registry::{derive_asset_address, LedgerRegistry, StateTransaction};
