// src/utils/mod.rs
//! Utilities shared across modules

pub mod pubkey_serde;
