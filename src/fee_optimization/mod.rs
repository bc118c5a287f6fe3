// src/fee_optimization/mod.rs
//! Fee Optimization module
//!
//! This module contains the relay gateway, which lets a sender have calls
//! executed on their behalf and pays for them with a fee in a configurable
//! asset, together with the admin configuration and fee arithmetic it uses.

pub mod admin_config;
pub mod fees;
pub mod relay_gateway;
pub mod resource_meter;

// Re-export main components
pub use admin_config::{AdminConfig, GatewayConfig, SponsorDeposits};
pub use fees::scaled_fee;
pub use relay_gateway::{
    Acceptance, RelayGateway, RelayReceipt, RelayRequest, RelayStage, RelayStats,
};
pub use resource_meter::{CostSchedule, FixedCost, ResourceMeter};
