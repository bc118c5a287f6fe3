// src/fee_optimization/fees.rs
//! Fee arithmetic

use crate::constants::PRICE_SCALE_BASELINE;

/// Fee for `base_cost` at `price_scale` (1000 = 100%), truncating.
/// Computed in 128 bits and saturated at `u64::MAX`.
pub fn scaled_fee(base_cost: u64, price_scale: u64) -> u64 {
    let fee = (base_cost as u128 * price_scale as u128) / PRICE_SCALE_BASELINE as u128;
    u64::try_from(fee).unwrap_or(u64::MAX)
}
