// src/fee_optimization/resource_meter.rs
//! Resource cost inputs for relayed calls
//!
//! The gateway does not measure anything itself. It asks a `ResourceMeter`
//! for a pre-execution estimate and a post-execution actual cost; the two
//! may differ.

use std::collections::HashMap;

use serde::Deserialize;
use solana_program::pubkey::Pubkey;

use crate::token::{CallOutput, LedgerCall, OperationId};

/// Source of resource cost figures
pub trait ResourceMeter {
    /// Cost estimate used by the acceptance check
    fn estimate(&self, sender: &Pubkey, call: &LedgerCall) -> u64;

    /// Actual cost of a call that has executed
    fn measure(&self, sender: &Pubkey, call: &LedgerCall, output: &CallOutput) -> u64;
}

/// Constant estimate and actual cost
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedCost {
    /// Returned by `estimate`
    pub estimate: u64,

    /// Returned by `measure`
    pub actual: u64,
}

impl FixedCost {
    /// Same figure before and after execution
    pub fn new(cost: u64) -> Self {
        Self {
            estimate: cost,
            actual: cost,
        }
    }
}

impl ResourceMeter for FixedCost {
    fn estimate(&self, _sender: &Pubkey, _call: &LedgerCall) -> u64 {
        self.estimate
    }

    fn measure(&self, _sender: &Pubkey, _call: &LedgerCall, _output: &CallOutput) -> u64 {
        self.actual
    }
}

/// Per-operation cost table
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct CostSchedule {
    /// Cost for operations without an entry
    #[serde(default)]
    pub default_cost: u64,

    /// Costs by operation
    #[serde(default)]
    pub costs: HashMap<OperationId, u64>,
}

impl CostSchedule {
    /// Schedule charging `default_cost` for everything
    pub fn new(default_cost: u64) -> Self {
        Self {
            default_cost,
            costs: HashMap::new(),
        }
    }

    /// Set the cost of one operation
    pub fn with_cost(mut self, operation: OperationId, cost: u64) -> Self {
        self.costs.insert(operation, cost);
        self
    }

    /// Cost of an operation
    pub fn cost_of(&self, operation: OperationId) -> u64 {
        self.costs.get(&operation).copied().unwrap_or(self.default_cost)
    }
}

impl ResourceMeter for CostSchedule {
    fn estimate(&self, _sender: &Pubkey, call: &LedgerCall) -> u64 {
        self.cost_of(call.operation())
    }

    fn measure(&self, _sender: &Pubkey, call: &LedgerCall, _output: &CallOutput) -> u64 {
        self.cost_of(call.operation())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_cost() {
        let meter = FixedCost { estimate: 10, actual: 7 };
        let sender = Pubkey::new_unique();

        assert_eq!(meter.estimate(&sender, &LedgerCall::Name), 10);
        assert_eq!(meter.measure(&sender, &LedgerCall::Name, &CallOutput::Completed), 7);
        assert_eq!(FixedCost::new(3), FixedCost { estimate: 3, actual: 3 });
    }

    #[test]
    fn test_cost_schedule() {
        let schedule = CostSchedule::new(100).with_cost(OperationId::TransferFrom, 250);
        let sender = Pubkey::new_unique();
        let call = LedgerCall::TransferFrom {
            owner: Pubkey::new_unique(),
            to: Pubkey::new_unique(),
            amount: 1,
        };

        assert_eq!(schedule.estimate(&sender, &call), 250);
        assert_eq!(schedule.estimate(&sender, &LedgerCall::TotalSupply), 100);
    }

    #[test]
    fn test_cost_schedule_from_json() {
        let schedule: CostSchedule =
            serde_json::from_str(r#"{"default_cost": 5, "costs": {"transfer": 21}}"#).unwrap();

        assert_eq!(schedule.cost_of(OperationId::Transfer), 21);
        assert_eq!(schedule.cost_of(OperationId::Approve), 5);
    }
}
