// tests/admin_config_tests.rs
mod common;

use common::Fixture;
use fee_relay_ledger::{
    AdminError, FeeRelayError, FixedCost, GatewayConfig, LedgerCall, LedgerError, OperationId,
    RejectionReason, RelayError, RelayRequest,
};
use solana_program::program_error::ProgramError;
use solana_program::pubkey::Pubkey;

#[test]
fn test_non_owner_admin_calls_rejected() {
    let mut fixture = Fixture::new();
    let stranger = Pubkey::new_unique();
    let fee = fixture.fee();

    assert_eq!(
        fixture.system.set_gas_token(&stranger, Pubkey::new_unique()),
        Err(AdminError::Unauthorized(stranger))
    );
    assert_eq!(
        fixture.system.set_gas_price(&stranger, 1),
        Err(AdminError::Unauthorized(stranger))
    );
    assert_eq!(
        fixture.system.withdraw_deposits(&stranger, 0, stranger),
        Err(AdminError::Unauthorized(stranger))
    );
    assert_eq!(
        fixture
            .system
            .set_restricted_operation(&stranger, OperationId::Transfer, true),
        Err(AdminError::Unauthorized(stranger))
    );

    let admin = fixture.system.gateway().admin();
    assert_eq!(admin.gas_token(), &fee);
    assert_eq!(admin.price_scale(), 1000);
    assert!(!admin.is_restricted(OperationId::Transfer));
}

#[test]
fn test_gas_price_applies_to_later_acceptances() {
    let mut fixture = Fixture::new();
    let owner = fixture.owner;
    let sender = Pubkey::new_unique();
    fixture.fund_fee(sender, 1_000);

    let before = fixture
        .system
        .check_acceptance(&sender, &LedgerCall::TotalSupply, 1_000)
        .unwrap();
    fixture.system.set_gas_price(&owner, 2_000).unwrap();

    // Acceptance captured before the change keeps its scale
    assert_eq!(before.price_scale, 1000);
    assert_eq!(
        fixture
            .system
            .check_acceptance(&sender, &LedgerCall::TotalSupply, 1_000),
        Err(RejectionReason::InsufficientFeeBalance)
    );
}

#[test]
fn test_gas_token_switch_redirects_fees() {
    let mut fixture = Fixture::new();
    let owner = fixture.owner;
    let payout = fixture.payout;
    let primary = fixture.primary();
    let sender = Pubkey::new_unique();
    fixture.fund(sender, 20);
    fixture.fund_fee(sender, 20);

    fixture.system.set_gas_token(&owner, primary).unwrap();
    let req = RelayRequest::new(sender, sender, LedgerCall::TotalSupply);
    let receipt = fixture.system.relay(&req, &FixedCost::new(5)).unwrap();

    assert_eq!(receipt.fee_asset, primary);
    assert_eq!(fixture.balance(&sender), 15);
    assert_eq!(fixture.fee_balance(&sender), 20, "Old fee asset untouched");
    assert_eq!(fixture.balance(&payout), 5);
}

#[test]
fn test_unregistered_gas_token() {
    let mut fixture = Fixture::new();
    let owner = fixture.owner;
    let missing = Pubkey::new_unique();
    fixture.system.set_gas_token(&owner, missing).unwrap();

    // Zero balance in an unknown asset
    let req = RelayRequest::new(owner, owner, LedgerCall::TotalSupply);
    assert_eq!(
        fixture.system.relay(&req, &FixedCost::new(1)),
        Err(RelayError::Rejected(RejectionReason::InsufficientFeeBalance))
    );

    // Accepted on a zero estimate, charging still fails
    let meter = FixedCost { estimate: 0, actual: 0 };
    assert_eq!(
        fixture.system.relay(&req, &meter),
        Err(RelayError::FeeCharge(LedgerError::UnknownAsset(missing)))
    );
}

#[test]
fn test_restricted_set_is_configurable() {
    let mut fixture = Fixture::new();
    let owner = fixture.owner;
    let operator = Pubkey::new_unique();
    let req = RelayRequest::new(owner, owner, LedgerCall::SetOperator { operator, enabled: true });

    fixture
        .system
        .set_restricted_operation(&owner, OperationId::SetOperator, false)
        .unwrap();
    fixture.system.relay(&req, &FixedCost::new(1)).unwrap();
    assert!(fixture.system.primary_token().unwrap().is_operator(&operator));

    fixture
        .system
        .set_restricted_operation(&owner, OperationId::Transfer, true)
        .unwrap();
    let transfer = RelayRequest::new(
        owner,
        owner,
        LedgerCall::Transfer { to: operator, amount: 1 },
    );
    assert_eq!(
        fixture.system.relay(&transfer, &FixedCost::new(1)),
        Err(RelayError::Rejected(RejectionReason::RestrictedMethod))
    );
}

#[test]
fn test_sponsor_deposits() {
    let mut fixture = Fixture::new();
    let owner = fixture.owner;
    let sponsor = Pubkey::new_unique();
    let to = Pubkey::new_unique();

    fixture.system.deposit(&sponsor, 700).unwrap();
    assert_eq!(
        fixture.system.withdraw_deposits(&owner, 701, to),
        Err(AdminError::InsufficientDeposit { available: 700, requested: 701 })
    );

    assert_eq!(fixture.system.withdraw_deposits(&owner, 300, to), Ok(400));
    let admin = fixture.system.gateway().admin();
    assert_eq!(admin.deposit_balance(), 400);
    assert_eq!(admin.withdrawn_to(&to), 300);
}

#[test]
fn test_gateway_config_validation() {
    let owner = Pubkey::new_unique();
    let json = format!(
        r#"{{"owner": "{}", "fee_collector": "11111111111111111111111111111111", "gas_token": "{}"}}"#,
        owner, owner
    );

    // The all-ones base58 string is the null address
    let error = FeeRelayError::from(GatewayConfig::from_json(&json).unwrap_err());
    assert_eq!(error.error_code(), 4001);
    assert_eq!(ProgramError::from(error), ProgramError::Custom(4001));

    let unauthorized = FeeRelayError::from(AdminError::Unauthorized(owner));
    assert_eq!(ProgramError::from(unauthorized), ProgramError::Custom(2000));
}
