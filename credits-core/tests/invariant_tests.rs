//! Invariant coverage: supply conservation across operation sequences,
//! strictly increasing credit ids, and all-or-nothing failure semantics.

use credits_core::{CreditLedger, HostHeight, Principal};
use proptest::prelude::*;
use std::sync::Arc;

fn deployer() -> Principal {
    Principal::new("deployer")
}

fn wallets() -> Vec<Principal> {
    (0..3).map(|i| Principal::new(format!("wallet_{i}"))).collect()
}

/// Ledger with three verified miners, ready for issuance.
fn deploy_with_miners() -> (CreditLedger, Arc<HostHeight>) {
    let clock = Arc::new(HostHeight::new(1));
    let ledger = CreditLedger::new(deployer(), clock.clone());
    for miner in &wallets() {
        ledger
            .verify_miner(&deployer(), miner, 1_000, "solar")
            .unwrap();
    }
    (ledger, clock)
}

#[derive(Debug, Clone)]
enum Op {
    Issue { miner: usize, amount: u64 },
    Transfer { from: usize, to: usize, amount: u64 },
    Redeem { caller: usize, id: u64, amount: u64 },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..3usize, 0..1_000_000u64).prop_map(|(miner, amount)| Op::Issue { miner, amount }),
        (0..3usize, 0..3usize, 0..1_000_000u64)
            .prop_map(|(from, to, amount)| Op::Transfer { from, to, amount }),
        (0..3usize, 1..10u64, 0..1_000_000u64)
            .prop_map(|(caller, id, amount)| Op::Redeem { caller, id, amount }),
    ]
}

proptest! {
    /// After every operation, the total supply equals the sum of held
    /// balances plus everything redeemed so far, and issuance ids come out
    /// as 1, 2, 3, ... with no gaps.
    #[test]
    fn supply_is_conserved_and_ids_are_gapless(
        ops in prop::collection::vec(op_strategy(), 1..40)
    ) {
        let (ledger, clock) = deploy_with_miners();
        let accounts = wallets();
        let mut redeemed_total: u128 = 0;
        let mut issued_ids = Vec::new();

        for op in ops {
            match op {
                Op::Issue { miner, amount } => {
                    let id = ledger
                        .issue_credits(&deployer(), &accounts[miner], amount)
                        .unwrap();
                    issued_ids.push(id);
                }
                Op::Transfer { from, to, amount } => {
                    // May fail on a short balance; failures must not move funds.
                    let _ = ledger.transfer(
                        &accounts[from],
                        amount,
                        &accounts[from],
                        &accounts[to],
                        None,
                    );
                }
                Op::Redeem { caller, id, amount } => {
                    if ledger.redeem_credits(&accounts[caller], id, amount).is_ok() {
                        redeemed_total += u128::from(amount);
                    }
                }
            }
            clock.advance();

            let state = ledger.snapshot().unwrap();
            prop_assert_eq!(
                u128::from(state.balances.total_supply()),
                state.balances.sum_of_balances() + redeemed_total
            );
        }

        for (i, id) in issued_ids.iter().enumerate() {
            prop_assert_eq!(*id, (i as u64) + 1);
        }
    }
}

#[test]
fn rejected_calls_leave_the_state_untouched() {
    let (ledger, _) = deploy_with_miners();
    let accounts = wallets();
    ledger
        .issue_credits(&deployer(), &accounts[0], 1_000)
        .unwrap();
    let before = ledger.snapshot().unwrap();

    // Unauthorized verifier management.
    ledger.add_verifier(&accounts[0], accounts[1].clone()).unwrap_err();
    // Re-verification of a verified miner.
    ledger
        .verify_miner(&deployer(), &accounts[0], 9, "wind")
        .unwrap_err();
    // Issuance to an unverified miner.
    ledger
        .issue_credits(&deployer(), &Principal::new("stranger"), 5)
        .unwrap_err();
    // Redemption by the wrong principal, of an unknown id, and beyond the
    // balance.
    ledger.redeem_credits(&accounts[1], 1, 10).unwrap_err();
    ledger.redeem_credits(&accounts[0], 99, 10).unwrap_err();
    ledger.redeem_credits(&accounts[0], 1, 1_000_000).unwrap_err();
    // Transfer by a non-sender and beyond the balance.
    ledger
        .transfer(&accounts[1], 10, &accounts[0], &accounts[1], None)
        .unwrap_err();
    ledger
        .transfer(&accounts[0], 1_000_000, &accounts[0], &accounts[1], None)
        .unwrap_err();

    assert_eq!(ledger.snapshot().unwrap(), before);
}

#[test]
fn pause_rejections_leave_the_state_untouched() {
    let (ledger, _) = deploy_with_miners();
    let accounts = wallets();
    ledger
        .issue_credits(&deployer(), &accounts[0], 1_000)
        .unwrap();
    ledger.pause_contract(&deployer()).unwrap();
    let before = ledger.snapshot().unwrap();

    ledger.add_verifier(&deployer(), accounts[1].clone()).unwrap_err();
    ledger
        .verify_miner(&deployer(), &Principal::new("fresh"), 1, "hydro")
        .unwrap_err();
    ledger
        .issue_credits(&deployer(), &accounts[0], 1)
        .unwrap_err();
    ledger.redeem_credits(&accounts[0], 1, 1).unwrap_err();
    ledger
        .transfer(&accounts[0], 1, &accounts[0], &accounts[1], None)
        .unwrap_err();

    assert_eq!(ledger.snapshot().unwrap(), before);
}

#[test]
fn verification_height_follows_the_host_counter() {
    let clock = Arc::new(HostHeight::new(41));
    let ledger = CreditLedger::new(deployer(), clock.clone());
    ledger
        .verify_miner(&deployer(), &Principal::new("m1"), 10, "solar")
        .unwrap();
    clock.advance();
    ledger
        .verify_miner(&deployer(), &Principal::new("m2"), 10, "wind")
        .unwrap();

    let first = ledger.get_miner_info(&Principal::new("m1")).unwrap().unwrap();
    let second = ledger.get_miner_info(&Principal::new("m2")).unwrap().unwrap();
    assert_eq!(first.verification_date, 41);
    assert_eq!(second.verification_date, 42);
}
