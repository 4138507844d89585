mod helpers;

use helpers::engine_with_rolls;
use taixiu_engine::errors::GameError;
use taixiu_engine::ledger::Side;

#[test]
fn all_in_refunds_opposite_side_then_commits_everything() {
    let mut eng = engine_with_rolls(&[]);
    eng.start_round();
    eng.place_bet(Side::Xiu, 250_000, false).expect("xiu bet");
    let balance_before = eng.balance();

    eng.set_all_in_mode(true);
    let moved = eng.bet_on(Side::Tai).expect("all-in");

    assert_eq!(moved, balance_before + 250_000);
    assert_eq!(eng.bet_slip().get(Side::Xiu), 0);
    assert_eq!(eng.bet_slip().get(Side::Tai), 10_000_000);
    assert_eq!(eng.balance(), 0);
    assert!(!eng.all_in_mode());
}

#[test]
fn explicit_all_in_flag_counts_refund_as_available() {
    let mut eng = engine_with_rolls(&[]);
    eng.start_round();
    eng.place_bet(Side::Tai, 9_000_000, false).expect("tai bet");
    // 1_000_000 on hand + 9_000_000 refundable
    eng.place_bet(Side::Xiu, 10_000_000, true).expect("all-in xiu");
    assert_eq!(eng.bet_slip().get(Side::Tai), 0);
    assert_eq!(eng.bet_slip().get(Side::Xiu), 10_000_000);
}

#[test]
fn failed_all_in_changes_nothing() {
    let mut eng = engine_with_rolls(&[]);
    eng.start_round();
    eng.place_bet(Side::Tai, 1_000, false).expect("tai bet");
    let err = eng
        .place_bet(Side::Xiu, 10_000_001, true)
        .expect_err("more than balance plus refund");
    assert!(matches!(err, GameError::InsufficientFunds { .. }));
    assert_eq!(eng.bet_slip().get(Side::Tai), 1_000);
    assert_eq!(eng.balance(), 9_999_000);
}

#[test]
fn all_in_on_empty_balance_is_rejected() {
    let mut eng = engine_with_rolls(&[]);
    eng.start_round();
    eng.set_all_in_mode(true);
    eng.bet_on(Side::Tai).expect("first all-in");
    eng.set_all_in_mode(true);
    // same side, opposite slot empty, balance zero
    let err = eng.bet_on(Side::Tai).unwrap_err();
    assert_eq!(err, GameError::InvalidAmount { amount: 0 });
}
