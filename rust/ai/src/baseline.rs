//! Deterministic strategies driven only by the last result.

use crate::{AutoBettor, BetDecision, BettorView};
use taixiu_engine::ledger::Side;

/// Bets the same side every round.
#[derive(Debug, Clone)]
pub struct FlatBettor {
    side: Side,
    stake: u64,
}

impl FlatBettor {
    pub fn new(side: Side, stake: u64) -> Self {
        Self { side, stake }
    }
}

impl AutoBettor for FlatBettor {
    fn decide(&mut self, view: &BettorView) -> Option<BetDecision> {
        BetDecision::capped(self.side, self.stake, view.balance)
    }

    fn name(&self) -> &str {
        "Flat"
    }
}

/// Rides the streak: bets whatever came up last, Tài on an empty history.
#[derive(Debug, Clone)]
pub struct FollowBettor {
    stake: u64,
}

impl FollowBettor {
    pub fn new(stake: u64) -> Self {
        Self { stake }
    }
}

impl AutoBettor for FollowBettor {
    fn decide(&mut self, view: &BettorView) -> Option<BetDecision> {
        let side = view.last_result().map_or(Side::Tai, |e| e.side);
        BetDecision::capped(side, self.stake, view.balance)
    }

    fn name(&self) -> &str {
        "Follow"
    }
}

/// Bets against the last result, Tài on an empty history.
#[derive(Debug, Clone)]
pub struct ContrarianBettor {
    stake: u64,
}

impl ContrarianBettor {
    pub fn new(stake: u64) -> Self {
        Self { stake }
    }
}

impl AutoBettor for ContrarianBettor {
    fn decide(&mut self, view: &BettorView) -> Option<BetDecision> {
        let side = view.last_result().map_or(Side::Tai, |e| e.side.opposite());
        BetDecision::capped(side, self.stake, view.balance)
    }

    fn name(&self) -> &str {
        "Contrarian"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taixiu_engine::dice::DiceRoll;
    use taixiu_engine::history::{History, HistoryEntry};
    use taixiu_engine::ledger::BetSlip;
    use taixiu_engine::round::SessionId;

    fn history_ending_with(dice: [u8; 3], side: Side) -> History {
        let mut h = History::new();
        let roll = DiceRoll::new(dice).unwrap();
        h.record(HistoryEntry {
            session_id: SessionId::from("t-1000".to_string()),
            side,
            sum: roll.sum(),
            dice: roll,
        });
        h
    }

    #[test]
    fn follow_and_contrarian_read_latest() {
        let h = history_ending_with([1, 2, 3], Side::Xiu);
        let slip = BetSlip::default();
        let view = BettorView {
            balance: 50_000,
            bets: &slip,
            history: &h,
        };
        assert_eq!(FollowBettor::new(1_000).decide(&view).unwrap().side, Side::Xiu);
        assert_eq!(
            ContrarianBettor::new(1_000).decide(&view).unwrap().side,
            Side::Tai
        );
    }

    #[test]
    fn empty_history_defaults_to_tai() {
        let h = History::new();
        let slip = BetSlip::default();
        let view = BettorView {
            balance: 50_000,
            bets: &slip,
            history: &h,
        };
        assert_eq!(FollowBettor::new(1_000).decide(&view).unwrap().side, Side::Tai);
        assert_eq!(
            ContrarianBettor::new(1_000).decide(&view).unwrap().side,
            Side::Tai
        );
    }

    #[test]
    fn broke_bettor_sits_out() {
        let h = History::new();
        let slip = BetSlip::default();
        let view = BettorView {
            balance: 0,
            bets: &slip,
            history: &h,
        };
        assert!(FlatBettor::new(Side::Xiu, 10).decide(&view).is_none());
    }
}
