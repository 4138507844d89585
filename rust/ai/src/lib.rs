//! # taixiu-ai: Automated bettors for the Tài/Xỉu table
//!
//! Simple betting strategies used by the `sim` command and by tests that need
//! a stream of realistic bets. Every strategy sees the same read-only
//! [`BettorView`] of the table and answers with an optional [`BetDecision`].
//!
//! ## Quick Start
//!
//! ```rust
//! use taixiu_ai::{create_bettor, BettorView};
//! use taixiu_engine::config::GameConfig;
//! use taixiu_engine::engine::Engine;
//! use taixiu_engine::rng::SeededRandom;
//!
//! let mut engine = Engine::with_rng(GameConfig::default(), SeededRandom::new(3)).unwrap();
//! engine.start_round();
//!
//! let mut bettor = create_bettor("follow", 10_000).expect("known strategy");
//! if let Some(bet) = bettor.decide(&BettorView::of(&engine)) {
//!     engine.place_bet(bet.side, bet.amount, false).unwrap();
//! }
//! ```
//!
//! ## Strategies
//!
//! - `"flat"` - always Tài
//! - `"follow"` - the side of the most recent result
//! - `"contrarian"` - against the most recent result
//! - `"random"` - a fair coin

use taixiu_engine::engine::Engine;
use taixiu_engine::history::{History, HistoryEntry};
use taixiu_engine::ledger::{BetSlip, Side};
use taixiu_engine::rng::RandomSource;

pub mod baseline;
pub mod random;

/// Names accepted by [`create_bettor`].
pub const STRATEGIES: [&str; 4] = ["flat", "follow", "contrarian", "random"];

/// What a bettor may look at before deciding.
#[derive(Debug, Clone, Copy)]
pub struct BettorView<'a> {
    pub balance: u64,
    pub bets: &'a BetSlip,
    pub history: &'a History,
}

impl<'a> BettorView<'a> {
    pub fn of<R: RandomSource>(engine: &'a Engine<R>) -> Self {
        Self {
            balance: engine.balance(),
            bets: engine.bet_slip(),
            history: engine.history_log(),
        }
    }

    pub fn last_result(&self) -> Option<&'a HistoryEntry> {
        self.history.latest()
    }
}

/// A single wager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BetDecision {
    pub side: Side,
    pub amount: u64,
}

impl BetDecision {
    /// Caps `stake` at the available balance; `None` when nothing can be bet.
    pub fn capped(side: Side, stake: u64, balance: u64) -> Option<Self> {
        let amount = stake.min(balance);
        (amount > 0).then_some(Self { side, amount })
    }
}

/// Interface for automated bettors.
///
/// # Example Implementation
///
/// ```rust
/// use taixiu_ai::{AutoBettor, BetDecision, BettorView};
/// use taixiu_engine::ledger::Side;
///
/// struct AlwaysXiu;
///
/// impl AutoBettor for AlwaysXiu {
///     fn decide(&mut self, view: &BettorView) -> Option<BetDecision> {
///         BetDecision::capped(Side::Xiu, 1_000, view.balance)
///     }
///
///     fn name(&self) -> &str {
///         "AlwaysXiu"
///     }
/// }
/// ```
pub trait AutoBettor: Send {
    /// Bet for the round currently open, or `None` to sit it out.
    fn decide(&mut self, view: &BettorView) -> Option<BetDecision>;

    fn name(&self) -> &str;
}

/// Builds a strategy by name. `random` is seeded from OS entropy.
///
/// ```rust
/// use taixiu_ai::create_bettor;
///
/// assert_eq!(create_bettor("contrarian", 500).unwrap().name(), "Contrarian");
/// assert!(create_bettor("martingale", 500).is_none());
/// ```
pub fn create_bettor(name: &str, stake: u64) -> Option<Box<dyn AutoBettor>> {
    build(name, stake, None)
}

/// Like [`create_bettor`], with `random` seeded for reproducible runs.
pub fn create_bettor_with_seed(name: &str, stake: u64, seed: u64) -> Option<Box<dyn AutoBettor>> {
    build(name, stake, Some(seed))
}

fn build(name: &str, stake: u64, seed: Option<u64>) -> Option<Box<dyn AutoBettor>> {
    let bettor: Box<dyn AutoBettor> = match name.to_ascii_lowercase().as_str() {
        "flat" => Box::new(baseline::FlatBettor::new(Side::Tai, stake)),
        "follow" => Box::new(baseline::FollowBettor::new(stake)),
        "contrarian" => Box::new(baseline::ContrarianBettor::new(stake)),
        "random" => Box::new(match seed {
            Some(s) => random::RandomBettor::seeded(stake, s),
            None => random::RandomBettor::new(stake),
        }),
        _ => return None,
    };
    Some(bettor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_strategy_builds() {
        for name in STRATEGIES {
            assert!(create_bettor_with_seed(name, 1_000, 1).is_some(), "{}", name);
        }
        assert!(create_bettor("FLAT", 1_000).is_some());
        assert!(create_bettor("", 1_000).is_none());
    }

    #[test]
    fn capped_decisions() {
        assert_eq!(
            BetDecision::capped(Side::Tai, 5_000, 2_000),
            Some(BetDecision {
                side: Side::Tai,
                amount: 2_000
            })
        );
        assert_eq!(BetDecision::capped(Side::Xiu, 5_000, 0), None);
        assert_eq!(BetDecision::capped(Side::Xiu, 0, 100), None);
    }
}
