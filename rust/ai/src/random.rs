//! Coin-flip strategy.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use taixiu_engine::ledger::Side;

use crate::{AutoBettor, BetDecision, BettorView};

#[derive(Debug, Clone)]
pub struct RandomBettor {
    rng: ChaCha20Rng,
    stake: u64,
}

impl RandomBettor {
    pub fn new(stake: u64) -> Self {
        let rng = ChaCha20Rng::try_from_os_rng()
            .unwrap_or_else(|_| ChaCha20Rng::seed_from_u64(stake));
        Self { rng, stake }
    }

    pub fn seeded(stake: u64, seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
            stake,
        }
    }
}

impl AutoBettor for RandomBettor {
    fn decide(&mut self, view: &BettorView) -> Option<BetDecision> {
        let side = if self.rng.random_bool(0.5) {
            Side::Tai
        } else {
            Side::Xiu
        };
        BetDecision::capped(side, self.stake, view.balance)
    }

    fn name(&self) -> &str {
        "Random"
    }
}
