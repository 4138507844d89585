use serde::{Deserialize, Serialize};

use crate::dice::DiceRoll;
use crate::ledger::{BetSlip, Side};

/// Classification of a roll. `side` is `None` for every triple: the house
/// takes the round and no player side wins.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub dice: DiceRoll,
    pub sum: u8,
    pub is_triple: bool,
    pub side: Option<Side>,
}

/// Profit multiplier per side; winners receive `stake + stake * multiplier`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct PayoutTable {
    pub tai: u64,
    pub xiu: u64,
}

impl PayoutTable {
    pub fn multiplier(&self, side: Side) -> u64 {
        match side {
            Side::Tai => self.tai,
            Side::Xiu => self.xiu,
        }
    }
}

impl Default for PayoutTable {
    /// Even money on both sides.
    fn default() -> Self {
        Self { tai: 1, xiu: 1 }
    }
}

/// Classifies a roll. Order of the dice does not matter.
///
/// ```
/// use taixiu_engine::dice::DiceRoll;
/// use taixiu_engine::ledger::Side;
/// use taixiu_engine::outcome::classify;
///
/// let o = classify(DiceRoll::new([4, 5, 6]).unwrap());
/// assert_eq!((o.sum, o.side), (15, Some(Side::Tai)));
///
/// let o = classify(DiceRoll::new([3, 3, 3]).unwrap());
/// assert!(o.is_triple);
/// assert_eq!(o.side, None);
/// ```
pub fn classify(dice: DiceRoll) -> Outcome {
    let sum = dice.sum();
    let is_triple = dice.is_triple();
    let side = match sum {
        _ if is_triple => None,
        11..=17 => Some(Side::Tai),
        4..=10 => Some(Side::Xiu),
        _ => None,
    };
    Outcome {
        dice,
        sum,
        is_triple,
        side,
    }
}

/// Total returned to the player for `bets` under `outcome`: the winning
/// stake plus its profit. Losing stakes were forfeited at placement and are
/// not part of the result; a house round returns 0.
pub fn settle(bets: &BetSlip, outcome: &Outcome, payouts: &PayoutTable) -> u64 {
    let Some(side) = outcome.side else {
        return 0;
    };
    let stake = bets.get(side);
    stake.saturating_add(stake.saturating_mul(payouts.multiplier(side)))
}
