use serde::{Deserialize, Serialize};

use crate::errors::GameError;

/// The two outcomes a player can back.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Over: sums 11 to 17
    Tai,
    /// Under: sums 4 to 10
    Xiu,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Tai, Side::Xiu];

    pub fn opposite(self) -> Side {
        match self {
            Side::Tai => Side::Xiu,
            Side::Xiu => Side::Tai,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Tai => "tai",
            Side::Xiu => "xiu",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tai" | "tài" | "over" | "big" => Ok(Side::Tai),
            "xiu" | "xỉu" | "under" | "small" => Ok(Side::Xiu),
            other => Err(format!("unknown side: {}", other)),
        }
    }
}

/// Wagers pending in the current round, at most one accumulated stake per side.
/// A zero amount means no bet on that side.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct BetSlip {
    pub tai: u64,
    pub xiu: u64,
}

impl BetSlip {
    pub fn get(&self, side: Side) -> u64 {
        match side {
            Side::Tai => self.tai,
            Side::Xiu => self.xiu,
        }
    }

    fn slot(&mut self, side: Side) -> &mut u64 {
        match side {
            Side::Tai => &mut self.tai,
            Side::Xiu => &mut self.xiu,
        }
    }

    pub fn total(&self) -> u64 {
        self.tai + self.xiu
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Non-empty entries, Tai first.
    pub fn entries(&self) -> impl Iterator<Item = (Side, u64)> + '_ {
        Side::ALL
            .into_iter()
            .map(|s| (s, self.get(s)))
            .filter(|&(_, amount)| amount > 0)
    }
}

/// Player balance plus the pending bet slip.
///
/// Every unit of currency is either in `balance` or in the slip; betting moves
/// it between the two and never creates or destroys any. Only settlement
/// credits new money.
///
/// # Examples
///
/// ```
/// use taixiu_engine::ledger::{Ledger, Side};
///
/// let mut ledger = Ledger::new(100_000);
/// ledger.place_bet(Side::Xiu, 30_000, false).unwrap();
/// assert_eq!(ledger.balance(), 70_000);
///
/// // all-in on Tai pulls the Xiu stake back first
/// ledger.all_in(Side::Tai).unwrap();
/// assert_eq!(ledger.balance(), 0);
/// assert_eq!(ledger.bets().get(Side::Tai), 100_000);
/// assert_eq!(ledger.bets().get(Side::Xiu), 0);
/// ```
#[derive(Debug, Clone)]
pub struct Ledger {
    balance: u64,
    bets: BetSlip,
}

impl Ledger {
    pub fn new(balance: u64) -> Self {
        Self {
            balance,
            bets: BetSlip::default(),
        }
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    pub fn bets(&self) -> &BetSlip {
        &self.bets
    }

    pub fn debit(&mut self, amount: u64) -> Result<(), GameError> {
        if amount > self.balance {
            return Err(GameError::InsufficientFunds {
                requested: amount,
                available: self.balance,
            });
        }
        self.balance -= amount;
        Ok(())
    }

    /// Adds `amount` to the balance.
    ///
    /// # Errors
    ///
    /// [`GameError::BalanceOverflow`] when the sum does not fit; the balance is
    /// left unchanged.
    pub fn credit(&mut self, amount: u64) -> Result<(), GameError> {
        self.balance = add(self.balance, amount)?;
        Ok(())
    }

    /// Places `amount` on `side`, accumulating onto any existing stake.
    ///
    /// With `is_all_in`, a stake on the opposite side is refunded before the
    /// debit, and that refund counts towards the available funds. On error
    /// nothing is changed.
    ///
    /// # Errors
    ///
    /// - [`GameError::InvalidAmount`] when `amount` is zero
    /// - [`GameError::InsufficientFunds`] when `amount` exceeds what is available
    /// - [`GameError::BalanceOverflow`] when a stake or refund would not fit in `u64`
    pub fn place_bet(&mut self, side: Side, amount: u64, is_all_in: bool) -> Result<(), GameError> {
        if amount == 0 {
            return Err(GameError::InvalidAmount { amount });
        }
        let refundable = if is_all_in {
            self.bets.get(side.opposite())
        } else {
            0
        };
        let available = add(self.balance, refundable)?;
        if amount > available {
            return Err(GameError::InsufficientFunds {
                requested: amount,
                available,
            });
        }
        let stake = add(self.bets.get(side), amount)?;
        if refundable > 0 {
            self.refund(side.opposite())?;
        }
        self.debit(amount)?;
        *self.bets.slot(side) = stake;
        Ok(())
    }

    /// Commits everything to `side`: refunds the opposite stake, then debits
    /// the whole resulting balance. Returns the amount moved.
    pub fn all_in(&mut self, side: Side) -> Result<u64, GameError> {
        let amount = self.all_in_amount(side);
        self.place_bet(side, amount, true)?;
        Ok(amount)
    }

    /// What an all-in on `side` would wager right now.
    pub fn all_in_amount(&self, side: Side) -> u64 {
        self.balance.saturating_add(self.bets.get(side.opposite()))
    }

    /// Returns the stake on `side` to the balance and clears that entry.
    /// On error the stake stays on the slip.
    pub fn refund(&mut self, side: Side) -> Result<u64, GameError> {
        let amount = self.bets.get(side);
        self.credit(amount)?;
        *self.bets.slot(side) = 0;
        Ok(amount)
    }

    /// Refunds both sides, or neither.
    pub fn refund_all(&mut self) -> Result<u64, GameError> {
        let total = add(self.bets.tai, self.bets.xiu)?;
        add(self.balance, total)?;
        for side in Side::ALL {
            self.refund(side)?;
        }
        Ok(total)
    }

    /// Empties the slip without touching the balance. Only valid once the
    /// stakes have been settled or refunded.
    pub fn clear_bets(&mut self) {
        self.bets = BetSlip::default();
    }
}

fn add(balance: u64, amount: u64) -> Result<u64, GameError> {
    balance
        .checked_add(amount)
        .ok_or(GameError::BalanceOverflow { balance, amount })
}
