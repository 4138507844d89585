use serde::{Deserialize, Serialize};

use crate::errors::GameError;
use crate::outcome::PayoutTable;

/// Ticks in a betting window
pub const BETTING_WINDOW: u32 = 30;
/// Maximum recorded history entries
pub const HISTORY_CAPACITY: usize = 200;
/// Opening balance of a fresh account
pub const STARTING_BALANCE: u64 = 10_000_000;
/// Chip selected before the player picks one
pub const DEFAULT_CHIP: u64 = 10_000;
/// Chip denominations offered by the table
pub const CHIP_VALUES: [u64; 6] = [1_000, 10_000, 50_000, 100_000, 500_000, 1_000_000];

/// Table parameters fixed for the lifetime of an engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub betting_window: u32,
    pub payouts: PayoutTable,
    pub history_capacity: usize,
    pub starting_balance: u64,
    pub default_chip: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            betting_window: BETTING_WINDOW,
            payouts: PayoutTable::default(),
            history_capacity: HISTORY_CAPACITY,
            starting_balance: STARTING_BALANCE,
            default_chip: DEFAULT_CHIP,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), GameError> {
        if self.betting_window == 0 {
            return Err(GameError::InvalidConfig(
                "betting_window must be >0".into(),
            ));
        }
        if self.history_capacity == 0 {
            return Err(GameError::InvalidConfig(
                "history_capacity must be >0".into(),
            ));
        }
        if self.default_chip == 0 {
            return Err(GameError::InvalidConfig("default_chip must be >0".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_table_constants() {
        let cfg = GameConfig::default();
        assert_eq!(cfg.betting_window, 30);
        assert_eq!(cfg.history_capacity, 200);
        assert_eq!(cfg.starting_balance, 10_000_000);
        assert_eq!(cfg.payouts, PayoutTable { tai: 1, xiu: 1 });
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_zero_window() {
        let cfg = GameConfig {
            betting_window: 0,
            ..GameConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(GameError::InvalidConfig(_))));
    }
}
