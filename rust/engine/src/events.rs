use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::dice::DiceRoll;
use crate::errors::GameError;
use crate::ledger::Side;
use crate::round::SessionId;

/// How the round ended for the player.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BetResult {
    Won,
    Lost,
    NoBet,
}

/// Everything the presentation needs to show a settled round.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub session_id: SessionId,
    pub dice: DiceRoll,
    pub sum: u8,
    /// Winning side, `None` for a house round
    pub side: Option<Side>,
    /// Total wagered this round across both sides
    pub stake: u64,
    /// Amount credited back to the balance
    pub winnings: u64,
    pub result: BetResult,
    /// Balance after the credit
    pub balance: u64,
}

/// Notifications emitted by the engine, in the order they happen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RoundEvent {
    RoundStarted { session_id: SessionId },
    BetRejected { reason: GameErrorKind, message: String },
    DiceRevealed { dice: DiceRoll },
    Settled(Settlement),
}

/// Serializable tag for a rejection reason.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameErrorKind {
    InvalidAmount,
    InsufficientFunds,
    RoundNotOpen,
    InvalidTransition,
    InvalidConfig,
    BalanceOverflow,
}

impl From<&GameError> for GameErrorKind {
    fn from(e: &GameError) -> Self {
        match e {
            GameError::InvalidAmount { .. } => GameErrorKind::InvalidAmount,
            GameError::InsufficientFunds { .. } => GameErrorKind::InsufficientFunds,
            GameError::RoundNotOpen { .. } => GameErrorKind::RoundNotOpen,
            GameError::InvalidTransition { .. } => GameErrorKind::InvalidTransition,
            GameError::InvalidConfig(_) => GameErrorKind::InvalidConfig,
            GameError::BalanceOverflow { .. } => GameErrorKind::BalanceOverflow,
        }
    }
}

/// Presentation-side listener. Every callback defaults to a no-op so a
/// renderer only implements what it draws.
pub trait RoundObserver {
    fn on_round_started(&mut self, _session_id: &SessionId) {}
    fn on_bet_rejected(&mut self, _reason: &GameError) {}
    fn on_dice_revealed(&mut self, _dice: DiceRoll) {}
    fn on_settled(&mut self, _settlement: &Settlement) {}
}

/// Observer that records every notification as a [`RoundEvent`]. Clones share
/// the same buffer, so a test can keep one handle while the engine owns another.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<RoundEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<RoundEvent> {
        match self.events.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Returns and removes everything recorded so far.
    pub fn drain(&self) -> Vec<RoundEvent> {
        match self.events.lock() {
            Ok(mut guard) => std::mem::take(&mut *guard),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }

    fn push(&self, event: RoundEvent) {
        match self.events.lock() {
            Ok(mut guard) => guard.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}

impl RoundObserver for EventLog {
    fn on_round_started(&mut self, session_id: &SessionId) {
        self.push(RoundEvent::RoundStarted {
            session_id: session_id.clone(),
        });
    }

    fn on_bet_rejected(&mut self, reason: &GameError) {
        self.push(RoundEvent::BetRejected {
            reason: reason.into(),
            message: reason.to_string(),
        });
    }

    fn on_dice_revealed(&mut self, dice: DiceRoll) {
        self.push(RoundEvent::DiceRevealed { dice });
    }

    fn on_settled(&mut self, settlement: &Settlement) {
        self.push(RoundEvent::Settled(settlement.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::round::RoundState;

    #[test]
    fn clones_share_the_buffer() {
        let log = EventLog::new();
        let mut handle = log.clone();
        handle.on_round_started(&SessionId::from("abc-1234".to_string()));
        handle.on_bet_rejected(&GameError::RoundNotOpen {
            state: RoundState::Results,
        });
        let events = log.events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], RoundEvent::RoundStarted { .. }));
        match &events[1] {
            RoundEvent::BetRejected { reason, message } => {
                assert_eq!(*reason, GameErrorKind::RoundNotOpen);
                assert!(message.contains("Betting time over"));
            }
            other => panic!("unexpected event: {:?}", other),
        }
        assert_eq!(log.drain().len(), 2);
        assert!(log.events().is_empty());
    }

    #[test]
    fn events_serialize_with_type_tag() {
        let event = RoundEvent::DiceRevealed {
            dice: DiceRoll::new([1, 2, 3]).unwrap(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"type":"dice_revealed","dice":[1,2,3]}"#);
    }

    #[test]
    fn default_observer_ignores_everything() {
        struct Silent;
        impl RoundObserver for Silent {}
        let mut s = Silent;
        s.on_dice_revealed(DiceRoll::new([6, 6, 6]).unwrap());
    }
}
