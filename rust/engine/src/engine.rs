use crate::config::GameConfig;
use crate::dice::{roll_dice, DiceRoll};
use crate::errors::GameError;
use crate::events::{BetResult, RoundObserver, Settlement};
use crate::history::{History, HistoryEntry};
use crate::ledger::{BetSlip, Ledger, Side};
use crate::outcome::{classify, settle};
use crate::rng::{RandomSource, SecureRandom};
use crate::round::{self, RoundSession, RoundState, SessionId};

/// What a call to [`Engine::tick`] or [`Engine::resolve_round`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// No betting round running; nothing happened
    Idle,
    /// Countdown advanced, betting still open
    Counting { remaining: u32 },
    /// Dice are shown; settlement waits for [`Engine::reveal_open`]
    Revealed { dice: DiceRoll },
    /// Round settled and the next one already started
    Settled(Settlement),
}

/// The round state machine. Owns the ledger, history and current round, and
/// is the only thing allowed to mutate them.
///
/// All calls must be serialized by the host: a timer drives [`tick`](Engine::tick)
/// once per second, input handlers call the betting operations, and a reveal
/// action calls [`reveal_open`](Engine::reveal_open) in manual-open mode.
///
/// # Examples
///
/// ```
/// use taixiu_engine::config::GameConfig;
/// use taixiu_engine::engine::{Engine, TickOutcome};
/// use taixiu_engine::ledger::Side;
/// use taixiu_engine::rng::SeededRandom;
/// use taixiu_engine::round::RoundState;
///
/// let mut engine = Engine::with_rng(GameConfig::default(), SeededRandom::new(7)).unwrap();
/// engine.start_round();
/// engine.place_bet(Side::Tai, 10_000, false).unwrap();
/// assert_eq!(engine.balance(), 9_990_000);
///
/// // run the countdown out; auto mode settles and opens the next round
/// let mut last = TickOutcome::Idle;
/// while !matches!(last, TickOutcome::Settled(_)) {
///     last = engine.tick().unwrap();
/// }
/// assert_eq!(engine.state(), RoundState::Betting);
/// assert!(engine.bet_slip().is_empty());
/// ```
pub struct Engine<R: RandomSource = SecureRandom> {
    config: GameConfig,
    rng: R,
    ledger: Ledger,
    history: History,
    /// `None` until the first round starts
    round: Option<RoundSession>,
    manual_open: bool,
    selected_chip: u64,
    all_in: bool,
    observers: Vec<Box<dyn RoundObserver>>,
    /// Timestamp of the last issued session id; ids never reuse one
    last_id_millis: Option<u64>,
}

impl Engine<SecureRandom> {
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        Self::with_rng(config, SecureRandom::new())
    }
}

impl<R: RandomSource> Engine<R> {
    pub fn with_rng(config: GameConfig, rng: R) -> Result<Self, GameError> {
        config.validate()?;
        Ok(Self {
            ledger: Ledger::new(config.starting_balance),
            history: History::with_capacity(config.history_capacity),
            selected_chip: config.default_chip,
            config,
            rng,
            round: None,
            manual_open: false,
            all_in: false,
            observers: Vec::new(),
            last_id_millis: None,
        })
    }

    pub fn subscribe<O: RoundObserver + 'static>(&mut self, observer: O) {
        self.observers.push(Box::new(observer));
    }

    /// Opens a fresh betting round. Valid from any state.
    ///
    /// Stakes still on the slip belong to a round that never settled and are
    /// refunded before the slip is cleared.
    pub fn start_round(&mut self) -> SessionId {
        if let Some(prev) = &self.round {
            if !self.ledger.bets().is_empty() {
                match self.ledger.refund_all() {
                    Ok(refunded) => tracing::warn!(
                        session_id = %prev.id,
                        state = %prev.state,
                        refunded,
                        "round abandoned before settlement, stakes refunded"
                    ),
                    Err(e) => tracing::error!(
                        session_id = %prev.id,
                        error = %e,
                        "stakes could not be refunded, carried into the next round"
                    ),
                }
            }
        }

        // strictly increasing timestamps keep ids unique even if the clock steps back
        let now = round::now_millis();
        let millis = match self.last_id_millis {
            Some(last) if now <= last => last + 1,
            _ => now,
        };
        self.last_id_millis = Some(millis);
        let id = SessionId::at(millis, &mut self.rng);
        self.round = Some(RoundSession::open(id.clone(), self.config.betting_window));

        tracing::info!(
            session_id = %id,
            balance = self.ledger.balance(),
            window = self.config.betting_window,
            "round started"
        );
        self.emit(|o| o.on_round_started(&id));
        id
    }

    /// Advances the countdown by one unit. When it reaches zero, betting
    /// closes and the round resolves. A no-op outside `Betting`.
    pub fn tick(&mut self) -> Result<TickOutcome, GameError> {
        let Some(round) = self.round.as_mut().filter(|r| r.state == RoundState::Betting) else {
            return Ok(TickOutcome::Idle);
        };
        round.time_remaining = round.time_remaining.saturating_sub(1);
        if round.time_remaining > 0 {
            return Ok(TickOutcome::Counting {
                remaining: round.time_remaining,
            });
        }
        tracing::debug!(session_id = %round.id, "betting window elapsed");
        self.resolve_round()
    }

    /// Places a wager on the current round.
    ///
    /// # Errors
    ///
    /// - [`GameError::RoundNotOpen`] outside the betting window
    /// - [`GameError::InvalidAmount`] for a zero amount
    /// - [`GameError::InsufficientFunds`] when the amount exceeds the balance
    ///
    /// Every error is also reported through `on_bet_rejected` and leaves the
    /// balance and slip unchanged.
    pub fn place_bet(&mut self, side: Side, amount: u64, is_all_in: bool) -> Result<(), GameError> {
        let result = self
            .ensure_betting()
            .and_then(|_| self.ledger.place_bet(side, amount, is_all_in));
        match result {
            Ok(()) => {
                tracing::debug!(
                    session_id = %self.session_id_str(),
                    side = %side,
                    amount,
                    all_in = is_all_in,
                    balance = self.ledger.balance(),
                    "bet placed"
                );
                Ok(())
            }
            Err(e) => {
                if matches!(e, GameError::InsufficientFunds { .. }) {
                    self.all_in = false;
                }
                self.reject(&e);
                Err(e)
            }
        }
    }

    /// Bets on `side` using the player's current intent: everything when
    /// all-in is armed, the selected chip otherwise. All-in is disarmed after
    /// every attempt. Returns the amount wagered.
    pub fn bet_on(&mut self, side: Side) -> Result<u64, GameError> {
        let all_in = std::mem::take(&mut self.all_in);
        let amount = if all_in {
            self.ledger.all_in_amount(side)
        } else {
            self.selected_chip
        };
        self.place_bet(side, amount, all_in).map(|_| amount)
    }

    /// Closes betting, draws the dice and moves to `Results`. Outside
    /// manual-open mode the round is settled straight away.
    pub fn resolve_round(&mut self) -> Result<TickOutcome, GameError> {
        let round = match self.round.as_mut() {
            Some(r) if matches!(r.state, RoundState::Betting | RoundState::Rolling) => r,
            other => {
                let state = other.map_or(RoundState::Idle, |r| r.state);
                return Err(self.invalid_transition("resolve_round", state));
            }
        };
        round.state = RoundState::Rolling;
        round.time_remaining = 0;

        let dice = roll_dice(&mut self.rng);
        round.roll = Some(dice);
        round.state = RoundState::Results;
        tracing::debug!(session_id = %round.id, dice = ?dice.values(), "dice drawn");
        self.emit(|o| o.on_dice_revealed(dice));

        if self.manual_open {
            Ok(TickOutcome::Revealed { dice })
        } else {
            self.settle_round().map(TickOutcome::Settled)
        }
    }

    /// Settles the drawn roll, credits winnings, records history, notifies,
    /// then starts the next round.
    ///
    /// # Errors
    ///
    /// [`GameError::InvalidTransition`] when there is no unsettled roll. That
    /// only happens when the host calls out of order and should be treated as
    /// fatal.
    pub fn settle_round(&mut self) -> Result<Settlement, GameError> {
        let (session_id, dice) = match &self.round {
            Some(r) if r.state == RoundState::Results => match r.roll {
                Some(dice) => (r.id.clone(), dice),
                None => return Err(self.invalid_transition("settle_round", r.state)),
            },
            other => {
                let state = other.as_ref().map_or(RoundState::Idle, |r| r.state);
                return Err(self.invalid_transition("settle_round", state));
            }
        };

        let outcome = classify(dice);
        let bets: BetSlip = *self.ledger.bets();
        let winnings = settle(&bets, &outcome, &self.config.payouts);
        if let Err(e) = self.ledger.credit(winnings) {
            tracing::error!(session_id = %session_id, winnings, error = %e, "payout rejected");
            return Err(e);
        }
        self.ledger.clear_bets();

        if let Some(side) = outcome.side {
            self.history.record(HistoryEntry {
                session_id: session_id.clone(),
                side,
                sum: outcome.sum,
                dice,
            });
        }

        let result = if winnings > 0 {
            BetResult::Won
        } else if !bets.is_empty() {
            BetResult::Lost
        } else {
            BetResult::NoBet
        };
        let settlement = Settlement {
            session_id,
            dice,
            sum: outcome.sum,
            side: outcome.side,
            stake: bets.total(),
            winnings,
            result,
            balance: self.ledger.balance(),
        };
        tracing::info!(
            session_id = %settlement.session_id,
            sum = settlement.sum,
            side = ?settlement.side,
            stake = settlement.stake,
            winnings,
            balance = settlement.balance,
            "round settled"
        );
        self.emit(|o| o.on_settled(&settlement));

        self.start_round();
        Ok(settlement)
    }

    /// Manual-open reveal: settles the round whose dice are on show.
    pub fn reveal_open(&mut self) -> Result<Settlement, GameError> {
        self.settle_round()
    }

    pub fn set_manual_open_mode(&mut self, enabled: bool) {
        self.manual_open = enabled;
    }

    /// Selects the chip used by [`bet_on`](Engine::bet_on). Picking a chip
    /// disarms all-in.
    pub fn set_selected_chip(&mut self, amount: u64) -> Result<(), GameError> {
        if amount == 0 {
            return Err(GameError::InvalidAmount { amount });
        }
        self.selected_chip = amount;
        self.all_in = false;
        Ok(())
    }

    pub fn set_all_in_mode(&mut self, enabled: bool) {
        self.all_in = enabled;
    }

    pub fn balance(&self) -> u64 {
        self.ledger.balance()
    }

    pub fn bet_slip(&self) -> &BetSlip {
        self.ledger.bets()
    }

    pub fn state(&self) -> RoundState {
        self.round.as_ref().map_or(RoundState::Idle, |r| r.state)
    }

    pub fn time_remaining(&self) -> u32 {
        self.round.as_ref().map_or(0, |r| r.time_remaining)
    }

    /// Settled rounds, newest first, optionally capped at `limit`.
    pub fn history(&self, limit: Option<usize>) -> Vec<HistoryEntry> {
        match limit {
            Some(n) => self.history.recent(n),
            None => self.history.all(),
        }
    }

    pub fn history_log(&self) -> &History {
        &self.history
    }

    pub fn round(&self) -> Option<&RoundSession> {
        self.round.as_ref()
    }

    pub fn session_id(&self) -> Option<&SessionId> {
        self.round.as_ref().map(|r| &r.id)
    }

    pub fn manual_open_mode(&self) -> bool {
        self.manual_open
    }

    pub fn selected_chip(&self) -> u64 {
        self.selected_chip
    }

    pub fn all_in_mode(&self) -> bool {
        self.all_in
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    fn ensure_betting(&self) -> Result<(), GameError> {
        match self.state() {
            RoundState::Betting => Ok(()),
            state => Err(GameError::RoundNotOpen { state }),
        }
    }

    fn reject(&mut self, e: &GameError) {
        tracing::warn!(
            session_id = %self.session_id_str(),
            reason = %e,
            "bet rejected"
        );
        self.emit(|o| o.on_bet_rejected(e));
    }

    fn invalid_transition(&self, operation: &'static str, state: RoundState) -> GameError {
        tracing::error!(operation, state = %state, "invalid round transition");
        GameError::InvalidTransition { operation, state }
    }

    fn session_id_str(&self) -> &str {
        self.session_id().map_or("-", SessionId::as_str)
    }

    fn emit(&mut self, mut f: impl FnMut(&mut dyn RoundObserver)) {
        for o in &mut self.observers {
            f(o.as_mut());
        }
    }
}

impl<R: RandomSource + std::fmt::Debug> std::fmt::Debug for Engine<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("rng", &self.rng)
            .field("ledger", &self.ledger)
            .field("history_len", &self.history.len())
            .field("round", &self.round)
            .field("manual_open", &self.manual_open)
            .field("selected_chip", &self.selected_chip)
            .field("all_in", &self.all_in)
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{EventLog, RoundEvent};
    use crate::rng::testing::ScriptedRandom;

    fn engine() -> Engine<ScriptedRandom> {
        Engine::with_rng(GameConfig::default(), ScriptedRandom::new()).unwrap()
    }

    fn run_out_clock<R: RandomSource>(e: &mut Engine<R>) -> TickOutcome {
        loop {
            match e.tick().unwrap() {
                TickOutcome::Counting { .. } => continue,
                other => return other,
            }
        }
    }

    #[test]
    fn starts_idle_and_rejects_bets() {
        let mut e = engine();
        assert_eq!(e.state(), RoundState::Idle);
        assert_eq!(e.tick().unwrap(), TickOutcome::Idle);
        assert_eq!(
            e.place_bet(Side::Tai, 1_000, false),
            Err(GameError::RoundNotOpen {
                state: RoundState::Idle
            })
        );
    }

    #[test]
    fn countdown_closes_betting_after_window() {
        let mut e = engine();
        e.set_manual_open_mode(true);
        e.start_round();
        e.rng.push_roll([1, 2, 3]);
        for remaining in (1..30).rev() {
            assert_eq!(e.tick().unwrap(), TickOutcome::Counting { remaining });
        }
        let dice = DiceRoll::new([1, 2, 3]).unwrap();
        assert_eq!(e.tick().unwrap(), TickOutcome::Revealed { dice });
        assert_eq!(e.state(), RoundState::Results);
        assert_eq!(e.time_remaining(), 0);
        // ticks outside betting do nothing
        assert_eq!(e.tick().unwrap(), TickOutcome::Idle);
        assert_eq!(e.state(), RoundState::Results);
    }

    #[test]
    fn winning_round_credits_and_records() {
        let mut e = engine();
        let first = e.start_round();
        e.place_bet(Side::Tai, 10_000, false).unwrap();
        e.rng.push_roll([4, 5, 6]);
        let TickOutcome::Settled(s) = run_out_clock(&mut e) else {
            panic!("auto mode should settle");
        };
        assert_eq!(s.winnings, 20_000);
        assert_eq!(s.result, BetResult::Won);
        assert_eq!(e.balance(), 10_010_000);
        let head = &e.history(Some(1))[0];
        assert_eq!(head.session_id, first);
        assert_eq!((head.side, head.sum), (Side::Tai, 15));
        assert_eq!(e.state(), RoundState::Betting);
        assert_ne!(e.session_id(), Some(&first));
    }

    #[test]
    fn settle_twice_is_invalid_transition() {
        let mut e = engine();
        e.set_manual_open_mode(true);
        e.start_round();
        e.rng.push_roll([2, 3, 4]);
        e.resolve_round().unwrap();
        e.reveal_open().unwrap();
        let err = e.settle_round().unwrap_err();
        assert!(matches!(
            err,
            GameError::InvalidTransition {
                operation: "settle_round",
                state: RoundState::Betting
            }
        ));
        assert!(!err.is_player_recoverable());
    }

    #[test]
    fn settle_before_roll_is_invalid_transition() {
        let mut e = engine();
        assert!(matches!(
            e.settle_round(),
            Err(GameError::InvalidTransition { .. })
        ));
        e.start_round();
        assert!(matches!(
            e.settle_round(),
            Err(GameError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn insufficient_funds_disarms_all_in() {
        let cfg = GameConfig {
            starting_balance: 5_000,
            ..GameConfig::default()
        };
        let mut e = Engine::with_rng(cfg, ScriptedRandom::new()).unwrap();
        e.start_round();
        e.set_all_in_mode(true);
        let err = e.place_bet(Side::Xiu, 6_000, false).unwrap_err();
        assert!(matches!(err, GameError::InsufficientFunds { .. }));
        assert!(!e.all_in_mode());
        assert_eq!(e.balance(), 5_000);
    }

    #[test]
    fn bet_on_uses_chip_or_all_in() {
        let mut e = engine();
        let log = EventLog::new();
        e.subscribe(log.clone());
        e.start_round();
        e.set_selected_chip(50_000).unwrap();
        assert_eq!(e.bet_on(Side::Xiu).unwrap(), 50_000);
        e.set_all_in_mode(true);
        assert_eq!(e.bet_on(Side::Tai).unwrap(), 10_000_000);
        assert!(!e.all_in_mode());
        assert_eq!(e.balance(), 0);
        assert_eq!(e.bet_slip().get(Side::Xiu), 0);
        // nothing left for the chip
        assert!(e.bet_on(Side::Tai).is_err());
        assert!(log
            .events()
            .iter()
            .any(|ev| matches!(ev, RoundEvent::BetRejected { .. })));
    }

    #[test]
    fn selecting_chip_disarms_all_in() {
        let mut e = engine();
        e.set_all_in_mode(true);
        e.set_selected_chip(1_000).unwrap();
        assert!(!e.all_in_mode());
        assert!(e.set_selected_chip(0).is_err());
        assert_eq!(e.selected_chip(), 1_000);
    }

    #[test]
    fn restarting_mid_round_refunds_stakes() {
        let mut e = engine();
        e.start_round();
        e.place_bet(Side::Tai, 1_000, false).unwrap();
        e.place_bet(Side::Xiu, 2_000, false).unwrap();
        e.start_round();
        assert_eq!(e.balance(), 10_000_000);
        assert!(e.bet_slip().is_empty());
    }

    #[test]
    fn session_ids_survive_clock_stepping_back() {
        let mut e = engine();
        let ahead = round::now_millis() + 60_000;
        e.last_id_millis = Some(ahead);
        // ScriptedRandom draws the same suffix every time
        let ids: Vec<SessionId> = (0..5).map(|_| e.start_round()).collect();
        for (i, a) in ids.iter().enumerate() {
            for b in &ids[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_eq!(e.last_id_millis, Some(ahead + 5));
    }

    #[test]
    fn payout_overflow_keeps_round_and_stakes() {
        let cfg = GameConfig {
            starting_balance: u64::MAX,
            ..GameConfig::default()
        };
        let mut e = Engine::with_rng(cfg, ScriptedRandom::new()).unwrap();
        e.set_manual_open_mode(true);
        e.start_round();
        e.place_bet(Side::Tai, 10, false).unwrap();
        e.rng.push_roll([4, 5, 6]);
        e.resolve_round().unwrap();

        let err = e.reveal_open().unwrap_err();
        assert!(matches!(err, GameError::BalanceOverflow { amount: 20, .. }));
        assert_eq!(e.balance(), u64::MAX - 10);
        assert_eq!(e.bet_slip().get(Side::Tai), 10);
        assert_eq!(e.state(), RoundState::Results);
        assert!(e.history(None).is_empty());
    }

    #[test]
    fn consecutive_session_ids_differ() {
        let mut e = engine();
        let a = e.start_round();
        let b = e.start_round();
        let c = e.start_round();
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_ne!(a, c);
    }
}
