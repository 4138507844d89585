//! Simulation command: many rounds with an automated bettor.
//!
//! # Environment Variables
//!
//! - `TAIXIU_SIM_BREAK_AFTER`: stop after N rounds and exit as interrupted
//!
//! # Examples
//!
//! ```no_run
//! use taixiu_cli::commands::handle_sim_command;
//! use std::io;
//!
//! let mut out = io::stdout();
//! let mut err = io::stderr();
//! handle_sim_command(1000, Some(42), "follow", None, Some("data/rounds.jsonl".to_string()), &mut out, &mut err).unwrap();
//! ```

use crate::config;
use crate::error::CliError;
use crate::round_log::{RoundLogger, RoundRecord};
use crate::ui;
use std::io::Write;
use taixiu_ai::{BettorView, create_bettor_with_seed};
use taixiu_engine::engine::{Engine, TickOutcome};
use taixiu_engine::events::BetResult;
use taixiu_engine::ledger::Side;
use taixiu_engine::rng::SeededRandom;

pub const BREAK_AFTER_ENV: &str = "TAIXIU_SIM_BREAK_AFTER";

/// Running totals for the summary.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Tally {
    rounds: u64,
    wins: u64,
    losses: u64,
    no_bet: u64,
    house: u64,
    tai: u64,
    xiu: u64,
}

impl Tally {
    fn record(&mut self, result: BetResult, side: Option<Side>) {
        self.rounds += 1;
        match result {
            BetResult::Won => self.wins += 1,
            BetResult::Lost => self.losses += 1,
            BetResult::NoBet => self.no_bet += 1,
        }
        match side {
            Some(Side::Tai) => self.tai += 1,
            Some(Side::Xiu) => self.xiu += 1,
            None => self.house += 1,
        }
    }
}

/// Handle the sim command.
///
/// Plays `rounds` rounds on a seeded table. Each round the bettor named by
/// `strategy` may place one bet of `stake` (capped at the balance), then the
/// round resolves immediately. Stops early once the bettor is broke.
pub fn handle_sim_command(
    rounds: u64,
    seed: Option<u64>,
    strategy: &str,
    stake: Option<u64>,
    log: Option<String>,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    if rounds == 0 {
        ui::write_error(err, "rounds must be >= 1")?;
        return Err(CliError::InvalidInput("rounds must be >= 1".to_string()));
    }
    let cfg = match config::load() {
        Ok(c) => c,
        Err(e) => {
            ui::write_error(err, &format!("Invalid configuration: {}", e))?;
            return Err(e.into());
        }
    };
    let game = cfg.game_config();
    let stake = stake.unwrap_or(game.default_chip);
    if stake == 0 {
        ui::write_error(err, "stake must be > 0")?;
        return Err(CliError::InvalidInput("stake must be > 0".to_string()));
    }
    let seed = seed.or(cfg.seed).unwrap_or_else(rand::random);
    let Some(mut bettor) = create_bettor_with_seed(strategy, stake, seed) else {
        let msg = format!(
            "Unknown strategy '{}' (expected one of: {})",
            strategy,
            taixiu_ai::STRATEGIES.join(", ")
        );
        ui::write_error(err, &msg)?;
        return Err(CliError::InvalidInput(msg));
    };

    let mut logger = match log.as_deref().map(RoundLogger::create).transpose() {
        Ok(l) => l,
        Err(e) => {
            ui::write_error(err, &format!("Failed to open round log: {}", e))?;
            return Err(CliError::Io(e));
        }
    };

    let break_after = std::env::var(BREAK_AFTER_ENV)
        .ok()
        .and_then(|v| v.parse::<u64>().ok());

    writeln!(
        out,
        "sim: rounds={} seed={} strategy={} stake={}",
        rounds,
        seed,
        bettor.name(),
        stake
    )?;

    let mut eng = Engine::with_rng(game, SeededRandom::new(seed))?;
    eng.start_round();
    let mut tally = Tally::default();

    while tally.rounds < rounds {
        if let Some(bet) = bettor.decide(&BettorView::of(&eng))
            && let Err(e) = eng.place_bet(bet.side, bet.amount, false)
        {
            if !e.is_player_recoverable() {
                return Err(e.into());
            }
            tracing::debug!(reason = %e, "simulated bet rejected");
        }
        let bets = *eng.bet_slip();

        let TickOutcome::Settled(settlement) = eng.resolve_round()? else {
            return Err(CliError::Engine("round did not settle".to_string()));
        };
        tally.record(settlement.result, settlement.side);

        if let Some(l) = logger.as_mut() {
            let rec = RoundRecord::from_settlement(l.next_id(), Some(seed), bets, &settlement);
            if let Err(e) = l.write(&rec) {
                ui::write_error(err, &format!("Failed to write round log: {}", e))?;
                return Err(CliError::Io(e));
            }
        }

        if let Some(b) = break_after
            && tally.rounds == b
            && tally.rounds < rounds
        {
            writeln!(out, "Interrupted: played {}/{}", tally.rounds, rounds)?;
            return Err(CliError::Interrupted(format!(
                "Interrupted: played {}/{}",
                tally.rounds, rounds
            )));
        }
        if eng.balance() == 0 {
            writeln!(out, "Bankrupt after {} rounds", tally.rounds)?;
            break;
        }
    }

    writeln!(out, "Simulated: {} rounds", tally.rounds)?;
    writeln!(
        out,
        "Wins: {}  Losses: {}  No bet: {}",
        tally.wins, tally.losses, tally.no_bet
    )?;
    writeln!(
        out,
        "Tài: {}  Xỉu: {}  House: {}",
        tally.tai, tally.xiu, tally.house
    )?;
    writeln!(out, "Final balance: {}", eng.balance())?;
    Ok(())
}
