//! # Play Command
//!
//! Interactive Tài/Xỉu table driven from stdin. The countdown only moves when
//! the player asks it to (`wait`, `roll`), so a session can be scripted and
//! replayed line for line.
//!
//! Engine notifications are collected with an [`EventLog`] and rendered after
//! every input line.

use crate::config;
use crate::error::CliError;
use crate::formatters::{
    format_bets, format_dice, format_history_row, format_settlement, format_stats, format_strip,
    side_label,
};
use crate::io_utils::read_stdin_line;
use crate::ui;
use crate::validation::{ParseResult, PlayInput, parse_play_input};
use std::io::{BufRead, Write};
use taixiu_engine::engine::{Engine, TickOutcome};
use taixiu_engine::events::{EventLog, RoundEvent};
use taixiu_engine::rng::{RandomSource, SecureRandom, SeededRandom};
use taixiu_engine::round::RoundState;

type TableEngine = Engine<Box<dyn RandomSource>>;

const HELP: &str = "\
Commands:
  tai | xiu          bet the selected chip (everything when all-in is armed)
  tai N | xiu N      bet N
  chip N             select chip N
  allin              arm all-in for the next bet
  wait [N]           let N seconds pass (default 1)
  roll               close betting now and roll
  open               lift the bowl (manual-open mode)
  manual             toggle manual-open mode
  history            recent results and win rates
  balance            balance and current bets
  q                  quit";

/// Handle the play command.
///
/// `seed` and `manual` override the resolved configuration. Reads commands
/// from `stdin` until `q` or EOF.
///
/// # Errors
///
/// Configuration problems, I/O failures and engine invariant violations.
/// Rejected bets are shown to the player and never end the session.
pub fn handle_play_command(
    seed: Option<u64>,
    manual: bool,
    out: &mut dyn Write,
    err: &mut dyn Write,
    stdin: &mut dyn BufRead,
) -> Result<(), CliError> {
    let cfg = match config::load() {
        Ok(c) => c,
        Err(e) => {
            ui::write_error(err, &format!("Invalid configuration: {}", e))?;
            return Err(e.into());
        }
    };
    let seed = seed.or(cfg.seed);
    let manual = manual || cfg.manual_open;

    let rng: Box<dyn RandomSource> = match seed {
        Some(s) => Box::new(SeededRandom::new(s)),
        None => {
            let secure = SecureRandom::new();
            if secure.is_degraded() {
                ui::display_warning(err, "OS entropy unavailable, using fallback generator")?;
            }
            Box::new(secure)
        }
    };
    let mut eng: TableEngine = Engine::with_rng(cfg.game_config(), rng)?;
    let log = EventLog::new();
    eng.subscribe(log.clone());
    eng.set_manual_open_mode(manual);

    let seed_label = seed.map_or_else(|| "os".to_string(), |s| s.to_string());
    writeln!(out, "play: seed={} manual={}", seed_label, manual)?;
    writeln!(out, "Balance: {}", eng.balance())?;

    eng.start_round();
    let mut view = Renderer::default();
    view.render(&eng, log.drain(), out, err)?;

    loop {
        ui::write_prompt(out, &prompt(&eng))?;
        let Some(line) = read_stdin_line(stdin) else {
            writeln!(out)?;
            break;
        };
        if line.is_empty() {
            continue;
        }
        match parse_play_input(&line) {
            ParseResult::Input(PlayInput::Quit) => break,
            ParseResult::Input(input) => apply(&mut eng, input, out, err)?,
            ParseResult::Invalid(msg) => ui::write_error(err, &msg)?,
        }
        view.render(&eng, log.drain(), out, err)?;
    }

    writeln!(out, "Session ended. Balance: {}", eng.balance())?;
    Ok(())
}

fn apply(
    eng: &mut TableEngine,
    input: PlayInput,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    match input {
        PlayInput::Bet { side, amount } => {
            let placed = match amount {
                Some(n) => eng.place_bet(side, n, false).map(|_| n),
                None => eng.bet_on(side),
            };
            match placed {
                Ok(n) => writeln!(out, "Bet {} on {}", n, side_label(side))?,
                // rejection is rendered from the event log
                Err(e) if e.is_player_recoverable() => {}
                Err(e) => return Err(e.into()),
            }
        }
        PlayInput::Chip(n) => {
            match eng.set_selected_chip(n) {
                Ok(()) => writeln!(out, "Chip: {}", n)?,
                Err(e) => ui::write_error(err, &e.to_string())?,
            }
        }
        PlayInput::AllIn => {
            eng.set_all_in_mode(true);
            writeln!(out, "All-in armed")?;
        }
        PlayInput::Wait(n) => {
            for _ in 0..n {
                if !matches!(eng.tick()?, TickOutcome::Counting { .. }) {
                    break;
                }
            }
            if eng.state() == RoundState::Betting {
                writeln!(out, "Time left: {}s", eng.time_remaining())?;
            }
        }
        PlayInput::Roll => match eng.state() {
            RoundState::Betting => {
                eng.resolve_round()?;
            }
            RoundState::Results => ui::write_error(err, "Dice already rolled, type 'open'")?,
            state => ui::write_error(err, &format!("Cannot roll while {}", state))?,
        },
        PlayInput::Open => {
            if eng.state() == RoundState::Results {
                eng.reveal_open()?;
            } else {
                ui::write_error(err, "Nothing to reveal")?;
            }
        }
        PlayInput::ToggleManual => {
            let enabled = !eng.manual_open_mode();
            eng.set_manual_open_mode(enabled);
            writeln!(out, "Manual open: {}", if enabled { "on" } else { "off" })?;
        }
        PlayInput::History => {
            let entries = eng.history(None);
            if entries.is_empty() {
                writeln!(out, "No results yet")?;
            } else {
                writeln!(out, "Recent: {}", format_strip(&entries))?;
                writeln!(out, "{}", format_stats(&eng.history_log().stats()))?;
                for e in entries.iter().take(5) {
                    writeln!(out, "  {}", format_history_row(e))?;
                }
            }
        }
        PlayInput::Balance => {
            writeln!(out, "Balance: {}", eng.balance())?;
            writeln!(out, "Bets: {}", format_bets(eng.bet_slip()))?;
        }
        PlayInput::Help => writeln!(out, "{}", HELP)?,
        PlayInput::Quit => {}
    }
    Ok(())
}

fn prompt(eng: &TableEngine) -> String {
    let mut p = match eng.state() {
        RoundState::Betting => format!("[{}s", eng.time_remaining()),
        RoundState::Results => "[bowl down".to_string(),
        state => format!("[{}", state),
    };
    p.push_str(&format!(" | chip {}", eng.selected_chip()));
    if eng.all_in_mode() {
        p.push_str(" | ALL-IN");
    }
    p.push_str("] > ");
    p
}

/// Turns engine events into output lines. In manual-open mode the dice stay
/// hidden until settlement.
#[derive(Debug, Default)]
struct Renderer {
    hidden: bool,
}

impl Renderer {
    fn render(
        &mut self,
        eng: &TableEngine,
        events: Vec<RoundEvent>,
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> std::io::Result<()> {
        for event in events {
            match event {
                RoundEvent::RoundStarted { session_id } => {
                    writeln!(
                        out,
                        "Round {} started ({}s to bet)",
                        session_id,
                        eng.config().betting_window
                    )?;
                }
                RoundEvent::BetRejected { message, .. } => {
                    writeln!(err, "Bet rejected: {}", message)?;
                }
                RoundEvent::DiceRevealed { dice } => {
                    if eng.state() == RoundState::Results {
                        self.hidden = true;
                        writeln!(out, "Bowl is down. Type 'open' to reveal.")?;
                    } else {
                        writeln!(out, "Dice: {}", format_dice(dice))?;
                    }
                }
                RoundEvent::Settled(s) => {
                    if std::mem::take(&mut self.hidden) {
                        writeln!(out, "Dice: {}", format_dice(s.dice))?;
                    }
                    for line in format_settlement(&s) {
                        writeln!(out, "{}", line)?;
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Cursor;

    fn play(seed: u64, manual: bool, input: &str) -> (Result<(), CliError>, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let mut stdin = Cursor::new(input.as_bytes());
        let res = handle_play_command(Some(seed), manual, &mut out, &mut err, &mut stdin);
        (
            res,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    #[serial]
    fn quit_immediately() {
        let (res, out, _) = play(1, false, "q\n");
        assert!(res.is_ok());
        assert!(out.contains("play: seed=1 manual=false"));
        assert!(out.contains("started (30s to bet)"));
        assert!(out.contains("Session ended. Balance: 10000000"));
    }

    #[test]
    #[serial]
    fn bet_and_roll_settles_round() {
        let (res, out, _) = play(7, false, "tai\nroll\nbalance\nq\n");
        assert!(res.is_ok());
        assert!(out.contains("Bet 10000 on TÀI"));
        assert!(out.contains("Dice: "));
        assert!(out.contains("Result: "));
        assert!(out.contains("Win 10000") || out.contains("Win 20000") || out.contains("Loss"));
        // a new round opens after settlement
        assert_eq!(out.matches(" started (30s to bet)").count(), 2);
        assert!(out.contains("Bets: no bets"));
    }

    #[test]
    #[serial]
    fn manual_mode_hides_dice_until_open() {
        let (res, out, err) = play(3, true, "xiu 500\nroll\ntai\nopen\nq\n");
        assert!(res.is_ok());
        let bowl = out.find("Bowl is down").expect("bowl message");
        let dice = out.find("Dice: ").expect("dice line");
        assert!(bowl < dice);
        assert!(err.contains("Bet rejected: Betting time over (round is results)"));
    }

    #[test]
    #[serial]
    fn invalid_lines_do_not_end_session() {
        let (res, out, err) = play(2, false, "fold\nchip 0\ntai 99999999999\nchip 50000\nq\n");
        assert!(res.is_ok());
        assert!(err.contains("Unrecognized input"));
        assert!(err.contains("Chip amount must be positive"));
        assert!(err.contains("Bet rejected: Insufficient balance"));
        assert!(out.contains("Chip: 50000"));
        assert!(out.contains("Session ended. Balance: 10000000"));
    }

    #[test]
    #[serial]
    fn wait_counts_down_and_all_in() {
        let (res, out, err) = play(4, false, "wait 5\nallin\nxiu\nbalance\ntai 1\nq\n");
        assert!(res.is_ok());
        assert!(out.contains("Time left: 25s"));
        assert!(out.contains("Bet 10000000 on XỈU"));
        assert!(out.contains("Balance: 0"));
        assert!(err.contains("Insufficient balance"));
    }

    #[test]
    #[serial]
    fn history_after_rounds() {
        let (res, out, _) = play(5, false, "history\nroll\nroll\nroll\nhistory\nq\n");
        assert!(res.is_ok());
        assert!(out.contains("No results yet"));
        assert!(out.contains("Recent: "));
        assert!(out.contains("Tài "));
    }

    #[test]
    #[serial]
    fn eof_ends_session() {
        let (res, out, _) = play(6, false, "tai 100\n");
        assert!(res.is_ok());
        assert!(out.contains("Session ended. Balance: 9999900"));
    }
}
