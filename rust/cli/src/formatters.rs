//! Text rendering of dice, sides and history for the terminal.
//!
//! Dice use the Unicode die faces (⚀..⚅) where the terminal can show them and
//! plain digits otherwise.

use taixiu_engine::dice::DiceRoll;
use taixiu_engine::events::{BetResult, Settlement};
use taixiu_engine::history::{HistoryEntry, HistoryStats};
use taixiu_engine::ledger::{BetSlip, Side};

/// Number of results shown in the compact history strip.
pub const STRIP_LEN: usize = 12;

/// On Windows only modern terminals render the die faces; elsewhere assume
/// they do.
pub fn supports_unicode() -> bool {
    if cfg!(windows) {
        std::env::var("WT_SESSION").is_ok()
            || std::env::var("TERM_PROGRAM").is_ok()
            || std::env::var("VSCODE_INJECTION").is_ok()
    } else {
        true
    }
}

/// `⚃ ⚄ ⚅ (15)`, or `4 5 6 (15)` without Unicode support.
pub fn format_dice(dice: DiceRoll) -> String {
    format_dice_with(dice, supports_unicode())
}

fn format_dice_with(dice: DiceRoll, unicode: bool) -> String {
    let faces = if unicode {
        dice.to_string()
    } else {
        let [a, b, c] = dice.values();
        format!("{} {} {}", a, b, c)
    };
    format!("{} ({})", faces, dice.sum())
}

pub fn side_label(side: Side) -> &'static str {
    match side {
        Side::Tai => "TÀI",
        Side::Xiu => "XỈU",
    }
}

/// Winning side, or the house on a triple.
pub fn outcome_label(side: Option<Side>) -> &'static str {
    side.map_or("HOUSE (triple)", side_label)
}

/// Lines describing a settled round from the player's point of view.
pub fn format_settlement(s: &Settlement) -> Vec<String> {
    let mut lines = vec![format!("Result: {}", outcome_label(s.side))];
    match s.result {
        BetResult::Won => lines.push(format!("Win {}", s.winnings)),
        BetResult::Lost => lines.push("Loss".to_string()),
        BetResult::NoBet => {}
    }
    lines.push(format!("Balance: {}", s.balance));
    lines
}

pub fn format_bets(bets: &BetSlip) -> String {
    if bets.is_empty() {
        return "no bets".to_string();
    }
    bets.entries()
        .map(|(side, amount)| format!("{} {}", side_label(side), amount))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Newest-first strip of `T`/`X` marks.
pub fn format_strip(entries: &[HistoryEntry]) -> String {
    entries
        .iter()
        .take(STRIP_LEN)
        .map(|e| match e.side {
            Side::Tai => "T",
            Side::Xiu => "X",
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn format_stats(stats: &HistoryStats) -> String {
    format!(
        "Tài {} ({:.1}%) | Xỉu {} ({:.1}%)",
        stats.tai,
        stats.tai_percent(),
        stats.xiu,
        stats.xiu_percent()
    )
}

/// One row of the detailed history list: short id, dice and winner.
pub fn format_history_row(e: &HistoryEntry) -> String {
    format!(
        "#{} {} {}",
        e.session_id.short(),
        format_dice(e.dice),
        side_label(e.side)
    )
}
