//! Parsing of interactive `play` input lines.

use std::str::FromStr;

use taixiu_engine::ledger::Side;

/// One parsed line of `play` input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayInput {
    /// Bet on a side; `None` uses the selected chip (or all-in when armed)
    Bet { side: Side, amount: Option<u64> },
    Chip(u64),
    AllIn,
    /// Advance the countdown by this many ticks
    Wait(u32),
    /// Run the countdown out
    Roll,
    Open,
    ToggleManual,
    History,
    Balance,
    Help,
    Quit,
}

/// Outcome of parsing one input line.
#[derive(Debug, PartialEq, Eq)]
pub enum ParseResult {
    Input(PlayInput),
    Invalid(String),
}

/// Parses a `play` input line (case-insensitive).
///
/// ```rust
/// # use taixiu_cli::validation::{parse_play_input, ParseResult, PlayInput};
/// use taixiu_engine::ledger::Side;
///
/// assert_eq!(
///     parse_play_input("tai 5000"),
///     ParseResult::Input(PlayInput::Bet { side: Side::Tai, amount: Some(5000) })
/// );
/// assert_eq!(parse_play_input("q"), ParseResult::Input(PlayInput::Quit));
/// assert!(matches!(parse_play_input("fold"), ParseResult::Invalid(_)));
/// ```
pub fn parse_play_input(input: &str) -> ParseResult {
    let input = input.trim().to_lowercase();
    let parts: Vec<&str> = input.split_whitespace().collect();
    let Some(&head) = parts.first() else {
        return ParseResult::Invalid("Empty input".to_string());
    };
    if parts.len() > 2 {
        return ParseResult::Invalid(format!("Too many arguments: '{}'", input));
    }
    let arg = parts.get(1).copied();

    let parsed = match head {
        "q" | "quit" | "exit" => no_arg(arg, PlayInput::Quit),
        "allin" | "all-in" => no_arg(arg, PlayInput::AllIn),
        "roll" => no_arg(arg, PlayInput::Roll),
        "open" | "reveal" => no_arg(arg, PlayInput::Open),
        "manual" => no_arg(arg, PlayInput::ToggleManual),
        "history" | "h" => no_arg(arg, PlayInput::History),
        "balance" | "b" => no_arg(arg, PlayInput::Balance),
        "help" | "?" => no_arg(arg, PlayInput::Help),
        "chip" => match arg {
            Some(a) => positive(a, "chip").map(PlayInput::Chip),
            None => Err("Chip requires an amount (e.g., 'chip 50000')".to_string()),
        },
        "wait" | "w" => match arg {
            Some(a) => match a.parse::<u32>() {
                Ok(n) if n > 0 => Ok(PlayInput::Wait(n)),
                _ => Err(format!("Invalid tick count: '{}'", a)),
            },
            None => Ok(PlayInput::Wait(1)),
        },
        word => match Side::from_str(word) {
            Ok(side) => match arg {
                Some(a) => positive(a, "bet").map(|n| PlayInput::Bet {
                    side,
                    amount: Some(n),
                }),
                None => Ok(PlayInput::Bet { side, amount: None }),
            },
            Err(_) => Err(format!("Unrecognized input: '{}'", word)),
        },
    };

    match parsed {
        Ok(i) => ParseResult::Input(i),
        Err(msg) => ParseResult::Invalid(msg),
    }
}

fn no_arg(arg: Option<&str>, input: PlayInput) -> Result<PlayInput, String> {
    match arg {
        None => Ok(input),
        Some(a) => Err(format!("Unexpected argument: '{}'", a)),
    }
}

fn positive(s: &str, what: &str) -> Result<u64, String> {
    match s.replace(['_', ','], "").parse::<u64>() {
        Ok(0) => Err(format!("{} amount must be positive", capitalize(what))),
        Ok(n) => Ok(n),
        Err(_) => Err(format!("Invalid {} amount: '{}'", what, s)),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
