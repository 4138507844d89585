//! # Tài/Xỉu CLI Library
//!
//! Command-line front end for the Tài/Xỉu round engine: an interactive table,
//! a batch simulator, configuration inspection and an RNG sampler.
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::io;
//! let args = vec!["taixiu", "sim", "--rounds", "100", "--seed", "7"];
//! let code = taixiu_cli::run(args, &mut io::stdout(), &mut io::stderr());
//! assert_eq!(code, 0);
//! ```
//!
//! ## Available Subcommands
//!
//! - `play`: Interactive table reading commands from stdin
//! - `sim`: Automated rounds with a betting strategy, optional JSONL log
//! - `cfg`: Display resolved configuration and value sources
//! - `rng`: Print sample dice rolls

use clap::Parser;
use std::io::Write;

#[macro_use]
mod macros;

pub mod cli;
pub mod commands;
pub mod config;
mod error;
pub mod exit_code;
pub mod formatters;
pub mod io_utils;
pub mod logging;
pub mod round_log;
pub mod ui;
pub mod validation;

use cli::{Commands, TaixiuCli};
use commands::{handle_cfg_command, handle_play_command, handle_rng_command, handle_sim_command};

pub use error::CliError;

const COMMANDS: &[&str] = &["play", "sim", "cfg", "rng"];

/// Main entry point for the CLI application.
///
/// Parses `args` and dispatches to the matching command handler.
///
/// # Returns
///
/// Exit code: `0` for success, `2` for errors, `130` for interruptions
///
/// # Example
///
/// ```
/// use std::io;
/// let args = vec!["taixiu", "rng", "--seed", "42"];
/// let code = taixiu_cli::run(args, &mut io::stdout(), &mut io::stderr());
/// assert_eq!(code, 0);
/// ```
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    let cli = match TaixiuCli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => return usage_error(e, out, err),
    };

    let result = match cli.cmd {
        Commands::Cfg => handle_cfg_command(out, err),
        Commands::Play { seed, manual } => {
            let stdin = std::io::stdin();
            let mut stdin_lock = stdin.lock();
            handle_play_command(seed, manual, out, err, &mut stdin_lock)
        }
        Commands::Sim {
            rounds,
            seed,
            strategy,
            stake,
            log,
        } => handle_sim_command(rounds, seed, &strategy, stake, log, out, err),
        Commands::Rng { seed, rolls } => handle_rng_command(seed, rolls, out, err),
    };

    match result {
        Ok(()) => exit_code::SUCCESS,
        // handlers report input problems themselves
        Err(e @ (CliError::InvalidInput(_) | CliError::Config(_) | CliError::Interrupted(_))) => {
            e.exit_code()
        }
        Err(e) => {
            write_or_exit!(err, "Error: {}", e);
            e.exit_code()
        }
    }
}

fn usage_error(e: clap::Error, out: &mut dyn Write, err: &mut dyn Write) -> i32 {
    use clap::error::ErrorKind;

    // help and version go to stdout with success
    if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
        if write!(out, "{}", e).is_err() {
            return exit_code::ERROR;
        }
        return exit_code::SUCCESS;
    }

    write_or_exit!(err, "{}", e);
    write_or_exit!(err, "Tài/Xỉu CLI");
    write_or_exit!(err, "Usage: taixiu <command> [options]\n");
    write_or_exit!(err, "Commands:");
    for c in COMMANDS {
        write_or_exit!(err, "  {}", c);
    }
    write_or_exit!(err, "\nFor full help, run: taixiu --help");
    exit_code::ERROR
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_capture(args: &[&str]) -> (i32, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let code = run(args, &mut out, &mut err);
        (
            code,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn help_goes_to_stdout() {
        let (code, out, err) = run_capture(&["taixiu", "--help"]);
        assert_eq!(code, 0);
        assert!(out.contains("sim"));
        assert!(err.is_empty());
    }

    #[test]
    fn unknown_command_lists_commands() {
        let (code, _, err) = run_capture(&["taixiu", "deal"]);
        assert_eq!(code, 2);
        for c in COMMANDS {
            assert!(err.contains(&format!("  {}", c)));
        }
    }

    #[test]
    fn rng_dispatch() {
        let (code, out, _) = run_capture(&["taixiu", "rng", "--seed", "1", "--rolls", "2"]);
        assert_eq!(code, 0);
        assert_eq!(out.lines().count(), 3);
    }

    #[test]
    fn rng_zero_rolls_reports_once() {
        let (code, _, err) = run_capture(&["taixiu", "rng", "--rolls", "0"]);
        assert_eq!(code, 2);
        assert_eq!(err.matches("Error:").count(), 1);
    }
}
