//! Command-line argument definitions.

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "taixiu",
    version,
    about = "Tài/Xỉu (Over/Under) dice table in the terminal"
)]
pub struct TaixiuCli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Play interactively; type 'help' at the prompt for commands
    Play {
        /// Seed the dice for a reproducible session
        #[arg(long)]
        seed: Option<u64>,
        /// Keep the bowl down after each roll until 'open'
        #[arg(long)]
        manual: bool,
    },
    /// Run rounds with an automated bettor and print a summary
    Sim {
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        rounds: u64,
        #[arg(long)]
        seed: Option<u64>,
        /// flat, follow, contrarian or random
        #[arg(long, default_value = "flat")]
        strategy: String,
        /// Amount bet each round (defaults to the table chip)
        #[arg(long)]
        stake: Option<u64>,
        /// Write one JSON line per settled round to this file
        #[arg(long)]
        log: Option<String>,
    },
    /// Show resolved configuration and where each value came from
    Cfg,
    /// Print sample dice rolls
    Rng {
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, default_value_t = 5)]
        rolls: usize,
    },
}
