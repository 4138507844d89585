//! Dice RNG sampling command.
//!
//! Prints a handful of rolls from the same random source the table uses, so a
//! seed can be checked for reproducibility or the OS source for health.

use crate::error::CliError;
use crate::formatters::{format_dice, outcome_label};
use crate::ui;
use std::io::Write;
use taixiu_engine::dice::roll_dice;
use taixiu_engine::outcome::classify;
use taixiu_engine::rng::{RandomSource, SecureRandom, SeededRandom};

pub fn handle_rng_command(
    seed: Option<u64>,
    rolls: usize,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    if rolls == 0 {
        ui::write_error(err, "rolls must be >= 1")?;
        return Err(CliError::InvalidInput("rolls must be >= 1".to_string()));
    }
    let mut rng: Box<dyn RandomSource> = match seed {
        Some(s) => {
            writeln!(out, "RNG sample (seed {}):", s)?;
            Box::new(SeededRandom::new(s))
        }
        None => {
            let secure = SecureRandom::new();
            if secure.is_degraded() {
                ui::display_warning(err, "OS entropy unavailable, using fallback generator")?;
            }
            writeln!(out, "RNG sample (os entropy):")?;
            Box::new(secure)
        }
    };
    for _ in 0..rolls {
        let dice = roll_dice(&mut rng);
        writeln!(
            out,
            "  {}  {}",
            format_dice(dice),
            outcome_label(classify(dice).side)
        )?;
    }
    Ok(())
}
