//! Configuration command handler.
//!
//! Prints the resolved configuration as pretty JSON:
//!
//! ```json
//! {
//!   "betting_window": {
//!     "value": 30,
//!     "source": "default"
//!   },
//!   ...
//! }
//! ```

use crate::config;
use crate::error::CliError;
use crate::ui;
use std::io::Write;

pub fn handle_cfg_command(out: &mut dyn Write, err: &mut dyn Write) -> Result<(), CliError> {
    let resolved = match config::load_with_sources() {
        Ok(r) => r,
        Err(e) => {
            ui::write_error(err, &format!("Invalid configuration: {}", e))?;
            return Err(CliError::Config(format!("Invalid configuration: {}", e)));
        }
    };

    let config::ConfigResolved { config, sources } = resolved;
    let display = serde_json::json!({
        "seed": {
            "value": config.seed,
            "source": sources.seed,
        },
        "betting_window": {
            "value": config.betting_window,
            "source": sources.betting_window,
        },
        "starting_balance": {
            "value": config.starting_balance,
            "source": sources.starting_balance,
        },
        "manual_open": {
            "value": config.manual_open,
            "source": sources.manual_open,
        }
    });
    let json_str = serde_json::to_string_pretty(&display).map_err(std::io::Error::other)?;
    writeln!(out, "{}", json_str)?;
    Ok(())
}
