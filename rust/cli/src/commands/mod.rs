//! Command handlers, one module per subcommand.
//!
//! Each module exposes `handle_COMMAND_command(...) -> Result<(), CliError>`
//! and takes its output streams as `&mut dyn Write` so tests can capture them.

pub mod cfg;
pub mod play;
pub mod rng;
pub mod sim;

pub use cfg::handle_cfg_command;
pub use play::handle_play_command;
pub use rng::handle_rng_command;
pub use sim::handle_sim_command;
