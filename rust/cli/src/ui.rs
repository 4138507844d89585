//! UI helper functions for terminal output.

use std::io::Write;

pub fn write_error(err: &mut dyn Write, msg: &str) -> std::io::Result<()> {
    writeln!(err, "Error: {}", msg)
}

/// Display a warning message to stderr with "WARNING:" prefix
pub fn display_warning(err: &mut dyn Write, message: &str) -> std::io::Result<()> {
    writeln!(err, "WARNING: {}", message)
}

pub fn write_prompt(out: &mut dyn Write, prompt: &str) -> std::io::Result<()> {
    write!(out, "{}", prompt)?;
    out.flush()
}
