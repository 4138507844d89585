//! Error types for the CLI application.

use std::fmt;

use taixiu_engine::errors::GameError;

use crate::config::ConfigError;

/// Custom error type for CLI operations.
///
/// Covers everything that can go wrong while running a command so handlers
/// can propagate with `?`.
#[derive(Debug)]
pub enum CliError {
    /// I/O error (file operations, stdout/stderr writes, etc.)
    Io(std::io::Error),

    /// Invalid user input or command-line arguments
    InvalidInput(String),

    /// Configuration error
    Config(String),

    /// Engine-related error
    Engine(String),

    /// Operation was interrupted before completing
    Interrupted(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Io(e) => write!(f, "I/O error: {}", e),
            CliError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Engine(msg) => write!(f, "Engine error: {}", msg),
            CliError::Interrupted(msg) => write!(f, "Interrupted: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(error: std::io::Error) -> Self {
        CliError::Io(error)
    }
}

impl From<GameError> for CliError {
    fn from(error: GameError) -> Self {
        CliError::Engine(error.to_string())
    }
}

impl From<ConfigError> for CliError {
    fn from(error: ConfigError) -> Self {
        CliError::Config(error.to_string())
    }
}

impl From<String> for CliError {
    fn from(error: String) -> Self {
        CliError::Engine(error)
    }
}

impl From<&str> for CliError {
    fn from(error: &str) -> Self {
        CliError::Engine(error.to_string())
    }
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Interrupted(_) => crate::exit_code::INTERRUPTED,
            _ => crate::exit_code::ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taixiu_engine::round::RoundState;

    #[test]
    fn engine_errors_keep_their_message() {
        let e: CliError = GameError::InvalidTransition {
            operation: "settle_round",
            state: RoundState::Betting,
        }
        .into();
        assert!(e.to_string().starts_with("Engine error: Invalid transition"));
        assert_eq!(e.exit_code(), 2);
    }

    #[test]
    fn interrupted_maps_to_130() {
        assert_eq!(CliError::Interrupted("stop".into()).exit_code(), 130);
    }

    #[test]
    fn io_error_has_source() {
        use std::error::Error;
        let e = CliError::from(std::io::Error::other("disk"));
        assert!(e.source().is_some());
        assert!(CliError::from("x").source().is_none());
    }
}
