//! Table configuration for CLI sessions.
//!
//! Values resolve in three layers: built-in defaults, then a TOML file named
//! by `TAIXIU_CONFIG`, then the `TAIXIU_*` environment variables. Each value
//! remembers which layer set it so `cfg` can report it.

use serde::{Deserialize, Serialize};
use std::fs;

use taixiu_engine::config::{BETTING_WINDOW, GameConfig, STARTING_BALANCE};

pub const CONFIG_ENV: &str = "TAIXIU_CONFIG";
pub const SEED_ENV: &str = "TAIXIU_SEED";
pub const BETTING_WINDOW_ENV: &str = "TAIXIU_BETTING_WINDOW";
pub const STARTING_BALANCE_ENV: &str = "TAIXIU_STARTING_BALANCE";
pub const MANUAL_OPEN_ENV: &str = "TAIXIU_MANUAL_OPEN";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub seed: Option<u64>,
    pub betting_window: u32,
    pub starting_balance: u64,
    pub manual_open: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: None,
            betting_window: BETTING_WINDOW,
            starting_balance: STARTING_BALANCE,
            manual_open: false,
        }
    }
}

impl Config {
    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            betting_window: self.betting_window,
            starting_balance: self.starting_balance,
            ..GameConfig::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy)]
pub struct ConfigSources {
    pub seed: ValueSource,
    pub betting_window: ValueSource,
    pub starting_balance: ValueSource,
    pub manual_open: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            seed: ValueSource::Default,
            betting_window: ValueSource::Default,
            starting_balance: ValueSource::Default,
            manual_open: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: Config,
    pub sources: ConfigSources,
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read config file: {}", e),
            ConfigError::Parse(e) => write!(f, "cannot parse config file: {}", e),
            ConfigError::Invalid(msg) => f.write_str(msg),
        }
    }
}

pub fn load() -> Result<Config, ConfigError> {
    load_with_sources().map(|resolved| resolved.config)
}

pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    let mut cfg = Config::default();
    let mut sources = ConfigSources::default();

    if let Ok(path) = std::env::var(CONFIG_ENV)
        && !path.is_empty()
    {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        if let Some(v) = f.seed {
            cfg.seed = Some(v);
            sources.seed = ValueSource::File;
        }
        if let Some(v) = f.betting_window {
            cfg.betting_window = v;
            sources.betting_window = ValueSource::File;
        }
        if let Some(v) = f.starting_balance {
            cfg.starting_balance = v;
            sources.starting_balance = ValueSource::File;
        }
        if let Some(v) = f.manual_open {
            cfg.manual_open = v;
            sources.manual_open = ValueSource::File;
        }
    }

    if let Ok(seed) = std::env::var(SEED_ENV)
        && !seed.is_empty()
    {
        cfg.seed = Some(
            seed.parse()
                .map_err(|_| ConfigError::Invalid("Invalid seed".into()))?,
        );
        sources.seed = ValueSource::Env;
    }
    if let Ok(window) = std::env::var(BETTING_WINDOW_ENV)
        && !window.is_empty()
    {
        cfg.betting_window = window
            .parse()
            .map_err(|_| ConfigError::Invalid("Invalid betting window".into()))?;
        sources.betting_window = ValueSource::Env;
    }
    if let Ok(balance) = std::env::var(STARTING_BALANCE_ENV)
        && !balance.is_empty()
    {
        cfg.starting_balance = balance
            .parse()
            .map_err(|_| ConfigError::Invalid("Invalid starting balance".into()))?;
        sources.starting_balance = ValueSource::Env;
    }
    if let Ok(manual) = std::env::var(MANUAL_OPEN_ENV)
        && !manual.is_empty()
    {
        cfg.manual_open =
            parse_bool(&manual).ok_or_else(|| ConfigError::Invalid("Invalid manual_open".into()))?;
        sources.manual_open = ValueSource::Env;
    }

    validate(&cfg)?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

#[derive(Debug, Deserialize)]
struct FileConfig {
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    betting_window: Option<u32>,
    #[serde(default)]
    starting_balance: Option<u64>,
    #[serde(default)]
    manual_open: Option<bool>,
}

fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.betting_window == 0 {
        return Err(ConfigError::Invalid(
            "Invalid configuration: betting_window must be >0".into(),
        ));
    }
    if cfg.starting_balance == 0 {
        return Err(ConfigError::Invalid(
            "Invalid configuration: starting_balance must be >0".into(),
        ));
    }
    Ok(())
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_engine_constants() {
        let cfg = Config::default();
        assert_eq!(cfg.betting_window, 30);
        assert_eq!(cfg.starting_balance, 10_000_000);
        assert!(!cfg.manual_open);
        let game = cfg.game_config();
        assert_eq!(game.betting_window, 30);
        assert!(game.validate().is_ok());
    }

    #[test]
    fn parse_bool_variants() {
        assert_eq!(parse_bool("YES"), Some(true));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn zero_window_is_invalid() {
        let cfg = Config {
            betting_window: 0,
            ..Config::default()
        };
        assert!(matches!(validate(&cfg), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn file_config_accepts_partial_tables() {
        let f: FileConfig = toml::from_str("betting_window = 5\n").unwrap();
        assert_eq!(f.betting_window, Some(5));
        assert!(f.seed.is_none());
    }
}
