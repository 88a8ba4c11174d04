//! Environment configuration

use crate::cooldown::DEFAULT_WINDOW;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MENU_PATH: &str = "data/menu.json";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be {expected}, got {value:?}")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// What to answer free text sent before any booking has started
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NudgePolicy {
    /// Reply with the how-to-book hint every time
    #[default]
    Always,
    /// Stay silent
    Silent,
}

impl NudgePolicy {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "always" => Some(NudgePolicy::Always),
            "silent" => Some(NudgePolicy::Silent),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    pub menu_path: PathBuf,
    pub nudge: NudgePolicy,
    pub menu_cooldown: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            menu_path: PathBuf::from(DEFAULT_MENU_PATH),
            nudge: NudgePolicy::default(),
            menu_cooldown: DEFAULT_WINDOW,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from any variable source; unset variables keep their defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = lookup("SALON_PORT") {
            config.port = value.trim().parse().map_err(|_| ConfigError::Invalid {
                var: "SALON_PORT",
                expected: "a port number",
                value,
            })?;
        }
        if let Some(value) = lookup("SALON_MENU_PATH") {
            config.menu_path = PathBuf::from(value);
        }
        if let Some(value) = lookup("HELP_NUDGE") {
            config.nudge = NudgePolicy::parse(&value).ok_or(ConfigError::Invalid {
                var: "HELP_NUDGE",
                expected: "`always` or `silent`",
                value,
            })?;
        }
        if let Some(value) = lookup("MENU_COOLDOWN_SECS") {
            let secs: u64 = value.trim().parse().map_err(|_| ConfigError::Invalid {
                var: "MENU_COOLDOWN_SECS",
                expected: "a whole number of seconds",
                value,
            })?;
            config.menu_cooldown = Duration::from_secs(secs);
        }

        Ok(config)
    }
}
