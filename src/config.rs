//! Configuration types.

use std::time::Duration;

use crate::error::ConfigError;

/// Advisor front-end configuration.
#[derive(Debug, Clone)]
pub struct AdvisorConfig {
    /// Pause before a reply is shown, to look like the bot is typing.
    pub typing_delay: Duration,
    /// Open the panel (and post the welcome line) at startup.
    pub auto_open: bool,
    /// Label printed in front of bot lines.
    pub bot_name: String,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            typing_delay: Duration::from_millis(800),
            auto_open: true,
            bot_name: "Advisor".to_string(),
        }
    }
}

impl AdvisorConfig {
    /// Load from `ADVISOR_*` environment variables, defaulting anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` to resolve variable names.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let typing_delay = match lookup("ADVISOR_TYPING_DELAY_MS") {
            Some(raw) => {
                let ms: u64 = raw.trim().parse().map_err(|e| ConfigError::InvalidValue {
                    key: "ADVISOR_TYPING_DELAY_MS".to_string(),
                    message: format!("{raw:?} is not a number of milliseconds: {e}"),
                })?;
                Duration::from_millis(ms)
            }
            None => defaults.typing_delay,
        };

        let auto_open = match lookup("ADVISOR_AUTO_OPEN") {
            Some(raw) => parse_bool(&raw).ok_or_else(|| ConfigError::InvalidValue {
                key: "ADVISOR_AUTO_OPEN".to_string(),
                message: format!("{raw:?} is not a boolean"),
            })?,
            None => defaults.auto_open,
        };

        let bot_name = lookup("ADVISOR_BOT_NAME")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.bot_name);

        Ok(Self {
            typing_delay,
            auto_open,
            bot_name,
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
