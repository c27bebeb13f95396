use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_LOCAL_USER_NAME: &str = "You";
pub const DEFAULT_TEAM_NAME: &str = "Our team";
pub const DEFAULT_REMINDER_PERIOD: Duration = Duration::from_secs(3600);
pub const DEFAULT_MAX_PLAYERS: usize = 11;

/// Runtime settings, read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Display name of the local user.
    pub local_user_name: String,
    /// Our team's name as it appears in imported calendars.
    pub team_name: String,
    pub reminder_period: Duration,
    /// Capacity for fixtures imported from a calendar.
    pub default_max_players: usize,
    /// Season file: `.ics` calendars are imported, anything else is read as JSON.
    pub fixtures_path: Option<PathBuf>,
    pub discord_hook_url: Option<String>,
    /// League tournament page to read standings (and, without a season file, fixtures) from.
    pub league_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            local_user_name: DEFAULT_LOCAL_USER_NAME.to_string(),
            team_name: DEFAULT_TEAM_NAME.to_string(),
            reminder_period: DEFAULT_REMINDER_PERIOD,
            default_max_players: DEFAULT_MAX_PLAYERS,
            fixtures_path: None,
            discord_hook_url: None,
            league_url: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a config from any variable source. Unset or blank variables
    /// fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Config::default();

        let reminder_period = match get("REMINDER_PERIOD_SECS") {
            Some(v) => Duration::from_secs(positive("REMINDER_PERIOD_SECS", v)?),
            None => defaults.reminder_period,
        };
        let default_max_players = match get("DEFAULT_MAX_PLAYERS") {
            Some(v) => positive("DEFAULT_MAX_PLAYERS", v)? as usize,
            None => defaults.default_max_players,
        };

        Ok(Self {
            local_user_name: get("LOCAL_USER_NAME").unwrap_or(defaults.local_user_name),
            team_name: get("TEAM_NAME").unwrap_or(defaults.team_name),
            reminder_period,
            default_max_players,
            fixtures_path: get("FIXTURES_PATH").map(PathBuf::from),
            discord_hook_url: get("DISCORD_HOOK_URL"),
            league_url: get("LEAGUE_URL"),
        })
    }
}

fn positive(name: &'static str, value: String) -> Result<u64, ConfigError> {
    match value.parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::NotPositive { name, value }),
    }
}
