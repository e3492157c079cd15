use std::collections::BTreeSet;
use std::env;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_API_URL: &str = "https://v3.football.api-sports.io";
pub const DEFAULT_TELEGRAM_URL: &str = "https://api.telegram.org";
pub const DEFAULT_TIMEZONE: &str = "Europe/Lisbon";

/// Leagues that get alerts when `LEAGUE_IDS` is not set.
pub const DEFAULT_PRIORITY_LEAGUES: [u32; 20] = [
    39, 140, 61, 78, 135, 94, 88, 71, 179, 144, 141, 40, 262, 301, 235, 253, 556, 128, 569, 307,
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} must be {expected}, got '{value}'")]
    Invalid {
        key: &'static str,
        expected: &'static str,
        value: String,
    },
    #[error("{0} not set")]
    Missing(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPolicy {
    /// One query for every fixture today, off-list leagues capped.
    Global { exploratory_cap: usize },
    /// One query per priority league.
    PerLeague,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleMode {
    DailyAt { hour: u32 },
    Every(Duration),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub api_url: String,
    pub telegram_token: Option<String>,
    pub telegram_chat_id: Option<String>,
    pub telegram_url: String,
    /// Sorted and deduplicated.
    pub priority_leagues: Vec<u32>,
    pub season_override: Option<i32>,
    pub timezone: String,
    pub scan_policy: ScanPolicy,
    pub schedule: ScheduleMode,
    pub startup_delay: Duration,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let priority_leagues = match get("LEAGUE_IDS") {
            Some(raw) => {
                let parsed = parse_league_ids(&raw);
                if parsed.is_empty() {
                    tracing::warn!("LEAGUE_IDS='{}' has no valid ids, no league will get alerts", raw);
                }
                parsed
            }
            None => default_leagues(),
        };

        let scan_policy = match get("SCAN_MODE").as_deref() {
            None | Some("global") => ScanPolicy::Global {
                exploratory_cap: parse_or(&get, "EXPLORATORY_CAP", "a non-negative integer", 50usize)?,
            },
            Some("per_league") => ScanPolicy::PerLeague,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "SCAN_MODE",
                    expected: "'global' or 'per_league'",
                    value: other.to_string(),
                })
            }
        };

        let schedule = match get("SCHEDULE_MODE").as_deref() {
            None | Some("daily") => {
                let hour: u32 = parse_or(&get, "RUN_HOUR", "an hour between 0 and 23", 9)?;
                if hour > 23 {
                    return Err(ConfigError::Invalid {
                        key: "RUN_HOUR",
                        expected: "an hour between 0 and 23",
                        value: hour.to_string(),
                    });
                }
                ScheduleMode::DailyAt { hour }
            }
            Some("interval") => {
                let hours: u64 = parse_or(&get, "RUN_INTERVAL_HOURS", "a positive integer", 24)?;
                if hours == 0 {
                    return Err(ConfigError::Invalid {
                        key: "RUN_INTERVAL_HOURS",
                        expected: "a positive integer",
                        value: "0".to_string(),
                    });
                }
                ScheduleMode::Every(Duration::from_secs(hours * 3600))
            }
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "SCHEDULE_MODE",
                    expected: "'daily' or 'interval'",
                    value: other.to_string(),
                })
            }
        };

        let season_override = match get("SEASON") {
            Some(raw) => Some(raw.parse::<i32>().map_err(|_| ConfigError::Invalid {
                key: "SEASON",
                expected: "a year",
                value: raw.clone(),
            })?),
            None => None,
        };

        Ok(Self {
            api_key: get("API_SPORTS_KEY"),
            api_url: get("API_SPORTS_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            telegram_token: get("TELEGRAM_BOT_TOKEN"),
            telegram_chat_id: get("TELEGRAM_CHAT_ID"),
            telegram_url: get("TELEGRAM_API_URL").unwrap_or_else(|| DEFAULT_TELEGRAM_URL.to_string()),
            priority_leagues,
            season_override,
            timezone: get("TIMEZONE").unwrap_or_else(|| DEFAULT_TIMEZONE.to_string()),
            scan_policy,
            schedule,
            startup_delay: Duration::from_secs(parse_or(
                &get,
                "STARTUP_DELAY_SECS",
                "a number of seconds",
                10,
            )?),
            port: parse_or(&get, "PORT", "a valid port number", 8000)?,
        })
    }

    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key.as_deref().ok_or(ConfigError::Missing("API_SPORTS_KEY"))
    }
}

/// Comma-separated ids; anything that is not an unsigned integer is dropped.
pub fn parse_league_ids(raw: &str) -> Vec<u32> {
    raw.split(',')
        .filter_map(|s| s.trim().parse::<u32>().ok())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn default_leagues() -> Vec<u32> {
    let set: BTreeSet<u32> = DEFAULT_PRIORITY_LEAGUES.into_iter().collect();
    set.into_iter().collect()
}

fn parse_or<T, G>(get: &G, key: &'static str, expected: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw.parse::<T>().map_err(|_| ConfigError::Invalid { key, expected, value: raw }),
        None => Ok(default),
    }
}
