use std::time::Duration;

const DEFAULT_ENTRIES_BASE: &str = "https://entries.horseracingnation.com";
const DEFAULT_PROFILE_BASE: &str = "https://www.horseracingnation.com";
const DEFAULT_LOOKBACK_DAYS: i64 = 730;
const DEFAULT_REQUEST_DELAY_MS: u64 = 1000;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub entries_base_url: String,
    pub profile_base_url: String,
    /// Maximum age of a history row eligible to represent a horse's latest form.
    pub lookback_days: i64,
    pub request_delay: Duration,
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            entries_base_url: DEFAULT_ENTRIES_BASE.to_string(),
            profile_base_url: DEFAULT_PROFILE_BASE.to_string(),
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            request_delay: Duration::from_millis(DEFAULT_REQUEST_DELAY_MS),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(base) = env_string("RAILBIRD_ENTRIES_URL") {
            config.entries_base_url = base;
        }
        if let Some(base) = env_string("RAILBIRD_PROFILE_URL") {
            config.profile_base_url = base;
        }
        if let Some(days) = env_parse::<i64>("RAILBIRD_LOOKBACK_DAYS") {
            config.lookback_days = days.max(1);
        }
        if let Some(ms) = env_parse::<u64>("RAILBIRD_REQUEST_DELAY_MS") {
            config.request_delay = Duration::from_millis(ms);
        }
        if let Some(secs) = env_parse::<u64>("RAILBIRD_TIMEOUT_SECS") {
            config.request_timeout = Duration::from_secs(secs.max(1));
        }
        config
    }
}

fn env_string(name: &str) -> Option<String> {
    let value = std::env::var(name).ok()?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.trim_end_matches('/').to_string())
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|val| val.trim().parse::<T>().ok())
}
