//! Server configuration from the environment

use std::str::FromStr;
use std::time::Duration;
use terminal_analyst::gemini::DEFAULT_GEMINI_MODEL;
use terminal_core::{TerminalError, TerminalResult};
use terminal_services::PollingConfig;

const DEFAULT_PORT: u16 = 3001;

/// Longest accepted refresh period
const MAX_REFRESH_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub polling: PollingConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            polling: PollingConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Read overrides from the process environment
    pub fn from_env() -> TerminalResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup; unset or empty means default
    pub fn from_lookup<F>(lookup: F) -> TerminalResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let port = parse_var(&get, "SERVER_PORT")?.unwrap_or(defaults.port);

        let polling = PollingConfig {
            full_refresh_interval: parse_var(&get, "FULL_REFRESH_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.polling.full_refresh_interval),
            ticker_interval: parse_var(&get, "TICKER_REFRESH_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.polling.ticker_interval),
            boot_duration: parse_var(&get, "BOOT_DURATION_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.polling.boot_duration),
            ..defaults.polling
        };

        if polling.full_refresh_interval.is_zero() || polling.ticker_interval.is_zero() {
            return Err(TerminalError::config("Refresh intervals must be non-zero"));
        }
        if polling.full_refresh_interval > MAX_REFRESH_INTERVAL
            || polling.ticker_interval > MAX_REFRESH_INTERVAL
        {
            return Err(TerminalError::config(format!(
                "Refresh intervals must not exceed {}s",
                MAX_REFRESH_INTERVAL.as_secs()
            )));
        }

        Ok(Self {
            port,
            gemini_api_key: get("GEMINI_API_KEY"),
            gemini_model: get("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            polling,
        })
    }
}

fn parse_var<G, T>(get: &G, name: &str) -> TerminalResult<Option<T>>
where
    G: Fn(&str) -> Option<String>,
    T: FromStr,
{
    get(name)
        .map(|raw| {
            T::from_str(raw.trim())
                .map_err(|_| TerminalError::config(format!("Invalid value for {}: {}", name, raw)))
        })
        .transpose()
}
