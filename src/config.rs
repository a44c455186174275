//! Configuration types for homework-status-bot
//!
//! Secrets come from the process environment (optionally seeded from a `.env`
//! file). Everything else has a default and can be overridden the same way.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

/// Environment key of the review API token
pub const PRACTICUM_TOKEN: &str = "PRACTICUM_TOKEN";
/// Environment key of the Telegram bot token
pub const TELEGRAM_TOKEN: &str = "TELEGRAM_TOKEN";
/// Environment key of the destination chat
pub const TELEGRAM_CHAT_ID: &str = "TELEGRAM_CHAT_ID";

const PRACTICUM_ENDPOINT: &str = "PRACTICUM_ENDPOINT";
const TELEGRAM_API_URL: &str = "TELEGRAM_API_URL";
const RETRY_TIME_SECS: &str = "RETRY_TIME_SECS";
const REQUEST_TIMEOUT_SECS: &str = "REQUEST_TIMEOUT_SECS";
const LOG_FILE: &str = "LOG_FILE";

/// The three secrets the bot cannot start without
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// OAuth token for the review API
    pub practicum_token: String,
    /// Telegram bot token
    pub telegram_token: String,
    /// Destination chat identifier (numeric id or `@channel`)
    pub telegram_chat_id: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("practicum_token", &"<redacted>")
            .field("telegram_token", &"<redacted>")
            .field("telegram_chat_id", &self.telegram_chat_id)
            .finish()
    }
}

/// Polling behavior (endpoints, interval, timeouts)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PollConfig {
    /// Review API endpoint queried every cycle
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Base URL of the Telegram Bot API
    #[serde(default = "default_telegram_api_url")]
    pub telegram_api_url: String,

    /// Pause between two poll cycles (default: 600 seconds)
    #[serde(default = "default_retry_time")]
    pub retry_time: Duration,

    /// Upper bound on a single HTTP request (default: 30 seconds)
    #[serde(default = "default_request_timeout")]
    pub request_timeout: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            telegram_api_url: default_telegram_api_url(),
            retry_time: default_retry_time(),
            request_timeout: default_request_timeout(),
        }
    }
}

/// Log sink configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// File that receives a copy of every log line, truncated at startup
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_file: default_log_file(),
        }
    }
}

/// Main configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Required secrets
    pub credentials: Credentials,
    /// Polling behavior
    pub poll: PollConfig,
    /// Log sinks
    pub logging: LoggingConfig,
}

impl Config {
    /// Create a configuration with the given secrets and default settings
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            poll: PollConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    /// Load configuration from the process environment
    ///
    /// A `.env` file in the working directory is read first if one exists;
    /// variables already set in the environment take precedence over it.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration through an arbitrary key lookup
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] listing every required secret that is unset
    /// or blank, or naming the first optional setting that does not parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let practicum_token = secret(PRACTICUM_TOKEN);
        let telegram_token = secret(TELEGRAM_TOKEN);
        let telegram_chat_id = secret(TELEGRAM_CHAT_ID);

        let (practicum_token, telegram_token, telegram_chat_id) =
            match (practicum_token, telegram_token, telegram_chat_id) {
                (Some(p), Some(t), Some(c)) => (p, t, c),
                (p, t, c) => {
                    let keys: Vec<String> = [
                        (PRACTICUM_TOKEN, p.is_none()),
                        (TELEGRAM_TOKEN, t.is_none()),
                        (TELEGRAM_CHAT_ID, c.is_none()),
                    ]
                    .into_iter()
                    .filter(|(_, missing)| *missing)
                    .map(|(key, _)| key.to_string())
                    .collect();
                    return Err(Error::Config {
                        message: format!("missing environment variables: {}", keys.join(", ")),
                        keys,
                    });
                }
            };

        let mut config = Config::new(Credentials {
            practicum_token,
            telegram_token,
            telegram_chat_id: telegram_chat_id.trim().to_string(),
        });

        if let Some(endpoint) = secret(PRACTICUM_ENDPOINT) {
            config.poll.endpoint = parse_url(PRACTICUM_ENDPOINT, &endpoint)?;
        }
        if let Some(api_url) = secret(TELEGRAM_API_URL) {
            config.poll.telegram_api_url = parse_url(TELEGRAM_API_URL, &api_url)?;
        }
        if let Some(secs) = secret(RETRY_TIME_SECS) {
            config.poll.retry_time = parse_secs(RETRY_TIME_SECS, &secs)?;
        }
        if let Some(secs) = secret(REQUEST_TIMEOUT_SECS) {
            config.poll.request_timeout = parse_secs(REQUEST_TIMEOUT_SECS, &secs)?;
        }
        if let Some(path) = secret(LOG_FILE) {
            config.logging.log_file = PathBuf::from(path);
        }

        Ok(config)
    }
}

fn parse_url(key: &str, value: &str) -> Result<String> {
    let url = url::Url::parse(value.trim())
        .map_err(|e| Error::config(format!("{} is not a valid URL: {}", key, e), key))?;
    match url.scheme() {
        "http" | "https" => Ok(url.to_string()),
        other => Err(Error::config(
            format!("{} must use http or https, got {}", key, other),
            key,
        )),
    }
}

fn parse_secs(key: &str, value: &str) -> Result<Duration> {
    match value.trim().parse::<u64>() {
        Ok(0) => Err(Error::config(format!("{} must be greater than zero", key), key)),
        Ok(secs) => Ok(Duration::from_secs(secs)),
        Err(e) => Err(Error::config(
            format!("{} must be a whole number of seconds: {}", key, e),
            key,
        )),
    }
}

fn default_endpoint() -> String {
    "https://practicum.yandex.ru/api/user_api/homework_statuses/".to_string()
}

fn default_telegram_api_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_retry_time() -> Duration {
    Duration::from_secs(600)
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_log_file() -> PathBuf {
    PathBuf::from("program.log")
}
