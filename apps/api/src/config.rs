//! API configuration module.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults. A `.env` file in the working directory is read first, if present.

use chrono::{FixedOffset, Local};
use kasir_db::DbConfig;
use std::env;
use std::time::Duration;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// HTTP listen port
    pub port: u16,

    /// SQLite database file path
    pub db_path: String,

    /// Pool size
    pub db_max_connections: u32,

    /// How long a checkout waits for another checkout's write lock
    pub db_busy_timeout: Duration,

    /// Offset whose calendar day the daily report covers
    pub report_offset: FixedOffset,

    /// Upper bound on one checkout request; the unit of work is rolled back
    /// when it is exceeded
    pub checkout_timeout: Duration,
}

impl ApiConfig {
    /// Load configuration from `.env` and environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        // Missing .env is normal in production
        let _ = dotenvy::dotenv();
        Self::from_env()
    }

    /// Load configuration from environment variables only.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = ApiConfig {
            port: parse_var("PORT", "8080")?,

            db_path: env::var("DB_CONN").unwrap_or_else(|_| "kasir.db".to_string()),

            db_max_connections: parse_var("DB_MAX_CONNECTIONS", "5")?,

            db_busy_timeout: Duration::from_secs(parse_var("DB_BUSY_TIMEOUT_SECS", "5")?),

            report_offset: match env::var("REPORT_UTC_OFFSET") {
                Ok(raw) => parse_offset(&raw)
                    .ok_or_else(|| ConfigError::InvalidValue("REPORT_UTC_OFFSET".to_string()))?,
                Err(_) => *Local::now().offset(),
            },

            checkout_timeout: Duration::from_secs(parse_var("CHECKOUT_TIMEOUT_SECS", "10")?),
        };

        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()));
        }

        Ok(config)
    }

    /// Database settings derived from this configuration.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.db_path)
            .max_connections(self.db_max_connections)
            .busy_timeout(self.db_busy_timeout)
            .report_offset(self.report_offset)
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: &str) -> Result<T, ConfigError> {
    env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue(name.to_string()))
}

/// Parses `+07:00`, `-05:30`, `+0700` or `Z`.
fn parse_offset(raw: &str) -> Option<FixedOffset> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("z") || raw.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0);
    }

    let (sign, rest) = match raw.as_bytes().first()? {
        b'+' => (1, &raw[1..]),
        b'-' => (-1, &raw[1..]),
        _ => return None,
    };

    let (hours, minutes) = match rest.split_once(':') {
        Some((h, m)) => (h, m),
        // byte length 4 may still hold a multibyte char
        None if rest.len() == 4 => (rest.get(..2)?, rest.get(2..)?),
        None => (rest, "0"),
    };

    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if !(0..60).contains(&minutes) {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
