use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    /// Per-question time budget for the screening interview.
    pub question_time_limit: Duration,
    /// Cadence at which the host is expected to poll the interview `tick`
    /// endpoint. Auto-advance precision is bounded by this interval, not
    /// exact to the second.
    pub tick_poll_interval: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            question_time_limit: Duration::from_secs(
                env_or("QUESTION_TIME_LIMIT_SECS", "120")
                    .parse::<u64>()
                    .context("QUESTION_TIME_LIMIT_SECS must be a number of seconds")?,
            ),
            tick_poll_interval: Duration::from_secs(
                env_or("TICK_POLL_INTERVAL_SECS", "5")
                    .parse::<u64>()
                    .context("TICK_POLL_INTERVAL_SECS must be a number of seconds")?,
            ),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
