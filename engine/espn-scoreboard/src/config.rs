//! Configuration for the scoreboard scraper

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Result, ScoreboardError};

/// Path of the scoreboard page, relative to the base URL
pub const SCOREBOARD_PATH: &str = "/ffl/scoreboard";

/// Configuration for fetching ESPN scoreboard pages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreboardConfig {
    /// Scheme and host of the fantasy site (e.g., "http://games.espn.com")
    pub base_url: String,

    /// User agent sent with every request
    pub user_agent: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ScoreboardConfig {
    fn default() -> Self {
        Self {
            base_url: "http://games.espn.com".to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".to_string(),
            timeout_secs: 30,
        }
    }
}

impl ScoreboardConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(base_url) = std::env::var("ESPN_BASE_URL") {
            config.base_url = base_url;
        }

        if let Ok(user_agent) = std::env::var("ESPN_USER_AGENT") {
            config.user_agent = user_agent;
        }

        if let Ok(timeout) = std::env::var("ESPN_TIMEOUT_SECS") {
            config.timeout_secs = timeout.parse().map_err(|_| {
                ScoreboardError::config(format!("ESPN_TIMEOUT_SECS is not a number: {timeout}"))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Config pointing at a different host, e.g. a local mock server
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), ..Self::default() }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ScoreboardError::config(format!(
                "base_url must be an http(s) URL: {}",
                self.base_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(ScoreboardError::config("timeout_secs must be greater than zero"));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Full URL of the scoreboard page
    pub fn scoreboard_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), SCOREBOARD_PATH)
    }
}
