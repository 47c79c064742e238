//! Error types for the scoreboard scraper

use thiserror::Error;

use crate::types::LeagueId;

/// Result type alias for scoreboard operations
pub type Result<T> = std::result::Result<T, ScoreboardError>;

/// Errors that can occur while fetching or parsing scoreboards
#[derive(Error, Debug)]
pub enum ScoreboardError {
    /// League identifier was absent, negative, or not a number
    #[error("Invalid league identifier: {0:?}")]
    InvalidIdentifier(String),

    /// Network-level failure (DNS, connect, timeout, body read)
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Service answered with something other than 200
    #[error("HTTP request failed with status: {0}")]
    HttpStatus(u16),

    /// Service reports that the league does not exist
    #[error("League {0} does not exist")]
    InvalidLeague(LeagueId),

    /// League requires a login to be viewed
    #[error("League {0} is private")]
    PrivateLeague(LeagueId),

    /// Page title matched none of the known patterns
    #[error("Malformed page: {0}")]
    MalformedPage(String),

    /// Scoreboard table or one of its fields is missing
    #[error("Scoreboard structure mismatch: {0}")]
    StructureMismatch(String),

    #[error("Invalid week range: {start}..={end}")]
    InvalidWeekRange { start: u32, end: u32 },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ScoreboardError {
    /// Create a new structure mismatch error
    pub fn structure(msg: impl Into<String>) -> Self {
        Self::StructureMismatch(msg.into())
    }

    /// Create a new malformed page error
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedPage(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
