//! ESPN fantasy football scoreboard scraper
//!
//! Fetches a league's scoreboard pages from ESPN, parses each team's weekly
//! score, record and owners out of the HTML, and pairs teams into matchups.
//! Multi-week views are built by fetching every week concurrently and
//! returning them in week order.

pub mod config;
pub mod error;
pub mod fetcher;
pub mod league;
pub mod logging;
pub mod parser;
pub mod types;

pub use config::ScoreboardConfig;
pub use error::{Result, ScoreboardError};
pub use fetcher::{HttpPageFetcher, PageFetcher, ScoreboardQuery};
pub use league::League;
pub use types::{
    LeagueId, MatchResult, SeasonScoreboards, TeamScore, TeamStanding, WeekScoreboard,
};
