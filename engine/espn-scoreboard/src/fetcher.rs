//! HTTP access to the scoreboard page

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, info};

use crate::config::ScoreboardConfig;
use crate::error::{Result, ScoreboardError};
use crate::types::LeagueId;

/// Query parameters for one scoreboard request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScoreboardQuery {
    pub league_id: LeagueId,
    pub season: Option<i32>,
    /// Matchup period; `None` lets the service pick the current week
    pub week: Option<u32>,
}

impl ScoreboardQuery {
    /// Query with only the league id, used to read the league name
    pub fn league(league_id: LeagueId) -> Self {
        Self { league_id, season: None, week: None }
    }

    pub fn week(league_id: LeagueId, season: i32, week: Option<u32>) -> Self {
        Self { league_id, season: Some(season), week }
    }

    /// Query string pairs in the order the service expects them
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("leagueId", self.league_id.to_string())];
        if let Some(season) = self.season {
            params.push(("seasonId", season.to_string()));
        }
        if let Some(week) = self.week {
            params.push(("matchupPeriodId", week.to_string()));
        }
        params
    }
}

/// Source of scoreboard HTML
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the raw HTML for a scoreboard query
    async fn fetch(&self, query: &ScoreboardQuery) -> Result<String>;
}

/// `PageFetcher` backed by a reqwest client
pub struct HttpPageFetcher {
    client: Client,
    url: String,
}

impl HttpPageFetcher {
    /// Create a new HTTP fetcher from configuration
    pub fn new(config: &ScoreboardConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self { client, url: config.scoreboard_url() })
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, query: &ScoreboardQuery) -> Result<String> {
        let params = query.params();
        info!("Fetching scoreboard from {} with {:?}", self.url, params);

        let response = self.client.get(&self.url).query(&params).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ScoreboardError::HttpStatus(status.as_u16()));
        }

        let html = response.text().await?;
        debug!("Fetched scoreboard HTML ({} bytes)", html.len());

        Ok(html)
    }
}
