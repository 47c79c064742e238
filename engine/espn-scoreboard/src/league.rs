//! League handle and the fetch operations bound to it

use chrono::Datelike;
use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::config::ScoreboardConfig;
use crate::error::{Result, ScoreboardError};
use crate::fetcher::{HttpPageFetcher, PageFetcher, ScoreboardQuery};
use crate::parser;
use crate::types::{LeagueId, SeasonScoreboards, WeekScoreboard};

/// Highest matchup period a fantasy season can have
pub const MAX_MATCHUP_PERIOD: u32 = 25;

/// A fantasy league on ESPN, identified by its numeric id
pub struct League {
    id: LeagueId,
    fetcher: Arc<dyn PageFetcher>,
    /// Set once, after the first successful name lookup
    name: OnceCell<String>,
}

impl League {
    /// Create a league handle that talks to ESPN with default settings
    pub fn new(id: i64) -> Result<Self> {
        let id = LeagueId::try_from(id)?;
        Self::with_config(id, &ScoreboardConfig::default())
    }

    /// Create a league handle from a numeric string such as "1829677"
    pub fn parse(raw: &str) -> Result<Self> {
        let id = LeagueId::try_from(raw)?;
        Self::with_config(id, &ScoreboardConfig::default())
    }

    pub fn with_config(id: LeagueId, config: &ScoreboardConfig) -> Result<Self> {
        let fetcher = HttpPageFetcher::new(config)?;
        Ok(Self::with_fetcher(id, Arc::new(fetcher)))
    }

    pub fn with_fetcher(id: LeagueId, fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { id, fetcher, name: OnceCell::new() }
    }

    pub fn id(&self) -> LeagueId {
        self.id
    }

    /// Name already resolved by `fetch_name`, if any
    pub fn cached_name(&self) -> Option<&str> {
        self.name.get().map(String::as_str)
    }

    /// League display name, fetched once and then served from memory
    pub async fn fetch_name(&self) -> Result<String> {
        let name = self
            .name
            .get_or_try_init(|| async {
                info!("Fetching name for league {}", self.id);
                let html = self.fetcher.fetch(&ScoreboardQuery::league(self.id)).await?;
                parser::parse_league_name(&html, self.id)
            })
            .await?;

        Ok(name.clone())
    }

    /// Scoreboard for one week. `season` defaults to the current year and
    /// `week` to whatever the service considers the current week.
    pub async fn fetch_week(&self, season: Option<i32>, week: Option<u32>) -> Result<WeekScoreboard> {
        let season = season.unwrap_or_else(current_season);
        let query = ScoreboardQuery::week(self.id, season, week);

        info!("Fetching league {} season {} week {:?}", self.id, season, week);
        let html = self.fetcher.fetch(&query).await?;
        let scoreboard = parser::parse_scoreboard(&html, self.id, week)?;

        info!(
            "Parsed {} teams for league {} week {}",
            scoreboard.teams.len(),
            self.id,
            scoreboard.week
        );
        Ok(scoreboard)
    }

    /// Scoreboards for weeks `start..=end`, fetched concurrently and
    /// returned in week order. Fails if any single week fails.
    pub async fn fetch_weeks(
        &self,
        start: u32,
        end: u32,
        season: Option<i32>,
    ) -> Result<SeasonScoreboards> {
        if start == 0 || start > end || end > MAX_MATCHUP_PERIOD {
            return Err(ScoreboardError::InvalidWeekRange { start, end });
        }

        let season = season.unwrap_or_else(current_season);
        info!("Fetching league {} season {} weeks {}..={}", self.id, season, start, end);

        let weeks = self.gather(season, start..=end).await?;
        Ok(SeasonScoreboards::new(weeks))
    }

    /// Every week of the current season up to and including the current one.
    ///
    /// The current week is fetched first to learn how far the season has
    /// progressed; earlier weeks are then fetched concurrently.
    pub async fn fetch_season(&self) -> Result<SeasonScoreboards> {
        let season = current_season();
        let current = self.fetch_week(Some(season), None).await?;
        info!("League {} is on week {} of {}", self.id, current.week, season);

        if current.week > MAX_MATCHUP_PERIOD {
            return Err(ScoreboardError::structure(format!(
                "current week {} is past the last matchup period",
                current.week
            )));
        }

        let mut weeks = self.gather(season, 1..=current.week.saturating_sub(1)).await?;
        weeks.push(current);

        Ok(SeasonScoreboards::new(weeks))
    }

    /// Launch one fetch per week and wait for all of them. Results keep the
    /// order of `weeks`; the first failure in that order is returned.
    async fn gather(
        &self,
        season: i32,
        weeks: impl Iterator<Item = u32>,
    ) -> Result<Vec<WeekScoreboard>> {
        let requested: Vec<u32> = weeks.collect();
        let fetches = requested.iter().map(|week| self.fetch_week(Some(season), Some(*week)));
        let results = join_all(fetches).await;

        let mut scoreboards = Vec::with_capacity(results.len());
        for (requested_week, result) in requested.iter().zip(results) {
            let scoreboard = result?;
            if scoreboard.week != *requested_week {
                warn!(
                    "League {} requested week {} but page reported week {}",
                    self.id, requested_week, scoreboard.week
                );
            }
            scoreboards.push(scoreboard);
        }

        Ok(scoreboards)
    }
}

fn current_season() -> i32 {
    chrono::Local::now().year()
}
