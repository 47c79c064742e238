//! Scoreboard data types shared by the parser and the league handle

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::error::ScoreboardError;

/// ESPN league identifier, validated to be non-negative
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LeagueId(u64);

impl LeagueId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for LeagueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for LeagueId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl TryFrom<i64> for LeagueId {
    type Error = ScoreboardError;

    fn try_from(id: i64) -> Result<Self, Self::Error> {
        u64::try_from(id)
            .map(Self)
            .map_err(|_| ScoreboardError::InvalidIdentifier(id.to_string()))
    }
}

impl TryFrom<&str> for LeagueId {
    type Error = ScoreboardError;

    fn try_from(raw: &str) -> Result<Self, Self::Error> {
        let digits = raw.trim();

        // u64::from_str would also take a leading '+'
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ScoreboardError::InvalidIdentifier(raw.to_string()));
        }

        digits
            .parse::<u64>()
            .map(Self)
            .map_err(|_| ScoreboardError::InvalidIdentifier(raw.to_string()))
    }
}

/// Outcome of a matchup from one team's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchResult {
    Win,
    Draw,
    Loss,
}

impl MatchResult {
    /// Compare own points against the opponent's
    pub fn from_points(own: f64, opponent: f64) -> Self {
        if own > opponent {
            MatchResult::Win
        } else if own < opponent {
            MatchResult::Loss
        } else {
            MatchResult::Draw
        }
    }

    /// The result the opponent must have recorded
    pub fn mirror(self) -> Self {
        match self {
            MatchResult::Win => MatchResult::Loss,
            MatchResult::Loss => MatchResult::Win,
            MatchResult::Draw => MatchResult::Draw,
        }
    }
}

/// One team's line on a weekly scoreboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamScore {
    /// Team name (e.g., "Touchdown Makers")
    pub name: String,
    /// Team abbreviation without parentheses (e.g., "TDM")
    pub abbrev: String,
    /// Points scored this week
    pub points: f64,
    /// Season record as shown on the page
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    /// Owner names as displayed, possibly several joined together
    pub owners: String,
    /// Team id that stays the same across weeks
    pub team_id: String,
    /// Index of the opponent in the same week's list
    pub opponent_index: usize,
    /// Stable team id of the opponent
    pub opponent_team_id: String,
    /// Result against the opponent
    pub result: MatchResult,
}

/// All teams for a single week, in page order (opponents adjacent)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekScoreboard {
    /// Week as reported by the page, which may differ from the one requested
    pub week: u32,
    pub teams: Vec<TeamScore>,
}

impl WeekScoreboard {
    pub fn new(week: u32, teams: Vec<TeamScore>) -> Self {
        Self { week, teams }
    }

    /// Opponent entry for the team at `index`
    pub fn opponent_of(&self, index: usize) -> Option<&TeamScore> {
        let team = self.teams.get(index)?;
        self.teams.get(team.opponent_index)
    }

    /// Find a team by its stable id
    pub fn team(&self, team_id: &str) -> Option<&TeamScore> {
        self.teams.iter().find(|team| team.team_id == team_id)
    }

    /// Teams grouped into head-to-head pairs
    pub fn matchups(&self) -> impl Iterator<Item = (&TeamScore, &TeamScore)> {
        self.teams.chunks_exact(2).map(|pair| (&pair[0], &pair[1]))
    }
}

/// Season-to-date record for one team, built from weekly scoreboards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamStanding {
    pub team_id: String,
    pub name: String,
    pub abbrev: String,
    pub owners: String,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub points_for: f64,
    pub points_against: f64,
}

/// Weekly scoreboards ordered by ascending week
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeasonScoreboards {
    pub weeks: Vec<WeekScoreboard>,
}

impl SeasonScoreboards {
    pub fn new(weeks: Vec<WeekScoreboard>) -> Self {
        Self { weeks }
    }

    pub fn len(&self) -> usize {
        self.weeks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }

    /// Scoreboard for a given week number
    pub fn week(&self, week: u32) -> Option<&WeekScoreboard> {
        self.weeks.iter().find(|w| w.week == week)
    }

    /// Fold all weeks into one standing per team, best record first.
    ///
    /// Name, abbreviation and owners come from the latest week a team
    /// appears in, since teams may be renamed during a season.
    pub fn standings(&self) -> Vec<TeamStanding> {
        let mut order: Vec<String> = Vec::new();
        let mut table: HashMap<String, TeamStanding> = HashMap::new();

        for week in &self.weeks {
            for (index, team) in week.teams.iter().enumerate() {
                // Unpaired team counts as zero points against
                let against = week.opponent_of(index).map(|opp| opp.points).unwrap_or(0.0);

                let standing = table.entry(team.team_id.clone()).or_insert_with(|| {
                    order.push(team.team_id.clone());
                    TeamStanding {
                        team_id: team.team_id.clone(),
                        name: String::new(),
                        abbrev: String::new(),
                        owners: String::new(),
                        wins: 0,
                        losses: 0,
                        draws: 0,
                        points_for: 0.0,
                        points_against: 0.0,
                    }
                });

                // Latest week wins for display fields
                standing.name = team.name.clone();
                standing.abbrev = team.abbrev.clone();
                standing.owners = team.owners.clone();
                standing.points_for += team.points;
                standing.points_against += against;
                match team.result {
                    MatchResult::Win => standing.wins += 1,
                    MatchResult::Loss => standing.losses += 1,
                    MatchResult::Draw => standing.draws += 1,
                }
            }
        }

        let mut standings: Vec<TeamStanding> =
            order.into_iter().filter_map(|id| table.remove(&id)).collect();

        // Stable sort keeps first-seen order for exact ties
        standings.sort_by(|a, b| {
            b.wins
                .cmp(&a.wins)
                .then_with(|| b.points_for.total_cmp(&a.points_for))
        });

        standings
    }
}
