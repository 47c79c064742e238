//! Scoreboard page parsing

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use crate::error::{Result, ScoreboardError};
use crate::types::{LeagueId, MatchResult, TeamScore, WeekScoreboard};

const TITLE_ERROR_PREFIX: &str = "Error -";
const TITLE_LOGIN_PREFIX: &str = "Log In -";
const TITLE_SCOREBOARD_MARKER: &str = " Scoreboard:";

/// A parsed ESPN scoreboard page
pub struct ScoreboardPage {
    document: Html,
    league_id: LeagueId,
}

impl ScoreboardPage {
    pub fn parse(html: &str, league_id: LeagueId) -> Self {
        Self { document: Html::parse_document(html), league_id }
    }

    /// Text of the `<title>` element, trimmed
    pub fn title(&self) -> Option<String> {
        let title_selector = selector("title").ok()?;
        self.document
            .select(&title_selector)
            .next()
            .map(|title| title.text().collect::<String>().trim().to_string())
    }

    /// Classify the page by its title; `Ok` means a scoreboard was served
    pub fn check_title(&self) -> Result<()> {
        let title = self.title().ok_or_else(|| ScoreboardError::malformed("page has no title"))?;

        if title.starts_with(TITLE_ERROR_PREFIX) {
            return Err(ScoreboardError::InvalidLeague(self.league_id));
        }
        if title.starts_with(TITLE_LOGIN_PREFIX) {
            return Err(ScoreboardError::PrivateLeague(self.league_id));
        }
        if !title.contains(TITLE_SCOREBOARD_MARKER) {
            return Err(ScoreboardError::malformed(format!("unexpected title: {title}")));
        }

        Ok(())
    }

    /// League display name, taken from "<Name> Scoreboard: <rest>"
    pub fn league_name(&self) -> Result<String> {
        self.check_title()?;

        let title = self.title().unwrap_or_default();
        let name = title
            .split_once(TITLE_SCOREBOARD_MARKER)
            .map(|(name, _)| name.trim())
            .unwrap_or_default();

        if name.is_empty() {
            return Err(ScoreboardError::malformed(format!("no league name in title: {title}")));
        }

        Ok(name.to_string())
    }

    /// Week number shown in the page header, if any
    pub fn reported_week(&self) -> Option<u32> {
        let header_selector = selector(".games-pageheader").ok()?;
        let header = self.document.select(&header_selector).next()?;
        let text = header.text().collect::<Vec<_>>().join(" ");
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");

        week_from_header(&text)
    }

    /// Parse every team on the page into a weekly scoreboard.
    ///
    /// `requested_week` is only used when the header carries no week number.
    pub fn scoreboard(&self, requested_week: Option<u32>) -> Result<WeekScoreboard> {
        self.check_title()?;

        let week = match self.reported_week() {
            Some(week) => week,
            None => {
                warn!("No week number in page header for league {}", self.league_id);
                requested_week
                    .ok_or_else(|| ScoreboardError::structure("no week number in page header"))?
            }
        };

        let teams = self.parse_teams()?;
        debug!("Parsed {} teams for week {} of league {}", teams.len(), week, self.league_id);

        Ok(WeekScoreboard::new(week, teams))
    }

    /// Extract team rows and pair adjacent teams as opponents
    fn parse_teams(&self) -> Result<Vec<TeamScore>> {
        let region_selector = selector("#scoreboardMatchups")?;
        let matchup_selector = selector("table.ptsBased.matchup")?;
        let row_selector = selector("tr[id]")?;
        let team_cell_selector = selector("td.team")?;

        let region = self
            .document
            .select(&region_selector)
            .next()
            .ok_or_else(|| ScoreboardError::structure("scoreboard matchups region not found"))?;

        let mut rows = Vec::new();
        for matchup in region.select(&matchup_selector) {
            for row in matchup.select(&row_selector) {
                if row.select(&team_cell_selector).next().is_some() {
                    rows.push(self.parse_team_row(&row)?);
                }
            }
        }

        if rows.is_empty() {
            return Err(ScoreboardError::structure("no point-based matchups found"));
        }
        if rows.len() % 2 != 0 {
            return Err(ScoreboardError::structure(format!(
                "odd number of teams on scoreboard: {}",
                rows.len()
            )));
        }

        Ok(pair_opponents(rows))
    }

    fn parse_team_row(&self, row: &ElementRef) -> Result<TeamRow> {
        let team_id = extract_team_id(row)?;

        // Name cell: linked name, "(ABBR)", then the owners
        let name = required_text(row, ".name a", "team name")?;
        let abbrev = strip_parens(&optional_text(row, ".abbrev")?).to_string();
        let owners = optional_text(row, ".owners")?;

        // Record is "W-L-T", score sits in its own cell
        let (wins, losses, draws) = parse_record(&required_text(row, ".record", "record")?)?;
        let points = parse_points(&required_text(row, "td.score", "score")?)?;

        Ok(TeamRow { name, abbrev, points, wins, losses, draws, owners, team_id })
    }
}

/// Fields read straight from a team row, before opponents are known
#[derive(Debug, Clone)]
struct TeamRow {
    name: String,
    abbrev: String,
    points: f64,
    wins: u32,
    losses: u32,
    draws: u32,
    owners: String,
    team_id: String,
}

/// Teams are listed in adjacent pairs: 0 plays 1, 2 plays 3, and so on
fn pair_opponents(rows: Vec<TeamRow>) -> Vec<TeamScore> {
    rows.iter()
        .enumerate()
        .map(|(index, row)| {
            let opponent_index = if index % 2 == 0 { index + 1 } else { index - 1 };
            let opponent = &rows[opponent_index];

            TeamScore {
                name: row.name.clone(),
                abbrev: row.abbrev.clone(),
                points: row.points,
                wins: row.wins,
                losses: row.losses,
                draws: row.draws,
                owners: row.owners.clone(),
                team_id: row.team_id.clone(),
                opponent_index,
                opponent_team_id: opponent.team_id.clone(),
                result: MatchResult::from_points(row.points, opponent.points),
            }
        })
        .collect()
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| ScoreboardError::structure(format!("invalid selector {css}: {e}")))
}

fn optional_text(element: &ElementRef, css: &str) -> Result<String> {
    let sel = selector(css)?;
    Ok(element
        .select(&sel)
        .next()
        .map(|found| found.text().collect::<String>().trim().to_string())
        .unwrap_or_default())
}

fn required_text(element: &ElementRef, css: &str, field: &str) -> Result<String> {
    let sel = selector(css)?;
    element
        .select(&sel)
        .next()
        .map(|found| found.text().collect::<String>().trim().to_string())
        .ok_or_else(|| ScoreboardError::structure(format!("missing {field} ({css})")))
}

/// Stable team id from a row id such as "teamscrg_7_activeteamrow"
fn extract_team_id(row: &ElementRef) -> Result<String> {
    let id_attr = row
        .value()
        .attr("id")
        .ok_or_else(|| ScoreboardError::structure("team row has no id"))?;

    match id_attr.split('_').nth(1) {
        Some(id) if !id.is_empty() => Ok(id.to_string()),
        _ => Err(ScoreboardError::structure(format!("no team id in row id: {id_attr}"))),
    }
}

fn strip_parens(text: &str) -> &str {
    text.trim().trim_start_matches('(').trim_end_matches(')').trim()
}

/// Parse a record such as "(3-1-0)" or "W3-1" into wins, losses and draws
fn parse_record(text: &str) -> Result<(u32, u32, u32)> {
    let record = strip_parens(text);
    let fields: Vec<&str> = record.split('-').map(str::trim).collect();

    if fields.len() < 2 || fields.len() > 3 {
        return Err(ScoreboardError::structure(format!("invalid record format: {text}")));
    }

    let parse_field = |field: &str| {
        field
            .parse::<u32>()
            .map_err(|_| ScoreboardError::structure(format!("invalid record format: {text}")))
    };

    let wins = parse_field(fields[0].trim_start_matches(['W', 'w']))?;
    let losses = parse_field(fields[1])?;
    let draws = match fields.get(2).copied() {
        Some(field) => parse_field(field)?,
        None => 0,
    };

    Ok((wins, losses, draws))
}

fn parse_points(text: &str) -> Result<f64> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(0.0);
    }

    let points = text
        .parse::<f64>()
        .map_err(|_| ScoreboardError::structure(format!("failed to parse points: '{text}'")))?;

    // "NaN" and "inf" parse as f64 but can't be compared as scores
    if !points.is_finite() {
        return Err(ScoreboardError::structure(format!("points are not a number: '{text}'")));
    }

    Ok(points)
}

/// Week number from header text: "Week <n>", or a trailing "- Wk <n>"
/// which names the following period and so reports one past the scoreboard
fn week_from_header(text: &str) -> Option<u32> {
    for (pos, _) in text.match_indices("Week ") {
        let digits: String =
            text[pos + "Week ".len()..].chars().take_while(|c| c.is_ascii_digit()).collect();
        match digits.parse::<u32>() {
            Ok(week) if week > 0 => return Some(week),
            _ => continue,
        }
    }

    let (_, tail) = text.trim_end().rsplit_once("- Wk ")?;
    let week = tail.trim().parse::<u32>().ok()?;
    week.checked_sub(1).filter(|week| *week > 0)
}

/// League display name from a scoreboard page
pub fn parse_league_name(html: &str, league_id: LeagueId) -> Result<String> {
    ScoreboardPage::parse(html, league_id).league_name()
}

/// Weekly scoreboard from a scoreboard page
pub fn parse_scoreboard(
    html: &str,
    league_id: LeagueId,
    requested_week: Option<u32>,
) -> Result<WeekScoreboard> {
    ScoreboardPage::parse(html, league_id).scoreboard(requested_week)
}
